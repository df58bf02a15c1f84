//! Tabbed content panels.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TabError {
    #[error("Tab button {0} does not exist")]
    UnknownButton(usize),
    #[error("Tab panel '{0}' is not part of this group")]
    UnknownPanel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabButton {
    pub label: String,
    /// Id of the panel this button shows.
    pub panel: String,
}

/// One group of buttons and panels. Exactly one button and its panel are
/// active once any button has been clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct TabGroup {
    buttons: Vec<TabButton>,
    panels: Vec<String>,
    active: Option<usize>,
}

impl TabGroup {
    pub fn new(buttons: Vec<TabButton>, panels: Vec<String>) -> Self {
        Self {
            buttons,
            panels,
            active: None,
        }
    }

    /// Group with one panel per button, first one active.
    pub fn from_labels(tabs: &[(&str, &str)]) -> Self {
        let buttons: Vec<TabButton> = tabs
            .iter()
            .map(|(label, panel)| TabButton {
                label: label.to_string(),
                panel: panel.to_string(),
            })
            .collect();
        let panels = buttons.iter().map(|b| b.panel.clone()).collect();
        Self {
            active: (!buttons.is_empty()).then_some(0),
            buttons,
            panels,
        }
    }

    pub fn buttons(&self) -> &[TabButton] {
        &self.buttons
    }

    /// Activate a button and its panel, deactivating everything else in the
    /// group. Nothing changes on error.
    pub fn activate(&mut self, index: usize) -> Result<&str, TabError> {
        let button = self
            .buttons
            .get(index)
            .ok_or(TabError::UnknownButton(index))?;
        if !self.panels.contains(&button.panel) {
            return Err(TabError::UnknownPanel(button.panel.clone()));
        }
        self.active = Some(index);
        Ok(&self.buttons[index].panel)
    }

    pub fn active_button(&self) -> Option<usize> {
        self.active
    }

    pub fn active_panel(&self) -> Option<&str> {
        self.active.map(|i| self.buttons[i].panel.as_str())
    }

    pub fn is_panel_active(&self, panel: &str) -> bool {
        self.active_panel() == Some(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_is_exclusive() {
        let mut group = TabGroup::from_labels(&[("Chart", "tab-chart"), ("Data", "tab-data")]);
        assert!(group.is_panel_active("tab-chart"));

        assert_eq!(group.activate(1).unwrap(), "tab-data");
        assert_eq!(group.active_button(), Some(1));
        assert!(group.is_panel_active("tab-data"));
        assert!(!group.is_panel_active("tab-chart"));
    }

    #[test]
    fn test_unknown_panel_leaves_state_unchanged() {
        let mut group = TabGroup::new(
            vec![
                TabButton {
                    label: "A".into(),
                    panel: "a".into(),
                },
                TabButton {
                    label: "B".into(),
                    panel: "missing".into(),
                },
            ],
            vec!["a".into()],
        );
        assert_eq!(group.active_button(), None);
        group.activate(0).unwrap();

        assert_eq!(
            group.activate(1),
            Err(TabError::UnknownPanel("missing".into()))
        );
        assert_eq!(group.activate(7), Err(TabError::UnknownButton(7)));
        assert_eq!(group.active_panel(), Some("a"));
    }
}
