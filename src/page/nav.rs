//! Navigation menu toggle and scroll spy.

/// Distance above a section's top at which it already counts as current.
pub const SCROLL_OFFSET: f64 = 120.0;

/// Collapsible link list for narrow layouts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Following a link always collapses the menu.
    pub fn link_clicked(&mut self) {
        self.open = false;
    }
}

/// A page section and its current offset from the top of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self {
            id: id.into(),
            top,
        }
    }
}

/// The last section, in document order, whose top (less the offset) has
/// been scrolled past.
pub fn active_section(sections: &[Section], scroll_y: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|s| scroll_y >= s.top - SCROLL_OFFSET)
        .last()
        .map(|s| s.id.as_str())
}

/// Whether a `#fragment` link points at the current section.
pub fn link_is_active(href: &str, current: Option<&str>) -> bool {
    match (href.strip_prefix('#'), current) {
        (Some(target), Some(current)) => target == current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<Section> {
        vec![
            Section::new("overview", 0.0),
            Section::new("chart", 600.0),
            Section::new("data", 1200.0),
        ]
    }

    #[test]
    fn test_menu_toggle_and_close_on_link() {
        let mut menu = NavMenu::default();
        assert!(!menu.is_open());
        menu.toggle();
        assert!(menu.is_open());
        menu.link_clicked();
        assert!(!menu.is_open());
        menu.link_clicked();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_active_section_uses_offset() {
        let s = sections();
        assert_eq!(active_section(&s, 0.0), Some("overview"));
        assert_eq!(active_section(&s, 479.0), Some("overview"));
        assert_eq!(active_section(&s, 480.0), Some("chart"));
        assert_eq!(active_section(&s, 5000.0), Some("data"));
    }

    #[test]
    fn test_no_section_before_first() {
        let s = vec![Section::new("late", 500.0)];
        assert_eq!(active_section(&s, 0.0), None);
    }

    #[test]
    fn test_link_matching() {
        assert!(link_is_active("#chart", Some("chart")));
        assert!(!link_is_active("#data", Some("chart")));
        assert!(!link_is_active("chart", Some("chart")));
        assert!(!link_is_active("#", None));
    }
}
