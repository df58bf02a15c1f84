//! Page module - Landing page behaviors around the chart
//!
//! [`Page::init`] attaches every behavior to the elements it is given and
//! returns a [`Subscriptions`] registry holding one [`Disposer`] per
//! listener. A disposed listener ignores its events from then on.

pub mod counter;
pub mod nav;
pub mod tabs;
pub mod tooltip;
pub mod visibility;

use crate::surface::{Point, Rect};
use counter::{CountUp, CounterError};
use nav::{NavMenu, Section};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tabs::{TabError, TabGroup};
use thiserror::Error;
use tracing::{debug, info};
use visibility::{ObserverOptions, OnceTrigger};

#[derive(Error, Debug, PartialEq)]
pub enum PageError {
    #[error("Counter '{id}': {source}")]
    Counter {
        id: String,
        #[source]
        source: CounterError,
    },
    #[error("Tab group {0} does not exist")]
    UnknownTabGroup(usize),
    #[error(transparent)]
    Tab(#[from] TabError),
}

/// What a listener is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Listener {
    NavToggle,
    NavLinks,
    Scroll,
    Reveal(String),
    Counter(String),
    Tabs(usize),
    Tooltip(String),
    Chart(String),
}

/// Handle that detaches one listener.
#[derive(Debug, Clone)]
pub struct Disposer {
    listener: Listener,
    active: Rc<Cell<bool>>,
}

impl Disposer {
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn dispose(&self) {
        self.active.set(false);
    }
}

/// All disposers returned by [`Page::init`]. Dropping it detaches everything.
#[derive(Debug, Default)]
pub struct Subscriptions {
    disposers: Vec<Disposer>,
}

impl Subscriptions {
    fn attach(&mut self, listener: Listener) -> Rc<Cell<bool>> {
        let active = Rc::new(Cell::new(true));
        self.disposers.push(Disposer {
            listener,
            active: Rc::clone(&active),
        });
        active
    }

    pub fn disposers(&self) -> &[Disposer] {
        &self.disposers
    }

    pub fn get(&self, listener: &Listener) -> Option<&Disposer> {
        self.disposers.iter().find(|d| &d.listener == listener)
    }

    pub fn dispose_all(&self) {
        for disposer in &self.disposers {
            disposer.dispose();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

/// A counter element, e.g. `<span data-count="160" data-prefix="$">`.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterElement {
    pub id: String,
    pub count: String,
    pub prefix: String,
    pub suffix: String,
}

/// Elements the page behaviors attach to.
#[derive(Debug, Clone, Default)]
pub struct PageElements {
    pub has_nav_toggle: bool,
    pub nav_links: Vec<String>,
    pub reveals: Vec<String>,
    pub counters: Vec<CounterElement>,
    pub tab_groups: Vec<TabGroup>,
    pub tooltips: Vec<String>,
    /// Id of the chart canvas, when the page has one.
    pub chart: Option<String>,
}

/// Something an observation or click caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Revealed(String),
    CounterStarted(String),
    /// The chart is visible enough to start; fires at most once.
    ChartVisible(String),
}

type Active = Rc<Cell<bool>>;

struct Observed<T> {
    active: Active,
    trigger: OnceTrigger,
    state: T,
}

impl<T> Observed<T> {
    fn new(active: Active, options: ObserverOptions, state: T) -> Self {
        Self {
            active,
            trigger: OnceTrigger::new(options),
            state,
        }
    }

    /// Feed one observation; `true` the first time the trigger fires while
    /// the listener is attached. Firing detaches the observer.
    fn observe(&mut self, target: Rect, viewport: Rect) -> bool {
        if !self.active.get() {
            return false;
        }
        let fired = self.trigger.observe(target, viewport);
        if fired {
            self.active.set(false);
        }
        fired
    }
}

/// Runtime state of every page behavior.
pub struct Page {
    nav: NavMenu,
    nav_toggle: Option<Active>,
    nav_links: Vec<String>,
    nav_links_active: Active,
    scroll_active: Active,
    current_section: Option<String>,
    reveals: HashMap<String, Observed<bool>>,
    counters: HashMap<String, Observed<(CountUp, bool)>>,
    tab_groups: Vec<(Active, TabGroup)>,
    tooltips: HashMap<String, Active>,
    chart: Option<(String, Observed<()>)>,
}

impl Page {
    /// Attach all behaviors. Counter targets are validated up front.
    pub fn init(elements: PageElements) -> Result<(Page, Subscriptions), PageError> {
        let mut subs = Subscriptions::default();

        let nav_toggle = elements
            .has_nav_toggle
            .then(|| subs.attach(Listener::NavToggle));
        let nav_links_active = subs.attach(Listener::NavLinks);
        let scroll_active = subs.attach(Listener::Scroll);

        let reveals = elements
            .reveals
            .into_iter()
            .map(|id| {
                let active = subs.attach(Listener::Reveal(id.clone()));
                (id, Observed::new(active, visibility::REVEAL, false))
            })
            .collect();

        let mut counters = HashMap::new();
        for el in elements.counters {
            let count = CountUp::parse(&el.count, el.prefix, el.suffix).map_err(|source| {
                PageError::Counter {
                    id: el.id.clone(),
                    source,
                }
            })?;
            let active = subs.attach(Listener::Counter(el.id.clone()));
            counters.insert(
                el.id,
                Observed::new(active, visibility::COUNTER, (count, false)),
            );
        }

        let tab_groups = elements
            .tab_groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| (subs.attach(Listener::Tabs(i)), group))
            .collect();

        let tooltips = elements
            .tooltips
            .into_iter()
            .map(|id| {
                let active = subs.attach(Listener::Tooltip(id.clone()));
                (id, active)
            })
            .collect();

        let chart = elements.chart.map(|id| {
            let active = subs.attach(Listener::Chart(id.clone()));
            (id, Observed::new(active, visibility::CHART, ()))
        });

        info!(listeners = subs.disposers.len(), "Page behaviors attached");
        let page = Page {
            nav: NavMenu::default(),
            nav_toggle,
            nav_links: elements.nav_links,
            nav_links_active,
            scroll_active,
            current_section: None,
            reveals,
            counters,
            tab_groups,
            tooltips,
            chart,
        };
        Ok((page, subs))
    }

    pub fn nav(&self) -> &NavMenu {
        &self.nav
    }

    pub fn toggle_nav(&mut self) {
        if self.nav_toggle.as_ref().is_some_and(|a| a.get()) {
            self.nav.toggle();
        }
    }

    pub fn click_nav_link(&mut self) {
        if self.nav_links_active.get() {
            self.nav.link_clicked();
        }
    }

    /// Recompute the current section from live section offsets.
    pub fn scroll(&mut self, scroll_y: f64, sections: &[Section]) {
        if !self.scroll_active.get() {
            return;
        }
        let current = nav::active_section(sections, scroll_y).map(str::to_string);
        if current != self.current_section {
            debug!(section = ?current, "Active section changed");
            self.current_section = current;
        }
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    pub fn nav_links(&self) -> &[String] {
        &self.nav_links
    }

    pub fn is_link_active(&self, href: &str) -> bool {
        nav::link_is_active(href, self.current_section())
    }

    /// Report where element `id` is relative to the viewport.
    pub fn observe(&mut self, id: &str, target: Rect, viewport: Rect) -> Vec<PageEvent> {
        let mut events = Vec::new();

        if let Some(reveal) = self.reveals.get_mut(id) {
            if reveal.observe(target, viewport) {
                reveal.state = true;
                events.push(PageEvent::Revealed(id.to_string()));
            }
        }

        if let Some(counter) = self.counters.get_mut(id) {
            if counter.observe(target, viewport) {
                counter.state.1 = true;
                events.push(PageEvent::CounterStarted(id.to_string()));
            }
        }

        if let Some((chart_id, chart)) = self.chart.as_mut() {
            if chart_id.as_str() == id && chart.observe(target, viewport) {
                info!(chart = %chart_id, "Chart entered viewport");
                events.push(PageEvent::ChartVisible(chart_id.clone()));
            }
        }
        events
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.reveals.get(id).is_some_and(|r| r.state)
    }

    /// Advance running counters by wall time.
    pub fn tick(&mut self, elapsed: Duration) {
        for counter in self.counters.values_mut() {
            let (count, started) = &mut counter.state;
            if *started {
                count.advance(elapsed);
            }
        }
    }

    /// Whether any started counter still has ticks left.
    pub fn counters_running(&self) -> bool {
        self.counters
            .values()
            .any(|c| c.state.1 && !c.state.0.is_done())
    }

    pub fn counter_text(&self, id: &str) -> Option<String> {
        self.counters.get(id).map(|c| c.state.0.text())
    }

    pub fn click_tab(&mut self, group: usize, button: usize) -> Result<(), PageError> {
        let (active, tabs) = self
            .tab_groups
            .get_mut(group)
            .ok_or(PageError::UnknownTabGroup(group))?;
        if active.get() {
            tabs.activate(button)?;
        }
        Ok(())
    }

    pub fn tab_group(&self, group: usize) -> Option<&TabGroup> {
        self.tab_groups.get(group).map(|(_, g)| g)
    }

    /// Position for the tooltip of `id` when hovered, if it is attached.
    pub fn tooltip_position(&self, id: &str, anchor: Rect, viewport_width: f64) -> Option<Point> {
        self.tooltips
            .get(id)
            .filter(|active| active.get())
            .map(|_| tooltip::place_tooltip(anchor, viewport_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);
    const VISIBLE: Rect = Rect::new(0.0, 100.0, 600.0, 300.0);
    const BELOW: Rect = Rect::new(0.0, 2000.0, 600.0, 300.0);

    fn elements() -> PageElements {
        PageElements {
            has_nav_toggle: true,
            nav_links: vec!["#overview".into(), "#chart".into()],
            reveals: vec!["intro".into()],
            counters: vec![CounterElement {
                id: "mrr".into(),
                count: "160".into(),
                prefix: "$".into(),
                suffix: "K".into(),
            }],
            tab_groups: vec![TabGroup::from_labels(&[("Data", "data"), ("Notes", "notes")])],
            tooltips: vec!["burn-help".into()],
            chart: Some("mrrChart".into()),
        }
    }

    #[test]
    fn test_init_returns_one_disposer_per_listener() {
        let (_page, subs) = Page::init(elements()).unwrap();
        assert_eq!(subs.disposers().len(), 8);
        assert!(subs.get(&Listener::Chart("mrrChart".into())).is_some());
        assert!(subs.disposers().iter().all(Disposer::is_active));
    }

    #[test]
    fn test_bad_counter_fails_init() {
        let mut els = elements();
        els.counters[0].count = "lots".into();
        let err = Page::init(els).err().unwrap();
        assert!(matches!(err, PageError::Counter { ref id, .. } if id == "mrr"));
    }

    #[test]
    fn test_chart_fires_once_then_detaches() {
        let (mut page, subs) = Page::init(elements()).unwrap();
        assert!(page.observe("mrrChart", BELOW, VIEWPORT).is_empty());
        assert_eq!(
            page.observe("mrrChart", VISIBLE, VIEWPORT),
            vec![PageEvent::ChartVisible("mrrChart".into())]
        );
        assert!(page.observe("mrrChart", VISIBLE, VIEWPORT).is_empty());
        assert!(!subs
            .get(&Listener::Chart("mrrChart".into()))
            .unwrap()
            .is_active());
    }

    #[test]
    fn test_disposed_listeners_ignore_events() {
        let (mut page, subs) = Page::init(elements()).unwrap();
        subs.get(&Listener::NavToggle).unwrap().dispose();
        subs.get(&Listener::Chart("mrrChart".into()))
            .unwrap()
            .dispose();

        page.toggle_nav();
        assert!(!page.nav().is_open());
        assert!(page.observe("mrrChart", VISIBLE, VIEWPORT).is_empty());
    }

    #[test]
    fn test_dropping_subscriptions_detaches_everything() {
        let (mut page, subs) = Page::init(elements()).unwrap();
        drop(subs);
        page.scroll(1000.0, &[Section::new("overview", 0.0)]);
        assert_eq!(page.current_section(), None);
        assert_eq!(page.tooltip_position("burn-help", VISIBLE, 1000.0), None);
    }

    #[test]
    fn test_counter_runs_after_visible() {
        let (mut page, _subs) = Page::init(elements()).unwrap();
        page.tick(Duration::from_secs(1));
        assert_eq!(page.counter_text("mrr").as_deref(), Some("$0K"));

        assert_eq!(
            page.observe("mrr", VISIBLE, VIEWPORT),
            vec![PageEvent::CounterStarted("mrr".into())]
        );
        assert!(page.counters_running());
        page.tick(Duration::from_secs(2));
        assert_eq!(page.counter_text("mrr").as_deref(), Some("$160K"));
        assert!(!page.counters_running());
    }

    #[test]
    fn test_scroll_spy_and_nav() {
        let (mut page, _subs) = Page::init(elements()).unwrap();
        let sections = [Section::new("overview", 0.0), Section::new("chart", 700.0)];
        page.scroll(600.0, &sections);
        assert!(page.is_link_active("#chart"));
        assert!(!page.is_link_active("#overview"));

        page.toggle_nav();
        assert!(page.nav().is_open());
        page.click_nav_link();
        assert!(!page.nav().is_open());
    }

    #[test]
    fn test_tabs_and_reveal() {
        let (mut page, _subs) = Page::init(elements()).unwrap();
        page.click_tab(0, 1).unwrap();
        assert!(page.tab_group(0).unwrap().is_panel_active("notes"));
        assert_eq!(page.click_tab(3, 0), Err(PageError::UnknownTabGroup(3)));

        assert!(!page.is_revealed("intro"));
        page.observe("intro", VISIBLE, VIEWPORT);
        assert!(page.is_revealed("intro"));
    }
}
