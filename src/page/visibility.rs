//! Viewport intersection and fire-once visibility triggers.

use crate::surface::Rect;

/// When a trigger fires: the visible fraction of the target, measured
/// against the viewport with its bottom edge moved by `bottom_margin`
/// (negative shrinks it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub bottom_margin: f64,
}

/// Scroll reveal: 10% visible, 50px above the bottom edge.
pub const REVEAL: ObserverOptions = ObserverOptions {
    threshold: 0.1,
    bottom_margin: -50.0,
};

/// Counters start when half visible.
pub const COUNTER: ObserverOptions = ObserverOptions {
    threshold: 0.5,
    bottom_margin: 0.0,
};

/// The chart starts when 30% visible.
pub const CHART: ObserverOptions = ObserverOptions {
    threshold: 0.3,
    bottom_margin: 0.0,
};

/// Fraction of `target` inside the (margin-adjusted) viewport.
pub fn intersection_ratio(target: Rect, viewport: Rect, bottom_margin: f64) -> f64 {
    let root = Rect::new(
        viewport.x,
        viewport.y,
        viewport.width,
        (viewport.height + bottom_margin).max(0.0),
    );
    if target.area() == 0.0 {
        return 0.0;
    }
    target
        .intersection(&root)
        .map_or(0.0, |overlap| overlap.area() / target.area())
}

/// Observes one element and fires the first time it is visible enough.
/// After firing it stops observing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnceTrigger {
    options: ObserverOptions,
    fired: bool,
}

impl OnceTrigger {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            fired: false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns `true` exactly once, on the first observation at or above
    /// the threshold.
    pub fn observe(&mut self, target: Rect, viewport: Rect) -> bool {
        if self.fired {
            return false;
        }
        let ratio = intersection_ratio(target, viewport, self.options.bottom_margin);
        if ratio > 0.0 && ratio >= self.options.threshold {
            self.fired = true;
        }
        self.fired
    }
}
