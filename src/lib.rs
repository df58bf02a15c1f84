//! MRR Chart - Animated MRR vs Burn Rate chart and landing-page behaviors
//!
//! The chart renderer draws into any [`surface::Canvas`]; the [`page`]
//! module holds the state machines around it (nav, scroll spy, reveal,
//! tabs, counters, tooltips).

pub mod chart;
pub mod config;
pub mod export;
pub mod page;
pub mod surface;
