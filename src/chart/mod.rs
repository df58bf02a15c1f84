//! Chart module - MRR vs Burn Rate chart
//!
//! `renderer` holds the frame state machine, `scheduler` the host refresh
//! capability and the `render_mrr_chart` entry point.

pub mod easing;
pub mod layout;
pub mod series;

mod renderer;
mod scheduler;

pub use layout::ChartLayout;
pub use renderer::{
    FrameInfo, FrameStatus, MrrChart, BREAK_EVEN_INDEX, BREAK_EVEN_MIN_POINTS, COST_COLOR,
    REVENUE_COLOR,
};
pub use scheduler::{render_mrr_chart, run_chart, FixedRate, FrameBudget, FrameScheduler, Immediate};
