//! Frame scheduling: the host refresh capability injected into the chart.

use super::renderer::{FrameInfo, MrrChart};
use crate::surface::{Canvas, SurfaceError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Host refresh callback, expressed as "wait for the next frame".
pub trait FrameScheduler {
    /// Block until the host is ready to draw again. `false` means the host
    /// has gone away and no more frames will come.
    fn next_frame(&mut self) -> bool;
}

/// Frames back to back with no waiting.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl FrameScheduler for Immediate {
    fn next_frame(&mut self) -> bool {
        true
    }
}

/// Frames paced at a fixed interval, like a display refresh.
#[derive(Debug, Clone)]
pub struct FixedRate {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedRate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }
}

impl FrameScheduler for FixedRate {
    fn next_frame(&mut self) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last {
            let due = last + self.interval;
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.last = Some(Instant::now());
        true
    }
}

/// Host that grants a fixed number of frames and then goes away.
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget {
    remaining: u32,
}

impl FrameBudget {
    pub fn new(frames: u32) -> Self {
        Self { remaining: frames }
    }
}

impl FrameScheduler for FrameBudget {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Drive `chart` until it completes or the scheduler stops, calling
/// `on_frame` after every drawn frame. The first frame is drawn without
/// waiting.
pub fn run_chart<C, S, F>(
    chart: &mut MrrChart<C>,
    scheduler: &mut S,
    mut on_frame: F,
) -> Result<FrameInfo, SurfaceError>
where
    C: Canvas,
    S: FrameScheduler + ?Sized,
    F: FnMut(&MrrChart<C>, &FrameInfo),
{
    let mut info = chart.info();
    if chart.is_complete() {
        return Ok(info);
    }

    loop {
        info = chart.step()?;
        on_frame(&*chart, &info);
        if chart.is_complete() {
            return Ok(info);
        }
        if !scheduler.next_frame() {
            debug!(frame = info.frame, "Frame host stopped before chart completed");
            return Ok(info);
        }
    }
}

/// Render the MRR chart on `canvas`, driving frames with `scheduler`, and
/// hand the canvas back. A canvas without a drawing context is returned
/// untouched.
pub fn render_mrr_chart<C, S>(canvas: C, scheduler: &mut S) -> Result<C, SurfaceError>
where
    C: Canvas,
    S: FrameScheduler + ?Sized,
{
    let mut chart = MrrChart::start(canvas)?;
    run_chart(&mut chart, scheduler, |_, _| {})?;
    Ok(chart.into_canvas())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::easing::TOTAL_FRAMES;
    use crate::chart::renderer::{FrameStatus, LEGEND_COST_TEXT};
    use crate::surface::{DrawOp, RecordingCanvas, Size};

    fn canvas() -> RecordingCanvas {
        RecordingCanvas::new(Size::new(600.0, 300.0), 1.0)
    }

    #[test]
    fn test_immediate_runs_all_frames() {
        let canvas = render_mrr_chart(canvas(), &mut Immediate).unwrap();
        let clears = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear(_)))
            .count();
        assert_eq!(clears, TOTAL_FRAMES as usize);
        assert!(canvas.texts().contains(&LEGEND_COST_TEXT));
    }

    #[test]
    fn test_on_frame_sees_every_frame_in_order() {
        let mut chart = MrrChart::start(canvas()).unwrap();
        let mut frames = Vec::new();
        let last = run_chart(&mut chart, &mut Immediate, |_, info| frames.push(info.frame)).unwrap();

        assert_eq!(frames, (1..=TOTAL_FRAMES).collect::<Vec<_>>());
        assert_eq!(last.status, FrameStatus::Complete);
    }

    #[test]
    fn test_host_teardown_stops_the_loop() {
        let mut chart = MrrChart::start(canvas()).unwrap();
        // First frame is free; the budget grants nine more.
        let info = run_chart(&mut chart, &mut FrameBudget::new(9), |_, _| {}).unwrap();

        assert_eq!(info.frame, 10);
        assert_eq!(info.status, FrameStatus::Pending);
        assert!(!chart.canvas().texts().contains(&LEGEND_COST_TEXT));

        // The same chart can be resumed by a new host.
        let info = run_chart(&mut chart, &mut Immediate, |_, _| {}).unwrap();
        assert_eq!(info.frame, TOTAL_FRAMES);
    }

    #[test]
    fn test_detached_canvas_is_returned_untouched() {
        let detached = RecordingCanvas::detached(Size::new(600.0, 300.0));
        let canvas = render_mrr_chart(detached, &mut Immediate).unwrap();
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_fixed_rate_paces_frames() {
        let mut host = FixedRate::new(Duration::from_millis(5));
        let started = Instant::now();
        for _ in 0..4 {
            assert!(host.next_frame());
        }
        assert!(started.elapsed() >= Duration::from_millis(15));
    }
}
