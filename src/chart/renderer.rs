//! MRR vs Burn Rate chart renderer
//!
//! Layout:
//! 1. Static furniture drawn once at start: gridlines, `$<v>K` value labels,
//!    `M<n>` month labels every third month, Year 1 / Year 2 annotations.
//! 2. One animation step per host frame: clear the plot interior, redraw the
//!    grid, then the dashed burn line, the MRR line, the MRR area fill, the
//!    break-even marker and the leading-edge dots.
//! 3. After the last frame: the legend.

use super::easing::{self, TOTAL_FRAMES};
use super::layout::ChartLayout;
use super::series::{self, COST, MONTHS, REVENUE};
use crate::surface::{
    Canvas, Color, Dash, DrawContext, LinearGradient, Paint, Point, StrokeStyle, SurfaceError,
    TextAlign, TextStyle,
};
use tracing::{debug, info, trace};

// Colors
const GRID: Color = Color::rgba(255, 255, 255, 0.05);
const LABEL: Color = Color::rgb(100, 116, 139); // #64748b
pub const REVENUE_COLOR: Color = Color::rgb(59, 130, 246); // #3b82f6
pub const COST_COLOR: Color = Color::rgb(244, 63, 94); // #f43f5e
const BREAK_EVEN_COLOR: Color = Color::rgb(16, 185, 129); // #10b981
const MARKER_OUTLINE: Color = Color::rgb(10, 14, 26); // #0a0e1a
const YEAR_1_COLOR: Color = Color::rgba(59, 130, 246, 0.15);
const YEAR_2_COLOR: Color = Color::rgba(16, 185, 129, 0.15);

const GRID_STROKE: StrokeStyle = StrokeStyle::solid(GRID, 1.0);
const COST_STROKE: StrokeStyle =
    StrokeStyle::dashed(COST_COLOR, 2.0, Dash { on: 6.0, off: 4.0 });
const REVENUE_STROKE: StrokeStyle = StrokeStyle::solid(REVENUE_COLOR, 3.0);
const MARKER_OUTLINE_STROKE: StrokeStyle = StrokeStyle::solid(MARKER_OUTLINE, 2.0);

const VALUE_LABEL: TextStyle = TextStyle {
    color: LABEL,
    size: 11.0,
    bold: false,
    align: TextAlign::Right,
};
const MONTH_LABEL: TextStyle = TextStyle {
    align: TextAlign::Center,
    ..VALUE_LABEL
};
const YEAR_LABEL: TextStyle = TextStyle {
    color: YEAR_1_COLOR,
    size: 10.0,
    bold: false,
    align: TextAlign::Center,
};
const MARKER_LABEL: TextStyle = TextStyle {
    color: BREAK_EVEN_COLOR,
    size: 11.0,
    bold: true,
    align: TextAlign::Left,
};
const LEGEND_LABEL: TextStyle = TextStyle {
    color: REVENUE_COLOR,
    size: 12.0,
    bold: true,
    align: TextAlign::Left,
};

/// Cost sample the break-even marker sits on. Fixed, not computed from
/// where the two series cross.
pub const BREAK_EVEN_INDEX: usize = 18;
/// Visible points needed before the marker is shown.
pub const BREAK_EVEN_MIN_POINTS: usize = BREAK_EVEN_INDEX + 1;

const MARKER_RADIUS: f64 = 6.0;
const DOT_RADIUS: f64 = 4.0;

pub const BREAK_EVEN_TEXT: &str = "⬆ Break-even";
pub const LEGEND_REVENUE_TEXT: &str = "● MRR";
pub const LEGEND_COST_TEXT: &str = "- - Burn Rate (~$45K/m)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Another frame is wanted.
    Pending,
    /// The legend is drawn; further steps draw nothing.
    Complete,
}

/// Animation state after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub frame: u32,
    pub eased: f64,
    pub points: usize,
    pub status: FrameStatus,
}

/// The chart as an explicit state machine over a canvas.
///
/// [`MrrChart::start`] sizes the surface and draws the static furniture;
/// each [`MrrChart::step`] draws one animation frame. Nothing else touches
/// the canvas, so hosts decide when frames happen.
pub struct MrrChart<C: Canvas> {
    canvas: C,
    layout: ChartLayout,
    frame: u32,
    status: FrameStatus,
}

impl<C: Canvas> MrrChart<C> {
    /// Size the canvas and draw axes. A canvas without a drawing context
    /// yields a chart that is already complete and never draws.
    pub fn start(mut canvas: C) -> Result<Self, SurfaceError> {
        let viewport = canvas.container_size();
        let pixel_ratio = canvas.pixel_ratio();
        let layout = ChartLayout::new(viewport);

        let Some(ctx) = canvas.context() else {
            debug!("Canvas has no drawing context, chart not rendered");
            return Ok(Self {
                canvas,
                layout,
                frame: 0,
                status: FrameStatus::Complete,
            });
        };

        ctx.set_size(viewport, pixel_ratio)?;
        draw_axes(ctx, &layout)?;
        info!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio,
            "MRR chart started"
        );

        Ok(Self {
            canvas,
            layout,
            frame: 0,
            status: FrameStatus::Pending,
        })
    }

    /// Advance one frame and draw it.
    pub fn step(&mut self) -> Result<FrameInfo, SurfaceError> {
        if self.status == FrameStatus::Complete {
            return Ok(self.info());
        }

        let Some(ctx) = self.canvas.context() else {
            self.status = FrameStatus::Complete;
            return Ok(self.info());
        };

        self.frame += 1;
        let points = easing::visible_points(self.frame);
        draw_frame(ctx, &self.layout, points)?;
        trace!(frame = self.frame, points, "Chart frame drawn");

        if self.frame >= TOTAL_FRAMES {
            draw_legend(ctx, &self.layout)?;
            self.status = FrameStatus::Complete;
            info!(frames = self.frame, "MRR chart animation complete");
        }
        Ok(self.info())
    }

    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            frame: self.frame,
            eased: easing::eased(self.frame),
            points: easing::visible_points(self.frame),
            status: self.status,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn status(&self) -> FrameStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == FrameStatus::Complete
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

fn draw_grid<D: DrawContext + ?Sized>(ctx: &mut D, layout: &ChartLayout) -> Result<(), SurfaceError> {
    let right = layout.viewport.width - layout.margins.right;
    for v in ChartLayout::grid_values() {
        let y = layout.y(v);
        ctx.stroke_polyline(
            &[Point::new(layout.margins.left, y), Point::new(right, y)],
            &GRID_STROKE,
        )?;
    }
    Ok(())
}

fn draw_axes<D: DrawContext + ?Sized>(ctx: &mut D, layout: &ChartLayout) -> Result<(), SurfaceError> {
    draw_grid(ctx, layout)?;
    for v in ChartLayout::grid_values() {
        let at = Point::new(layout.margins.left - 8.0, layout.y(v) + 4.0);
        ctx.fill_text(&format!("${}K", v as u32), at, &VALUE_LABEL)?;
    }

    let label_y = layout.viewport.height - layout.margins.bottom + 20.0;
    for i in (0..MONTHS).step_by(3) {
        let at = Point::new(layout.x(i as f64), label_y);
        ctx.fill_text(&format!("M{}", i + 1), at, &MONTH_LABEL)?;
    }

    let band_y = layout.viewport.height - 5.0;
    ctx.fill_text(
        "← Year 1 (SaaS) →",
        Point::new(layout.x(5.5), band_y),
        &YEAR_LABEL,
    )?;
    ctx.fill_text(
        "← Year 2 (Enterprise) →",
        Point::new(layout.x(17.5), band_y),
        &TextStyle {
            color: YEAR_2_COLOR,
            ..YEAR_LABEL
        },
    )?;
    Ok(())
}

fn draw_frame<D: DrawContext + ?Sized>(
    ctx: &mut D,
    layout: &ChartLayout,
    points: usize,
) -> Result<(), SurfaceError> {
    ctx.clear_rect(layout.clear_rect())?;
    draw_grid(ctx, layout)?;

    let cost = layout.polyline(series::visible(&COST, points));
    if cost.len() > 1 {
        ctx.stroke_polyline(&cost, &COST_STROKE)?;
    }

    let revenue = layout.polyline(series::visible(&REVENUE, points));
    if revenue.len() > 1 {
        ctx.stroke_polyline(&revenue, &REVENUE_STROKE)?;
    }

    if points > 1 {
        let mut area = revenue.clone();
        area.push(Point::new(layout.x((points - 1) as f64), layout.y(0.0)));
        area.push(Point::new(layout.x(0.0), layout.y(0.0)));
        let gradient = LinearGradient {
            y0: layout.margins.top,
            y1: layout.margins.top + layout.plot_height(),
            from: REVENUE_COLOR.with_alpha(0.15),
            to: REVENUE_COLOR.with_alpha(0.0),
        };
        ctx.fill_polygon(&area, &Paint::Gradient(gradient))?;
    }

    if points >= BREAK_EVEN_MIN_POINTS {
        let at = layout.point(BREAK_EVEN_INDEX, COST[BREAK_EVEN_INDEX]);
        ctx.fill_circle(at, MARKER_RADIUS, BREAK_EVEN_COLOR)?;
        ctx.stroke_circle(at, MARKER_RADIUS, &MARKER_OUTLINE_STROKE)?;
        ctx.fill_text(
            BREAK_EVEN_TEXT,
            Point::new(at.x + 12.0, at.y - 8.0),
            &MARKER_LABEL,
        )?;
    }

    if points > 0 {
        let last = points - 1;
        ctx.fill_circle(layout.point(last, REVENUE[last]), DOT_RADIUS, REVENUE_COLOR)?;
        ctx.fill_circle(layout.point(last, COST[last]), DOT_RADIUS, COST_COLOR)?;
    }
    Ok(())
}

fn draw_legend<D: DrawContext + ?Sized>(ctx: &mut D, layout: &ChartLayout) -> Result<(), SurfaceError> {
    let y = layout.margins.top - 15.0;
    ctx.fill_text(
        LEGEND_REVENUE_TEXT,
        Point::new(layout.margins.left + 10.0, y),
        &LEGEND_LABEL,
    )?;
    ctx.fill_text(
        LEGEND_COST_TEXT,
        Point::new(layout.margins.left + 80.0, y),
        &TextStyle {
            color: COST_COLOR,
            ..LEGEND_LABEL
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingCanvas, Size};

    fn recording(width: f64, height: f64) -> RecordingCanvas {
        RecordingCanvas::new(Size::new(width, height), 2.0)
    }

    fn polylines(ops: &[DrawOp]) -> Vec<(&[Point], &StrokeStyle)> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Polyline { points, style } => Some((points.as_slice(), style)),
                _ => None,
            })
            .collect()
    }

    fn series_lines<'a>(ops: &'a [DrawOp], style: &StrokeStyle) -> Vec<&'a [Point]> {
        polylines(ops)
            .into_iter()
            .filter(|(_, s)| *s == style)
            .map(|(p, _)| p)
            .collect()
    }

    fn has_polygon(ops: &[DrawOp]) -> bool {
        ops.iter().any(|op| matches!(op, DrawOp::Polygon { .. }))
    }

    fn has_marker(ops: &[DrawOp]) -> bool {
        ops.iter()
            .any(|op| matches!(op, DrawOp::Text { text, .. } if text == BREAK_EVEN_TEXT))
    }

    /// Start a chart, draining the start-up ops, then run `frames` steps and
    /// return the ops of the last one.
    fn ops_at_frame(frames: u32) -> (MrrChart<RecordingCanvas>, Vec<DrawOp>) {
        let mut chart = MrrChart::start(recording(600.0, 300.0)).unwrap();
        chart.canvas.take_ops();
        let mut last = Vec::new();
        for _ in 0..frames {
            chart.step().unwrap();
            last = chart.canvas.take_ops();
        }
        (chart, last)
    }

    #[test]
    fn test_detached_canvas_is_a_no_op() {
        let mut chart = MrrChart::start(RecordingCanvas::detached(Size::new(600.0, 300.0))).unwrap();
        assert!(chart.is_complete());

        let info = chart.step().unwrap();
        assert_eq!(info.frame, 0);
        assert_eq!(info.status, FrameStatus::Complete);
        assert!(chart.canvas().ops().is_empty());
    }

    #[test]
    fn test_start_sizes_surface_then_draws_furniture() {
        let chart = MrrChart::start(recording(600.0, 300.0)).unwrap();
        let ops = chart.canvas().ops();

        assert_eq!(
            ops[0],
            DrawOp::SetSize {
                size: Size::new(600.0, 300.0),
                pixel_ratio: 2.0
            }
        );
        assert_eq!(polylines(ops).len(), 7);

        let texts = chart.canvas().texts();
        for label in ["$0K", "$30K", "$90K", "$180K"] {
            assert!(texts.contains(&label), "missing {}", label);
        }
        let months: Vec<_> = texts.iter().filter(|t| t.starts_with('M')).collect();
        assert_eq!(
            months,
            vec![&"M1", &"M4", &"M7", &"M10", &"M13", &"M16", &"M19", &"M22"]
        );
        assert!(texts.iter().any(|t| t.contains("Year 1")));
        assert!(texts.iter().any(|t| t.contains("Year 2")));
        assert!(!texts.contains(&LEGEND_REVENUE_TEXT));
        assert_eq!(chart.status(), FrameStatus::Pending);
    }

    #[test]
    fn test_value_labels_sit_left_of_gridlines() {
        let chart = MrrChart::start(recording(600.0, 300.0)).unwrap();
        let label = chart
            .canvas()
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, at, style } if text == "$180K" => Some((*at, *style)),
                _ => None,
            })
            .unwrap();
        assert_eq!(label.0, Point::new(47.0, 44.0));
        assert_eq!(label.1.align, TextAlign::Right);
    }

    #[test]
    fn test_first_frame_shows_single_points_only() {
        let (chart, ops) = ops_at_frame(1);
        let info = chart.info();
        assert_eq!(info.points, 1);
        assert!((info.eased - 0.049).abs() < 0.001);

        assert_eq!(ops[0], DrawOp::Clear(chart.layout().clear_rect()));
        assert!(series_lines(&ops, &COST_STROKE).is_empty());
        assert!(series_lines(&ops, &REVENUE_STROKE).is_empty());
        assert!(!has_polygon(&ops));
        assert!(!has_marker(&ops));

        let dots: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillCircle { center, color, .. } => Some((*center, *color)),
                _ => None,
            })
            .collect();
        let layout = chart.layout();
        assert_eq!(
            dots,
            vec![
                (layout.point(0, REVENUE[0]), REVENUE_COLOR),
                (layout.point(0, COST[0]), COST_COLOR),
            ]
        );
    }

    #[test]
    fn test_frame_48_shows_marker_but_not_last_month() {
        let (chart, ops) = ops_at_frame(48);
        assert_eq!(chart.info().points, 23);

        let revenue = series_lines(&ops, &REVENUE_STROKE);
        assert_eq!(revenue.len(), 1);
        assert_eq!(revenue[0].len(), 23);
        assert_eq!(revenue[0][22], chart.layout().point(22, REVENUE[22]));
        assert!(has_marker(&ops));
        assert!(!chart.canvas().texts().contains(&LEGEND_REVENUE_TEXT));
        assert_eq!(chart.status(), FrameStatus::Pending);
    }

    #[test]
    fn test_area_fill_and_marker_follow_visible_points() {
        let mut chart = MrrChart::start(recording(600.0, 300.0)).unwrap();
        chart.canvas.take_ops();
        for _ in 0..TOTAL_FRAMES {
            let info = chart.step().unwrap();
            let ops = chart.canvas.take_ops();
            assert_eq!(has_polygon(&ops), info.points > 1, "frame {}", info.frame);
            assert_eq!(
                has_marker(&ops),
                info.points >= BREAK_EVEN_MIN_POINTS,
                "frame {}",
                info.frame
            );
        }
    }

    #[test]
    fn test_area_fill_closes_down_to_zero() {
        let (chart, ops) = ops_at_frame(30);
        let layout = chart.layout();
        let pts = chart.info().points;

        let (points, paint) = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Polygon { points, paint } => Some((points, paint)),
                _ => None,
            })
            .unwrap();
        assert_eq!(points.len(), pts + 2);
        assert_eq!(points[pts], Point::new(layout.x((pts - 1) as f64), layout.y(0.0)));
        assert_eq!(points[pts + 1], Point::new(layout.x(0.0), layout.y(0.0)));

        let Paint::Gradient(gradient) = paint else {
            panic!("area fill should be a gradient");
        };
        assert_eq!(gradient.y0, 40.0);
        assert_eq!(gradient.y1, 255.0);
        assert_eq!(gradient.from.a, 0.15);
        assert_eq!(gradient.to.a, 0.0);
    }

    #[test]
    fn test_full_run_ends_with_complete_chart_and_legend() {
        let (mut chart, ops) = ops_at_frame(TOTAL_FRAMES);
        let layout = *chart.layout();
        assert_eq!(chart.status(), FrameStatus::Complete);
        assert_eq!(chart.info().points, 24);

        let revenue = series_lines(&ops, &REVENUE_STROKE);
        assert_eq!(revenue[0].len(), 24);
        assert_eq!(revenue[0][0].x, 55.0);
        assert_eq!(revenue[0][23].x, 570.0);

        let cost = series_lines(&ops, &COST_STROKE);
        assert_eq!(cost[0].len(), 24);
        assert!(COST_STROKE.dash.is_some());

        let marker = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::StrokeCircle { center, .. } => Some(*center),
                _ => None,
            })
            .unwrap();
        assert_eq!(marker, Point::new(layout.x(18.0), layout.y(45.0)));

        let legend: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, at, .. }
                    if text == LEGEND_REVENUE_TEXT || text == LEGEND_COST_TEXT =>
                {
                    Some((text.as_str(), *at))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            legend,
            vec![
                (LEGEND_REVENUE_TEXT, Point::new(65.0, 25.0)),
                (LEGEND_COST_TEXT, Point::new(135.0, 25.0)),
            ]
        );

        // Terminal: more steps draw nothing.
        let info = chart.step().unwrap();
        assert_eq!(info.frame, TOTAL_FRAMES);
        assert!(chart.canvas().ops().is_empty());
    }

    #[test]
    fn test_reinvocation_keeps_previous_furniture() {
        let mut canvas = recording(600.0, 300.0);
        MrrChart::start(&mut canvas).unwrap();
        let chart = MrrChart::start(&mut canvas).unwrap();
        let clear = chart.layout().clear_rect();

        let texts = canvas.texts();
        assert_eq!(texts.iter().filter(|t| **t == "$0K").count(), 2);
        // Nothing wipes the whole surface between invocations.
        assert!(canvas
            .ops()
            .iter()
            .all(|op| !matches!(op, DrawOp::Clear(r) if *r != clear)));
    }
}
