//! Hourly temperature line chart.
//!
//! Drawing goes through [`Canvas`], a small slice of a 2D path API, so the
//! same routine can target a `plotters` backend or a recorder in tests.

use std::fmt::Debug;

pub mod plot;

/// Pixel row that a temperature of 0 °C maps to.
pub const BASELINE_Y: f64 = 150.0;
/// Horizontal distance between consecutive hours.
pub const HOUR_STEP_X: f64 = 12.0;
pub const STROKE_COLOR: &str = "#2196F3";
pub const STROKE_WIDTH: f64 = 2.0;

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 150;

pub trait Canvas: Send + Debug {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self, color: &str, width: f64);
}

/// Screen points for `temps`: the first sample twice (once as the pen-down
/// position, once as the first segment end), then one per remaining sample.
///
/// Values map with a fixed `150 - t`; nothing is scaled or clipped.
pub fn chart_points(temps: &[f64]) -> Vec<(f64, f64)> {
    let Some(first) = temps.first() else {
        return Vec::new();
    };

    let mut points = Vec::with_capacity(temps.len() + 1);
    points.push((0.0, BASELINE_Y - first));
    points.extend(
        temps
            .iter()
            .enumerate()
            .map(|(i, t)| (i as f64 * HOUR_STEP_X, BASELINE_Y - t)),
    );
    points
}

/// Clears the whole surface and strokes the temperature polyline.
///
/// An empty series leaves the surface cleared with no path.
pub fn draw_temperature_chart(canvas: &mut dyn Canvas, temps: &[f64]) {
    let (w, h) = (f64::from(canvas.width()), f64::from(canvas.height()));
    canvas.clear_rect(0.0, 0.0, w, h);

    let points = chart_points(temps);
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return;
    };

    canvas.begin_path();
    canvas.move_to(x0, y0);
    for &(x, y) in rest {
        canvas.line_to(x, y);
    }
    canvas.stroke(STROKE_COLOR, STROKE_WIDTH);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke { color: String, width: f64 },
}

/// Keeps every call as a [`DrawOp`].
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Points of the current path, pen-down first.
    pub fn path_points(&self) -> Vec<(f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::MoveTo(x, y) | DrawOp::LineTo(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn stroke(&mut self, color: &str, width: f64) {
        self.ops.push(DrawOp::Stroke {
            color: color.to_string(),
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_point_is_duplicated() {
        let points = chart_points(&[10.0, 12.0, 15.0]);
        assert_eq!(
            points,
            vec![(0.0, 140.0), (0.0, 140.0), (12.0, 138.0), (24.0, 135.0)]
        );
    }

    #[test]
    fn draw_emits_clear_path_and_stroke() {
        let mut canvas = RecordingCanvas::default();
        draw_temperature_chart(&mut canvas, &[10.0, 12.0, 15.0]);

        assert_eq!(
            canvas.ops,
            vec![
                DrawOp::ClearRect { x: 0.0, y: 0.0, width: 300.0, height: 150.0 },
                DrawOp::BeginPath,
                DrawOp::MoveTo(0.0, 140.0),
                DrawOp::LineTo(0.0, 140.0),
                DrawOp::LineTo(12.0, 138.0),
                DrawOp::LineTo(24.0, 135.0),
                DrawOp::Stroke { color: "#2196F3".to_string(), width: 2.0 },
            ]
        );
    }

    #[test]
    fn short_series_is_plotted_without_padding() {
        let mut canvas = RecordingCanvas::default();
        draw_temperature_chart(&mut canvas, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        let points = canvas.path_points();
        assert_eq!(points.len(), 6);
        assert_eq!(points.last(), Some(&(48.0, 145.0)));
    }

    #[test]
    fn out_of_range_values_are_not_clipped() {
        let points = chart_points(&[160.0, -20.0]);
        assert_eq!(points[0], (0.0, -10.0));
        assert_eq!(points[2], (12.0, 170.0));
    }

    #[test]
    fn empty_series_only_clears() {
        let mut canvas = RecordingCanvas::new(100, 50);
        draw_temperature_chart(&mut canvas, &[]);

        assert_eq!(
            canvas.ops,
            vec![DrawOp::ClearRect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 }]
        );
    }
}
