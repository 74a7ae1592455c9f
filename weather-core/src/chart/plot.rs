use std::path::Path;

use plotters::prelude::{BitMapBackend, Color, RGBColor, SVGBackend, WHITE};
use plotters_backend::{BackendCoord, DrawingBackend};

use super::{Canvas, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// A stroked polyline or a partial clear, replayed in order on output.
#[derive(Debug, Clone, PartialEq)]
enum PlotOp {
    Clear {
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
    },
    Path {
        points: Vec<BackendCoord>,
        color: (u8, u8, u8),
        width: u32,
    },
}

/// A canvas backed by a `plotters` drawing backend.
///
/// Path calls are collected until `stroke`, which commits each subpath as a
/// polyline. Output goes through [`DrawingBackend::draw_path`], so the same
/// surface can be written as SVG or PNG.
#[derive(Debug, Clone)]
pub struct PlotCanvas {
    width: u32,
    height: u32,
    subpaths: Vec<Vec<BackendCoord>>,
    ops: Vec<PlotOp>,
}

impl PlotCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            subpaths: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// Replays the surface onto `backend` over a white background.
    pub fn render_on<DB: DrawingBackend>(&self, backend: &mut DB) -> Result<(), ChartError> {
        let bottom_right = (self.width as i32, self.height as i32);
        backend
            .draw_rect((0, 0), bottom_right, &WHITE, true)
            .map_err(render_error)?;

        for op in &self.ops {
            let drawn = match op {
                PlotOp::Clear {
                    upper_left,
                    bottom_right,
                } => backend.draw_rect(*upper_left, *bottom_right, &WHITE, true),
                PlotOp::Path {
                    points,
                    color: (r, g, b),
                    width,
                } => {
                    let style = RGBColor(*r, *g, *b).stroke_width(*width);
                    backend.draw_path(points.iter().copied(), &style)
                }
            };
            drawn.map_err(render_error)?;
        }

        backend.present().map_err(render_error)
    }

    pub fn to_svg(&self) -> Result<String, ChartError> {
        let mut doc = String::new();
        {
            let mut backend = SVGBackend::with_string(&mut doc, (self.width, self.height));
            self.render_on(&mut backend)?;
        }
        Ok(doc)
    }

    /// Writes a PNG when the path ends in `.png`, SVG otherwise.
    pub fn save(&self, path: &Path) -> Result<(), ChartError> {
        let size = (self.width, self.height);
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

        if is_png {
            self.render_on(&mut BitMapBackend::new(path, size))
        } else {
            self.render_on(&mut SVGBackend::new(path, size))
        }
    }

    #[cfg(test)]
    fn paths(&self) -> impl Iterator<Item = &[BackendCoord]> {
        self.ops.iter().filter_map(|op| match op {
            PlotOp::Path { points, .. } => Some(points.as_slice()),
            PlotOp::Clear { .. } => None,
        })
    }
}

impl Default for PlotCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Canvas for PlotCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let covers = x <= 0.0
            && y <= 0.0
            && x + width >= f64::from(self.width)
            && y + height >= f64::from(self.height);
        if covers {
            self.ops.clear();
        } else {
            self.ops.push(PlotOp::Clear {
                upper_left: to_pixel(x, y),
                bottom_right: to_pixel(x + width, y + height),
            });
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(vec![to_pixel(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let point = to_pixel(x, y);
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    fn stroke(&mut self, color: &str, width: f64) {
        let color = parse_hex_color(color).unwrap_or_else(|| {
            tracing::warn!(color, "unrecognised stroke color, using black");
            (0, 0, 0)
        });
        let width = width.round().max(1.0) as u32;
        self.ops.extend(self.subpaths.iter().map(|points| PlotOp::Path {
            points: points.clone(),
            color,
            width,
        }));
    }
}

fn to_pixel(x: f64, y: f64) -> BackendCoord {
    (x.round() as i32, y.round() as i32)
}

/// `#RRGGBB` -> `(r, g, b)`.
fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn render_error(e: impl std::fmt::Display) -> ChartError {
    ChartError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::draw_temperature_chart;

    #[test]
    fn chart_becomes_single_polyline() {
        let mut canvas = PlotCanvas::default();
        draw_temperature_chart(&mut canvas, &[10.0, 12.0, 15.0]);

        assert_eq!(
            canvas.paths().collect::<Vec<_>>(),
            vec![&[(0, 140), (0, 140), (12, 138), (24, 135)][..]]
        );

        let doc = canvas.to_svg().unwrap();
        assert!(doc.contains("<svg"));
        assert_eq!(doc.matches("<polyline").count(), 1);
        assert!(doc.to_uppercase().contains("#2196F3"));
        assert!(doc.contains("stroke-width=\"2\""));
        assert!(doc.contains("24,135"));
    }

    #[test]
    fn redraw_replaces_previous_chart() {
        let mut canvas = PlotCanvas::default();
        draw_temperature_chart(&mut canvas, &[10.0, 11.0]);
        draw_temperature_chart(&mut canvas, &[20.0, 21.0]);

        let paths: Vec<_> = canvas.paths().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0][0], (0, 130));
    }

    #[test]
    fn empty_surface_has_no_polyline() {
        let canvas = PlotCanvas::new(10, 10);
        let doc = canvas.to_svg().unwrap();
        assert!(!doc.contains("<polyline"));
    }

    #[test]
    fn save_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = PlotCanvas::default();
        draw_temperature_chart(&mut canvas, &[10.0, 12.0, 15.0]);

        let svg = dir.path().join("chart.svg");
        canvas.save(&svg).unwrap();
        assert!(std::fs::read_to_string(&svg).unwrap().contains("<polyline"));

        let png = dir.path().join("chart.png");
        canvas.save(&png).unwrap();
        let bytes = std::fs::read(&png).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#2196F3"), Some((0x21, 0x96, 0xF3)));
        assert_eq!(parse_hex_color("2196F3"), None);
        assert_eq!(parse_hex_color("#21"), None);
    }
}
