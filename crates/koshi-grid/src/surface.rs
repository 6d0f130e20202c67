//! The 2D drawing surface renderers paint onto.
//!
//! [`DrawSurface`] is the immediate-mode contract the grid needs from a
//! backend: rectangles, lines and arcs, text with measurable metrics,
//! clipping, and image/sprite blits. Text metrics live on the separate
//! [`TextMeasure`] supertrait so measurement and hit-testing can run
//! against metrics alone, without a surface they could paint on.
//!
//! [`RecordingSurface`] is the in-memory backend: it records every call as a
//! [`DrawOp`] and measures text with fixed monospace metrics, which makes
//! layout deterministic in tests and in the headless inspector.

use std::fmt;

use kurbo::{Point, Rect};

use crate::cache::{LoadedImage, Sprite};
use crate::color::{Color, to_hex};

/// Font weight used by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font selection for one text run.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::Normal,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }
}

/// Measured extent of a single line of text.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextMetrics {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Text measurement, the read-only half of a surface.
pub trait TextMeasure {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics;
}

/// Immediate-mode 2D drawing surface.
///
/// Text is positioned by the top-left corner of its line box.
pub trait DrawSurface: TextMeasure {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);
    fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f64);
    /// Stroke a circular arc. Angles are radians, clockwise from 12 o'clock.
    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        color: Color,
        width: f64,
    );
    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color);
    fn draw_image(&mut self, image: &LoadedImage, dest: Rect);
    fn draw_sprite(&mut self, sprite: &Sprite, dest: Rect, color: Color);
    fn save(&mut self);
    /// Intersect the current clip with `rect` until the matching `restore`.
    fn clip(&mut self, rect: Rect);
    fn restore(&mut self);
}

// ============================================================================
// Monospace metrics
// ============================================================================

/// Deterministic metrics: every char is `0.6 × size` wide.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonospaceMetrics;

impl MonospaceMetrics {
    pub const ADVANCE: f64 = 0.6;
    pub const ASCENT: f64 = 0.8;
    pub const DESCENT: f64 = 0.2;
}

impl TextMeasure for MonospaceMetrics {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics {
        let chars = text.chars().count() as f64;
        TextMetrics {
            width: chars * font.size * Self::ADVANCE,
            ascent: font.size * Self::ASCENT,
            descent: font.size * Self::DESCENT,
        }
    }
}

// ============================================================================
// Recording surface
// ============================================================================

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f64 },
    FillRoundedRect { rect: Rect, radius: f64, color: Color },
    Line { from: Point, to: Point, color: Color, width: f64 },
    Polyline { points: Vec<Point>, color: Color, width: f64 },
    Arc { center: Point, radius: f64, start_angle: f64, sweep: f64, color: Color, width: f64 },
    Text { text: String, origin: Point, font: FontSpec, color: Color },
    Image { url: String, dest: Rect },
    Sprite { name: String, dest: Rect, color: Color },
    Save,
    Clip { rect: Rect },
    Restore,
}

fn fmt_rect(r: &Rect) -> String {
    format!("[{:.1},{:.1} {:.1}x{:.1}]", r.x0, r.y0, r.width(), r.height())
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::FillRect { rect, color } => {
                write!(f, "fill_rect {} {}", fmt_rect(rect), to_hex(*color))
            }
            DrawOp::StrokeRect { rect, color, width } => {
                write!(f, "stroke_rect {} {} w={width}", fmt_rect(rect), to_hex(*color))
            }
            DrawOp::FillRoundedRect { rect, radius, color } => {
                write!(f, "fill_round_rect {} r={radius} {}", fmt_rect(rect), to_hex(*color))
            }
            DrawOp::Line { from, to, color, .. } => write!(
                f,
                "line ({:.1},{:.1})->({:.1},{:.1}) {}",
                from.x,
                from.y,
                to.x,
                to.y,
                to_hex(*color)
            ),
            DrawOp::Polyline { points, color, .. } => {
                write!(f, "polyline {} points {}", points.len(), to_hex(*color))
            }
            DrawOp::Arc { center, radius, sweep, color, .. } => write!(
                f,
                "arc ({:.1},{:.1}) r={radius:.1} sweep={sweep:.2} {}",
                center.x,
                center.y,
                to_hex(*color)
            ),
            DrawOp::Text { text, origin, font, color } => write!(
                f,
                "text {:?} at ({:.1},{:.1}) {}px {}",
                text,
                origin.x,
                origin.y,
                font.size,
                to_hex(*color)
            ),
            DrawOp::Image { url, dest } => write!(f, "image {url} {}", fmt_rect(dest)),
            DrawOp::Sprite { name, dest, color } => {
                write!(f, "sprite {name} {} {}", fmt_rect(dest), to_hex(*color))
            }
            DrawOp::Save => write!(f, "save"),
            DrawOp::Clip { rect } => write!(f, "clip {}", fmt_rect(rect)),
            DrawOp::Restore => write!(f, "restore"),
        }
    }
}

/// Surface that records calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    depth: usize,
    metrics: MonospaceMetrics,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded ops, leaving the surface empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.depth = 0;
    }

    /// Text runs painted so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names of sprites painted so far, in order.
    pub fn sprites(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Sprite { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Current save/restore nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl TextMeasure for RecordingSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextMetrics {
        self.metrics.measure_text(text, font)
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.ops.push(DrawOp::StrokeRect { rect, color, width });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        self.ops.push(DrawOp::FillRoundedRect { rect, radius, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.ops.push(DrawOp::Line { from, to, color, width });
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f64) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        color: Color,
        width: f64,
    ) {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start_angle,
            sweep,
            color,
            width,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color,
        });
    }

    fn draw_image(&mut self, image: &LoadedImage, dest: Rect) {
        self.ops.push(DrawOp::Image {
            url: image.url.clone(),
            dest,
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite, dest: Rect, color: Color) {
        self.ops.push(DrawOp::Sprite {
            name: sprite.name.clone(),
            dest,
            color,
        });
    }

    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
    }

    fn clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip { rect });
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb8;

    #[test]
    fn test_monospace_width() {
        let font = FontSpec::new("mono", 10.0);
        let m = MonospaceMetrics.measure_text("abcd", &font);
        assert_eq!(m.width, 24.0);
        assert_eq!(m.height(), 10.0);
    }

    #[test]
    fn test_monospace_counts_chars_not_bytes() {
        let font = FontSpec::new("mono", 10.0);
        assert_eq!(MonospaceMetrics.measure_text("会術", &font).width, 12.0);
    }

    #[test]
    fn test_recording_tracks_depth() {
        let mut s = RecordingSurface::new();
        s.save();
        s.clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(s.depth(), 1);
        s.restore();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.ops().len(), 3);
    }

    #[test]
    fn test_texts_filter() {
        let mut s = RecordingSurface::new();
        let font = FontSpec::new("mono", 12.0);
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), rgb8(0, 0, 0));
        s.fill_text("hello", Point::new(1.0, 2.0), &font, rgb8(255, 255, 255));
        assert_eq!(s.texts(), vec!["hello"]);
        assert_eq!(
            s.ops()[1].to_string(),
            "text \"hello\" at (1.0,2.0) 12px #ffffffff"
        );
    }
}
