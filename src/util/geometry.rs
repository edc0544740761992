// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric hit-testing for annotations.
//!
//! This module provides the point-to-line distance and text-box tests
//! used to resolve pointer positions against annotation overlays. Text
//! measurement is abstracted behind [`TextMetrics`] so hit-testing can
//! run without a live rendering surface.

use crate::models::annotation::{Annotation, AnnotationKind, Point};

/// Maximum distance in surface pixels at which a pointer hits a line.
pub const LINE_HIT_RADIUS: f32 = 10.0;

/// Horizontal padding added on each side of a text hit-box.
pub const TEXT_HIT_PAD_X: f32 = 2.0;

/// Extra hit-box space below a text anchor (the baseline).
pub const TEXT_HIT_PAD_BELOW: f32 = 4.0;

/// Capability for measuring rendered text without owning a surface.
pub trait TextMetrics {
    /// Width and height of `text` rendered in the annotation font.
    fn measure(&self, text: &str) -> (f32, f32);

    /// Height of one text line in the annotation font.
    fn line_height(&self) -> f32;
}

/// Deterministic fixed-advance metrics for tests and headless use.
pub struct FixedTextMetrics {
    pub advance: f32,
    pub line_height: f32,
}

impl Default for FixedTextMetrics {
    fn default() -> Self {
        Self {
            advance: 8.0,
            line_height: 16.0,
        }
    }
}

impl TextMetrics for FixedTextMetrics {
    fn measure(&self, text: &str) -> (f32, f32) {
        (text.chars().count() as f32 * self.advance, self.line_height)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// Degenerate lines (`a == b`) fall back to the plain point distance.
pub fn distance_to_line(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return p.distance_to(a);
    }
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / len
}

/// Whether `p` hits the line annotation through `a` and `b`.
///
/// Measures against the infinite line, not the segment: a point past an
/// endpoint but within [`LINE_HIT_RADIUS`] of the line still hits. This
/// mirrors how selection behaves in the viewer and is relied on by the
/// interaction controller.
pub fn line_hit(p: Point, a: Point, b: Point) -> bool {
    distance_to_line(p, a, b) < LINE_HIT_RADIUS
}

/// Whether `p` falls inside the hit-box of text drawn at `anchor`.
///
/// The box spans the measured text width plus [`TEXT_HIT_PAD_X`] on each
/// side, one line height above the anchor and [`TEXT_HIT_PAD_BELOW`] below.
pub fn text_hit(p: Point, anchor: Point, text: &str, metrics: &dyn TextMetrics) -> bool {
    let (width, _) = metrics.measure(text);
    let line_height = metrics.line_height();
    p.x >= anchor.x - TEXT_HIT_PAD_X
        && p.x <= anchor.x + width + TEXT_HIT_PAD_X
        && p.y >= anchor.y - line_height
        && p.y <= anchor.y + TEXT_HIT_PAD_BELOW
}

/// Resolve a pointer position against one annotation.
pub fn annotation_hit(annotation: &Annotation, p: Point, metrics: &dyn TextMetrics) -> bool {
    match &annotation.kind {
        AnnotationKind::Line { start, end } => line_hit(p, *start, *end),
        AnnotationKind::Text { content, anchor } => text_hit(p, *anchor, content, metrics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_horizontal_line() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert_eq!(distance_to_line(Point::new(50.0, 5.0), a, b), 5.0);
        assert_eq!(distance_to_line(Point::new(50.0, 15.0), a, b), 15.0);
    }

    #[test]
    fn test_line_hit_threshold() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(line_hit(Point::new(50.0, 5.0), a, b));
        assert!(!line_hit(Point::new(50.0, 15.0), a, b));
        // Exactly on the threshold is a miss.
        assert!(!line_hit(Point::new(50.0, 10.0), a, b));
    }

    #[test]
    fn test_line_hit_is_unclipped() {
        // Distance is measured to the infinite line, so a point far past
        // the segment's endpoints still hits when close to the axis.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(line_hit(Point::new(500.0, 3.0), a, b));
    }

    #[test]
    fn test_degenerate_line_uses_point_distance() {
        let a = Point::new(10.0, 10.0);
        assert!(line_hit(Point::new(14.0, 13.0), a, a));
        assert!(!line_hit(Point::new(30.0, 30.0), a, a));
    }

    #[test]
    fn test_text_hit_box() {
        let metrics = FixedTextMetrics::default();
        let anchor = Point::new(100.0, 50.0);
        // "scan" measures 4 * 8 = 32 wide, line height 16.
        assert!(text_hit(Point::new(110.0, 45.0), anchor, "scan", &metrics));
        // Inside horizontal padding.
        assert!(text_hit(Point::new(98.5, 50.0), anchor, "scan", &metrics));
        // Just below the baseline, within the 4px allowance.
        assert!(text_hit(Point::new(120.0, 53.0), anchor, "scan", &metrics));
        // Above the line height.
        assert!(!text_hit(Point::new(110.0, 30.0), anchor, "scan", &metrics));
        // Past the measured width plus padding.
        assert!(!text_hit(Point::new(135.0, 45.0), anchor, "scan", &metrics));
    }
}
