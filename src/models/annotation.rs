// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the core data structures for freehand line and
//! text annotations attached to viewer slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation, stable across save/load.
pub type AnnotationId = u64;

/// A 2D point in slot-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The drawable payload of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum AnnotationKind {
    Line { start: Point, end: Point },
    Text { content: String, anchor: Point },
}

/// An annotation owned by a single slot.
///
/// The owning slot index never changes after creation; identifiers are
/// unique across the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub slot: usize,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(id: AnnotationId, slot: usize, kind: AnnotationKind) -> Self {
        Self {
            id,
            slot,
            created_at: Utc::now(),
            kind,
        }
    }

    /// Short human-readable label for list panels.
    pub fn label(&self) -> String {
        match &self.kind {
            AnnotationKind::Line { .. } => format!("line {}", self.id),
            AnnotationKind::Text { content, .. } => {
                let mut s: String = content.chars().take(18).collect();
                if content.chars().count() > 18 {
                    s.push('…');
                }
                format!("\"{}\"", s)
            }
        }
    }
}
