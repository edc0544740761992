// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Per-slot view transform: pan offset, zoom factor and invert flag.
//!
//! All operations are synchronous pure state transitions; nothing here
//! touches any other slot.

/// Zoom adjustment requested by the toolbar or keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    Increase,
    Decrease,
    Reset,
}

pub const ZOOM_STEP: f32 = 0.1;
pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_DEFAULT: f32 = 1.0;

/// View state for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Pan offset in surface pixels, unbounded.
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
    pub invert: bool,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: ZOOM_DEFAULT,
            invert: false,
        }
    }
}

impl ViewTransform {
    pub fn apply_zoom(&mut self, action: ZoomAction) {
        self.zoom = match action {
            ZoomAction::Increase => (self.zoom + ZOOM_STEP).min(ZOOM_MAX),
            ZoomAction::Decrease => (self.zoom - ZOOM_STEP).max(ZOOM_MIN),
            ZoomAction::Reset => ZOOM_DEFAULT,
        };
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn toggle_invert(&mut self) {
        self.invert = !self.invert;
    }
}
