// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! RadView - multi-slot radiological image viewer
//!
//! A desktop viewer for radiological slices: four display slots with
//! per-slot pan/zoom/invert, freehand line and text annotations with
//! local persistence, and optional AI-assisted pneumonia detection.

mod ai;
mod app;
mod input;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::RadViewApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("RadView - Radiological Image Viewer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "RadView",
        options,
        Box::new(|_cc| Ok(Box::new(RadViewApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
