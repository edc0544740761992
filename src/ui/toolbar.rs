// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: annotation mode selection, view transforms for the active
//! slot, layout controls, and the upload/diagnosis triggers.

use crate::input::InteractionController;
use crate::models::session::{AnnotationMode, ViewMode, ViewerSession};
use crate::models::viewport::ZoomAction;

/// Requests the shell must service outside the toolbar.
pub enum ToolbarAction {
    None,
    UploadSlice,
    RemoveActiveSlot,
    RequestDiagnosis,
}

/// Display the toolbar; mode/zoom/view changes apply directly to the
/// session, everything needing I/O is returned as an action.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut ViewerSession,
    controller: &mut InteractionController,
    diagnosis_busy: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Mode:");
        let mode = session.annotation_mode();
        if ui
            .selectable_label(mode == AnnotationMode::Pan, "✋ Pan")
            .clicked()
        {
            controller.set_mode(session, AnnotationMode::Pan);
        }
        if ui
            .selectable_label(mode == AnnotationMode::Line, "⟋ Line")
            .clicked()
        {
            controller.set_mode(session, AnnotationMode::Line);
        }
        if ui
            .selectable_label(mode == AnnotationMode::Text, "T Text")
            .clicked()
        {
            controller.set_mode(session, AnnotationMode::Text);
        }

        ui.separator();

        let active = session.active_slot();
        ui.label(format!("Slot {}", active + 1));
        if ui.button("🔍+").on_hover_text("Zoom in").clicked() {
            session.slot_mut(active).view.apply_zoom(ZoomAction::Increase);
        }
        if ui.button("🔍-").on_hover_text("Zoom out").clicked() {
            session.slot_mut(active).view.apply_zoom(ZoomAction::Decrease);
        }
        if ui.button("1:1").on_hover_text("Reset zoom").clicked() {
            session.slot_mut(active).view.apply_zoom(ZoomAction::Reset);
        }
        ui.label(format!("{:.0}%", session.slot(active).view.zoom * 100.0));

        let inverted = session.slot(active).view.invert;
        if ui.selectable_label(inverted, "◑ Invert").clicked() {
            session.slot_mut(active).view.toggle_invert();
        }

        ui.separator();

        let view = session.view_mode();
        if ui.selectable_label(view == ViewMode::Single, "▣ Single").clicked() {
            session.set_view_mode(ViewMode::Single);
        }
        if ui.selectable_label(view == ViewMode::Quad, "⊞ Quad").clicked() {
            session.set_view_mode(ViewMode::Quad);
        }
        if view == ViewMode::Custom {
            ui.label(egui::RichText::new("custom").italics().weak());
        }

        ui.separator();

        if ui.button("📂 Upload").on_hover_text("Load a slice into the active slot").clicked() {
            action = ToolbarAction::UploadSlice;
        }
        if ui.button("✖ Remove").on_hover_text("Hide the active slot").clicked() {
            action = ToolbarAction::RemoveActiveSlot;
        }

        ui.separator();

        let label = if diagnosis_busy {
            "⏳ Analyzing…"
        } else {
            "🧠 Analyze"
        };
        if ui
            .add_enabled(!diagnosis_busy, egui::Button::new(label))
            .on_hover_text("Submit the active slice for pneumonia detection")
            .clicked()
        {
            action = ToolbarAction::RequestDiagnosis;
        }

        let hint = match session.annotation_mode() {
            AnnotationMode::Pan => "Drag to pan, click an annotation to select it",
            AnnotationMode::Line => "Drag to draw a line annotation",
            AnnotationMode::Text => "Click to place a text annotation",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
