// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel: annotation listing for the active slot (newest first),
//! diagnosis request fields, and the latest report.

use crate::ai::DiagnosisReport;
use crate::models::annotation::AnnotationId;
use crate::models::session::{ViewerSession, SLOT_COUNT};

/// Result of side panel interaction.
pub enum PanelAction {
    None,
    SelectAnnotation(AnnotationId),
    DeleteAnnotation(AnnotationId),
    ClearActiveSlot,
}

pub fn show(
    ui: &mut egui::Ui,
    session: &ViewerSession,
    patient_id: &mut String,
    notes: &mut String,
    reports: &[Option<DiagnosisReport>; SLOT_COUNT],
) -> PanelAction {
    let mut action = PanelAction::None;
    let active = session.active_slot();

    ui.heading("Annotations");
    ui.label(
        egui::RichText::new(format!("Slot {}", active + 1))
            .weak()
            .italics(),
    );
    ui.separator();

    let listed = session.annotations.newest_first(active);
    if listed.is_empty() {
        ui.label(egui::RichText::new("No annotations on this slot").weak());
    } else {
        egui::ScrollArea::vertical()
            .max_height(240.0)
            .show(ui, |ui| {
                for annotation in listed {
                    ui.horizontal(|ui| {
                        let selected = session.selected() == Some(annotation.id);
                        if ui.selectable_label(selected, annotation.label()).clicked() {
                            action = PanelAction::SelectAnnotation(annotation.id);
                        }
                        if ui.small_button("🗑").clicked() {
                            action = PanelAction::DeleteAnnotation(annotation.id);
                        }
                    });
                }
            });
        ui.add_space(4.0);
        if ui.button("Clear slot annotations").clicked() {
            action = PanelAction::ClearActiveSlot;
        }
    }

    ui.add_space(12.0);
    ui.separator();
    ui.heading("Diagnosis");

    ui.label("Patient ID");
    ui.text_edit_singleline(patient_id);
    ui.label("Clinical notes");
    ui.add(egui::TextEdit::multiline(notes).desired_rows(3));

    if let Some(report) = &reports[active] {
        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(
                egui::RichText::new(&report.diagnosis)
                    .size(16.0)
                    .strong(),
            );
            ui.label(format!("Confidence: {:.1}%", report.confidence * 100.0));
            ui.label(format!("Processed in {:.2}s", report.processing_time));
        });
    }

    action
}
