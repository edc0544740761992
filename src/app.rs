// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The shell composes the viewer session, the interaction controller,
//! per-slot textures and background loaders, the diagnosis bridge and
//! the notification overlay, and wires them into the frame loop.

use crate::ai::{DiagnosisBridge, DiagnosisReport, DiagnosisRequest};
use crate::input::{InteractionController, PendingText};
use crate::io::media::{self, LoadedImage};
use crate::io::persist::FileStore;
use crate::models::session::{ImageState, RemovalOutcome, ViewerSession, SLOT_COUNT};
use crate::models::store::{AnnotationStorage, NullStorage};
use crate::ui::canvas::{self, SlotTextures};
use crate::ui::panel::{self, PanelAction};
use crate::ui::toast::{ToastKind, Toasts};
use crate::ui::toolbar::{self, ToolbarAction};
use std::sync::mpsc::{channel, Receiver};

/// A text annotation awaiting user input in the modal.
struct TextEntry {
    pending: PendingText,
    buffer: String,
}

pub struct RadViewApp {
    session: ViewerSession,
    controller: InteractionController,

    /// GPU textures per slot (normal + inverted variants).
    textures: [Option<SlotTextures>; SLOT_COUNT],

    /// PNG payload per slot, sent to the diagnosis endpoint.
    png_payloads: [Option<Vec<u8>>; SLOT_COUNT],

    /// Receivers for background image decodes, one per slot.
    loaders: [Option<Receiver<Result<LoadedImage, String>>>; SLOT_COUNT],

    /// Text annotation entry in progress, if any.
    text_entry: Option<TextEntry>,

    ai: DiagnosisBridge,
    reports: [Option<DiagnosisReport>; SLOT_COUNT],
    patient_id: String,
    notes: String,

    toasts: Toasts,

    /// Placeholder slices are generated on the first frame, once a
    /// texture-capable context exists.
    initialized: bool,
}

impl Default for RadViewApp {
    fn default() -> Self {
        Self::new()
    }
}

impl RadViewApp {
    pub fn new() -> Self {
        let storage: Box<dyn AnnotationStorage> = match FileStore::new() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("Annotation persistence unavailable: {}", e);
                Box::new(NullStorage)
            }
        };

        Self {
            session: ViewerSession::new(storage),
            controller: InteractionController::new(),
            textures: Default::default(),
            png_payloads: Default::default(),
            loaders: Default::default(),
            text_entry: None,
            ai: DiagnosisBridge::new(crate::ai::endpoint_from_env()),
            reports: Default::default(),
            patient_id: String::new(),
            notes: String::new(),
            toasts: Toasts::default(),
            initialized: false,
        }
    }

    fn install_image(&mut self, ctx: &egui::Context, slot: usize, img: LoadedImage) {
        let size = [img.width as usize, img.height as usize];
        let normal = ctx.load_texture(
            format!("slot_{}_image", slot),
            egui::ColorImage::from_rgba_unmultiplied(size, &img.pixels),
            egui::TextureOptions::LINEAR,
        );
        let inverted = ctx.load_texture(
            format!("slot_{}_inverted", slot),
            egui::ColorImage::from_rgba_unmultiplied(size, &img.inverted),
            egui::TextureOptions::LINEAR,
        );
        self.textures[slot] = Some(SlotTextures {
            normal,
            inverted,
            size: (img.width, img.height),
        });
        self.png_payloads[slot] = Some(img.png);
        self.session.restore_slot(slot, ImageState::Ready);
    }

    /// Decode an uploaded file on a background thread; the UI thread
    /// never blocks on I/O.
    fn start_upload(&mut self, slot: usize, path: std::path::PathBuf) {
        let (sender, receiver) = channel();
        self.loaders[slot] = Some(receiver);
        self.session.slot_mut(slot).image = ImageState::Loading;
        log::info!("Loading {} into slot {}", path.display(), slot);

        std::thread::spawn(move || {
            let result = media::load_image(&path).map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    fn poll_loaders(&mut self, ctx: &egui::Context) {
        for slot in 0..SLOT_COUNT {
            let done = match &self.loaders[slot] {
                Some(receiver) => receiver.try_recv().ok(),
                None => None,
            };
            let Some(result) = done else { continue };
            self.loaders[slot] = None;

            match result {
                Ok(img) => {
                    self.install_image(ctx, slot, img);
                    log::info!("Slot {} image ready", slot);
                }
                Err(e) => {
                    self.session.restore_slot(slot, ImageState::Failed);
                    self.png_payloads[slot] = None;
                    self.toasts
                        .push(ToastKind::Error, format!("Image load failed: {}", e));
                }
            }
        }
    }

    fn poll_diagnosis(&mut self) {
        if let Some((slot, result)) = self.ai.poll() {
            match result {
                Ok(report) => {
                    self.toasts.push(
                        ToastKind::Success,
                        format!(
                            "Slot {}: {} ({:.0}% confidence)",
                            slot + 1,
                            report.diagnosis,
                            report.confidence * 100.0
                        ),
                    );
                    self.reports[slot] = Some(report);
                }
                Err(e) => {
                    self.toasts
                        .push(ToastKind::Error, format!("Diagnosis failed: {}", e));
                }
            }
        }
    }

    fn request_diagnosis(&mut self) {
        let slot = self.session.active_slot();
        let Some(payload) = self.png_payloads[slot].clone() else {
            // Rejected locally: no network call, no busy indicator.
            self.toasts.push(
                ToastKind::Error,
                "No image available in the active slot".to_string(),
            );
            return;
        };
        let request = DiagnosisRequest {
            image_png: payload,
            patient_id: self.patient_id.trim().to_string(),
            notes: self.notes.trim().to_string(),
        };
        if let Err(e) = self.ai.submit(slot, request) {
            self.toasts.push(ToastKind::Error, e);
        }
    }

    fn remove_active_slot(&mut self) {
        match self.session.remove_slot(self.session.active_slot()) {
            RemovalOutcome::AllHidden => {
                self.toasts.push(
                    ToastKind::Info,
                    "All slots are hidden. Upload a slice to continue.".to_string(),
                );
            }
            RemovalOutcome::Hidden | RemovalOutcome::NoOp => {}
        }
    }

    fn show_text_modal(&mut self, ctx: &egui::Context) {
        let Some(entry) = &mut self.text_entry else { return };
        let mut open = true;
        let mut commit = false;
        let mut cancel = false;

        egui::Window::new("Text annotation")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut entry.buffer);
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                }
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        commit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if commit {
            if let Some(entry) = self.text_entry.take() {
                if self
                    .controller
                    .commit_text(&mut self.session, entry.pending, &entry.buffer)
                    .is_none()
                {
                    self.toasts
                        .push(ToastKind::Info, "Empty annotation discarded".to_string());
                }
            }
        } else if cancel || !open {
            // Dropping the handle cancels the pending annotation.
            self.text_entry = None;
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            if let Some(id) = self.session.selected() {
                self.session.remove_annotation(id);
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.select(None);
            let mode = self.session.annotation_mode();
            self.controller.set_mode(&mut self.session, mode);
        }
    }
}

impl eframe::App for RadViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.initialized {
            for slot in 0..SLOT_COUNT {
                let img = media::placeholder_slice(slot);
                self.install_image(ctx, slot, img);
            }
            self.initialized = true;
        }

        self.poll_loaders(ctx);
        self.poll_diagnosis();
        self.handle_keys(ctx);

        let diagnosis_busy = self.ai.is_busy(self.session.active_slot());
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.session, &mut self.controller, diagnosis_busy)
            })
            .inner;

        match toolbar_action {
            ToolbarAction::UploadSlice => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                    .pick_file()
                {
                    self.start_upload(self.session.active_slot(), path);
                }
            }
            ToolbarAction::RemoveActiveSlot => self.remove_active_slot(),
            ToolbarAction::RequestDiagnosis => self.request_diagnosis(),
            ToolbarAction::None => {}
        }

        let panel_action = egui::SidePanel::right("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                panel::show(
                    ui,
                    &self.session,
                    &mut self.patient_id,
                    &mut self.notes,
                    &self.reports,
                )
            })
            .inner;

        match panel_action {
            PanelAction::SelectAnnotation(id) => self.session.select(Some(id)),
            PanelAction::DeleteAnnotation(id) => self.session.remove_annotation(id),
            PanelAction::ClearActiveSlot => {
                let slot = self.session.active_slot();
                self.session.clear_slot_annotations(slot);
            }
            PanelAction::None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = canvas::show(ui, &mut self.session, &mut self.controller, &self.textures);
            if let canvas::CanvasAction::TextPrompt(pending) = action {
                self.text_entry = Some(TextEntry {
                    pending,
                    buffer: String::new(),
                });
            }
        });

        self.show_text_modal(ctx);
        self.toasts.show(ctx);

        // Keep polling while background work is outstanding.
        if self.loaders.iter().any(Option::is_some)
            || (0..SLOT_COUNT).any(|s| self.ai.is_busy(s))
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
