// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notification overlay.
//!
//! Toasts stack in the top-right corner and expire on a timer.

const TOAST_SECONDS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

struct Toast {
    kind: ToastKind,
    message: String,
    expires_at: f64,
}

#[derive(Default)]
pub struct Toasts {
    queue: Vec<Toast>,
    pending: Vec<(ToastKind, String)>,
}

impl Toasts {
    /// Queue a toast; it becomes visible on the next frame.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            ToastKind::Error => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }
        self.pending.push((kind, message));
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        for (kind, message) in self.pending.drain(..) {
            self.queue.push(Toast {
                kind,
                message,
                expires_at: now + TOAST_SECONDS,
            });
        }
        self.queue.retain(|t| t.expires_at > now);
        if self.queue.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.queue {
                    let (accent, icon) = match toast.kind {
                        ToastKind::Info => (egui::Color32::LIGHT_BLUE, "ℹ"),
                        ToastKind::Success => (egui::Color32::LIGHT_GREEN, "✔"),
                        ToastKind::Error => (egui::Color32::LIGHT_RED, "⚠"),
                    };
                    egui::Frame::popup(ui.style())
                        .fill(egui::Color32::from_gray(30))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(icon).color(accent));
                                ui.label(
                                    egui::RichText::new(&toast.message)
                                        .color(egui::Color32::from_gray(230)),
                                );
                            });
                        });
                    ui.add_space(4.0);
                }
            });

        // Keep repainting so expiry happens without further input.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
