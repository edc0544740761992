// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Render engine for the slot grid.
//!
//! Draws each displayed slot onto its cell of the canvas: the slice
//! image aspect-fitted, zoomed, centered and panned, the invert variant
//! when toggled, and the annotation overlays with selection highlights.
//! Pointer input on a cell is translated to slot-surface coordinates and
//! fed to the interaction controller.

use crate::input::{ControllerEvent, Gesture, InteractionController, PendingText};
use crate::models::annotation::{Annotation, AnnotationKind, Point};
use crate::models::session::{ImageState, ViewerSession, SLOT_COUNT};
use crate::models::viewport::ViewTransform;
use crate::util::geometry::{TextMetrics, TEXT_HIT_PAD_BELOW, TEXT_HIT_PAD_X};

/// Color of the selected annotation and in-progress previews.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(79, 195, 247);

/// Color of unselected annotations.
pub const HIGHLIGHT: egui::Color32 = egui::Color32::YELLOW;

const SLOT_BG: egui::Color32 = egui::Color32::from_gray(25);
const ERROR_BG: egui::Color32 = egui::Color32::from_gray(45);
const CELL_GAP: f32 = 4.0;
const HANDLE_RADIUS: f32 = 4.0;

/// Font used for text annotations, fixed across the viewer.
pub fn annotation_font() -> egui::FontId {
    egui::FontId::monospace(14.0)
}

/// Text measurement backed by the live egui font atlas.
///
/// Owns a handle to the context (a cheap `Arc` clone) so callers keep
/// full use of the `Ui` while metrics are live.
pub struct EguiTextMetrics {
    ctx: egui::Context,
    font: egui::FontId,
}

impl EguiTextMetrics {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            font: annotation_font(),
        }
    }
}

impl TextMetrics for EguiTextMetrics {
    fn measure(&self, text: &str) -> (f32, f32) {
        self.ctx.fonts(|f| {
            let galley =
                f.layout_no_wrap(text.to_string(), self.font.clone(), egui::Color32::WHITE);
            (galley.size().x, galley.size().y)
        })
    }

    fn line_height(&self) -> f32 {
        self.ctx.fonts(|f| f.row_height(&self.font))
    }
}

/// GPU textures for one slot: the slice and its pre-inverted variant.
pub struct SlotTextures {
    pub normal: egui::TextureHandle,
    pub inverted: egui::TextureHandle,
    pub size: (u32, u32),
}

/// Result of canvas interaction that the shell must follow up on.
pub enum CanvasAction {
    None,
    TextPrompt(PendingText),
}

/// Aspect-preserving draw dimensions for an image inside a surface,
/// scaled by the zoom factor.
pub fn fit_dimensions(
    img_w: f32,
    img_h: f32,
    surf_w: f32,
    surf_h: f32,
    zoom: f32,
) -> (f32, f32) {
    let img_aspect = img_w / img_h;
    let surf_aspect = surf_w / surf_h;
    let (w, h) = if img_aspect > surf_aspect {
        (surf_w, surf_w / img_aspect)
    } else {
        (surf_h * img_aspect, surf_h)
    };
    (w * zoom, h * zoom)
}

/// Where the image lands in its cell: fitted, centered, then offset by
/// the pan vector.
pub fn image_rect(cell: egui::Rect, size: (u32, u32), view: &ViewTransform) -> egui::Rect {
    let (w, h) = fit_dimensions(
        size.0 as f32,
        size.1 as f32,
        cell.width(),
        cell.height(),
        view.zoom,
    );
    let min = cell.min
        + egui::vec2(
            (cell.width() - w) / 2.0 + view.pan_x,
            (cell.height() - h) / 2.0 + view.pan_y,
        );
    egui::Rect::from_min_size(min, egui::vec2(w, h))
}

/// Partition `rect` into a rows×cols grid of cells, row-major.
pub fn grid_cells(rect: egui::Rect, rows: usize, cols: usize) -> Vec<egui::Rect> {
    let cell_w = (rect.width() - CELL_GAP * (cols - 1) as f32) / cols as f32;
    let cell_h = (rect.height() - CELL_GAP * (rows - 1) as f32) / rows as f32;
    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let min = rect.min
                + egui::vec2(
                    col as f32 * (cell_w + CELL_GAP),
                    row as f32 * (cell_h + CELL_GAP),
                );
            cells.push(egui::Rect::from_min_size(min, egui::vec2(cell_w, cell_h)));
        }
    }
    cells
}

/// Display the slot grid and route pointer input to the controller.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut ViewerSession,
    controller: &mut InteractionController,
    textures: &[Option<SlotTextures>; SLOT_COUNT],
) -> CanvasAction {
    let mut action = CanvasAction::None;
    let full = ui.available_rect_before_wrap();
    ui.painter().rect_filled(full, 0.0, egui::Color32::BLACK);

    let displayed = session.displayed_slots();
    if displayed.is_empty() {
        ui.painter().text(
            full.center(),
            egui::Align2::CENTER_CENTER,
            "All slots hidden. Upload a slice to continue",
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(180),
        );
        ui.allocate_rect(full, egui::Sense::hover());
        return action;
    }

    let (rows, cols) = session.grid_dims();
    let cells = grid_cells(full, rows, cols);
    let metrics = EguiTextMetrics::new(ui.ctx());

    for (slot_idx, cell) in displayed.iter().copied().zip(cells.iter().copied()) {
        let response = ui.allocate_rect(cell, egui::Sense::click_and_drag());

        // A plain click is a press and release at the same position; a
        // drag feeds the controller move events every frame.
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = to_local(pos, cell);
                let ev = controller.pointer_down(session, &metrics, slot_idx, local);
                report(&mut action, ev);
                let ev = controller.pointer_up(session, local);
                report(&mut action, ev);
            }
        } else if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let ev =
                    controller.pointer_down(session, &metrics, slot_idx, to_local(pos, cell));
                report(&mut action, ev);
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                controller.pointer_move(session, to_local(pos, cell));
            }
        } else if response.drag_stopped() {
            if let Some(pos) = response.interact_pointer_pos() {
                let ev = controller.pointer_up(session, to_local(pos, cell));
                report(&mut action, ev);
            }
        }

        draw_slot(ui, session, controller, slot_idx, cell, &textures[slot_idx], &metrics);

        // Outline the active slot.
        if slot_idx == session.active_slot() && displayed.len() > 1 {
            ui.painter()
                .rect_stroke(cell, 0.0, egui::Stroke::new(1.5, ACCENT));
        }
    }

    action
}

fn report(action: &mut CanvasAction, ev: ControllerEvent) {
    if let ControllerEvent::TextPrompt(pending) = ev {
        *action = CanvasAction::TextPrompt(pending);
    }
}

fn to_local(pos: egui::Pos2, cell: egui::Rect) -> Point {
    Point::new(pos.x - cell.min.x, pos.y - cell.min.y)
}

/// Draw one slot: background, image (or error slate), then overlays.
fn draw_slot(
    ui: &egui::Ui,
    session: &ViewerSession,
    controller: &InteractionController,
    slot_idx: usize,
    cell: egui::Rect,
    textures: &Option<SlotTextures>,
    metrics: &dyn TextMetrics,
) {
    let painter = ui.painter().with_clip_rect(cell);
    painter.rect_filled(cell, 0.0, SLOT_BG);

    let slot = session.slot(slot_idx);
    match slot.image {
        ImageState::Failed => {
            painter.rect_filled(cell, 0.0, ERROR_BG);
            painter.text(
                cell.center() - egui::vec2(0.0, 4.0),
                egui::Align2::CENTER_BOTTOM,
                "Failed to load image",
                egui::FontId::proportional(15.0),
                egui::Color32::LIGHT_RED,
            );
            painter.text(
                cell.center() + egui::vec2(0.0, 4.0),
                egui::Align2::CENTER_TOP,
                "Upload a new slice to retry",
                egui::FontId::proportional(13.0),
                egui::Color32::from_gray(170),
            );
            return;
        }
        ImageState::Loading => {
            painter.text(
                cell.center(),
                egui::Align2::CENTER_CENTER,
                "Loading…",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(170),
            );
        }
        ImageState::Ready => {
            if let Some(tex) = textures {
                let rect = image_rect(cell, tex.size, &slot.view);
                let handle = if slot.view.invert {
                    &tex.inverted
                } else {
                    &tex.normal
                };
                painter.image(
                    handle.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
        }
    }

    // Annotation overlays in storage order.
    let selected = session.selected();
    for annotation in session.annotations.for_slot(slot_idx) {
        draw_annotation(
            &painter,
            annotation,
            cell,
            selected == Some(annotation.id),
            metrics,
        );
    }

    // Rubber-band preview of an in-progress line.
    if let Gesture::DrawingLine { slot, start } = controller.gesture() {
        if slot == slot_idx {
            if let Some(pos) = ui.ctx().pointer_latest_pos() {
                painter.line_segment(
                    [
                        egui::pos2(cell.min.x + start.x, cell.min.y + start.y),
                        pos,
                    ],
                    egui::Stroke::new(1.5, ACCENT),
                );
            }
        }
    }
}

fn draw_annotation(
    painter: &egui::Painter,
    annotation: &Annotation,
    cell: egui::Rect,
    selected: bool,
    metrics: &dyn TextMetrics,
) {
    let color = if selected { ACCENT } else { HIGHLIGHT };
    let at = |p: &Point| egui::pos2(cell.min.x + p.x, cell.min.y + p.y);

    match &annotation.kind {
        AnnotationKind::Line { start, end } => {
            painter.line_segment([at(start), at(end)], egui::Stroke::new(2.0, color));
            if selected {
                painter.circle_filled(at(start), HANDLE_RADIUS, color);
                painter.circle_filled(at(end), HANDLE_RADIUS, color);
            }
        }
        AnnotationKind::Text { content, anchor } => {
            painter.text(
                at(anchor),
                egui::Align2::LEFT_BOTTOM,
                content,
                annotation_font(),
                color,
            );
            if selected {
                let (width, _) = metrics.measure(content);
                let anchor = at(anchor);
                let bounds = egui::Rect::from_min_max(
                    egui::pos2(anchor.x - TEXT_HIT_PAD_X, anchor.y - metrics.line_height()),
                    egui::pos2(anchor.x + width + TEXT_HIT_PAD_X, anchor.y + TEXT_HIT_PAD_BELOW),
                );
                painter.rect_stroke(bounds, 2.0, egui::Stroke::new(1.0, color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(w, h))
    }

    #[test]
    fn test_fit_wide_image_fits_to_width() {
        // 2:1 image into a square: width bound, height derived.
        let (w, h) = fit_dimensions(200.0, 100.0, 400.0, 400.0, 1.0);
        assert_eq!((w, h), (400.0, 200.0));
    }

    #[test]
    fn test_fit_tall_image_fits_to_height() {
        let (w, h) = fit_dimensions(100.0, 200.0, 400.0, 400.0, 1.0);
        assert_eq!((w, h), (200.0, 400.0));
    }

    #[test]
    fn test_fit_scales_with_zoom() {
        let (w, h) = fit_dimensions(200.0, 100.0, 400.0, 400.0, 2.0);
        assert_eq!((w, h), (800.0, 400.0));
    }

    #[test]
    fn test_image_rect_centers_then_pans() {
        let cell = rect(400.0, 400.0);
        let mut view = ViewTransform::default();
        let centered = image_rect(cell, (200, 100), &view);
        assert_eq!(centered.min, egui::pos2(0.0, 100.0));
        assert_eq!(centered.size(), egui::vec2(400.0, 200.0));

        view.pan_by(25.0, -10.0);
        let panned = image_rect(cell, (200, 100), &view);
        assert_eq!(panned.min, egui::pos2(25.0, 90.0));
    }

    #[test]
    fn test_grid_cells_count_and_disjoint() {
        let cells = grid_cells(rect(800.0, 600.0), 2, 2);
        assert_eq!(cells.len(), 4);
        for (i, a) in cells.iter().enumerate() {
            for b in cells.iter().skip(i + 1) {
                assert!(a.intersect(*b).area() <= 0.0 || !a.intersects(*b));
            }
        }
    }

    #[test]
    fn test_grid_cells_single_row() {
        let cells = grid_cells(rect(800.0, 600.0), 1, 2);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].height(), 600.0);
        assert!((cells[0].width() - (800.0 - CELL_GAP) / 2.0).abs() < 0.01);
    }
}
