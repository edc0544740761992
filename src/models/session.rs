// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! The viewer session aggregate.
//!
//! Owns the fixed slot arena, the annotation store, the single global
//! selection, the active slot and the view/annotation modes. Layout and
//! visibility rules (view-mode recomputation, active-slot reassignment,
//! the all-hidden warning) live here as well, so no component keeps
//! free-floating module state.

use crate::models::annotation::{AnnotationId, AnnotationKind};
use crate::models::store::{AnnotationStorage, AnnotationStore};
use crate::models::viewport::ViewTransform;

/// Number of display slots. Slots are never destroyed, only hidden.
pub const SLOT_COUNT: usize = 4;

/// Lifecycle of a slot's image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// A decode is in flight for this slot.
    Loading,
    /// An image is available for display.
    Ready,
    /// The last decode failed; the slot renders an error slate.
    Failed,
}

/// One display position in the grid.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub image: ImageState,
    pub visible: bool,
    pub view: ViewTransform,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            image: ImageState::Loading,
            visible: true,
            view: ViewTransform::default(),
        }
    }
}

/// Global layout arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Single,
    Quad,
    Custom,
}

/// Global pointer-interpretation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMode {
    Pan,
    Line,
    Text,
}

/// Notable outcomes of a slot removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Hidden,
    /// This removal transitioned the session into the all-hidden state.
    AllHidden,
    /// The slot was already hidden; nothing changed.
    NoOp,
}

pub struct ViewerSession {
    slots: [Slot; SLOT_COUNT],
    pub annotations: AnnotationStore,
    selected: Option<AnnotationId>,
    active_slot: usize,
    view_mode: ViewMode,
    annotation_mode: AnnotationMode,
    all_hidden_notified: bool,
}

impl ViewerSession {
    pub fn new(storage: Box<dyn AnnotationStorage>) -> Self {
        Self {
            slots: [Slot::default(); SLOT_COUNT],
            annotations: AnnotationStore::new(storage),
            selected: None,
            active_slot: 0,
            view_mode: ViewMode::Quad,
            annotation_mode: AnnotationMode::Pan,
            all_hidden_notified: false,
        }
    }

    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }

    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    pub fn set_active_slot(&mut self, index: usize) {
        if index < SLOT_COUNT {
            self.active_slot = index;
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// User-forced view mode; `Single` shows only the active slot.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn annotation_mode(&self) -> AnnotationMode {
        self.annotation_mode
    }

    pub fn set_annotation_mode(&mut self, mode: AnnotationMode) {
        self.annotation_mode = mode;
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    /// Set or clear the single global selection.
    ///
    /// Callers are expected to pass a valid id or `None`.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.selected = id;
    }

    /// Delegate to the store, assigning ownership to `slot`.
    pub fn add_annotation(&mut self, slot: usize, kind: AnnotationKind) -> AnnotationId {
        self.annotations.add(slot, kind)
    }

    /// Remove an annotation, clearing the selection if it matched.
    pub fn remove_annotation(&mut self, id: AnnotationId) {
        if self.annotations.remove(id) && self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Remove every annotation on `slot`, clearing a matching selection.
    pub fn clear_slot_annotations(&mut self, slot: usize) -> usize {
        if let Some(sel) = self.selected {
            if self.annotations.get(sel).map(|a| a.slot) == Some(slot) {
                self.selected = None;
            }
        }
        self.annotations.clear_slot(slot)
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|s| s.visible).count()
    }

    /// Indices of visible slots in ascending order.
    pub fn visible_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .map(|(i, _)| i)
    }

    /// Slots drawn under the current view mode. Only visible slots are
    /// ever drawn, so Single mode with a hidden active slot displays
    /// nothing (the all-hidden degraded state).
    pub fn displayed_slots(&self) -> Vec<usize> {
        match self.view_mode {
            ViewMode::Single => {
                if self.slots[self.active_slot].visible {
                    vec![self.active_slot]
                } else {
                    Vec::new()
                }
            }
            _ => self.visible_slots().collect(),
        }
    }

    /// Hide a slot, reassigning the active slot and recomputing the view
    /// mode. The all-hidden warning fires exactly once per transition
    /// into the all-hidden state.
    pub fn remove_slot(&mut self, index: usize) -> RemovalOutcome {
        if index >= SLOT_COUNT || !self.slots[index].visible {
            return RemovalOutcome::NoOp;
        }
        self.slots[index].visible = false;
        log::info!("Slot {} hidden, {} visible", index, self.visible_count());

        let first_visible = self.visible_slots().next();
        if let Some(first_visible) = first_visible {
            if self.active_slot == index {
                self.active_slot = first_visible;
            }
            self.recompute_view_mode();
            RemovalOutcome::Hidden
        } else if !self.all_hidden_notified {
            self.all_hidden_notified = true;
            self.recompute_view_mode();
            RemovalOutcome::AllHidden
        } else {
            RemovalOutcome::Hidden
        }
    }

    /// Make a slot visible again (after an upload) and mark its image
    /// state. Re-arms the all-hidden warning.
    pub fn restore_slot(&mut self, index: usize, image: ImageState) {
        let slot = &mut self.slots[index];
        slot.visible = true;
        slot.image = image;
        self.all_hidden_notified = false;
        self.recompute_view_mode();
    }

    /// Derived automatically on visibility changes: 4 visible slots mean
    /// quad, 1–3 mean custom. Single is only ever user-selected.
    fn recompute_view_mode(&mut self) {
        self.view_mode = match self.visible_count() {
            SLOT_COUNT => ViewMode::Quad,
            0 => self.view_mode,
            _ => ViewMode::Custom,
        };
    }

    /// Grid geometry as (rows, cols) derived from view mode and the
    /// visible count. Quad is 2x2 regardless of how many slots remain.
    pub fn grid_dims(&self) -> (usize, usize) {
        match self.view_mode {
            ViewMode::Single => (1, 1),
            ViewMode::Quad => (2, 2),
            ViewMode::Custom => match self.visible_count() {
                4 | 3 => (2, 2),
                2 => (1, 2),
                _ => (1, 1),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;
    use crate::models::store::test_support::MemoryStorage;

    fn session() -> ViewerSession {
        ViewerSession::new(Box::new(MemoryStorage::default()))
    }

    fn line(x: f32) -> AnnotationKind {
        AnnotationKind::Line {
            start: Point::new(x, 0.0),
            end: Point::new(x + 10.0, 0.0),
        }
    }

    #[test]
    fn test_selecting_b_deselects_a() {
        let mut s = session();
        let a = s.add_annotation(0, line(0.0));
        let b = s.add_annotation(0, line(5.0));
        s.select(Some(a));
        s.select(Some(b));
        assert_eq!(s.selected(), Some(b));
    }

    #[test]
    fn test_removing_selected_clears_selection() {
        let mut s = session();
        let a = s.add_annotation(0, line(0.0));
        s.select(Some(a));
        s.remove_annotation(a);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_removing_other_keeps_selection() {
        let mut s = session();
        let a = s.add_annotation(0, line(0.0));
        let b = s.add_annotation(0, line(5.0));
        s.select(Some(a));
        s.remove_annotation(b);
        assert_eq!(s.selected(), Some(a));
    }

    #[test]
    fn test_remove_slot_recomputes_view_mode() {
        let mut s = session();
        assert_eq!(s.view_mode(), ViewMode::Quad);
        assert_eq!(s.remove_slot(2), RemovalOutcome::Hidden);
        assert_eq!(s.view_mode(), ViewMode::Custom);
        assert_eq!(s.visible_count(), 3);
        assert_eq!(s.grid_dims(), (2, 2));
    }

    #[test]
    fn test_active_slot_reassigned_to_lowest_visible() {
        let mut s = session();
        s.set_active_slot(0);
        s.remove_slot(0);
        assert_eq!(s.active_slot(), 1);
        s.set_active_slot(2);
        s.remove_slot(2);
        assert_eq!(s.active_slot(), 1);
    }

    #[test]
    fn test_all_hidden_warning_fires_once_per_transition() {
        let mut s = session();
        assert_eq!(s.remove_slot(2), RemovalOutcome::Hidden);
        assert_eq!(s.remove_slot(0), RemovalOutcome::Hidden);
        assert_eq!(s.remove_slot(1), RemovalOutcome::Hidden);
        assert_eq!(s.remove_slot(3), RemovalOutcome::AllHidden);
        // Already hidden: no second warning, no-op removals stay silent.
        assert_eq!(s.remove_slot(3), RemovalOutcome::NoOp);
        assert_eq!(s.remove_slot(0), RemovalOutcome::NoOp);
        assert_eq!(s.visible_count(), 0);
    }

    #[test]
    fn test_warning_rearms_after_restore() {
        let mut s = session();
        for i in 0..SLOT_COUNT {
            s.remove_slot(i);
        }
        s.restore_slot(1, ImageState::Ready);
        assert_eq!(s.visible_count(), 1);
        assert_eq!(s.view_mode(), ViewMode::Custom);
        assert_eq!(s.remove_slot(1), RemovalOutcome::AllHidden);
    }

    #[test]
    fn test_restoring_all_slots_returns_to_quad() {
        let mut s = session();
        s.remove_slot(3);
        assert_eq!(s.view_mode(), ViewMode::Custom);
        s.restore_slot(3, ImageState::Ready);
        assert_eq!(s.view_mode(), ViewMode::Quad);
    }

    #[test]
    fn test_grid_dims_by_visible_count() {
        let mut s = session();
        assert_eq!(s.grid_dims(), (2, 2));
        s.remove_slot(3);
        assert_eq!(s.grid_dims(), (2, 2));
        s.remove_slot(2);
        assert_eq!(s.grid_dims(), (1, 2));
        s.remove_slot(1);
        assert_eq!(s.grid_dims(), (1, 1));
    }

    #[test]
    fn test_single_mode_displays_only_active() {
        let mut s = session();
        s.set_active_slot(2);
        s.set_view_mode(ViewMode::Single);
        assert_eq!(s.grid_dims(), (1, 1));
        assert_eq!(s.displayed_slots(), vec![2]);
    }

    #[test]
    fn test_single_mode_hides_removed_active_slot() {
        let mut s = session();
        for i in 1..SLOT_COUNT {
            s.remove_slot(i);
        }
        s.set_view_mode(ViewMode::Single);
        assert_eq!(s.remove_slot(0), RemovalOutcome::AllHidden);
        assert_eq!(s.visible_count(), 0);
        // Nothing is drawn once the active slot is hidden.
        assert!(s.displayed_slots().is_empty());
    }

    #[test]
    fn test_forced_quad_keeps_two_by_two_grid() {
        let mut s = session();
        s.remove_slot(2);
        s.remove_slot(3);
        assert_eq!(s.grid_dims(), (1, 2));
        s.set_view_mode(ViewMode::Quad);
        assert_eq!(s.grid_dims(), (2, 2));
    }

    #[test]
    fn test_custom_mode_displays_visible_only() {
        let mut s = session();
        s.remove_slot(1);
        assert_eq!(s.displayed_slots(), vec![0, 2, 3]);
    }

    #[test]
    fn test_clear_slot_annotations_clears_matching_selection() {
        let mut s = session();
        let a = s.add_annotation(1, line(0.0));
        s.add_annotation(2, line(3.0));
        s.select(Some(a));
        assert_eq!(s.clear_slot_annotations(1), 1);
        assert_eq!(s.selected(), None);
        assert_eq!(s.annotations.for_slot(2).count(), 1);
    }
}
