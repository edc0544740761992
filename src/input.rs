// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction state machine.
//!
//! Resolves pointer events on a slot into annotation selection, view
//! panning or annotation creation, depending on the session's global
//! annotation mode. The controller is pure state-machine logic: it knows
//! nothing about egui and measures text through the [`TextMetrics`]
//! capability, so every gesture path is testable headless.
//!
//! Text placement is a two-phase command: pointer-down in text mode
//! yields a [`PendingText`] handle, and the shell later commits it with
//! the entered content or drops it to cancel. This keeps the blocking
//! modal out of the state machine.

use crate::models::annotation::{AnnotationId, AnnotationKind, Point};
use crate::models::session::{AnnotationMode, ViewerSession};
use crate::util::geometry::{annotation_hit, TextMetrics};

/// Transient per-gesture sub-state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Panning { slot: usize, last: Point },
    DrawingLine { slot: usize, start: Point },
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}

/// Handle for a text annotation awaiting its content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingText {
    pub slot: usize,
    pub anchor: Point,
}

/// What a pointer event resolved to, for the shell to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    None,
    Selected(AnnotationId),
    TextPrompt(PendingText),
    LineCommitted(AnnotationId),
}

#[derive(Default)]
pub struct InteractionController {
    gesture: Gesture,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Switch the global annotation mode, abandoning any in-progress
    /// gesture without committing it.
    pub fn set_mode(&mut self, session: &mut ViewerSession, mode: AnnotationMode) {
        self.gesture = Gesture::Idle;
        session.set_annotation_mode(mode);
    }

    /// Pointer pressed at `pos` (slot-surface pixels) on `slot`.
    ///
    /// Hit-testing runs first: the earliest annotation in storage order
    /// under the pointer is selected and no gesture starts. Otherwise
    /// the event dispatches by annotation mode. The slot always becomes
    /// active.
    pub fn pointer_down(
        &mut self,
        session: &mut ViewerSession,
        metrics: &dyn TextMetrics,
        slot: usize,
        pos: Point,
    ) -> ControllerEvent {
        session.set_active_slot(slot);

        let hit = session
            .annotations
            .for_slot(slot)
            .find(|a| annotation_hit(a, pos, metrics))
            .map(|a| a.id);
        if let Some(id) = hit {
            session.select(Some(id));
            return ControllerEvent::Selected(id);
        }

        match session.annotation_mode() {
            AnnotationMode::Pan => {
                session.select(None);
                self.gesture = Gesture::Panning { slot, last: pos };
                ControllerEvent::None
            }
            AnnotationMode::Line => {
                self.gesture = Gesture::DrawingLine { slot, start: pos };
                ControllerEvent::None
            }
            AnnotationMode::Text => {
                ControllerEvent::TextPrompt(PendingText { slot, anchor: pos })
            }
        }
    }

    /// Pointer moved to `pos` while pressed.
    pub fn pointer_move(&mut self, session: &mut ViewerSession, pos: Point) {
        if let Gesture::Panning { slot, last } = self.gesture {
            session
                .slot_mut(slot)
                .view
                .pan_by(pos.x - last.x, pos.y - last.y);
            self.gesture = Gesture::Panning { slot, last: pos };
        }
        // Line drawing mutates nothing until release; the canvas may show
        // a rubber-band preview from the gesture state.
    }

    /// Pointer released at `pos`.
    pub fn pointer_up(&mut self, session: &mut ViewerSession, pos: Point) -> ControllerEvent {
        let finished = std::mem::take(&mut self.gesture);
        match finished {
            Gesture::DrawingLine { slot, start } => {
                let id = session.add_annotation(
                    slot,
                    AnnotationKind::Line { start, end: pos },
                );
                ControllerEvent::LineCommitted(id)
            }
            _ => ControllerEvent::None,
        }
    }

    /// Commit a pending text annotation. Empty or whitespace-only content
    /// cancels instead of creating an annotation.
    pub fn commit_text(
        &mut self,
        session: &mut ViewerSession,
        pending: PendingText,
        content: &str,
    ) -> Option<AnnotationId> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(session.add_annotation(
            pending.slot,
            AnnotationKind::Text {
                content: content.to_string(),
                anchor: pending.anchor,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::test_support::MemoryStorage;
    use crate::util::geometry::FixedTextMetrics;

    fn session() -> ViewerSession {
        ViewerSession::new(Box::new(MemoryStorage::default()))
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_pan_gesture_accumulates_deltas() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();

        ctl.pointer_down(&mut s, &metrics, 1, p(100.0, 100.0));
        ctl.pointer_move(&mut s, p(110.0, 95.0));
        ctl.pointer_move(&mut s, p(130.0, 95.0));
        ctl.pointer_up(&mut s, p(130.0, 95.0));

        assert_eq!(s.slot(1).view.pan_x, 30.0);
        assert_eq!(s.slot(1).view.pan_y, -5.0);
        assert_eq!(ctl.gesture(), Gesture::Idle);
        // Other slots untouched.
        assert_eq!(s.slot(0).view.pan_x, 0.0);
    }

    #[test]
    fn test_pointer_down_activates_slot_and_clears_selection_in_pan_mode() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        let id = s.add_annotation(0, AnnotationKind::Line {
            start: p(0.0, 0.0),
            end: p(10.0, 0.0),
        });
        s.select(Some(id));

        // Press far away from the annotation.
        ctl.pointer_down(&mut s, &metrics, 2, p(300.0, 300.0));
        assert_eq!(s.active_slot(), 2);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_line_gesture_commits_on_release() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        ctl.set_mode(&mut s, AnnotationMode::Line);

        let ev = ctl.pointer_down(&mut s, &metrics, 0, p(200.0, 10.0));
        assert_eq!(ev, ControllerEvent::None);
        ctl.pointer_move(&mut s, p(250.0, 40.0));
        let ev = ctl.pointer_up(&mut s, p(260.0, 50.0));

        let id = match ev {
            ControllerEvent::LineCommitted(id) => id,
            other => panic!("expected LineCommitted, got {:?}", other),
        };
        let stored = s.annotations.get(id).unwrap();
        assert_eq!(
            stored.kind,
            AnnotationKind::Line {
                start: p(200.0, 10.0),
                end: p(260.0, 50.0),
            }
        );
        // Drawing a line must not pan the view.
        assert_eq!(s.slot(0).view.pan_x, 0.0);
    }

    #[test]
    fn test_hit_select_preempts_gesture() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        let id = s.add_annotation(0, AnnotationKind::Line {
            start: p(0.0, 0.0),
            end: p(100.0, 0.0),
        });
        ctl.set_mode(&mut s, AnnotationMode::Line);

        let ev = ctl.pointer_down(&mut s, &metrics, 0, p(50.0, 5.0));
        assert_eq!(ev, ControllerEvent::Selected(id));
        assert_eq!(s.selected(), Some(id));
        assert_eq!(ctl.gesture(), Gesture::Idle);
        // No line annotation started; release adds nothing.
        ctl.pointer_up(&mut s, p(60.0, 5.0));
        assert_eq!(s.annotations.len(), 1);
    }

    #[test]
    fn test_first_in_storage_order_wins_on_overlap() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        let first = s.add_annotation(0, AnnotationKind::Line {
            start: p(0.0, 0.0),
            end: p(100.0, 0.0),
        });
        let _second = s.add_annotation(0, AnnotationKind::Line {
            start: p(0.0, 4.0),
            end: p(100.0, 4.0),
        });

        let ev = ctl.pointer_down(&mut s, &metrics, 0, p(50.0, 2.0));
        assert_eq!(ev, ControllerEvent::Selected(first));
    }

    #[test]
    fn test_hit_only_considers_owning_slot() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        s.add_annotation(3, AnnotationKind::Line {
            start: p(0.0, 0.0),
            end: p(100.0, 0.0),
        });

        // Same position, different slot: no hit, a pan starts instead.
        let ev = ctl.pointer_down(&mut s, &metrics, 0, p(50.0, 5.0));
        assert_eq!(ev, ControllerEvent::None);
        assert!(matches!(ctl.gesture(), Gesture::Panning { slot: 0, .. }));
    }

    #[test]
    fn test_text_two_phase_commit() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        ctl.set_mode(&mut s, AnnotationMode::Text);

        let pending = match ctl.pointer_down(&mut s, &metrics, 1, p(80.0, 90.0)) {
            ControllerEvent::TextPrompt(pending) => pending,
            other => panic!("expected TextPrompt, got {:?}", other),
        };
        assert_eq!(ctl.gesture(), Gesture::Idle);

        let id = ctl.commit_text(&mut s, pending, "consolidation").unwrap();
        let stored = s.annotations.get(id).unwrap();
        assert_eq!(
            stored.kind,
            AnnotationKind::Text {
                content: "consolidation".to_string(),
                anchor: p(80.0, 90.0),
            }
        );
        assert_eq!(stored.slot, 1);
    }

    #[test]
    fn test_text_empty_content_cancels() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        ctl.set_mode(&mut s, AnnotationMode::Text);

        let pending = match ctl.pointer_down(&mut s, &metrics, 1, p(80.0, 90.0)) {
            ControllerEvent::TextPrompt(pending) => pending,
            other => panic!("expected TextPrompt, got {:?}", other),
        };
        assert!(ctl.commit_text(&mut s, pending, "   ").is_none());
        assert!(s.annotations.is_empty());
    }

    #[test]
    fn test_text_hit_selects_with_stub_metrics() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        let id = s.add_annotation(0, AnnotationKind::Text {
            content: "nodule".to_string(),
            anchor: p(100.0, 50.0),
        });

        // Inside the measured box (6 chars * 8px advance wide, 16px tall).
        let ev = ctl.pointer_down(&mut s, &metrics, 0, p(120.0, 44.0));
        assert_eq!(ev, ControllerEvent::Selected(id));
    }

    #[test]
    fn test_mode_switch_abandons_gesture() {
        let mut s = session();
        let metrics = FixedTextMetrics::default();
        let mut ctl = InteractionController::new();
        ctl.set_mode(&mut s, AnnotationMode::Line);
        ctl.pointer_down(&mut s, &metrics, 0, p(10.0, 10.0));
        assert!(matches!(ctl.gesture(), Gesture::DrawingLine { .. }));

        ctl.set_mode(&mut s, AnnotationMode::Pan);
        assert_eq!(ctl.gesture(), Gesture::Idle);
        // The abandoned line never committed.
        ctl.pointer_up(&mut s, p(50.0, 50.0));
        assert!(s.annotations.is_empty());
    }
}
