//! Pointer and wheel routing.
//!
//! A press is resolved against the hit regions of the last painted frame and
//! acted on immediately. Moves either follow an active drag or scroll the
//! list; release commits the drag. Only the pointer that went down first is
//! followed, and nothing is routed while a dialog is waiting for an answer.

use gymplan_core::{InputEvent, PointerEvent, PointerEventKind, Vec2};

use crate::dialog::FlowKind;
use crate::drag::reorder_target;
use crate::layout::{ButtonAction, ChipAction};
use crate::paint::Hit;
use crate::planner::{Planner, PointerTrack};

impl Planner {
    /// Routes one input event. Returns whether a repaint happened.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Pointer(pe) => match pe.event {
                PointerEventKind::Down => self.pointer_down(&pe),
                PointerEventKind::Move => self.pointer_move(&pe),
                PointerEventKind::Up => self.pointer_up(&pe),
                PointerEventKind::Cancel => self.pointer_cancel(&pe),
            },
            InputEvent::Wheel { delta_y } => self.wheel(delta_y),
        }
    }

    fn is_tracked(&self, pe: &PointerEvent) -> bool {
        self.pointer.is_some_and(|t| t.id == pe.id)
    }

    pub fn pointer_down(&mut self, pe: &PointerEvent) -> bool {
        if self.has_dialog() {
            log::trace!("pointer down ignored: dialog open");
            return false;
        }
        if self.pointer.is_some_and(|t| t.id != pe.id) {
            log::trace!("ignoring secondary pointer {:?}", pe.id);
            return false;
        }
        self.pointer = Some(PointerTrack {
            id: pe.id,
            anchor_y: pe.position.y,
        });

        let Some(hit) = self.hits.resolve(pe.position).cloned() else {
            return false;
        };
        log::debug!("pointer down on {hit:?}");
        self.activate(hit, pe.position)
    }

    fn activate(&mut self, hit: Hit, at: Vec2) -> bool {
        let week = self.active_week;
        match hit {
            Hit::WeekTab(i) => self.select_week(i),
            Hit::AddItem { day } => self.add_blank_item(day),
            Hit::Toggle { id } => self.toggle_completion(&id),
            Hit::Image { day, item } => {
                if let Some(id) = self.item_id_at(day, item) {
                    self.open_dialog(FlowKind::ImageMenu { id });
                }
                false
            }
            Hit::Chip {
                day,
                item,
                action,
                row_top,
            } => match action {
                ChipAction::Edit => {
                    if let Some(id) = self.item_id_at(day, item) {
                        self.open_dialog(FlowKind::EditItem { id });
                    }
                    false
                }
                ChipAction::Drag => {
                    self.drag.begin(day, item, row_top, at.y);
                    self.render();
                    true
                }
                ChipAction::Menu => {
                    if let Some(id) = self.item_id_at(day, item) {
                        self.open_dialog(FlowKind::ItemMenu { id });
                    }
                    false
                }
            },
            Hit::Button(ButtonAction::AddPreset) => {
                self.open_dialog(FlowKind::PresetPicker { week });
                false
            }
            Hit::Button(ButtonAction::AddCustom) => {
                self.open_dialog(FlowKind::AddCustom { week });
                false
            }
            Hit::ScrollTop => self.scroll_to_top(),
            Hit::RenameWeek => {
                self.open_dialog(FlowKind::RenameWeek { week });
                false
            }
        }
    }

    pub fn pointer_move(&mut self, pe: &PointerEvent) -> bool {
        if self.has_dialog() || !self.is_tracked(pe) {
            return false;
        }
        let y = pe.position.y;
        if self.drag.update(y) {
            self.render();
            return true;
        }
        let Some(track) = self.pointer.as_mut() else {
            return false;
        };
        let dy = track.anchor_y - y;
        if dy.abs() <= self.viewport.px(self.metrics.scroll_slop) {
            return false;
        }
        track.anchor_y = y;
        self.scroll_by(dy)
    }

    pub fn pointer_up(&mut self, pe: &PointerEvent) -> bool {
        if !self.is_tracked(pe) {
            return false;
        }
        self.pointer = None;
        let Some(session) = self.drag.finish() else {
            return false;
        };
        let count = self
            .plan
            .day(self.active_week, session.day)
            .map_or(0, |d| d.items.len());
        let target = reorder_target(session.from, session.delta(), self.layout.slot(), count);
        log::debug!(
            "drag end: day {} from {} delta {} -> {target:?}",
            session.day,
            session.from,
            session.delta()
        );
        match target {
            Some(to) if self.reorder(session.day, session.from, to) => true,
            _ => {
                // Drop the ghost.
                self.render();
                true
            }
        }
    }

    /// Abandons the gesture; a drag in progress is dropped without moving
    /// anything.
    pub fn pointer_cancel(&mut self, pe: &PointerEvent) -> bool {
        if !self.is_tracked(pe) {
            return false;
        }
        self.pointer = None;
        if self.drag.finish().is_some() {
            log::debug!("drag cancelled");
            self.render();
            return true;
        }
        false
    }

    pub fn wheel(&mut self, delta_y: f32) -> bool {
        if self.has_dialog() {
            return false;
        }
        self.scroll_by(delta_y)
    }
}
