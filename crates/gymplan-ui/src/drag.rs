//! Drag-to-reorder within a single day.
//!
//! A session starts from a row's `Drag` chip and remembers the row's painted
//! top plus where inside the row the pointer grabbed it. Moves track the
//! dragged top; release quantises the travel to whole slots.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub day: usize,
    /// Index of the dragged item when the drag began.
    pub from: usize,
    /// Painted top of the row at activation (device pixels).
    pub start_y: f32,
    /// Current top of the dragged row.
    pub current_y: f32,
    /// Pointer y minus row top at activation.
    pub grab_dy: f32,
}

impl DragSession {
    pub fn delta(&self) -> f32 {
        self.current_y - self.start_y
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn begin(&mut self, day: usize, from: usize, row_top: f32, pointer_y: f32) {
        log::debug!("drag begin: day {day} item {from}");
        *self = DragState::Dragging(DragSession {
            day,
            from,
            start_y: row_top,
            current_y: row_top,
            grab_dy: pointer_y - row_top,
        });
    }

    /// Returns `false` when no drag is active.
    pub fn update(&mut self, pointer_y: f32) -> bool {
        match self {
            DragState::Dragging(s) => {
                s.current_y = pointer_y - s.grab_dy;
                true
            }
            DragState::Idle => false,
        }
    }

    /// Ends the drag, returning the session that was active.
    pub fn finish(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }
}

/// Destination index for an item at `from` dragged by `delta` pixels in a
/// list of `count` rows spaced `slot` apart. `None` means no move.
pub fn reorder_target(from: usize, delta: f32, slot: f32, count: usize) -> Option<usize> {
    if count < 2 || from >= count || slot <= 0.0 || !delta.is_finite() {
        return None;
    }
    let moved = (delta / slot).round() as i64;
    let to = (from as i64 + moved).clamp(0, count as i64 - 1) as usize;
    (to != from).then_some(to)
}
