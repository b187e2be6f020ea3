//! Per-frame registry of interactive rectangles.
//!
//! The registry is rebuilt from scratch by every paint pass: `clear()` first,
//! then one `register()` per interactive element, in paint order. Resolution
//! scans newest-first so whatever was painted last (visually on top) wins,
//! without an explicit z-index.

use crate::{Rect, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion<P> {
    pub rect: Rect,
    pub payload: P,
}

#[derive(Clone, Debug)]
pub struct HitRegistry<P> {
    regions: Vec<HitRegion<P>>,
    frame: u64,
}

impl<P> Default for HitRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> HitRegistry<P> {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            frame: 0,
        }
    }

    /// Drops every region of the previous frame.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn register(&mut self, rect: Rect, payload: P) {
        if rect.is_empty() {
            log::trace!("hit region with empty rect {rect:?} skipped");
            return;
        }
        self.regions.push(HitRegion { rect, payload });
    }

    /// Registers `rect` clipped to `clip`; nothing is registered when they
    /// don't overlap.
    pub fn register_clipped(&mut self, rect: Rect, clip: Rect, payload: P) {
        if let Some(r) = rect.intersect(&clip) {
            self.register(r, payload);
        }
    }

    pub fn resolve(&self, p: Vec2) -> Option<&P> {
        self.resolve_region(p).map(|h| &h.payload)
    }

    pub fn resolve_region(&self, p: Vec2) -> Option<&HitRegion<P>> {
        self.regions.iter().rev().find(|h| h.rect.contains(p))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in registration order; `.rev()` walks top-most first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HitRegion<P>> + ExactSizeIterator {
        self.regions.iter()
    }

    /// Number of `clear()` calls so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
