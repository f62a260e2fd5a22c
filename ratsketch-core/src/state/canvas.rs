//! # Canvas
//!
//! The ordered strokes of one drawing, plus its background. Storage order is paint order: later
//! strokes cover earlier ones.

use crate::{
    color::Color,
    stroke::{Stroke, StrokeID},
};

#[derive(Clone, Debug)]
pub struct CanvasState {
    strokes: Vec<Stroke>,
    background: Color,
    /// Bumped on every mutation. Anything caching a render compares against this.
    version: u64,
}
impl Default for CanvasState {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}
// Public methods for readers
impl CanvasState {
    #[must_use]
    pub fn new(background: Color) -> Self {
        Self {
            strokes: Vec::new(),
            background: background.opaque(),
            version: 0,
        }
    }
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
    #[must_use]
    pub fn get(&self, id: StrokeID) -> Option<&Stroke> {
        self.strokes.iter().find(|stroke| stroke.id() == id)
    }
}
// Mutation, for the surface only.
impl CanvasState {
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
    pub(crate) fn push_back(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
        self.bump();
    }
    /// Apply `f` to the last stroke if it is `id`. Returns whether it was.
    pub(crate) fn modify_last<R>(
        &mut self,
        id: StrokeID,
        f: impl FnOnce(&mut Stroke) -> R,
    ) -> Option<R> {
        let stroke = self.strokes.last_mut().filter(|stroke| stroke.id() == id)?;
        let result = f(stroke);
        self.bump();
        Some(result)
    }
    pub(crate) fn pop_back(&mut self) -> Option<Stroke> {
        let popped = self.strokes.pop();
        if popped.is_some() {
            self.bump();
        }
        popped
    }
    /// Drop every stroke. The version keeps counting up so stale renders are never mistaken as current.
    pub(crate) fn reset(&mut self) {
        self.strokes = Vec::new();
        self.bump();
    }
}
