//! # Input
//!
//! Gesture events as the surface consumes them, and an adapter for hosts that only report
//! "pointer is at X, and is/isn't pressed" each frame.

use crate::stroke::Point;

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum GestureEvent {
    Start(Point),
    Move(Point),
    End,
    /// The platform interrupted the gesture. Treated exactly like `End`.
    Cancel,
}

/// One raw pointer sample.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PointerSample {
    pub pos: Point,
    pub pressed: bool,
}

/// Turns a stream of [`PointerSample`]s into [`GestureEvent`]s.
#[derive(Default, Debug, Clone, Copy)]
pub struct GestureTracker {
    down: bool,
}
impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Feed a sample. Returns the gesture event it implies, if any.
    pub fn sample(&mut self, sample: PointerSample) -> Option<GestureEvent> {
        match (self.down, sample.pressed) {
            (false, true) => {
                self.down = true;
                Some(GestureEvent::Start(sample.pos))
            }
            (true, true) => Some(GestureEvent::Move(sample.pos)),
            (true, false) => {
                self.down = false;
                Some(GestureEvent::End)
            }
            // Hovering.
            (false, false) => None,
        }
    }
    /// The host lost the pointer (focus change, system dialog...).
    pub fn interrupt(&mut self) -> Option<GestureEvent> {
        std::mem::take(&mut self.down).then_some(GestureEvent::Cancel)
    }
    /// Feed one frame's worth of samples, in order.
    pub fn samples(
        &mut self,
        samples: impl IntoIterator<Item = PointerSample>,
    ) -> smallvec::SmallVec<[GestureEvent; 4]> {
        samples
            .into_iter()
            .filter_map(|sample| self.sample(sample))
            .collect()
    }
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.down
    }
}
