use crate::stroke::StrokeID;

/// What the host needs to enable or disable its submit action, without looking inside the surface.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ContentSignal {
    pub has_content: bool,
    pub stroke_count: usize,
}

/// Callbacks from the surface to its host. All methods default to doing nothing.
pub trait SurfaceObserver {
    /// A new stroke was appended.
    fn stroke_started(&mut self, _id: StrokeID) {}
    /// A gesture began. Hosts typically lock competing scroll gestures here.
    fn drawing_started(&mut self) {}
    /// The gesture finished, was cancelled, or was discarded by undo/clear.
    fn drawing_ended(&mut self) {}
    /// Fired after every mutation of the stroke list.
    fn content_changed(&mut self, _signal: ContentSignal) {}
}

impl SurfaceObserver for () {}

/// A recorded observer callback.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SurfaceEvent {
    StrokeStarted(StrokeID),
    DrawingStarted,
    DrawingEnded,
    ContentChanged(ContentSignal),
}

/// Records every callback in order.
impl SurfaceObserver for Vec<SurfaceEvent> {
    fn stroke_started(&mut self, id: StrokeID) {
        self.push(SurfaceEvent::StrokeStarted(id));
    }
    fn drawing_started(&mut self) {
        self.push(SurfaceEvent::DrawingStarted);
    }
    fn drawing_ended(&mut self) {
        self.push(SurfaceEvent::DrawingEnded);
    }
    fn content_changed(&mut self, signal: ContentSignal) {
        self.push(SurfaceEvent::ContentChanged(signal));
    }
}

impl<O: SurfaceObserver + ?Sized> SurfaceObserver for &mut O {
    fn stroke_started(&mut self, id: StrokeID) {
        (**self).stroke_started(id);
    }
    fn drawing_started(&mut self) {
        (**self).drawing_started();
    }
    fn drawing_ended(&mut self) {
        (**self).drawing_ended();
    }
    fn content_changed(&mut self, signal: ContentSignal) {
        (**self).content_changed(signal);
    }
}
