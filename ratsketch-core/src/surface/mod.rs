//! # Drawing surface
//!
//! Turns gesture events into strokes and owns the resulting [`CanvasState`].
//!
//! The surface is a two-state machine. `Idle` has no active stroke. `Drawing` has exactly one
//! active stroke, which is always the last element of the stroke list. Every operation is total:
//! out-of-order or degenerate input is normalized rather than rejected, so the canvas is always
//! renderable. Export is the only fallible operation.

pub mod observer;

pub use observer::{ContentSignal, SurfaceEvent, SurfaceObserver};

use crate::{
    brush::{BrushSettings, EraserWidth},
    color::Color,
    export::{CanvasGeometry, ExportError, Scene},
    input::GestureEvent,
    state::CanvasState,
    stroke::{Point, Stroke, StrokeID},
};

/// Fixed properties of a surface, usually derived from [`crate::config::CanvasConfig`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceOptions {
    pub geometry: CanvasGeometry,
    pub background: Color,
    pub eraser: EraserWidth,
}
impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            geometry: CanvasGeometry::default(),
            background: Color::BLACK,
            eraser: EraserWidth::default(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Phase {
    Idle,
    /// The stroke being drawn. It is the last stroke in the canvas.
    Drawing(StrokeID),
}

pub struct DrawingSurface<Observer: SurfaceObserver = ()> {
    state: CanvasState,
    phase: Phase,
    brush: BrushSettings,
    options: SurfaceOptions,
    /// Whether the offscreen raster target is attached. Raster export needs it.
    mounted: bool,
    observer: Observer,
}
impl DrawingSurface<()> {
    #[must_use]
    pub fn new(options: SurfaceOptions) -> Self {
        Self::with_observer(options, ())
    }
}
impl<Observer: SurfaceObserver> DrawingSurface<Observer> {
    #[must_use]
    pub fn with_observer(options: SurfaceOptions, observer: Observer) -> Self {
        Self {
            state: CanvasState::new(options.background),
            phase: Phase::Idle,
            brush: BrushSettings::default(),
            options,
            mounted: false,
            observer,
        }
    }

    // ====================== Host configuration

    /// Attach the offscreen render target.
    pub fn mount(&mut self) {
        log::trace!("surface mounted");
        self.mounted = true;
    }
    /// Detach the render target. Raster exports fail with [`ExportError::NotReady`] until remounted.
    pub fn unmount(&mut self) {
        log::trace!("surface unmounted");
        self.mounted = false;
    }
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
    /// Settings for strokes started from now on. Strokes already started keep the style they began with.
    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush;
    }
    #[must_use]
    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }
    #[must_use]
    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    // ====================== Gestures

    /// Dispatch one gesture event.
    pub fn handle(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Start(point) => self.gesture_start(point),
            GestureEvent::Move(point) => self.gesture_move(point),
            GestureEvent::End => self.gesture_end(),
            GestureEvent::Cancel => self.gesture_cancel(),
        }
    }
    /// Begin a stroke at `point` with the current brush.
    ///
    /// If a stroke is already active, it is finalized first, as though its gesture had ended.
    pub fn gesture_start(&mut self, point: Point) {
        if let Phase::Drawing(previous) = self.phase {
            log::warn!("gesture started while {previous} was active, ending it first");
            self.finish();
        }
        let style = self
            .brush
            .resolve(self.options.background, self.options.eraser);
        let stroke = Stroke::begin(style, point);
        let id = stroke.id();
        log::trace!("{id}: start at {point:?} with {style:?}");

        self.state.push_back(stroke);
        self.phase = Phase::Drawing(id);

        self.observer.drawing_started();
        self.observer.stroke_started(id);
        self.notify_content();
    }
    /// Extend the active stroke. No-op when idle.
    pub fn gesture_move(&mut self, point: Point) {
        let Phase::Drawing(id) = self.phase else {
            return;
        };
        if self
            .state
            .modify_last(id, |stroke| stroke.push(point))
            .is_none()
        {
            // Active stroke vanished from under us. Shouldn't happen, as undo/clear reset the phase.
            log::error!("{id} is active but not the last stroke, dropping gesture");
            self.phase = Phase::Idle;
            return;
        }
        self.notify_content();
    }
    /// Finalize the active stroke. No-op when idle.
    pub fn gesture_end(&mut self) {
        self.finish();
    }
    /// The platform interrupted the gesture. Identical to [`Self::gesture_end`].
    pub fn gesture_cancel(&mut self) {
        self.finish();
    }
    fn finish(&mut self) {
        let Phase::Drawing(id) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };
        match self.state.modify_last(id, |stroke| {
            stroke.finalize();
            stroke.points().len()
        }) {
            Some(len) => log::trace!("{id}: finished with {len} points"),
            None => log::error!("{id} is active but not the last stroke"),
        }
        self.observer.drawing_ended();
        self.notify_content();
    }

    // ====================== Editing

    /// Remove the last stroke. If a gesture is in progress, that stroke is the one removed.
    pub fn undo(&mut self) {
        let was_drawing = self.force_idle();
        if let Some(removed) = self.state.pop_back() {
            log::trace!("{}: undone", removed.id());
            self.notify_content();
        }
        if was_drawing {
            // Emitted after the removal, so a host re-enabling input sees the final count.
            self.observer.drawing_ended();
        }
    }
    /// Drop every stroke and any gesture in progress.
    pub fn clear(&mut self) {
        let was_drawing = self.force_idle();
        self.state.reset();
        log::trace!("canvas cleared");
        self.notify_content();
        if was_drawing {
            self.observer.drawing_ended();
        }
    }
    /// Returns whether a gesture was in progress.
    fn force_idle(&mut self) -> bool {
        std::mem::replace(&mut self.phase, Phase::Idle) != Phase::Idle
    }
    fn notify_content(&mut self) {
        let signal = self.content();
        self.observer.content_changed(signal);
    }

    // ====================== Reading

    #[must_use]
    pub fn content(&self) -> ContentSignal {
        ContentSignal {
            has_content: !self.state.is_empty(),
            stroke_count: self.state.len(),
        }
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, Phase::Drawing(_))
    }
    /// Every stroke, including one in progress.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        self.state.strokes()
    }
    /// Strokes whose gestures have finished.
    #[must_use]
    pub fn committed_strokes(&self) -> &[Stroke] {
        let strokes = self.state.strokes();
        match self.phase {
            Phase::Idle => strokes,
            Phase::Drawing(_) => &strokes[..strokes.len().saturating_sub(1)],
        }
    }
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.version()
    }
    #[must_use]
    pub fn observer(&self) -> &Observer {
        &self.observer
    }
    pub fn observer_mut(&mut self) -> &mut Observer {
        &mut self.observer
    }

    // ====================== Export

    /// Snapshot of the committed strokes, ready to render elsewhere.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene {
            background: self.state.background(),
            strokes: self.committed_strokes().to_vec(),
            geometry: self.options.geometry,
        }
    }
    /// Render committed strokes into a PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        if !self.mounted {
            return Err(ExportError::NotReady);
        }
        self.scene().encode_png()
    }
    /// Render committed strokes into a raw base64 PNG.
    pub fn export_png_base64(&self) -> Result<String, ExportError> {
        if !self.mounted {
            return Err(ExportError::NotReady);
        }
        self.scene().encode_png_base64()
    }
    /// Like [`Self::export_png_base64`], but rendered on a blocking worker under a deadline.
    ///
    /// The snapshot is taken immediately, so the surface is free to change while this resolves.
    pub fn export_png_base64_within(
        &self,
        timeout: std::time::Duration,
    ) -> impl std::future::Future<Output = Result<String, ExportError>> + Send + 'static {
        let scene = self.mounted.then(|| self.scene());
        async move {
            let scene = scene.ok_or(ExportError::NotReady)?;
            scene.encode_png_base64_within(timeout).await
        }
    }
    /// Serialize committed strokes as an SVG document. Needs no render target.
    #[must_use]
    pub fn export_svg(&self) -> String {
        self.scene().to_svg()
    }
}
