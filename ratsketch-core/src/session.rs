//! # Draw session
//!
//! The draw screen's policy around a [`DrawingSurface`]: which colors are on offer, when the
//! surrounding page may scroll, when the drawing may be submitted, and what submitting does.

use crate::{
    brush::{BrushSettings, BrushWidth, Tool},
    color::Color,
    config::CanvasConfig,
    export::ExportError,
    input::GestureEvent,
    state::Palette,
    stroke::Point,
    surface::{ContentSignal, DrawingSurface, SurfaceObserver},
};

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("nothing drawn")]
    Empty,
    /// A submission is already rendering.
    #[error("a submission is already in progress")]
    Busy,
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// A successfully exported drawing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Raw base64 PNG, no `data:` prefix.
    pub png_base64: String,
    pub stroke_count: usize,
}

/// Host-side view of surface callbacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionObserver {
    /// Whether the enclosing page may scroll. Locked for the duration of a gesture.
    pub scroll_enabled: bool,
    pub content: ContentSignal,
}
impl Default for SessionObserver {
    fn default() -> Self {
        Self {
            scroll_enabled: true,
            content: ContentSignal::default(),
        }
    }
}
impl SurfaceObserver for SessionObserver {
    fn drawing_started(&mut self) {
        self.scroll_enabled = false;
    }
    fn drawing_ended(&mut self) {
        self.scroll_enabled = true;
    }
    fn content_changed(&mut self, signal: ContentSignal) {
        self.content = signal;
    }
}

pub struct DrawSession {
    surface: DrawingSurface<SessionObserver>,
    palette: Palette,
    color: Color,
    width: BrushWidth,
    tool: Tool,
    export_timeout: std::time::Duration,
    exporting: bool,
}
impl DrawSession {
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        let brush = BrushSettings::default();
        let mut surface =
            DrawingSurface::with_observer(config.surface_options(), SessionObserver::default());
        surface.set_brush(brush);
        Self {
            surface,
            palette: Palette::default(),
            color: brush.color,
            width: brush.width,
            tool: brush.tool,
            export_timeout: config.export_timeout(),
            exporting: false,
        }
    }
    pub fn mount(&mut self) {
        self.surface.mount();
    }
    #[must_use]
    pub fn surface(&self) -> &DrawingSurface<SessionObserver> {
        &self.surface
    }
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    // ====================== Brush selection

    /// Select a color. Colors not in the palette are replaced with white.
    pub fn select_color(&mut self, color: Color) {
        self.color = self.palette.sanitize(color);
        self.apply_brush();
    }
    /// Select a brush size, snapped to the nearest one offered.
    pub fn select_width(&mut self, width: BrushWidth) {
        self.width = Palette::nearest_size(width);
        self.apply_brush();
    }
    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.apply_brush();
    }
    #[must_use]
    pub fn brush(&self) -> BrushSettings {
        BrushSettings {
            color: self.color,
            width: self.width,
            tool: self.tool,
        }
    }
    /// Rebuild the palette for a changed entitlement, dropping a color that's no longer offered.
    pub fn set_entitlement(&mut self, blood_red: bool) {
        self.palette = Palette::new(blood_red);
        self.select_color(self.color);
    }
    fn apply_brush(&mut self) {
        self.surface.set_brush(self.brush());
    }

    // ====================== Input

    /// Forward a gesture to the surface, unless a submission is rendering.
    pub fn handle(&mut self, event: GestureEvent) {
        if self.exporting {
            log::trace!("ignoring {event:?} during export");
            return;
        }
        self.surface.handle(event);
    }
    pub fn gesture_start(&mut self, point: Point) {
        self.handle(GestureEvent::Start(point));
    }
    pub fn gesture_move(&mut self, point: Point) {
        self.handle(GestureEvent::Move(point));
    }
    pub fn gesture_end(&mut self) {
        self.handle(GestureEvent::End);
    }
    pub fn gesture_cancel(&mut self) {
        self.handle(GestureEvent::Cancel);
    }
    pub fn undo(&mut self) {
        if !self.exporting {
            self.surface.undo();
        }
    }
    pub fn clear(&mut self) {
        if self.exporting {
            return;
        }
        self.surface.clear();
        // Even with no gesture in flight, a clear always hands scrolling back.
        self.surface.observer_mut().scroll_enabled = true;
    }

    // ====================== Submission

    #[must_use]
    pub fn scroll_enabled(&self) -> bool {
        self.surface.observer().scroll_enabled
    }
    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.exporting
    }
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.surface.observer().content.has_content && !self.exporting
    }
    /// Start rendering the committed strokes. Input is ignored until [`Self::finish_submit`].
    /// A gesture still in progress is ended and included.
    ///
    /// The returned future owns a snapshot and may be driven anywhere.
    pub fn begin_submit(
        &mut self,
    ) -> Result<
        impl std::future::Future<Output = Result<String, ExportError>> + Send + 'static,
        SubmitError,
    > {
        if self.exporting {
            return Err(SubmitError::Busy);
        }
        if self.surface.is_drawing() {
            // Input is about to be ignored, so the gesture's own end would never arrive.
            log::debug!("submit during a gesture, ending it first");
            self.surface.gesture_end();
        }
        if self.surface.committed_strokes().is_empty() {
            return Err(SubmitError::Empty);
        }
        self.exporting = true;
        Ok(self.surface.export_png_base64_within(self.export_timeout))
    }
    /// Conclude a submission started by [`Self::begin_submit`]. A success clears the canvas, a
    /// failure leaves it untouched for another attempt.
    pub fn finish_submit(
        &mut self,
        result: Result<String, ExportError>,
    ) -> Result<Submission, SubmitError> {
        self.exporting = false;
        let png_base64 = result.map_err(|e| {
            log::warn!("submission failed: {e}");
            SubmitError::Export(e)
        })?;
        let stroke_count = self.surface.committed_strokes().len();
        self.clear();
        log::debug!("submitted {stroke_count} strokes");
        Ok(Submission {
            png_base64,
            stroke_count,
        })
    }
    /// Export and, on success, reset the canvas.
    pub async fn submit(&mut self) -> Result<Submission, SubmitError> {
        let pending = self.begin_submit()?;
        let result = pending.await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn session() -> DrawSession {
        let mut config = CanvasConfig::default();
        config.canvas_size = 32.0;
        config.export_px = 32;
        let mut session = DrawSession::new(&config);
        session.mount();
        session
    }
    fn scribble(session: &mut DrawSession) {
        session.gesture_start(Point::new(4.0, 4.0));
        session.gesture_move(Point::new(20.0, 20.0));
        session.gesture_end();
    }

    #[test]
    fn scroll_locked_during_gesture() {
        let mut session = session();
        assert!(session.scroll_enabled());
        session.gesture_start(Point::new(1.0, 1.0));
        assert!(!session.scroll_enabled());
        session.gesture_move(Point::new(2.0, 1.0));
        session.gesture_cancel();
        assert!(session.scroll_enabled());

        session.gesture_start(Point::new(1.0, 1.0));
        session.clear();
        assert!(session.scroll_enabled());
    }
    #[test]
    fn submit_gated_on_content() {
        let mut session = session();
        assert!(!session.can_submit());
        assert!(matches!(session.begin_submit(), Err(SubmitError::Empty)));
        scribble(&mut session);
        assert!(session.can_submit());
        session.undo();
        assert!(!session.can_submit());
    }
    #[test]
    fn submit_mid_gesture_ends_the_gesture() {
        let mut session = session();
        scribble(&mut session);
        session.gesture_start(Point::new(8.0, 8.0));
        session.gesture_move(Point::new(9.0, 9.0));
        assert!(!session.scroll_enabled());

        let _pending = session.begin_submit().unwrap();
        assert!(!session.surface().is_drawing());
        assert!(session.scroll_enabled());
        // The platform's end arrives late, and is dropped.
        session.gesture_end();

        let result = session.finish_submit(Err(ExportError::Timeout(
            std::time::Duration::from_millis(1),
        )));
        assert!(matches!(result, Err(SubmitError::Export(_))));
        assert!(!session.surface().is_drawing());
        assert!(session.scroll_enabled());
        assert_eq!(session.surface().committed_strokes().len(), 2);
        // Drawing works normally afterwards.
        scribble(&mut session);
        assert_eq!(session.surface().committed_strokes().len(), 3);
    }
    #[test]
    fn lone_tap_in_progress_is_submitted() {
        let mut session = session();
        session.gesture_start(Point::new(1.0, 1.0));
        let _pending = session.begin_submit().unwrap();
        assert_eq!(session.surface().committed_strokes().len(), 1);
        assert!(session.surface().strokes()[0].is_renderable());
    }
    #[tokio::test]
    async fn submit_resets_canvas() {
        let mut session = session();
        scribble(&mut session);
        scribble(&mut session);
        let submission = session.submit().await.unwrap();
        assert_eq!(submission.stroke_count, 2);
        assert!(submission.png_base64.starts_with("iVBORw0KGgo"));
        assert!(session.surface().strokes().is_empty());
        assert!(!session.can_submit());
        assert!(!session.is_exporting());
    }
    #[test]
    fn failed_submit_keeps_canvas() {
        let mut session = session();
        scribble(&mut session);
        let _pending = session.begin_submit().unwrap();
        let result = session.finish_submit(Err(ExportError::Timeout(
            std::time::Duration::from_millis(1),
        )));
        assert!(matches!(
            result,
            Err(SubmitError::Export(ExportError::Timeout(_)))
        ));
        assert_eq!(session.surface().strokes().len(), 1);
        assert!(session.can_submit());
    }
    #[test]
    fn input_ignored_while_exporting() {
        let mut session = session();
        scribble(&mut session);
        let _pending = session.begin_submit().unwrap();
        assert!(!session.can_submit());
        assert!(matches!(session.begin_submit(), Err(SubmitError::Busy)));
        scribble(&mut session);
        session.undo();
        session.clear();
        assert_eq!(session.surface().strokes().len(), 1);
    }
    #[test]
    fn unmounted_submit_reports_not_ready() {
        let mut session = DrawSession::new(&CanvasConfig::default());
        scribble(&mut session);
        let pending = session.begin_submit().unwrap();
        let result = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
            .block_on(pending);
        assert!(matches!(
            session.finish_submit(result),
            Err(SubmitError::Export(ExportError::NotReady))
        ));
        assert_eq!(session.surface().strokes().len(), 1);
    }
    #[test]
    fn entitlement_changes_palette() {
        let mut session = session();
        let blood_red = Color::from_rgb8(crate::state::palette::BLOOD_RED);
        session.select_color(blood_red);
        assert_eq!(session.brush().color, Color::WHITE);

        session.set_entitlement(true);
        session.select_color(blood_red);
        assert_eq!(session.brush().color, blood_red);
        assert_eq!(session.surface().brush().color, blood_red);

        session.set_entitlement(false);
        assert_eq!(session.brush().color, Color::WHITE);
    }
    #[test]
    fn tool_and_width_reach_surface() {
        let mut session = session();
        session.select_tool(Tool::Eraser);
        session.select_width(BrushWidth::new(14.0));
        scribble(&mut session);
        let style = session.surface().strokes()[0].style();
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.width.get(), 16.0);
    }
}
