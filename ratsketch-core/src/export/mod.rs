//! # Export
//!
//! Turning committed canvas state into an uploadable artifact: a base64 PNG, or an SVG document as
//! the vector fallback.
//!
//! Exports operate on a [`Scene`], an owned snapshot. Taking the snapshot is cheap relative to
//! rendering, and it means a render running on another thread can never observe a half-drawn frame.

pub mod png;
pub mod svg;

use crate::{color::Color, stroke::Stroke};

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The offscreen target isn't mounted yet. Retry once it is.
    #[error("render surface is not ready")]
    NotReady,
    /// The render didn't finish before its deadline.
    #[error("export timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("failed to encode png: {0}")]
    Encode(#[from] ::png::EncodingError),
    #[error(transparent)]
    Tessellation(#[from] crate::tess::TessellationError),
    #[error("export worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    /// Output side length outside `1..=CanvasGeometry::MAX_EXPORT_PX`.
    #[error("cannot export a {0}px image")]
    Size(u32),
}

/// Mapping between canvas-local units and exported pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasGeometry {
    /// Side length of the square canvas, in the units gestures are reported in.
    pub canvas_size: f32,
    /// Side length of the exported bitmap, in pixels.
    pub export_px: u32,
}
impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            canvas_size: 1024.0,
            export_px: 1024,
        }
    }
}
impl CanvasGeometry {
    /// Largest exported side length. 8192² RGBA8 is 256MiB before encoding.
    pub const MAX_EXPORT_PX: u32 = 8192;
    #[must_use]
    pub fn clamp_export_px(px: u32) -> u32 {
        px.clamp(1, Self::MAX_EXPORT_PX)
    }
    /// Pixels per canvas unit.
    #[must_use]
    pub fn scale(&self) -> f32 {
        if self.canvas_size > 0.0 {
            self.export_px as f32 / self.canvas_size
        } else {
            1.0
        }
    }
}

/// Everything needed to render the canvas, detached from the live surface.
#[derive(Clone, Debug)]
pub struct Scene {
    pub background: Color,
    /// Finalized strokes only, in paint order.
    pub strokes: Vec<Stroke>,
    pub geometry: CanvasGeometry,
}
impl Scene {
    /// Render into a bitmap of `geometry.export_px` square.
    pub fn render(&self) -> Result<image::RgbaImage, ExportError> {
        let px = self.geometry.export_px;
        if px != CanvasGeometry::clamp_export_px(px) {
            return Err(ExportError::Size(px));
        }
        let mut rasterizer = crate::raster::Rasterizer::new();
        let image = rasterizer.render(
            self.background,
            &self.strokes,
            self.geometry.scale(),
            self.geometry.export_px,
        )?;
        Ok(image)
    }
    /// Render and encode as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        let image = self.render()?;
        let bytes = png::encode(&image)?;
        log::debug!(
            "exported {} strokes as {}px png, {} bytes",
            self.strokes.len(),
            self.geometry.export_px,
            bytes.len()
        );
        Ok(bytes)
    }
    /// Render and encode as raw base64 PNG, without a `data:` prefix.
    pub fn encode_png_base64(&self) -> Result<String, ExportError> {
        self.encode_png().map(|bytes| png::to_base64(&bytes))
    }
    #[must_use]
    pub fn to_svg(&self) -> String {
        svg::write(self)
    }
    /// Render and encode on a blocking worker, failing with [`ExportError::Timeout`] past `timeout`.
    ///
    /// On timeout the worker is detached rather than killed, its result is discarded. A runtime
    /// dropped normally still waits for detached workers, see `Runtime::shutdown_background`.
    pub async fn encode_png_within(
        self,
        timeout: std::time::Duration,
    ) -> Result<Vec<u8>, ExportError> {
        with_deadline(timeout, async move {
            tokio::task::spawn_blocking(move || self.encode_png())
                .await
                .unwrap_or_else(|e| Err(ExportError::Worker(e)))
        })
        .await
    }
    /// [`Self::encode_png_within`], as raw base64.
    pub async fn encode_png_base64_within(
        self,
        timeout: std::time::Duration,
    ) -> Result<String, ExportError> {
        self.encode_png_within(timeout)
            .await
            .map(|bytes| png::to_base64(&bytes))
    }
}

/// Await `fut`, mapping an elapsed deadline to [`ExportError::Timeout`].
pub async fn with_deadline<T, F>(timeout: std::time::Duration, fut: F) -> Result<T, ExportError>
where
    F: std::future::Future<Output = Result<T, ExportError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_elapsed) => {
            log::warn!("export exceeded its {timeout:?} deadline");
            Err(ExportError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn geometry_scale() {
        let geometry = CanvasGeometry {
            canvas_size: 300.0,
            export_px: 1200,
        };
        assert_eq!(geometry.scale(), 4.0);
        let broken = CanvasGeometry {
            canvas_size: 0.0,
            export_px: 10,
        };
        assert_eq!(broken.scale(), 1.0);
    }
    #[test]
    fn oversized_export_is_an_error() {
        for export_px in [0, CanvasGeometry::MAX_EXPORT_PX + 1, u32::MAX] {
            let scene = Scene {
                background: Color::BLACK,
                strokes: Vec::new(),
                geometry: CanvasGeometry {
                    canvas_size: 8.0,
                    export_px,
                },
            };
            assert!(
                matches!(scene.encode_png(), Err(ExportError::Size(px)) if px == export_px),
                "{export_px}"
            );
        }
        assert_eq!(CanvasGeometry::clamp_export_px(0), 1);
        assert_eq!(CanvasGeometry::clamp_export_px(u32::MAX), 8192);
    }
    #[tokio::test]
    async fn deadline_elapses() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ExportError::Timeout(d)) if d == Duration::from_millis(10)));
    }
    #[tokio::test]
    async fn deadline_passes_result_through() {
        let result = with_deadline(Duration::from_secs(5), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
    #[tokio::test]
    async fn worker_encodes_png() {
        let scene = Scene {
            background: Color::BLACK,
            strokes: Vec::new(),
            geometry: CanvasGeometry {
                canvas_size: 8.0,
                export_px: 8,
            },
        };
        let encoded = scene
            .encode_png_base64_within(Duration::from_secs(5))
            .await
            .unwrap();
        // PNG signature, base64'd.
        assert!(encoded.starts_with("iVBORw0KGgo"));
    }
}
