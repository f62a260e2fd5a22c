//! # Rasterizer
//!
//! Software rendering of tessellated strokes into an RGBA8 bitmap. Each pixel is sampled at four
//! rotated-grid positions. A stroke's triangles are first unioned into a coverage mask and only
//! then composited, so a stroke crossing itself doesn't darken where its triangles overlap.

use crate::{
    color::Color,
    stroke::Stroke,
    tess::{StrokeMesh, TessellationError, Tessellator},
};

/// Sub-pixel sample positions, relative to the pixel's top-left corner.
const SAMPLES: [[f32; 2]; 4] = [[0.375, 0.125], [0.875, 0.375], [0.125, 0.625], [0.625, 0.875]];
const FULL_MASK: u8 = (1 << SAMPLES.len()) - 1;

#[derive(Default)]
pub struct Rasterizer {
    tessellator: Tessellator,
    mesh: StrokeMesh,
    /// Coverage bits for the stroke currently being drawn, covering only `mask_rect`.
    mask: Vec<u8>,
    mask_rect: Option<PixelRect>,
    target_size: u32,
}
impl Rasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Paint `background`, then every stroke in order, into a fresh `size`×`size` bitmap.
    /// `scale` maps canvas units to pixels.
    pub fn render(
        &mut self,
        background: Color,
        strokes: &[Stroke],
        scale: f32,
        size: u32,
    ) -> Result<image::RgbaImage, TessellationError> {
        let mut target =
            image::RgbaImage::from_pixel(size, size, image::Rgba(background.to_rgba8()));
        self.target_size = size;
        for stroke in strokes {
            if !stroke.is_renderable() {
                // Only possible for an unfinalized stroke, which callers are meant to filter out.
                log::warn!("{}: skipping unfinalized stroke", stroke.id());
                continue;
            }
            self.tessellator
                .tessellate_into(stroke, scale, &mut self.mesh)?;
            self.fill_mask();
            self.composite(&mut target, stroke.style().color);
        }
        Ok(target)
    }
    /// Rasterize the current mesh into `self.mask`. Sets `self.mask_rect`.
    fn fill_mask(&mut self) {
        self.mask.clear();
        self.mask_rect = None;
        let Some((min, max)) = self.mesh.bounds() else {
            return;
        };
        let rect = PixelRect::covering(min, max, self.target_size);
        if rect.is_empty() {
            return;
        }
        self.mask.resize(rect.area(), 0);

        for [a, b, c] in self.mesh.triangles() {
            let area = edge(a, b, c);
            if area == 0.0 {
                continue;
            }
            let tri = rect.intersect(PixelRect::covering(
                [a[0].min(b[0]).min(c[0]), a[1].min(b[1]).min(c[1])],
                [a[0].max(b[0]).max(c[0]), a[1].max(b[1]).max(c[1])],
                self.target_size,
            ));
            for py in tri.y0..tri.y1 {
                for px in tri.x0..tri.x1 {
                    let mut bits = 0u8;
                    for (bit, [sx, sy]) in SAMPLES.iter().enumerate() {
                        let p = [px as f32 + sx, py as f32 + sy];
                        // Inside when all three edges agree with the winding, edges inclusive.
                        if edge(a, b, p) * area >= 0.0
                            && edge(b, c, p) * area >= 0.0
                            && edge(c, a, p) * area >= 0.0
                        {
                            bits |= 1 << bit;
                        }
                    }
                    if bits != 0 {
                        self.mask[rect.index(px, py)] |= bits;
                    }
                }
            }
        }
        self.mask_rect = Some(rect);
    }
    /// Blend `color` source-over into `target`, weighted by the mask.
    fn composite(&self, target: &mut image::RgbaImage, color: Color) {
        let Some(rect) = self.mask_rect else {
            return;
        };
        let src = color.as_array();
        for py in rect.y0..rect.y1 {
            for px in rect.x0..rect.x1 {
                let bits = self.mask[rect.index(px, py)];
                if bits == 0 {
                    continue;
                }
                let pixel = target.get_pixel_mut(px, py);
                if bits == FULL_MASK && src[3] >= 1.0 {
                    // Opaque and fully covered, exact replacement.
                    *pixel = image::Rgba(color.to_rgba8());
                    continue;
                }
                let coverage = bits.count_ones() as f32 / SAMPLES.len() as f32 * src[3];
                let image::Rgba(dst) = *pixel;
                let blend = |s: f32, d: u8| {
                    let d = f32::from(d) / 255.0;
                    az::saturating_cast::<f32, u8>(((s * coverage + d * (1.0 - coverage)) * 255.0).round())
                };
                let alpha = {
                    let d = f32::from(dst[3]) / 255.0;
                    az::saturating_cast::<f32, u8>(((coverage + d * (1.0 - coverage)) * 255.0).round())
                };
                *pixel = image::Rgba([
                    blend(src[0], dst[0]),
                    blend(src[1], dst[1]),
                    blend(src[2], dst[2]),
                    alpha,
                ]);
            }
        }
    }
}

/// Twice the signed area of `abp`. Sign tells which side of `ab` the point `p` is on.
fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Half-open pixel rectangle, clipped to the target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
struct PixelRect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}
impl PixelRect {
    fn covering(min: [f32; 2], max: [f32; 2], size: u32) -> Self {
        let lo = |v: f32| az::saturating_cast::<f32, u32>(v.floor()).min(size);
        let hi = |v: f32| az::saturating_cast::<f32, u32>(v.ceil()).min(size);
        Self {
            x0: lo(min[0]),
            y0: lo(min[1]),
            x1: hi(max[0]),
            y1: hi(max[1]),
        }
    }
    fn intersect(self, other: Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }
    fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
    fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0) as usize
    }
    fn area(&self) -> usize {
        self.width() * self.y1.saturating_sub(self.y0) as usize
    }
    fn index(&self, px: u32, py: u32) -> usize {
        (py - self.y0) as usize * self.width() + (px - self.x0) as usize
    }
}
