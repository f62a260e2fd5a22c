//! The colors and brush sizes offered to the user.

use crate::{brush::BrushWidth, color::Color};

/// Brush sizes offered, in canvas units.
pub const BRUSH_SIZES: [f32; 3] = [4.0, 8.0, 16.0];
pub const DEFAULT_BRUSH_SIZE: f32 = 8.0;

/// A named palette entry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Swatch {
    pub name: &'static str,
    pub color: Color,
}

const BASE: [(&str, [u8; 3]); 6] = [
    ("black", [0x00, 0x00, 0x00]),
    ("white", [0xFF, 0xFF, 0xFF]),
    ("grey", [0x88, 0x88, 0x88]),
    ("brown", [0x6B, 0x4E, 0x2E]),
    ("pink", [0xFF, 0x9C, 0xB5]),
    ("mutedYellow", [0xD9, 0xC3, 0x6A]),
];
/// The purchasable cosmetic color.
pub const BLOOD_RED: [u8; 3] = [0x8B, 0x00, 0x00];

#[derive(Clone, Debug)]
pub struct Palette {
    swatches: Vec<Swatch>,
}
impl Default for Palette {
    fn default() -> Self {
        Self::new(false)
    }
}
impl Palette {
    /// Build the palette, including blood red only if `blood_red` is held.
    #[must_use]
    pub fn new(blood_red: bool) -> Self {
        let mut swatches: Vec<Swatch> = BASE
            .iter()
            .map(|&(name, rgb)| Swatch {
                name,
                color: Color::from_rgb8(rgb),
            })
            .collect();
        if blood_red {
            swatches.push(Swatch {
                name: "bloodRed",
                color: Color::from_rgb8(BLOOD_RED),
            });
        }
        Self { swatches }
    }
    pub fn iter(&self) -> impl Iterator<Item = &Swatch> {
        self.swatches.iter()
    }
    #[must_use]
    pub fn contains(&self, color: Color) -> bool {
        self.swatches.iter().any(|swatch| swatch.color == color)
    }
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Color> {
        self.swatches
            .iter()
            .find(|swatch| swatch.name == name)
            .map(|swatch| swatch.color)
    }
    /// Keep `color` if offered, otherwise fall back to white.
    #[must_use]
    pub fn sanitize(&self, color: Color) -> Color {
        if self.contains(color) {
            color
        } else {
            log::debug!("{color} is not in the palette, falling back to white");
            Color::WHITE
        }
    }
    /// Snap `width` to the nearest offered brush size.
    #[must_use]
    pub fn nearest_size(width: BrushWidth) -> BrushWidth {
        let width = width.get();
        let nearest = BRUSH_SIZES
            .iter()
            .copied()
            .min_by(|a, b| (a - width).abs().total_cmp(&(b - width).abs()))
            .unwrap_or(DEFAULT_BRUSH_SIZE);
        BrushWidth::new(nearest)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn base_palette_order() {
        let names: Vec<_> = Palette::new(false).iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            ["black", "white", "grey", "brown", "pink", "mutedYellow"]
        );
    }
    #[test]
    fn entitlement_adds_blood_red() {
        let red = Color::from_hex("#8B0000").unwrap();
        assert!(!Palette::new(false).contains(red));
        let palette = Palette::new(true);
        assert!(palette.contains(red));
        assert_eq!(palette.by_name("bloodRed"), Some(red));
    }
    #[test]
    fn sanitize_falls_back_to_white() {
        let red = Color::from_hex("#8B0000").unwrap();
        assert_eq!(Palette::new(false).sanitize(red), Color::WHITE);
        assert_eq!(Palette::new(true).sanitize(red), red);
    }
    #[test]
    fn sizes_snap() {
        assert_eq!(Palette::nearest_size(BrushWidth::new(5.0)).get(), 4.0);
        assert_eq!(Palette::nearest_size(BrushWidth::new(13.0)).get(), 16.0);
    }
}
