//! # Brush
//!
//! The user-facing drawing settings, and their resolution into the frozen style a stroke carries.

use crate::{color::Color, util::FiniteF32};

/// Line thickness in canvas units. Always finite and at least [`BrushWidth::MIN`].
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "f32", into = "f32")]
pub struct BrushWidth(FiniteF32);
impl BrushWidth {
    pub const MIN: f32 = 1.0;
    /// Hard cap, to keep a fat-fingered config from tessellating the whole canvas per point.
    pub const MAX: f32 = 512.0;
    /// Clamp into `[MIN, MAX]`. Non-finite widths become `MIN`.
    #[must_use]
    pub fn new(width: f32) -> Self {
        Self(FiniteF32::clamped(width, Self::MIN, Self::MAX))
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0.get()
    }
    /// Scale by `factor`, re-clamping.
    #[must_use = "returns a new width without modifying `self`"]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.get() * factor)
    }
}
impl Default for BrushWidth {
    fn default() -> Self {
        Self::new(8.0)
    }
}
impl From<f32> for BrushWidth {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}
impl From<BrushWidth> for f32 {
    fn from(value: BrushWidth) -> Self {
        value.get()
    }
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    strum::AsRefStr,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Draw in the selected color.
    #[default]
    Brush,
    /// Draw in the canvas background color.
    Eraser,
}

/// How wide the eraser is relative to the selected brush width.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EraserWidth {
    #[default]
    Equal,
    Doubled,
}
impl EraserWidth {
    #[must_use]
    pub fn factor(self) -> f32 {
        match self {
            Self::Equal => 1.0,
            Self::Doubled => 2.0,
        }
    }
}

/// The currently selected drawing settings. These may change freely between strokes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BrushSettings {
    pub color: Color,
    pub width: BrushWidth,
    pub tool: Tool,
}
impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            width: BrushWidth::default(),
            tool: Tool::Brush,
        }
    }
}
impl BrushSettings {
    /// Freeze these settings into the style of a new stroke.
    #[must_use]
    pub fn resolve(&self, background: Color, eraser: EraserWidth) -> StrokeStyle {
        match self.tool {
            Tool::Brush => StrokeStyle {
                color: self.color.opaque(),
                width: self.width,
            },
            Tool::Eraser => StrokeStyle {
                color: background.opaque(),
                width: self.width.scaled(eraser.factor()),
            },
        }
    }
}

/// The immutable appearance of a single stroke.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: BrushWidth,
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn width_is_clamped() {
        assert_eq!(BrushWidth::new(0.0).get(), 1.0);
        assert_eq!(BrushWidth::new(-5.0).get(), 1.0);
        assert_eq!(BrushWidth::new(f32::NAN).get(), 1.0);
        assert_eq!(BrushWidth::new(16.0).get(), 16.0);
        assert_eq!(BrushWidth::new(1.0e9).get(), BrushWidth::MAX);
    }
    #[test]
    fn eraser_uses_background() {
        let settings = BrushSettings {
            color: Color::from_hex("#FF9CB5").unwrap(),
            width: BrushWidth::new(8.0),
            tool: Tool::Eraser,
        };
        let equal = settings.resolve(Color::BLACK, EraserWidth::Equal);
        assert_eq!(equal.color, Color::BLACK);
        assert_eq!(equal.width.get(), 8.0);

        let doubled = settings.resolve(Color::BLACK, EraserWidth::Doubled);
        assert_eq!(doubled.width.get(), 16.0);
    }
    #[test]
    fn brush_ignores_eraser_policy() {
        let settings = BrushSettings {
            tool: Tool::Brush,
            ..Default::default()
        };
        let style = settings.resolve(Color::BLACK, EraserWidth::Doubled);
        assert_eq!(style.color, Color::WHITE);
        assert_eq!(style.width, settings.width);
    }
    #[test]
    fn tool_names() {
        assert_eq!(Tool::Eraser.as_ref(), "Eraser");
        assert_eq!(<Tool as strum::IntoEnumIterator>::iter().count(), 2);
    }
}
