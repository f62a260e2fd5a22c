//! Colors as the canvas stores them, and their `#RRGGBB` text form.

use crate::util::{FiniteF32, FiniteF32Error};

/// A straight-alpha sRGB color, channels in `[0, 1]`.
///
/// Canvas colors are expected to be opaque, but alpha is carried so that the hex form round-trips.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    bytemuck::Zeroable,
    Debug,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    /// Create from straight channels. Values are clamped to `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        let channel = |v: f32| FiniteF32::new(v).map(|v| FiniteF32::clamped(v.get(), 0.0, 1.0));
        Ok(Self([channel(r)?, channel(g)?, channel(b)?, channel(a)?]))
    }
    #[must_use]
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        let channel = |v: u8| FiniteF32::clamped(f32::from(v) / 255.0, 0.0, 1.0);
        Self([channel(r), channel(g), channel(b), channel(a)])
    }
    #[must_use]
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::from_rgba8([r, g, b, 255])
    }
    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(ColorParseError::BadDigit);
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::BadDigit);
        match digits.len() {
            3 => {
                // Each nibble doubles: #F80 -> #FF8800
                let mut rgb = [0u8; 3];
                for (out, i) in rgb.iter_mut().zip(0..3) {
                    let nibble = byte(&digits[i..=i])?;
                    *out = nibble << 4 | nibble;
                }
                Ok(Self::from_rgb8(rgb))
            }
            6 => Ok(Self::from_rgb8([
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            ])),
            8 => Ok(Self::from_rgba8([
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            ])),
            _ => Err(ColorParseError::BadLength),
        }
    }
    /// Quantize to 8 bits per channel.
    #[must_use]
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.as_array().map(|c| {
            // In range by construction, saturating just in case of rounding past 255.
            az::saturating_cast::<f32, u8>((c * 255.0).round())
        })
    }
    /// `#RRGGBB`, or `#RRGGBBAA` if not fully opaque.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.0[3] == FiniteF32::ONE
    }
    /// Drop any translucency.
    #[must_use]
    pub fn opaque(self) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, FiniteF32::ONE])
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
impl TryFrom<String> for Color {
    type Error = ColorParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}
impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}
// Safety: FiniteF32 is NoUninit, arrays have no uninit bytes of their own.
unsafe impl bytemuck::NoUninit for Color {}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 3, 6 or 8 hex digits")]
    BadLength,
    #[error("invalid hex digit")]
    BadDigit,
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError};
    #[test]
    fn parse_forms() {
        assert_eq!(Color::from_hex("#FFFFFF").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("000").unwrap(), Color::BLACK);
        assert_eq!(
            Color::from_hex("#f80").unwrap().to_rgba8(),
            [0xFF, 0x88, 0x00, 0xFF]
        );
        assert_eq!(
            Color::from_hex("#6B4E2E80").unwrap().to_rgba8(),
            [0x6B, 0x4E, 0x2E, 0x80]
        );
    }
    #[test]
    fn parse_errors() {
        assert_eq!(Color::from_hex("#12345"), Err(ColorParseError::BadLength));
        assert_eq!(Color::from_hex("#GGGGGG"), Err(ColorParseError::BadDigit));
        assert_eq!(Color::from_hex("#ÿÿÿ"), Err(ColorParseError::BadDigit));
    }
    #[test]
    fn hex_roundtrip_is_uppercase() {
        let pink = Color::from_hex("#ff9cb5").unwrap();
        assert_eq!(pink.to_hex(), "#FF9CB5");
        assert!(pink.is_opaque());
    }
    #[test]
    fn new_clamps() {
        let c = Color::new(2.0, -1.0, 0.5, 1.0).unwrap();
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
        assert!(Color::new(f32::NAN, 0.0, 0.0, 1.0).is_err());
    }
}
