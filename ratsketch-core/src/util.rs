//! Small numeric helpers shared across the crate.

/// An `f32` that is never NaN nor infinite.
// Not Pod - most bitpatterns are fine, but the NaN and Inf ones break the invariant.
#[derive(Copy, Clone, PartialEq, PartialOrd, bytemuck::NoUninit, bytemuck::Zeroable, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    /// Clamp `val` into `[min, max]`, mapping non-finite input to `min`.
    /// `min` and `max` are trusted to be finite and ordered.
    #[must_use]
    pub fn clamped(val: f32, min: f32, max: f32) -> Self {
        debug_assert!(min.is_finite() && max.is_finite() && min <= max);
        if val.is_finite() {
            Self(val.clamp(min, max))
        } else {
            Self(min)
        }
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

// No NaN, so equality is reflexive.
impl Eq for FiniteF32 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for FiniteF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Never None - both sides are finite.
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}
impl std::hash::Hash for FiniteF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // -0.0 and 0.0 compare equal but differ in bits.
        let normalized = if self.0 == 0.0 { 0.0f32 } else { self.0 };
        state.write_u32(normalized.to_bits());
    }
}

#[cfg(test)]
mod test {
    use super::FiniteF32;
    #[test]
    fn rejects_nan_and_inf() {
        assert!(FiniteF32::new(f32::NAN).is_err());
        assert!(FiniteF32::new(f32::INFINITY).is_err());
        assert_eq!(FiniteF32::new(2.5).unwrap().get(), 2.5);
    }
    #[test]
    fn clamp_maps_garbage_to_min() {
        assert_eq!(FiniteF32::clamped(f32::NAN, 1.0, 10.0).get(), 1.0);
        assert_eq!(FiniteF32::clamped(0.2, 1.0, 10.0).get(), 1.0);
        assert_eq!(FiniteF32::clamped(99.0, 1.0, 10.0).get(), 10.0);
    }
}
