//! Unsigned fixed-point arithmetic
//!
//! Every index the datapath derives from a ratio goes through the same
//! three rounding primitives defined here. They operate on the raw bit
//! pattern exactly like fixed-point hardware does:
//!
//! - `floor` clears the fraction bits
//! - `ceil` adds an all-ones fraction, then clears the fraction bits
//! - `round` adds one half, then clears the fraction bits
//!
//! Results wrap modulo `2^TOTAL`, and re-quantising a wider intermediate
//! into a narrower format truncates. Stages that must agree on a row or
//! column index compute it with the same format and the same primitive,
//! so they agree bit for bit.

use std::fmt;

/// Integer bits used for row/column coordinates (max dimension 65535).
pub const INDEX_INT_BITS: u32 = 16;
/// Fraction bits used for row/column coordinates.
pub const INDEX_FRAC_BITS: u32 = 8;

/// Unsigned fixed-point value with `TOTAL` bits, `INT` of them integer bits.
///
/// The value is `raw / 2^(TOTAL - INT)`. `TOTAL` must not exceed 64 and
/// `INT` must not exceed `TOTAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UFixed<const TOTAL: u32, const INT: u32> {
    raw: u64,
}

/// Q2.14: the configuration format of `scale` and `inv_scale`.
pub type ScaleFixed = UFixed<16, 2>;

/// Row/column coordinate format shared by every stage.
pub type IndexFixed = UFixed<{ INDEX_INT_BITS + INDEX_FRAC_BITS }, INDEX_INT_BITS>;

/// Interpolated intensity format (10 integer bits, 2 fraction bits).
pub type PixelFixed = UFixed<12, 10>;

impl<const TOTAL: u32, const INT: u32> UFixed<TOTAL, INT> {
    /// Number of fraction bits.
    pub const FRAC_BITS: u32 = TOTAL - INT;

    const MASK: u64 = if TOTAL >= 64 {
        u64::MAX
    } else {
        (1u64 << TOTAL) - 1
    };

    const FRAC_MASK: u64 = (1u64 << Self::FRAC_BITS) - 1;

    /// Zero.
    pub const ZERO: Self = Self { raw: 0 };

    /// One (zero if the format has no integer bits).
    pub const ONE: Self = Self::from_raw(1u64 << Self::FRAC_BITS);

    /// Build from a raw bit pattern, wrapping to `TOTAL` bits.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            raw: raw & Self::MASK,
        }
    }

    /// Build from an integer, wrapping to `INT` integer bits.
    #[inline]
    pub const fn from_int(value: u64) -> Self {
        Self::from_raw(value << Self::FRAC_BITS)
    }

    /// Nearest representable value to `value`; negative input maps to zero.
    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * (1u64 << Self::FRAC_BITS) as f64).round();
        if scaled <= 0.0 {
            Self::ZERO
        } else {
            Self::from_raw(scaled as u64)
        }
    }

    /// Raw bit pattern.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.raw
    }

    /// Integer part (the fraction is truncated).
    #[inline]
    pub const fn to_int(self) -> u64 {
        self.raw >> Self::FRAC_BITS
    }

    /// Approximate value, for diagnostics and reference comparisons.
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / (1u64 << Self::FRAC_BITS) as f64
    }

    /// True when no fraction bits are set.
    #[inline]
    pub const fn is_integer(self) -> bool {
        self.raw & Self::FRAC_MASK == 0
    }

    /// Truncate the fraction.
    #[inline]
    pub const fn floor(self) -> Self {
        Self::from_raw(self.raw & !Self::FRAC_MASK)
    }

    /// Smallest integer not below `self`, wrapping at the top of the range.
    #[inline]
    pub const fn ceil(self) -> Self {
        Self::from_raw(self.raw.wrapping_add(Self::FRAC_MASK) & !Self::FRAC_MASK)
    }

    /// Round half up, wrapping at the top of the range.
    #[inline]
    pub const fn round(self) -> Self {
        if Self::FRAC_BITS == 0 {
            return self;
        }
        let half = 1u64 << (Self::FRAC_BITS - 1);
        Self::from_raw(self.raw.wrapping_add(half) & !Self::FRAC_MASK)
    }

    /// Multiply by a value of any fixed-point format.
    ///
    /// The product is exact before it is re-quantised into `Self` by
    /// truncating the surplus fraction bits and wrapping the integer part.
    #[inline]
    pub fn mul<const T2: u32, const I2: u32>(self, rhs: UFixed<T2, I2>) -> Self {
        let product = u128::from(self.raw) * u128::from(rhs.raw());
        Self::from_raw((product >> UFixed::<T2, I2>::FRAC_BITS) as u64)
    }

    /// Quotient `numer / divisor`, truncated into `Self`.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero. A zero scale factor is a configuration
    /// contract violation.
    pub fn div_int<const T2: u32, const I2: u32>(numer: u64, divisor: UFixed<T2, I2>) -> Self {
        let shift = Self::FRAC_BITS + UFixed::<T2, I2>::FRAC_BITS;
        let scaled = u128::from(numer) << shift;
        Self::from_raw((scaled / u128::from(divisor.raw())) as u64)
    }

    /// Divide by a positive integer, keeping the fraction bits.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    #[inline]
    pub const fn div_by(self, divisor: u64) -> Self {
        Self::from_raw(self.raw / divisor)
    }
}

impl<const TOTAL: u32, const INT: u32> fmt::Display for UFixed<TOTAL, INT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

/// Ceiling of `index * factor` in coordinate format, as an integer.
///
/// This is the row/column boundary test shared by the interpolator and
/// the selector.
#[inline]
pub fn ceil_scaled(index: u64, factor: ScaleFixed) -> u64 {
    IndexFixed::from_int(index).mul(factor).ceil().to_int()
}

#[cfg(test)]
mod tests {
    use super::*;

    type Q8 = UFixed<16, 8>;

    #[test]
    fn test_floor_clears_fraction() {
        assert_eq!(Q8::from_f64(2.5).floor(), Q8::from_int(2));
        assert_eq!(Q8::from_f64(2.99).floor(), Q8::from_int(2));
        assert_eq!(Q8::from_int(7).floor(), Q8::from_int(7));
    }

    #[test]
    fn test_ceil_only_moves_fractional_values() {
        assert_eq!(Q8::from_f64(2.25).ceil(), Q8::from_int(3));
        assert_eq!(Q8::from_raw(2 * 256 + 1).ceil(), Q8::from_int(3));
        assert_eq!(Q8::from_int(3).ceil(), Q8::from_int(3));
        assert_eq!(Q8::ZERO.ceil(), Q8::ZERO);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Q8::from_f64(2.5).round(), Q8::from_int(3));
        assert_eq!(Q8::from_f64(2.49).round(), Q8::from_int(2));
        assert_eq!(PixelFixed::from_raw(0b11).round().to_int(), 1);
        assert_eq!(PixelFixed::from_raw(0b01).round().to_int(), 0);
    }

    #[test]
    fn test_ceil_wraps_at_top_of_range() {
        let near_max = ScaleFixed::from_raw(0xFFFF);
        assert_eq!(near_max.ceil(), ScaleFixed::ZERO);
    }

    #[test]
    fn test_from_int_wraps_integer_bits() {
        assert_eq!(UFixed::<8, 4>::from_int(17).to_int(), 1);
    }

    #[test]
    fn test_mul_truncates_into_target_format() {
        // 2/3 in Q2.14 is slightly above the true value
        let inv = ScaleFixed::from_raw(10923);
        let p = IndexFixed::from_int(3).mul(inv);
        // exact product is 2.00006..., 8 fraction bits keep exactly 2.0
        assert_eq!(p, IndexFixed::from_int(2));
        assert!(p.is_integer());

        let q = IndexFixed::from_int(4).mul(inv);
        assert_eq!(q.floor().to_int(), 2);
        assert_eq!(q.ceil().to_int(), 3);
    }

    #[test]
    fn test_div_int_truncates() {
        let step = ScaleFixed::from_f64(1.5);
        let q = IndexFixed::div_int(8, step);
        assert_eq!(q.floor().to_int(), 5);
        assert!(!q.is_integer());

        let two = ScaleFixed::from_int(2);
        assert_eq!(IndexFixed::div_int(640, two), IndexFixed::from_int(320));
    }

    #[test]
    fn test_div_by_integer_then_ceil() {
        let w = IndexFixed::from_int(33);
        assert_eq!(w.div_by(16).ceil().to_int(), 3);
        let w = IndexFixed::from_int(32);
        assert_eq!(w.div_by(16).ceil().to_int(), 2);
    }

    #[test]
    fn test_ceil_scaled() {
        let half = ScaleFixed::from_f64(0.5);
        assert_eq!(ceil_scaled(0, half), 0);
        assert_eq!(ceil_scaled(1, half), 1);
        assert_eq!(ceil_scaled(2, half), 1);
        assert_eq!(ceil_scaled(3, half), 2);
    }

    #[test]
    fn test_scale_constants() {
        assert_eq!(ScaleFixed::FRAC_BITS, 14);
        assert_eq!(ScaleFixed::ONE.raw(), 1 << 14);
        assert_eq!(IndexFixed::FRAC_BITS, INDEX_FRAC_BITS);
        assert_eq!(PixelFixed::FRAC_BITS, 2);
    }
}
