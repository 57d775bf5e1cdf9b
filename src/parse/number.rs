//! Integer and float parsing with per-width range checks.
//!
//! One generic routine per family: integers are parsed in base 10 into an
//! `i128` and checked against the bounds derived from the target's bit
//! width and signedness; floats are parsed as `f64` and checked against the
//! target's finite range.

use super::SettingValue;
use crate::error::ValueError;
use std::num::IntErrorKind;

/// Integer types readable from settings.
pub trait Integer: Copy {
    const BITS: u32;
    const SIGNED: bool;

    /// Narrow a value already checked against [`integer_bounds`].
    fn from_i128(n: i128) -> Self;
}

/// Inclusive `[min, max]` for an integer of the given width and signedness.
pub fn integer_bounds(bits: u32, signed: bool) -> (i128, i128) {
    if signed {
        let max = (1i128 << (bits - 1)) - 1;
        (-max - 1, max)
    } else {
        (0, (1i128 << bits) - 1)
    }
}

pub fn parse_integer<T: Integer>(value: &str) -> Result<T, ValueError> {
    let expected = if T::SIGNED {
        "integer"
    } else {
        "unsigned integer"
    };
    let (min, max) = integer_bounds(T::BITS, T::SIGNED);

    if !T::SIGNED && value.starts_with(['+', '-']) {
        return Err(ValueError::malformed(value, expected, "sign is not allowed"));
    }

    let n = value.parse::<i128>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ValueError::out_of_range(value, min, max)
        }
        _ => ValueError::malformed(value, expected, err),
    })?;

    if n < min || n > max {
        return Err(ValueError::out_of_range(n, min, max));
    }

    Ok(T::from_i128(n))
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {$(
        impl Integer for $t {
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = <$t>::MIN != 0;

            fn from_i128(n: i128) -> Self {
                n as $t
            }
        }

        impl SettingValue for $t {
            fn parse_setting(value: &str) -> Result<Self, ValueError> {
                parse_integer(value)
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Floating point types readable from settings.
pub trait Float: Copy {
    /// Largest finite value, widened to `f64`.
    const MAX: f64;

    fn from_f64(n: f64) -> Self;
}

impl Float for f32 {
    const MAX: f64 = f32::MAX as f64;

    fn from_f64(n: f64) -> Self {
        n as f32
    }
}

impl Float for f64 {
    const MAX: f64 = f64::MAX;

    fn from_f64(n: f64) -> Self {
        n
    }
}

pub fn parse_float<T: Float>(value: &str) -> Result<T, ValueError> {
    const EXPECTED: &str = "floating point number";

    let n = value
        .parse::<f64>()
        .map_err(|err| ValueError::malformed(value, EXPECTED, err))?;

    if n.is_nan() {
        return Err(ValueError::malformed(value, EXPECTED, "not a number"));
    }
    if n.is_infinite() || n.abs() > T::MAX {
        return Err(ValueError::out_of_range(
            value,
            format!("{:e}", -T::MAX),
            format!("{:e}", T::MAX),
        ));
    }

    Ok(T::from_f64(n))
}

impl SettingValue for f32 {
    fn parse_setting(value: &str) -> Result<Self, ValueError> {
        parse_float(value)
    }
}

impl SettingValue for f64 {
    fn parse_setting(value: &str) -> Result<Self, ValueError> {
        parse_float(value)
    }
}
