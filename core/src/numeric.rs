//! Parse-and-clamp coercion for user-entered integers.
//!
//! Quantities and page numbers arrive from text inputs, button arithmetic and
//! URL parameters. All of them go through the same rules:
//!
//! - Text is read like a browser `parseInt`: optional leading whitespace, an
//!   optional sign, then as many decimal digits as follow. `"12abc"` is `12`,
//!   `"abc"` is not a number.
//! - Not-a-number falls back to the lower bound.
//! - Numbers outside the range are pulled to the nearest bound.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Result of coercing an input into a bounded range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coerced {
    /// The value after clamping
    pub value: u32,
    /// `true` if the input was out of range or not a number
    pub adjusted: bool,
}

impl Coerced {
    /// A value that needed no correction
    #[must_use]
    pub const fn exact(value: u32) -> Self {
        Self {
            value,
            adjusted: false,
        }
    }
}

/// Reads the leading integer of `input` the way `parseInt(input, 10)` does
///
/// Values too large for `i64` saturate.
#[must_use]
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut magnitude: i64 = 0;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -magnitude } else { magnitude })
}

/// Clamps `value` into `range`
#[must_use]
pub fn clamp(value: i64, range: &RangeInclusive<u32>) -> Coerced {
    let (min, max) = (i64::from(*range.start()), i64::from(*range.end()));
    if value < min {
        Coerced {
            value: *range.start(),
            adjusted: true,
        }
    } else if value > max {
        Coerced {
            value: *range.end(),
            adjusted: true,
        }
    } else {
        // In range, so it fits in u32
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Coerced::exact(value as u32)
    }
}

/// Parses `input` and clamps the result into `range`
///
/// Non-numeric input coerces to the lower bound.
#[must_use]
pub fn parse_clamped(input: &str, range: &RangeInclusive<u32>) -> Coerced {
    match parse_leading_int(input) {
        Some(value) => clamp(value, range),
        None => Coerced {
            value: *range.start(),
            adjusted: true,
        },
    }
}
