//! Value parsing and the rounding rule used for averages.
//!
//! Measurements always carry exactly one fractional digit (`-?\d+\.\d`), which
//! lets the hot path skip general float parsing entirely.

use crate::error::{BrcError, Result};

/// Longest integer part accepted. Keeps the tenths accumulator below 2^53 so the
/// final division is the only rounding step.
pub const MAX_INT_DIGITS: usize = 14;

/// Parses a value known to match `-?\d+\.\d`.
///
/// Digits are folded into an integer count of tenths and divided once, so the
/// result is bit-identical to `str::parse::<f64>` for well-formed input. Malformed
/// input produces an unspecified number but never panics.
#[inline]
pub fn parse_value_fast(bytes: &[u8]) -> f64 {
    let (negative, digits) = match bytes {
        [b'-', rest @ ..] => (true, rest),
        _ => (false, bytes),
    };
    let Some((&frac, rest)) = digits.split_last() else {
        return 0.0;
    };
    // skip the '.'
    let int_part = rest.split_last().map_or(&[][..], |(_, int)| int);

    let tenths = int_part
        .iter()
        .fold(0i64, |acc, &b| {
            acc.wrapping_mul(10)
                .wrapping_add(i64::from(b.wrapping_sub(b'0')))
        })
        .wrapping_mul(10)
        .wrapping_add(i64::from(frac.wrapping_sub(b'0')));

    let value = tenths as f64 / 10.0;
    if negative {
        -value
    } else {
        value
    }
}

/// Whether `bytes` has the `-?\d+\.\d` shape the fast path expects.
pub fn is_well_formed(bytes: &[u8]) -> bool {
    let digits = match bytes {
        [b'-', rest @ ..] => rest,
        _ => bytes,
    };
    match digits {
        [int @ .., b'.', frac] => {
            !int.is_empty()
                && int.len() <= MAX_INT_DIGITS
                && int.iter().all(u8::is_ascii_digit)
                && frac.is_ascii_digit()
        }
        _ => false,
    }
}

/// Validating entry point: checks the shape, then takes the fast path.
pub fn parse_value(bytes: &[u8]) -> Result<f64> {
    if is_well_formed(bytes) {
        Ok(parse_value_fast(bytes))
    } else {
        Err(BrcError::malformed(b"", bytes))
    }
}

/// Rounds to one decimal with halves going up: `floor((x + 0.05) * 10) / 10`.
///
/// This is not `f64::round` on tenths; `2.25` becomes `2.3` and `-1.25` becomes `-1.2`.
#[inline]
pub fn round_tenth(x: f64) -> f64 {
    ((x + 0.05) * 10.0).floor() / 10.0
}
