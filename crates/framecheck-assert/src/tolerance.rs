//! Numeric tolerances.
//!
//! Approximate mode rounds the absolute difference to 7 decimal places and
//! requires zero, matching recorded expectations produced that way. Loose mode
//! uses a relative/absolute bound instead.

use framecheck_core::types::Scalar;

pub const ALMOST_PLACES: i32 = 7;
pub const LOOSE_RTOL: f64 = 1e-5;
pub const LOOSE_ATOL: f64 = 1e-8;

/// `round(|a - b|, places) == 0`. Halfway rounds to even, so exactly half a
/// unit in the last place still counts as zero.
pub fn round_diff_is_zero(a: f64, b: f64, places: i32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff.is_finite() && diff * 10f64.powi(places) <= 0.5
}

pub fn almost_equal_f64(a: f64, b: f64) -> bool {
    round_diff_is_zero(a, b, ALMOST_PLACES)
}

/// `|a - b| <= atol + rtol * |b|`.
pub fn loose_equal_f64(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff.is_finite() && diff <= LOOSE_ATOL + LOOSE_RTOL * b.abs()
}

/// Non-null cells in approximate mode: numeric pairs use the 7-place rule,
/// everything else must be exactly equal. Two integers differ by a whole
/// number, so they pass only when equal.
pub fn almost_equal(a: &Scalar, b: &Scalar) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => almost_equal_f64(x, y),
        _ => a.value_eq(b),
    }
}

pub fn loose_equal(a: &Scalar, b: &Scalar) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        let diff = (i128::from(x) - i128::from(y)).unsigned_abs();
        return diff == 0 || (diff as f64) <= LOOSE_ATOL + LOOSE_RTOL * (y as f64).abs();
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => loose_equal_f64(x, y),
        _ => a.value_eq(b),
    }
}

/// Cell equality where two null markers are equal.
pub fn cell_equal(a: &Scalar, b: &Scalar, check_exact: bool) -> bool {
    match (a.is_null(), b.is_null()) {
        (true, true) => true,
        (false, false) if check_exact => a.value_eq(b),
        (false, false) => loose_equal(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_places() {
        assert!(almost_equal_f64(1.00000001, 1.00000002));
        assert!(almost_equal_f64(0.0, 4e-8));
        assert!(!almost_equal_f64(0.0, 6e-8));
        assert!(!almost_equal_f64(1.0, 1.000001));
        assert!(almost_equal_f64(f64::INFINITY, f64::INFINITY));
        assert!(!almost_equal_f64(f64::INFINITY, 1.0));
    }

    #[test]
    fn loose_is_relative() {
        assert!(loose_equal_f64(100000.0, 100000.5));
        assert!(!loose_equal_f64(1.0, 1.001));
    }

    #[test]
    fn non_numeric_needs_exact_match() {
        assert!(almost_equal(&Scalar::from("a"), &Scalar::from("a")));
        assert!(!almost_equal(&Scalar::from("a"), &Scalar::from("b")));
        assert!(almost_equal(&Scalar::I64(1), &Scalar::F64(1.00000001)));
    }

    #[test]
    fn large_integers_are_not_rounded_through_f64() {
        let big = 1i64 << 53;
        assert!(!almost_equal(&Scalar::I64(big + 1), &Scalar::I64(big)));
        assert!(almost_equal(&Scalar::I64(big), &Scalar::I64(big)));
        assert!(!cell_equal(&Scalar::I64(big + 1), &Scalar::I64(big), true));
        assert!(loose_equal(&Scalar::I64(i64::MAX), &Scalar::I64(i64::MAX)));
        assert!(!loose_equal(&Scalar::I64(3), &Scalar::I64(4)));
    }

    #[test]
    fn nulls_match_only_nulls() {
        assert!(cell_equal(&Scalar::Null, &Scalar::F64(f64::NAN), true));
        assert!(!cell_equal(&Scalar::Null, &Scalar::I64(0), true));
        assert!(cell_equal(&Scalar::F64(1.0), &Scalar::F64(1.0 + 1e-9), false));
        assert!(!cell_equal(&Scalar::F64(1.0), &Scalar::F64(1.0 + 1e-9), true));
    }
}
