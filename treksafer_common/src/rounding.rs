//! `f64::round` already rounds half away from zero, which is what
//! distance-formatting needs: `round(km * 10) / 10`, not a banker's-rounding
//! `round(km, 1)` that misbehaves at `.x5` boundaries.

/// Round `value` to `decimals` fractional digits using round-half-away-from-zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_up_not_banker() {
        // 9.95 rounded to 1 decimal is 10.0 under round-half-away-from-zero,
        // not 9.9 as Python's `round(9.95, 1)` would (binary fp quirk aside).
        assert_eq!(round_to(9.95, 1), 10.0);
        assert_eq!(round_to(9.94, 1), 9.9);
    }
}
