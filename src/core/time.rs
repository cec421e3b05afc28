//! Frame-time helpers.
//!
//! Every timer in the run counts down by caller-supplied frame deltas, so
//! bad input is clamped here once instead of at each call site.

/// Clamp a frame delta to a usable value: non-finite or non-positive
/// deltas become `0.0`.
#[inline]
pub fn sanitize_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_delta_passes_through() {
        assert_eq!(sanitize_delta(16.5), 16.5);
        assert_eq!(sanitize_delta(f64::MIN_POSITIVE), f64::MIN_POSITIVE);
    }

    #[test]
    fn test_bad_deltas_become_zero() {
        for delta in [0.0, -0.0, -16.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(sanitize_delta(delta), 0.0, "delta {delta}");
        }
    }
}
