//! Height quantization ("dithering") onto evenly spaced levels.

/// Snap `c` to the nearest of `levels` evenly spaced values in `[0, 1]`.
///
/// With `levels <= 1` the value is returned unchanged (smooth terrain). Otherwise
/// the candidates are the level at or below `c` and the one above it; the
/// closer wins and an exact tie goes to the upper level. Every result is
/// computed as `index / (levels - 1)`, so both endpoints are hit exactly.
///
/// Inputs outside `[0, 1]` are not rejected; callers normalize first.
pub fn dither(c: f64, levels: u32) -> f64 {
    if levels <= 1 {
        return c;
    }
    let intervals = f64::from(levels - 1);
    let lower = (c * intervals).floor();
    let c0 = lower / intervals;
    let c1 = (lower + 1.0) / intervals;
    if c1 - c <= c - c0 { c1 } else { c0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels_of(count: u32) -> Vec<f64> {
        (0..count).map(|i| i as f64 / (count - 1) as f64).collect()
    }

    #[test]
    fn test_single_level_is_identity() {
        for c in [0.0, 0.123456789, 0.5, 0.999, 1.0, 1.7, -0.3] {
            assert_eq!(dither(c, 1).to_bits(), c.to_bits());
        }
    }

    #[test]
    fn test_output_is_always_a_level() {
        for count in 2..=50 {
            let levels = levels_of(count);
            for i in 0..=1000 {
                let c = i as f64 / 1000.0;
                let q = dither(c, count);
                assert!(
                    levels.contains(&q),
                    "dither({c}, {count}) = {q} is not one of the {count} levels"
                );
            }
        }
    }

    #[test]
    fn test_output_is_nearest_level() {
        for count in 2..=20 {
            let half_step = 0.5 / (count - 1) as f64;
            for i in 0..=500 {
                let c = i as f64 / 500.0;
                let q = dither(c, count);
                assert!(
                    (q - c).abs() <= half_step + 1e-12,
                    "dither({c}, {count}) = {q} is more than half a step away"
                );
            }
        }
    }

    #[test]
    fn test_endpoints_are_exact() {
        for count in 2..=50 {
            assert_eq!(dither(0.0, count), 0.0);
            assert_eq!(dither(1.0, count), 1.0);
        }
    }

    #[test]
    fn test_tie_prefers_upper_level() {
        assert_eq!(dither(0.25, 3), 0.5);
        assert_eq!(dither(0.75, 3), 1.0);
        assert_eq!(dither(0.5, 2), 1.0);
    }

    #[test]
    fn test_value_on_a_level_stays_put() {
        assert_eq!(dither(0.5, 3), 0.5);
        assert_eq!(dither(0.25, 5), 0.25);
    }

    #[test]
    fn test_rounds_to_closer_candidate() {
        assert_eq!(dither(0.24, 3), 0.0);
        assert_eq!(dither(0.26, 3), 0.5);
        assert_eq!(dither(0.1, 11), 0.1);
    }

    #[test]
    fn test_zero_levels_behaves_like_one() {
        assert_eq!(dither(0.37, 0), 0.37);
    }
}
