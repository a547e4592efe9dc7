use num::{Float, NumCast};

/// Log of a normal density without the constant `-0.5*ln(2*pi)` term
///
pub fn unscaled_ln_normal<F: Float>(x: F, mu: F, sigma: F) -> F {
    let diff = (x - mu) / sigma;
    let half: F = NumCast::from(0.5).unwrap();
    -half * diff * diff - sigma.ln()
}

/// Index of the largest value, or None for empty input
///
/// Ties resolve to the lowest index.
///
pub fn max_index<F: Float>(x: &[F]) -> Option<usize> {
    let mut max_index = None;
    let mut max_val = F::neg_infinity();
    for (index, &val) in x.iter().enumerate() {
        if max_index.is_none() || val > max_val {
            max_val = val;
            max_index = Some(index);
        }
    }
    max_index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscaled_ln_normal() {
        approx::assert_ulps_eq!(unscaled_ln_normal(2.0f64, 2.0, 1.0), 0.0, max_ulps = 4);
        approx::assert_ulps_eq!(unscaled_ln_normal(3.0f64, 2.0, 0.5), -2.0 - 0.5f64.ln(), max_ulps = 4);
        approx::assert_ulps_eq!(unscaled_ln_normal(1.0f32, 2.0, 0.5), -2.0 - 0.5f32.ln(), max_ulps = 4);
    }

    #[test]
    fn test_max_index() {
        assert_eq!(max_index::<f64>(&[]), None);
        assert_eq!(max_index(&[0.1, 0.3, 0.3, 0.2]), Some(1));
        assert_eq!(max_index(&[f64::NEG_INFINITY]), Some(0));
    }
}
