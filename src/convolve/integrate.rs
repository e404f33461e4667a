//! Numerical primitives shared by both convolution strategies.

/// Trapezoidal integral of `y` over the sample points `x`.
///
/// Fewer than two samples integrate to `0.0`.
pub fn trapz(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) * 0.5)
        .sum()
}

/// SRF-weighted mean of `values`: `∫ values·weights / ∫ weights` over `x`.
///
/// A zero weight integral yields `0.0` instead of a division error.
pub fn weighted_mean(x: &[f64], values: &[f64], weights: &[f64]) -> f64 {
    let products: Vec<f64> = values.iter().zip(weights).map(|(v, w)| v * w).collect();
    ratio_of_integrals(x, &products, weights)
}

/// `∫ numerator / ∫ denominator` over `x`, `0.0` when the denominator
/// integral is zero.
pub fn ratio_of_integrals(x: &[f64], numerator: &[f64], denominator: &[f64]) -> f64 {
    let den = trapz(x, denominator);
    if den == 0.0 {
        return 0.0;
    }
    trapz(x, numerator) / den
}

/// Piecewise-linear interpolation of `(xp, fp)` at each point of `x`.
///
/// Points outside `xp` take the nearest end value. `xp` must be increasing
/// and non-empty.
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xp.len(), fp.len());
    debug_assert!(!xp.is_empty());
    let last = xp.len() - 1;
    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return fp[0];
            }
            if xi >= xp[last] {
                return fp[last];
            }
            // xp[hi - 1] < xi < xp[hi]
            let hi = xp.partition_point(|&v| v <= xi);
            let lo = hi - 1;
            if xp[lo] == xi {
                return fp[lo];
            }
            let t = (xi - xp[lo]) / (xp[hi] - xp[lo]);
            fp[lo] + t * (fp[hi] - fp[lo])
        })
        .collect()
}
