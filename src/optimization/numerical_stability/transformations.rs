//! Numerical stability utilities.
//!
//! Provides safe implementations of the sigmoid transforms used by the
//! psychometric model. The naïve `1 / (1 + exp(-z))` overflows `exp` for
//! large negative `z`; the guarded form below only ever exponentiates a
//! non-positive argument.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: relative eigenvalue floor for pseudo-inverses.
//! - [`safe_logistic(z)`]: stable `1 / (1 + exp(-z))`.
//! - [`logit(p)`]: `ln(p / (1 - p))` on the open unit interval.

/// Relative eigenvalue floor for information matrices.
///
/// An eigenvalue `λ` with `λ <= EIGEN_EPS * λ_max` is treated as zero, which
/// marks the matrix as singular for covariance purposes.
pub const EIGEN_EPS: f64 = 1e-12;

/// Numerically stable logistic: `σ(z) = 1 / (1 + exp(-z))`.
///
/// - For `z >= 0`, evaluates `1 / (1 + exp(-z))` directly (`exp(-z) <= 1`).
/// - For `z < 0`, evaluates `exp(z) / (1 + exp(z))` (`exp(z) < 1`).
///
/// Both branches stay finite for every finite `z`; `NaN` propagates.
pub fn safe_logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Log-odds `ln(p / (1 - p))`.
///
/// Returns `NaN` unless `0 < p < 1`; callers decide how to surface that.
pub fn logit(p: f64) -> f64 {
    if p > 0.0 && p < 1.0 { (p / (1.0 - p)).ln() } else { f64::NAN }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of `safe_logistic` with the naïve formula on a safe grid.
    // - Tail behavior and symmetry of `safe_logistic`.
    // - `logit` as the inverse of `safe_logistic`, and its domain guard.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that the guarded logistic matches the textbook formula where the
    // latter is well-conditioned.
    //
    // Given
    // -----
    // - z on a grid in [-10, 10].
    //
    // Expect
    // ------
    // - Relative agreement to 1e-12.
    fn safe_logistic_matches_naive_formula_on_safe_grid() {
        for i in -20..=20 {
            let z = i as f64 * 0.5;
            let naive = 1.0 / (1.0 + (-z).exp());
            assert_relative_eq!(safe_logistic(z), naive, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure the logistic saturates without producing NaN or infinities and is
    // symmetric around zero.
    //
    // Given
    // -----
    // - Extreme arguments ±1e4 and a symmetric pair ±3.
    //
    // Expect
    // ------
    // - σ(1e4) == 1, σ(-1e4) == 0 (finite), σ(z) + σ(-z) == 1.
    fn safe_logistic_saturates_and_is_symmetric() {
        assert_eq!(safe_logistic(1e4), 1.0);
        assert_eq!(safe_logistic(-1e4), 0.0);
        assert_relative_eq!(safe_logistic(3.0) + safe_logistic(-3.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `logit` inverts `safe_logistic` and rejects the closed
    // endpoints.
    //
    // Given
    // -----
    // - Probabilities 0.1, 0.5, 0.8 and the endpoints 0, 1.
    //
    // Expect
    // ------
    // - σ(logit(p)) == p within 1e-12; logit(0) and logit(1) are NaN.
    fn logit_inverts_logistic_and_guards_endpoints() {
        for &p in &[0.1, 0.5, 0.8] {
            assert_relative_eq!(safe_logistic(logit(p)), p, epsilon = 1e-12);
        }
        assert_eq!(logit(0.5), 0.0);
        assert!(logit(0.0).is_nan());
        assert!(logit(1.0).is_nan());
    }
}
