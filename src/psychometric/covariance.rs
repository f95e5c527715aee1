//! Parameter covariance of the least-squares logistic fit.
//!
//! Purpose
//! -------
//! Turn a fitted `θ̂ = [α̂, β̂]` into the classical nonlinear least-squares
//! covariance `Cov(θ̂) = s² (JᵀJ)⁻¹`, where `J` is the Jacobian of the
//! fitted values and `s² = SSR / (n − 2)` the residual variance.
//!
//! Key behaviors
//! -------------
//! - Build the Gauss–Newton information matrix `JᵀJ` in `ndarray`, validate
//!   it, and copy it into a `nalgebra::DMatrix` ([`fill_dmatrix`]).
//! - Invert through a symmetric eigendecomposition `JᵀJ = Q Λ Qᵀ`, so the
//!   inverse is `Q Λ⁻¹ Qᵀ`.
//! - Report [`FitFailure::SingularCovariance`] when the smallest eigenvalue
//!   is not above `EIGEN_EPS · λ_max`, and
//!   [`FitFailure::InsufficientDegreesOfFreedom`] when `n <= 2`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `θ̂` is finite (guaranteed by the optimizer outcome validation).
//! - A returned covariance is symmetric with a non-negative diagonal; it is
//!   zero only for an exact fit (`SSR = 0`).
//!
//! Testing notes
//! -------------
//! - Unit tests check the ndarray → nalgebra copy, the eigen inverse
//!   against a hand-computed 2×2 inverse, singular detection, and the
//!   degrees-of-freedom guard.
use crate::{
    optimization::{
        loglik_optimizer::{Hessian, Theta, validation::validate_hessian},
        numerical_stability::EIGEN_EPS,
    },
    psychometric::{
        aggregate::CurveData,
        errors::FitFailure,
        model::{LogisticModel, N_PARAMS},
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Covariance of `[α̂, β̂]` with the quantities it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamCovariance {
    pub matrix: Array2<f64>,
    pub residual_variance: f64,
    pub dof: usize,
}

impl ParamCovariance {
    /// `sqrt` of the diagonal: `[se(α̂), se(β̂)]`.
    pub fn std_errors(&self) -> Array1<f64> {
        self.matrix.diag().mapv(f64::sqrt)
    }
}

/// Compute `s² (JᵀJ)⁻¹` at `theta_hat`.
///
/// # Errors
/// - [`FitFailure::InsufficientDegreesOfFreedom`] when `n <= 2`.
/// - [`FitFailure::Optimizer`] wrapping an `InvalidHessian` when `JᵀJ` has
///   non-finite entries.
/// - [`FitFailure::SingularCovariance`] for a rank-deficient `JᵀJ`.
pub fn covariance(
    model: &LogisticModel, theta_hat: &Theta, data: &CurveData,
) -> Result<ParamCovariance, FitFailure> {
    let n = data.len();
    if n <= N_PARAMS {
        return Err(FitFailure::InsufficientDegreesOfFreedom { points: n });
    }
    let dof = n - N_PARAMS;
    let info = information_matrix(&model.jacobian(theta_hat, data));
    validate_hessian(&info, N_PARAMS)?;

    let mut info_nalg = DMatrix::<f64>::zeros(N_PARAMS, N_PARAMS);
    fill_dmatrix(&info, &mut info_nalg);
    let inverse = invert_symmetric(info_nalg)?;

    let residual_variance = model.ssr(theta_hat, data) / dof as f64;
    let matrix = Array2::from_shape_fn((N_PARAMS, N_PARAMS), |(i, j)| {
        residual_variance * inverse[(i, j)]
    });
    Ok(ParamCovariance { matrix, residual_variance, dof })
}

/// Gauss–Newton information `JᵀJ`.
pub fn information_matrix(jacobian: &Array2<f64>) -> Hessian {
    jacobian.t().dot(jacobian)
}

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`, mirroring
/// the lower triangle to keep the copy exactly symmetric.
fn fill_dmatrix(info: &Array2<f64>, info_nalg: &mut DMatrix<f64>) {
    let n = info.ncols();
    for j in 0..n {
        for i in j..n {
            info_nalg[(i, j)] = info[[i, j]];
            info_nalg[(j, i)] = info[[i, j]];
        }
    }
}

/// `Q Λ⁻¹ Qᵀ` for a symmetric positive-definite matrix.
fn invert_symmetric(info_nalg: DMatrix<f64>) -> Result<DMatrix<f64>, FitFailure> {
    let n = info_nalg.nrows();
    let eigen = info_nalg.symmetric_eigen();
    let max_eigenvalue = eigen.eigenvalues.max();
    let min_eigenvalue = eigen.eigenvalues.min();
    if !(max_eigenvalue > 0.0 && min_eigenvalue > EIGEN_EPS * max_eigenvalue) {
        return Err(FitFailure::SingularCovariance { min_eigenvalue, max_eigenvalue });
    }
    let q = &eigen.eigenvectors;
    let mut inverse = DMatrix::<f64>::zeros(n, n);
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        let qk = q.column(k);
        inverse += (qk * qk.transpose()) / lambda;
    }
    Ok(inverse)
}
