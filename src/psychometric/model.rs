//! Logistic psychometric model and its least-squares objective.
//!
//! `f(x; α, β) = 1 / (1 + exp(-β (x - α)))`, with `α` the 50% level and `β`
//! the slope. Parameters are fitted by least squares on `(level,
//! proportion)` points, expressed for the maximizer as
//! `ℓ(θ) = -½ Σ (yᵢ - f(xᵢ; θ))²` with `θ = [α, β]`.
//!
//! Partial derivatives used for the analytic gradient and the Jacobian:
//! - `∂f/∂α = -β f (1 - f)`
//! - `∂f/∂β = (x - α) f (1 - f)`
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, Theta, validation::validate_theta},
        numerical_stability::safe_logistic,
    },
    psychometric::aggregate::CurveData,
};
use ndarray::Array2;

/// Number of free parameters (`α`, `β`).
pub const N_PARAMS: usize = 2;

/// Logistic curve value at `x`.
pub fn logistic(x: f64, alpha: f64, beta: f64) -> f64 {
    safe_logistic(beta * (x - alpha))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogisticModel;

impl LogisticModel {
    /// Sum of squared residuals at `θ`.
    pub fn ssr(&self, theta: &Theta, data: &CurveData) -> f64 {
        let (alpha, beta) = (theta[0], theta[1]);
        data.x
            .iter()
            .zip(data.y.iter())
            .map(|(&x, &y)| {
                let r = y - logistic(x, alpha, beta);
                r * r
            })
            .sum()
    }

    /// `n × 2` Jacobian of the fitted values with respect to `[α, β]`.
    pub fn jacobian(&self, theta: &Theta, data: &CurveData) -> Array2<f64> {
        let (alpha, beta) = (theta[0], theta[1]);
        let mut jac = Array2::<f64>::zeros((data.len(), N_PARAMS));
        for (i, &x) in data.x.iter().enumerate() {
            let f = logistic(x, alpha, beta);
            let w = f * (1.0 - f);
            jac[[i, 0]] = -beta * w;
            jac[[i, 1]] = (x - alpha) * w;
        }
        jac
    }
}

impl LogLikelihood for LogisticModel {
    type Data = CurveData;

    fn value(&self, theta: &Theta, data: &CurveData) -> OptResult<f64> {
        Ok(-0.5 * self.ssr(theta, data))
    }

    /// Rejects a θ that is not two finite values, and empty, mismatched or
    /// non-finite data.
    fn check(&self, theta: &Theta, data: &CurveData) -> OptResult<()> {
        validate_theta(theta, N_PARAMS)?;
        if data.is_empty() {
            return Err(OptError::InvalidModelData { reason: "No data points to fit." });
        }
        if data.x.len() != data.y.len() {
            return Err(OptError::InvalidModelData {
                reason: "Levels and proportions differ in length.",
            });
        }
        if data.x.iter().chain(data.y.iter()).any(|v| !v.is_finite()) {
            return Err(OptError::InvalidModelData { reason: "Data must be finite." });
        }
        Ok(())
    }

    /// `∇ℓ(θ) = Σ (yᵢ - fᵢ) ∂fᵢ/∂θ`.
    fn grad(&self, theta: &Theta, data: &CurveData) -> OptResult<Grad> {
        let (alpha, beta) = (theta[0], theta[1]);
        let mut g = Grad::zeros(N_PARAMS);
        for (&x, &y) in data.x.iter().zip(data.y.iter()) {
            let f = logistic(x, alpha, beta);
            let w = f * (1.0 - f);
            let r = y - f;
            g[0] += r * (-beta * w);
            g[1] += r * ((x - alpha) * w);
        }
        Ok(g)
    }
}
