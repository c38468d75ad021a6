//! Covariance estimation with linear shrinkage.
//!
//! The shrunk estimator blends the maximum-likelihood sample covariance `S`
//! with a scaled-identity target `F = μI`, where `μ = tr(S) / N`:
//!
//! ```text
//! Σ = δ·F + (1 - δ)·S,    δ ∈ [0, 1]
//! ```
//!
//! The intensity `δ` is the Ledoit-Wolf (2004) analytic estimate of the
//! ratio between the estimation-error variance of `S` and the squared
//! Frobenius distance between `S` and `F`.
//!
//! Input layout throughout is `returns[(t, i)]`: rows are observations,
//! columns are instruments.

use nalgebra::DMatrix;

use crate::error::{MathError, MathResult};

/// Relative tolerance for the positive semi-definite post-check.
const PSD_TOLERANCE: f64 = 1e-12;

/// A covariance estimate together with its shrinkage parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceEstimate {
    matrix: DMatrix<f64>,
    shrinkage: f64,
    target_scale: f64,
}

impl CovarianceEstimate {
    /// Wraps an existing square matrix, checking its shape and symmetry.
    pub fn from_matrix(matrix: DMatrix<f64>) -> MathResult<Self> {
        if !matrix.is_square() {
            return Err(MathError::dimension_mismatch(
                matrix.shape(),
                (matrix.ncols(), matrix.ncols()),
            ));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(MathError::non_finite("covariance matrix"));
        }
        let estimate = Self {
            target_scale: matrix.trace() / matrix.nrows().max(1) as f64,
            matrix,
            shrinkage: 0.0,
        };
        if !estimate.is_symmetric(1e-14) {
            return Err(MathError::invalid_input("covariance matrix is not symmetric"));
        }
        Ok(estimate)
    }

    /// The estimated covariance matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Number of instruments.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Shrinkage intensity `δ` applied to the target.
    pub fn shrinkage(&self) -> f64 {
        self.shrinkage
    }

    /// Diagonal value `μ` of the scaled-identity target.
    pub fn target_scale(&self) -> f64 {
        self.target_scale
    }

    /// Quadratic form `wᵀΣw`.
    pub fn quadratic_form(&self, weights: &[f64]) -> MathResult<f64> {
        let n = self.dim();
        if weights.len() != n {
            return Err(MathError::dimension_mismatch((n, n), (weights.len(), 1)));
        }

        let mut acc = 0.0;
        for i in 0..n {
            let mut row = 0.0;
            for j in 0..n {
                row += self.matrix[(i, j)] * weights[j];
            }
            acc += weights[i] * row;
        }
        Ok(acc)
    }

    /// Whether `|Σ_ij - Σ_ji| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.dim();
        (0..n).all(|i| (0..i).all(|j| (self.matrix[(i, j)] - self.matrix[(j, i)]).abs() <= tol))
    }

    /// Smallest eigenvalue of the (symmetric) matrix.
    pub fn min_eigenvalue(&self) -> f64 {
        if self.dim() == 0 {
            return 0.0;
        }
        self.matrix.clone().symmetric_eigenvalues().min()
    }

    /// Rejects matrices with a materially negative eigenvalue.
    pub fn ensure_positive_semidefinite(&self) -> MathResult<()> {
        let min_eig = self.min_eigenvalue();
        let scale = self.matrix.trace().abs().max(1.0);
        if min_eig < -PSD_TOLERANCE * scale {
            return Err(MathError::NotPositiveSemiDefinite {
                min_eigenvalue: min_eig,
            });
        }
        Ok(())
    }
}

fn validate_panel(returns: &DMatrix<f64>) -> MathResult<()> {
    if returns.ncols() == 0 {
        return Err(MathError::invalid_input("returns matrix has no instruments"));
    }
    if returns.nrows() < 2 {
        return Err(MathError::insufficient_data(2, returns.nrows()));
    }
    if returns.iter().any(|v| !v.is_finite()) {
        return Err(MathError::non_finite("returns matrix"));
    }
    Ok(())
}

/// Subtracts each column's mean.
fn centered(returns: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = returns.clone();
    for mut col in out.column_iter_mut() {
        let m = col.mean();
        col.add_scalar_mut(-m);
    }
    out
}

/// Symmetric `XᵀX / T` of an already centered panel.
fn covariance_of_centered(x: &DMatrix<f64>) -> DMatrix<f64> {
    let t = x.nrows() as f64;
    let n = x.ncols();
    let mut cov = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let v = x.column(i).dot(&x.column(j)) / t;
            cov[(i, j)] = v;
            cov[(j, i)] = v;
        }
    }
    cov
}

/// Maximum-likelihood sample covariance (divide by `T`).
pub fn sample_covariance(returns: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    validate_panel(returns)?;
    Ok(covariance_of_centered(&centered(returns)))
}

/// Ledoit-Wolf shrinkage toward a scaled identity.
///
/// A single instrument has nothing to shrink; its variance is returned
/// with `δ = 0`.
///
/// # Errors
///
/// Returns an error for fewer than two observations, an empty panel, or
/// non-finite inputs.
pub fn ledoit_wolf(returns: &DMatrix<f64>) -> MathResult<CovarianceEstimate> {
    validate_panel(returns)?;

    let t = returns.nrows() as f64;
    let n = returns.ncols();
    let nf = n as f64;

    let x = centered(returns);
    let sample = covariance_of_centered(&x);
    let trace = sample.trace();
    let mu = trace / nf;

    if n == 1 {
        return Ok(CovarianceEstimate {
            matrix: sample,
            shrinkage: 0.0,
            target_scale: mu,
        });
    }

    // Σ_ij S_ij²
    let delta_raw: f64 = sample.iter().map(|v| v * v).sum();
    // Σ_t (Σ_i x_ti²)², i.e. the element sum of (X∘X)ᵀ(X∘X)
    let beta_raw: f64 = x
        .row_iter()
        .map(|row| {
            let s: f64 = row.iter().map(|v| v * v).sum();
            s * s
        })
        .sum();

    let beta = (beta_raw / t - delta_raw) / (nf * t);
    let delta = (delta_raw - 2.0 * mu * trace + nf * mu * mu) / nf;
    let beta = beta.min(delta);

    let shrinkage = if beta <= 0.0 || delta <= 0.0 {
        0.0
    } else {
        (beta / delta).clamp(0.0, 1.0)
    };

    let mut matrix = sample * (1.0 - shrinkage);
    for i in 0..n {
        matrix[(i, i)] += shrinkage * mu;
    }

    log::debug!(
        "ledoit-wolf: n={} t={} mu={:.6e} shrinkage={:.6}",
        n,
        returns.nrows(),
        mu,
        shrinkage
    );

    Ok(CovarianceEstimate {
        matrix,
        shrinkage,
        target_scale: mu,
    })
}
