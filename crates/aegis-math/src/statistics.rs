//! Descriptive statistics over return series.
//!
//! Two variance conventions are used across the engine:
//!
//! - *population* (divide by `n`) for the covariance estimator and realized
//!   portfolio volatility
//! - *sample* (divide by `n - 1`) for per-asset risk in recommendations

use nalgebra::DMatrix;

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// Population variance (divide by `n`). Returns 0 for an empty slice.
pub fn population_variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64
}

/// Sample variance (divide by `n - 1`). Returns 0 for fewer than two points.
pub fn sample_variance(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64
}

/// Population standard deviation.
pub fn population_std(xs: &[f64]) -> f64 {
    population_variance(xs).sqrt()
}

/// Sample standard deviation.
pub fn sample_std(xs: &[f64]) -> f64 {
    sample_variance(xs).sqrt()
}

/// Dot product over the common prefix of two slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Pearson correlation of two equally long series.
///
/// A constant series has no defined correlation; 0 is returned in that case
/// (and for fewer than two points).
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);

    let mut cov = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut qx = 0.0;
    let mut qy = 0.0;

    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        sx += dx * dx;
        sy += dy * dy;
        qx += x[i] * x[i];
        qy += y[i] * y[i];
    }

    // Spread lost in rounding relative to the magnitude counts as constant.
    if sx <= f64::EPSILON * qx || sy <= f64::EPSILON * qy {
        return 0.0;
    }
    (cov / (sx.sqrt() * sy.sqrt())).clamp(-1.0, 1.0)
}

/// Pearson correlation matrix of the columns of `returns` (rows are observations).
pub fn correlation_matrix(returns: &DMatrix<f64>) -> DMatrix<f64> {
    let n = returns.ncols();
    let columns: Vec<Vec<f64>> = returns
        .column_iter()
        .map(|c| c.iter().copied().collect())
        .collect();

    let mut corr = DMatrix::identity(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            corr[(i, j)] = r;
            corr[(j, i)] = r;
        }
    }
    corr
}

/// Mean of the strictly upper-triangular entries, each pair counted once.
///
/// Returns `None` when the matrix has no off-diagonal pairs.
pub fn mean_off_diagonal(matrix: &DMatrix<f64>) -> Option<f64> {
    let n = matrix.nrows().min(matrix.ncols());
    if n < 2 {
        return None;
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += matrix[(i, j)];
            count += 1;
        }
    }
    Some(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_variance_conventions() {
        let xs = [0.01, -0.02, 0.03, -0.01];
        assert_relative_eq!(mean(&xs), 0.0025, epsilon = 1e-15);
        assert_relative_eq!(population_variance(&xs), 0.00036875, epsilon = 1e-15);
        assert_relative_eq!(sample_variance(&xs), 0.00036875 * 4.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_variance(&[0.5]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[0.1, 0.2, 0.3]), 0.0);
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &z), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_tiny_amplitude() {
        let x: Vec<f64> = (0..20).map(|i| 1e-9 * ((i % 4) as f64 - 1.5)).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-9);
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &x[..3]), 0.0);
    }

    #[test]
    fn test_correlation_matrix_and_mean() {
        let returns = DMatrix::from_column_slice(
            4,
            2,
            &[0.01, -0.02, 0.03, -0.01, 0.02, -0.01, 0.01, 0.00],
        );
        let corr = correlation_matrix(&returns);

        assert_eq!(corr[(0, 0)], 1.0);
        assert_eq!(corr[(0, 1)], corr[(1, 0)]);
        assert_relative_eq!(corr[(0, 1)], 0.7568892626614565, epsilon = 1e-12);
        assert_relative_eq!(
            mean_off_diagonal(&corr).unwrap(),
            0.7568892626614565,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_mean_off_diagonal_single() {
        assert!(mean_off_diagonal(&DMatrix::identity(1, 1)).is_none());
    }
}
