//! Ridge-stabilized least squares via the normal equations.

use ndarray::{Array1, Array2};
use ronda_traits::{Result, RondaError};

/// Diagonal regularization added to `X'X` before solving. Keeps the
/// system positive definite when features are collinear or constant.
const RIDGE_EPSILON: f64 = 1e-10;

/// A fitted linear model over a fixed feature ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    /// One coefficient per feature column, in input order.
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
}

impl LinearModel {
    /// Fits coefficients and an intercept by solving the normal equations
    /// `(X'X + eI) beta = X'y` with a Cholesky decomposition.
    ///
    /// # Errors
    ///
    /// Returns an error on dimension mismatch, an empty design matrix, or
    /// a system that is not positive definite even after regularization.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(RondaError::Other(format!(
                "design matrix has {} rows but target has {}",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(RondaError::InsufficientData(
                "empty design matrix".to_string(),
            ));
        }

        // Design matrix with a leading intercept column.
        let n = x.nrows();
        let k = x.ncols() + 1;
        let mut design = Array2::<f64>::ones((n, k));
        design.slice_mut(ndarray::s![.., 1..]).assign(x);

        let xt = design.t();
        let mut xtx = xt.dot(&design);
        let xty = xt.dot(y);
        for i in 0..k {
            xtx[[i, i]] += RIDGE_EPSILON;
        }

        let beta = cholesky_solve(&xtx, &xty)?;
        Ok(Self {
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
        })
    }

    /// Predicted value for one row of feature values, which must follow
    /// the fitted feature ordering.
    #[must_use]
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }

    /// Predicted values for every row of a design matrix.
    #[must_use]
    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows()
            .into_iter()
            .map(|row| self.predict_one(row.as_slice().unwrap_or(&[])))
            .collect()
    }
}

/// Solves `A x = b` for symmetric positive definite `A` via `A = L L'`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(RondaError::Other(
                        "normal equations are not positive definite".to_string(),
                    ));
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b.
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L' x = z.
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}

/// Coefficient of determination for observed vs predicted targets.
///
/// Returns `NaN` when the target series has zero variance.
#[must_use]
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> f64 {
    let n = observed.len();
    if n == 0 || n != predicted.len() {
        return f64::NAN;
    }
    let mean = observed.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = observed
        .iter()
        .zip(predicted.iter())
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return f64::NAN;
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_fit_recovers_exact_linear_relation() {
        // y = 1 + 2a - 3b, noise-free.
        let x = array![
            [1.0, 0.0],
            [0.0, 1.0],
            [2.0, 1.0],
            [3.0, 2.0],
            [1.0, 4.0],
            [5.0, 0.5],
        ];
        let y = x.rows().into_iter().map(|r| 1.0 + 2.0 * r[0] - 3.0 * r[1]);
        let y = Array1::from_iter(y);

        let model = LinearModel::fit(&x, &y).unwrap();
        assert_relative_eq!(model.intercept, 1.0, epsilon = 1e-6);
        assert_relative_eq!(model.coefficients[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(model.coefficients[1], -3.0, epsilon = 1e-6);

        let fitted = model.predict(&x);
        assert!((r_squared(y.as_slice().unwrap(), &fitted) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_feature_is_tolerated() {
        // A constant column makes X'X singular without the ridge bump.
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let model = LinearModel::fit(&x, &y).unwrap();
        assert_relative_eq!(model.coefficients[0], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];
        assert!(LinearModel::fit(&x, &y).is_err());
    }

    #[test]
    fn test_r_squared_zero_variance_target() {
        assert!(r_squared(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).is_nan());
    }
}
