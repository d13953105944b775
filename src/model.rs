//! Binary classifiers over standardized window features.

use crate::config::ModelConfig;
use crate::error::{Result, SeizureError};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView2};

/// Any classifier the evaluation stage can fit and score
pub trait BinaryClassifier {
    /// Fit on `features` (rows × columns) and one label per row
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: &[bool]) -> Result<()>;

    /// Seizure probability per row, in [0, 1]
    fn predict_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Probability at or above which a row is predicted positive
    fn threshold(&self) -> f64 {
        0.5
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<bool>> {
        let threshold = self.threshold();
        Ok(self
            .predict_probability(features)?
            .iter()
            .map(|&p| p >= threshold)
            .collect())
    }
}

/// L2-regularized logistic regression fitted by Newton iterations (IRLS).
///
/// Minimizes `c * Σ logloss + ½‖w‖²`; the intercept is not penalized.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    max_iterations: usize,
    tolerance: f64,
    threshold: f64,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
    iterations: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}

impl LogisticRegression {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            c: config.c,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
            threshold: config.threshold,
            coefficients: None,
            intercept: 0.0,
            iterations: 0,
        }
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Newton iterations used by the last fit
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }
}

impl BinaryClassifier for LogisticRegression {
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: &[bool]) -> Result<()> {
        let (n, d) = features.dim();
        if labels.len() != n {
            return Err(SeizureError::DimensionMismatch {
                expected: n,
                got: labels.len(),
            });
        }
        let positives = labels.iter().filter(|&&l| l).count();
        if positives == 0 || positives == n {
            return Err(SeizureError::EmptyClass(format!(
                "logistic regression needs both classes, got {} of {} rows positive",
                positives, n
            )));
        }

        // Column d is the intercept
        let x = DMatrix::from_fn(n, d + 1, |i, j| if j < d { features[[i, j]] } else { 1.0 });
        let y = DVector::from_iterator(n, labels.iter().map(|&l| if l { 1.0 } else { 0.0 }));
        let alpha = 1.0 / self.c;
        let mut w = DVector::<f64>::zeros(d + 1);

        self.iterations = 0;
        let mut converged = false;
        for iter in 1..=self.max_iterations {
            self.iterations = iter;
            let p = (&x * &w).map(Self::sigmoid);

            let mut gradient = x.transpose() * (&p - &y);
            let mut hessian = DMatrix::<f64>::zeros(d + 1, d + 1);
            for i in 0..n {
                let s = p[i] * (1.0 - p[i]);
                let row = x.row(i);
                hessian += s * row.transpose() * row;
            }
            for j in 0..d {
                gradient[j] += alpha * w[j];
                hessian[(j, j)] += alpha;
            }
            hessian[(d, d)] += 1e-10;

            let step = match hessian.clone().cholesky() {
                Some(chol) => chol.solve(&gradient),
                None => hessian.lu().solve(&gradient).ok_or_else(|| {
                    SeizureError::ModelFit("singular Hessian in Newton step".to_string())
                })?,
            };
            w -= &step;

            if !w.iter().all(|v| v.is_finite()) {
                return Err(SeizureError::ModelFit(
                    "coefficients diverged to non-finite values".to_string(),
                ));
            }

            let max_step = step.iter().fold(0.0f64, |m, v| m.max(v.abs()));
            if max_step < self.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            log::debug!("Logistic regression converged in {} iterations", self.iterations);
        } else {
            log::warn!(
                "Logistic regression did not converge within {} iterations",
                self.max_iterations
            );
        }

        self.coefficients = Some(w.iter().take(d).copied().collect());
        self.intercept = w[d];
        Ok(())
    }

    fn predict_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(SeizureError::NotFitted)?;
        if features.ncols() != coefficients.len() {
            return Err(SeizureError::DimensionMismatch {
                expected: coefficients.len(),
                got: features.ncols(),
            });
        }
        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                let z = row
                    .iter()
                    .zip(coefficients)
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
                    + self.intercept;
                Self::sigmoid(z)
            })
            .collect())
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
