//! Per-feature standardization fitted on training rows only.

use crate::config::ZeroVariancePolicy;
use crate::error::{Result, SeizureError};
use crate::types::FeatureSchema;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
    constant_features: Vec<String>,
}

impl Standardizer {
    /// Fit population mean and standard deviation per column of `train`.
    ///
    /// A column whose deviation is numerically zero is either left unscaled
    /// (`UnitScale`) or rejected with `ZeroVariance` (`Reject`).
    pub fn fit(
        train: ArrayView2<'_, f64>,
        schema: &FeatureSchema,
        policy: ZeroVariancePolicy,
    ) -> Result<Self> {
        if train.ncols() != schema.len() {
            return Err(SeizureError::DimensionMismatch {
                expected: schema.len(),
                got: train.ncols(),
            });
        }
        if train.nrows() == 0 {
            return Err(SeizureError::InvalidParameter(
                "cannot fit a standardizer on zero rows".to_string(),
            ));
        }

        let n = train.nrows() as f64;
        let mut means = Vec::with_capacity(train.ncols());
        let mut scales = Vec::with_capacity(train.ncols());
        let mut constant_features = Vec::new();

        for (j, column) in train.axis_iter(Axis(1)).enumerate() {
            let mean = column.sum() / n;
            let std = (column.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

            let name = &schema.names()[j];
            if std <= 10.0 * f64::EPSILON * mean.abs().max(1.0) {
                match policy {
                    ZeroVariancePolicy::Reject => {
                        return Err(SeizureError::ZeroVariance(name.clone()));
                    }
                    ZeroVariancePolicy::UnitScale => {
                        log::warn!("Feature '{}' is constant in training data; scale set to 1", name);
                        constant_features.push(name.clone());
                        means.push(mean);
                        scales.push(1.0);
                    }
                }
            } else {
                means.push(mean);
                scales.push(std);
            }
        }

        Ok(Self {
            means,
            scales,
            constant_features,
        })
    }

    /// Apply the fitted statistics to `x`
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.means.len() {
            return Err(SeizureError::DimensionMismatch {
                expected: self.means.len(),
                got: x.ncols(),
            });
        }
        let mut out = x.to_owned();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, scale) = (self.means[j], self.scales[j]);
            column.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(out)
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Features that were constant during fitting
    pub fn constant_features(&self) -> &[String] {
        &self.constant_features
    }
}
