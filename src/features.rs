//! Per-window feature extraction.
//!
//! For every channel of a window: Welch relative power in each configured
//! band, population mean and population variance. Values are laid out as
//! described by [`FeatureSchema`].

use crate::config::{FrequencyBand, PipelineConfig};
use crate::error::{Result, SeizureError};
use crate::labels;
use crate::spectral::Welch;
use crate::types::{FeatureSchema, FeatureVector, Recording};
use crate::windower::{Window, Windower};
use ndarray::ArrayView2;
use rayon::prelude::*;

/// Features and label of one window
#[derive(Debug, Clone)]
pub struct WindowFeatures {
    pub start: usize,
    pub end: usize,
    pub features: FeatureVector,
    pub label: bool,
}

pub struct FeatureExtractor {
    welch: Welch,
    bands: Vec<FrequencyBand>,
    schema: FeatureSchema,
}

impl FeatureExtractor {
    pub fn new(config: &PipelineConfig, num_channels: usize) -> Self {
        Self {
            welch: Welch::new(config.sampling_rate, config.welch_segment_len),
            bands: config.bands.clone(),
            schema: FeatureSchema::new(&config.bands, num_channels),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Features of a `samples × channels` block
    pub fn extract(&self, channels: ArrayView2<'_, f64>) -> Result<FeatureVector> {
        let num_channels = self.schema.num_channels();
        if channels.ncols() != num_channels {
            return Err(SeizureError::DimensionMismatch {
                expected: num_channels,
                got: channels.ncols(),
            });
        }

        let mut values = vec![0.0; self.schema.len()];
        for (ch, column) in channels.columns().into_iter().enumerate() {
            let samples: Vec<f64> = column.to_vec();

            // Rounding in the mean leaves a residual that the window leaks into low bins
            if let Some(level) = constant_level(&samples) {
                values[self.schema.mean_index(ch)] = level;
                continue;
            }

            let rel = self.welch.psd(&samples).relative_band_powers(&self.bands);
            for (band, power) in rel.into_iter().enumerate() {
                values[self.schema.relpower_index(band, ch)] = power;
            }

            let (mean, variance) = mean_variance(&samples);
            values[self.schema.mean_index(ch)] = mean;
            values[self.schema.variance_index(ch)] = variance;
        }

        Ok(FeatureVector::new(values))
    }

    pub fn extract_window(&self, window: &Window<'_>) -> Result<WindowFeatures> {
        Ok(WindowFeatures {
            start: window.start,
            end: window.end,
            features: self.extract(window.channels)?,
            label: labels::aggregate(window.seizure),
        })
    }

    /// Features for every window of `recording`, in window order.
    pub fn extract_recording(
        &self,
        windower: &Windower,
        recording: &Recording,
    ) -> Result<Vec<WindowFeatures>> {
        let windows: Vec<Window> = windower.windows(recording)?.collect();

        log::debug!(
            "Extracting features from {} windows of '{}'",
            windows.len(),
            recording.name
        );

        windows
            .par_iter()
            .map(|window| self.extract_window(window))
            .collect()
    }
}

/// The common value of `values` if the signal is flat to within rounding.
///
/// Relative powers and variance stay at 0 for such a channel.
fn constant_level(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let tolerance = 4.0 * f64::EPSILON * min.abs().max(max.abs()).max(1.0);
    if max - min <= tolerance {
        Some(first)
    } else {
        None
    }
}

/// Population mean and variance
pub fn mean_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}
