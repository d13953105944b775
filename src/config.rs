//! Pipeline configuration.
//!
//! Every constant the extraction and evaluation stages depend on lives in
//! [`PipelineConfig`]. It deserializes from JSON with per-field defaults, so a
//! config file only needs to name what it overrides.

use crate::error::{Result, SeizureError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named frequency range `[lower, upper)` in Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

impl FrequencyBand {
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    #[inline]
    pub fn contains(&self, frequency: f64) -> bool {
        frequency >= self.lower && frequency < self.upper
    }
}

/// Classic EEG bands used for relative power features.
pub fn default_bands() -> Vec<FrequencyBand> {
    vec![
        FrequencyBand::new("delta", 0.5, 4.0),
        FrequencyBand::new("theta", 4.0, 8.0),
        FrequencyBand::new("alpha", 8.0, 13.0),
        FrequencyBand::new("beta", 13.0, 32.0),
        FrequencyBand::new("gamma", 32.0, 60.0),
    ]
}

/// What the standardizer does with a feature that is constant in training data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Center the feature and leave it unscaled (scale = 1).
    #[default]
    UnitScale,
    /// Fail with `ZeroVariance`.
    Reject,
}

/// Logistic regression settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Inverse L2 regularization strength
    #[serde(default = "default_c")]
    pub c: f64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Stop when the largest coefficient update falls below this value
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Probability at or above which a window is predicted as seizure
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_c() -> f64 {
    1.0
}
fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-8
}
fn default_threshold() -> f64 {
    0.5
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            c: default_c(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            threshold: default_threshold(),
        }
    }
}

/// Configuration for the full extraction and evaluation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sample rate of the recordings (Hz)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,

    /// Window length in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,

    /// Window stride in seconds
    #[serde(default = "default_stride_seconds")]
    pub stride_seconds: f64,

    /// Bands for relative power features, in output order
    #[serde(default = "default_bands")]
    pub bands: Vec<FrequencyBand>,

    /// Welch segment length in samples (clamped to the window length)
    #[serde(default = "default_welch_segment_len")]
    pub welch_segment_len: usize,

    /// Separator between subject id and hour in recording names
    #[serde(default = "default_subject_delimiter")]
    pub subject_delimiter: String,

    /// Window each subject's hours as one continuous signal
    #[serde(default = "default_concatenate_hours")]
    pub concatenate_hours: bool,

    /// Subject held out as the test set
    #[serde(default)]
    pub test_subject: Option<String>,

    /// Seed for the class balancer; `None` draws from OS entropy
    #[serde(default = "default_random_seed")]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub zero_variance: ZeroVariancePolicy,

    #[serde(default)]
    pub model: ModelConfig,
}

fn default_sampling_rate() -> f64 {
    256.0
}
fn default_window_seconds() -> f64 {
    4.0
}
fn default_stride_seconds() -> f64 {
    2.0
}
fn default_welch_segment_len() -> usize {
    256
}
fn default_subject_delimiter() -> String {
    "_".to_string()
}
fn default_concatenate_hours() -> bool {
    true
}
fn default_random_seed() -> Option<u64> {
    Some(42)
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_rate: default_sampling_rate(),
            window_seconds: default_window_seconds(),
            stride_seconds: default_stride_seconds(),
            bands: default_bands(),
            welch_segment_len: default_welch_segment_len(),
            subject_delimiter: default_subject_delimiter(),
            concatenate_hours: default_concatenate_hours(),
            test_subject: None,
            random_seed: default_random_seed(),
            zero_variance: ZeroVariancePolicy::default(),
            model: ModelConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Window length in samples
    pub fn window_size(&self) -> Result<usize> {
        seconds_to_samples("window_seconds", self.window_seconds, self.sampling_rate)
    }

    /// Window stride in samples
    pub fn stride(&self) -> Result<usize> {
        seconds_to_samples("stride_seconds", self.stride_seconds, self.sampling_rate)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(SeizureError::InvalidParameter(format!(
                "sampling_rate must be positive, got {}",
                self.sampling_rate
            )));
        }

        let window_size = self.window_size()?;
        let stride = self.stride()?;
        if stride > window_size {
            return Err(SeizureError::InvalidParameter(format!(
                "stride ({} samples) must not exceed window size ({} samples)",
                stride, window_size
            )));
        }

        if self.bands.is_empty() {
            return Err(SeizureError::InvalidParameter(
                "at least one frequency band is required".to_string(),
            ));
        }

        let nyquist = self.sampling_rate / 2.0;
        for band in &self.bands {
            if !(band.lower >= 0.0 && band.lower < band.upper) {
                return Err(SeizureError::InvalidParameter(format!(
                    "band '{}' must satisfy 0 <= lower < upper, got [{}, {})",
                    band.name, band.lower, band.upper
                )));
            }
            if band.upper > nyquist {
                log::warn!(
                    "Band '{}' extends past the Nyquist frequency ({} Hz); \
                     bins above it contribute no power",
                    band.name,
                    nyquist
                );
            }
        }

        if self.welch_segment_len == 0 {
            return Err(SeizureError::InvalidParameter(
                "welch_segment_len must be greater than 0".to_string(),
            ));
        }

        if self.subject_delimiter.is_empty() {
            return Err(SeizureError::InvalidParameter(
                "subject_delimiter must not be empty".to_string(),
            ));
        }

        if !(self.model.c > 0.0) {
            return Err(SeizureError::InvalidParameter(format!(
                "model.c must be positive, got {}",
                self.model.c
            )));
        }
        if self.model.max_iterations == 0 {
            return Err(SeizureError::InvalidParameter(
                "model.max_iterations must be greater than 0".to_string(),
            ));
        }
        if !(self.model.threshold > 0.0 && self.model.threshold < 1.0) {
            return Err(SeizureError::InvalidParameter(format!(
                "model.threshold must lie in (0, 1), got {}",
                self.model.threshold
            )));
        }

        Ok(())
    }
}

fn seconds_to_samples(name: &str, seconds: f64, sampling_rate: f64) -> Result<usize> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(SeizureError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, seconds
        )));
    }
    let samples = (seconds * sampling_rate).round();
    if samples < 1.0 {
        return Err(SeizureError::InvalidParameter(format!(
            "{} = {} s is shorter than one sample at {} Hz",
            name, seconds, sampling_rate
        )));
    }
    Ok(samples as usize)
}
