//! Welch power spectral density and band power integration.
//!
//! Segments use a periodic Hann window, 50% overlap, constant detrending and
//! one-sided density scaling, so results line up with the usual
//! scientific-Python defaults for the same segment length.

use crate::config::FrequencyBand;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::f64::consts::PI;

// Thread-local FFT planner so parallel feature extraction reuses plans per thread
thread_local! {
    static FFT_PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

/// One-sided power spectral density
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerSpectrum {
    pub frequencies: Vec<f64>,
    pub density: Vec<f64>,
    /// Spacing between frequency bins (Hz)
    pub resolution: f64,
}

impl PowerSpectrum {
    /// Integral of the density over every bin
    pub fn total_power(&self) -> f64 {
        trapezoid(&self.density, self.resolution)
    }

    /// Integral of the density over bins with `lower <= f < upper`
    pub fn band_power(&self, band: &FrequencyBand) -> f64 {
        let first = self.frequencies.iter().position(|&f| band.contains(f));
        let Some(first) = first else {
            return 0.0;
        };
        let len = self.frequencies[first..]
            .iter()
            .take_while(|&&f| band.contains(f))
            .count();
        trapezoid(&self.density[first..first + len], self.resolution)
    }

    /// Fraction of total power in each band, in band order.
    ///
    /// A spectrum with no power (flat input) yields 0 for every band.
    pub fn relative_band_powers(&self, bands: &[FrequencyBand]) -> Vec<f64> {
        let total = self.total_power();
        if !(total > 0.0) || !total.is_finite() {
            return vec![0.0; bands.len()];
        }
        bands
            .iter()
            .map(|band| self.band_power(band) / total)
            .collect()
    }
}

/// Welch PSD estimator at a fixed sampling rate
#[derive(Debug, Clone, Copy)]
pub struct Welch {
    sampling_rate: f64,
    segment_len: usize,
}

impl Welch {
    pub fn new(sampling_rate: f64, segment_len: usize) -> Self {
        Self {
            sampling_rate,
            segment_len: segment_len.max(1),
        }
    }

    /// Estimate the PSD of `signal`.
    ///
    /// The segment length is clamped to the signal length.
    pub fn psd(&self, signal: &[f64]) -> PowerSpectrum {
        let n = signal.len();
        let nperseg = self.segment_len.min(n).max(1);
        let noverlap = nperseg / 2;
        let step = nperseg - noverlap;
        let n_freqs = nperseg / 2 + 1;
        let resolution = self.sampling_rate / nperseg as f64;

        let frequencies: Vec<f64> = (0..n_freqs).map(|k| k as f64 * resolution).collect();

        if n == 0 {
            return PowerSpectrum {
                frequencies,
                density: vec![0.0; n_freqs],
                resolution,
            };
        }

        let window = hann_periodic(nperseg);
        let window_power: f64 = window.iter().map(|w| w * w).sum();
        if window_power <= 0.0 {
            return PowerSpectrum {
                frequencies,
                density: vec![0.0; n_freqs],
                resolution,
            };
        }
        let scale = 1.0 / (self.sampling_rate * window_power);

        let num_segments = (n - nperseg) / step + 1;
        let mut density = vec![0.0; n_freqs];
        let mut buffer: Vec<Complex<f64>> = Vec::with_capacity(nperseg);

        FFT_PLANNER.with(|planner| {
            let fft = planner.borrow_mut().plan_fft_forward(nperseg);

            for seg in 0..num_segments {
                let segment = &signal[seg * step..seg * step + nperseg];
                let mean = segment.iter().sum::<f64>() / nperseg as f64;

                buffer.clear();
                buffer.extend(
                    segment
                        .iter()
                        .zip(&window)
                        .map(|(&x, &w)| Complex::new((x - mean) * w, 0.0)),
                );
                fft.process(&mut buffer);

                for (acc, c) in density.iter_mut().zip(&buffer[..n_freqs]) {
                    *acc += c.norm_sqr() * scale;
                }
            }
        });

        // Fold negative frequencies in; DC and (for even lengths) Nyquist are unique
        let last_doubled = if nperseg % 2 == 0 {
            n_freqs - 1
        } else {
            n_freqs
        };
        for p in density.iter_mut().take(last_doubled).skip(1) {
            *p *= 2.0;
        }
        for p in density.iter_mut() {
            *p /= num_segments as f64;
        }

        PowerSpectrum {
            frequencies,
            density,
            resolution,
        }
    }
}

/// Periodic Hann window of length `n`
fn hann_periodic(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// Composite trapezoid rule over evenly spaced samples
pub fn trapezoid(values: &[f64], dx: f64) -> f64 {
    match values.len() {
        0 | 1 => 0.0,
        n => dx * (values.iter().sum::<f64>() - 0.5 * (values[0] + values[n - 1])),
    }
}
