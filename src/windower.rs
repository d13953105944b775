//! Fixed-size, fixed-stride windowing over a recording.
//!
//! Window ends run `window_size, window_size + stride, ...` while they stay
//! within the signal; each window covers `[end - window_size, end)`.

use crate::config::PipelineConfig;
use crate::error::{Result, SeizureError};
use crate::types::Recording;
use ndarray::{s, ArrayView2};

/// A borrowed slice of a recording
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Position in the window sequence
    pub index: usize,
    /// First sample (inclusive)
    pub start: usize,
    /// Last sample (exclusive)
    pub end: usize,
    /// `window_size × channels` view of the signal
    pub channels: ArrayView2<'a, f64>,
    /// Seizure flags for the same samples
    pub seizure: &'a [bool],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windower {
    window_size: usize,
    stride: usize,
}

impl Windower {
    pub fn new(window_size: usize, stride: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(SeizureError::InvalidParameter(
                "window size must be greater than 0".to_string(),
            ));
        }
        if stride == 0 {
            return Err(SeizureError::InvalidParameter(
                "stride must be greater than 0".to_string(),
            ));
        }
        if stride > window_size {
            return Err(SeizureError::InvalidParameter(format!(
                "stride ({}) must not exceed window size ({})",
                stride, window_size
            )));
        }
        Ok(Self {
            window_size,
            stride,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.window_size()?, config.stride()?)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of windows produced for a signal of `num_obs` samples
    pub fn window_count(&self, num_obs: usize) -> usize {
        if num_obs < self.window_size {
            0
        } else {
            (num_obs - self.window_size) / self.stride + 1
        }
    }

    /// Lazily iterate the windows of `recording`.
    ///
    /// Fails with `InvalidParameter` when the recording is shorter than one
    /// window.
    pub fn windows<'a>(&self, recording: &'a Recording) -> Result<Windows<'a>> {
        let num_obs = recording.num_samples();
        if self.window_size > num_obs {
            return Err(SeizureError::InvalidParameter(format!(
                "window size ({}) exceeds length of '{}' ({} samples)",
                self.window_size, recording.name, num_obs
            )));
        }

        Ok(Windows {
            channels: recording.channels(),
            seizure: recording.seizure_flags(),
            window_size: self.window_size,
            stride: self.stride,
            next_end: self.window_size,
            index: 0,
        })
    }
}

/// Iterator returned by [`Windower::windows`]
pub struct Windows<'a> {
    channels: ArrayView2<'a, f64>,
    seizure: &'a [bool],
    window_size: usize,
    stride: usize,
    next_end: usize,
    index: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.next_end;
        if end > self.seizure.len() {
            return None;
        }
        let start = end - self.window_size;

        let window = Window {
            index: self.index,
            start,
            end,
            channels: self.channels.slice_move(s![start..end, ..]),
            seizure: &self.seizure[start..end],
        };

        self.next_end += self.stride;
        self.index += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next_end > self.seizure.len() {
            0
        } else {
            (self.seizure.len() - self.next_end) / self.stride + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn recording(num_obs: usize) -> Recording {
        let channels = Array2::from_shape_fn((num_obs, 2), |(i, c)| (i * 10 + c) as f64);
        Recording::new("s", "s_1", channels, vec![false; num_obs]).unwrap()
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Windower::new(0, 1).is_err());
        assert!(Windower::new(10, 0).is_err());
        assert!(Windower::new(10, 11).is_err());
        assert!(Windower::new(10, 10).is_ok());
    }

    #[test]
    fn test_window_bounds() {
        let rec = recording(10);
        let windower = Windower::new(4, 2).unwrap();
        let bounds: Vec<(usize, usize)> = windower
            .windows(&rec)
            .unwrap()
            .map(|w| (w.start, w.end))
            .collect();
        assert_eq!(bounds, vec![(0, 4), (2, 6), (4, 8), (6, 10)]);
    }

    #[test]
    fn test_window_count_formula() {
        for &(num_obs, ws, stride) in &[
            (2000usize, 400usize, 200usize),
            (2001, 400, 200),
            (400, 400, 200),
            (999, 100, 7),
            (1024, 1024, 1),
            (5000, 1024, 512),
        ] {
            let windower = Windower::new(ws, stride).unwrap();
            let rec = recording(num_obs);
            let windows = windower.windows(&rec).unwrap();
            let expected = (num_obs - ws) / stride + 1;
            assert_eq!(windows.len(), expected);
            assert_eq!(windows.count(), expected);
            assert_eq!(windower.window_count(num_obs), expected);
        }
    }

    #[test]
    fn test_short_recording_is_rejected() {
        let windower = Windower::new(400, 200).unwrap();
        assert_eq!(windower.window_count(399), 0);
        assert!(matches!(
            windower.windows(&recording(399)),
            Err(SeizureError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_window_views_reference_signal() {
        let rec = recording(8);
        let windower = Windower::new(4, 4).unwrap();
        let windows: Vec<Window> = windower.windows(&rec).unwrap().collect();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].index, 1);
        assert_eq!(windows[1].channels.dim(), (4, 2));
        assert_eq!(windows[1].channels[[0, 1]], 41.0);
        assert_eq!(windows[1].seizure.len(), 4);
    }
}
