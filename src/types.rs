use crate::config::FrequencyBand;
use crate::error::{Result, SeizureError};
use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// One subject-hour of signal: a `samples × channels` matrix plus a
/// per-sample seizure flag.
#[derive(Debug, Clone)]
pub struct Recording {
    pub subject: String,
    pub name: String,
    channels: Array2<f64>,
    seizure: Vec<bool>,
}

impl Recording {
    pub fn new(
        subject: impl Into<String>,
        name: impl Into<String>,
        channels: Array2<f64>,
        seizure: Vec<bool>,
    ) -> Result<Self> {
        if channels.nrows() != seizure.len() {
            return Err(SeizureError::DimensionMismatch {
                expected: channels.nrows(),
                got: seizure.len(),
            });
        }
        if channels.ncols() == 0 {
            return Err(SeizureError::InvalidParameter(
                "recording must have at least one signal channel".to_string(),
            ));
        }
        Ok(Self {
            subject: subject.into(),
            name: name.into(),
            channels,
            seizure,
        })
    }

    /// Build from a stored matrix whose last column is the seizure indicator.
    ///
    /// An indicator value marks a seizure iff it is non-zero and not NaN.
    pub fn from_matrix(
        subject: impl Into<String>,
        name: impl Into<String>,
        matrix: Array2<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if matrix.ncols() < 2 {
            return Err(SeizureError::StoreRead(format!(
                "'{}' has {} column(s); expected signal channels plus an indicator column",
                name,
                matrix.ncols()
            )));
        }
        let label_col = matrix.ncols() - 1;
        let seizure = matrix
            .column(label_col)
            .iter()
            .map(|&v| v != 0.0 && !v.is_nan())
            .collect();
        let channels = matrix.slice(s![.., ..label_col]).to_owned();
        Self::new(subject, name, channels, seizure)
    }

    /// Join recordings of one subject end to end, in the given order.
    pub fn concatenate(
        subject: impl Into<String>,
        name: impl Into<String>,
        parts: &[Recording],
    ) -> Result<Self> {
        let first = parts.first().ok_or_else(|| {
            SeizureError::InvalidParameter("cannot concatenate zero recordings".to_string())
        })?;
        for part in parts {
            if part.num_channels() != first.num_channels() {
                return Err(SeizureError::DimensionMismatch {
                    expected: first.num_channels(),
                    got: part.num_channels(),
                });
            }
        }

        let views: Vec<ArrayView2<f64>> = parts.iter().map(|p| p.channels.view()).collect();
        let channels = concatenate(Axis(0), &views)
            .map_err(|e| SeizureError::InvalidParameter(format!("concatenation failed: {}", e)))?;
        let seizure = parts
            .iter()
            .flat_map(|p| p.seizure.iter().copied())
            .collect();

        Self::new(subject, name, channels, seizure)
    }

    pub fn num_samples(&self) -> usize {
        self.channels.nrows()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.ncols()
    }

    pub fn channels(&self) -> ArrayView2<'_, f64> {
        self.channels.view()
    }

    pub fn seizure_flags(&self) -> &[bool] {
        &self.seizure
    }
}

/// Per-window features, ordered as described by a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered column names of a feature vector.
///
/// Layout: band relative powers (band-major, channel-minor), then per-channel
/// means, then per-channel variances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    bands: Vec<String>,
    num_channels: usize,
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(bands: &[FrequencyBand], num_channels: usize) -> Self {
        let band_names: Vec<String> = bands.iter().map(|b| b.name.clone()).collect();
        let mut names = Vec::with_capacity((band_names.len() + 2) * num_channels);

        for band in &band_names {
            for ch in 0..num_channels {
                names.push(format!("relpower_{}_ch{}", band, ch));
            }
        }
        for ch in 0..num_channels {
            names.push(format!("mean_ch{}", ch));
        }
        for ch in 0..num_channels {
            names.push(format!("variance_ch{}", ch));
        }

        Self {
            bands: band_names,
            num_channels,
            names,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    #[inline]
    pub fn relpower_index(&self, band: usize, channel: usize) -> usize {
        band * self.num_channels + channel
    }

    #[inline]
    pub fn mean_index(&self, channel: usize) -> usize {
        self.bands.len() * self.num_channels + channel
    }

    #[inline]
    pub fn variance_index(&self, channel: usize) -> usize {
        (self.bands.len() + 1) * self.num_channels + channel
    }
}

/// Feature rows with their labels and subject ids, in window traversal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    schema: FeatureSchema,
    features: Vec<FeatureVector>,
    labels: Vec<bool>,
    subjects: Vec<String>,
}

impl Dataset {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            features: Vec::new(),
            labels: Vec::new(),
            subjects: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        features: FeatureVector,
        label: bool,
        subject: impl Into<String>,
    ) -> Result<()> {
        if features.len() != self.schema.len() {
            return Err(SeizureError::DimensionMismatch {
                expected: self.schema.len(),
                got: features.len(),
            });
        }
        self.features.push(features);
        self.labels.push(label);
        self.subjects.push(subject.into());
        Ok(())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Distinct subject ids in order of first appearance
    pub fn subject_ids(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for subject in &self.subjects {
            if !seen.contains(subject) {
                seen.push(subject.clone());
            }
        }
        seen
    }

    /// (negative, positive) row counts
    pub fn class_counts(&self) -> (usize, usize) {
        let positive = self.labels.iter().filter(|&&l| l).count();
        (self.labels.len() - positive, positive)
    }

    /// Rows at `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            schema: self.schema.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            subjects: indices.iter().map(|&i| self.subjects[i].clone()).collect(),
        }
    }

    /// Features as a `rows × schema.len()` matrix
    pub fn feature_matrix(&self) -> Array2<f64> {
        let cols = self.schema.len();
        Array2::from_shape_fn((self.len(), cols), |(r, c)| self.features[r].as_slice()[c])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_bands;
    use ndarray::array;

    #[test]
    fn test_from_matrix_splits_indicator_column() {
        let matrix = array![[1.0, 2.0, 0.0], [3.0, 4.0, 1.0], [5.0, 6.0, f64::NAN]];
        let rec = Recording::from_matrix("chb01", "chb01_01", matrix).unwrap();
        assert_eq!(rec.num_channels(), 2);
        assert_eq!(rec.num_samples(), 3);
        assert_eq!(rec.seizure_flags(), &[false, true, false]);
        assert_eq!(rec.channels()[[1, 1]], 4.0);
    }

    #[test]
    fn test_from_matrix_requires_indicator() {
        let matrix = array![[1.0], [2.0]];
        assert!(matches!(
            Recording::from_matrix("s", "s_1", matrix),
            Err(SeizureError::StoreRead(_))
        ));
    }

    #[test]
    fn test_concatenate_preserves_order() {
        let a = Recording::from_matrix("s", "s_1", array![[1.0, 1.0, 0.0]]).unwrap();
        let b = Recording::from_matrix("s", "s_2", array![[2.0, 2.0, 1.0], [3.0, 3.0, 0.0]])
            .unwrap();
        let joined = Recording::concatenate("s", "s", &[a, b]).unwrap();
        assert_eq!(joined.num_samples(), 3);
        assert_eq!(joined.channels()[[2, 0]], 3.0);
        assert_eq!(joined.seizure_flags(), &[false, true, false]);
    }

    #[test]
    fn test_schema_layout() {
        let schema = FeatureSchema::new(&default_bands(), 2);
        assert_eq!(schema.len(), 14);
        assert_eq!(schema.names()[0], "relpower_delta_ch0");
        assert_eq!(schema.names()[1], "relpower_delta_ch1");
        assert_eq!(schema.names()[9], "relpower_gamma_ch1");
        assert_eq!(schema.names()[10], "mean_ch0");
        assert_eq!(schema.names()[13], "variance_ch1");
        assert_eq!(schema.relpower_index(2, 1), 5);
        assert_eq!(schema.mean_index(1), 11);
        assert_eq!(schema.variance_index(0), 12);
        assert_eq!(schema.index_of("relpower_beta_ch0"), Some(6));
    }

    #[test]
    fn test_dataset_rejects_wrong_width() {
        let mut dataset = Dataset::new(FeatureSchema::new(&default_bands(), 2));
        let err = dataset.push(FeatureVector::new(vec![0.0; 3]), false, "s");
        assert!(matches!(
            err,
            Err(SeizureError::DimensionMismatch {
                expected: 14,
                got: 3
            })
        ));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_dataset_select_and_subjects() {
        let mut dataset = Dataset::new(FeatureSchema::new(&default_bands()[..1], 1));
        for (i, subject) in ["b", "a", "b"].iter().enumerate() {
            dataset
                .push(FeatureVector::new(vec![i as f64; 3]), i == 1, *subject)
                .unwrap();
        }
        assert_eq!(dataset.subject_ids(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(dataset.class_counts(), (2, 1));

        let subset = dataset.select(&[2, 0]);
        assert_eq!(subset.features()[0].as_slice(), &[2.0, 2.0, 2.0]);
        assert_eq!(subset.feature_matrix().dim(), (2, 3));
    }
}
