//! End-to-end orchestration.
//!
//! Stages pass explicit values: recordings -> dataset -> split -> balanced
//! training set -> standardized matrices -> fitted model -> report.

use crate::balance::balance;
use crate::config::PipelineConfig;
use crate::error::{Result, SeizureError};
use crate::features::FeatureExtractor;
use crate::metrics::ClassificationMetrics;
use crate::model::{BinaryClassifier, LogisticRegression};
use crate::profile_scope;
use crate::split::leave_one_subject_out;
use crate::standardize::Standardizer;
use crate::store::RecordingStore;
use crate::types::{Dataset, Recording};
use crate::windower::Windower;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-subject overview of a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub recordings: usize,
    pub samples: usize,
    pub seizure_samples: usize,
}

/// Outcome of one leave-one-subject-out evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub id: String,
    pub created_at: String,
    pub test_subject: String,
    pub train_subjects: Vec<String>,
    pub train_rows: usize,
    pub balanced_train_rows: usize,
    pub test_rows: usize,
    pub test_seizure_rows: usize,
    pub random_seed: Option<u64>,
    pub constant_features: Vec<String>,
    pub feature_names: Vec<String>,
    pub metrics: ClassificationMetrics,
}

/// Subjects in order of first appearance with their recording totals
pub fn summarize(recordings: &[Recording]) -> Vec<SubjectSummary> {
    let mut summaries: Vec<SubjectSummary> = Vec::new();
    for rec in recordings {
        let seizure = rec.seizure_flags().iter().filter(|&&f| f).count();
        match summaries.iter_mut().find(|s| s.subject == rec.subject) {
            Some(s) => {
                s.recordings += 1;
                s.samples += rec.num_samples();
                s.seizure_samples += seizure;
            }
            None => summaries.push(SubjectSummary {
                subject: rec.subject.clone(),
                recordings: 1,
                samples: rec.num_samples(),
                seizure_samples: seizure,
            }),
        }
    }
    summaries
}

/// Join each subject's recordings, in discovery order, into one signal.
///
/// Subjects keep the order in which they first appear.
pub fn concatenate_by_subject(recordings: &[Recording]) -> Result<Vec<Recording>> {
    let mut subjects: Vec<&str> = Vec::new();
    for rec in recordings {
        if !subjects.contains(&rec.subject.as_str()) {
            subjects.push(&rec.subject);
        }
    }

    subjects
        .into_iter()
        .map(|subject| {
            let parts: Vec<Recording> = recordings
                .iter()
                .filter(|r| r.subject == subject)
                .cloned()
                .collect();
            Recording::concatenate(subject, subject, &parts)
        })
        .collect()
}

/// Window, featurize and label `recordings` into a dataset.
pub fn build_dataset_from_recordings(
    recordings: &[Recording],
    config: &PipelineConfig,
) -> Result<Dataset> {
    config.validate()?;
    let first = recordings.first().ok_or_else(|| {
        SeizureError::StoreRead("store contains no recordings".to_string())
    })?;
    let num_channels = first.num_channels();
    if let Some(other) = recordings.iter().find(|r| r.num_channels() != num_channels) {
        log::error!(
            "'{}' has {} channels, '{}' has {}",
            first.name,
            num_channels,
            other.name,
            other.num_channels()
        );
        return Err(SeizureError::DimensionMismatch {
            expected: num_channels,
            got: other.num_channels(),
        });
    }

    let grouped;
    let units: &[Recording] = if config.concatenate_hours {
        grouped = concatenate_by_subject(recordings)?;
        &grouped
    } else {
        recordings
    };

    let windower = Windower::from_config(config)?;
    let extractor = FeatureExtractor::new(config, num_channels);
    let mut dataset = Dataset::new(extractor.schema().clone());

    profile_scope!("feature extraction");
    log::info!(
        "Extracting features: {} signals, window {} samples, stride {} samples",
        units.len(),
        windower.window_size(),
        windower.stride()
    );

    for rec in units {
        let rows = extractor.extract_recording(&windower, rec)?;
        log::debug!("'{}': {} windows", rec.name, rows.len());
        for row in rows {
            dataset.push(row.features, row.label, rec.subject.clone())?;
        }
    }

    let (negative, positive) = dataset.class_counts();
    log::info!(
        "Dataset: {} windows ({} seizure, {} non-seizure) across {} subjects",
        dataset.len(),
        positive,
        negative,
        dataset.subject_ids().len()
    );

    Ok(dataset)
}

/// Read every recording from `store` and build the dataset.
///
/// The store is only borrowed; callers that own it release it by dropping
/// it once this returns.
pub fn build_dataset(store: &dyn RecordingStore, config: &PipelineConfig) -> Result<Dataset> {
    let recordings = {
        profile_scope!("store read");
        store.load_all(&config.subject_delimiter)?
    };
    build_dataset_from_recordings(&recordings, config)
}

/// Leave-one-subject-out evaluation of `classifier` on `dataset`.
pub fn evaluate<C: BinaryClassifier>(
    dataset: &Dataset,
    config: &PipelineConfig,
    classifier: &mut C,
) -> Result<EvaluationReport> {
    let test_subject = config.test_subject.as_deref().ok_or_else(|| {
        SeizureError::InvalidParameter("no test subject configured".to_string())
    })?;

    let split = leave_one_subject_out(dataset, test_subject)?;
    let balanced = balance(&split.train, config.random_seed)?;

    let train_x = balanced.feature_matrix();
    let test_x = split.test.feature_matrix();
    let scaler = Standardizer::fit(train_x.view(), dataset.schema(), config.zero_variance)?;
    let train_z = scaler.transform(train_x.view())?;
    let test_z = scaler.transform(test_x.view())?;

    {
        profile_scope!("model fit");
        classifier.fit(train_z.view(), balanced.labels())?;
    }

    let probabilities = classifier.predict_probability(test_z.view())?.to_vec();
    let threshold = classifier.threshold();
    let predictions: Vec<bool> = probabilities.iter().map(|&p| p >= threshold).collect();
    let metrics =
        ClassificationMetrics::compute(split.test.labels(), &predictions, Some(&probabilities))?;

    log::info!(
        "Test subject '{}': accuracy {:.3}, recall {:.3}, specificity {:.3}",
        test_subject,
        metrics.accuracy,
        metrics.recall,
        metrics.specificity
    );

    Ok(EvaluationReport {
        id: Uuid::new_v4().to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        test_subject: test_subject.to_string(),
        train_subjects: split.train.subject_ids(),
        train_rows: split.train.len(),
        balanced_train_rows: balanced.len(),
        test_rows: split.test.len(),
        test_seizure_rows: split.test.class_counts().1,
        random_seed: config.random_seed,
        constant_features: scaler.constant_features().to_vec(),
        feature_names: dataset.schema().names().to_vec(),
        metrics,
    })
}

/// Build the dataset from `store` and evaluate the default logistic regression.
pub fn run(store: &dyn RecordingStore, config: &PipelineConfig) -> Result<EvaluationReport> {
    let dataset = build_dataset(store, config)?;
    let mut model = LogisticRegression::from_config(&config.model);
    evaluate(&dataset, config, &mut model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, ArrayView2};
    use std::cell::Cell;

    fn rec(subject: &str, name: &str, n: usize, seizure: std::ops::Range<usize>) -> Recording {
        let channels = Array2::from_shape_fn((n, 2), |(i, c)| ((i * 31 + c * 17) % 13) as f64);
        let flags = (0..n).map(|i| seizure.contains(&i)).collect();
        Recording::new(subject, name, channels, flags).unwrap()
    }

    #[test]
    fn test_summarize() {
        let recs = vec![
            rec("a", "a_1", 100, 0..0),
            rec("b", "b_1", 50, 10..20),
            rec("a", "a_2", 30, 0..5),
        ];
        let summary = summarize(&recs);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].subject, "a");
        assert_eq!(summary[0].recordings, 2);
        assert_eq!(summary[0].samples, 130);
        assert_eq!(summary[0].seizure_samples, 5);
        assert_eq!(summary[1].seizure_samples, 10);
    }

    #[test]
    fn test_concatenate_by_subject() {
        let recs = vec![
            rec("b", "b_1", 100, 0..0),
            rec("a", "a_1", 50, 0..0),
            rec("b", "b_2", 30, 0..0),
        ];
        let joined = concatenate_by_subject(&recs).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].subject, "b");
        assert_eq!(joined[0].num_samples(), 130);
        assert_eq!(joined[1].num_samples(), 50);
    }

    #[test]
    fn test_hours_windowed_separately() {
        let config = PipelineConfig {
            sampling_rate: 100.0,
            concatenate_hours: false,
            ..Default::default()
        };
        // 2 × 600 samples: 2 windows each separately, 5 when concatenated
        let recs = vec![rec("a", "a_1", 600, 0..0), rec("a", "a_2", 600, 0..0)];
        let separate = build_dataset_from_recordings(&recs, &config).unwrap();
        assert_eq!(separate.len(), 4);

        let joined = build_dataset_from_recordings(
            &recs,
            &PipelineConfig {
                concatenate_hours: true,
                ..config
            },
        )
        .unwrap();
        assert_eq!(joined.len(), 5);
    }

    #[test]
    fn test_empty_and_mismatched_recordings() {
        let config = PipelineConfig::default();
        assert!(matches!(
            build_dataset_from_recordings(&[], &config),
            Err(SeizureError::StoreRead(_))
        ));

        let three = Recording::new("b", "b_1", Array2::zeros((2048, 3)), vec![false; 2048])
            .unwrap();
        let recs = vec![rec("a", "a_1", 2048, 0..0), three];
        assert!(matches!(
            build_dataset_from_recordings(&recs, &config),
            Err(SeizureError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    /// Constant-probability classifier that counts scoring passes
    struct Fixed {
        probability: f64,
        threshold: f64,
        scored: Cell<usize>,
    }

    impl BinaryClassifier for Fixed {
        fn fit(&mut self, _features: ArrayView2<'_, f64>, _labels: &[bool]) -> Result<()> {
            Ok(())
        }

        fn predict_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
            self.scored.set(self.scored.get() + 1);
            Ok(Array1::from_elem(features.nrows(), self.probability))
        }

        fn threshold(&self) -> f64 {
            self.threshold
        }
    }

    #[test]
    fn test_evaluate_scores_once_with_classifier_threshold() {
        let config = PipelineConfig {
            sampling_rate: 100.0,
            test_subject: Some("b".to_string()),
            ..Default::default()
        };
        let recs = vec![
            rec("a", "a_1", 2000, 1000..1200),
            rec("b", "b_1", 2000, 1000..1200),
        ];
        let dataset = build_dataset_from_recordings(&recs, &config).unwrap();

        let mut below = Fixed {
            probability: 0.6,
            threshold: 0.7,
            scored: Cell::new(0),
        };
        let report = evaluate(&dataset, &config, &mut below).unwrap();
        assert_eq!(below.scored.get(), 1);
        let cm = report.metrics.confusion_matrix;
        assert_eq!(cm.tp + cm.fp, 0);
        assert_eq!(cm.tn + cm.fn_, report.test_rows);

        let mut above = Fixed {
            probability: 0.6,
            threshold: 0.5,
            scored: Cell::new(0),
        };
        let report = evaluate(&dataset, &config, &mut above).unwrap();
        assert_eq!(above.scored.get(), 1);
        assert_eq!(report.metrics.confusion_matrix.tp, report.test_seizure_rows);
        assert_eq!(report.metrics.recall, 1.0);
    }

    #[test]
    fn test_evaluate_requires_test_subject() {
        let config = PipelineConfig {
            sampling_rate: 100.0,
            ..Default::default()
        };
        let dataset =
            build_dataset_from_recordings(&[rec("a", "a_1", 2000, 1000..1200)], &config).unwrap();
        let mut model = LogisticRegression::default();
        assert!(matches!(
            evaluate(&dataset, &config, &mut model),
            Err(SeizureError::InvalidParameter(_))
        ));

        let config = PipelineConfig {
            test_subject: Some("nobody".to_string()),
            ..config
        };
        assert!(matches!(
            evaluate(&dataset, &config, &mut model),
            Err(SeizureError::UnknownSubject(_))
        ));
    }
}
