pub mod balance;
pub mod config;
pub mod error;
pub mod features;
pub mod labels;
pub mod metrics;
pub mod mmap_utils;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod profiling;
pub mod spectral;
pub mod split;
pub mod standardize;
pub mod store;
pub mod types;
pub mod windower;

pub use config::{default_bands, FrequencyBand, ModelConfig, PipelineConfig, ZeroVariancePolicy};
pub use error::{Result, SeizureError};
pub use features::FeatureExtractor;
pub use metrics::{ClassificationMetrics, ConfusionMatrix};
pub use model::{BinaryClassifier, LogisticRegression};
pub use pipeline::{build_dataset, evaluate, EvaluationReport, SubjectSummary};
pub use standardize::Standardizer;
pub use store::{RecordingStore, StoreFactory, TextStore};
pub use types::*;
pub use windower::Windower;
