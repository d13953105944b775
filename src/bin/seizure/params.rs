use crate::cli::{PipelineArgs, RunArgs};
use seizure_rs::{PipelineConfig, Result, ZeroVariancePolicy};
use std::path::Path;

/// Config file (or defaults) with the feature-extraction flags applied.
pub fn resolve_pipeline_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let config = load_with_overrides(args)?;
    config.validate()?;
    Ok(config)
}

/// As [`resolve_pipeline_config`], plus the evaluation flags.
pub fn resolve_run_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = load_with_overrides(&args.pipeline)?;

    if let Some(ref subject) = args.test_subject {
        config.test_subject = Some(subject.clone());
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if args.no_seed {
        config.random_seed = None;
    }
    if args.reject_constant {
        config.zero_variance = ZeroVariancePolicy::Reject;
    }
    if let Some(c) = args.c {
        config.model.c = c;
    }

    config.validate()?;
    Ok(config)
}

fn load_with_overrides(args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(Path::new(path))?,
        None => PipelineConfig::default(),
    };

    if let Some(rate) = args.sampling_rate {
        config.sampling_rate = rate;
    }
    if let Some(seconds) = args.window_seconds {
        config.window_seconds = seconds;
    }
    if let Some(seconds) = args.stride_seconds {
        config.stride_seconds = seconds;
    }
    if let Some(len) = args.welch_segment_len {
        config.welch_segment_len = len;
    }
    if let Some(ref delimiter) = args.subject_delimiter {
        config.subject_delimiter = delimiter.clone();
    }
    if args.per_hour {
        config.concatenate_hours = false;
    }

    Ok(config)
}
