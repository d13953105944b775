use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "seizure",
    version,
    about = "EEG seizure detection: windowed features and leave-one-subject-out evaluation",
    long_about = "Extract per-window statistical and band-power features from EEG recordings\n\
                  and evaluate a seizure classifier with one subject held out.\n\
                  A store is a directory of CSV/TXT files, a glob pattern, or an HDF5 file\n\
                  with one samples × (channels + indicator) array per subject-hour."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build features, hold out one subject, train and evaluate
    Run(RunArgs),
    /// Build the feature dataset and print it as JSON
    Features(FeaturesArgs),
    /// List subjects found in a store
    Subjects(SubjectsArgs),
    /// Print the feature column layout
    Schema(SchemaArgs),
}

/// Options shared by every command that extracts features
#[derive(Args)]
pub struct PipelineArgs {
    /// Recording store (directory, glob pattern, or .h5 file)
    #[arg(long, env = "SEIZURE_STORE")]
    pub store: String,

    /// JSON config file; flags below override its values
    #[arg(long)]
    pub config: Option<String>,

    /// Sampling rate in Hz
    #[arg(long)]
    pub sampling_rate: Option<f64>,

    /// Window length in seconds
    #[arg(long)]
    pub window_seconds: Option<f64>,

    /// Window stride in seconds
    #[arg(long)]
    pub stride_seconds: Option<f64>,

    /// Welch segment length in samples
    #[arg(long)]
    pub welch_segment_len: Option<usize>,

    /// Separator between subject id and hour in array names
    #[arg(long)]
    pub subject_delimiter: Option<String>,

    /// Window each subject-hour separately instead of concatenating hours
    #[arg(long, default_value_t = false)]
    pub per_hour: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Subject held out as the test set
    #[arg(long)]
    pub test_subject: Option<String>,

    /// Seed for class balancing
    #[arg(long, conflicts_with = "no_seed")]
    pub seed: Option<u64>,

    /// Balance with OS entropy (not reproducible)
    #[arg(long, default_value_t = false)]
    pub no_seed: bool,

    /// Fail instead of leaving constant features unscaled
    #[arg(long, default_value_t = false)]
    pub reject_constant: bool,

    /// Inverse L2 regularization strength of the logistic regression
    #[arg(long)]
    pub c: Option<f64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct SubjectsArgs {
    /// Recording store (directory, glob pattern, or .h5 file)
    #[arg(long, env = "SEIZURE_STORE")]
    pub store: String,

    /// Separator between subject id and hour in array names
    #[arg(long, default_value = "_")]
    pub subject_delimiter: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// JSON config file defining the bands
    #[arg(long)]
    pub config: Option<String>,

    /// Number of signal channels
    #[arg(long, default_value_t = 2)]
    pub channels: usize,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
