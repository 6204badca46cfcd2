// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `classify`, `verify`
// and all their configurable flags.
//
// clap's derive macros generate help text, missing-argument
// errors, and string → number conversions.

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the jailbreak classifier and export an artifact
    Train(TrainArgs),

    /// Classify a prompt using an exported artifact
    Classify(ClassifyArgs),

    /// Smoke-test that an exported artifact loads and runs
    Verify(VerifyArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Optional CSV file of jailbreak prompts (text column is
    /// auto-detected); the built-in seed corpus is always used
    #[arg(long)]
    pub csv: Option<String>,

    /// Directory to write the artifact (manifest + weights)
    #[arg(long, default_value = "artifact")]
    pub artifact_dir: String,

    /// Fixed token sequence length; longer prompts are truncated
    #[arg(long, default_value_t = 64)]
    pub max_len: usize,

    /// Number of tokenizer hash buckets
    #[arg(long, default_value_t = 8192)]
    pub vocab_size: usize,

    /// Embedding vector width
    #[arg(long, default_value_t = 64)]
    pub embed_dim: usize,

    /// Hidden layer width
    #[arg(long, default_value_t = 64)]
    pub hidden_dim: usize,

    /// Dropout probability on hidden activations during training
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Number of samples per forward pass
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 15)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of the corpus used for training (rest validates)
    #[arg(long, default_value_t = 0.75)]
    pub train_fraction: f64,

    /// Seed for shuffling, splitting, and synthetic generation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 — the
/// application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            csv_path:       a.csv,
            artifact_dir:   a.artifact_dir,
            max_len:        a.max_len,
            vocab_size:     a.vocab_size,
            embed_dim:      a.embed_dim,
            hidden_dim:     a.hidden_dim,
            dropout:        a.dropout,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The prompt text to classify
    #[arg(long)]
    pub text: String,

    /// Directory with the exported artifact
    #[arg(long, default_value = "artifact")]
    pub artifact_dir: String,
}

/// All arguments for the `verify` command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Directory with the exported artifact
    #[arg(long, default_value = "artifact")]
    pub artifact_dir: String,

    /// Placeholder batch size for the smoke test
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,
}
