// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction; uses `clap` to parse
// command line arguments and delegates everything else to
// Layer 2 (application).
//
// Three commands:
//   1. `train`    — trains the classifier, exports an artifact
//   2. `classify` — loads an artifact and labels a prompt
//   3. `verify`   — smoke-tests that an artifact loads and runs

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, TrainArgs, VerifyArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "promptguard",
    version = "0.1.0",
    about = "Train and run a tiny SAFE/JAILBREAK prompt classifier."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use
    /// case. The CLI layer only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Classify(args) => Self::run_classify(args),
            Commands::Verify(args)   => Self::run_verify(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training, artifact dir: {}", args.artifact_dir);

        // CLI args → application config (presentation stays out of Layer 2)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Artifact exported.");
        Ok(())
    }

    /// Handles the `classify` subcommand.
    fn run_classify(args: ClassifyArgs) -> Result<()> {
        use crate::application::classify_use_case::ClassifyUseCase;
        use crate::domain::traits::PromptClassifier;

        let use_case = ClassifyUseCase::new(args.artifact_dir.clone())?;
        let result = use_case.classify(&args.text)?;

        println!(
            "{}  (logits: safe={:.4}, jailbreak={:.4})",
            result.label, result.logits[0], result.logits[1],
        );
        Ok(())
    }

    /// Handles the `verify` subcommand.
    fn run_verify(args: VerifyArgs) -> Result<()> {
        use crate::application::verify_use_case::VerifyUseCase;

        VerifyUseCase::new(args.artifact_dir.clone()).execute(args.batch_size)?;

        println!("Artifact verified: loads and runs with the declared shapes.");
        Ok(())
    }
}
