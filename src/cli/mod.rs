// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains the generator on the training corpus
//   2. `test`     — greedy-decodes test examples and prints them
//   3. `evaluate` — ranks candidate comments and prints metrics
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "video-comment-gen",
    version = "0.1.0",
    about = "Train a video comment generator on frame features and prior comments, \
             then generate and rank comments."
)]
pub struct Cli {
    /// The subcommand to run (train, test or evaluate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => {
                use crate::application::train_use_case::TrainUseCase;

                tracing::info!("Starting training on '{}'", args.train_path);
                let resume = args.resume;
                let use_case = TrainUseCase::new(args.into());
                use_case.execute(resume)?;

                println!("Training complete. Checkpoints saved.");
                Ok(())
            }
            Commands::Test(args) => {
                use crate::application::test_use_case::TestUseCase;

                let use_case = TestUseCase::new(args)?;
                use_case.execute()
            }
            Commands::Evaluate(args) => {
                use crate::application::evaluate_use_case::EvaluateUseCase;

                let use_case = EvaluateUseCase::new(args)?;
                let report = use_case.execute()?;
                println!("{report}");
                Ok(())
            }
        }
    }
}
