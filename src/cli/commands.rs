// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `test` and `evaluate`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the comment generator on the training corpus
    Train(TrainArgs),

    /// Greedy-decode test examples and print expected vs. generated
    Test(TestArgs),

    /// Rank candidate comments per example and print retrieval metrics
    Evaluate(EvaluateArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line; the defaults are
/// the hyperparameters the model was designed around.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Newline-delimited JSON training records: {video, time, context, comment}
    #[arg(long, default_value = "data/train-context.json")]
    pub train_path: String,

    /// Vocabulary file with the word2id / id2word mappings
    #[arg(long, default_value = "data/dicts-30000.json")]
    pub vocab_path: String,

    /// Frame feature store: JSON map of video id → frame vectors
    #[arg(long, default_value = "data/frames.json")]
    pub frames_path: String,

    /// Directory to save model checkpoints
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Resume from the checkpoints in --checkpoint-dir
    #[arg(long, default_value_t = false)]
    pub resume: bool,

    /// Number of prior comments concatenated into the textual context
    #[arg(long, default_value_t = 5)]
    pub n_con: usize,

    /// Number of frames drawn around the comment timestamp
    #[arg(long, default_value_t = 5)]
    pub n_frame: usize,

    /// Maximum comment length in tokens, including <BOS> and <EOS>
    #[arg(long, default_value_t = 20)]
    pub max_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Dimensionality of the pre-extracted frame feature vectors
    #[arg(long, default_value_t = 512)]
    pub vec_size: usize,

    /// Hidden size shared by both encoders and the decoder
    #[arg(long, default_value_t = 512)]
    pub n_hidden: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Attention scoring strategy: dot, general or concat
    #[arg(long, default_value = "general")]
    pub attn: String,

    /// Attend over the text encoder outputs instead of the video
    /// encoder outputs (experimental; the default wiring attends video)
    #[arg(long, default_value_t = false)]
    pub attend_text: bool,

    /// Keep only every Nth training example (1 = use everything)
    #[arg(long, default_value_t = 1)]
    pub subsample: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_path:     a.train_path,
            vocab_path:     a.vocab_path,
            frames_path:    a.frames_path,
            checkpoint_dir: a.checkpoint_dir,
            n_con:          a.n_con,
            n_frame:        a.n_frame,
            max_len:        a.max_len,
            batch_size:     a.batch_size,
            vec_size:       a.vec_size,
            n_hidden:       a.n_hidden,
            epochs:         a.epochs,
            lr:             a.lr,
            attn:           a.attn,
            attend_text:    a.attend_text,
            subsample:      a.subsample,
        }
    }
}

/// All arguments for the `test` command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Newline-delimited JSON test records with reference comments
    #[arg(long, default_value = "data/test-candidate.json")]
    pub test_path: String,

    /// Vocabulary file (same as used during training)
    #[arg(long, default_value = "data/dicts-30000.json")]
    pub vocab_path: String,

    /// Frame feature store (same as used during training)
    #[arg(long, default_value = "data/frames.json")]
    pub frames_path: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Newline-delimited JSON records carrying the candidate sets
    #[arg(long, default_value = "data/test-candidate.json")]
    pub test_path: String,

    /// Vocabulary file (same as used during training)
    #[arg(long, default_value = "data/dicts-30000.json")]
    pub vocab_path: String,

    /// Frame feature store (same as used during training)
    #[arg(long, default_value = "data/frames.json")]
    pub frames_path: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Keep only every Nth evaluation example (1 = use everything)
    #[arg(long, default_value_t = 1)]
    pub subsample: usize,
}
