// ============================================================
// Layer 2 — Train Use Case
// ============================================================
// Orchestrates a full training run:
//
//   1. Load the vocabulary and frame store
//   2. Load (and optionally subsample) the training records
//   3. Build padded samples and wrap them in a Dataset
//   4. Persist the config next to the checkpoints, then hand off
//      to the training loop
//
// The persisted config is what `test` and `evaluate` later use to
// rebuild the model with the same dimensions.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::data::context::DataContext;
use crate::data::dataset::{build_train_samples, CommentDataset, SampleSpec};
use crate::data::loader;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer;

/// Everything a training run needs, decoupled from clap so the
/// application layer can be driven from tests or other front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_path: String,
    pub vocab_path: String,
    pub frames_path: String,
    pub checkpoint_dir: String,
    pub n_con: usize,
    pub n_frame: usize,
    pub max_len: usize,
    pub batch_size: usize,
    pub vec_size: usize,
    pub n_hidden: usize,
    pub epochs: usize,
    pub lr: f64,
    pub attn: String,
    pub attend_text: bool,
    pub subsample: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_path: "data/train-context.json".to_string(),
            vocab_path: "data/dicts-30000.json".to_string(),
            frames_path: "data/frames.json".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            n_con: 5,
            n_frame: 5,
            max_len: 20,
            batch_size: 128,
            vec_size: 512,
            n_hidden: 512,
            epochs: 50,
            lr: 1e-3,
            attn: "general".to_string(),
            attend_text: false,
            subsample: 1,
        }
    }
}

impl TrainConfig {
    pub fn sample_spec(&self) -> SampleSpec {
        SampleSpec {
            n_con: self.n_con,
            n_frame: self.n_frame,
            max_len: self.max_len,
        }
    }
}

pub struct TrainUseCase {
    cfg: TrainConfig,
}

impl TrainUseCase {
    pub fn new(cfg: TrainConfig) -> Self {
        Self { cfg }
    }

    pub fn execute(&self, resume: bool) -> Result<()> {
        let ctx = DataContext::load(&self.cfg.vocab_path, &self.cfg.frames_path)?;
        tracing::info!(
            "Loaded vocabulary ({} words) and frame store ({} videos)",
            ctx.vocab.len(),
            ctx.frames.video_count(),
        );

        let mut records = loader::load_train_records(&self.cfg.train_path)?;
        if self.cfg.subsample > 1 {
            records = records.into_iter().step_by(self.cfg.subsample).collect();
            tracing::info!("Subsampled to {} records", records.len());
        }

        let samples = build_train_samples(&records, &ctx, self.cfg.sample_spec());
        ensure!(
            !samples.is_empty(),
            "No usable training samples in '{}'",
            self.cfg.train_path
        );
        tracing::info!("Built {} training samples", samples.len());
        let dataset = CommentDataset::new(samples);

        let ckpt_manager = CheckpointManager::new(&self.cfg.checkpoint_dir)?;
        ckpt_manager.save_config(&self.cfg)?;

        trainer::run_training(&self.cfg, dataset, ckpt_manager, ctx.vocab.len(), resume)
    }
}
