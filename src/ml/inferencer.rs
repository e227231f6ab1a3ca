// ============================================================
// Layer 5 — Inference Engine
// ============================================================
// Loads the trained components from their checkpoints and runs
// single-example forward passes on a non-autodiff backend:
//
//   generate — greedy decoding, returns the raw token id sequence
//   score    — teacher-forced loss of a candidate comment (lower
//              means the model considers it more plausible)
//
// The model dimensions come from the persisted training config,
// so inference never has to guess what the checkpoints contain.

use anyhow::Result;
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::batcher::CommentBatcher;
use crate::data::dataset::CommentSample;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::attention::AttnMethod;
use crate::ml::model::{CommentModel, CommentModelConfig};

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer {
    model: CommentModel<InferBackend>,
    batcher: CommentBatcher<InferBackend>,
}

impl Inferencer {
    /// Rebuild the model from the persisted training config and the
    /// three component checkpoints.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, vocab_size: usize) -> Result<Self> {
        let cfg = ckpt_manager.load_config()?;
        let method: AttnMethod = cfg.attn.parse()?;

        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);

        let mut model: CommentModel<InferBackend> = CommentModelConfig::new(
            vocab_size, cfg.vec_size, cfg.n_hidden, cfg.max_len, method,
        )
        .with_attend_text(cfg.attend_text)
        .init(&device);

        model.t_encoder = ckpt_manager.load_component("t_encoder", model.t_encoder, &device)?;
        model.v_encoder = ckpt_manager.load_component("v_encoder", model.v_encoder, &device)?;
        model.decoder = ckpt_manager.load_component("decoder", model.decoder, &device)?;
        tracing::info!(
            "Loaded checkpoints from epoch {}",
            ckpt_manager.latest_epoch()?
        );

        Ok(Self {
            model,
            batcher: CommentBatcher::new(device),
        })
    }

    /// Greedy decoding for one example. The returned ids include
    /// everything the decoder emitted over its fixed number of
    /// steps; the caller strips <EOS> and padding when rendering.
    pub fn generate(&self, sample: &CommentSample) -> Vec<u32> {
        let batch = self.batcher.batch(vec![sample.clone()]);
        let (logits, _loss) =
            self.model
                .forward(batch.frames, batch.comments, batch.context, false);

        let [steps, _] = logits.dims();
        logits
            .argmax(1)
            .reshape([steps])
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap_or_default()
            .into_iter()
            .map(|id: i64| id as u32)
            .collect()
    }

    /// Loss of the sample's comment given its video and textual
    /// context, used to rank candidate comments. The decoder feeds
    /// itself greedily, exactly as during generation; the candidate
    /// enters only as the cross-entropy target.
    pub fn score(&self, sample: &CommentSample) -> f64 {
        let batch = self.batcher.batch(vec![sample.clone()]);
        let (_logits, loss) =
            self.model
                .forward(batch.frames, batch.comments, batch.context, false);
        loss.into_scalar().elem::<f64>()
    }
}
