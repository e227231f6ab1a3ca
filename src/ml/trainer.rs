// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full training loop using Burn's DataLoader and Adam.
//
//   - Training backend is Autodiff<Wgpu> for gradients
//   - Teacher forcing: the decoder is fed the ground-truth
//     previous token at every step
//   - Parameters are mutated only by the optimizer step; a new
//     forward pass never starts before the previous step's
//     update finished (strict sequential batch iteration)
//   - All three components are checkpointed at the end of every
//     epoch, overwriting the previous epoch's files
//
// The reference trainer stepped three Adam instances with
// identical hyperparameters, one per component. Adam's update is
// per-parameter, so one Adam over the disjoint union of the three
// components' parameters performs the identical update; collapsed
// here because burn extracts gradients once per backward pass.
// See DESIGN.md.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::CommentBatcher, dataset::CommentDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::attention::AttnMethod;
use crate::ml::model::{CommentModel, CommentModelConfig};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

pub fn run_training(
    cfg: &TrainConfig,
    dataset: CommentDataset,
    ckpt_manager: CheckpointManager,
    vocab_size: usize,
    resume: bool,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, dataset, ckpt_manager, vocab_size, resume, device)
}

fn train_loop(
    cfg: &TrainConfig,
    dataset: CommentDataset,
    ckpt_manager: CheckpointManager,
    vocab_size: usize,
    resume: bool,
    device: burn::backend::wgpu::WgpuDevice,
) -> Result<()> {
    // ── Build model ───────────────────────────────────────────────────────────
    let method: AttnMethod = cfg.attn.parse()?;
    let model_cfg = CommentModelConfig::new(
        vocab_size, cfg.vec_size, cfg.n_hidden, cfg.max_len, method,
    )
    .with_attend_text(cfg.attend_text);
    let mut model: CommentModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: hidden={}, attention={}, vocab={}",
        cfg.n_hidden, cfg.attn, vocab_size,
    );

    // ── Resume from checkpoint ────────────────────────────────────────────────
    // Missing checkpoints are fatal: resuming a run that never
    // completed an epoch is a caller error.
    if resume {
        tracing::info!("Resuming from checkpoints in '{}'", cfg.checkpoint_dir);
        model.t_encoder = ckpt_manager.load_component("t_encoder", model.t_encoder, &device)?;
        model.v_encoder = ckpt_manager.load_component("v_encoder", model.v_encoder, &device)?;
        model.decoder = ckpt_manager.load_component("decoder", model.decoder, &device)?;
        tracing::info!("Resumed from epoch {}", ckpt_manager.latest_epoch()?);
    }

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader ──────────────────────────────────────────────────
    let batcher = CommentBatcher::<TrainBackend>::new(device.clone());
    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(dataset);

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;

        for batch in loader.iter() {
            let (_logits, loss) =
                model.forward(batch.frames, batch.comments, batch.context, true);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches += 1;
            tracing::debug!("Epoch {} batch {}: loss {:.4}", epoch, batches, loss_val);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_loss = if batches > 0 {
            loss_sum / batches as f64
        } else {
            f64::NAN
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4}",
            epoch, cfg.epochs, avg_loss,
        );
        metrics.log(&EpochMetrics::new(epoch, avg_loss))?;

        // One blob per component, overwritten every epoch. A crash
        // mid-write corrupts the checkpoint; restart from an older
        // copy held externally.
        ckpt_manager.save_component("t_encoder", &model.t_encoder)?;
        ckpt_manager.save_component("v_encoder", &model.v_encoder)?;
        ckpt_manager.save_component("decoder", &model.decoder)?;
        ckpt_manager.mark_epoch(epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}
