// ============================================================
// Layer 4 — Sample Construction & Dataset
// ============================================================
// Turns raw records into fixed-shape samples:
//
//   X — frame window drawn center-out around `time - 1`
//       (the files store 1-based timestamps)
//   Y — the padded ground-truth comment (training) or the padded
//       first reference comment (single-reference testing)
//   T — the concatenated prior-comment context, padded to
//       max_len * n_con tokens and treated as ONE blob, not
//       n_con separate sequences
//
// Evaluation keeps Y as the raw candidate map — the evaluator
// pads each candidate itself, once per scoring pass.
//
// Records whose frame window comes back empty (unknown video id
// or timestamp outside the clip) are skipped with a warning
// rather than crashing the run.
//
// Reference: Burn Book §4 (Datasets)

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::context::DataContext;
use crate::domain::example::{CandidateRecord, TrainRecord};

/// Shape parameters shared by every sample builder.
#[derive(Debug, Clone, Copy)]
pub struct SampleSpec {
    /// Number of prior comments folded into the context blob
    pub n_con: usize,
    /// Frame window capacity
    pub n_frame: usize,
    /// Comment length in tokens, including <BOS> and <EOS>
    pub max_len: usize,
}

impl SampleSpec {
    /// Total padded length of the textual-context blob.
    pub fn context_len(&self) -> usize {
        self.max_len * self.n_con
    }
}

/// One fully padded sample ready for batching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSample {
    /// Frame window in draw order; at most n_frame vectors, fewer
    /// near clip boundaries
    pub frames: Vec<Vec<f32>>,
    /// Padded target comment, exactly max_len ids
    pub comment: Vec<u32>,
    /// Padded context blob, exactly max_len * n_con ids
    pub context: Vec<u32>,
}

/// One ranking-evaluation example. The candidate map stays
/// unpadded; the evaluator pads each candidate to max_len itself.
#[derive(Debug, Clone)]
pub struct EvalExample {
    pub frames: Vec<Vec<f32>>,
    pub context: Vec<u32>,
    pub candidates: BTreeMap<String, u8>,
}

/// Build training samples from training records.
pub fn build_train_samples(
    records: &[TrainRecord],
    ctx: &DataContext,
    spec: SampleSpec,
) -> Vec<CommentSample> {
    let mut samples = Vec::with_capacity(records.len());
    for record in records {
        match build_sample(ctx, spec, &record.video, record.time, &record.context, &record.comment)
        {
            Some(sample) => samples.push(sample),
            None => {
                tracing::warn!("Skipping '{}' t={}: empty frame window", record.video, record.time)
            }
        }
    }
    samples
}

/// Build single-reference test samples from candidate records,
/// targeting the first reference comment of each.
pub fn build_reference_samples(
    records: &[CandidateRecord],
    ctx: &DataContext,
    spec: SampleSpec,
) -> Vec<CommentSample> {
    let mut samples = Vec::with_capacity(records.len());
    for record in records {
        let Some(reference) = record.comment.first() else {
            tracing::warn!("Skipping '{}' t={}: no reference comment", record.video, record.time);
            continue;
        };
        match build_sample(ctx, spec, &record.video, record.time, &record.context, reference) {
            Some(sample) => samples.push(sample),
            None => {
                tracing::warn!("Skipping '{}' t={}: empty frame window", record.video, record.time)
            }
        }
    }
    samples
}

/// Build ranking-evaluation examples from candidate records.
pub fn build_eval_examples(
    records: &[CandidateRecord],
    ctx: &DataContext,
    spec: SampleSpec,
) -> Vec<EvalExample> {
    let mut examples = Vec::with_capacity(records.len());
    for record in records {
        let frames = ctx
            .frames
            .window(&record.video, record.time.saturating_sub(1), spec.n_frame);
        if frames.is_empty() {
            tracing::warn!("Skipping '{}' t={}: empty frame window", record.video, record.time);
            continue;
        }
        if record.candidate.is_empty() {
            tracing::warn!("Skipping '{}' t={}: empty candidate set", record.video, record.time);
            continue;
        }
        examples.push(EvalExample {
            frames,
            context: ctx.vocab.pad(&record.context, spec.context_len()),
            candidates: record.candidate.clone(),
        });
    }
    examples
}

fn build_sample(
    ctx: &DataContext,
    spec: SampleSpec,
    video: &str,
    time: usize,
    context: &str,
    comment: &str,
) -> Option<CommentSample> {
    // 1-based timestamp → 0-based frame index
    let frames = ctx.frames.window(video, time.saturating_sub(1), spec.n_frame);
    if frames.is_empty() {
        return None;
    }
    Some(CommentSample {
        frames,
        comment: ctx.vocab.pad(comment, spec.max_len),
        context: ctx.vocab.pad(context, spec.context_len()),
    })
}

/// Burn Dataset over pre-built samples, so the DataLoader can
/// shuffle and batch them.
pub struct CommentDataset {
    samples: Vec<CommentSample>,
}

impl CommentDataset {
    pub fn new(samples: Vec<CommentSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<CommentSample> for CommentDataset {
    fn get(&self, index: usize) -> Option<CommentSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
