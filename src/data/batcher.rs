// ============================================================
// Layer 4 — Comment Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<CommentSample>
// into device-ready tensors.
//
// Token sequences are already padded to fixed lengths, so they
// stack directly. Frame windows are the exception: near a clip
// boundary a sample may carry fewer than n_frame frames, so the
// batcher zero-pads every window to the longest window in the
// batch before stacking.
//
//   frames:   [batch, max_window, vec_size]  (f32)
//   comments: [batch, max_len]               (int ids)
//   context:  [batch, max_len * n_con]       (int ids)
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::CommentSample;

/// A batch of comment samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct CommentBatch<B: Backend> {
    /// Frame windows, zero-padded — shape: [batch, frames, vec_size]
    pub frames: Tensor<B, 3>,

    /// Padded target comments — shape: [batch, max_len]
    pub comments: Tensor<B, 2, Int>,

    /// Padded context blobs — shape: [batch, max_len * n_con]
    pub context: Tensor<B, 2, Int>,
}

/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct CommentBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> CommentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<CommentSample, CommentBatch<B>> for CommentBatcher<B> {
    fn batch(&self, items: Vec<CommentSample>) -> CommentBatch<B> {
        let batch_size = items.len();
        let comment_len = items[0].comment.len();
        let context_len = items[0].context.len();

        // The dataset never emits an empty window, so the first
        // frame of the first sample fixes the feature width.
        let vec_size = items[0].frames[0].len();
        let max_window = items.iter().map(|s| s.frames.len()).max().unwrap_or(1);

        // ── Zero-pad and flatten the frame windows ────────────────────────────
        let mut frames_flat = Vec::with_capacity(batch_size * max_window * vec_size);
        for sample in &items {
            for frame in &sample.frames {
                frames_flat.extend_from_slice(frame);
            }
            let missing = max_window - sample.frames.len();
            frames_flat.extend(std::iter::repeat(0.0f32).take(missing * vec_size));
        }

        // ── Flatten the token id sequences ────────────────────────────────────
        let comments_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.comment.iter().map(|&x| x as i32))
            .collect();

        let context_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.context.iter().map(|&x| x as i32))
            .collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let frames = Tensor::<B, 1>::from_floats(frames_flat.as_slice(), &self.device)
            .reshape([batch_size, max_window, vec_size]);

        let comments = Tensor::<B, 1, Int>::from_ints(comments_flat.as_slice(), &self.device)
            .reshape([batch_size, comment_len]);

        let context = Tensor::<B, 1, Int>::from_ints(context_flat.as_slice(), &self.device)
            .reshape([batch_size, context_len]);

        CommentBatch { frames, comments, context }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn sample(n_frames: usize, vec_size: usize) -> CommentSample {
        CommentSample {
            frames: (0..n_frames).map(|i| vec![i as f32; vec_size]).collect(),
            comment: vec![1, 4, 5, 2, 0, 0],
            context: vec![1, 4, 2, 0, 0, 0, 0, 0],
        }
    }

    #[test]
    fn stacks_fixed_length_token_sequences() {
        let device = Default::default();
        let batcher = CommentBatcher::<TestBackend>::new(device);
        let batch = batcher.batch(vec![sample(5, 4), sample(5, 4)]);

        assert_eq!(batch.comments.dims(), [2, 6]);
        assert_eq!(batch.context.dims(), [2, 8]);
        assert_eq!(batch.frames.dims(), [2, 5, 4]);
    }

    #[test]
    fn zero_pads_short_frame_windows() {
        let device = Default::default();
        let batcher = CommentBatcher::<TestBackend>::new(device);
        let batch = batcher.batch(vec![sample(5, 3), sample(2, 3)]);

        assert_eq!(batch.frames.dims(), [2, 5, 3]);

        // The padded tail of the short window must be all zeros.
        let tail: Vec<f32> = batch
            .frames
            .slice([1..2, 2..5, 0..3])
            .into_data()
            .to_vec()
            .unwrap();
        assert!(tail.iter().all(|&x| x == 0.0));
    }
}
