// ============================================================
// Layer 5 — Visual & Text Encoders
// ============================================================
// Two independent single-layer GRU encoders. Both are stateless
// per call: given fixed parameters and input they are
// deterministic, and the (outputs, hidden) pair they return is
// owned by the caller and never mutated by later decode steps.
//
//   VideoEncoder: frame feature window [B, F, D] → ([B, F, H], [B, H])
//   TextEncoder:  context token ids    [B, S]    → ([B, S, H], [B, H])
//
// The text encoder embeds ids first; an id outside the embedding
// range is a fatal index error by design (the vocabulary
// construction guarantees it cannot happen).

use burn::{
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
};

use crate::ml::rnn::{GruCell, GruCellConfig};

#[derive(Config, Debug)]
pub struct VideoEncoderConfig {
    /// Frame feature dimensionality
    pub input_size: usize,
    pub hidden_size: usize,
}

impl VideoEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> VideoEncoder<B> {
        VideoEncoder {
            gru: GruCellConfig::new(self.input_size, self.hidden_size).init(device),
        }
    }
}

/// Recurrent encoder over the frame feature window.
#[derive(Module, Debug)]
pub struct VideoEncoder<B: Backend> {
    gru: GruCell<B>,
}

impl<B: Backend> VideoEncoder<B> {
    pub fn forward(&self, frames: Tensor<B, 3>) -> (Tensor<B, 3>, Tensor<B, 2>) {
        self.gru.forward_sequence(frames, None)
    }
}

#[derive(Config, Debug)]
pub struct TextEncoderConfig {
    pub vocab_size: usize,
    pub hidden_size: usize,
}

impl TextEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TextEncoder<B> {
        TextEncoder {
            embedding: EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device),
            gru: GruCellConfig::new(self.hidden_size, self.hidden_size).init(device),
            hidden_size: self.hidden_size,
        }
    }
}

/// Embedding + recurrent encoder over the textual-context blob.
#[derive(Module, Debug)]
pub struct TextEncoder<B: Backend> {
    embedding: Embedding<B>,
    gru: GruCell<B>,
    hidden_size: usize,
}

impl<B: Backend> TextEncoder<B> {
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> (Tensor<B, 3>, Tensor<B, 2>) {
        let embedded = self.embedding.forward(tokens);
        self.gru.forward_sequence(embedded, None)
    }

    /// Explicit zero hidden state for callers that need one.
    pub fn init_hidden(&self, batch_size: usize, device: &B::Device) -> Tensor<B, 2> {
        Tensor::zeros([batch_size, self.hidden_size], device)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Distribution;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn video_encoder_shapes() {
        let device = Default::default();
        let encoder = VideoEncoderConfig::new(16, 8).init::<TestBackend>(&device);

        let frames = Tensor::random([2, 5, 16], Distribution::Uniform(-1.0, 1.0), &device);
        let (outputs, hidden) = encoder.forward(frames);
        assert_eq!(outputs.dims(), [2, 5, 8]);
        assert_eq!(hidden.dims(), [2, 8]);
    }

    #[test]
    fn text_encoder_shapes() {
        let device = Default::default();
        let encoder = TextEncoderConfig::new(50, 8).init::<TestBackend>(&device);

        let tokens = Tensor::<TestBackend, 1, Int>::from_ints(
            [1, 4, 9, 2, 0, 0, 1, 7, 8, 2, 0, 0].as_slice(),
            &device,
        )
        .reshape([2, 6]);

        let (outputs, hidden) = encoder.forward(tokens);
        assert_eq!(outputs.dims(), [2, 6, 8]);
        assert_eq!(hidden.dims(), [2, 8]);
    }

    #[test]
    fn init_hidden_is_zeroed() {
        let device = Default::default();
        let encoder = TextEncoderConfig::new(50, 8).init::<TestBackend>(&device);
        let hidden = encoder.init_hidden(3, &device);
        assert_eq!(hidden.dims(), [3, 8]);
        let sum: f32 = hidden.abs().sum().into_scalar();
        assert_eq!(sum, 0.0);
    }
}
