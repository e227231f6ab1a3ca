// ============================================================
// Layer 5 — Comment Decoder
// ============================================================
// Autoregressive recurrent decoder. One step:
//
//   1. Embed the previous output token        [B] → [B, H]
//   2. Advance the GRU cell one step          → rnn output [B, H]
//   3. Attend: the TEXT encoder's final hidden state queries the
//      VIDEO encoder outputs                  → weights [B, 1, F]
//   4. Context = weighted sum of the video encoder outputs
//   5. tanh(W [rnn output ; context])         → fused [B, H]
//   6. Project to vocabulary logits           → [B, V]
//
// Step 3 is deliberate: the text hidden state is the query and
// the video outputs are the attended sequence, with no symmetric
// attention over the text outputs. This asymmetric wiring is what
// the model was trained with and must not be silently changed.
// `attend_text` switches the attended sequence to the text
// encoder outputs for experimentation; it is off by default.

use burn::{
    nn::{Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::tanh,
};

use crate::ml::attention::{Attention, AttentionConfig, AttnMethod};
use crate::ml::rnn::{GruCell, GruCellConfig};

#[derive(Config, Debug)]
pub struct CommentDecoderConfig {
    pub method: AttnMethod,
    pub hidden_size: usize,
    /// Vocabulary size (embedding rows and output logits)
    pub output_size: usize,
    #[config(default = false)]
    pub attend_text: bool,
}

impl CommentDecoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CommentDecoder<B> {
        CommentDecoder {
            embedding: EmbeddingConfig::new(self.output_size, self.hidden_size).init(device),
            gru: GruCellConfig::new(self.hidden_size, self.hidden_size).init(device),
            attn: AttentionConfig::new(self.method, self.hidden_size).init(device),
            concat: LinearConfig::new(self.hidden_size * 2, self.hidden_size).init(device),
            out: LinearConfig::new(self.hidden_size, self.output_size).init(device),
            hidden_size: self.hidden_size,
            attend_text: self.attend_text,
        }
    }
}

#[derive(Module, Debug)]
pub struct CommentDecoder<B: Backend> {
    embedding: Embedding<B>,
    gru: GruCell<B>,
    attn: Attention<B>,
    concat: Linear<B>,
    out: Linear<B>,
    hidden_size: usize,
    attend_text: bool,
}

impl<B: Backend> CommentDecoder<B> {
    /// One decode step.
    ///
    /// * `input` — previous output token ids, shape [B]
    /// * `last_hidden` — previous decoder hidden state, None on the
    ///   first step (zero state)
    /// * `t_hidden` — text encoder final hidden state, the
    ///   attention query
    /// * `t_outputs` / `v_outputs` — encoder outputs, borrowed
    ///   read-only; the loop never mutates them
    ///
    /// Returns (vocabulary logits [B, V], new hidden [B, H],
    /// attention weights [B, 1, S]).
    pub fn forward(
        &self,
        input: Tensor<B, 1, Int>,
        last_hidden: Option<Tensor<B, 2>>,
        t_hidden: Tensor<B, 2>,
        t_outputs: &Tensor<B, 3>,
        v_outputs: &Tensor<B, 3>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 3>) {
        let [batch_size] = input.dims();
        let device = input.device();

        let embedded = self
            .embedding
            .forward(input.unsqueeze_dim(1))
            .reshape([batch_size, self.hidden_size]);

        let hidden = last_hidden.unwrap_or_else(|| self.gru.init_hidden(batch_size, &device));
        let rnn_output = self.gru.step(embedded, hidden);

        let attended = if self.attend_text { t_outputs } else { v_outputs };
        let attn_weights = self.attn.forward(t_hidden, attended.clone());

        // [B,1,S] · [B,S,H] → [B,1,H]
        let context = attn_weights
            .clone()
            .matmul(attended.clone())
            .reshape([batch_size, self.hidden_size]);

        let fused = tanh(
            self.concat
                .forward(Tensor::cat(vec![rnn_output.clone(), context], 1)),
        );
        let logits = self.out.forward(fused);

        (logits, rnn_output, attn_weights)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Distribution;

    type TestBackend = burn::backend::NdArray;

    fn step_shapes(attend_text: bool) -> ([usize; 2], [usize; 2], [usize; 3]) {
        let device = Default::default();
        let decoder = CommentDecoderConfig::new(AttnMethod::General, 8, 30)
            .with_attend_text(attend_text)
            .init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 1, Int>::from_ints([1, 1].as_slice(), &device);
        let t_hidden = Tensor::random([2, 8], Distribution::Uniform(-1.0, 1.0), &device);
        let t_outputs = Tensor::random([2, 12, 8], Distribution::Uniform(-1.0, 1.0), &device);
        let v_outputs = Tensor::random([2, 5, 8], Distribution::Uniform(-1.0, 1.0), &device);

        let (logits, hidden, weights) =
            decoder.forward(input, None, t_hidden, &t_outputs, &v_outputs);
        (logits.dims(), hidden.dims(), weights.dims())
    }

    #[test]
    fn default_wiring_attends_video_outputs() {
        let (logits, hidden, weights) = step_shapes(false);
        assert_eq!(logits, [2, 30]);
        assert_eq!(hidden, [2, 8]);
        // 5 video frames attended
        assert_eq!(weights, [2, 1, 5]);
    }

    #[test]
    fn attend_text_switches_the_attended_sequence() {
        let (_, _, weights) = step_shapes(true);
        // 12 context positions attended
        assert_eq!(weights, [2, 1, 12]);
    }
}
