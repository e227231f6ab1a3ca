// ============================================================
// Layer 5 — GRU Cell
// ============================================================
// A single-layer gated recurrent unit built from burn Linear
// primitives, shared by both encoders (driven over a whole
// sequence) and the decoder (driven one step at a time).
//
// Update equations, Cho et al. (2014):
//   r_t = σ(W_ir x_t + W_hr h_{t-1})        reset gate
//   z_t = σ(W_iz x_t + W_hz h_{t-1})        update gate
//   n_t = tanh(W_in x_t + r_t ⊙ W_hn h_{t-1})
//   h_t = (1 - z_t) ⊙ n_t + z_t ⊙ h_{t-1}
//
// Reference: Burn Book §3 (Building Blocks)
//            Cho et al. (2014) Learning Phrase Representations

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::{sigmoid, tanh},
};

#[derive(Config, Debug)]
pub struct GruCellConfig {
    pub input_size: usize,
    pub hidden_size: usize,
}

impl GruCellConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> GruCell<B> {
        let linear = |inp: usize| LinearConfig::new(inp, self.hidden_size).init(device);
        GruCell {
            reset_input: linear(self.input_size),
            reset_hidden: linear(self.hidden_size),
            update_input: linear(self.input_size),
            update_hidden: linear(self.hidden_size),
            new_input: linear(self.input_size),
            new_hidden: linear(self.hidden_size),
            hidden_size: self.hidden_size,
        }
    }
}

#[derive(Module, Debug)]
pub struct GruCell<B: Backend> {
    reset_input: Linear<B>,
    reset_hidden: Linear<B>,
    update_input: Linear<B>,
    update_hidden: Linear<B>,
    new_input: Linear<B>,
    new_hidden: Linear<B>,
    hidden_size: usize,
}

impl<B: Backend> GruCell<B> {
    /// The all-zero initial hidden state.
    pub fn init_hidden(&self, batch_size: usize, device: &B::Device) -> Tensor<B, 2> {
        Tensor::zeros([batch_size, self.hidden_size], device)
    }

    /// Advance the cell one step: `input [B, D]`, `hidden [B, H]`
    /// → new hidden `[B, H]`. For a single-layer GRU the step
    /// output and the new hidden state are the same tensor.
    pub fn step(&self, input: Tensor<B, 2>, hidden: Tensor<B, 2>) -> Tensor<B, 2> {
        let reset = sigmoid(self.reset_input.forward(input.clone()) + self.reset_hidden.forward(hidden.clone()));
        let update = sigmoid(self.update_input.forward(input.clone()) + self.update_hidden.forward(hidden.clone()));
        let candidate = tanh(self.new_input.forward(input) + reset * self.new_hidden.forward(hidden.clone()));

        let keep = update.clone();
        (update.neg().add_scalar(1.0)) * candidate + keep * hidden
    }

    /// Drive the cell over a batch-major sequence `[B, S, D]`,
    /// returning every per-step output `[B, S, H]` and the final
    /// hidden state `[B, H]`.
    pub fn forward_sequence(
        &self,
        input: Tensor<B, 3>,
        state: Option<Tensor<B, 2>>,
    ) -> (Tensor<B, 3>, Tensor<B, 2>) {
        let [batch_size, seq_len, input_size] = input.dims();
        let device = input.device();

        let mut hidden = state.unwrap_or_else(|| self.init_hidden(batch_size, &device));
        let mut outputs = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            let x_t = input
                .clone()
                .slice([0..batch_size, t..t + 1, 0..input_size])
                .reshape([batch_size, input_size]);
            hidden = self.step(x_t, hidden);
            outputs.push(hidden.clone());
        }

        (Tensor::stack::<3>(outputs, 1), hidden)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn step_preserves_shapes() {
        let device = Default::default();
        let cell: GruCell<TestBackend> = GruCellConfig::new(4, 8).init(&device);

        let input = Tensor::zeros([3, 4], &device);
        let hidden = cell.init_hidden(3, &device);
        assert_eq!(cell.step(input, hidden).dims(), [3, 8]);
    }

    #[test]
    fn sequence_outputs_every_step() {
        let device = Default::default();
        let cell: GruCell<TestBackend> = GruCellConfig::new(4, 8).init(&device);

        let input = Tensor::zeros([2, 6, 4], &device);
        let (outputs, hidden) = cell.forward_sequence(input, None);
        assert_eq!(outputs.dims(), [2, 6, 8]);
        assert_eq!(hidden.dims(), [2, 8]);

        // Final hidden equals the last per-step output.
        let last = outputs.slice([0..2, 5..6, 0..8]).reshape([2, 8]);
        let diff: f32 = (last - hidden).abs().sum().into_scalar();
        assert!(diff < 1e-6);
    }

    #[test]
    fn zero_input_zero_state_stays_bounded() {
        let device = Default::default();
        let cell: GruCell<TestBackend> = GruCellConfig::new(2, 4).init(&device);

        let input = Tensor::zeros([1, 3, 2], &device);
        let (_, hidden) = cell.forward_sequence(input, None);
        let max: f32 = hidden.abs().max().into_scalar();
        // tanh-bounded candidate keeps the state in (-1, 1)
        assert!(max < 1.0);
    }
}
