// ============================================================
// Layer 5 — Attention Module
// ============================================================
// Scores a query vector against every encoder output position
// and normalizes the scores into attention weights. The scoring
// strategy is chosen at construction time; each variant owns
// exactly the parameters it needs:
//
//   dot:     query · output
//   general: query · (W output)           learned H×H projection
//   concat:  v · (W [query ; output])     learned projection + vector
//
// forward(hidden [B,H], encoder_outputs [B,S,H]) → weights [B,1,S],
// softmax-normalized across S per batch element. The per-position
// scores are computed as one vectorized broadcast instead of a
// scalar loop; the result is the same energy matrix.
//
// Reference: Luong et al. (2015) Effective Approaches to
//            Attention-based Neural Machine Translation

use anyhow::bail;
use burn::{
    module::Param,
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation::softmax, Distribution},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scoring strategy tag, selected on the command line and stored
/// in the persisted training config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttnMethod {
    Dot,
    General,
    Concat,
}

impl FromStr for AttnMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(Self::Dot),
            "general" => Ok(Self::General),
            "concat" => Ok(Self::Concat),
            other => bail!("Unknown attention method '{other}' (expected dot, general or concat)"),
        }
    }
}

#[derive(Config, Debug)]
pub struct AttentionConfig {
    pub method: AttnMethod,
    pub hidden_size: usize,
}

impl AttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Attention<B> {
        match self.method {
            AttnMethod::Dot => Attention::Dot(DotAttention {}),
            AttnMethod::General => Attention::General(GeneralAttention {
                attn: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            }),
            AttnMethod::Concat => Attention::Concat(ConcatAttention {
                attn: LinearConfig::new(self.hidden_size * 2, self.hidden_size).init(device),
                v: Param::from_tensor(Tensor::random(
                    [1, self.hidden_size],
                    Distribution::Uniform(-0.1, 0.1),
                    device,
                )),
            }),
        }
    }
}

/// Parameter-free dot-product scoring.
#[derive(Module, Clone, Debug)]
pub struct DotAttention {}

impl DotAttention {
    fn score<B: Backend>(&self, hidden: Tensor<B, 2>, outputs: Tensor<B, 3>) -> Tensor<B, 2> {
        dot_per_position(hidden, outputs)
    }
}

/// Scoring through a learned H×H projection of the encoder output.
#[derive(Module, Debug)]
pub struct GeneralAttention<B: Backend> {
    attn: Linear<B>,
}

impl<B: Backend> GeneralAttention<B> {
    fn score(&self, hidden: Tensor<B, 2>, outputs: Tensor<B, 3>) -> Tensor<B, 2> {
        dot_per_position(hidden, self.attn.forward(outputs))
    }
}

/// Scoring by projecting the concatenated pair and dotting with a
/// learned vector `v`.
#[derive(Module, Debug)]
pub struct ConcatAttention<B: Backend> {
    attn: Linear<B>,
    v: Param<Tensor<B, 2>>,
}

impl<B: Backend> ConcatAttention<B> {
    fn score(&self, hidden: Tensor<B, 2>, outputs: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, seq_len, hidden_size] = outputs.dims();

        let query = hidden
            .unsqueeze_dim::<3>(1)
            .expand([batch_size, seq_len, hidden_size]);
        let energy = self.attn.forward(Tensor::cat(vec![query, outputs], 2));

        // v: [1, H] broadcast against [B, S, H]
        let v = self.v.val().unsqueeze_dim::<3>(0);
        (energy * v).sum_dim(2).reshape([batch_size, seq_len])
    }
}

/// One attention module, strategy fixed at construction.
#[derive(Module, Debug)]
pub enum Attention<B: Backend> {
    Dot(DotAttention),
    General(GeneralAttention<B>),
    Concat(ConcatAttention<B>),
}

impl<B: Backend> Attention<B> {
    /// Attention weights of `hidden` over every encoder position:
    /// `hidden [B, H]`, `encoder_outputs [B, S, H]` → `[B, 1, S]`,
    /// summing to 1 across S for every batch element.
    pub fn forward(&self, hidden: Tensor<B, 2>, encoder_outputs: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch_size, seq_len, _] = encoder_outputs.dims();

        let energies = match self {
            Attention::Dot(scorer) => scorer.score(hidden, encoder_outputs),
            Attention::General(scorer) => scorer.score(hidden, encoder_outputs),
            Attention::Concat(scorer) => scorer.score(hidden, encoder_outputs),
        };

        softmax(energies, 1).reshape([batch_size, 1, seq_len])
    }
}

/// Dot product of a query `[B, H]` with every position of
/// `[B, S, H]`, yielding energies `[B, S]`.
fn dot_per_position<B: Backend>(hidden: Tensor<B, 2>, outputs: Tensor<B, 3>) -> Tensor<B, 2> {
    let [batch_size, seq_len, _] = outputs.dims();
    (outputs * hidden.unsqueeze_dim::<3>(1))
        .sum_dim(2)
        .reshape([batch_size, seq_len])
}
