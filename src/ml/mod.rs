// ============================================================
// Layer 5: ML — Model, Training & Inference
// ============================================================
// The neural generator and everything that drives it:
//
//   rnn        — GRU cell built from linear layers
//   attention  — Luong-style attention (dot / general / concat)
//   encoders   — video frame encoder + textual context encoder
//   decoder    — autoregressive comment decoder with attention
//   model      — the combined seq2seq forward loop and loss
//   trainer    — Adam training loop on Autodiff<Wgpu>
//   inferencer — checkpoint loading, greedy decoding, scoring

pub mod attention;
pub mod decoder;
pub mod encoders;
pub mod inferencer;
pub mod model;
pub mod rnn;
pub mod trainer;
