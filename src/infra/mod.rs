// ============================================================
// Layer 6: Infrastructure — Persistence & Metrics
// ============================================================
// Side-effectful plumbing the rest of the system depends on:
// checkpoint persistence for model components and run state, and
// the per-epoch metrics CSV.

pub mod checkpoint;
pub mod metrics;
