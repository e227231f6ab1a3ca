// ============================================================
// Layer 2: Application — Use Case Orchestration
// ============================================================
// One use case per CLI command. Each use case wires the data
// layer, the model and the infrastructure together; none of them
// contain model math or file-format knowledge of their own.

pub mod evaluate_use_case;
pub mod test_use_case;
pub mod train_use_case;
