// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and functions that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums and functions
//
// Why keep this layer pure?
//   - Easy to unit test (no GPU needed)
//   - Easy to understand (no framework noise)
//
// Reference: Rust Book §5 (Structs), §11 (Testing)

// Dataset record types (training and candidate-evaluation records)
pub mod example;

// The token ↔ id bijection plus padding and decoding
pub mod vocabulary;

// Retrieval-style ranking metrics (hit rank, recall@k, MRR)
pub mod ranking;
