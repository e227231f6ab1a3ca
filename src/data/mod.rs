// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw files on disk and GPU-ready
// tensor batches.
//
// The pipeline flows in this order:
//
//   ndjson records + vocabulary + frame store
//       │
//       ▼
//   loader            → parses the files, fails fast on bad input
//       │
//       ▼
//   DataContext       → vocabulary + frame store, loaded once,
//       │               passed by reference everywhere
//       ▼
//   dataset           → draws the frame window, pads comment and
//       │               context, implements Burn's Dataset trait
//       ▼
//   CommentBatcher    → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Parses the ndjson datasets, the vocabulary file and the frame store
pub mod loader;

/// The frame feature store and the center-out frame window
pub mod frames;

/// Process-wide immutable context: vocabulary + frame store
pub mod context;

/// Sample construction and Burn's Dataset trait
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
