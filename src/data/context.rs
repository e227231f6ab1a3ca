// ============================================================
// Layer 4 — Data Context
// ============================================================
// The vocabulary and the frame feature store are loaded exactly
// once per process and never mutated afterwards. Rather than
// hiding them behind globals, they live in one explicitly
// constructed context object that is passed by reference into
// every component that needs them.

use anyhow::Result;

use crate::data::frames::FrameStore;
use crate::data::loader;
use crate::domain::vocabulary::Vocabulary;

/// Immutable, process-wide inputs shared by every pipeline stage.
pub struct DataContext {
    pub vocab: Vocabulary,
    pub frames: FrameStore,
}

impl DataContext {
    /// Load the vocabulary and frame store. Fatal on any I/O or
    /// parse error — there is nothing useful to do without them.
    pub fn load(vocab_path: &str, frames_path: &str) -> Result<Self> {
        let vocab = loader::load_vocabulary(vocab_path)?;
        let frames = loader::load_frame_store(frames_path)?;
        Ok(Self { vocab, frames })
    }
}
