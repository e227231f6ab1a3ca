// ============================================================
// Layer 4 — File Loader
// ============================================================
// Parses the three kinds of input files:
//
//   - training / candidate datasets: newline-delimited JSON,
//     one record per line
//   - vocabulary: a single JSON object with `word2id` and
//     `id2word` mappings sharing one index space
//   - frame feature store: a JSON map of video id → ordered
//     frame feature vectors
//
// All loading is fail-fast: a missing or malformed file aborts
// the run with an I/O or parse error. There is no partial-load
// recovery — the only resilience mechanism in the system is the
// per-epoch checkpoint.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::domain::example::{CandidateRecord, TrainRecord};
use crate::domain::vocabulary::Vocabulary;
use crate::data::frames::FrameStore;

/// Load the ndjson training records.
pub fn load_train_records(path: &str) -> Result<Vec<TrainRecord>> {
    load_ndjson(path)
}

/// Load the ndjson candidate/evaluation records.
pub fn load_candidate_records(path: &str) -> Result<Vec<CandidateRecord>> {
    load_ndjson(path)
}

/// Parse a newline-delimited JSON file into records.
/// Blank lines are tolerated; a malformed line is fatal and the
/// error names the offending line number.
fn load_ndjson<T: for<'de> Deserialize<'de>>(path: &str) -> Result<Vec<T>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read dataset '{path}'"))?;

    let mut records = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line)
            .with_context(|| format!("Malformed record at {path}:{}", lineno + 1))?;
        records.push(record);
    }

    tracing::info!("Loaded {} records from '{}'", records.len(), path);
    Ok(records)
}

/// Raw shape of the vocabulary file.
#[derive(Debug, Deserialize)]
struct VocabFile {
    word2id: HashMap<String, u32>,
    id2word: HashMap<String, String>,
}

/// Load the vocabulary file into an immutable Vocabulary.
pub fn load_vocabulary(path: &str) -> Result<Vocabulary> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read vocabulary '{path}'"))?;
    let raw: VocabFile = serde_json::from_str(&text)
        .with_context(|| format!("Malformed vocabulary file '{path}'"))?;

    let vocab = Vocabulary::new(raw.word2id, raw.id2word);
    anyhow::ensure!(!vocab.is_empty(), "Vocabulary '{path}' is empty");

    tracing::info!("Loaded vocabulary: {} tokens", vocab.len());
    Ok(vocab)
}

/// Load the frame feature store: video id → frame vectors.
pub fn load_frame_store(path: &str) -> Result<FrameStore> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read frame store '{path}'"))?;
    let frames: HashMap<String, Vec<Vec<f32>>> = serde_json::from_str(&text)
        .with_context(|| format!("Malformed frame store '{path}'"))?;

    let store = FrameStore::new(frames);
    tracing::info!("Loaded frame features for {} videos", store.video_count());
    Ok(store)
}
