// ============================================================
// Layer 3 — Dataset Record Types
// ============================================================
// One record describes a single timestamped comment on a video:
// the clip it belongs to, when it was posted, the comments that
// surrounded it at that moment, and the comment text itself.
//
// Evaluation records additionally carry a candidate set: a map
// from comment string to a human relevance category in 1..=5,
// where 1 marks the ground-truth comment.
//
// `time` is 1-based in the files; the sampler converts it to a
// 0-based frame index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One training record as stored in the ndjson training file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRecord {
    /// Video id, the key into the frame feature store
    pub video: String,

    /// 1-based second within the clip the comment was posted at
    pub time: usize,

    /// Surrounding prior comments concatenated into one blob
    pub context: String,

    /// The ground-truth comment to learn to generate
    pub comment: String,
}

/// One evaluation record as stored in the ndjson candidate file.
///
/// `comment` holds the reference comments (the `test` command
/// decodes against the first one); `candidate` holds the ranked
/// candidate set for the `evaluate` command.
///
/// A BTreeMap keeps candidate iteration order deterministic, so
/// loss ties always break the same way between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub video: String,
    pub time: usize,
    pub context: String,

    /// Reference comments, best first
    pub comment: Vec<String>,

    /// Candidate comment → relevance category (1 = ground truth)
    pub candidate: BTreeMap<String, u8>,
}
