// ============================================================
// Layer 3 — Vocabulary & Padding
// ============================================================
// A bijection between token strings and integer ids, loaded once
// at startup and passed by reference into everything that needs
// it — never held as global state.
//
// The id space reserves the first four ids:
//   0 = <PAD>   right-padding filler
//   1 = <BOS>   beginning-of-sequence
//   2 = <EOS>   end-of-sequence
//   3 = <UNK>   out-of-vocabulary fallback
//
// `pad` turns a raw comment string into a fixed-length id
// sequence for batching; `decode` reverses it for display.
//
// Reference: Rust Book §8 (HashMaps, Strings)

use std::collections::HashMap;

pub const PAD: u32 = 0;
pub const BOS: u32 = 1;
pub const EOS: u32 = 2;
pub const UNK: u32 = 3;

/// The comment-context separator token used when prior comments
/// were concatenated into one blob. Never printed.
pub const SEP_TOKEN: &str = "<&&&>";

/// Immutable token ↔ id mapping.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word2id: HashMap<String, u32>,
    id2word: HashMap<u32, String>,
}

impl Vocabulary {
    /// Build a vocabulary from the two raw file mappings.
    /// `id2word` arrives keyed by ids-as-strings; non-numeric keys
    /// are ignored rather than treated as fatal.
    pub fn new(word2id: HashMap<String, u32>, id2word: HashMap<String, String>) -> Self {
        let id2word = id2word
            .into_iter()
            .filter_map(|(id, word)| id.parse::<u32>().ok().map(|id| (id, word)))
            .collect();
        Self { word2id, id2word }
    }

    /// Number of ids in the shared index space (embedding rows).
    pub fn len(&self) -> usize {
        self.word2id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word2id.is_empty()
    }

    /// Map a single token to its id, falling back to <UNK>.
    pub fn id_of(&self, token: &str) -> u32 {
        self.word2id.get(token).copied().unwrap_or(UNK)
    }

    /// Split `text` on whitespace and produce a sequence of exactly
    /// `target_len` ids:
    ///
    ///   1. Truncate to the first `target_len - 2` tokens (silently —
    ///      overlong comments are simply cut)
    ///   2. Map each token via word2id, unknown tokens become <UNK>
    ///   3. Prepend <BOS>, append <EOS>
    ///   4. Right-pad with <PAD> to `target_len`
    ///
    /// <EOS> is always present because truncation happens before it
    /// is appended.
    pub fn pad(&self, text: &str, target_len: usize) -> Vec<u32> {
        let mut ids: Vec<u32> = text
            .split_whitespace()
            .take(target_len.saturating_sub(2))
            .map(|t| self.id_of(t))
            .collect();

        ids.insert(0, BOS);
        ids.push(EOS);
        ids.resize(target_len, PAD);
        ids
    }

    /// Reverse-map a generated id sequence back to tokens.
    /// Stops at the first <EOS>; <PAD>/<BOS>/<UNK> markers and the
    /// context separator are skipped.
    pub fn decode(&self, ids: &[u32]) -> Vec<String> {
        let mut tokens = Vec::new();
        for &id in ids {
            if id == EOS {
                break;
            }
            if id == PAD || id == BOS || id == UNK {
                continue;
            }
            match self.id2word.get(&id) {
                Some(w) if w != SEP_TOKEN => tokens.push(w.clone()),
                _ => {}
            }
        }
        tokens
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// A vocabulary with only the reserved ids — every real token
    /// maps to <UNK>.
    fn reserved_only() -> Vocabulary {
        let word2id: HashMap<String, u32> = [
            ("<PAD>", PAD),
            ("<BOS>", BOS),
            ("<EOS>", EOS),
            ("<UNK>", UNK),
        ]
        .into_iter()
        .map(|(w, i)| (w.to_string(), i))
        .collect();
        let id2word = word2id
            .iter()
            .map(|(w, i)| (i.to_string(), w.clone()))
            .collect();
        Vocabulary::new(word2id, id2word)
    }

    fn small_vocab() -> Vocabulary {
        let words = ["<PAD>", "<BOS>", "<EOS>", "<UNK>", "nice", "shot", "wow"];
        let word2id: HashMap<String, u32> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.to_string(), i as u32))
            .collect();
        let id2word = word2id
            .iter()
            .map(|(w, i)| (i.to_string(), w.clone()))
            .collect();
        Vocabulary::new(word2id, id2word)
    }

    #[test]
    fn pad_truncates_and_always_appends_eos() {
        let v = reserved_only();
        // 4 tokens into length 5: truncated to 3, then BOS + EOS
        assert_eq!(v.pad("x y z w", 5), vec![1, 3, 3, 3, 2]);
    }

    #[test]
    fn pad_exact_length_and_structure() {
        let v = small_vocab();
        let out = v.pad("nice shot", 20);
        assert_eq!(out.len(), 20);
        assert_eq!(out[0], BOS);
        assert_eq!(out[1], v.id_of("nice"));
        assert_eq!(out[2], v.id_of("shot"));
        assert_eq!(out[3], EOS);
        assert!(out[4..].iter().all(|&id| id == PAD));
        assert_eq!(out.iter().filter(|&&id| id == EOS).count(), 1);
    }

    #[test]
    fn pad_maps_unknown_tokens_to_unk() {
        let v = small_vocab();
        let out = v.pad("nice zzz", 6);
        assert_eq!(out, vec![BOS, v.id_of("nice"), UNK, EOS, PAD, PAD]);
    }

    #[test]
    fn pad_empty_string() {
        let v = small_vocab();
        assert_eq!(v.pad("", 4), vec![BOS, EOS, PAD, PAD]);
    }

    #[test]
    fn decode_round_trips_in_vocabulary_tokens() {
        let v = small_vocab();
        let ids = v.pad("wow nice shot", 20);
        assert_eq!(v.decode(&ids), vec!["wow", "nice", "shot"]);
    }

    #[test]
    fn decode_stops_at_eos_and_skips_markers() {
        let v = small_vocab();
        let wow = v.id_of("wow");
        let shot = v.id_of("shot");
        let ids = vec![BOS, wow, UNK, EOS, shot, PAD];
        assert_eq!(v.decode(&ids), vec!["wow"]);
    }

    #[test]
    fn round_trip_truncates_overlong_comments() {
        let v = small_vocab();
        // Only 3 content slots at target_len 5
        let ids = v.pad("wow nice shot wow wow", 5);
        assert_eq!(ids.len(), 5);
        assert_eq!(v.decode(&ids), vec!["wow", "nice", "shot"]);
    }
}
