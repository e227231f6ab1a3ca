// ============================================================
// Layer 4 — Frame Feature Store
// ============================================================
// Holds the pre-extracted frame feature vectors for every video,
// keyed by video id, and draws the fixed-size frame window a
// sample is conditioned on.
//
// The window is drawn center-out around the comment timestamp:
// the center frame first, then alternating ±1, ±2, … offsets,
// keeping only in-range indices, until n_frame frames are
// collected or the offsets are exhausted at a clip boundary.
// The resulting sequence is in DRAW order, not chronological
// order — the model was trained with this ordering and it is
// part of the data contract.

use std::collections::HashMap;

/// In-memory store of all frame features, loaded once at startup.
#[derive(Debug, Clone)]
pub struct FrameStore {
    frames: HashMap<String, Vec<Vec<f32>>>,
}

impl FrameStore {
    pub fn new(frames: HashMap<String, Vec<Vec<f32>>>) -> Self {
        Self { frames }
    }

    pub fn video_count(&self) -> usize {
        self.frames.len()
    }

    /// All frames of one video, or None for an unknown id.
    pub fn video(&self, video_id: &str) -> Option<&[Vec<f32>]> {
        self.frames.get(video_id).map(|v| v.as_slice())
    }

    /// Draw the frame window around 0-based index `time` for a video.
    /// Returns an empty Vec for an unknown video id or a timestamp
    /// with no in-range offsets; callers decide whether to skip.
    pub fn window(&self, video_id: &str, time: usize, n_frame: usize) -> Vec<Vec<f32>> {
        let Some(frames) = self.frames.get(video_id) else {
            return Vec::new();
        };
        center_out_indices(time, frames.len(), n_frame)
            .into_iter()
            .map(|i| frames[i].clone())
            .collect()
    }
}

/// Frame indices in center-out draw order: `time`, then `time±1`,
/// `time±2`, … up to ±(n_frame - 1), skipping indices outside
/// `0..clip_len`, stopping once `n_frame` indices are collected.
pub fn center_out_indices(time: usize, clip_len: usize, n_frame: usize) -> Vec<usize> {
    let mut offsets: Vec<i64> = vec![0];
    for d in 1..n_frame as i64 {
        offsets.push(-d);
        offsets.push(d);
    }

    let mut indices = Vec::with_capacity(n_frame);
    for off in offsets {
        let i = time as i64 + off;
        if i >= 0 && (i as usize) < clip_len {
            indices.push(i as usize);
        }
        if indices.len() == n_frame {
            break;
        }
    }
    indices
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_out_order_is_deterministic() {
        // 1-based time 10 becomes 0-based index 9 in the sampler;
        // with a long clip the draw order is center, -1, +1, -2, +2.
        assert_eq!(center_out_indices(9, 20, 5), vec![9, 8, 10, 7, 11]);
    }

    #[test]
    fn left_boundary_truncates_draws() {
        // At index 0 only non-negative offsets survive.
        assert_eq!(center_out_indices(0, 100, 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn short_clip_yields_fewer_frames() {
        assert_eq!(center_out_indices(0, 3, 5), vec![0, 1, 2]);
    }

    #[test]
    fn right_boundary_truncates_draws() {
        assert_eq!(center_out_indices(9, 10, 5), vec![9, 8, 7, 6, 5]);
    }

    #[test]
    fn out_of_range_time_yields_empty() {
        assert!(center_out_indices(50, 10, 5).is_empty());
    }

    #[test]
    fn window_clones_frames_in_draw_order() {
        let mut map = HashMap::new();
        map.insert(
            "v1".to_string(),
            (0..6).map(|i| vec![i as f32, 0.0]).collect::<Vec<_>>(),
        );
        let store = FrameStore::new(map);

        let window = store.window("v1", 2, 3);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0][0], 2.0);
        assert_eq!(window[1][0], 1.0);
        assert_eq!(window[2][0], 3.0);
    }

    #[test]
    fn unknown_video_yields_empty_window() {
        let store = FrameStore::new(HashMap::new());
        assert!(store.window("missing", 0, 5).is_empty());
    }
}
