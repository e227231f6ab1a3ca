// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists and restores everything a training run leaves behind:
//
//   t_encoder.mpk / v_encoder.mpk / decoder.mpk — component
//     weights, written with burn's CompactRecorder
//   train_config.json — the exact configuration the run used, so
//     inference rebuilds the same model shape
//   latest_epoch.json — the last fully completed epoch
//
// Saves overwrite the previous epoch's files in place. Loading a
// component that was never saved is an error, reported with the
// offending path.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::{
    module::Module,
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;

const CONFIG_FILE: &str = "train_config.json";
const EPOCH_FILE: &str = "latest_epoch.json";

#[derive(Debug, Serialize, Deserialize)]
struct EpochMarker {
    epoch: usize,
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Save one model component under `name`. The recorder appends
    /// its own extension.
    pub fn save_component<B: Backend, M: Module<B>>(&self, name: &str, module: &M) -> Result<()> {
        let path = self.dir.join(name);
        CompactRecorder::new()
            .record(module.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint '{}'", path.display()))?;
        Ok(())
    }

    /// Load the record saved under `name` into a freshly initialized
    /// module of the same shape.
    pub fn load_component<B: Backend, M: Module<B>>(
        &self,
        name: &str,
        module: M,
        device: &B::Device,
    ) -> Result<M> {
        let path = self.dir.join(name);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Failed to load checkpoint '{}'", path.display()))?;
        Ok(module.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let cfg = serde_json::from_str(&json)
            .with_context(|| format!("Invalid training config in '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Record that `epoch` completed, including its component saves.
    pub fn mark_epoch(&self, epoch: usize) -> Result<()> {
        let path = self.dir.join(EPOCH_FILE);
        let json = serde_json::to_string(&EpochMarker { epoch })?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        Ok(())
    }

    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(EPOCH_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let marker: EpochMarker = serde_json::from_str(&json)
            .with_context(|| format!("Invalid epoch marker in '{}'", path.display()))?;
        Ok(marker.epoch)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_manager(tag: &str) -> CheckpointManager {
        let dir = std::env::temp_dir().join(format!("vcg-ckpt-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        CheckpointManager::new(&dir).unwrap()
    }

    #[test]
    fn config_round_trips() {
        let manager = temp_manager("config");
        let cfg = TrainConfig::default();

        manager.save_config(&cfg).unwrap();
        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.n_hidden, cfg.n_hidden);
        assert_eq!(loaded.attn, cfg.attn);
        assert_eq!(loaded.max_len, cfg.max_len);
    }

    #[test]
    fn epoch_marker_round_trips() {
        let manager = temp_manager("epoch");
        manager.mark_epoch(7).unwrap();
        assert_eq!(manager.latest_epoch().unwrap(), 7);
        manager.mark_epoch(8).unwrap();
        assert_eq!(manager.latest_epoch().unwrap(), 8);
    }

    #[test]
    fn missing_checkpoint_is_an_error() {
        let manager = temp_manager("missing");
        assert!(manager.latest_epoch().is_err());
        assert!(manager.load_config().is_err());
    }

    #[test]
    fn component_round_trips() {
        use crate::ml::encoders::VideoEncoderConfig;

        type TestBackend = burn::backend::NdArray;

        let manager = temp_manager("component");
        let device = Default::default();
        let encoder = VideoEncoderConfig::new(4, 8).init::<TestBackend>(&device);

        manager.save_component("v_encoder", &encoder).unwrap();
        let fresh = VideoEncoderConfig::new(4, 8).init::<TestBackend>(&device);
        let loaded = manager
            .load_component::<TestBackend, _>("v_encoder", fresh, &device)
            .unwrap();

        let before = encoder.forward(Tensor::ones([1, 2, 4], &device)).1;
        let after = loaded.forward(Tensor::ones([1, 2, 4], &device)).1;
        // The compact record is half precision, so the round trip is
        // only accurate to f16 resolution.
        let diff: f32 = (before - after).abs().sum().into_scalar();
        assert!(diff < 1e-2, "round-trip diff was {diff}");
    }
}
