// ============================================================
// Layer 6 — Training Metrics
// ============================================================
// Appends one CSV row per epoch to metrics.csv inside the
// checkpoint directory. The file survives resumed runs; rows from
// an earlier run are kept and new epochs append after them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const METRICS_FILE: &str = "metrics.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub train_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64) -> Self {
        Self { epoch, train_loss }
    }
}

pub struct MetricsLogger {
    path: PathBuf,
}

impl MetricsLogger {
    /// Creates the CSV with its header if it does not exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(METRICS_FILE);
        if !path.exists() {
            std::fs::create_dir_all(dir.as_ref()).with_context(|| {
                format!("Failed to create metrics dir '{}'", dir.as_ref().display())
            })?;
            std::fs::write(&path, "epoch,train_loss\n")
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
        }
        Ok(Self { path })
    }

    pub fn log(&self, metrics: &EpochMetrics) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open '{}'", self.path.display()))?;
        writeln!(file, "{},{:.6}", metrics.epoch, metrics.train_loss)
            .with_context(|| format!("Failed to append to '{}'", self.path.display()))?;
        Ok(())
    }
}
