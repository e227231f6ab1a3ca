// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Ranking evaluation. For every test example the model scores
// each candidate comment by its teacher-forced loss and sorts
// the candidates ascending (lower loss ranks higher). The rank
// of the human ground-truth candidate per example feeds the
// retrieval metrics:
//
//   recall@1 / recall@5 / recall@10, mean rank, MRR
//
// Every candidate set must contain exactly the categories the
// corpus construction put there, including one ground-truth
// comment; an example without one is a corrupt input file.

use anyhow::{anyhow, ensure, Result};
use std::fmt::Write;

use crate::cli::commands::EvaluateArgs;
use crate::data::context::DataContext;
use crate::data::dataset::{build_eval_examples, CommentSample, EvalExample};
use crate::data::loader;
use crate::domain::ranking;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct EvaluateUseCase {
    args: EvaluateArgs,
    ctx: DataContext,
}

impl EvaluateUseCase {
    pub fn new(args: EvaluateArgs) -> Result<Self> {
        let ctx = DataContext::load(&args.vocab_path, &args.frames_path)?;
        Ok(Self { args, ctx })
    }

    pub fn execute(&self) -> Result<String> {
        let ckpt_manager = CheckpointManager::new(&self.args.checkpoint_dir)?;
        let train_cfg = ckpt_manager.load_config()?;

        let mut records = loader::load_candidate_records(&self.args.test_path)?;
        if self.args.subsample > 1 {
            records = records.into_iter().step_by(self.args.subsample).collect();
        }

        let examples = build_eval_examples(&records, &self.ctx, train_cfg.sample_spec());
        ensure!(
            !examples.is_empty(),
            "No usable evaluation examples in '{}'",
            self.args.test_path
        );
        tracing::info!("Ranking candidates for {} examples", examples.len());

        let inferencer = Inferencer::from_checkpoint(&ckpt_manager, self.ctx.vocab.len())?;

        let mut hit_ranks = Vec::with_capacity(examples.len());
        for (i, example) in examples.iter().enumerate() {
            let ranking = self.rank_candidates(&inferencer, example, train_cfg.max_len);
            let hit = ranking::calc_hit_rank(&ranking, &example.candidates)
                .ok_or_else(|| anyhow!("Example {} has no ground-truth candidate", i + 1))?;
            hit_ranks.push(hit);
            tracing::debug!("Example {}: ground truth ranked {}", i + 1, hit);
        }

        Ok(render_report(&hit_ranks))
    }

    /// Candidate comments sorted by ascending model loss. Ties keep
    /// the candidate map's lexicographic order, so results are
    /// deterministic.
    fn rank_candidates(
        &self,
        inferencer: &Inferencer,
        example: &EvalExample,
        max_len: usize,
    ) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = example
            .candidates
            .keys()
            .map(|candidate| {
                let sample = CommentSample {
                    frames: example.frames.clone(),
                    comment: self.ctx.vocab.pad(candidate, max_len),
                    context: example.context.clone(),
                };
                (candidate.clone(), inferencer.score(&sample))
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(candidate, _)| candidate).collect()
    }
}

fn render_report(hit_ranks: &[usize]) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Ranking evaluation over {} examples", hit_ranks.len());
    let _ = writeln!(report, "  recall@1:  {:>6.2}%", ranking::recall_at(hit_ranks, 1));
    let _ = writeln!(report, "  recall@5:  {:>6.2}%", ranking::recall_at(hit_ranks, 5));
    let _ = writeln!(report, "  recall@10: {:>6.2}%", ranking::recall_at(hit_ranks, 10));
    let _ = writeln!(report, "  mean rank: {:>6.2}", ranking::mean_rank(hit_ranks));
    let _ = write!(report, "  MRR:       {:>6.4}", ranking::mean_reciprocal_rank(hit_ranks));
    report
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_all_metrics() {
        let report = render_report(&[1, 2, 4]);
        assert!(report.contains("3 examples"));
        assert!(report.contains("recall@1:"));
        assert!(report.contains("recall@5:"));
        assert!(report.contains("recall@10:"));
        assert!(report.contains("mean rank:"));
        assert!(report.contains("MRR:"));
        assert!(report.contains("0.5833"));
    }
}
