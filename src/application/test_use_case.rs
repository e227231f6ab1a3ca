// ============================================================
// Layer 2 — Test Use Case
// ============================================================
// Greedy-decodes every test example and prints the expected
// comment next to what the model generated. Each test record
// carries several reference comments; the first one is the
// expected answer shown here.
//
// The sample dimensions come from the persisted training config,
// not from flags, so the samples always match the checkpoints.

use anyhow::{ensure, Result};

use crate::cli::commands::TestArgs;
use crate::data::context::DataContext;
use crate::data::dataset::build_reference_samples;
use crate::data::loader;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct TestUseCase {
    args: TestArgs,
    ctx: DataContext,
}

impl TestUseCase {
    pub fn new(args: TestArgs) -> Result<Self> {
        let ctx = DataContext::load(&args.vocab_path, &args.frames_path)?;
        Ok(Self { args, ctx })
    }

    pub fn execute(&self) -> Result<()> {
        let ckpt_manager = CheckpointManager::new(&self.args.checkpoint_dir)?;
        let train_cfg = ckpt_manager.load_config()?;

        let records = loader::load_candidate_records(&self.args.test_path)?;
        let samples = build_reference_samples(&records, &self.ctx, train_cfg.sample_spec());
        ensure!(
            !samples.is_empty(),
            "No usable test samples in '{}'",
            self.args.test_path
        );
        tracing::info!("Decoding {} test samples", samples.len());

        let inferencer = Inferencer::from_checkpoint(&ckpt_manager, self.ctx.vocab.len())?;

        for (i, sample) in samples.iter().enumerate() {
            let expected = self.ctx.vocab.decode(&sample.comment).join(" ");
            let generated = self.ctx.vocab.decode(&inferencer.generate(sample)).join(" ");

            println!("─── Example {} ───", i + 1);
            println!("Expected:     {expected}");
            println!("Model output: {generated}");
            println!();
        }

        Ok(())
    }
}
