// ============================================================
// Layer 2 — VerifyUseCase
// ============================================================
// The conformance smoke test for an exported artifact: load it,
// push a batch of all-zero placeholder encodings of the declared
// shape through it, and assert that execution succeeds with the
// right output shape and finite logits.
//
// This proves the artifact is loadable and executable by this
// runtime — it says nothing about classification quality.

use anyhow::{bail, Result};

use crate::infra::artifact::ArtifactStore;
use crate::ml::inferencer::InferenceEngine;
use crate::tokenizer::Encoding;

pub struct VerifyUseCase {
    artifact_dir: String,
}

impl VerifyUseCase {
    pub fn new(artifact_dir: impl Into<String>) -> Self {
        Self { artifact_dir: artifact_dir.into() }
    }

    /// Run the smoke test with the given placeholder batch size.
    pub fn execute(&self, batch_size: usize) -> Result<()> {
        let store  = ArtifactStore::new(self.artifact_dir.clone());
        let engine = InferenceEngine::load(&store)?;

        let max_len = engine.manifest().max_len;
        let batch: Vec<Encoding> = (0..batch_size)
            .map(|_| Encoding::zeros(max_len))
            .collect();

        let logits = engine.run(&batch)?;

        if logits.len() != batch_size {
            bail!(
                "Artifact returned {} logit rows for a batch of {}",
                logits.len(),
                batch_size
            );
        }
        for (i, row) in logits.iter().enumerate() {
            if !row.iter().all(|v| v.is_finite()) {
                bail!("Artifact returned non-finite logits at row {i}: {row:?}");
            }
        }

        tracing::info!(
            "Artifact OK: batch of {} placeholder inputs produced {}×2 finite logits",
            batch_size,
            logits.len()
        );
        Ok(())
    }
}
