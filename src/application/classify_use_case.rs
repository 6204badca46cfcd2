// ============================================================
// Layer 2 — ClassifyUseCase
// ============================================================
// Loads an artifact once and classifies prompts against it.
//
// The tokenizer configuration is taken from the artifact's
// manifest, never from the caller: the encoding at inference
// time must match the encoding the model was trained with, and
// the manifest is the single source of truth for that pairing.
//
// The engine's parameters are immutable after load, so one
// ClassifyUseCase can serve any number of classify() calls
// (from any number of threads) without further synchronisation.

use anyhow::{Context, Result};

use crate::domain::prompt::{Classification, Label};
use crate::domain::traits::PromptClassifier;
use crate::infra::artifact::ArtifactStore;
use crate::ml::inferencer::InferenceEngine;
use crate::tokenizer::HashTokenizer;

pub struct ClassifyUseCase {
    tokenizer: HashTokenizer,
    engine:    InferenceEngine,
}

impl ClassifyUseCase {
    /// Load the artifact and build the matching tokenizer from
    /// its manifest.
    pub fn new(artifact_dir: impl Into<String>) -> Result<Self> {
        let store  = ArtifactStore::new(artifact_dir.into());
        let engine = InferenceEngine::load(&store)?;
        let tokenizer = HashTokenizer::new(engine.manifest().tokenizer_config())
            .context("Artifact declares an invalid tokenizer configuration")?;
        Ok(Self { tokenizer, engine })
    }

    /// Classify a batch of prompts in one forward pass.
    pub fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Classification>> {
        let encodings: Vec<_> = texts.iter().map(|t| self.tokenizer.encode(t)).collect();
        let logits = self.engine.run(&encodings)?;
        Ok(logits
            .into_iter()
            .map(|l| Classification { label: Label::from_logits(l), logits: l })
            .collect())
    }
}

impl PromptClassifier for ClassifyUseCase {
    fn classify(&self, text: &str) -> Result<Classification> {
        // One input in, exactly one result out: run() never
        // returns partial batches.
        self.classify_batch(&[text])?
            .into_iter()
            .next()
            .context("Engine returned an empty result for a single prompt")
    }
}
