// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Gather labelled prompts    (Layer 4 - data)
//   Step 2: Balance with synthetic     (Layer 4 - data)
//   Step 3: Deduplicate                (here)
//   Step 4: Stratified split           (Layer 4 - data)
//   Step 5: Tokenize                   (core - tokenizer)
//   Step 6: Build datasets             (Layer 4 - data)
//   Step 7: Write artifact manifest    (Layer 6 - infra)
//   Step 8: Run training loop          (Layer 5 - ml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::data::{
    dataset::{PromptDataset, PromptSample},
    loader::CsvPromptLoader,
    splitter::split_stratified,
    synthetic::{generate_safe, seed_corpus},
};
use crate::domain::prompt::{Label, LabeledPrompt};
use crate::domain::traits::PromptSource;
use crate::infra::artifact::{ArtifactManifest, ArtifactStore};
use crate::ml::model::JailbreakClassifierConfig;
use crate::ml::trainer::run_training;
use crate::tokenizer::{HashTokenizer, TokenizerConfig};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so a run
// can be reproduced from its recorded configuration. The
// tokenizer part of it (max_len, vocab_size) also ends up in the
// artifact manifest, which is what inference validates against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Optional CSV file of jailbreak prompts; the seed corpus is
    /// always included
    pub csv_path:     Option<String>,
    pub artifact_dir: String,
    pub max_len:      usize,
    pub vocab_size:   usize,
    pub embed_dim:    usize,
    pub hidden_dim:   usize,
    pub dropout:      f64,
    pub batch_size:   usize,
    pub epochs:       usize,
    pub lr:           f64,
    /// Fraction of prompts used for training (rest validates)
    pub train_fraction: f64,
    /// Seed for the split shuffle, loader shuffle, and synthetic
    /// generation
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            csv_path:       None,
            artifact_dir:   "artifact".to_string(),
            max_len:        64,
            vocab_size:     8192,
            embed_dim:      64,
            hidden_dim:     64,
            dropout:        0.2,
            batch_size:     8,
            epochs:         15,
            lr:             1e-3,
            train_fraction: 0.75,
            seed:           42,
        }
    }
}

impl TrainConfig {
    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig {
            max_len:    self.max_len,
            vocab_size: self.vocab_size,
        }
    }

    pub fn model_config(&self) -> JailbreakClassifierConfig {
        JailbreakClassifierConfig::new(self.vocab_size)
            .with_embed_dim(self.embed_dim)
            .with_hidden_dim(self.hidden_dim)
            .with_dropout(self.dropout)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Gather labelled prompts ───────────────────────────────────
        let mut prompts = seed_corpus();
        if let Some(path) = &cfg.csv_path {
            tracing::info!("Loading jailbreak dataset from '{}'", path);
            let loader = CsvPromptLoader::new(path.clone());
            prompts.extend(loader.load_all()?);
        }

        // ── Step 2: Balance classes with synthetic safe prompts ───────────────
        // Public jailbreak datasets are jailbreak-only, so the safe
        // side is topped up to match.
        let jailbreak_count = prompts.iter().filter(|p| p.label == Label::Jailbreak).count();
        let safe_count      = prompts.iter().filter(|p| p.label == Label::Safe).count();
        let missing_safe    = jailbreak_count.saturating_sub(safe_count);
        if missing_safe > 0 {
            prompts.extend(generate_safe(missing_safe, cfg.seed));
        }

        // ── Step 3: Deduplicate by case-folded text ───────────────────────────
        let prompts = dedup_prompts(prompts);
        tracing::info!("Corpus after dedup: {} prompts", prompts.len());
        if prompts.is_empty() {
            anyhow::bail!("No training data available");
        }

        // ── Step 4: Stratified train/validation split ─────────────────────────
        let (train_prompts, val_prompts) =
            split_stratified(prompts, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_prompts.len(),
            val_prompts.len()
        );

        // ── Step 5: Tokenize ──────────────────────────────────────────────────
        let tokenizer = HashTokenizer::new(cfg.tokenizer_config())
            .context("Invalid tokenizer configuration")?;
        let tokenize = |prompts: &[LabeledPrompt]| -> Vec<PromptSample> {
            prompts
                .iter()
                .map(|p| PromptSample::new(tokenizer.encode(&p.text), p.label))
                .collect()
        };
        let train_samples = tokenize(&train_prompts);
        let val_samples   = tokenize(&val_prompts);

        // ── Step 6: Build Burn datasets ───────────────────────────────────────
        let train_dataset = PromptDataset::new(train_samples);
        let val_dataset   = PromptDataset::new(val_samples);

        // ── Step 7: Write the artifact manifest ───────────────────────────────
        // Written before training so the artifact directory is
        // self-describing from the first checkpoint on, and so
        // inference can always validate tokenizer parity.
        let store = ArtifactStore::new(cfg.artifact_dir.clone());
        let manifest = ArtifactManifest::new(cfg.tokenizer_config(), &cfg.model_config());
        store.save_manifest(&manifest)?;

        // ── Step 8: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, train_dataset, val_dataset, store)?;

        Ok(())
    }
}

/// Drop duplicate prompts, comparing case-folded trimmed text.
/// First occurrence wins, so seed-corpus labels take priority
/// over later CSV rows with the same text.
fn dedup_prompts(prompts: Vec<LabeledPrompt>) -> Vec<LabeledPrompt> {
    let mut seen: HashSet<String> = HashSet::new();
    prompts
        .into_iter()
        .filter(|p| seen.insert(p.text.trim().to_lowercase()))
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let prompts = vec![
            LabeledPrompt::safe("Hello World"),
            LabeledPrompt::jailbreak("hello world"),
            LabeledPrompt::jailbreak("something else"),
        ];
        let deduped = dedup_prompts(prompts);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].label, Label::Safe);
    }

    #[test]
    fn test_default_config_matches_contract() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.max_len, 64);
        assert_eq!(cfg.vocab_size, 8192);
        assert_eq!(cfg.embed_dim, 64);
        assert_eq!(cfg.hidden_dim, 64);
        assert_eq!(cfg.model_config().num_labels, 2);
    }
}
