// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores the exported classifier artifact.
//
// An artifact is a directory containing:
//   1. Weight records (model_epoch_N.mpk) — Burn CompactRecorder
//   2. latest_epoch.json — which epoch's weights were written last
//   3. best_epoch.json   — which epoch had the lowest validation
//                          loss (optional; preferred at load time)
//   4. manifest.json     — the wire contract of the artifact
//
// The manifest is what makes the artifact self-describing. It
// records the declared input/output tensor names, the tokenizer
// configuration (max_len, vocab_size) and the model dimensions.
// The inference engine validates all of it at load time, so a
// producer/consumer mismatch fails loudly instead of silently
// misclassifying every prompt.
//
// Burn's CompactRecorder serialises model parameters to
// MessagePack and fails type-safely if the architecture the
// weights are loaded into doesn't match.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::ml::model::{JailbreakClassifier, JailbreakClassifierConfig};
use crate::tokenizer::TokenizerConfig;

/// Declared name of the token-id input tensor.
pub const INPUT_IDS_NAME: &str = "input_ids";

/// Declared name of the attention-mask input tensor.
pub const ATTENTION_MASK_NAME: &str = "attention_mask";

/// Declared name of the logit output tensor.
pub const LOGITS_NAME: &str = "logits";

/// Bumped whenever the manifest layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

// ─── ArtifactManifest ─────────────────────────────────────────────────────────
/// The artifact's declared contract: tensor names, tokenizer
/// configuration, and model dimensions. Written by the trainer,
/// validated by the inference engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version: u32,

    /// Input tensor names, in binding order
    pub input_names: Vec<String>,

    /// Output tensor name
    pub output_name: String,

    /// Tokenizer sequence length; every input must have exactly
    /// this many positions
    pub max_len: usize,

    /// Tokenizer hash bucket count
    pub vocab_size: usize,

    pub embed_dim:  usize,
    pub hidden_dim: usize,
    pub num_labels: usize,
}

impl ArtifactManifest {
    pub fn new(tokenizer: TokenizerConfig, model: &JailbreakClassifierConfig) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            input_names: vec![
                INPUT_IDS_NAME.to_string(),
                ATTENTION_MASK_NAME.to_string(),
            ],
            output_name: LOGITS_NAME.to_string(),
            max_len:     tokenizer.max_len,
            vocab_size:  tokenizer.vocab_size,
            embed_dim:   model.embed_dim,
            hidden_dim:  model.hidden_dim,
            num_labels:  model.num_labels,
        }
    }

    /// The tokenizer configuration this artifact was produced with.
    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig {
            max_len:    self.max_len,
            vocab_size: self.vocab_size,
        }
    }

    /// Check the declared contract against what this runtime
    /// implements. Any mismatch means the artifact was produced
    /// for a different consumer and must be rejected.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            bail!(
                "unsupported artifact format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            );
        }
        let expected_inputs = [INPUT_IDS_NAME, ATTENTION_MASK_NAME];
        if self.input_names != expected_inputs {
            bail!(
                "artifact declares input tensors {:?}, expected {:?}",
                self.input_names, expected_inputs
            );
        }
        if self.output_name != LOGITS_NAME {
            bail!(
                "artifact declares output tensor '{}', expected '{}'",
                self.output_name, LOGITS_NAME
            );
        }
        if self.max_len == 0 || self.vocab_size == 0 {
            bail!(
                "artifact declares degenerate tokenizer config (max_len={}, vocab_size={})",
                self.max_len, self.vocab_size
            );
        }
        if self.num_labels != 2 {
            bail!("artifact declares {} labels, this classifier is 2-class", self.num_labels);
        }
        Ok(())
    }
}

// ─── ArtifactStore ────────────────────────────────────────────────────────────
/// Manages the artifact directory on disk.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`, creating the directory if
    /// it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Save model weights for a given epoch and update the
    /// latest-epoch pointer.
    pub fn save_model<B: Backend>(
        &self,
        model: &JailbreakClassifier<B>,
        epoch: usize,
    ) -> Result<()> {
        // Recorder adds the file extension itself
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        tracing::debug!("Saved weights for epoch {}", epoch);
        Ok(())
    }

    /// Record which epoch currently has the lowest validation
    /// loss. Written by the trainer whenever validation improves.
    pub fn save_best_epoch(&self, epoch: usize) -> Result<()> {
        let path = self.dir.join("best_epoch.json");
        fs::write(&path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write best_epoch.json")?;
        tracing::debug!("Marked epoch {} as best", epoch);
        Ok(())
    }

    /// Load the selected weights into `model`: the best-validation
    /// epoch when one was recorded, otherwise the latest. The model
    /// must have the architecture the weights were recorded with,
    /// or the recorder fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  JailbreakClassifier<B>,
        device: &B::Device,
    ) -> Result<JailbreakClassifier<B>> {
        let epoch = self.selected_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::debug!("Loading weights from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load weights '{}'. Has the model been trained?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Write the artifact manifest. Called before training starts
    /// so a partially trained artifact is still self-describing.
    pub fn save_manifest(&self, manifest: &ArtifactManifest) -> Result<()> {
        let path = self.dir.join("manifest.json");
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;
        tracing::debug!("Saved artifact manifest to '{}'", path.display());
        Ok(())
    }

    /// Read the artifact manifest.
    pub fn load_manifest(&self) -> Result<ArtifactManifest> {
        let path = self.dir.join("manifest.json");
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read manifest from '{}'. Is this an artifact directory?",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed manifest '{}'", path.display()))
    }

    /// The epoch whose weights should be loaded: best_epoch.json
    /// when present, latest_epoch.json otherwise.
    fn selected_epoch(&self) -> Result<usize> {
        let best = self.dir.join("best_epoch.json");
        if best.exists() {
            let s = fs::read_to_string(&best)
                .with_context(|| "Cannot read 'best_epoch.json'")?;
            return Ok(serde_json::from_str::<usize>(&s)?);
        }
        let path = self.dir.join("latest_epoch.json");
        let s = fs::read_to_string(&path)
            .with_context(|| "Cannot find 'latest_epoch.json'. Has the model been trained?")?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ArtifactManifest {
        ArtifactManifest::new(
            TokenizerConfig { max_len: 64, vocab_size: 8192 },
            &JailbreakClassifierConfig::new(8192),
        )
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let m = manifest();
        store.save_manifest(&m).unwrap();
        let loaded = store.load_manifest().unwrap();

        assert_eq!(loaded.max_len, 64);
        assert_eq!(loaded.vocab_size, 8192);
        assert_eq!(loaded.input_names, vec!["input_ids", "attention_mask"]);
        assert_eq!(loaded.output_name, "logits");
        loaded.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_renamed_inputs() {
        let mut m = manifest();
        m.input_names = vec!["ids".to_string(), "mask".to_string()];
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_output_name() {
        let mut m = manifest();
        m.output_name = "scores".to_string();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_future_format_version() {
        let mut m = manifest();
        m.format_version = FORMAT_VERSION + 1;
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_tokenizer() {
        let mut m = manifest();
        m.vocab_size = 0;
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(store.load_manifest().is_err());
    }

    type TestBackend = burn::backend::NdArray;

    fn forward_fingerprint(model: &JailbreakClassifier<TestBackend>) -> Vec<f32> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let ids  = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 3, 4], &device)
            .reshape([1, 4]);
        let mask = Tensor::<TestBackend, 1, Int>::from_ints([1, 1, 1, 1], &device)
            .reshape([1, 4]);
        model.forward(ids, mask).into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_load_prefers_best_epoch_over_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let device = burn::backend::ndarray::NdArrayDevice::default();

        // Two independently initialised weight sets: epoch 2 is
        // latest, epoch 1 is marked best.
        let cfg = JailbreakClassifierConfig::new(64);
        let model_best   = cfg.init::<TestBackend>(&device);
        let model_latest = cfg.init::<TestBackend>(&device);
        store.save_model(&model_best, 1).unwrap();
        store.save_model(&model_latest, 2).unwrap();
        store.save_best_epoch(1).unwrap();

        let loaded = store
            .load_model(cfg.init::<TestBackend>(&device), &device)
            .unwrap();

        let loaded_out = forward_fingerprint(&loaded);
        let best_out   = forward_fingerprint(&model_best);
        let latest_out = forward_fingerprint(&model_latest);

        for (a, b) in loaded_out.iter().zip(&best_out) {
            assert!((a - b).abs() < 1e-6, "loaded {a} vs best {b}");
        }
        assert!(
            loaded_out.iter().zip(&latest_out).any(|(a, b)| (a - b).abs() > 1e-6),
            "loaded weights match the latest epoch, not the best one"
        );
    }

    #[test]
    fn test_load_falls_back_to_latest_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let cfg = JailbreakClassifierConfig::new(64);
        let model = cfg.init::<TestBackend>(&device);
        store.save_model(&model, 3).unwrap();

        // No best_epoch.json written — latest_epoch.json decides
        let loaded = store
            .load_model(cfg.init::<TestBackend>(&device), &device)
            .unwrap();
        let loaded_out = forward_fingerprint(&loaded);
        for (a, b) in loaded_out.iter().zip(&forward_fingerprint(&model)) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
