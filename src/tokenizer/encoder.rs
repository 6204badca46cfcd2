// ============================================================
// Core — Tokenizer Encoder
// ============================================================
// Pure function from text to a fixed-length encoding. No shared
// state: a HashTokenizer only holds two integers of immutable
// configuration, so it can be called concurrently from any
// number of threads.
//
// The configuration (max_len, vocab_size) must match whatever
// produced the model artifact. The artifact manifest records
// both values so a mismatch is detectable at load time instead
// of silently corrupting every classification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::stable_hash;
use super::PAD_ID;

/// Configuration-stage failures. Encoding itself is total over
/// any string input and never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("vocab_size must be at least 1, got {0}")]
    InvalidVocabSize(usize),

    #[error("max_len must be at least 1, got {0}")]
    InvalidMaxLen(usize),
}

/// The two integers that define a tokenizer. Serialisable so
/// they can be embedded in the artifact manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Fixed output sequence length; longer inputs are truncated
    pub max_len: usize,

    /// Number of hash buckets; real token ids live in [1, vocab_size]
    pub vocab_size: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { max_len: 64, vocab_size: 8192 }
    }
}

/// One encoded prompt: token ids plus attention mask, both of
/// length `max_len`. i64 because the wire contract uses 64-bit
/// signed integer tensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Token ids; 0 is PAD, real tokens are in [1, vocab_size]
    pub input_ids: Vec<i64>,

    /// 1 marks a real token, 0 marks padding
    pub attention_mask: Vec<i64>,
}

impl Encoding {
    /// An all-PAD placeholder encoding of the given length.
    /// Used by the verification harness.
    pub fn zeros(max_len: usize) -> Self {
        Self {
            input_ids:      vec![PAD_ID; max_len],
            attention_mask: vec![0; max_len],
        }
    }

    /// Number of real (non-padding) tokens.
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}

/// The deterministic stable-hash tokenizer.
#[derive(Debug)]
pub struct HashTokenizer {
    config: TokenizerConfig,
}

impl HashTokenizer {
    pub fn new(config: TokenizerConfig) -> Result<Self, TokenizerError> {
        if config.vocab_size == 0 {
            return Err(TokenizerError::InvalidVocabSize(config.vocab_size));
        }
        if config.max_len == 0 {
            return Err(TokenizerError::InvalidMaxLen(config.max_len));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> TokenizerConfig {
        self.config
    }

    /// Encode one prompt into (input_ids, attention_mask).
    ///
    /// Every step is part of the cross-runtime contract; see the
    /// module docs. Empty or all-whitespace input produces an
    /// all-zero encoding, which is valid (the classifier's pooling
    /// clamp handles it), not an error.
    pub fn encode(&self, text: &str) -> Encoding {
        let max_len    = self.config.max_len;
        let vocab_size = self.config.vocab_size as u64;

        // ── Step 1+2: normalise ───────────────────────────────────────────────
        // ASCII-range case fold, then map every char that is not
        // [a-z0-9] or whitespace to a single space. Character-class
        // filter, not a word filter: "don't" becomes "don t".
        let normalized: String = text
            .chars()
            .map(|c| {
                let c = c.to_ascii_lowercase();
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let mut input_ids      = vec![PAD_ID; max_len];
        let mut attention_mask = vec![0i64; max_len];

        // ── Step 3+4: split and hash ──────────────────────────────────────────
        // split_whitespace trims and collapses runs, so empty input
        // yields no words at all. Words past max_len are dropped.
        for (i, word) in normalized.split_whitespace().take(max_len).enumerate() {
            let h = stable_hash(word) as u64;
            // +1 reserves id 0 for PAD, so ids land in [1, vocab_size]
            let idx = (h % vocab_size) + 1;
            input_ids[i]      = idx as i64;
            attention_mask[i] = 1;
        }

        Encoding { input_ids, attention_mask }
    }
}
