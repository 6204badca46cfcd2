// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// implementations can be swapped without changing the code
// that uses them:
//   - CsvPromptLoader implements PromptSource
//   - a future JSONL loader could also implement PromptSource
//   - the application layer only sees PromptSource
//
// This is the Dependency Inversion Principle applied through
// Rust's trait system.

use anyhow::Result;
use crate::domain::prompt::{Classification, LabeledPrompt};

// ─── PromptSource ─────────────────────────────────────────────────────────────
/// Any component that can supply labelled prompts for training.
///
/// Implementations:
///   - CsvPromptLoader → loads jailbreak prompts from a CSV file
///   - seed/synthetic generators in the data layer
pub trait PromptSource {
    /// Load all available labelled prompts from this source.
    fn load_all(&self) -> Result<Vec<LabeledPrompt>>;
}

// ─── PromptClassifier ─────────────────────────────────────────────────────────
/// Any component that can classify a raw prompt string.
///
/// Implementations:
///   - ClassifyUseCase → tokenizer + inference engine over an artifact
pub trait PromptClassifier {
    /// Classify one prompt, returning the label and raw logits.
    fn classify(&self, text: &str) -> Result<Classification>;
}
