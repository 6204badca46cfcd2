// ============================================================
// Layer 3 — Prompt Domain Types
// ============================================================
// The system classifies short text prompts into exactly two
// classes. The label indices are part of the wire contract:
// the classifier's output logit vector has logits[0] for SAFE
// and logits[1] for JAILBREAK, and every trained artifact
// encodes labels with the same indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two-class decision produced by the classifier.
///
/// The discriminant values are the logit indices — do not
/// reorder them, trained artifacts depend on the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Safe      = 0,
    Jailbreak = 1,
}

impl Label {
    /// The logit index this label corresponds to.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Decide a label from a 2-class logit vector.
    ///
    /// Exactly equal logits resolve to SAFE (index 0). This is an
    /// explicit convention, not an accident of some argmax
    /// implementation: every runtime that consumes the same
    /// artifact must break the tie the same way.
    pub fn from_logits(logits: [f32; 2]) -> Self {
        if logits[1] > logits[0] {
            Label::Jailbreak
        } else {
            Label::Safe
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Safe),
            1 => Some(Label::Jailbreak),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Safe      => write!(f, "SAFE"),
            Label::Jailbreak => write!(f, "JAILBREAK"),
        }
    }
}

/// A raw text prompt with its ground-truth label.
/// Produced by the data layer (CSV loader, seed corpus,
/// synthetic generator) and consumed by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledPrompt {
    /// The raw prompt text, before any normalisation
    pub text: String,

    /// Ground-truth class of this prompt
    pub label: Label,
}

impl LabeledPrompt {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self { text: text.into(), label }
    }

    pub fn safe(text: impl Into<String>) -> Self {
        Self::new(text, Label::Safe)
    }

    pub fn jailbreak(text: impl Into<String>) -> Self {
        Self::new(text, Label::Jailbreak)
    }
}

/// The result of classifying one prompt: the decided label
/// plus the raw logits it was decided from.
#[derive(Debug, Clone)]
pub struct Classification {
    pub label:  Label,
    pub logits: [f32; 2],
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_winner() {
        assert_eq!(Label::from_logits([0.1, 0.9]), Label::Jailbreak);
        assert_eq!(Label::from_logits([2.5, -1.0]), Label::Safe);
    }

    #[test]
    fn test_exact_tie_resolves_to_safe() {
        assert_eq!(Label::from_logits([0.5, 0.5]), Label::Safe);
        assert_eq!(Label::from_logits([0.0, 0.0]), Label::Safe);
        assert_eq!(Label::from_logits([-3.25, -3.25]), Label::Safe);
    }

    #[test]
    fn test_index_round_trip() {
        assert_eq!(Label::from_index(Label::Safe.index()), Some(Label::Safe));
        assert_eq!(Label::from_index(Label::Jailbreak.index()), Some(Label::Jailbreak));
        assert_eq!(Label::from_index(2), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Label::Safe.to_string(), "SAFE");
        assert_eq!(Label::Jailbreak.to_string(), "JAILBREAK");
    }
}
