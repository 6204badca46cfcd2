use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::prompt::Label;
use crate::tokenizer::Encoding;

/// One fully tokenised training sample: a fixed-length encoding
/// plus the ground-truth label index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSample {
    pub input_ids:      Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub label:          usize,
}

impl PromptSample {
    pub fn new(encoding: Encoding, label: Label) -> Self {
        Self {
            input_ids:      encoding.input_ids,
            attention_mask: encoding.attention_mask,
            label:          label.index(),
        }
    }
}

pub struct PromptDataset {
    samples: Vec<PromptSample>,
}

impl PromptDataset {
    pub fn new(samples: Vec<PromptSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<PromptSample> for PromptDataset {
    fn get(&self, index: usize) -> Option<PromptSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
