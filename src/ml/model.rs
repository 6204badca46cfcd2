// ============================================================
// Layer 5 — Classifier Model
// ============================================================
// The frozen classifier architecture:
//
//   embedding (vocab_size + 2 rows × embed_dim)
//     → masked mean pooling over the sequence
//     → linear embed_dim → hidden, ReLU
//     → dropout (training only)
//     → linear hidden → 2 logits
//
// Row 0 of the embedding table is the PAD row. The forward pass
// never relies on its value: padding positions are zeroed by the
// attention mask before pooling, so the same artifact produces
// the same logits no matter what the PAD row happens to contain.
//
// The forward pass broadcasts independently over the batch —
// there is no cross-example interaction, so a batch of one must
// produce the same logits as the matching row of a larger batch.

use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct JailbreakClassifierConfig {
    /// Number of hash buckets of the tokenizer; token ids live in
    /// [1, vocab_size] and the embedding table has vocab_size + 2
    /// rows (row 0 is PAD)
    pub vocab_size: usize,

    #[config(default = 64)]
    pub embed_dim: usize,

    #[config(default = 64)]
    pub hidden_dim: usize,

    #[config(default = 2)]
    pub num_labels: usize,

    /// Dropout probability on the hidden activations during
    /// training. Inference never applies dropout.
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl JailbreakClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> JailbreakClassifier<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size + 2, self.embed_dim).init(device);
        let fc1       = LinearConfig::new(self.embed_dim, self.hidden_dim).init(device);
        let fc2       = LinearConfig::new(self.hidden_dim, self.num_labels).init(device);
        let dropout   = DropoutConfig::new(self.dropout).init();
        JailbreakClassifier { embedding, fc1, fc2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct JailbreakClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub fc1:       Linear<B>,
    pub fc2:       Linear<B>,
    pub dropout:   Dropout,
}

impl<B: Backend> JailbreakClassifier<B> {
    /// input_ids, attention_mask: [batch, seq_len] → logits: [batch, 2]
    pub fn forward(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let embedded = self.embedding.forward(input_ids); // [batch, seq, embed]

        // ── Masked mean pooling ───────────────────────────────────────────────
        // Zero out padding positions, sum over the sequence, divide
        // by the number of real tokens. The clamp to 1.0 keeps the
        // all-PAD case (empty input) at an all-zero pooled vector
        // instead of dividing by zero and propagating NaN.
        let mask = attention_mask.float().unsqueeze_dim::<3>(2); // [batch, seq, 1]
        let summed = (embedded * mask.clone())
            .sum_dim(1)
            .squeeze::<2>(1); // [batch, embed]
        let denom = mask
            .sum_dim(1)
            .squeeze::<2>(1)
            .clamp_min(1.0); // [batch, 1]
        let pooled = summed / denom;

        // ── Classification head ───────────────────────────────────────────────
        let hidden = burn::tensor::activation::relu(self.fc1.forward(pooled));
        let hidden = self.dropout.forward(hidden);
        self.fc2.forward(hidden) // [batch, 2]
    }

    /// Forward pass plus cross-entropy loss against integer labels.
    /// Works on both the autodiff backend (training) and the plain
    /// backend (validation, where dropout is a no-op).
    pub fn forward_classification(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        labels:         Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(input_ids, attention_mask);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }
}
