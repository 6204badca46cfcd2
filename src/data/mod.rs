// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw labelled prompts to backend-ready tensor
// batches. The pipeline flows in this order:
//
//   CSV file / seed corpus / synthetic generator
//       │
//       ▼
//   LabeledPrompt      → raw text + ground-truth label
//       │
//       ▼
//   split_stratified   → train/validation with the class ratio
//       │                 preserved in both sets
//       ▼
//   HashTokenizer      → fixed-length (ids, mask) encodings
//       │
//       ▼
//   PromptDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   PromptBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader         → feeds batches to the training loop
//
// Each module is responsible for exactly one step.

/// Loads jailbreak prompts from a CSV dataset file
pub mod loader;

/// Built-in seed corpus and synthetic safe-example generation
pub mod synthetic;

/// Stratified, seeded train/validation splitting
pub mod splitter;

/// Implements Burn's Dataset trait for tokenised prompts
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
