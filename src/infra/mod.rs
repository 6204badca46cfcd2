// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   artifact.rs — The artifact store: model weights (Burn
//                 CompactRecorder) plus the manifest.json that
//                 declares the artifact's wire contract (tensor
//                 names, tokenizer config, model dimensions).
//
//   metrics.rs  — Training metrics logging. Writes epoch-level
//                 metrics (loss, accuracy) to a CSV file for
//                 later analysis and plotting.

/// Artifact saving and loading (weights + manifest)
pub mod artifact;

/// Training metrics CSV logger
pub mod metrics;
