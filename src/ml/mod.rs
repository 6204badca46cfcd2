// ============================================================
// Layer 5 — ML Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly, except the data
// layer's Dataset/Batcher glue — the domain and tokenizer stay
// framework-free so the encoding contract can be verified
// without any numeric backend.
//
// What's in this layer:
//
//   model.rs      — The frozen classifier architecture:
//                   embedding → masked mean pooling →
//                   linear + ReLU → dropout → linear → 2 logits
//
//   trainer.rs    — The training loop: forward pass, cross-
//                   entropy loss, backward pass, Adam step,
//                   per-epoch checkpointing and metrics
//
//   inferencer.rs — The inference engine: loads an exported
//                   artifact, validates its declared contract,
//                   and runs batched inference with the typed
//                   Artifact/Shape/Runtime error taxonomy

/// The fixed-architecture classifier
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — artifact load/run contract
pub mod inferencer;
