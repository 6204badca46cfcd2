// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish a
// specific goal. No ML math here, no printing here (Layer 1),
// no direct tensor code (Layer 5) — only workflow coordination.

// The training workflow: data gathering through artifact export
pub mod train_use_case;

// The inference workflow: artifact load + tokenize + classify
pub mod classify_use_case;

// The artifact conformance smoke test
pub mod verify_use_case;
