// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Keeping this layer pure means the label decision rule and
// the prompt types can be unit tested without any ML backend.

// A labelled text prompt and the SAFE/JAILBREAK label type
pub mod prompt;

// Core abstractions (traits) that other layers implement
pub mod traits;
