// ============================================================
// Core — Stable Hash Tokenizer
// ============================================================
// Converts raw text into the fixed-length (input_ids,
// attention_mask) pair the classifier consumes.
//
// The whole point of this module is cross-runtime parity: the
// encoding produced here must be bit-identical to the encoding
// produced by any other runtime that trained or serves the same
// artifact. Every step of the algorithm is therefore fixed:
//
//   1. ASCII-range lowercase fold (no Unicode case folding)
//   2. every char outside [a-z0-9] and whitespace → space
//   3. trim, split on whitespace runs
//   4. id = (stable_hash(word) mod vocab_size) + 1, mask = 1
//   5. remaining positions stay PAD (id 0, mask 0);
//      words past max_len are silently dropped
//
// stable_hash is an MD5 truncation (see hash.rs), never a
// language-native hash: the standard library's Hasher is
// randomised per process and would silently break parity with
// every other runtime. An earlier scheme that hashed with the
// host language's built-in hash (absolute value, then modulo)
// existed exactly once and is deliberately not implemented.

mod encoder;
mod hash;

pub use encoder::{Encoding, HashTokenizer, TokenizerConfig, TokenizerError};
pub use hash::stable_hash;

/// Reserved token id for padding positions.
pub const PAD_ID: i64 = 0;
