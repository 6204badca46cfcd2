// ============================================================
// Core — Stable Hash
// ============================================================
// The cross-platform compatibility anchor of the tokenizer.
//
// Definition: take the MD5 digest of the word's UTF-8 bytes,
// take the first 8 lowercase-hex characters of the digest, and
// parse them as a base-16 unsigned integer. Two hex characters
// encode one byte, so this equals reading the first four digest
// bytes as a big-endian u32 — which is how it is computed here.
//
// MD5 is used purely as a stable, everywhere-available digest,
// not for any cryptographic property.

use md5::{Digest, Md5};

/// Hash a word to a u32 that is identical across every process,
/// platform, and runtime.
pub fn stable_hash(word: &str) -> u32 {
    let digest = Md5::digest(word.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // Golden fixtures: first 8 hex chars of the MD5 digest, parsed
    // base-16. Computed once with a reference MD5 implementation
    // and pinned so any drift in the hash breaks the build.
    //   md5("hello") = 5d41402abc4b2a76b9719d911017c592 → 0x5d41402a
    //   md5("world") = 7d793037a0760186574b0282f2f435e7 → 0x7d793037
    //   md5("abc")   = 900150983cd24fb0d6963f7d28e17f72 → 0x90015098
    #[test]
    fn test_golden_values() {
        assert_eq!(stable_hash("hello"), 0x5d41402a);
        assert_eq!(stable_hash("hello"), 1_564_557_354);
        assert_eq!(stable_hash("world"), 0x7d793037);
        assert_eq!(stable_hash("abc"), 0x90015098);
    }

    #[test]
    fn test_deterministic_across_calls() {
        for word in ["ignore", "previous", "instructions", "x", "1234"] {
            assert_eq!(stable_hash(word), stable_hash(word));
        }
    }

    #[test]
    fn test_hashes_utf8_bytes() {
        // The hash is over UTF-8 bytes, so multi-byte input is
        // well-defined even though the tokenizer's character filter
        // never feeds it non-ASCII words.
        let a = stable_hash("héllo");
        let b = stable_hash("hello");
        assert_ne!(a, b);
    }
}
