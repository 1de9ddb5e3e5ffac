//! Opaque solution-digest collaborator.

use std::fmt;
use std::fmt::Write as _;

use sha2::{Digest as _, Sha256};

/// Hashes a canonical fill serialization for solution checking.
///
/// The comparison against the published hash is the only "is it correct"
/// signal this system has; letters are never validated individually.
pub trait SolutionDigest: fmt::Debug {
    /// Digest of `serialized_fill`, in the producer's text encoding.
    fn digest(&self, serialized_fill: &str) -> String;
}

/// SHA-256 digest, hex-encoded lowercase. The production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl SolutionDigest for Sha256Digest {
    fn digest(&self, serialized_fill: &str) -> String {
        let digest = Sha256::digest(serialized_fill.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}
