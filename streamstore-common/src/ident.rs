use crate::error::StreamStoreError;
use sha1::{Digest, Sha1};

/// Width, in bytes, of a canonical stream id: a fixed-width 40-character
/// hash.
pub const CANONICAL_WIDTH: usize = 40;

const RESERVED_ALL: &str = "$all";
const SYSTEM_SIGIL: char = '$';

/// A stream identifier in both forms the engines need: the original name a
/// caller supplied (echoed back on reads) and the canonical 40-character
/// key everything is indexed by.
///
/// A 160-bit digest rendered as 40 hex characters is exactly a SHA-1
/// digest — used here purely as a stable identity hash, not for any
/// security property.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CanonicalStreamId {
    original: String,
    canonical: String,
}

impl CanonicalStreamId {
    pub fn new(original: impl Into<String>) -> Result<Self, StreamStoreError> {
        let original = original.into();

        if original.is_empty() {
            return Err(StreamStoreError::InvalidStreamName {
                name: original,
                reason: "stream name must not be empty".to_string(),
            });
        }

        if original == RESERVED_ALL {
            return Err(StreamStoreError::InvalidStreamName {
                name: original,
                reason: "'$all' is a reserved name".to_string(),
            });
        }

        let canonical = if original.starts_with(SYSTEM_SIGIL) {
            if original.len() > CANONICAL_WIDTH {
                return Err(StreamStoreError::InvalidStreamName {
                    name: original.clone(),
                    reason: format!(
                        "system stream names must not exceed {CANONICAL_WIDTH} bytes"
                    ),
                });
            }

            format!("{:\0>width$}", original, width = CANONICAL_WIDTH)
        } else {
            hash_hex(&original)
        };

        Ok(Self {
            original,
            canonical,
        })
    }

    /// Build directly from an already-known canonical key, for driver rows
    /// that only carry the canonical id and need the original restored from
    /// the `streams` table.
    pub fn from_parts(canonical: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            original: original.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.original.starts_with(SYSTEM_SIGIL)
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn original(&self) -> &str {
        &self.original
    }
}

fn hash_hex(value: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(CANONICAL_WIDTH);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }

    out
}

/// Name of the append-only system stream that carries deletion audit
/// events.
pub const DELETED_STREAM: &str = "$deleted";
