//! Detached signatures for catalog documents.
//!
//! The sidecar of `.../index.json` lives at `.../index.sjson` and holds a JSON
//! envelope naming the signing key, the SHA256 digest of the exact document
//! bytes and an Ed25519 signature over that digest string.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, StreamsError};

/// Whether a source may be used without a valid signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePolicy {
    /// Missing or invalid signatures make the source unusable.
    Required,
    /// Signatures are checked when present; problems are only logged.
    BestEffort,
}

impl From<bool> for SignaturePolicy {
    fn from(require_signed: bool) -> Self {
        if require_signed {
            SignaturePolicy::Required
        } else {
            SignaturePolicy::BestEffort
        }
    }
}

/// Trusted Ed25519 public keys, by name.
#[derive(Debug, Clone, Default)]
pub struct Keyring {
    keys: BTreeMap<String, VerifyingKey>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, key: VerifyingKey) {
        self.keys.insert(id.into(), key);
    }

    /// Add a key given as `ed25519:<base64>`.
    pub fn insert_encoded(&mut self, id: &str, value: &str) -> Result<()> {
        let invalid = |reason: &str| StreamsError::InvalidKey {
            id: id.to_string(),
            reason: reason.to_string(),
        };
        let (alg, key_b64) = value
            .split_once(':')
            .ok_or_else(|| invalid("expected `ed25519:<base64>`"))?;
        if !alg.eq_ignore_ascii_case("ed25519") {
            return Err(invalid(&format!("unsupported algorithm `{alg}`")));
        }
        let raw = decode_base64(key_b64).map_err(|_| invalid("key is not valid base64"))?;
        let bytes: &[u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| invalid("key must be 32 bytes"))?;
        let key =
            VerifyingKey::from_bytes(bytes).map_err(|_| invalid("not a valid Ed25519 key"))?;
        self.insert(id, key);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&VerifyingKey> {
        self.keys.get(id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Contents of a `.sjson` sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    pub key_id: String,
    /// `sha256:<hex>` of the signed document.
    pub digest: String,
    /// Base64 Ed25519 signature over `digest`.
    pub signature: String,
}

impl SignatureEnvelope {
    /// Sign `content` with `key`; used by publishers and test fixtures.
    pub fn sign(content: &[u8], key_id: impl Into<String>, key: &SigningKey) -> Self {
        let digest = content_digest(content);
        let signature = key.sign(digest.as_bytes());
        Self {
            key_id: key_id.into(),
            digest,
            signature: STANDARD.encode(signature.to_bytes()),
        }
    }

    /// Serialized sidecar body.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Sidecar location for a document URL.
pub fn sidecar_url(url: &str) -> String {
    match url.strip_suffix(".json") {
        Some(stem) => format!("{stem}.sjson"),
        None => format!("{url}.sjson"),
    }
}

pub fn content_digest(content: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(content)))
}

fn decode_base64(value: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    STANDARD_NO_PAD
        .decode(value.trim())
        .or_else(|_| STANDARD.decode(value.trim()))
}

/// Check `signature` (sidecar bytes) against `content` exactly as fetched.
///
/// Runs before the content is parsed so a truncated body cannot be accepted.
pub fn verify(content: &[u8], signature: &[u8], keyring: &Keyring, url: &str) -> Result<()> {
    let invalid = |reason: String| StreamsError::SignatureInvalid {
        url: url.to_string(),
        reason,
    };

    let envelope: SignatureEnvelope = serde_json::from_slice(signature)
        .map_err(|err| invalid(format!("malformed signature envelope: {err}")))?;

    let digest = content_digest(content);
    if !digest.eq_ignore_ascii_case(&envelope.digest) {
        return Err(invalid(format!(
            "digest mismatch: signed {}, fetched {}",
            envelope.digest, digest
        )));
    }

    let key = keyring
        .get(&envelope.key_id)
        .ok_or_else(|| invalid(format!("key {:?} is not trusted", envelope.key_id)))?;
    let raw = decode_base64(&envelope.signature)
        .map_err(|_| invalid("signature is not valid base64".to_string()))?;
    let signature = Signature::from_slice(&raw)
        .map_err(|_| invalid("not an Ed25519 signature".to_string()))?;
    key.verify(envelope.digest.as_bytes(), &signature)
        .map_err(|_| invalid("signature does not verify".to_string()))
}
