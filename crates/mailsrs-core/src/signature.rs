//! Truncated HMAC-SHA1 address signatures
//!
//! Only the first 16 bits of the digest are kept (4 hex characters). That
//! is enough to catch corrupted or casually forged bounces inside the max
//! age window, not to stop an attacker who can query the forwarder.

use hmac::{Hmac, Mac};
use mailsrs_common::{Error, Result};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Number of hex characters kept from the digest
pub const HASH_LEN: usize = 4;

/// HMAC-SHA1 keyed with the rewriting secret
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha1,
}

impl Signer {
    pub fn new(secret: &[u8]) -> Result<Self> {
        let mac = HmacSha1::new_from_slice(secret)
            .map_err(|e| Error::Config(format!("Invalid HMAC key: {}", e)))?;
        Ok(Self { mac })
    }

    /// Sign `parts` in order, fed to the MAC without any separator
    pub fn sign(&self, parts: &[&[u8]]) -> String {
        let digest = self.keyed(parts).finalize().into_bytes();
        hex::encode(&digest[..HASH_LEN / 2])
    }

    /// Check a 4 digit lowercase hex signature against `parts`
    ///
    /// The decoded bytes are compared in constant time.
    pub fn verify(&self, parts: &[&[u8]], hash: &str) -> bool {
        if hash.len() != HASH_LEN || !hash.bytes().all(is_lower_hex) {
            return false;
        }
        let Ok(expected) = hex::decode(hash) else {
            return false;
        };

        self.keyed(parts).verify_truncated_left(&expected).is_ok()
    }

    fn keyed(&self, parts: &[&[u8]]) -> HmacSha1 {
        let mut mac = self.mac.clone();
        for part in parts {
            mac.update(part);
        }
        mac
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Signer { .. }")
    }
}

/// Signatures are always written in lowercase
pub fn is_lower_hex(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'a'..=b'f')
}

/// One-shot signature of `parts` under `secret`
pub fn sign(secret: &[u8], parts: &[&[u8]]) -> Result<String> {
    Ok(Signer::new(secret)?.sign(parts))
}
