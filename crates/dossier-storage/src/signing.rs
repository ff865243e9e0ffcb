//! Signed, expiring download URLs for backends without native presigning.
//!
//! Signature = base64url(HMAC-SHA256(secret, "{key}\n{expires}")), where
//! `expires` is a unix timestamp in seconds.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Download link signature is invalid")]
    Invalid,
    #[error("Download link has expired")]
    Expired,
}

/// Query parameters appended to a signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    pub expires: u64,
    pub signature: String,
}

impl SignedQuery {
    pub fn to_query_string(&self) -> String {
        format!("expires={}&signature={}", self.expires, self.signature)
    }
}

#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl UrlSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        UrlSigner {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, key: &str, expires: u64) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key size");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    pub fn sign(&self, key: &str, expires_in: Duration) -> SignedQuery {
        let expires = now_secs().saturating_add(expires_in.as_secs());
        self.sign_until(key, expires)
    }

    pub fn sign_until(&self, key: &str, expires: u64) -> SignedQuery {
        let tag = self.mac(key, expires).finalize().into_bytes();
        SignedQuery {
            expires,
            signature: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tag),
        }
    }

    pub fn verify(&self, key: &str, expires: u64, signature: &str) -> Result<(), SignatureError> {
        let tag = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SignatureError::Invalid)?;
        self.mac(key, expires)
            .verify_slice(&tag)
            .map_err(|_| SignatureError::Invalid)?;
        if now_secs() > expires {
            return Err(SignatureError::Expired);
        }
        Ok(())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
