/*
[INPUT]:  OS entropy or hex-encoded secret key material
[OUTPUT]: Ed25519 API key pairs, signatures, and auth tokens
[POS]:    Auth layer - exchange session credential cryptography
[UPDATE]: When changing signing algorithm or key format
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _};
use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::http::{LighterError, Result};

/// Generate a fresh API key pair from OS entropy.
///
/// Entropy failure is the only failure mode of local generation and is
/// surfaced rather than panicked on.
pub fn generate_api_key() -> Result<ApiKeyPair> {
    let mut seed = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut seed)
        .map_err(|e| LighterError::KeyGen(format!("OS entropy unavailable: {e}")))?;
    Ok(ApiKeyPair {
        signing_key: SigningKey::from_bytes(&seed),
    })
}

/// Ed25519 key pair used as the exchange session credential.
///
/// Both halves are secrets until the public key is registered on the
/// exchange; `Debug` deliberately shows only the public half.
pub struct ApiKeyPair {
    signing_key: SigningKey,
}

impl ApiKeyPair {
    /// Rebuild a key pair from a 0x-prefixed (or bare) hex private key
    pub fn from_private_hex(private_key_hex: &str) -> Result<Self> {
        let stripped = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);
        let bytes = hex::decode(stripped)
            .map_err(|e| LighterError::Config(format!("Invalid API private key hex: {e}")))?;

        let key_bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            LighterError::Config(format!(
                "Invalid API private key length: {} bytes, expected 32",
                bytes.len()
            ))
        })?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&key_bytes),
        })
    }

    /// Private key as 0x-prefixed hex (the form persisted to the settings document)
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.to_bytes()))
    }

    /// Public key as 0x-prefixed hex (the form registered on the exchange)
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign a message with the API key
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Verify a signature against a message
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.signing_key
            .verifying_key()
            .verify(message, signature)
            .is_ok()
    }

    /// Build an auth token for authenticated REST calls.
    ///
    /// Token format: `base64(timestamp,request_id,account_index,api_key_index)`
    /// followed by `.` and the base64 Ed25519 signature over the same bytes.
    pub fn auth_token(&self, account_index: i64, api_key_index: u8) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        let request_id = Uuid::new_v4();
        let message = format!("{timestamp},{request_id},{account_index},{api_key_index}");
        let signature = self.sign(message.as_bytes());
        format!(
            "{}.{}",
            BASE64.encode(message.as_bytes()),
            BASE64.encode(signature.to_bytes())
        )
    }
}

impl std::fmt::Debug for ApiKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
