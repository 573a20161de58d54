/*
[INPUT]:  Account/key-index binding, API key material, wallet signer
[OUTPUT]: Key-change transactions and authenticated key verification
[POS]:    Signer layer - account-scoped transaction client
[UPDATE]: When the key-change flow or auth-token format changes
*/

use reqwest::Method;
use tracing::debug;

use crate::auth::{ApiKeyPair, WalletSigner};
use crate::http::{LighterClient, LighterError, Result};
use crate::types::{ApiKeysResponse, NextNonceResponse, TxResponse};

/// Client bound to one account/key-index pair, holding the API key that
/// authenticates its requests.
///
/// For a key rotation the client is constructed with the freshly generated
/// key: the change-pubkey transaction itself is authorized by the wallet
/// signature, and every call after it is authenticated by the new key.
#[derive(Debug)]
pub struct SignerClient {
    client: LighterClient,
    api_key: ApiKeyPair,
    account_index: i64,
    api_key_index: u8,
}

impl SignerClient {
    /// Create a signer client for the given endpoint and key slot
    pub fn new(
        base_url: &str,
        api_private_key_hex: &str,
        account_index: i64,
        api_key_index: u8,
    ) -> Result<Self> {
        if account_index < 0 {
            return Err(LighterError::Config(format!(
                "Invalid account index: {account_index}"
            )));
        }

        let api_key = ApiKeyPair::from_private_hex(api_private_key_hex)?;
        let client = LighterClient::new(base_url)?;

        Ok(Self {
            client,
            api_key,
            account_index,
            api_key_index,
        })
    }

    /// The account index this client is bound to
    pub fn account_index(&self) -> i64 {
        self.account_index
    }

    /// The API key slot this client is bound to
    pub fn api_key_index(&self) -> u8 {
        self.api_key_index
    }

    /// Public half of the key this client authenticates with
    pub fn public_key_hex(&self) -> String {
        self.api_key.public_key_hex()
    }

    /// Fetch the next transaction nonce for this account/key slot
    ///
    /// GET /api/v1/nextNonce?account_index={i}&api_key_index={k}
    pub async fn next_nonce(&self) -> Result<i64> {
        let endpoint = format!(
            "/api/v1/nextNonce?account_index={}&api_key_index={}",
            self.account_index, self.api_key_index
        );
        let builder = self.client.request(Method::GET, &endpoint)?;
        let response: NextNonceResponse = self.client.send_json(builder).await?;
        Ok(response.nonce)
    }

    /// Submit the key-change transaction rebinding this slot to `new_pubkey_hex`.
    ///
    /// POST /api/v1/changePubKey
    ///
    /// The authorization message is signed by the wallet key (proof of L1
    /// ownership). Issuing this twice invalidates the first key; callers run
    /// it at most once per rotation.
    pub async fn change_api_key(
        &self,
        wallet: &dyn WalletSigner,
        new_pubkey_hex: &str,
    ) -> Result<TxResponse> {
        let nonce = self.next_nonce().await?;
        let message =
            change_pubkey_message(new_pubkey_hex, self.account_index, self.api_key_index, nonce);
        let eth_signature = wallet.sign_message(&message).await?;

        let body = serde_json::json!({
            "account_index": self.account_index,
            "api_key_index": self.api_key_index,
            "new_pubkey": new_pubkey_hex,
            "nonce": nonce,
            "eth_signature": eth_signature,
        });

        let builder = self.client.request(Method::POST, "/api/v1/changePubKey")?.json(&body);
        let response: TxResponse = self.client.send_json(builder).await?;

        debug!(
            account_index = self.account_index,
            api_key_index = self.api_key_index,
            tx_hash = response.tx_hash.as_deref().unwrap_or(""),
            "change pubkey accepted"
        );
        Ok(response)
    }

    /// Verify that the exchange serves this client's key for its slot.
    ///
    /// GET /api/v1/apikeys?account_index={i}&api_key_index={k} (authenticated)
    ///
    /// The call is signed with the client's own API key, so success proves
    /// both that the key is registered and that it is accepted for auth.
    pub async fn check_client(&self) -> Result<()> {
        let endpoint = format!(
            "/api/v1/apikeys?account_index={}&api_key_index={}",
            self.account_index, self.api_key_index
        );
        let token = self.api_key.auth_token(self.account_index, self.api_key_index);
        let builder = self
            .client
            .request(Method::GET, &endpoint)?
            .header("Authorization", token);
        let response: ApiKeysResponse = self.client.send_json(builder).await?;

        let entry = response
            .api_keys
            .iter()
            .find(|key| key.api_key_index == self.api_key_index)
            .ok_or_else(|| {
                LighterError::InvalidResponse(format!(
                    "api key slot {} missing from apikeys response",
                    self.api_key_index
                ))
            })?;

        let expected = self.api_key.public_key_hex();
        if !entry.public_key.eq_ignore_ascii_case(&expected) {
            return Err(LighterError::KeyMismatch {
                expected,
                actual: entry.public_key.clone(),
            });
        }

        debug!(
            account_index = self.account_index,
            api_key_index = self.api_key_index,
            "api key verified"
        );
        Ok(())
    }
}

/// Canonical authorization message the wallet signs for a key change
fn change_pubkey_message(
    new_pubkey_hex: &str,
    account_index: i64,
    api_key_index: u8,
    nonce: i64,
) -> String {
    format!(
        "lighter-change-pubkey: {new_pubkey_hex} account: {account_index} key: {api_key_index} nonce: {nonce}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_api_key;

    #[test]
    fn test_change_pubkey_message_is_canonical() {
        let message = change_pubkey_message("0xabc", 5, 2, 7);
        assert_eq!(
            message,
            "lighter-change-pubkey: 0xabc account: 5 key: 2 nonce: 7"
        );
    }

    #[test]
    fn test_new_rejects_negative_account_index() {
        let pair = generate_api_key().unwrap();
        let err = SignerClient::new(
            "https://mainnet.zklighter.elliot.ai",
            &pair.private_key_hex(),
            -1,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, LighterError::Config(_)));
    }

    #[test]
    fn test_new_rejects_malformed_key() {
        let err =
            SignerClient::new("https://mainnet.zklighter.elliot.ai", "0x1234", 5, 0).unwrap_err();
        assert!(matches!(err, LighterError::Config(_)));
    }

    #[test]
    fn test_new_rejects_malformed_endpoint() {
        let pair = generate_api_key().unwrap();
        let err = SignerClient::new("::::", &pair.private_key_hex(), 5, 0).unwrap_err();
        assert!(matches!(err, LighterError::UrlParse(_)));
    }

    #[test]
    fn test_client_binds_slot() {
        let pair = generate_api_key().unwrap();
        let client = SignerClient::new(
            "https://mainnet.zklighter.elliot.ai",
            &pair.private_key_hex(),
            5,
            2,
        )
        .unwrap();
        assert_eq!(client.account_index(), 5);
        assert_eq!(client.api_key_index(), 2);
        assert_eq!(client.public_key_hex(), pair.public_key_hex());
    }
}
