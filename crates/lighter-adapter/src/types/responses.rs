/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// A sub-account registered under an L1 wallet address.
///
/// The exchange returns these in its own order; callers that auto-select
/// rely on that order being preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAccount {
    pub index: i64,
}

/// Response of GET /api/v1/accountsByL1Address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountsResponse {
    pub code: i32,
    #[serde(rename = "sub_accounts", default)]
    pub sub_accounts: Vec<SubAccount>,
}

/// Response of GET /api/v1/nextNonce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextNonceResponse {
    pub code: i32,
    pub nonce: i64,
}

/// Response of POST /api/v1/changePubKey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxResponse {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "tx_hash", default)]
    pub tx_hash: Option<String>,
}

/// One registered API key slot, as reported by GET /api/v1/apikeys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    #[serde(rename = "api_key_index")]
    pub api_key_index: u8,
    #[serde(rename = "public_key")]
    pub public_key: String,
}

/// Response of GET /api/v1/apikeys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeysResponse {
    pub code: i32,
    #[serde(rename = "api_keys", default)]
    pub api_keys: Vec<ApiKeyEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounts_response_ignores_unknown_fields() {
        let body = r#"{
            "code": 200,
            "sub_accounts": [
                {"index": 5, "collateral": "103.2", "status": 1},
                {"index": 9}
            ],
            "total": 2
        }"#;
        let parsed: AccountsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, 200);
        assert_eq!(parsed.sub_accounts.len(), 2);
        assert_eq!(parsed.sub_accounts[0].index, 5);
        assert_eq!(parsed.sub_accounts[1].index, 9);
    }

    #[test]
    fn test_tx_response_optional_fields() {
        let ok: TxResponse = serde_json::from_str(r#"{"code":200,"tx_hash":"0xabc"}"#).unwrap();
        assert_eq!(ok.tx_hash.as_deref(), Some("0xabc"));
        assert!(ok.message.is_none());

        let fault: TxResponse =
            serde_json::from_str(r#"{"code":21505,"message":"invalid signature"}"#).unwrap();
        assert_eq!(fault.message.as_deref(), Some("invalid signature"));
        assert!(fault.tx_hash.is_none());
    }
}
