/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for lighter-adapter tests

use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// A well-known test wallet private key (hardhat account #0)
#[allow(dead_code)]
pub const TEST_WALLET_PK: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address derived from [`TEST_WALLET_PK`]
#[allow(dead_code)]
pub const TEST_WALLET_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// JSON body of a successful sub-account lookup
#[allow(dead_code)]
pub fn accounts_body(indices: &[i64]) -> serde_json::Value {
    let sub_accounts: Vec<serde_json::Value> = indices
        .iter()
        .map(|index| serde_json::json!({"index": index}))
        .collect();
    serde_json::json!({"code": 200, "sub_accounts": sub_accounts})
}
