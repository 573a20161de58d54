/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Lighter adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod signer;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    ApiKeyPair,
    EvmWalletSigner,
    MockWalletSigner,
    WalletSigner,
    generate_api_key,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    LighterClient,
    LighterError,
    Result,
};

// Re-export the signer client
pub use signer::SignerClient;

// Re-export all types
pub use types::*;
