/*
[INPUT]:  Wallet key material and OS entropy
[OUTPUT]: Wallet signers and exchange session key pairs
[POS]:    Auth layer - credential cryptography for the Lighter API
[UPDATE]: When auth flow or signature methods change
*/

pub mod api_key;
pub mod evm_wallet;
pub mod wallet;

pub use api_key::{ApiKeyPair, generate_api_key};
pub use evm_wallet::EvmWalletSigner;
pub use wallet::{MockWalletSigner, WalletSigner};
