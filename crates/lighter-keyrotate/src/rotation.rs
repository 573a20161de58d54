/*
[INPUT]:  Settings document, exchange REST API, operator wallet key
[OUTPUT]: A verified, persisted API credential or a staged failure
[POS]:    Core workflow - credential rotation state machine
[UPDATE]: When rotation stages or failure classification change
*/

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use lighter_adapter::{
    EvmWalletSigner, LighterClient, LighterError, SignerClient, WalletSigner, generate_api_key,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{ConfigError, Settings};

/// Settling time the exchange needs before a submitted key-change is trusted
pub const DEFAULT_PROPAGATION_DELAY: Duration = Duration::from_secs(10);

/// Stages of the rotation state machine, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStage {
    LoadConfig,
    ResolveAccount,
    GenerateKey,
    SubmitKeyChange,
    AwaitPropagation,
    VerifyClient,
    PersistConfig,
}

impl fmt::Display for RotationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationStage::LoadConfig => "load-config",
            RotationStage::ResolveAccount => "resolve-account",
            RotationStage::GenerateKey => "generate-key",
            RotationStage::SubmitKeyChange => "submit-key-change",
            RotationStage::AwaitPropagation => "await-propagation",
            RotationStage::VerifyClient => "verify-client",
            RotationStage::PersistConfig => "persist-config",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a rotation run.
///
/// Every variant is final: the run never retries a stage, and a submitted
/// key-change is never rolled back by a later failure.
#[derive(Error, Debug)]
pub enum RotationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("account not found for wallet {address}")]
    AccountNotFound { address: String },

    #[error("account resolution failed: {0}")]
    Resolution(#[source] LighterError),

    #[error("API key generation failed: {0}")]
    KeyGen(#[source] LighterError),

    #[error("signer client init failed: {0}")]
    ClientInit(#[source] LighterError),

    #[error("key change submission failed: {0}")]
    Submission(#[source] LighterError),

    #[error("client verification failed: {0}")]
    Verification(#[source] LighterError),

    #[error("cannot persist rotated key: {0}")]
    Persist(#[source] ConfigError),

    #[error("rotation aborted by operator")]
    Aborted,
}

impl RotationError {
    /// The stage at which the run stopped
    pub fn stage(&self) -> RotationStage {
        match self {
            RotationError::Config(_) => RotationStage::LoadConfig,
            RotationError::AccountNotFound { .. } | RotationError::Resolution(_) => {
                RotationStage::ResolveAccount
            }
            RotationError::KeyGen(_) => RotationStage::GenerateKey,
            RotationError::ClientInit(_) | RotationError::Submission(_) => {
                RotationStage::SubmitKeyChange
            }
            RotationError::Aborted => RotationStage::AwaitPropagation,
            RotationError::Verification(_) => RotationStage::VerifyClient,
            RotationError::Persist(_) => RotationStage::PersistConfig,
        }
    }
}

/// Successful terminal state of a rotation run
#[derive(Debug, Clone)]
pub struct RotationOutcome {
    pub account_index: i64,
    pub api_key_private_key: String,
}

impl RotationOutcome {
    /// Leading characters of the new key, for operator confirmation output.
    /// The full secret is never echoed.
    pub fn key_preview(&self) -> String {
        let head: String = self.api_key_private_key.chars().take(10).collect();
        format!("{head}...")
    }
}

/// Drives one credential rotation: load settings, resolve the sub-account,
/// generate a key pair, submit the key-change, wait out propagation, verify
/// the new key, persist.
///
/// Strictly linear; the first failing stage terminates the run. Persistence
/// happens only after verification, so the settings document is never
/// partially updated. One rotation per invocation; concurrent runs against
/// the same account/key slot must be serialized by the caller.
#[derive(Debug)]
pub struct RotationRunner {
    config_path: PathBuf,
    propagation_delay: Duration,
    cancel: CancellationToken,
}

impl RotationRunner {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            propagation_delay: DEFAULT_PROPAGATION_DELAY,
            cancel: CancellationToken::new(),
        }
    }

    /// Override the propagation delay (tests run with `Duration::ZERO`)
    pub fn with_propagation_delay(mut self, delay: Duration) -> Self {
        self.propagation_delay = delay;
        self
    }

    /// Token observed during the propagation wait; cancelling it aborts the
    /// run before the new key is trusted or persisted.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(&self) -> Result<RotationOutcome, RotationError> {
        let settings = Settings::load(&self.config_path)?;
        let lighter = settings.exchanges.lighter.clone();
        let wallet_key = lighter.require_wallet_key()?;

        // Address derivation is local; a bad wallet key surfaces here, inside
        // the resolution stage, like any other account-verification failure.
        let wallet = EvmWalletSigner::new(wallet_key).map_err(RotationError::Resolution)?;
        info!(address = wallet.address(), "verifying account");
        let lookup =
            LighterClient::new(&lighter.base_url).map_err(RotationError::Resolution)?;
        let account_index =
            resolve_account_index(&lookup, wallet.address(), lighter.account_index).await?;
        info!(account_index, "using account index");

        info!("generating new API key");
        let pair = generate_api_key().map_err(RotationError::KeyGen)?;

        let signer = SignerClient::new(
            &lighter.base_url,
            &pair.private_key_hex(),
            account_index,
            lighter.api_key_index,
        )
        .map_err(RotationError::ClientInit)?;

        info!(api_key_index = lighter.api_key_index, "submitting key change");
        signer
            .change_api_key(&wallet, &pair.public_key_hex())
            .await
            .map_err(RotationError::Submission)?;

        info!(
            delay_secs = self.propagation_delay.as_secs(),
            "waiting for the exchange to apply the key change"
        );
        tokio::select! {
            _ = tokio::time::sleep(self.propagation_delay) => {}
            _ = self.cancel.cancelled() => return Err(RotationError::Aborted),
        }

        info!("verifying new API key");
        signer
            .check_client()
            .await
            .map_err(RotationError::Verification)?;

        let updated = settings.with_rotated_key(account_index, pair.private_key_hex());
        updated
            .save(&self.config_path)
            .map_err(RotationError::Persist)?;

        Ok(RotationOutcome {
            account_index,
            api_key_private_key: pair.private_key_hex(),
        })
    }
}

/// Map the wallet address to its sub-account index.
///
/// A configured index is authoritative; otherwise the first sub-account in
/// exchange order is selected. The selection is persisted by the caller only
/// on overall success.
async fn resolve_account_index(
    client: &LighterClient,
    address: &str,
    configured: Option<i64>,
) -> Result<i64, RotationError> {
    let response = client.accounts_by_l1_address(address).await.map_err(|e| {
        if e.is_account_not_found() {
            RotationError::AccountNotFound {
                address: address.to_string(),
            }
        } else {
            RotationError::Resolution(e)
        }
    })?;

    let sub_accounts = response.sub_accounts;
    if sub_accounts.len() > 1 {
        warn!(count = sub_accounts.len(), "multiple sub-accounts found");
        for sub_account in &sub_accounts {
            info!(index = sub_account.index, "sub-account");
        }
    }

    match configured {
        Some(index) => {
            if !sub_accounts.iter().any(|s| s.index == index) {
                warn!(index, "configured account index not in lookup result, using it as configured");
            }
            Ok(index)
        }
        None => sub_accounts
            .first()
            .map(|s| s.index)
            .ok_or_else(|| RotationError::AccountNotFound {
                address: address.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stage_mapping() {
        let err = RotationError::AccountNotFound {
            address: "0xabc".to_string(),
        };
        assert_eq!(err.stage(), RotationStage::ResolveAccount);

        let err = RotationError::Submission(LighterError::InvalidResponse("bad".into()));
        assert_eq!(err.stage(), RotationStage::SubmitKeyChange);

        let err = RotationError::Verification(LighterError::KeyMismatch {
            expected: "0xa".into(),
            actual: "0xb".into(),
        });
        assert_eq!(err.stage(), RotationStage::VerifyClient);

        assert_eq!(RotationError::Aborted.stage(), RotationStage::AwaitPropagation);
    }

    #[test]
    fn test_stage_display_names() {
        assert_eq!(RotationStage::ResolveAccount.to_string(), "resolve-account");
        assert_eq!(RotationStage::PersistConfig.to_string(), "persist-config");
    }

    #[test]
    fn test_key_preview_truncates_secret() {
        let outcome = RotationOutcome {
            account_index: 5,
            api_key_private_key: "0x0123456789abcdef0123456789abcdef".to_string(),
        };
        let preview = outcome.key_preview();
        assert_eq!(preview, "0x01234567...");
        assert!(!preview.contains("abcdef0123456789abcdef"));
    }

    #[test]
    fn test_runner_defaults() {
        let runner = RotationRunner::new("config.yaml");
        assert_eq!(runner.propagation_delay, DEFAULT_PROPAGATION_DELAY);

        let runner = runner.with_propagation_delay(Duration::ZERO);
        assert_eq!(runner.propagation_delay, Duration::ZERO);
    }
}
