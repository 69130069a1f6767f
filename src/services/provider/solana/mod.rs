//! Solana Provider Module
//!
//! This module provides an abstraction layer over the Solana RPC client, offering the
//! operations the transaction engine needs: account reads, program account scans,
//! blockhash retrieval, rent queries, submission and confirmation.
//!
//! The provider uses the non-blocking `RpcClient`. Retries and backoff are left to the
//! RPC endpoint; every error is classified once into a `SolanaProviderError` so callers
//! can tell transient failures from permanent ones.
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Url;
use serde::Serialize;
use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;

use crate::{
    config::RpcConfig,
    models::{AccountFilter, DataSlice},
};

/// Utility function to match error patterns by normalizing both strings.
/// Removes spaces and converts to lowercase for flexible matching.
fn matches_error_pattern(error_msg: &str, pattern: &str) -> bool {
    let normalized_msg = error_msg.to_lowercase().replace(' ', "");
    let normalized_pattern = pattern.to_lowercase().replace(' ', "");
    normalized_msg.contains(&normalized_pattern)
}

/// Errors that can occur when interacting with the Solana provider.
///
/// Use `is_transient()` to determine if an error could succeed on a later attempt.
#[derive(Error, Debug, Serialize)]
pub enum SolanaProviderError {
    /// Network/IO error (transient - connection issues, timeouts)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// RPC protocol error (transient - node lag, sync pending)
    #[error("RPC error: {0}")]
    RpcError(String),

    /// HTTP request error with status code (transient/permanent based on status code)
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },

    /// Network configuration error (permanent - bad URL, unsupported method)
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),

    /// Insufficient funds for transaction (permanent)
    #[error("Insufficient funds for transaction: {0}")]
    InsufficientFunds(String),

    /// Blockhash not found or expired (transient - can rebuild with fresh blockhash)
    #[error("Blockhash not found or expired: {0}")]
    BlockhashNotFound(String),

    /// Invalid transaction structure or execution, including program errors (permanent)
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Transaction already processed (permanent - duplicate)
    #[error("Transaction already processed: {0}")]
    AlreadyProcessed(String),

    /// Transaction landed but its execution failed (permanent)
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl SolanaProviderError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    ///
    /// **Transient:** `NetworkError`, `RpcError`, `BlockhashNotFound`, and `RequestError`
    /// with a retriable status code (5xx except 501/505, 408, 425, 429).
    ///
    /// **Permanent:** everything else.
    pub fn is_transient(&self) -> bool {
        match self {
            SolanaProviderError::NetworkError(_) => true,
            SolanaProviderError::RpcError(_) => true,
            SolanaProviderError::BlockhashNotFound(_) => true,

            SolanaProviderError::RequestError { status_code, .. } => match *status_code {
                501 | 505 => false,
                500 | 502..=504 | 506..=599 => true,
                408 | 425 | 429 => true,
                _ => false,
            },

            SolanaProviderError::NetworkConfiguration(_) => false,
            SolanaProviderError::InsufficientFunds(_) => false,
            SolanaProviderError::InvalidTransaction(_) => false,
            SolanaProviderError::AlreadyProcessed(_) => false,
            SolanaProviderError::TransactionFailed(_) => false,
        }
    }

    /// Classifies a Solana RPC client error into the appropriate error variant.
    pub fn from_rpc_error(error: ClientError) -> Self {
        match error.kind() {
            ClientErrorKind::Io(_) => SolanaProviderError::NetworkError(error.to_string()),

            ClientErrorKind::Reqwest(reqwest_err) => match reqwest_err.status() {
                Some(status) => SolanaProviderError::RequestError {
                    error: error.to_string(),
                    status_code: status.as_u16(),
                },
                None => SolanaProviderError::NetworkError(error.to_string()),
            },

            ClientErrorKind::RpcError(rpc_err) => {
                let rpc_err_str = format!("{rpc_err}");
                Self::from_rpc_response_error(&rpc_err_str, &error.to_string())
            }

            ClientErrorKind::TransactionError(tx_error) => {
                Self::from_transaction_error(tx_error, &error.to_string())
            }

            ClientErrorKind::Custom(msg) => Self::from_rpc_response_error(msg, &error.to_string()),

            _ => SolanaProviderError::RpcError(error.to_string()),
        }
    }

    /// Classifies RPC response errors using JSON-RPC error codes and messages.
    ///
    /// Simulation failures (`-32002`) carry the program-decoded message and are kept
    /// verbatim in `InvalidTransaction` unless they name a funding or blockhash problem.
    fn from_rpc_response_error(rpc_err: &str, full_error: &str) -> Self {
        let message = full_error.to_string();

        if rpc_err.contains("-32002") {
            if matches_error_pattern(rpc_err, "blockhash not found") {
                SolanaProviderError::BlockhashNotFound(message)
            } else if matches_error_pattern(rpc_err, "insufficient funds") {
                SolanaProviderError::InsufficientFunds(message)
            } else {
                SolanaProviderError::InvalidTransaction(message)
            }
        } else if rpc_err.contains("-32003")
            || rpc_err.contains("-32013")
            || rpc_err.contains("-32015")
            || rpc_err.contains("-32602")
        {
            SolanaProviderError::InvalidTransaction(message)
        } else if rpc_err.contains("-32004")
            || rpc_err.contains("-32005")
            || rpc_err.contains("-32014")
            || rpc_err.contains("-32016")
        {
            SolanaProviderError::RpcError(message)
        } else if rpc_err.contains("-32007") || rpc_err.contains("-32010") {
            SolanaProviderError::NetworkConfiguration(message)
        } else if rpc_err.contains("-32008") {
            SolanaProviderError::BlockhashNotFound(message)
        } else if rpc_err.contains("-32009") {
            SolanaProviderError::AlreadyProcessed(message)
        } else if matches_error_pattern(rpc_err, "insufficient funds") {
            SolanaProviderError::InsufficientFunds(message)
        } else if matches_error_pattern(rpc_err, "blockhash not found") {
            SolanaProviderError::BlockhashNotFound(message)
        } else if matches_error_pattern(rpc_err, "already processed") {
            SolanaProviderError::AlreadyProcessed(message)
        } else {
            SolanaProviderError::RpcError(message)
        }
    }

    fn from_transaction_error(
        tx_error: &solana_sdk::transaction::TransactionError,
        full_error: &str,
    ) -> Self {
        use solana_sdk::transaction::TransactionError as TxErr;

        let message = full_error.to_string();
        match tx_error {
            TxErr::InsufficientFundsForFee | TxErr::InsufficientFundsForRent { .. } => {
                SolanaProviderError::InsufficientFunds(message)
            }
            TxErr::BlockhashNotFound => SolanaProviderError::BlockhashNotFound(message),
            TxErr::AlreadyProcessed => SolanaProviderError::AlreadyProcessed(message),
            TxErr::AccountInUse | TxErr::AccountLoadedTwice | TxErr::ClusterMaintenance => {
                SolanaProviderError::RpcError(message)
            }
            _ => SolanaProviderError::InvalidTransaction(message),
        }
    }
}

impl From<String> for SolanaProviderError {
    fn from(s: String) -> Self {
        SolanaProviderError::RpcError(s)
    }
}

/// The RPC operations the transaction engine consumes.
///
/// Implementations must tolerate concurrent in-flight requests; nothing else is shared
/// between operations.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SolanaProviderTrait: Send + Sync {
    /// Fetches an account, `None` when it does not exist.
    async fn get_account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> Result<Option<Account>, SolanaProviderError>;

    /// Fetches several accounts in one request, preserving the order of `addresses`.
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        commitment: CommitmentConfig,
    ) -> Result<Vec<Option<Account>>, SolanaProviderError>;

    /// Scans the accounts owned by `program_id` with all `filters` combined by AND.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
        data_slice: Option<DataSlice>,
    ) -> Result<Vec<(Pubkey, Account)>, SolanaProviderError>;

    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<Hash, SolanaProviderError>;

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, SolanaProviderError>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError>;

    /// Returns `true` once the transaction reached `commitment`, `false` while pending,
    /// and `TransactionFailed` if it landed with an error.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<bool, SolanaProviderError>;
}

#[derive(Clone)]
pub struct SolanaProvider {
    client: Arc<RpcClient>,
    // Default commitment level
    commitment: CommitmentConfig,
    // Default timeout in seconds
    timeout_seconds: Duration,
}

impl std::fmt::Debug for SolanaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaProvider")
            .field("url", &self.client.url())
            .field("commitment", &self.commitment)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl SolanaProvider {
    pub fn new(configs: Vec<RpcConfig>, timeout_seconds: u64) -> Result<Self, SolanaProviderError> {
        Self::new_with_commitment(configs, timeout_seconds, CommitmentConfig::confirmed())
    }

    /// Creates a new SolanaProvider against the highest-weighted RPC configuration.
    ///
    /// Ties go to the earliest entry, so with default weights the first one is used.
    ///
    /// # Arguments
    ///
    /// * `configs` - RPC configurations, at least one
    /// * `timeout_seconds` - Request timeout
    /// * `commitment` - Commitment used for preflight checks
    pub fn new_with_commitment(
        configs: Vec<RpcConfig>,
        timeout_seconds: u64,
        commitment: CommitmentConfig,
    ) -> Result<Self, SolanaProviderError> {
        // max_by_key keeps the last of equal maxima
        let config = configs
            .iter()
            .rev()
            .max_by_key(|config| config.get_weight())
            .ok_or_else(|| {
                SolanaProviderError::NetworkConfiguration(
                    "At least one RPC configuration must be provided".to_string(),
                )
            })?;

        let rpc_url: Url = config.url.parse().map_err(|e| {
            SolanaProviderError::NetworkConfiguration(format!("Invalid URL format: {e}"))
        })?;

        let timeout = Duration::from_secs(timeout_seconds);
        let client =
            RpcClient::new_with_timeout_and_commitment(rpc_url.to_string(), timeout, commitment);

        Ok(Self {
            client: Arc::new(client),
            commitment,
            timeout_seconds: timeout,
        })
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

fn to_rpc_filter(filter: &AccountFilter) -> RpcFilterType {
    match filter {
        AccountFilter::Memcmp { offset, bytes } => {
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(*offset, bytes.clone()))
        }
        AccountFilter::DataSize(size) => RpcFilterType::DataSize(*size),
    }
}

#[async_trait]
impl SolanaProviderTrait for SolanaProvider {
    async fn get_account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> Result<Option<Account>, SolanaProviderError> {
        self.client
            .get_account_with_commitment(address, commitment)
            .await
            .map(|response| response.value)
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        commitment: CommitmentConfig,
    ) -> Result<Vec<Option<Account>>, SolanaProviderError> {
        self.client
            .get_multiple_accounts_with_commitment(addresses, commitment)
            .await
            .map(|response| response.value)
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
        data_slice: Option<DataSlice>,
    ) -> Result<Vec<(Pubkey, Account)>, SolanaProviderError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(filters.iter().map(to_rpc_filter).collect()),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: data_slice.map(|slice| UiDataSliceConfig {
                    offset: slice.offset,
                    length: slice.length,
                }),
                commitment: Some(self.commitment),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        self.client
            .get_program_accounts_with_config(program_id, config)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<Hash, SolanaProviderError> {
        self.client
            .get_latest_blockhash_with_commitment(commitment)
            .await
            .map(|(hash, _last_valid_block_height)| hash)
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, SolanaProviderError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_size)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<bool, SolanaProviderError> {
        let status = self
            .client
            .get_signature_status_with_commitment(signature, commitment)
            .await
            .map_err(SolanaProviderError::from_rpc_error)?;

        match status {
            Some(Ok(())) => Ok(true),
            Some(Err(err)) => Err(SolanaProviderError::TransactionFailed(format!(
                "{signature}: {err}"
            ))),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_rpc_config() -> RpcConfig {
        RpcConfig::new("https://api.devnet.solana.com".to_string())
    }

    #[test]
    fn test_new_with_valid_config() {
        let provider = SolanaProvider::new(vec![create_test_rpc_config()], 30).unwrap();

        assert_eq!(provider.timeout_seconds, Duration::from_secs(30));
        assert_eq!(provider.commitment, CommitmentConfig::confirmed());
    }

    #[test]
    fn test_new_with_commitment() {
        let provider = SolanaProvider::new_with_commitment(
            vec![create_test_rpc_config()],
            30,
            CommitmentConfig::finalized(),
        )
        .unwrap();

        assert_eq!(provider.commitment, CommitmentConfig::finalized());
    }

    #[test]
    fn test_new_with_empty_configs() {
        let result = SolanaProvider::new(vec![], 30);

        assert!(matches!(
            result,
            Err(SolanaProviderError::NetworkConfiguration(_))
        ));
    }

    #[test]
    fn test_new_with_invalid_url() {
        let result = SolanaProvider::new(vec![RpcConfig::new("invalid-url".to_string())], 30);

        assert!(matches!(
            result,
            Err(SolanaProviderError::NetworkConfiguration(_))
        ));
    }

    #[test]
    fn test_new_picks_highest_weight() {
        let provider = SolanaProvider::new(
            vec![
                RpcConfig::with_weight("https://api.devnet.solana.com".to_string(), 1),
                RpcConfig::with_weight("https://api.mainnet-beta.solana.com".to_string(), 5),
            ],
            30,
        )
        .unwrap();

        assert!(provider.url().contains("mainnet-beta"));
    }

    #[test]
    fn test_new_with_equal_weights_uses_first_entry() {
        let provider = SolanaProvider::new(
            vec![
                RpcConfig::new("https://first.example.com".to_string()),
                RpcConfig::new("https://second.example.com".to_string()),
            ],
            5,
        )
        .unwrap();

        assert!(provider.url().contains("first.example.com"));
    }

    #[test]
    fn test_to_rpc_filter() {
        let filter = to_rpc_filter(&AccountFilter::memcmp(33, vec![1, 2, 3]));
        assert!(matches!(filter, RpcFilterType::Memcmp(_)));

        let filter = to_rpc_filter(&AccountFilter::DataSize(679));
        assert!(matches!(filter, RpcFilterType::DataSize(679)));
    }

    #[test]
    fn test_from_string_for_solana_provider_error() {
        let err: SolanaProviderError = "some rpc error".to_string().into();
        assert!(matches!(err, SolanaProviderError::RpcError(inner) if inner == "some rpc error"));
    }

    #[test]
    fn test_matches_error_pattern() {
        assert!(matches_error_pattern(
            "BLOCKHASH NOT FOUND",
            "blockhash not found"
        ));
        assert!(matches_error_pattern(
            "blockhashnotfound",
            "blockhash not found"
        ));
        assert!(matches_error_pattern(
            "error: insufficient funds for transaction",
            "insufficient funds"
        ));
        assert!(!matches_error_pattern(
            "account not found",
            "blockhash not found"
        ));
        assert!(!matches_error_pattern("", "blockhash not found"));
    }

    #[test]
    fn test_solana_provider_error_is_transient() {
        assert!(SolanaProviderError::NetworkError("connection timeout".to_string()).is_transient());
        assert!(SolanaProviderError::RpcError("node is behind".to_string()).is_transient());
        assert!(
            SolanaProviderError::BlockhashNotFound("blockhash expired".to_string()).is_transient()
        );

        assert!(
            !SolanaProviderError::InsufficientFunds("not enough balance".to_string())
                .is_transient()
        );
        assert!(
            !SolanaProviderError::InvalidTransaction("custom program error".to_string())
                .is_transient()
        );
        assert!(
            !SolanaProviderError::TransactionFailed("instruction 2 failed".to_string())
                .is_transient()
        );
    }

    #[test]
    fn test_request_error_is_transient() {
        let transient = [500u16, 502, 503, 408, 425, 429];
        let permanent = [400u16, 401, 404, 501, 505];

        for status_code in transient {
            let error = SolanaProviderError::RequestError {
                error: "request failed".to_string(),
                status_code,
            };
            assert!(error.is_transient(), "{status_code} should be transient");
        }

        for status_code in permanent {
            let error = SolanaProviderError::RequestError {
                error: "request failed".to_string(),
                status_code,
            };
            assert!(!error.is_transient(), "{status_code} should be permanent");
        }
    }

    #[test]
    fn test_from_rpc_response_error_simulation_failed() {
        let result = SolanaProviderError::from_rpc_response_error(
            r#"{"code": -32002, "message": "Transaction simulation failed: Blockhash not found"}"#,
            "full",
        );
        assert!(matches!(result, SolanaProviderError::BlockhashNotFound(_)));

        let result = SolanaProviderError::from_rpc_response_error(
            r#"{"code": -32002, "message": "Transaction simulation failed: Insufficient funds"}"#,
            "full",
        );
        assert!(matches!(result, SolanaProviderError::InsufficientFunds(_)));

        let result = SolanaProviderError::from_rpc_response_error(
            r#"{"code": -32002, "message": "Error processing Instruction 3: custom program error: 0x65"}"#,
            "custom program error: 0x65",
        );
        assert!(
            matches!(result, SolanaProviderError::InvalidTransaction(msg) if msg == "custom program error: 0x65")
        );
    }

    #[test]
    fn test_from_rpc_response_error_codes() {
        let cases: Vec<(&str, fn(&SolanaProviderError) -> bool)> = vec![
            (r#"{"code": -32003}"#, |e| {
                matches!(e, SolanaProviderError::InvalidTransaction(_))
            }),
            (r#"{"code": -32005}"#, |e| {
                matches!(e, SolanaProviderError::RpcError(_))
            }),
            (r#"{"code": -32007}"#, |e| {
                matches!(e, SolanaProviderError::NetworkConfiguration(_))
            }),
            (r#"{"code": -32008}"#, |e| {
                matches!(e, SolanaProviderError::BlockhashNotFound(_))
            }),
            (r#"{"code": -32009}"#, |e| {
                matches!(e, SolanaProviderError::AlreadyProcessed(_))
            }),
            (r#"{"code": -99999, "message": "Unknown error"}"#, |e| {
                matches!(e, SolanaProviderError::RpcError(_))
            }),
        ];

        for (input, check) in cases {
            let result = SolanaProviderError::from_rpc_response_error(input, "full");
            assert!(check(&result), "unexpected classification for {input}: {result:?}");
        }
    }

    #[test]
    fn test_from_rpc_error_custom_kind() {
        let error = ClientError::from(ClientErrorKind::Custom(
            "Transaction was already processed".to_string(),
        ));

        let result = SolanaProviderError::from_rpc_error(error);
        assert!(matches!(result, SolanaProviderError::AlreadyProcessed(_)));
    }
}
