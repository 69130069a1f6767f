use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

use crate::services::SolanaProviderError;

/// Broad classification of a [`ClientError`].
///
/// Callers use it to tell "the request was wrong", "the ledger or transport refused it"
/// and "the caller cancelled it" apart without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    /// Raised synchronously before any network call and never worth retrying.
    CallerInput,
    /// Raised by the RPC provider or the ledger program, surfaced verbatim.
    Provider,
    /// Raised only by `Scope::throw_if_canceled`.
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Unreachable authority variant: {0}")]
    UnreachableVariant(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Layout violation for field '{field}': {reason}")]
    LayoutViolation { field: String, reason: String },

    #[error("Invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("No instructions to send")]
    NoInstructionsToSend,

    #[error("Transaction has no fee payer")]
    MissingFeePayer,

    #[error("Operation not registered: {0}")]
    UnregisteredOperation(String),

    #[error("Operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("Operation '{0}' returned an unexpected output type")]
    OperationTypeMismatch(String),

    #[error("Program not found: {0}")]
    ProgramNotFound(String),

    #[error("Provider error: {0}")]
    Provider(#[from] SolanaProviderError),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Transaction {0} was not confirmed in time")]
    ConfirmationTimeout(Signature),

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Failed to decode account {address}: {reason}")]
    AccountDecode { address: Pubkey, reason: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::UnreachableVariant(_)
            | ClientError::MissingInput(_)
            | ClientError::Validation(_)
            | ClientError::LayoutViolation { .. }
            | ClientError::InvalidSeeds(_)
            | ClientError::NoInstructionsToSend
            | ClientError::MissingFeePayer
            | ClientError::UnregisteredOperation(_)
            | ClientError::DuplicateOperation(_)
            | ClientError::OperationTypeMismatch(_)
            | ClientError::ProgramNotFound(_) => ErrorCategory::CallerInput,

            ClientError::Provider(_)
            | ClientError::Signing(_)
            | ClientError::ConfirmationTimeout(_)
            | ClientError::AccountNotFound(_)
            | ClientError::AccountDecode { .. } => ErrorCategory::Provider,

            ClientError::Cancelled => ErrorCategory::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Only provider errors can be transient; everything else is decided before
    /// the network is touched.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Provider(err) => err.is_transient(),
            ClientError::ConfirmationTimeout(_) => true,
            _ => false,
        }
    }

    pub(crate) fn layout(field: &str, reason: impl Into<String>) -> Self {
        ClientError::LayoutViolation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<solana_sdk::signer::SignerError> for ClientError {
    fn from(error: solana_sdk::signer::SignerError) -> Self {
        ClientError::Signing(error.to_string())
    }
}
