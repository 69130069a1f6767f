//! Composable, order-preserving assembly of one atomic transaction.
//!
//! Independently built fragments (a single instruction with its signers, a list of them,
//! or another builder) are appended with [`TransactionBuilder::add`]. Nothing is sent
//! until [`TransactionBuilder::send`] or [`TransactionBuilder::send_and_confirm`], which
//! consume the builder.

mod context;
pub use context::*;

use log::{debug, info};
use serde::Serialize;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    signature::Signature,
    signer::Signer,
    transaction::Transaction,
};
use std::{fmt, time::Duration};

use crate::{
    config::ClientConfig,
    constants::{DEFAULT_CONFIRM_POLL_INTERVAL_MS, DEFAULT_CONFIRM_TIMEOUT_SECONDS},
    models::{dedupe_signers, ClientError, SignerRef},
    services::SolanaProviderTrait,
    utils::poll_until,
};

/// One instruction together with the signers it requires.
///
/// `key` is a label used to find or split around a step; it has no effect on execution.
#[derive(Clone)]
pub struct InstructionWithSigners {
    pub instruction: Instruction,
    pub signers: Vec<SignerRef>,
    pub key: Option<String>,
}

impl InstructionWithSigners {
    pub fn new(instruction: Instruction, signers: Vec<SignerRef>) -> Self {
        Self {
            instruction,
            signers,
            key: None,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }
}

impl fmt::Debug for InstructionWithSigners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signers: Vec<_> = self.signers.iter().map(|s| s.pubkey()).collect();
        f.debug_struct("InstructionWithSigners")
            .field("instruction", &self.instruction)
            .field("signers", &signers)
            .field("key", &self.key)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmOptions {
    pub commitment: CommitmentConfig,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            timeout: Duration::from_secs(DEFAULT_CONFIRM_TIMEOUT_SECONDS),
            poll_interval: Duration::from_millis(DEFAULT_CONFIRM_POLL_INTERVAL_MS),
        }
    }
}

impl From<&ClientConfig> for ConfirmOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            commitment: CommitmentConfig {
                commitment: config.commitment,
            },
            timeout: Duration::from_secs(config.confirm_timeout_seconds),
            poll_interval: Duration::from_millis(config.confirm_poll_interval_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendAndConfirmResponse {
    #[serde(serialize_with = "serialize_display")]
    pub signature: Signature,
    #[serde(serialize_with = "serialize_display")]
    pub blockhash: Hash,
    pub context: BuilderContext,
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

#[derive(Clone, Default)]
pub struct TransactionBuilder {
    records: Vec<InstructionWithSigners>,
    fee_payer: Option<SignerRef>,
    context: BuilderContext,
}

impl fmt::Debug for TransactionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("records", &self.records)
            .field("fee_payer", &self.fee_payer.as_ref().map(|s| s.pubkey()))
            .field("context", &self.context)
            .finish()
    }
}

impl From<InstructionWithSigners> for TransactionBuilder {
    fn from(record: InstructionWithSigners) -> Self {
        Self {
            records: vec![record],
            ..Self::default()
        }
    }
}

impl From<Vec<InstructionWithSigners>> for TransactionBuilder {
    fn from(records: Vec<InstructionWithSigners>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

impl TransactionBuilder {
    pub fn make() -> Self {
        Self::default()
    }

    /// The fee payer always signs, even when no instruction names it.
    pub fn set_fee_payer(mut self, fee_payer: SignerRef) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    pub fn fee_payer(&self) -> Option<&SignerRef> {
        self.fee_payer.as_ref()
    }

    /// Appends `part` after the existing records.
    ///
    /// A builder's records are flattened in place and its context is merged over ours.
    /// Its fee payer is ignored.
    pub fn add(mut self, part: impl Into<TransactionBuilder>) -> Self {
        let part = part.into();
        self.records.extend(part.records);
        self.context.merge(part.context);
        self
    }

    /// Inserts `part` before the existing records.
    pub fn prepend(mut self, part: impl Into<TransactionBuilder>) -> Self {
        let part = part.into();
        let mut records = part.records;
        records.append(&mut self.records);
        self.records = records;
        self.context.merge(part.context);
        self
    }

    pub fn set_context(mut self, partial: BuilderContext) -> Self {
        self.context.merge(partial);
        self
    }

    pub fn context(&self) -> &BuilderContext {
        &self.context
    }

    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn unless<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.when(!condition, f)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn instruction_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[InstructionWithSigners] {
        &self.records
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        self.records
            .iter()
            .map(|record| record.instruction.clone())
            .collect()
    }

    pub fn instructions_with_key(&self, key: &str) -> Vec<&InstructionWithSigners> {
        self.records
            .iter()
            .filter(|record| record.key.as_deref() == Some(key))
            .collect()
    }

    /// Splits at the first record labelled `key`.
    ///
    /// With `include` the labelled record ends the first half, otherwise it starts the
    /// second. Without a match everything stays in the first half. Both halves keep the
    /// fee payer and the context.
    pub fn split_using_key(self, key: &str, include: bool) -> (Self, Self) {
        let Self {
            mut records,
            fee_payer,
            context,
        } = self;

        let at = records
            .iter()
            .position(|record| record.key.as_deref() == Some(key))
            .map(|index| if include { index + 1 } else { index })
            .unwrap_or(records.len());
        let rest = records.split_off(at);

        let first = Self {
            records,
            fee_payer: fee_payer.clone(),
            context: context.clone(),
        };
        let second = Self {
            records: rest,
            fee_payer,
            context,
        };
        (first, second)
    }

    pub fn split_before_key(self, key: &str) -> (Self, Self) {
        self.split_using_key(key, false)
    }

    pub fn split_after_key(self, key: &str) -> (Self, Self) {
        self.split_using_key(key, true)
    }

    /// Fee payer first, then every instruction signer in first-appearance order,
    /// deduplicated by public key.
    pub fn signers(&self) -> Vec<SignerRef> {
        dedupe_signers(
            self.fee_payer
                .iter()
                .chain(self.records.iter().flat_map(|record| record.signers.iter())),
        )
    }

    /// Builds and signs the transaction without submitting it.
    pub fn to_transaction(&self, blockhash: Hash) -> Result<Transaction, ClientError> {
        let fee_payer = self.fee_payer.as_ref().ok_or(ClientError::MissingFeePayer)?;

        let signers = self.signers();
        let keypairs: Vec<&dyn Signer> = signers
            .iter()
            .map(|signer| signer.as_ref() as &dyn Signer)
            .collect();

        let mut transaction =
            Transaction::new_with_payer(&self.instructions(), Some(&fee_payer.pubkey()));
        transaction.try_sign(&keypairs, blockhash)?;

        Ok(transaction)
    }

    /// Submits every record as one transaction without waiting for confirmation.
    pub async fn send(
        self,
        provider: &dyn SolanaProviderTrait,
        options: &ConfirmOptions,
    ) -> Result<SentTransaction, ClientError> {
        if self.is_empty() {
            return Err(ClientError::NoInstructionsToSend);
        }
        if self.fee_payer.is_none() {
            return Err(ClientError::MissingFeePayer);
        }

        let blockhash = provider.get_latest_blockhash(options.commitment).await?;
        let transaction = self.to_transaction(blockhash)?;
        debug!(
            "Built transaction with {} instructions and {} signers",
            self.instruction_count(),
            transaction.signatures.len()
        );

        let signature = provider.send_transaction(&transaction).await?;
        info!("Sent transaction {}", signature);

        Ok(SentTransaction {
            signature,
            blockhash,
            context: self.context,
        })
    }

    /// Sends every record as one transaction and waits for the requested commitment.
    pub async fn send_and_confirm(
        self,
        provider: &dyn SolanaProviderTrait,
        options: &ConfirmOptions,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        self.send(provider, options)
            .await?
            .confirm(provider, options)
            .await
    }
}

/// A submitted transaction still waiting for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct SentTransaction {
    pub signature: Signature,
    pub blockhash: Hash,
    pub context: BuilderContext,
}

impl SentTransaction {
    pub async fn confirm(
        self,
        provider: &dyn SolanaProviderTrait,
        options: &ConfirmOptions,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        let signature = self.signature;
        let commitment = options.commitment;
        let confirmed = poll_until(
            || provider.confirm_transaction(&signature, commitment),
            options.timeout,
            options.poll_interval,
            "transaction confirmation",
        )
        .await?;

        if !confirmed {
            return Err(ClientError::ConfirmationTimeout(signature));
        }
        info!("Confirmed transaction {}", signature);

        Ok(SendAndConfirmResponse {
            signature,
            blockhash: self.blockhash,
            context: self.context,
        })
    }
}
