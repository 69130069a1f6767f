//! In-memory stand-in for the RPC provider.
//!
//! Accounts are seeded by the test, scans evaluate filters the way an RPC node does and
//! every submitted transaction is recorded and reported as confirmed.

use async_trait::async_trait;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use std::{collections::HashMap, sync::Mutex};
use token_metadata_client::{
    models::{AccountFilter, DataSlice},
    services::{SolanaProviderError, SolanaProviderTrait},
};

pub const RENT_EXEMPT_LAMPORTS: u64 = 1_461_600;

pub struct InMemoryLedger {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    sent: Mutex<Vec<Transaction>>,
    blockhash: Hash,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            blockhash: Hash::new_unique(),
        }
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn insert_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(
            address,
            Account {
                lamports: RENT_EXEMPT_LAMPORTS,
                data,
                owner,
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolanaProviderTrait for InMemoryLedger {
    async fn get_account(
        &self,
        address: &Pubkey,
        _commitment: CommitmentConfig,
    ) -> Result<Option<Account>, SolanaProviderError> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        _commitment: CommitmentConfig,
    ) -> Result<Vec<Option<Account>>, SolanaProviderError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(addresses
            .iter()
            .map(|address| accounts.get(address).cloned())
            .collect())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
        data_slice: Option<DataSlice>,
    ) -> Result<Vec<(Pubkey, Account)>, SolanaProviderError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .filter(|(_, account)| filters.iter().all(|filter| filter.matches(&account.data)))
            .map(|(address, account)| {
                let mut account = account.clone();
                if let Some(slice) = data_slice {
                    account.data = slice.apply(&account.data).to_vec();
                }
                (*address, account)
            })
            .collect())
    }

    async fn get_latest_blockhash(
        &self,
        _commitment: CommitmentConfig,
    ) -> Result<Hash, SolanaProviderError> {
        Ok(self.blockhash)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        _data_size: usize,
    ) -> Result<u64, SolanaProviderError> {
        Ok(RENT_EXEMPT_LAMPORTS)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError> {
        transaction
            .verify()
            .map_err(|e| SolanaProviderError::InvalidTransaction(e.to_string()))?;
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<bool, SolanaProviderError> {
        Ok(self
            .sent
            .lock()
            .unwrap()
            .iter()
            .any(|transaction| transaction.signatures[0] == *signature))
    }
}
