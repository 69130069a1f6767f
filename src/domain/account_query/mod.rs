//! Byte-offset scans over a program's accounts.
//!
//! A [`GpaQuery`] collects `memcmp`/size filters (combined with logical AND) and an
//! optional data slice, and runs them as one `getProgramAccounts` request. The same
//! filters can be evaluated locally with [`GpaQuery::matches`].

mod metadata;
pub use metadata::*;

use log::debug;
use solana_sdk::{account::Account, pubkey::Pubkey};

use crate::{
    constants::PUBKEY_LENGTH,
    models::{AccountFilter, ClientError, DataSlice},
    services::SolanaProviderTrait,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GpaQuery {
    program_id: Pubkey,
    filters: Vec<AccountFilter>,
    data_slice: Option<DataSlice>,
}

impl GpaQuery {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            filters: Vec::new(),
            data_slice: None,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn filters(&self) -> &[AccountFilter] {
        &self.filters
    }

    pub fn data_slice(&self) -> Option<DataSlice> {
        self.data_slice
    }

    pub fn where_memcmp(mut self, offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        self.filters.push(AccountFilter::memcmp(offset, bytes));
        self
    }

    pub fn where_size(mut self, size: u64) -> Self {
        self.filters.push(AccountFilter::DataSize(size));
        self
    }

    /// Returns only `length` bytes starting at `offset` for each account.
    /// A later call replaces the previous slice.
    pub fn slice(mut self, offset: usize, length: usize) -> Self {
        self.data_slice = Some(DataSlice { offset, length });
        self
    }

    /// Whether `data` satisfies every filter.
    pub fn matches(&self, data: &[u8]) -> bool {
        self.filters.iter().all(|filter| filter.matches(data))
    }

    pub fn apply_slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        match self.data_slice {
            Some(slice) => slice.apply(data),
            None => data,
        }
    }

    pub async fn get(
        &self,
        provider: &dyn SolanaProviderTrait,
    ) -> Result<Vec<(Pubkey, Account)>, ClientError> {
        debug!(
            "Scanning accounts of {} with {} filters",
            self.program_id,
            self.filters.len()
        );
        let accounts = provider
            .get_program_accounts(&self.program_id, &self.filters, self.data_slice)
            .await?;
        debug!("Scan of {} returned {} accounts", self.program_id, accounts.len());
        Ok(accounts)
    }

    /// Runs the scan and decodes each returned slice as an address.
    ///
    /// The slice must be exactly 32 bytes long.
    pub async fn get_data_as_pubkeys(
        &self,
        provider: &dyn SolanaProviderTrait,
    ) -> Result<Vec<Pubkey>, ClientError> {
        match self.data_slice {
            Some(slice) if slice.length == PUBKEY_LENGTH => {}
            _ => {
                return Err(ClientError::layout(
                    "data_slice",
                    format!("selection must be exactly {PUBKEY_LENGTH} bytes"),
                ))
            }
        }

        self.get(provider)
            .await?
            .into_iter()
            .map(|(address, account)| {
                decode_pubkey(&account.data).ok_or_else(|| ClientError::AccountDecode {
                    address,
                    reason: format!("expected {} bytes, got {}", PUBKEY_LENGTH, account.data.len()),
                })
            })
            .collect()
    }
}

fn decode_pubkey(data: &[u8]) -> Option<Pubkey> {
    <[u8; PUBKEY_LENGTH]>::try_from(data)
        .ok()
        .map(Pubkey::new_from_array)
}
