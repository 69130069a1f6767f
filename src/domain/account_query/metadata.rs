use solana_sdk::{account::Account, pubkey::Pubkey};

use super::GpaQuery;
use crate::{
    constants::{
        CREATORS_START_OFFSET, CREATOR_SIZE, KEY_OFFSET, MAX_CREATOR_LIMIT, MAX_NAME_LENGTH,
        MAX_SYMBOL_LENGTH, MAX_URI_LENGTH, METADATA_V1_KEY, MINT_OFFSET, NAME_OFFSET,
        PUBKEY_LENGTH, SYMBOL_OFFSET, UPDATE_AUTHORITY_OFFSET, URI_OFFSET,
    },
    models::ClientError,
    services::SolanaProviderTrait,
};

/// Scan over metadata accounts using the fixed on-chain layout.
///
/// Strings are stored zero padded to their maximum length, so the string filters pad
/// the value and match it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataAccountQuery {
    query: GpaQuery,
}

impl MetadataAccountQuery {
    pub fn new(token_metadata_program_id: Pubkey) -> Self {
        Self {
            query: GpaQuery::new(token_metadata_program_id),
        }
    }

    pub fn where_key(mut self, key: u8) -> Self {
        self.query = self.query.where_memcmp(KEY_OFFSET, vec![key]);
        self
    }

    pub fn where_metadata_v1(self) -> Self {
        self.where_key(METADATA_V1_KEY)
    }

    pub fn where_update_authority(mut self, update_authority: &Pubkey) -> Self {
        self.query = self
            .query
            .where_memcmp(UPDATE_AUTHORITY_OFFSET, update_authority.to_bytes());
        self
    }

    pub fn where_mint(mut self, mint: &Pubkey) -> Self {
        self.query = self.query.where_memcmp(MINT_OFFSET, mint.to_bytes());
        self
    }

    pub fn where_name(self, name: &str) -> Result<Self, ClientError> {
        self.where_padded("name", NAME_OFFSET, name, MAX_NAME_LENGTH)
    }

    pub fn where_symbol(self, symbol: &str) -> Result<Self, ClientError> {
        self.where_padded("symbol", SYMBOL_OFFSET, symbol, MAX_SYMBOL_LENGTH)
    }

    pub fn where_uri(self, uri: &str) -> Result<Self, ClientError> {
        self.where_padded("uri", URI_OFFSET, uri, MAX_URI_LENGTH)
    }

    /// Matches the creator at `position` (1-based, at most 5).
    ///
    /// Positions past the actual creator count compare against bytes of the following
    /// fields and will not match.
    pub fn where_creator(mut self, position: usize, creator: &Pubkey) -> Result<Self, ClientError> {
        let offset = creator_offset(position)?;
        self.query = self.query.where_memcmp(offset, creator.to_bytes());
        Ok(self)
    }

    pub fn where_first_creator(mut self, creator: &Pubkey) -> Self {
        self.query = self
            .query
            .where_memcmp(CREATORS_START_OFFSET, creator.to_bytes());
        self
    }

    pub fn select_update_authority(mut self) -> Self {
        self.query = self.query.slice(UPDATE_AUTHORITY_OFFSET, PUBKEY_LENGTH);
        self
    }

    pub fn select_mint(mut self) -> Self {
        self.query = self.query.slice(MINT_OFFSET, PUBKEY_LENGTH);
        self
    }

    pub fn select_name(mut self) -> Self {
        self.query = self.query.slice(NAME_OFFSET, MAX_NAME_LENGTH);
        self
    }

    pub fn select_symbol(mut self) -> Self {
        self.query = self.query.slice(SYMBOL_OFFSET, MAX_SYMBOL_LENGTH);
        self
    }

    pub fn select_uri(mut self) -> Self {
        self.query = self.query.slice(URI_OFFSET, MAX_URI_LENGTH);
        self
    }

    pub fn select_creator(mut self, position: usize) -> Result<Self, ClientError> {
        let offset = creator_offset(position)?;
        self.query = self.query.slice(offset, PUBKEY_LENGTH);
        Ok(self)
    }

    pub fn query(&self) -> &GpaQuery {
        &self.query
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        self.query.matches(data)
    }

    pub fn apply_slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        self.query.apply_slice(data)
    }

    pub async fn get(
        &self,
        provider: &dyn SolanaProviderTrait,
    ) -> Result<Vec<(Pubkey, Account)>, ClientError> {
        self.query.get(provider).await
    }

    pub async fn get_data_as_pubkeys(
        &self,
        provider: &dyn SolanaProviderTrait,
    ) -> Result<Vec<Pubkey>, ClientError> {
        self.query.get_data_as_pubkeys(provider).await
    }

    fn where_padded(
        mut self,
        field: &str,
        offset: usize,
        value: &str,
        max_length: usize,
    ) -> Result<Self, ClientError> {
        let mut bytes = value.as_bytes().to_vec();
        if bytes.len() > max_length {
            return Err(ClientError::layout(
                field,
                format!("{} bytes exceeds the maximum of {}", bytes.len(), max_length),
            ));
        }
        bytes.resize(max_length, 0);
        self.query = self.query.where_memcmp(offset, bytes);
        Ok(self)
    }
}

fn creator_offset(position: usize) -> Result<usize, ClientError> {
    if !(1..=MAX_CREATOR_LIMIT).contains(&position) {
        return Err(ClientError::layout(
            "creator",
            format!("position {position} is outside 1..={MAX_CREATOR_LIMIT}"),
        ));
    }
    Ok(CREATORS_START_OFFSET + (position - 1) * CREATOR_SIZE)
}
