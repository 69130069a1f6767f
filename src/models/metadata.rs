//! Decoded token metadata accounts.

use mpl_token_metadata::{
    accounts::{MasterEdition as MplMasterEdition, Metadata as MplMetadata},
    types::{
        TokenStandard as MplTokenStandard, UseMethod as MplUseMethod, Uses as MplUses,
    },
};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLink {
    pub key: Pubkey,
    pub verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStandard {
    NonFungible,
    FungibleAsset,
    Fungible,
    NonFungibleEdition,
    ProgrammableNonFungible,
    ProgrammableNonFungibleEdition,
}

impl From<MplTokenStandard> for TokenStandard {
    fn from(standard: MplTokenStandard) -> Self {
        match standard {
            MplTokenStandard::NonFungible => TokenStandard::NonFungible,
            MplTokenStandard::FungibleAsset => TokenStandard::FungibleAsset,
            MplTokenStandard::Fungible => TokenStandard::Fungible,
            MplTokenStandard::NonFungibleEdition => TokenStandard::NonFungibleEdition,
            MplTokenStandard::ProgrammableNonFungible => TokenStandard::ProgrammableNonFungible,
            MplTokenStandard::ProgrammableNonFungibleEdition => {
                TokenStandard::ProgrammableNonFungibleEdition
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

/// How many times an asset can be used, and how a use consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

impl From<MplUses> for Uses {
    fn from(uses: MplUses) -> Self {
        Self {
            use_method: match uses.use_method {
                MplUseMethod::Burn => UseMethod::Burn,
                MplUseMethod::Multiple => UseMethod::Multiple,
                MplUseMethod::Single => UseMethod::Single,
            },
            remaining: uses.remaining,
            total: uses.total,
        }
    }
}

impl From<Uses> for MplUses {
    fn from(uses: Uses) -> Self {
        Self {
            use_method: match uses.use_method {
                UseMethod::Burn => MplUseMethod::Burn,
                UseMethod::Multiple => MplUseMethod::Multiple,
                UseMethod::Single => MplUseMethod::Single,
            },
            remaining: uses.remaining,
            total: uses.total,
        }
    }
}

/// A metadata account as stored on chain, with padding stripped from strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAccount {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub update_authority: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub token_standard: Option<TokenStandard>,
    pub collection: Option<CollectionLink>,
    pub uses: Option<Uses>,
}

impl MetadataAccount {
    /// Decodes raw account data fetched from `address`.
    pub fn from_account_data(address: Pubkey, data: &[u8]) -> Result<Self, ClientError> {
        let metadata =
            MplMetadata::from_bytes(data).map_err(|e| ClientError::AccountDecode {
                address,
                reason: e.to_string(),
            })?;

        Ok(Self {
            address,
            mint: Pubkey::new_from_array(metadata.mint.to_bytes()),
            update_authority: Pubkey::new_from_array(metadata.update_authority.to_bytes()),
            name: trim_padding(&metadata.name),
            symbol: trim_padding(&metadata.symbol),
            uri: trim_padding(&metadata.uri),
            seller_fee_basis_points: metadata.seller_fee_basis_points,
            creators: metadata
                .creators
                .unwrap_or_default()
                .into_iter()
                .map(|creator| Creator {
                    address: Pubkey::new_from_array(creator.address.to_bytes()),
                    verified: creator.verified,
                    share: creator.share,
                })
                .collect(),
            primary_sale_happened: metadata.primary_sale_happened,
            is_mutable: metadata.is_mutable,
            token_standard: metadata.token_standard.map(TokenStandard::from),
            collection: metadata.collection.map(|collection| CollectionLink {
                key: Pubkey::new_from_array(collection.key.to_bytes()),
                verified: collection.verified,
            }),
            uses: metadata.uses.map(Uses::from),
        })
    }
}

fn trim_padding(value: &str) -> String {
    value.trim_end_matches('\u{0}').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterEditionInfo {
    pub address: Pubkey,
    pub supply: u64,
    pub max_supply: Option<u64>,
}

impl MasterEditionInfo {
    pub fn from_account_data(address: Pubkey, data: &[u8]) -> Result<Self, ClientError> {
        let edition =
            MplMasterEdition::from_bytes(data).map_err(|e| ClientError::AccountDecode {
                address,
                reason: e.to_string(),
            })?;

        Ok(Self {
            address,
            supply: edition.supply,
            max_supply: edition.max_supply,
        })
    }
}

/// A metadata account together with its master edition and off-chain JSON, when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub metadata: MetadataAccount,
    pub edition: Option<MasterEditionInfo>,
    pub json: Option<serde_json::Value>,
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use crate::constants::*;

    /// Serializes a metadata account the way the program lays it out, with names padded
    /// to their maximum lengths.
    pub fn metadata_account_bytes(
        update_authority: &Pubkey,
        mint: &Pubkey,
        name: &str,
        creators: &[Creator],
    ) -> Vec<u8> {
        fn padded(value: &str, len: usize) -> Vec<u8> {
            let mut bytes = (len as u32).to_le_bytes().to_vec();
            let mut field = value.as_bytes().to_vec();
            field.resize(len, 0);
            bytes.extend(field);
            bytes
        }

        let mut data = vec![METADATA_V1_KEY];
        data.extend_from_slice(update_authority.as_ref());
        data.extend_from_slice(mint.as_ref());
        data.extend(padded(name, MAX_NAME_LENGTH));
        data.extend(padded("SYM", MAX_SYMBOL_LENGTH));
        data.extend(padded("https://example.com/nft.json", MAX_URI_LENGTH));
        data.extend_from_slice(&500u16.to_le_bytes());
        if creators.is_empty() {
            data.push(0);
        } else {
            data.push(1);
            data.extend_from_slice(&(creators.len() as u32).to_le_bytes());
            for creator in creators {
                data.extend_from_slice(creator.address.as_ref());
                data.push(creator.verified as u8);
                data.push(creator.share);
            }
        }
        // primary_sale_happened, is_mutable, then every optional trailing field absent
        data.extend_from_slice(&[0, 1]);
        data.extend_from_slice(&[0; 6]);
        data
    }
}
