//! Byte offsets of the serialized metadata account.
//!
//! The account index is queried with raw `memcmp` filters, so these offsets are a wire
//! contract with the program's account schema. A drift here produces wrong or empty scan
//! results without any error.

pub const PUBKEY_LENGTH: usize = 32;
pub const LENGTH_PREFIX_SIZE: usize = 4;

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;
pub const MAX_CREATOR_LIMIT: usize = 5;
/// Address, verified flag and share.
pub const CREATOR_SIZE: usize = PUBKEY_LENGTH + 1 + 1;

pub const KEY_OFFSET: usize = 0;
pub const UPDATE_AUTHORITY_OFFSET: usize = KEY_OFFSET + 1;
pub const MINT_OFFSET: usize = UPDATE_AUTHORITY_OFFSET + PUBKEY_LENGTH;
pub const NAME_OFFSET: usize = MINT_OFFSET + PUBKEY_LENGTH + LENGTH_PREFIX_SIZE;
pub const SYMBOL_OFFSET: usize = NAME_OFFSET + MAX_NAME_LENGTH + LENGTH_PREFIX_SIZE;
pub const URI_OFFSET: usize = SYMBOL_OFFSET + MAX_SYMBOL_LENGTH + LENGTH_PREFIX_SIZE;
pub const SELLER_FEE_BASIS_POINTS_OFFSET: usize = URI_OFFSET + MAX_URI_LENGTH;
pub const CREATORS_PRESENT_OFFSET: usize = SELLER_FEE_BASIS_POINTS_OFFSET + 2;
pub const CREATORS_COUNT_OFFSET: usize = CREATORS_PRESENT_OFFSET + 1;
pub const CREATORS_START_OFFSET: usize = CREATORS_COUNT_OFFSET + LENGTH_PREFIX_SIZE;

/// Account discriminant of a V1 metadata account.
pub const METADATA_V1_KEY: u8 = 4;
/// Account discriminant of a V2 master edition account.
pub const MASTER_EDITION_V2_KEY: u8 = 6;
