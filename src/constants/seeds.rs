//! Seed constants shared by address derivation and instruction builders.
//!
//! These must match the token metadata program byte for byte, otherwise every derived
//! account lookup silently misses.

pub const METADATA_PREFIX: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";
pub const COLLECTION_AUTHORITY_SEED: &[u8] = b"collection_authority";
pub const USER_SEED: &[u8] = b"user";
pub const BURN_SEED: &[u8] = b"burn";
pub const TOKEN_RECORD_SEED: &[u8] = b"token_record";

/// Number of editions tracked by one edition marker account.
///
/// Each marker stores a 31-byte bitmask (248 bits), so the number of marker accounts
/// grows with `edition / 248` rather than with the edition supply.
pub const EDITION_MARKER_BIT_SIZE: u64 = 248;
