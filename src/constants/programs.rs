//! Default program addresses and the logical names they are registered under.

use solana_sdk::{pubkey, pubkey::Pubkey};

pub const TOKEN_METADATA_PROGRAM_NAME: &str = "TokenMetadataProgram";
pub const TOKEN_PROGRAM_NAME: &str = "TokenProgram";
pub const ASSOCIATED_TOKEN_PROGRAM_NAME: &str = "AssociatedTokenProgram";
pub const SYSTEM_PROGRAM_NAME: &str = "SystemProgram";
pub const TOKEN_AUTH_RULES_PROGRAM_NAME: &str = "TokenAuthRulesProgram";

pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");
pub const TOKEN_AUTH_RULES_PROGRAM_ID: Pubkey =
    pubkey!("auth9SigNpDKz4sJJ1DfCTuZrZNSAgh9sFD3rboVmgg");
pub const SYSVAR_INSTRUCTIONS_ID: Pubkey =
    pubkey!("Sysvar1nstructions1111111111111111111111111");
