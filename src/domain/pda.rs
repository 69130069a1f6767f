//! Program derived addresses for the token metadata account family.
//!
//! Every helper is a thin seed schema over [`derive`]; derivation is pure and performs no
//! I/O, so the same inputs always produce the same address and bump.

use log::debug;
use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

use crate::{
    constants::{
        BURN_SEED, COLLECTION_AUTHORITY_SEED, EDITION_MARKER_BIT_SIZE, EDITION_SEED,
        METADATA_PREFIX, TOKEN_RECORD_SEED, USER_SEED,
    },
    models::{ClientError, MetadataDelegateRole},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
    pub seeds: Vec<Vec<u8>>,
    pub program_id: Pubkey,
}

impl ProgramDerivedAddress {
    /// Seeds with the bump appended, as needed to sign for the address.
    pub fn signer_seeds(&self) -> Vec<Vec<u8>> {
        let mut seeds = self.seeds.clone();
        seeds.push(vec![self.bump]);
        seeds
    }
}

/// Derives the off-curve address for `seeds` under `program_id`.
///
/// Fails with `InvalidSeeds` when there are more than 16 seeds, when a seed is longer
/// than 32 bytes, or when no bump yields an off-curve address.
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> Result<ProgramDerivedAddress, ClientError> {
    if seeds.len() > MAX_SEEDS {
        return Err(ClientError::InvalidSeeds(format!(
            "{} seeds given, at most {} allowed",
            seeds.len(),
            MAX_SEEDS
        )));
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(ClientError::InvalidSeeds(format!(
            "seed {} is {} bytes, at most {} allowed",
            index,
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    let (address, bump) = Pubkey::try_find_program_address(seeds, program_id).ok_or_else(|| {
        ClientError::InvalidSeeds(format!("no viable bump seed for program {program_id}"))
    })?;

    debug!("Derived {} (bump {}) under {}", address, bump, program_id);

    Ok(ProgramDerivedAddress {
        address,
        bump,
        seeds: seeds.iter().map(|seed| seed.to_vec()).collect(),
        program_id: *program_id,
    })
}

/// `"metadata", program, mint`
pub fn find_metadata_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    derive(
        program_id,
        &[METADATA_PREFIX, program_id.as_ref(), mint.as_ref()],
    )
}

/// `"metadata", program, mint, "edition"`; shared by master and printed editions.
pub fn find_master_edition_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    derive(
        program_id,
        &[
            METADATA_PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
    )
}

/// Edition seeds followed by the decimal string of `edition_number / 248`.
pub fn find_edition_marker_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
    edition_number: u64,
) -> Result<ProgramDerivedAddress, ClientError> {
    let marker = (edition_number / EDITION_MARKER_BIT_SIZE).to_string();
    derive(
        program_id,
        &[
            METADATA_PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
            marker.as_bytes(),
        ],
    )
}

pub fn find_collection_authority_record_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
    authority: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    derive(
        program_id,
        &[
            METADATA_PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            COLLECTION_AUTHORITY_SEED,
            authority.as_ref(),
        ],
    )
}

pub fn find_use_authority_record_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
    user: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    derive(
        program_id,
        &[
            METADATA_PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            USER_SEED,
            user.as_ref(),
        ],
    )
}

pub fn find_metadata_delegate_record_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
    role: MetadataDelegateRole,
    namespace: &Pubkey,
    delegate: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    let mut seeds: Vec<&[u8]> = vec![
        METADATA_PREFIX,
        program_id.as_ref(),
        mint.as_ref(),
        role.seed(),
        namespace.as_ref(),
    ];
    if role.requires_delegate_seed() {
        seeds.push(delegate.as_ref());
    }
    derive(program_id, &seeds)
}

pub fn find_token_record_pda(
    program_id: &Pubkey,
    mint: &Pubkey,
    token: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    derive(
        program_id,
        &[
            METADATA_PREFIX,
            program_id.as_ref(),
            mint.as_ref(),
            TOKEN_RECORD_SEED,
            token.as_ref(),
        ],
    )
}

/// `owner, token program, mint` under the associated token program.
pub fn find_associated_token_pda(
    associated_token_program_id: &Pubkey,
    owner: &Pubkey,
    token_program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramDerivedAddress, ClientError> {
    derive(
        associated_token_program_id,
        &[owner.as_ref(), token_program_id.as_ref(), mint.as_ref()],
    )
}

pub fn find_use_burner_pda(program_id: &Pubkey) -> Result<ProgramDerivedAddress, ClientError> {
    derive(program_id, &[METADATA_PREFIX, program_id.as_ref(), BURN_SEED])
}
