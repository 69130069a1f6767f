//! Token metadata program instructions.
//!
//! Wire encoding comes from the program's generated client in `mpl_token_metadata`.
//! These wrappers translate the crate's domain types and point the instruction at the
//! registry's program id, which may differ from the canonical deployment.

use mpl_token_metadata::{
    instructions::{
        ApproveCollectionAuthority, CreateMasterEditionV3, CreateMasterEditionV3InstructionArgs,
        CreateMetadataAccountV3, CreateMetadataAccountV3InstructionArgs, LockV1,
        LockV1InstructionArgs, RevokeCollectionAuthority, UnlockV1, UnlockV1InstructionArgs,
        UnverifyCollection, UpdateMetadataAccountV2, UpdateMetadataAccountV2InstructionArgs,
        VerifyCollection,
    },
    types::{
        AuthorizationData as MplAuthorizationData, Collection as MplCollection,
        CollectionDetails, Creator as MplCreator, DataV2, Payload, PayloadType as MplPayloadType,
        ProofInfo, SeedsVec,
    },
    ID as CANONICAL_PROGRAM_ID,
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use crate::{
    constants::SYSVAR_INSTRUCTIONS_ID,
    models::{AuthorizationData, CollectionLink, Creator, PayloadType, Uses},
};

/// Mutable metadata fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataData {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Option<Vec<Creator>>,
    pub collection: Option<CollectionLink>,
    pub uses: Option<Uses>,
}

impl From<&MetadataData> for DataV2 {
    fn from(data: &MetadataData) -> Self {
        Self {
            name: data.name.clone(),
            symbol: data.symbol.clone(),
            uri: data.uri.clone(),
            seller_fee_basis_points: data.seller_fee_basis_points,
            creators: data.creators.as_ref().map(|creators| {
                creators
                    .iter()
                    .map(|creator| MplCreator {
                        address: creator.address,
                        verified: creator.verified,
                        share: creator.share,
                    })
                    .collect()
            }),
            collection: data.collection.as_ref().map(|collection| MplCollection {
                verified: collection.verified,
                key: collection.key,
            }),
            uses: data.uses.clone().map(Into::into),
        }
    }
}

impl From<&AuthorizationData> for MplAuthorizationData {
    fn from(data: &AuthorizationData) -> Self {
        let map = data
            .payload
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    PayloadType::Pubkey(bytes) => {
                        MplPayloadType::Pubkey(Pubkey::new_from_array(*bytes))
                    }
                    PayloadType::Seeds(seeds) => MplPayloadType::Seeds(SeedsVec {
                        seeds: seeds.clone(),
                    }),
                    PayloadType::MerkleProof(proof) => MplPayloadType::MerkleProof(ProofInfo {
                        proof: proof.clone(),
                    }),
                    PayloadType::Number(number) => MplPayloadType::Number(*number),
                };
                (key.clone(), value)
            })
            .collect();

        Self {
            payload: Payload { map },
        }
    }
}

/// Points `instruction` at `program_id`.
///
/// The generated client fills absent optional accounts with the canonical program id; those
/// are rewritten too so the "not provided" marker matches the target deployment.
fn retarget(mut instruction: Instruction, program_id: &Pubkey) -> Instruction {
    if *program_id != CANONICAL_PROGRAM_ID {
        for meta in instruction
            .accounts
            .iter_mut()
            .filter(|meta| meta.pubkey == CANONICAL_PROGRAM_ID)
        {
            meta.pubkey = *program_id;
        }
    }
    instruction.program_id = *program_id;
    instruction
}

#[derive(Debug, Clone)]
pub struct CreateMetadataAccounts {
    pub metadata: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub payer: Pubkey,
    pub update_authority: Pubkey,
    pub system_program: Pubkey,
}

pub struct CreateMetadataArgs {
    pub data: MetadataData,
    pub is_mutable: bool,
    /// Marks the asset as a sized collection parent with the given size.
    pub collection_size: Option<u64>,
}

pub fn create_metadata_account_v3(
    program_id: &Pubkey,
    accounts: &CreateMetadataAccounts,
    args: &CreateMetadataArgs,
) -> Instruction {
    let instruction = CreateMetadataAccountV3 {
        metadata: accounts.metadata,
        mint: accounts.mint,
        mint_authority: accounts.mint_authority,
        payer: accounts.payer,
        update_authority: (accounts.update_authority, true),
        system_program: accounts.system_program,
        rent: None,
    }
    .instruction(CreateMetadataAccountV3InstructionArgs {
        data: DataV2::from(&args.data),
        is_mutable: args.is_mutable,
        collection_details: args
            .collection_size
            .map(|size| CollectionDetails::V1 { size }),
    });
    retarget(instruction, program_id)
}

#[derive(Debug, Clone)]
pub struct CreateMasterEditionAccounts {
    pub edition: Pubkey,
    pub mint: Pubkey,
    pub update_authority: Pubkey,
    pub mint_authority: Pubkey,
    pub payer: Pubkey,
    pub metadata: Pubkey,
    pub token_program: Pubkey,
    pub system_program: Pubkey,
}

pub fn create_master_edition_v3(
    program_id: &Pubkey,
    accounts: &CreateMasterEditionAccounts,
    max_supply: Option<u64>,
) -> Instruction {
    let instruction = CreateMasterEditionV3 {
        edition: accounts.edition,
        mint: accounts.mint,
        update_authority: accounts.update_authority,
        mint_authority: accounts.mint_authority,
        payer: accounts.payer,
        metadata: accounts.metadata,
        token_program: accounts.token_program,
        system_program: accounts.system_program,
        rent: None,
    }
    .instruction(CreateMasterEditionV3InstructionArgs { max_supply });
    retarget(instruction, program_id)
}

/// Fields left `None` are not touched by the update.
#[derive(Debug, Clone, Default)]
pub struct UpdateMetadataArgs {
    pub data: Option<MetadataData>,
    pub new_update_authority: Option<Pubkey>,
    pub primary_sale_happened: Option<bool>,
    pub is_mutable: Option<bool>,
}

pub fn update_metadata_account_v2(
    program_id: &Pubkey,
    metadata: &Pubkey,
    update_authority: &Pubkey,
    args: &UpdateMetadataArgs,
) -> Instruction {
    let instruction = UpdateMetadataAccountV2 {
        metadata: *metadata,
        update_authority: *update_authority,
    }
    .instruction(UpdateMetadataAccountV2InstructionArgs {
        data: args.data.as_ref().map(DataV2::from),
        new_update_authority: args.new_update_authority,
        primary_sale_happened: args.primary_sale_happened,
        is_mutable: args.is_mutable,
    });
    retarget(instruction, program_id)
}

#[derive(Debug, Clone)]
pub struct CollectionVerificationAccounts {
    pub metadata: Pubkey,
    pub collection_authority: Pubkey,
    pub payer: Pubkey,
    pub collection_mint: Pubkey,
    pub collection_metadata: Pubkey,
    pub collection_master_edition: Pubkey,
    /// Set when a delegated collection authority signs instead of the update authority.
    pub collection_authority_record: Option<Pubkey>,
}

pub fn verify_collection(
    program_id: &Pubkey,
    accounts: &CollectionVerificationAccounts,
) -> Instruction {
    let instruction = VerifyCollection {
        metadata: accounts.metadata,
        collection_authority: accounts.collection_authority,
        payer: accounts.payer,
        collection_mint: accounts.collection_mint,
        collection: accounts.collection_metadata,
        collection_master_edition_account: accounts.collection_master_edition,
        collection_authority_record: accounts.collection_authority_record,
    }
    .instruction();
    retarget(instruction, program_id)
}

/// The payer account is not part of the unverify instruction.
pub fn unverify_collection(
    program_id: &Pubkey,
    accounts: &CollectionVerificationAccounts,
) -> Instruction {
    let instruction = UnverifyCollection {
        metadata: accounts.metadata,
        collection_authority: accounts.collection_authority,
        collection_mint: accounts.collection_mint,
        collection: accounts.collection_metadata,
        collection_master_edition_account: accounts.collection_master_edition,
        collection_authority_record: accounts.collection_authority_record,
    }
    .instruction();
    retarget(instruction, program_id)
}

#[derive(Debug, Clone)]
pub struct ApproveCollectionAuthorityAccounts {
    pub collection_authority_record: Pubkey,
    pub new_collection_authority: Pubkey,
    pub update_authority: Pubkey,
    pub payer: Pubkey,
    pub metadata: Pubkey,
    pub mint: Pubkey,
    pub system_program: Pubkey,
}

pub fn approve_collection_authority(
    program_id: &Pubkey,
    accounts: &ApproveCollectionAuthorityAccounts,
) -> Instruction {
    let instruction = ApproveCollectionAuthority {
        collection_authority_record: accounts.collection_authority_record,
        new_collection_authority: accounts.new_collection_authority,
        update_authority: accounts.update_authority,
        payer: accounts.payer,
        metadata: accounts.metadata,
        mint: accounts.mint,
        system_program: accounts.system_program,
        rent: None,
    }
    .instruction();
    retarget(instruction, program_id)
}

#[derive(Debug, Clone)]
pub struct RevokeCollectionAuthorityAccounts {
    pub collection_authority_record: Pubkey,
    pub delegate_authority: Pubkey,
    pub revoke_authority: Pubkey,
    pub metadata: Pubkey,
    pub mint: Pubkey,
}

pub fn revoke_collection_authority(
    program_id: &Pubkey,
    accounts: &RevokeCollectionAuthorityAccounts,
) -> Instruction {
    let instruction = RevokeCollectionAuthority {
        collection_authority_record: accounts.collection_authority_record,
        delegate_authority: accounts.delegate_authority,
        revoke_authority: accounts.revoke_authority,
        metadata: accounts.metadata,
        mint: accounts.mint,
    }
    .instruction();
    retarget(instruction, program_id)
}

#[derive(Debug, Clone)]
pub struct LockAccounts {
    pub authority: Pubkey,
    pub token_owner: Option<Pubkey>,
    pub token: Pubkey,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub payer: Pubkey,
    pub system_program: Pubkey,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

pub fn lock_v1(
    program_id: &Pubkey,
    accounts: &LockAccounts,
    authorization_data: Option<&AuthorizationData>,
) -> Instruction {
    let instruction = LockV1 {
        authority: accounts.authority,
        token_owner: accounts.token_owner,
        token: accounts.token,
        mint: accounts.mint,
        metadata: accounts.metadata,
        edition: accounts.edition,
        token_record: accounts.token_record,
        payer: accounts.payer,
        system_program: accounts.system_program,
        sysvar_instructions: SYSVAR_INSTRUCTIONS_ID,
        spl_token_program: accounts.spl_token_program,
        authorization_rules_program: accounts.authorization_rules_program,
        authorization_rules: accounts.authorization_rules,
    }
    .instruction(LockV1InstructionArgs {
        authorization_data: authorization_data.map(Into::into),
    });
    retarget(instruction, program_id)
}

pub fn unlock_v1(
    program_id: &Pubkey,
    accounts: &LockAccounts,
    authorization_data: Option<&AuthorizationData>,
) -> Instruction {
    let instruction = UnlockV1 {
        authority: accounts.authority,
        token_owner: accounts.token_owner,
        token: accounts.token,
        mint: accounts.mint,
        metadata: accounts.metadata,
        edition: accounts.edition,
        token_record: accounts.token_record,
        payer: accounts.payer,
        system_program: accounts.system_program,
        sysvar_instructions: SYSVAR_INSTRUCTIONS_ID,
        spl_token_program: accounts.spl_token_program,
        authorization_rules_program: accounts.authorization_rules_program,
        authorization_rules: accounts.authorization_rules,
    }
    .instruction(UnlockV1InstructionArgs {
        authorization_data: authorization_data.map(Into::into),
    });
    retarget(instruction, program_id)
}
