//! Mint and token account instructions used while composing asset operations.

use solana_sdk::{instruction::Instruction, program_pack::Pack, pubkey::Pubkey};
use solana_system_interface::instruction as system_instruction;
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};
use spl_token::{instruction as spl_token_instruction, state::Mint};

use crate::models::ClientError;

/// Space allocated for a mint account.
pub const MINT_ACCOUNT_SIZE: usize = Mint::LEN;

/// Allocates `mint` with rent-exempt `lamports` and assigns it to the token program.
pub fn create_mint_account(
    payer: &Pubkey,
    mint: &Pubkey,
    lamports: u64,
    token_program: &Pubkey,
) -> Instruction {
    system_instruction::create_account(
        payer,
        mint,
        lamports,
        MINT_ACCOUNT_SIZE as u64,
        token_program,
    )
}

pub fn initialize_mint(
    token_program: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
    decimals: u8,
) -> Result<Instruction, ClientError> {
    spl_token_instruction::initialize_mint2(
        token_program,
        mint,
        mint_authority,
        freeze_authority,
        decimals,
    )
    .map_err(|e| ClientError::Validation(format!("Invalid initialize mint instruction: {e}")))
}

/// Creates the owner's associated token account unless it already exists.
///
/// Returns the instruction and the associated token address.
pub fn create_associated_token_account(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> (Instruction, Pubkey) {
    let address = get_associated_token_address_with_program_id(owner, mint, token_program);
    let instruction = create_associated_token_account_idempotent(payer, owner, mint, token_program);
    (instruction, address)
}

pub fn mint_to(
    token_program: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, ClientError> {
    spl_token_instruction::mint_to(token_program, mint, destination, authority, &[], amount)
        .map_err(|e| ClientError::Validation(format!("Invalid mint to instruction: {e}")))
}
