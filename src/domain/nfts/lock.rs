use async_trait::async_trait;
use log::info;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use super::send_builder;
use crate::{
    domain::{
        authority::resolve_authority,
        instructions::metadata::{lock_v1, unlock_v1, LockAccounts},
        pda::{find_master_edition_pda, find_metadata_pda, find_token_record_pda},
        InstructionWithSigners, OperationHandler, Scope, SendAndConfirmResponse,
        TransactionBuilder,
    },
    models::{Authority, AuthorizationDetails, ClientContext, ClientError, SignerRef},
    services::ProgramRegistry,
};

#[derive(Clone)]
pub struct LockNftInput {
    pub mint: Pubkey,
    pub authority: Authority,
    /// Token account to lock, required unless the authority already names one.
    pub token: Option<Pubkey>,
    pub token_owner: Option<Pubkey>,
    /// Programmable assets track lock state in a token record.
    pub programmable: bool,
    pub authorization: Option<AuthorizationDetails>,
    pub payer: Option<SignerRef>,
}

impl LockNftInput {
    pub fn new(mint: Pubkey, authority: Authority) -> Self {
        Self {
            mint,
            authority,
            token: None,
            token_owner: None,
            programmable: false,
            authorization: None,
            payer: None,
        }
    }
}

/// Unlocking takes exactly the same accounts as locking.
pub type UnlockNftInput = LockNftInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockAction {
    Lock,
    Unlock,
}

fn lock_builder(
    action: LockAction,
    programs: &ProgramRegistry,
    input: &LockNftInput,
    payer: &SignerRef,
) -> Result<TransactionBuilder, ClientError> {
    let program = programs.token_metadata()?;
    let resolved = resolve_authority(
        &input.mint,
        &input.authority,
        input.authorization.as_ref(),
        programs,
    )?;

    let token = resolved
        .accounts
        .token
        .or(input.token)
        .ok_or_else(|| ClientError::MissingInput("token".to_string()))?;
    let token_record = match resolved.accounts.delegate_record {
        Some(record) if matches!(input.authority, Authority::TokenDelegate { .. }) => Some(record),
        _ if input.programmable => {
            Some(find_token_record_pda(&program, &input.mint, &token)?.address)
        }
        _ => None,
    };
    let token_owner = match &input.authority {
        Authority::TokenDelegate { owner, .. } => Some(*owner),
        Authority::Holder { owner, .. } => Some(owner.pubkey()),
        _ => input.token_owner,
    };
    let authorization_rules_program = resolved
        .accounts
        .authorization_rules
        .map(|_| programs.token_auth_rules())
        .transpose()?;

    let accounts = LockAccounts {
        authority: resolved.accounts.authority,
        token_owner,
        token,
        mint: input.mint,
        metadata: find_metadata_pda(&program, &input.mint)?.address,
        edition: Some(find_master_edition_pda(&program, &input.mint)?.address),
        token_record,
        payer: payer.pubkey(),
        system_program: programs.system()?,
        spl_token_program: Some(programs.token()?),
        authorization_rules_program,
        authorization_rules: resolved.accounts.authorization_rules,
    };

    let authorization_data = resolved.data.authorization_data.as_ref();
    let (instruction, key) = match action {
        LockAction::Lock => (lock_v1(&program, &accounts, authorization_data), "lock"),
        LockAction::Unlock => (unlock_v1(&program, &accounts, authorization_data), "unlock"),
    };

    let mut signers = resolved.signers;
    signers.push(payer.clone());

    Ok(TransactionBuilder::make()
        .set_fee_payer(payer.clone())
        .add(InstructionWithSigners::new(instruction, signers).with_key(key)))
}

pub fn lock_nft_builder(
    programs: &ProgramRegistry,
    input: &LockNftInput,
    payer: &SignerRef,
) -> Result<TransactionBuilder, ClientError> {
    lock_builder(LockAction::Lock, programs, input, payer)
}

pub fn unlock_nft_builder(
    programs: &ProgramRegistry,
    input: &UnlockNftInput,
    payer: &SignerRef,
) -> Result<TransactionBuilder, ClientError> {
    lock_builder(LockAction::Unlock, programs, input, payer)
}

pub struct LockNftHandler;

#[async_trait]
impl OperationHandler<LockNftInput, SendAndConfirmResponse> for LockNftHandler {
    async fn handle(
        &self,
        input: LockNftInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        let payer = ctx.payer_or_default(input.payer.clone())?;
        let builder = lock_nft_builder(scope.programs(ctx), &input, &payer)?;
        let response = send_builder(builder, ctx, scope).await?;
        info!("Locked NFT {} ({})", input.mint, response.signature);
        Ok(response)
    }
}

pub struct UnlockNftHandler;

#[async_trait]
impl OperationHandler<UnlockNftInput, SendAndConfirmResponse> for UnlockNftHandler {
    async fn handle(
        &self,
        input: UnlockNftInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        let payer = ctx.payer_or_default(input.payer.clone())?;
        let builder = unlock_nft_builder(scope.programs(ctx), &input, &payer)?;
        let response = send_builder(builder, ctx, scope).await?;
        info!("Unlocked NFT {} ({})", input.mint, response.signature);
        Ok(response)
    }
}
