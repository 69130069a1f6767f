use async_trait::async_trait;
use log::info;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use super::send_builder;
use crate::{
    domain::{
        instructions::metadata::{
            approve_collection_authority, revoke_collection_authority,
            ApproveCollectionAuthorityAccounts, RevokeCollectionAuthorityAccounts,
        },
        pda::{find_collection_authority_record_pda, find_metadata_pda},
        InstructionWithSigners, OperationHandler, Scope, SendAndConfirmResponse,
        TransactionBuilder,
    },
    models::{ClientContext, ClientError, SignerRef},
    services::ProgramRegistry,
};

#[derive(Clone)]
pub struct ApproveCollectionAuthorityInput {
    /// Mint of the collection parent.
    pub mint: Pubkey,
    pub collection_authority: Pubkey,
    pub update_authority: Option<SignerRef>,
    pub payer: Option<SignerRef>,
}

impl ApproveCollectionAuthorityInput {
    pub fn new(mint: Pubkey, collection_authority: Pubkey) -> Self {
        Self {
            mint,
            collection_authority,
            update_authority: None,
            payer: None,
        }
    }
}

#[derive(Clone)]
pub struct RevokeCollectionAuthorityInput {
    pub mint: Pubkey,
    pub collection_authority: Pubkey,
    /// Either the update authority or the delegated authority itself.
    pub revoke_authority: Option<SignerRef>,
    pub payer: Option<SignerRef>,
}

impl RevokeCollectionAuthorityInput {
    pub fn new(mint: Pubkey, collection_authority: Pubkey) -> Self {
        Self {
            mint,
            collection_authority,
            revoke_authority: None,
            payer: None,
        }
    }
}

pub fn approve_collection_authority_builder(
    programs: &ProgramRegistry,
    input: &ApproveCollectionAuthorityInput,
    update_authority: &SignerRef,
    payer: &SignerRef,
) -> Result<TransactionBuilder, ClientError> {
    let program = programs.token_metadata()?;
    let record =
        find_collection_authority_record_pda(&program, &input.mint, &input.collection_authority)?;

    let instruction = approve_collection_authority(
        &program,
        &ApproveCollectionAuthorityAccounts {
            collection_authority_record: record.address,
            new_collection_authority: input.collection_authority,
            update_authority: update_authority.pubkey(),
            payer: payer.pubkey(),
            metadata: find_metadata_pda(&program, &input.mint)?.address,
            mint: input.mint,
            system_program: programs.system()?,
        },
    );

    Ok(TransactionBuilder::make().set_fee_payer(payer.clone()).add(
        InstructionWithSigners::new(instruction, vec![payer.clone(), update_authority.clone()])
            .with_key("approveCollectionAuthority"),
    ))
}

pub fn revoke_collection_authority_builder(
    programs: &ProgramRegistry,
    input: &RevokeCollectionAuthorityInput,
    revoke_authority: &SignerRef,
    payer: &SignerRef,
) -> Result<TransactionBuilder, ClientError> {
    let program = programs.token_metadata()?;
    let record =
        find_collection_authority_record_pda(&program, &input.mint, &input.collection_authority)?;

    let instruction = revoke_collection_authority(
        &program,
        &RevokeCollectionAuthorityAccounts {
            collection_authority_record: record.address,
            delegate_authority: input.collection_authority,
            revoke_authority: revoke_authority.pubkey(),
            metadata: find_metadata_pda(&program, &input.mint)?.address,
            mint: input.mint,
        },
    );

    Ok(TransactionBuilder::make().set_fee_payer(payer.clone()).add(
        InstructionWithSigners::new(instruction, vec![revoke_authority.clone()])
            .with_key("revokeCollectionAuthority"),
    ))
}

pub struct ApproveCollectionAuthorityHandler;

#[async_trait]
impl OperationHandler<ApproveCollectionAuthorityInput, SendAndConfirmResponse>
    for ApproveCollectionAuthorityHandler
{
    async fn handle(
        &self,
        input: ApproveCollectionAuthorityInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        let update_authority = ctx.identity_or_default(input.update_authority.clone())?;
        let payer = ctx.payer_or_default(input.payer.clone())?;

        let builder = approve_collection_authority_builder(
            scope.programs(ctx),
            &input,
            &update_authority,
            &payer,
        )?;
        let response = send_builder(builder, ctx, scope).await?;
        info!(
            "Approved collection authority {} on {}",
            input.collection_authority, input.mint
        );
        Ok(response)
    }
}

pub struct RevokeCollectionAuthorityHandler;

#[async_trait]
impl OperationHandler<RevokeCollectionAuthorityInput, SendAndConfirmResponse>
    for RevokeCollectionAuthorityHandler
{
    async fn handle(
        &self,
        input: RevokeCollectionAuthorityInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        let revoke_authority = ctx.identity_or_default(input.revoke_authority.clone())?;
        let payer = ctx.payer_or_default(input.payer.clone())?;

        let builder = revoke_collection_authority_builder(
            scope.programs(ctx),
            &input,
            &revoke_authority,
            &payer,
        )?;
        let response = send_builder(builder, ctx, scope).await?;
        info!(
            "Revoked collection authority {} on {}",
            input.collection_authority, input.mint
        );
        Ok(response)
    }
}
