use async_trait::async_trait;
use log::{debug, info};
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use super::send_builder;
use crate::{
    domain::{
        instructions::metadata::{
            unverify_collection, update_metadata_account_v2, verify_collection,
            CollectionVerificationAccounts, MetadataData, UpdateMetadataArgs,
        },
        pda::{find_master_edition_pda, find_metadata_pda},
        InstructionWithSigners, OperationHandler, Scope, SendAndConfirmResponse,
        TransactionBuilder,
    },
    models::{
        ClientContext, ClientError, CollectionLink, Creator, MetadataAccount, SignerRef, Uses,
    },
    services::ProgramRegistry,
};

/// What to do with the collection an asset belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionUpdate {
    #[default]
    Keep,
    Set(Pubkey),
    Remove,
}

/// Fields left as `None` keep their current on-chain value.
#[derive(Clone)]
pub struct UpdateNftInput {
    /// Current state of the asset, as returned by a find operation.
    pub nft: MetadataAccount,
    pub update_authority: Option<SignerRef>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
    pub seller_fee_basis_points: Option<u16>,
    pub creators: Option<Vec<Creator>>,
    pub uses: Option<Uses>,
    pub new_update_authority: Option<Pubkey>,
    pub primary_sale_happened: Option<bool>,
    pub is_mutable: Option<bool>,
    pub collection: CollectionUpdate,
    /// Signs the verification of the new collection. Without it the new collection stays
    /// unverified.
    pub collection_authority: Option<SignerRef>,
    /// Signs the unverification of the current collection, the update authority by
    /// default.
    pub old_collection_authority: Option<SignerRef>,
    pub payer: Option<SignerRef>,
}

impl UpdateNftInput {
    pub fn new(nft: MetadataAccount) -> Self {
        Self {
            nft,
            update_authority: None,
            name: None,
            symbol: None,
            uri: None,
            seller_fee_basis_points: None,
            creators: None,
            uses: None,
            new_update_authority: None,
            primary_sale_happened: None,
            is_mutable: None,
            collection: CollectionUpdate::Keep,
            collection_authority: None,
            old_collection_authority: None,
            payer: None,
        }
    }
}

pub struct UpdateNftSigners {
    pub payer: SignerRef,
    pub update_authority: SignerRef,
}

fn changed<T: PartialEq>(new: &Option<T>, current: &T) -> bool {
    new.as_ref().is_some_and(|value| value != current)
}

/// New collection link, or `None` when the collection is kept.
fn collection_change(input: &UpdateNftInput) -> Option<Option<CollectionLink>> {
    let current = input.nft.collection.as_ref().map(|link| link.key);
    match input.collection {
        CollectionUpdate::Keep => None,
        CollectionUpdate::Set(key) if current == Some(key) => None,
        CollectionUpdate::Set(key) => Some(Some(CollectionLink {
            key,
            verified: false,
        })),
        CollectionUpdate::Remove if current.is_none() => None,
        CollectionUpdate::Remove => Some(None),
    }
}

/// Full data for the update instruction, only when a data field actually changes.
fn updated_data(input: &UpdateNftInput) -> Option<MetadataData> {
    let nft = &input.nft;
    let collection = collection_change(input);
    let data_changed = changed(&input.name, &nft.name)
        || changed(&input.symbol, &nft.symbol)
        || changed(&input.uri, &nft.uri)
        || changed(&input.seller_fee_basis_points, &nft.seller_fee_basis_points)
        || changed(&input.creators, &nft.creators)
        || input
            .uses
            .as_ref()
            .is_some_and(|uses| nft.uses.as_ref() != Some(uses))
        || collection.is_some();
    if !data_changed {
        return None;
    }

    let creators = input.creators.clone().unwrap_or_else(|| nft.creators.clone());
    Some(MetadataData {
        name: input.name.clone().unwrap_or_else(|| nft.name.clone()),
        symbol: input.symbol.clone().unwrap_or_else(|| nft.symbol.clone()),
        uri: input.uri.clone().unwrap_or_else(|| nft.uri.clone()),
        seller_fee_basis_points: input
            .seller_fee_basis_points
            .unwrap_or(nft.seller_fee_basis_points),
        creators: (!creators.is_empty()).then_some(creators),
        collection: collection.unwrap_or_else(|| nft.collection.clone()),
        uses: input.uses.clone().or_else(|| nft.uses.clone()),
    })
}

fn collection_accounts(
    programs: &ProgramRegistry,
    nft: &MetadataAccount,
    collection_mint: &Pubkey,
    collection_authority: &SignerRef,
    payer: &SignerRef,
) -> Result<CollectionVerificationAccounts, ClientError> {
    let program = programs.token_metadata()?;
    Ok(CollectionVerificationAccounts {
        metadata: nft.address,
        collection_authority: collection_authority.pubkey(),
        payer: payer.pubkey(),
        collection_mint: *collection_mint,
        collection_metadata: find_metadata_pda(&program, collection_mint)?.address,
        collection_master_edition: find_master_edition_pda(&program, collection_mint)?.address,
        collection_authority_record: None,
    })
}

/// Unverify the old collection, update the metadata, verify the new collection.
///
/// Each step is included only when it has something to do, so the builder may be empty.
pub fn update_nft_builder(
    programs: &ProgramRegistry,
    input: &UpdateNftInput,
    signers: &UpdateNftSigners,
) -> Result<TransactionBuilder, ClientError> {
    let program = programs.token_metadata()?;
    let nft = &input.nft;

    let args = UpdateMetadataArgs {
        data: updated_data(input),
        new_update_authority: input
            .new_update_authority
            .filter(|authority| *authority != nft.update_authority),
        primary_sale_happened: input
            .primary_sale_happened
            .filter(|sold| *sold != nft.primary_sale_happened),
        is_mutable: input.is_mutable.filter(|mutable| *mutable != nft.is_mutable),
    };
    let should_update = args.data.is_some()
        || args.new_update_authority.is_some()
        || args.primary_sale_happened.is_some()
        || args.is_mutable.is_some();
    let update = should_update.then(|| {
        let instruction = update_metadata_account_v2(
            &program,
            &nft.address,
            &signers.update_authority.pubkey(),
            &args,
        );
        InstructionWithSigners::new(instruction, vec![signers.update_authority.clone()])
            .with_key("updateMetadata")
    });

    let collection_changes = collection_change(input).is_some();
    let old_verified = nft
        .collection
        .as_ref()
        .filter(|link| link.verified && collection_changes);
    let new_collection = match input.collection {
        CollectionUpdate::Set(key) if collection_changes => input
            .collection_authority
            .as_ref()
            .map(|authority| (key, authority)),
        _ => None,
    };

    let unverify = old_verified
        .map(|link| {
            let authority = input
                .old_collection_authority
                .as_ref()
                .unwrap_or(&signers.update_authority);
            collection_accounts(programs, nft, &link.key, authority, &signers.payer).map(
                |accounts| {
                    InstructionWithSigners::new(
                        unverify_collection(&program, &accounts),
                        vec![authority.clone()],
                    )
                    .with_key("unverifyCollection")
                },
            )
        })
        .transpose()?;
    let verify = new_collection
        .map(|(key, authority)| {
            collection_accounts(programs, nft, &key, authority, &signers.payer).map(|accounts| {
                InstructionWithSigners::new(
                    verify_collection(&program, &accounts),
                    vec![authority.clone(), signers.payer.clone()],
                )
                .with_key("verifyCollection")
            })
        })
        .transpose()?;

    debug!(
        "Update of {}: update={}, unverify={}, verify={}",
        nft.mint,
        update.is_some(),
        unverify.is_some(),
        verify.is_some()
    );

    Ok(TransactionBuilder::make()
        .set_fee_payer(signers.payer.clone())
        .when(update.is_some(), |builder| builder.add(Vec::from_iter(update)))
        .when(unverify.is_some(), |builder| {
            builder.prepend(Vec::from_iter(unverify))
        })
        .when(verify.is_some(), |builder| builder.add(Vec::from_iter(verify))))
}

pub struct UpdateNftHandler;

#[async_trait]
impl OperationHandler<UpdateNftInput, SendAndConfirmResponse> for UpdateNftHandler {
    async fn handle(
        &self,
        input: UpdateNftInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        let signers = UpdateNftSigners {
            payer: ctx.payer_or_default(input.payer.clone())?,
            update_authority: ctx.identity_or_default(input.update_authority.clone())?,
        };

        let builder = update_nft_builder(scope.programs(ctx), &input, &signers)?;
        let response = send_builder(builder, ctx, scope).await?;
        info!("Updated NFT {} ({})", input.nft.mint, response.signature);

        Ok(response)
    }
}
