use async_trait::async_trait;
use log::{debug, warn};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{MASTER_EDITION_V2_KEY, MAX_MULTIPLE_ACCOUNTS},
    domain::{
        account_query::MetadataAccountQuery,
        pda::{find_master_edition_pda, find_metadata_pda},
        OperationHandler, Scope,
    },
    models::{ClientContext, ClientError, MasterEditionInfo, MetadataAccount, Nft},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindNftByMintInput {
    pub mint: Pubkey,
    /// Fetch the off-chain JSON document the metadata URI points to.
    pub load_json: bool,
}

impl FindNftByMintInput {
    pub fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            load_json: true,
        }
    }

    pub fn without_json(mut self) -> Self {
        self.load_json = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindNftsByCreatorInput {
    pub creator: Pubkey,
    /// One-based position in the creators array.
    pub position: usize,
}

impl FindNftsByCreatorInput {
    pub fn new(creator: Pubkey) -> Self {
        Self {
            creator,
            position: 1,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindNftsByUpdateAuthorityInput {
    pub update_authority: Pubkey,
}

/// Fetches and decodes the metadata accounts at `addresses`, skipping the missing ones.
///
/// Requests are batched to the provider's per-call account limit and cancellation is
/// checked before each batch.
pub async fn load_metadata_accounts(
    ctx: &ClientContext,
    scope: &Scope,
    addresses: &[Pubkey],
) -> Result<Vec<MetadataAccount>, ClientError> {
    let commitment = scope.confirm_options(ctx).commitment;
    let mut metadata = Vec::with_capacity(addresses.len());

    for batch in addresses.chunks(MAX_MULTIPLE_ACCOUNTS) {
        scope.throw_if_canceled()?;
        let accounts = ctx
            .provider
            .get_multiple_accounts(batch, commitment)
            .await?;

        for (address, account) in batch.iter().zip(accounts) {
            match account {
                Some(account) => {
                    metadata.push(MetadataAccount::from_account_data(*address, &account.data)?)
                }
                None => debug!("Metadata account {} does not exist, skipping", address),
            }
        }
    }

    Ok(metadata)
}

pub struct FindNftByMintHandler;

#[async_trait]
impl OperationHandler<FindNftByMintInput, Nft> for FindNftByMintHandler {
    async fn handle(
        &self,
        input: FindNftByMintInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<Nft, ClientError> {
        let program = scope.programs(ctx).token_metadata()?;
        let metadata_address = find_metadata_pda(&program, &input.mint)?.address;
        let edition_address = find_master_edition_pda(&program, &input.mint)?.address;

        scope.throw_if_canceled()?;
        let mut accounts = ctx
            .provider
            .get_multiple_accounts(
                &[metadata_address, edition_address],
                scope.confirm_options(ctx).commitment,
            )
            .await?
            .into_iter();

        let metadata_account = accounts
            .next()
            .flatten()
            .ok_or(ClientError::AccountNotFound(metadata_address))?;
        let metadata = MetadataAccount::from_account_data(metadata_address, &metadata_account.data)?;

        // print editions share the seed but carry a different account key
        let edition = match accounts.next().flatten() {
            Some(account) if account.data.first() == Some(&MASTER_EDITION_V2_KEY) => Some(
                MasterEditionInfo::from_account_data(edition_address, &account.data)?,
            ),
            _ => None,
        };

        let json = if input.load_json && !metadata.uri.is_empty() {
            scope.throw_if_canceled()?;
            match ctx.json_fetcher.fetch_json(&metadata.uri).await {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!("Failed to load JSON metadata from {}: {}", metadata.uri, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Nft {
            metadata,
            edition,
            json,
        })
    }
}

pub struct FindNftsByCreatorHandler;

#[async_trait]
impl OperationHandler<FindNftsByCreatorInput, Vec<MetadataAccount>> for FindNftsByCreatorHandler {
    async fn handle(
        &self,
        input: FindNftsByCreatorInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<Vec<MetadataAccount>, ClientError> {
        let program = scope.programs(ctx).token_metadata()?;
        let query = MetadataAccountQuery::new(program)
            .where_metadata_v1()
            .where_creator(input.position, &input.creator)?
            .select_mint();

        scope.throw_if_canceled()?;
        let mints = query.get_data_as_pubkeys(ctx.provider.as_ref()).await?;
        debug!(
            "Found {} mints with creator {} at position {}",
            mints.len(),
            input.creator,
            input.position
        );

        let addresses = mints
            .iter()
            .map(|mint| find_metadata_pda(&program, mint).map(|pda| pda.address))
            .collect::<Result<Vec<_>, _>>()?;

        load_metadata_accounts(ctx, scope, &addresses).await
    }
}

pub struct FindNftsByUpdateAuthorityHandler;

#[async_trait]
impl OperationHandler<FindNftsByUpdateAuthorityInput, Vec<MetadataAccount>>
    for FindNftsByUpdateAuthorityHandler
{
    async fn handle(
        &self,
        input: FindNftsByUpdateAuthorityInput,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<Vec<MetadataAccount>, ClientError> {
        let program = scope.programs(ctx).token_metadata()?;
        let query = MetadataAccountQuery::new(program)
            .where_metadata_v1()
            .where_update_authority(&input.update_authority);

        scope.throw_if_canceled()?;
        query
            .get(ctx.provider.as_ref())
            .await?
            .into_iter()
            .map(|(address, account)| MetadataAccount::from_account_data(address, &account.data))
            .collect()
    }
}
