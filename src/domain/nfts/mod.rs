//! Asset-level operations composed from derivation, authority resolution, transaction
//! building and account scans.
//!
//! Every operation exposes a pure `*_builder` function and a handler registered under
//! its key by [`register_nft_operations`].

mod create;
pub use create::*;

mod find;
pub use find::*;

mod update;
pub use update::*;

mod lock;
pub use lock::*;

mod collection_authority;
pub use collection_authority::*;

use crate::{
    domain::{Operation, OperationDispatcher, Scope, SendAndConfirmResponse, TransactionBuilder},
    models::{ClientContext, ClientError, MetadataAccount, Nft},
};

pub const CREATE_NFT: Operation<CreateNftInput, CreateNftOutput> = Operation::new("create_nft");
pub const FIND_NFT_BY_MINT: Operation<FindNftByMintInput, Nft> =
    Operation::new("find_nft_by_mint");
pub const FIND_NFTS_BY_CREATOR: Operation<FindNftsByCreatorInput, Vec<MetadataAccount>> =
    Operation::new("find_nfts_by_creator");
pub const FIND_NFTS_BY_UPDATE_AUTHORITY: Operation<
    FindNftsByUpdateAuthorityInput,
    Vec<MetadataAccount>,
> = Operation::new("find_nfts_by_update_authority");
pub const UPDATE_NFT: Operation<UpdateNftInput, SendAndConfirmResponse> =
    Operation::new("update_nft");
pub const LOCK_NFT: Operation<LockNftInput, SendAndConfirmResponse> = Operation::new("lock_nft");
pub const UNLOCK_NFT: Operation<UnlockNftInput, SendAndConfirmResponse> =
    Operation::new("unlock_nft");
pub const APPROVE_COLLECTION_AUTHORITY: Operation<
    ApproveCollectionAuthorityInput,
    SendAndConfirmResponse,
> = Operation::new("approve_collection_authority");
pub const REVOKE_COLLECTION_AUTHORITY: Operation<
    RevokeCollectionAuthorityInput,
    SendAndConfirmResponse,
> = Operation::new("revoke_collection_authority");

pub fn register_nft_operations(dispatcher: &mut OperationDispatcher) -> Result<(), ClientError> {
    dispatcher.register(CREATE_NFT, CreateNftHandler)?;
    dispatcher.register(FIND_NFT_BY_MINT, FindNftByMintHandler)?;
    dispatcher.register(FIND_NFTS_BY_CREATOR, FindNftsByCreatorHandler)?;
    dispatcher.register(FIND_NFTS_BY_UPDATE_AUTHORITY, FindNftsByUpdateAuthorityHandler)?;
    dispatcher.register(UPDATE_NFT, UpdateNftHandler)?;
    dispatcher.register(LOCK_NFT, LockNftHandler)?;
    dispatcher.register(UNLOCK_NFT, UnlockNftHandler)?;
    dispatcher.register(APPROVE_COLLECTION_AUTHORITY, ApproveCollectionAuthorityHandler)?;
    dispatcher.register(REVOKE_COLLECTION_AUTHORITY, RevokeCollectionAuthorityHandler)?;
    Ok(())
}

/// Submits `builder` and confirms it with the scope's settings.
///
/// The scope is checked before submitting and again before confirming. A cancellation
/// after submission cannot undo the transaction, it only skips the confirmation wait.
async fn send_builder(
    builder: TransactionBuilder,
    ctx: &ClientContext,
    scope: &Scope,
) -> Result<SendAndConfirmResponse, ClientError> {
    let options = scope.confirm_options(ctx);
    let provider = ctx.provider.as_ref();

    scope.throw_if_canceled()?;
    let sent = builder.send(provider, &options).await?;
    scope.throw_if_canceled()?;
    sent.confirm(provider, &options).await
}
