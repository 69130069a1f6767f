use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use std::sync::Arc;
use token_metadata_client::{
    constants::TOKEN_METADATA_PROGRAM_ID,
    domain::{
        nfts::{
            ApproveCollectionAuthorityInput, CollectionUpdate, FindNftByMintInput,
            UpdateNftInput,
        },
        pda::find_collection_authority_record_pda,
        Scope,
    },
    models::{signer_ref, ClientError, Creator},
};

use crate::integration::common::{
    fixtures::{create_client, seed_metadata},
    ledger::InMemoryLedger,
};

#[tokio::test]
async fn test_update_only_sends_changes() {
    let ledger = Arc::new(InMemoryLedger::new());
    let identity = signer_ref(Keypair::new());
    let mint = seed_metadata(
        &ledger,
        &identity.pubkey(),
        "Before",
        "https://example.com/nft.json",
        &[Creator {
            address: identity.pubkey(),
            verified: true,
            share: 100,
        }],
    );
    let client = create_client(ledger.clone(), Some(identity.clone()));
    let nft = client
        .nfts()
        .find_by_mint(FindNftByMintInput::new(mint).without_json())
        .await
        .unwrap();

    let mut unchanged = UpdateNftInput::new(nft.metadata.clone());
    unchanged.name = Some("Before".to_string());
    let result = client.nfts().update(unchanged).await;
    assert!(matches!(result, Err(ClientError::NoInstructionsToSend)));
    assert!(ledger.sent_transactions().is_empty());

    let mut renamed = UpdateNftInput::new(nft.metadata);
    renamed.name = Some("After".to_string());
    renamed.collection = CollectionUpdate::Set(Pubkey::new_unique());
    renamed.collection_authority = Some(identity.clone());
    client.nfts().update(renamed).await.unwrap();

    let sent = ledger.sent_transactions();
    assert_eq!(sent.len(), 1);
    // update, then verification of the new collection
    assert_eq!(sent[0].message.instructions.len(), 2);
}

#[tokio::test]
async fn test_approve_collection_authority_targets_record() {
    let ledger = Arc::new(InMemoryLedger::new());
    let identity = signer_ref(Keypair::new());
    let client = create_client(ledger.clone(), Some(identity));
    let collection_mint = Pubkey::new_unique();
    let delegate = Pubkey::new_unique();

    client
        .nfts()
        .approve_collection_authority(ApproveCollectionAuthorityInput::new(
            collection_mint,
            delegate,
        ))
        .await
        .unwrap();

    let record = find_collection_authority_record_pda(
        &TOKEN_METADATA_PROGRAM_ID,
        &collection_mint,
        &delegate,
    )
    .unwrap();
    let transaction = &ledger.sent_transactions()[0];
    assert!(transaction.message.account_keys.contains(&record.address));
}

#[tokio::test]
async fn test_cancelled_scope_sends_nothing() {
    let ledger = Arc::new(InMemoryLedger::new());
    let identity = signer_ref(Keypair::new());
    let client = create_client(ledger.clone(), Some(identity));
    let scope = Scope::new();
    scope.cancel();

    let result = client
        .nfts()
        .with_scope(scope)
        .approve_collection_authority(ApproveCollectionAuthorityInput::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        ))
        .await;

    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert!(ledger.sent_transactions().is_empty());
}
