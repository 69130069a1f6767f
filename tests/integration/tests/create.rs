use solana_sdk::{signature::Keypair, signer::Signer};
use std::sync::Arc;
use token_metadata_client::{
    constants::{SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID},
    domain::{
        nfts::CreateNftInput,
        pda::{find_master_edition_pda, find_metadata_pda},
        MINT_ADDRESS_KEY,
    },
    models::{signer_ref, ClientError},
};

use crate::integration::common::{fixtures::create_client, ledger::InMemoryLedger};

#[tokio::test]
async fn test_create_nft_submits_single_signed_transaction() {
    let ledger = Arc::new(InMemoryLedger::new());
    let identity = signer_ref(Keypair::new());
    let client = create_client(ledger.clone(), Some(identity.clone()));

    let output = client
        .nfts()
        .create(CreateNftInput::new(
            "https://example.com/nft.json",
            "Integration NFT",
            250,
        ))
        .await
        .unwrap();

    let sent = ledger.sent_transactions();
    assert_eq!(sent.len(), 1);
    let transaction = &sent[0];
    assert_eq!(transaction.message.recent_blockhash, ledger.blockhash());
    assert_eq!(transaction.message.instructions.len(), 6);
    assert_eq!(transaction.message.account_keys[0], identity.pubkey());
    assert_eq!(transaction.signatures.len(), 2);
    assert_eq!(output.response.signature, transaction.signatures[0]);

    let keys = &transaction.message.account_keys;
    let instructions = &transaction.message.instructions;
    assert_eq!(*instructions[0].program_id(keys), SYSTEM_PROGRAM_ID);
    assert_eq!(*instructions[5].program_id(keys), TOKEN_METADATA_PROGRAM_ID);

    assert_eq!(
        output.metadata,
        find_metadata_pda(&TOKEN_METADATA_PROGRAM_ID, &output.mint)
            .unwrap()
            .address
    );
    assert_eq!(
        output.master_edition,
        find_master_edition_pda(&TOKEN_METADATA_PROGRAM_ID, &output.mint)
            .unwrap()
            .address
    );
    assert_eq!(
        output.response.context.get_pubkey(MINT_ADDRESS_KEY),
        Some(output.mint)
    );
}

#[tokio::test]
async fn test_create_nft_with_separate_payer() {
    let ledger = Arc::new(InMemoryLedger::new());
    let identity = signer_ref(Keypair::new());
    let payer = signer_ref(Keypair::new());
    let client = create_client(ledger.clone(), Some(identity.clone())).with_payer(payer.clone());

    client
        .nfts()
        .create(CreateNftInput::new(
            "https://example.com/nft.json",
            "Sponsored NFT",
            0,
        ))
        .await
        .unwrap();

    let transaction = &ledger.sent_transactions()[0];
    assert_eq!(transaction.message.account_keys[0], payer.pubkey());
    // payer, mint and identity all sign
    assert_eq!(transaction.signatures.len(), 3);
}

#[tokio::test]
async fn test_create_nft_without_identity_sends_nothing() {
    let ledger = Arc::new(InMemoryLedger::new());
    let client = create_client(ledger.clone(), None);

    let result = client
        .nfts()
        .create(CreateNftInput::new("https://example.com/nft.json", "No Identity", 0))
        .await;

    assert!(matches!(result, Err(ClientError::MissingInput(_))));
    assert!(ledger.sent_transactions().is_empty());
}
