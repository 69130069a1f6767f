use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use token_metadata_client::{
    domain::nfts::FindNftByMintInput,
    models::{ClientError, Creator},
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::integration::common::{
    fixtures::{create_client, seed_metadata},
    ledger::InMemoryLedger,
};

fn creator(address: Pubkey, share: u8) -> Creator {
    Creator {
        address,
        verified: true,
        share,
    }
}

#[tokio::test]
async fn test_find_by_mint_loads_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nft.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "Found", "image": "a.png"})),
        )
        .mount(&mock_server)
        .await;

    let ledger = Arc::new(InMemoryLedger::new());
    let update_authority = Pubkey::new_unique();
    let mint = seed_metadata(
        &ledger,
        &update_authority,
        "Found",
        &format!("{}/nft.json", mock_server.uri()),
        &[],
    );
    let client = create_client(ledger, None);

    let nft = client
        .nfts()
        .find_by_mint(FindNftByMintInput::new(mint))
        .await
        .unwrap();

    assert_eq!(nft.metadata.mint, mint);
    assert_eq!(nft.metadata.name, "Found");
    assert_eq!(nft.metadata.update_authority, update_authority);
    assert!(nft.edition.is_none());
    assert_eq!(nft.json.unwrap()["image"], "a.png");
}

#[tokio::test]
async fn test_find_by_mint_with_unreachable_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let ledger = Arc::new(InMemoryLedger::new());
    let mint = seed_metadata(
        &ledger,
        &Pubkey::new_unique(),
        "No JSON",
        &format!("{}/broken.json", mock_server.uri()),
        &[],
    );
    let client = create_client(ledger, None);

    let nft = client
        .nfts()
        .find_by_mint(FindNftByMintInput::new(mint))
        .await
        .unwrap();

    assert_eq!(nft.metadata.name, "No JSON");
    assert!(nft.json.is_none());
}

#[tokio::test]
async fn test_find_by_mint_unknown_mint() {
    let client = create_client(Arc::new(InMemoryLedger::new()), None);

    let result = client
        .nfts()
        .find_by_mint(FindNftByMintInput::new(Pubkey::new_unique()).without_json())
        .await;

    assert!(matches!(result, Err(ClientError::AccountNotFound(_))));
}

#[tokio::test]
async fn test_find_all_by_creator_matches_position() {
    let ledger = Arc::new(InMemoryLedger::new());
    let artist = Pubkey::new_unique();
    let other = Pubkey::new_unique();
    let update_authority = Pubkey::new_unique();
    let uri = "https://example.com/nft.json";

    let first = seed_metadata(&ledger, &update_authority, "First", uri, &[creator(artist, 100)]);
    let second = seed_metadata(
        &ledger,
        &update_authority,
        "Second",
        uri,
        &[creator(other, 50), creator(artist, 50)],
    );
    seed_metadata(&ledger, &update_authority, "Unrelated", uri, &[creator(other, 100)]);
    let client = create_client(ledger, None);

    let at_first = client.nfts().find_all_by_creator(artist, 1).await.unwrap();
    let at_second = client.nfts().find_all_by_creator(artist, 2).await.unwrap();

    assert_eq!(at_first.len(), 1);
    assert_eq!(at_first[0].mint, first);
    assert_eq!(at_second.len(), 1);
    assert_eq!(at_second[0].mint, second);
}

#[tokio::test]
async fn test_find_all_by_update_authority() {
    let ledger = Arc::new(InMemoryLedger::new());
    let update_authority = Pubkey::new_unique();
    let uri = "https://example.com/nft.json";
    seed_metadata(&ledger, &update_authority, "One", uri, &[]);
    seed_metadata(&ledger, &update_authority, "Two", uri, &[]);
    seed_metadata(&ledger, &Pubkey::new_unique(), "Other", uri, &[]);
    let client = create_client(ledger, None);

    let mut names: Vec<String> = client
        .nfts()
        .find_all_by_update_authority(update_authority)
        .await
        .unwrap()
        .into_iter()
        .map(|nft| nft.name)
        .collect();
    names.sort();

    assert_eq!(names, vec!["One", "Two"]);
}
