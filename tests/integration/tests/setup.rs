use serial_test::serial;
use solana_sdk::pubkey::Pubkey;
use std::{env, fs, sync::Arc};
use tempfile::tempdir;
use token_metadata_client::{
    config::ClientConfig,
    domain::{
        nfts::{FindNftsByUpdateAuthorityInput, FIND_NFTS_BY_UPDATE_AUTHORITY},
        OperationDispatcher, Scope,
    },
    models::{ClientContext, ClientError, Cluster},
    services::{HttpJsonFetcher, ProgramRegistry},
    Client,
};

use crate::integration::common::ledger::InMemoryLedger;

#[tokio::test]
async fn test_client_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("client.json");
    fs::write(
        &path,
        r#"{
            "rpc": [{"url": "https://api.devnet.solana.com"}],
            "commitment": "finalized",
            "programs": [
                {"name": "TokenMetadataProgram", "address": "11111111111111111111111111111112"}
            ]
        }"#,
    )
    .unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    let client = Client::from_config(config).unwrap();

    assert_eq!(client.context().cluster, Cluster::Devnet);
    assert_eq!(
        client.context().programs.token_metadata().unwrap().to_string(),
        "11111111111111111111111111111112"
    );
}

#[tokio::test]
#[serial]
async fn test_client_from_env() {
    env::set_var("RPC_URL", "http://localhost:8899");
    env::set_var("CLUSTER", "localnet");

    let config = ClientConfig::from_env().unwrap();
    let client = Client::from_config(config).unwrap();

    assert_eq!(client.context().cluster, Cluster::Localnet);

    env::remove_var("RPC_URL");
    env::remove_var("CLUSTER");
}

#[tokio::test]
async fn test_unregistered_operation() {
    let context = ClientContext::new(
        Arc::new(InMemoryLedger::new()),
        Arc::new(ProgramRegistry::new(Cluster::Localnet)),
        Arc::new(HttpJsonFetcher::new(1).unwrap()),
        ClientConfig::new("http://localhost:8899"),
    );
    let client = Client::with_dispatcher(context, OperationDispatcher::new());

    let result = client
        .execute(
            FIND_NFTS_BY_UPDATE_AUTHORITY,
            FindNftsByUpdateAuthorityInput {
                update_authority: Pubkey::new_unique(),
            },
            &Scope::new(),
        )
        .await;

    assert!(matches!(result, Err(ClientError::UnregisteredOperation(_))));
}
