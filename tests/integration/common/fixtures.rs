use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use token_metadata_client::{
    config::ClientConfig,
    constants::{
        MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, MAX_URI_LENGTH, METADATA_V1_KEY,
        TOKEN_METADATA_PROGRAM_ID,
    },
    domain::pda::find_metadata_pda,
    models::{ClientContext, Cluster, Creator, SignerRef},
    services::{HttpJsonFetcher, ProgramRegistry},
    Client,
};

use super::ledger::InMemoryLedger;

/// Client over `ledger`, with a real HTTP fetcher for metadata JSON.
pub fn create_client(ledger: Arc<InMemoryLedger>, identity: Option<SignerRef>) -> Client {
    let mut config = ClientConfig::new("http://localhost:8899");
    config.confirm_poll_interval_ms = 10;
    config.confirm_timeout_seconds = 2;

    let mut context = ClientContext::new(
        ledger,
        Arc::new(ProgramRegistry::new(Cluster::Localnet)),
        Arc::new(HttpJsonFetcher::new(5).unwrap()),
        config,
    );
    if let Some(identity) = identity {
        context = context.with_identity(identity);
    }
    Client::new(context).unwrap()
}

/// Metadata account data laid out the way the program writes it.
pub fn metadata_account_data(
    update_authority: &Pubkey,
    mint: &Pubkey,
    name: &str,
    uri: &str,
    creators: &[Creator],
) -> Vec<u8> {
    fn padded(value: &str, len: usize) -> Vec<u8> {
        let mut bytes = (len as u32).to_le_bytes().to_vec();
        let mut field = value.as_bytes().to_vec();
        field.resize(len, 0);
        bytes.extend(field);
        bytes
    }

    let mut data = vec![METADATA_V1_KEY];
    data.extend_from_slice(update_authority.as_ref());
    data.extend_from_slice(mint.as_ref());
    data.extend(padded(name, MAX_NAME_LENGTH));
    data.extend(padded("TST", MAX_SYMBOL_LENGTH));
    data.extend(padded(uri, MAX_URI_LENGTH));
    data.extend_from_slice(&250u16.to_le_bytes());
    if creators.is_empty() {
        data.push(0);
    } else {
        data.push(1);
        data.extend_from_slice(&(creators.len() as u32).to_le_bytes());
        for creator in creators {
            data.extend_from_slice(creator.address.as_ref());
            data.push(creator.verified as u8);
            data.push(creator.share);
        }
    }
    data.extend_from_slice(&[0, 1]);
    data.extend_from_slice(&[0; 6]);
    data
}

/// Seeds a metadata account for a fresh mint and returns the mint.
pub fn seed_metadata(
    ledger: &InMemoryLedger,
    update_authority: &Pubkey,
    name: &str,
    uri: &str,
    creators: &[Creator],
) -> Pubkey {
    let mint = Pubkey::new_unique();
    let address = find_metadata_pda(&TOKEN_METADATA_PROGRAM_ID, &mint)
        .unwrap()
        .address;
    ledger.insert_account(
        address,
        TOKEN_METADATA_PROGRAM_ID,
        metadata_account_data(update_authority, &mint, name, uri, creators),
    );
    mint
}
