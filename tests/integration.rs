//! Integration tests for the token metadata client.
//!
//! Operations run end to end through [`token_metadata_client::Client`] against an
//! in-memory ledger.

mod integration {
    pub mod common;
    mod tests;
}
