//! Client-side engine for assembling, resolving and submitting token metadata transactions.
//!
//! The crate is organised the same way for every operation:
//! - `domain::pda` derives program addresses from documented seed schemas
//! - `domain::authority` turns an [`models::Authority`] into accounts and signers
//! - `domain::transaction_builder` composes instruction fragments into one atomic transaction
//! - `domain::account_query` scans the account index with byte-offset filters
//! - `domain::operation` registers handlers and runs them inside a cancellable [`domain::Scope`]
//!
//! RPC access, off-chain JSON retrieval and program addresses are external collaborators
//! reached through `services`.

pub mod client;
pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use client::*;
