//! # Services Module
//!
//! External collaborators the client reaches through narrow interfaces: the Solana RPC
//! provider, the program registry and the off-chain JSON fetcher.

mod provider;
pub use provider::*;

mod program_registry;
pub use program_registry::*;

mod json_fetcher;
pub use json_fetcher::*;
