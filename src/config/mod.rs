//! Client configuration.
//!
//! Configuration comes either from the process environment (with `.env` support) or from
//! a JSON file, and is validated once before a client is built from it.

mod rpc_config;
pub use rpc_config::*;

mod client_config;
pub use client_config::*;
