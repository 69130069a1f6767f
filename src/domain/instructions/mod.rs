//! Instruction encoders for the token metadata, token and associated token programs.
//!
//! Encoders are pure: they take addresses and arguments and return an `Instruction`
//! without touching the network.

pub mod metadata;
pub mod token;
