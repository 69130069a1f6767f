//! # Domain Module
//!
//! Core client logic, implementing:
//!
//! * Program derived address derivation
//! * Authority resolution
//! * Transaction composition and submission
//! * Filtered account scans
//! * Registered asset operations

pub mod pda;

pub mod authority;

pub mod transaction_builder;
pub use transaction_builder::*;

pub mod account_query;

pub mod instructions;

pub mod operation;
pub use operation::*;

pub mod nfts;
