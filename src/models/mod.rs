mod error;
pub use error::*;

mod cluster;
pub use cluster::*;

mod authority;
pub use authority::*;

mod metadata;
pub use metadata::*;

mod client_context;
pub use client_context::*;

mod signer;
pub use signer::*;

mod account_filter;
pub use account_filter::*;

#[cfg(test)]
pub(crate) use metadata::test_fixtures;
