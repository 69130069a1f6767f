//! Defaults for client configuration.

pub const DEFAULT_RPC_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONFIRM_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_CONFIRM_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_JSON_FETCH_TIMEOUT_SECONDS: u64 = 10;

/// Maximum number of addresses accepted by `getMultipleAccounts`.
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;
