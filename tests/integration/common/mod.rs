pub mod fixtures;
pub mod ledger;
