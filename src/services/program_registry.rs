//! Logical program name to address lookup.
//!
//! Addresses can be registered for all clusters or only for some of them. Lookups scan
//! the registrations newest first, so a later registration overrides an earlier one.

use solana_sdk::pubkey::Pubkey;

use crate::{
    config::{ConfigError, ProgramOverride},
    constants::{
        ASSOCIATED_TOKEN_PROGRAM_ID, ASSOCIATED_TOKEN_PROGRAM_NAME, SYSTEM_PROGRAM_ID,
        SYSTEM_PROGRAM_NAME, TOKEN_AUTH_RULES_PROGRAM_ID, TOKEN_AUTH_RULES_PROGRAM_NAME,
        TOKEN_METADATA_PROGRAM_ID, TOKEN_METADATA_PROGRAM_NAME, TOKEN_PROGRAM_ID,
        TOKEN_PROGRAM_NAME,
    },
    models::{ClientError, Cluster},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramEntry {
    pub name: String,
    pub address: Pubkey,
    /// `None` applies the entry to every cluster.
    pub clusters: Option<Vec<Cluster>>,
}

impl ProgramEntry {
    fn applies_to(&self, cluster: Cluster) -> bool {
        self.clusters
            .as_ref()
            .is_none_or(|clusters| clusters.contains(&cluster))
    }
}

#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    cluster: Cluster,
    entries: Vec<ProgramEntry>,
}

impl ProgramRegistry {
    /// Registry for `cluster` pre-populated with the well-known program addresses.
    pub fn new(cluster: Cluster) -> Self {
        let mut registry = Self::empty(cluster);
        for (name, address) in [
            (TOKEN_METADATA_PROGRAM_NAME, TOKEN_METADATA_PROGRAM_ID),
            (TOKEN_PROGRAM_NAME, TOKEN_PROGRAM_ID),
            (ASSOCIATED_TOKEN_PROGRAM_NAME, ASSOCIATED_TOKEN_PROGRAM_ID),
            (SYSTEM_PROGRAM_NAME, SYSTEM_PROGRAM_ID),
            (TOKEN_AUTH_RULES_PROGRAM_NAME, TOKEN_AUTH_RULES_PROGRAM_ID),
        ] {
            registry.register(name, address, None);
        }
        registry
    }

    pub fn empty(cluster: Cluster) -> Self {
        Self {
            cluster,
            entries: Vec::new(),
        }
    }

    /// Defaults for `cluster` with the configured overrides applied in order.
    pub fn from_overrides(
        cluster: Cluster,
        overrides: &[ProgramOverride],
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new(cluster);
        for program in overrides {
            registry.register(&program.name, program.pubkey()?, program.clusters.clone());
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: &str, address: Pubkey, clusters: Option<Vec<Cluster>>) {
        self.entries.push(ProgramEntry {
            name: name.to_string(),
            address,
            clusters,
        });
    }

    pub fn with_program(mut self, name: &str, address: Pubkey, clusters: Option<Vec<Cluster>>) -> Self {
        self.register(name, address, clusters);
        self
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub fn get(&self, name: &str) -> Result<Pubkey, ClientError> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name && entry.applies_to(self.cluster))
            .map(|entry| entry.address)
            .ok_or_else(|| ClientError::ProgramNotFound(format!("{} on {}", name, self.cluster)))
    }

    pub fn token_metadata(&self) -> Result<Pubkey, ClientError> {
        self.get(TOKEN_METADATA_PROGRAM_NAME)
    }

    pub fn token(&self) -> Result<Pubkey, ClientError> {
        self.get(TOKEN_PROGRAM_NAME)
    }

    pub fn associated_token(&self) -> Result<Pubkey, ClientError> {
        self.get(ASSOCIATED_TOKEN_PROGRAM_NAME)
    }

    pub fn system(&self) -> Result<Pubkey, ClientError> {
        self.get(SYSTEM_PROGRAM_NAME)
    }

    pub fn token_auth_rules(&self) -> Result<Pubkey, ClientError> {
        self.get(TOKEN_AUTH_RULES_PROGRAM_NAME)
    }
}
