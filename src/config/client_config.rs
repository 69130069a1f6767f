use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentLevel, pubkey::Pubkey};
use std::{collections::HashSet, env, fs, path::Path, str::FromStr};
use thiserror::Error;

use super::RpcConfig;
use crate::{
    constants::{
        DEFAULT_CONFIRM_POLL_INTERVAL_MS, DEFAULT_CONFIRM_TIMEOUT_SECONDS,
        DEFAULT_JSON_FETCH_TIMEOUT_SECONDS, DEFAULT_RPC_TIMEOUT_SECONDS,
    },
    models::Cluster,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Duplicate program override: {0}")]
    DuplicateProgram(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Replaces the address of a named program, optionally only on some clusters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramOverride {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub clusters: Option<Vec<Cluster>>,
}

impl ProgramOverride {
    pub fn pubkey(&self) -> Result<Pubkey, ConfigError> {
        Pubkey::from_str(&self.address).map_err(|e| ConfigError::InvalidValue {
            field: format!("programs.{}.address", self.name),
            reason: e.to_string(),
        })
    }
}

fn default_commitment() -> CommitmentLevel {
    CommitmentLevel::Confirmed
}

fn default_rpc_timeout_seconds() -> u64 {
    DEFAULT_RPC_TIMEOUT_SECONDS
}

fn default_confirm_timeout_seconds() -> u64 {
    DEFAULT_CONFIRM_TIMEOUT_SECONDS
}

fn default_confirm_poll_interval_ms() -> u64 {
    DEFAULT_CONFIRM_POLL_INTERVAL_MS
}

fn default_json_fetch_timeout_seconds() -> u64 {
    DEFAULT_JSON_FETCH_TIMEOUT_SECONDS
}

/// Settings a [`crate::Client`] is built from.
///
/// `cluster` left unset means the cluster is guessed from the first RPC URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub rpc: Vec<RpcConfig>,
    #[serde(default)]
    pub cluster: Option<Cluster>,
    #[serde(default = "default_commitment")]
    pub commitment: CommitmentLevel,
    #[serde(default = "default_rpc_timeout_seconds")]
    pub rpc_timeout_seconds: u64,
    #[serde(default = "default_confirm_timeout_seconds")]
    pub confirm_timeout_seconds: u64,
    #[serde(default = "default_confirm_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,
    #[serde(default = "default_json_fetch_timeout_seconds")]
    pub json_fetch_timeout_seconds: u64,
    #[serde(default)]
    pub programs: Vec<ProgramOverride>,
}

impl ClientConfig {
    /// Config with defaults for everything except the endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc: vec![RpcConfig::new(rpc_url.into())],
            cluster: None,
            commitment: default_commitment(),
            rpc_timeout_seconds: DEFAULT_RPC_TIMEOUT_SECONDS,
            confirm_timeout_seconds: DEFAULT_CONFIRM_TIMEOUT_SECONDS,
            confirm_poll_interval_ms: DEFAULT_CONFIRM_POLL_INTERVAL_MS,
            json_fetch_timeout_seconds: DEFAULT_JSON_FETCH_TIMEOUT_SECONDS,
            programs: Vec::new(),
        }
    }

    /// Reads the configuration from the environment, loading `.env` first if present.
    ///
    /// Environment variables used:
    /// - RPC_URL (required)
    /// - CLUSTER: mainnet-beta, devnet, testnet, localnet, custom or auto (default auto)
    /// - COMMITMENT: processed, confirmed or finalized (default confirmed)
    /// - RPC_TIMEOUT_SECONDS, CONFIRM_TIMEOUT_SECONDS, CONFIRM_POLL_INTERVAL_MS,
    ///   JSON_FETCH_TIMEOUT_SECONDS
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let rpc_url =
            env::var("RPC_URL").map_err(|_| ConfigError::MissingField("RPC_URL".to_string()))?;

        let cluster = match env::var("CLUSTER") {
            Ok(value) if !value.eq_ignore_ascii_case("auto") => {
                Some(
                    Cluster::from_str(&value).map_err(|_| ConfigError::InvalidValue {
                        field: "CLUSTER".to_string(),
                        reason: format!("unknown cluster '{value}'"),
                    })?,
                )
            }
            _ => None,
        };

        let commitment = match env::var("COMMITMENT") {
            Ok(value) => {
                CommitmentLevel::from_str(&value).map_err(|_| ConfigError::InvalidValue {
                    field: "COMMITMENT".to_string(),
                    reason: format!("unknown commitment '{value}'"),
                })?
            }
            Err(_) => default_commitment(),
        };

        Ok(Self {
            rpc: vec![RpcConfig::new(rpc_url)],
            cluster,
            commitment,
            rpc_timeout_seconds: env_u64("RPC_TIMEOUT_SECONDS", DEFAULT_RPC_TIMEOUT_SECONDS)?,
            confirm_timeout_seconds: env_u64(
                "CONFIRM_TIMEOUT_SECONDS",
                DEFAULT_CONFIRM_TIMEOUT_SECONDS,
            )?,
            confirm_poll_interval_ms: env_u64(
                "CONFIRM_POLL_INTERVAL_MS",
                DEFAULT_CONFIRM_POLL_INTERVAL_MS,
            )?,
            json_fetch_timeout_seconds: env_u64(
                "JSON_FETCH_TIMEOUT_SECONDS",
                DEFAULT_JSON_FETCH_TIMEOUT_SECONDS,
            )?,
            programs: Vec::new(),
        })
    }

    /// Loads the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.is_empty() {
            return Err(ConfigError::MissingField("rpc".into()));
        }
        for rpc in &self.rpc {
            rpc.validate()?;
        }

        for (field, value) in [
            ("rpc_timeout_seconds", self.rpc_timeout_seconds),
            ("confirm_timeout_seconds", self.confirm_timeout_seconds),
            ("confirm_poll_interval_ms", self.confirm_poll_interval_ms),
            ("json_fetch_timeout_seconds", self.json_fetch_timeout_seconds),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for program in &self.programs {
            program.pubkey()?;
            let clusters = program.clusters.clone().unwrap_or_default();
            if !seen.insert((program.name.clone(), clusters)) {
                return Err(ConfigError::DuplicateProgram(program.name.clone()));
            }
        }

        Ok(())
    }

    /// The configured cluster, or the one guessed from the first RPC URL.
    pub fn resolved_cluster(&self) -> Cluster {
        match (self.cluster, self.rpc.first()) {
            (Some(cluster), _) => cluster,
            (None, Some(rpc)) => Cluster::from_rpc_url(&rpc.url),
            (None, None) => Cluster::default(),
        }
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            field: name.to_string(),
            reason: format!("'{value}' is not a positive integer"),
        }),
        Err(_) => Ok(default),
    }
}
