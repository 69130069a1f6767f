use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;

pub const MINT_ADDRESS_KEY: &str = "mint_address";
pub const TOKEN_ADDRESS_KEY: &str = "token_address";
pub const METADATA_ADDRESS_KEY: &str = "metadata_address";
pub const MASTER_EDITION_ADDRESS_KEY: &str = "master_edition_address";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Pubkey(#[serde(serialize_with = "serialize_pubkey")] Pubkey),
    U64(u64),
    Bool(bool),
    String(String),
}

fn serialize_pubkey<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&pubkey.to_string())
}

impl From<Pubkey> for ContextValue {
    fn from(value: Pubkey) -> Self {
        ContextValue::Pubkey(value)
    }
}

impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        ContextValue::U64(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

/// Values produced while composing a transaction, such as a freshly generated mint.
///
/// Merging is shallow: a later value for the same key replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuilderContext {
    values: HashMap<String, ContextValue>,
}

impl BuilderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<ContextValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Copies every value of `other` over this context.
    pub fn merge(&mut self, other: BuilderContext) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    pub fn get_pubkey(&self, key: &str) -> Option<Pubkey> {
        match self.values.get(key) {
            Some(ContextValue::Pubkey(pubkey)) => Some(*pubkey),
            _ => None,
        }
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.values.get(key) {
            Some(ContextValue::U64(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
