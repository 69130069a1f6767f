//! Authority shapes accepted by every mutating asset instruction.

use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::{collections::BTreeMap, fmt, str::FromStr};
use strum::{Display, EnumString};

use super::{ClientError, SignerRef};

/// Role of a delegate scoped by the metadata update authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetadataDelegateRole {
    AuthorityItem,
    Collection,
    Use,
    Data,
    ProgrammableConfig,
    DataItem,
    CollectionItem,
    ProgrammableConfigItem,
}

impl MetadataDelegateRole {
    /// Seed the program uses for the delegate record of this role.
    pub fn seed(&self) -> &'static [u8] {
        match self {
            MetadataDelegateRole::AuthorityItem => b"authority_item_delegate",
            MetadataDelegateRole::Collection => b"collection_delegate",
            MetadataDelegateRole::Use => b"use_delegate",
            MetadataDelegateRole::Data => b"data_delegate",
            MetadataDelegateRole::ProgrammableConfig => b"programmable_config_delegate",
            MetadataDelegateRole::DataItem => b"data_item_delegate",
            MetadataDelegateRole::CollectionItem => b"collection_item_delegate",
            MetadataDelegateRole::ProgrammableConfigItem => b"prog_config_item_delegate",
        }
    }

    /// Whether the delegate address is part of the record seeds.
    ///
    /// Every metadata delegate role keys its record by delegate, so several delegates can
    /// hold the same role at once.
    pub fn requires_delegate_seed(&self) -> bool {
        true
    }
}

/// Role of a delegate scoped by the token owner.
///
/// Token delegates are tracked by the token record of the delegated token account, so the
/// role does not contribute to any seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenDelegateRole {
    Sale,
    Transfer,
    Utility,
    Staking,
    Standard,
    LockedTransfer,
    Migration,
}

/// Who authorizes an instruction against an asset.
#[derive(Clone)]
pub enum Authority {
    /// The metadata update authority signs directly.
    Metadata { signer: SignerRef },
    /// A delegate approved by the update authority (`namespace`).
    MetadataDelegate {
        role: MetadataDelegateRole,
        namespace: Pubkey,
        delegate: SignerRef,
    },
    /// A delegate approved by the token owner. `token` defaults to the owner's associated
    /// token account for the mint.
    TokenDelegate {
        role: TokenDelegateRole,
        owner: Pubkey,
        delegate: SignerRef,
        token: Option<Pubkey>,
    },
    /// The holder of the token account signs directly.
    Holder { owner: SignerRef, token: Pubkey },
}

impl Authority {
    /// Public key of the signer that authorizes the instruction.
    pub fn signer_pubkey(&self) -> Pubkey {
        match self {
            Authority::Metadata { signer } => signer.pubkey(),
            Authority::MetadataDelegate { delegate, .. } => delegate.pubkey(),
            Authority::TokenDelegate { delegate, .. } => delegate.pubkey(),
            Authority::Holder { owner, .. } => owner.pubkey(),
        }
    }
}

impl fmt::Debug for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authority::Metadata { signer } => f
                .debug_struct("Metadata")
                .field("signer", &signer.pubkey())
                .finish(),
            Authority::MetadataDelegate {
                role,
                namespace,
                delegate,
            } => f
                .debug_struct("MetadataDelegate")
                .field("role", role)
                .field("namespace", namespace)
                .field("delegate", &delegate.pubkey())
                .finish(),
            Authority::TokenDelegate {
                role,
                owner,
                delegate,
                token,
            } => f
                .debug_struct("TokenDelegate")
                .field("role", role)
                .field("owner", owner)
                .field("delegate", &delegate.pubkey())
                .field("token", token)
                .finish(),
            Authority::Holder { owner, token } => f
                .debug_struct("Holder")
                .field("owner", &owner.pubkey())
                .field("token", token)
                .finish(),
        }
    }
}

/// Serialized form of an [`Authority`] as it arrives in JSON requests.
///
/// Signers are referenced by address and looked up among the keypairs the caller holds.
/// Tags outside the four known shapes deserialize to `Unknown` and are rejected when
/// converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthorityDescriptor {
    Metadata {
        signer: String,
    },
    MetadataDelegate {
        role: MetadataDelegateRole,
        namespace: String,
        delegate: String,
    },
    TokenDelegate {
        role: TokenDelegateRole,
        owner: String,
        delegate: String,
        #[serde(default)]
        token: Option<String>,
    },
    Holder {
        owner: String,
        token: String,
    },
    #[serde(other)]
    Unknown,
}

impl AuthorityDescriptor {
    /// Converts the descriptor into an [`Authority`], picking signers from `signers`.
    pub fn into_authority(self, signers: &[SignerRef]) -> Result<Authority, ClientError> {
        match self {
            AuthorityDescriptor::Metadata { signer } => Ok(Authority::Metadata {
                signer: find_signer(signers, &signer)?,
            }),
            AuthorityDescriptor::MetadataDelegate {
                role,
                namespace,
                delegate,
            } => Ok(Authority::MetadataDelegate {
                role,
                namespace: parse_pubkey("namespace", &namespace)?,
                delegate: find_signer(signers, &delegate)?,
            }),
            AuthorityDescriptor::TokenDelegate {
                role,
                owner,
                delegate,
                token,
            } => Ok(Authority::TokenDelegate {
                role,
                owner: parse_pubkey("owner", &owner)?,
                delegate: find_signer(signers, &delegate)?,
                token: token
                    .map(|token| parse_pubkey("token", &token))
                    .transpose()?,
            }),
            AuthorityDescriptor::Holder { owner, token } => Ok(Authority::Holder {
                owner: find_signer(signers, &owner)?,
                token: parse_pubkey("token", &token)?,
            }),
            AuthorityDescriptor::Unknown => Err(ClientError::UnreachableVariant(
                "authority descriptor has an unknown type tag".to_string(),
            )),
        }
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, ClientError> {
    Pubkey::from_str(value)
        .map_err(|e| ClientError::Validation(format!("Invalid {field} address {value}: {e}")))
}

fn find_signer(signers: &[SignerRef], address: &str) -> Result<SignerRef, ClientError> {
    let pubkey = parse_pubkey("signer", address)?;
    signers
        .iter()
        .find(|signer| signer.pubkey() == pubkey)
        .cloned()
        .ok_or_else(|| ClientError::MissingInput(format!("No signer available for {pubkey}")))
}

/// Kind of authority recorded in instruction data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityKind {
    Metadata,
    Delegate,
    Holder,
}

/// A single value in an authorization rule payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadType {
    Pubkey([u8; 32]),
    Seeds(Vec<Vec<u8>>),
    MerkleProof(Vec<[u8; 32]>),
    Number(u64),
}

/// Payload evaluated by the authorization rules program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationData {
    pub payload: BTreeMap<String, PayloadType>,
}

/// Rule set governing a programmable asset, plus the payload to evaluate it with.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationDetails {
    pub rules: Pubkey,
    pub data: Option<AuthorizationData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationAccounts {
    pub authority: Pubkey,
    pub token: Option<Pubkey>,
    pub approver: Option<Pubkey>,
    pub delegate_record: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationInstructionData {
    pub authority_kind: AuthorityKind,
    pub authorization_data: Option<AuthorizationData>,
}

/// Accounts, signers and data an instruction needs for a given [`Authority`].
#[derive(Clone)]
pub struct ResolvedAuthorization {
    pub accounts: AuthorizationAccounts,
    pub signers: Vec<SignerRef>,
    pub data: AuthorizationInstructionData,
}

impl fmt::Debug for ResolvedAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signers: Vec<Pubkey> = self.signers.iter().map(|s| s.pubkey()).collect();
        f.debug_struct("ResolvedAuthorization")
            .field("accounts", &self.accounts)
            .field("signers", &signers)
            .field("data", &self.data)
            .finish()
    }
}
