//! Turns an [`Authority`] into the accounts, signers and data an instruction needs.

use log::debug;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use super::pda::{
    find_associated_token_pda, find_metadata_delegate_record_pda, find_token_record_pda,
};
use crate::{
    models::{
        Authority, AuthorityKind, AuthorizationAccounts, AuthorizationDetails,
        AuthorizationInstructionData, ClientError, ResolvedAuthorization,
    },
    services::ProgramRegistry,
};

/// Resolves `authority` for an instruction against `mint`.
///
/// Synchronous and free of I/O: delegate records and default token accounts are derived,
/// never fetched. Exactly one signer is returned.
pub fn resolve_authority(
    mint: &Pubkey,
    authority: &Authority,
    authorization: Option<&AuthorizationDetails>,
    programs: &ProgramRegistry,
) -> Result<ResolvedAuthorization, ClientError> {
    let metadata_program = programs.token_metadata()?;

    let (accounts, signer, authority_kind) = match authority {
        Authority::Metadata { signer } => (
            AuthorizationAccounts {
                authority: signer.pubkey(),
                ..AuthorizationAccounts::default()
            },
            signer.clone(),
            AuthorityKind::Metadata,
        ),
        Authority::MetadataDelegate {
            role,
            namespace,
            delegate,
        } => {
            let record = find_metadata_delegate_record_pda(
                &metadata_program,
                mint,
                *role,
                namespace,
                &delegate.pubkey(),
            )?;
            (
                AuthorizationAccounts {
                    authority: delegate.pubkey(),
                    approver: Some(*namespace),
                    delegate_record: Some(record.address),
                    ..AuthorizationAccounts::default()
                },
                delegate.clone(),
                AuthorityKind::Delegate,
            )
        }
        Authority::TokenDelegate {
            owner,
            delegate,
            token,
            ..
        } => {
            let token = match token {
                Some(token) => *token,
                None => {
                    find_associated_token_pda(
                        &programs.associated_token()?,
                        owner,
                        &programs.token()?,
                        mint,
                    )?
                    .address
                }
            };
            let record = find_token_record_pda(&metadata_program, mint, &token)?;
            (
                AuthorizationAccounts {
                    authority: delegate.pubkey(),
                    token: Some(token),
                    approver: Some(*owner),
                    delegate_record: Some(record.address),
                    ..AuthorizationAccounts::default()
                },
                delegate.clone(),
                AuthorityKind::Delegate,
            )
        }
        Authority::Holder { owner, token } => (
            AuthorizationAccounts {
                authority: owner.pubkey(),
                token: Some(*token),
                ..AuthorizationAccounts::default()
            },
            owner.clone(),
            AuthorityKind::Holder,
        ),
    };

    let accounts = AuthorizationAccounts {
        authorization_rules: authorization.map(|details| details.rules),
        ..accounts
    };

    debug!(
        "Resolved {:?} authority {} for mint {}",
        authority_kind, accounts.authority, mint
    );

    Ok(ResolvedAuthorization {
        accounts,
        signers: vec![signer],
        data: AuthorizationInstructionData {
            authority_kind,
            authorization_data: authorization.and_then(|details| details.data.clone()),
        },
    })
}
