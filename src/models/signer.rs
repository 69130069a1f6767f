//! Shared signer handles.
//!
//! Fragments, authorities and builders all hold on to the same keypairs, so signers are
//! reference counted trait objects rather than owned keypairs.

use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::{collections::HashSet, sync::Arc};

pub type SignerRef = Arc<dyn Signer + Send + Sync>;

/// Wraps any signer into a shareable [`SignerRef`].
pub fn signer_ref<S>(signer: S) -> SignerRef
where
    S: Signer + Send + Sync + 'static,
{
    Arc::new(signer)
}

/// Deduplicates signers by public key, keeping the first occurrence of each.
pub fn dedupe_signers<'a, I>(signers: I) -> Vec<SignerRef>
where
    I: IntoIterator<Item = &'a SignerRef>,
{
    let mut seen: HashSet<Pubkey> = HashSet::new();
    signers
        .into_iter()
        .filter(|signer| seen.insert(signer.pubkey()))
        .cloned()
        .collect()
}
