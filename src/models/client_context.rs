use std::{fmt, sync::Arc};

use crate::{
    config::ClientConfig,
    models::{ClientError, Cluster, SignerRef},
    services::{JsonFetcherTrait, ProgramRegistry, SolanaProviderTrait},
};

/// Everything an operation handler may reach besides its input.
///
/// Built once per client and shared read-only between concurrent operations.
#[derive(Clone)]
pub struct ClientContext {
    pub provider: Arc<dyn SolanaProviderTrait>,
    pub programs: Arc<ProgramRegistry>,
    pub json_fetcher: Arc<dyn JsonFetcherTrait>,
    pub cluster: Cluster,
    pub identity: Option<SignerRef>,
    pub payer: Option<SignerRef>,
    pub config: ClientConfig,
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("cluster", &self.cluster)
            .field("identity", &self.identity.as_ref().map(|s| s.pubkey()))
            .field("payer", &self.payer.as_ref().map(|s| s.pubkey()))
            .finish_non_exhaustive()
    }
}

impl ClientContext {
    pub fn new(
        provider: Arc<dyn SolanaProviderTrait>,
        programs: Arc<ProgramRegistry>,
        json_fetcher: Arc<dyn JsonFetcherTrait>,
        config: ClientConfig,
    ) -> Self {
        Self {
            provider,
            cluster: programs.cluster(),
            programs,
            json_fetcher,
            identity: None,
            payer: None,
            config,
        }
    }

    pub fn with_identity(mut self, identity: SignerRef) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_payer(mut self, payer: SignerRef) -> Self {
        self.payer = Some(payer);
        self
    }

    /// The explicit signer if given, otherwise the client identity.
    pub fn identity_or_default(&self, signer: Option<SignerRef>) -> Result<SignerRef, ClientError> {
        signer
            .or_else(|| self.identity.clone())
            .ok_or_else(|| ClientError::MissingInput("identity".to_string()))
    }

    /// The explicit payer if given, otherwise the client payer, otherwise the identity.
    pub fn payer_or_default(&self, payer: Option<SignerRef>) -> Result<SignerRef, ClientError> {
        payer
            .or_else(|| self.payer.clone())
            .or_else(|| self.identity.clone())
            .ok_or_else(|| ClientError::MissingInput("payer".to_string()))
    }
}
