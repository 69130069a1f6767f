//! Entry point tying configuration, collaborators and the operation registry together.

use log::info;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    config::{ClientConfig, ConfigError},
    domain::{
        nfts::{
            ApproveCollectionAuthorityInput, CreateNftInput, CreateNftOutput,
            FindNftByMintInput, FindNftsByCreatorInput, FindNftsByUpdateAuthorityInput,
            LockNftInput, RevokeCollectionAuthorityInput, UnlockNftInput, UpdateNftInput,
            APPROVE_COLLECTION_AUTHORITY, CREATE_NFT, FIND_NFTS_BY_CREATOR,
            FIND_NFTS_BY_UPDATE_AUTHORITY, FIND_NFT_BY_MINT, LOCK_NFT,
            REVOKE_COLLECTION_AUTHORITY, UNLOCK_NFT, UPDATE_NFT,
        },
        Operation, OperationDispatcher, Scope, SendAndConfirmResponse,
    },
    models::{ClientContext, ClientError, MetadataAccount, Nft, SignerRef},
    services::{
        HttpJsonFetcher, JsonFetchError, ProgramRegistry, SolanaProvider, SolanaProviderError,
    },
};

#[derive(Error, Debug)]
pub enum ClientSetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Provider error: {0}")]
    Provider(#[from] SolanaProviderError),
    #[error("JSON fetcher error: {0}")]
    JsonFetcher(#[from] JsonFetchError),
    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

pub struct Client {
    context: ClientContext,
    dispatcher: Arc<OperationDispatcher>,
}

impl Client {
    /// Validates `config` and builds the RPC provider, program registry and JSON fetcher
    /// from it.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientSetupError> {
        config.validate()?;

        let cluster = config.resolved_cluster();
        let provider = SolanaProvider::new_with_commitment(
            config.rpc.clone(),
            config.rpc_timeout_seconds,
            CommitmentConfig {
                commitment: config.commitment,
            },
        )?;
        let programs = ProgramRegistry::from_overrides(cluster, &config.programs)?;
        let json_fetcher = HttpJsonFetcher::new(config.json_fetch_timeout_seconds)?;
        info!("Client configured for {} via {}", cluster, provider.url());

        let context = ClientContext::new(
            Arc::new(provider),
            Arc::new(programs),
            Arc::new(json_fetcher),
            config,
        );
        Ok(Self::new(context)?)
    }

    /// Client over an existing context with every built-in operation registered.
    pub fn new(context: ClientContext) -> Result<Self, ClientError> {
        Ok(Self::with_dispatcher(
            context,
            OperationDispatcher::with_default_operations()?,
        ))
    }

    pub fn with_dispatcher(context: ClientContext, dispatcher: OperationDispatcher) -> Self {
        Self {
            context,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn with_identity(mut self, identity: SignerRef) -> Self {
        self.context = self.context.with_identity(identity);
        self
    }

    pub fn with_payer(mut self, payer: SignerRef) -> Self {
        self.context = self.context.with_payer(payer);
        self
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub async fn execute<I, O>(
        &self,
        operation: Operation<I, O>,
        input: I,
        scope: &Scope,
    ) -> Result<O, ClientError>
    where
        I: Send + 'static,
        O: Send + 'static,
    {
        self.dispatcher
            .execute(operation, input, &self.context, scope)
            .await
    }

    pub fn nfts(&self) -> NftClient<'_> {
        NftClient {
            client: self,
            scope: Scope::new(),
        }
    }
}

/// Asset operations bound to one [`Scope`].
pub struct NftClient<'a> {
    client: &'a Client,
    scope: Scope,
}

impl NftClient<'_> {
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub async fn create(&self, input: CreateNftInput) -> Result<CreateNftOutput, ClientError> {
        self.client.execute(CREATE_NFT, input, &self.scope).await
    }

    pub async fn find_by_mint(&self, input: FindNftByMintInput) -> Result<Nft, ClientError> {
        self.client.execute(FIND_NFT_BY_MINT, input, &self.scope).await
    }

    pub async fn find_all_by_creator(
        &self,
        creator: Pubkey,
        position: usize,
    ) -> Result<Vec<MetadataAccount>, ClientError> {
        let input = FindNftsByCreatorInput::new(creator).at_position(position);
        self.client
            .execute(FIND_NFTS_BY_CREATOR, input, &self.scope)
            .await
    }

    pub async fn find_all_by_update_authority(
        &self,
        update_authority: Pubkey,
    ) -> Result<Vec<MetadataAccount>, ClientError> {
        let input = FindNftsByUpdateAuthorityInput { update_authority };
        self.client
            .execute(FIND_NFTS_BY_UPDATE_AUTHORITY, input, &self.scope)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateNftInput,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        self.client.execute(UPDATE_NFT, input, &self.scope).await
    }

    pub async fn lock(&self, input: LockNftInput) -> Result<SendAndConfirmResponse, ClientError> {
        self.client.execute(LOCK_NFT, input, &self.scope).await
    }

    pub async fn unlock(
        &self,
        input: UnlockNftInput,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        self.client.execute(UNLOCK_NFT, input, &self.scope).await
    }

    pub async fn approve_collection_authority(
        &self,
        input: ApproveCollectionAuthorityInput,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        self.client
            .execute(APPROVE_COLLECTION_AUTHORITY, input, &self.scope)
            .await
    }

    pub async fn revoke_collection_authority(
        &self,
        input: RevokeCollectionAuthorityInput,
    ) -> Result<SendAndConfirmResponse, ClientError> {
        self.client
            .execute(REVOKE_COLLECTION_AUTHORITY, input, &self.scope)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RpcConfig,
        models::Cluster,
        services::{MockJsonFetcherTrait, MockSolanaProviderTrait},
    };

    fn create_test_client(provider: MockSolanaProviderTrait) -> Client {
        let context = ClientContext::new(
            Arc::new(provider),
            Arc::new(ProgramRegistry::new(Cluster::Devnet)),
            Arc::new(MockJsonFetcherTrait::new()),
            ClientConfig::new("http://localhost:8899"),
        );
        Client::new(context).unwrap()
    }

    #[tokio::test]
    async fn test_from_config_resolves_cluster_from_url() {
        let client =
            Client::from_config(ClientConfig::new("https://api.devnet.solana.com")).unwrap();

        assert_eq!(client.context().cluster, Cluster::Devnet);
    }

    #[tokio::test]
    async fn test_from_config_rejects_invalid_config() {
        let mut config = ClientConfig::new("https://api.devnet.solana.com");
        config.rpc = vec![RpcConfig::new("ftp://example.com".to_string())];

        let result = Client::from_config(config);

        assert!(matches!(result, Err(ClientSetupError::Config(_))));
    }

    #[tokio::test]
    async fn test_nfts_facade_dispatches_find_by_update_authority() {
        let mut provider = MockSolanaProviderTrait::new();
        provider
            .expect_get_program_accounts()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(vec![]) }));
        let client = create_test_client(provider);

        let nfts = client
            .nfts()
            .find_all_by_update_authority(Pubkey::new_unique())
            .await
            .unwrap();

        assert!(nfts.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_scope_short_circuits_facade() {
        let mut provider = MockSolanaProviderTrait::new();
        provider.expect_get_program_accounts().never();
        let client = create_test_client(provider);
        let scope = Scope::new();
        scope.cancel();

        let result = client
            .nfts()
            .with_scope(scope)
            .find_all_by_creator(Pubkey::new_unique(), 1)
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
    }
}
