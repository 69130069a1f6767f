use async_trait::async_trait;
use log::debug;
use std::{any::Any, collections::HashMap, fmt, marker::PhantomData, sync::Arc};

use super::{Operation, OperationHandler, Scope};
use crate::{
    domain::nfts::register_nft_operations,
    models::{ClientContext, ClientError},
};

type AnyBox = Box<dyn Any + Send>;

#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn handle_any(
        &self,
        input: AnyBox,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<AnyBox, ClientError>;
}

struct TypedHandler<I, O, H> {
    key: &'static str,
    handler: H,
    _types: PhantomData<fn(I) -> O>,
}

#[async_trait]
impl<I, O, H> ErasedHandler for TypedHandler<I, O, H>
where
    I: Send + 'static,
    O: Send + 'static,
    H: OperationHandler<I, O>,
{
    async fn handle_any(
        &self,
        input: AnyBox,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<AnyBox, ClientError> {
        let input = input
            .downcast::<I>()
            .map_err(|_| ClientError::OperationTypeMismatch(self.key.to_string()))?;
        let output = self.handler.handle(*input, ctx, scope).await?;
        Ok(Box::new(output))
    }
}

/// Maps operation keys to their handlers.
///
/// Each key is registered once; the registry is fixed once the client is built.
#[derive(Default)]
pub struct OperationDispatcher {
    handlers: HashMap<&'static str, Arc<dyn ErasedHandler>>,
}

impl fmt::Debug for OperationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("OperationDispatcher")
            .field("operations", &keys)
            .finish()
    }
}

impl OperationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with every built-in asset operation registered.
    pub fn with_default_operations() -> Result<Self, ClientError> {
        let mut dispatcher = Self::new();
        register_nft_operations(&mut dispatcher)?;
        Ok(dispatcher)
    }

    pub fn register<I, O, H>(
        &mut self,
        operation: Operation<I, O>,
        handler: H,
    ) -> Result<(), ClientError>
    where
        I: Send + 'static,
        O: Send + 'static,
        H: OperationHandler<I, O> + 'static,
    {
        let key = operation.key();
        if self.handlers.contains_key(key) {
            return Err(ClientError::DuplicateOperation(key.to_string()));
        }

        self.handlers.insert(
            key,
            Arc::new(TypedHandler {
                key,
                handler,
                _types: PhantomData,
            }),
        );
        debug!("Registered operation {}", key);
        Ok(())
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub async fn execute<I, O>(
        &self,
        operation: Operation<I, O>,
        input: I,
        ctx: &ClientContext,
        scope: &Scope,
    ) -> Result<O, ClientError>
    where
        I: Send + 'static,
        O: Send + 'static,
    {
        let key = operation.key();
        let handler = self
            .handlers
            .get(key)
            .ok_or_else(|| ClientError::UnregisteredOperation(key.to_string()))?;

        scope.throw_if_canceled()?;
        debug!("Executing operation {}", key);

        let output = handler.handle_any(Box::new(input), ctx, scope).await?;
        output
            .downcast::<O>()
            .map(|output| *output)
            .map_err(|_| ClientError::OperationTypeMismatch(key.to_string()))
    }
}
