//! Keyed operations and their handlers.
//!
//! An [`Operation`] is a typed key. Handlers are registered once per key in an
//! [`OperationDispatcher`] and executed with the client context and a [`Scope`].

mod scope;
pub use scope::*;

mod dispatcher;
pub use dispatcher::*;

use async_trait::async_trait;
use std::{fmt, marker::PhantomData};

use crate::models::{ClientContext, ClientError};

/// Typed key of an operation taking `I` and producing `O`.
pub struct Operation<I, O> {
    key: &'static str,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> Operation<I, O> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _types: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<I, O> Clone for Operation<I, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, O> Copy for Operation<I, O> {}

impl<I, O> fmt::Debug for Operation<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operation").field(&self.key).finish()
    }
}

#[async_trait]
pub trait OperationHandler<I, O>: Send + Sync {
    async fn handle(&self, input: I, ctx: &ClientContext, scope: &Scope)
        -> Result<O, ClientError>;
}
