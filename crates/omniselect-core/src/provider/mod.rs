//! Data provider contract.
//!
//! Every source is driven through one asynchronous abstraction,
//! [`OptionProvider`]. Callback-style sources go through
//! [`CallbackProvider`], plain async functions through [`FnProvider`].

mod callback;
mod fixed;

pub use callback::{CallbackProvider, Responder};
pub use fixed::StaticProvider;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// What the controller asks a provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsRequest {
    pub query: String,
    /// Only set when pagination is enabled.
    pub page: Option<u32>,
}

impl OptionsRequest {
    pub fn new(query: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}

/// One page of results. A missing `options` field reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsPage<O> {
    #[serde(default = "Vec::new")]
    pub options: Vec<O>,
}

impl<O> OptionsPage<O> {
    pub fn new(options: Vec<O>) -> Self {
        Self { options }
    }

    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
        }
    }
}

pub type ProviderResult<O> = std::result::Result<OptionsPage<O>, ProviderError>;

#[async_trait]
pub trait OptionProvider<O: Send + 'static>: Send + Sync {
    async fn load_options(&self, request: &OptionsRequest) -> ProviderResult<O>;
}

#[async_trait]
impl<O, P> OptionProvider<O> for Arc<P>
where
    O: Send + 'static,
    P: OptionProvider<O> + ?Sized,
{
    async fn load_options(&self, request: &OptionsRequest) -> ProviderResult<O> {
        (**self).load_options(request).await
    }
}

/// Provider backed by an async function or closure.
pub struct FnProvider<F> {
    f: F,
}

impl<F> FnProvider<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<O, F, Fut> OptionProvider<O> for FnProvider<F>
where
    O: Send + 'static,
    F: Fn(OptionsRequest) -> Fut + Send + Sync,
    Fut: Future<Output = ProviderResult<O>> + Send + 'static,
{
    async fn load_options(&self, request: &OptionsRequest) -> ProviderResult<O> {
        (self.f)(request.clone()).await
    }
}
