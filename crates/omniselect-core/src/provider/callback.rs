use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{OptionProvider, OptionsPage, OptionsRequest, ProviderResult};
use crate::error::ProviderError;

type Slot<O> = Arc<Mutex<Option<oneshot::Sender<ProviderResult<O>>>>>;

/// Completion handle passed to a callback-style source.
///
/// May be cloned, moved to another task, or called synchronously from inside
/// the callback. Only the first response is delivered; later ones are ignored.
/// If every clone is dropped without responding the request resolves to
/// [`ProviderError::Dropped`].
pub struct Responder<O> {
    slot: Slot<O>,
}

impl<O> Clone for Responder<O> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<O> Responder<O> {
    fn new(tx: oneshot::Sender<ProviderResult<O>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Deliver a result. Returns `false` if a response was already delivered
    /// or the request is no longer awaited.
    pub fn respond(&self, result: ProviderResult<O>) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(tx) => tx.send(result).is_ok(),
            None => {
                tracing::warn!("provider responded more than once; extra response ignored");
                false
            }
        }
    }

    pub fn ok(&self, options: Vec<O>) -> bool {
        self.respond(Ok(OptionsPage::new(options)))
    }

    pub fn fail(&self, error: ProviderError) -> bool {
        self.respond(Err(error))
    }
}

/// Adapts a `(request, responder)` callback into an [`OptionProvider`].
pub struct CallbackProvider<F> {
    callback: F,
}

impl<F> CallbackProvider<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<O, F> OptionProvider<O> for CallbackProvider<F>
where
    O: Send + 'static,
    F: Fn(OptionsRequest, Responder<O>) + Send + Sync,
{
    async fn load_options(&self, request: &OptionsRequest) -> ProviderResult<O> {
        let (tx, rx) = oneshot::channel();
        (self.callback)(request.clone(), Responder::new(tx));
        rx.await.unwrap_or(Err(ProviderError::Dropped))
    }
}
