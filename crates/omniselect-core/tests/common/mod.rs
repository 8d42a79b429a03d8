// Shared helpers for controller integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use omniselect_core::{CallbackProvider, OptionProvider, OptionsRequest, ProviderError, Responder};

/// Requests captured by a manual provider, answered by the test at will.
pub struct Calls<O> {
    inner: Arc<Mutex<Vec<(OptionsRequest, Responder<O>)>>>,
}

impl<O> Clone for Calls<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O> Calls<O> {
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> OptionsRequest {
        self.inner.lock().unwrap()[index].0.clone()
    }

    pub fn resolve(&self, index: usize, options: Vec<O>) -> bool {
        let responder = self.inner.lock().unwrap()[index].1.clone();
        responder.ok(options)
    }

    pub fn fail(&self, index: usize, message: &str) -> bool {
        let responder = self.inner.lock().unwrap()[index].1.clone();
        responder.fail(ProviderError::Failed(message.to_string()))
    }
}

/// Provider that records every request and never answers on its own.
pub fn manual<O: Send + 'static>() -> (impl OptionProvider<O> + 'static, Calls<O>) {
    let calls = Calls {
        inner: Arc::new(Mutex::new(Vec::new())),
    };
    let sink = calls.clone();
    let provider = CallbackProvider::new(move |req: OptionsRequest, done: Responder<O>| {
        sink.inner.lock().unwrap().push((req, done));
    });
    (provider, calls)
}
