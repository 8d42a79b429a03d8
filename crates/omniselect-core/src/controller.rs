//! Load orchestration: cache lookup, provider calls, supersession and
//! pagination accumulation.
//!
//! Every request is stamped with a generation from a per-controller counter.
//! Issuing a request makes its generation the only active one; a response is
//! applied only while its generation is still active, and applying it clears
//! the slot. Whatever arrives afterwards, from an older request or as a
//! repeated completion of the same one, is dropped.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::task::noop_waker_ref;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::ResultCache;
use crate::provider::{OptionProvider, OptionsRequest, ProviderResult};
use crate::state::{CacheEntry, LoadState, merge_page};

pub type Generation = u64;

/// How a single `load` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The cache satisfied the request; the provider was not called.
    Cached,
    /// The provider's response was applied to state and cache.
    Applied,
    /// A newer request became active first; the response was dropped.
    Superseded,
}

/// Completion of one `load` call.
///
/// Already finished when the cache answered or the provider resolved during
/// the call. Otherwise it has to be awaited or spawned for the response to be
/// applied; dropping it abandons the response and leaves the loading flag set
/// until another request is applied.
#[must_use = "a pending load is only applied when the task is awaited or spawned"]
pub struct LoadTask {
    inner: TaskInner,
}

enum TaskInner {
    Ready(Option<LoadOutcome>),
    Pending(BoxFuture<'static, LoadOutcome>),
}

impl LoadTask {
    fn ready(outcome: LoadOutcome) -> Self {
        Self {
            inner: TaskInner::Ready(Some(outcome)),
        }
    }

    fn pending(fut: BoxFuture<'static, LoadOutcome>) -> Self {
        Self {
            inner: TaskInner::Pending(fut),
        }
    }

    /// The outcome if the load finished synchronously.
    pub fn outcome(&self) -> Option<LoadOutcome> {
        match &self.inner {
            TaskInner::Ready(outcome) => *outcome,
            TaskInner::Pending(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.inner, TaskInner::Ready(_))
    }

    /// Drive the task on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<LoadOutcome> {
        tokio::spawn(self)
    }
}

impl Future for LoadTask {
    type Output = LoadOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<LoadOutcome> {
        match &mut self.inner {
            TaskInner::Ready(outcome) => match outcome.take() {
                Some(outcome) => Poll::Ready(outcome),
                None => panic!("LoadTask polled after completion"),
            },
            TaskInner::Pending(fut) => fut.as_mut().poll(cx),
        }
    }
}

struct Inner<O> {
    state: LoadState<O>,
    cache: ResultCache<O>,
    generation: Generation,
    active: Option<Generation>,
}

struct Shared<O> {
    inner: Mutex<Inner<O>>,
    provider: Arc<dyn OptionProvider<O>>,
    pagination: bool,
    updates: watch::Sender<LoadState<O>>,
}

/// Owns the visible [`LoadState`] and the result cache of one select.
///
/// Cheap to clone; clones drive the same state. `load` must run inside a
/// tokio runtime when the provider relies on tokio timers or I/O.
pub struct LoadController<O> {
    shared: Arc<Shared<O>>,
}

impl<O> Clone for LoadController<O> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<O: Clone + Send + Sync + 'static> LoadController<O> {
    /// Controller with its own in-memory cache.
    pub fn new<P>(provider: P, pagination: bool) -> Self
    where
        P: OptionProvider<O> + 'static,
    {
        Self::with_cache(provider, ResultCache::new(), pagination)
    }

    pub fn with_cache<P>(provider: P, cache: ResultCache<O>, pagination: bool) -> Self
    where
        P: OptionProvider<O> + 'static,
    {
        let state = LoadState::default();
        let (updates, _) = watch::channel(state.clone());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state,
                    cache,
                    generation: 0,
                    active: None,
                }),
                provider: Arc::new(provider),
                pagination,
                updates,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState<O> {
        self.lock().state.clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LoadState<O>> {
        self.shared.updates.subscribe()
    }

    /// Generation of the most recently issued request (0 before the first).
    pub fn generation(&self) -> Generation {
        self.lock().generation
    }

    /// Whether a request is still waiting to be applied.
    pub fn has_active_request(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Returns cache (hits, misses).
    pub fn cache_stats(&self) -> (usize, usize) {
        self.lock().cache.stats()
    }

    /// Stop caching; later loads always reach the provider.
    pub fn disable_cache(&self) {
        self.lock().cache.disable();
    }

    /// Empty the visible options. The cache is left alone.
    pub fn clear_options(&self) {
        let mut inner = self.lock();
        inner.state.options.clear();
        self.publish(&inner);
    }

    /// Load the first page for `query`.
    pub fn load_first(&self, query: &str) -> LoadTask {
        self.load(query, 1)
    }

    /// Load `page` of `query`. Pages start at 1; without pagination every
    /// load is a first-page load.
    pub fn load(&self, query: &str, page: u32) -> LoadTask {
        let page = if self.shared.pagination { page.max(1) } else { 1 };

        let generation = {
            let mut inner = self.lock();
            if let Some(entry) = inner.cache.get(query) {
                let CacheEntry {
                    page: cached_page,
                    options,
                    has_reached_last_page,
                } = entry;
                inner.state.options = options;
                inner.state.current_page = cached_page;
                // the error belonged to whatever was shown before
                inner.state.error = None;

                if !self.shared.pagination || cached_page >= page || has_reached_last_page {
                    // The cached answer is final for this call, so any request
                    // still in flight loses its right to apply.
                    if inner.active.take().is_some() {
                        inner.state.is_loading = false;
                        inner.state.is_loading_page = false;
                    }
                    self.publish(&inner);
                    tracing::debug!(query, page, cached_page, "options served from cache");
                    return LoadTask::ready(LoadOutcome::Cached);
                }
                self.publish(&inner);
            }

            inner.generation += 1;
            inner.active = Some(inner.generation);
            inner.generation
        };

        tracing::debug!(query, page, generation, "requesting options");

        let request = OptionsRequest::new(query, self.shared.pagination.then_some(page));
        let provider = Arc::clone(&self.shared.provider);
        let controller = self.clone();
        let query = query.to_string();
        let mut fut: BoxFuture<'static, LoadOutcome> = Box::pin(async move {
            let result = provider.load_options(&request).await;
            controller.apply(generation, &query, page, result)
        });

        // One non-blocking poll: providers that answer immediately are applied
        // before `load` returns and never raise the loading flag.
        let mut cx = Context::from_waker(noop_waker_ref());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(outcome) => LoadTask::ready(outcome),
            Poll::Pending => {
                self.mark_loading(generation, page);
                LoadTask::pending(fut)
            }
        }
    }

    /// Fetch the page after the current one, unless pagination is off or a
    /// load is already running.
    pub fn load_next_page(&self, query: &str) -> Option<LoadTask> {
        let next = {
            let inner = self.lock();
            if !self.shared.pagination || inner.state.is_loading {
                return None;
            }
            inner.state.current_page + 1
        };
        Some(self.load(query, next))
    }

    fn mark_loading(&self, generation: Generation, page: u32) {
        let mut inner = self.lock();
        if inner.active != Some(generation) || inner.state.is_loading {
            return;
        }
        inner.state.is_loading = true;
        inner.state.is_loading_page = page > inner.state.current_page;
        self.publish(&inner);
    }

    fn apply(
        &self,
        generation: Generation,
        query: &str,
        page: u32,
        result: ProviderResult<O>,
    ) -> LoadOutcome {
        let mut inner = self.lock();
        if inner.active != Some(generation) {
            tracing::debug!(query, page, generation, "dropping superseded response");
            return LoadOutcome::Superseded;
        }
        inner.active = None;

        let (fetched, error) = match result {
            Ok(response) => (response.options, None),
            Err(e) => {
                tracing::warn!(query, page, "option provider failed: {e}");
                (Vec::new(), Some(e))
            }
        };

        let has_reached_last_page = self.shared.pagination && fetched.is_empty();
        let options = merge_page(&inner.state.options, page, fetched);

        inner.cache.set(
            query,
            CacheEntry {
                page,
                options: options.clone(),
                has_reached_last_page,
            },
        );
        inner.state = LoadState {
            is_loading: false,
            is_loading_page: false,
            current_page: page,
            options,
            error,
        };
        self.publish(&inner);
        LoadOutcome::Applied
    }

    fn lock(&self) -> MutexGuard<'_, Inner<O>> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner<O>) {
        self.shared.updates.send_replace(inner.state.clone());
    }
}
