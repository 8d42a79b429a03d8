//! `AsyncSelect` wires normalization, loading, selection and presentation
//! into the hooks a rendering widget calls.

use crate::cache::{CacheStore, LruStore, ResultCache};
use crate::config::SelectConfig;
use crate::controller::{LoadController, LoadTask};
use crate::normalize::normalize;
use crate::presentation::{SelectProps, project};
use crate::provider::OptionProvider;

type ChangeHandler<O> = Box<dyn FnMut(&[O]) + Send>;

pub struct AsyncSelect<O> {
    controller: LoadController<O>,
    config: SelectConfig,
    /// Raw text as typed, for display.
    input: String,
    /// Normalized form of `input`, the last query handed to the controller.
    query: String,
    value: Option<Vec<O>>,
    on_change: Option<ChangeHandler<O>>,
}

impl<O: Clone + Send + Sync + 'static> AsyncSelect<O> {
    /// Select with the cache described by `config.cache`.
    pub fn new<P>(provider: P, config: SelectConfig) -> Self
    where
        P: OptionProvider<O> + 'static,
    {
        let cache = match (config.cache.enabled, config.cache.capacity) {
            (false, _) => ResultCache::disabled(),
            (true, Some(capacity)) => ResultCache::with_store(LruStore::new(capacity)),
            (true, None) => ResultCache::new(),
        };
        Self::with_cache(provider, config, cache)
    }

    /// Select backed by a caller-supplied store, e.g. a `SharedStore` or `DiskStore`.
    pub fn with_store<P, S>(provider: P, config: SelectConfig, store: S) -> Self
    where
        P: OptionProvider<O> + 'static,
        S: CacheStore<O> + 'static,
    {
        Self::with_cache(provider, config, ResultCache::with_store(store))
    }

    /// Select that asks the provider on every load.
    pub fn without_cache<P>(provider: P, config: SelectConfig) -> Self
    where
        P: OptionProvider<O> + 'static,
    {
        Self::with_cache(provider, config, ResultCache::disabled())
    }

    pub fn with_cache<P>(provider: P, config: SelectConfig, cache: ResultCache<O>) -> Self
    where
        P: OptionProvider<O> + 'static,
    {
        let controller = LoadController::with_cache(provider, cache, config.pagination);
        Self {
            controller,
            config,
            input: String::new(),
            query: String::new(),
            value: None,
            on_change: None,
        }
    }

    /// Callback receiving every new selection after the selection gate ran.
    pub fn with_on_change(mut self, handler: impl FnMut(&[O]) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    /// Start with an existing selection.
    pub fn with_value(mut self, value: Vec<O>) -> Self {
        self.value = Some(value);
        self
    }

    /// Initial fetch for the empty query when `autoload` is set.
    pub fn mount(&self) -> Option<LoadTask> {
        self.config
            .autoload
            .then(|| self.controller.load_first(""))
    }

    /// Typing hook: normalizes, loads, and hands the raw text back untouched.
    pub fn on_input_change(&mut self, raw: &str) -> (String, LoadTask) {
        let query = normalize(raw, self.config.normalize_options());
        let task = self.controller.load_first(&query);
        self.input = raw.to_string();
        self.query = query;
        (raw.to_string(), task)
    }

    /// Menu reached its end: fetch the next page of the last query.
    pub fn on_menu_scroll_to_bottom(&self) -> Option<LoadTask> {
        self.controller.load_next_page(&self.query)
    }

    /// Selection hook.
    pub fn on_change(&mut self, values: Vec<O>) {
        let policy = self.config.selection_policy();
        if policy.should_clear(self.value.as_deref(), &values) {
            tracing::debug!(
                selected = values.len(),
                "clearing visible options after multi-select pick"
            );
            self.controller.clear_options();
        }
        let value = self.value.insert(values);
        if let Some(handler) = self.on_change.as_mut() {
            handler(value.as_slice());
        }
    }

    pub fn props(&self) -> SelectProps<O> {
        project(
            &self.controller.state(),
            &self.config.presentation,
            &self.input,
        )
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn value(&self) -> Option<&[O]> {
        self.value.as_deref()
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    pub fn controller(&self) -> &LoadController<O> {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::option::SelectOption;
    use crate::provider::StaticProvider;

    fn cafes() -> StaticProvider<SelectOption> {
        let items = ["Café Central", "Café Sacher", "Tea House"]
            .into_iter()
            .map(SelectOption::labelled)
            .collect();
        StaticProvider::from_options(items, SelectConfig::default().normalize_options())
    }

    fn labels(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.label.as_str()).collect()
    }

    #[tokio::test]
    async fn test_input_change_returns_raw_text() {
        let mut select = AsyncSelect::new(cafes(), SelectConfig::default());
        let (shown, task) = select.on_input_change("Café");

        assert_eq!(shown, "Café");
        assert_eq!(select.input(), "Café");
        assert_eq!(select.query(), "cafe");
        let _ = task.await;
        assert_eq!(
            labels(&select.props().options),
            vec!["Café Central", "Café Sacher"]
        );
    }

    #[tokio::test]
    async fn test_autoload_on_mount() {
        let select = AsyncSelect::new(cafes(), SelectConfig::default());
        let _ = select.mount().unwrap().await;
        assert_eq!(select.props().options.len(), 3);

        let config = SelectConfig {
            autoload: false,
            ..SelectConfig::default()
        };
        let select = AsyncSelect::new(cafes(), config);
        assert!(select.mount().is_none());
        assert!(select.props().options.is_empty());
        assert_eq!(select.props().no_results_text, "Type to search");
    }

    #[tokio::test]
    async fn test_multi_pick_clears_visible_options_only() {
        let config = SelectConfig {
            multi: true,
            clear_options_on_selection: true,
            ..SelectConfig::default()
        };
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut select = AsyncSelect::new(cafes(), config)
            .with_value(Vec::new())
            .with_on_change(move |values: &[SelectOption]| {
                sink.lock().unwrap().push(values.len());
            });

        let (_, task) = select.on_input_change("cafe");
        let _ = task.await;
        let central = select.props().options[0].clone();
        select.on_change(vec![central]);
        assert!(select.props().options.is_empty());

        // cache still answers the same query
        let (_, task) = select.on_input_change("cafe");
        assert!(task.is_ready());
        assert_eq!(select.props().options.len(), 2);

        // a removal does not clear
        select.on_change(Vec::new());
        assert_eq!(select.props().options.len(), 2);

        assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_scroll_without_pagination_is_noop() {
        let mut select = AsyncSelect::new(cafes(), SelectConfig::default());
        let (_, task) = select.on_input_change("tea");
        let _ = task.await;
        assert!(select.on_menu_scroll_to_bottom().is_none());
    }

    #[tokio::test]
    async fn test_without_cache_always_asks() {
        let mut select = AsyncSelect::without_cache(cafes(), SelectConfig::default());
        let (_, first) = select.on_input_change("tea");
        let (_, second) = select.on_input_change("tea");
        assert_eq!(first.await, crate::controller::LoadOutcome::Applied);
        assert_eq!(second.await, crate::controller::LoadOutcome::Applied);
        assert_eq!(select.controller().cache_stats(), (0, 0));
    }

    #[tokio::test]
    async fn test_disabled_cache_from_config() {
        let config = SelectConfig {
            cache: crate::config::CacheConfig {
                enabled: false,
                capacity: None,
            },
            ..SelectConfig::default()
        };
        let mut select = AsyncSelect::new(cafes(), config);
        let (_, first) = select.on_input_change("tea");
        let (_, second) = select.on_input_change("tea");
        assert_eq!(first.await, crate::controller::LoadOutcome::Applied);
        assert_eq!(second.await, crate::controller::LoadOutcome::Applied);
        assert_eq!(select.controller().generation(), 2);
    }
}
