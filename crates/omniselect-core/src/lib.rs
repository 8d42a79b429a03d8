//! omniselect-core — asynchronous option loading for search-driven selects.
//!
//! Typed text is normalized into a query, looked up in a per-query result
//! cache and, when needed, fetched from an [`OptionProvider`]. Pages of the
//! same query accumulate. Only the most recently issued request may change
//! what is shown, however the provider's responses are ordered.

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod normalize;
pub mod option;
pub mod presentation;
pub mod provider;
pub mod select;
pub mod selection;
pub mod state;

pub use cache::{CacheStore, DiskStore, LruStore, MemoryStore, ResultCache, SharedStore};
pub use config::{CacheConfig, PresentationConfig, SelectConfig};
pub use controller::{Generation, LoadController, LoadOutcome, LoadTask};
pub use error::{ProviderError, Result, SelectError};
pub use normalize::{NormalizeOptions, normalize};
pub use option::SelectOption;
pub use presentation::{SelectProps, project};
pub use provider::{
    CallbackProvider, FnProvider, OptionProvider, OptionsPage, OptionsRequest, ProviderResult,
    Responder, StaticProvider,
};
pub use select::AsyncSelect;
pub use selection::SelectionPolicy;
pub use state::{CacheEntry, LoadState, merge_page};
