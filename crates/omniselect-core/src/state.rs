use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Furthest fetched state for one normalized query.
///
/// Not a per-page record: fetching page 2 overwrites the page 1 entry with
/// the accumulated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<O> {
    pub page: u32,
    pub options: Vec<O>,
    pub has_reached_last_page: bool,
}

/// What the select currently shows, as owned by the load controller.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<O> {
    pub is_loading: bool,
    /// Set while fetching a further page of the current query rather than a fresh query.
    pub is_loading_page: bool,
    pub current_page: u32,
    pub options: Vec<O>,
    /// Last provider failure; cleared by the next successful response.
    pub error: Option<ProviderError>,
}

impl<O> Default for LoadState<O> {
    fn default() -> Self {
        Self {
            is_loading: false,
            is_loading_page: false,
            current_page: 1,
            options: Vec::new(),
            error: None,
        }
    }
}

/// Combine a freshly fetched page with what is already shown.
///
/// Page 1 replaces; later pages append to `prior`.
pub fn merge_page<O: Clone>(prior: &[O], page: u32, fetched: Vec<O>) -> Vec<O> {
    if page > 1 {
        let mut merged = Vec::with_capacity(prior.len() + fetched.len());
        merged.extend_from_slice(prior);
        merged.extend(fetched);
        merged
    } else {
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_first_page_replaces() {
        let merged = merge_page(&["old"], 1, vec!["a", "b"]);
        assert_eq!(merged, vec!["a", "b"]);
    }

    #[test]
    fn test_merge_later_page_appends() {
        let merged = merge_page(&["o1", "o2"], 2, vec!["o3"]);
        assert_eq!(merged, vec!["o1", "o2", "o3"]);
    }

    #[test]
    fn test_merge_empty_later_page_keeps_prior() {
        let merged: Vec<&str> = merge_page(&["o1"], 3, vec![]);
        assert_eq!(merged, vec!["o1"]);
    }

    #[test]
    fn test_default_state() {
        let state: LoadState<u8> = LoadState::default();
        assert_eq!(state.current_page, 1);
        assert!(!state.is_loading);
        assert!(!state.is_loading_page);
        assert!(state.options.is_empty());
        assert!(state.error.is_none());
    }
}
