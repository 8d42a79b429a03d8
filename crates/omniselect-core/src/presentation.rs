//! Derives what the rendering side shows from the load state.

use crate::config::PresentationConfig;
use crate::error::ProviderError;
use crate::state::LoadState;

/// Props handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectProps<O> {
    pub options: Vec<O>,
    pub placeholder: String,
    pub no_results_text: String,
    pub is_loading: bool,
    pub error: Option<ProviderError>,
}

/// Project `state` plus the current raw input into renderable props.
///
/// - the loading placeholder replaces the placeholder while loading;
/// - a fresh query hides stale options while loading if a loading
///   placeholder is configured, a page fetch keeps showing loaded pages;
/// - the empty-list text is the loading placeholder, else the no-results
///   text for non-empty input, else the search prompt.
pub fn project<O: Clone>(
    state: &LoadState<O>,
    config: &PresentationConfig,
    input: &str,
) -> SelectProps<O> {
    let loading_text = config
        .loading_placeholder
        .as_deref()
        .filter(|_| state.is_loading);

    let placeholder = loading_text.unwrap_or(&config.placeholder).to_string();

    let hide_options =
        state.is_loading && config.loading_placeholder.is_some() && !state.is_loading_page;
    let options = if hide_options {
        Vec::new()
    } else {
        state.options.clone()
    };

    let no_results_text = match (loading_text, config.no_results_text.as_deref()) {
        (Some(loading), _) => loading,
        (None, Some(no_results)) if !input.is_empty() => no_results,
        _ => config.search_prompt_text.as_str(),
    }
    .to_string();

    SelectProps {
        options,
        placeholder,
        no_results_text,
        is_loading: state.is_loading,
        error: state.error.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(is_loading: bool, is_loading_page: bool) -> LoadState<&'static str> {
        LoadState {
            is_loading,
            is_loading_page,
            current_page: 1,
            options: vec!["stale"],
            error: None,
        }
    }

    #[test]
    fn test_idle_with_input() {
        let props = project(&state(false, false), &PresentationConfig::default(), "ca");
        assert_eq!(props.placeholder, "Select...");
        assert_eq!(props.no_results_text, "No results found");
        assert_eq!(props.options, vec!["stale"]);
        assert!(!props.is_loading);
    }

    #[test]
    fn test_idle_without_input_prompts() {
        let props = project(&state(false, false), &PresentationConfig::default(), "");
        assert_eq!(props.no_results_text, "Type to search");
    }

    #[test]
    fn test_fresh_load_hides_options() {
        let props = project(&state(true, false), &PresentationConfig::default(), "ca");
        assert_eq!(props.placeholder, "Loading...");
        assert_eq!(props.no_results_text, "Loading...");
        assert!(props.options.is_empty());
        assert!(props.is_loading);
    }

    #[test]
    fn test_page_load_keeps_options() {
        let props = project(&state(true, true), &PresentationConfig::default(), "ca");
        assert_eq!(props.options, vec!["stale"]);
        assert_eq!(props.placeholder, "Loading...");
    }

    #[test]
    fn test_no_loading_placeholder_keeps_options() {
        let config = PresentationConfig {
            loading_placeholder: None,
            no_results_text: None,
            ..PresentationConfig::default()
        };
        let props = project(&state(true, false), &config, "ca");
        assert_eq!(props.options, vec!["stale"]);
        assert_eq!(props.placeholder, "Select...");
        assert_eq!(props.no_results_text, "Type to search");
        assert!(props.is_loading);
    }
}
