use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use omniselect_core::{NormalizeOptions, OptionProvider, SelectOption, StaticProvider};
use omniselect_http::HttpOptionProvider;

pub type SharedProvider = Arc<dyn OptionProvider<SelectOption>>;

/// How a `--source` is turned into a provider.
pub struct SourceSettings {
    pub page_size: Option<usize>,
    pub latency: Option<Duration>,
    pub normalize: NormalizeOptions,
}

/// A file source holds either a bare list or a page object.
#[derive(Deserialize)]
#[serde(untagged)]
enum FileContents {
    List(Vec<FileEntry>),
    Page { options: Vec<FileEntry> },
}

/// Entries may be full `{label, value}` records or plain labels.
#[derive(Deserialize)]
#[serde(untagged)]
enum FileEntry {
    Option(SelectOption),
    Label(String),
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn open(source: &str, settings: &SourceSettings) -> Result<SharedProvider> {
    if is_remote(source) {
        let provider = HttpOptionProvider::<SelectOption>::new(source)
            .with_context(|| format!("building HTTP client for {source}"))?;
        return Ok(Arc::new(provider));
    }

    let items = read_options(Path::new(source))?;
    tracing::debug!(source, count = items.len(), "loaded file source");

    let mut provider = StaticProvider::from_options(items, settings.normalize);
    if let Some(page_size) = settings.page_size {
        provider = provider.with_page_size(page_size);
    }
    if let Some(latency) = settings.latency {
        provider = provider.with_latency(latency);
    }
    Ok(Arc::new(provider))
}

pub fn read_options(path: &Path) -> Result<Vec<SelectOption>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading options from {}", path.display()))?;
    let contents: FileContents = serde_json::from_str(&content)
        .with_context(|| format!("parsing options in {}", path.display()))?;

    let entries = match contents {
        FileContents::List(entries) | FileContents::Page { options: entries } => entries,
    };
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            FileEntry::Option(option) => option,
            FileEntry::Label(label) => SelectOption::labelled(label),
        })
        .collect())
}

/// Directory-safe name for the on-disk cache of a source.
pub fn cache_namespace(source: &str) -> String {
    source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
