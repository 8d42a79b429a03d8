use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{OptionProvider, OptionsPage, OptionsRequest, ProviderResult};
use crate::normalize::{NormalizeOptions, normalize};
use crate::option::SelectOption;

type Matcher<O> = Arc<dyn Fn(&O, &str) -> bool + Send + Sync>;

/// Provider over a fixed, in-memory list of options.
///
/// Filters with a caller-supplied matcher and, for paginated requests, slices
/// the matches into pages of `page_size`. Answers immediately unless a
/// latency is configured.
pub struct StaticProvider<O> {
    items: Vec<O>,
    matcher: Matcher<O>,
    page_size: usize,
    latency: Option<Duration>,
}

impl<O: Clone + Send + Sync + 'static> StaticProvider<O> {
    pub fn new(items: Vec<O>, matcher: impl Fn(&O, &str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            items,
            matcher: Arc::new(matcher),
            page_size: 25,
            latency: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Delay every response, to behave like a remote source.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matches(&self, request: &OptionsRequest) -> Vec<O> {
        let hits = self
            .items
            .iter()
            .filter(|item| request.query.is_empty() || (self.matcher)(item, &request.query));

        match request.page {
            Some(page) => {
                let skip = (page.max(1) as usize - 1) * self.page_size;
                hits.skip(skip).take(self.page_size).cloned().collect()
            }
            None => hits.cloned().collect(),
        }
    }
}

impl StaticProvider<SelectOption> {
    /// Match labels against the query after normalizing them the same way
    /// the select normalizes typed input.
    pub fn from_options(items: Vec<SelectOption>, opts: NormalizeOptions) -> Self {
        Self::new(items, move |opt: &SelectOption, query: &str| {
            normalize(&opt.label, opts).contains(query)
        })
    }
}

#[async_trait]
impl<O: Clone + Send + Sync + 'static> OptionProvider<O> for StaticProvider<O> {
    async fn load_options(&self, request: &OptionsRequest) -> ProviderResult<O> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(OptionsPage::new(self.matches(request)))
    }
}
