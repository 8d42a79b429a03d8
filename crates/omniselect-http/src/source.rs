use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use omniselect_core::{OptionProvider, OptionsPage, OptionsRequest, ProviderResult};
use serde::de::DeserializeOwned;

use crate::client::RateLimitedClient;
use crate::error::Result;

const USER_AGENT: &str = concat!("omniselect/", env!("CARGO_PKG_VERSION"));

/// Option provider that queries a JSON endpoint.
///
/// Issues `GET {base_url}?{query_param}={query}&{page_param}={page}`, the page
/// parameter only when the request carries one, and expects a body of the
/// form `{"options": [...]}`.
pub struct HttpOptionProvider<O> {
    client: RateLimitedClient,
    base_url: String,
    query_param: String,
    page_param: String,
    _options: PhantomData<fn() -> O>,
}

impl<O> HttpOptionProvider<O> {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_params(base_url, Duration::from_millis(100), 3)
    }

    pub fn with_params(base_url: &str, min_interval: Duration, max_retries: u32) -> Result<Self> {
        let client = RateLimitedClient::new(min_interval, max_retries, USER_AGENT)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: RateLimitedClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            query_param: "q".to_string(),
            page_param: "page".to_string(),
            _options: PhantomData,
        }
    }

    pub fn query_param(mut self, name: &str) -> Self {
        self.query_param = name.to_string();
        self
    }

    pub fn page_param(mut self, name: &str) -> Self {
        self.page_param = name.to_string();
        self
    }

    fn url_for(&self, request: &OptionsRequest) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{sep}{}={}",
            self.base_url,
            urlencoding::encode(&self.query_param),
            urlencoding::encode(&request.query)
        );
        if let Some(page) = request.page {
            url.push_str(&format!("&{}={page}", urlencoding::encode(&self.page_param)));
        }
        url
    }
}

#[async_trait]
impl<O> OptionProvider<O> for HttpOptionProvider<O>
where
    O: DeserializeOwned + Send + 'static,
{
    async fn load_options(&self, request: &OptionsRequest) -> ProviderResult<O> {
        let url = self.url_for(request);
        tracing::debug!(%url, "fetching options");
        let page: OptionsPage<O> = self.client.get_json(&url).await?;
        Ok(page)
    }
}
