use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::models::Listing;

use super::ListingFetcher;

/// Fetches listings from a data lake admin backend over REST.
pub struct HttpListingFetcher {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpListingFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Opaque bearer token forwarded on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn listing_url(&self) -> String {
        format!("{}/api/filesystem", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch_listing(&self, path: &str) -> Result<Listing> {
        let url = self.listing_url();
        debug!("GET {url}?path={path}");

        let mut request = self.client.get(&url).query(&[("path", path)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("listing {path:?}"))?;

        response
            .json::<Listing>()
            .await
            .with_context(|| format!("decoding listing for {path:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_url_tolerates_trailing_slash() {
        let plain = HttpListingFetcher::new("http://localhost:8000");
        let slashed = HttpListingFetcher::new("http://localhost:8000/");
        assert_eq!(plain.listing_url(), "http://localhost:8000/api/filesystem");
        assert_eq!(slashed.listing_url(), plain.listing_url());
    }

    #[test]
    fn token_is_stored_opaquely() {
        let fetcher = HttpListingFetcher::new("http://localhost:8000").with_token("s3cr3t");
        assert_eq!(fetcher.token.as_deref(), Some("s3cr3t"));
    }
}
