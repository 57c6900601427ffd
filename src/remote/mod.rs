mod http;

#[cfg(test)]
mod mock;

pub use http::HttpListingFetcher;

#[cfg(test)]
pub use mock::MockListingFetcher;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Listing;

/// One-level-deep listings of a remote hierarchical namespace. The path
/// string is passed through exactly as the caller supplied it; the remote
/// side owns its interpretation.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch_listing(&self, path: &str) -> Result<Listing>;
}
