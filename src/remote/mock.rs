use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::{Listing, ListingEntry};

use super::ListingFetcher;

#[derive(Clone, Debug)]
enum Response {
    Ok(Vec<ListingEntry>),
    Err(String),
}

/// Canned per-path listings plus a call log, keyed by the exact
/// (unnormalized) path string the cache passes through.
#[derive(Clone, Default)]
pub struct MockListingFetcher {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<String, Response>,
    calls: Vec<String>,
}

impl MockListingFetcher {
    pub fn set_listing(&self, path: impl Into<String>, entries: Vec<ListingEntry>) {
        let mut inner = self.inner.lock().expect("mock fetcher lock");
        inner.responses.insert(path.into(), Response::Ok(entries));
    }

    pub fn set_error(&self, path: impl Into<String>, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock fetcher lock");
        inner
            .responses
            .insert(path.into(), Response::Err(message.into()));
    }

    pub fn calls(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("mock fetcher lock");
        inner.calls.clone()
    }
}

#[async_trait]
impl ListingFetcher for MockListingFetcher {
    async fn fetch_listing(&self, path: &str) -> Result<Listing> {
        let mut inner = self.inner.lock().expect("mock fetcher lock");
        inner.calls.push(path.to_owned());

        match inner.responses.get(path) {
            Some(Response::Ok(entries)) => Ok(Listing {
                entries: entries.clone(),
            }),
            Some(Response::Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("no mock listing for {path:?}")),
        }
    }
}
