use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::cache::TreeCache;
use crate::health::ServiceEndpoint;
use crate::remote::HttpListingFetcher;

/// One configured remote server of the admin dashboard.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerProfile {
    pub name: String,
    pub base_url: String,
    /// Opaque bearer token forwarded on listing requests
    #[serde(default)]
    pub token: Option<String>,
}

impl ServerProfile {
    pub fn fetcher(&self) -> HttpListingFetcher {
        let fetcher = HttpListingFetcher::new(self.base_url.as_str());
        match self.token.as_deref() {
            Some(token) => fetcher.with_token(token),
            None => fetcher,
        }
    }
}

/// On-disk configuration: servers to browse, services to health-check.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub servers: Vec<ServerProfile>,
    #[serde(default)]
    pub services: Vec<ServiceEndpoint>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

pub struct ServerEntry {
    pub profile: ServerProfile,
    pub cache: TreeCache,
}

/// Per-server tree caches. Switching the selection switches which cache is
/// read; the caches themselves never share state.
pub struct ServerRegistry {
    servers: Vec<ServerEntry>,
    selected: usize,
}

impl ServerRegistry {
    pub fn new(profiles: Vec<ServerProfile>) -> Self {
        let servers = profiles
            .into_iter()
            .map(|profile| ServerEntry {
                profile,
                cache: TreeCache::new(),
            })
            .collect();
        Self {
            servers,
            selected: 0,
        }
    }

    pub fn add(&mut self, profile: ServerProfile) {
        self.servers.push(ServerEntry {
            profile,
            cache: TreeCache::new(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerEntry> {
        self.servers.iter()
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        let index = self
            .servers
            .iter()
            .position(|entry| entry.profile.name == name)
            .with_context(|| format!("no server named {name:?} in config"))?;
        self.selected = index;
        Ok(())
    }

    pub fn selected(&self) -> Option<&ServerEntry> {
        self.servers.get(self.selected)
    }

    pub fn selected_mut(&mut self) -> Option<&mut ServerEntry> {
        self.servers.get_mut(self.selected)
    }
}
