use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use reqwest::Client;
use serde::Deserialize;
use tokio::time;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// An external service checked by polling, e.g. a notebook server or a
/// workflow UI sitting next to the data lake backend.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub base_url: String,
    /// Paths tried in order until one answers; "/" when empty
    #[serde(default)]
    pub probe_paths: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub online: bool,
    pub response_time: Duration,
    pub checked_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Polls services over HTTP with a hard per-request timeout.
pub struct HealthMonitor {
    client: Client,
    timeout: Duration,
}

impl HealthMonitor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building health check client")?;
        Ok(Self { client, timeout })
    }

    /// Probe a service once. Any HTTP response counts as reachable,
    /// regardless of status code; failures are reported inside the status,
    /// never as an `Err`.
    pub async fn probe(&self, service: &ServiceEndpoint) -> HealthStatus {
        let started = Instant::now();
        let mut last_error = None;

        for path in probe_paths(service) {
            let url = format!("{}{}", service.base_url.trim_end_matches('/'), path);
            match self.client.get(&url).send().await {
                Ok(_) => {
                    return HealthStatus {
                        online: true,
                        response_time: started.elapsed(),
                        checked_at: Utc::now(),
                        error: None,
                    };
                }
                Err(err) => {
                    last_error = Some(describe_error(&err, self.timeout));
                }
            }
        }

        HealthStatus {
            online: false,
            response_time: started.elapsed(),
            checked_at: Utc::now(),
            error: last_error,
        }
    }

    /// Probe every service on a fixed interval, handing each result to
    /// `report`. Runs until the surrounding task is dropped.
    pub async fn watch<F>(&self, services: &[ServiceEndpoint], interval: Duration, mut report: F)
    where
        F: FnMut(&ServiceEndpoint, HealthStatus),
    {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            for service in services {
                let status = self.probe(service).await;
                if !status.online {
                    warn!(
                        "{} offline: {}",
                        service.name,
                        status.error.as_deref().unwrap_or("unknown error")
                    );
                }
                report(service, status);
            }
        }
    }
}

fn probe_paths(service: &ServiceEndpoint) -> Vec<String> {
    if service.probe_paths.is_empty() {
        return vec!["/".to_owned()];
    }
    service
        .probe_paths
        .iter()
        .map(|path| {
            if path.starts_with('/') {
                path.clone()
            } else {
                format!("/{path}")
            }
        })
        .collect()
}

fn describe_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("connection timeout ({}s)", timeout.as_secs())
    } else if err.is_connect() {
        "server unreachable".to_owned()
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn spawn_static_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response =
                    format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}")
    }

    fn service(base_url: String) -> ServiceEndpoint {
        ServiceEndpoint {
            name: "svc".to_owned(),
            base_url,
            probe_paths: Vec::new(),
        }
    }

    #[tokio::test]
    async fn responding_service_is_online() {
        let base_url = spawn_static_server("HTTP/1.1 200 OK").await;
        let monitor = HealthMonitor::new(DEFAULT_PROBE_TIMEOUT).unwrap();

        let status = monitor.probe(&service(base_url)).await;
        assert!(status.online);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn any_http_response_counts_as_reachable() {
        let base_url = spawn_static_server("HTTP/1.1 404 Not Found").await;
        let monitor = HealthMonitor::new(DEFAULT_PROBE_TIMEOUT).unwrap();

        let status = monitor.probe(&service(base_url)).await;
        assert!(status.online);
    }

    #[tokio::test]
    async fn unreachable_service_reports_offline_with_error() {
        // Bind and drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let monitor = HealthMonitor::new(Duration::from_secs(1)).unwrap();
        let status = monitor.probe(&service(format!("http://{addr}"))).await;

        assert!(!status.online);
        assert!(status.error.is_some());
    }

    #[tokio::test]
    async fn later_probe_path_rescues_the_check() {
        // Drops connections on /api/status, answers everything else.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                if request.contains("/api/status") {
                    continue;
                }
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                    .await;
            }
        });

        let monitor = HealthMonitor::new(Duration::from_secs(1)).unwrap();
        let endpoint = ServiceEndpoint {
            name: "svc".to_owned(),
            base_url: format!("http://{addr}"),
            probe_paths: vec!["/api/status".to_owned(), "tree".to_owned()],
        };
        let status = monitor.probe(&endpoint).await;
        assert!(status.online);
    }

    #[test]
    fn probe_paths_default_and_get_leading_slashes() {
        let bare = service("http://localhost".to_owned());
        assert_eq!(probe_paths(&bare), vec!["/"]);

        let endpoint = ServiceEndpoint {
            name: "svc".to_owned(),
            base_url: "http://localhost".to_owned(),
            probe_paths: vec!["api/status".to_owned(), "/lab".to_owned()],
        };
        assert_eq!(probe_paths(&endpoint), vec!["/api/status", "/lab"]);
    }

    #[test]
    fn endpoint_deserializes_without_probe_paths() {
        let endpoint: ServiceEndpoint =
            serde_json::from_str(r#"{"name":"jupyter","base_url":"http://localhost:8888"}"#)
                .unwrap();
        assert!(endpoint.probe_paths.is_empty());
    }
}
