//! Single-link reachability probe
//!
//! This module handles the HTTP side of a check:
//! - Building the HTTP client with the configured user agent and redirect policy
//! - HEAD requests, with a ranged GET fallback for servers that refuse HEAD
//! - Latency measurement
//! - Error classification into `ProbeStatus`

use crate::checker::ProbeStatus;
use crate::config::{ProbeConfig, ProbeMethod};
use crate::source::Channel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RANGE};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::{Duration, Instant};
use url::Url;

/// Outcome of probing one channel
///
/// Constructed only through [`ProbeResult::success`] and
/// [`ProbeResult::failure`], so `latency_ms` is present exactly when the
/// channel is reachable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    channel: Channel,
    status: ProbeStatus,
    latency_ms: Option<u64>,
    tested_at: DateTime<Utc>,
}

impl ProbeResult {
    /// A reachable channel that answered with `status_code` after `latency_ms`
    pub fn success(channel: Channel, status_code: u16, latency_ms: u64) -> Self {
        Self {
            channel,
            status: ProbeStatus::Ok(status_code),
            latency_ms: Some(latency_ms),
            tested_at: Utc::now(),
        }
    }

    /// An unreachable channel
    ///
    /// A reachable `status` is downgraded to `Other`, keeping the
    /// reachable/latency pairing intact.
    pub fn failure(channel: Channel, status: ProbeStatus) -> Self {
        let status = match status {
            ProbeStatus::Ok(code) => ProbeStatus::Other(format!("HTTP {} without latency", code)),
            other => other,
        };
        Self {
            channel,
            status,
            latency_ms: None,
            tested_at: Utc::now(),
        }
    }

    /// Overrides the test timestamp
    pub fn with_tested_at(mut self, tested_at: DateTime<Utc>) -> Self {
        self.tested_at = tested_at;
        self
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn reachable(&self) -> bool {
        self.status.is_reachable()
    }

    pub fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }

    pub fn status(&self) -> &ProbeStatus {
        &self.status
    }

    /// HTTP status or error class, e.g. `HTTP 200` or `timeout`
    pub fn status_detail(&self) -> String {
        self.status.to_string()
    }

    pub fn tested_at(&self) -> DateTime<Utc> {
        self.tested_at
    }
}

/// A reachability check for one channel
///
/// Implementations must not fail outward: every call yields exactly one
/// `ProbeResult`.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, channel: &Channel) -> ProbeResult;
}

/// HTTP(S) prober backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    method: ProbeMethod,
    timeout: Duration,
}

impl HttpProber {
    /// Builds a prober from probe configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpProber)` - Ready to probe
    /// * `Err(reqwest::Error)` - The HTTP client could not be built (TLS backend failure)
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            method: config.method,
            timeout: config.timeout(),
        })
    }

    async fn send(
        &self,
        url: &str,
        method: ProbeMethod,
        timeout: Duration,
    ) -> Result<Response, reqwest::Error> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::RangeGet => self.client.get(url).header(RANGE, "bytes=0-0"),
        };
        request.timeout(timeout).send().await
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, channel: &Channel) -> ProbeResult {
        let url = channel.url.trim();

        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => {
                tracing::trace!("Skipping {} ({} scheme)", url, parsed.scheme());
                return ProbeResult::failure(
                    channel.clone(),
                    ProbeStatus::UnsupportedScheme(parsed.scheme().to_string()),
                );
            }
            Err(e) => {
                tracing::trace!("Invalid URL {}: {}", url, e);
                return ProbeResult::failure(channel.clone(), ProbeStatus::InvalidUrl);
            }
        }

        // One deadline covers the HEAD request and any fallback GET
        let started = Instant::now();
        let mut outcome = self.send(url, self.method, self.timeout).await;

        // Some stream servers reject HEAD outright
        if self.method == ProbeMethod::Head {
            if let Ok(response) = &outcome {
                if matches!(
                    response.status(),
                    StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
                ) {
                    let remaining = self.timeout.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        tracing::trace!("{} unavailable: HEAD refused after the deadline", url);
                        return ProbeResult::failure(channel.clone(), ProbeStatus::Timeout);
                    }
                    tracing::trace!("HEAD refused by {}, retrying with ranged GET", url);
                    outcome = self.send(url, ProbeMethod::RangeGet, remaining).await;
                }
            }
        }

        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                let code = response.status().as_u16();
                if code < 400 {
                    tracing::trace!("{} reachable: HTTP {} in {}ms", url, code, latency_ms);
                    ProbeResult::success(channel.clone(), code, latency_ms)
                } else {
                    tracing::trace!("{} unavailable: HTTP {}", url, code);
                    ProbeResult::failure(channel.clone(), ProbeStatus::BadStatus(code))
                }
            }
            Err(e) => {
                let status = classify_error(&e);
                tracing::trace!("{} unavailable: {}", url, status);
                ProbeResult::failure(channel.clone(), status)
            }
        }
    }
}

/// Builds an HTTP client for probing
///
/// Redirects are either not followed (a 3xx then counts as reachable) or
/// followed up to `max_redirects` hops.
pub fn build_http_client(config: &ProbeConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::limited(config.max_redirects)
    } else {
        Policy::none()
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .connect_timeout(config.timeout())
        .redirect(redirect)
        .pool_max_idle_per_host(4)
        .build()
}

/// Maps a client error onto the probe failure taxonomy
///
/// | Condition | Status |
/// |-----------|--------|
/// | Request/connect timeout | Timeout |
/// | Name resolution failure | DnsFailure |
/// | Refused/reset/TLS error | ConnectionError |
/// | Redirect limit exceeded | Other("too many redirects") |
/// | Anything else | Other(root cause) |
pub fn classify_error(error: &reqwest::Error) -> ProbeStatus {
    if error.is_timeout() {
        ProbeStatus::Timeout
    } else if is_dns_error(error) {
        ProbeStatus::DnsFailure
    } else if error.is_connect() {
        ProbeStatus::ConnectionError
    } else if error.is_redirect() {
        ProbeStatus::Other("too many redirects".to_string())
    } else {
        ProbeStatus::Other(root_cause(error))
    }
}

fn is_dns_error(error: &reqwest::Error) -> bool {
    const MARKERS: &[&str] = &[
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
    ];

    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        let message = err.to_string().to_lowercase();
        if MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        source = err.source();
    }
    false
}

fn root_cause(error: &reqwest::Error) -> String {
    let mut current: &(dyn std::error::Error + 'static) = error;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}
