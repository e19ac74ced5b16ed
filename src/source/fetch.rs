//! Playlist acquisition from local files or HTTP(S)

use crate::config::SourceConfig;
use crate::source::{parse_playlist, parse_url_list, Channel};
use crate::{SourceError, SourceResult};
use reqwest::Client;
use std::time::Duration;

/// Loads the channel list for `input`
///
/// `input` is either an `http://` / `https://` playlist URL, fetched with
/// retry, or a local file path. The content is parsed as M3U when it
/// carries `#EXTM3U` / `#EXTINF` markers and as a plain URL list otherwise.
///
/// # Returns
///
/// * `Ok(Vec<Channel>)` - At least one channel, in source order
/// * `Err(SourceError)` - Read or download failed, or nothing was found
pub async fn load_channels(input: &str, config: &SourceConfig) -> SourceResult<Vec<Channel>> {
    let content = if is_remote(input) {
        fetch_playlist(input, config).await?
    } else {
        tracing::info!("Reading channel list from {}", input);
        tokio::fs::read_to_string(input)
            .await
            .map_err(|source| SourceError::Read {
                path: input.to_string(),
                source,
            })?
    };

    let channels = parse_channels(&content, config.dedupe);
    if channels.is_empty() {
        return Err(SourceError::Empty(input.to_string()));
    }

    tracing::info!("Loaded {} channels from {}", channels.len(), input);
    Ok(channels)
}

/// Parses content as M3U or as a plain URL list, depending on its markers
pub fn parse_channels(content: &str, dedupe: bool) -> Vec<Channel> {
    if content.contains("#EXTM3U") || content.contains("#EXTINF") {
        parse_playlist(content, dedupe)
    } else {
        parse_url_list(content)
    }
}

/// Downloads a playlist, retrying failed attempts
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Timeout | Retry after `retry_delay_seconds` |
/// | Connection error | Retry after `retry_delay_seconds` |
/// | Non-2xx status | Retry after `retry_delay_seconds` |
/// | `max_retries` attempts exhausted | `SourceError::Fetch` |
pub async fn fetch_playlist(url: &str, config: &SourceConfig) -> SourceResult<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_seconds))
        .build()?;

    let attempts = config.max_retries.max(1);
    let delay = Duration::from_secs(config.retry_delay_seconds);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        tracing::info!(
            "Fetching playlist {} (attempt {}/{})",
            url,
            attempt,
            attempts
        );

        match try_fetch(&client, url).await {
            Ok(body) => return Ok(body),
            Err(message) => {
                tracing::warn!("Playlist fetch attempt {} failed: {}", attempt, message);
                last_error = message;
            }
        }

        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }

    Err(SourceError::Fetch {
        url: url.to_string(),
        attempts,
        message: last_error,
    })
}

async fn try_fetch(client: &Client, url: &str) -> Result<String, String> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            "request timeout".to_string()
        } else {
            e.to_string()
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    response.text().await.map_err(|e| e.to_string())
}

fn is_remote(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
