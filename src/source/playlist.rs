//! M3U playlist and URL list parsing

use crate::source::Channel;
use std::collections::HashSet;

/// Parses M3U playlist content into channels
///
/// Each `#EXTINF` line supplies the display name of the next URL line.
/// URL lines without a preceding `#EXTINF` get an empty name. Blank lines
/// and other directives (`#EXTM3U`, `#EXTGRP`, ...) are skipped.
///
/// # Arguments
///
/// * `content` - Playlist text
/// * `dedupe` - Keep only the first occurrence of each URL
///
/// # Examples
///
/// ```
/// use iptv_probe::source::parse_playlist;
///
/// let content = "#EXTM3U\n#EXTINF:-1 tvg-id=\"a\",News\nhttp://example.com/news.m3u8\n";
/// let channels = parse_playlist(content, true);
/// assert_eq!(channels[0].name, "News");
/// assert_eq!(channels[0].url, "http://example.com/news.m3u8");
/// ```
pub fn parse_playlist(content: &str, dedupe: bool) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut seen = HashSet::new();
    let mut pending_name: Option<String> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(info) = line.strip_prefix("#EXTINF:") {
            if pending_name.is_some() {
                tracing::trace!("EXTINF without URL before line {}", line_num + 1);
            }
            pending_name = Some(extinf_title(info).to_string());
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let name = pending_name.take().unwrap_or_default();
        if dedupe && !seen.insert(line.to_string()) {
            tracing::trace!("Skipping duplicate URL at line {}: {}", line_num + 1, line);
            continue;
        }
        channels.push(Channel::new(name, line));
    }

    tracing::debug!("Parsed {} channels from playlist", channels.len());
    channels
}

/// Parses a plain list with one channel per line
///
/// Lines are either `url` or `name,url`; blank lines and `#` comments are
/// ignored. Duplicates are kept.
pub fn parse_url_list(content: &str) -> Vec<Channel> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once(',') {
            Some((name, url)) if !url.trim().is_empty() && !name.contains("://") => {
                Channel::new(name.trim(), url.trim())
            }
            _ => Channel::new("", line),
        })
        .collect()
}

/// Returns the title part of an EXTINF body (`-1 key="v",Title` -> `Title`)
///
/// The separator is the first comma outside a quoted attribute value, so
/// titles containing commas survive.
fn extinf_title(info: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in info.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return info[idx + 1..].trim(),
            _ => {}
        }
    }
    ""
}
