//! Channel acquisition
//!
//! This module turns an input (a local file or an HTTP(S) playlist URL) into
//! the ordered channel list the checker consumes:
//! - M3U / M3U8 playlist parsing
//! - Plain URL list parsing
//! - Playlist download with retry

mod fetch;
mod playlist;

pub use fetch::{fetch_playlist, load_channels, parse_channels};
pub use playlist::{parse_playlist, parse_url_list};

/// A single channel to be probed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    /// Display name; may be empty when the source had none
    pub name: String,

    /// Stream URL
    pub url: String,
}

impl Channel {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Name used by human-facing output; falls back to the URL when unnamed
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}
