use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent; some stream servers reject unknown clients
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Public playlist used when no input is given
pub const DEFAULT_PLAYLIST_URL: &str = "https://iptv-org.github.io/iptv/index.m3u";

/// Main configuration structure for iptv-probe
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

/// Request method used to test a stream URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeMethod {
    /// HEAD request, falling back to a ranged GET on 405/501
    #[default]
    Head,
    /// GET with `Range: bytes=0-0`
    RangeGet,
}

/// Probe behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProbeConfig {
    /// Per-link timeout in seconds
    pub timeout_seconds: f64,

    /// Maximum number of probes in flight at once
    pub concurrency_limit: usize,

    /// Request method
    pub method: ProbeMethod,

    /// Follow 3xx responses instead of counting them as reachable
    pub follow_redirects: bool,

    /// Redirect hop limit when following
    pub max_redirects: usize,

    /// User-Agent header sent with every probe
    pub user_agent: String,

    /// Log progress after this many completed probes
    pub progress_interval: usize,
}

impl ProbeConfig {
    /// Per-link timeout; non-finite or negative values fall back to 5s
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds).unwrap_or(Duration::from_secs(5))
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5.0,
            concurrency_limit: 100,
            method: ProbeMethod::Head,
            follow_redirects: false,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            progress_interval: 200,
        }
    }
}

/// Playlist acquisition configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Playlist fetched when no input is given on the command line
    pub playlist_url: String,

    /// Timeout for a single playlist download attempt (seconds)
    pub fetch_timeout_seconds: u64,

    /// Number of download attempts
    pub max_retries: u32,

    /// Pause between download attempts (seconds)
    pub retry_delay_seconds: u64,

    /// Drop repeated URLs while parsing
    pub dedupe: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            playlist_url: DEFAULT_PLAYLIST_URL.to_string(),
            fetch_timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 5,
            dedupe: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory export files are written to
    pub directory: String,

    /// Whether unreachable channels are exported
    pub include_unavailable: bool,

    pub csv_file: String,
    pub text_file: String,
    pub m3u_file: String,

    /// Target of the "available channels only" M3U export
    pub available_m3u_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            include_unavailable: true,
            csv_file: "iptv_channels.csv".to_string(),
            text_file: "iptv_channels.txt".to_string(),
            m3u_file: "iptv_channels.m3u".to_string(),
            available_m3u_file: "iptv_available_channels.m3u".to_string(),
        }
    }
}
