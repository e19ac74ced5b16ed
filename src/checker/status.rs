//! Probe outcome classification

use std::fmt;

/// Every probe ends in exactly one of these; network failures are data here,
/// never errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    // ===== Success =====
    /// Response received with a status below 400
    Ok(u16),

    // ===== Failures =====
    /// Response received with a 4xx/5xx status
    BadStatus(u16),

    /// No response within the probe timeout
    Timeout,

    /// Host name could not be resolved
    DnsFailure,

    /// Connection refused, reset, or TLS handshake failure
    ConnectionError,

    /// URL could not be parsed
    InvalidUrl,

    /// Scheme other than HTTP(S); the link needs a manual check
    UnsupportedScheme(String),

    /// Anything else the HTTP client reported
    Other(String),
}

impl ProbeStatus {
    /// Returns true if the link counts as available
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns true if the link was skipped rather than tested
    pub fn needs_manual_check(&self) -> bool {
        matches!(self, Self::UnsupportedScheme(_))
    }

    /// HTTP status code, when a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Ok(code) | Self::BadStatus(code) => Some(*code),
            _ => None,
        }
    }

    /// Coarse bucket name used for summary breakdowns
    pub fn category(&self) -> &'static str {
        match self {
            Self::Ok(_) => "ok",
            Self::BadStatus(_) => "bad status",
            Self::Timeout => "timeout",
            Self::DnsFailure => "dns failure",
            Self::ConnectionError => "connection error",
            Self::InvalidUrl => "invalid url",
            Self::UnsupportedScheme(_) => "unsupported scheme",
            Self::Other(_) => "error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(code) | Self::BadStatus(code) => write!(f, "HTTP {}", code),
            Self::UnsupportedScheme(scheme) => write!(f, "unsupported scheme: {}", scheme),
            Self::Other(message) => write!(f, "error: {}", message),
            other => f.write_str(other.category()),
        }
    }
}
