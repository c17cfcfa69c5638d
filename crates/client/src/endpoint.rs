//! Resolution of the live-log WebSocket URL.

use logdeck_shared::LIVE_LOG_PATH;
use thiserror::Error;
use url::Url;

const DEFAULT_DEV_URL: &str = "ws://localhost:6185/api/live-log";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("LOGDECK_SERVER_URL is not set")]
    MissingServerUrl,
    #[error("invalid endpoint url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme `{0}` (expected http, https, ws or wss)")]
    UnsupportedScheme(String),
}

/// Which runtime the console is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// A locally running runtime; the full WebSocket URL is configurable.
    Development { url: String },
    /// A deployed runtime, given by its origin.
    Production { origin: Option<String> },
}

impl Environment {
    /// Read the environment from process variables.
    ///
    /// Environment variables:
    /// - `LOGDECK_ENV`: "development" | "production" (default: by build profile)
    /// - `LOGDECK_DEV_URL`: WebSocket URL in development (default: "ws://localhost:6185/api/live-log")
    /// - `LOGDECK_SERVER_URL`: origin of the runtime in production, e.g. "https://bot.example.com"
    pub fn from_env() -> Self {
        let default_mode = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        };
        let mode = std::env::var("LOGDECK_ENV")
            .unwrap_or_else(|_| default_mode.to_string())
            .to_lowercase();

        match mode.as_str() {
            "production" | "prod" => Environment::Production {
                origin: std::env::var("LOGDECK_SERVER_URL").ok(),
            },
            _ => Environment::Development {
                url: std::env::var("LOGDECK_DEV_URL")
                    .unwrap_or_else(|_| DEFAULT_DEV_URL.to_string()),
            },
        }
    }

    /// The WebSocket URL of the live-log endpoint.
    pub fn log_stream_url(&self) -> Result<Url, EndpointError> {
        match self {
            Environment::Development { url } => parse_ws(url),
            Environment::Production { origin } => {
                let origin = origin.as_deref().ok_or(EndpointError::MissingServerUrl)?;
                let base = parse_ws(&with_scheme(origin))?;
                base.join(LIVE_LOG_PATH)
                    .map_err(|source| EndpointError::InvalidUrl {
                        url: origin.to_string(),
                        source,
                    })
            }
        }
    }
}

/// Add a scheme to a bare `host[:port]`: plain http for local addresses,
/// https for everything else.
fn with_scheme(origin: &str) -> String {
    let origin = origin.trim().trim_end_matches('/');
    if origin.contains("://") {
        return origin.to_string();
    }
    let host_part = origin.split(':').next().unwrap_or(origin);
    let is_local = host_part == "localhost"
        || host_part == "127.0.0.1"
        || host_part == "0.0.0.0"
        || host_part.starts_with("192.168.")
        || host_part.starts_with("10.");
    if is_local {
        format!("http://{origin}")
    } else {
        format!("https://{origin}")
    }
}

/// Parse a URL and convert HTTP/HTTPS to WS/WSS.
fn parse_ws(raw: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(raw.trim()).map_err(|source| EndpointError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
    };
    if url.scheme() == scheme {
        return Ok(url);
    }
    // `set_scheme` refuses special-to-special changes, rebuild instead.
    let rebuilt = format!("{scheme}{}", &url.as_str()[url.scheme().len()..]);
    Url::parse(&rebuilt).map_err(|source| EndpointError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
