use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::core::client::CHART_PATH;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_BASE_URL: &str = "https://query1.finance.yahoo.com/";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CORS_ALLOW_ORIGINS: &str = "http://localhost:5173";

/// A `TS_*` variable that is set but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Log output selected by `TS_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines with target and line number.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(LogFormat::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err("expected `text` or `json`".into())
        }
    }
}

/// Server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// `TS_LISTEN_ADDR`, default `0.0.0.0:8080`.
    pub listen_addr: SocketAddr,
    /// Provider root, always ending in `/`; the chart path is joined onto it.
    pub upstream_base: Url,
    /// Whole-request timeout for one provider attempt (`TS_UPSTREAM_TIMEOUT_MS`).
    pub upstream_timeout: Duration,
    /// `TS_UPSTREAM_CONNECT_TIMEOUT_MS`; unset leaves reqwest's default.
    pub upstream_connect_timeout: Option<Duration>,
    /// Exact origins allowed cross-origin access. Never a wildcard.
    pub cors_allow: Vec<HeaderValue>,
    /// Directory served for any path the API does not claim (`TS_STATIC_DIR`).
    pub static_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None).expect("built-in defaults are valid")
    }
}

impl Config {
    /// Load from `TS_*` environment variables (after reading `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let raw = get("TS_LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr: SocketAddr = raw
            .parse()
            .map_err(|e| ConfigError::invalid("TS_LISTEN_ADDR", &raw, e))?;

        let raw = get("TS_UPSTREAM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL);
        let mut upstream_base =
            Url::parse(&raw).map_err(|e| ConfigError::invalid("TS_UPSTREAM_BASE_URL", &raw, e))?;
        if upstream_base.cannot_be_a_base() {
            return Err(ConfigError::invalid(
                "TS_UPSTREAM_BASE_URL",
                &raw,
                "not usable as a base URL",
            ));
        }
        if !upstream_base.path().ends_with('/') {
            let path = format!("{}/", upstream_base.path());
            upstream_base.set_path(&path);
        }

        let upstream_timeout = Duration::from_millis(parse_millis(
            "TS_UPSTREAM_TIMEOUT_MS",
            &get("TS_UPSTREAM_TIMEOUT_MS", &DEFAULT_UPSTREAM_TIMEOUT_MS.to_string()),
        )?);

        let upstream_connect_timeout = lookup("TS_UPSTREAM_CONNECT_TIMEOUT_MS")
            .map(|raw| parse_millis("TS_UPSTREAM_CONNECT_TIMEOUT_MS", &raw))
            .transpose()?
            .map(Duration::from_millis);

        let raw = get("TS_CORS_ALLOW_ORIGINS", DEFAULT_CORS_ALLOW_ORIGINS);
        let cors_allow = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                if origin == "*" {
                    return Err(ConfigError::invalid(
                        "TS_CORS_ALLOW_ORIGINS",
                        &raw,
                        "wildcard origins are not allowed",
                    ));
                }
                HeaderValue::from_str(origin)
                    .map_err(|e| ConfigError::invalid("TS_CORS_ALLOW_ORIGINS", &raw, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let static_dir = lookup("TS_STATIC_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let raw = get("TS_LOG_FORMAT", "text");
        let log_format = raw
            .parse::<LogFormat>()
            .map_err(|e: String| ConfigError::invalid("TS_LOG_FORMAT", &raw, e))?;

        Ok(Self {
            listen_addr,
            upstream_base,
            upstream_timeout,
            upstream_connect_timeout,
            cors_allow,
            static_dir,
            log_format,
        })
    }

    /// The chart endpoint base the provider client appends symbols to.
    pub fn chart_base(&self) -> Result<Url, url::ParseError> {
        self.upstream_base.join(CHART_PATH)
    }
}

fn parse_millis(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(key, raw, "must be greater than zero")),
        Ok(ms) => Ok(ms),
        Err(e) => Err(ConfigError::invalid(key, raw, e)),
    }
}
