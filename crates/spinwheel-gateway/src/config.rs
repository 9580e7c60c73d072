//! Gateway configuration loaded from environment variables.
//!
//! Variables:
//! - `NEXT_PUBLIC_CLIENT_ORIGIN` -- comma-separated viewer origins allowed
//!   by CORS (default `http://localhost:3000`)
//! - `PORT` -- listen port (default `3001`)
//! - `HOST` -- listen host (default `0.0.0.0`)
//! - `TIKFINITY_SECRET` -- webhook shared secret (optional)
//! - `DATA_DIR` -- directory for `segments.json` and `events.log`
//!   (default `data`)
//!
//! Public-URL hints, used only for the startup banner, are read from
//! `RAILWAY_STATIC_URL`, `RAILWAY_STATIC_URLS`, `RAILWAY_PUBLIC_URL`,
//! `PUBLIC_URL`, `APP_URL`, `VERCEL_URL` and `RENDER_EXTERNAL_URL`.

use std::path::PathBuf;

/// Default viewer origin (the local frontend dev server).
pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:3000";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// File name of the persisted segment list inside the data directory.
pub const SEGMENTS_FILE: &str = "segments.json";

/// File name of the spin event log inside the data directory.
pub const EVENTS_LOG_FILE: &str = "events.log";

/// Webhook path appended to public URLs in the startup banner.
pub const WEBHOOK_PATH: &str = "/webhook/tikfinity";

/// Env vars that may carry the deployment's public URL, in priority order.
const PUBLIC_URL_VARS: &[&str] = &[
    "RAILWAY_STATIC_URL",
    "RAILWAY_STATIC_URLS",
    "RAILWAY_PUBLIC_URL",
    "PUBLIC_URL",
    "APP_URL",
    "VERCEL_URL",
    "RENDER_EXTERNAL_URL",
];

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid {name}: {message}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// Complete gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    pub client_origins: Vec<String>,
    /// Shared secret required on the webhook, when set.
    pub webhook_secret: Option<String>,
    /// Directory holding persisted state.
    pub data_dir: PathBuf,
    /// Public URLs detected from the hosting platform's environment.
    pub public_urls: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
            client_origins: vec![String::from(DEFAULT_CLIENT_ORIGIN)],
            webhook_secret: None,
            data_dir: PathBuf::from("data"),
            public_urls: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let client_origins = var("NEXT_PUBLIC_CLIENT_ORIGIN").map_or(defaults.client_origins, |raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_owned)
                .collect()
        });

        let public_urls = PUBLIC_URL_VARS
            .iter()
            .filter_map(|&name| {
                var(name).map(|v| {
                    if name == "VERCEL_URL" {
                        format!("https://{v}")
                    } else {
                        v
                    }
                })
            })
            .collect();

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            client_origins,
            webhook_secret: var("TIKFINITY_SECRET"),
            data_dir: var("DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            public_urls,
        })
    }

    /// Path of the persisted segment list.
    pub fn segments_path(&self) -> PathBuf {
        self.data_dir.join(SEGMENTS_FILE)
    }

    /// Path of the spin event log.
    pub fn events_log_path(&self) -> PathBuf {
        self.data_dir.join(EVENTS_LOG_FILE)
    }

    /// Webhook URL operators should paste into the automation platform.
    ///
    /// Built from the first detected public URL, or the local address
    /// when none was detected.
    pub fn suggested_webhook_url(&self) -> String {
        self.public_urls.first().map_or_else(
            || format!("http://localhost:{}{WEBHOOK_PATH}", self.port),
            |url| format!("{}{WEBHOOK_PATH}", url.trim_end_matches('/')),
        )
    }
}
