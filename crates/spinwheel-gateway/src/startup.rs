//! Operator-facing startup banner.
//!
//! Tells the operator where the server listens and which URL to paste
//! into the automation platform. Public URLs come from the hosting
//! platform's environment (see [`GatewayConfig::public_urls`]).

use tracing::info;

use crate::config::GatewayConfig;

/// Log the listen address, segment count and suggested webhook URL.
pub fn announce(config: &GatewayConfig, segment_count: usize) {
    info!(host = %config.host, port = config.port, "Server running");
    info!(count = segment_count, "Segments loaded");

    if config.webhook_secret.is_none() {
        info!("No webhook secret configured, webhook accepts unauthenticated calls");
    }

    if config.public_urls.is_empty() {
        info!("No public URL detected in environment variables");
        info!("Check the hosting platform's deployment page for the public URL");
        info!(url = %config.suggested_webhook_url(), "Local webhook URL");
    } else {
        info!(urls = %config.public_urls.join(", "), "Detected public URL(s)");
        info!(url = %config.suggested_webhook_url(), "Suggested webhook URL");
    }
}
