//! Error types for the relay binary.
//!
//! [`RelayError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the relay binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: spinwheel_gateway::ConfigError,
    },

    /// The segment store could not be opened.
    #[error("segment store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: spinwheel_core::StoreError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: spinwheel_gateway::ServerError,
    },

    /// The event log writer task panicked or was cancelled.
    #[error("event log writer error: {message}")]
    EventLog {
        /// Description of the writer failure.
        message: String,
    },
}
