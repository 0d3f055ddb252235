//! Error types for the fallible edges of the crate: layout documents, configuration files and
//! the remote workflow service. Structural editing operations never fail; they return `false`.

use thiserror::Error;

/// Errors raised while importing or persisting a layout document.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The text is not JSON at all
    #[error("layout is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// `nodes` or `edges` is absent or not an array
    #[error("layout document has no `{0}` array")]
    MissingArray(&'static str),

    /// An entry does not have the node/edge shape
    #[error("layout document is malformed: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    /// Two nodes or two edges share an id
    #[error("layout document contains duplicate node or edge ids")]
    DuplicateIds,

    /// Reading or writing the layout file failed
    #[error("layout file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading the editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by a remote workflow service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The response body could not be decoded
    #[error("failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required field is absent from the response
    #[error("service response is missing `{0}`")]
    MissingField(&'static str),

    /// Any other service-side failure
    #[error("{0}")]
    Other(String),
}
