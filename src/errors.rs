use thiserror::Error;

/// Result type alias for alert provider operations
pub type Result<T> = std::result::Result<T, AlertProviderError>;

/// Errors that can occur when sending a custom alert
#[derive(Debug, Error)]
pub enum AlertProviderError {
    /// Provider configuration is invalid
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(&'static str),

    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Rendered method is not a valid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Rendered URL could not be parsed
    #[error("Invalid request URL '{url}': {source}")]
    InvalidUrl {
        /// URL after placeholder substitution
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Rendered header name or value is not valid in an HTTP request
    #[error("Invalid header '{name}'")]
    InvalidHeader {
        /// Header name as configured
        name: String,
    },

    /// HTTP request failed before a response was received
    #[error(transparent)]
    Request(#[from] reqwest_middleware::Error),

    /// Provider returned an error status code
    #[error("call to provider alert returned status code {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
}

impl AlertProviderError {
    /// Status code returned by the provider, if the request reached it
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
