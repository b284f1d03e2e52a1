use thiserror::Error;

/// Errors raised while resolving an adapter or talking to a provider
#[derive(Debug, Error)]
pub enum Error {
    /// No adapter is registered under the requested name
    #[error("unknown adapter: {0}")]
    UnknownAdapter(String),

    /// The provider answered with HTTP 403
    #[error("{status} - {body}")]
    Forbidden { status: u16, body: String },

    /// The provider reported a failure inside a successful HTTP response
    #[error("{0}")]
    Provider(String),

    /// The merged options could not be read into the adapter's settings
    #[error("invalid options for {adapter}: {source}")]
    InvalidOptions {
        adapter: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request signing key is not valid base64
    #[error("invalid signing key: {0}")]
    InvalidKey(#[from] base64::DecodeError),

    #[error("signing key has an invalid length")]
    KeyLength,

    /// The throttling interval implied by `qps_limit` cannot be slept
    #[error("invalid qps_limit {limit}: {source}")]
    InvalidQpsLimit {
        limit: f64,
        #[source]
        source: std::time::TryFromFloatSecsError,
    },

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP client failed before a response came back
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
