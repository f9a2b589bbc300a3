use pantry_types::api::ApiError;

/// Everything a sync call can fail with.
///
/// Push application never produces one of these: gateway events degrade to
/// no-ops or counter-only updates, they do not error out.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with its normalized error body. Carried verbatim
    /// so the UI can surface `message` (and `data.target` when present).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The call blew its timeout tier before the backend answered.
    #[error("{what} timed out")]
    Timeout { what: &'static str },

    /// Transport failure underneath the request (connect, TLS, body decode).
    #[error(transparent)]
    Http(reqwest::Error),

    /// The push socket failed.
    #[error(transparent)]
    Gateway(#[from] tokio_tungstenite::tungstenite::Error),

    /// The configuration could not produce a usable client (unparseable
    /// base URL, token with non-header characters).
    #[error("bad configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// True for both request timeouts and backend 408s, so callers can show
    /// one "taking too long" treatment for either.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Api(err) => err.code == 408,
            _ => false,
        }
    }
}
