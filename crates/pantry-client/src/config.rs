/// Page length requested from every list endpoint.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Connection settings for the REST collaborator and the push socket.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, e.g. `https://api.pantry.app/`.
    pub api_url: String,
    /// WebSocket URL of the push gateway, e.g. `wss://api.pantry.app/gateway`.
    pub gateway_url: String,
    /// Bearer token for REST calls, also handed to the gateway as a query
    /// parameter.
    pub token: String,
    pub page_size: usize,
}

impl ClientConfig {
    pub fn new(
        api_url: impl Into<String>,
        gateway_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            gateway_url: gateway_url.into(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Read `PANTRY_API_URL`, `PANTRY_GATEWAY_URL`, `PANTRY_TOKEN` and
    /// `PANTRY_PAGE_SIZE`, falling back to local-dev defaults.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("PANTRY_API_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        let gateway_url = std::env::var("PANTRY_GATEWAY_URL")
            .unwrap_or_else(|_| "ws://localhost:3000/gateway".into());
        let token = std::env::var("PANTRY_TOKEN").unwrap_or_else(|_| "dev-token".into());
        let page_size = std::env::var("PANTRY_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            api_url,
            gateway_url,
            token,
            page_size,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
