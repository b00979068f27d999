#[derive(Debug, thiserror::Error)]
pub enum IftaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response. `payload` is the server's error body, unchanged.
    #[error("API error ({status}): {payload}")]
    Api {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IftaError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            IftaError::Api { status, .. } => Some(*status),
            IftaError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Best-effort human message from the server payload (`message` or
    /// `error` field), falling back to the display form.
    pub fn server_message(&self) -> String {
        if let IftaError::Api { payload, .. } = self {
            let msg = payload
                .get("message")
                .or_else(|| payload.get("error"))
                .and_then(|v| v.as_str())
                .or_else(|| payload.as_str());
            if let Some(m) = msg {
                return m.to_string();
            }
        }
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, IftaError>;
