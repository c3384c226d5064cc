use reqwest::StatusCode;

/// Which provider endpoint a request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Weather,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
        }
    }

    /// Path segment appended to the provider base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Weather => "/weather",
            Endpoint::Forecast => "/forecast",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while talking to the weather provider.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error(
        "No API key provided.\n\
         Hint: run `weather configure`, pass --api-key or set OPENWEATHER_API_KEY."
    )]
    MissingCredential,

    #[error("Failed to fetch {endpoint} data: {}", truncate_body(.body))]
    Fetch {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to reach weather provider ({endpoint}): {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl WeatherError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Client errors (bad key, unknown city) and a missing key never change
    /// between attempts.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeatherError::MissingCredential => false,
            WeatherError::Fetch { status, .. } => !status.is_client_error(),
            WeatherError::Transport { .. } => true,
            WeatherError::Decode { .. } => false,
        }
    }
}

/// Reasons the device position could not be obtained.
///
/// Never shown to the user: the resolver falls back to the configured city.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location error: {0}")]
    Other(String),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
