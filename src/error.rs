use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup problems. The widget cannot run without these resolved.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{var} is not set; add your OpenWeatherMap API key to the .env file or export it before starting the widget")]
    MissingApiKey { var: &'static str },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A single poll failed. Recovered every cycle by showing the error labels.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("response is not valid weather JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response is missing {0}")]
    MissingField(&'static str),
}

/// The settings file could not be written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write settings to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}
