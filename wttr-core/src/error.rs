//! Error types for the weather client and the chat-platform seam.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching weather for one request.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network failure, timeout, or an unreadable response body.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// wttr.in answered 404 for the location.
    #[error("location not found: {location}")]
    NotFound { location: String },

    /// Any other non-2xx answer.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The body did not match the j1 schema.
    #[error("could not decode weather data: {0}")]
    Decode(String),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Failures reported by the host chat platform.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("unknown guild: {0}")]
    UnknownGuild(String),

    #[error("failed to send to channel {channel_id}: {reason}")]
    Send { channel_id: String, reason: String },
}
