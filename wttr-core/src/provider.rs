use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{WeatherPayload, WeatherRequest},
};

pub mod wttrin;

pub use wttrin::WttrInProvider;

/// Source of weather data for a single location query.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issue one request. No retries; the first failure is returned as-is.
    async fn fetch_weather(&self, request: &WeatherRequest)
    -> Result<WeatherPayload, WeatherError>;
}
