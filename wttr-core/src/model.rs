use serde::{Deserialize, Serialize};

/// Which wttr.in host renders an image snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageBackend {
    /// `wttr.in`, classic ANSI-style PNG.
    V1,
    /// `v2.wttr.in`, the data-rich layout.
    V2,
}

/// What shape of answer to ask wttr.in for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Full JSON document (`?format=j1`), decoded into a [`WeatherReport`].
    Report,
    /// Single line of text (`?format=4`).
    OneLine,
    /// PNG snapshot with an optional style string appended after `?`.
    Image {
        backend: ImageBackend,
        style: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub location: String,
    pub kind: RequestKind,
}

impl WeatherRequest {
    pub fn new(location: impl Into<String>, kind: RequestKind) -> Self {
        Self { location: location.into(), kind }
    }
}

/// A successful answer from the weather provider.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPayload {
    Report(WeatherReport),
    Line(String),
    Image(Vec<u8>),
}

/// Decoded weather for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub area: Area,
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub feels_like_c: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmph: f64,
    /// 16-point compass label, e.g. `"NNE"`.
    pub wind_compass: String,
    pub wind_degree: u16,
    pub condition_code: u16,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
    pub country: String,
    /// Empty when the provider has no region for the area.
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Provider date string, `YYYY-MM-DD`.
    pub date: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub total_snow_cm: f64,
    pub hourly: Vec<HourlySample>,
}

impl ForecastDay {
    /// Mean of the hourly precipitation values, zero for a day without samples.
    pub fn mean_precip_mm(&self) -> f64 {
        if self.hourly.is_empty() {
            return 0.0;
        }
        let total: f64 = self.hourly.iter().map(|h| h.precip_mm).sum();
        total / self.hourly.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Provider time of day, e.g. `"0"`, `"300"`, `"1200"`.
    pub time: String,
    pub condition_code: u16,
    pub description: String,
    pub wind_speed_kmph: f64,
    pub wind_compass: String,
    pub precip_mm: f64,
}
