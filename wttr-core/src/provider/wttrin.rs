use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    error::WeatherError,
    model::{
        Area, CurrentConditions, ForecastDay, HourlySample, ImageBackend, RequestKind,
        WeatherPayload, WeatherReport, WeatherRequest,
    },
};

use super::WeatherProvider;

/// Exclusive upper bound of the cache-busting nonce.
const NONCE_RANGE: u16 = 32768;

/// Client for the wttr.in text, JSON and PNG endpoints.
#[derive(Debug, Clone)]
pub struct WttrInProvider {
    config: Config,
    http: Client,
}

impl WttrInProvider {
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(WeatherError::Client)?;

        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    /// Full request URL for `request`; `nonce` is only used by JSON requests.
    pub fn request_url(&self, request: &WeatherRequest, nonce: u16) -> String {
        let location = urlencoding::encode(&request.location);

        match &request.kind {
            RequestKind::Report => {
                format!("{}{location}?format=j1&nonce={nonce}", join_base(&self.config.base_url))
            }
            RequestKind::OneLine => {
                format!("{}{location}?format=4", join_base(&self.config.base_url))
            }
            RequestKind::Image { backend, style } => {
                let base = join_base(self.config.base_for(*backend));
                // The classic renderer wants an explicit style, `0` being the plain one.
                match (backend, style.as_deref()) {
                    (_, Some(style)) => format!("{base}{location}.png?{style}"),
                    (ImageBackend::V1, None) => format!("{base}{location}.png?0"),
                    (ImageBackend::V2, None) => format!("{base}{location}.png"),
                }
            }
        }
    }

    async fn get(&self, url: &str, location: &str) -> Result<Response, WeatherError> {
        info!(%url, "querying wttr.in");

        let res = self.http.get(url).send().await.map_err(|err| {
            warn!(%url, error = %err, "wttr.in request failed");
            WeatherError::Transport(err)
        })?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            info!(%url, %status, "could not find requested location");
            return Err(WeatherError::NotFound {
                location: location.to_string(),
            });
        }

        if !status.is_success() {
            let body = res.text().await.unwrap_or_else(|err| {
                warn!(%url, error = %err, "failed to read error response body");
                String::new()
            });
            warn!(%url, %status, "wttr.in returned an error status");
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(res)
    }
}

#[async_trait]
impl WeatherProvider for WttrInProvider {
    #[instrument(skip(self))]
    async fn fetch_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherPayload, WeatherError> {
        let nonce = rand::thread_rng().gen_range(0..NONCE_RANGE);
        let url = self.request_url(request, nonce);
        let res = self.get(&url, &request.location).await?;

        match request.kind {
            RequestKind::Report => {
                let body = res.text().await.map_err(WeatherError::Transport)?;
                let report = decode_report(&body)?;
                info!(%url, days = report.days.len(), "got weather report");
                Ok(WeatherPayload::Report(report))
            }
            RequestKind::OneLine => {
                let body = res.text().await.map_err(WeatherError::Transport)?;
                info!(%url, "got one-line weather");
                Ok(WeatherPayload::Line(body.trim().to_string()))
            }
            RequestKind::Image { .. } => {
                let bytes = res.bytes().await.map_err(WeatherError::Transport)?;
                info!(%url, bytes = bytes.len(), "got weather image");
                Ok(WeatherPayload::Image(bytes.to_vec()))
            }
        }
    }
}

/// Decode a `?format=j1` document into a [`WeatherReport`].
///
/// Numeric fields that fail to parse are logged and read as zero.
pub fn decode_report(body: &str) -> Result<WeatherReport, WeatherError> {
    let parsed: J1Response = serde_json::from_str(body)?;
    debug!(
        days = parsed.weather.len(),
        areas = parsed.nearest_area.len(),
        "decoded j1 response"
    );

    let current = parsed
        .current_condition
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Decode("response has no current_condition".into()))?;

    let area = parsed
        .nearest_area
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Decode("response has no nearest_area".into()))?;

    Ok(WeatherReport {
        current: current.into(),
        area: area.into(),
        days: parsed.weather.into_iter().map(ForecastDay::from).collect(),
    })
}

fn join_base(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}

fn parse_num<T: FromStr + Default>(field: &'static str, raw: &str) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(field, value = raw, "malformed numeric field, using zero");
        T::default()
    })
}

fn first_value(values: Vec<J1Value>) -> String {
    values.into_iter().next().map(|v| v.value).unwrap_or_default()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// wttr.in transports every number as a string.

#[derive(Debug, Deserialize)]
struct J1Response {
    current_condition: Vec<J1Current>,
    nearest_area: Vec<J1Area>,
    #[serde(default)]
    weather: Vec<J1Day>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct J1Value {
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct J1Current {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: String,
    humidity: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "winddir16Point")]
    winddir_16_point: String,
    #[serde(rename = "winddirDegree")]
    winddir_degree: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<J1Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct J1Area {
    #[serde(rename = "areaName")]
    area_name: Vec<J1Value>,
    country: Vec<J1Value>,
    region: Vec<J1Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct J1Day {
    date: String,
    #[serde(rename = "maxtempC")]
    maxtemp_c: String,
    #[serde(rename = "mintempC")]
    mintemp_c: String,
    #[serde(rename = "totalSnow_cm")]
    total_snow_cm: String,
    hourly: Vec<J1Hour>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct J1Hour {
    time: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<J1Value>,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "winddir16Point")]
    winddir_16_point: String,
    #[serde(rename = "precipMM")]
    precip_mm: String,
}

impl From<J1Current> for CurrentConditions {
    fn from(c: J1Current) -> Self {
        Self {
            temp_c: parse_num("temp_C", &c.temp_c),
            temp_f: parse_num("temp_F", &c.temp_f),
            feels_like_c: parse_num("FeelsLikeC", &c.feels_like_c),
            feels_like_f: parse_num("FeelsLikeF", &c.feels_like_f),
            humidity_pct: parse_num("humidity", &c.humidity),
            wind_speed_kmph: parse_num("windspeedKmph", &c.windspeed_kmph),
            wind_compass: c.winddir_16_point,
            wind_degree: parse_num("winddirDegree", &c.winddir_degree),
            condition_code: parse_num("weatherCode", &c.weather_code),
            description: first_value(c.weather_desc),
        }
    }
}

impl From<J1Area> for Area {
    fn from(a: J1Area) -> Self {
        Self {
            name: first_value(a.area_name),
            country: first_value(a.country),
            region: first_value(a.region),
        }
    }
}

impl From<J1Day> for ForecastDay {
    fn from(d: J1Day) -> Self {
        Self {
            max_temp_c: parse_num("maxtempC", &d.maxtemp_c),
            min_temp_c: parse_num("mintempC", &d.mintemp_c),
            total_snow_cm: parse_num("totalSnow_cm", &d.total_snow_cm),
            hourly: d.hourly.into_iter().map(HourlySample::from).collect(),
            date: d.date,
        }
    }
}

impl From<J1Hour> for HourlySample {
    fn from(h: J1Hour) -> Self {
        Self {
            condition_code: parse_num("weatherCode", &h.weather_code),
            wind_speed_kmph: parse_num("windspeedKmph", &h.windspeed_kmph),
            precip_mm: parse_num("precipMM", &h.precip_mm),
            description: first_value(h.weather_desc),
            wind_compass: h.winddir_16_point,
            time: h.time,
        }
    }
}
