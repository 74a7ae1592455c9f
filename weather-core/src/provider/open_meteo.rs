use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{CHART_HOURS, Coordinate, WeatherSnapshot};

use super::{WeatherError, WeatherProvider, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
const FORECAST_PATH: &str = "/v1/forecast";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Current weather plus the hourly `temperature_2m` series for `position`.
    pub fn forecast_url(&self, position: Coordinate) -> String {
        format!(
            "{}{}?latitude={}&longitude={}&current_weather=true&hourly=temperature_2m",
            self.base_url, FORECAST_PATH, position.latitude, position.longitude
        )
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    weathercode: i32,
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: OmCurrentWeather,
    hourly: OmHourly,
}

fn parse_forecast(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let parsed: OmForecastResponse = serde_json::from_str(body)?;

    let observed_at = parsed
        .current_weather
        .time
        .as_deref()
        .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M").ok());

    Ok(WeatherSnapshot {
        temperature: parsed.current_weather.temperature,
        condition_code: parsed.current_weather.weathercode,
        hourly_temperatures: leading_hours(parsed.hourly.temperature_2m)?,
        observed_at,
    })
}

/// Gaps are only fatal inside the charted window. Past it, the series is cut
/// at the first gap.
fn leading_hours(hourly: Vec<Option<f64>>) -> Result<Vec<f64>, WeatherError> {
    let window = hourly.len().min(CHART_HOURS);
    if let Some(hour) = hourly[..window].iter().position(Option::is_none) {
        return Err(WeatherError::MissingHour(hour));
    }
    Ok(hourly.into_iter().map_while(|t| t).collect())
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, position: Coordinate) -> Result<WeatherSnapshot, WeatherError> {
        let url = self.forecast_url(position);
        tracing::debug!(%url, "requesting forecast");

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Http {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let snapshot = parse_forecast(&body)?;
        tracing::info!(
            temperature = snapshot.temperature,
            code = snapshot.condition_code,
            hours = snapshot.hourly_temperatures.len(),
            "forecast received"
        );
        Ok(snapshot)
    }
}
