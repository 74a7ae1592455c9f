use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of hourly samples the chart plots.
pub const CHART_HOURS: usize = 24;

/// A position on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Human-readable place string, e.g. `Lat: 37.77490, Lon: -122.41940`.
    pub fn label(&self) -> String {
        format!("Lat: {:.5}, Lon: {:.5}", self.latitude, self.longitude)
    }
}

/// Current conditions plus the hourly temperature series, as returned by one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Current temperature in °C.
    pub temperature: f64,
    pub condition_code: i32,
    pub hourly_temperatures: Vec<f64>,
    pub observed_at: Option<NaiveDateTime>,
}

impl WeatherSnapshot {
    /// The leading samples fed to the chart: at most [`CHART_HOURS`], fewer if
    /// the provider returned a shorter series.
    pub fn chart_series(&self) -> &[f64] {
        let end = self.hourly_temperatures.len().min(CHART_HOURS);
        &self.hourly_temperatures[..end]
    }

    pub fn temperature_label(&self) -> String {
        format_temperature(self.temperature)
    }
}

/// `12.5` -> `12.5 °C`, `12.0` -> `12 °C`.
pub fn format_temperature(celsius: f64) -> String {
    // -0.0 + 0.0 is +0.0, so a rounded-down reading never prints as "-0".
    let celsius = celsius + 0.0;
    format!("{celsius} °C")
}
