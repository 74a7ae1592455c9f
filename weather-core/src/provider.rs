use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::{Coordinate, WeatherSnapshot};

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Everything that can go wrong while fetching a snapshot. The pipeline folds
/// all of these into one user-facing status; the variants exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Weather request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Malformed weather response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Hourly temperature missing at hour {0}")]
    MissingHour(usize),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One attempt, no retry.
    async fn get_weather(&self, position: Coordinate) -> Result<WeatherSnapshot, WeatherError>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
