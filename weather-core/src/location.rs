use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::model::Coordinate;

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Why a one-shot position request failed.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
}

/// A platform geolocation capability.
///
/// Each call is a single attempt. Implementations must not retry.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Reports a position supplied up front (CLI flags or config).
#[derive(Debug, Clone)]
pub struct FixedLocator {
    position: Coordinate,
}

impl FixedLocator {
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        if !self.position.is_valid() {
            return Err(LocationError::PositionUnavailable(format!(
                "configured position out of range: {}, {}",
                self.position.latitude, self.position.longitude
            )));
        }
        Ok(self.position)
    }
}

/// Approximates the position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

#[async_trait]
impl Geolocator for IpLocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        tracing::debug!(url = %self.url, "requesting IP position");

        let res = self
            .http
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, concat!("herecast/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        let status = res.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(LocationError::PositionUnavailable(format!(
                "lookup failed with status {status}"
            )));
        }

        let body: IpLookupResponse = res
            .json()
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        if body.error {
            return Err(LocationError::PositionUnavailable(
                body.reason.unwrap_or_else(|| "lookup reported an error".to_string()),
            ));
        }

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => {
                let position = Coordinate::new(latitude, longitude);
                if position.is_valid() {
                    Ok(position)
                } else {
                    Err(LocationError::PositionUnavailable(format!(
                        "lookup returned out-of-range position {latitude}, {longitude}"
                    )))
                }
            }
            _ => Err(LocationError::PositionUnavailable(
                "lookup response has no coordinates".to_string(),
            )),
        }
    }
}
