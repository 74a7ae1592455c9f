//! Map view description and the backend seam that renders it.
//!
//! The view itself is plain data: center, zoom, one tile layer and one marker.
//! Turning it into pixels is the backend's job.

use async_trait::async_trait;
use std::f64::consts::PI;
use std::fmt::Debug;

use crate::model::Coordinate;

pub const DEFAULT_ZOOM: u8 = 13;
pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];
pub const MARKER_POPUP: &str = "📍 You are here";

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Map container unavailable: {0}")]
    Container(String),
    #[error("Tile request failed: {0}")]
    Tile(String),
}

/// Address of one 256px tile in the Web Mercator pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl TileId {
    /// The tile containing `position` at `zoom`. Latitudes past the Mercator
    /// cut-off clamp to the edge row.
    pub fn containing(position: Coordinate, zoom: u8) -> Self {
        let n = 2f64.powi(i32::from(zoom));
        let max = n - 1.0;

        let x = ((position.longitude + 180.0) / 360.0 * n).floor();
        let lat = position.latitude.to_radians();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();

        Self {
            x: x.clamp(0.0, max) as u32,
            y: if y.is_nan() { 0 } else { y.clamp(0.0, max) as u32 },
            zoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub subdomains: Vec<String>,
}

impl TileLayer {
    pub fn openstreetmap() -> Self {
        Self {
            url_template: OSM_TILE_TEMPLATE.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            subdomains: OSM_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Concrete URL for `tile`, spreading requests over the subdomains by
    /// `(x + y) mod len`.
    pub fn tile_url(&self, tile: TileId) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = (u64::from(tile.x) + u64::from(tile.y)) % self.subdomains.len() as u64;
            self.subdomains[idx as usize].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub label: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub popup: Popup,
}

/// A fully described map: what the user sees after location succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub marker: Marker,
}

impl MapView {
    /// OSM tiles at the default zoom, with an open "you are here" popup on the center.
    pub fn centered_on(center: Coordinate) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
            tile_layer: TileLayer::openstreetmap(),
            marker: Marker {
                position: center,
                popup: Popup {
                    label: MARKER_POPUP.to_string(),
                    open: true,
                },
            },
        }
    }

    pub fn center_tile(&self) -> TileId {
        TileId::containing(self.center, self.zoom)
    }

    pub fn center_tile_url(&self) -> String {
        self.tile_layer.tile_url(self.center_tile())
    }
}

/// Something that can put a [`MapView`] on screen (the map container).
#[async_trait]
pub trait MapBackend: Send + Debug {
    async fn render(&mut self, view: &MapView) -> Result<(), MapError>;
}
