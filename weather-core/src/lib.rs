//! Core library for `herecast`.
//!
//! This crate defines:
//! - The four-stage pipeline: network advisory, geolocation, map view, weather + chart
//! - Seams for each platform capability (locator, map backend, drawing surface, notices)
//! - The Open-Meteo provider and shared domain models
//! - Configuration handling
//!
//! It is used by `herecast-cli`, but can also be driven by other front ends.

pub mod app;
pub mod chart;
pub mod condition;
pub mod config;
pub mod location;
pub mod map;
pub mod model;
pub mod network;
pub mod page;
pub mod provider;

pub use app::{App, AppState, Outcome, PipelineError, Platform, Report};
pub use chart::{
    Canvas, draw_temperature_chart,
    plot::{ChartError, PlotCanvas},
};
pub use config::{Config, GeolocationSource};
pub use location::{FixedLocator, Geolocator, IpLocator, LocationError};
pub use map::{MapBackend, MapError, MapView, TileId};
pub use model::{Coordinate, WeatherSnapshot};
pub use network::ConnectionInfo;
pub use page::{Field, Notifier, PageFields};
pub use provider::{OpenMeteoProvider, WeatherError, WeatherProvider};
