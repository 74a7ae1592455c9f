//! The locate → map → weather → chart pipeline.
//!
//! [`App`] owns every collaborator and the page state, runs each stage once in
//! order, and stops at the first stage that fails. Location and weather
//! failures end up in the status field; map failures are returned to the
//! caller untouched.

use crate::{
    chart::{Canvas, draw_temperature_chart},
    condition::classify,
    location::Geolocator,
    map::{MapBackend, MapError, MapView},
    model::{Coordinate, WeatherSnapshot},
    network::{ConnectionInfo, advisory},
    page::{
        Field, Notifier, PageFields, STATUS_LOCATION_FAILED, STATUS_UNSUPPORTED,
        STATUS_WEATHER_FAILED, STATUS_WEATHER_LOADED,
    },
    provider::WeatherProvider,
};

/// Capabilities the host exposes. `None` means the capability is missing.
#[derive(Debug, Default)]
pub struct Platform {
    pub geolocation: Option<Box<dyn Geolocator>>,
    pub connection: Option<ConnectionInfo>,
}

/// How far the pipeline got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unsupported,
    LocationFailed,
    WeatherFailed,
    Loaded,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Default)]
pub struct AppState {
    pub fields: PageFields,
    pub position: Option<Coordinate>,
    pub map: Option<MapView>,
    pub weather: Option<WeatherSnapshot>,
}

/// What a finished run leaves behind.
#[derive(Debug)]
pub struct Report<C> {
    pub outcome: Outcome,
    pub state: AppState,
    pub canvas: C,
}

#[derive(Debug)]
pub struct App<C: Canvas> {
    platform: Platform,
    map: Box<dyn MapBackend>,
    weather: Box<dyn WeatherProvider>,
    canvas: C,
    notifier: Box<dyn Notifier>,
    state: AppState,
}

impl<C: Canvas> App<C> {
    pub fn new(
        platform: Platform,
        map: Box<dyn MapBackend>,
        weather: Box<dyn WeatherProvider>,
        canvas: C,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            platform,
            map,
            weather,
            canvas,
            notifier,
            state: AppState::default(),
        }
    }

    /// Runs the whole pipeline once. There is no retry and no refresh: the app
    /// is consumed.
    pub async fn run(mut self) -> Result<Report<C>, PipelineError> {
        self.advise();

        let outcome = match self.locate().await {
            Ok(position) => {
                self.render_map(position).await?;
                self.load_weather(position).await
            }
            Err(halted) => halted,
        };

        tracing::info!(?outcome, status = self.state.fields.status(), "pipeline finished");
        Ok(Report {
            outcome,
            state: self.state,
            canvas: self.canvas,
        })
    }

    fn advise(&self) {
        if let Some(notice) = advisory(self.platform.connection.as_ref()) {
            tracing::warn!(connection = ?self.platform.connection, "constrained network");
            self.notifier.alert(notice);
        }
    }

    async fn locate(&mut self) -> Result<Coordinate, Outcome> {
        let Some(locator) = self.platform.geolocation.as_ref() else {
            tracing::info!("no geolocation capability");
            self.state.fields.set(Field::Status, STATUS_UNSUPPORTED);
            return Err(Outcome::Unsupported);
        };

        match locator.current_position().await {
            Ok(position) => {
                tracing::info!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    "position acquired"
                );
                self.state.position = Some(position);
                Ok(position)
            }
            Err(e) => {
                tracing::info!(error = %e, "position request failed");
                self.state.fields.set(Field::Status, STATUS_LOCATION_FAILED);
                Err(Outcome::LocationFailed)
            }
        }
    }

    async fn render_map(&mut self, position: Coordinate) -> Result<(), MapError> {
        let view = MapView::centered_on(position);
        self.map.render(&view).await?;
        tracing::info!(tile = %view.center_tile_url(), "map rendered");
        self.state.map = Some(view);
        Ok(())
    }

    async fn load_weather(&mut self, position: Coordinate) -> Outcome {
        let snapshot = match self.weather.get_weather(position).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "weather fetch failed");
                self.state.fields.set(Field::Status, STATUS_WEATHER_FAILED);
                return Outcome::WeatherFailed;
            }
        };

        let fields = &mut self.state.fields;
        fields.set(Field::Status, STATUS_WEATHER_LOADED);
        fields.set(Field::Location, position.label());
        fields.set(Field::Temperature, snapshot.temperature_label());
        fields.set(Field::Condition, classify(snapshot.condition_code));

        draw_temperature_chart(&mut self.canvas, snapshot.chart_series());
        self.state.weather = Some(snapshot);
        Outcome::Loaded
    }
}
