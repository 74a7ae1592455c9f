//! Terminal rendering of the page: notices, the map section and the text fields.

use async_trait::async_trait;
use herecast_core::{
    AppState, Field, MapBackend, MapError, MapView, Notifier,
    map::TileId,
    page::{CHART_ELEMENT_ID, MAP_ELEMENT_ID},
};
use std::{
    fs,
    io::IsTerminal,
    path::{Path, PathBuf},
};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Prints the notice and, on an interactive terminal, waits for Enter.
#[derive(Debug)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        if std::io::stdin().is_terminal() {
            // Any answer (or a closed prompt) just dismisses the notice.
            let _ = inquire::Text::new(&format!("⚠ {message}"))
                .with_help_message("press Enter to continue")
                .prompt();
        } else {
            eprintln!("⚠ {message}");
        }
    }
}

/// Prints the map view and optionally saves its center tile.
#[derive(Debug)]
pub struct TerminalMap {
    tile_path: Option<PathBuf>,
    http: reqwest::Client,
}

impl TerminalMap {
    pub fn new(tile_path: Option<PathBuf>) -> Self {
        Self {
            tile_path,
            http: reqwest::Client::new(),
        }
    }

    async fn save_tile(&self, url: &str, path: &Path) -> Result<(), MapError> {
        let bytes = self
            .http
            .get(url)
            .header(
                reqwest::header::USER_AGENT,
                concat!("herecast/", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| MapError::Tile(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| MapError::Tile(e.to_string()))?;

        fs::write(path, &bytes)
            .map_err(|e| MapError::Tile(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

#[async_trait]
impl MapBackend for TerminalMap {
    async fn render(&mut self, view: &MapView) -> Result<(), MapError> {
        let TileId { x, y, zoom } = view.center_tile();
        let url = view.center_tile_url();

        // Like a missing tile on a page, a failed download only costs the image.
        let saved = match &self.tile_path {
            Some(path) => match self.save_tile(&url, path).await {
                Ok(()) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, %url, "tile not saved");
                    None
                }
            },
            None => None,
        };

        println!("#{MAP_ELEMENT_ID}");
        println!(
            "  center       {:.5}, {:.5} (zoom {zoom}, tile {x}/{y})",
            view.center.latitude, view.center.longitude
        );
        println!("  tile         {url}");
        if let Some(path) = saved {
            println!("  saved        {}", path.display());
        }
        if view.marker.popup.open {
            println!("  marker       {}", view.marker.popup.label);
        }
        println!("  {}", view.tile_layer.attribution);
        println!();
        Ok(())
    }
}

pub fn print_report(state: &AppState) {
    let fields = &state.fields;
    for field in Field::all() {
        let text = fields.get(*field);
        if !text.is_empty() {
            println!("{:<12} {text}", field.element_id());
        }
    }

    if let Some(snapshot) = &state.weather {
        if let Some(at) = snapshot.observed_at {
            println!("{:<12} {}", "observed", at.format("%Y-%m-%d %H:%M"));
        }
        let series = snapshot.chart_series();
        if !series.is_empty() {
            println!("{CHART_ELEMENT_ID:<12} {}", sparkline(series));
        }
    }
}

/// One block character per sample, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    values
        .iter()
        .map(|v| {
            let level = if span > 0.0 {
                ((v - min) / span * top).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use herecast_core::{
        App, Coordinate, FixedLocator, OpenMeteoProvider, Outcome, Platform, PlotCanvas,
    };
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FORECAST: &str = r#"{"current_weather":{"temperature":14.3,"weathercode":0,"time":"2026-10-19T14:00"},"hourly":{"temperature_2m":[10.0,11.0,12.0]}}"#;

    /// Serves tiles from `template` instead of the view's own tile server.
    #[derive(Debug)]
    struct LocalTiles {
        inner: TerminalMap,
        template: String,
    }

    #[async_trait]
    impl MapBackend for LocalTiles {
        async fn render(&mut self, view: &MapView) -> Result<(), MapError> {
            let mut view = view.clone();
            view.tile_layer.url_template = self.template.clone();
            view.tile_layer.subdomains.clear();
            self.inner.render(&view).await
        }
    }

    async fn failing_tile_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/tiles/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn tile_template(server: &MockServer) -> String {
        format!("{}/tiles/{{z}}/{{x}}/{{y}}.png", server.uri())
    }

    #[tokio::test]
    async fn failed_tile_download_is_not_a_map_error() {
        let server = failing_tile_server().await;
        let dir = tempfile::tempdir().unwrap();
        let tile = dir.path().join("tile.png");

        let mut view = MapView::centered_on(Coordinate::new(37.7749, -122.4194));
        view.tile_layer.url_template = tile_template(&server);
        view.tile_layer.subdomains.clear();

        let mut map = TerminalMap::new(Some(tile.clone()));
        map.render(&view).await.unwrap();
        assert!(!tile.exists());
    }

    #[tokio::test]
    async fn weather_loads_after_failed_tile_download() {
        let server = failing_tile_server().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FORECAST))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let platform = Platform {
            geolocation: Some(Box::new(FixedLocator::new(Coordinate::new(
                37.7749, -122.4194,
            )))),
            connection: None,
        };
        let map = LocalTiles {
            inner: TerminalMap::new(Some(dir.path().join("tile.png"))),
            template: tile_template(&server),
        };
        let app = App::new(
            platform,
            Box::new(map),
            Box::new(OpenMeteoProvider::new(server.uri())),
            PlotCanvas::default(),
            Box::new(TerminalNotifier),
        );

        let report = app.run().await.unwrap();
        assert_eq!(report.outcome, Outcome::Loaded);
        assert_eq!(report.state.fields.get(Field::Temperature), "14.3 °C");
        assert_eq!(report.state.fields.get(Field::Condition), "Clear Sky");
    }

    #[test]
    fn sparkline_spans_full_range() {
        assert_eq!(sparkline(&[0.0, 7.0, 14.0]), "▁▅█");
    }

    #[test]
    fn flat_series_sits_on_baseline() {
        assert_eq!(sparkline(&[3.0, 3.0, 3.0]), "▁▁▁");
    }

    #[test]
    fn empty_series_is_empty() {
        assert_eq!(sparkline(&[]), "");
    }
}
