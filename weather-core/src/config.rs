use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    location::{DEFAULT_IP_LOOKUP_URL, FixedLocator, Geolocator, IpLocator},
    model::Coordinate,
    network::ConnectionInfo,
    provider::open_meteo::DEFAULT_BASE_URL,
};

/// Where the position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationSource {
    #[default]
    Ip,
    Fixed,
    /// Behave as a host without any geolocation capability.
    None,
}

impl GeolocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeolocationSource::Ip => "ip",
            GeolocationSource::Fixed => "fixed",
            GeolocationSource::None => "none",
        }
    }

    pub const fn all() -> &'static [GeolocationSource] {
        &[
            GeolocationSource::Ip,
            GeolocationSource::Fixed,
            GeolocationSource::None,
        ]
    }
}

impl std::fmt::Display for GeolocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GeolocationSource {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "ip" => Ok(GeolocationSource::Ip),
            "fixed" => Ok(GeolocationSource::Fixed),
            "none" => Ok(GeolocationSource::None),
            _ => Err(anyhow!(
                "Unknown geolocation source '{value}'. Supported sources: ip, fixed, none."
            )),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// geolocation = "fixed"
/// latitude = 59.9139
/// longitude = 10.7522
/// chart_path = "/tmp/temps.svg"
///
/// [network]
/// effective_type = "3g"
/// save_data = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub geolocation: GeolocationSource,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Override for the IP geolocation endpoint.
    pub ip_lookup_url: Option<String>,

    /// Override for the Open-Meteo host, e.g. a self-hosted instance.
    pub weather_base_url: Option<String>,

    /// Default destination for the SVG chart.
    pub chart_path: Option<PathBuf>,

    /// Connection metadata. Leave the table out when it is unknown.
    pub network: Option<ConnectionInfo>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "herecast", "herecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store a fixed position and switch the source to it.
    pub fn set_fixed_position(&mut self, position: Coordinate) {
        self.geolocation = GeolocationSource::Fixed;
        self.latitude = Some(position.latitude);
        self.longitude = Some(position.longitude);
    }

    pub fn fixed_position(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn weather_base_url(&self) -> &str {
        self.weather_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The geolocation capability this config describes, `None` when absent.
    pub fn geolocator(&self) -> Result<Option<Box<dyn Geolocator>>> {
        let locator: Box<dyn Geolocator> = match self.geolocation {
            GeolocationSource::None => return Ok(None),
            GeolocationSource::Ip => Box::new(IpLocator::new(
                self.ip_lookup_url.as_deref().unwrap_or(DEFAULT_IP_LOOKUP_URL),
            )),
            GeolocationSource::Fixed => {
                let position = self.fixed_position().ok_or_else(|| {
                    anyhow!(
                        "Geolocation source is 'fixed' but no position is configured.\n\
                         Hint: run `herecast configure` or pass --lat/--lon."
                    )
                })?;
                Box::new(FixedLocator::new(position))
            }
        };

        Ok(Some(locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_ip_lookup_and_public_endpoint() {
        let cfg = Config::default();

        assert_eq!(cfg.geolocation, GeolocationSource::Ip);
        assert_eq!(cfg.weather_base_url(), "https://api.open-meteo.com");
        assert!(cfg.network.is_none());
        assert!(cfg.geolocator().unwrap().is_some());
    }

    #[test]
    fn source_roundtrip() {
        for source in GeolocationSource::all() {
            let parsed = GeolocationSource::try_from(source.as_str()).expect("roundtrip");
            assert_eq!(*source, parsed);
        }
    }

    #[test]
    fn unknown_source_error() {
        let err = GeolocationSource::try_from("gps").unwrap_err();
        assert!(err.to_string().contains("Unknown geolocation source"));
    }

    #[test]
    fn fixed_without_position_errors() {
        let cfg = Config {
            geolocation: GeolocationSource::Fixed,
            ..Config::default()
        };

        let err = cfg.geolocator().unwrap_err();
        assert!(err.to_string().contains("no position is configured"));
    }

    #[test]
    fn none_source_has_no_capability() {
        let cfg = Config {
            geolocation: GeolocationSource::None,
            ..Config::default()
        };
        assert!(cfg.geolocator().unwrap().is_none());
    }

    #[test]
    fn set_fixed_position_switches_source() {
        let mut cfg = Config::default();
        cfg.set_fixed_position(Coordinate::new(59.9139, 10.7522));

        assert_eq!(cfg.geolocation, GeolocationSource::Fixed);
        assert_eq!(cfg.fixed_position(), Some(Coordinate::new(59.9139, 10.7522)));
        assert!(cfg.geolocator().unwrap().is_some());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_fixed_position(Coordinate::new(-33.8688, 151.2093));
        cfg.network = Some(ConnectionInfo {
            effective_type: "2g".to_string(),
            save_data: true,
        });
        cfg.chart_path = Some(PathBuf::from("/tmp/chart.svg"));

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn parses_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "geolocation = \"none\"\nweather_base_url = \"http://localhost:8080\"\n\n[network]\nsave_data = true\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.geolocation, GeolocationSource::None);
        assert_eq!(cfg.weather_base_url(), "http://localhost:8080");
        let network = cfg.network.unwrap();
        assert!(network.save_data);
        assert_eq!(network.effective_type, "");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "geolocation = 42").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
