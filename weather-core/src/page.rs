//! Text fields the user reads, and the notice channel.

use std::fmt::Debug;

pub const STATUS_LOADING: &str = "Locating...";
pub const STATUS_UNSUPPORTED: &str = "Geolocation is not supported by this platform.";
pub const STATUS_LOCATION_FAILED: &str = "Unable to retrieve your location.";
pub const STATUS_WEATHER_LOADED: &str = "Weather data loaded!";
pub const STATUS_WEATHER_FAILED: &str = "Failed to fetch weather data.";

pub const CHART_ELEMENT_ID: &str = "tempChart";
pub const MAP_ELEMENT_ID: &str = "map";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Status,
    Location,
    Temperature,
    Condition,
}

impl Field {
    pub fn element_id(&self) -> &'static str {
        match self {
            Field::Status => "status",
            Field::Location => "location",
            Field::Temperature => "temperature",
            Field::Condition => "condition",
        }
    }

    pub const fn all() -> &'static [Field] {
        &[
            Field::Status,
            Field::Location,
            Field::Temperature,
            Field::Condition,
        ]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Current contents of the four text fields. Everything but status starts empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    status: String,
    location: String,
    temperature: String,
    condition: String,
}

impl PageFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Status => &self.status,
            Field::Location => &self.location,
            Field::Temperature => &self.temperature,
            Field::Condition => &self.condition,
        }
    }

    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        let slot = match field {
            Field::Status => &mut self.status,
            Field::Location => &mut self.location,
            Field::Temperature => &mut self.temperature,
            Field::Condition => &mut self.condition,
        };
        *slot = text.into();
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

impl Default for PageFields {
    fn default() -> Self {
        Self {
            status: STATUS_LOADING.to_string(),
            location: String::new(),
            temperature: String::new(),
            condition: String::new(),
        }
    }
}

/// Blocking user notice (an alert box). Returns once the user has seen it.
pub trait Notifier: Send + Sync + Debug {
    fn alert(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_is_loading_with_empty_fields() {
        let page = PageFields::default();
        assert_eq!(page.status(), STATUS_LOADING);
        assert_eq!(page.get(Field::Location), "");
        assert_eq!(page.get(Field::Temperature), "");
        assert_eq!(page.get(Field::Condition), "");
    }

    #[test]
    fn set_replaces_only_the_named_field() {
        let mut page = PageFields::default();
        page.set(Field::Temperature, "12 °C");

        assert_eq!(page.get(Field::Temperature), "12 °C");
        assert_eq!(page.status(), STATUS_LOADING);
    }

    #[test]
    fn element_ids_are_stable() {
        let ids: Vec<_> = Field::all().iter().map(Field::element_id).collect();
        assert_eq!(ids, ["status", "location", "temperature", "condition"]);
    }
}
