//! Coarse condition labels for provider weather codes.
//!
//! The ladder below is evaluated top to bottom and the first rung that matches
//! wins. It does not follow the WMO code table closely (codes 3..=44 all read
//! as "Fog", everything from 70 up is "Unknown"); callers rely on these exact
//! labels, so keep it as is.

pub const CLEAR_SKY: &str = "Clear Sky";
pub const PARTLY_CLOUDY: &str = "Partly Cloudy";
pub const FOG: &str = "Fog";
pub const RAINY: &str = "Rainy";
pub const UNKNOWN: &str = "Unknown";

pub fn classify(code: i32) -> &'static str {
    match code {
        0 => CLEAR_SKY,
        c if c < 0 => UNKNOWN,
        c if c < 3 => PARTLY_CLOUDY,
        c if c < 45 => FOG,
        c if c < 70 => RAINY,
        _ => UNKNOWN,
    }
}
