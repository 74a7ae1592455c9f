use serde::{Deserialize, Serialize};

pub const SLOW_NETWORK_NOTICE: &str =
    "You are on a slow or data-saving network. Some features may be limited.";

/// Connection metadata, when the platform exposes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Coarse speed class such as `"2g"`, `"3g"`, `"4g"`.
    #[serde(default)]
    pub effective_type: String,
    #[serde(default)]
    pub save_data: bool,
}

impl ConnectionInfo {
    /// Slowest link class, or the user asked to save data.
    pub fn is_constrained(&self) -> bool {
        self.effective_type == "2g" || self.save_data
    }
}

/// The notice to show for `connection`, if any. `None` capability is a no-op.
pub fn advisory(connection: Option<&ConnectionInfo>) -> Option<&'static str> {
    connection
        .filter(|info| info.is_constrained())
        .map(|_| SLOW_NETWORK_NOTICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(effective_type: &str, save_data: bool) -> ConnectionInfo {
        ConnectionInfo {
            effective_type: effective_type.to_string(),
            save_data,
        }
    }

    #[test]
    fn two_g_is_constrained() {
        assert_eq!(advisory(Some(&info("2g", false))), Some(SLOW_NETWORK_NOTICE));
    }

    #[test]
    fn save_data_is_constrained_on_any_link() {
        assert_eq!(advisory(Some(&info("4g", true))), Some(SLOW_NETWORK_NOTICE));
    }

    #[test]
    fn fast_link_is_silent() {
        assert_eq!(advisory(Some(&info("3g", false))), None);
        assert_eq!(advisory(Some(&info("slow-2g", false))), None);
    }

    #[test]
    fn missing_capability_is_silent() {
        assert_eq!(advisory(None), None);
    }
}
