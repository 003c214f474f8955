use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Startup configuration. Read once, never written back; the application
/// keeps no state across runs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub refresh_interval_secs: u64,
    pub chart_export: ChartExport,
    /// Advice text overrides keyed by "ssd", "hdd", "removable",
    /// "network" or "generic". Empty lists are ignored.
    pub advice_overrides: HashMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChartExport {
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            chart_export: ChartExport::default(),
            advice_overrides: HashMap::new(),
        }
    }
}

impl Default for ChartExport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed config, using defaults");
                Self::default()
            }
        }
    }

    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("drive-advisor").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.refresh_interval_secs, 5);
        assert_eq!(config.chart_export.width, 1200);
        assert!(config.advice_overrides.is_empty());
    }

    #[test]
    fn partial_config_fills_in_rest() {
        let config: Config = serde_json::from_str(
            r#"{"refresh_interval_secs": 30, "advice_overrides": {"ssd": ["keep it cool"]}}"#,
        )
        .unwrap();
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.chart_export.height, 800);
        assert_eq!(
            config.advice_overrides["ssd"],
            vec!["keep it cool".to_string()]
        );
    }
}
