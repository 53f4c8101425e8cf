//! Viewer configuration
//!
//! Defaults can be overridden in code with the builder methods or from the
//! environment with [`ViewerConfig::from_env`]:
//!
//! - `FARM_TWIN_VSYNC` - `0`, `false`, `off` or `no` disables vsync
//! - `FARM_TWIN_LOG` - `env_logger` filter used when `RUST_LOG` is unset

pub const VSYNC_VAR: &str = "FARM_TWIN_VSYNC";
pub const LOG_VAR: &str = "FARM_TWIN_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub log_filter: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Farm Twin".to_string(),
            width: 1200,
            height: 800,
            vsync: true,
            log_filter: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Overlays values found through `lookup`. Unparseable values are logged and ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(VSYNC_VAR) {
            match parse_flag(&value) {
                Some(vsync) => self.vsync = vsync,
                None => log::warn!("ignoring {}={:?}", VSYNC_VAR, value),
            }
        }
        if let Some(filter) = lookup(LOG_VAR).filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_log_filter(mut self, filter: &str) -> Self {
        self.log_filter = filter.to_owned();
        self
    }

    /// Installs `env_logger` with this config's filter as the fallback for `RUST_LOG`.
    /// Does nothing if a logger is already installed.
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_filter.as_str());
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            log::debug!("logger already initialized: {}", e);
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_viewer() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (1200, 800));
        assert!(config.vsync);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ViewerConfig::default()
            .with_env(env(&[(VSYNC_VAR, "off"), (LOG_VAR, "farm_twin=debug")]));
        assert!(!config.vsync);
        assert_eq!(config.log_filter, "farm_twin=debug");
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = ViewerConfig::default()
            .with_vsync(false)
            .with_env(env(&[(VSYNC_VAR, "maybe"), (LOG_VAR, "  ")]));
        assert!(!config.vsync);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn builder_sets_window() {
        let config = ViewerConfig::default()
            .with_title("North farm")
            .with_size(640, 480);
        assert_eq!(config.title, "North farm");
        assert_eq!((config.width, config.height), (640, 480));
    }
}
