use serde::Deserialize;
use serde_json::Value;
use tauri::{AppHandle, Runtime, Url};
use tauri_plugin_store::StoreExt;
use thiserror::Error;

use crate::playback::PageSelectors;

pub const STORE_NAME: &str = "settings.json";

const DEFAULT_PAGE_URL: &str = "https://music.amazon.de";

/// Desktop Chrome user agent; the player falls back to a Flash-based UI for
/// unknown browsers.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/65.0.3325.162 Safari/537.36";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid page url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub page_url: String,
    pub user_agent: String,
    pub open_devtools: bool,
    pub window_width: f64,
    pub window_height: f64,
    pub selectors: PageSelectors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            open_devtools: cfg!(debug_assertions), // Development builds only
            window_width: 1400.0,
            window_height: 800.0,
            selectors: PageSelectors::default(),
        }
    }
}

impl Settings {
    /// Build from store entries, falling back to the default for every key
    /// that is missing or has the wrong shape.
    pub fn from_entries(get: impl Fn(&str) -> Option<Value>) -> Self {
        let defaults = Settings::default();

        Self {
            page_url: get("page_url")
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .unwrap_or(defaults.page_url),
            user_agent: get("user_agent")
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            open_devtools: get("open_devtools")
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.open_devtools),
            window_width: get("window_width")
                .and_then(|v| v.as_f64())
                .filter(|w| *w > 0.0)
                .unwrap_or(defaults.window_width),
            window_height: get("window_height")
                .and_then(|v| v.as_f64())
                .filter(|h| *h > 0.0)
                .unwrap_or(defaults.window_height),
            selectors: get("selectors")
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or(defaults.selectors),
        }
    }

    pub fn page_url(&self) -> Result<Url, SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidUrl {
            url: self.page_url.clone(),
            reason,
        };

        let url = Url::parse(&self.page_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "https" | "http" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }
}

/// Read settings from the store. Nothing is ever written back.
pub fn load_settings<R: Runtime>(app: &AppHandle<R>) -> Settings {
    match app.store(STORE_NAME) {
        Ok(store) => Settings::from_entries(|key| store.get(key)),
        Err(e) => {
            log::warn!("Settings store unavailable, using defaults: {}", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn settings_from(entries: Value) -> Settings {
        let map: HashMap<String, Value> = serde_json::from_value(entries).expect("object");
        Settings::from_entries(|key| map.get(key).cloned())
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        assert_eq!(settings_from(json!({})), Settings::default());
    }

    #[test]
    fn test_entries_override_defaults() {
        let settings = settings_from(json!({
            "page_url": "https://music.amazon.com",
            "open_devtools": true,
            "window_width": 1024.0,
            "selectors": { "playing_marker": ".is-playing" }
        }));

        assert_eq!(settings.page_url, "https://music.amazon.com");
        assert!(settings.open_devtools);
        assert_eq!(settings.window_width, 1024.0);
        assert_eq!(settings.window_height, 800.0);
        assert_eq!(settings.selectors.playing_marker, ".is-playing");
        assert_eq!(settings.selectors.next, PageSelectors::default().next);
    }

    #[test]
    fn test_malformed_entries_fall_back_per_key() {
        let settings = settings_from(json!({
            "page_url": 42,
            "user_agent": "   ",
            "window_height": -1.0,
            "selectors": "not an object"
        }));

        let defaults = Settings::default();
        assert_eq!(settings.page_url, defaults.page_url);
        assert_eq!(settings.user_agent, defaults.user_agent);
        assert_eq!(settings.window_height, defaults.window_height);
        assert_eq!(settings.selectors, defaults.selectors);
    }

    #[test]
    fn test_default_page_url_parses() {
        let url = Settings::default().page_url().expect("default url");
        assert_eq!(url.host_str(), Some("music.amazon.de"));
    }

    #[test]
    fn test_non_web_page_url_is_rejected() {
        let settings = Settings {
            page_url: "file:///etc/passwd".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.page_url(), Err(SettingsError::InvalidUrl { .. })));

        let settings = Settings {
            page_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(settings.page_url().is_err());
    }
}
