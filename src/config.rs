//! Page-level realtime configuration
//!
//! The host page embeds a JSON object describing the WebSocket endpoint, the
//! current document and user. Every field has a default so partial objects
//! deserialize; `validate` decides whether a realtime session can start.

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of one-second ticks before a request prompt auto-accepts
pub const DEFAULT_AUTO_ACCEPT_TICKS: u32 = 30;

/// Default time during which notices are suppressed after navigation starts
pub const DEFAULT_UNLOAD_GUARD: Duration = Duration::from_secs(5);

/// Default preference key recording that the user opted out of realtime
pub const DEFAULT_DISALLOW_KEY: &str = "realtime-disallow";

/// Information about the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    pub name: String,
    pub reference: Option<String>,
    pub avatar_url: Option<String>,
    pub advanced: bool,
}

/// Realtime configuration for one page load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeConfig {
    /// Endpoint of the channel relay; realtime is disabled without it
    pub web_socket_url: Option<String>,

    /// Serialized reference of the document being viewed or edited
    pub document_reference: String,

    /// Document locale, `"default"` when the page has none
    pub language: String,

    pub user: UserConfig,

    pub demo_mode: bool,

    /// Preference key read by `Preferences`-backed opt-out checks
    pub disallow_storage_key: String,

    pub auto_accept_ticks: u32,

    pub unload_guard_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            web_socket_url: None,
            document_reference: String::new(),
            language: "default".to_string(),
            user: UserConfig::default(),
            demo_mode: false,
            disallow_storage_key: DEFAULT_DISALLOW_KEY.to_string(),
            auto_accept_ticks: DEFAULT_AUTO_ACCEPT_TICKS,
            unload_guard_ms: DEFAULT_UNLOAD_GUARD.as_millis() as u64,
        }
    }
}

impl RealtimeConfig {
    /// Parse the configuration object embedded in the page
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Check that a realtime session can be configured at all
    pub fn validate(&self) -> Result<()> {
        match self.web_socket_url.as_deref() {
            None | Some("") => {
                return Err(SessionError::Config(
                    "the WebSocket URL is missing".to_string(),
                ))
            }
            Some(_) => {}
        }
        if self.document_reference.is_empty() {
            return Err(SessionError::Config(
                "the document reference is missing".to_string(),
            ));
        }
        Ok(())
    }

    /// Channel module carrying the session negotiation messages
    pub fn events_module(&self) -> String {
        format!("{}/events", self.language)
    }

    /// Channel module carrying the document content of realtime editors
    pub fn content_module(&self) -> String {
        format!("{}/content", self.language)
    }

    pub fn unload_guard(&self) -> Duration {
        Duration::from_millis(self.unload_guard_ms)
    }
}

/// Read-only access to the browser's persisted preferences
pub trait Preferences {
    fn get(&self, key: &str) -> Option<String>;
}

/// Whether the user opted out of realtime prompts
///
/// Any stored value other than an empty string, `"false"` or `"0"` counts as
/// an opt-out.
pub fn realtime_opted_out(prefs: &dyn Preferences, config: &RealtimeConfig) -> bool {
    match prefs.get(&config.disallow_storage_key) {
        Some(value) => !matches!(value.trim(), "" | "false" | "0"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapPrefs(HashMap<String, String>);

    impl Preferences for MapPrefs {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    #[test]
    fn test_defaults_fill_partial_object() {
        let config = RealtimeConfig::from_json(
            r#"{"webSocketUrl":"wss://relay","documentReference":"xwiki:Main.WebHome"}"#,
        )
        .unwrap();
        assert_eq!(config.language, "default");
        assert_eq!(config.auto_accept_ticks, 30);
        assert_eq!(config.unload_guard(), Duration::from_secs(5));
        assert_eq!(config.events_module(), "default/events");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_websocket_url_is_rejected() {
        let config = RealtimeConfig {
            document_reference: "xwiki:Main.WebHome".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_opt_out_preference() {
        let config = RealtimeConfig::default();
        let mut prefs = MapPrefs(HashMap::new());
        assert!(!realtime_opted_out(&prefs, &config));

        prefs.0.insert("realtime-disallow".to_string(), "1".to_string());
        assert!(realtime_opted_out(&prefs, &config));

        prefs.0.insert("realtime-disallow".to_string(), "false".to_string());
        assert!(!realtime_opted_out(&prefs, &config));
    }
}
