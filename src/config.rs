//! Startup Configuration
//!
//! Read once from `<script id="app-config" type="application/json">` in
//! `index.html`. Every field is optional.

use log::LevelFilter;
use serde::Deserialize;

use crate::error::{TodoError, TodoResult};
use crate::repository::FirebaseConfig;
use crate::sync::SyncPolicy;

const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Remote project; `None` runs local-only
    pub firebase: Option<FirebaseConfig>,
    /// Remote collection name
    pub collection: String,
    pub sync: SyncPolicy,
    /// Log records kept in the ring buffer
    pub log_capacity: usize,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            firebase: None,
            collection: "todos".to_string(),
            sync: SyncPolicy::default(),
            log_capacity: 200,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> TodoResult<Self> {
        let config: AppConfig =
            serde_json::from_str(raw).map_err(|e| TodoError::Config(e.to_string()))?;
        if config.collection.trim().is_empty() {
            return Err(TodoError::Config("collection name is empty".to_string()));
        }
        Ok(config)
    }

    /// Config embedded in the page; defaults when the element is absent
    pub fn from_document() -> TodoResult<Self> {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Ok(Self::default()),
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.collection, "todos");
        assert!(config.firebase.is_none());
    }

    #[test]
    fn test_partial_sync_policy() {
        let config = AppConfig::from_json(r#"{"sync": {"maxAttempts": 5}, "logLevel": "debug"}"#).unwrap();
        assert_eq!(config.sync.max_attempts, 5);
        assert_eq!(config.sync.base_delay_ms, 500);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_firebase_section() {
        let raw = r#"{"firebase": {"apiKey": "k", "authDomain": "d", "projectId": "p"}, "collection": "tasks"}"#;
        let config = AppConfig::from_json(raw).unwrap();
        assert_eq!(config.firebase.unwrap().project_id, "p");
        assert_eq!(config.collection, "tasks");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(AppConfig::from_json("{"), Err(TodoError::Config(_))));
        assert!(matches!(AppConfig::from_json(r#"{"collection": " "}"#), Err(TodoError::Config(_))));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = AppConfig { log_level: "loud".to_string(), ..AppConfig::default() };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
