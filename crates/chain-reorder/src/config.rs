//! Editor Configuration
//!
//! Selectors and endpoint used to bind editors to the page. Pages can
//! override any subset through a JSON document; missing fields keep
//! their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

/// Id of the `<script type="application/json">` element holding overrides
pub const CONFIG_ELEMENT_ID: &str = "task-reorder-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Task endpoint, relative to the current page
    pub endpoint: String,
    /// Section wrapping one table and its controls
    pub container_selector: String,
    pub row_selector: String,
    pub handle_selector: String,
    pub controls_selector: String,
    pub cancel_selector: String,
    pub apply_selector: String,
    pub delete_selector: String,
    /// How long notifications stay on screen
    pub notice_timeout_ms: u32,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            endpoint: "tasks".to_string(),
            container_selector: "div.collapse".to_string(),
            row_selector: "tr[data-task-id]".to_string(),
            handle_selector: ".drag-handle".to_string(),
            controls_selector: ".drag-controls".to_string(),
            cancel_selector: ".btn.btn-secondary".to_string(),
            apply_selector: ".btn.btn-success".to_string(),
            delete_selector: ".task-delete".to_string(),
            notice_timeout_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Parsed `log_level`, `Info` when unrecognised
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{ "endpoint": "/admin/rules/tasks", "notice_timeout_ms": 800 }"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.endpoint, "/admin/rules/tasks");
        assert_eq!(config.notice_timeout_ms, 800);
        assert_eq!(config.row_selector, "tr[data-task-id]");
        assert_eq!(config.controls_selector, ".drag-controls");
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        let err = EditorConfig::from_json("{ endpoint: ").unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn test_level_filter() {
        let mut config = EditorConfig::default();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        config.log_level = "debug".to_string();
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
        config.log_level = "chatty".to_string();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }
}
