#![forbid(unsafe_code)]

//! Store configuration.
//!
//! Configuration is plain data. It can be built in code or loaded from JSON,
//! and from TOML with the `toml-config` feature:
//!
//! ```toml
//! undo-mode = "anchored"
//! ```

use serde::Deserialize;

use crate::error::StoreError;

/// How [`Store::undo`](crate::Store::undo) picks its target snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UndoMode {
    /// Count `steps` back from the live end of history at call time.
    ///
    /// Undo writes are themselves history entries, so two consecutive
    /// `undo(1)` calls return to where the first one started.
    #[default]
    Live,
    /// Count `steps` back from the entry the previous undo restored.
    ///
    /// Consecutive undos walk further into the past. Any other write resets
    /// the anchor to the end of history.
    Anchored,
}

/// Options for a [`Store`](crate::Store).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
    pub undo_mode: UndoMode,
}

impl StoreConfig {
    #[must_use]
    pub fn with_undo_mode(mut self, mode: UndoMode) -> Self {
        self.undo_mode = mode;
        self
    }

    /// Parse a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, StoreError> {
        serde_json::from_str(input).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Parse a TOML document.
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(input: &str) -> Result<Self, StoreError> {
        toml::from_str(input).map_err(|e| StoreError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_live() {
        assert_eq!(StoreConfig::default().undo_mode, UndoMode::Live);
    }

    #[test]
    fn json_parses() {
        let cfg = StoreConfig::from_json_str(r#"{"undo-mode": "anchored"}"#).unwrap();
        assert_eq!(cfg.undo_mode, UndoMode::Anchored);
        assert_eq!(StoreConfig::from_json_str("{}").unwrap(), StoreConfig::default());
    }

    #[test]
    fn json_rejects_unknown() {
        let err = StoreConfig::from_json_str(r#"{"undo-mode": "sideways"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(StoreConfig::from_json_str(r#"{"history": 3}"#).is_err());
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn toml_parses() {
        let cfg = StoreConfig::from_toml_str("undo-mode = \"anchored\"\n").unwrap();
        assert_eq!(cfg.undo_mode, UndoMode::Anchored);
    }
}
