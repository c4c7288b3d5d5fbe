//! Persisted grid preferences

use std::path::Path;

use dg_core::{GridState, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{KOL_DETAIL_PAGE_SIZES, KOL_TOKEN_PAGE_SIZES};
use crate::DataError;

/// Preferences for a single grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Rows per page on first render
    pub page_size: usize,

    /// Sizes offered by the page-size selector
    pub page_size_options: Vec<usize>,

    /// Columns hidden on first render
    pub hidden_columns: Vec<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::with_options(&DEFAULT_PAGE_SIZE_OPTIONS)
    }
}

impl GridSettings {
    pub fn with_options(options: &[usize]) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: options.to_vec(),
            hidden_columns: Vec::new(),
        }
    }

    /// Check the settings, adding the page size to the selector when absent
    pub fn validate(&mut self) -> Result<(), DataError> {
        if self.page_size == 0 {
            return Err(DataError::InvalidConfig("page_size must be positive".to_string()));
        }
        if self.page_size_options.is_empty() {
            return Err(DataError::InvalidConfig("page_size_options must not be empty".to_string()));
        }
        if self.page_size_options.contains(&0) {
            return Err(DataError::InvalidConfig("page_size_options must be positive".to_string()));
        }
        if !self.page_size_options.contains(&self.page_size) {
            self.page_size_options.push(self.page_size);
        }
        self.page_size_options.sort_unstable();
        self.page_size_options.dedup();
        Ok(())
    }

    /// Grid state these settings start from
    pub fn initial_state(&self) -> GridState {
        let mut state = GridState::default().with_page_size(self.page_size);
        for column in &self.hidden_columns {
            state.visibility.set_visible(column.as_str(), false);
        }
        state
    }
}

/// Preferences for every dashboard grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub tokens: GridSettings,
    pub signals: GridSettings,
    pub kol_tokens: GridSettings,
    /// Nested per-token KOL tables
    pub kol_details: GridSettings,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tokens: GridSettings::default(),
            signals: GridSettings::default(),
            kol_tokens: GridSettings::with_options(&KOL_TOKEN_PAGE_SIZES),
            kol_details: GridSettings::with_options(&KOL_DETAIL_PAGE_SIZES),
        }
    }
}

impl GridConfig {
    pub fn validate(&mut self) -> Result<(), DataError> {
        self.tokens.validate()?;
        self.signals.validate()?;
        self.kol_tokens.validate()?;
        self.kol_details.validate()
    }
}

/// Reads and writes [`GridConfig`] as JSON
pub struct GridConfigFile;

impl GridConfigFile {
    /// Load the configuration. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<GridConfig, DataError> {
        if !path.exists() {
            info!("No grid config at {}, using defaults", path.display());
            return Ok(GridConfig::default());
        }

        let text = std::fs::read_to_string(path)?;
        let mut config: GridConfig = serde_json::from_str(&text)
            .map_err(|e| DataError::InvalidConfig(format!("{}: {}", path.display(), e)))
            .inspect_err(|e| warn!("Rejecting grid config: {}", e))?;
        if let Err(e) = config.validate() {
            warn!("Rejecting grid config at {}: {}", path.display(), e);
            return Err(e);
        }
        info!("Loaded grid config from {}", path.display());
        Ok(config)
    }

    pub fn save(path: &Path, config: &GridConfig) -> Result<(), DataError> {
        let text = serde_json::to_string_pretty(config)?;
        std::fs::write(path, text)?;
        info!("Saved grid config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GridConfigFile::load(&dir.path().join("grids.json")).unwrap();
        assert_eq!(config, GridConfig::default());
        assert_eq!(config.kol_tokens.page_size_options, vec![5, 10, 20, 50, 100]);
        assert_eq!(config.kol_details.page_size_options, vec![5, 10, 20, 50]);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids.json");

        let mut config = GridConfig::default();
        config.signals.page_size = 20;
        config.tokens.hidden_columns = vec!["details".to_string()];
        GridConfigFile::save(&path, &config).unwrap();

        assert_eq!(GridConfigFile::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids.json");
        std::fs::write(&path, r#"{"tokens": {"page_size": 25}}"#).unwrap();

        let config = GridConfigFile::load(&path).unwrap();
        assert_eq!(config.tokens.page_size, 25);
        assert_eq!(config.tokens.page_size_options, vec![10, 20, 25, 30, 40, 50]);
        assert_eq!(config.signals, GridSettings::default());
    }

    #[test]
    fn test_zero_page_size_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids.json");
        std::fs::write(&path, r#"{"signals": {"page_size": 0}}"#).unwrap();

        assert!(matches!(GridConfigFile::load(&path), Err(DataError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_file_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids.json");
        std::fs::write(&path, r#"{"tokens": {"page_size": "#).unwrap();

        assert!(matches!(GridConfigFile::load(&path), Err(DataError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_options_collapse() {
        let mut settings = GridSettings {
            page_size: 10,
            page_size_options: vec![10, 20, 10],
            ..Default::default()
        };
        settings.validate().unwrap();
        assert_eq!(settings.page_size_options, vec![10, 20]);

        let mut settings = GridSettings {
            page_size: 5,
            page_size_options: vec![30, 10, 30],
            ..Default::default()
        };
        settings.validate().unwrap();
        assert_eq!(settings.page_size_options, vec![5, 10, 30]);
    }

    #[test]
    fn test_empty_options_are_invalid() {
        let mut settings = GridSettings {
            page_size_options: Vec::new(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_initial_state_hides_columns() {
        let settings = GridSettings {
            page_size: 30,
            hidden_columns: vec!["chain".to_string()],
            ..Default::default()
        };
        let state = settings.initial_state();
        assert_eq!(state.pagination.page_size(), 30);
        assert!(!state.visibility.is_visible("chain"));
        assert!(state.visibility.is_visible("name"));
    }
}
