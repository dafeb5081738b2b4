use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Forme de la décroissance. `Auto` applique les seuils 10 / 30 sur la fenêtre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayShape {
    #[default]
    Auto,
    Recent,
    Sigmoid,
    Blocks,
}

/// Pondération des co-occurrences avec les numéros de base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityWeighting {
    /// Même décroissance que la fréquence.
    #[default]
    Decayed,
    /// Comptage brut, chaque tirage vaut 1.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nombre de tirages analysés ; 0 = tout l'historique.
    pub window: usize,
    pub include_additional: bool,
    /// Tirages récents examinés pour détecter les numéros froids.
    pub cold_lookback: usize,
    pub max_cold_allowed: usize,
    pub decay: DecayShape,
    pub compatibility: bool,
    pub compatibility_weighting: CompatibilityWeighting,
    pub temperature: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: 50,
            include_additional: false,
            cold_lookback: 20,
            max_cold_allowed: 1,
            decay: DecayShape::Auto,
            compatibility: true,
            compatibility_weighting: CompatibilityWeighting::Decayed,
            temperature: true,
        }
    }
}

impl EngineConfig {
    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Fenêtre effective : 0 ou trop grande => tout l'historique disponible.
    pub fn effective_window(&self, available: usize) -> usize {
        if self.window == 0 {
            available
        } else {
            self.window.min(available)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cold_lookback == 0 {
            return Err(EngineError::InvalidInput(
                "cold_lookback doit être au moins 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.cold_lookback, 20);
        assert_eq!(config.max_cold_allowed, 1);
        assert_eq!(config.decay, DecayShape::Auto);
        assert!(config.compatibility);
        assert!(config.temperature);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_window_clamps() {
        let config = EngineConfig::with_window(10_000);
        assert_eq!(config.effective_window(139), 139);
        assert_eq!(EngineConfig::with_window(0).effective_window(139), 139);
        assert_eq!(EngineConfig::with_window(20).effective_window(139), 20);
        assert_eq!(EngineConfig::with_window(20).effective_window(0), 0);
    }

    #[test]
    fn test_zero_lookback_rejected() {
        let config = EngineConfig {
            cold_lookback: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"window": 20, "compatibility_weighting": "raw"}"#).unwrap();
        assert_eq!(config.window, 20);
        assert_eq!(config.compatibility_weighting, CompatibilityWeighting::Raw);
        assert_eq!(config.cold_lookback, 20);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("toto-config-{}.json", std::process::id()));
        let config = EngineConfig {
            window: 100,
            include_additional: true,
            decay: DecayShape::Sigmoid,
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
