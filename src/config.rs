// ============================================================================
// Configuration
// ============================================================================
// Chargée depuis un fichier TOML, avec des valeurs par défaut pour tout
//
// Ordre de priorité :
// 1. Arguments CLI (--seed, --tokens, ...) appliqués par main.rs
// 2. Fichier passé avec --config
// 3. config/launchboard.toml s'il existe
// 4. Valeurs par défaut
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::engine::simulator::DEFAULT_LAUNCH_PROBABILITY;
use crate::engine::store::DEFAULT_INITIAL_TOKENS;
use crate::engine::TickParams;
use crate::error::EngineError;

/// Emplacement par défaut du fichier de configuration
pub const DEFAULT_CONFIG_PATH: &str = "config/launchboard.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Nombre de tokens générés au démarrage
    pub initial_tokens: usize,

    /// Période du timer de simulation, en secondes
    pub update_interval_secs: u64,

    /// Probabilité qu'un nouveau token soit lancé à chaque tick
    pub launch_probability: f64,

    /// Seed du RNG (None = aléatoire)
    pub seed: Option<u64>,

    /// Limite de taille de la liste (None = illimitée)
    pub max_tokens: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_tokens: DEFAULT_INITIAL_TOKENS,
            update_interval_secs: 10,
            launch_probability: DEFAULT_LAUNCH_PROBABILITY,
            seed: None,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Timeout du poll clavier (= fréquence de rafraîchissement de l'écran)
    pub tick_rate_ms: u64,

    /// Nombre de lancements affichés dans le feed
    pub feed_size: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            feed_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filtre tracing utilisé si RUST_LOG n'est pas défini
    pub filter: String,

    /// Répertoire des logs (None = répertoire de données de la plateforme)
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "launchboard=debug,info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Charge la configuration
    ///
    /// - Some(path) : le fichier doit exister et être valide
    /// - None : config/launchboard.toml si présent, sinon valeurs par défaut
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default_path.exists() {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Parse et valide une configuration TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Échec du parsing TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Vérifie la cohérence des valeurs
    pub fn validate(&self) -> Result<(), EngineError> {
        let sim = &self.simulation;
        if sim.update_interval_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "simulation.update_interval_secs must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&sim.launch_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "simulation.launch_probability must be within [0, 1], got {}",
                sim.launch_probability
            )));
        }
        if sim.max_tokens == Some(0) {
            return Err(EngineError::InvalidConfig(
                "simulation.max_tokens must be > 0 when set".to_string(),
            ));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(EngineError::InvalidConfig("ui.tick_rate_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.simulation.update_interval_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    pub fn tick_params(&self) -> TickParams {
        TickParams {
            launch_probability: self.simulation.launch_probability,
            max_tokens: self.simulation.max_tokens,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.simulation.initial_tokens, 20);
        assert_eq!(config.update_interval(), Duration::from_secs(10));
        assert_eq!(config.simulation.launch_probability, 0.1);
        assert!(config.simulation.max_tokens.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml(
            r#"
[simulation]
seed = 42
max_tokens = 50
update_interval_secs = 2

[ui]
feed_size = 5
"#,
        )
        .unwrap();

        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.max_tokens, Some(50));
        assert_eq!(config.simulation.initial_tokens, 20);
        assert_eq!(config.update_interval(), Duration::from_secs(2));
        assert_eq!(config.ui.feed_size, 5);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.logging.filter, "launchboard=debug,info");
        assert_eq!(config.tick_params().max_tokens, Some(50));
    }

    #[test]
    fn test_rejects_invalid_probability() {
        let err = Config::from_toml("[simulation]\nlaunch_probability = 1.5\n").unwrap_err();
        assert!(format!("{:#}", err).contains("launch_probability"));
    }

    #[test]
    fn test_rejects_zero_interval_and_cap() {
        let mut config = Config::default();
        config.simulation.update_interval_secs = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = Config::default();
        config.simulation.max_tokens = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Config::load(Some(Path::new("does/not/exist.toml")));
        assert!(result.is_err());
    }
}
