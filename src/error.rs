// ============================================================================
// Erreurs typées
// ============================================================================
// CONCEPT RUST : thiserror pour les erreurs de bibliothèque
// - Les fonctions internes retournent EngineError
// - main.rs et les couches hautes les convertissent en anyhow::Error avec `?`
// ============================================================================

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    /// Valeur de configuration hors bornes
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Un thread a paniqué en tenant le lock de l'état partagé
    #[error("application state lock poisoned")]
    StatePoisoned,
}
