// ============================================================================
// Launchboard - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod app;    // État de l'application
pub mod config; // Configuration TOML
pub mod engine; // Génération et simulation des tokens
pub mod error;  // Erreurs typées
pub mod models; // Structures de données
pub mod ui;     // Interface utilisateur
pub mod worker; // Timer de simulation en arrière-plan
