// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod dashboard; // Rendu de l'interface principale
pub mod details;   // Popup de détails d'un token
pub mod events;    // Gestion des événements clavier
pub mod format;    // Montants, pourcentages, temps relatif

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
