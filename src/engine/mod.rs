// ============================================================================
// Module : engine
// ============================================================================
// Moteur de données simulées : génération, marche aléatoire, ticks, requêtes
//
// Aucune source réseau : toutes les données viennent du générateur en mémoire
// ============================================================================

pub mod generator; // Tokens et top wallets synthétiques
pub mod query;     // Leaderboards, watchlist, launch feed
pub mod simulator; // Mise à jour périodique (tick)
pub mod store;     // Propriétaire de la liste de tokens
pub mod walk;      // Marche aléatoire des prix

// Re-exports pour simplifier les imports
pub use generator::{generate_tokens, generate_top_wallets, GeneratorParams, TrendModel};
pub use query::LEADERBOARD_SIZE;
pub use simulator::{TickParams, TickReport};
pub use store::TokenStore;
