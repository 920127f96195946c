// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod token;  // Déclaration du module token (fichier token.rs)
pub mod wallet; // Déclaration du module wallet (fichier wallet.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use launchboard::models::token::Token;
// On peut faire : use launchboard::models::Token;
pub use token::{Token, TokenId, HISTORY_LEN, PRICE_FLOOR};
pub use wallet::{CreatorSummary, TopWallet};
