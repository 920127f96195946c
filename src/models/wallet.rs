// ============================================================================
// Structures : TopWallet, CreatorSummary
// ============================================================================
// Données dérivées affichées par le dashboard (top holders, top créateurs)
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::{Token, TokenId};

/// Un gros détenteur synthétique d'un token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopWallet {
    /// Identifiant "wallet-<token id>-<i>"
    pub id: String,

    pub token_id: TokenId,

    /// Label affiché ("Wallet A" .. "Wallet E")
    pub label: String,

    /// Part de la supply détenue, en pourcentage entier
    pub percentage: u32,
}

/// Un créateur et tous ses tokens
///
/// CONCEPT RUST : Lifetime 'a
/// - Les tokens sont empruntés au store, pas clonés
/// - Le résumé ne peut pas survivre au store qui l'a produit
#[derive(Debug, Clone, Serialize)]
pub struct CreatorSummary<'a> {
    pub handle: String,
    pub count: usize,
    pub tokens: Vec<&'a Token>,
}

impl CreatorSummary<'_> {
    /// Liste des tickers du créateur : "$MOON, $STAR"
    pub fn tickers(&self) -> String {
        self.tokens
            .iter()
            .map(|t| format!("${}", t.ticker))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
