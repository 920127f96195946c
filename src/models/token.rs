// ============================================================================
// Structure : Token
// ============================================================================
// Représente un token synthétique fraîchement lancé (prix, market cap, buzz)
//
// CONCEPTS RUST :
// 1. Newtype pattern : TokenId(u64) au lieu d'un u64 "nu"
// 2. Invariants : current_price == dernier échantillon de price_history
// 3. VecDeque : fenêtre glissante (push_back + pop_front en O(1))
// ============================================================================

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nombre d'échantillons conservés dans l'historique de prix
pub const HISTORY_LEN: usize = 100;

/// Prix plancher : évite les divisions par zéro dans le calcul des rendements
pub const PRICE_FLOOR: f64 = 0.000_001;

/// Décalage (en échantillons) utilisé comme proxy de "il y a 30 minutes"
pub const OFFSET_30M: usize = 6;

/// Identifiant d'un token, affiché sous la forme "token-<n>"
///
/// CONCEPT RUST : Newtype pattern
/// - Un struct tuple autour d'un u64
/// - Empêche de confondre un id avec un compteur ou un index
/// - Copy + Ord : utilisable comme clé de tri (tie-break déterministe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token-{}", self.0)
    }
}

/// Un token synthétique et ses métriques de marché
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,

    /// Ticker (ex: "MOON"), pas forcément unique
    pub ticker: String,

    /// Nom complet (ex: "Moon Shot")
    pub name: String,

    /// Handle du créateur, sans le '@'
    pub creator_handle: String,

    pub launch_time: DateTime<Utc>,

    /// Toujours égal au dernier élément de price_history
    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub transactions_24h: u64,
    pub fees_24h: f64,
    pub holder_count: u64,
    pub liquidity_depth: f64,

    /// Variation en % depuis l'échantillon len-6 (proxy 30 minutes)
    pub price_change_30m: f64,

    /// Variation en % depuis le premier échantillon (proxy 24h)
    pub price_change_24h: f64,

    /// Historique des prix, du plus ancien au plus récent
    /// CONCEPT RUST : VecDeque
    /// - File à double entrée (ring buffer)
    /// - push_back() et pop_front() en O(1) pour la fenêtre glissante
    pub price_history: VecDeque<f64>,

    /// Compteur de mentions (proxy du buzz sur les réseaux sociaux)
    pub mentions: u64,

    pub in_watchlist: bool,
}

impl Token {
    /// Pousse un nouveau prix et retire le plus ancien
    ///
    /// CONCEPT : Fenêtre glissante
    /// - La longueur de l'historique ne change jamais
    /// - current_price est synchronisé avec le dernier échantillon
    pub fn push_price(&mut self, price: f64) {
        let price = price.max(PRICE_FLOOR);
        self.price_history.push_back(price);
        if self.price_history.len() > 1 {
            self.price_history.pop_front();
        }
        self.current_price = price;
    }

    /// Recalcule price_change_30m et price_change_24h
    ///
    /// Proxy par décalage d'échantillons : index len-6 pour 30m, index 0 pour 24h.
    /// Ce ne sont pas de vraies fenêtres temporelles.
    pub fn recompute_returns(&mut self) {
        let (change_30m, change_24h) = proxy_returns(&self.price_history);
        self.price_change_30m = change_30m;
        self.price_change_24h = change_24h;
    }

    /// Retourne true si toutes les métriques flottantes sont finies
    ///
    /// Utilisé par le simulateur pour isoler un token corrompu (NaN, inf)
    pub fn is_finite(&self) -> bool {
        [
            self.current_price,
            self.market_cap,
            self.volume_24h,
            self.fees_24h,
            self.liquidity_depth,
            self.price_change_30m,
            self.price_change_24h,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Lien vers la page de swap (template, pas d'intégration réseau)
    pub fn trade_url(&self) -> String {
        format!("https://jup.ag/swap/USDC-{}", self.ticker)
    }

    /// Lien vers le profil du créateur
    pub fn creator_url(&self) -> String {
        format!("https://twitter.com/{}", self.creator_handle)
    }
}

/// Calcule les rendements (30m, 24h) en % à partir d'un historique
///
/// CONCEPT RUST : Option chaining
/// - .back() et .front() retournent None si l'historique est vide
/// - Historique vide : (0.0, 0.0) au lieu d'un panic
pub fn proxy_returns(history: &VecDeque<f64>) -> (f64, f64) {
    let Some(&current) = history.back() else {
        return (0.0, 0.0);
    };

    // len-6 n'existe pas pour un historique trop court : on retombe sur l'index 0
    let index_30m = history.len().checked_sub(OFFSET_30M).unwrap_or(0);
    let price_30m_ago = history.get(index_30m).copied().unwrap_or(current);
    let price_24h_ago = history.front().copied().unwrap_or(current);

    (
        percent_change(price_30m_ago, current),
        percent_change(price_24h_ago, current),
    )
}

/// Variation en pourcentage de `from` vers `to`
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        ((to - from) / from) * 100.0
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_history(history: Vec<f64>) -> Token {
        let current_price = *history.last().unwrap();
        Token {
            id: TokenId(1),
            ticker: "MOON".to_string(),
            name: "Moon Shot".to_string(),
            creator_handle: "alice".to_string(),
            launch_time: Utc::now(),
            current_price,
            market_cap: 1_000.0,
            volume_24h: 10.0,
            transactions_24h: 100,
            fees_24h: 1.0,
            holder_count: 50,
            liquidity_depth: 100.0,
            price_change_30m: 0.0,
            price_change_24h: 0.0,
            price_history: history.into(),
            mentions: 1,
            in_watchlist: false,
        }
    }

    #[test]
    fn test_token_id_display() {
        assert_eq!(TokenId(7).to_string(), "token-7");
    }

    #[test]
    fn test_proxy_returns_offsets() {
        // 10 échantillons : index 4 pour 30m, index 0 pour 24h
        let history: VecDeque<f64> = vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 4.0].into();
        let (change_30m, change_24h) = proxy_returns(&history);
        assert_eq!(change_30m, 100.0);
        assert_eq!(change_24h, 300.0);
    }

    #[test]
    fn test_proxy_returns_short_history() {
        // Moins de 6 échantillons : les deux proxies utilisent l'index 0
        let history: VecDeque<f64> = vec![2.0, 3.0].into();
        assert_eq!(proxy_returns(&history), (50.0, 50.0));

        let empty: VecDeque<f64> = VecDeque::new();
        assert_eq!(proxy_returns(&empty), (0.0, 0.0));
    }

    #[test]
    fn test_push_price_keeps_window() {
        let mut token = token_with_history(vec![1.0, 2.0, 3.0]);
        token.push_price(4.0);
        assert_eq!(token.price_history.len(), 3);
        assert_eq!(token.price_history.front(), Some(&2.0));
        assert_eq!(token.current_price, 4.0);
    }

    #[test]
    fn test_push_price_clamps_to_floor() {
        let mut token = token_with_history(vec![1.0, 2.0]);
        token.push_price(-5.0);
        assert_eq!(token.current_price, PRICE_FLOOR);
        assert_eq!(token.price_history.back(), Some(&PRICE_FLOOR));
    }

    #[test]
    fn test_is_finite_detects_nan() {
        let mut token = token_with_history(vec![1.0]);
        assert!(token.is_finite());
        token.market_cap = f64::NAN;
        assert!(!token.is_finite());
    }

    #[test]
    fn test_links() {
        let token = token_with_history(vec![1.0]);
        assert_eq!(token.trade_url(), "https://jup.ag/swap/USDC-MOON");
        assert_eq!(token.creator_url(), "https://twitter.com/alice");
    }
}
