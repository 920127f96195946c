// ============================================================================
// Générateurs : tokens et top wallets
// ============================================================================
// Produit les données synthétiques du dashboard
//
// CONCEPTS RUST :
// 1. &'static [&'static str] : listes fixes compilées dans le binaire
// 2. SliceRandom::choose : tirage uniforme dans une slice
// 3. Injection du RNG et de l'horloge (now) pour des tests reproductibles
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::walk::{generate_price_history, WalkParams};
use crate::models::token::proxy_returns;
use crate::models::{Token, TokenId, TopWallet, HISTORY_LEN};

/// Nombre de wallets générés par token
pub const WALLET_COUNT: usize = 5;

const TICKERS: &[&str] = &[
    "BLVE", "SLNA", "PNDA", "MOON", "STAR", "GMBL", "SHDW", "DGOD", "MYTH", "GAME", "META",
    "UNVS", "HERO", "PXLS", "ATOM", "NEON", "TRBN", "SOLO", "PRME", "DRGN", "PNIX", "RBTS",
    "ECHO", "AQUA", "VRTX", "FLSH", "GLOW",
];

const NAMES: &[&str] = &[
    "Believe", "Solana Prime", "Crypto Panda", "Moon Shot", "Star Dust", "Gamble King",
    "Shadow Protocol", "Degen Gods", "Mythic Network", "Game Verse", "Metaverse Token",
    "Universe", "Hero Quest", "Pixels", "Atomic", "Neon District", "Turbine", "Solo Finance",
    "Prime Collective", "Dragon Chain", "Phoenix", "Robotic Systems", "Echo Network",
    "Aqua Finance", "Vertex AI", "Flash Protocol", "Glow Finance",
];

const CREATOR_HANDLES: &[&str] = &[
    "solana_labs", "raj_gokal", "aeyakovenko", "superteamDAO", "solana_devs", "helium",
    "phantom", "solanafndn", "solana_spaces", "StepFinance", "orca_so", "drift_trade",
    "mango_markets", "solend_solana", "jupiter_ex", "metaplex", "solflare_wallet",
    "heliuslabs", "magiceden", "tensor_hq", "zeta_markets", "solblaze", "jito_sol",
    "marinade_finance", "saber_hq", "jup_ag", "solana_monkey",
];

/// Âge maximum d'un token généré
const MAX_AGE_DAYS: i64 = 30;

/// Modèle de dérive appliqué à la marche aléatoire d'un nouveau token
///
/// CONCEPT : Enum pour les stratégies
/// - AgeDecay : les tokens récents montent plus (0.05 - jours * 0.001, min 0)
/// - Fixed : dérive imposée (utile en test, ex: 0.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendModel {
    AgeDecay { base: f64, per_day: f64 },
    Fixed(f64),
}

impl TrendModel {
    /// Calcule la dérive pour un token lancé il y a `days_since_launch` jours
    pub fn trend_for(&self, days_since_launch: f64) -> f64 {
        match *self {
            TrendModel::AgeDecay { base, per_day } => (base - days_since_launch * per_day).max(0.0),
            TrendModel::Fixed(trend) => trend,
        }
    }
}

impl Default for TrendModel {
    fn default() -> Self {
        TrendModel::AgeDecay { base: 0.05, per_day: 0.001 }
    }
}

/// Paramètres de génération des tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    pub history_len: usize,
    pub volatility: f64,
    pub trend: TrendModel,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            history_len: HISTORY_LEN,
            volatility: 0.1,
            trend: TrendModel::default(),
        }
    }
}

/// Génère `count` tokens avec des ids consécutifs à partir de `first_id`
///
/// # Arguments
/// * `rng` - source d'aléa (injectée)
/// * `count` - nombre de tokens
/// * `now` - instant de référence pour les dates de lancement
/// * `first_id` - premier identifiant à attribuer
/// * `params` - longueur d'historique, volatilité, modèle de dérive
pub fn generate_tokens<R: Rng>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
    first_id: u64,
    params: &GeneratorParams,
) -> Vec<Token> {
    (0..count as u64)
        .map(|offset| generate_token(rng, TokenId(first_id + offset), now, params))
        .collect()
}

/// Génère un seul token
pub fn generate_token<R: Rng>(
    rng: &mut R,
    id: TokenId,
    now: DateTime<Utc>,
    params: &GeneratorParams,
) -> Token {
    let ticker = pick(rng, TICKERS);
    let name = pick(rng, NAMES);
    let creator_handle = pick(rng, CREATOR_HANDLES);

    // Date de lancement uniforme dans les 30 derniers jours
    let max_age_ms = Duration::days(MAX_AGE_DAYS).num_milliseconds();
    let age = Duration::milliseconds(rng.gen_range(0..max_age_ms));
    let launch_time = now - age;

    let days_since_launch = age.num_milliseconds() as f64 / Duration::days(1).num_milliseconds() as f64;
    let walk = WalkParams {
        length: params.history_len,
        volatility: params.volatility,
        trend: params.trend.trend_for(days_since_launch),
    };
    let price_history: std::collections::VecDeque<f64> = generate_price_history(rng, walk).into();

    // La walk produit toujours au moins un échantillon
    let current_price = price_history.back().copied().unwrap_or_default();
    let supply = rng.gen_range(10_000_000u64..1_010_000_000) as f64;
    let market_cap = current_price * supply;
    let (price_change_30m, price_change_24h) = proxy_returns(&price_history);

    Token {
        id,
        ticker,
        name,
        creator_handle,
        launch_time,
        current_price,
        market_cap,
        volume_24h: rng.gen::<f64>() * market_cap * 0.3,
        transactions_24h: rng.gen_range(100..10_100),
        fees_24h: rng.gen_range(0.1..10.1),
        holder_count: rng.gen_range(50..5_050),
        liquidity_depth: market_cap * rng.gen_range(0.05..0.35),
        price_change_30m,
        price_change_24h,
        price_history,
        mentions: rng.gen_range(1..101),
        in_watchlist: rng.gen_bool(0.2),
    }
}

/// Génère les 5 plus gros détenteurs d'un token
///
/// CONCEPT : Allocation itérative
/// - Les 4 premiers prennent une part aléatoire du reste (au plus reste - 1)
/// - Le 5e absorbe tout ce qui reste
/// - Somme garantie = 100, aucune part négative
///
/// Pas idempotent : chaque appel produit une répartition différente.
pub fn generate_top_wallets<R: Rng>(rng: &mut R, token_id: TokenId) -> Vec<TopWallet> {
    let mut remaining: u32 = 100;
    let mut wallets = Vec::with_capacity(WALLET_COUNT);

    for i in 0..WALLET_COUNT {
        let percentage = if i == WALLET_COUNT - 1 {
            remaining
        } else {
            let share = (rng.gen::<f64>() * remaining as f64 * 0.6).floor() as u32;
            share.min(remaining.saturating_sub(1))
        };
        remaining -= percentage;

        // 'A' + i : "Wallet A", "Wallet B", ...
        let letter = char::from(b'A' + i as u8);
        wallets.push(TopWallet {
            id: format!("wallet-{}-{}", token_id, i),
            token_id,
            label: format!("Wallet {}", letter),
            percentage,
        });
    }

    wallets
}

/// Tire un élément au hasard dans une liste fixe
fn pick<R: Rng>(rng: &mut R, choices: &[&str]) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_string()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PRICE_FLOOR;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_tokens_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let now = Utc::now();
        let tokens = generate_tokens(&mut rng, 20, now, 0, &GeneratorParams::default());

        assert_eq!(tokens.len(), 20);
        for token in &tokens {
            assert_eq!(token.price_history.len(), HISTORY_LEN);
            assert_eq!(Some(&token.current_price), token.price_history.back());
            assert!(token.current_price >= PRICE_FLOOR);
            assert!(token.launch_time <= now);
            assert!(token.launch_time > now - Duration::days(MAX_AGE_DAYS));
            assert!(token.volume_24h < token.market_cap * 0.3 || token.market_cap == 0.0);
            assert!((100..10_100).contains(&token.transactions_24h));
            assert!((50..5_050).contains(&token.holder_count));
            assert!((1..101).contains(&token.mentions));
            assert!(TICKERS.contains(&token.ticker.as_str()));
            assert!(CREATOR_HANDLES.contains(&token.creator_handle.as_str()));
        }
    }

    #[test]
    fn test_generated_ids_are_consecutive() {
        let mut rng = StdRng::seed_from_u64(5);
        let tokens = generate_tokens(&mut rng, 3, Utc::now(), 10, &GeneratorParams::default());
        let ids: Vec<TokenId> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TokenId(10), TokenId(11), TokenId(12)]);
    }

    #[test]
    fn test_flat_token_has_zero_return() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = GeneratorParams {
            volatility: 0.0,
            trend: TrendModel::Fixed(0.0),
            ..GeneratorParams::default()
        };
        let tokens = generate_tokens(&mut rng, 1, Utc::now(), 0, &params);
        let token = &tokens[0];

        let first = token.price_history[0];
        assert!(token.price_history.iter().all(|&p| p == first));
        assert_eq!(token.price_change_24h, 0.0);
        assert_eq!(token.price_change_30m, 0.0);
    }

    #[test]
    fn test_trend_decays_with_age() {
        let model = TrendModel::default();
        assert!((model.trend_for(0.0) - 0.05).abs() < 1e-12);
        assert!((model.trend_for(10.0) - 0.04).abs() < 1e-12);
        assert_eq!(model.trend_for(50.0), 0.0);
        assert_eq!(model.trend_for(80.0), 0.0);
    }

    #[test]
    fn test_wallets_sum_to_100() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let wallets = generate_top_wallets(&mut rng, TokenId(3));
            assert_eq!(wallets.len(), WALLET_COUNT);
            assert_eq!(wallets.iter().map(|w| w.percentage).sum::<u32>(), 100);
        }
    }

    #[test]
    fn test_wallet_labels_and_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let wallets = generate_top_wallets(&mut rng, TokenId(4));
        let labels: Vec<&str> = wallets.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["Wallet A", "Wallet B", "Wallet C", "Wallet D", "Wallet E"]);
        assert_eq!(wallets[0].id, "wallet-token-4-0");
        assert!(wallets.iter().all(|w| w.token_id == TokenId(4)));
    }
}
