// ============================================================================
// Update Simulator
// ============================================================================
// Fait évoluer la liste de tokens à chaque tick du timer
//
// ALGORITHME (pour chaque token, dans l'ordre) :
// 1. Prix : perturbation multiplicative dans [-2%, +2%], clamp au plancher
// 2. Market cap : supply estimée (cap / ancien prix) * nouveau prix
// 3. Mentions : +[0, 3) avec probabilité 0.3
// 4. Historique : push du nouveau prix, pop du plus ancien
// 5. Rendements : recalcul via le proxy par décalage
// 6. Volume ±3%, transactions ±5, fees ±2%, holders +1 (p=0.2), liquidité ±1%
//
// Puis, avec probabilité launch_probability, un nouveau token est ajouté en tête.
//
// CONCEPT : Isolation des échecs par token
// - Le nouvel état est calculé sur une copie
// - Si une valeur n'est pas finie (NaN, inf), le token garde son ancien état
// - Les autres tokens continuent d'être mis à jour
// ============================================================================

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::engine::generator::{generate_token, GeneratorParams};
use crate::engine::walk::step;
use crate::models::{Token, TokenId};

/// Probabilité par défaut qu'un nouveau token soit lancé à chaque tick
pub const DEFAULT_LAUNCH_PROBABILITY: f64 = 0.1;

/// Paramètres d'un tick de simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickParams {
    /// Probabilité d'ajouter un nouveau token en tête de liste
    pub launch_probability: f64,

    /// Nombre maximum de tokens conservés (None = croissance illimitée)
    pub max_tokens: Option<usize>,
}

impl Default for TickParams {
    fn default() -> Self {
        Self {
            launch_probability: DEFAULT_LAUNCH_PROBABILITY,
            max_tokens: None,
        }
    }
}

/// Bilan d'un tick, renvoyé au thread UI pour le logging et le statut
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tokens mis à jour avec succès
    pub updated: usize,

    /// Tokens laissés intacts car le calcul produisait des valeurs non finies
    pub skipped: Vec<TokenId>,

    /// Nouveau token lancé pendant ce tick
    pub launched: Option<TokenId>,

    /// Tokens retirés par la limite max_tokens
    pub evicted: usize,
}

/// Applique une perturbation à un seul token
///
/// Retourne false (et laisse le token intact) si le nouvel état n'est pas fini.
pub fn perturb_token<R: Rng>(rng: &mut R, token: &mut Token) -> bool {
    let mut next = token.clone();

    // 1. Prix
    let previous_price = token.current_price;
    let new_price = step(previous_price, rng.gen_range(-0.02..0.02));

    // 2. Market cap : supply supposée constante
    // previous_price >= PRICE_FLOOR, le dénominateur ne s'approche jamais de zéro
    let supply_estimate = token.market_cap / previous_price;
    next.market_cap = new_price * supply_estimate;

    // 3. Mentions
    if rng.gen_bool(0.3) {
        next.mentions += rng.gen_range(0..3);
    }

    // 4. Historique (fenêtre glissante) + current_price
    next.push_price(new_price);

    // 5. Rendements
    next.recompute_returns();

    // 6. Autres métriques
    next.volume_24h += next.volume_24h * rng.gen_range(-0.03..0.03);
    next.transactions_24h = next
        .transactions_24h
        .saturating_add_signed(rng.gen_range(-5i64..5));
    next.fees_24h += next.fees_24h * rng.gen_range(-0.02..0.02);
    if rng.gen_bool(0.2) {
        next.holder_count += 1;
    }
    next.liquidity_depth += next.liquidity_depth * rng.gen_range(-0.01..0.01);

    if !next.is_finite() {
        return false;
    }

    *token = next;
    true
}

/// Exécute un tick complet sur la liste de tokens
///
/// # Arguments
/// * `rng` - source d'aléa
/// * `tokens` - liste partagée, modifiée en place
/// * `now` - instant utilisé pour un éventuel nouveau lancement
/// * `next_id` - compteur d'ids, incrémenté si un token est lancé
/// * `params` - probabilité de lancement et limite de taille
/// * `generator` - paramètres de génération du nouveau token
#[instrument(skip_all, fields(tokens = tokens.len()))]
pub fn simulate_tick<R: Rng>(
    rng: &mut R,
    tokens: &mut Vec<Token>,
    now: DateTime<Utc>,
    next_id: &mut u64,
    params: &TickParams,
    generator: &GeneratorParams,
) -> TickReport {
    let mut report = TickReport::default();

    for token in tokens.iter_mut() {
        if perturb_token(rng, token) {
            report.updated += 1;
        } else {
            warn!(token = %token.id, ticker = %token.ticker, "Non-finite values during update, token left unchanged");
            report.skipped.push(token.id);
        }
    }

    if rng.gen_bool(params.launch_probability.clamp(0.0, 1.0)) {
        let id = TokenId(*next_id);
        *next_id += 1;
        let token = generate_token(rng, id, now, generator);
        info!(token = %id, ticker = %token.ticker, creator = %token.creator_handle, "New token launched");
        tokens.insert(0, token);
        report.launched = Some(id);
    }

    // Les plus anciens lancements sont en fin de liste (ajout en tête)
    if let Some(max) = params.max_tokens {
        if tokens.len() > max {
            report.evicted = tokens.len() - max;
            tokens.truncate(max);
        }
    }

    report
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generator::generate_tokens;
    use crate::models::{HISTORY_LEN, PRICE_FLOOR};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_tokens(rng: &mut StdRng, count: usize) -> Vec<Token> {
        generate_tokens(rng, count, Utc::now(), 0, &GeneratorParams::default())
    }

    #[test]
    fn test_tick_preserves_history_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut tokens = sample_tokens(&mut rng, 10);
        let mut next_id = 10;
        let params = TickParams { launch_probability: 0.0, max_tokens: None };

        let report = simulate_tick(&mut rng, &mut tokens, Utc::now(), &mut next_id, &params, &GeneratorParams::default());

        assert_eq!(report.updated, 10);
        assert!(report.skipped.is_empty());
        for token in &tokens {
            assert_eq!(token.price_history.len(), HISTORY_LEN);
            assert_eq!(Some(&token.current_price), token.price_history.back());
        }
    }

    #[test]
    fn test_price_floor_holds_over_many_ticks() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut tokens = sample_tokens(&mut rng, 5);
        let mut next_id = 5;
        let params = TickParams::default();

        for _ in 0..500 {
            simulate_tick(&mut rng, &mut tokens, Utc::now(), &mut next_id, &params, &GeneratorParams::default());
        }

        for token in &tokens {
            assert!(token.current_price >= PRICE_FLOOR);
            assert!(token.price_history.iter().all(|&p| p >= PRICE_FLOOR));
            assert_eq!(token.price_history.len(), HISTORY_LEN);
        }
    }

    #[test]
    fn test_price_moves_within_two_percent() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut tokens = sample_tokens(&mut rng, 1);
        let before = tokens[0].current_price;

        assert!(perturb_token(&mut rng, &mut tokens[0]));

        let after = tokens[0].current_price;
        let ratio = after / before;
        assert!((ratio >= 0.98 - 1e-12 && ratio <= 1.02 + 1e-12) || after == PRICE_FLOOR);
    }

    #[test]
    fn test_market_cap_follows_price() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut tokens = sample_tokens(&mut rng, 1);
        let supply_before = tokens[0].market_cap / tokens[0].current_price;

        perturb_token(&mut rng, &mut tokens[0]);

        let supply_after = tokens[0].market_cap / tokens[0].current_price;
        assert!((supply_before - supply_after).abs() / supply_before < 1e-9);
    }

    #[test]
    fn test_token_at_price_floor_stays_finite() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut token = sample_tokens(&mut rng, 1).remove(0);
        token.price_history = vec![PRICE_FLOOR; HISTORY_LEN].into();
        token.current_price = PRICE_FLOOR;
        token.market_cap = PRICE_FLOOR * 500_000_000.0;
        token.recompute_returns();

        let mut clamped_steps = 0;
        for _ in 0..1_000 {
            let price_before = token.current_price;
            let cap_before = token.market_cap;

            assert!(perturb_token(&mut rng, &mut token));

            assert!(token.current_price >= PRICE_FLOOR);
            assert!(token.market_cap.is_finite());
            assert_eq!(token.price_history.len(), HISTORY_LEN);
            assert_eq!(Some(&token.current_price), token.price_history.back());

            if price_before == PRICE_FLOOR && token.current_price == PRICE_FLOOR {
                clamped_steps += 1;
                assert!((token.market_cap - cap_before).abs() <= cap_before * 1e-12);
            }
        }
        assert!(clamped_steps > 0);
    }

    #[test]
    fn test_non_finite_token_is_left_unchanged() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut tokens = sample_tokens(&mut rng, 3);
        tokens[1].market_cap = f64::INFINITY;
        let snapshot = tokens[1].clone();
        let mut next_id = 3;
        let params = TickParams { launch_probability: 0.0, max_tokens: None };

        let report = simulate_tick(&mut rng, &mut tokens, Utc::now(), &mut next_id, &params, &GeneratorParams::default());

        assert_eq!(report.updated, 2);
        assert_eq!(report.skipped, vec![snapshot.id]);
        assert_eq!(tokens[1].price_history, snapshot.price_history);
        assert_eq!(tokens[1].current_price, snapshot.current_price);
    }

    #[test]
    fn test_launch_prepends_with_fresh_id() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut tokens = sample_tokens(&mut rng, 2);
        let mut next_id = 2;
        let params = TickParams { launch_probability: 1.0, max_tokens: None };

        let report = simulate_tick(&mut rng, &mut tokens, Utc::now(), &mut next_id, &params, &GeneratorParams::default());

        assert_eq!(report.launched, Some(TokenId(2)));
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].id, TokenId(2));
        assert_eq!(next_id, 3);
    }

    #[test]
    fn test_max_tokens_evicts_oldest() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut tokens = sample_tokens(&mut rng, 3);
        let mut next_id = 3;
        let params = TickParams { launch_probability: 1.0, max_tokens: Some(3) };

        let report = simulate_tick(&mut rng, &mut tokens, Utc::now(), &mut next_id, &params, &GeneratorParams::default());

        assert_eq!(report.evicted, 1);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].id, TokenId(3));
        assert!(tokens.iter().all(|t| t.id != TokenId(2)));
    }
}
