// ============================================================================
// Query / Derivation Layer
// ============================================================================
// Fonctions pures de lecture sur la liste de tokens
//
// CONCEPTS RUST :
// 1. Emprunts : on retourne des Vec<&Token>, pas de clones
// 2. sort_by avec then_with : tri multi-critères déterministe
// 3. f64::total_cmp : ordre total sur les flottants (NaN inclus)
//
// Aucune mémoïsation : tout est recalculé à chaque appel.
// ============================================================================

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{CreatorSummary, Token};

/// Taille des leaderboards
pub const LEADERBOARD_SIZE: usize = 5;

/// Top 5 par rendement 24h (décroissant, égalités départagées par id croissant)
pub fn top_by_return(tokens: &[Token]) -> Vec<&Token> {
    top_by(tokens, |t| t.price_change_24h)
}

/// Top 5 par volume 24h (décroissant, égalités départagées par id croissant)
pub fn top_by_volume(tokens: &[Token]) -> Vec<&Token> {
    top_by(tokens, |t| t.volume_24h)
}

/// Top 5 des créateurs par nombre de tokens
///
/// CONCEPT RUST : HashMap + entry API
/// - entry().or_default() : insère un Vec vide si la clé est absente
/// - Les tokens de chaque créateur restent dans l'ordre du store
///
/// Égalités départagées par handle croissant.
pub fn top_creators(tokens: &[Token]) -> Vec<CreatorSummary<'_>> {
    let mut by_creator: HashMap<&str, Vec<&Token>> = HashMap::new();
    for token in tokens {
        by_creator
            .entry(token.creator_handle.as_str())
            .or_default()
            .push(token);
    }

    let mut creators: Vec<CreatorSummary<'_>> = by_creator
        .into_iter()
        .map(|(handle, tokens)| CreatorSummary {
            handle: handle.to_string(),
            count: tokens.len(),
            tokens,
        })
        .collect();

    creators.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.handle.cmp(&b.handle)));
    creators.truncate(LEADERBOARD_SIZE);
    creators
}

/// Tous les tokens de la watchlist, dans l'ordre du store
pub fn watchlist(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| t.in_watchlist).collect()
}

/// Tous les tokens, du lancement le plus récent au plus ancien (launch feed)
pub fn recent_launches(tokens: &[Token]) -> Vec<&Token> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| b.launch_time.cmp(&a.launch_time).then_with(|| a.id.cmp(&b.id)));
    sorted
}

/// Tri décroissant générique sur une clé flottante, limité au leaderboard
///
/// CONCEPT RUST : Closures génériques
/// - F: Fn(&Token) -> f64 : n'importe quelle fonction qui extrait une clé
/// - Un NaN est traité comme la plus petite valeur (fin de classement)
fn top_by<F>(tokens: &[Token], key: F) -> Vec<&Token>
where
    F: Fn(&Token) -> f64,
{
    let sanitized = |t: &Token| {
        let value = key(t);
        if value.is_nan() {
            f64::NEG_INFINITY
        } else {
            value
        }
    };

    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| descending(sanitized(a), sanitized(b)).then_with(|| a.id.cmp(&b.id)));
    sorted.truncate(LEADERBOARD_SIZE);
    sorted
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenId;
    use chrono::{Duration, Utc};

    fn token(id: u64, creator: &str, change_24h: f64, volume: f64) -> Token {
        Token {
            id: TokenId(id),
            ticker: format!("T{}", id),
            name: format!("Token {}", id),
            creator_handle: creator.to_string(),
            launch_time: Utc::now() - Duration::hours(id as i64),
            current_price: 1.0,
            market_cap: 1_000.0,
            volume_24h: volume,
            transactions_24h: 100,
            fees_24h: 1.0,
            holder_count: 50,
            liquidity_depth: 100.0,
            price_change_30m: 0.0,
            price_change_24h: change_24h,
            price_history: vec![1.0].into(),
            mentions: 1,
            in_watchlist: id % 2 == 0,
        }
    }

    fn ids(tokens: &[&Token]) -> Vec<u64> {
        tokens.iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn test_top_by_return_sorted_and_limited() {
        let tokens: Vec<Token> = (0..8)
            .map(|i| token(i, "alice", i as f64 * 10.0, 0.0))
            .collect();

        let top = top_by_return(&tokens);
        assert_eq!(ids(&top), vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_top_by_volume_small_input() {
        let tokens = vec![token(0, "a", 0.0, 5.0), token(1, "b", 0.0, 50.0)];
        let top = top_by_volume(&tokens);
        assert_eq!(ids(&top), vec![1, 0]);

        assert!(top_by_volume(&[]).is_empty());
    }

    #[test]
    fn test_ties_broken_by_id() {
        let tokens = vec![
            token(3, "a", 1.0, 0.0),
            token(1, "a", 1.0, 0.0),
            token(2, "a", 2.0, 0.0),
        ];
        assert_eq!(ids(&top_by_return(&tokens)), vec![2, 1, 3]);
    }

    #[test]
    fn test_nan_sorts_last() {
        let tokens = vec![token(0, "a", f64::NAN, 0.0), token(1, "a", -50.0, 0.0)];
        assert_eq!(ids(&top_by_return(&tokens)), vec![1, 0]);
    }

    #[test]
    fn test_single_creator_groups_all_tokens() {
        let tokens: Vec<Token> = (0..3).map(|i| token(i, "alice", 0.0, 0.0)).collect();

        let creators = top_creators(&tokens);
        assert_eq!(creators.len(), 1);
        assert_eq!(creators[0].handle, "alice");
        assert_eq!(creators[0].count, 3);
        assert_eq!(ids(&creators[0].tokens), vec![0, 1, 2]);
    }

    #[test]
    fn test_top_creators_order_and_limit() {
        let handles = ["a", "b", "b", "c", "c", "c", "d", "e", "f"];
        let tokens: Vec<Token> = handles
            .iter()
            .enumerate()
            .map(|(i, h)| token(i as u64, h, 0.0, 0.0))
            .collect();

        let creators = top_creators(&tokens);
        let order: Vec<(&str, usize)> = creators.iter().map(|c| (c.handle.as_str(), c.count)).collect();
        assert_eq!(order, vec![("c", 3), ("b", 2), ("a", 1), ("d", 1), ("e", 1)]);
    }

    #[test]
    fn test_watchlist_filter() {
        let tokens: Vec<Token> = (0..5).map(|i| token(i, "a", 0.0, 0.0)).collect();
        assert_eq!(ids(&watchlist(&tokens)), vec![0, 2, 4]);
    }

    #[test]
    fn test_recent_launches_newest_first() {
        // launch_time = now - id heures : l'id 0 est le plus récent
        let tokens = vec![token(2, "a", 0.0, 0.0), token(0, "a", 0.0, 0.0), token(1, "a", 0.0, 0.0)];
        assert_eq!(ids(&recent_launches(&tokens)), vec![0, 1, 2]);
    }
}
