// ============================================================================
// Price-History Walk
// ============================================================================
// Marche aléatoire multiplicative avec dérive (drift), bornée par PRICE_FLOOR
//
// ALGORITHME :
// - Prix initial uniforme dans [0, 0.1)
// - Chaque échantillon : prix *= 1 + U * volatility + trend, U dans [-0.5, 0.5)
// - Clamp à PRICE_FLOOR après chaque pas
// - Pas de retour à la moyenne : le prix peut dériver sans limite haute
// ============================================================================

use rand::Rng;

use crate::models::PRICE_FLOOR;

/// Paramètres de la marche aléatoire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    /// Nombre d'échantillons à produire (au moins 1)
    pub length: usize,

    /// Amplitude maximale d'un pas (fraction du prix)
    pub volatility: f64,

    /// Dérive appliquée à chaque pas
    pub trend: f64,
}

/// Génère un historique de prix strictement positifs
///
/// CONCEPT RUST : Générique sur le RNG
/// - R: Rng accepte le StdRng du store comme un StdRng seedé en test
/// - Le RNG est injecté : aucune source d'aléa globale
///
/// `length <= 1` produit exactement un échantillon.
pub fn generate_price_history<R: Rng>(rng: &mut R, params: WalkParams) -> Vec<f64> {
    let length = params.length.max(1);
    let mut history = Vec::with_capacity(length);
    let mut price: f64 = rng.gen_range(0.0..0.1);

    for _ in 0..length {
        let shock = rng.gen_range(-0.5..0.5) * params.volatility;
        price = step(price, shock + params.trend);
        history.push(price);
    }

    history
}

/// Applique un pas multiplicatif et le clamp au plancher
pub fn step(price: f64, relative_change: f64) -> f64 {
    (price * (1.0 + relative_change)).max(PRICE_FLOOR)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_walk_length_and_floor() {
        let mut rng = StdRng::seed_from_u64(42);
        let history = generate_price_history(
            &mut rng,
            WalkParams { length: 100, volatility: 0.1, trend: 0.05 },
        );
        assert_eq!(history.len(), 100);
        assert!(history.iter().all(|&p| p >= PRICE_FLOOR));
    }

    #[test]
    fn test_walk_never_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        for length in [0, 1] {
            let history = generate_price_history(
                &mut rng,
                WalkParams { length, volatility: 0.1, trend: 0.0 },
            );
            assert_eq!(history.len(), 1);
        }
    }

    #[test]
    fn test_walk_flat_without_volatility_or_trend() {
        let mut rng = StdRng::seed_from_u64(7);
        let history = generate_price_history(
            &mut rng,
            WalkParams { length: 50, volatility: 0.0, trend: 0.0 },
        );
        let first = history[0];
        assert!(history.iter().all(|&p| p == first));
    }

    #[test]
    fn test_walk_heavy_downtrend_hits_floor() {
        let mut rng = StdRng::seed_from_u64(3);
        let history = generate_price_history(
            &mut rng,
            WalkParams { length: 200, volatility: 0.0, trend: -0.5 },
        );
        assert_eq!(*history.last().unwrap(), PRICE_FLOOR);
    }

    #[test]
    fn test_walk_is_deterministic_for_a_seed() {
        let params = WalkParams { length: 20, volatility: 0.1, trend: 0.01 };
        let a = generate_price_history(&mut StdRng::seed_from_u64(9), params);
        let b = generate_price_history(&mut StdRng::seed_from_u64(9), params);
        assert_eq!(a, b);
    }
}
