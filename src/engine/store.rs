// ============================================================================
// Structure : TokenStore
// ============================================================================
// Possède la liste de tokens et la source d'aléa
//
// PATTERN : Un seul propriétaire de l'état
// - Lectures : tokens(), watchlist_tokens(), top_*()
// - Mutations : simulate_update() (tick) et toggle_watchlist()
// - Le store est injecté dans App, pas d'état global
// ============================================================================

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::engine::generator::{generate_tokens, generate_top_wallets, GeneratorParams};
use crate::engine::query;
use crate::engine::simulator::{simulate_tick, TickParams, TickReport};
use crate::models::{CreatorSummary, Token, TokenId, TopWallet};

/// Nombre de tokens générés au démarrage
pub const DEFAULT_INITIAL_TOKENS: usize = 20;

/// Store en mémoire des tokens simulés
pub struct TokenStore {
    tokens: Vec<Token>,
    rng: StdRng,
    next_id: u64,
    tick_params: TickParams,
    generator: GeneratorParams,
}

impl TokenStore {
    /// Crée un store avec `count` tokens générés
    ///
    /// CONCEPT : RNG seedable
    /// - Some(seed) : séquence reproductible (tests, démos)
    /// - None : seed tirée de l'entropie du système
    pub fn generate(count: usize, seed: Option<u64>, tick_params: TickParams) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let generator = GeneratorParams::default();
        let tokens = generate_tokens(&mut rng, count, Utc::now(), 0, &generator);
        info!(count, ?seed, "Generated initial token list");

        Self {
            next_id: count as u64,
            tokens,
            rng,
            tick_params,
            generator,
        }
    }

    /// Crée un store à partir d'une liste existante (tests, replays)
    pub fn with_tokens(tokens: Vec<Token>, rng: StdRng, tick_params: TickParams) -> Self {
        let next_id = tokens.iter().map(|t| t.id.0 + 1).max().unwrap_or(0);
        Self {
            tokens,
            rng,
            next_id,
            tick_params,
            generator: GeneratorParams::default(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn watchlist_tokens(&self) -> Vec<&Token> {
        query::watchlist(&self.tokens)
    }

    pub fn top_by_return(&self) -> Vec<&Token> {
        query::top_by_return(&self.tokens)
    }

    pub fn top_by_volume(&self) -> Vec<&Token> {
        query::top_by_volume(&self.tokens)
    }

    pub fn top_creators(&self) -> Vec<CreatorSummary<'_>> {
        query::top_creators(&self.tokens)
    }

    pub fn recent_launches(&self) -> Vec<&Token> {
        query::recent_launches(&self.tokens)
    }

    /// Génère de nouveaux top wallets pour un token (jamais mis en cache)
    ///
    /// Retourne une liste vide si l'id est inconnu.
    pub fn top_wallets_for_token(&mut self, id: TokenId) -> Vec<TopWallet> {
        if self.get(id).is_none() {
            debug!(token = %id, "Wallets requested for unknown token");
            return Vec::new();
        }
        generate_top_wallets(&mut self.rng, id)
    }

    /// Inverse le flag in_watchlist d'un token
    ///
    /// Retourne le nouvel état, ou None si l'id est inconnu (no-op).
    pub fn toggle_watchlist(&mut self, id: TokenId) -> Option<bool> {
        match self.tokens.iter_mut().find(|t| t.id == id) {
            Some(token) => {
                token.in_watchlist = !token.in_watchlist;
                debug!(token = %id, in_watchlist = token.in_watchlist, "Watchlist toggled");
                Some(token.in_watchlist)
            }
            None => {
                debug!(token = %id, "Toggle requested for unknown token");
                None
            }
        }
    }

    /// Exécute un tick de simulation et retourne son bilan
    pub fn tick(&mut self) -> TickReport {
        simulate_tick(
            &mut self.rng,
            &mut self.tokens,
            Utc::now(),
            &mut self.next_id,
            &self.tick_params,
            &self.generator,
        )
    }

    /// Exécute un tick et retourne la liste mise à jour
    pub fn simulate_update(&mut self) -> &[Token] {
        let report = self.tick();
        debug!(updated = report.updated, skipped = report.skipped.len(), "Simulated update");
        &self.tokens
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
