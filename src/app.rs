// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Composition : App possède le TokenStore (injecté à la construction)
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les tokens ne sont modifiés que par le store (tick, watchlist)
// ============================================================================

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::engine::{TickReport, TokenStore};
use crate::models::{Token, TokenId, TopWallet};

// ============================================================================
// Enums : écrans et onglets
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : feed, leaderboards, liste de tokens
    Dashboard,

    /// Popup de détails du token sélectionné
    Details,
}

/// Onglet de la liste principale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTab {
    All,
    Watchlist,
}

impl TokenTab {
    pub fn index(&self) -> usize {
        match self {
            TokenTab::All => 0,
            TokenTab::Watchlist => 1,
        }
    }

    pub fn toggle(&self) -> TokenTab {
        match self {
            TokenTab::All => TokenTab::Watchlist,
            TokenTab::Watchlist => TokenTab::All,
        }
    }
}

/// Onglet du panneau leaderboards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardTab {
    TopReturn,
    Volume,
    Creators,
}

impl LeaderboardTab {
    pub fn index(&self) -> usize {
        match self {
            LeaderboardTab::TopReturn => 0,
            LeaderboardTab::Volume => 1,
            LeaderboardTab::Creators => 2,
        }
    }

    /// Cycle : Top ROI → Volume → Creators → Top ROI
    pub fn next(&self) -> LeaderboardTab {
        match self {
            LeaderboardTab::TopReturn => LeaderboardTab::Volume,
            LeaderboardTab::Volume => LeaderboardTab::Creators,
            LeaderboardTab::Creators => LeaderboardTab::TopReturn,
        }
    }

    pub fn previous(&self) -> LeaderboardTab {
        match self {
            LeaderboardTab::TopReturn => LeaderboardTab::Creators,
            LeaderboardTab::Volume => LeaderboardTab::TopReturn,
            LeaderboardTab::Creators => LeaderboardTab::Volume,
        }
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Store des tokens simulés (seul propriétaire des données)
    pub store: TokenStore,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Onglet actif de la liste principale (All / Watchlist)
    pub token_tab: TokenTab,

    /// Onglet actif des leaderboards
    pub leaderboard_tab: LeaderboardTab,

    /// Index du token sélectionné dans la liste visible
    pub selected_index: usize,

    /// Token affiché dans la popup de détails
    /// CONCEPT : On garde l'id, pas l'index
    /// - Un nouveau lancement décale les index (ajout en tête)
    /// - L'id reste stable pendant toute la durée de vie du token
    pub details_token: Option<TokenId>,

    /// Top holders générés à l'ouverture de la popup
    pub details_wallets: Vec<TopWallet>,

    /// Position du curseur sur la sparkline (None = pas de curseur)
    pub history_cursor: Option<usize>,

    /// Two-step quit (comme 'q' puis 'q')
    pub confirm_quit: bool,

    /// Heure du dernier rafraîchissement des données
    pub last_updated: DateTime<Utc>,

    /// Nombre de ticks appliqués depuis le démarrage
    pub tick_count: u64,

    /// Message de statut affiché dans le footer
    pub status_message: Option<String>,

    /// Nombre de lancements affichés dans le feed
    pub feed_size: usize,
}

impl App {
    /// Crée l'application autour d'un store déjà généré
    pub fn new(store: TokenStore) -> Self {
        Self {
            running: true,
            store,
            current_screen: Screen::Dashboard,
            token_tab: TokenTab::All,
            leaderboard_tab: LeaderboardTab::TopReturn,
            selected_index: 0,
            details_token: None,
            details_wallets: Vec::new(),
            history_cursor: None,
            confirm_quit: false,
            last_updated: Utc::now(),
            tick_count: 0,
            status_message: None,
            feed_size: 10,
        }
    }

    pub fn with_feed_size(mut self, feed_size: usize) -> Self {
        self.feed_size = feed_size;
        self
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Données visibles
    // ========================================================================

    /// Tokens de l'onglet actif
    ///
    /// CONCEPT RUST : Vec<&Token>
    /// - Recalculé à chaque frame, aucun cache
    /// - Emprunte le store : pas de copie des historiques
    pub fn visible_tokens(&self) -> Vec<&Token> {
        match self.token_tab {
            TokenTab::All => self.store.tokens().iter().collect(),
            TokenTab::Watchlist => self.store.watchlist_tokens(),
        }
    }

    /// Token sélectionné dans la liste visible
    pub fn selected_token(&self) -> Option<&Token> {
        self.visible_tokens().get(self.selected_index).copied()
    }

    /// Token affiché dans la popup
    pub fn details(&self) -> Option<&Token> {
        self.details_token.and_then(|id| self.store.get(id))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.visible_tokens().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Ramène la sélection dans les bornes après un changement de liste
    pub fn clamp_selection(&mut self) {
        let max_index = self.visible_tokens().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max_index);
    }

    /// Bascule All ↔ Watchlist
    pub fn switch_token_tab(&mut self) {
        self.token_tab = self.token_tab.toggle();
        self.selected_index = 0;
    }

    pub fn next_leaderboard(&mut self) {
        self.leaderboard_tab = self.leaderboard_tab.next();
    }

    pub fn previous_leaderboard(&mut self) {
        self.leaderboard_tab = self.leaderboard_tab.previous();
    }

    // ========================================================================
    // Actions sur les tokens
    // ========================================================================

    /// Ajoute / retire le token sélectionné de la watchlist
    ///
    /// Sur l'onglet Watchlist, le token disparaît de la liste : on recadre
    /// la sélection.
    pub fn toggle_selected_watchlist(&mut self) {
        let target = match self.current_screen {
            Screen::Details => self.details_token,
            Screen::Dashboard => self.selected_token().map(|t| t.id),
        };

        let Some(id) = target else {
            debug!("Watchlist toggle with no token selected");
            return;
        };

        if let Some(in_watchlist) = self.store.toggle_watchlist(id) {
            let action = if in_watchlist { "added to" } else { "removed from" };
            info!(token = %id, "Token {} watchlist", action);
            self.status_message = Some(format!("{} {} watchlist", id, action));
        }
        self.clamp_selection();
    }

    /// Ouvre la popup de détails et génère les top holders
    pub fn open_details(&mut self) {
        let Some(id) = self.selected_token().map(|t| t.id) else {
            return;
        };
        self.details_wallets = self.store.top_wallets_for_token(id);
        self.details_token = Some(id);
        self.history_cursor = None;
        self.current_screen = Screen::Details;
    }

    pub fn close_details(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.details_token = None;
        self.details_wallets.clear();
        self.history_cursor = None;
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_on_details(&self) -> bool {
        self.current_screen == Screen::Details
    }

    /// Déplace le curseur de la sparkline vers la gauche (échantillon plus ancien)
    pub fn cursor_left(&mut self) {
        let Some(len) = self.details().map(|t| t.price_history.len()) else {
            return;
        };
        let last = len.saturating_sub(1);
        self.history_cursor = Some(match self.history_cursor {
            Some(index) => index.saturating_sub(1),
            None => last,
        });
    }

    /// Déplace le curseur vers la droite ; au-delà du dernier échantillon il disparaît
    pub fn cursor_right(&mut self) {
        let Some(len) = self.details().map(|t| t.price_history.len()) else {
            return;
        };
        self.history_cursor = match self.history_cursor {
            Some(index) if index + 1 < len => Some(index + 1),
            _ => None,
        };
    }

    /// Valeur sous le curseur de la sparkline
    pub fn cursor_value(&self) -> Option<(usize, f64)> {
        let index = self.history_cursor?;
        let price = *self.details()?.price_history.get(index)?;
        Some((index, price))
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Applique un tick de simulation au store
    ///
    /// CONCEPT : Un seul point d'entrée pour la mutation périodique
    /// - Appelé par le worker, sous le lock de Arc<Mutex<App>>
    /// - Les lecteurs ne voient jamais un tick à moitié appliqué
    pub fn apply_tick(&mut self) -> TickReport {
        // Un lancement insère en tête et décale les index : on retient l'id
        let selected = self.selected_token().map(|t| t.id);
        let report = self.store.tick();
        self.tick_count += 1;
        self.last_updated = Utc::now();

        if !report.skipped.is_empty() {
            warn!(skipped = report.skipped.len(), "Some tokens were not updated this tick");
        }
        if let Some(id) = report.launched {
            if let Some(token) = self.store.get(id) {
                self.status_message = Some(format!("New launch: ${} by @{}", token.ticker, token.creator_handle));
            }
        }

        // La popup suit son token par id ; s'il a été évincé, on la ferme
        if self.is_on_details() && self.details().is_none() {
            self.close_details();
        }
        self.follow_selection(selected);
        report
    }

    /// Replace la sélection sur le token `id` s'il est encore visible,
    /// sinon la ramène dans les bornes
    fn follow_selection(&mut self, id: Option<TokenId>) {
        let position = id.and_then(|id| self.visible_tokens().iter().position(|t| t.id == id));
        match position {
            Some(index) => self.selected_index = index,
            None => self.clamp_selection(),
        }
    }

    // ========================================================================
    // Confirmation de quit
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
