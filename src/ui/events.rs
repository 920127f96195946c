// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Poll avec timeout : ne bloque jamais le rendu plus de tick_rate
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (pas d'entrée pendant tick_rate)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire qui rend la main au moins toutes les `tick_rate`
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - Si pas d'événement avant tick_rate, retourne Ok(Event::Tick)
    /// - L'écran est redessiné à chaque retour, donc les ticks du worker
    ///   apparaissent sans attendre une touche
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================
// CONCEPT RUST : Pattern matching avec matches!
// - Destructure Event::Key et vérifie le KeyCode en une ligne
// ============================================================================

fn key_matches(event: &Event, predicate: impl Fn(KeyCode) -> bool) -> bool {
    if let Event::Key(key) = event {
        predicate(key.code)
    } else {
        false
    }
}

/// 'q' : quitter (two-step)
pub fn is_quit_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Enter))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// Flèche gauche ou 'h' : curseur de la sparkline vers le passé
pub fn is_left_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Left | KeyCode::Char('h')))
}

/// Flèche droite ou 'l' : curseur de la sparkline vers le présent
pub fn is_right_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Right | KeyCode::Char('l')))
}

/// Tab : bascule All / Watchlist
pub fn is_tab_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Tab))
}

/// ']' : leaderboard suivant
pub fn is_next_leaderboard_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char(']')))
}

/// '[' : leaderboard précédent
pub fn is_previous_leaderboard_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('[')))
}

/// 'w' ou '*' : ajoute / retire de la watchlist (l'étoile de la carte)
pub fn is_watchlist_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('*')))
}

/// 'r' : force un tick de simulation immédiat
pub fn is_refresh_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('r') | KeyCode::Char('R')))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Down)));
        assert!(is_left_event(&key(KeyCode::Char('h'))));
        assert!(is_right_event(&key(KeyCode::Right)));
    }

    #[test]
    fn test_action_keys() {
        assert!(is_watchlist_event(&key(KeyCode::Char('*'))));
        assert!(is_tab_event(&key(KeyCode::Tab)));
        assert!(is_next_leaderboard_event(&key(KeyCode::Char(']'))));
        assert!(is_previous_leaderboard_event(&key(KeyCode::Char('['))));
        assert!(is_refresh_event(&key(KeyCode::Char('r'))));
        assert!(!is_refresh_event(&Event::Tick));
    }
}
