// ============================================================================
// Launchboard - Dashboard TUI de lancements de tokens simulés
// ============================================================================
// Génère une liste de tokens synthétiques, les fait évoluer à intervalle fixe
// et les affiche : feed des lancements, leaderboards, watchlist, détails
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Worker thread : timer de simulation avec son propre runtime tokio
// 4. Arc<Mutex<App>> : état partagé entre l'UI et le worker
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use launchboard::app::App;
use launchboard::config::{Config, LoggingConfig};
use launchboard::engine::TokenStore;
use launchboard::error::EngineError;
use launchboard::models::{CreatorSummary, Token};
use launchboard::ui::{render, Event, EventHandler};
use launchboard::worker::{spawn_simulation_worker, SimCommand, SimEvent};

// ============================================================================
// Arguments CLI
// ============================================================================
// CONCEPT RUST : clap derive
// - Chaque champ devient une option
// - Les Option<T> sont absents par défaut : la config garde sa valeur
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "launchboard", version, about = "Simulated token launch dashboard")]
struct Args {
    /// Fichier de configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed du générateur (séquence reproductible)
    #[arg(long)]
    seed: Option<u64>,

    /// Nombre de tokens générés au démarrage
    #[arg(long)]
    tokens: Option<usize>,

    /// Période de simulation en secondes
    #[arg(long)]
    interval: Option<u64>,

    /// Nombre maximum de tokens conservés
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Affiche un snapshot JSON sur stdout et quitte
    #[arg(long)]
    snapshot: bool,
}

impl Args {
    /// Applique les options CLI par-dessus la configuration chargée
    fn apply(&self, config: &mut Config) {
        let sim = &mut config.simulation;
        if let Some(seed) = self.seed {
            sim.seed = Some(seed);
        }
        if let Some(tokens) = self.tokens {
            sim.initial_tokens = tokens;
        }
        if let Some(interval) = self.interval {
            sim.update_interval_secs = interval;
        }
        if let Some(max_tokens) = self.max_tokens {
            sim.max_tokens = Some(max_tokens);
        }
    }
}

/// Snapshot JSON (--snapshot)
#[derive(Serialize)]
struct Snapshot<'a> {
    generated_at: DateTime<Utc>,
    tokens: &'a [Token],
    top_by_return: Vec<&'a Token>,
    top_by_volume: Vec<&'a Token>,
    top_creators: Vec<CreatorSummary<'a>>,
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - stdout appartient au TUI : on log vers un fichier
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - `[logging] directory` si défini
/// - sinon `<data dir>/launchboard/logs` (ex: ~/.local/share/launchboard/logs)
/// - sinon `./logs`
///
/// ```bash
/// tail -f ~/.local/share/launchboard/logs/launchboard.log.*
/// RUST_LOG=launchboard=trace launchboard
/// ```
fn init_logging(config: &LoggingConfig) -> Result<PathBuf> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config
        .directory
        .clone()
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join("launchboard").join("logs")))
        .unwrap_or_else(|| PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "launchboard.log");

    // RUST_LOG prend le pas sur le filtre de la config
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true) // worker et UI sont sur des threads différents
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(log_dir)
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    // Le logging échoue rarement ; on continue sans s'il le faut
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    }

    info!(?config, "Launchboard starting up");

    let store = TokenStore::generate(
        config.simulation.initial_tokens,
        config.simulation.seed,
        config.tick_params(),
    );

    if store.is_empty() {
        warn!("Starting with an empty token list, waiting for launches");
    }

    if args.snapshot {
        return print_snapshot(&store);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(store).with_feed_size(config.ui.feed_size)));

    // UI → worker : tokio mpsc (lu dans tokio::select!)
    // worker → UI : std mpsc (lu avec try_recv, jamais bloquant)
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel::<SimCommand>();
    let (event_tx, event_rx) = mpsc::channel::<SimEvent>();

    info!(period = ?config.update_interval(), "Spawning simulation worker");
    let worker = spawn_simulation_worker(app.clone(), config.update_interval(), command_rx, event_tx);

    let events = EventHandler::new(config.tick_rate());

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, &command_tx, &event_rx);

    // Arrête le worker avant de rendre le terminal
    let _ = command_tx.send(SimCommand::Shutdown);
    if worker.join().is_err() {
        error!("Simulation worker panicked");
    }

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Écrit le snapshot JSON sur stdout
fn print_snapshot(store: &TokenStore) -> Result<()> {
    let snapshot = Snapshot {
        generated_at: Utc::now(),
        tokens: store.tokens(),
        top_by_return: store.top_by_return(),
        top_by_volume: store.top_by_volume(),
        top_creators: store.top_creators(),
    };
    let json = serde_json::to_string_pretty(&snapshot).context("Échec de la sérialisation du snapshot")?;
    println!("{}", json);
    info!(tokens = store.len(), "Snapshot written");
    Ok(())
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Traiter les événements du worker
//   2. Dessiner l'interface
//   3. Traiter l'entrée clavier
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: &UnboundedSender<SimCommand>,
    event_rx: &mpsc::Receiver<SimEvent>,
) -> Result<()> {
    loop {
        // ========================================
        // 0. WORKER : bilans de simulation
        // ========================================
        // Le tick est déjà appliqué à App sous le lock ; on ne fait que logger
        loop {
            match event_rx.try_recv() {
                Ok(SimEvent::Ticked(report)) => {
                    if let Some(id) = report.launched {
                        debug!(token = %id, "Launch received by UI");
                    }
                }
                Ok(SimEvent::Stopped) => warn!("Simulation worker stopped"),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("Worker channel disconnected");
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        {
            let app_lock = app.lock().map_err(|_| EngineError::StatePoisoned)?;
            if !app_lock.is_running() {
                break;
            }
            terminal.draw(|frame| render(frame, &app_lock))?;
        }

        // ========================================
        // 2. INPUT
        // ========================================
        // CONCEPT : le lock n'est pas tenu pendant le poll clavier
        // - Le worker peut appliquer un tick pendant qu'on attend
        let event = events.next()?;
        let mut app_lock = app.lock().map_err(|_| EngineError::StatePoisoned)?;
        handle_event(&mut app_lock, event, command_tx);
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Le premier bras dont la garde est vraie gagne
/// - Les gardes tiennent compte de l'écran actuel
fn handle_event(app: &mut App, event: Event, command_tx: &UnboundedSender<SimCommand>) {
    use launchboard::ui::events::{
        is_down_event, is_enter_event, is_escape_event, is_left_event,
        is_next_leaderboard_event, is_previous_leaderboard_event, is_quit_event,
        is_refresh_event, is_right_event, is_tab_event, is_up_event, is_watchlist_event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step confirmation pour éviter les quits accidentels
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // Toute autre touche annule une confirmation en attente
        Event::Key(_) if app.is_awaiting_quit_confirmation() => {
            debug!("Quit cancelled");
            app.cancel_quit();
        }

        // ========================================
        // Popup de détails
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_on_details() => {
            debug!("User closed details");
            app.close_details();
        }
        Event::Key(_) if is_left_event(&event) && app.is_on_details() => app.cursor_left(),
        Event::Key(_) if is_right_event(&event) && app.is_on_details() => app.cursor_right(),

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_up_event(&event) && app.is_on_dashboard() => app.navigate_up(),
        Event::Key(_) if is_down_event(&event) && app.is_on_dashboard() => app.navigate_down(),
        Event::Key(_) if is_tab_event(&event) && app.is_on_dashboard() => {
            app.switch_token_tab();
            debug!(tab = ?app.token_tab, "User switched token tab");
        }
        Event::Key(_) if is_next_leaderboard_event(&event) && app.is_on_dashboard() => {
            app.next_leaderboard();
        }
        Event::Key(_) if is_previous_leaderboard_event(&event) && app.is_on_dashboard() => {
            app.previous_leaderboard();
        }
        Event::Key(_) if is_enter_event(&event) && app.is_on_dashboard() => {
            if let Some(token) = app.selected_token() {
                info!(token = %token.id, ticker = %token.ticker, "User opened details");
            }
            app.open_details();
        }

        // ========================================
        // Partout
        // ========================================
        Event::Key(_) if is_watchlist_event(&event) => app.toggle_selected_watchlist(),
        Event::Key(_) if is_refresh_event(&event) => {
            info!("User requested an immediate tick");
            if command_tx.send(SimCommand::TickNow).is_err() {
                warn!("Simulation worker is not running");
                app.status_message = Some("Simulation stopped".to_string());
            }
        }

        Event::Key(_) | Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de la création du terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
