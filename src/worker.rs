// ============================================================================
// Background Worker : timer de simulation
// ============================================================================
// Thread séparé qui fait avancer la simulation à intervalle fixe
//
// CONCEPT RUST : Thread + async runtime
// - std::thread::spawn() : crée un thread OS
// - tokio::runtime : runtime async dans ce thread uniquement
// - tokio::select! : attend le timer OU une commande de l'UI
//
// Communication :
// - UI → worker : SimCommand (tokio mpsc, lu dans select!)
// - worker → UI : SimEvent (std mpsc, lu avec try_recv dans la boucle UI)
// - État : Arc<Mutex<App>>, le tick est appliqué sous le lock
// ============================================================================

use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::app::App;
use crate::engine::TickReport;
use crate::error::EngineError;

/// Commandes envoyées par l'UI au worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    /// Applique un tick immédiatement (touche 'r')
    TickNow,

    /// Arrête la boucle de simulation
    Shutdown,
}

/// Événements renvoyés au thread UI
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Un tick vient d'être appliqué à l'état partagé
    Ticked(TickReport),

    /// La boucle s'est arrêtée
    Stopped,
}

/// Boucle de simulation
///
/// Le premier tick de `tokio::time::interval` est immédiat : on le consomme
/// avant la boucle pour que la première mise à jour arrive après `period`.
/// Un TickNow réarme le timer.
///
/// `max_ticks` borne le nombre de ticks (None = jusqu'au Shutdown).
/// Retourne le nombre de ticks appliqués.
pub async fn run_simulation_loop(
    app: Arc<Mutex<App>>,
    period: Duration,
    mut commands: UnboundedReceiver<SimCommand>,
    results: mpsc::Sender<SimEvent>,
    max_ticks: Option<usize>,
) -> Result<usize> {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    let mut ticks = 0usize;
    info!(?period, "Simulation loop started");

    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            debug!(ticks, "Tick limit reached");
            break;
        }

        tokio::select! {
            _ = interval.tick() => {}
            command = commands.recv() => match command {
                Some(SimCommand::TickNow) => {
                    debug!("Manual tick requested");
                    interval.reset();
                }
                Some(SimCommand::Shutdown) | None => {
                    info!("Simulation loop shutting down");
                    break;
                }
            },
        }

        let report = match apply_tick(&app) {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Cannot apply tick, stopping simulation");
                break;
            }
        };
        ticks += 1;

        if results.send(SimEvent::Ticked(report)).is_err() {
            // L'UI a fermé son receiver : plus personne pour afficher
            info!("UI channel closed, stopping simulation");
            break;
        }
    }

    let _ = results.send(SimEvent::Stopped);
    Ok(ticks)
}

/// Applique un tick sous le lock, en le relâchant avant d'envoyer le bilan
fn apply_tick(app: &Arc<Mutex<App>>) -> Result<TickReport, EngineError> {
    let mut app_lock = app.lock().map_err(|_| EngineError::StatePoisoned)?;
    let report = app_lock.apply_tick();
    debug!(
        tick = app_lock.tick_count,
        updated = report.updated,
        launched = ?report.launched,
        evicted = report.evicted,
        "Tick applied"
    );
    Ok(report)
}

/// Lance le worker de simulation dans son propre thread
///
/// CONCEPT : Runtime per-thread
/// - Le thread UI reste synchrone (crossterm, ratatui)
/// - Le worker a un runtime current_thread pour le timer
pub fn spawn_simulation_worker(
    app: Arc<Mutex<App>>,
    period: Duration,
    commands: UnboundedReceiver<SimCommand>,
    results: mpsc::Sender<SimEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime for simulation worker");
                let _ = results.send(SimEvent::Stopped);
                return;
            }
        };

        match runtime.block_on(run_simulation_loop(app, period, commands, results, None)) {
            Ok(ticks) => info!(ticks, "Simulation worker exiting"),
            Err(e) => error!(error = ?e, "Simulation worker failed"),
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
