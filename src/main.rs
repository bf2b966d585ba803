use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use pulsefire::config::SimConfig;
use pulsefire::game::constants::timing;
use pulsefire::game::game_loop::{GameLoop, GameLoopConfig, GameLoopEvent};
use pulsefire::input::bindings::Bindings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Pulsefire v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = SimConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: points_to_win={}, team_size={}, human_players={}",
        config.points_to_win, config.team_size, config.human_players
    );

    let bindings = Bindings::load(&config.config_dir)?;
    let mut game = GameLoop::new(
        GameLoopConfig {
            points_to_win: config.points_to_win,
            team_size: config.team_size,
            human_players: config.human_players,
            colorblind: config.colorblind,
        },
        bindings,
    );
    game.start_match();

    // Shutdown signal handler
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Shutdown signal received");
    };

    // Run one match to completion with graceful shutdown
    tokio::select! {
        _ = run_match(&mut game) => {}
        _ = shutdown => {
            info!("Shutting down...");
        }
    }

    // Persist bindings for the next run
    if let Err(err) = game.bindings().save(&config.config_dir) {
        warn!("Could not save bindings: {}", err);
    }
    info!("Stopped");

    Ok(())
}

/// Drive the simulation at the base tick rate until the match finishes.
///
/// The fractional step comes from real elapsed time, so a delayed wakeup
/// advances the simulation further instead of slowing it down.
async fn run_match(game: &mut GameLoop) {
    let mut interval = tokio::time::interval(Duration::from_millis(timing::TICK_DURATION_MS));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last = Instant::now();
    loop {
        interval.tick().await;
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32() * timing::TICK_RATE as f32;
        last = now;
        for event in game.step(delta) {
            debug!(?event, "simulation event");
            if let GameLoopEvent::MatchFinished { score } = event {
                let winner = if score > 0 { "Green" } else { "Red" };
                info!("Match over, {} wins with score {}", winner, score);
                return;
            }
        }
    }
}
