mod autopilot;
mod config;
mod error;

use std::path::Path;
use std::time::Duration;

use blockdash_game::Game;
use blockdash_world::item::ItemType;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use autopilot::{Autopilot, Script};
use config::SimConfig;
use error::SimError;

const DEFAULT_CONFIG_PATH: &str = "blockdash.toml";

/// Seconds between progress log lines.
const PROGRESS_INTERVAL_SECS: u64 = 5;

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());

    let config = match SimConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "BlockDash simulation v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(config).await {
        error!("Simulation failed: {e}");
        std::process::exit(1);
    }
}

async fn run(config: SimConfig) -> Result<(), SimError> {
    let script: Script = config.simulation.script.parse()?;
    info!(
        "World seed: {}, script: {}, tick rate: {}/s, ticks: {}",
        config.world.seed,
        script,
        config.simulation.tick_rate,
        if config.simulation.ticks == 0 {
            "unbounded".to_string()
        } else {
            config.simulation.ticks.to_string()
        }
    );

    let mut game = Game::new(config.seed());
    let stats = game.generation_stats();
    info!(
        "Terrain: {} blocks ({} strata, {} underground, {} trees, {} flora, {} mountain; \
         removed {} by caves, {} by lakes, {} at spawn)",
        stats.total,
        stats.strata,
        stats.underground,
        stats.trees,
        stats.flora,
        stats.mountain,
        stats.large_cave_removed,
        stats.lake_removed,
        stats.spawn_cleared
    );

    let mut pilot = Autopilot::new(script);
    let tick_rate = u64::from(config.simulation.tick_rate);
    let progress_every = tick_rate * PROGRESS_INTERVAL_SECS;
    let mut picked_up: u64 = 0;
    let mut expired: u64 = 0;

    let mut tick_interval =
        tokio::time::interval(Duration::from_secs_f64(1.0 / tick_rate as f64));
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                pilot.drive(&mut game);
                let report = game.tick();
                picked_up += report.picked_up.iter().map(|s| u64::from(s.count)).sum::<u64>();
                expired += report.expired as u64;

                let tick = game.current_tick();
                if tick % progress_every == 0 {
                    let (x, y) = game.player().position();
                    debug!(
                        tick,
                        x,
                        y,
                        drops = game.drops().len(),
                        "progress"
                    );
                }
                if config.simulation.ticks > 0 && tick >= config.simulation.ticks {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    log_summary(&game, &pilot, picked_up, expired);

    if config.snapshot.enabled {
        write_snapshot(&game, Path::new(&config.snapshot.path))?;
        info!("Snapshot written to {}", config.snapshot.path);
    }
    Ok(())
}

fn log_summary(game: &Game, pilot: &Autopilot, picked_up: u64, expired: u64) {
    let player = game.player();
    let (x, y) = player.position();
    let counts = pilot.counts();
    let inventory = player.inventory();

    info!("Ran {} ticks of the {} script", game.current_tick(), pilot.script());
    info!(
        "Player at ({x:.1}, {y:.1}), grounded: {}, dashing: {}",
        player.is_grounded(),
        player.is_dashing()
    );
    info!(
        "Actions: {} jumps, {} dashes, {} placed, {} destroyed",
        counts.jumps, counts.dashes, counts.placed, counts.destroyed
    );
    info!(
        "Drops: {} live, {} items picked up, {} expired",
        game.drops().len(),
        picked_up,
        expired
    );
    info!(
        "Inventory: stone {}, dirt {}, wood {}, leaves {}",
        inventory.count_of(ItemType::Stone),
        inventory.count_of(ItemType::Dirt),
        inventory.count_of(ItemType::Wood),
        inventory.count_of(ItemType::Leaves)
    );
    info!("World: {} blocks", game.world().len());
}

fn write_snapshot(game: &Game, path: &Path) -> Result<(), SimError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&game.snapshot())?;
    std::fs::write(path, json)?;
    Ok(())
}
