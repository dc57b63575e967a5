use std::path::PathBuf;

use tracing::{error, info};

use runt_app::demo::BounceDemo;
use runt_app::error::AppError;
use runt_app::headless::{parse_frame_budget, HeadlessBackend};
use runt_core::config::EngineConfig;
use runt_sim::{Engine, SystemClock};

/// Boxes spawned by the demo.
const BOX_COUNT: usize = 8;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Config from the first argument, or defaults.
fn load_config() -> Result<EngineConfig, AppError> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = EngineConfig::load(&path)?;
            info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run() -> Result<(), AppError> {
    let config = load_config()?;
    let budget = parse_frame_budget(std::env::var("RUNT_FRAMES").ok().as_deref())?;
    info!(title = %config.title, fps = config.fps, ?budget, "starting");

    let game = BounceDemo::new(&config, BOX_COUNT);
    let backend = HeadlessBackend::new(budget);
    let mut engine = Engine::new(&config, game, backend, SystemClock::new())?;
    engine.run();

    let game = engine.game();
    info!(
        frames = engine.frames(),
        bounces = game.bounces(),
        sparks_built = game.sparks_built(),
        sparks_reused = game.sparks_reused(),
        draws = engine.backend().total_draws(),
        measured_fps = engine.frame_rate(),
        "demo finished"
    );
    if let Some(summary) = engine.stats().summary() {
        info!(
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            std_dev = summary.std_dev,
            "frame delta summary"
        );
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    init_tracing();
    if let Err(e) = run() {
        error!(error = %e, "demo failed");
        return Err(e);
    }
    Ok(())
}
