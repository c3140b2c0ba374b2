//! Face runner: a facial-gesture controlled endless runner played headlessly.

use anyhow::{Context, Result};
use clap::Parser;
use face_runner::{
    app::{GameApp, GestureScript, SessionOptions, SessionSummary},
    config::{Config, EXAMPLE_CONFIG},
    game::ControlMode,
    score_store::{FileScoreStore, MemoryScoreStore, ScoreStore},
};
use log::{info, warn};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Gesture script to replay (YAML list of timed steps)
    #[arg(short, long)]
    script: Option<String>,

    /// Tap to jump instead of face control
    #[arg(long)]
    touch: bool,

    /// Seed for obstacle spawning (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop an unfinished session after this many milliseconds
    #[arg(long, default_value = "60000")]
    duration_ms: u64,

    /// Game tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Landmark frame period in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// File that keeps the best score between runs
    #[arg(short, long)]
    best_score_file: Option<String>,

    /// Pace the session at wall-clock speed
    #[arg(long)]
    realtime: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{}", EXAMPLE_CONFIG);
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Face Runner");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if args.touch {
        config.control.mode = ControlMode::Touch;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.control.tick_ms = tick_ms;
    }
    if let Some(frame_ms) = args.frame_ms {
        config.control.frame_ms = frame_ms;
    }

    let script = match &args.script {
        Some(path) => {
            info!("Loading gesture script from: {}", path);
            GestureScript::from_file(path).with_context(|| format!("Failed to load script {}", path))?
        }
        None => GestureScript::default(),
    };

    let options = SessionOptions {
        seed: args.seed.unwrap_or_else(rand::random),
        duration: Duration::from_millis(args.duration_ms),
        realtime: args.realtime,
    };

    let summary = match &args.best_score_file {
        Some(path) => play(config, FileScoreStore::open(path)?, &script, &options)?,
        None => play(config, MemoryScoreStore::default(), &script, &options)?,
    };

    match summary.final_score {
        Some(score) if summary.is_new_best => println!("Score: {} (new best!)", score),
        Some(score) => println!("Score: {} (best {})", score, summary.best),
        None => println!("Stopped at score {} (best {})", summary.score, summary.best),
    }
    println!(
        "Jumps: {}, ducks: {}, pauses: {}, obstacles: {}",
        summary.jumps, summary.ducks, summary.pauses, summary.obstacles_spawned
    );

    Ok(())
}

fn play<S: ScoreStore>(
    config: Config,
    store: S,
    script: &GestureScript,
    options: &SessionOptions,
) -> Result<SessionSummary> {
    // Create and run application
    let mut app = GameApp::new(config, store)?;
    Ok(app.run(script, options)?)
}
