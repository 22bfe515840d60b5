use clap::Parser;
use shoal::engine::{DEMO_COUNT, DEMO_DT, Engine, PRESET_SCHOOL};
use shoal::{FlockError, FlockParams};
use std::path::PathBuf;
use tracing::info;

/// Run a flock headless and log how it spreads out.
#[derive(Parser, Debug)]
#[command(name = "shoal")]
#[command(about = "Headless fish flocking runner")]
struct Args {
    /// Built-in flock personality
    #[arg(long, default_value = PRESET_SCHOOL)]
    preset: String,

    /// TOML file with flock params; overrides --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fish to spawn before the first tick
    #[arg(long, default_value_t = DEMO_COUNT)]
    agents: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Frame time handed to every tick, in seconds
    #[arg(long, default_value_t = DEMO_DT)]
    dt: f64,

    /// Random seed for spawn positions
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Log flock statistics every N ticks
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn main() -> Result<(), FlockError> {
    init_tracing();
    let args = Args::parse();

    let mut engine = match &args.config {
        Some(path) => Engine::with_params(FlockParams::load(path)?, args.seed)?,
        None => Engine::new_preset(&args.preset, args.seed)?,
    };
    engine.spawn_random(args.agents)?;
    info!(
        preset = engine.preset_id().unwrap_or("custom"),
        agents = args.agents,
        ticks = args.ticks,
        seed = args.seed,
        "starting flock"
    );

    for _ in 0..args.ticks {
        let summary = engine.tick(args.dt);
        if summary.held > 0 {
            tracing::warn!(tick = summary.tick, held = summary.held, "agents held in place");
        }
        if args.report_every > 0 && summary.tick % args.report_every == 0 {
            report(&engine, summary.tick);
        }
    }

    report(&engine, engine.flock().tick_count());
    Ok(())
}

fn report(engine: &Engine, tick: u64) {
    let agents = engine.flock().agents();
    if agents.is_empty() {
        info!(tick, "flock is empty");
        return;
    }
    let n = agents.len() as f64;
    let mut radius = 0.0;
    let mut speed = 0.0;
    let mut max_radius: f64 = 0.0;
    for a in agents {
        let r = a.position().norm();
        radius += r;
        max_radius = max_radius.max(r);
        speed += a.velocity().norm();
    }
    info!(
        tick,
        mean_radius = radius / n,
        max_radius,
        mean_speed = speed / n,
        "flock stats"
    );
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
