use anyhow::Result;
use clap::Parser;
use formicary_lib::model::config::SimConfig;
use formicary_lib::model::entity::EntityKind;
use formicary_lib::model::sim::{Simulation, SpriteSet};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless ant-colony foraging simulation", long_about = None)]
struct Args {
    /// Custom config file path (overrides --mode presets)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Foraging variant to run
    #[arg(short, long, value_enum, default_value = "basic")]
    mode: Variant,

    /// Number of fixed ticks to run
    #[arg(short, long, default_value_t = 3000)]
    ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 33.0)]
    dt_ms: f64,

    /// RNG seed (entropy-seeded when omitted)
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Variant {
    Basic,
    Cooperative,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => match args.mode {
            Variant::Basic => SimConfig::default(),
            Variant::Cooperative => SimConfig::cooperative(),
        },
    };
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let mut sim = Simulation::new(config, SpriteSet::default())?;

    for tick in 1..=args.ticks {
        sim.advance(args.dt_ms);

        if tick % 300 == 0 {
            let world = sim.world();
            let stock: i32 = world
                .entities()
                .filter(|e| e.kind == EntityKind::Leaf)
                .map(|e| e.stock)
                .sum();
            info!(
                tick,
                leaves = world.count(EntityKind::Leaf),
                crumbs = world.count(EntityKind::Crumb),
                carrying = world.entities().filter(|e| e.is_carrying()).count(),
                stock,
                "colony status"
            );
        }

        if sim.world().count(EntityKind::Leaf) == 0
            && sim.entities().all(|e| !e.is_carrying())
        {
            info!(tick, "all leaves delivered");
            break;
        }
    }

    println!("Simulation finished at tick {}.", sim.world().tick);
    Ok(())
}
