use clap::Parser;
use csv::Writer;
use gravwell::config::ScenarioConfig;
use gravwell::simulation::{InputIntent, Simulation, SimulationEvent, TurnDirection};
use hifitime::Epoch;
use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Headless scenario runner. Flies a scripted craft and writes CSV telemetry.
#[derive(Parser, Debug)]
#[command(name = "gravwell", about = "Gravity well flight simulation")]
struct Args {
    /// RON scenario file. Built-in defaults when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of fixed ticks to run.
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Fixed step in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Fire thrusters every N ticks (0 = never).
    #[arg(long, default_value_t = 20)]
    thrust_every: u64,

    /// Turn right every N ticks (0 = never).
    #[arg(long, default_value_t = 0)]
    turn_every: u64,

    /// Write a telemetry row every N ticks; events always get a row.
    #[arg(long, default_value_t = 60)]
    sample_every: u64,

    /// Terrain refresh interval override in ticks (0 = never).
    #[arg(long)]
    terrain_every: Option<u32>,

    /// Planet generation seed override.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "output/telemetry.csv")]
    output: PathBuf,

    /// Log filter (error, warn, info, debug, trace). RUST_LOG wins when set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.scenario {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(interval) = args.terrain_every {
        config.terrain.refresh_interval = interval;
    }

    let mut sim = Simulation::from_config(config)?;
    for (idx, source) in sim.field().sources().iter().enumerate() {
        info!(
            idx,
            kind = %source.kind,
            mass = source.mass(),
            radius = source.radius(),
            surface_gravity = source.surface_gravity(sim.field().gravitational_constant()),
            "gravity source"
        );
    }
    sim.resume();

    let start_time = Epoch::from_gregorian_utc(2024, 3, 15, 0, 0, 0, 0);

    if let Some(dir) = args.output.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let file = File::create(&args.output)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "UTC Time",
        "Tick",
        "Time (s)",
        "Position X",
        "Position Y",
        "Position Z",
        "Velocity X",
        "Velocity Y",
        "Velocity Z",
        "GeForce X",
        "GeForce Y",
        "GeForce Z",
        "Heading (rad)",
        "Alive",
        "Run State",
        "Specific Energy",
        "Angular Momentum Y",
        "Event",
    ])?;

    let mut deaths = 0;
    for i in 0..args.ticks {
        let thrust = args.thrust_every > 0 && i % args.thrust_every == 0;
        let turn = if args.turn_every > 0 && i % args.turn_every == 0 {
            TurnDirection::Right
        } else {
            TurnDirection::None
        };
        let intent = InputIntent::idle().with_thrust(thrust).with_turn(turn);

        let events = sim.step(args.dt, &intent);
        deaths += events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::CraftDestroyed { .. }))
            .count();

        if i % args.sample_every.max(1) != 0 && events.is_empty() {
            continue;
        }

        let telemetry = sim.telemetry();
        let epoch = start_time + telemetry.elapsed;
        let angular_momentum_y = sim.angular_momentum().map(|h| h.y).unwrap_or(0.0);
        let event = events
            .iter()
            .map(|e| match e {
                SimulationEvent::CraftDestroyed { kind, .. } => format!("destroyed by {}", kind),
                SimulationEvent::CraftRespawned { .. } => "respawned".to_string(),
                SimulationEvent::RunStateChanged(state) => format!("{}", state),
            })
            .collect::<Vec<_>>()
            .join("; ");

        writer.write_record(&[
            epoch.to_string(),
            telemetry.tick.to_string(),
            telemetry.elapsed.to_seconds().to_string(),
            telemetry.position.x.to_string(),
            telemetry.position.y.to_string(),
            telemetry.position.z.to_string(),
            telemetry.velocity.x.to_string(),
            telemetry.velocity.y.to_string(),
            telemetry.velocity.z.to_string(),
            telemetry.ge_force.x.to_string(),
            telemetry.ge_force.y.to_string(),
            telemetry.ge_force.z.to_string(),
            telemetry.heading.to_string(),
            telemetry.is_alive.to_string(),
            telemetry.run_state.to_string(),
            telemetry.specific_energy.to_string(),
            angular_momentum_y.to_string(),
            event,
        ])?;
    }

    writer.flush()?;
    info!(
        ticks = args.ticks,
        deaths,
        output = %args.output.display(),
        "telemetry written"
    );

    Ok(())
}
