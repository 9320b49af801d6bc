//! Closed-loop route following demo.
//!
//! Loads a route into a pilot session the way a chart plotter would, then
//! sails the lightweight simulated vessel along it until the route ends.
//!
//! Usage:
//!   cargo run -p route_pilot_sitl --bin route_sim -- [CONFIG.toml] [OPTIONS]
//!
//! Options:
//!   --seed <N>              RNG seed for GPS noise (default: random)
//!   --current-set <DEG>     Direction the current flows toward (default: 0)
//!   --current-drift <KN>    Current speed in knots (default: 0)
//!   --minutes <N>           Simulation time limit (default: 120)
//!
//! Set `RUST_LOG=route_pilot=debug` to see every tick.

use std::env;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use route_pilot::{LogSink, PilotConfig, PilotSession, SharedClock};
use route_pilot_sitl::{
    ClosedLoop, LightweightVesselAdapter, LightweightVesselConfig, SimulatorError, VesselId,
};
use tracing::info;

const DEMO_ROUTE_GUID: &str = "demo-harbor-loop";

const DEMO_ROUTE: &str = r#"{
    "GUID": "demo-harbor-loop",
    "waypoints": [
        { "lat": 43.650, "lon": -70.250, "Name": "Breakwater", "GUID": "wp-1", "ArrivalRadius": 0.05 },
        { "lat": 43.650, "lon": -70.200, "Name": "Outer Buoy", "GUID": "wp-2", "ArrivalRadius": 0.05 },
        { "lat": 43.680, "lon": -70.200, "Name": "North Ledge", "GUID": "wp-3", "ArrivalRadius": 0.05 },
        { "lat": 43.680, "lon": -70.250, "Name": "Mooring", "GUID": "wp-4", "ArrivalRadius": 0.05 }
    ]
}"#;

struct Args {
    config: Option<String>,
    seed: Option<u64>,
    current_set_deg: f64,
    current_drift_kn: f64,
    minutes: u64,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        seed: None,
        current_set_deg: 0.0,
        current_drift_kn: 0.0,
        minutes: 120,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--seed" => {
                i += 1;
                args.seed = Some(parse_arg(&raw, i, "seed"));
            }
            "--current-set" => {
                i += 1;
                args.current_set_deg = parse_arg(&raw, i, "current-set");
            }
            "--current-drift" => {
                i += 1;
                args.current_drift_kn = parse_arg(&raw, i, "current-drift");
            }
            "--minutes" => {
                i += 1;
                args.minutes = parse_arg(&raw, i, "minutes");
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other if !other.starts_with('-') && args.config.is_none() => {
                args.config = Some(other.to_string());
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn parse_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    raw.get(i)
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires a value");
            process::exit(1);
        })
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Error: invalid value for --{name}");
            process::exit(1);
        })
}

fn print_usage() {
    eprintln!(
        "Usage: route_sim [CONFIG.toml] [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --seed <N>            RNG seed for GPS noise (default: random)\n\
         \x20 --current-set <DEG>   Direction the current flows toward (default: 0)\n\
         \x20 --current-drift <KN>  Current speed in knots (default: 0)\n\
         \x20 --minutes <N>         Simulation time limit (default: 120)\n\
         \x20 -h, --help            Show this help"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SimulatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            PilotConfig::load(Path::new(path))?
        }
        None => PilotConfig::default(),
    };

    let session = Arc::new(PilotSession::with_clock(&config, LogSink, SharedClock::new())?);
    let vessel = LightweightVesselAdapter::new(
        "demo",
        VesselId(1),
        LightweightVesselConfig {
            seed: args.seed,
            current_set_deg: args.current_set_deg,
            current_drift_kn: args.current_drift_kn,
            start_lat_deg: 43.649,
            start_lon_deg: -70.252,
            start_heading_deg: 90.0,
            ..Default::default()
        },
    );

    let mut sim = ClosedLoop::new(vessel, session.clone(), VesselId(1));
    sim.connect().await?;
    sim.feed_fix().await?;

    session.activate_route(DEMO_ROUTE_GUID);
    session.handle_route_response(DEMO_ROUTE)?;

    let finished = sim
        .run_until_ended(Duration::from_secs(args.minutes * 60))
        .await?;
    let (lat, lon) = sim.adapter().position();
    info!(
        "{} after {:.1} min ({} ticks), vessel at {:.5}, {:.5}",
        if finished { "Route completed" } else { "Time limit reached" },
        sim.sim_time().as_secs_f64() / 60.0,
        sim.ticks(),
        lat,
        lon
    );

    sim.disconnect().await?;
    Ok(())
}
