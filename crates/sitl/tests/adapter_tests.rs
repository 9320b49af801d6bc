use std::sync::Arc;

use async_trait::async_trait;
use route_pilot::{CollectingSink, PilotConfig, PilotSession, SharedClock};
use route_pilot_core::route::WaypointSpec;
use route_pilot_sitl::{
    ClosedLoop, GpsFix, GpsFixType, HelmCommand, SimulatorAdapter, SimulatorError, VesselId,
};

const STEP_US: u64 = 100_000;

/// Adapter that reports a fixed GPS fix and records helm commands.
struct ReplayAdapter {
    name: String,
    connected: bool,
    fix: Option<GpsFix>,
    helm: Vec<HelmCommand>,
    sim_time_us: u64,
}

impl ReplayAdapter {
    fn new(name: &str, fix: Option<GpsFix>) -> Self {
        Self {
            name: name.to_string(),
            connected: false,
            fix,
            helm: Vec::new(),
            sim_time_us: 0,
        }
    }
}

#[async_trait]
impl SimulatorAdapter for ReplayAdapter {
    fn adapter_type(&self) -> &'static str {
        "replay"
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&mut self) -> Result<(), SimulatorError> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), SimulatorError> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn receive_fix(&mut self) -> Result<Option<GpsFix>, SimulatorError> {
        Ok(self.fix.clone())
    }

    async fn send_helm(&mut self, command: &HelmCommand) -> Result<(), SimulatorError> {
        self.helm.push(*command);
        Ok(())
    }

    async fn step(&mut self) -> Result<(), SimulatorError> {
        self.sim_time_us += STEP_US;
        Ok(())
    }

    fn sim_time_us(&self) -> u64 {
        self.sim_time_us
    }

    fn step_size_us(&self) -> u64 {
        STEP_US
    }
}

fn fix(lat_deg: f64, lon_deg: f64, fix_type: GpsFixType) -> GpsFix {
    GpsFix {
        timestamp_us: 0,
        vessel_id: VesselId(1),
        lat_deg,
        lon_deg,
        sog_kn: 5.0,
        cog_deg: 90.0,
        fix_type,
        satellites: 10,
    }
}

fn east_route() -> [WaypointSpec<'static>; 2] {
    [
        WaypointSpec { lat: 0.0, lon: 0.0, name: "A", id: "a", arrival_radius_nm: 0.05 },
        WaypointSpec { lat: 0.0, lon: 1.0, name: "B", id: "b", arrival_radius_nm: 0.05 },
    ]
}

fn session() -> Arc<PilotSession<Arc<CollectingSink>, SharedClock>> {
    Arc::new(
        PilotSession::with_clock(
            &PilotConfig::default(),
            Arc::new(CollectingSink::new()),
            SharedClock::new(),
        )
        .unwrap(),
    )
}

#[test]
fn trait_is_object_safe() {
    // This test verifies that SimulatorAdapter can be used as a trait object.
    let adapter: Box<dyn SimulatorAdapter> = Box::new(ReplayAdapter::new("test", None));
    assert_eq!(adapter.adapter_type(), "replay");
    assert_eq!(adapter.name(), "test");
    assert!(!adapter.is_connected());
}

#[test]
fn vessel_id_derives() {
    let a = VesselId(1);
    let b = VesselId(1);
    let c = VesselId(2);

    assert_eq!(a, b);
    assert_ne!(a, c);

    let display_str = format!("{}", a);
    assert!(display_str.contains("1"));

    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(a);
    set.insert(b);
    assert_eq!(set.len(), 1);
    set.insert(c);
    assert_eq!(set.len(), 2);
}

#[tokio::test]
async fn closed_loop_ticks_at_session_rate() {
    let session = session();
    session.load_route("r", &east_route()).unwrap();
    let adapter = ReplayAdapter::new("replay", Some(fix(0.0, 0.5, GpsFixType::Fix3D)));
    let mut sim = ClosedLoop::new(adapter, session.clone(), VesselId(1));
    sim.connect().await.unwrap();

    // 2.5 s at 10 Hz, 1 Hz session ticks
    for _ in 0..25 {
        sim.step().await.unwrap();
    }
    assert_eq!(sim.ticks(), 3);
    assert_eq!(sim.session_time_ms(), 2500);

    let helm = &sim.adapter().helm;
    assert_eq!(helm.len(), 3);
    assert!(helm.iter().all(|c| (c.bearing_deg - 90.0).abs() < 1.0));
    assert_eq!(helm[1].timestamp_us, 1_100_000);
    assert_eq!(session.sink().outputs().len(), 3);
}

#[tokio::test]
async fn closed_loop_skips_no_fix() {
    let session = session();
    session.load_route("r", &east_route()).unwrap();
    let adapter = ReplayAdapter::new("replay", Some(fix(0.0, 0.5, GpsFixType::NoFix)));
    let mut sim = ClosedLoop::new(adapter, session.clone(), VesselId(1));
    sim.connect().await.unwrap();

    for _ in 0..20 {
        assert!(sim.step().await.unwrap().is_none());
    }
    assert!(sim.adapter().helm.is_empty());
}

#[tokio::test]
async fn closed_loop_without_route_sends_nothing() {
    let session = session();
    let adapter = ReplayAdapter::new("replay", Some(fix(0.0, 0.5, GpsFixType::Fix3D)));
    let mut sim = ClosedLoop::new(adapter, session.clone(), VesselId(1));
    sim.connect().await.unwrap();

    for _ in 0..20 {
        sim.step().await.unwrap();
    }
    assert!(sim.ticks() > 0);
    assert!(sim.adapter().helm.is_empty());
    assert!(session.average_sog() > 0.0, "fixes still reach the session");
}
