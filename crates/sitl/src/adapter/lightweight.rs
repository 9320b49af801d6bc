//! Lightweight vessel simulator adapter.
//!
//! Built-in kinematic vessel with no external dependencies, suitable for CI
//! testing and closed-loop runs of the navigation session. The vessel keeps
//! a constant speed through the water, its heading slews toward the helm
//! command at a bounded turn rate, and an optional current sets it off its
//! heading. GPS fixes carry seeded Gaussian position noise.
//!
//! Positions are integrated on a flat earth around the current latitude,
//! with one nautical mile per arc minute of latitude.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::adapter::SimulatorAdapter;
use crate::error::SimulatorError;
use crate::types::{GpsFix, GpsFixType, HelmCommand, VesselId};

const METERS_PER_NM: f64 = 1852.0;

/// Configuration for the lightweight vessel simulator.
#[derive(Debug, Clone)]
pub struct LightweightVesselConfig {
    /// Speed through the water in knots.
    pub speed_kn: f64,
    /// Maximum turn rate in degrees per second.
    pub max_turn_rate_dps: f64,
    /// Helm correction per nautical mile of cross-track error, in degrees.
    pub xte_gain_deg_per_nm: f64,
    /// Largest helm correction for cross-track error, in degrees.
    pub max_xte_correction_deg: f64,
    /// Direction the current flows toward, in degrees true.
    pub current_set_deg: f64,
    /// Current speed in knots.
    pub current_drift_kn: f64,
    /// GPS position noise standard deviation in meters.
    pub gps_noise_m: f64,
    /// GPS update rate in Hz.
    pub gps_rate_hz: u32,
    /// Satellites reported in each fix.
    pub satellites: u8,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
    /// Simulation step size in microseconds.
    pub step_size_us: u64,
    /// Start latitude (degrees).
    pub start_lat_deg: f64,
    /// Start longitude (degrees).
    pub start_lon_deg: f64,
    /// Start heading (degrees true).
    pub start_heading_deg: f64,
}

impl Default for LightweightVesselConfig {
    fn default() -> Self {
        Self {
            speed_kn: 6.0,
            max_turn_rate_dps: 6.0,
            xte_gain_deg_per_nm: 60.0,
            max_xte_correction_deg: 30.0,
            current_set_deg: 0.0,
            current_drift_kn: 0.0,
            gps_noise_m: 2.0,
            gps_rate_hz: 1,
            satellites: 12,
            seed: None,
            step_size_us: 100_000, // 10 Hz
            start_lat_deg: 0.0,
            start_lon_deg: 0.0,
            start_heading_deg: 0.0,
        }
    }
}

/// Internal vessel state for kinematics integration.
#[derive(Debug, Clone)]
struct VesselState {
    lat_deg: f64,
    lon_deg: f64,
    /// Heading in degrees true (0 = north, clockwise).
    heading_deg: f64,
    /// Heading the helm is steering toward; `None` holds the current heading.
    helm_deg: Option<f64>,
}

impl VesselState {
    fn new(config: &LightweightVesselConfig) -> Self {
        Self {
            lat_deg: config.start_lat_deg,
            lon_deg: config.start_lon_deg,
            heading_deg: wrap_360(config.start_heading_deg),
            helm_deg: None,
        }
    }
}

/// Lightweight simulator adapter with built-in vessel kinematics.
pub struct LightweightVesselAdapter {
    config: LightweightVesselConfig,
    name: String,
    vessel_id: VesselId,
    state: VesselState,
    rng: StdRng,
    sim_time_us: u64,
    connected: bool,
    step_count: u64,
}

impl LightweightVesselAdapter {
    /// Create a new lightweight adapter with the given configuration.
    pub fn new(name: &str, vessel_id: VesselId, config: LightweightVesselConfig) -> Self {
        let rng = new_rng(config.seed);
        let state = VesselState::new(&config);
        Self {
            config,
            name: name.to_string(),
            vessel_id,
            state,
            rng,
            sim_time_us: 0,
            connected: false,
            step_count: 0,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(vessel_id: VesselId) -> Self {
        Self::new("lightweight", vessel_id, LightweightVesselConfig::default())
    }

    pub fn config(&self) -> &LightweightVesselConfig {
        &self.config
    }

    /// Integrate vessel kinematics for one time step.
    fn integrate(&mut self, dt_s: f64) {
        if let Some(target) = self.state.helm_deg {
            let error = heading_error(target, self.state.heading_deg);
            let max_turn = self.config.max_turn_rate_dps * dt_s;
            self.state.heading_deg =
                wrap_360(self.state.heading_deg + error.clamp(-max_turn, max_turn));
        }

        let (north, east) = self.ground_velocity();
        let hours = dt_s / 3600.0;
        let cos_lat = self.state.lat_deg.to_radians().cos().max(1e-6);
        self.state.lat_deg += north * hours / 60.0;
        self.state.lon_deg += east * hours / (60.0 * cos_lat);
    }

    /// Ground velocity north and east in knots: water speed plus current.
    fn ground_velocity(&self) -> (f64, f64) {
        let heading = self.state.heading_deg.to_radians();
        let set = self.config.current_set_deg.to_radians();
        (
            self.config.speed_kn * heading.cos() + self.config.current_drift_kn * set.cos(),
            self.config.speed_kn * heading.sin() + self.config.current_drift_kn * set.sin(),
        )
    }

    /// Synthesize a GPS fix from the current state (rate-limited).
    fn synthesize_fix(&mut self) -> Option<GpsFix> {
        if self.config.gps_rate_hz == 0 || self.config.step_size_us == 0 {
            return None;
        }

        let steps_per_fix = 1_000_000 / (self.config.step_size_us * self.config.gps_rate_hz as u64);
        let steps_per_fix = steps_per_fix.max(1);

        if !self.step_count.is_multiple_of(steps_per_fix) {
            return None;
        }

        let noise_north_nm = self.gaussian_noise(self.config.gps_noise_m) / METERS_PER_NM;
        let noise_east_nm = self.gaussian_noise(self.config.gps_noise_m) / METERS_PER_NM;
        let cos_lat = self.state.lat_deg.to_radians().cos().max(1e-6);

        let (north, east) = self.ground_velocity();
        Some(GpsFix {
            timestamp_us: self.sim_time_us,
            vessel_id: self.vessel_id,
            lat_deg: self.state.lat_deg + noise_north_nm / 60.0,
            lon_deg: self.state.lon_deg + noise_east_nm / (60.0 * cos_lat),
            sog_kn: north.hypot(east),
            cog_deg: wrap_360(east.atan2(north).to_degrees()),
            fix_type: GpsFixType::Fix3D,
            satellites: self.config.satellites,
        })
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f64 = self.rng.gen::<f64>().max(f64::EPSILON);
        let u2: f64 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z * stddev
    }

    /// True position as (lat, lon) in degrees, without GPS noise.
    pub fn position(&self) -> (f64, f64) {
        (self.state.lat_deg, self.state.lon_deg)
    }

    /// Current heading in degrees true.
    pub fn heading(&self) -> f64 {
        self.state.heading_deg
    }

    /// Heading the helm is steering toward.
    pub fn helm_heading(&self) -> Option<f64> {
        self.state.helm_deg
    }
}

impl std::fmt::Debug for LightweightVesselAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightweightVesselAdapter")
            .field("name", &self.name)
            .field("vessel_id", &self.vessel_id)
            .field("connected", &self.connected)
            .field("sim_time_us", &self.sim_time_us)
            .finish()
    }
}

#[async_trait]
impl SimulatorAdapter for LightweightVesselAdapter {
    fn adapter_type(&self) -> &'static str {
        "lightweight"
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&mut self) -> Result<(), SimulatorError> {
        if self.config.step_size_us == 0 {
            return Err(SimulatorError::InvalidConfig("step size must be non-zero"));
        }
        // Reset state on connect
        self.state = VesselState::new(&self.config);
        self.sim_time_us = 0;
        self.step_count = 0;
        self.rng = new_rng(self.config.seed);
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
        if !self.connected {
            return Err(SimulatorError::NotConnected(self.vessel_id));
        }
        Ok(self.synthesize_fix())
    }

    async fn send_helm(&mut self, command: &HelmCommand) -> Result<(), SimulatorError> {
        if !self.connected {
            return Err(SimulatorError::NotConnected(self.vessel_id));
        }
        if !command.bearing_deg.is_finite() {
            return Ok(());
        }
        let xte = if command.xte_nm.is_finite() { command.xte_nm } else { 0.0 };
        let limit = self.config.max_xte_correction_deg;
        let correction = (xte * self.config.xte_gain_deg_per_nm).clamp(-limit, limit);
        self.state.helm_deg = Some(wrap_360(command.bearing_deg + correction));
        Ok(())
    }

    async fn step(&mut self) -> Result<(), SimulatorError> {
        if !self.connected {
            return Err(SimulatorError::NotConnected(self.vessel_id));
        }
        let dt = self.config.step_size_us as f64 / 1_000_000.0;
        self.integrate(dt);
        self.sim_time_us += self.config.step_size_us;
        self.step_count += 1;
        Ok(())
    }

    fn sim_time_us(&self) -> u64 {
        self.sim_time_us
    }

    fn step_size_us(&self) -> u64 {
        self.config.step_size_us
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Wrap an angle in degrees to [0, 360).
fn wrap_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest turn from `from` to `to`, in (-180, 180].
fn heading_error(to: f64, from: f64) -> f64 {
    let e = (to - from).rem_euclid(360.0);
    if e > 180.0 {
        e - 360.0
    } else {
        e
    }
}
