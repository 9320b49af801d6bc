//! Route Navigation Parameter Definitions
//!
//! Maps every `NavigatorConfig` field, plus the host-level tick rate, geometry
//! and output sentence selection, to parameter store entries for runtime
//! configuration.
//!
//! # Parameters
//!
//! - `AR_MODE` - Steering mode (0 standard XTE, 2 waypoint bearing, 3 route position bearing)
//! - `AR_GEOMETRY` - Geometry backend (0 spherical, 1 Mercator)
//! - `AR_XTE_P` - XTE gain
//! - `AR_XTE_D` - XTE rate gain
//! - `AR_LOOK_MODE` - Lookahead by distance (0) or time (1)
//! - `AR_LOOK_DIST` - Lookahead distance in meters
//! - `AR_LOOK_TIME` - Lookahead time in seconds
//! - `AR_MAX_ANGLE` - Maximum steering deviation from the track in degrees
//! - `AR_INTERCEPT` - Insert intercept points when a route is loaded underway
//! - `AR_CONFIRM` - Require confirmation before advancing to the next waypoint
//! - `AR_RATE_HZ` - Navigation tick rate
//! - `AR_MAGNETIC` - Publish magnetic bearings when a declination is known
//! - `AR_NMEA` - Output sentence selection (`SentenceFlags` bits)

use bitflags::bitflags;

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::geo::GeometryKind;
use crate::navigation::{LookaheadMode, NavMode, NavigatorConfig};

/// Meters per nautical mile
pub const METERS_PER_NM: f32 = 1852.0;

bitflags! {
    /// Output sentences the host should emit each tick
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SentenceFlags: u8 {
        /// Autopilot sentence B (bearing and XTE)
        const APB = 0b0000_0001;
        /// Recommended minimum navigation information
        const RMB = 0b0000_0010;
        /// Recommended minimum GNSS data (carries magnetic variation)
        const RMC = 0b0000_0100;
        /// Cross-track error
        const XTE = 0b0000_1000;
    }
}

impl Default for SentenceFlags {
    fn default() -> Self {
        SentenceFlags::APB
    }
}

// --- Defaults ---

const DEFAULT_MODE: i32 = 3;
const DEFAULT_GEOMETRY: i32 = 1;
const DEFAULT_XTE_P: f32 = 1.0;
const DEFAULT_XTE_D: f32 = 0.0;
const DEFAULT_LOOK_MODE: i32 = 0;
const DEFAULT_LOOK_DIST_M: f32 = 100.0;
const DEFAULT_LOOK_TIME_S: f32 = 100.0;
const DEFAULT_MAX_ANGLE: f32 = 30.0;
const DEFAULT_RATE_HZ: f32 = 1.0;

// --- Ranges ---

const MIN_GAIN: f32 = 0.0;
const MAX_GAIN: f32 = 100.0;

const MIN_LOOK_DIST_M: f32 = 1.0;
const MAX_LOOK_DIST_M: f32 = 1000.0;

const MIN_LOOK_TIME_S: f32 = 10.0;
const MAX_LOOK_TIME_S: f32 = 2000.0;

const MIN_MAX_ANGLE: f32 = 1.0;
const MAX_MAX_ANGLE: f32 = 90.0;

const MIN_RATE_HZ: f32 = 0.2;
const MAX_RATE_HZ: f32 = 10.0;

/// Route navigation parameters loaded from parameter store
#[derive(Debug, Clone, PartialEq)]
pub struct RouteParams {
    /// Raw steering mode value; unknown values fall back to route position bearing
    pub mode: i32,
    /// Raw geometry backend value; unknown values fall back to Mercator
    pub geometry: i32,
    pub xte_p: f32,
    pub xte_d: f32,
    pub look_mode: i32,
    /// Lookahead distance in meters
    pub look_dist_m: f32,
    /// Lookahead time in seconds
    pub look_time_s: f32,
    pub max_angle_deg: f32,
    pub intercept: bool,
    pub confirm: bool,
    pub rate_hz: f32,
    pub magnetic: bool,
    pub sentences: SentenceFlags,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE,
            geometry: DEFAULT_GEOMETRY,
            xte_p: DEFAULT_XTE_P,
            xte_d: DEFAULT_XTE_D,
            look_mode: DEFAULT_LOOK_MODE,
            look_dist_m: DEFAULT_LOOK_DIST_M,
            look_time_s: DEFAULT_LOOK_TIME_S,
            max_angle_deg: DEFAULT_MAX_ANGLE,
            intercept: false,
            confirm: false,
            rate_hz: DEFAULT_RATE_HZ,
            magnetic: false,
            sentences: SentenceFlags::default(),
        }
    }
}

impl RouteParams {
    /// Register route parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        Self::default().register(store)
    }

    /// Register route parameters using these values as the defaults
    ///
    /// Existing entries are left untouched.
    pub fn register(&self, store: &mut ParameterStore) -> Result<(), ParameterError> {
        let none = ParamFlags::empty();
        store.register("AR_MODE", ParamValue::Int(self.mode), none)?;
        store.register("AR_GEOMETRY", ParamValue::Int(self.geometry), none)?;
        store.register("AR_XTE_P", ParamValue::Float(self.xte_p), none)?;
        store.register("AR_XTE_D", ParamValue::Float(self.xte_d), none)?;
        store.register("AR_LOOK_MODE", ParamValue::Int(self.look_mode), none)?;
        store.register("AR_LOOK_DIST", ParamValue::Float(self.look_dist_m), none)?;
        store.register("AR_LOOK_TIME", ParamValue::Float(self.look_time_s), none)?;
        store.register("AR_MAX_ANGLE", ParamValue::Float(self.max_angle_deg), none)?;
        store.register("AR_INTERCEPT", ParamValue::Bool(self.intercept), none)?;
        store.register("AR_CONFIRM", ParamValue::Bool(self.confirm), none)?;
        store.register("AR_RATE_HZ", ParamValue::Float(self.rate_hz), none)?;
        store.register("AR_MAGNETIC", ParamValue::Bool(self.magnetic), none)?;
        store.register(
            "AR_NMEA",
            ParamValue::Int(i32::from(self.sentences.bits())),
            none,
        )?;
        Ok(())
    }

    /// Load route parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            mode: load_int(store, "AR_MODE", DEFAULT_MODE),
            geometry: load_int(store, "AR_GEOMETRY", DEFAULT_GEOMETRY),
            xte_p: load_float(store, "AR_XTE_P", DEFAULT_XTE_P, MIN_GAIN, MAX_GAIN),
            xte_d: load_float(store, "AR_XTE_D", DEFAULT_XTE_D, MIN_GAIN, MAX_GAIN),
            look_mode: load_int(store, "AR_LOOK_MODE", DEFAULT_LOOK_MODE),
            look_dist_m: load_float(
                store,
                "AR_LOOK_DIST",
                DEFAULT_LOOK_DIST_M,
                MIN_LOOK_DIST_M,
                MAX_LOOK_DIST_M,
            ),
            look_time_s: load_float(
                store,
                "AR_LOOK_TIME",
                DEFAULT_LOOK_TIME_S,
                MIN_LOOK_TIME_S,
                MAX_LOOK_TIME_S,
            ),
            max_angle_deg: load_float(
                store,
                "AR_MAX_ANGLE",
                DEFAULT_MAX_ANGLE,
                MIN_MAX_ANGLE,
                MAX_MAX_ANGLE,
            ),
            intercept: load_bool(store, "AR_INTERCEPT", false),
            confirm: load_bool(store, "AR_CONFIRM", false),
            rate_hz: load_float(store, "AR_RATE_HZ", DEFAULT_RATE_HZ, MIN_RATE_HZ, MAX_RATE_HZ),
            magnetic: load_bool(store, "AR_MAGNETIC", false),
            sentences: SentenceFlags::from_bits_truncate(
                load_int(store, "AR_NMEA", i32::from(SentenceFlags::default().bits())) as u8,
            ),
        }
    }

    /// Steering mode, `None` when `mode` names an unknown or retired mode
    pub fn nav_mode(&self) -> Option<NavMode> {
        NavMode::from_param(self.mode)
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::from_param(self.geometry).unwrap_or_default()
    }

    /// Tick period in milliseconds
    pub fn tick_period_ms(&self) -> u64 {
        let hz = self.rate_hz.clamp(MIN_RATE_HZ, MAX_RATE_HZ);
        libm::roundf(1000.0 / hz) as u64
    }

    /// Convert to `NavigatorConfig` for use by `RouteNavigator`
    pub fn to_config(&self) -> NavigatorConfig {
        NavigatorConfig {
            mode: NavMode::from_param_or_default(self.mode),
            xte_multiplier: f64::from(self.xte_p),
            xte_rate_multiplier: f64::from(self.xte_d),
            lookahead_mode: LookaheadMode::from_param(self.look_mode).unwrap_or_default(),
            lookahead_distance_nm: f64::from(self.look_dist_m / METERS_PER_NM),
            lookahead_time_s: f64::from(self.look_time_s),
            max_angle_deg: f64::from(self.max_angle_deg),
            intercept: self.intercept,
            confirm_advance: self.confirm,
            magnetic: self.magnetic,
        }
    }

    /// Validate route parameters
    pub fn is_valid(&self) -> bool {
        let in_range = |v: f32, min: f32, max: f32| v >= min && v <= max;

        self.nav_mode().is_some()
            && GeometryKind::from_param(self.geometry).is_some()
            && LookaheadMode::from_param(self.look_mode).is_some()
            && in_range(self.xte_p, MIN_GAIN, MAX_GAIN)
            && in_range(self.xte_d, MIN_GAIN, MAX_GAIN)
            && in_range(self.look_dist_m, MIN_LOOK_DIST_M, MAX_LOOK_DIST_M)
            && in_range(self.look_time_s, MIN_LOOK_TIME_S, MAX_LOOK_TIME_S)
            && in_range(self.max_angle_deg, MIN_MAX_ANGLE, MAX_MAX_ANGLE)
            && in_range(self.rate_hz, MIN_RATE_HZ, MAX_RATE_HZ)
    }
}

/// Load a float parameter from store with clamping
fn load_float(store: &ParameterStore, name: &str, default: f32, min: f32, max: f32) -> f32 {
    match store.get(name).and_then(ParamValue::as_f32) {
        Some(v) if v.is_finite() => v.clamp(min, max),
        _ => default,
    }
}

fn load_int(store: &ParameterStore, name: &str, default: i32) -> i32 {
    store.get(name).and_then(ParamValue::as_i32).unwrap_or(default)
}

fn load_bool(store: &ParameterStore, name: &str, default: bool) -> bool {
    store.get(name).and_then(ParamValue::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_defaults() {
        let params = RouteParams::default();
        assert_eq!(params.nav_mode(), Some(NavMode::RoutePositionBearing));
        assert_eq!(params.geometry_kind(), GeometryKind::Mercator);
        assert!((params.look_dist_m - 100.0).abs() < 0.001);
        assert!((params.look_time_s - 100.0).abs() < 0.001);
        assert!((params.max_angle_deg - 30.0).abs() < 0.001);
        assert_eq!(params.sentences, SentenceFlags::APB);
        assert_eq!(params.tick_period_ms(), 1000);
        assert!(params.is_valid());
    }

    #[test]
    fn test_sentence_names() {
        assert_eq!(SentenceFlags::from_name("RMC"), Some(SentenceFlags::RMC));
        assert_eq!(SentenceFlags::from_name("xte"), None);
        assert_eq!(SentenceFlags::from_name("GGA"), None);
    }

    #[test]
    fn test_register_defaults_populates_all() {
        let mut store = ParameterStore::new();
        RouteParams::register_defaults(&mut store).unwrap();

        for name in [
            "AR_MODE",
            "AR_GEOMETRY",
            "AR_XTE_P",
            "AR_XTE_D",
            "AR_LOOK_MODE",
            "AR_LOOK_DIST",
            "AR_LOOK_TIME",
            "AR_MAX_ANGLE",
            "AR_INTERCEPT",
            "AR_CONFIRM",
            "AR_RATE_HZ",
            "AR_MAGNETIC",
            "AR_NMEA",
        ] {
            assert!(store.get(name).is_some(), "{} not registered", name);
        }
        assert_eq!(store.len(), 13);
    }

    #[test]
    fn test_from_store_round_trips_defaults() {
        let mut store = ParameterStore::new();
        RouteParams::register_defaults(&mut store).unwrap();
        assert_eq!(RouteParams::from_store(&store), RouteParams::default());
    }

    #[test]
    fn test_from_store_reads_custom_values() {
        let mut store = ParameterStore::new();
        RouteParams::register_defaults(&mut store).unwrap();

        store.set("AR_MODE", ParamValue::Int(0)).unwrap();
        store.set("AR_XTE_P", ParamValue::Float(2.5)).unwrap();
        store.set("AR_LOOK_MODE", ParamValue::Int(1)).unwrap();
        store.set("AR_CONFIRM", ParamValue::Bool(true)).unwrap();
        let bits = (SentenceFlags::APB | SentenceFlags::RMB).bits();
        store.set("AR_NMEA", ParamValue::Int(i32::from(bits))).unwrap();

        let params = RouteParams::from_store(&store);
        assert_eq!(params.nav_mode(), Some(NavMode::StandardXte));
        assert!((params.xte_p - 2.5).abs() < 0.001);
        assert!(params.confirm);
        assert!(params.sentences.contains(SentenceFlags::RMB));
        assert!(!params.sentences.contains(SentenceFlags::XTE));

        let config = params.to_config();
        assert_eq!(config.mode, NavMode::StandardXte);
        assert_eq!(config.lookahead_mode, LookaheadMode::Time);
        assert!(config.confirm_advance);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut store = ParameterStore::new();
        RouteParams::register_defaults(&mut store).unwrap();

        store.set("AR_LOOK_DIST", ParamValue::Float(0.1)).unwrap();
        store.set("AR_MAX_ANGLE", ParamValue::Float(120.0)).unwrap();
        store.set("AR_RATE_HZ", ParamValue::Float(100.0)).unwrap();
        let params = RouteParams::from_store(&store);
        assert!((params.look_dist_m - MIN_LOOK_DIST_M).abs() < 0.001);
        assert!((params.max_angle_deg - MAX_MAX_ANGLE).abs() < 0.001);
        assert_eq!(params.tick_period_ms(), 100);

        store.set("AR_LOOK_TIME", ParamValue::Float(f32::NAN)).unwrap();
        let params = RouteParams::from_store(&store);
        assert!((params.look_time_s - DEFAULT_LOOK_TIME_S).abs() < 0.001);
    }

    #[test]
    fn test_retired_mode_falls_back() {
        let params = RouteParams {
            mode: crate::navigation::BOUNDARY_XTE_PARAM,
            ..RouteParams::default()
        };
        assert_eq!(params.nav_mode(), None);
        assert!(!params.is_valid());
        assert_eq!(params.to_config().mode, NavMode::RoutePositionBearing);
    }

    #[test]
    fn test_to_config_converts_lookahead_to_nm() {
        let params = RouteParams {
            look_dist_m: 1852.0 / 2.0,
            geometry: 0,
            ..RouteParams::default()
        };
        let config = params.to_config();
        assert!((config.lookahead_distance_nm - 0.5).abs() < 1e-6);
        assert_eq!(params.geometry_kind(), GeometryKind::Spherical);
    }

    #[test]
    fn test_register_uses_custom_defaults() {
        let custom = RouteParams {
            magnetic: true,
            ..RouteParams::default()
        };
        let mut store = ParameterStore::new();
        custom.register(&mut store).unwrap();
        assert_eq!(store.get("AR_MAGNETIC"), Some(&ParamValue::Bool(true)));
        assert!(RouteParams::from_store(&store).magnetic);
    }
}
