//! Navigation type definitions
//!
//! This module contains core types used by the navigation engine:
//! - `VesselFix`: Latest position, course and speed
//! - `NavigatorConfig`: Mode and per-mode tuning
//! - `NavigationOutput`: Steering command published every tick
//! - `NavState`, `NavEvent`, `TickOutcome`: Engine state and per-tick results

use heapless::Vec;

use super::mode::{LookaheadMode, NavMode};
use crate::geo::GeoPoint;
use crate::route::WaypointName;

/// Maximum navigation events reported per tick
pub const MAX_NAV_EVENTS: usize = 4;

/// Bounded per-tick event list
pub type NavEvents = Vec<NavEvent, MAX_NAV_EVENTS>;

/// Vessel position, course and speed
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VesselFix {
    /// Position in degrees
    pub position: GeoPoint,
    /// Course over ground in degrees true
    pub cog_deg: f64,
    /// Speed over ground in knots
    pub sog_kn: f64,
    /// Satellites used in the fix
    pub satellites: u8,
    /// Fix time in milliseconds (host time source)
    pub timestamp_ms: u64,
}

impl VesselFix {
    /// Create a fix with a zero timestamp
    pub fn new(lat: f64, lon: f64, cog_deg: f64, sog_kn: f64, satellites: u8) -> Self {
        Self {
            position: GeoPoint::new(lat, lon),
            cog_deg,
            sog_kn,
            satellites,
            timestamp_ms: 0,
        }
    }

    /// Set the fix timestamp
    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Navigation engine configuration
#[derive(Clone, Debug, PartialEq)]
pub struct NavigatorConfig {
    /// Steering strategy
    pub mode: NavMode,
    /// XTE gain (standard XTE mode)
    pub xte_multiplier: f64,
    /// XTE rate gain (standard XTE mode)
    pub xte_rate_multiplier: f64,
    /// How the lookahead distance is chosen
    pub lookahead_mode: LookaheadMode,
    /// Fixed lookahead distance in nautical miles
    pub lookahead_distance_nm: f64,
    /// Lookahead time in seconds (time mode)
    pub lookahead_time_s: f64,
    /// Maximum deviation of the lookahead bearing from the track (degrees)
    pub max_angle_deg: f64,
    /// Insert intercept points when a route is loaded underway
    pub intercept: bool,
    /// Require operator confirmation before advancing to the next waypoint
    pub confirm_advance: bool,
    /// Publish magnetic bearings when a declination is known
    pub magnetic: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            mode: NavMode::RoutePositionBearing,
            xte_multiplier: 1.0,
            xte_rate_multiplier: 0.0,
            lookahead_mode: LookaheadMode::Distance,
            lookahead_distance_nm: 100.0 / 1852.0,
            lookahead_time_s: 100.0,
            max_angle_deg: 30.0,
            intercept: false,
            confirm_advance: false,
            magnetic: false,
        }
    }
}

/// Steering command and route status published every tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationOutput {
    /// Bearing to steer (degrees true, or magnetic when `magnetic` is set)
    pub bearing_deg: f64,
    /// Signed cross-track error in nautical miles (positive: steer right)
    pub xte_nm: f64,
    /// Vessel is inside the destination's arrival circle
    pub arrival: bool,
    /// Name of the current target
    pub destination_name: WaypointName,
    /// Name of the waypoint the vessel is coming from
    pub origin_name: WaypointName,
    /// Position of the current target
    pub destination: GeoPoint,
    /// Distance to the target in nautical miles
    pub range_nm: f64,
    /// Great-circle bearing from the vessel to the target
    pub bearing_to_destination_deg: f64,
    /// Track bearing from origin to destination
    pub track_bearing_deg: f64,
    /// Speed made good toward the target in knots
    pub closing_velocity_kn: f64,
    /// Bearings were corrected by the declination
    pub magnetic: bool,
}

/// What the engine is currently steering toward
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NavTarget {
    /// No active target
    #[default]
    None,
    /// Route waypoint by index
    Waypoint(usize),
    /// Synthetic lookahead point, with the index of the waypoint ahead of it
    Lookahead { point: GeoPoint, ahead_index: usize },
}

/// Engine state, reset whenever the route is replaced or deactivated
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavState {
    pub target: NavTarget,
    pub last_waypoint_name: WaypointName,
    pub bearing_deg: f64,
    pub xte_nm: f64,
    pub arrival: bool,
}

/// Events raised while navigating
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    /// Waypoint at index became the current target
    WaypointActivated(usize),
    /// Vessel entered the arrival circle of the waypoint at index
    ArrivalCircleEntered(usize),
    /// Advance past the waypoint at index is waiting for operator confirmation
    AwaitingConfirmation(usize),
    /// Vessel passed the final waypoint
    RouteEnded,
}

/// Result of one navigation tick
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// New steering command
    Steer {
        output: NavigationOutput,
        events: NavEvents,
    },
    /// Route too short to steer along; hold the last output
    NoTarget,
    /// Route finished; the caller deactivates it
    Ended { events: NavEvents },
}

impl TickOutcome {
    /// Steering output, if any
    pub fn output(&self) -> Option<&NavigationOutput> {
        match self {
            TickOutcome::Steer { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Events raised during the tick
    pub fn events(&self) -> &[NavEvent] {
        match self {
            TickOutcome::Steer { events, .. } | TickOutcome::Ended { events } => events.as_slice(),
            TickOutcome::NoTarget => &[],
        }
    }

    /// True if the route finished during the tick
    pub fn is_ended(&self) -> bool {
        matches!(self, TickOutcome::Ended { .. })
    }
}
