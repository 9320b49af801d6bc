//! Navigation engine
//!
//! This module turns a route and a stream of vessel fixes into steering
//! commands:
//! - `advancement`: waypoint tracker for the waypoint-based modes
//! - `engine`: per-tick dispatch over the steering modes
//! - `mode`: steering and lookahead mode selection
//! - `sog_filter`: speed smoothing for time-based lookahead
//! - `magnetic`: true to magnetic bearing correction

pub mod advancement;
pub mod engine;
pub mod magnetic;
pub mod mode;
pub mod sog_filter;
mod types;

pub use advancement::{Confirmation, TrackerState, TrackerUpdate, WaypointTracker};
pub use engine::{signed_xte, NavInput, RouteNavigator};
pub use magnetic::apply_declination;
pub use mode::{LookaheadMode, NavMode, BOUNDARY_XTE_PARAM};
pub use sog_filter::{SogFilter, DEFAULT_SOG_ALPHA, MIN_SATELLITES};
pub use types::{
    NavEvent, NavEvents, NavState, NavTarget, NavigationOutput, NavigatorConfig, TickOutcome,
    VesselFix, MAX_NAV_EVENTS,
};
