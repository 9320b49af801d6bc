//! Waypoint advancement
//!
//! State machine that tracks which route waypoint is current and advances it
//! when the vessel arrives at it or passes its approach line. Several
//! waypoints can be skipped in one update when the vessel is already far
//! along the route; the loop is bounded by the route length.
//!
//! The tracker knows nothing about steering modes, output formatting or the
//! host; it reports what happened through [`NavEvent`]s.

use super::types::{NavEvent, NavEvents};
use crate::geo::great_circle::{distance_bearing, heading_resolve};
use crate::geo::GeoPoint;
use crate::route::Route;

/// Distance (nm) below which the vessel counts as sitting on the waypoint
pub const ARRIVAL_EPSILON_NM: f64 = 1e-9;

/// Deviation (degrees) between arrival bearing and bearing-to-waypoint that
/// means the waypoint has been passed
pub const PASSED_ANGLE_DEG: f64 = 90.0;

/// Tracker state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackerState {
    /// No current waypoint; the nearest one is picked on the next update
    #[default]
    Unset,
    /// Steering for the waypoint at this index
    Tracking(usize),
    /// Advanced past the final waypoint
    Ended,
}

/// Operator confirmation gate for advances
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Confirmation {
    /// Advances must be confirmed
    pub required: bool,
    /// The operator confirmed the pending advance
    pub granted: bool,
}

/// Result of one tracker update
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerUpdate {
    /// State after the update
    pub state: TrackerState,
    /// Distance to the current waypoint in nautical miles
    pub distance_nm: f64,
    /// Great-circle bearing to the current waypoint
    pub bearing_deg: f64,
    /// Vessel is inside the current waypoint's arrival circle
    pub arrival: bool,
    /// The confirmation was used up by an advance
    pub confirmation_used: bool,
    /// Events raised during the update
    pub events: NavEvents,
}

/// Waypoint tracker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaypointTracker {
    state: TrackerState,
    /// Index of the waypoint the vessel is coming from
    origin: Option<usize>,
    /// Index whose arrival circle was last reported, to report each entry once
    arrival_reported: Option<usize>,
}

impl WaypointTracker {
    pub const fn new() -> Self {
        Self {
            state: TrackerState::Unset,
            origin: None,
            arrival_reported: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Index of the current waypoint, if tracking
    pub fn current(&self) -> Option<usize> {
        match self.state {
            TrackerState::Tracking(i) => Some(i),
            _ => None,
        }
    }

    /// Index of the previous waypoint, if any
    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the current waypoint for a new vessel position
    ///
    /// Events are coalesced: however many waypoints one update skips, only
    /// the latest arrival circle and the waypoint that ends up current are
    /// reported.
    pub fn update(&mut self, route: &Route, vessel: &GeoPoint, confirmation: Confirmation) -> TrackerUpdate {
        let mut granted = confirmation.granted;
        let mut activated = None;
        let mut entered = None;
        let mut awaiting = None;

        if let TrackerState::Tracking(i) = self.state {
            if i >= route.len() {
                // index from a longer route
                self.reset();
            }
        }
        if self.state == TrackerState::Unset {
            if let Some(nearest) = nearest_waypoint(route, vessel) {
                self.state = TrackerState::Tracking(nearest);
                self.origin = None;
                activated = Some(nearest);
            }
        }

        let mut distance_nm = 0.0;
        let mut bearing_deg = 0.0;
        let mut arrival = false;

        for _ in 0..=route.len() {
            let TrackerState::Tracking(i) = self.state else {
                break;
            };
            let Some(wp) = route.get(i) else {
                break;
            };

            let (dist, brg) = distance_bearing(vessel, &wp.point);
            distance_nm = dist;
            bearing_deg = brg;
            arrival = dist < wp.arrival_radius_nm || dist <= ARRIVAL_EPSILON_NM;
            let passed = heading_resolve(wp.arrival_bearing_deg - brg).abs() > PASSED_ANGLE_DEG;

            if arrival && self.arrival_reported != Some(i) {
                self.arrival_reported = Some(i);
                entered = Some(i);
            }
            if !(arrival || passed) {
                break;
            }
            if confirmation.required && !granted {
                awaiting = Some(i);
                break;
            }
            granted = false;

            self.origin = Some(i);
            if i + 1 >= route.len() {
                self.state = TrackerState::Ended;
                activated = None;
                break;
            }
            self.state = TrackerState::Tracking(i + 1);
            activated = Some(i + 1);
        }

        // at most one event of each kind, within MAX_NAV_EVENTS
        let events = [
            entered.map(NavEvent::ArrivalCircleEntered),
            awaiting.map(NavEvent::AwaitingConfirmation),
            activated.map(NavEvent::WaypointActivated),
            (self.state == TrackerState::Ended).then_some(NavEvent::RouteEnded),
        ]
        .into_iter()
        .flatten()
        .collect();

        TrackerUpdate {
            state: self.state,
            distance_nm,
            bearing_deg,
            arrival,
            confirmation_used: confirmation.granted && !granted,
            events,
        }
    }
}

/// Index of the waypoint nearest the vessel (great-circle distance)
fn nearest_waypoint(route: &Route, vessel: &GeoPoint) -> Option<usize> {
    route
        .waypoints()
        .iter()
        .enumerate()
        .map(|(i, wp)| (i, distance_bearing(vessel, &wp.point).0))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
