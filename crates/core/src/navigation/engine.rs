//! Route navigator
//!
//! Per-tick dispatch over the three steering strategies. The navigator owns
//! the waypoint tracker, the XTE history and the pending operator
//! confirmation; the route itself is borrowed for the duration of a tick.
//!
//! Engine state is tagged with the generation of the route it was built
//! against. A tick with a different generation starts over from `Unset`, so
//! no index from a replaced route is ever used.

use libm::{cos, sin};

use super::advancement::{Confirmation, TrackerState, WaypointTracker};
use super::magnetic::apply_declination;
use super::mode::{LookaheadMode, NavMode};
use super::types::{
    NavEvent, NavEvents, NavState, NavTarget, NavigationOutput, NavigatorConfig, TickOutcome,
    VesselFix,
};
use crate::geo::great_circle::{self, distance_bearing};
use crate::geo::{sanitize, GeoPoint, Geometry, GeometryBackend};
use crate::route::{LookaheadSearch, Route, Waypoint, WaypointName};

/// Length of the reference track used to measure cross-track error (nm)
const XTE_REFERENCE_NM: f64 = 1.0;

/// Inputs for one navigation tick
#[derive(Clone, Copy, Debug)]
pub struct NavInput<'a> {
    /// Route snapshot
    pub route: &'a Route,
    /// Generation tag of the route snapshot
    pub generation: u64,
    /// Latest vessel fix
    pub fix: &'a VesselFix,
    /// Low-pass filtered SOG in knots
    pub avg_sog_kn: f64,
    /// Current declination in degrees, if known
    pub declination_deg: Option<f64>,
}

/// Signed cross-track error of `vessel` from the track through `wp` along its
/// arrival bearing
///
/// Positive when the vessel is left of track (steer right), negative when
/// right of track. Degenerate geometry yields 0.
pub fn signed_xte(vessel: &GeoPoint, wp: &Waypoint, geometry: &Geometry) -> f64 {
    let ahead = great_circle::destination(&wp.point, wp.arrival_bearing_deg, XTE_REFERENCE_NM);
    let foot = geometry.closest(vessel, &wp.point, &ahead);
    let magnitude = sanitize(great_circle::distance(vessel, &foot), 0.0);

    let side = sin((great_circle::bearing(&wp.point, vessel) - wp.arrival_bearing_deg).to_radians());
    if side > 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Route-following navigation engine
pub struct RouteNavigator {
    config: NavigatorConfig,
    geometry: Geometry,
    tracker: WaypointTracker,
    state: NavState,
    last_xte: Option<f64>,
    generation: Option<u64>,
    /// Waypoint the tracker is holding until the operator confirms
    awaiting: Option<usize>,
    /// Confirmation accepted for this waypoint
    confirmed: Option<usize>,
}

impl RouteNavigator {
    pub fn new(config: NavigatorConfig, geometry: Geometry) -> Self {
        Self {
            config,
            geometry,
            tracker: WaypointTracker::new(),
            state: NavState::default(),
            last_xte: None,
            generation: None,
            awaiting: None,
            confirmed: None,
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next tick
    ///
    /// A mode change drops the XTE history so the rate term starts fresh.
    pub fn set_config(&mut self, config: NavigatorConfig) {
        if config.mode != self.config.mode {
            self.last_xte = None;
        }
        self.config = config;
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn tracker(&self) -> &WaypointTracker {
        &self.tracker
    }

    /// Generation of the route the state was built against
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// True while an operator confirmation is waiting to be used
    pub fn confirm_pending(&self) -> bool {
        self.confirmed.is_some()
    }

    /// Waypoint held at its arrival until the advance is confirmed
    pub fn awaiting_confirmation(&self) -> Option<usize> {
        self.awaiting
    }

    /// Confirm the pending waypoint advance
    ///
    /// Only a waypoint the last tick reported as awaiting confirmation can
    /// be confirmed; returns `false` when nothing is waiting.
    pub fn confirm_advance(&mut self) -> bool {
        self.confirmed = self.awaiting;
        self.confirmed.is_some()
    }

    /// Forget all route progress
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.state = NavState::default();
        self.last_xte = None;
        self.generation = None;
        self.awaiting = None;
        self.confirmed = None;
    }

    /// Run one navigation tick
    pub fn tick(&mut self, input: &NavInput<'_>) -> TickOutcome {
        if self.generation != Some(input.generation) {
            self.reset();
            self.generation = Some(input.generation);
        }
        if !input.route.is_navigable() || !input.fix.position.is_finite() {
            return TickOutcome::NoTarget;
        }

        match self.config.mode {
            NavMode::StandardXte | NavMode::WaypointBearing => self.tick_waypoint(input),
            NavMode::RoutePositionBearing => self.tick_lookahead(input),
        }
    }

    fn tick_waypoint(&mut self, input: &NavInput<'_>) -> TickOutcome {
        let route = input.route;
        let vessel = input.fix.position;

        let granted = self.confirmed.is_some() && self.confirmed == self.tracker.current();
        let update = self.tracker.update(
            route,
            &vessel,
            Confirmation {
                required: self.config.confirm_advance,
                granted,
            },
        );
        self.awaiting = update.events.iter().find_map(|e| match e {
            NavEvent::AwaitingConfirmation(i) => Some(*i),
            _ => None,
        });
        if update.confirmation_used || self.confirmed != self.awaiting {
            self.confirmed = None;
        }

        let index = match update.state {
            TrackerState::Tracking(i) => i,
            TrackerState::Ended => return self.finish(update.events),
            TrackerState::Unset => return TickOutcome::NoTarget,
        };
        let Some(wp) = route.get(index) else {
            return TickOutcome::NoTarget;
        };
        let origin_name = self
            .tracker
            .origin()
            .and_then(|o| route.get(o))
            .map(|o| o.name.clone())
            .unwrap_or_default();

        let (bearing, xte) = match self.config.mode {
            NavMode::StandardXte => {
                let xte = signed_xte(&vessel, wp, &self.geometry);
                let rate = self.last_xte.map_or(0.0, |last| xte - last);
                self.last_xte = Some(xte);
                (
                    wp.arrival_bearing_deg,
                    xte * self.config.xte_multiplier + rate * self.config.xte_rate_multiplier,
                )
            }
            _ => (update.bearing_deg, 0.0),
        };

        self.state.target = NavTarget::Waypoint(index);
        let output = self.build_output(
            input,
            Destination {
                point: wp.point,
                name: wp.name.clone(),
                origin_name,
                track_deg: wp.arrival_bearing_deg,
            },
            bearing,
            xte,
            update.arrival,
        );
        TickOutcome::Steer {
            output,
            events: update.events,
        }
    }

    fn tick_lookahead(&mut self, input: &NavInput<'_>) -> TickOutcome {
        let route = input.route;
        let vessel = input.fix.position;
        self.awaiting = None;
        self.confirmed = None;

        let distance = match self.config.lookahead_mode {
            LookaheadMode::Distance => self.config.lookahead_distance_nm,
            LookaheadMode::Time => {
                LookaheadSearch::distance_for_time(self.config.lookahead_time_s, input.avg_sog_kn)
            }
        };
        let search = LookaheadSearch::new(distance, self.config.max_angle_deg);
        let Some(target) = search.find(&vessel, route, &self.geometry) else {
            return TickOutcome::NoTarget;
        };

        let mut events = NavEvents::new();
        if target.complete {
            let _ = events.push(NavEvent::RouteEnded);
            return self.finish(events);
        }

        let previous_ahead = match self.state.target {
            NavTarget::Lookahead { ahead_index, .. } => Some(ahead_index),
            _ => None,
        };
        if previous_ahead != Some(target.ahead_index) {
            let _ = events.push(NavEvent::WaypointActivated(target.ahead_index));
        }

        let Some(ahead) = route.get(target.ahead_index) else {
            return TickOutcome::NoTarget;
        };
        let origin_name = target
            .ahead_index
            .checked_sub(1)
            .and_then(|i| route.get(i))
            .map(|o| o.name.clone())
            .unwrap_or_default();
        let arrival = great_circle::distance(&vessel, &ahead.point) < ahead.arrival_radius_nm;

        self.state.target = NavTarget::Lookahead {
            point: target.point,
            ahead_index: target.ahead_index,
        };
        let output = self.build_output(
            input,
            Destination {
                point: target.point,
                name: ahead.name.clone(),
                origin_name,
                track_deg: ahead.arrival_bearing_deg,
            },
            target.bearing_deg,
            0.0,
            arrival,
        );
        TickOutcome::Steer { output, events }
    }

    fn finish(&mut self, events: NavEvents) -> TickOutcome {
        self.state = NavState::default();
        self.last_xte = None;
        TickOutcome::Ended { events }
    }

    fn build_output(
        &mut self,
        input: &NavInput<'_>,
        dest: Destination,
        bearing_deg: f64,
        xte_nm: f64,
        arrival: bool,
    ) -> NavigationOutput {
        let fix = input.fix;
        let (range_nm, to_dest) = distance_bearing(&fix.position, &dest.point);
        let closing = fix.sog_kn * cos((fix.cog_deg - to_dest).to_radians());

        let mut bearing_deg = sanitize(bearing_deg, 0.0);
        let mut bearing_to_destination_deg = sanitize(to_dest, 0.0);
        let mut track_bearing_deg = sanitize(dest.track_deg, 0.0);
        let declination = input
            .declination_deg
            .filter(|d| d.is_finite() && self.config.magnetic);
        if let Some(d) = declination {
            bearing_deg = apply_declination(bearing_deg, d);
            bearing_to_destination_deg = apply_declination(bearing_to_destination_deg, d);
            track_bearing_deg = apply_declination(track_bearing_deg, d);
        }

        let xte_nm = sanitize(xte_nm, 0.0);
        self.state.bearing_deg = bearing_deg;
        self.state.xte_nm = xte_nm;
        self.state.arrival = arrival;
        self.state.last_waypoint_name = dest.origin_name.clone();

        NavigationOutput {
            bearing_deg,
            xte_nm,
            arrival,
            destination_name: dest.name,
            origin_name: dest.origin_name,
            destination: dest.point,
            range_nm: sanitize(range_nm, 0.0),
            bearing_to_destination_deg,
            track_bearing_deg,
            closing_velocity_kn: sanitize(closing, 0.0),
            magnetic: declination.is_some(),
        }
    }
}

/// Target description used to fill a [`NavigationOutput`]
struct Destination {
    point: GeoPoint,
    name: WaypointName,
    origin_name: WaypointName,
    track_deg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeometryKind;
    use crate::route::{load_route, WaypointSpec};

    fn spec(lat: f64, lon: f64, name: &'static str, radius: f64) -> WaypointSpec<'static> {
        WaypointSpec {
            lat,
            lon,
            name,
            id: name,
            arrival_radius_nm: radius,
        }
    }

    fn config(mode: NavMode) -> NavigatorConfig {
        NavigatorConfig {
            mode,
            ..NavigatorConfig::default()
        }
    }

    fn navigator(mode: NavMode) -> RouteNavigator {
        RouteNavigator::new(config(mode), Geometry::new(GeometryKind::Spherical))
    }

    fn input<'a>(route: &'a Route, fix: &'a VesselFix) -> NavInput<'a> {
        NavInput {
            route,
            generation: 1,
            fix,
            avg_sog_kn: fix.sog_kn,
            declination_deg: None,
        }
    }

    /// (0,0) -> (0,1), the flat test route
    fn east_route(fix: Option<&VesselFix>) -> Route {
        let specs = [spec(0.0, 0.0, "START", 0.05), spec(0.0, 1.0, "END", 0.05)];
        load_route(
            &specs,
            fix,
            &NavigatorConfig::default(),
            &Geometry::new(GeometryKind::Spherical),
        )
        .unwrap()
    }

    // ========== Standard XTE Tests ==========

    #[test]
    fn test_standard_xte_end_to_end() {
        let fix = VesselFix::new(0.0001, 0.0, 90.0, 5.0, 8);
        let route = east_route(Some(&fix));
        let mut nav = navigator(NavMode::StandardXte);

        let outcome = nav.tick(&input(&route, &fix));
        let output = outcome.output().expect("steering output");

        assert!((output.bearing_deg - 90.0).abs() < 0.01, "bearing {}", output.bearing_deg);
        // 0.0001 degrees north of an eastbound track: left of track, steer right
        let expected = 0.0001 * 60.0;
        assert!(
            (output.xte_nm - expected).abs() < 1e-4,
            "xte {} expected {}",
            output.xte_nm,
            expected
        );
        assert_eq!(output.destination_name.as_str(), "END");
        assert_eq!(output.origin_name.as_str(), "START");
        assert_eq!(nav.state().target, NavTarget::Waypoint(1));
    }

    #[test]
    fn test_xte_sign_right_of_track() {
        let fix = VesselFix::new(-0.01, 0.5, 90.0, 5.0, 8);
        let route = east_route(None);
        let mut nav = navigator(NavMode::StandardXte);
        let output = nav.tick(&input(&route, &fix)).output().cloned().unwrap();
        assert!(output.xte_nm < 0.0, "right of track must steer left, got {}", output.xte_nm);
        assert!((output.xte_nm + 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_xte_multiplier_and_rate() {
        let route = east_route(None);
        let mut nav = RouteNavigator::new(
            NavigatorConfig {
                mode: NavMode::StandardXte,
                xte_multiplier: 2.0,
                xte_rate_multiplier: 10.0,
                ..NavigatorConfig::default()
            },
            Geometry::new(GeometryKind::Spherical),
        );

        let first = VesselFix::new(0.01, 0.5, 90.0, 5.0, 8);
        let out = nav.tick(&input(&route, &first)).output().cloned().unwrap();
        // no history: rate term is zero
        assert!((out.xte_nm - 2.0 * 0.6).abs() < 1e-3, "{}", out.xte_nm);

        let second = VesselFix::new(0.005, 0.5, 90.0, 5.0, 8);
        let out = nav.tick(&input(&route, &second)).output().cloned().unwrap();
        // 2 * 0.3 + 10 * (0.3 - 0.6)
        assert!((out.xte_nm - (0.6 - 3.0)).abs() < 1e-2, "{}", out.xte_nm);
    }

    #[test]
    fn test_vessel_on_waypoint_gives_finite_output() {
        // zero arrival radius: sitting exactly on B still counts as arrival
        let fix = VesselFix::new(0.0, 0.5, 0.0, 0.0, 8);
        let specs = [spec(0.0, 0.0, "A", 0.0), spec(0.0, 0.5, "B", 0.0), spec(0.0, 1.0, "C", 0.0)];
        let route = load_route(&specs, None, &NavigatorConfig::default(), &Geometry::default()).unwrap();
        let mut nav = navigator(NavMode::StandardXte);

        let outcome = nav.tick(&input(&route, &fix));
        let out = outcome.output().unwrap();
        assert_eq!(nav.state().target, NavTarget::Waypoint(2));
        assert!(out.bearing_deg.is_finite() && out.xte_nm.is_finite());
        assert!(out.xte_nm.abs() < 1e-9);
    }

    // ========== Waypoint Bearing Tests ==========

    #[test]
    fn test_waypoint_bearing_aims_directly() {
        let route = east_route(None);
        let fix = VesselFix::new(0.1, 0.5, 90.0, 5.0, 8);
        let mut nav = navigator(NavMode::WaypointBearing);
        let out = nav.tick(&input(&route, &fix)).output().cloned().unwrap();

        let direct = great_circle::bearing(&fix.position, &GeoPoint::new(0.0, 1.0));
        assert!((out.bearing_deg - direct).abs() < 1e-9);
        assert!(out.xte_nm.abs() < 1e-12);
        assert!((out.range_nm - great_circle::distance(&fix.position, &GeoPoint::new(0.0, 1.0))).abs() < 1e-9);
    }

    #[test]
    fn test_confirmation_gates_advance() {
        let specs = [spec(0.0, 0.0, "A", 0.1), spec(0.0, 0.1, "B", 0.1), spec(0.1, 0.1, "C", 0.1)];
        let route = load_route(&specs, None, &NavigatorConfig::default(), &Geometry::default()).unwrap();
        let mut nav = RouteNavigator::new(
            NavigatorConfig {
                mode: NavMode::WaypointBearing,
                confirm_advance: true,
                ..NavigatorConfig::default()
            },
            Geometry::default(),
        );

        let approach = VesselFix::new(0.0, 0.07, 90.0, 5.0, 8);
        nav.tick(&input(&route, &approach));
        let at_b = VesselFix::new(0.0, 0.0995, 90.0, 5.0, 8);
        let outcome = nav.tick(&input(&route, &at_b));
        assert!(outcome.events().contains(&NavEvent::AwaitingConfirmation(1)));
        assert_eq!(nav.state().target, NavTarget::Waypoint(1));
        assert!(outcome.output().unwrap().arrival);

        assert_eq!(nav.awaiting_confirmation(), Some(1));
        assert!(nav.confirm_advance());
        let outcome = nav.tick(&input(&route, &at_b));
        assert!(outcome.events().contains(&NavEvent::WaypointActivated(2)));
        assert_eq!(nav.state().target, NavTarget::Waypoint(2));
        assert!(!nav.confirm_pending());
    }

    #[test]
    fn test_confirmation_before_arrival_is_ignored() {
        let specs = [
            spec(0.0, 0.0, "A", 0.1),
            spec(0.0, 0.1, "B", 0.1),
            spec(0.1, 0.1, "C", 0.1),
            spec(0.1, 0.2, "D", 0.1),
        ];
        let route = load_route(&specs, None, &NavigatorConfig::default(), &Geometry::default()).unwrap();
        let mut nav = RouteNavigator::new(
            NavigatorConfig {
                mode: NavMode::WaypointBearing,
                confirm_advance: true,
                ..NavigatorConfig::default()
            },
            Geometry::default(),
        );

        // confirmed advance past B
        nav.tick(&input(&route, &VesselFix::new(0.0, 0.07, 90.0, 5.0, 8)));
        let at_b = VesselFix::new(0.0, 0.0995, 90.0, 5.0, 8);
        nav.tick(&input(&route, &at_b));
        assert!(nav.confirm_advance());
        nav.tick(&input(&route, &at_b));
        assert_eq!(nav.state().target, NavTarget::Waypoint(2));

        // pressed again on the way to C, nothing is waiting
        let toward_c = VesselFix::new(0.05, 0.1, 0.0, 5.0, 8);
        nav.tick(&input(&route, &toward_c));
        assert!(!nav.confirm_advance());
        assert!(!nav.confirm_pending());

        let at_c = VesselFix::new(0.0995, 0.1, 0.0, 5.0, 8);
        let outcome = nav.tick(&input(&route, &at_c));
        assert_eq!(nav.state().target, NavTarget::Waypoint(2));
        assert!(outcome.events().contains(&NavEvent::AwaitingConfirmation(2)));
    }

    #[test]
    fn test_route_end_reported() {
        let route = east_route(None);
        let mut nav = navigator(NavMode::WaypointBearing);
        let near_start = VesselFix::new(0.0, 0.5, 90.0, 5.0, 8);
        nav.tick(&input(&route, &near_start));

        let at_end = VesselFix::new(0.0, 0.9999, 90.0, 5.0, 8);
        let outcome = nav.tick(&input(&route, &at_end));
        assert!(outcome.is_ended());
        assert!(outcome.events().contains(&NavEvent::RouteEnded));
        assert_eq!(nav.state().target, NavTarget::None);
    }

    // ========== Route Position Bearing Tests ==========

    #[test]
    fn test_route_position_bearing_follows_lookahead() {
        let route = east_route(None);
        let mut nav = RouteNavigator::new(
            NavigatorConfig {
                mode: NavMode::RoutePositionBearing,
                lookahead_distance_nm: 3.0,
                max_angle_deg: 30.0,
                ..NavigatorConfig::default()
            },
            Geometry::new(GeometryKind::Mercator),
        );
        // 1 nm north of the track
        let fix = VesselFix::new(1.0 / 60.0, 0.5, 90.0, 5.0, 8);
        let outcome = nav.tick(&input(&route, &fix));
        let out = outcome.output().unwrap();

        // aims down toward the track, within 30 degrees of it
        assert!(out.bearing_deg > 90.0 && out.bearing_deg <= 120.0 + 1e-9, "{}", out.bearing_deg);
        assert!(out.xte_nm.abs() < 1e-12);
        assert!(outcome.events().contains(&NavEvent::WaypointActivated(1)));
        assert!(matches!(nav.state().target, NavTarget::Lookahead { ahead_index: 1, .. }));

        // same leg next tick: no new activation
        let outcome = nav.tick(&input(&route, &fix));
        assert!(outcome.events().is_empty());
    }

    #[test]
    fn test_time_lookahead_uses_average_speed() {
        let route = east_route(None);
        let mut nav = RouteNavigator::new(
            NavigatorConfig {
                mode: NavMode::RoutePositionBearing,
                lookahead_mode: LookaheadMode::Time,
                lookahead_time_s: 360.0,
                ..NavigatorConfig::default()
            },
            Geometry::new(GeometryKind::Spherical),
        );
        let fix = VesselFix::new(0.0, 0.5, 90.0, 5.0, 8);
        let nav_input = NavInput {
            avg_sog_kn: 10.0,
            ..input(&route, &fix)
        };
        let out = nav.tick(&nav_input).output().cloned().unwrap();
        // 360 s at 10 kn = 1 nm ahead
        assert!((out.range_nm - 1.0).abs() < 1e-4, "{}", out.range_nm);
    }

    #[test]
    fn test_route_position_bearing_ends_at_final_waypoint() {
        let route = east_route(None);
        let mut nav = navigator(NavMode::RoutePositionBearing);
        let fix = VesselFix::new(0.0, 0.9995, 90.0, 5.0, 8);
        assert!(nav.tick(&input(&route, &fix)).is_ended());
    }

    // ========== Common Tests ==========

    #[test]
    fn test_short_route_has_no_target() {
        let specs = [spec(0.0, 0.0, "ONLY", 0.1)];
        let route = load_route(&specs, None, &NavigatorConfig::default(), &Geometry::default()).unwrap();
        let fix = VesselFix::new(0.1, 0.1, 0.0, 5.0, 8);
        for mode in [NavMode::StandardXte, NavMode::WaypointBearing, NavMode::RoutePositionBearing] {
            let mut nav = navigator(mode);
            assert_eq!(nav.tick(&input(&route, &fix)), TickOutcome::NoTarget);
            assert_eq!(nav.tick(&input(&Route::new(), &fix)), TickOutcome::NoTarget);
        }
    }

    #[test]
    fn test_generation_change_resets_progress() {
        let specs = [spec(0.0, 0.0, "A", 0.1), spec(0.0, 0.1, "B", 0.1), spec(0.1, 0.1, "C", 0.1)];
        let long = load_route(&specs, None, &NavigatorConfig::default(), &Geometry::default()).unwrap();
        let mut nav = navigator(NavMode::WaypointBearing);
        let fix = VesselFix::new(0.06, 0.1, 0.0, 5.0, 8);
        nav.tick(&input(&long, &fix));
        assert_eq!(nav.state().target, NavTarget::Waypoint(2));

        let short = east_route(None);
        let outcome = nav.tick(&NavInput {
            generation: 2,
            ..input(&short, &fix)
        });
        assert_eq!(nav.generation(), Some(2));
        // nearest waypoint picked afresh, then passed
        assert_eq!(outcome.events(), &[NavEvent::WaypointActivated(1)]);
        assert_eq!(nav.state().target, NavTarget::Waypoint(1));
    }

    #[test]
    fn test_magnetic_output() {
        let route = east_route(None);
        let mut nav = RouteNavigator::new(
            NavigatorConfig {
                mode: NavMode::StandardXte,
                magnetic: true,
                ..NavigatorConfig::default()
            },
            Geometry::default(),
        );
        let fix = VesselFix::new(0.0, 0.5, 90.0, 5.0, 8);

        let true_out = nav.tick(&input(&route, &fix)).output().cloned().unwrap();
        assert!(!true_out.magnetic);

        let mag_out = nav
            .tick(&NavInput {
                declination_deg: Some(-10.0),
                ..input(&route, &fix)
            })
            .output()
            .cloned()
            .unwrap();
        assert!(mag_out.magnetic);
        assert!((mag_out.bearing_deg - (true_out.bearing_deg - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_closing_velocity_is_speed_made_good() {
        let route = east_route(None);
        let mut nav = navigator(NavMode::WaypointBearing);
        // heading 60 degrees off the bearing to the destination
        let fix = VesselFix::new(0.0, 0.5, 30.0, 6.0, 8);
        let out = nav.tick(&input(&route, &fix)).output().cloned().unwrap();
        assert!((out.closing_velocity_kn - 3.0).abs() < 1e-3, "{}", out.closing_velocity_kn);
    }

    #[test]
    fn test_signed_xte_on_track_is_zero() {
        let mut wp = Waypoint::new(GeoPoint::new(0.0, 1.0), "W", "w", 0.1);
        wp.arrival_bearing_deg = 90.0;
        let geo = Geometry::new(GeometryKind::Spherical);
        let xte = signed_xte(&GeoPoint::new(0.0, 0.5), &wp, &geo);
        assert!(xte.abs() < 1e-9, "{}", xte);
        // vessel exactly on the waypoint
        assert!(signed_xte(&wp.point, &wp, &geo).abs() < 1e-9);
    }
}
