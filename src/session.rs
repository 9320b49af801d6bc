//! Pilot session
//!
//! Owns everything the navigation tick needs: the active route, the latest
//! fix, the speed filter, the declination and the parameter store. Host
//! callbacks and the periodic driver share one session behind an `Arc`.
//!
//! # Locking
//!
//! - `state` guards the shared data; it is held only for short updates and
//!   snapshots, never across a navigation computation
//! - `engine` guards the navigator and is held for a whole tick, so ticks
//!   never overlap
//! - Lock order is `engine` then `state`
//!
//! Routes are installed as `Arc<ActiveRoute>` snapshots tagged with a
//! generation. A tick works on the snapshot it took; deactivation at route
//! end is committed only if the generation is still current.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use route_pilot_core::geo::Geometry;
use route_pilot_core::navigation::{
    NavEvent, NavInput, NavState, NavigationOutput, RouteNavigator, SogFilter, TickOutcome,
    VesselFix,
};
use route_pilot_core::parameters::{ParamValue, ParameterStore, RouteParams, SentenceFlags};
use route_pilot_core::route::{load_route, Route, WaypointSpec};
use route_pilot_core::traits::TimeSource;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::SystemClock;
use crate::config::PilotConfig;
use crate::error::Result;
use crate::messages::{
    DeclinationUpdate, Notice, RouteRef, RouteResponse, WaypointRecord, MSG_DECLINATION,
    MSG_ROUTE_ACTIVATED, MSG_ROUTE_DEACTIVATED, MSG_ROUTE_ENDED, MSG_ROUTE_RESPONSE,
};
use crate::output::{lock, OutputSink};

/// Declination older than this is refreshed (seconds)
pub const DECLINATION_MAX_AGE_S: u64 = 1200;

const DECLINATION_MAX_AGE_US: u64 = DECLINATION_MAX_AGE_S * 1_000_000;

/// Route installed in a session
#[derive(Debug)]
pub struct ActiveRoute {
    pub guid: String,
    /// Increases with every installed route
    pub generation: u64,
    pub route: Route,
}

#[derive(Debug, Clone, Copy)]
struct Declination {
    degrees: f64,
    stamped_us: u64,
}

struct SharedState {
    route: Option<Arc<ActiveRoute>>,
    pending_request: Option<String>,
    next_generation: u64,
    fix: Option<VesselFix>,
    sog_filter: SogFilter,
    declination: Option<Declination>,
    declination_requested_us: Option<u64>,
    store: ParameterStore,
    params: RouteParams,
    /// Last steering command, republished while there is no target
    held_output: Option<NavigationOutput>,
}

impl SharedState {
    /// Declination no older than `DECLINATION_MAX_AGE_S`
    fn fresh_declination(&self, now_us: u64) -> Option<f64> {
        self.declination
            .filter(|d| now_us.saturating_sub(d.stamped_us) <= DECLINATION_MAX_AGE_US)
            .map(|d| d.degrees)
    }

    /// Declination is missing or stale and was not asked for recently
    fn declination_due(&self, now_us: u64) -> bool {
        let stale = self.fresh_declination(now_us).is_none();
        let asked = self
            .declination_requested_us
            .is_some_and(|t| now_us.saturating_sub(t) <= DECLINATION_MAX_AGE_US);
        stale && !asked
    }
}

/// Inputs taken from the shared state at the start of a tick
struct TickSnapshot {
    route: Arc<ActiveRoute>,
    fix: VesselFix,
    avg_sog_kn: f64,
    declination_deg: Option<f64>,
    sentences: SentenceFlags,
}

/// Route navigation session
pub struct PilotSession<S, T = SystemClock> {
    state: Mutex<SharedState>,
    engine: Mutex<RouteNavigator>,
    sink: S,
    clock: T,
    active: watch::Sender<bool>,
}

impl<S: OutputSink> PilotSession<S, SystemClock> {
    /// Create a session on the system clock
    pub fn new(config: &PilotConfig, sink: S) -> Result<Self> {
        Self::with_clock(config, sink, SystemClock::new())
    }
}

impl<S: OutputSink, T: TimeSource> PilotSession<S, T> {
    pub fn with_clock(config: &PilotConfig, sink: S, clock: T) -> Result<Self> {
        let mut store = ParameterStore::new();
        config.to_params().register(&mut store)?;
        store.clear_dirty();

        let params = RouteParams::from_store(&store);
        warn_unknown_mode(&params);
        let engine = RouteNavigator::new(params.to_config(), Geometry::new(params.geometry_kind()));
        let (active, _) = watch::channel(false);

        Ok(Self {
            state: Mutex::new(SharedState {
                route: None,
                pending_request: None,
                next_generation: 0,
                fix: None,
                sog_filter: SogFilter::default(),
                declination: None,
                declination_requested_us: None,
                store,
                params,
                held_output: None,
            }),
            engine: Mutex::new(engine),
            sink,
            clock,
            active,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    // -- Inputs --

    /// Replace the vessel fix
    ///
    /// The speed average only takes samples from fixes with more than three
    /// satellites.
    pub fn set_fix(&self, lat: f64, lon: f64, cog_deg: f64, sog_kn: f64, satellites: u8) {
        let fix = VesselFix::new(lat, lon, cog_deg, sog_kn, satellites)
            .with_timestamp(self.clock.now_ms());
        let mut state = lock(&self.state);
        state.sog_filter.update(sog_kn, satellites);
        state.fix = Some(fix);
    }

    /// Set the magnetic declination in degrees, east positive
    pub fn set_declination(&self, degrees: f64) {
        if !degrees.is_finite() {
            warn!("Ignoring non-finite declination");
            return;
        }
        let mut state = lock(&self.state);
        state.declination = Some(Declination {
            degrees,
            stamped_us: self.clock.now_us(),
        });
        state.declination_requested_us = None;
    }

    /// Change a parameter; takes effect on the next tick
    pub fn set_param(&self, name: &str, value: ParamValue) -> Result<()> {
        lock(&self.state).store.set(name, value)?;
        info!("Parameter {} set to {:?}", name, value);
        Ok(())
    }

    pub fn param(&self, name: &str) -> Option<ParamValue> {
        lock(&self.state).store.get(name).cloned()
    }

    /// Operator confirmation for the pending waypoint advance
    ///
    /// Returns `false` when no waypoint is waiting for confirmation.
    pub fn confirm_advance(&self) -> bool {
        let accepted = lock(&self.engine).confirm_advance();
        if accepted {
            info!("Waypoint advance confirmed");
        } else {
            debug!("No waypoint advance waiting for confirmation");
        }
        accepted
    }

    // -- Route exchange --

    /// Request the waypoints of a newly activated route
    pub fn activate_route(&self, guid: &str) {
        lock(&self.state).pending_request = Some(guid.to_string());
        info!("Route {} activated, requesting waypoints", guid);
        self.sink.notify(&Notice::RouteRequested {
            guid: guid.to_string(),
        });
    }

    /// Handle a route response body
    ///
    /// Returns `Ok(true)` when the route was installed, `Ok(false)` when the
    /// response was ignored (error reply, or not the outstanding request).
    pub fn handle_route_response(&self, body: &str) -> Result<bool> {
        let response: RouteResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(e) => {
                warn!("Malformed route response: {}", e);
                self.sink.notify(&Notice::RouteLoadFailed {
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };

        if response.error {
            debug!("Route response {} reports an error, ignored", response.guid);
            return Ok(false);
        }
        {
            let mut state = lock(&self.state);
            if state.pending_request.as_deref() != Some(response.guid.as_str()) {
                debug!("Discarding stale route response {}", response.guid);
                return Ok(false);
            }
            state.pending_request = None;
        }

        let specs: Vec<WaypointSpec<'_>> = response
            .waypoints
            .iter()
            .map(WaypointRecord::as_spec)
            .collect();
        self.load_route(&response.guid, &specs)?;
        Ok(true)
    }

    /// Build and install a route directly
    ///
    /// On failure the previous route and navigation state are kept.
    pub fn load_route(&self, guid: &str, specs: &[WaypointSpec<'_>]) -> Result<()> {
        let (fix, config, geometry) = {
            let state = lock(&self.state);
            (
                state.fix,
                state.params.to_config(),
                Geometry::new(state.params.geometry_kind()),
            )
        };

        let route = match load_route(specs, fix.as_ref(), &config, &geometry) {
            Ok(route) => route,
            Err(e) => {
                warn!("Route {} rejected: {}", guid, e);
                self.sink.notify(&Notice::RouteLoadFailed {
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };
        if !route.is_navigable() {
            warn!("Route {} has {} waypoints, nothing to steer along", guid, route.len());
        }

        let len = route.len();
        let generation = {
            let mut state = lock(&self.state);
            state.next_generation += 1;
            let generation = state.next_generation;
            state.route = Some(Arc::new(ActiveRoute {
                guid: guid.to_string(),
                generation,
                route,
            }));
            state.held_output = None;
            generation
        };
        info!(
            "Route {} loaded: {} waypoints (generation {})",
            guid, len, generation
        );
        self.active.send_replace(true);
        Ok(())
    }

    /// Clear the active route and tell the host
    pub fn deactivate(&self) {
        if self.clear_route() {
            info!("Route deactivated");
        }
        self.sink.notify(&Notice::RouteDeactivated);
    }

    fn clear_route(&self) -> bool {
        let mut engine = lock(&self.engine);
        let had_route = {
            let mut state = lock(&self.state);
            state.pending_request = None;
            state.held_output = None;
            state.route.take().is_some()
        };
        engine.reset();
        self.active.send_replace(false);
        had_route
    }

    /// Dispatch a host message by identifier
    pub fn handle_message(&self, id: &str, body: &str) -> Result<()> {
        match id {
            MSG_ROUTE_ACTIVATED => {
                let route: RouteRef = serde_json::from_str(body)?;
                self.activate_route(&route.guid);
            }
            MSG_ROUTE_RESPONSE => {
                self.handle_route_response(body)?;
            }
            MSG_DECLINATION => {
                let update: DeclinationUpdate = serde_json::from_str(body)?;
                match update.degrees() {
                    Some(degrees) => self.set_declination(degrees),
                    None => warn!("Declination message without a usable value"),
                }
            }
            MSG_ROUTE_DEACTIVATED | MSG_ROUTE_ENDED => {
                if self.clear_route() {
                    info!("Route deactivated by host ({})", id);
                }
            }
            _ => debug!("Ignoring message {}", id),
        }
        Ok(())
    }

    // -- Status --

    pub fn is_active(&self) -> bool {
        lock(&self.state).route.is_some()
    }

    pub fn active_route(&self) -> Option<Arc<ActiveRoute>> {
        lock(&self.state).route.clone()
    }

    /// Watch channel that is `true` while a route is active
    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    pub fn params(&self) -> RouteParams {
        lock(&self.state).params.clone()
    }

    /// Tick period for the current parameters
    ///
    /// Reads the store so a rate change is seen before the next tick applies it.
    pub fn tick_period(&self) -> Duration {
        let state = lock(&self.state);
        Duration::from_millis(RouteParams::from_store(&state.store).tick_period_ms())
    }

    pub fn average_sog(&self) -> f64 {
        lock(&self.state).sog_filter.average()
    }

    pub fn last_output(&self) -> Option<NavigationOutput> {
        lock(&self.state).held_output.clone()
    }

    pub fn navigator_state(&self) -> NavState {
        lock(&self.engine).state().clone()
    }

    // -- Tick --

    /// Run one navigation tick
    ///
    /// Returns `None` when there is no active route or no fix yet.
    pub fn tick(&self) -> Option<TickOutcome> {
        let mut engine = lock(&self.engine);
        let mut notices = Vec::new();

        let snapshot = {
            let mut state = lock(&self.state);
            let route = state.route.clone()?;
            let Some(fix) = state.fix else {
                debug!("No fix yet, skipping tick");
                return None;
            };

            if state.store.is_dirty() {
                state.store.clear_dirty();
                state.params = RouteParams::from_store(&state.store);
                warn_unknown_mode(&state.params);
                engine.set_config(state.params.to_config());
                let kind = state.params.geometry_kind();
                if engine.geometry().kind() != kind {
                    engine.set_geometry(Geometry::new(kind));
                }
            }

            let now_us = self.clock.now_us();
            if state.params.magnetic && state.declination_due(now_us) {
                state.declination_requested_us = Some(now_us);
                notices.push(Notice::DeclinationRequested);
            }

            TickSnapshot {
                route,
                fix,
                avg_sog_kn: state.sog_filter.average(),
                declination_deg: state.fresh_declination(now_us),
                sentences: state.params.sentences,
            }
        };

        let active = &snapshot.route;
        let outcome = engine.tick(&NavInput {
            route: &active.route,
            generation: active.generation,
            fix: &snapshot.fix,
            avg_sog_kn: snapshot.avg_sog_kn,
            declination_deg: snapshot.declination_deg,
        });

        for event in outcome.events() {
            match *event {
                NavEvent::WaypointActivated(i) => {
                    if let Some(wp) = active.route.get(i) {
                        info!("Waypoint {} ({}) active", i, wp.name.as_str());
                        notices.push(Notice::WaypointActivated {
                            guid: wp.id.as_str().to_string(),
                            name: wp.name.as_str().to_string(),
                        });
                    }
                }
                NavEvent::ArrivalCircleEntered(i) => info!("Entered arrival circle of waypoint {}", i),
                NavEvent::AwaitingConfirmation(i) => {
                    info!("Waypoint {} reached, waiting for confirmation to advance", i)
                }
                NavEvent::RouteEnded => {}
            }
        }

        match &outcome {
            TickOutcome::Steer { output, .. } => {
                debug!(
                    "steer {:.1} xte {:+.4}nm range {:.2}nm",
                    output.bearing_deg, output.xte_nm, output.range_nm
                );
                lock(&self.state).held_output = Some(output.clone());
                self.sink.publish(output, snapshot.sentences);
            }
            TickOutcome::NoTarget => {
                let held = lock(&self.state).held_output.clone();
                if let Some(output) = held {
                    self.sink.publish(&output, snapshot.sentences);
                }
            }
            TickOutcome::Ended { .. } => {
                engine.reset();
                let committed = {
                    let mut state = lock(&self.state);
                    let current = state.route.as_ref().map(|r| r.generation);
                    if current == Some(active.generation) {
                        state.route = None;
                        state.held_output = None;
                        true
                    } else {
                        false
                    }
                };
                if committed {
                    info!("Route {} ended", active.guid);
                    self.active.send_replace(false);
                    notices.push(Notice::RouteEnded);
                    notices.push(Notice::RouteDeactivated);
                }
            }
        }
        drop(engine);

        for notice in &notices {
            self.sink.notify(notice);
        }
        Some(outcome)
    }
}

fn warn_unknown_mode(params: &RouteParams) {
    if params.nav_mode().is_none() {
        warn!(
            "Unsupported navigation mode {}, using route position bearing",
            params.mode
        );
    }
}
