//! Closed-loop runner
//!
//! Couples a simulator adapter to a pilot session in lockstep: every
//! simulator step advances the session clock to simulation time, feeds any
//! new GPS fix into the session, ticks the session when its period is due
//! and forwards the steering output to the simulated helm.
//!
//! The helm is handed `bearing_deg` as a true bearing, so sessions driven
//! here should run without magnetic output.

use std::sync::Arc;
use std::time::Duration;

use route_pilot::{OutputSink, PilotSession, SharedClock};
use route_pilot_core::navigation::TickOutcome;
use route_pilot_core::traits::TimeSource;
use tracing::{debug, info};

use crate::adapter::SimulatorAdapter;
use crate::error::SimulatorError;
use crate::types::{GpsFixType, HelmCommand, VesselId};

/// Lockstep simulator and session pair.
pub struct ClosedLoop<A, S> {
    adapter: A,
    session: Arc<PilotSession<S, SharedClock>>,
    vessel_id: VesselId,
    next_tick_us: u64,
    ticks: u64,
}

impl<A, S> ClosedLoop<A, S>
where
    A: SimulatorAdapter,
    S: OutputSink,
{
    pub fn new(adapter: A, session: Arc<PilotSession<S, SharedClock>>, vessel_id: VesselId) -> Self {
        Self {
            adapter,
            session,
            vessel_id,
            next_tick_us: 0,
            ticks: 0,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn session(&self) -> &Arc<PilotSession<S, SharedClock>> {
        &self.session
    }

    /// Number of session ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Connect the adapter and align the session clock with simulation time.
    pub async fn connect(&mut self) -> Result<(), SimulatorError> {
        self.adapter.connect().await?;
        let now = self.adapter.sim_time_us();
        self.session.clock().set_us(now);
        self.next_tick_us = now;
        info!("{} connected to {}", self.vessel_id, self.adapter.name());
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<(), SimulatorError> {
        self.adapter.disconnect().await?;
        info!("{} disconnected", self.vessel_id);
        Ok(())
    }

    /// Feed the current GPS fix, if any, without advancing the simulation.
    pub async fn feed_fix(&mut self) -> Result<bool, SimulatorError> {
        match self.adapter.receive_fix().await? {
            Some(fix) if fix.fix_type != GpsFixType::NoFix => {
                self.session
                    .set_fix(fix.lat_deg, fix.lon_deg, fix.cog_deg, fix.sog_kn, fix.satellites);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Advance one simulator step.
    ///
    /// Returns the tick outcome when the session ticked during this step.
    pub async fn step(&mut self) -> Result<Option<TickOutcome>, SimulatorError> {
        self.adapter.step().await?;
        let now = self.adapter.sim_time_us();
        self.session.clock().set_us(now);
        self.feed_fix().await?;

        if now < self.next_tick_us {
            return Ok(None);
        }
        self.next_tick_us = now + self.session.tick_period().as_micros() as u64;
        self.ticks += 1;

        let Some(outcome) = self.session.tick() else {
            return Ok(None);
        };
        if let Some(output) = outcome.output() {
            debug!(
                "t={:.1}s steer {:.1} xte {:+.4}nm to {}",
                now as f64 / 1e6,
                output.bearing_deg,
                output.xte_nm,
                output.destination_name.as_str()
            );
            let command = HelmCommand {
                timestamp_us: now,
                vessel_id: self.vessel_id,
                bearing_deg: output.bearing_deg,
                xte_nm: output.xte_nm,
            };
            self.adapter.send_helm(&command).await?;
        }
        if outcome.is_ended() {
            info!("Route finished after {:.1}s", now as f64 / 1e6);
        }
        Ok(Some(outcome))
    }

    /// Step until the route ends or `limit` of simulation time has passed.
    ///
    /// Returns `true` when the route was finished.
    pub async fn run_until_ended(&mut self, limit: Duration) -> Result<bool, SimulatorError> {
        let deadline = self.adapter.sim_time_us() + limit.as_micros() as u64;
        while self.adapter.sim_time_us() < deadline {
            if let Some(outcome) = self.step().await? {
                if outcome.is_ended() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Elapsed simulation time.
    pub fn sim_time(&self) -> Duration {
        Duration::from_micros(self.adapter.sim_time_us())
    }

    /// Simulation time as seen by the session clock, in milliseconds.
    pub fn session_time_ms(&self) -> u64 {
        self.session.clock().now_ms()
    }
}
