//! Periodic tick driver
//!
//! Runs `PilotSession::tick` on a tokio interval while a route is active and
//! parks on the session's active watch otherwise. The interval is rebuilt
//! when the tick rate parameter changes.

use std::sync::Arc;

use route_pilot_core::traits::TimeSource;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::output::OutputSink;
use crate::session::PilotSession;

/// Handle to a spawned driver task
pub struct DriverHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Stop the driver and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the driver for a session on the current runtime
pub fn spawn<S, T>(session: Arc<PilotSession<S, T>>) -> DriverHandle
where
    S: OutputSink + 'static,
    T: TimeSource + 'static,
{
    let (shutdown, rx) = watch::channel(false);
    let task = tokio::spawn(run(session, rx));
    DriverHandle { shutdown, task }
}

/// Drive a session until `shutdown` turns `true` or its sender is dropped
pub async fn run<S, T>(session: Arc<PilotSession<S, T>>, mut shutdown: watch::Receiver<bool>)
where
    S: OutputSink,
    T: TimeSource,
{
    let mut active = session.subscribe_active();
    info!("Navigation driver started");

    'outer: loop {
        if *shutdown.borrow() {
            break;
        }

        if !*active.borrow_and_update() {
            debug!("No active route, driver idle");
            tokio::select! {
                changed = active.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            continue;
        }

        let period = session.tick_period();
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!("Ticking every {:?}", period);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    session.tick();
                    if !session.is_active() {
                        break;
                    }
                    if session.tick_period() != period {
                        info!("Tick period changed to {:?}", session.tick_period());
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break 'outer;
                    }
                }
            }
        }
    }

    info!("Navigation driver stopped");
}
