pub mod lightweight;

use async_trait::async_trait;

pub use lightweight::{LightweightVesselAdapter, LightweightVesselConfig};

use crate::error::SimulatorError;
use crate::types::{GpsFix, HelmCommand};

/// Vessel simulator backend driven in fixed time steps.
///
/// The closed-loop runner owns one adapter and calls `step` once per
/// simulated interval; fixes come out of `receive_fix` at the backend's GPS
/// rate and helm commands go in through `send_helm`. `Send + Sync` keeps the
/// trait usable as `Box<dyn SimulatorAdapter>`.
#[async_trait]
pub trait SimulatorAdapter: Send + Sync {
    /// Backend kind, e.g. "lightweight"
    fn adapter_type(&self) -> &'static str;

    /// Instance name used in logs
    fn name(&self) -> &str;

    /// Reset the backend and start the simulation clock at zero
    async fn connect(&mut self) -> Result<(), SimulatorError>;

    async fn disconnect(&mut self) -> Result<(), SimulatorError>;

    fn is_connected(&self) -> bool;

    /// Fix produced by the last step, `None` between GPS updates
    async fn receive_fix(&mut self) -> Result<Option<GpsFix>, SimulatorError>;

    /// Apply a steering command from the pilot
    async fn send_helm(&mut self, command: &HelmCommand) -> Result<(), SimulatorError>;

    /// Advance the vessel by `step_size_us`
    async fn step(&mut self) -> Result<(), SimulatorError>;

    /// Simulated time since `connect`, in microseconds
    fn sim_time_us(&self) -> u64;

    fn step_size_us(&self) -> u64;
}
