use crate::types::VesselId;

/// Simulator and closed-loop failures
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("{0} is not connected")]
    NotConnected(VesselId),

    #[error("invalid simulator configuration: {0}")]
    InvalidConfig(&'static str),

    /// Pilot session rejected a route, message or configuration
    #[error("pilot: {0}")]
    Pilot(#[from] route_pilot::PilotError),
}
