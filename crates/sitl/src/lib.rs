//! route_pilot_sitl - Software-in-the-loop vessel simulation
//!
//! A kinematic vessel behind the `SimulatorAdapter` trait, and a lockstep
//! runner that closes the loop through a `PilotSession`.

pub mod adapter;
pub mod closed_loop;
pub mod error;
pub mod types;

pub use adapter::{LightweightVesselAdapter, LightweightVesselConfig, SimulatorAdapter};
pub use closed_loop::ClosedLoop;
pub use error::SimulatorError;
pub use types::{GpsFix, GpsFixType, HelmCommand, VesselId};
