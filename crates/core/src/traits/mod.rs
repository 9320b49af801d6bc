//! Platform abstractions injected into the navigation logic.
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Host implementations (system clock) live in the `route_pilot` crate

pub mod time;

pub use time::{MockTime, TimeSource};
