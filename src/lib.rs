//! route_pilot - Route-following autopilot navigation host runtime
//!
//! Wraps the `route_pilot_core` navigation engine in a session that talks to
//! a chart plotter host:
//!
//! - `session`: route exchange, fix and declination intake, periodic tick
//! - `driver`: tokio task that ticks the session at the configured rate
//! - `config`: TOML configuration seeding the parameter store
//! - `messages`: JSON host message bodies and outgoing notices
//! - `output`: steering output sinks

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod messages;
pub mod output;
pub mod session;

pub use clock::{SharedClock, SystemClock};
pub use config::{NavigationConfig, OutputConfig, PilotConfig};
pub use driver::DriverHandle;
pub use error::{PilotError, Result};
pub use messages::Notice;
pub use output::{CollectingSink, LogSink, OutputSink};
pub use session::{ActiveRoute, PilotSession, DECLINATION_MAX_AGE_S};
