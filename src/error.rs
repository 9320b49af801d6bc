//! Error types for the route_pilot host runtime

use route_pilot_core::parameters::ParameterError;
use route_pilot_core::route::RouteError;
use thiserror::Error;

/// Host runtime error type
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed route payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Route rejected: {0}")]
    Route(RouteError),

    #[error("Parameter error: {0}")]
    Parameter(ParameterError),
}

// Core errors are no_std Display-only enums, so no `#[from]` source chaining.
impl From<RouteError> for PilotError {
    fn from(e: RouteError) -> Self {
        PilotError::Route(e)
    }
}

impl From<ParameterError> for PilotError {
    fn from(e: ParameterError) -> Self {
        PilotError::Parameter(e)
    }
}

pub type Result<T> = std::result::Result<T, PilotError>;
