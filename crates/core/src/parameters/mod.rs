//! Parameter management types and utilities
//!
//! This module provides the typed parameter store and the route navigation
//! parameter set. Hosts seed the store from their configuration file and
//! rebuild the navigator configuration whenever the store is dirty.

pub mod error;
pub mod route;
pub mod storage;

pub use error::ParameterError;
pub use route::{RouteParams, SentenceFlags, METERS_PER_NM};
pub use storage::{ParamFlags, ParamKind, ParamName, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
