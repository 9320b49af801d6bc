//! route_pilot_core - Pure no_std route-following navigation logic
//!
//! This crate contains the platform-agnostic geometry, route model and
//! navigation engine, testable on host without any feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Geometry backends and time injected via traits
//!
//! # Modules
//!
//! - [`geo`]: Spherical and Mercator geometry kernels, great-circle helpers
//! - [`route`]: Route model, route loading, lookahead search
//! - [`navigation`]: Waypoint advancement and the per-tick navigation engine
//! - [`parameters`]: Parameter store and route parameters
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)

#![no_std]

pub mod geo;
pub mod navigation;
pub mod parameters;
pub mod route;
pub mod traits;
