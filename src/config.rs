//! Configuration loading for route_pilot
//!
//! The TOML file supplies the initial values of the route parameters; the
//! parameter store is seeded from it and owns the values from then on.
//!
//! ```toml
//! [navigation]
//! mode = 0                  # 0 standard XTE, 2 waypoint bearing, 3 route position bearing
//! geometry = 1              # 0 spherical, 1 Mercator
//! xte_multiplier = 1.0
//! lookahead_distance_m = 100.0
//!
//! [output]
//! sentences = ["APB", "RMB"]
//! ```

use crate::error::Result;
use route_pilot_core::parameters::{RouteParams, SentenceFlags};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PilotConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Navigation engine settings
#[derive(Clone, Debug, Deserialize)]
pub struct NavigationConfig {
    /// Steering mode (default: 3, route position bearing)
    #[serde(default = "default_mode")]
    pub mode: i32,

    /// Geometry backend (default: 1, Mercator)
    #[serde(default = "default_geometry")]
    pub geometry: i32,

    /// XTE gain (default: 1.0)
    #[serde(default = "default_xte_multiplier")]
    pub xte_multiplier: f32,

    /// XTE rate gain (default: 0.0)
    #[serde(default)]
    pub xte_rate_multiplier: f32,

    /// Lookahead by distance (0) or time (1) (default: 0)
    #[serde(default)]
    pub lookahead_mode: i32,

    /// Lookahead distance in meters (default: 100)
    #[serde(default = "default_lookahead_distance")]
    pub lookahead_distance_m: f32,

    /// Lookahead time in seconds (default: 100)
    #[serde(default = "default_lookahead_time")]
    pub lookahead_time_s: f32,

    /// Maximum steering deviation from the track in degrees (default: 30)
    #[serde(default = "default_max_angle")]
    pub max_angle_deg: f32,

    /// Insert intercept points when a route is loaded underway (default: false)
    #[serde(default)]
    pub intercept: bool,

    /// Require confirmation before each waypoint advance (default: false)
    #[serde(default)]
    pub confirm_advance: bool,

    /// Navigation tick rate in Hz (default: 1)
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f32,

    /// Publish magnetic bearings when a declination is known (default: false)
    #[serde(default)]
    pub magnetic: bool,
}

/// Output settings
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Sentences to emit each tick (default: APB)
    #[serde(default = "default_sentences")]
    pub sentences: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            geometry: default_geometry(),
            xte_multiplier: default_xte_multiplier(),
            xte_rate_multiplier: 0.0,
            lookahead_mode: 0,
            lookahead_distance_m: default_lookahead_distance(),
            lookahead_time_s: default_lookahead_time(),
            max_angle_deg: default_max_angle(),
            intercept: false,
            confirm_advance: false,
            rate_hz: default_rate_hz(),
            magnetic: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sentences: default_sentences(),
        }
    }
}

// Default value functions
fn default_mode() -> i32 {
    3
}
fn default_geometry() -> i32 {
    1
}
fn default_xte_multiplier() -> f32 {
    1.0
}
fn default_lookahead_distance() -> f32 {
    100.0
}
fn default_lookahead_time() -> f32 {
    100.0
}
fn default_max_angle() -> f32 {
    30.0
}
fn default_rate_hz() -> f32 {
    1.0
}
fn default_sentences() -> Vec<String> {
    vec!["APB".to_string()]
}

impl PilotConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Route parameters seeded from this configuration
    pub fn to_params(&self) -> RouteParams {
        let nav = &self.navigation;
        RouteParams {
            mode: nav.mode,
            geometry: nav.geometry,
            xte_p: nav.xte_multiplier,
            xte_d: nav.xte_rate_multiplier,
            look_mode: nav.lookahead_mode,
            look_dist_m: nav.lookahead_distance_m,
            look_time_s: nav.lookahead_time_s,
            max_angle_deg: nav.max_angle_deg,
            intercept: nav.intercept,
            confirm: nav.confirm_advance,
            rate_hz: nav.rate_hz,
            magnetic: nav.magnetic,
            sentences: self.output.sentence_flags(),
        }
    }
}

impl OutputConfig {
    /// Parse sentence names; unknown names are skipped with a warning
    pub fn sentence_flags(&self) -> SentenceFlags {
        self.sentences
            .iter()
            .fold(SentenceFlags::empty(), |flags, name| {
                match SentenceFlags::from_name(&name.to_ascii_uppercase()) {
                    Some(flag) => flags | flag,
                    None => {
                        warn!("Unknown output sentence {:?} ignored", name);
                        flags
                    }
                }
            })
    }
}
