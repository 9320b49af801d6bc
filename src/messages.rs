//! Host message payloads
//!
//! JSON bodies exchanged with the chart plotter host: the route request and
//! response pair, declination updates and the notices the session emits.

use route_pilot_core::route::WaypointSpec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Incoming: a route was activated on the host
pub const MSG_ROUTE_ACTIVATED: &str = "OCPN_RTE_ACTIVATED";
/// Incoming: route waypoints in reply to a request
pub const MSG_ROUTE_RESPONSE: &str = "OCPN_ROUTE_RESPONSE";
/// Incoming: the host deactivated the route
pub const MSG_ROUTE_DEACTIVATED: &str = "OCPN_RTE_DEACTIVATED";
/// Incoming: the host ended the route
pub const MSG_ROUTE_ENDED: &str = "OCPN_RTE_ENDED";
/// Incoming: magnetic variation at the boat
pub const MSG_DECLINATION: &str = "WMM_VARIATION_BOAT";

/// Outgoing: request the waypoints of a route
pub const MSG_ROUTE_REQUEST: &str = "OCPN_ROUTE_REQUEST";
/// Outgoing: a waypoint became active
pub const MSG_WAYPOINT_ACTIVATED: &str = "OCPN_WPT_ACTIVATED";
/// Outgoing: request magnetic variation at the boat
pub const MSG_DECLINATION_REQUEST: &str = "WMM_VARIATION_BOAT_REQUEST";
/// Outgoing: a route could not be loaded
pub const MSG_ROUTE_LOAD_FAILED: &str = "AUTOPILOT_ROUTE_LOAD_FAILED";

/// Arrival radius used when a waypoint record omits it (nm)
pub const DEFAULT_ARRIVAL_RADIUS_NM: f64 = 0.05;

/// Route response body
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    #[serde(rename = "GUID")]
    pub guid: String,
    /// The host could not find the route
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub waypoints: Vec<WaypointRecord>,
}

/// One waypoint of a route response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "GUID", default)]
    pub guid: String,
    /// Arrival radius in nautical miles
    #[serde(rename = "ArrivalRadius", default = "default_arrival_radius")]
    pub arrival_radius_nm: f64,
}

fn default_arrival_radius() -> f64 {
    DEFAULT_ARRIVAL_RADIUS_NM
}

impl WaypointRecord {
    pub fn as_spec(&self) -> WaypointSpec<'_> {
        WaypointSpec {
            lat: self.lat,
            lon: self.lon,
            name: &self.name,
            id: &self.guid,
            arrival_radius_nm: self.arrival_radius_nm,
        }
    }
}

/// Route activation and deactivation body
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRef {
    #[serde(rename = "GUID")]
    pub guid: String,
}

/// Declination body; the host sends the value as a number or a string
#[derive(Debug, Clone, Deserialize)]
pub struct DeclinationUpdate {
    #[serde(rename = "Decl")]
    pub decl: Value,
}

impl DeclinationUpdate {
    /// Declination in degrees, east positive
    pub fn degrees(&self) -> Option<f64> {
        let degrees: Option<f64> = match &self.decl {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        degrees.filter(|d| d.is_finite())
    }
}

/// Notices the session emits to the host
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Ask the host for the waypoints of a route
    RouteRequested { guid: String },
    /// The active route was cleared
    RouteDeactivated,
    /// The vessel finished the route
    RouteEnded,
    /// A waypoint became the active target
    WaypointActivated { guid: String, name: String },
    /// A route payload was rejected; the previous route is retained
    RouteLoadFailed { reason: String },
    /// The declination is missing or stale
    DeclinationRequested,
}

impl Notice {
    /// Host message identifier
    pub fn message_id(&self) -> &'static str {
        match self {
            Notice::RouteRequested { .. } => MSG_ROUTE_REQUEST,
            Notice::RouteDeactivated => MSG_ROUTE_DEACTIVATED,
            Notice::RouteEnded => MSG_ROUTE_ENDED,
            Notice::WaypointActivated { .. } => MSG_WAYPOINT_ACTIVATED,
            Notice::RouteLoadFailed { .. } => MSG_ROUTE_LOAD_FAILED,
            Notice::DeclinationRequested => MSG_DECLINATION_REQUEST,
        }
    }

    /// JSON message body
    pub fn body(&self) -> Value {
        match self {
            Notice::RouteRequested { guid } => json!({ "GUID": guid }),
            Notice::WaypointActivated { guid, name } => json!({ "GUID": guid, "Name": name }),
            Notice::RouteLoadFailed { reason } => json!({ "error": reason }),
            Notice::RouteDeactivated | Notice::RouteEnded | Notice::DeclinationRequested => {
                json!({})
            }
        }
    }
}
