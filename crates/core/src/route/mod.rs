//! Route model
//!
//! Bounded, ordered waypoint list consumed read-only by the navigation engine.
//! A route is built in one piece by [`load_route`] and replaced wholesale on
//! reload; nothing mutates it afterwards.
//!
//! # Capacity
//!
//! - Up to [`MAX_ROUTE_WAYPOINTS`] waypoints (fixed-size, no allocation)
//! - Names truncated to [`NAME_LEN`] bytes, identifiers to [`ID_LEN`] bytes

pub mod loader;
pub mod lookahead;

use heapless::{String, Vec};

use crate::geo::GeoPoint;

pub use loader::{load_route, WaypointSpec, MIN_COURSE_SOG_KN};
pub use lookahead::{LookaheadSearch, LookaheadTarget};

/// Maximum number of waypoints in a route (including synthetic intercept points)
pub const MAX_ROUTE_WAYPOINTS: usize = 128;

/// Maximum waypoint name length in bytes
pub const NAME_LEN: usize = 32;

/// Maximum waypoint identifier length in bytes
pub const ID_LEN: usize = 48;

/// Bounded waypoint name
pub type WaypointName = String<NAME_LEN>;

/// Bounded waypoint identifier (GUID)
pub type WaypointId = String<ID_LEN>;

/// Copy `s` into a bounded string, truncating at a character boundary
pub fn bounded_str<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Route waypoint
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Position
    pub point: GeoPoint,
    /// Display name
    pub name: WaypointName,
    /// Stable identifier; empty for synthetic points
    pub id: WaypointId,
    /// Arrival circle radius in nautical miles (>= 0)
    pub arrival_radius_nm: f64,
    /// Track bearing the waypoint is approached along (degrees true)
    pub arrival_bearing_deg: f64,
}

impl Waypoint {
    /// Create a waypoint with a zero arrival bearing
    pub fn new(point: GeoPoint, name: &str, id: &str, arrival_radius_nm: f64) -> Self {
        Self {
            point,
            name: bounded_str(name),
            id: bounded_str(id),
            arrival_radius_nm,
            arrival_bearing_deg: 0.0,
        }
    }

    /// True for waypoints inserted by the loader rather than supplied by the host
    pub fn is_synthetic(&self) -> bool {
        self.id.is_empty()
    }
}

/// Route load errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// Waypoint at index has a non-finite or out-of-range coordinate
    InvalidCoordinate(usize),
    /// Waypoint at index has a negative or non-finite arrival radius
    InvalidArrivalRadius(usize),
    /// More waypoints than the route can hold
    Full,
}

impl core::fmt::Display for RouteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RouteError::InvalidCoordinate(i) => write!(f, "waypoint {} has an invalid position", i),
            RouteError::InvalidArrivalRadius(i) => {
                write!(f, "waypoint {} has an invalid arrival radius", i)
            }
            RouteError::Full => write!(f, "route exceeds {} waypoints", MAX_ROUTE_WAYPOINTS),
        }
    }
}

/// Ordered list of waypoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint, MAX_ROUTE_WAYPOINTS>,
}

impl Route {
    /// Create an empty route
    pub const fn new() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True if the route has no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// True if the route has at least one segment to steer along
    pub fn is_navigable(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Get waypoint by index
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Final waypoint
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// All waypoints in order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Iterate over consecutive pairs as `(index of first, first, second)`
    pub fn segments(&self) -> impl Iterator<Item = (usize, &Waypoint, &Waypoint)> {
        self.waypoints
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (i, &pair[0], &pair[1]))
    }

    /// Index of the waypoint with the given identifier
    pub fn position_of(&self, id: &str) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.waypoints.iter().position(|wp| wp.id.as_str() == id)
    }

    pub(crate) fn push(&mut self, wp: Waypoint) -> Result<(), RouteError> {
        self.waypoints.push(wp).map_err(|_| RouteError::Full)
    }

    pub(crate) fn insert(&mut self, index: usize, wp: Waypoint) -> Result<(), RouteError> {
        self.waypoints.insert(index, wp).map_err(|_| RouteError::Full)
    }

    pub(crate) fn waypoints_mut(&mut self) -> &mut [Waypoint] {
        &mut self.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(lat: f64, lon: f64, name: &str) -> Waypoint {
        Waypoint::new(GeoPoint::new(lat, lon), name, name, 0.1)
    }

    #[test]
    fn test_bounded_str_truncates_at_char_boundary() {
        let s: String<4> = bounded_str("abcdef");
        assert_eq!(s.as_str(), "abcd");

        // 'é' is two bytes: "aé" fits in 3, the next 'é' does not
        let s: String<4> = bounded_str("aéé");
        assert_eq!(s.as_str(), "aé");
    }

    #[test]
    fn test_route_segments() {
        let mut route = Route::new();
        route.push(wp(0.0, 0.0, "A")).unwrap();
        route.push(wp(0.0, 1.0, "B")).unwrap();
        route.push(wp(1.0, 1.0, "C")).unwrap();

        let names: Vec<(usize, &str, &str), 4> = route
            .segments()
            .map(|(i, a, b)| (i, a.name.as_str(), b.name.as_str()))
            .collect();
        assert_eq!(names.as_slice(), &[(0, "A", "B"), (1, "B", "C")]);
    }

    #[test]
    fn test_route_navigable_needs_two_points() {
        let mut route = Route::new();
        assert!(route.is_empty());
        assert!(!route.is_navigable());
        route.push(wp(0.0, 0.0, "A")).unwrap();
        assert!(!route.is_navigable());
        route.push(wp(0.0, 1.0, "B")).unwrap();
        assert!(route.is_navigable());
        assert_eq!(route.segments().count(), 1);
    }

    #[test]
    fn test_route_full() {
        let mut route = Route::new();
        for i in 0..MAX_ROUTE_WAYPOINTS {
            route.push(wp(0.0, i as f64 * 0.01, "W")).unwrap();
        }
        assert_eq!(route.push(wp(0.0, 0.0, "X")), Err(RouteError::Full));
        assert_eq!(route.insert(0, wp(0.0, 0.0, "X")), Err(RouteError::Full));
    }

    #[test]
    fn test_position_of() {
        let mut route = Route::new();
        route.push(wp(0.0, 0.0, "A")).unwrap();
        route.push(Waypoint::new(GeoPoint::new(0.0, 0.5), "synthetic", "", 0.0)).unwrap();
        route.push(wp(0.0, 1.0, "B")).unwrap();
        assert_eq!(route.position_of("B"), Some(2));
        assert_eq!(route.position_of(""), None);
        assert!(route.get(1).unwrap().is_synthetic());
    }
}
