//! Lookahead search
//!
//! Finds the steering point for route-position-bearing navigation: the point
//! furthest along the route that lies on a circle of the lookahead distance
//! around the vessel, falling back to the closest route point when the circle
//! misses the route entirely.

use super::Route;
use crate::geo::great_circle::{distance_bearing, heading_resolve, wrap_360};
use crate::geo::{sanitize, GeoPoint, Geometry, GeometryBackend};

/// Steering points closer than this (nm) are treated as the vessel's own position
const COINCIDENT_NM: f64 = 1e-6;

/// Result of one lookahead search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadTarget {
    /// Steering point
    pub point: GeoPoint,
    /// Index of the route waypoint just ahead of the steering point
    pub ahead_index: usize,
    /// Great-circle bearing from the vessel to the steering point
    pub raw_bearing_deg: f64,
    /// Bearing clamped to the arrival bearing of the waypoint ahead
    pub bearing_deg: f64,
    /// Distance from the vessel to the steering point (nm)
    pub distance_nm: f64,
    /// The lookahead circle missed the route; the closest route point was used
    pub fallback: bool,
    /// The final waypoint is inside the lookahead circle and became the target
    pub ran_off_end: bool,
    /// The vessel reached or passed the final waypoint
    pub complete: bool,
}

/// Lookahead search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadSearch {
    /// Lookahead circle radius (nm)
    pub distance_nm: f64,
    /// Largest allowed deviation of the steering bearing from the track (degrees)
    pub max_angle_deg: f64,
}

impl LookaheadSearch {
    pub fn new(distance_nm: f64, max_angle_deg: f64) -> Self {
        Self {
            distance_nm: sanitize(distance_nm, 0.0).max(0.0),
            max_angle_deg: sanitize(max_angle_deg, 180.0).clamp(0.0, 180.0),
        }
    }

    /// Lookahead distance for time mode: distance covered in `time_s` at `avg_sog_kn`
    pub fn distance_for_time(time_s: f64, avg_sog_kn: f64) -> f64 {
        sanitize(time_s * avg_sog_kn / 3600.0, 0.0).max(0.0)
    }

    /// Search the route for the steering point
    ///
    /// Returns `None` for routes with fewer than two waypoints.
    pub fn find(&self, vessel: &GeoPoint, route: &Route, geometry: &Geometry) -> Option<LookaheadTarget> {
        if !route.is_navigable() {
            return None;
        }

        // later segments win: the point furthest along the route
        let mut hit: Option<(GeoPoint, usize)> = None;
        for (i, a, b) in route.segments() {
            if let Some(w) = geometry.intersect_circle(vessel, self.distance_nm, &a.point, &b.point) {
                hit = Some((w, i + 1));
            }
        }

        let fallback = hit.is_none();
        let (mut point, mut ahead_index) = match hit {
            Some(h) => h,
            None => closest_on_route(vessel, route, geometry)?,
        };

        let last_index = route.len() - 1;
        let last = route.last()?;
        let (final_distance, final_bearing) = distance_bearing(vessel, &last.point);

        let mut ran_off_end = false;
        if ahead_index == last_index && geometry.distance(vessel, &last.point) < self.distance_nm {
            point = last.point;
            ahead_index = last_index;
            ran_off_end = true;
        }

        let passed_final = ahead_index == last_index
            && heading_resolve(last.arrival_bearing_deg - final_bearing).abs() > 90.0;
        let complete = final_distance < last.arrival_radius_nm || passed_final;

        let track = route.get(ahead_index)?.arrival_bearing_deg;
        let (distance_nm, mut raw_bearing_deg) = distance_bearing(vessel, &point);
        // vessel sits on its own steering point: the bearing to it is undefined
        if distance_nm < COINCIDENT_NM {
            raw_bearing_deg = track;
        }
        let deviation = heading_resolve(raw_bearing_deg - track)
            .clamp(-self.max_angle_deg, self.max_angle_deg);

        Some(LookaheadTarget {
            point,
            ahead_index,
            raw_bearing_deg: sanitize(raw_bearing_deg, 0.0),
            bearing_deg: sanitize(wrap_360(track + deviation), 0.0),
            distance_nm,
            fallback,
            ran_off_end,
            complete,
        })
    }
}

/// Closest route point to the vessel over all segments, with the index ahead of it
fn closest_on_route(vessel: &GeoPoint, route: &Route, geometry: &Geometry) -> Option<(GeoPoint, usize)> {
    route
        .segments()
        .map(|(i, a, b)| {
            let c = geometry.closest_seg(vessel, &a.point, &b.point);
            (c, i + 1, geometry.distance(vessel, &c))
        })
        .min_by(|x, y| x.2.total_cmp(&y.2))
        .map(|(c, ahead, _)| (c, ahead))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeometryKind;
    use crate::navigation::NavigatorConfig;
    use crate::route::{load_route, WaypointSpec};

    const BACKENDS: [GeometryKind; 2] = [GeometryKind::Spherical, GeometryKind::Mercator];

    /// Straight 10 nm route due east along the equator
    fn straight_route(geometry: &Geometry) -> Route {
        let specs = [
            WaypointSpec {
                lat: 0.0,
                lon: 0.0,
                name: "A",
                id: "a",
                arrival_radius_nm: 0.1,
            },
            WaypointSpec {
                lat: 0.0,
                lon: 10.0 / 60.0,
                name: "B",
                id: "b",
                arrival_radius_nm: 0.1,
            },
        ];
        load_route(&specs, None, &NavigatorConfig::default(), geometry).unwrap()
    }

    #[test]
    fn test_target_three_tenths_along_straight_route() {
        for kind in BACKENDS {
            let geo = Geometry::new(kind);
            let route = straight_route(&geo);
            let search = LookaheadSearch::new(3.0, 30.0);

            let t = search.find(&GeoPoint::new(0.0, 0.0), &route, &geo).unwrap();
            let along = t.point.lon / (10.0 / 60.0);
            assert!((along - 0.3).abs() < 1e-3, "{:?}: parameter {}", kind, along);
            assert!(!t.fallback && !t.ran_off_end && !t.complete);
            assert_eq!(t.ahead_index, 1);
            assert!((t.bearing_deg - 90.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_target_measured_from_perpendicular_foot() {
        let geo = Geometry::new(GeometryKind::Spherical);
        let route = straight_route(&geo);
        // 0.3 nm north of the track, foot at 2 nm along
        let vessel = GeoPoint::new(0.3 / 60.0, 2.0 / 60.0);
        let t = LookaheadSearch::new(3.0, 30.0).find(&vessel, &route, &geo).unwrap();
        let along = t.point.lon / (10.0 / 60.0);
        // sqrt(3^2 - 0.3^2) ahead of the foot
        assert!((along - (2.0 + 2.985) / 10.0).abs() < 2e-3, "parameter {}", along);
    }

    #[test]
    fn test_lookahead_longer_than_route_runs_off_end() {
        for kind in BACKENDS {
            let geo = Geometry::new(kind);
            let route = straight_route(&geo);
            let search = LookaheadSearch::new(20.0, 30.0);

            let t = search.find(&GeoPoint::new(0.0, 0.0), &route, &geo).unwrap();
            assert!(t.fallback, "{:?}: circle encloses the whole route", kind);
            assert!(t.ran_off_end);
            assert_eq!(t.point, route.last().unwrap().point);
            assert!(!t.complete);

            // inside the final arrival radius: flagged for deactivation
            let near_end = GeoPoint::new(0.0, 9.95 / 60.0);
            let t = search.find(&near_end, &route, &geo).unwrap();
            assert!(t.complete, "{:?}", kind);
        }
    }

    #[test]
    fn test_passing_final_waypoint_completes() {
        let geo = Geometry::new(GeometryKind::Spherical);
        let route = straight_route(&geo);
        let beyond = GeoPoint::new(0.0, 11.0 / 60.0);
        let t = LookaheadSearch::new(0.5, 30.0).find(&beyond, &route, &geo).unwrap();
        assert!(t.complete);
    }

    #[test]
    fn test_far_off_route_uses_closest_point() {
        let geo = Geometry::new(GeometryKind::Mercator);
        let route = straight_route(&geo);
        // 6 nm south of the 5 nm mark, lookahead 1 nm never reaches the route
        let vessel = GeoPoint::new(-0.1, 5.0 / 60.0);
        let t = LookaheadSearch::new(1.0, 30.0).find(&vessel, &route, &geo).unwrap();
        assert!(t.fallback);
        assert!((t.point.lon - 5.0 / 60.0).abs() < 1e-6);
        // raw bearing is due north, clamped to 30 degrees off the eastbound track
        assert!(t.raw_bearing_deg < 1.0 || t.raw_bearing_deg > 359.0);
        assert!((t.bearing_deg - 60.0).abs() < 1e-6, "clamped {}", t.bearing_deg);
    }

    #[test]
    fn test_later_segment_wins() {
        // dog-leg: east 5 nm then back west just north of the first leg
        let geo = Geometry::new(GeometryKind::Spherical);
        let specs = [
            WaypointSpec { lat: 0.0, lon: 0.0, name: "A", id: "a", arrival_radius_nm: 0.1 },
            WaypointSpec { lat: 0.0, lon: 5.0 / 60.0, name: "B", id: "b", arrival_radius_nm: 0.1 },
            WaypointSpec { lat: 1.0 / 60.0, lon: 5.0 / 60.0, name: "C", id: "c", arrival_radius_nm: 0.1 },
            WaypointSpec { lat: 1.0 / 60.0, lon: 0.0, name: "D", id: "d", arrival_radius_nm: 0.1 },
        ];
        let route = load_route(&specs, None, &NavigatorConfig::default(), &geo).unwrap();
        let t = LookaheadSearch::new(2.0, 90.0)
            .find(&GeoPoint::new(0.0, 1.0 / 60.0), &route, &geo)
            .unwrap();
        // circle crosses A-B and C-D; C-D is later along the route
        assert_eq!(t.ahead_index, 3);
    }

    #[test]
    fn test_zero_distance_on_track_follows_track() {
        for kind in BACKENDS {
            let geo = Geometry::new(kind);
            let route = straight_route(&geo);
            // time mode before any speed has been averaged
            let d = LookaheadSearch::distance_for_time(100.0, 0.0);
            let search = LookaheadSearch::new(d, 30.0);

            let t = search.find(&GeoPoint::new(0.0, 5.0 / 60.0), &route, &geo).unwrap();
            assert!(t.distance_nm < 1e-6);
            assert!((t.bearing_deg - 90.0).abs() < 1e-6, "{:?}: bearing {}", kind, t.bearing_deg);
            assert!(!t.complete);
        }
    }

    #[test]
    fn test_zero_distance_off_track_steers_back() {
        let geo = Geometry::new(GeometryKind::Spherical);
        let route = straight_route(&geo);
        // 0.2 nm south of the track: steer toward it, limited to 30 degrees off track
        let vessel = GeoPoint::new(-0.2 / 60.0, 5.0 / 60.0);
        let t = LookaheadSearch::new(0.0, 30.0).find(&vessel, &route, &geo).unwrap();
        assert!((t.bearing_deg - 60.0).abs() < 1e-6, "bearing {}", t.bearing_deg);
    }

    #[test]
    fn test_short_route_has_no_target() {
        let geo = Geometry::default();
        let route = Route::new();
        assert!(LookaheadSearch::new(1.0, 30.0).find(&GeoPoint::default(), &route, &geo).is_none());
    }

    #[test]
    fn test_distance_for_time() {
        // 100 s at 6 kn
        let d = LookaheadSearch::distance_for_time(100.0, 6.0);
        assert!((d - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(LookaheadSearch::distance_for_time(100.0, f64::NAN), 0.0);
    }
}
