//! Route loading
//!
//! Turns raw waypoint records into a [`Route`]: validates them, computes each
//! waypoint's arrival bearing and, when enabled, inserts intercept points so a
//! vessel joining the route underway rejoins it smoothly instead of cutting
//! toward the nearest raw waypoint.

use heapless::Vec;

use super::{Route, RouteError, Waypoint, MAX_ROUTE_WAYPOINTS};
use crate::geo::great_circle;
use crate::geo::{GeoPoint, Geometry, GeometryBackend};
use crate::navigation::{NavigatorConfig, VesselFix};

/// Minimum speed (knots) for the vessel's COG to be trusted as a course
pub const MIN_COURSE_SOG_KN: f64 = 0.5;

/// Name given to the synthetic waypoint at the vessel position
pub const INTERCEPT_START_NAME: &str = "Start";

/// Name given to the synthetic waypoint where the course meets the route
pub const INTERCEPT_POINT_NAME: &str = "Intercept";

/// Raw waypoint record as supplied by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointSpec<'a> {
    pub lat: f64,
    pub lon: f64,
    pub name: &'a str,
    pub id: &'a str,
    /// Arrival radius in nautical miles
    pub arrival_radius_nm: f64,
}

impl<'a> WaypointSpec<'a> {
    fn validate(&self, index: usize) -> Result<(), RouteError> {
        if !GeoPoint::new(self.lat, self.lon).is_valid() {
            return Err(RouteError::InvalidCoordinate(index));
        }
        if !self.arrival_radius_nm.is_finite() || self.arrival_radius_nm < 0.0 {
            return Err(RouteError::InvalidArrivalRadius(index));
        }
        Ok(())
    }
}

/// Build a route from raw waypoint records
///
/// An empty list yields an empty route; navigation reports "no target" for
/// routes shorter than two waypoints.
///
/// # Errors
///
/// Returns the first invalid record, or [`RouteError::Full`] when there are
/// more than [`MAX_ROUTE_WAYPOINTS`] records. Intercept insertion that would
/// overflow the route is skipped rather than reported.
pub fn load_route(
    specs: &[WaypointSpec<'_>],
    fix: Option<&VesselFix>,
    config: &NavigatorConfig,
    geometry: &Geometry,
) -> Result<Route, RouteError> {
    if specs.len() > MAX_ROUTE_WAYPOINTS {
        return Err(RouteError::Full);
    }

    let mut route = Route::new();
    for (i, spec) in specs.iter().enumerate() {
        spec.validate(i)?;
        route.push(Waypoint::new(
            GeoPoint::new(spec.lat, spec.lon),
            spec.name,
            spec.id,
            spec.arrival_radius_nm,
        ))?;
    }

    if config.intercept {
        if let Some(fix) = fix {
            insert_intercept(&mut route, fix, geometry);
        }
    }

    assign_arrival_bearings(&mut route, fix);
    Ok(route)
}

/// Compute every waypoint's arrival bearing
///
/// Waypoint `i` is approached from waypoint `i - 1`. The first waypoint is
/// approached along the vessel's course when it is making way, else from the
/// vessel's position; without a fix the first segment's bearing is used.
pub fn assign_arrival_bearings(route: &mut Route, fix: Option<&VesselFix>) {
    let first_segment = match route.waypoints() {
        [a, b, ..] => great_circle::bearing(&a.point, &b.point),
        _ => 0.0,
    };

    let wps = route.waypoints_mut();
    let Some(first) = wps.first().map(|wp| wp.point) else {
        return;
    };

    wps[0].arrival_bearing_deg = match fix {
        Some(f) if f.sog_kn > MIN_COURSE_SOG_KN && f.cog_deg.is_finite() => {
            great_circle::wrap_360(f.cog_deg)
        }
        Some(f) => great_circle::bearing(&f.position, &first),
        None => first_segment,
    };

    for i in 1..wps.len() {
        let prev = wps[i - 1].point;
        wps[i].arrival_bearing_deg = great_circle::bearing(&prev, &wps[i].point);
    }
}

/// Insert synthetic waypoints ahead of the segment nearest the vessel
///
/// The vessel position goes in before the segment's far endpoint, followed by
/// the point where the current course crosses that segment when it does.
fn insert_intercept(route: &mut Route, fix: &VesselFix, geometry: &Geometry) {
    let vessel = fix.position;

    let nearest = route
        .segments()
        .map(|(i, a, b)| {
            let c = geometry.closest_seg(&vessel, &a.point, &b.point);
            (i, geometry.distance(&vessel, &c))
        })
        .min_by(|x, y| x.1.total_cmp(&y.1));
    let Some((segment, _)) = nearest else {
        return;
    };

    let (start, end) = match (route.get(segment), route.get(segment + 1)) {
        (Some(a), Some(b)) => (a.point, b.clone()),
        _ => return,
    };

    let mut synthetic: Vec<Waypoint, 2> = Vec::new();
    let _ = synthetic.push(Waypoint::new(
        vessel,
        INTERCEPT_START_NAME,
        "",
        end.arrival_radius_nm,
    ));
    if fix.sog_kn > MIN_COURSE_SOG_KN {
        if let Some(x) = geometry.intersect(&vessel, fix.cog_deg, &start, &end.point) {
            if x.is_finite() && x != end.point {
                let _ = synthetic.push(Waypoint::new(
                    x,
                    INTERCEPT_POINT_NAME,
                    "",
                    end.arrival_radius_nm,
                ));
            }
        }
    }

    if route.len() + synthetic.len() > MAX_ROUTE_WAYPOINTS {
        return;
    }
    for (offset, wp) in synthetic.into_iter().enumerate() {
        // capacity checked above
        let _ = route.insert(segment + 1 + offset, wp);
    }
}
