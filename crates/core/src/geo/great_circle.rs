//! Great-circle navigation utilities
//!
//! Pure functions for bearing and distance between positions on a spherical
//! earth, used for arrival bearings, waypoint ranges and cross-track error
//! regardless of which [`GeometryBackend`](super::GeometryBackend) is active.
//!
//! Distances are nautical miles (one nautical mile per arc minute).

use libm::{asin, atan2, cos, fmod, sin, sqrt};

use super::GeoPoint;

/// Nautical miles per radian of central angle (60 nm per degree)
pub const NM_PER_RADIAN: f64 = 60.0 * 180.0 / core::f64::consts::PI;

/// Calculate distance and initial bearing between two positions (haversine)
///
/// # Returns
///
/// Tuple of (distance in nautical miles, bearing in degrees 0-360)
pub fn distance_bearing(from: &GeoPoint, to: &GeoPoint) -> (f64, f64) {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1) * cos(lat2) * sin_dlon * sin_dlon;
    // rounding can push `a` just outside [0, 1] for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));
    let distance = c * NM_PER_RADIAN;

    // Forward azimuth
    let y = sin(delta_lon) * cos(lat2);
    let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(delta_lon);
    let bearing = wrap_360(atan2(y, x).to_degrees());

    (distance, bearing)
}

/// Great-circle distance in nautical miles
pub fn distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_bearing(from, to).0
}

/// Initial great-circle bearing in degrees (0-360)
pub fn bearing(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_bearing(from, to).1
}

/// Position reached by travelling `distance_nm` from `from` along `bearing_deg`
pub fn destination(from: &GeoPoint, bearing_deg: f64, distance_nm: f64) -> GeoPoint {
    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();
    let brg = bearing_deg.to_radians();
    let delta = distance_nm / NM_PER_RADIAN;

    let sin_lat2 = sin(lat1) * cos(delta) + cos(lat1) * sin(delta) * cos(brg);
    let lat2 = asin(sin_lat2.clamp(-1.0, 1.0));
    let lon2 = lon1 + atan2(sin(brg) * sin(delta) * cos(lat1), cos(delta) - sin(lat1) * sin_lat2);

    GeoPoint::new(lat2.to_degrees(), wrap_180(lon2.to_degrees()))
}

/// Normalize angle to the -180 to +180 range
pub fn wrap_180(angle: f64) -> f64 {
    let mut a = fmod(angle, 360.0);
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Normalize angle to the 0 to 360 range (360 itself maps to 0)
pub fn wrap_360(angle: f64) -> f64 {
    let a = fmod(angle, 360.0);
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Resolve a heading into the half-open range [-180, 180)
pub fn heading_resolve(degrees: f64) -> f64 {
    resolve_around(degrees, 0.0)
}

/// Resolve a heading into the half-open range [center - 180, center + 180)
pub fn resolve_around(degrees: f64, center: f64) -> f64 {
    if !degrees.is_finite() {
        return degrees;
    }
    let mut d = degrees;
    while d < center - 180.0 {
        d += 360.0;
    }
    while d >= center + 180.0 {
        d -= 360.0;
    }
    d
}
