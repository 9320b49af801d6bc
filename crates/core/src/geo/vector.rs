//! Unit-sphere vector helpers for the spherical backend

use libm::{asin, atan2, cos, sin};
use nalgebra::{Quaternion, Vector3};

use super::GeoPoint;

/// Convert a position to a unit vector
///
/// Axes: x toward (0°N, 90°E), y toward (0°N, 0°E), z toward the north pole.
pub(crate) fn ll2v(p: &GeoPoint) -> Vector3<f64> {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    Vector3::new(cos(lat) * sin(lon), cos(lat) * cos(lon), sin(lat))
}

/// Convert a unit vector back to a position
pub(crate) fn v2ll(v: &Vector3<f64>) -> GeoPoint {
    let z = v.z.clamp(-1.0, 1.0);
    GeoPoint::new(asin(z).to_degrees(), atan2(v.x, v.y).to_degrees())
}

/// Normalize a vector, or `None` when its length is too small to carry a direction
pub(crate) fn normalize(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    let n = v.norm();
    if n < 1e-12 || !n.is_finite() {
        None
    } else {
        Some(v / n)
    }
}

/// Rotate `v` by `angle` radians about `axis` (right-hand rule)
///
/// Computed as `q * v * q'` with `q` a unit quaternion. A zero-length axis
/// leaves `v` unchanged.
pub(crate) fn rotate(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let Some(axis) = normalize(axis) else {
        return *v;
    };
    let half = angle / 2.0;
    let q = Quaternion::from_parts(cos(half), axis * sin(half));
    let p = Quaternion::from_imag(*v);
    (q * p * q.conjugate()).imag()
}

/// Same rotation through nalgebra's unit quaternion, used to cross-check `rotate`
#[cfg(test)]
fn rotate_unit(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let axis = nalgebra::Unit::new_normalize(*axis);
    nalgebra::UnitQuaternion::from_axis_angle(&axis, angle) * v
}
