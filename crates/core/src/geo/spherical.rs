//! Spherical (great-circle) geometry backend
//!
//! Positions are mapped to unit vectors; lines are great circles described by
//! their normal vector. Exact on a sphere at any range, at the cost of a few
//! trig calls per operation.

use libm::{acos, atan2, cos};
use nalgebra::Vector3;

use super::great_circle::NM_PER_RADIAN;
use super::vector::{ll2v, normalize, rotate, v2ll};
use super::{GeoPoint, GeometryBackend};

/// Tolerance for on-segment tests on unit-vector dot products
const SEGMENT_EPSILON: f64 = 1e-12;

/// Great-circle geometry on a spherical earth
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spherical;

/// Central angle between two unit vectors in radians
fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    atan2(a.cross(b).norm(), a.dot(b))
}

/// True if `x` lies on the minor arc from `v0` to `v1`
fn on_arc(x: &Vector3<f64>, v0: &Vector3<f64>, v1: &Vector3<f64>) -> bool {
    let span = v0.dot(v1);
    x.dot(v0) >= span - SEGMENT_EPSILON && x.dot(v1) >= span - SEGMENT_EPSILON
}

/// Foot of the perpendicular from `c` onto the great circle with normal `n`
fn foot(c: &Vector3<f64>, n: &Vector3<f64>) -> Option<Vector3<f64>> {
    normalize(&(c - n * n.dot(c)))
}

impl GeometryBackend for Spherical {
    fn distance(&self, p0: &GeoPoint, p1: &GeoPoint) -> f64 {
        angle_between(&ll2v(p0), &ll2v(p1)) * NM_PER_RADIAN
    }

    fn closest(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint {
        let (v0, v1) = (ll2v(p0), ll2v(p1));
        let Some(n) = normalize(&v0.cross(&v1)) else {
            return *p0;
        };
        match foot(&ll2v(p), &n) {
            Some(m) => v2ll(&m),
            None => *p0,
        }
    }

    fn closest_seg(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint {
        let (c, v0, v1) = (ll2v(p), ll2v(p0), ll2v(p1));
        if let Some(n) = normalize(&v0.cross(&v1)) {
            if let Some(m) = foot(&c, &n) {
                if on_arc(&m, &v0, &v1) {
                    return v2ll(&m);
                }
            }
        }
        if angle_between(&c, &v0) <= angle_between(&c, &v1) {
            *p0
        } else {
            *p1
        }
    }

    fn intersect_circle(
        &self,
        p: &GeoPoint,
        radius_nm: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint> {
        let (c, v0, v1) = (ll2v(p), ll2v(p0), ll2v(p1));
        let n = normalize(&v0.cross(&v1))?;
        let v = foot(&c, &n)?;

        // cosine of the angular distance from the centre to the great circle
        let a = c.dot(&v);
        let d = cos(radius_nm / NM_PER_RADIAN);
        if a < d {
            return None;
        }
        let b = acos((d / a).clamp(-1.0, 1.0));

        // positive rotation about n moves from v0 toward v1
        [rotate(&v, &n, b), rotate(&v, &n, -b)]
            .into_iter()
            .filter(|w| on_arc(w, &v0, &v1))
            .min_by(|x, y| angle_between(x, &v1).total_cmp(&angle_between(y, &v1)))
            .map(|w| v2ll(&w))
    }

    fn intersect(
        &self,
        p: &GeoPoint,
        bearing_deg: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint> {
        let (c, v0, v1) = (ll2v(p), ll2v(p0), ll2v(p1));
        let n = normalize(&v0.cross(&v1))?;

        // positive rotation of the pole about c sweeps clockwise from north
        let b = rotate(&Vector3::z(), &c, bearing_deg.to_radians());
        let m = normalize(&c.cross(&b))?;
        let heading = normalize(&(b - c * c.dot(&b)))?;

        let i = normalize(&n.cross(&m))?;
        let i = if i.dot(&heading) >= 0.0 { i } else { -i };
        if on_arc(&i, &v0, &v1) {
            Some(v2ll(&i))
        } else {
            None
        }
    }
}
