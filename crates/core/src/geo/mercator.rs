//! Secant Mercator geometry backend
//!
//! Every query projects its inputs into a Mercator plane centred on the query
//! position (`p`), solves the problem with 2-D vector algebra and projects the
//! answer back. Accurate over the short distances route following works with.

use libm::{atan, atan2, cos, exp, log, sin, sqrt};

use super::great_circle::wrap_180;
use super::{GeoPoint, GeometryBackend};

/// Projection radius: WGS84 equatorial radius times the UTM secant scale
const PROJECTION_RADIUS_M: f64 = 6_378_137.0 * 0.9996;

const DEG: f64 = core::f64::consts::PI / 180.0;

/// Squared projected length below which a segment is treated as a point
const DEGENERATE_SQ: f64 = 1e-12;

/// Planar Mercator geometry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mercator;

/// Point in the projected plane (x east, y north)
#[derive(Clone, Copy, Debug, PartialEq)]
struct Planar {
    x: f64,
    y: f64,
}

impl Planar {
    fn add(self, o: Planar) -> Planar {
        Planar {
            x: self.x + o.x,
            y: self.y + o.y,
        }
    }

    fn sub(self, o: Planar) -> Planar {
        Planar {
            x: self.x - o.x,
            y: self.y - o.y,
        }
    }

    fn scale(self, k: f64) -> Planar {
        Planar {
            x: self.x * k,
            y: self.y * k,
        }
    }

    fn dot(self, o: Planar) -> f64 {
        self.x * o.x + self.y * o.y
    }
}

/// Mercator northing of a latitude, before centring
fn northing(lat: f64) -> f64 {
    let s = sin(lat * DEG);
    PROJECTION_RADIUS_M * 0.5 * log((1.0 + s) / (1.0 - s))
}

/// Projection centred on one position
struct Projection {
    origin: GeoPoint,
    origin_northing: f64,
}

impl Projection {
    fn new(origin: &GeoPoint) -> Self {
        Self {
            origin: *origin,
            origin_northing: northing(origin.lat),
        }
    }

    fn to_plane(&self, p: &GeoPoint) -> Planar {
        Planar {
            x: wrap_180(p.lon - self.origin.lon) * DEG * PROJECTION_RADIUS_M,
            y: northing(p.lat) - self.origin_northing,
        }
    }

    fn from_plane(&self, q: Planar) -> GeoPoint {
        let lat = (2.0 * atan(exp((self.origin_northing + q.y) / PROJECTION_RADIUS_M))
            - core::f64::consts::FRAC_PI_2)
            / DEG;
        let lon = wrap_180(self.origin.lon + q.x / (DEG * PROJECTION_RADIUS_M));
        GeoPoint::new(lat, lon)
    }

    /// Projected units per nautical mile at the projection origin
    fn units_per_nm(&self) -> f64 {
        DEG * PROJECTION_RADIUS_M / (60.0 * cos(self.origin.lat * DEG))
    }
}

/// Parameter of the point on `a + t * d` nearest the origin
fn nearest_param(a: Planar, d: Planar) -> Option<f64> {
    let len_sq = d.dot(d);
    if len_sq < DEGENERATE_SQ {
        None
    } else {
        Some(-a.dot(d) / len_sq)
    }
}

impl GeometryBackend for Mercator {
    /// Mercator sailing (rhumb line) distance
    fn distance(&self, p0: &GeoPoint, p1: &GeoPoint) -> f64 {
        let proj = Projection::new(p0);
        let q = proj.to_plane(p1);
        let course = atan2(q.x, q.y);
        let dlat_min = (p1.lat - p0.lat) * 60.0;
        let cos_course = cos(course);
        if cos_course.abs() < 1e-9 {
            // due east or west: departure along the parallel
            let dlon_min = wrap_180(p1.lon - p0.lon) * 60.0;
            (dlon_min * cos(p0.lat * DEG)).abs()
        } else {
            (dlat_min / cos_course).abs()
        }
    }

    fn closest(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint {
        let proj = Projection::new(p);
        let a = proj.to_plane(p0);
        let d = proj.to_plane(p1).sub(a);
        match nearest_param(a, d) {
            Some(t) => proj.from_plane(a.add(d.scale(t))),
            None => *p0,
        }
    }

    fn closest_seg(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint {
        let proj = Projection::new(p);
        let a = proj.to_plane(p0);
        let d = proj.to_plane(p1).sub(a);
        match nearest_param(a, d) {
            Some(t) if t >= 1.0 => *p1,
            Some(t) if t > 0.0 => proj.from_plane(a.add(d.scale(t))),
            _ => *p0,
        }
    }

    fn intersect_circle(
        &self,
        p: &GeoPoint,
        radius_nm: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint> {
        let proj = Projection::new(p);
        let a = proj.to_plane(p0);
        let d = proj.to_plane(p1).sub(a);
        let r = radius_nm * proj.units_per_nm();

        // |a + t d|^2 = r^2
        let qa = d.dot(d);
        if qa < DEGENERATE_SQ {
            return None;
        }
        let qb = 2.0 * a.dot(d);
        let qc = a.dot(a) - r * r;
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 || !disc.is_finite() {
            return None;
        }
        let root = sqrt(disc);
        let t_far = (-qb + root) / (2.0 * qa);
        let t_near = (-qb - root) / (2.0 * qa);

        // larger parameter lies nearer p1
        [t_far, t_near]
            .into_iter()
            .find(|t| (0.0..=1.0).contains(t))
            .map(|t| proj.from_plane(a.add(d.scale(t))))
    }

    fn intersect(
        &self,
        p: &GeoPoint,
        bearing_deg: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint> {
        let proj = Projection::new(p);
        let a = proj.to_plane(p0);
        let d = proj.to_plane(p1).sub(a);
        let brg = bearing_deg * DEG;
        let u = Planar {
            x: sin(brg),
            y: cos(brg),
        };

        // a + t d parallel to u
        let denom = d.x * u.y - d.y * u.x;
        if denom.abs() < 1e-9 {
            return None;
        }
        let t = (a.y * u.x - a.x * u.y) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        let hit = a.add(d.scale(t));
        if hit.dot(u) < 0.0 {
            return None;
        }
        Some(proj.from_plane(hit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_round_trip() {
        let proj = Projection::new(&GeoPoint::new(48.0, -5.0));
        for p in [
            GeoPoint::new(48.0, -5.0),
            GeoPoint::new(48.3, -4.6),
            GeoPoint::new(47.5, -5.9),
        ] {
            let q = proj.from_plane(proj.to_plane(&p));
            assert!((q.lat - p.lat).abs() < 1e-9, "{:?} -> {:?}", p, q);
            assert!((q.lon - p.lon).abs() < 1e-9, "{:?} -> {:?}", p, q);
        }
    }

    #[test]
    fn test_origin_projects_to_zero() {
        let o = GeoPoint::new(-20.0, 57.5);
        let q = Projection::new(&o).to_plane(&o);
        assert!(q.x.abs() < 1e-9 && q.y.abs() < 1e-9);
    }

    #[test]
    fn test_distance_meridian_and_parallel() {
        let north = Mercator.distance(&GeoPoint::new(30.0, 10.0), &GeoPoint::new(31.0, 10.0));
        assert!((north - 60.0).abs() < 1e-9, "meridian {}", north);

        let east = Mercator.distance(&GeoPoint::new(60.0, 10.0), &GeoPoint::new(60.0, 11.0));
        assert!((east - 30.0).abs() < 1e-6, "parallel {}", east);
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let d = Mercator.distance(&GeoPoint::new(0.0, 179.9), &GeoPoint::new(0.0, -179.9));
        assert!((d - 12.0).abs() < 1e-6, "{}", d);
    }

    #[test]
    fn test_closest_extends_beyond_segment() {
        let p0 = GeoPoint::new(0.0, 0.0);
        let p1 = GeoPoint::new(0.0, 1.0);
        let c = Mercator.closest(&GeoPoint::new(0.1, 1.5), &p0, &p1);
        assert!((c.lon - 1.5).abs() < 1e-9 && c.lat.abs() < 1e-9, "{:?}", c);
    }

    #[test]
    fn test_intersect_circle_prefers_larger_parameter() {
        let p0 = GeoPoint::new(0.0, 0.0);
        let p1 = GeoPoint::new(0.0, 1.0);
        let w = Mercator
            .intersect_circle(&GeoPoint::new(0.0, 0.5), 6.0, &p0, &p1)
            .unwrap();
        assert!((w.lon - 0.6).abs() < 1e-6, "{:?}", w);
    }

    #[test]
    fn test_intersect_parallel_course_misses() {
        let p0 = GeoPoint::new(0.0, 0.0);
        let p1 = GeoPoint::new(0.0, 1.0);
        assert!(Mercator.intersect(&GeoPoint::new(0.1, 0.0), 90.0, &p0, &p1).is_none());
    }
}
