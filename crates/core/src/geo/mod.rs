//! Geometry kernel
//!
//! Latitude/longitude geometry used by route following. Two backends
//! implement the same [`GeometryBackend`] contract:
//!
//! - [`Spherical`]: great-circle geometry on the unit sphere
//! - [`Mercator`]: planar algebra in a secant Mercator projection centred on
//!   the query position (fast, accurate over short distances)
//!
//! The backend is chosen once per session through [`Geometry`] and passed by
//! reference into the route loader, lookahead search and navigation engine.
//!
//! All distances are nautical miles, all bearings degrees true.

pub mod great_circle;
pub mod mercator;
pub mod spherical;
mod vector;

pub use mercator::Mercator;
pub use spherical::Spherical;

/// Geographic position in degrees
///
/// Equality is exact-value; it is only used for identity checks, never for
/// convergence tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to +90)
    pub lat: f64,
    /// Longitude in degrees (-180 to +180)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new position
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True if both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// True if the coordinates are finite and within the valid ranges
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }
}

/// Geometry operations shared by both backends
///
/// Results that cannot be computed (coincident or antipodal inputs) come back
/// as `None` from the fallible operations; the infallible ones may return one
/// of the input endpoints instead.
pub trait GeometryBackend {
    /// Distance between two positions in nautical miles
    fn distance(&self, p0: &GeoPoint, p1: &GeoPoint) -> f64;

    /// Point on the infinite line (great circle) through `p0`, `p1` nearest to `p`
    ///
    /// Undefined when `p0 == p1`; implementations return an endpoint.
    fn closest(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint;

    /// Point on the segment `[p0, p1]` nearest to `p`
    fn closest_seg(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint;

    /// Point where the segment `[p0, p1]` crosses the circle of radius
    /// `radius_nm` centred on `p`
    ///
    /// When the circle crosses the segment twice the crossing nearer `p1` is
    /// returned.
    fn intersect_circle(
        &self,
        p: &GeoPoint,
        radius_nm: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint>;

    /// Point where the ray from `p` along `bearing_deg` crosses `[p0, p1]`
    fn intersect(
        &self,
        p: &GeoPoint,
        bearing_deg: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint>;
}

/// Geometry model selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeometryKind {
    /// Great-circle computations on a sphere
    Spherical,
    /// Local secant Mercator projection
    #[default]
    Mercator,
}

impl GeometryKind {
    /// Convert a parameter value (0 = spherical, 1 = Mercator)
    pub fn from_param(value: i32) -> Option<Self> {
        match value {
            0 => Some(GeometryKind::Spherical),
            1 => Some(GeometryKind::Mercator),
            _ => None,
        }
    }

    /// Parameter value for this model
    pub fn as_param(self) -> i32 {
        match self {
            GeometryKind::Spherical => 0,
            GeometryKind::Mercator => 1,
        }
    }
}

/// Session geometry backend, constructed once from configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    Spherical(Spherical),
    Mercator(Mercator),
}

impl Geometry {
    /// Build the backend for a geometry model
    pub fn new(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Spherical => Geometry::Spherical(Spherical),
            GeometryKind::Mercator => Geometry::Mercator(Mercator),
        }
    }

    /// Which model this backend implements
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Spherical(_) => GeometryKind::Spherical,
            Geometry::Mercator(_) => GeometryKind::Mercator,
        }
    }

    fn backend(&self) -> &dyn GeometryBackend {
        match self {
            Geometry::Spherical(g) => g,
            Geometry::Mercator(g) => g,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(GeometryKind::default())
    }
}

impl GeometryBackend for Geometry {
    fn distance(&self, p0: &GeoPoint, p1: &GeoPoint) -> f64 {
        self.backend().distance(p0, p1)
    }

    fn closest(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint {
        self.backend().closest(p, p0, p1)
    }

    fn closest_seg(&self, p: &GeoPoint, p0: &GeoPoint, p1: &GeoPoint) -> GeoPoint {
        self.backend().closest_seg(p, p0, p1)
    }

    fn intersect_circle(
        &self,
        p: &GeoPoint,
        radius_nm: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint> {
        self.backend().intersect_circle(p, radius_nm, p0, p1)
    }

    fn intersect(
        &self,
        p: &GeoPoint,
        bearing_deg: f64,
        p0: &GeoPoint,
        p1: &GeoPoint,
    ) -> Option<GeoPoint> {
        self.backend().intersect(p, bearing_deg, p0, p1)
    }
}

/// Replace NaN or infinite values with a fallback
pub fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
