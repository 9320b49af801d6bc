//! Magnetic bearing correction

use crate::geo::great_circle::resolve_around;

/// Apply a declination to a true bearing
///
/// Returns `bearing + declination` resolved into
/// `[declination - 180, declination + 180)`. Non-finite inputs pass through.
pub fn apply_declination(bearing_deg: f64, declination_deg: f64) -> f64 {
    resolve_around(bearing_deg + declination_deg, declination_deg)
}
