use core::fmt;

/// Simulated vessel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VesselId(pub u8);

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vessel({})", self.0)
    }
}

/// GPS fix type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsFixType {
    NoFix,
    Fix2D,
    Fix3D,
}

/// GPS fix produced by a simulator.
#[derive(Debug, Clone)]
pub struct GpsFix {
    /// Timestamp in microseconds (simulation time).
    pub timestamp_us: u64,
    /// Vessel that produced this fix.
    pub vessel_id: VesselId,
    /// Latitude in degrees.
    pub lat_deg: f64,
    /// Longitude in degrees.
    pub lon_deg: f64,
    /// Speed over ground in knots.
    pub sog_kn: f64,
    /// Course over ground in degrees true.
    pub cog_deg: f64,
    /// Fix type.
    pub fix_type: GpsFixType,
    /// Satellites used in the fix.
    pub satellites: u8,
}

/// Helm command sent to a simulator.
///
/// The simulated helmsman steers `bearing_deg` corrected by the cross-track
/// error: positive XTE turns the vessel to starboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmCommand {
    /// Timestamp in microseconds (simulation time).
    pub timestamp_us: u64,
    /// Target vessel.
    pub vessel_id: VesselId,
    /// Bearing to steer in degrees true.
    pub bearing_deg: f64,
    /// Cross-track error in nautical miles.
    pub xte_nm: f64,
}
