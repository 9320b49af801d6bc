//! Speed over ground low-pass filter
//!
//! Smooths the vessel's speed for time-based lookahead so a single noisy fix
//! does not move the steering point.

/// Default weight given to each new SOG sample
pub const DEFAULT_SOG_ALPHA: f64 = 0.1;

/// Fixes with this many satellites or fewer do not update the average
pub const MIN_SATELLITES: u8 = 3;

/// Exponential moving average of speed over ground.
///
/// Starts at zero and converges toward the true speed:
/// `avg = avg * (1 - alpha) + sog * alpha`.
///
/// # Configuration
/// - `alpha = 1.0`: no filtering (pass-through)
/// - `alpha = 0.1`: heavy smoothing (default)
/// - `alpha = 0.0`: holds the initial value indefinitely
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SogFilter {
    alpha: f64,
    average: f64,
}

impl SogFilter {
    /// Create a new SogFilter with the given smoothing factor.
    ///
    /// Alpha is clamped to [0.0, 1.0]. Lower alpha = more smoothing.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { DEFAULT_SOG_ALPHA },
            average: 0.0,
        }
    }

    /// Apply the filter to a SOG sample (knots) and return the new average.
    ///
    /// Non-finite or negative samples are ignored.
    pub fn apply(&mut self, sog_kn: f64) -> f64 {
        if sog_kn.is_finite() && sog_kn >= 0.0 {
            self.average = self.average * (1.0 - self.alpha) + sog_kn * self.alpha;
        }
        self.average
    }

    /// Apply a sample only when the fix has enough satellites to be trusted.
    pub fn update(&mut self, sog_kn: f64, satellites: u8) -> f64 {
        if satellites > MIN_SATELLITES {
            self.apply(sog_kn)
        } else {
            self.average
        }
    }

    /// Current average in knots.
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Reset the average to zero.
    pub fn reset(&mut self) {
        self.average = 0.0;
    }
}

impl Default for SogFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SOG_ALPHA)
    }
}
