//! Navigation mode selection
//!
//! Parameter values follow the numbering used by existing configuration
//! files, including the retired boundary XTE mode (value 1).

/// Steering strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavMode {
    /// Steer the arrival bearing of the current waypoint, correcting by XTE
    StandardXte,
    /// Steer directly at the current waypoint
    WaypointBearing,
    /// Steer at a lookahead point along the route
    #[default]
    RoutePositionBearing,
}

/// Parameter value of the retired boundary XTE mode
pub const BOUNDARY_XTE_PARAM: i32 = 1;

impl NavMode {
    /// Convert a parameter value, `None` for unknown or retired modes
    pub fn from_param(value: i32) -> Option<Self> {
        match value {
            0 => Some(NavMode::StandardXte),
            2 => Some(NavMode::WaypointBearing),
            3 => Some(NavMode::RoutePositionBearing),
            _ => None,
        }
    }

    /// Convert a parameter value, falling back to [`NavMode::RoutePositionBearing`]
    pub fn from_param_or_default(value: i32) -> Self {
        Self::from_param(value).unwrap_or_default()
    }

    /// Parameter value for this mode
    pub fn as_param(self) -> i32 {
        match self {
            NavMode::StandardXte => 0,
            NavMode::WaypointBearing => 2,
            NavMode::RoutePositionBearing => 3,
        }
    }

    /// True for modes driven by waypoint advancement
    pub fn uses_advancement(self) -> bool {
        matches!(self, NavMode::StandardXte | NavMode::WaypointBearing)
    }
}

/// How the lookahead distance is chosen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LookaheadMode {
    /// Fixed distance
    #[default]
    Distance,
    /// Distance covered at the average speed in a fixed time
    Time,
}

impl LookaheadMode {
    pub fn from_param(value: i32) -> Option<Self> {
        match value {
            0 => Some(LookaheadMode::Distance),
            1 => Some(LookaheadMode::Time),
            _ => None,
        }
    }

    pub fn as_param(self) -> i32 {
        match self {
            LookaheadMode::Distance => 0,
            LookaheadMode::Time => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_param_round_trip() {
        for mode in [
            NavMode::StandardXte,
            NavMode::WaypointBearing,
            NavMode::RoutePositionBearing,
        ] {
            assert_eq!(NavMode::from_param(mode.as_param()), Some(mode));
        }
    }

    #[test]
    fn test_boundary_and_unknown_fall_back() {
        assert_eq!(NavMode::from_param(BOUNDARY_XTE_PARAM), None);
        assert_eq!(
            NavMode::from_param_or_default(BOUNDARY_XTE_PARAM),
            NavMode::RoutePositionBearing
        );
        assert_eq!(NavMode::from_param_or_default(-4), NavMode::RoutePositionBearing);
        assert_eq!(NavMode::from_param_or_default(42), NavMode::RoutePositionBearing);
    }

    #[test]
    fn test_uses_advancement() {
        assert!(NavMode::StandardXte.uses_advancement());
        assert!(NavMode::WaypointBearing.uses_advancement());
        assert!(!NavMode::RoutePositionBearing.uses_advancement());
    }

    #[test]
    fn test_lookahead_mode_param() {
        assert_eq!(LookaheadMode::from_param(0), Some(LookaheadMode::Distance));
        assert_eq!(LookaheadMode::from_param(1), Some(LookaheadMode::Time));
        assert_eq!(LookaheadMode::from_param(2), None);
        assert_eq!(LookaheadMode::Time.as_param(), 1);
    }
}
