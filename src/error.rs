//! Error taxonomy for every fallible operation in the crate.
//!
//! Each variant keeps the legacy integer code from the reference theory
//! (spec.md §7) available through [`PropagationError::code`] for wire
//! compatibility with Vallado's test vectors; callers should match on the
//! enum, not the integer.

use thiserror::Error;

/// Failures from [`crate::tle::parse_tle`] and [`crate::tle::read_tle_file`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TleError {
    #[error("TLE line {line} is {len} bytes, expected at least 69")]
    ShortLine { line: u8, len: usize },

    #[error("TLE line {line} must start with '{expected}', found '{found}'")]
    BadLineNumber {
        line: u8,
        expected: char,
        found: char,
    },

    #[error("satellite id mismatch: line 1 has '{line1}', line 2 has '{line2}'")]
    SatelliteIdMismatch { line1: String, line2: String },

    #[error("checksum mismatch on line {line}: expected {expected}, computed {computed}")]
    BadChecksum { line: u8, expected: u32, computed: u32 },

    #[error("could not parse field '{field}' from '{value}'")]
    BadField { field: &'static str, value: String },
}

/// Failures from [`crate::tle::read_tle_file`] specifically (parse failures
/// are wrapped as [`TleError`]; this adds the I/O layer).
#[derive(Debug, Error)]
pub enum TleFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] TleError),
}

/// Failures from [`crate::sgp4::sgp4`] and the propagation-window
/// precondition checked before calling it.
#[derive(Debug, Error, PartialEq)]
pub enum PropagationError {
    /// Requested time is further than the recommended propagation window
    /// (spec.md §5: |tsince| <= 30 days) from the TLE epoch.
    #[error("requested time is {days_from_epoch:.3} days from epoch, beyond the {limit_days}-day propagation window")]
    EpochTooFar { days_from_epoch: f64, limit_days: f64 },

    /// Mean eccentricity left the valid range after the secular update.
    #[error("mean eccentricity {0} out of range (>= 1.0 or < -0.001)")]
    SubOrbitalEccentricity(f64),

    /// Mean motion reached zero or went negative.
    #[error("mean motion {0} is not positive")]
    MeanMotionBelowZero(f64),

    /// Perturbed eccentricity (post deep-space periodics) left [0, 1].
    #[error("perturbed eccentricity {0} out of [0, 1] after luni-solar periodics")]
    LuniSolarEccentricityOutOfRange(f64),

    /// Semi-latus rectum went negative.
    #[error("semi-latus rectum {0} is negative")]
    NegativeSemiLatusRectum(f64),

    /// Radius magnitude fell below the Earth's surface: satellite decayed.
    #[error("satellite has decayed: radius magnitude {0} km is below 1 Earth radius")]
    Decayed(f64),

    /// A NaN or infinite value was observed inside the stepper.
    #[error("numerical instability detected in {where_}")]
    NumericInstability { where_: &'static str },
}

impl PropagationError {
    /// Legacy integer error code from the reference theory (0 reserved for
    /// "no error", which this type never represents).
    pub fn code(&self) -> u8 {
        match self {
            PropagationError::SubOrbitalEccentricity(_) => 1,
            PropagationError::MeanMotionBelowZero(_) => 2,
            PropagationError::LuniSolarEccentricityOutOfRange(_) => 3,
            PropagationError::NegativeSemiLatusRectum(_) => 4,
            PropagationError::Decayed(_) => 6,
            PropagationError::EpochTooFar { .. } => 7,
            PropagationError::NumericInstability { .. } => 8,
        }
    }
}

/// Failures from [`crate::frame::to_geodetic`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("invalid coordinate result: lat={lat_deg}, lon={lon_deg}, alt={alt_km}")]
    InvalidCoordinate {
        lat_deg: f64,
        lon_deg: f64,
        alt_km: f64,
    },
}
