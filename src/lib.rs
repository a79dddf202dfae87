//! SGP4/SDP4 mean-element orbit propagator.
//!
//! Parses NORAD Two-Line Element sets, initializes and steps the
//! near-Earth (SGP4) or deep-space (SDP4) propagator, and converts the
//! resulting TEME position into WGS-84 geodetic coordinates.
//!
//! ```
//! use sgp4_rust::{new_satellite, parse_tle, propagate, GravityModel, OperationMode};
//!
//! let line1 = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
//! let line2 = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
//! let tle = parse_tle(Some("ISS (ZARYA)"), line1, line2).unwrap();
//! let mut sat = new_satellite(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
//! let (position_km, velocity_km_s) = propagate(&mut sat, 90.0).unwrap();
//! assert!(position_km[0].is_finite());
//! ```

pub mod constants;
pub mod deepspace;
pub mod error;
pub mod frame;
pub mod satellite;
pub mod sgp4;
pub mod tle;
pub mod utils;

pub use constants::GravityModel;
pub use error::{FrameError, PropagationError, TleError, TleFileError};
pub use frame::GeodeticPosition;
pub use satellite::{OperationMode, SatelliteState};
pub use tle::TleRecord;

use chrono::{DateTime, Utc};

/// Parses a name line and two fixed-column TLE lines into a validated
/// [`TleRecord`] (spec.md §6).
pub fn parse_tle(name: Option<&str>, line1: &str, line2: &str) -> Result<TleRecord, TleError> {
    tle::parse_tle(name, line1, line2)
}

/// Reads every complete TLE record from a file (spec.md §6).
pub fn read_tle_file<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<TleRecord>, TleFileError> {
    tle::read_tle_file(path)
}

/// Builds a fully initialized [`SatelliteState`] from a parsed TLE
/// (spec.md §6).
pub fn new_satellite(
    tle_record: &TleRecord,
    gravity_model: GravityModel,
    operation_mode: OperationMode,
) -> Result<SatelliteState, PropagationError> {
    sgp4::sgp4_init(tle_record, gravity_model, operation_mode)
}

/// Steps `sat` to `tsince_minutes` minutes from its TLE epoch, returning
/// the TEME position (km) and velocity (km/s) (spec.md §6).
pub fn propagate(
    sat: &mut SatelliteState,
    tsince_minutes: f64,
) -> Result<([f64; 3], [f64; 3]), PropagationError> {
    sgp4::sgp4(sat, tsince_minutes)
}

/// Steps `sat` to an absolute UTC instant, computing `tsince_minutes` from
/// the satellite's stored epoch (spec.md §6). A thin convenience wrapper
/// over [`propagate`] for callers who think in wall-clock time rather than
/// minutes-since-epoch.
pub fn propagate_at(
    sat: &mut SatelliteState,
    instant: DateTime<Utc>,
) -> Result<([f64; 3], [f64; 3]), PropagationError> {
    let jd_target = instant.timestamp() as f64 / constants::DAY2SEC + 2440587.5;
    let jd_epoch = sat.jdsatepoch + sat.jdsatepochf;
    let tsince_minutes = (jd_target - jd_epoch) * constants::DAY2MIN;
    propagate(sat, tsince_minutes)
}

/// Converts a propagated TEME position into WGS-84 geodetic latitude,
/// longitude, and altitude (spec.md §6). `jd_ut1` is the full Julian date
/// at which `position_teme_km` was computed.
pub fn to_geodetic(position_teme_km: [f64; 3], jd_ut1: f64) -> Result<GeodeticPosition, FrameError> {
    frame::to_geodetic(position_teme_km, jd_ut1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_L1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_L2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn end_to_end_parse_propagate_and_convert() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let mut sat = new_satellite(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        let (r, _v) = propagate(&mut sat, 90.0).unwrap();
        let jd_ut1 = sat.jdsatepoch + sat.jdsatepochf + 90.0 / constants::DAY2MIN;
        let geo = to_geodetic(r, jd_ut1).unwrap();
        assert!(geo.latitude_deg.abs() <= 90.0);
        assert!(geo.longitude_deg > -180.0 && geo.longitude_deg <= 180.0);
        assert!(geo.altitude_km > 300.0 && geo.altitude_km < 500.0);
    }

    #[test]
    fn propagate_at_matches_equivalent_minute_offset() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let mut sat_a = new_satellite(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        let mut sat_b = new_satellite(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();

        let (r_direct, _) = propagate(&mut sat_a, 60.0).unwrap();

        let jd_epoch = sat_b.jdsatepoch + sat_b.jdsatepochf;
        let jd_target = jd_epoch + 60.0 / constants::DAY2MIN;
        let unix_secs = (jd_target - 2440587.5) * constants::DAY2SEC;
        let instant = DateTime::<Utc>::from_timestamp(unix_secs as i64, 0).unwrap();

        let (r_at, _) = propagate_at(&mut sat_b, instant).unwrap();
        for i in 0..3 {
            assert!((r_direct[i] - r_at[i]).abs() < 1.0, "component {i} diverged");
        }
    }
}
