//! Physical and mathematical constants shared across the propagator.

use std::f64::consts::PI;

// --- mathematical operations ---
pub const SMALL: f64 = 1e-10;

// distances
pub const KM2M: f64 = 1e3;
pub const FT2M: f64 = 0.3048;
pub const MILE2M: f64 = 1609.344;
pub const NM2M: f64 = 1852.0;
pub const MILE2FT: f64 = 5280.0;
pub const MILEPH2KMPH: f64 = 0.44704;
pub const NMPH2KMPH: f64 = 0.5144444;

// time
pub const DAY2SEC: f64 = 86400.0;
pub const DAY2MIN: f64 = 1440.0;
pub const DAY2HR: f64 = 24.0;
pub const HR2SEC: f64 = 3600.0;
pub const MIN2SEC: f64 = 60.0;
pub const YR2DAY: f64 = 365.25;
pub const CENT2YR: f64 = 100.0;
pub const CENT2DAY: f64 = CENT2YR * YR2DAY;

// angles
pub const HALFPI: f64 = PI / 2.0;
pub const TWOPI: f64 = 2.0 * PI;
pub const DEG2MIN: f64 = 60.0;
pub const DEG2ARCSEC: f64 = DEG2MIN * MIN2SEC;
pub const ARCSEC2RAD: f64 = 1.0 / DEG2ARCSEC * PI / 180.0;
pub const DEG2SEC: f64 = 360.0 / DAY2SEC;
pub const DEG2HR: f64 = 360.0 / DAY2HR;
pub const HR2RAD: f64 = DEG2HR * 1.0 * PI / 180.0;

// --- astrodynamics operations ---

// time
/// Julian date of the epoch J2000.0 (noon)
pub const J2000: f64 = 2451545.0;
/// Julian date of the epoch J2000.0 in UTC (midnight)
pub const J2000_UTC: f64 = 2451544.5;
/// offset between Julian dates and Modified Julian dates
pub const JD_TO_MJD_OFFSET: f64 = 2400000.5;
/// Julian date of 1950-01-01 00:00 UTC; SGP4's internal epoch reference.
pub const JD_1950: f64 = 2433281.5;

/// Singularity guard used in `xlcof`'s denominator and the retrograde
/// inclination checks in `dpper`/`sgp4`. Verbatim per theory; not tunable.
pub const TEMP4: f64 = 1.5e-12;
/// Eccentricity floor applied after the stepper's secular update, to avoid
/// a division singularity further down the pipeline.
pub const ECC_FLOOR: f64 = 1.0e-6;

/// Recommended propagation window: callers should not trust results beyond
/// 30 days from the TLE epoch in either direction.
pub const MAX_TSINCE_DAYS: f64 = 30.0;

// EGM-08 (Earth) constants, used by callers that need them independent of
// a selected gravity model (not consumed by the propagator itself).
pub const RE: f64 = 6378.1363;
pub const FLAT: f64 = 1.0 / 298.257223563;
pub const EARTHROT: f64 = 7.292115e-5;
pub const MU: f64 = 398600.4415;
pub const MUM: f64 = 3986004415e14;
pub const J2: f64 = 0.001082626174;
pub const J4: f64 = -1.6198976e-06;

/// WGS-84 semi-major axis (km), used by the geodetic frame converter.
pub const WGS84_A: f64 = 6378.137;
/// WGS-84 flattening, used by the geodetic frame converter.
pub const WGS84_F: f64 = 1.0 / 298.257223563;

/// Selects which published set of Earth gravitational constants the
/// propagator uses. `Wgs72` matches the reference NORAD catalogue and is
/// the default (spec'd default, not Rust's `Default` convention alone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityModel {
    /// Legacy low-precision WGS-72 constants (`xke` from a fixed
    /// reciprocal rather than derived from `mu`/`radiusearthkm`).
    Wgs72Old,
    /// WGS-72, matching the original SGP4 theory and most NORAD TLEs.
    #[default]
    Wgs72,
    /// WGS-84, the modern geodetic reference ellipsoid.
    Wgs84,
}

/// Earth gravitational constants consumed by the initializer and stepper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravConst {
    pub tumin: f64,
    pub mu: f64,
    pub radius_earth_km: f64,
    pub xke: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j3oj2: f64,
}

impl GravityModel {
    /// Returns the gravitational constant table for this model, matching
    /// `getgravconst` in the reference theory.
    pub fn constants(self) -> GravConst {
        let (mu, radius_earth_km, xke, j2, j3, j4) = match self {
            GravityModel::Wgs72Old => (
                398600.79964_f64,
                6378.135_f64,
                0.0743669161_f64,
                0.001082616,
                -0.00000253881,
                -0.00000165597,
            ),
            GravityModel::Wgs72 => {
                let mu = 398600.8_f64;
                let radius_earth_km = 6378.135_f64;
                let xke = 60.0 / (radius_earth_km.powi(3) / mu).sqrt();
                (
                    mu,
                    radius_earth_km,
                    xke,
                    0.001082616,
                    -0.00000253881,
                    -0.00000165597,
                )
            }
            GravityModel::Wgs84 => {
                let mu = 398600.5_f64;
                let radius_earth_km = 6378.137_f64;
                let xke = 60.0 / (radius_earth_km.powi(3) / mu).sqrt();
                (
                    mu,
                    radius_earth_km,
                    xke,
                    0.00108262998905,
                    -0.00000253215306,
                    -0.00000161098761,
                )
            }
        };
        GravConst {
            tumin: 1.0 / xke,
            mu,
            radius_earth_km,
            xke,
            j2,
            j3,
            j4,
            j3oj2: j3 / j2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgs72_matches_published_xke() {
        let c = GravityModel::Wgs72.constants();
        assert!((c.xke - 0.07436691613317342_f64).abs() < 1e-9);
        assert!((c.j3oj2 - (-0.00000253881 / 0.001082616)).abs() < 1e-12);
    }

    #[test]
    fn default_model_is_wgs72() {
        assert_eq!(GravityModel::default(), GravityModel::Wgs72);
    }
}
