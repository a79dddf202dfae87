//! Coordinate frame conversion: TEME -> ECEF -> WGS-84 geodetic (spec.md
//! §4.6).
//!
//! Grounded on `pkg/coordinates/transform.go`'s `TEMEToECEF`/`ECIToLLA`
//! under `examples/original_source` -- the geodetic-only routine, not the
//! `utils/helpers.go` variant that also emits a vis-viva speed estimate
//! (resolved open question, `SPEC_FULL.md` §3).

use crate::constants::{WGS84_A, WGS84_F};
use crate::error::FrameError;
use crate::utils::normalize_angle;

/// Earth's mean rotation rate, rad/s (WGS-84).
const OMEGA_EARTH: f64 = 7.2921151467e-5;

/// A geodetic position: latitude and longitude in degrees, altitude in km
/// above the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Rotates a TEME position (km) into ECEF using the Julian date's Earth
/// rotation angle about the mean equinox (spec.md §4.6).
pub fn teme_to_ecef(pos_teme: [f64; 3], jd_ut1: f64) -> [f64; 3] {
    let theta = OMEGA_EARTH * ((jd_ut1 - 2451545.0) * 86400.0);
    let (sin_t, cos_t) = theta.sin_cos();

    [
        cos_t * pos_teme[0] + sin_t * pos_teme[1],
        -sin_t * pos_teme[0] + cos_t * pos_teme[1],
        pos_teme[2],
    ]
}

/// Converts a TEME position (km) directly to WGS-84 geodetic latitude,
/// longitude, and altitude, via an intermediate ECEF rotation and
/// Bowring's iterative inversion (spec.md §4.6). Returns
/// [`FrameError::InvalidCoordinate`] if the iteration produces a
/// non-finite result.
pub fn to_geodetic(pos_teme: [f64; 3], jd_ut1: f64) -> Result<GeodeticPosition, FrameError> {
    let ecef = teme_to_ecef(pos_teme, jd_ut1);
    let [x, y, z] = ecef;

    let e2 = WGS84_F * (2.0 - WGS84_F);
    let r = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    let mut lat = z.atan2(r);
    let mut alt = 0.0;
    for _ in 0..10 {
        let n = WGS84_A / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        alt = r / lat.cos() - n;
        let new_lat = (z + n * e2 * lat.sin()).atan2(r);
        if (new_lat - lat).abs() < 1e-12 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }

    let lat_deg = lat.to_degrees();
    let lon_deg = normalize_angle(lon.to_degrees());

    if !lat_deg.is_finite() || !lon_deg.is_finite() || !alt.is_finite() {
        return Err(FrameError::InvalidCoordinate {
            lat_deg,
            lon_deg,
            alt_km: alt,
        });
    }

    Ok(GeodeticPosition {
        latitude_deg: lat_deg,
        longitude_deg: lon_deg,
        altitude_km: alt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn equatorial_point_on_prime_meridian_at_j2000() {
        // At jd=2451545.0 the rotation angle is zero, so TEME == ECEF.
        let pos = [7000.0, 0.0, 0.0];
        let geo = to_geodetic(pos, 2451545.0).unwrap();
        assert_abs_diff_eq!(geo.latitude_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geo.longitude_deg, 0.0, epsilon = 1e-9);
        assert!(geo.altitude_km > 0.0);
    }

    #[test]
    fn polar_point_has_latitude_near_90() {
        let pos = [0.0, 0.0, 7000.0];
        let geo = to_geodetic(pos, 2451545.0).unwrap();
        assert_abs_diff_eq!(geo.latitude_deg, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn teme_to_ecef_rotates_by_earth_angle() {
        let pos = [7000.0, 0.0, 0.0];
        let rotated = teme_to_ecef(pos, 2451545.5);
        // at half a day past J2000 the rotation angle is nonzero, so x and y move.
        assert!(rotated[0] != pos[0] || rotated[1] != pos[1]);
        let mag = (rotated[0] * rotated[0] + rotated[1] * rotated[1]).sqrt();
        assert_abs_diff_eq!(mag, 7000.0, epsilon = 1e-9);
    }

    #[test]
    fn longitude_normalizes_into_plus_minus_180() {
        let pos = [-7000.0, -0.001, 100.0];
        let geo = to_geodetic(pos, 2451545.0).unwrap();
        assert!(geo.longitude_deg > -180.0 && geo.longitude_deg <= 180.0);
    }
}
