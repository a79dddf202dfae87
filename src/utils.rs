//! Numeric utilities the propagator depends on: calendar/Julian-date
//! conversions, Greenwich Mean Sidereal Time, angle normalization, and the
//! TLE-specific scientific-notation decoders.

use std::f64::consts::PI;

use crate::constants::TWOPI;

pub fn radians(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn degrees(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Vallado's closed-form Julian date, split into a day count and a sub-day
/// fraction so the fraction keeps its precision. `hour`/`minute` should be
/// whole; `second` may carry a fractional part.
///
/// If the resulting fraction's magnitude exceeds 1 (pathological inputs:
/// `hour`/`minute`/`second` outside their normal ranges), the excess whole
/// days are folded into the day count.
pub fn jday(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: f64) -> (f64, f64) {
    let mut jd = 367.0 * year as f64
        - (7.0 * (year as f64 + ((month + 9) as f64 / 12.0).floor()) * 0.25).floor()
        + (275.0 * month as f64 / 9.0).floor()
        + day as f64
        + 1721013.5;

    let mut jd_frac = (second + minute as f64 * 60.0 + hour as f64 * 3600.0) / 86400.0;

    if jd_frac.abs() > 1.0 {
        let whole = jd_frac.floor();
        jd += whole;
        jd_frac -= whole;
    }

    (jd, jd_frac)
}

/// Greenwich Mean Sidereal Time from the 1982 IAU series, in `[0, 2*pi)`.
/// `jd_ut1` is a full Julian date (day count + fraction already combined).
pub fn gstime(jd_ut1: f64) -> f64 {
    let tut1 = (jd_ut1 - 2451545.0) / 36525.0;

    let mut temp = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093104 * tut1 * tut1
        + (876600.0 * 3600.0 + 8640184.812866) * tut1
        + 67310.54841;

    // 360/86400 = 1/240: seconds of time -> degrees -> radians
    temp = (temp * PI / 180.0 / 240.0) % TWOPI;

    if temp < 0.0 {
        temp += TWOPI;
    }

    temp
}

/// Whether `year` is a leap year (divisible by 400, or by 4 but not 100).
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

fn day_of_year_to_month_day(day_of_year: i32, leap: bool) -> (i32, i32) {
    let mut days_in_month = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if leap {
        days_in_month[1] = 29;
    }

    let mut remaining = day_of_year;
    for (i, days) in days_in_month.iter().enumerate() {
        if remaining <= *days {
            return (i as i32 + 1, remaining);
        }
        remaining -= days;
    }
    // Overran December on malformed input; clamp into it rather than panic.
    (12, remaining + 31)
}

/// Inverts a fractional day-of-year into calendar month/day/hour/min/sec.
/// Adds half a microsecond before rounding seconds to compensate for float
/// drift, matching the reference theory.
pub fn days2mdhms(year: i32, days: f64) -> (i32, i32, i32, i32, f64) {
    let whole = days.floor();
    let mut fraction = days - whole;

    let (month, day) = day_of_year_to_month_day(whole as i32, is_leap_year(year));

    fraction += 0.5 / 86_400_000_000.0;

    let seconds_total = fraction * 86400.0;
    let total_minutes = (seconds_total / 60.0).floor();
    let mut second = seconds_total % 60.0;
    let hour = (total_minutes / 60.0) as i32;
    let minute = (total_minutes as i32) % 60;

    second = (second * 1e6).floor() / 1e6;

    (month, day, hour, minute, second)
}

/// Normalizes a degree value into `(-180, 180]`.
pub fn normalize_angle(deg: f64) -> f64 {
    let mut a = deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Normalizes a radian value into `[0, 2*pi)`.
pub fn mod_twopi(rad: f64) -> f64 {
    let mut a = rad % TWOPI;
    if a < 0.0 {
        a += TWOPI;
    }
    a
}

/// Decodes a TLE scientific-notation field such as `"-11606-4"` or
/// `" 00000-0"` into a plain `f64` (`-0.11606e-4` and `0.0`, respectively).
///
/// The field's last two characters are the signed decimal exponent; the
/// remainder is the mantissa. If the mantissa has no explicit decimal
/// point, one is inserted immediately after the leading (optionally
/// signed) digit, per the NORAD TLE convention.
pub fn decode_exponential(field: &str) -> Result<f64, std::num::ParseFloatError> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let (mantissa_raw, exponent) = trimmed.split_at(trimmed.len() - 2);

    let has_sign = mantissa_raw.starts_with('-') || mantissa_raw.starts_with('+');
    let mantissa = if mantissa_raw.contains('.') {
        mantissa_raw.to_string()
    } else if has_sign {
        format!("{}.{}", &mantissa_raw[..1], &mantissa_raw[1..])
    } else {
        format!(".{}", mantissa_raw)
    };

    let value: f64 = mantissa.parse()?;
    let exp: i32 = exponent.parse()?;
    Ok(value * 10f64.powi(exp))
}

/// Decodes a TLE implicit-leading-`0.` eccentricity field such as
/// `"0006703"` into `0.0006703`.
pub fn decode_eccentricity(field: &str) -> Result<f64, std::num::ParseFloatError> {
    format!("0.{}", field.trim()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_radians() {
        assert_eq!(radians(0.0), 0.0);
        assert_eq!(radians(90.0), PI / 2.0);
        assert_eq!(radians(45.0), PI / 4.0);
        assert_eq!(radians(270.0), 3.0 * PI / 2.0);
    }

    #[test]
    fn test_degrees() {
        assert_eq!(degrees(0.0), 0.0);
        assert_eq!(degrees(PI / 2.0), 90.0);
        assert_eq!(degrees(3.0 * PI / 2.0), 270.0);
    }

    #[test]
    fn jday_matches_known_epoch() {
        // 2008-09-20 12:25:40.26432 UTC (ISS ZARYA epoch, scenario A)
        let (jd, jd_frac) = jday(2008, 9, 20, 12, 25, 40.26432);
        assert_abs_diff_eq!(jd + jd_frac, 2454730.0178287778, epsilon = 1e-6);
    }

    #[test]
    fn jday_folds_out_of_range_fraction() {
        let (jd, jd_frac) = jday(2020, 1, 1, 25, 0, 0.0);
        assert!(jd_frac.abs() <= 1.0);
        assert_abs_diff_eq!(jd + jd_frac, jday(2020, 1, 2, 1, 0, 0.0).0, epsilon = 1e-9);
    }

    #[test]
    fn gstime_is_within_range() {
        let g = gstime(2454730.5);
        assert!((0.0..TWOPI).contains(&g));
    }

    #[test]
    fn days2mdhms_round_trips_day_of_year() {
        let (month, day, hour, minute, second) = days2mdhms(2008, 264.51782528);
        assert_eq!((month, day, hour), (9, 20, 12));
        assert_eq!(minute, 25);
        assert_abs_diff_eq!(second, 40.26432, epsilon = 1e-3);
    }

    #[test]
    fn days2mdhms_handles_leap_year_day() {
        // day 60 of a leap year is Feb 29; day 60 of a non-leap year is Mar 1.
        let (month, day, ..) = days2mdhms(2020, 60.0);
        assert_eq!((month, day), (2, 29));
        let (month, day, ..) = days2mdhms(2021, 60.0);
        assert_eq!((month, day), (3, 1));
    }

    #[test]
    fn normalize_angle_wraps_into_range() {
        assert_abs_diff_eq!(normalize_angle(190.0), -170.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_angle(-190.0), 170.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_angle(180.0), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn mod_twopi_wraps_negative() {
        assert_abs_diff_eq!(mod_twopi(-0.1), TWOPI - 0.1, epsilon = 1e-12);
    }

    #[test]
    fn decode_exponential_matches_spec_example() {
        assert_abs_diff_eq!(
            decode_exponential("-11606-4").unwrap(),
            -0.11606e-4,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(decode_exponential(" 00000-0").unwrap(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            decode_exponential("12345-3").unwrap(),
            0.12345e-3,
            epsilon = 1e-15
        );
    }

    #[test]
    fn decode_eccentricity_matches_spec_example() {
        assert_abs_diff_eq!(
            decode_eccentricity("0006703").unwrap(),
            0.0006703,
            epsilon = 1e-15
        );
    }
}
