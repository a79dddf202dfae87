//! Fixed-column lexer and validator for the three-line NORAD TLE record
//! (spec.md §3, §4.1).

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{TleError, TleFileError};
use crate::utils::{decode_eccentricity, decode_exponential};

/// Orbit classification character in TLE line 1 column 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Unclassified,
    Classified,
    Secret,
}

impl Classification {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(Classification::Unclassified),
            'C' => Some(Classification::Classified),
            'S' => Some(Classification::Secret),
            _ => None,
        }
    }
}

/// A fully parsed and validated Two-Line Element set (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct TleRecord {
    pub name: Option<String>,

    // line 1
    pub satellite_number: u32,
    pub classification: Classification,
    pub intl_designator: String,
    pub epoch_year: i32,
    pub epoch_day: f64,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,
    pub bstar: f64,
    pub ephemeris_type: u8,
    pub element_set_number: u32,

    // line 2
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion: f64,
    pub revolution_number: u32,
}

/// Decodes the five-character NORAD catalogue field, including the Alpha-5
/// overflow extension: a leading letter (skipping `I` and `O`) replaces the
/// leading digit with a two-digit prefix, extending the range past 99999
/// (spec.md §3; supplemented per `SPEC_FULL.md` §3).
fn decode_satellite_number(field: &str) -> Result<u32, TleError> {
    let field = field.trim();
    if field.is_empty() {
        return Err(TleError::BadField {
            field: "satellite_number",
            value: field.to_string(),
        });
    }

    let first = field.chars().next().unwrap();
    if first.is_ascii_alphabetic() {
        let upper = first.to_ascii_uppercase();
        if upper == 'I' || upper == 'O' {
            return Err(TleError::BadField {
                field: "satellite_number",
                value: field.to_string(),
            });
        }
        // NORAD Alpha-5: I and O are skipped from the letter sequence, so
        // each threshold crossed shifts the position down by one.
        let mut pos = (upper as u32) - ('A' as u32);
        if upper > 'I' {
            pos -= 1;
        }
        if upper > 'O' {
            pos -= 1;
        }
        let prefix = 10 + pos;
        let rest: u32 = field[1..]
            .parse()
            .map_err(|_| TleError::BadField {
                field: "satellite_number",
                value: field.to_string(),
            })?;
        Ok(prefix * 10000 + rest)
    } else {
        field.parse().map_err(|_| TleError::BadField {
            field: "satellite_number",
            value: field.to_string(),
        })
    }
}

/// `(sum of digits + count of '-') mod 10` over columns 1-68, compared to
/// column 69 (spec.md §3).
fn line_checksum(line: &str) -> u32 {
    let bytes = line.as_bytes();
    let mut sum: u32 = 0;
    for &b in &bytes[0..68] {
        if b == b'-' {
            sum += 1;
        } else if b.is_ascii_digit() {
            sum += (b - b'0') as u32;
        }
    }
    sum % 10
}

fn field(line: &str, start: usize, end: usize) -> &str {
    &line[start..end]
}

/// Resolves a TLE two-digit epoch year into a full calendar year: `< 57`
/// maps to the 2000s, otherwise the 1900s. This is the 40-year sliding
/// window NORAD has used since the 1990s (spec.md §4.1, §9 open question;
/// carried verbatim rather than re-derived, per `SPEC_FULL.md` §3).
fn resolve_epoch_year(two_digit: i32) -> i32 {
    if two_digit < 57 {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

/// Parses a name line and two fixed-column TLE lines into a validated
/// [`TleRecord`]. Both `line1` and `line2` must be at least 69 bytes.
pub fn parse_tle(name: Option<&str>, line1: &str, line2: &str) -> Result<TleRecord, TleError> {
    if line1.len() < 69 {
        return Err(TleError::ShortLine {
            line: 1,
            len: line1.len(),
        });
    }
    if line2.len() < 69 {
        return Err(TleError::ShortLine {
            line: 2,
            len: line2.len(),
        });
    }

    let l1_start = line1.chars().next().unwrap();
    if l1_start != '1' {
        return Err(TleError::BadLineNumber {
            line: 1,
            expected: '1',
            found: l1_start,
        });
    }
    let l2_start = line2.chars().next().unwrap();
    if l2_start != '2' {
        return Err(TleError::BadLineNumber {
            line: 2,
            expected: '2',
            found: l2_start,
        });
    }

    let id1 = field(line1, 2, 7);
    let id2 = field(line2, 2, 7);
    if id1 != id2 {
        return Err(TleError::SatelliteIdMismatch {
            line1: id1.to_string(),
            line2: id2.to_string(),
        });
    }

    let computed1 = line_checksum(line1);
    let expected1: u32 = field(line1, 68, 69)
        .parse()
        .map_err(|_| TleError::BadField {
            field: "checksum",
            value: field(line1, 68, 69).to_string(),
        })?;
    if computed1 != expected1 {
        return Err(TleError::BadChecksum {
            line: 1,
            expected: expected1,
            computed: computed1,
        });
    }

    let computed2 = line_checksum(line2);
    let expected2: u32 = field(line2, 68, 69)
        .parse()
        .map_err(|_| TleError::BadField {
            field: "checksum",
            value: field(line2, 68, 69).to_string(),
        })?;
    if computed2 != expected2 {
        return Err(TleError::BadChecksum {
            line: 2,
            expected: expected2,
            computed: computed2,
        });
    }

    let satellite_number = decode_satellite_number(field(line1, 2, 7))?;
    let classification = Classification::from_char(line1.chars().nth(7).unwrap_or('U'))
        .unwrap_or(Classification::Unclassified);
    let intl_designator = field(line1, 9, 17).trim().to_string();
    let epoch_year = resolve_epoch_year(field(line1, 18, 20).trim().parse().map_err(|_| {
        TleError::BadField {
            field: "epoch_year",
            value: field(line1, 18, 20).to_string(),
        }
    })?);
    let epoch_day: f64 = field(line1, 20, 32)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "epoch_day",
            value: field(line1, 20, 32).to_string(),
        })?;

    let ndot_raw = field(line1, 33, 43).trim();
    let mean_motion_dot: f64 = ndot_raw.parse().map_err(|_| TleError::BadField {
        field: "mean_motion_dot",
        value: ndot_raw.to_string(),
    })?;

    let mean_motion_ddot = decode_exponential(field(line1, 44, 52)).map_err(|_| TleError::BadField {
        field: "mean_motion_ddot",
        value: field(line1, 44, 52).to_string(),
    })?;

    let bstar = decode_exponential(field(line1, 53, 61)).map_err(|_| TleError::BadField {
        field: "bstar",
        value: field(line1, 53, 61).to_string(),
    })?;

    let ephemeris_type: u8 = field(line1, 62, 63)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "ephemeris_type",
            value: field(line1, 62, 63).to_string(),
        })?;

    let element_set_number: u32 = field(line1, 64, 68)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "element_set_number",
            value: field(line1, 64, 68).to_string(),
        })?;

    let inclination_deg: f64 = field(line2, 8, 16)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "inclination",
            value: field(line2, 8, 16).to_string(),
        })?;
    let raan_deg: f64 = field(line2, 17, 25)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "raan",
            value: field(line2, 17, 25).to_string(),
        })?;
    let eccentricity = decode_eccentricity(field(line2, 26, 33)).map_err(|_| TleError::BadField {
        field: "eccentricity",
        value: field(line2, 26, 33).to_string(),
    })?;
    let arg_perigee_deg: f64 = field(line2, 34, 42)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "arg_perigee",
            value: field(line2, 34, 42).to_string(),
        })?;
    let mean_anomaly_deg: f64 = field(line2, 43, 51)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "mean_anomaly",
            value: field(line2, 43, 51).to_string(),
        })?;
    let mean_motion: f64 = field(line2, 52, 63)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "mean_motion",
            value: field(line2, 52, 63).to_string(),
        })?;
    let revolution_number: u32 = field(line2, 63, 68)
        .trim()
        .parse()
        .map_err(|_| TleError::BadField {
            field: "revolution_number",
            value: field(line2, 63, 68).to_string(),
        })?;

    debug!(satellite_number, ?classification, "parsed TLE record");

    Ok(TleRecord {
        name: name.map(|n| n.trim().to_string()),
        satellite_number,
        classification,
        intl_designator,
        epoch_year,
        epoch_day,
        mean_motion_dot,
        mean_motion_ddot,
        bstar,
        ephemeris_type,
        element_set_number,
        inclination_deg,
        raan_deg,
        eccentricity,
        arg_perigee_deg,
        mean_anomaly_deg,
        mean_motion,
        revolution_number,
    })
}

/// Scans a file for three-line TLE records: a line starting with `"1 "`
/// opens a record, one starting with `"2 "` closes it, any other
/// non-blank line is the satellite name for the next record (spec.md
/// §4.1).
pub fn read_tle_file<P: AsRef<Path>>(path: P) -> Result<Vec<TleRecord>, TleFileError> {
    let contents = fs::read_to_string(path)?;

    let mut records = Vec::new();
    let mut pending_name: Option<String> = None;
    let mut pending_line1: Option<String> = None;

    for raw_line in contents.lines() {
        let line = raw_line.trim_end_matches('\r');
        if line.starts_with("1 ") {
            pending_line1 = Some(line.to_string());
        } else if line.starts_with("2 ") {
            let line1 = pending_line1.take().ok_or_else(|| {
                TleFileError::Parse(TleError::BadLineNumber {
                    line: 1,
                    expected: '1',
                    found: line.chars().next().unwrap_or(' '),
                })
            })?;
            let record = parse_tle(pending_name.as_deref(), &line1, line)?;
            records.push(record);
            pending_name = None;
        } else if !line.trim().is_empty() {
            pending_name = Some(line.to_string());
        }
    }

    if records.is_empty() {
        warn!("TLE file contained no complete records");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_L1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_L2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn parses_scenario_a_iss() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        assert_eq!(tle.satellite_number, 25544);
        assert_eq!(tle.epoch_year, 2008);
        assert!((tle.epoch_day - 264.51782528).abs() < 1e-9);
        assert!((tle.eccentricity - 0.0006703).abs() < 1e-9);
        assert!((tle.inclination_deg - 51.6416).abs() < 1e-9);
        assert!((tle.mean_motion - 15.72125391).abs() < 1e-7);
        assert_eq!(tle.revolution_number, 56353);
    }

    #[test]
    fn scenario_e_bad_checksum_is_rejected() {
        // last digit of line 1 altered from 7 to 8
        let bad_l1 =
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2928";
        let err = parse_tle(Some(ISS_NAME), bad_l1, ISS_L2).unwrap_err();
        assert!(matches!(err, TleError::BadChecksum { line: 1, .. }));
    }

    #[test]
    fn rejects_short_lines() {
        let err = parse_tle(None, "1 25544U", ISS_L2).unwrap_err();
        assert!(matches!(err, TleError::ShortLine { line: 1, .. }));
    }

    #[test]
    fn rejects_satellite_id_mismatch() {
        let mismatched_l2 =
            "2 25545  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
        let err = parse_tle(Some(ISS_NAME), ISS_L1, mismatched_l2).unwrap_err();
        assert!(matches!(err, TleError::SatelliteIdMismatch { .. }));
    }

    #[test]
    fn rejects_bad_line_number() {
        let err = parse_tle(None, ISS_L2, ISS_L2).unwrap_err();
        assert!(matches!(err, TleError::BadLineNumber { line: 1, .. }));
    }

    #[test]
    fn alpha5_prefix_extends_catalogue_range() {
        // 'A' maps to prefix 10: "A1234" -> 101234
        assert_eq!(decode_satellite_number("A1234").unwrap(), 101234);
        // 'J' follows 'I' in the skip sequence: prefix 18
        assert_eq!(decode_satellite_number("J0001").unwrap(), 180001);
    }

    #[test]
    fn checksum_round_trips_for_every_digit() {
        // Invariant 1 (spec.md §8): recomputing the checksum from columns
        // 1-68 reproduces column 69, for both lines of a valid record.
        assert_eq!(line_checksum(ISS_L1), 7);
        assert_eq!(line_checksum(ISS_L2), 7);
    }
}
