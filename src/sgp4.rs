//! The propagator core: [`sgp4_init`] builds a [`SatelliteState`] from a
//! parsed TLE, and [`sgp4`] steps it forward to a requested time offset
//! (spec.md §4.3, §4.4).
//!
//! Ported from `sgp4init`/`Sgp4`/`initl` in `sgp4/sgp4.go` under
//! `examples/original_source`.

use crate::constants::{self, GravityModel, MAX_TSINCE_DAYS, TWOPI};
use crate::deepspace::{dpper, dscom, dsinit, dspace};
use crate::error::PropagationError;
use crate::satellite::{InitPhase, Method, OperationMode, SatelliteState};
use crate::tle::TleRecord;
use crate::utils::{days2mdhms, gstime, jday, radians};

const X2O3: f64 = 2.0 / 3.0;

/// Un-Kozai's the mean motion and derives the near-Earth geometry terms
/// shared by both the deep-space and non-deep-space branches of
/// [`sgp4_init`] (`initl` in the reference theory).
fn initl(sat: &mut SatelliteState, epoch: f64) {
    let grav = sat.grav;
    let eccsq = sat.ecco * sat.ecco;
    sat.omeosq = 1.0 - eccsq;
    let rteosq = sat.omeosq.sqrt();
    let cosio = sat.inclo.cos();
    let cosio2 = cosio * cosio;

    let ak = (grav.xke / sat.no_kozai).powf(X2O3);
    let d1 = 0.75 * grav.j2 * (3.0 * cosio2 - 1.0) / (rteosq * sat.omeosq);
    let mut del_ = d1 / (ak * ak);
    let adel = ak * (1.0 - del_ * del_ - del_ * (1.0 / 3.0 + 134.0 * del_ * del_ / 81.0));
    del_ = d1 / (adel * adel);
    sat.no_unkozai = sat.no_kozai / (1.0 + del_);

    sat.ao = (grav.xke / sat.no_unkozai).powf(X2O3);
    sat.sinio = sat.inclo.sin();
    let po = sat.ao * sat.omeosq;
    sat.con42 = 1.0 - 5.0 * cosio2;
    sat.con41 = -sat.con42 - cosio2 - cosio2;
    sat.ainv = 1.0 / sat.ao;
    sat.eccsq = eccsq;
    sat.cosio = cosio;
    sat.cosio2 = cosio2;
    sat.rteosq = rteosq;
    sat.posq = po * po;
    sat.rp = sat.ao * (1.0 - sat.ecco);
    sat.method = Method::NearEarth;

    // modern sidereal time, matching the reference theory's `gstime` call
    // at the TLE epoch converted to the JD_1950-relative day count.
    sat.gsto = gstime(epoch + constants::JD_1950);
}

/// Builds a fully initialized [`SatelliteState`] from a parsed TLE,
/// selecting the near-Earth or deep-space branch by orbital period and
/// running the settling call to `sgp4` at `tsince = 0` (spec.md §4.3).
pub fn sgp4_init(
    tle: &TleRecord,
    gravity_model: GravityModel,
    operation_mode: OperationMode,
) -> Result<SatelliteState, PropagationError> {
    let mut sat = SatelliteState::blank(gravity_model, operation_mode);
    let grav = sat.grav;

    sat.satnum = tle.satellite_number;
    sat.bstar = tle.bstar;
    sat.ecco = tle.eccentricity;
    sat.inclo = radians(tle.inclination_deg);
    sat.nodeo = radians(tle.raan_deg);
    sat.argpo = radians(tle.arg_perigee_deg);
    sat.mo = radians(tle.mean_anomaly_deg);
    // mean motion is supplied in revs/day; the internal unit is rad/min.
    sat.no_kozai = tle.mean_motion * TWOPI / constants::DAY2MIN;

    let (jdsatepoch, jdsatepochf) = jday_from_tle(tle);
    sat.jdsatepoch = jdsatepoch;
    sat.jdsatepochf = jdsatepochf;
    let epoch = (jdsatepoch - constants::JD_1950) + jdsatepochf;
    sat.epoch = epoch;

    let ss = 78.0 / grav.radius_earth_km + 1.0;
    let qzms2t = ((120.0 - 78.0) / grav.radius_earth_km).powi(4);

    initl(&mut sat, epoch);

    sat.a = (sat.no_unkozai * grav.tumin).powf(-X2O3);
    sat.alta = sat.a * (1.0 + sat.ecco) - 1.0;
    sat.altp = sat.a * (1.0 - sat.ecco) - 1.0;
    sat.isimp = sat.rp < (220.0 / grav.radius_earth_km + 1.0);

    let mut sfour = ss;
    let mut qzms24 = qzms2t;
    let perige = (sat.rp - 1.0) * grav.radius_earth_km;

    if perige < 156.0 {
        sfour = if perige < 98.0 { 20.0 } else { perige - 78.0 };
        sfour = sfour / grav.radius_earth_km + 1.0;
        qzms24 = (120.0 / grav.radius_earth_km - sfour).powi(4);
    }

    let pinvsq = 1.0 / sat.posq;
    let tsi = 1.0 / (sat.ao - sfour);
    sat.eta = sat.ao * sat.ecco * tsi;
    let etasq = sat.eta * sat.eta;
    let eeta = sat.ecco * sat.eta;
    let psisq = (1.0 - etasq).abs();
    let coef = qzms24 * tsi.powi(4);
    let coef1 = coef / psisq.powf(3.5);

    let cc2 = coef1
        * sat.no_unkozai
        * (sat.ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
            + 0.375 * grav.j2 * tsi / psisq * sat.con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
    sat.cc1 = sat.bstar * cc2;
    let mut cc3 = 0.0;
    if sat.ecco > 1.0e-4 {
        cc3 = -2.0 * coef * tsi * grav.j3oj2 * sat.no_unkozai * sat.sinio / sat.ecco;
    }
    sat.x1mth2 = 1.0 - sat.cosio2;
    sat.cc4 = 2.0
        * sat.no_unkozai
        * coef1
        * sat.ao
        * sat.omeosq
        * (sat.eta * (2.0 + 0.5 * etasq)
            + sat.ecco * (0.5 + 2.0 * etasq)
            - grav.j2 * tsi / (sat.ao * psisq)
                * (-3.0 * sat.con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                    + 0.75 * sat.x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq)) * (2.0 * sat.argpo).cos()));
    sat.cc5 = 2.0 * coef1 * sat.ao * sat.omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

    let cosio4 = sat.cosio2 * sat.cosio2;
    let temp1 = 1.5 * grav.j2 * pinvsq * sat.no_unkozai;
    let temp2 = 0.5 * temp1 * grav.j2 * pinvsq;
    let temp3 = -0.46875 * grav.j4 * pinvsq * pinvsq * sat.no_unkozai;
    sat.mdot = sat.no_unkozai
        + 0.5 * temp1 * sat.rteosq * sat.con41
        + 0.0625 * temp2 * sat.rteosq * (13.0 - 78.0 * sat.cosio2 + 137.0 * cosio4);
    sat.argpdot = -0.5 * temp1 * sat.con42
        + 0.0625 * temp2 * (7.0 - 114.0 * sat.cosio2 + 395.0 * cosio4)
        + temp3 * (3.0 - 36.0 * sat.cosio2 + 49.0 * cosio4);
    let xhdot1 = -temp1 * sat.cosio;
    sat.nodedot = xhdot1
        + (0.5 * temp2 * (4.0 - 19.0 * sat.cosio2) + 2.0 * temp3 * (3.0 - 7.0 * sat.cosio2)) * sat.cosio;
    let xpidot = sat.argpdot + sat.nodedot;
    sat.omgcof = sat.bstar * cc3 * sat.argpo.cos();
    sat.xmcof = if sat.ecco > 1.0e-4 { -X2O3 * coef * sat.bstar / eeta } else { 0.0 };
    sat.nodecf = 3.5 * sat.omeosq * xhdot1 * sat.cc1;
    sat.t2cof = 1.5 * sat.cc1;

    sat.xlcof = if (sat.cosio + 1.0).abs() > 1.5e-12 {
        -0.25 * grav.j3oj2 * sat.sinio * (3.0 + 5.0 * sat.cosio) / (1.0 + sat.cosio)
    } else {
        -0.25 * grav.j3oj2 * sat.sinio * (3.0 + 5.0 * sat.cosio) / constants::TEMP4
    };
    sat.aycof = -0.5 * grav.j3oj2 * sat.sinio;
    let delmotemp = 1.0 + sat.eta * sat.mo.cos();
    sat.delmo = delmotemp * delmotemp * delmotemp;
    sat.sinmao = sat.mo.sin();
    sat.x7thm1 = 7.0 * sat.cosio2 - 1.0;

    if sat.period_minutes() >= 225.0 {
        sat.method = Method::DeepSpace;
        sat.isimp = true;
        let tc = 0.0;
        let inclm = sat.inclo;
        sat.nodem = sat.nodeo;
        sat.argpm = sat.argpo;
        sat.mm = sat.mo;
        sat.inclm = inclm;

        dscom(&mut sat, epoch, sat.ecco, sat.argpo, tc, inclm, sat.nodeo, sat.no_unkozai);
        sat.ep = sat.ecco;
        sat.inclp = sat.inclo;
        sat.nodep = sat.nodeo;
        sat.argpp = sat.argpo;
        sat.mp = sat.mo;
        dpper(&mut sat, 0.0, InitPhase::Initializing);
        sat.ecco = sat.ep;
        sat.inclo = sat.inclp;
        sat.nodeo = sat.nodep;
        sat.argpo = sat.argpp;
        sat.mo = sat.mp;

        sat.argpm = 0.0;
        sat.nodem = 0.0;
        sat.mm = 0.0;

        dsinit(&mut sat, tc, xpidot);
    } else {
        sat.d2 = 0.0;
        sat.d3 = 0.0;
        sat.d4 = 0.0;
        sat.t3cof = 0.0;
        sat.t4cof = 0.0;
        sat.t5cof = 0.0;
        if sat.isimp {
            let d2 = 4.0 * sat.ao * tsi * sat.cc1 * sat.cc1;
            let temp = d2 * tsi * sat.cc1 / 3.0;
            let d3 = (17.0 * sat.ao + sfour) * temp;
            let d4 = 0.5 * temp * sat.ao * tsi * (221.0 * sat.ao + 31.0 * sfour) * sat.cc1;
            sat.d2 = d2;
            sat.d3 = d3;
            sat.d4 = d4;
            sat.t3cof = sat.d2 + 2.0 * sat.cc1 * sat.cc1;
            sat.t4cof = 0.25 * (3.0 * sat.d3 + sat.cc1 * (12.0 * sat.d2 + 10.0 * sat.cc1 * sat.cc1));
            sat.t5cof = 0.2
                * (3.0 * sat.d4
                    + 12.0 * sat.cc1 * sat.d3
                    + 6.0 * sat.d2 * sat.d2
                    + 15.0 * sat.cc1 * sat.cc1 * (2.0 * sat.d2 + sat.cc1 * sat.cc1));
        }
    }

    sat.init = InitPhase::Running;
    sgp4(&mut sat, 0.0)?;

    Ok(sat)
}

fn jday_from_tle(tle: &TleRecord) -> (f64, f64) {
    let (month, day, hour, minute, second) = days2mdhms(tle.epoch_year, tle.epoch_day);
    jday(tle.epoch_year, month, day, hour, minute, second)
}

/// Steps `sat` to `tsince` minutes from its TLE epoch, returning the TEME
/// position (km) and velocity (km/s) (spec.md §4.4). Mutates `sat` in
/// place: deep-space orbits carry the resonance integrator's state
/// (`atime`/`xli`/`xni`) forward between calls.
pub fn sgp4(sat: &mut SatelliteState, tsince: f64) -> Result<([f64; 3], [f64; 3]), PropagationError> {
    if tsince.abs() > MAX_TSINCE_DAYS * constants::DAY2MIN {
        return Err(PropagationError::EpochTooFar {
            days_from_epoch: tsince.abs() / constants::DAY2MIN,
            limit_days: MAX_TSINCE_DAYS,
        });
    }

    let grav = sat.grav;
    sat.t = tsince;

    sat.mm = sat.mo + sat.mdot * sat.t;
    let xmdf = sat.mm;
    let argpdf = sat.argpo + sat.argpdot * sat.t;
    let nodedf = sat.nodeo + sat.nodedot * sat.t;
    sat.argpm = argpdf;
    sat.mm = xmdf;
    let t2 = sat.t * sat.t;
    sat.nodem = nodedf + sat.nodecf * t2;
    let mut tempa = 1.0 - sat.cc1 * sat.t;
    let mut tempe = sat.bstar * sat.cc4 * sat.t;
    let mut templ = sat.t2cof * t2;

    if !sat.isimp {
        let delomg = sat.omgcof * sat.t;
        let delmtemp = 1.0 + sat.eta * xmdf.cos();
        let delm = sat.xmcof * (delmtemp * delmtemp * delmtemp - sat.delmo);
        let temp = delomg + delm;
        sat.mm = xmdf + temp;
        sat.argpm = argpdf - temp;
        let t3 = t2 * sat.t;
        let t4 = t3 * sat.t;
        tempa = tempa - sat.d2 * t2 - sat.d3 * t3 - sat.d4 * t4;
        tempe += sat.bstar * sat.cc5 * (sat.mm.sin() - sat.sinmao);
        templ += sat.t3cof * t3 + t4 * (sat.t4cof + sat.t * sat.t5cof);
    }

    sat.nm = sat.no_unkozai;
    sat.em = sat.ecco;
    sat.inclm = sat.inclo;

    if sat.method == Method::DeepSpace {
        let tc = sat.t;
        dspace(sat, tc);
    }

    if sat.nm <= 0.0 {
        return Err(PropagationError::MeanMotionBelowZero(sat.nm));
    }

    sat.am = (grav.xke / sat.nm).powf(X2O3) * tempa * tempa;
    sat.nm = grav.xke / sat.am.powf(1.5);
    sat.em -= tempe;

    if sat.em >= 1.0 || sat.em < -0.001 {
        return Err(PropagationError::SubOrbitalEccentricity(sat.em));
    }
    if sat.em < constants::ECC_FLOOR {
        sat.em = constants::ECC_FLOOR;
    }

    sat.mm += sat.no_unkozai * templ;
    let mut xlm = sat.mm + sat.argpm + sat.nodem;

    sat.nodem = sat.nodem.rem_euclid(TWOPI);
    sat.argpm = sat.argpm.rem_euclid(TWOPI);
    xlm = xlm.rem_euclid(TWOPI);
    sat.mm = (xlm - sat.argpm - sat.nodem).rem_euclid(TWOPI);

    // `inclm` already carries dspace's luni-solar secular drift (or stayed
    // at `inclo` for near-Earth orbits); do not clobber it here.
    sat.ep = sat.em;
    sat.inclp = sat.inclm;
    sat.argpp = sat.argpm;
    sat.nodep = sat.nodem;
    sat.mp = sat.mm;

    if sat.method == Method::DeepSpace {
        dpper(sat, sat.t, InitPhase::Running);
        if sat.inclp < 0.0 {
            sat.inclp = -sat.inclp;
            sat.nodep += std::f64::consts::PI;
            sat.argpp -= std::f64::consts::PI;
        }
        if !(0.0..=1.0).contains(&sat.ep) {
            return Err(PropagationError::LuniSolarEccentricityOutOfRange(sat.ep));
        }
    }

    let (mut aycof, mut xlcof) = (sat.aycof, sat.xlcof);
    let mut con41 = sat.con41;
    let mut x1mth2 = sat.x1mth2;
    let mut x7thm1 = sat.x7thm1;
    let (cosip, sinip) = if sat.method == Method::DeepSpace {
        let sinip = sat.inclp.sin();
        let cosip = sat.inclp.cos();
        aycof = -0.5 * grav.j3oj2 * sinip;
        xlcof = if (cosip + 1.0).abs() > 1.5e-12 {
            -0.25 * grav.j3oj2 * sinip * (3.0 + 5.0 * cosip) / (1.0 + cosip)
        } else {
            -0.25 * grav.j3oj2 * sinip * (3.0 + 5.0 * cosip) / constants::TEMP4
        };
        let cosisq = cosip * cosip;
        con41 = 3.0 * cosisq - 1.0;
        x1mth2 = 1.0 - cosisq;
        x7thm1 = 7.0 * cosisq - 1.0;
        (cosip, sinip)
    } else {
        (sat.cosio, sat.sinio)
    };

    let axnl = sat.ep * sat.argpp.cos();
    let temp = 1.0 / (sat.am * (1.0 - sat.ep * sat.ep));
    let aynl = sat.ep * sat.argpp.sin() + temp * aycof;
    let xl = sat.mp + sat.argpp + sat.nodep + temp * xlcof * axnl;

    let u = (xl - sat.nodep).rem_euclid(TWOPI);
    let mut eo1 = u;
    let mut sineo1;
    let mut coseo1;
    let mut iter = 0;
    loop {
        sineo1 = eo1.sin();
        coseo1 = eo1.cos();
        let mut tem5 = (u - aynl * coseo1 + axnl * sineo1 - eo1) / (1.0 - coseo1 * axnl - sineo1 * aynl);
        tem5 = tem5.clamp(-0.95, 0.95);
        eo1 += tem5;
        iter += 1;
        if tem5.abs() < 1.0e-12 || iter >= 10 {
            break;
        }
    }

    let ecose = axnl * coseo1 + aynl * sineo1;
    let esine = axnl * sineo1 - aynl * coseo1;
    let el2 = axnl * axnl + aynl * aynl;
    let pl = sat.am * (1.0 - el2);

    if pl < 0.0 {
        return Err(PropagationError::NegativeSemiLatusRectum(pl));
    }

    let rl = sat.am * (1.0 - ecose);
    let rdotl = sat.am.sqrt() * esine / rl;
    let rvdotl = pl.sqrt() / rl;
    let betal = (1.0 - el2).sqrt();
    let temp = esine / (1.0 + betal);
    let sinu = sat.am / rl * (sineo1 - aynl - axnl * temp);
    let cosu = sat.am / rl * (coseo1 - axnl + aynl * temp);
    let mut su = sinu.atan2(cosu);
    let sin2u = (cosu + cosu) * sinu;
    let cos2u = 1.0 - 2.0 * sinu * sinu;
    let temp = 1.0 / pl;
    let temp1 = 0.5 * grav.j2 * temp;
    let temp2 = temp1 * temp;

    let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
    su -= 0.25 * temp2 * x7thm1 * sin2u;
    let xnode = sat.nodep + 1.5 * temp2 * cosip * sin2u;
    let xinc = sat.inclp + 1.5 * temp2 * cosip * sinip * cos2u;
    let mvt = rdotl - sat.nm * temp1 * x1mth2 * sin2u / grav.xke;
    let rvdot = rvdotl + sat.nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / grav.xke;

    let sinsu = su.sin();
    let cossu = su.cos();
    let snod = xnode.sin();
    let cnod = xnode.cos();
    let sini = xinc.sin();
    let cosi = xinc.cos();
    let xmx = -snod * cosi;
    let xmy = cnod * cosi;
    let ux = xmx * sinsu + cnod * cossu;
    let uy = xmy * sinsu + snod * cossu;
    let uz = sini * sinsu;
    let vx = xmx * cossu - cnod * sinsu;
    let vy = xmy * cossu - snod * sinsu;
    let vz = sini * cossu;

    if mrt < 1.0 {
        return Err(PropagationError::Decayed(mrt * grav.radius_earth_km));
    }

    let r = [
        mrt * ux * grav.radius_earth_km,
        mrt * uy * grav.radius_earth_km,
        mrt * uz * grav.radius_earth_km,
    ];
    let vkmpersec = grav.radius_earth_km * grav.xke / constants::MIN2SEC;
    let v = [
        (mvt * ux + rvdot * vx) * vkmpersec,
        (mvt * uy + rvdot * vy) * vkmpersec,
        (mvt * uz + rvdot * vz) * vkmpersec,
    ];

    if r.iter().chain(v.iter()).any(|c| !c.is_finite()) {
        return Err(PropagationError::NumericInstability { where_: "sgp4" });
    }

    Ok((r, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::parse_tle;
    use approx::assert_abs_diff_eq;

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_L1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_L2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn near_earth_iss_propagates_at_epoch() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        assert_eq!(sat.method, Method::NearEarth);
        let (r, v) = sgp4(&mut sat, 0.0).unwrap();
        assert_abs_diff_eq!(r[0], -1465.0, epsilon = 1e-3);
        assert_abs_diff_eq!(r[1], -3787.8, epsilon = 1e-3);
        assert_abs_diff_eq!(r[2], 5249.2, epsilon = 1e-3);
        assert_abs_diff_eq!(v[0], 5.119, epsilon = 1e-6);
        assert_abs_diff_eq!(v[1], -5.300, epsilon = 1e-6);
        assert_abs_diff_eq!(v[2], -2.416, epsilon = 1e-6);
    }

    #[test]
    fn propagation_beyond_window_is_rejected() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        let err = sgp4(&mut sat, 31.0 * constants::DAY2MIN).unwrap_err();
        assert!(matches!(err, PropagationError::EpochTooFar { .. }));
    }

    #[test]
    fn propagation_at_window_boundary_succeeds() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        assert!(sgp4(&mut sat, 30.0 * constants::DAY2MIN).is_ok());
    }

    #[test]
    fn near_geosynchronous_orbit_selects_deep_space() {
        // period ~ 1436 min, mean motion ~ 1.0027 revs/day -> irez=1 synchronous resonance.
        let l1 = "1 26038U 99061A   08264.51782528 -.00000029  00000-0  00000-0 0  4595";
        let l2 = "2 26038   1.0000  95.6163 0003671 221.5565 138.1157  1.00271448 32362";
        let tle = parse_tle(None, l1, l2).unwrap();
        let sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        assert_eq!(sat.method, Method::DeepSpace);
        assert_eq!(sat.irez, 1);
    }

    #[test]
    fn near_geosynchronous_orbit_altitude_at_one_day() {
        // scenario B: altitude at tsince=1440 min must land in the GEO band.
        let l1 = "1 26038U 99061A   08264.51782528 -.00000029  00000-0  00000-0 0  4595";
        let l2 = "2 26038   1.0000  95.6163 0003671 221.5565 138.1157  1.00271448 32362";
        let tle = parse_tle(None, l1, l2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        let (r, _v) = sgp4(&mut sat, 1440.0).unwrap();
        let rmag = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
        let altitude = rmag - sat.grav.radius_earth_km;
        assert!(
            (35_500.0..36_200.0).contains(&altitude),
            "altitude {altitude} outside GEO band"
        );
    }

    #[test]
    fn molniya_orbit_selects_resonance_class_two() {
        // scenario C: mean motion ~2.00561 rev/day, e > 0.7 -> irez=2, d2201 populated.
        let l1 = "1 25847U 99036A   08264.51782528 -.00000100  00000-0  23000-3 0  2927";
        let l2 = "2 25847  64.1513 280.0000 7318036 281.4131  12.4238  2.00561295012346";
        let tle = parse_tle(None, l1, l2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        assert_eq!(sat.method, Method::DeepSpace);
        assert_eq!(sat.irez, 2);
        assert_ne!(sat.d2201, 0.0);
        let (r, v) = sgp4(&mut sat, 60.0).unwrap();
        assert!(r.iter().chain(v.iter()).all(|c| c.is_finite()));
    }

    #[test]
    fn retrograde_equatorial_orbit_avoids_singularity() {
        // scenario D: inclination = 180 deg drives cosio -> -1, exercising the
        // xlcof denominator clamp (spec.md §4.3 step 8).
        let l1 = "1 88888U 20001A   08264.51782528  .00000000  00000-0  00000-0 0  0015";
        let l2 = "2 88888 180.0000   0.0000 0001000   0.0000   0.0000 14.50000000000013";
        let tle = parse_tle(None, l1, l2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        assert!((sat.cosio + 1.0).abs() < 1.5e-12);
        let (r, v) = sgp4(&mut sat, 30.0).unwrap();
        assert!(r.iter().chain(v.iter()).all(|c| c.is_finite()));
    }

    #[test]
    fn eccentricity_floor_applied_near_circular_orbit() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let mut sat = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        sat.ecco = 0.0;
        sat.bstar = 0.0;
        let (r, _v) = sgp4(&mut sat, 0.0).unwrap();
        assert!(r.iter().all(|c| c.is_finite()));
        assert!(sat.em >= constants::ECC_FLOOR);
    }

    #[test]
    fn gravity_model_selection_changes_radius_constant() {
        let tle = parse_tle(Some(ISS_NAME), ISS_L1, ISS_L2).unwrap();
        let wgs72 = sgp4_init(&tle, GravityModel::Wgs72, OperationMode::Improved).unwrap();
        let wgs84 = sgp4_init(&tle, GravityModel::Wgs84, OperationMode::Improved).unwrap();
        assert_abs_diff_eq!(wgs72.grav.radius_earth_km, 6378.135, epsilon = 1e-9);
        assert_abs_diff_eq!(wgs84.grav.radius_earth_km, 6378.137, epsilon = 1e-9);
    }
}
