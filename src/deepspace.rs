//! Deep-space (SDP4) sub-algorithms: `dscom`, `dsinit`, `dspace`, `dpper`
//! (spec.md §4.5). These add luni-solar gravity and 12-hour/24-hour
//! geopotential resonance for orbits with period >= 225 minutes.
//!
//! Ported from the canonical Vallado SGP4 theory, following the structure
//! of `sgp4/sgp4.go`'s `dscom`/`dsinit`/`dspace`/`dpper` in
//! `examples/original_source` (that port's `dscom` is truncated after the
//! shared `z`-coefficient loop; the body below fills it in per the
//! published theory, which the truncated comment in the original
//! confirms is a verbatim transcription up to that point).

use crate::constants::TWOPI;
use crate::satellite::{InitPhase, OperationMode, SatelliteState};

const ZES: f64 = 0.01675;
const ZEL: f64 = 0.05490;
const C1SS: f64 = 2.9864797e-6;
const C1L: f64 = 4.7968065e-7;
const ZSINIS: f64 = 0.39785416;
const ZCOSIS: f64 = 0.91744867;
const ZCOSGS: f64 = 0.1945905;
const ZSINGS: f64 = -0.98088458;

const ZNS: f64 = 1.19459e-5;
const ZNL: f64 = 1.5835218e-4;

/// One-shot: computes lunar-solar derived constants from the mean
/// elements at epoch and stores them on `sat` (spec.md §4.5).
pub fn dscom(sat: &mut SatelliteState, epoch: f64, ep: f64, argpp: f64, tc: f64, inclp: f64, nodep: f64, np: f64) {
    sat.nm = np;
    sat.em = ep;
    let scratch = &mut sat.dscom_scratch;
    scratch.snodm = nodep.sin();
    scratch.cnodm = nodep.cos();
    scratch.sinomm = argpp.sin();
    scratch.cosomm = argpp.cos();
    scratch.sinim = inclp.sin();
    scratch.cosim = inclp.cos();
    scratch.emsq = sat.em * sat.em;
    let betasq = 1.0 - scratch.emsq;
    scratch.rtemsq = betasq.sqrt();

    sat.peo = 0.0;
    sat.pinco = 0.0;
    sat.plo = 0.0;
    sat.pgho = 0.0;
    sat.pho = 0.0;

    scratch.day = epoch + 18261.5 + tc / 1440.0;
    let xnodce = (4.5236020 - 9.2422029e-4 * scratch.day).rem_euclid(TWOPI);
    let stem = xnodce.sin();
    let ctem = xnodce.cos();
    let zcosil = 0.91375164 - 0.03568096 * ctem;
    let zsinil = (1.0 - zcosil * zcosil).sqrt();
    let zsinhl = 0.089683511 * stem / zsinil;
    let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
    scratch.gam = 5.8351514 + 0.0019443680 * scratch.day;

    let zx_num = 0.39785416 * stem / zsinil;
    let zy = zcoshl * ctem + 0.91744867 * zsinhl * stem;
    let mut zx = zx_num.atan2(zy);
    zx = scratch.gam + zx - xnodce;
    let zcosgl = zx.cos();
    let zsingl = zx.sin();

    let mut zcosg = ZCOSGS;
    let mut zsing = ZSINGS;
    let mut zcosi = ZCOSIS;
    let mut zsini = ZSINIS;
    let mut zcosh = scratch.cnodm;
    let mut zsinh = scratch.snodm;
    let mut cc = C1SS;
    let xnoi = 1.0 / sat.nm;

    for lsflg in 1..=2 {
        let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
        let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
        let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
        let a8 = zsing * zsini;
        let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
        let a10 = zcosg * zsini;
        let a2 = scratch.cosim * a7 + scratch.sinim * a8;
        let a4 = scratch.cosim * a9 + scratch.sinim * a10;
        let a5 = -scratch.sinim * a7 + scratch.cosim * a8;
        let a6 = -scratch.sinim * a9 + scratch.cosim * a10;

        let x1 = a1 * scratch.cosomm + a2 * scratch.sinomm;
        let x2 = a3 * scratch.cosomm + a4 * scratch.sinomm;
        let x3 = -a1 * scratch.sinomm + a2 * scratch.cosomm;
        let x4 = -a3 * scratch.sinomm + a4 * scratch.cosomm;
        let x5 = a5 * scratch.sinomm;
        let x6 = a6 * scratch.sinomm;
        let x7 = a5 * scratch.cosomm;
        let x8 = a6 * scratch.cosomm;

        scratch.z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
        scratch.z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
        scratch.z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
        scratch.z1 = 3.0 * (a1 * a1 + a2 * a2) + scratch.z31 * scratch.emsq;
        scratch.z2 = 6.0 * (a1 * a3 + a2 * a4) + scratch.z32 * scratch.emsq;
        scratch.z3 = 3.0 * (a3 * a3 + a4 * a4) + scratch.z33 * scratch.emsq;
        scratch.z11 = -6.0 * a1 * a5 + scratch.emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
        scratch.z12 = -6.0 * (a1 * a6 + a3 * a5)
            + scratch.emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
        scratch.z13 = -6.0 * a3 * a6 + scratch.emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
        scratch.z21 = 6.0 * a2 * a5 + scratch.emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
        scratch.z22 = 6.0 * (a4 * a5 + a2 * a6)
            + scratch.emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
        scratch.z23 = 6.0 * a4 * a6 + scratch.emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
        scratch.z1 = scratch.z1 + scratch.z1 + betasq * scratch.z31;
        scratch.z2 = scratch.z2 + scratch.z2 + betasq * scratch.z32;
        scratch.z3 = scratch.z3 + scratch.z3 + betasq * scratch.z33;
        scratch.s3 = cc * xnoi;
        scratch.s2 = -0.5 * scratch.s3 / scratch.rtemsq;
        scratch.s4 = scratch.s3 * scratch.rtemsq;
        scratch.s1 = -15.0 * sat.em * scratch.s4;
        scratch.s5 = x1 * x3 + x2 * x4;
        scratch.s6 = x2 * x3 + x1 * x4;
        scratch.s7 = x2 * x4 - x1 * x3;

        if lsflg == 1 {
            scratch.ss1 = scratch.s1;
            scratch.ss2 = scratch.s2;
            scratch.ss3 = scratch.s3;
            scratch.ss4 = scratch.s4;
            scratch.ss5 = scratch.s5;
            scratch.ss6 = scratch.s6;
            scratch.ss7 = scratch.s7;
            scratch.sz1 = scratch.z1;
            scratch.sz2 = scratch.z2;
            scratch.sz3 = scratch.z3;
            scratch.sz11 = scratch.z11;
            scratch.sz12 = scratch.z12;
            scratch.sz13 = scratch.z13;
            scratch.sz21 = scratch.z21;
            scratch.sz22 = scratch.z22;
            scratch.sz23 = scratch.z23;
            scratch.sz31 = scratch.z31;
            scratch.sz32 = scratch.z32;
            scratch.sz33 = scratch.z33;

            zcosg = zcosgl;
            zsing = zsingl;
            zcosi = zcosil;
            zsini = zsinil;
            zcosh = zcoshl * scratch.cnodm + zsinhl * scratch.snodm;
            zsinh = scratch.snodm * zcoshl - scratch.cnodm * zsinhl;
            cc = C1L;
        }
    }

    sat.zmol = (4.7199672 + 0.22997150 * scratch.day - scratch.gam).rem_euclid(TWOPI);
    sat.zmos = (6.2565837 + 0.017201977 * scratch.day).rem_euclid(TWOPI);

    sat.se2 = 2.0 * scratch.ss1 * scratch.ss6;
    sat.se3 = 2.0 * scratch.ss1 * scratch.ss7;
    sat.si2 = 2.0 * scratch.ss2 * scratch.sz12;
    sat.si3 = 2.0 * scratch.ss2 * (scratch.sz13 - scratch.sz11);
    sat.sl2 = -2.0 * scratch.ss3 * scratch.sz2;
    sat.sl3 = -2.0 * scratch.ss3 * (scratch.sz3 - scratch.sz1);
    sat.sl4 = -2.0 * scratch.ss3 * (-21.0 - 9.0 * scratch.emsq) * ZES;
    sat.sgh2 = 2.0 * scratch.ss4 * scratch.sz32;
    sat.sgh3 = 2.0 * scratch.ss4 * (scratch.sz33 - scratch.sz31);
    sat.sgh4 = -18.0 * scratch.ss4 * ZES;
    sat.sh2 = -2.0 * scratch.ss2 * scratch.sz22;
    sat.sh3 = -2.0 * scratch.ss2 * (scratch.sz23 - scratch.sz21);

    sat.ee2 = 2.0 * scratch.s1 * scratch.s6;
    sat.e3 = 2.0 * scratch.s1 * scratch.s7;
    sat.xi2 = 2.0 * scratch.s2 * scratch.sz12;
    sat.xi3 = 2.0 * scratch.s2 * (scratch.sz13 - scratch.sz11);
    sat.xl2 = -2.0 * scratch.s3 * scratch.sz2;
    sat.xl3 = -2.0 * scratch.s3 * (scratch.sz3 - scratch.sz1);
    sat.xl4 = -2.0 * scratch.s3 * (-21.0 - 9.0 * scratch.emsq) * ZEL;
    sat.xgh2 = 2.0 * scratch.s4 * scratch.sz32;
    sat.xgh3 = 2.0 * scratch.s4 * (scratch.sz33 - scratch.sz31);
    sat.xgh4 = -18.0 * scratch.s4 * ZEL;
    sat.xh2 = -2.0 * scratch.s2 * scratch.sz22;
    sat.xh3 = -2.0 * scratch.s2 * (scratch.sz23 - scratch.sz21);
}

/// One-shot: classifies the resonance regime from the mean motion and
/// eccentricity and computes the `d2201..d5433`/`del1..del3` resonance
/// coefficients plus the integrator anchor `xlamo`/`xfact` (spec.md §4.5).
pub fn dsinit(sat: &mut SatelliteState, tc: f64, xpidot: f64) {
    const Q22: f64 = 1.7891679e-6;
    const Q31: f64 = 2.1460748e-6;
    const Q33: f64 = 2.2123015e-7;
    const ROOT22: f64 = 1.7891679e-6;
    const ROOT44: f64 = 7.3636953e-9;
    const ROOT54: f64 = 2.1765803e-9;
    const RPTIM: f64 = 4.37526908801129966e-3;
    const ROOT32: f64 = 3.7393792e-7;
    const ROOT52: f64 = 1.1428639e-7;
    const X2O3: f64 = 2.0 / 3.0;

    sat.irez = 0;
    if sat.nm < 0.0052359877 && sat.nm > 0.0034906585 {
        sat.irez = 1;
    }
    if (8.26e-3..=9.24e-3).contains(&sat.nm) && sat.em >= 0.5 {
        sat.irez = 2;
    }

    let scratch = sat.dscom_scratch;
    let ses = scratch.ss1 * ZNS * scratch.ss5;
    let sis = scratch.ss2 * ZNS * (scratch.sz11 + scratch.sz13);
    let sls = -ZNS * scratch.ss3 * (scratch.sz1 + scratch.sz3 - 14.0 - 6.0 * scratch.emsq);
    let sghs = scratch.ss4 * ZNS * (scratch.sz31 + scratch.sz33 - 6.0);
    let mut shs = -ZNS * scratch.ss2 * (scratch.sz21 + scratch.sz23);

    if sat.inclm < 5.2359877e-2 || sat.inclm > std::f64::consts::PI - 5.2359877e-2 {
        shs = 0.0;
    }
    let shs = if scratch.sinim != 0.0 { shs / scratch.sinim } else { shs };
    let sgs = sghs - scratch.cosim * shs;

    sat.dedt = ses + scratch.s1 * ZNL * scratch.s5;
    sat.didt = sis + scratch.s2 * ZNL * (scratch.z11 + scratch.z13);
    sat.dmdt = sls - ZNL * scratch.s3 * (scratch.z1 + scratch.z3 - 14.0 - 6.0 * scratch.emsq);
    let sghl = scratch.s4 * ZNL * (scratch.z31 + scratch.z33 - 6.0);
    let mut shll = -ZNL * scratch.s2 * (scratch.z21 + scratch.z23);

    if sat.inclm < 5.2359877e-2 || sat.inclm > std::f64::consts::PI - 5.2359877e-2 {
        shll = 0.0;
    }
    sat.domdt = sgs + sghl;
    sat.dnodt = shs;
    if scratch.sinim != 0.0 {
        sat.domdt -= scratch.cosim / scratch.sinim * shll;
        sat.dnodt += shll / scratch.sinim;
    }

    sat.dndt = 0.0;
    let theta = (sat.gsto + tc * RPTIM).rem_euclid(TWOPI);
    sat.em += sat.dedt * sat.t;
    sat.inclm += sat.didt * sat.t;
    sat.argpm += sat.domdt * sat.t;
    sat.nodem += sat.dnodt * sat.t;
    sat.mm += sat.dmdt * sat.t;

    if sat.inclm < 0.0 {
        sat.inclm = -sat.inclm;
        sat.argpm -= std::f64::consts::PI;
        sat.nodem += std::f64::consts::PI;
    }

    if sat.irez != 0 {
        let aonv = (sat.nm / sat.grav.xke).powf(X2O3);

        if sat.irez == 2 {
            let cosisq = scratch.cosim * scratch.cosim;
            let emo = sat.em;
            sat.em = sat.ecco;
            let emsqo = sat.dscom_scratch.emsq;
            sat.dscom_scratch.emsq = sat.eccsq;
            let eoc = sat.em * sat.dscom_scratch.emsq;
            let g201 = -0.306 - (sat.em - 0.64) * 0.440;

            let (g211, g310, g322, g410, g422, g520);
            if sat.em <= 0.65 {
                g211 = 3.616 - 13.2470 * sat.em + 16.2900 * sat.dscom_scratch.emsq;
                g310 = -19.302 + 117.3900 * sat.em - 228.4190 * sat.dscom_scratch.emsq + 156.5910 * eoc;
                g322 = -18.9068 + 109.7927 * sat.em - 214.6334 * sat.dscom_scratch.emsq + 146.5816 * eoc;
                g410 = -41.122 + 242.6940 * sat.em - 471.0940 * sat.dscom_scratch.emsq + 313.9530 * eoc;
                g422 = -146.407 + 841.8800 * sat.em - 1629.014 * sat.dscom_scratch.emsq + 1083.4350 * eoc;
                g520 = -532.114 + 3017.977 * sat.em - 5740.032 * sat.dscom_scratch.emsq + 3708.2760 * eoc;
            } else {
                g211 = -72.099 + 331.819 * sat.em - 508.738 * sat.dscom_scratch.emsq + 266.724 * eoc;
                g310 = -346.844 + 1582.851 * sat.em - 2415.925 * sat.dscom_scratch.emsq + 1246.113 * eoc;
                g322 = -342.585 + 1554.908 * sat.em - 2366.899 * sat.dscom_scratch.emsq + 1215.972 * eoc;
                g410 = -1052.797 + 4758.686 * sat.em - 7193.992 * sat.dscom_scratch.emsq + 3651.957 * eoc;
                g422 = -3581.690 + 16178.110 * sat.em - 24462.770 * sat.dscom_scratch.emsq + 12422.520 * eoc;
                g520 = if sat.em > 0.715 {
                    -5149.66 + 29936.92 * sat.em - 54087.36 * sat.dscom_scratch.emsq + 31324.56 * eoc
                } else {
                    1464.74 - 4664.75 * sat.em + 3763.64 * sat.dscom_scratch.emsq
                };
            }

            let (g533, g521, g532);
            if sat.em < 0.7 {
                g533 = -919.22770 + 4988.6100 * sat.em - 9064.7700 * sat.dscom_scratch.emsq + 5542.21 * eoc;
                g521 = -822.71072 + 4568.6173 * sat.em - 8491.4146 * sat.dscom_scratch.emsq + 5337.524 * eoc;
                g532 = -853.66600 + 4690.2500 * sat.em - 8624.7700 * sat.dscom_scratch.emsq + 5341.4 * eoc;
            } else {
                g533 = -37995.780 + 161616.52 * sat.em - 229838.20 * sat.dscom_scratch.emsq + 109377.94 * eoc;
                g521 = -51752.104 + 218913.95 * sat.em - 309468.16 * sat.dscom_scratch.emsq + 146349.42 * eoc;
                g532 = -40023.880 + 170470.89 * sat.em - 242699.48 * sat.dscom_scratch.emsq + 115605.82 * eoc;
            }

            let sini2 = scratch.sinim * scratch.sinim;
            let f220 = 0.75 * (1.0 + 2.0 * scratch.cosim + cosisq);
            let f221 = 1.5 * sini2;
            let f321 = 1.875 * scratch.sinim * (1.0 - 2.0 * scratch.cosim - 3.0 * cosisq);
            let f322 = -1.875 * scratch.sinim * (1.0 + 2.0 * scratch.cosim - 3.0 * cosisq);
            let f441 = 35.0 * sini2 * f220;
            let f442 = 39.3750 * sini2 * sini2;
            let f522 = 9.84375
                * scratch.sinim
                * (sini2 * (1.0 - 2.0 * scratch.cosim - 5.0 * cosisq)
                    + 0.33333333 * (-2.0 + 4.0 * scratch.cosim + 6.0 * cosisq));
            let f523 = scratch.sinim
                * (4.92187512 * sini2 * (-2.0 - 4.0 * scratch.cosim + 10.0 * cosisq)
                    + 6.56250012 * (1.0 + 2.0 * scratch.cosim - 3.0 * cosisq));
            let f542 = 29.53125
                * scratch.sinim
                * (2.0 - 8.0 * scratch.cosim
                    + cosisq * (-12.0 + 8.0 * scratch.cosim + 10.0 * cosisq));
            let f543 = 29.53125
                * scratch.sinim
                * (-2.0 - 8.0 * scratch.cosim
                    + cosisq * (12.0 + 8.0 * scratch.cosim - 10.0 * cosisq));

            let xno2 = sat.nm * sat.nm;
            let ainv2 = aonv * aonv;
            let mut temp1 = 3.0 * xno2 * ainv2;
            let mut temp = temp1 * ROOT22;
            sat.d2201 = temp * f220 * g201;
            sat.d2211 = temp * f221 * g211;
            temp1 *= aonv;
            temp = temp1 * ROOT32;
            sat.d3210 = temp * f321 * g310;
            sat.d3222 = temp * f322 * g322;
            temp1 *= aonv;
            temp = 2.0 * temp1 * ROOT44;
            sat.d4410 = temp * f441 * g410;
            sat.d4422 = temp * f442 * g422;
            temp1 *= aonv;
            temp = temp1 * ROOT52;
            sat.d5220 = temp * f522 * g520;
            sat.d5232 = temp * f523 * g532;
            temp = 2.0 * temp1 * ROOT54;
            sat.d5421 = temp * f542 * g521;
            sat.d5433 = temp * f543 * g533;

            sat.xlamo = (sat.mo + sat.nodeo + sat.nodeo - theta - theta).rem_euclid(TWOPI);
            sat.xfact = sat.mdot + sat.dmdt + 2.0 * (sat.nodedot + sat.dnodt - RPTIM) - sat.no_unkozai;
            sat.em = emo;
            sat.dscom_scratch.emsq = emsqo;
        }

        if sat.irez == 1 {
            let g200 = 1.0 + sat.dscom_scratch.emsq * (-2.5 + 0.8125 * sat.dscom_scratch.emsq);
            let g310 = 1.0 + 2.0 * sat.dscom_scratch.emsq;
            let g300 = 1.0 + sat.dscom_scratch.emsq * (-6.0 + 6.60937 * sat.dscom_scratch.emsq);
            let f220 = 0.75 * (1.0 + scratch.cosim) * (1.0 + scratch.cosim);
            let f311 = 0.9375 * scratch.sinim * scratch.sinim * (1.0 + 3.0 * scratch.cosim)
                - 0.75 * (1.0 + scratch.cosim);
            let mut f330 = 1.0 + scratch.cosim;
            f330 = 1.875 * f330 * f330 * f330;
            sat.del1 = 3.0 * sat.nm * sat.nm * aonv * aonv;
            sat.del2 = 2.0 * sat.del1 * f220 * g200 * Q22;
            sat.del3 = 3.0 * sat.del1 * f330 * g300 * Q33 * aonv;
            sat.del1 = sat.del1 * f311 * g310 * Q31 * aonv;
            sat.xlamo = (sat.mo + sat.nodeo + sat.argpo - theta).rem_euclid(TWOPI);
            sat.xfact = sat.mdot + xpidot - RPTIM + sat.dmdt + sat.domdt + sat.dnodt - sat.no_unkozai;
        }

        sat.xli = sat.xlamo;
        sat.xni = sat.no_unkozai;
        sat.atime = 0.0;
        sat.nm = sat.no_unkozai + sat.dndt;
    }
}

/// Stateful: integrates the resonance degree of freedom forward (or
/// backward) from `sat.atime` towards `sat.t` with a two-term Taylor
/// scheme stepping by +/-720 min, then closes with a partial step
/// (spec.md §4.5).
pub fn dspace(sat: &mut SatelliteState, tc: f64) {
    const FASX2: f64 = 0.13130908;
    const FASX4: f64 = 2.8843198;
    const FASX6: f64 = 0.37448087;
    const G22: f64 = 5.7686396;
    const G32: f64 = 0.95240898;
    const G44: f64 = 1.8014998;
    const G52: f64 = 1.0508330;
    const G54: f64 = 4.4108898;
    const RPTIM: f64 = 4.37526908801129966e-3;
    const STEPP: f64 = 720.0;
    const STEPN: f64 = -720.0;
    const STEP2: f64 = 259200.0;

    sat.dndt = 0.0;
    let theta = (sat.gsto + tc * RPTIM).rem_euclid(TWOPI);
    sat.em += sat.dedt * sat.t;
    sat.inclm += sat.didt * sat.t;
    sat.argpm += sat.domdt * sat.t;
    sat.nodem += sat.dnodt * sat.t;
    sat.mm += sat.dmdt * sat.t;

    if sat.irez == 0 {
        return;
    }

    if sat.atime == 0.0 || sat.t * sat.atime <= 0.0 || sat.t.abs() < sat.atime.abs() {
        sat.atime = 0.0;
        sat.xni = sat.no_unkozai;
        sat.xli = sat.xlamo;
    }

    let delt = if sat.t > 0.0 { STEPP } else { STEPN };

    let mut xndt = 0.0_f64;
    let mut xnddt = 0.0_f64;
    let mut xldot = 0.0_f64;
    let mut ft = 0.0_f64;

    loop {
        if sat.irez != 2 {
            xndt = sat.del1 * (sat.xli - FASX2).sin()
                + sat.del2 * (2.0 * (sat.xli - FASX4)).sin()
                + sat.del3 * (3.0 * (sat.xli - FASX6)).sin();
            xldot = sat.xni + sat.xfact;
            xnddt = sat.del1 * (sat.xli - FASX2).cos()
                + 2.0 * sat.del2 * (2.0 * (sat.xli - FASX4)).cos()
                + 3.0 * sat.del3 * (3.0 * (sat.xli - FASX6)).cos();
            xnddt *= xldot;
        } else {
            let xomi = sat.argpo + sat.argpdot * sat.atime;
            let x2omi = xomi + xomi;
            let x2li = sat.xli + sat.xli;

            xndt = sat.d2201 * (x2omi + sat.xli - G22).sin()
                + sat.d2211 * (sat.xli - G22).sin()
                + sat.d3210 * (xomi + sat.xli - G32).sin()
                + sat.d3222 * (-xomi + sat.xli - G32).sin()
                + sat.d4410 * (x2omi + x2li - G44).sin()
                + sat.d4422 * (x2li - G44).sin()
                + sat.d5220 * (xomi + sat.xli - G52).sin()
                + sat.d5232 * (-xomi + sat.xli - G52).sin()
                + sat.d5421 * (xomi + x2li - G54).sin()
                + sat.d5433 * (-xomi + x2li - G54).sin();

            xldot = sat.xni + sat.xfact;
            xnddt = sat.d2201 * (x2omi + sat.xli - G22).cos()
                + sat.d2211 * (sat.xli - G22).cos()
                + sat.d3210 * (xomi + sat.xli - G32).cos()
                + sat.d3222 * (-xomi + sat.xli - G32).cos()
                + sat.d5220 * (xomi + sat.xli - G52).cos()
                + sat.d5232 * (-xomi + sat.xli - G52).cos()
                + 2.0
                    * (sat.d4410 * (x2omi + x2li - G44).cos()
                        + sat.d4422 * (x2li - G44).cos()
                        + sat.d5421 * (xomi + x2li - G54).cos()
                        + sat.d5433 * (-xomi + x2li - G54).cos());
            xnddt *= xldot;
        }

        if (sat.t - sat.atime).abs() >= STEPP {
            sat.xli += xldot * delt + xndt * STEP2;
            sat.xni += xndt * delt + xnddt * STEP2;
            sat.atime += delt;
        } else {
            ft = sat.t - sat.atime;
            break;
        }
    }

    sat.nm = sat.xni + xndt * ft + xnddt * ft * ft * 0.5;
    let xl = sat.xli + xldot * ft + xndt * ft * ft * 0.5;

    if sat.irez != 1 {
        sat.mm = xl - 2.0 * sat.nodem + 2.0 * theta;
        sat.dndt = sat.nm - sat.no_unkozai;
    } else {
        sat.mm = xl - sat.nodem - sat.argpm + theta;
        sat.dndt = sat.nm - sat.no_unkozai;
    }
    sat.nm = sat.no_unkozai + sat.dndt;
}

/// Reentrant: applies the long-period lunar/solar periodics to `e, i, Omega,
/// omega, M` on `sat` (the `p`-suffixed working fields), using the Lyddane
/// modification below 0.2 rad inclination (spec.md §4.5).
pub fn dpper(sat: &mut SatelliteState, t: f64, init: InitPhase) {
    let mut zm = if init == InitPhase::Initializing { sat.zmos } else { sat.zmos + ZNS * t };

    let mut zf = zm + 2.0 * ZES * zm.sin();
    let mut sinzf = zf.sin();
    let mut f2 = 0.5 * sinzf * sinzf - 0.25;
    let mut f3 = -0.5 * sinzf * zf.cos();

    let ses = sat.se2 * f2 + sat.se3 * f3;
    let sis = sat.si2 * f2 + sat.si3 * f3;
    let sls = sat.sl2 * f2 + sat.sl3 * f3 + sat.sl4 * sinzf;
    let sghs = sat.sgh2 * f2 + sat.sgh3 * f3 + sat.sgh4 * sinzf;
    let shs = sat.sh2 * f2 + sat.sh3 * f3;

    zm = if init == InitPhase::Initializing { sat.zmol } else { sat.zmol + ZNL * t };

    zf = zm + 2.0 * ZEL * zm.sin();
    sinzf = zf.sin();
    f2 = 0.5 * sinzf * sinzf - 0.25;
    f3 = -0.5 * sinzf * zf.cos();

    let sel = sat.ee2 * f2 + sat.e3 * f3;
    let sil = sat.xi2 * f2 + sat.xi3 * f3;
    let sll = sat.xl2 * f2 + sat.xl3 * f3 + sat.xl4 * sinzf;
    let sghl = sat.xgh2 * f2 + sat.xgh3 * f3 + sat.xgh4 * sinzf;
    let shll = sat.xh2 * f2 + sat.xh3 * f3;

    let mut pe = ses + sel;
    let mut pinc = sis + sil;
    let mut pl = sls + sll;
    let mut pgh = sghs + sghl;
    let mut ph = shs + shll;

    if init == InitPhase::Running {
        pe -= sat.peo;
        pinc -= sat.pinco;
        pl -= sat.plo;
        pgh -= sat.pgho;
        ph -= sat.pho;
        sat.inclp += pinc;
        sat.ep += pe;

        let sinip = sat.inclp.sin();
        let cosip = sat.inclp.cos();

        if sat.inclp >= 0.2 {
            ph /= sinip;
            pgh -= cosip * ph;
            sat.argpp += pgh;
            sat.nodep += ph;
            sat.mp += pl;
        } else {
            let sinop = sat.nodep.sin();
            let cosop = sat.nodep.cos();
            let mut alfdp = sinip * sinop;
            let mut betdp = sinip * cosop;
            let dalf = ph * cosop + pinc * cosip * sinop;
            let dbet = -ph * sinop + pinc * cosip * cosop;
            alfdp += dalf;
            betdp += dbet;

            sat.nodep = sat.nodep.rem_euclid(TWOPI);
            if sat.nodep < 0.0 && sat.operation_mode == OperationMode::Afspc {
                sat.nodep += TWOPI;
            }

            let mut xls = sat.mp + sat.argpp + cosip * sat.nodep;
            let dls = pl + pgh - pinc * sat.nodep * sinip;
            xls += dls;
            xls = xls.rem_euclid(TWOPI);
            let xnoh = sat.nodep;
            sat.nodep = alfdp.atan2(betdp);
            if sat.nodep < 0.0 && sat.operation_mode == OperationMode::Afspc {
                sat.nodep += TWOPI;
            }
            if (xnoh - sat.nodep).abs() > std::f64::consts::PI {
                if sat.nodep < xnoh {
                    sat.nodep += TWOPI;
                } else {
                    sat.nodep -= TWOPI;
                }
            }

            sat.mp += pl;
            sat.argpp = xls - sat.mp - cosip * sat.nodep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GravityModel;

    #[test]
    fn dsinit_classifies_synchronous_resonance() {
        let mut sat = SatelliteState::blank(GravityModel::Wgs72, OperationMode::Improved);
        sat.nm = 0.0043;
        sat.em = 0.01;
        sat.gsto = 1.0;
        sat.argpo = 0.1;
        sat.nodeo = 0.2;
        sat.mo = 0.3;
        sat.mdot = 0.004;
        sat.nodedot = 0.0001;
        dsinit(&mut sat, 0.0, 0.0041);
        assert_eq!(sat.irez, 1);
    }

    #[test]
    fn dsinit_classifies_molniya_resonance() {
        let mut sat = SatelliteState::blank(GravityModel::Wgs72, OperationMode::Improved);
        sat.nm = 0.0087;
        sat.em = 0.72;
        dsinit(&mut sat, 0.0, 0.0041);
        assert_eq!(sat.irez, 2);
        assert_ne!(sat.d2201, 0.0);
    }

    #[test]
    fn dsinit_no_resonance_outside_bands() {
        let mut sat = SatelliteState::blank(GravityModel::Wgs72, OperationMode::Improved);
        sat.nm = 0.06;
        sat.em = 0.01;
        dsinit(&mut sat, 0.0, 0.0041);
        assert_eq!(sat.irez, 0);
    }
}
