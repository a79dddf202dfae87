//! The mutable propagator aggregate: [`SatelliteState`] and the mode
//! enumerations the reference theory encodes as single-character flags
//! (spec.md §9 redesign flag).

use crate::constants::{GravConst, GravityModel};

/// Orbital regime selected by [`crate::sgp4::sgp4_init`] from the period at
/// epoch. Deep-space orbits (period >= 225 min) route through
/// [`crate::deepspace`] on every stepper call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    NearEarth,
    DeepSpace,
}

/// Whether a [`SatelliteState`] has completed its one-shot initialization.
/// `Initializing` suppresses the `dpper`/`dspace` time-varying terms so the
/// deep-space setup sequence sees epoch values instead of propagated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Initializing,
    Running,
}

/// Selects the quadrant-wrapping convention for right ascension in
/// `dpper`'s Lyddane branch. `Afspc` matches the original Air Force Space
/// Command source; `Improved` is Vallado's corrected revision. Default is
/// `Improved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    Afspc,
    #[default]
    Improved,
}

/// The full mutable propagator state for one satellite, built once by
/// [`crate::sgp4::sgp4_init`] and thereafter mutated in place by
/// [`crate::sgp4::sgp4`] (spec.md §3, §5: the deep-space resonance
/// integrator carries real state across calls, so this is a single owned
/// aggregate rather than an immutable per-call value).
#[derive(Debug, Clone)]
pub struct SatelliteState {
    // --- constants ---
    pub gravity_model: GravityModel,
    pub grav: GravConst,
    pub operation_mode: OperationMode,

    // --- mean elements (as parsed, un-kozai'd mean motion added by init) ---
    pub satnum: u32,
    pub bstar: f64,
    pub ecco: f64,
    pub inclo: f64,
    pub nodeo: f64,
    pub argpo: f64,
    pub mo: f64,
    pub no_kozai: f64,
    pub no_unkozai: f64,

    // --- epoch ---
    pub jdsatepoch: f64,
    pub jdsatepochf: f64,
    /// Days from 1950-01-01 00:00 UTC (`JD_1950`), the stepper's internal
    /// time origin.
    pub epoch: f64,

    // --- near-Earth coefficients (initl + sgp4_init) ---
    pub method: Method,
    pub init: InitPhase,
    pub isimp: bool,
    pub a: f64,
    pub alta: f64,
    pub altp: f64,
    pub ao: f64,
    pub ainv: f64,
    pub con41: f64,
    pub con42: f64,
    pub cosio: f64,
    pub cosio2: f64,
    pub eccsq: f64,
    pub omeosq: f64,
    pub posq: f64,
    pub rp: f64,
    pub rteosq: f64,
    pub sinio: f64,
    pub gsto: f64,
    pub eta: f64,
    pub cc1: f64,
    pub cc4: f64,
    pub cc5: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub delmo: f64,
    pub argpdot: f64,
    pub omgcof: f64,
    pub sinmao: f64,
    pub t2cof: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
    pub mdot: f64,
    pub nodedot: f64,
    pub xlcof: f64,
    pub xmcof: f64,
    pub nodecf: f64,
    pub aycof: f64,

    // --- deep-space resonance (dsinit / dspace) ---
    pub irez: i32,
    pub d2201: f64,
    pub d2211: f64,
    pub d3210: f64,
    pub d3222: f64,
    pub d4410: f64,
    pub d4422: f64,
    pub d5220: f64,
    pub d5232: f64,
    pub d5421: f64,
    pub d5433: f64,
    pub del1: f64,
    pub del2: f64,
    pub del3: f64,
    pub xlamo: f64,
    pub xfact: f64,
    pub atime: f64,
    pub xli: f64,
    pub xni: f64,
    pub dedt: f64,
    pub didt: f64,
    pub dmdt: f64,
    pub dnodt: f64,
    pub domdt: f64,
    pub dndt: f64,

    // --- luni-solar periodics (dscom / dpper) ---
    pub e3: f64,
    pub ee2: f64,
    pub peo: f64,
    pub pgho: f64,
    pub pho: f64,
    pub pinco: f64,
    pub plo: f64,
    pub se2: f64,
    pub se3: f64,
    pub sgh2: f64,
    pub sgh3: f64,
    pub sgh4: f64,
    pub sh2: f64,
    pub sh3: f64,
    pub si2: f64,
    pub si3: f64,
    pub sl2: f64,
    pub sl3: f64,
    pub sl4: f64,
    pub xgh2: f64,
    pub xgh3: f64,
    pub xgh4: f64,
    pub xh2: f64,
    pub xh3: f64,
    pub xi2: f64,
    pub xi3: f64,
    pub xl2: f64,
    pub xl3: f64,
    pub xl4: f64,
    pub zmol: f64,
    pub zmos: f64,

    /// `dscom`'s solar/lunar intermediate terms, consumed by `dsinit`
    /// immediately after `dscom` runs and never read again afterwards.
    /// Kept on the struct (rather than threaded as extra return values)
    /// because `dscom` and `dsinit` are separate one-shot calls from
    /// `sgp4_init`, matching how the reference theory passes them through
    /// the shared record.
    pub(crate) dscom_scratch: DscomScratch,

    // --- singly-averaged mean elements, live across a stepper call ---
    pub am: f64,
    pub em: f64,
    pub inclm: f64,
    pub nodem: f64,
    pub argpm: f64,
    pub mm: f64,
    pub nm: f64,
    pub t: f64,
    pub ep: f64,
    pub inclp: f64,
    pub nodep: f64,
    pub argpp: f64,
    pub mp: f64,

    pub error: Option<u8>,
}

/// Intermediate solar/lunar terms computed by `dscom` and read back by
/// `dsinit`. Not part of the spec's public field groups; this is purely an
/// implementation seam between two one-shot initializer sub-steps.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DscomScratch {
    pub snodm: f64,
    pub cnodm: f64,
    pub sinim: f64,
    pub cosim: f64,
    pub sinomm: f64,
    pub cosomm: f64,
    pub day: f64,
    pub emsq: f64,
    pub gam: f64,
    pub rtemsq: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
    pub s7: f64,
    pub ss1: f64,
    pub ss2: f64,
    pub ss3: f64,
    pub ss4: f64,
    pub ss5: f64,
    pub ss6: f64,
    pub ss7: f64,
    pub sz1: f64,
    pub sz2: f64,
    pub sz3: f64,
    pub sz11: f64,
    pub sz12: f64,
    pub sz13: f64,
    pub sz21: f64,
    pub sz22: f64,
    pub sz23: f64,
    pub sz31: f64,
    pub sz32: f64,
    pub sz33: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z11: f64,
    pub z12: f64,
    pub z13: f64,
    pub z21: f64,
    pub z22: f64,
    pub z23: f64,
    pub z31: f64,
    pub z32: f64,
    pub z33: f64,
}

impl SatelliteState {
    /// A zeroed state for the given gravity model, matching the reference
    /// theory's practice of clearing every near-Earth and deep-space field
    /// before `sgp4_init` runs (spec.md §4.3 step 0).
    pub(crate) fn blank(gravity_model: GravityModel, operation_mode: OperationMode) -> Self {
        SatelliteState {
            gravity_model,
            grav: gravity_model.constants(),
            operation_mode,
            satnum: 0,
            bstar: 0.0,
            ecco: 0.0,
            inclo: 0.0,
            nodeo: 0.0,
            argpo: 0.0,
            mo: 0.0,
            no_kozai: 0.0,
            no_unkozai: 0.0,
            jdsatepoch: 0.0,
            jdsatepochf: 0.0,
            epoch: 0.0,
            method: Method::NearEarth,
            init: InitPhase::Initializing,
            isimp: false,
            a: 0.0,
            alta: 0.0,
            altp: 0.0,
            ao: 0.0,
            ainv: 0.0,
            con41: 0.0,
            con42: 0.0,
            cosio: 0.0,
            cosio2: 0.0,
            eccsq: 0.0,
            omeosq: 0.0,
            posq: 0.0,
            rp: 0.0,
            rteosq: 0.0,
            sinio: 0.0,
            gsto: 0.0,
            eta: 0.0,
            cc1: 0.0,
            cc4: 0.0,
            cc5: 0.0,
            d2: 0.0,
            d3: 0.0,
            d4: 0.0,
            delmo: 0.0,
            argpdot: 0.0,
            omgcof: 0.0,
            sinmao: 0.0,
            t2cof: 0.0,
            t3cof: 0.0,
            t4cof: 0.0,
            t5cof: 0.0,
            x1mth2: 0.0,
            x7thm1: 0.0,
            mdot: 0.0,
            nodedot: 0.0,
            xlcof: 0.0,
            xmcof: 0.0,
            nodecf: 0.0,
            aycof: 0.0,
            irez: 0,
            d2201: 0.0,
            d2211: 0.0,
            d3210: 0.0,
            d3222: 0.0,
            d4410: 0.0,
            d4422: 0.0,
            d5220: 0.0,
            d5232: 0.0,
            d5421: 0.0,
            d5433: 0.0,
            del1: 0.0,
            del2: 0.0,
            del3: 0.0,
            xlamo: 0.0,
            xfact: 0.0,
            atime: 0.0,
            xli: 0.0,
            xni: 0.0,
            dedt: 0.0,
            didt: 0.0,
            dmdt: 0.0,
            dnodt: 0.0,
            domdt: 0.0,
            dndt: 0.0,
            e3: 0.0,
            ee2: 0.0,
            peo: 0.0,
            pgho: 0.0,
            pho: 0.0,
            pinco: 0.0,
            plo: 0.0,
            se2: 0.0,
            se3: 0.0,
            sgh2: 0.0,
            sgh3: 0.0,
            sgh4: 0.0,
            sh2: 0.0,
            sh3: 0.0,
            si2: 0.0,
            si3: 0.0,
            sl2: 0.0,
            sl3: 0.0,
            sl4: 0.0,
            xgh2: 0.0,
            xgh3: 0.0,
            xgh4: 0.0,
            xh2: 0.0,
            xh3: 0.0,
            xi2: 0.0,
            xi3: 0.0,
            xl2: 0.0,
            xl3: 0.0,
            xl4: 0.0,
            zmol: 0.0,
            zmos: 0.0,
            dscom_scratch: DscomScratch::default(),
            am: 0.0,
            em: 0.0,
            inclm: 0.0,
            nodem: 0.0,
            argpm: 0.0,
            mm: 0.0,
            nm: 0.0,
            t: 0.0,
            ep: 0.0,
            inclp: 0.0,
            nodep: 0.0,
            argpp: 0.0,
            mp: 0.0,
            error: None,
        }
    }

    /// Orbital period in minutes at epoch, `2*pi/no_unkozai`. Used by
    /// `sgp4_init` to decide near-Earth vs. deep-space (spec.md §4.3 step 9).
    pub fn period_minutes(&self) -> f64 {
        std::f64::consts::TAU / self.no_unkozai
    }
}
