//! Curve library: performance curve sets for each supported heat pump
//! technology.
//!
//! The coefficient tables are shared by every technology; only curve names
//! differ. Curves with the same name resolve to the same identity, so two
//! technologies that reuse a curve name share the curve object in a model.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::domain::{CurveKind, InputDomain, PerformanceCurve};
use crate::error::{Result, RetrofitError};

/// Heat pump technologies the zone retrofit can install.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Technology {
    #[strum(serialize = "Mini-Split")]
    #[serde(rename = "Mini-Split")]
    MiniSplit,
    #[strum(serialize = "Packaged HP")]
    #[serde(rename = "Packaged HP")]
    PackagedTerminalHeatPump,
    /// Baseline packaged in-unit heat pump.
    #[strum(serialize = "In-Unit HP")]
    #[serde(rename = "In-Unit HP")]
    InUnitHeatPump,
}

/// Rated cooling and heating COP of a coil pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatedCops {
    pub cooling: f64,
    pub heating: f64,
}

impl Technology {
    pub fn rated_cops(&self) -> RatedCops {
        match self {
            // SEER2 21 / HSPF2 10.2
            Technology::MiniSplit => RatedCops {
                cooling: 5.667,
                heating: 3.516,
            },
            // SEER2 13.65 / HSPF2 7.1
            Technology::PackagedTerminalHeatPump | Technology::InUnitHeatPump => RatedCops {
                cooling: 3.645,
                heating: 2.445,
            },
        }
    }

    /// Prefix used when naming the installed unit.
    pub fn unit_label(&self) -> &'static str {
        match self {
            Technology::MiniSplit => "Mini-Split HP",
            Technology::PackagedTerminalHeatPump => "Packaged Terminal HP",
            Technology::InUnitHeatPump => "Packaged Heat Pump",
        }
    }

    fn curve_names(&self) -> [&'static str; 6] {
        match self {
            Technology::MiniSplit => [
                "MiniSplit-Cool-Cap-fEWB&OAT",
                "MiniSplit-Cool-EIR-fEWB&OAT",
                "MiniSplit-Cool-EIR-fPLR",
                "MiniSplit-Heat-Cap-fT",
                "MiniSplit-Heat-EIR-fT",
                "MiniSplit-Heat-EIR-fPLR",
            ],
            Technology::PackagedTerminalHeatPump => [
                "PTHP-Cool-Cap-fEWB&OAT",
                "PTHP-Cool-EIR-fEWB&OAT",
                "PTHP-Cool-EIR-fPLR",
                "PTHP-Heat-Cap-fT",
                "PTHP-Heat-EIR-fT",
                "PTHP-Heat-EIR-fPLR",
            ],
            Technology::InUnitHeatPump => [
                "DX-Cool-Cap-fEWB&OAT",
                "DX-Cool-EIR-fEWB&OAT",
                "DX-Cool-EIR-fPLR",
                "MiniSplit-Heat-Cap-fT",
                "MiniSplit-Heat-EIR-fT",
                "PVVT-Heat-EIR-fPLR",
            ],
        }
    }
}

/// Slot a curve fills in a coil pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum CurveRole {
    CoolingCapacity,
    CoolingEir,
    CoolingPartLoad,
    HeatingCapacity,
    HeatingEir,
    HeatingPartLoad,
}

impl CurveRole {
    pub fn expected_kind(&self) -> CurveKind {
        match self {
            CurveRole::CoolingPartLoad | CurveRole::HeatingPartLoad => CurveKind::Cubic,
            CurveRole::CoolingCapacity
            | CurveRole::CoolingEir
            | CurveRole::HeatingCapacity
            | CurveRole::HeatingEir => CurveKind::Biquadratic,
        }
    }
}

impl std::fmt::Display for CurveRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CurveRole::CoolingCapacity => "cooling capacity f(EWB,OAT)",
            CurveRole::CoolingEir => "cooling EIR f(EWB,OAT)",
            CurveRole::CoolingPartLoad => "cooling EIR f(PLR)",
            CurveRole::HeatingCapacity => "heating capacity f(EDB,OAT)",
            CurveRole::HeatingEir => "heating EIR f(EDB,OAT)",
            CurveRole::HeatingPartLoad => "heating EIR f(PLR)",
        };
        write!(f, "{s}")
    }
}

/// Curves for one technology, keyed by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSet {
    pub technology: Technology,
    curves: BTreeMap<CurveRole, PerformanceCurve>,
}

impl CurveSet {
    pub fn new(technology: Technology) -> Self {
        Self {
            technology,
            curves: BTreeMap::new(),
        }
    }

    /// Put a curve into a slot. The curve's shape must match the slot.
    pub fn insert(&mut self, role: CurveRole, curve: PerformanceCurve) -> Result<()> {
        let expected = role.expected_kind();
        let found = curve.kind();
        if expected != found {
            return Err(RetrofitError::CurveFormMismatch {
                curve: curve.name,
                role,
                expected,
                found,
            });
        }
        self.curves.insert(role, curve);
        Ok(())
    }

    pub fn get(&self, role: CurveRole) -> Result<&PerformanceCurve> {
        self.curves
            .get(&role)
            .ok_or_else(|| RetrofitError::IncompleteCurveSet {
                technology: self.technology.to_string(),
                role,
            })
    }

    /// Fails on the first empty slot.
    pub fn ensure_complete(&self) -> Result<()> {
        CurveRole::iter().try_for_each(|role| self.get(role).map(|_| ()))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn curves(&self) -> impl Iterator<Item = (&CurveRole, &PerformanceCurve)> {
        self.curves.iter()
    }
}

// DX cooling capacity f(EWB, OAT); EWB 19.4-23.9 °C (~67-75 °F), OAT 21.1-40.6 °C (~70-105 °F)
const COOL_CAP_COEFFS: [f64; 6] = [0.87403017, -0.0011416, 0.0001711, -0.002957, 0.00001018, -0.00005917];
const COOL_CAP_X: InputDomain = InputDomain::new(19.4, 23.9);
const COOL_CAP_Y: InputDomain = InputDomain::new(21.1, 40.6);

const COOL_EIR_COEFFS: [f64; 6] = [0.9, 0.005, -0.00005, 0.002, 0.00002, -0.0001];
const COOL_EIR_X: InputDomain = InputDomain::new(17.0, 25.0);
const COOL_EIR_Y: InputDomain = InputDomain::new(25.0, 40.0);

const COOL_PLR_COEFFS: [f64; 4] = [0.20123008, -0.0312175, 1.95049798, -1.12051034];

// Heating curves: indoor EDB 15.6-23.9 °C, OAT -8.3-8.3 °C
const HEAT_CAP_COEFFS: [f64; 6] = [0.70, 0.0, 0.0, 0.025, -0.0001, 0.0];
const HEAT_EIR_COEFFS: [f64; 6] = [0.70, 0.0, 0.0, -0.040, 0.0010, 0.0];
const HEAT_X: InputDomain = InputDomain::new(15.6, 23.9);
const HEAT_Y: InputDomain = InputDomain::new(-8.3, 8.3);

const HEAT_PLR_COEFFS: [f64; 4] = [0.08565216, 0.93881381, -0.18343613, 0.15897022];

fn library_entry(technology: Technology) -> Result<CurveSet> {
    let [cool_cap, cool_eir, cool_plr, heat_cap, heat_eir, heat_plr] = technology.curve_names();
    let mut set = CurveSet::new(technology);
    set.insert(
        CurveRole::CoolingCapacity,
        PerformanceCurve::biquadratic(cool_cap, COOL_CAP_COEFFS, COOL_CAP_X, COOL_CAP_Y),
    )?;
    set.insert(
        CurveRole::CoolingEir,
        PerformanceCurve::biquadratic(cool_eir, COOL_EIR_COEFFS, COOL_EIR_X, COOL_EIR_Y),
    )?;
    set.insert(CurveRole::CoolingPartLoad, PerformanceCurve::cubic(cool_plr, COOL_PLR_COEFFS))?;
    set.insert(
        CurveRole::HeatingCapacity,
        PerformanceCurve::biquadratic(heat_cap, HEAT_CAP_COEFFS, HEAT_X, HEAT_Y),
    )?;
    set.insert(
        CurveRole::HeatingEir,
        PerformanceCurve::biquadratic(heat_eir, HEAT_EIR_COEFFS, HEAT_X, HEAT_Y),
    )?;
    set.insert(CurveRole::HeatingPartLoad, PerformanceCurve::cubic(heat_plr, HEAT_PLR_COEFFS))?;
    Ok(set)
}

fn build_library() -> Result<HashMap<Technology, CurveSet>> {
    Technology::iter()
        .map(|t| -> Result<(Technology, CurveSet)> {
            let set = library_entry(t)?;
            set.ensure_complete()?;
            Ok((t, set))
        })
        .collect()
}

static CURVE_LIBRARY: Lazy<Result<HashMap<Technology, CurveSet>>> = Lazy::new(build_library);

/// Curve set of a technology. A malformed library entry surfaces here as the
/// error that broke it.
pub fn curve_set(technology: Technology) -> Result<&'static CurveSet> {
    let library = (*CURVE_LIBRARY).as_ref().map_err(|e| e.clone())?;
    library
        .get(&technology)
        .ok_or_else(|| RetrofitError::UnknownTechnology(technology.to_string()))
}

/// Curve set looked up by its option tag, e.g. `"Mini-Split"`.
pub fn curve_set_for(tag: &str) -> Result<&'static CurveSet> {
    let technology =
        Technology::from_str(tag).map_err(|_| RetrofitError::UnknownTechnology(tag.to_string()))?;
    curve_set(technology)
}
