//! IP ↔ SI unit conversion.
//!
//! Measures receive IP choices (cfm, gallons, °F, R-values) and convert them
//! through a [`UnitConverter`] before touching the model.

use crate::error::{Result, RetrofitError};

pub const CFM: &str = "cfm";
pub const FT3_PER_MIN: &str = "ft^3/min";
pub const M3_PER_S: &str = "m^3/s";
pub const GALLON: &str = "gal";
pub const M3: &str = "m^3";
pub const FAHRENHEIT: &str = "F";
pub const CELSIUS: &str = "C";
pub const R_VALUE_IP: &str = "ft^2*h*R/Btu";
pub const R_VALUE_SI: &str = "m^2*K/W";
pub const U_VALUE_IP: &str = "Btu/h*ft^2*R";
pub const U_VALUE_SI: &str = "W/m^2*K";

const M3_PER_S_PER_CFM: f64 = 0.000_471_947_443;
const M3_PER_GALLON: f64 = 0.003_785_411_784;
const SI_R_PER_IP_R: f64 = 0.176_110_2;
const SI_U_PER_IP_U: f64 = 5.678_263_34;

#[cfg_attr(test, mockall::automock)]
pub trait UnitConverter {
    /// `None` when the unit pair is not supported.
    fn convert(&self, value: f64, from: &str, to: &str) -> Option<f64>;
}

/// Convert or fail with [`RetrofitError::ConversionFailed`].
pub fn convert(units: &dyn UnitConverter, value: f64, from: &str, to: &str) -> Result<f64> {
    units
        .convert(value, from, to)
        .ok_or_else(|| RetrofitError::ConversionFailed {
            value,
            from: from.to_string(),
            to: to.to_string(),
        })
}

/// Conversion table covering the units the measures use.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUnits;

impl StandardUnits {
    fn linear_factor(from: &str, to: &str) -> Option<f64> {
        let forward = |a: &str, b: &str| from == a && to == b;
        let factor = if forward(CFM, M3_PER_S) || forward(FT3_PER_MIN, M3_PER_S) {
            M3_PER_S_PER_CFM
        } else if forward(M3_PER_S, CFM) || forward(M3_PER_S, FT3_PER_MIN) {
            1.0 / M3_PER_S_PER_CFM
        } else if forward(GALLON, M3) {
            M3_PER_GALLON
        } else if forward(M3, GALLON) {
            1.0 / M3_PER_GALLON
        } else if forward(R_VALUE_IP, R_VALUE_SI) {
            SI_R_PER_IP_R
        } else if forward(R_VALUE_SI, R_VALUE_IP) {
            1.0 / SI_R_PER_IP_R
        } else if forward(U_VALUE_IP, U_VALUE_SI) {
            SI_U_PER_IP_U
        } else if forward(U_VALUE_SI, U_VALUE_IP) {
            1.0 / SI_U_PER_IP_U
        } else if from == to {
            1.0
        } else {
            return None;
        };
        Some(factor)
    }
}

impl UnitConverter for StandardUnits {
    fn convert(&self, value: f64, from: &str, to: &str) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match (from, to) {
            (FAHRENHEIT, CELSIUS) => Some((value - 32.0) * 5.0 / 9.0),
            (CELSIUS, FAHRENHEIT) => Some(value * 9.0 / 5.0 + 32.0),
            _ => Self::linear_factor(from, to).map(|k| value * k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(75.0, CFM, M3_PER_S, 0.035_396)]
    #[case(250.0, GALLON, M3, 0.946_353)]
    #[case(125.0, FAHRENHEIT, CELSIUS, 51.666_667)]
    #[case(20.0, R_VALUE_IP, R_VALUE_SI, 3.522_204)]
    #[case(0.32, U_VALUE_IP, U_VALUE_SI, 1.817_044)]
    #[case(0.40, FT3_PER_MIN, M3_PER_S, 0.000_188_779)]
    fn test_standard_conversions(
        #[case] value: f64,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: f64,
    ) {
        let got = StandardUnits.convert(value, from, to).unwrap();
        assert!((got - expected).abs() < 1e-5, "{value} {from} -> {to}: {got}");
    }

    #[test]
    fn test_reverse_flow_conversion() {
        let m3s = StandardUnits.convert(75.0, CFM, M3_PER_S).unwrap();
        let back = StandardUnits.convert(m3s, M3_PER_S, CFM).unwrap();
        assert!((back - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_pair_fails() {
        assert_eq!(StandardUnits.convert(1.0, "cfm", "W"), None);
        let err = convert(&StandardUnits, 1.0, "cfm", "W").unwrap_err();
        assert!(matches!(err, RetrofitError::ConversionFailed { .. }));
    }

    #[test]
    fn test_non_finite_input_fails() {
        assert_eq!(StandardUnits.convert(f64::NAN, CFM, M3_PER_S), None);
    }
}
