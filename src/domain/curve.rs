use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Valid input range of one independent variable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InputDomain {
    pub min: f64,
    pub max: f64,
}

impl InputDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Shape of a performance curve.
///
/// Biquadratic: `c1 + c2·x + c3·x² + c4·y + c5·y² + c6·x·y`
/// Cubic: `c1 + c2·x + c3·x² + c4·x³`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveForm {
    Biquadratic {
        coefficients: [f64; 6],
        x: InputDomain,
        y: InputDomain,
    },
    Cubic {
        coefficients: [f64; 4],
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Biquadratic,
    Cubic,
}

impl std::fmt::Display for CurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveKind::Biquadratic => write!(f, "biquadratic"),
            CurveKind::Cubic => write!(f, "cubic"),
        }
    }
}

/// Immutable coil performance curve. Coils reference curves by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceCurve {
    pub id: Uuid,
    pub name: String,
    pub form: CurveForm,
}

impl PerformanceCurve {
    /// Curve identity is derived from the name, so the same library entry
    /// always maps to the same id.
    pub fn biquadratic(name: &str, coefficients: [f64; 6], x: InputDomain, y: InputDomain) -> Self {
        Self {
            id: curve_id(name),
            name: name.to_string(),
            form: CurveForm::Biquadratic { coefficients, x, y },
        }
    }

    pub fn cubic(name: &str, coefficients: [f64; 4]) -> Self {
        Self {
            id: curve_id(name),
            name: name.to_string(),
            form: CurveForm::Cubic { coefficients },
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self.form {
            CurveForm::Biquadratic { .. } => CurveKind::Biquadratic,
            CurveForm::Cubic { .. } => CurveKind::Cubic,
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        match &self.form {
            CurveForm::Biquadratic { coefficients, .. } => coefficients,
            CurveForm::Cubic { coefficients } => coefficients,
        }
    }

    /// Evaluate the curve. Inputs are clamped to the curve's domain; `y` is
    /// ignored for cubic curves.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match &self.form {
            CurveForm::Biquadratic {
                coefficients: c,
                x: dx,
                y: dy,
            } => {
                let x = dx.clamp(x);
                let y = dy.clamp(y);
                c[0] + c[1] * x + c[2] * x * x + c[3] * y + c[4] * y * y + c[5] * x * y
            }
            CurveForm::Cubic { coefficients: c } => {
                c[0] + c[1] * x + c[2] * x * x + c[3] * x * x * x
            }
        }
    }
}

fn curve_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
