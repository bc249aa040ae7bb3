use thiserror::Error;

use crate::retrofit::curves::CurveRole;
use crate::domain::CurveKind;

/// Kind of named entity a measure needs to find in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ThermalZone,
    PlantLoop,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::ThermalZone => write!(f, "thermal zone"),
            EntityKind::PlantLoop => write!(f, "plant loop"),
        }
    }
}

/// Errors raised while applying a retrofit. All of them are fatal for the
/// measure that raised them.
#[derive(Debug, Clone, Error)]
pub enum RetrofitError {
    #[error("No {kind} matching '{pattern}' found")]
    RequiredEntityNotFound { kind: EntityKind, pattern: String },

    #[error("Unknown technology: {0}")]
    UnknownTechnology(String),

    #[error("Curve set for {technology} is missing its {role} curve")]
    IncompleteCurveSet { technology: String, role: CurveRole },

    #[error("Curve '{curve}' is {found} but the {role} slot needs a {expected} curve")]
    CurveFormMismatch {
        curve: String,
        role: CurveRole,
        expected: CurveKind,
        found: CurveKind,
    },

    #[error("Failed to convert {value} from {from} to {to}")]
    ConversionFailed {
        value: f64,
        from: String,
        to: String,
    },

    #[error("Failed to construct {0}")]
    ConstructionFailed(String),

    #[error("Invalid selection for {measure}: {value}")]
    InvalidSelection { measure: String, value: String },
}

pub type Result<T> = std::result::Result<T, RetrofitError>;
