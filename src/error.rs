//! Error types for build calculations.
//!
//! Every failure the crate can report is a variant of `CalcError`.
//! Missing catalog references (an unknown talent or outfit) are not
//! errors; they contribute zero and never reach the caller.

use thiserror::Error;

/// Errors raised while loading game data or computing build metrics.
///
/// # Examples
///
/// ```rust
/// use shrinestat::CalcError;
///
/// let err = CalcError::NoInvestedAttributes { race: "Etrean".into() };
/// assert!(err.to_string().contains("Etrean"));
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    /// A static catalog is malformed.
    ///
    /// Raised at load time only; computations never produce it.
    #[error("Invalid catalog {name}: {reason}")]
    Catalog { name: String, reason: String },

    /// A catalog file could not be read.
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// The build has no attribute with net investment, so there is
    /// nothing for the shrine to redistribute.
    #[error("No invested attributes to redistribute for race {race}")]
    NoInvestedAttributes { race: String },

    /// The resistance coefficient evaluated to zero (or below), which
    /// would divide the EHP formula by zero.
    #[error(
        "Resistance coefficient is not positive (pen {penetration}, resistance {resistance}, pen resistance {penetration_resistance})"
    )]
    ZeroResistanceCoefficient {
        penetration: f64,
        resistance: f64,
        penetration_resistance: f64,
    },

    /// A combat flag reached 100 or more, leaving `100 - flag` without a
    /// positive value.
    #[error("Combat flag {flag} has unusable value {value}")]
    InvalidFlag { flag: &'static str, value: f64 },

    /// A build payload that doesn't match the build service's shape.
    #[error("Invalid build record: {0}")]
    InvalidBuild(String),

    /// Scenario parameters that cannot describe an attacker.
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

impl CalcError {
    pub(crate) fn catalog(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Catalog {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
