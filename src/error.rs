use thiserror::Error;

use crate::math::ode::OdeError;
use crate::model::seiwr::SeiwrConfig;

pub type LeptoResult<T> = Result<T, LeptoError>;

/// Unified error type for the simulation and prediction engines.
///
/// All errors are deterministic functions of the inputs and are reported
/// synchronously; nothing is retried internally.
#[derive(Debug, Error)]
pub enum LeptoError {
    /// A caller-supplied parameter is outside the supported range.
    /// Rejected before any computation begins.
    #[error("parameter `{name}` out of range: {value} ({constraint})")]
    ParameterRange {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },

    /// The integrator diverged, produced non-finite values, or exhausted
    /// its step budget. Carries the offending parameter set; a partial
    /// trajectory is never returned.
    #[error("simulation failed: {source} (config: {config:?})")]
    Simulation {
        #[source]
        source: OdeError,
        config: Box<SeiwrConfig>,
    },

    /// Trend prediction was asked to fit fewer records than it can use.
    #[error("insufficient history: {got} record(s), need at least {min}")]
    InsufficientHistory { got: usize, min: usize },
}

impl LeptoError {
    /// Range-check failure for a single named parameter.
    pub fn parameter(name: &'static str, value: f64, constraint: &'static str) -> Self {
        Self::ParameterRange {
            name,
            value,
            constraint,
        }
    }
}
