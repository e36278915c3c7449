//! Root-finding error types.
//!
//! - [`SearchError`]     : kernel-level failures, no model context
//! - [`RootfinderError`] : strategy-level failures, tagged with the beam
//!   type and mode they occurred for
//!
//! Nothing here is retried or downgraded: every failure is reported to
//! the immediate caller.

use astro_float::BigFloat;
use thiserror::Error;

use crate::beam_types::BeamType;
use crate::numeric::NumericError;

/// Failures inside a numerical kernel (bracket expansion, regula falsi,
/// secant).
#[derive(Debug, Error)]
pub enum SearchError {
    /// The function is exactly zero at both bracket candidates; a flat
    /// region prevents reliable bracketing and is not disambiguated.
    #[error("found multiple roots in area [{a}, {b}]")]
    MultipleRoots { a: BigFloat, b: BigFloat },

    /// The widening loop hit its safety cap without a sign change.
    #[error("no sign change found after {widenings} widenings of the search interval")]
    NoSignChange { widenings: usize },

    #[error("function is non-finite at x = {x}")]
    NonFiniteEvaluation { x: BigFloat },

    #[error("invalid bracket [{a}, {b}]: endpoints must be ordered and straddle a sign change")]
    InvalidBracket { a: BigFloat, b: BigFloat },

    #[error("invalid starting points: x0 and x1 must be distinct")]
    InvalidStartingPoints,

    #[error("{algorithm} did not converge within {iterations} iterations")]
    NoConvergence {
        algorithm: &'static str,
        iterations: usize,
    },
}

/// Failures while finding the root of a beam characteristic equation.
#[derive(Debug, Error)]
pub enum RootfinderError {
    /// The equation has no root for this mode (rigid-body mode). Raised
    /// only when bracketing is requested for such a mode; plain root
    /// lookups return the undefined sentinel instead.
    #[error("{beam_type}: root is undefined for mode = {mode}")]
    UndefinedRoot { beam_type: BeamType, mode: u32 },

    #[error("{beam_type}: {source} for mode = {mode}")]
    Search {
        beam_type: BeamType,
        mode: u32,
        #[source]
        source: SearchError,
    },

    #[error(transparent)]
    Numeric(#[from] NumericError),
}
