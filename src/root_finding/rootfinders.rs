//! Rootfinder strategies.
//!
//! Four registered strategies, fixed at compile time:
//! - [`Rootfinder::Anderson`], [`Rootfinder::Illinois`],
//!   [`Rootfinder::Pegasus`] : bracket based (regula falsi family)
//! - [`Rootfinder::Secant`]  : starting-point based
//!
//! Every strategy implements the same contract: given a beam type, a
//! mode and a workspace, return the root of the characteristic equation
//! together with its residual at the workspace precision, or the
//! undefined sentinel for excluded modes.

use std::fmt;

use astro_float::BigFloat;

use super::bracket;
use super::errors::RootfinderError;
use super::regula_falsi::{regula_falsi, FalsiVariant};
use super::report::RootResult;
use super::secant::secant;
use crate::beam_types::BeamType;
use crate::numeric::Workspace;

/// How a strategy obtains its starting data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFamily {
    /// Needs an interval with a sign change, found by the bracket search.
    Bracketed,
    /// Needs a single starting estimate, the model's initial guess.
    StartingPoint,
}

/// A registered root-finding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rootfinder {
    Anderson,
    Illinois,
    Pegasus,
    Secant,
}

/// Every strategy, in registration order. The ensemble's tie-break
/// follows this order.
pub const ALL_ROOTFINDERS: [Rootfinder; 4] = [
    Rootfinder::Anderson,
    Rootfinder::Illinois,
    Rootfinder::Pegasus,
    Rootfinder::Secant,
];

impl Rootfinder {
    pub const fn solver_name(self) -> &'static str {
        match self {
            Rootfinder::Anderson => "anderson",
            Rootfinder::Illinois => "illinois",
            Rootfinder::Pegasus  => "pegasus",
            Rootfinder::Secant   => "secant",
        }
    }

    pub const fn family(self) -> SolverFamily {
        match self {
            Rootfinder::Secant => SolverFamily::StartingPoint,
            _                  => SolverFamily::Bracketed,
        }
    }

    /// Finds the root of the characteristic equation nearest the mode's
    /// initial guess.
    ///
    /// For an excluded mode no numerics run at all: the result carries
    /// the model's conventional value with an undefined residual.
    /// Otherwise the strategy's kernel runs at the workspace precision,
    /// the root is stamped to that precision, and the residual
    /// `|f(root)|` is evaluated at it.
    ///
    /// # Errors
    /// [`RootfinderError::Search`] wrapping whatever the bracket search
    /// or the kernel raised; convergence failures are never masked.
    pub fn find_root(
        self,
        beam_type: BeamType,
        mode: u32,
        ws: &mut Workspace,
    ) -> Result<RootResult, RootfinderError> {
        if beam_type.is_mode_excluded(mode) {
            // characteristic equation is not defined for this mode
            let guess = beam_type.initial_guess(mode, ws);
            let guess = ws.stamp(&guess);
            return Ok(RootResult::undefined(guess, ws));
        }

        let root = self.improve_root(beam_type, mode, ws)?;
        let root = ws.stamp(&root);

        let residual = beam_type.characteristic(&root, ws).abs();
        let residual = ws.stamp(&residual);

        Ok(RootResult::new(root, residual))
    }

    /// Runs the underlying numerical method for a non-excluded mode.
    fn improve_root(
        self,
        beam_type: BeamType,
        mode: u32,
        ws: &mut Workspace,
    ) -> Result<BigFloat, RootfinderError> {
        let mut f = |x: &BigFloat, ws: &mut Workspace| beam_type.characteristic(x, ws);

        match self {
            Rootfinder::Secant => {
                let x0 = beam_type.initial_guess(mode, ws);
                let quarter = ws.from_f64(0.25);
                let x1 = x0.add(&quarter, ws.bits(), ws.rounding());
                secant(&mut f, x0, x1, ws)
                    .map_err(|source| RootfinderError::Search { beam_type, mode, source })
            }

            Rootfinder::Anderson | Rootfinder::Illinois | Rootfinder::Pegasus => {
                let (a, b) = search_bracket(beam_type, mode, ws)?;
                let variant = match self {
                    Rootfinder::Anderson => FalsiVariant::AndersonBjorck,
                    Rootfinder::Pegasus  => FalsiVariant::Pegasus,
                    _                    => FalsiVariant::Illinois,
                };
                regula_falsi(&mut f, a, b, variant, ws)
                    .map_err(|source| RootfinderError::Search { beam_type, mode, source })
            }
        }
    }
}

impl fmt::Display for Rootfinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.solver_name())
    }
}

/// Guesses the optimal root search interval for a mode.
///
/// Expands a symmetric interval around the model's initial guess, using
/// the model's search-width policy, until the characteristic function
/// changes sign across it.
///
/// # Errors
/// - [`RootfinderError::UndefinedRoot`] : the mode is excluded, so
///   bracketing is meaningless
/// - [`RootfinderError::Search`]        : the expansion failed (flat zero
///   region, widening cap, non-finite evaluation)
pub fn search_bracket(
    beam_type: BeamType,
    mode: u32,
    ws: &mut Workspace,
) -> Result<(BigFloat, BigFloat), RootfinderError> {
    if beam_type.is_mode_excluded(mode) {
        return Err(RootfinderError::UndefinedRoot { beam_type, mode });
    }

    let center = beam_type.initial_guess(mode, ws);
    let width = beam_type.search_width_start(ws);
    let growth = beam_type.search_width_growth(ws);

    let mut f = |x: &BigFloat, ws: &mut Workspace| beam_type.characteristic(x, ws);
    bracket::find_sign_change(&mut f, &center, &width, &growth, ws)
        .map_err(|source| RootfinderError::Search { beam_type, mode, source })
}
