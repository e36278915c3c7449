//! Rootfinder ensemble.
//!
//! Runs every registered strategy for a (beam type, mode, precision) and
//! selects the result with the smallest residual. The strategies share
//! no mutable state; they simply run in registration order against the
//! same workspace.

use super::errors::RootfinderError;
use super::report::RootResult;
use super::rootfinders::ALL_ROOTFINDERS;
use crate::beam_types::BeamType;
use crate::numeric::{self, Workspace};

/// Runs every registered strategy and collects its result, keyed by
/// solver name, in registration order.
///
/// # Errors
/// The first strategy failure aborts the whole candidate collection; the
/// failure is logged and propagated untouched.
pub fn find_root_candidates(
    beam_type: BeamType,
    mode: u32,
    ws: &mut Workspace,
) -> Result<Vec<(&'static str, RootResult)>, RootfinderError> {
    let mut candidates = Vec::with_capacity(ALL_ROOTFINDERS.len());

    for rootfinder in ALL_ROOTFINDERS {
        match rootfinder.find_root(beam_type, mode, ws) {
            Ok(result) => candidates.push((rootfinder.solver_name(), result)),
            Err(err) => {
                log::warn!("{rootfinder} failed on {beam_type}, mode {mode}: {err}");
                return Err(err);
            }
        }
    }

    Ok(candidates)
}

/// Returns the candidate with the smallest residual.
///
/// A candidate replaces the incumbent only on a strictly smaller
/// residual, so exact ties resolve to the first-registered strategy.
/// Undefined residuals (excluded modes) never win a comparison, which
/// leaves the first strategy's sentinel in place; all sentinels for a
/// mode are identical anyway.
pub fn find_best_root(
    beam_type: BeamType,
    mode: u32,
    ws: &mut Workspace,
) -> Result<RootResult, RootfinderError> {
    let candidates = find_root_candidates(beam_type, mode, ws)?;

    let (best_name, best) = candidates
        .into_iter()
        .reduce(|incumbent, challenger| {
            if numeric::lt(challenger.1.residual(), incumbent.1.residual()) {
                challenger
            } else {
                incumbent
            }
        })
        .expect("at least one rootfinder is registered");

    log::debug!("{beam_type}: best root for mode {mode} found by {best_name}");
    Ok(best)
}
