//! Sign-change bracket search.
//!
//! Bracket-based solvers need an interval `[a, b]` with `f(a)` and `f(b)`
//! of opposite sign. The initial guesses supplied by the beam models are
//! analytically close to the true root, so a symmetric interval around
//! the guess, widened geometrically, finds a sign change in a handful of
//! steps.

use astro_float::BigFloat;

use super::errors::SearchError;
use super::signs::opposite_sign;
use crate::numeric::Workspace;

/// Safety cap on the widening loop. The loop has no analytic bound, but
/// a guess good enough to be worth bracketing never needs more than a
/// few widenings; with 5% growth this cap allows a ~10^21-fold expansion
/// before giving up.
pub const MAX_WIDENINGS: usize = 1000;

/// Expands a symmetric interval around `center` until `f` changes sign
/// across it.
///
/// # Arguments
/// - `f`      : the function to bracket, evaluated through `ws`
/// - `center` : midpoint of every candidate interval
/// - `width`  : width of the first candidate interval
/// - `growth` : factor the width grows by after each failed candidate
///
/// # Returns
/// - `Ok((a, b))` with `a < b`, `f(a)` and `f(b)` nonzero with opposite
///   signs
///
/// # Errors
/// - [`SearchError::MultipleRoots`]        : `f` is exactly zero at both ends,
///   a flat region that cannot be bracketed reliably
/// - [`SearchError::NoSignChange`]         : no sign change within [`MAX_WIDENINGS`]
/// - [`SearchError::NonFiniteEvaluation`]  : `f` produced NaN or infinity
pub fn find_sign_change<F>(
    f: &mut F,
    center: &BigFloat,
    width: &BigFloat,
    growth: &BigFloat,
    ws: &mut Workspace,
) -> Result<(BigFloat, BigFloat), SearchError>
where
    F: FnMut(&BigFloat, &mut Workspace) -> BigFloat,
{
    let p = ws.bits();
    let rm = ws.rounding();
    let half = ws.from_f64(0.5);
    let mut width = width.clone();

    for _ in 0..MAX_WIDENINGS {
        let half_width = width.mul(&half, p, rm);
        let a = center.sub(&half_width, p, rm);
        let b = center.add(&half_width, p, rm);

        let f_a = eval(f, &a, ws)?;
        let f_b = eval(f, &b, ws)?;

        if f_a.is_zero() && f_b.is_zero() {
            return Err(SearchError::MultipleRoots { a, b });
        }
        if opposite_sign(&f_a, &f_b) {
            return Ok((a, b));
        }

        width = width.mul(growth, p, rm);
    }

    Err(SearchError::NoSignChange { widenings: MAX_WIDENINGS })
}

fn eval<F>(f: &mut F, x: &BigFloat, ws: &mut Workspace) -> Result<BigFloat, SearchError>
where
    F: FnMut(&BigFloat, &mut Workspace) -> BigFloat,
{
    let fx = f(x, ws);
    if fx.is_nan() || fx.is_inf() {
        return Err(SearchError::NonFiniteEvaluation { x: x.clone() });
    }
    Ok(fx)
}
