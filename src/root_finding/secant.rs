//! Secant kernel over arbitrary precision values.
//!
//! The only starting-point based method in the ensemble: it needs no
//! bracket, just two distinct initial iterates, and converges
//! superlinearly near a simple root. A collapsed denominator triggers a
//! half-step fallback instead of an error, so a transient plateau cannot
//! abort an otherwise convergent run.

use astro_float::BigFloat;

use super::errors::SearchError;
use super::MAX_ITERATIONS;
use crate::numeric::{self, Workspace};

/// Finds a root of `f` starting from the iterates `x0`, `x1`.
///
/// # Arguments
/// - `f`        : the function, evaluated through `ws`
/// - `x0`, `x1` : distinct starting iterates; callers that only have one
///   estimate conventionally pass `x1 = x0 + 1/4`
///
/// # Returns
/// The root approximation: the first iterate with `|f(x)|` below the
/// workspace convergence tolerance, or the iterate whose step from its
/// predecessor drops below the relative step tolerance.
///
/// # Errors
/// - [`SearchError::InvalidStartingPoints`] : `x0 == x1`
/// - [`SearchError::NonFiniteEvaluation`]   : `f` produced NaN or infinity
/// - [`SearchError::NoConvergence`]         : iteration safety cap reached
pub fn secant<F>(
    f: &mut F,
    x0: BigFloat,
    x1: BigFloat,
    ws: &mut Workspace,
) -> Result<BigFloat, SearchError>
where
    F: FnMut(&BigFloat, &mut Workspace) -> BigFloat,
{
    let p = ws.bits();
    let rm = ws.rounding();
    let fx_tol = ws.convergence_tol();

    if x0 == x1 {
        return Err(SearchError::InvalidStartingPoints);
    }

    let mut x_prev = x0;
    let mut f_prev = eval(f, &x_prev, ws)?;
    if numeric::le(&f_prev.abs(), &fx_tol) {
        return Ok(x_prev);
    }

    let mut x_curr = x1;
    let mut f_curr = eval(f, &x_curr, ws)?;
    if numeric::le(&f_curr.abs(), &fx_tol) {
        return Ok(x_curr);
    }

    let half = ws.from_f64(0.5);

    for _ in 0..MAX_ITERATIONS {
        let denom = f_curr.sub(&f_prev, p, rm);
        let x_next = if denom.is_zero() {
            // collapsed denominator: fall back to a half step
            let step = x_curr.sub(&x_prev, p, rm).mul(&half, p, rm);
            x_curr.sub(&step, p, rm)
        } else {
            let lhs = x_prev.mul(&f_curr, p, rm);
            let rhs = x_curr.mul(&f_prev, p, rm);
            lhs.sub(&rhs, p, rm).div(&denom, p, rm)
        };

        let f_next = eval(f, &x_next, ws)?;
        if numeric::le(&f_next.abs(), &fx_tol) {
            return Ok(x_next);
        }

        let step = x_next.sub(&x_curr, p, rm).abs();
        if numeric::le(&step, &step_tolerance(&x_next, &fx_tol, ws)) {
            return Ok(x_next);
        }

        x_prev = x_curr;
        f_prev = f_curr;
        x_curr = x_next;
        f_curr = f_next;
    }

    Err(SearchError::NoConvergence {
        algorithm: "secant",
        iterations: MAX_ITERATIONS,
    })
}

/// Relative step tolerance around the current iterate:
/// `tol * max(|x|, 1)`.
fn step_tolerance(x: &BigFloat, tol: &BigFloat, ws: &Workspace) -> BigFloat {
    let p = ws.bits();
    let rm = ws.rounding();

    let scale = x.abs();
    let one = ws.one();
    let scale = if numeric::lt(&scale, &one) { one } else { scale };
    tol.mul(&scale, p, rm)
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
