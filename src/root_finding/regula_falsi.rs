//! False-position kernel over arbitrary precision values.
//!
//! Three variants of the regula falsi family, differing only in how the
//! retained endpoint's function value is scaled when the same side of the
//! bracket survives two iterations in a row (the classic cure for
//! endpoint stagnation):
//!
//! - [`FalsiVariant::Illinois`]       : halve the retained value
//! - [`FalsiVariant::Pegasus`]        : scale by `f(x) / (f(x) + f_replaced)`
//! - [`FalsiVariant::AndersonBjorck`] : scale by `1 - f(x)/f_replaced`,
//!   falling back to halving when that ratio is not positive

use astro_float::BigFloat;

use super::errors::SearchError;
use super::signs::opposite_sign;
use super::MAX_ITERATIONS;
use crate::numeric::{self, Workspace};

/// Which false-position variant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FalsiVariant {
    Illinois,
    Pegasus,
    AndersonBjorck,
}

impl FalsiVariant {
    pub const fn name(self) -> &'static str {
        match self {
            FalsiVariant::Illinois       => "illinois",
            FalsiVariant::Pegasus        => "pegasus",
            FalsiVariant::AndersonBjorck => "anderson_bjorck",
        }
    }
}

/// Finds a root of `f` inside the bracket `[a, b]`.
///
/// The iterate is the secant intercept of the current endpoints, replaced
/// by the midpoint whenever the intercept degenerates or escapes the
/// bracket, so the interval always shrinks.
///
/// # Arguments
/// - `f`       : the function, evaluated through `ws`
/// - `(a, b)`  : bracket with a sign change, as produced by
///   [`bracket::find_sign_change`](super::bracket::find_sign_change)
/// - `variant` : endpoint scaling rule
///
/// # Returns
/// The root approximation: the first iterate with `|f(x)|` below the
/// workspace convergence tolerance, or the final secant estimate once
/// the bracket width drops below the relative width tolerance.
///
/// # Errors
/// - [`SearchError::InvalidBracket`]      : `a >= b`, or no sign change
/// - [`SearchError::NonFiniteEvaluation`] : `f` produced NaN or infinity
/// - [`SearchError::NoConvergence`]       : iteration safety cap reached
pub fn regula_falsi<F>(
    f: &mut F,
    a: BigFloat,
    b: BigFloat,
    variant: FalsiVariant,
    ws: &mut Workspace,
) -> Result<BigFloat, SearchError>
where
    F: FnMut(&BigFloat, &mut Workspace) -> BigFloat,
{
    let p = ws.bits();
    let rm = ws.rounding();
    let fx_tol = ws.convergence_tol();

    if !numeric::lt(&a, &b) {
        return Err(SearchError::InvalidBracket { a, b });
    }

    let (mut a, mut b) = (a, b);
    let mut fa = eval(f, &a, ws)?;
    if numeric::le(&fa.abs(), &fx_tol) {
        return Ok(a);
    }
    let mut fb = eval(f, &b, ws)?;
    if numeric::le(&fb.abs(), &fx_tol) {
        return Ok(b);
    }
    if !opposite_sign(&fa, &fb) {
        return Err(SearchError::InvalidBracket { a, b });
    }

    let half = ws.from_f64(0.5);

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Side {
        Left,
        Right,
    }
    let mut last_side: Option<Side> = None;

    for _ in 0..MAX_ITERATIONS {
        let x = secant_intercept(&a, &fa, &b, &fb, &half, ws);
        let fx = eval(f, &x, ws)?;
        if numeric::le(&fx.abs(), &fx_tol) {
            return Ok(x);
        }

        if opposite_sign(&fa, &fx) {
            // root is now in [a, x]; the left endpoint is retained
            if last_side == Some(Side::Right) {
                let factor = retention_factor(variant, &fx, &fb, &half, ws);
                fa = fa.mul(&factor, p, rm);
            }
            b = x;
            fb = fx;
            last_side = Some(Side::Right);
        } else {
            // root is now in [x, b]; the right endpoint is retained
            if last_side == Some(Side::Left) {
                let factor = retention_factor(variant, &fx, &fa, &half, ws);
                fb = fb.mul(&factor, p, rm);
            }
            a = x;
            fa = fx;
            last_side = Some(Side::Left);
        }

        let width = b.sub(&a, p, rm);
        if numeric::le(&width, &width_tolerance(&a, &b, &fx_tol, ws)) {
            return Ok(secant_intercept(&a, &fa, &b, &fb, &half, ws));
        }
    }

    Err(SearchError::NoConvergence {
        algorithm: variant.name(),
        iterations: MAX_ITERATIONS,
    })
}

/// Secant intercept of `(a, fa)` and `(b, fb)`, or the midpoint when the
/// intercept degenerates or falls outside `(a, b)`.
fn secant_intercept(
    a: &BigFloat,
    fa: &BigFloat,
    b: &BigFloat,
    fb: &BigFloat,
    half: &BigFloat,
    ws: &Workspace,
) -> BigFloat {
    let p = ws.bits();
    let rm = ws.rounding();

    let denom = fb.sub(fa, p, rm);
    if !denom.is_zero() {
        let x = a.mul(fb, p, rm).sub(&b.mul(fa, p, rm), p, rm).div(&denom, p, rm);
        if numeric::lt(a, &x) && numeric::lt(&x, b) {
            return x;
        }
    }
    a.add(b, p, rm).mul(half, p, rm)
}

/// Scaling applied to the retained endpoint's function value after two
/// consecutive replacements on the same side. `fx` is the new iterate's
/// value, `f_replaced` the value of the endpoint just replaced; both have
/// the same sign here, so the Pegasus denominator is never zero.
fn retention_factor(
    variant: FalsiVariant,
    fx: &BigFloat,
    f_replaced: &BigFloat,
    half: &BigFloat,
    ws: &Workspace,
) -> BigFloat {
    let p = ws.bits();
    let rm = ws.rounding();

    match variant {
        FalsiVariant::Illinois => half.clone(),
        FalsiVariant::Pegasus => fx.div(&fx.add(f_replaced, p, rm), p, rm),
        FalsiVariant::AndersonBjorck => {
            let ratio = ws.one().sub(&fx.div(f_replaced, p, rm), p, rm);
            if ratio.is_negative() || ratio.is_zero() {
                half.clone()
            } else {
                ratio
            }
        }
    }
}

/// Relative width tolerance for the current bracket:
/// `tol * max(|a|, |b|, 1)`.
fn width_tolerance(a: &BigFloat, b: &BigFloat, tol: &BigFloat, ws: &Workspace) -> BigFloat {
    let p = ws.bits();
    let rm = ws.rounding();

    let scale = numeric::abs_max(a, b);
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
