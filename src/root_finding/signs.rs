//! Sign utilities for root-finding kernels.

use astro_float::BigFloat;

/// Returns `true` if `x` and `y` are both nonzero with opposite signs.
///
/// Zeros carry no sign here: a bracket endpoint that evaluates to exactly
/// zero never counts as a sign change on its own.
#[inline]
pub(crate) fn opposite_sign(x: &BigFloat, y: &BigFloat) -> bool {
    !x.is_zero() && !y.is_zero() && (x.is_negative() != y.is_negative())
}
