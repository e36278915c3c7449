//! High precision numeric context shared by all solvers.
//!
//! [`Workspace`] pins down everything a solve needs to be reproducible:
//! - decimal precision in digits, converted to working bits
//! - deterministic rounding mode
//! - the constants cache required by transcendental evaluation
//! - the convergence tolerance derived from the working precision
//!
//! Results leave a solve through [`Workspace::stamp`], so no internal
//! working precision ever leaks into a returned value.

use std::cmp::Ordering;

use astro_float::{BigFloat, Consts, Radix, RoundingMode};
use thiserror::Error;

/// Errors raised while building a [`Workspace`].
#[derive(Debug, Error)]
pub enum NumericError {
    #[error("decimal precision must be at least 1 digit, got {digits}")]
    InvalidPrecision { digits: usize },

    #[error("unable to initialize the constants cache for transcendental evaluation")]
    ConstantsCache,
}

/// Number of working bits for a decimal precision.
///
/// Uses the `(digits + 1) * log2(10)` mapping, rounded to the nearest
/// integer, so a value carries one spare decimal digit of headroom.
#[inline]
#[must_use]
pub fn bits_for(digits: usize) -> usize {
    (digits + 1) * 33_220 / 10_000
}

/// Arbitrary precision evaluation context.
///
/// One workspace per thread of computation; the constants cache inside is
/// reused across evaluations and is not shareable between threads.
pub struct Workspace {
    digits: usize,
    bits:   usize,
    rm:     RoundingMode,
    consts: Consts,
    pi:     Option<BigFloat>,
}

impl Workspace {
    /// Builds a workspace for `digits` decimal digits of precision.
    ///
    /// # Errors
    /// - [`NumericError::InvalidPrecision`] : `digits` is zero
    /// - [`NumericError::ConstantsCache`]   : constants cache allocation failed
    pub fn new(digits: usize) -> Result<Self, NumericError> {
        if digits == 0 {
            return Err(NumericError::InvalidPrecision { digits });
        }
        let consts = Consts::new().map_err(|_| NumericError::ConstantsCache)?;

        Ok(Self {
            digits,
            bits: bits_for(digits),
            rm: RoundingMode::ToEven,
            consts,
            pi: None,
        })
    }

    /// Requested precision in decimal digits.
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Working precision in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Rounding mode applied to every operation.
    pub fn rounding(&self) -> RoundingMode {
        self.rm
    }

    /// Mutable access to the constants cache, needed by transcendental
    /// functions (`sin`, `cosh`, ...).
    pub fn consts_mut(&mut self) -> &mut Consts {
        &mut self.consts
    }

    /// The constant pi at working precision, computed once per workspace
    /// as `6 * atan(1 / sqrt(3))`.
    pub fn pi(&mut self) -> BigFloat {
        if let Some(pi) = &self.pi {
            return pi.clone();
        }

        let p = self.bits;
        let rm = self.rm;
        let inv_sqrt_3 = BigFloat::from_word(3, p).sqrt(p, rm).reciprocal(p, rm);
        let sixth = inv_sqrt_3.atan(p, rm, &mut self.consts);
        let pi = BigFloat::from_word(6, 1).mul(&sixth, p, rm);

        self.pi = Some(pi.clone());
        pi
    }

    pub fn zero(&self) -> BigFloat {
        BigFloat::from_word(0, self.bits)
    }

    pub fn one(&self) -> BigFloat {
        BigFloat::from_word(1, self.bits)
    }

    pub fn nan(&self) -> BigFloat {
        BigFloat::from_f64(f64::NAN, self.bits)
    }

    pub fn from_f64(&self, value: f64) -> BigFloat {
        BigFloat::from_f64(value, self.bits)
    }

    pub fn from_u32(&self, value: u32) -> BigFloat {
        BigFloat::from_word(value as astro_float::Word, self.bits)
    }

    /// Convergence tolerance on |f(x)| at this precision: `2^(11 - bits)`,
    /// i.e. machine epsilon of the working precision with 10 bits of slack.
    pub fn convergence_tol(&self) -> BigFloat {
        let shift = self.bits.saturating_sub(11).max(1);
        pow2_neg(shift, self.bits, self.rm)
    }

    /// Rounds `x` to exactly the workspace precision.
    ///
    /// Every value returned to a caller goes through this, so internal
    /// guard digits never leak out of a solve.
    pub fn stamp(&self, x: &BigFloat) -> BigFloat {
        let mut out = x.clone();
        if out.set_precision(self.bits, self.rm).is_err() {
            return self.nan();
        }
        out
    }

    /// Parses a decimal string at the workspace precision. Returns NaN
    /// for unparsable input.
    pub fn parse_decimal(&mut self, s: &str) -> BigFloat {
        BigFloat::parse(s, Radix::Dec, self.bits, self.rm, &mut self.consts)
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("digits", &self.digits)
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

/// `2^-shift` built by repeated squaring of 1/2; exact at any precision.
fn pow2_neg(shift: usize, p: usize, rm: RoundingMode) -> BigFloat {
    let mut acc = BigFloat::from_word(1, p);
    let mut base = BigFloat::from_f64(0.5, p);
    let mut n = shift;
    while n > 0 {
        if n & 1 == 1 {
            acc = acc.mul(&base, p, rm);
        }
        base = base.mul(&base, p, rm);
        n >>= 1;
    }
    acc
}

/// `a < b` under total comparison; `false` when either side is NaN.
#[inline]
pub(crate) fn lt(a: &BigFloat, b: &BigFloat) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less))
}

/// `a <= b`; `false` when either side is NaN.
#[inline]
pub(crate) fn le(a: &BigFloat, b: &BigFloat) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less | Ordering::Equal))
}

/// `max(|a|, |b|)`.
#[inline]
pub(crate) fn abs_max(a: &BigFloat, b: &BigFloat) -> BigFloat {
    let abs_a = a.abs();
    let abs_b = b.abs();
    if lt(&abs_a, &abs_b) {
        abs_b
    } else {
        abs_a
    }
}
