//! Beam boundary-condition models.
//!
//! Each model supplies the data surface the solvers consume:
//! - a characteristic equation in one unknown, evaluable at any precision
//! - an initial guess for the root of a given vibration mode
//! - the search-width policy used when bracketing that root
//! - the set of modes for which the equation has no root at all
//!
//! The set of models is closed: six classical boundary conditions, one
//! enum variant each, registered in [`ALL_BEAM_TYPES`]. Models that share
//! an equation (a free end reusing a clamped formulation with shifted
//! modes) delegate instead of duplicating the formula.

use std::fmt;

use astro_float::BigFloat;
use thiserror::Error;

use crate::numeric::Workspace;

/// Beam type coercion errors.
#[derive(Debug, Error)]
pub enum BeamTypeError {
    #[error("unknown beam type id: {id}; valid ids are 1 through 6")]
    UnknownId { id: u32 },
}

/// The six supported boundary-condition models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeamType {
    SimplySupported,
    ClampedClamped,
    ClampedFree,
    ClampedSimplySupported,
    SimplySupportedFree,
    FreeFree,
}

/// Every model, in id order.
pub const ALL_BEAM_TYPES: [BeamType; 6] = [
    BeamType::SimplySupported,
    BeamType::ClampedClamped,
    BeamType::ClampedFree,
    BeamType::ClampedSimplySupported,
    BeamType::SimplySupportedFree,
    BeamType::FreeFree,
];

impl BeamType {
    /// Stable small-integer identity, also the key in the persisted cache.
    pub const fn id(self) -> u8 {
        match self {
            BeamType::SimplySupported        => 1,
            BeamType::ClampedClamped         => 2,
            BeamType::ClampedFree            => 3,
            BeamType::ClampedSimplySupported => 4,
            BeamType::SimplySupportedFree    => 5,
            BeamType::FreeFree               => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BeamType::SimplySupported        => "simply supported",
            BeamType::ClampedClamped         => "clamped clamped",
            BeamType::ClampedFree            => "clamped free",
            BeamType::ClampedSimplySupported => "clamped simply supported",
            BeamType::SimplySupportedFree    => "simply supported free",
            BeamType::FreeFree               => "free free",
        }
    }

    /// The characteristic equation, rendered for display.
    pub const fn characteristic_equation_str(self) -> &'static str {
        match self {
            BeamType::SimplySupported => "sin(mu_m) = 0",
            BeamType::ClampedClamped | BeamType::FreeFree => "cos(mu_m)*cosh(mu_m) - 1 = 0",
            BeamType::ClampedFree => "cos(mu_m)*cosh(mu_m) + 1 = 0",
            BeamType::ClampedSimplySupported | BeamType::SimplySupportedFree => {
                "tan(mu_m) - tanh(mu_m) = 0"
            }
        }
    }

    /// Modes whose root is undefined: rigid-body modes of beams with free
    /// ends. The characteristic equation must not be solved for these.
    pub const fn excluded_modes(self) -> &'static [u32] {
        match self {
            BeamType::SimplySupportedFree => &[1],
            BeamType::FreeFree            => &[1, 2],
            _                             => &[],
        }
    }

    pub fn is_mode_excluded(self, mode: u32) -> bool {
        self.excluded_modes().contains(&mode)
    }

    pub fn from_id(id: u8) -> Result<Self, BeamTypeError> {
        match id {
            1 => Ok(BeamType::SimplySupported),
            2 => Ok(BeamType::ClampedClamped),
            3 => Ok(BeamType::ClampedFree),
            4 => Ok(BeamType::ClampedSimplySupported),
            5 => Ok(BeamType::SimplySupportedFree),
            6 => Ok(BeamType::FreeFree),
            _ => Err(BeamTypeError::UnknownId { id: u32::from(id) }),
        }
    }

    /// Evaluates the characteristic function at `x`.
    pub fn characteristic(self, x: &BigFloat, ws: &mut Workspace) -> BigFloat {
        let p = ws.bits();
        let rm = ws.rounding();

        match self {
            BeamType::SimplySupported => x.sin(p, rm, ws.consts_mut()),

            // free free shares the clamped clamped equation
            BeamType::ClampedClamped | BeamType::FreeFree => {
                let product = x.cos(p, rm, ws.consts_mut()).mul(&x.cosh(p, rm, ws.consts_mut()), p, rm);
                product.sub(&ws.one(), p, rm)
            }

            BeamType::ClampedFree => {
                let product = x.cos(p, rm, ws.consts_mut()).mul(&x.cosh(p, rm, ws.consts_mut()), p, rm);
                product.add(&ws.one(), p, rm)
            }

            // simply supported free shares the clamped simply supported equation
            BeamType::ClampedSimplySupported | BeamType::SimplySupportedFree => {
                let tan = x.tan(p, rm, ws.consts_mut());
                let tanh = x.tanh(p, rm, ws.consts_mut());
                tan.sub(&tanh, p, rm)
            }
        }
    }

    /// Analytic estimate of the root for `mode`, always close enough that
    /// the bracket search converges in a handful of widenings.
    ///
    /// Modes are 1-based. Models with excluded low modes delegate the
    /// remaining modes to the model they share an equation with, shifted
    /// past the excluded range.
    pub fn initial_guess(self, mode: u32, ws: &mut Workspace) -> BigFloat {
        let m = i64::from(mode);

        match self {
            BeamType::SimplySupported        => pi_multiple(m, 1, ws),
            BeamType::ClampedClamped         => pi_multiple(2 * m + 1, 2, ws),
            BeamType::ClampedFree            => pi_multiple(2 * m - 1, 2, ws),
            BeamType::ClampedSimplySupported => pi_multiple(4 * m + 1, 4, ws),

            BeamType::SimplySupportedFree => {
                // special case for the rigid-body mode
                if mode == 1 {
                    ws.one()
                } else {
                    BeamType::ClampedSimplySupported.initial_guess(mode - 1, ws)
                }
            }

            BeamType::FreeFree => match mode {
                // special cases for the rigid-body modes
                1 => ws.zero(),
                2 => ws.one(),
                _ => BeamType::ClampedClamped.initial_guess(mode - 2, ws),
            },
        }
    }

    /// Width of the first bracketing interval: pi/10.
    pub fn search_width_start(self, ws: &mut Workspace) -> BigFloat {
        let p = ws.bits();
        let rm = ws.rounding();
        let ten = ws.from_u32(10);
        ws.pi().div(&ten, p, rm)
    }

    /// Factor the bracketing interval grows by when no sign change is found.
    pub fn search_width_growth(self, ws: &Workspace) -> BigFloat {
        ws.from_f64(1.05)
    }
}

impl fmt::Display for BeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id={})", self.name(), self.id())
    }
}

impl TryFrom<u8> for BeamType {
    type Error = BeamTypeError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        BeamType::from_id(id)
    }
}

impl TryFrom<u32> for BeamType {
    type Error = BeamTypeError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        let id = u8::try_from(id).map_err(|_| BeamTypeError::UnknownId { id })?;
        BeamType::from_id(id)
    }
}

/// `numerator * pi / denominator` at working precision.
fn pi_multiple(numerator: i64, denominator: i64, ws: &mut Workspace) -> BigFloat {
    let p = ws.bits();
    let rm = ws.rounding();
    let num = ws.from_f64(numerator as f64);
    let den = ws.from_f64(denominator as f64);
    ws.pi().mul(&num, p, rm).div(&den, p, rm)
}
