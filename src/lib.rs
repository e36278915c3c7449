//! Best positive roots of beam characteristic equations, at arbitrary
//! decimal precision.
//!
//! Six classical boundary-condition models ([`beam_types`]) each define a
//! transcendental characteristic equation whose positive roots are the
//! eigenvalue parameters of the beam's vibration modes. For a given
//! (beam type, mode, precision) this crate:
//!
//! - brackets the root nearest the model's analytic initial guess
//! - runs four independent root-finding strategies
//!   ([`root_finding::rootfinders`])
//! - selects the result with the smallest residual
//!   ([`root_finding::ensemble`])
//! - caches the selection on disk, one file per precision, so repeated
//!   lookups never recompute ([`root_finding::cache`])
//!
//! Modes a model excludes (rigid-body modes of free ends) resolve to an
//! "undefined" sentinel instead of a root; they are never solved for.

pub mod beam_types;
pub mod numeric;
pub mod root_finding;

/// Highest mode a regenerated cache covers by default.
pub const DEFAULT_MAX_MODE: u32 = 100;

/// Default decimal precision, in digits, for root finding and caching.
pub const DEFAULT_DECIMAL_PRECISION: usize = 300;
