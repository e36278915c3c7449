//! Result value returned by every rootfinder strategy.

use astro_float::BigFloat;

use crate::numeric::Workspace;

/// A root candidate together with the accuracy it was found at.
///
/// The residual is `|f(root)|` at the requested precision, or NaN when
/// the mode is excluded by the model ("undefined": the equation has no
/// root there and `root` holds the model's conventional value instead).
#[derive(Debug, Clone)]
pub struct RootResult {
    root:     BigFloat,
    residual: BigFloat,
}

impl RootResult {
    pub(crate) fn new(root: BigFloat, residual: BigFloat) -> Self {
        Self { root, residual }
    }

    pub(crate) fn undefined(root: BigFloat, ws: &Workspace) -> Self {
        Self { root, residual: ws.nan() }
    }

    pub fn root(&self) -> &BigFloat {
        &self.root
    }

    pub fn residual(&self) -> &BigFloat {
        &self.residual
    }

    /// `true` when this result is the undefined sentinel of an excluded
    /// mode rather than a converged root.
    pub fn is_undefined(&self) -> bool {
        self.residual.is_nan()
    }
}

impl PartialEq for RootResult {
    fn eq(&self, other: &Self) -> bool {
        let residual_eq = (self.residual.is_nan() && other.residual.is_nan())
            || self.residual == other.residual;
        self.root == other.root && residual_eq
    }
}
