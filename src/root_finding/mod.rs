// common helpers
pub mod errors;
pub mod report;
pub(crate) mod signs;

// numerical kernels
pub mod bracket;
pub mod regula_falsi;
pub mod secant;

// strategies, ensemble and the best-root cache
pub mod cache;
pub mod ensemble;
pub mod rootfinders;

/// Safety cap on iterations inside every numerical kernel. This is not a
/// tuning knob: convergent runs finish orders of magnitude earlier, and a
/// run that reaches it reports a convergence failure.
pub const MAX_ITERATIONS: usize = 1_000_000_000;
