//! The two small typed-error surfaces that are genuinely recoverable: a
//! numerically singular pivot during factorization or diagonal solve,
//! and a handful of configuration checks. Everything else
//! (precondition/invariant violations, runtime-library failures) is
//! `panic!`/`assert!`, matching Clique's collective-abort intent.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactorError {
    #[error("pivot {pivot} is numerically zero during LDL^{{T/H}} factorization")]
    Singular { pivot: usize },
    #[error("unsupported front type transition: {from:?} -> {to:?}")]
    UnsupportedTransition { from: String, to: String },
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("diagonal entry {index} is zero during the diagonal solve")]
    Singular { index: usize },
    #[error("right-hand side width {got} does not match the factorization's width {expected}")]
    WidthMismatch { expected: usize, got: usize },
}
