//! `dsparse-mf` — the distributed multifrontal `LDL^{T/H}` algorithm
//! built over [`dsparse`]'s passive data structures: front-tree assembly
//! (§4.2), numeric factorization in its five variants (§4.3/§6),
//! front-type transformation including selective inversion (§4.4),
//! communication-metadata and sparse all-to-all (§4.5/§4.7), and the
//! triangular-solve driver (§4.6).
//!
//! This crate plays the same role for the algorithm that `sprs-ldl`
//! played for its single-process column `LDL` recurrence: `dsparse` owns
//! the graph/matrix/symbolic-info types, this crate owns the
//! factorization and solve that run over them.

pub mod alltoall;
pub mod commmeta;
pub mod diagnostics;
pub mod error;
pub mod factor;
pub mod front;
pub mod griddense;
pub mod local_ldl;
pub mod local_solve;
pub mod nodal;
pub mod options;
pub mod solve;
pub mod transform;
pub mod tree;

pub use error::{FactorError, SolveError};
pub use factor::{ldl, RequestedFrontType};
pub use front::{Front, FrontType};
pub use griddense::{GridDense, ReplicatedGridDense};
pub use nodal::{DistNodalMatrix, DistNodalMultiVec};
pub use options::{dist_supernode_ldlh, dist_supernode_ldlt, FactorizationOptions, SolveOptions};
pub use solve::{solve, SolveWorkspace};
pub use tree::SymmFrontTree;

/// Crate version plus the linked `mpi` library's reported implementation
/// string, mirroring `original_source/tests/Version.cpp`'s existence
/// check of a build-info accessor.
pub fn version() -> String {
    format!(
        "dsparse-mf {} ({})",
        env!("CARGO_PKG_VERSION"),
        mpi::environment::library_version().unwrap_or_else(|_| "unknown MPI implementation".to_string())
    )
}
