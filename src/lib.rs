//! `dsparse` — distributed 1-D row-block sparse graphs and matrices, the
//! reordering map, and the symbolic-info / process-grid types that a
//! distributed multifrontal solver consumes as input.
//!
//! This crate plays the same role for [`dsparse-mf`](../dsparse_mf/index.html)
//! that `sprs` plays for `sprs-ldl`: it owns the data structures, the other
//! crate owns the factorization algorithm that runs over them.
//!
//! Everything under [`symbolic`] is a *consumed* contract: the nested
//! dissection reordering and symbolic factorization that would populate a
//! [`symbolic::SymmInfo`] are out of scope for this workspace (see the
//! purpose-and-scope section of the design notes); tests build small
//! `SymmInfo`s by hand or via [`symbolic::SymmInfo::single_front`].

pub mod comm;
pub mod dist;
pub mod linalg;
pub mod sparse;
pub mod symbolic;

pub use sparse::csmat::{CompressedStorage, CsMatOwned, CsMatView};
pub use sparse::permutation::{PermOwned, PermView, Permutation};
pub use sparse::symmetric::is_symmetric;
pub use sparse::triplet::TripletMat;

pub use dist::graph::DistSparseGraph;
pub use dist::map::DistMap;
pub use dist::matrix::DistSparseMatrix;

pub use comm::grid::ProcessGrid;

pub use symbolic::info::{NodeInfo, SymmInfo};
pub use symbolic::septree::SepTree;

/// Scalar field a front/solve can be instantiated over: real or complex,
/// the minimum needed to make the symmetric/Hermitian distinction in
/// `frontType` concrete.
pub trait Field:
    num_traits::Num + Copy + Clone + Send + Sync + std::fmt::Debug + 'static
{
    /// Real scalar this field is built from (`Self` for real fields).
    type Real: num_traits::Float + Copy + Send + Sync + std::fmt::Debug + 'static;

    /// Complex conjugate; identity for real fields.
    fn conj(self) -> Self;

    /// Squared modulus, used for singularity/residual checks.
    fn norm_sqr(self) -> Self::Real;
}

impl Field for f32 {
    type Real = f32;
    fn conj(self) -> Self {
        self
    }
    fn norm_sqr(self) -> Self::Real {
        self * self
    }
}

impl Field for f64 {
    type Real = f64;
    fn conj(self) -> Self {
        self
    }
    fn norm_sqr(self) -> Self::Real {
        self * self
    }
}

impl Field for num_complex::Complex<f32> {
    type Real = f32;
    fn conj(self) -> Self {
        num_complex::Complex::conj(&self)
    }
    fn norm_sqr(self) -> Self::Real {
        num_complex::Complex::norm_sqr(&self)
    }
}

impl Field for num_complex::Complex<f64> {
    type Real = f64;
    fn conj(self) -> Self {
        num_complex::Complex::conj(&self)
    }
    fn norm_sqr(self) -> Self::Real {
        num_complex::Complex::norm_sqr(&self)
    }
}
