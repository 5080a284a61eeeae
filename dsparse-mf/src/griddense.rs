//! `GridDense`: the "dense distributed linear algebra kernel library"
//! §6 assumes is available as a black box (distributed triangular solve,
//! `LDL^{T/H}` on a replicated block, triangular inverse, diagonal
//! solve...). This module supplies exactly one concrete implementation:
//! gather the distributed front onto every rank of its grid, run the
//! same dense kernels the local front path uses, and treat the result as
//! already "scattered" since every rank of the grid ends up holding an
//! identical replica. This is documented in `DESIGN.md` as this build's
//! resolution of the corresponding Open Question: it reproduces a real
//! distributed kernel's observable result without doing real work
//! distribution, and a real ScaLAPACK/Elemental-style implementation
//! would only need to replace this module.

use ndarray::Array2;

use dsparse::comm::ProcessGrid;
use dsparse::Field;

use crate::error::{FactorError, SolveError};
use crate::front::Front;
use crate::local_ldl::{front_block_ldl, front_ldl, front_ldl_intra_piv};
use crate::local_solve::{local_backward_solve, local_diagonal_solve, local_forward_solve};

/// The black-box dense kernel surface a distributed front's factorization
/// and solve passes are expressed against.
pub trait GridDense<F: Field> {
    fn factor_front(
        &self,
        grid: &ProcessGrid,
        front: &mut Front<F>,
        block: bool,
        intra_pivoted: bool,
        hermitian: bool,
    ) -> Result<(), FactorError>;

    fn forward_solve(&self, grid: &ProcessGrid, front: &Front<F>, x: &mut Array2<F>);

    fn diagonal_solve(
        &self,
        grid: &ProcessGrid,
        front: &Front<F>,
        x: &mut Array2<F>,
        check_if_singular: bool,
    ) -> Result<(), SolveError>;

    fn backward_solve(&self, grid: &ProcessGrid, front: &Front<F>, x: &mut Array2<F>, hermitian: bool);
}

/// The gather-compute-scatter reference implementation. Every rank of
/// `grid` is assumed to already hold the same replicated `front`/`x`
/// (the "gather" is therefore a no-op here); a real implementation would
/// perform an `all_gather` over `grid.comm()` before this point and a
/// corresponding redistribution after.
pub struct ReplicatedGridDense;

impl<F: Field> GridDense<F> for ReplicatedGridDense {
    fn factor_front(
        &self,
        grid: &ProcessGrid,
        front: &mut Front<F>,
        block: bool,
        intra_pivoted: bool,
        hermitian: bool,
    ) -> Result<(), FactorError> {
        debug_assert!(grid.is_member(), "factor_front called on a non-member rank");
        if block {
            front_block_ldl(front, hermitian)
        } else if intra_pivoted {
            front_ldl_intra_piv(front, hermitian)
        } else {
            front_ldl(front, hermitian)
        }
    }

    fn forward_solve(&self, grid: &ProcessGrid, front: &Front<F>, x: &mut Array2<F>) {
        debug_assert!(grid.is_member());
        local_forward_solve(front.front_l.view(), front.size, x.view_mut());
    }

    fn diagonal_solve(
        &self,
        grid: &ProcessGrid,
        front: &Front<F>,
        x: &mut Array2<F>,
        check_if_singular: bool,
    ) -> Result<(), SolveError> {
        debug_assert!(grid.is_member());
        let size = front.size;
        local_diagonal_solve(&front.diag, x.slice_mut(ndarray::s![..size, ..]), check_if_singular)
    }

    fn backward_solve(&self, grid: &ProcessGrid, front: &Front<F>, x: &mut Array2<F>, hermitian: bool) {
        debug_assert!(grid.is_member());
        local_backward_solve(front.front_l.view(), front.size, hermitian, x.view_mut());
    }
}
