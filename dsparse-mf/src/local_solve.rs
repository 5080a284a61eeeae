//! Forward/diagonal/backward dense solve kernels for one front's local
//! block, grounded on `LocalFrontLDLForwardSolve`/`DiagonalSolve`/
//! `BackwardSolve` (`src/numeric/LocalFrontLDLSolve.cpp`).
//!
//! `supernode_size` is taken as an explicit parameter rather than read off
//! `front.size`, reproducing the original's padded-front capability
//! (§9: a front's `L`/`X` may be taller than the `size`-wide block being
//! solved against, and callers are trusted to pass a consistent value).

use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};

use dsparse::Field;

use crate::error::SolveError;
use crate::front::Front;

fn maybe_conj<F: Field>(v: F, hermitian: bool) -> F {
    if hermitian {
        v.conj()
    } else {
        v
    }
}

/// `X_T := L_T^{-1} X_T`, `X_B -= L_B X_T` where `L = [L_T; L_B]` splits
/// at `supernode_size` and `L_T` is unit lower triangular.
pub fn local_forward_solve<F: Field>(
    l: ArrayView2<F>,
    supernode_size: usize,
    mut x: ArrayViewMut2<F>,
) {
    assert_eq!(l.nrows(), x.nrows(), "nonconformal forward solve");
    assert!(l.nrows() >= supernode_size);
    let width = x.ncols();

    for k in 0..supernode_size {
        for j in 0..k {
            let ljk = l[[k, j]];
            for w in 0..width {
                let xjw = x[[j, w]];
                x[[k, w]] = x[[k, w]] - ljk * xjw;
            }
        }
    }
    for i in supernode_size..l.nrows() {
        for j in 0..supernode_size {
            let lij = l[[i, j]];
            for w in 0..width {
                let xjw = x[[j, w]];
                x[[i, w]] = x[[i, w]] - lij * xjw;
            }
        }
    }
}

/// Element-wise scale by `D^{-1}` over the leading `supernode_size` rows;
/// `check_if_singular` surfaces a zero pivot as `SolveError::Singular`
/// instead of silently producing infinities (the `checkIfSingular` flag
/// threaded through `LocalFrontLDLDiagonalSolve`).
pub fn local_diagonal_solve<F: Field>(
    diag: &[F],
    mut x: ArrayViewMut2<F>,
    check_if_singular: bool,
) -> Result<(), SolveError> {
    let width = x.ncols();
    for (k, &dk) in diag.iter().enumerate() {
        if check_if_singular && dk.is_zero() {
            return Err(SolveError::Singular { index: k });
        }
        for w in 0..width {
            x[[k, w]] = x[[k, w]] / dk;
        }
    }
    Ok(())
}

/// `X_T -= L_B^{T/H} X_B`, `X_T := L_T^{-T/-H} X_T`.
pub fn local_backward_solve<F: Field>(
    l: ArrayView2<F>,
    supernode_size: usize,
    hermitian: bool,
    mut x: ArrayViewMut2<F>,
) {
    assert_eq!(l.nrows(), x.nrows(), "nonconformal backward solve");
    let width = x.ncols();

    for i in 0..supernode_size {
        for j in supernode_size..l.nrows() {
            let lji = maybe_conj(l[[j, i]], hermitian);
            for w in 0..width {
                let xjw = x[[j, w]];
                x[[i, w]] = x[[i, w]] - lji * xjw;
            }
        }
    }
    for k in (0..supernode_size).rev() {
        for j in (k + 1)..supernode_size {
            let ljk = maybe_conj(l[[j, k]], hermitian);
            for w in 0..width {
                let xjw = x[[j, w]];
                x[[k, w]] = x[[k, w]] - ljk * xjw;
            }
        }
    }
}

/// Convenience wrapper running all three passes against one front's own
/// `front_l`/`diag`, using `front.size` as the supernode size (the
/// non-padded common case).
pub fn solve_front<F: Field>(
    front: &Front<F>,
    hermitian: bool,
    x: &mut Array2<F>,
    check_if_singular: bool,
) -> Result<(), SolveError> {
    local_forward_solve(front.front_l.view(), front.size, x.view_mut());
    local_diagonal_solve(
        &front.diag,
        x.slice_mut(s![..front.size, ..]),
        check_if_singular,
    )?;
    local_backward_solve(front.front_l.view(), front.size, hermitian, x.view_mut());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn forward_then_backward_round_trip_identity_l() {
        // L = identity (no coupling), should leave X unchanged.
        let l = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let mut x = arr2(&[[2.0], [3.0]]);
        local_forward_solve(l.view(), 2, x.view_mut());
        assert_eq!(x, arr2(&[[2.0], [3.0]]));
        local_backward_solve(l.view(), 2, false, x.view_mut());
        assert_eq!(x, arr2(&[[2.0], [3.0]]));
    }

    #[test]
    fn diagonal_solve_reports_singular() {
        let diag = vec![0.0, 1.0];
        let mut x = arr2(&[[1.0], [1.0]]);
        let err = local_diagonal_solve(&diag, x.view_mut(), true).unwrap_err();
        assert!(matches!(err, SolveError::Singular { index: 0 }));
    }

    #[test]
    fn full_solve_recovers_rhs_for_identity_factor() {
        let mut front = Front::<f64>::zeros(2, 0, false);
        front.front_l = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        front.diag = vec![1.0, 1.0];
        let mut x = arr2(&[[5.0], [7.0]]);
        solve_front(&front, false, &mut x, true).unwrap();
        assert_eq!(x, arr2(&[[5.0], [7.0]]));
    }
}
