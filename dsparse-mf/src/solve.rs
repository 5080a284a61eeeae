//! The top-level triangular-solve driver (§4.6): forward sweep
//! (post-order, accumulating each child's contributed update into its
//! parent exactly as [`crate::factor::ldl`] accumulates Schur
//! complements), a diagonal solve at every node, and a backward sweep
//! (pre-order, splicing each node's solved rows back down into its
//! children before their own backward solve). Grounded on
//! `DistLowerForwardSolve`/`DistLowerBackwardSolve`
//! (`numeric/lower_solve/{dist,local}.hpp`), generalized to the
//! `DistNodalMatrix` (multi-right-hand-side) case by simply widening `x`.
//!
//! Every node's workspace is a dense `(front_height, width)` buffer: the
//! caller seeds the leading `node.size` rows of every node with that
//! node's slice of the reordered right-hand side and zeroes the rest;
//! [`forward_solve`] fills in the remainder, [`diagonal_solve`] scales,
//! and [`backward_solve`] finishes in place.
//!
//! Parent/child accumulation (`accumulate_child_into`) is plain local
//! array indexing rather than a cross-rank exchange: it relies on every
//! rank already holding every node's workspace, which holds only under
//! [`crate::griddense::ReplicatedGridDense`]'s full-replication model
//! (see `DESIGN.md`). A non-replicated `GridDense` would need to route
//! this through `crate::commmeta`/`crate::alltoall` instead.

use ndarray::Array2;
use num_traits::Zero;

use dsparse::comm::ProcessGrid;
use dsparse::{Field, SymmInfo};

use crate::error::SolveError;
use crate::griddense::GridDense;
use crate::tree::SymmFrontTree;

/// Per-node solve workspaces, one `(front.height(), width)` buffer per
/// node of `info`. Construct with [`SolveWorkspace::seed`], which copies
/// each node's slice of the already-reordered right-hand side into the
/// leading rows and zeroes the rest.
pub struct SolveWorkspace<F: Field> {
    pub x: Vec<Array2<F>>,
}

impl<F: Field> SolveWorkspace<F> {
    /// `rhs_by_node[idx]` is node `idx`'s own `size`-row slice of the
    /// reordered right-hand side (width columns).
    pub fn seed(info: &SymmInfo, tree: &SymmFrontTree<F>, rhs_by_node: &[Array2<F>]) -> Self {
        assert_eq!(rhs_by_node.len(), info.len());
        let x = (0..info.len())
            .map(|idx| {
                let front = &tree.fronts[idx];
                let width = rhs_by_node[idx].ncols();
                assert_eq!(rhs_by_node[idx].nrows(), front.size);
                let mut buf = Array2::from_elem((front.height(), width), F::zero());
                buf.slice_mut(ndarray::s![..front.size, ..])
                    .assign(&rhs_by_node[idx]);
                buf
            })
            .collect();
        SolveWorkspace { x }
    }

    /// Each node's final `size`-row answer, in reordered order.
    pub fn solution(&self, info: &SymmInfo) -> Vec<Array2<F>> {
        (0..info.len())
            .map(|idx| self.x[idx].slice(ndarray::s![..info.node(idx).size, ..]).to_owned())
            .collect()
    }
}

fn accumulate_child_into<F: Field>(
    parent_x: &mut Array2<F>,
    child_x: &Array2<F>,
    child_size: usize,
    rel_inds: &[usize],
) {
    let width = parent_x.ncols();
    let update_len = child_x.nrows() - child_size;
    for i_child in 0..update_len {
        let i_front = rel_inds[i_child];
        for w in 0..width {
            let v = child_x[[child_size + i_child, w]];
            parent_x[[i_front, w]] = parent_x[[i_front, w]] + v;
        }
    }
}

/// Post-order forward sweep: fold each child's contributed update into
/// its parent, then run this node's own forward elimination.
pub fn forward_solve<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    dense: &G,
    ws: &mut SolveWorkspace<F>,
) {
    for idx in 0..info.len() {
        let node = info.node(idx);
        if let Some(c) = node.children[0] {
            let child_size = info.node(c).size;
            let rel_inds = node.left_rel_inds.clone();
            let child_x = ws.x[c].clone();
            accumulate_child_into(&mut ws.x[idx], &child_x, child_size, &rel_inds);
        }
        if let Some(c) = node.children[1] {
            let child_size = info.node(c).size;
            let rel_inds = node.right_rel_inds.clone();
            let child_x = ws.x[c].clone();
            accumulate_child_into(&mut ws.x[idx], &child_x, child_size, &rel_inds);
        }

        let front = &tree.fronts[idx];
        if info.is_local(idx) {
            crate::local_solve::local_forward_solve(front.front_l.view(), front.size, ws.x[idx].view_mut());
        } else {
            let grid = grids[idx].as_ref().expect("distributed node requires a process grid");
            dense.forward_solve(grid, front, &mut ws.x[idx]);
        }
    }
}

/// Diagonal scale at every node.
pub fn diagonal_solve<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    dense: &G,
    ws: &mut SolveWorkspace<F>,
    check_if_singular: bool,
) -> Result<(), SolveError> {
    for idx in 0..info.len() {
        let front = &tree.fronts[idx];
        let size = front.size;
        if info.is_local(idx) {
            crate::local_solve::local_diagonal_solve(
                &front.diag,
                ws.x[idx].slice_mut(ndarray::s![..size, ..]),
                check_if_singular,
            )?;
        } else {
            let grid = grids[idx].as_ref().expect("distributed node requires a process grid");
            dense.diagonal_solve(grid, front, &mut ws.x[idx], check_if_singular)?;
        }
    }
    Ok(())
}

/// Pre-order backward sweep: splice the parent's already-finalized rows
/// back into each child's trailing block before that child's own
/// backward solve.
pub fn backward_solve<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    dense: &G,
    ws: &mut SolveWorkspace<F>,
    hermitian: bool,
) {
    for idx in (0..info.len()).rev() {
        if let Some(parent_idx) = info.node(idx).parent {
            let parent = info.node(parent_idx);
            let rel_inds = if parent.children[0] == Some(idx) {
                parent.left_rel_inds.clone()
            } else {
                debug_assert_eq!(parent.children[1], Some(idx));
                parent.right_rel_inds.clone()
            };
            let child_size = info.node(idx).size;
            let width = ws.x[idx].ncols();
            let parent_x = ws.x[parent_idx].clone();
            for (i_child, &i_front) in rel_inds.iter().enumerate() {
                for w in 0..width {
                    ws.x[idx][[child_size + i_child, w]] = parent_x[[i_front, w]];
                }
            }
        }

        let front = &tree.fronts[idx];
        if info.is_local(idx) {
            crate::local_solve::local_backward_solve(front.front_l.view(), front.size, hermitian, ws.x[idx].view_mut());
        } else {
            let grid = grids[idx].as_ref().expect("distributed node requires a process grid");
            dense.backward_solve(grid, front, &mut ws.x[idx], hermitian);
        }
    }
}

/// The full `L D L^{T/H} x = b` solve: forward, diagonal, backward.
pub fn solve<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    dense: &G,
    ws: &mut SolveWorkspace<F>,
    hermitian: bool,
    check_if_singular: bool,
) -> Result<(), SolveError> {
    forward_solve(info, tree, grids, dense, ws);
    diagonal_solve(info, tree, grids, dense, ws, check_if_singular)?;
    backward_solve(info, tree, grids, dense, ws, hermitian);
    Ok(())
}
