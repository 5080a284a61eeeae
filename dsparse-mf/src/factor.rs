//! Numeric factorization driver (§4.3): post-order traversal over the
//! front tree, accumulating child Schur complements and then running the
//! requested `LDL^{T/H}` variant on each front. Grounded on `LocalLDL`'s
//! child-accumulation loop (`ldl/local.hpp`) generalized to also dispatch
//! distributed nodes through [`GridDense`].
//!
//! `accumulate_children` scatters each child's update directly into the
//! parent's local arrays, which is only correct because every rank holds
//! every node's front under [`crate::griddense::ReplicatedGridDense`]'s
//! full-replication model (see `DESIGN.md`); it is not a cross-rank
//! exchange.

use log::trace;
use num_traits::Zero;

use dsparse::comm::ProcessGrid;
use dsparse::{Field, SymmInfo};

use crate::error::FactorError;
use crate::griddense::GridDense;
use crate::tree::SymmFrontTree;

/// The five externally requested variants of §6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestedFrontType {
    Ldl1D,
    Ldl2D,
    LdlIntraPiv2D,
    BlockLdl2D,
    BlockLdlIntraPiv2D,
}

impl RequestedFrontType {
    fn flags(self) -> (bool, bool) {
        use RequestedFrontType::*;
        match self {
            Ldl1D | Ldl2D => (false, false),
            LdlIntraPiv2D => (false, true),
            BlockLdl2D => (true, false),
            BlockLdlIntraPiv2D => (true, true),
        }
    }
}

/// Scatter a child's consumed `work` into the parent front's `frontL` /
/// `work` blocks via `rel_inds`, per §4.3 step 1 (the classical
/// multifrontal extend-add). Strict-upper-triangle targets never occur
/// because `rel_inds` is built from a sorted lower structure, but the
/// assert guards against a malformed symbolic map.
fn scatter_child_update<F: Field>(
    parent_size: usize,
    parent_front_l: &mut ndarray::Array2<F>,
    parent_work: &mut ndarray::Array2<F>,
    child_work: &ndarray::Array2<F>,
    rel_inds: &[usize],
) {
    let update_size = child_work.nrows();
    for j_child in 0..update_size {
        let j_front = rel_inds[j_child];
        for i_child in j_child..update_size {
            let i_front = rel_inds[i_child];
            assert!(
                i_front >= j_front,
                "tried to update the strict upper triangle during Schur accumulation"
            );
            let value = child_work[[i_child, j_child]];
            if j_front < parent_size {
                parent_front_l[[i_front, j_front]] = parent_front_l[[i_front, j_front]] + value;
            } else if i_front >= parent_size {
                parent_work[[i_front - parent_size, j_front - parent_size]] =
                    parent_work[[i_front - parent_size, j_front - parent_size]] + value;
            }
            // i_front >= parent_size && j_front < parent_size is covered by
            // the first branch; i_front < parent_size is impossible given
            // i_front >= j_front and the j_front >= parent_size case above.
        }
    }
}

/// Fold both children's `work` (their outgoing Schur-complement
/// contribution, consumed and released here) into this node's own front,
/// seeding `front.work`'s (lower-struct, lower-struct) block ahead of
/// this node's own factorization.
fn accumulate_children<F: Field>(tree: &mut SymmFrontTree<F>, info: &SymmInfo, idx: usize) {
    let node = info.node(idx);
    let parent_size = node.size;
    let lower_len = node.lower_struct.len();
    let left = node.children[0];
    let right = node.children[1];
    let left_rel_inds = node.left_rel_inds.clone();
    let right_rel_inds = node.right_rel_inds.clone();

    let left_work = left.and_then(|c| tree.fronts[c].work.take());
    let right_work = right.and_then(|c| tree.fronts[c].work.take());
    if left_work.is_none() && right_work.is_none() {
        return;
    }

    let front = &mut tree.fronts[idx];
    if front.work.is_none() {
        front.work = Some(ndarray::Array2::from_elem((lower_len, lower_len), F::zero()));
    }
    let mut work = front.work.take().expect("just ensured Some");

    if let Some(child_work) = left_work.as_ref() {
        scatter_child_update(parent_size, &mut front.front_l, &mut work, child_work, &left_rel_inds);
    }
    if let Some(child_work) = right_work.as_ref() {
        scatter_child_update(parent_size, &mut front.front_l, &mut work, child_work, &right_rel_inds);
    }

    front.work = Some(work);
}

/// Numeric factorization entry point: `ldl(info, frontTree, frontType)`.
/// `grids[idx]` must be `Some` for every distributed node and is ignored
/// for local ones.
pub fn ldl<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &mut SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    requested: RequestedFrontType,
    dense: &G,
    hermitian: bool,
) -> Result<(), FactorError> {
    let (block, intra_pivoted) = requested.flags();
    assert_eq!(grids.len(), info.len(), "one grid slot per tree node is required");

    for idx in 0..info.len() {
        trace!("factoring node {idx} (local = {})", info.is_local(idx));
        accumulate_children(tree, info, idx);

        if info.is_local(idx) {
            let front = &mut tree.fronts[idx];
            if block {
                crate::local_ldl::front_block_ldl(front, hermitian)?;
            } else if intra_pivoted {
                crate::local_ldl::front_ldl_intra_piv(front, hermitian)?;
            } else {
                crate::local_ldl::front_ldl(front, hermitian)?;
            }
        } else {
            let grid = grids[idx]
                .as_ref()
                .expect("distributed node requires a process grid");
            dense.factor_front(grid, &mut tree.fronts[idx], block, intra_pivoted, hermitian)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::griddense::ReplicatedGridDense;
    use dsparse::symbolic::info::NodeInfo;

    fn two_level_info() -> SymmInfo {
        // Child: size 1 at offset 0, lower_struct = [1] (shared separator row).
        // Parent: size 1 at offset 1, no lower struct.
        let child = NodeInfo {
            size: 1,
            offset: 0,
            lower_struct: vec![1],
            orig_lower_struct: vec![1],
            orig_lower_rel_inds: vec![0],
            left_rel_inds: Vec::new(),
            right_rel_inds: Vec::new(),
            parent: Some(1),
            children: [None, None],
            grid: None,
        };
        let parent = NodeInfo {
            size: 1,
            offset: 1,
            lower_struct: Vec::new(),
            orig_lower_struct: Vec::new(),
            orig_lower_rel_inds: Vec::new(),
            left_rel_inds: vec![0],
            right_rel_inds: Vec::new(),
            parent: None,
            children: [Some(0), None],
            grid: None,
        };
        SymmInfo::new(vec![child, parent], 2)
    }

    #[test]
    fn child_schur_complement_folds_into_parent_pivot() {
        let info = two_level_info();
        let mut tree = SymmFrontTree::<f64>::new_empty(&info, false);
        // Child front: A_TL = [2], A_BL = [4] -> after factoring,
        // work = -(4/2)*2*(4/2) = -8 (see local_ldl's accumulation test).
        tree.fronts[0].front_l = ndarray::arr2(&[[2.0], [4.0]]);
        // Parent front starts as A_TL = [10] (no coupling to anything else).
        tree.fronts[1].front_l = ndarray::arr2(&[[10.0]]);

        let grids: Vec<Option<ProcessGrid>> = vec![None, None];
        ldl(&info, &mut tree, &grids, RequestedFrontType::Ldl1D, &ReplicatedGridDense, false).unwrap();

        assert_eq!(tree.fronts[1].diag, vec![10.0 - 8.0]);
        assert!(tree.fronts[0].work.is_none());
    }
}
