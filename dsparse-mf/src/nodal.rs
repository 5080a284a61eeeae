//! `DistNodalMatrix`/`DistNodalMultiVec` (§6): the external programmatic
//! surface that pre-/post-maps a caller's right-hand side, held in the
//! original (un-reordered) row order, through the inverse reordering map
//! into the per-node slices [`crate::solve::SolveWorkspace`] consumes, and
//! back.
//!
//! Grounded on `DistNodalMatrix::Pull`/`Push`
//! (`core/dist_symm_front_tree_impl.hpp`'s nodal-vector companions):
//! `pull` gathers each node's `size` rows of the caller's vector by
//! walking `map`'s inverse array, `push` is its exact inverse.

use ndarray::Array2;
use num_traits::Zero;

use dsparse::{DistMap, Field, SymmInfo};

/// One `(node.size, width)` slice per node of `info`, in reordered order.
#[derive(Clone, Debug)]
pub struct DistNodalMatrix<F: Field> {
    pub per_node: Vec<Array2<F>>,
}

impl<F: Field> DistNodalMatrix<F> {
    /// Map `original` (`num_rows x width`, indexed by the *original* row
    /// numbering `map` was built from) into nodal form.
    pub fn pull(info: &SymmInfo, map: &DistMap, original: &Array2<F>) -> Self {
        let width = original.ncols();
        let per_node = (0..info.len())
            .map(|idx| {
                let node = info.node(idx);
                let mut buf = Array2::from_elem((node.size, width), F::zero());
                for local in 0..node.size {
                    let reordered_row = node.offset + local;
                    let orig_row = map
                        .inverse_local(reordered_row)
                        .expect("map must cover every reordered row this rank owns a node for");
                    for w in 0..width {
                        buf[[local, w]] = original[[orig_row, w]];
                    }
                }
                buf
            })
            .collect();
        DistNodalMatrix { per_node }
    }

    /// The exact inverse of [`pull`]: scatter the nodal slices back into a
    /// caller-shaped `(num_rows, width)` buffer in original row order.
    pub fn push(&self, info: &SymmInfo, map: &DistMap, num_rows: usize) -> Array2<F> {
        let width = self.per_node.first().map(|b| b.ncols()).unwrap_or(0);
        let mut original = Array2::from_elem((num_rows, width), F::zero());
        for idx in 0..info.len() {
            let node = info.node(idx);
            for local in 0..node.size {
                let reordered_row = node.offset + local;
                let orig_row = map
                    .inverse_local(reordered_row)
                    .expect("map must cover every reordered row this rank owns a node for");
                for w in 0..width {
                    original[[orig_row, w]] = self.per_node[idx][[local, w]];
                }
            }
        }
        original
    }
}

/// The single-right-hand-side specialization of [`DistNodalMatrix`].
pub struct DistNodalMultiVec<F: Field>(DistNodalMatrix<F>);

impl<F: Field> DistNodalMultiVec<F> {
    pub fn pull(info: &SymmInfo, map: &DistMap, original: &[F]) -> Self {
        let col = Array2::from_shape_vec((original.len(), 1), original.to_vec())
            .expect("original.len() rows, one column");
        DistNodalMultiVec(DistNodalMatrix::pull(info, map, &col))
    }

    pub fn push(&self, info: &SymmInfo, map: &DistMap, num_rows: usize) -> Vec<F> {
        self.0.push(info, map, num_rows).into_raw_vec()
    }

    pub fn per_node(&self) -> &[Array2<F>] {
        &self.0.per_node
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dsparse::dist::BlockDist;
    use dsparse::symbolic::info::NodeInfo;

    fn two_node_info() -> SymmInfo {
        let child = NodeInfo {
            size: 2,
            offset: 0,
            lower_struct: Vec::new(),
            orig_lower_struct: Vec::new(),
            orig_lower_rel_inds: Vec::new(),
            left_rel_inds: Vec::new(),
            right_rel_inds: Vec::new(),
            parent: Some(1),
            children: [None, None],
            grid: None,
        };
        let parent = NodeInfo {
            size: 1,
            offset: 2,
            lower_struct: Vec::new(),
            orig_lower_struct: Vec::new(),
            orig_lower_rel_inds: Vec::new(),
            left_rel_inds: Vec::new(),
            right_rel_inds: Vec::new(),
            parent: None,
            children: [Some(0), None],
            grid: None,
        };
        SymmInfo::new(vec![child, parent], 2)
    }

    #[test]
    fn pull_then_push_is_identity() {
        // reorder original [0,1,2] -> reordered [2,0,1]: reordered row 0
        // is original row 2, reordered row 1 is original row 0, reordered
        // row 2 is original row 1.
        let map = DistMap::new(3, 0, vec![1, 2, 0], 0, vec![2, 0, 1]);
        let info = two_node_info();
        let original: Vec<f64> = vec![10.0, 20.0, 30.0];

        let nodal = DistNodalMultiVec::pull(&info, &map, &original);
        assert_eq!(nodal.per_node()[0][[0, 0]], 30.0); // reordered row 0 <- orig row 2
        assert_eq!(nodal.per_node()[0][[1, 0]], 10.0); // reordered row 1 <- orig row 0
        assert_eq!(nodal.per_node()[1][[0, 0]], 20.0); // reordered row 2 <- orig row 1

        let round_trip = nodal.push(&info, &map, 3);
        assert_eq!(round_trip, original);
    }

    #[test]
    fn pull_then_push_is_identity_for_multi_rhs() {
        let dist = BlockDist::new(4, 1);
        let map = DistMap::identity(&dist, 0);
        let info = {
            let node = NodeInfo {
                size: 4,
                offset: 0,
                lower_struct: Vec::new(),
                orig_lower_struct: Vec::new(),
                orig_lower_rel_inds: Vec::new(),
                left_rel_inds: Vec::new(),
                right_rel_inds: Vec::new(),
                parent: None,
                children: [None, None],
                grid: None,
            };
            SymmInfo::new(vec![node], 1)
        };
        let original = Array2::from_shape_vec((4, 2), vec![1.0, 5.0, 2.0, 6.0, 3.0, 7.0, 4.0, 8.0]).unwrap();

        let nodal = DistNodalMatrix::pull(&info, &map, &original);
        let round_trip = nodal.push(&info, &map, 4);
        assert_eq!(round_trip, original);
    }
}
