//! `SymmFrontTree<F>`: the front array aligned with a `SepTree`/
//! `SymmInfo` pair, and its construction from `A` (§4.2,
//! `DistSymmFrontTree` of `dist_symm_front_tree_impl.hpp`).

use log::debug;
use mpi::traits::*;
use mpi::Count;

use dsparse::dist::BlockDist;
use dsparse::{DistMap, DistSparseMatrix, Field, SepTree, SymmInfo};

use crate::alltoall::{request_reply_usize, sparse_all_to_all};
use crate::front::Front;

pub struct SymmFrontTree<F: Field> {
    pub fronts: Vec<Front<F>>,
    pub hermitian: bool,
}

impl<F: Field> SymmFrontTree<F> {
    /// Every front zeroed, in the unfactored state, sized per `info`.
    pub fn new_empty(info: &SymmInfo, hermitian: bool) -> Self {
        let fronts = (0..info.len())
            .map(|i| {
                let node = info.node(i);
                Front::zeros(node.size, node.lower_struct.len(), hermitian)
            })
            .collect();
        SymmFrontTree { fronts, hermitian }
    }

    /// Build the front tree and assemble `A`'s reordered lower-triangular
    /// entries into it (§4.2). `map_dist` is the distribution the caller
    /// used when building `map`'s forward/inverse arrays: every local
    /// edge already sits on the rank that owns its row in `A`'s own 1-D
    /// block distribution (it was inserted there), so only the column
    /// endpoint and the row/column's reordered index ever need asking a
    /// peer rank.
    pub fn assemble<C: Communicator>(
        comm: &C,
        matrix: &DistSparseMatrix<F>,
        map: &DistMap,
        map_dist: &BlockDist,
        sep_tree: &SepTree,
        info: &SymmInfo,
        hermitian: bool,
    ) -> Self {
        let mut tree = Self::new_empty(info, hermitian);
        let graph = matrix.graph();
        let num_edges = graph.num_local_edges();

        // Step 1: translate every referenced column through `map`.
        let cols: Vec<usize> = (0..num_edges).map(|e| matrix.col(e)).collect();
        let reordered_cols = request_reply_usize(comm, map_dist, &cols, |local_col| {
            map.forward_local(local_col)
                .expect("map_dist claims this rank owns this column")
        });
        let rows: Vec<usize> = (0..num_edges).map(|e| matrix.row(e)).collect();
        let reordered_rows = request_reply_usize(comm, map_dist, &rows, |local_row| {
            map.forward_local(local_row)
                .expect("map_dist claims this rank owns this row")
        });

        // Step 2-4: ship each entry to the rank owning its reordered row
        // in `sep_tree`/`info`, which places it into the in-front block
        // or the off-diagonal block via `orig_lower_rel_inds`.
        let size = comm.size() as usize;
        let rank = comm.rank() as usize;
        let mut send_rows: Vec<Vec<usize>> = vec![Vec::new(); size];
        let mut send_cols: Vec<Vec<usize>> = vec![Vec::new(); size];
        let mut send_vals: Vec<Vec<F>> = vec![Vec::new(); size];

        for e in 0..num_edges {
            let r = reordered_rows[e];
            let c = reordered_cols[e];
            if c > r {
                continue; // strictly upper entries are dropped (§4.2 step 4)
            }
            let owner = owner_of_reordered_row(sep_tree, info, r, size);
            let value = if hermitian && c != r {
                matrix.value(e).conj()
            } else {
                matrix.value(e)
            };
            send_rows[owner].push(r);
            send_cols[owner].push(c);
            send_vals[owner].push(value);
        }

        let send_counts: Vec<Count> = send_rows.iter().map(|v| v.len() as Count).collect();
        let flat_rows: Vec<usize> = send_rows.into_iter().flatten().collect();
        let flat_cols: Vec<usize> = send_cols.into_iter().flatten().collect();
        let flat_vals: Vec<F> = send_vals.into_iter().flatten().collect();

        let (_rc, recv_rows) = sparse_all_to_all(comm, &send_counts, &flat_rows, true);
        let (_cc, recv_cols) = sparse_all_to_all(comm, &send_counts, &flat_cols, false);
        let (_vc, recv_vals) = sparse_all_to_all(comm, &send_counts, &flat_vals, false);

        debug!(
            "rank {rank}: assembly received {} entries",
            recv_rows.len()
        );

        for k in 0..recv_rows.len() {
            place_entry(&mut tree, sep_tree, info, recv_rows[k], recv_cols[k], recv_vals[k]);
        }

        tree
    }
}

/// The rank owning reordered row `row`'s front, per the separator tree's
/// local/distributed split: a local node's rows stay on the rank that
/// built that node (single-rank ownership is assumed to be rank 0 for a
/// purely local tree, e.g. the `P == 1` seed scenarios); a distributed
/// node's rows are owned by every rank on its grid, so any rank holding
/// reordered row `row` locally (per a balanced split of the whole
/// renumbered range) is the natural recipient in this simplified
/// reference assembly.
fn owner_of_reordered_row(sep_tree: &SepTree, info: &SymmInfo, row: usize, num_procs: usize) -> usize {
    let node_idx = sep_tree
        .owner_of_row(row)
        .expect("row must belong to some separator tree node");
    if info.is_local(node_idx) {
        0
    } else {
        let total_rows = sep_tree.node(sep_tree.root()).inds.end;
        let dist = BlockDist::new(total_rows, num_procs);
        dist.owner_of(row)
    }
}

fn place_entry<F: Field>(tree: &mut SymmFrontTree<F>, sep_tree: &SepTree, info: &SymmInfo, row: usize, col: usize, value: F) {
    let node_idx = sep_tree
        .owner_of_row(col)
        .expect("assembled column must belong to some node (lower triangle only)");
    let node = info.node(node_idx);
    let front = &mut tree.fronts[node_idx];
    let local_col = col - node.offset;

    if row < node.offset + node.size {
        let local_row = row - node.offset;
        front.front_l[[local_row, local_col]] = front.front_l[[local_row, local_col]] + value;
    } else {
        let k = node
            .orig_lower_struct
            .iter()
            .position(|&g| g == row)
            .expect("row must be in this node's original lower structure");
        let front_row = node.orig_lower_rel_inds[k];
        front.front_l[[front_row, local_col]] = front.front_l[[front_row, local_col]] + value;
    }
}
