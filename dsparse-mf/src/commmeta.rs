//! Per-node communication metadata (§4.5): for a distributed node's grid,
//! how many rows of a child's update each grid rank must receive, and
//! which local rows of the child's packed send buffer go to each peer.
//! Computed once per node and reused across every forward/backward solve
//! sweep, since it depends only on `info`'s structure, not on the RHS.
//!
//! Grounded on the packing loop in `DistLowerForwardSolve`
//! (`numeric/lower_solve/dist.hpp`): `destRank = myChildRelInds[iChild] %
//! commSize` for the send side, and the symmetric `childRecvInds` table
//! on the receive side.
//!
//! This table assumes a genuinely row-partitioned child update (each
//! grid rank holds only the rows it owns). This build's `GridDense`
//! implementation ([`crate::griddense::ReplicatedGridDense`]) instead
//! replicates every front across its whole grid, so `crate::factor` and
//! `crate::solve` never need to consult this module: a replicated front
//! already has every row locally. It is kept as the data a future
//! non-replicated `GridDense` would consume, documented as a known scope
//! boundary in `DESIGN.md` rather than silently wired in against a model
//! it doesn't match.

use dsparse::NodeInfo;

/// One node's send/receive index tables against one child, indexed by
/// peer rank within the node's own grid communicator.
#[derive(Clone, Debug)]
pub struct CommMeta {
    /// `num_child_send_inds[peer]`: how many of the child's locally held
    /// update rows this rank must send to `peer`.
    pub num_child_send_inds: Vec<usize>,
    /// `child_recv_inds[peer]`: the local front row (already offset by
    /// `node.size`, i.e. an index into the trailing block) each value
    /// received from `peer` lands at, in receive order.
    pub child_recv_inds: Vec<Vec<usize>>,
}

impl CommMeta {
    /// Scale every index count by `width` for a multi-right-hand-side
    /// solve (`DistNodalMatrix` rather than `DistNodalMultiVec`); the
    /// indices themselves are unaffected, only the transfer sizes are.
    pub fn send_size(&self, peer: usize, width: usize) -> usize {
        self.num_child_send_inds[peer] * width
    }

    pub fn recv_size(&self, peer: usize, width: usize) -> usize {
        self.child_recv_inds[peer].len() * width
    }
}

/// Build one child's [`CommMeta`] against `node`, whose grid has
/// `grid_size` ranks. `rel_inds` is `node.left_rel_inds` or
/// `node.right_rel_inds` depending on which child this is;
/// `child_update_len` is the height of that child's own update
/// (`lower_struct.len()`).
///
/// The owning rank of update row `i_child` is `rel_inds[i_child] %
/// grid_size` (linear-rank modulo, matching the original's VC
/// distribution); every rank independently derives the same table from
/// `info` alone, with no communication required.
pub fn build_comm_meta(node: &NodeInfo, rel_inds: &[usize], child_update_len: usize, grid_size: usize) -> CommMeta {
    assert!(grid_size > 0);
    let mut num_child_send_inds = vec![0usize; grid_size];
    let mut child_recv_inds: Vec<Vec<usize>> = vec![Vec::new(); grid_size];

    for i_child in 0..child_update_len {
        let i_front = rel_inds[i_child];
        let dest = i_front % grid_size;
        num_child_send_inds[dest] += 1;
        child_recv_inds[dest].push(i_front);
    }

    CommMeta {
        num_child_send_inds,
        child_recv_inds,
    }
}
