//! Sparse all-to-all (§4.7): an `MPI_Alltoallv`-equivalent used by
//! assembly (§4.2) to ship reordered-matrix entries to the rank owning
//! their front. The debug-checked mode exchanges the counts vector with
//! a plain `all_to_all` first and asserts it agrees with what the
//! varcount exchange itself reports, matching §5's "debug builds check
//! this via an extra exchange" concurrency invariant.
//!
//! The solve driver's forward/backward sweeps (`crate::solve`) do *not*
//! go through this: they run against [`crate::griddense::ReplicatedGridDense`],
//! which assumes every rank of a front's grid already holds an identical
//! replica of that front, so parent/child accumulation is local array
//! indexing rather than a cross-rank exchange. [`crate::commmeta`]'s
//! tables describe the genuinely-partitioned exchange a non-replicated
//! `GridDense` would need here; see `DESIGN.md` for why that is out of
//! scope for this build.

use log::trace;
use mpi::datatype::{Partition, PartitionMut};
use mpi::traits::*;
use mpi::Count;

fn displacements(counts: &[Count]) -> Vec<Count> {
    let mut displs = vec![0; counts.len()];
    let mut running = 0;
    for (d, &c) in displs.iter_mut().zip(counts.iter()) {
        *d = running;
        running += c;
    }
    displs
}

/// Exchange `send_buf`, partitioned by `send_counts` (one count per peer
/// rank in `comm`), returning each peer's contribution concatenated in
/// rank order along with the per-peer receive counts.
pub fn sparse_all_to_all<C, T>(
    comm: &C,
    send_counts: &[Count],
    send_buf: &[T],
    debug_check: bool,
) -> (Vec<Count>, Vec<T>)
where
    C: Communicator,
    T: Equivalence + Copy + Default,
{
    let size = comm.size() as usize;
    assert_eq!(send_counts.len(), size, "one send count per peer rank is required");

    let mut recv_counts = vec![0 as Count; size];
    comm.all_to_all_into(send_counts, &mut recv_counts[..]);

    if debug_check {
        let mut recheck = vec![0 as Count; size];
        comm.all_to_all_into(send_counts, &mut recheck[..]);
        assert_eq!(
            recv_counts, recheck,
            "sparseAllToAll debug check: count exchange is not deterministic"
        );
        trace!("sparseAllToAll debug check passed: {:?}", recv_counts);
    }

    let send_displs = displacements(send_counts);
    let recv_displs = displacements(&recv_counts);
    let recv_total = recv_counts.iter().sum::<Count>() as usize;
    let mut recv_buf = vec![T::default(); recv_total];

    let send_partition = Partition::new(send_buf, send_counts.to_vec(), send_displs);
    let mut recv_partition = PartitionMut::new(&mut recv_buf[..], recv_counts.clone(), recv_displs);
    comm.all_to_all_varcount_into(&send_partition, &mut recv_partition);

    (recv_counts, recv_buf)
}

/// A "ask the owning rank, get an answer back" round used by §4.2 step 1
/// (translating a column index through the reordering map) and by the
/// owner lookups assembly needs when a referenced row lives on another
/// rank. `dist` gives ownership of each `usize` query; `resolve_local`
/// answers queries this rank owns.
pub fn request_reply_usize<C>(
    comm: &C,
    dist: &dsparse::dist::BlockDist,
    queries: &[usize],
    mut resolve_local: impl FnMut(usize) -> usize,
) -> Vec<usize>
where
    C: Communicator,
{
    let size = comm.size() as usize;
    let mut by_peer: Vec<Vec<usize>> = vec![Vec::new(); size];
    let mut orig_index: Vec<Vec<usize>> = vec![Vec::new(); size];
    for (i, &q) in queries.iter().enumerate() {
        let owner = dist.owner_of(q);
        by_peer[owner].push(q);
        orig_index[owner].push(i);
    }

    let send_counts: Vec<Count> = by_peer.iter().map(|v| v.len() as Count).collect();
    let send_buf: Vec<usize> = by_peer.iter().flatten().copied().collect();
    let (recv_counts, recv_buf) = sparse_all_to_all(comm, &send_counts, &send_buf, false);

    let replies: Vec<usize> = recv_buf.iter().map(|&q| resolve_local(q)).collect();
    let (_echo, reply_buf) = sparse_all_to_all(comm, &recv_counts, &replies, false);

    let mut answers = vec![0usize; queries.len()];
    let mut cursor = 0;
    for peer_origs in &orig_index {
        for &orig in peer_origs {
            answers[orig] = reply_buf[cursor];
            cursor += 1;
        }
    }
    answers
}
