//! `DistMap`: the reordering permutation of §3 ("Reordering map"), stored
//! distributed 1-D by row — both the forward map (indexed by original row)
//! and its inverse (indexed by reordered row) are independently
//! block-distributed arrays, since nothing requires the two numberings to
//! land on the same rank for the same index.

use crate::dist::block::BlockDist;

pub struct DistMap {
    num_rows: usize,
    forward_first: usize,
    /// `forward[k]` is the reordered index of original row `forward_first + k`.
    forward: Vec<usize>,
    inverse_first: usize,
    /// `inverse[k]` is the original index of reordered row `inverse_first + k`.
    inverse: Vec<usize>,
}

impl DistMap {
    pub fn new(
        num_rows: usize,
        forward_first: usize,
        forward: Vec<usize>,
        inverse_first: usize,
        inverse: Vec<usize>,
    ) -> Self {
        assert!(forward_first + forward.len() <= num_rows);
        assert!(inverse_first + inverse.len() <= num_rows);
        DistMap {
            num_rows,
            forward_first,
            forward,
            inverse_first,
            inverse,
        }
    }

    /// The identity map, distributed by `dist` as seen from `rank`: used
    /// by the `P == 1` / no-nested-dissection seed scenarios where no
    /// external reordering is supplied.
    pub fn identity(dist: &BlockDist, rank: usize) -> Self {
        let first = dist.first_row(rank);
        let count = dist.local_count(rank);
        let ids: Vec<usize> = (first..first + count).collect();
        DistMap::new(dist.num_rows(), first, ids.clone(), first, ids)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// The reordered index of original row `row`, if this rank holds it.
    pub fn forward_local(&self, row: usize) -> Option<usize> {
        row.checked_sub(self.forward_first)
            .filter(|&k| k < self.forward.len())
            .map(|k| self.forward[k])
    }

    /// The original index of reordered row `row`, if this rank holds it.
    pub fn inverse_local(&self, row: usize) -> Option<usize> {
        row.checked_sub(self.inverse_first)
            .filter(|&k| k < self.inverse.len())
            .map(|k| self.inverse[k])
    }

    pub fn forward_first_row(&self) -> usize {
        self.forward_first
    }

    pub fn inverse_first_row(&self) -> usize {
        self.inverse_first
    }

    pub fn forward_slice(&self) -> &[usize] {
        &self.forward
    }

    pub fn inverse_slice(&self) -> &[usize] {
        &self.inverse
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity_round_trips() {
        let dist = BlockDist::new(9, 3);
        let map = DistMap::identity(&dist, 1);
        assert_eq!(map.forward_local(3), Some(3));
        assert_eq!(map.forward_local(0), None);
        assert_eq!(map.inverse_local(5), Some(5));
    }

    #[test]
    fn explicit_forward_and_inverse() {
        // reorder [0,1,2,3] -> [3,2,1,0], both halves distributed by pairs
        let map = DistMap::new(4, 0, vec![3, 2], 2, vec![1, 0]);
        assert_eq!(map.forward_local(0), Some(3));
        assert_eq!(map.forward_local(1), Some(2));
        assert_eq!(map.forward_local(2), None);
        assert_eq!(map.inverse_local(2), Some(1));
        assert_eq!(map.inverse_local(3), Some(0));
    }
}
