//! Structural symmetry check used by the LDL entry points, which refuse to
//! factor a matrix whose nonzero pattern is not symmetric (mirrors
//! `LdlSymbolic::new*`/`ldl_symbolic`'s preconditions).

use super::csmat::CsMatView;
use std::collections::HashSet;

/// Checks that the nonzero *pattern* is symmetric: for every `(i, j)`
/// stored, `(j, i)` is stored too. Does not compare values (a symmetric
/// LDL factorization only ever reads the lower triangle).
pub fn is_symmetric<N>(mat: &CsMatView<N>) -> bool {
    if mat.rows() != mat.cols() {
        return false;
    }
    let n = mat.rows();
    let mut pattern: HashSet<(usize, usize)> = HashSet::with_capacity(mat.nnz());
    for (outer, vec) in mat.outer_iterator() {
        for (inner, _) in vec.iter() {
            let (r, c) = if mat.is_csr() {
                (outer, inner)
            } else {
                (inner, outer)
            };
            pattern.insert((r, c));
        }
    }
    for &(r, c) in pattern.iter() {
        if r >= n || c >= n {
            return false;
        }
        if !pattern.contains(&(c, r)) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sparse::csmat::CsMatOwned;

    #[test]
    fn symmetric_identity() {
        let m: CsMatOwned<f64> = CsMatOwned::eye(4);
        assert!(is_symmetric(&m.view()));
    }

    #[test]
    fn asymmetric_detected() {
        let m = CsMatOwned::new_csr((2, 2), vec![0, 1, 1], vec![1], vec![5.0]);
        assert!(!is_symmetric(&m.view()));
    }
}
