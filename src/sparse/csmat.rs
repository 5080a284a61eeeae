//! Compressed sparse (CSR/CSC) matrix, the per-rank shard representation.
//!
//! This mirrors the classic `sprs` `CsMat` design: an `indptr` array of
//! `outer_dims + 1` row/column pointers, an `indices` array of inner
//! indices, and a parallel `data` array. Which of rows/columns is "outer"
//! is recorded by [`CompressedStorage`].

use num_traits::Num;
use std::ops::Deref;

/// Which axis is stored contiguously.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompressedStorage {
    CSR,
    CSC,
}

use CompressedStorage::{CSC, CSR};

/// A compressed sparse matrix, generic over the storage backing the three
/// parallel arrays (so both owned `Vec`s and borrowed slices can share the
/// same implementation).
#[derive(Clone, Debug)]
pub struct CsMatBase<N, IpStorage, IStorage, DStorage>
where
    IpStorage: Deref<Target = [usize]>,
    IStorage: Deref<Target = [usize]>,
    DStorage: Deref<Target = [N]>,
{
    pub(crate) storage: CompressedStorage,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) indptr: IpStorage,
    pub(crate) indices: IStorage,
    pub(crate) data: DStorage,
}

pub type CsMatOwned<N> = CsMatBase<N, Vec<usize>, Vec<usize>, Vec<N>>;
pub type CsMatView<'a, N> = CsMatBase<N, &'a [usize], &'a [usize], &'a [N]>;

impl<N, IpStorage, IStorage, DStorage> CsMatBase<N, IpStorage, IStorage, DStorage>
where
    IpStorage: Deref<Target = [usize]>,
    IStorage: Deref<Target = [usize]>,
    DStorage: Deref<Target = [N]>,
{
    pub fn rows(&self) -> usize {
        self.nrows
    }

    pub fn cols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_csr(&self) -> bool {
        self.storage == CSR
    }

    pub fn is_csc(&self) -> bool {
        self.storage == CSC
    }

    pub fn storage(&self) -> CompressedStorage {
        self.storage
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[N] {
        &self.data
    }

    fn outer_dims(&self) -> usize {
        if self.is_csr() {
            self.nrows
        } else {
            self.ncols
        }
    }

    pub fn view(&self) -> CsMatView<N> {
        CsMatView {
            storage: self.storage,
            nrows: self.nrows,
            ncols: self.ncols,
            indptr: &self.indptr,
            indices: &self.indices,
            data: &self.data,
        }
    }

    /// Iterate over (outer index, inner-index/value pairs) in outer order.
    pub fn outer_iterator(&self) -> OuterIterator<N> {
        OuterIterator {
            indptr: &self.indptr,
            indices: &self.indices,
            data: &self.data,
            cur: 0,
            end: self.outer_dims(),
        }
    }

    /// Iterate over the outer dimension permuted by `perm` (the `k`-th
    /// vector visited is the `perm[k]`-th vector of the matrix).
    pub fn outer_iterator_perm<'a, PStorage>(
        &'a self,
        perm: crate::sparse::permutation::PermView<'a>,
    ) -> PermOuterIterator<'a, N>
    where
        PStorage: Deref<Target = [usize]>,
    {
        PermOuterIterator {
            mat: self.view(),
            perm,
            cur: 0,
            end: self.outer_dims(),
        }
    }

    /// A single outer vector's nonzeros.
    pub fn outer_view(&self, i: usize) -> VecView<N> {
        let start = self.indptr[i];
        let stop = self.indptr[i + 1];
        VecView {
            indices: &self.indices[start..stop],
            data: &self.data[start..stop],
        }
    }

    pub fn to_dense(&self) -> ndarray::Array2<N>
    where
        N: Clone + num_traits::Zero,
    {
        let mut out = ndarray::Array2::zeros((self.nrows, self.ncols));
        crate::sparse::to_dense::assign_to_dense(out.view_mut(), self.view());
        out
    }
}

impl<N> CsMatOwned<N> {
    pub fn new_csc(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<N>,
    ) -> Self {
        CsMatBase {
            storage: CSC,
            nrows: shape.0,
            ncols: shape.1,
            indptr,
            indices,
            data,
        }
    }

    pub fn new_csr(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<N>,
    ) -> Self {
        CsMatBase {
            storage: CSR,
            nrows: shape.0,
            ncols: shape.1,
            indptr,
            indices,
            data,
        }
    }

    pub fn eye(n: usize) -> Self
    where
        N: Clone + num_traits::One,
    {
        let indptr: Vec<usize> = (0..=n).collect();
        let indices: Vec<usize> = (0..n).collect();
        let data = vec![N::one(); n];
        Self::new_csr((n, n), indptr, indices, data)
    }

    pub fn eye_csc(n: usize) -> Self
    where
        N: Clone + num_traits::One,
    {
        let mut m = Self::eye(n);
        m.storage = CSC;
        m
    }

    pub fn transpose_into(self) -> Self {
        let storage = if self.storage == CSR { CSC } else { CSR };
        CsMatBase {
            storage,
            nrows: self.ncols,
            ncols: self.nrows,
            indptr: self.indptr,
            indices: self.indices,
            data: self.data,
        }
    }
}

impl<'a, N: Clone> CsMatView<'a, N> {
    /// Build a view directly over raw parallel arrays. The caller must
    /// uphold the CSR/CSC invariants (sorted inner indices per outer
    /// vector, `indptr` monotone, within-bounds inner indices).
    ///
    /// # Safety
    /// The three slices must encode a valid compressed-sparse structure of
    /// the given shape; this is only used internally once an algorithm
    /// (e.g. the LDL factorization) has established that invariant itself.
    pub unsafe fn new_view_raw(
        storage: CompressedStorage,
        shape: (usize, usize),
        indptr: *const usize,
        indices: *const usize,
        data: *const N,
    ) -> CsMatView<'a, N> {
        let outer = if storage == CSR { shape.0 } else { shape.1 };
        let indptr = std::slice::from_raw_parts(indptr, outer + 1);
        let nnz = indptr[outer];
        let indices = std::slice::from_raw_parts(indices, nnz);
        let data = std::slice::from_raw_parts(data, nnz);
        CsMatBase {
            storage,
            nrows: shape.0,
            ncols: shape.1,
            indptr,
            indices,
            data,
        }
    }

    pub fn new_view(
        storage: CompressedStorage,
        shape: (usize, usize),
        indptr: &'a [usize],
        indices: &'a [usize],
        data: &'a [N],
    ) -> Result<CsMatView<'a, N>, &'static str> {
        let outer = if storage == CSR { shape.0 } else { shape.1 };
        if indptr.len() != outer + 1 {
            return Err("indptr has wrong length");
        }
        let nnz = indptr[outer];
        if indices.len() != nnz || data.len() != nnz {
            return Err("indices/data length does not match indptr");
        }
        Ok(CsMatBase {
            storage,
            nrows: shape.0,
            ncols: shape.1,
            indptr,
            indices,
            data,
        })
    }
}

impl<N, A, B, C> PartialEq for CsMatBase<N, A, B, C>
where
    N: PartialEq,
    A: Deref<Target = [usize]>,
    B: Deref<Target = [usize]>,
    C: Deref<Target = [N]>,
{
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
            && self.nrows == other.nrows
            && self.ncols == other.ncols
            && *self.indptr == *other.indptr
            && *self.indices == *other.indices
            && *self.data == *other.data
    }
}

/// A single row/column's nonzeros, as parallel index/value slices.
pub struct VecView<'a, N> {
    indices: &'a [usize],
    data: &'a [N],
}

impl<'a, N: Clone> VecView<'a, N> {
    pub fn iter(&self) -> impl Iterator<Item = (usize, &N)> {
        self.indices.iter().cloned().zip(self.data.iter())
    }

    /// Iterate with inner indices mapped through `perm_inv` (used so an
    /// un-permuted matrix can be walked as if it were `P A P^T`).
    pub fn iter_perm<'p>(
        &self,
        perm_inv: &'p [usize],
    ) -> impl Iterator<Item = (usize, &N)> + 'p
    where
        'a: 'p,
    {
        self.indices
            .iter()
            .map(move |&i| perm_inv[i])
            .zip(self.data.iter())
    }
}

pub struct OuterIterator<'a, N> {
    indptr: &'a [usize],
    indices: &'a [usize],
    data: &'a [N],
    cur: usize,
    end: usize,
}

impl<'a, N> Iterator for OuterIterator<'a, N> {
    type Item = (usize, VecView<'a, N>);
    fn next(&mut self) -> Option<Self::Item> {
        if self.cur >= self.end {
            return None;
        }
        let i = self.cur;
        let start = self.indptr[i];
        let stop = self.indptr[i + 1];
        self.cur += 1;
        Some((
            i,
            VecView {
                indices: &self.indices[start..stop],
                data: &self.data[start..stop],
            },
        ))
    }
}

impl<'a, N> DoubleEndedIterator for OuterIterator<'a, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.cur >= self.end {
            return None;
        }
        self.end -= 1;
        let i = self.end;
        let start = self.indptr[i];
        let stop = self.indptr[i + 1];
        Some((
            i,
            VecView {
                indices: &self.indices[start..stop],
                data: &self.data[start..stop],
            },
        ))
    }
}

pub struct PermOuterIterator<'a, N> {
    mat: CsMatView<'a, N>,
    perm: crate::sparse::permutation::PermView<'a>,
    cur: usize,
    end: usize,
}

impl<'a, N: Clone> Iterator for PermOuterIterator<'a, N> {
    type Item = (usize, VecView<'a, N>);
    fn next(&mut self) -> Option<Self::Item> {
        if self.cur >= self.end {
            return None;
        }
        let k = self.cur;
        self.cur += 1;
        let outer = self.perm.at(k);
        Some((outer, self.mat.outer_view(outer)))
    }
}

/// Row/column conversion shared by the triplet-to-CSC/CSR builders.
pub mod raw {
    use super::CompressedStorage;
    use num_traits::Zero;

    /// Convert a compressed matrix in `from` storage into the opposite
    /// storage (CSR<->CSC is a transpose of the compression axis).
    pub fn convert_storage<N: Clone + Zero>(
        from: CompressedStorage,
        shape: (usize, usize),
        indptr: &[usize],
        indices: &[usize],
        data: &[N],
        out_indptr: &mut [usize],
        out_indices: &mut [usize],
        out_data: &mut [N],
    ) {
        let (outer, inner) = if from == CompressedStorage::CSR {
            (shape.0, shape.1)
        } else {
            (shape.1, shape.0)
        };
        debug_assert_eq!(out_indptr.len(), inner + 1);

        let mut counts = vec![0usize; inner + 1];
        for &j in indices.iter() {
            counts[j + 1] += 1;
        }
        for i in 1..=inner {
            counts[i] += counts[i - 1];
        }
        out_indptr.clone_from_slice(&counts);

        let mut cursor = counts.clone();
        for o in 0..outer {
            for p in indptr[o]..indptr[o + 1] {
                let j = indices[p];
                let dst = cursor[j];
                out_indices[dst] = o;
                out_data[dst] = data[p].clone();
                cursor[j] += 1;
            }
        }
    }
}
