//! A single elimination-tree node's dense front: `frontL` (the `[L; E]`
//! stack of §3), the `work` Schur-complement scratch, and the extra state
//! the intra-pivoted/block/selectively-inverted variants need.
//!
//! Grounded on `SymmFront<F>` (`include/clique/core/dist_symm_front_tree/...`
//! as referenced from `ldl/local.hpp`): `frontL`/`work`/`diag`/`subdiag`/
//! `piv`, one local dense block plus the two parallel 1-D/2-D distributed
//! representations.

use ndarray::Array2;
use num_traits::Zero;

use dsparse::Field;

/// The coherent 6-tuple tag of §3: which of the legal storage/algorithm
/// combinations a front is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontType {
    pub factored: bool,
    pub two_d: bool,
    pub block: bool,
    pub selectively_inverted: bool,
    pub intra_pivoted: bool,
    pub hermitian: bool,
}

impl FrontType {
    /// The front type a freshly built, unfactored front starts in.
    pub fn unfactored(hermitian: bool) -> Self {
        FrontType {
            factored: false,
            two_d: true,
            block: false,
            selectively_inverted: false,
            intra_pivoted: false,
            hermitian,
        }
    }

    /// The five externally requested factorization variants of §6:
    /// `LDL_1D`, `LDL_2D`, `LDL_INTRAPIV_2D`, `BLOCK_LDL_2D`,
    /// `BLOCK_LDL_INTRAPIV_2D`.
    pub fn factored_variant(hermitian: bool, two_d: bool, block: bool, intra_pivoted: bool) -> Self {
        assert!(
            !(block && intra_pivoted && !two_d),
            "block/intra-pivoted variants require a 2-D front"
        );
        FrontType {
            factored: true,
            two_d,
            block,
            selectively_inverted: false,
            intra_pivoted,
            hermitian,
        }
    }
}

/// A node's dense front. `size` is the leading (separator) block width;
/// `frontL` has `size + lower_struct_len` rows and `size` columns.
pub struct Front<F: Field> {
    pub size: usize,
    pub lower_struct_len: usize,
    /// The `[L; E]` stack, row-major dense storage.
    pub front_l: Array2<F>,
    /// Square `lower_struct_len x lower_struct_len` Schur-complement
    /// scratch, fed upward to the parent and released once consumed.
    pub work: Option<Array2<F>>,
    /// Extracted diagonal after factorization, length `size`.
    pub diag: Vec<F>,
    /// Sub-diagonal for the intra-pivoted variants (length `size - 1`,
    /// empty otherwise).
    pub subdiag: Vec<F>,
    /// Row-pivot permutation for the intra-pivoted variants (length
    /// `size`, identity when not intra-pivoted).
    pub piv: Vec<usize>,
    pub front_type: FrontType,
}

impl<F: Field> Front<F> {
    /// A freshly built, unfactored, zeroed front of the given shape.
    pub fn zeros(size: usize, lower_struct_len: usize, hermitian: bool) -> Self {
        Front {
            size,
            lower_struct_len,
            front_l: Array2::from_elem((size + lower_struct_len, size), F::zero()),
            work: None,
            diag: Vec::new(),
            subdiag: Vec::new(),
            piv: (0..size).collect(),
            front_type: FrontType::unfactored(hermitian),
        }
    }

    pub fn height(&self) -> usize {
        self.front_l.nrows()
    }

    /// The leading `size x size` block, `A_TL` in §4.3's notation.
    pub fn top_left(&self) -> ndarray::ArrayView2<F> {
        self.front_l.slice(ndarray::s![..self.size, ..])
    }

    pub fn top_left_mut(&mut self) -> ndarray::ArrayViewMut2<F> {
        let size = self.size;
        self.front_l.slice_mut(ndarray::s![..size, ..])
    }

    /// The trailing `lower_struct_len x size` block, `A_BL`.
    pub fn bottom_left(&self) -> ndarray::ArrayView2<F> {
        self.front_l.slice(ndarray::s![self.size.., ..])
    }

    pub fn bottom_left_mut(&mut self) -> ndarray::ArrayViewMut2<F> {
        let size = self.size;
        self.front_l.slice_mut(ndarray::s![size.., ..])
    }

    /// Allocate (zeroed) `work` ahead of child-update accumulation.
    pub fn alloc_work(&mut self) {
        self.work = Some(Array2::from_elem(
            (self.lower_struct_len, self.lower_struct_len),
            F::zero(),
        ));
    }

    /// Reset a factored front back to the unfactored `SYMM_2D` state
    /// (§8 scenario 6's `changeFrontType(SYMM_2D)`): clears `diag`/
    /// `subdiag`/`piv`/`work` and marks the front unfactored, leaving
    /// `frontL`'s storage in place for the caller to overwrite with a
    /// fresh matrix's entries before calling [`crate::factor::ldl`]
    /// again. Unlike [`crate::transform::change_front_type`] this always
    /// succeeds: un-factoring has no illegal source state.
    pub fn reset_to_unfactored(&mut self) {
        self.diag.clear();
        self.subdiag.clear();
        self.piv = (0..self.size).collect();
        self.work = None;
        self.front_type = FrontType::unfactored(self.front_type.hermitian);
    }
}
