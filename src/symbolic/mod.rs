//! The symbolic-information model: the per-elimination-tree-node
//! structural metadata that nested dissection and symbolic factorization
//! would produce. Both of those are out of scope for this crate; this
//! module only defines the data these external collaborators are
//! assumed to hand the front tree.

pub mod info;
pub mod septree;

pub use info::{NodeInfo, SymmInfo};
pub use septree::{SepTree, SepTreeNode};
