//! Per-node structural metadata: front sizing, the off-diagonal structure,
//! the child-to-parent relative-index tables, and (for distributed nodes)
//! the process grid shape. See §3 ("Separator tree / symmetric info
//! tree") and §4.5 for how the comm-metadata builder consumes this.

/// Process-grid shape recorded for a distributed node; `None` for a local
/// node (it lives entirely on one rank and needs no grid).
pub type GridShape = Option<(usize, usize)>;

#[derive(Clone, Debug)]
pub struct NodeInfo {
    /// Width of this front's square diagonal block.
    pub size: usize,
    /// Global (reordered) row/column offset of the diagonal block.
    pub offset: usize,
    /// Sorted global (reordered) indices of the off-diagonal rows of this
    /// front (the coupling to later, ancestor separators).
    pub lower_struct: Vec<usize>,
    /// Same structure expressed against the *original* (pre-symbolic-
    /// fill) graph, as handed over by symbolic factorization.
    pub orig_lower_struct: Vec<usize>,
    /// `orig_lower_rel_inds[k]` is the row of `frontL` that the `k`-th
    /// entry of `orig_lower_struct` maps to.
    pub orig_lower_rel_inds: Vec<usize>,
    /// For a non-leaf node: `left_rel_inds[j]` / `right_rel_inds[j]` give
    /// the row of *this* node's front that the left/right child's `j`-th
    /// update row/column must be accumulated into.
    pub left_rel_inds: Vec<usize>,
    pub right_rel_inds: Vec<usize>,
    pub parent: Option<usize>,
    pub children: [Option<usize>; 2],
    /// `Some((rows, cols))` for a distributed node, `None` for a local one.
    pub grid: GridShape,
}

impl NodeInfo {
    pub fn is_distributed(&self) -> bool {
        self.grid.is_some()
    }

    /// Height of this node's dense front: `size + |lower_struct|`.
    pub fn front_height(&self) -> usize {
        self.size + self.lower_struct.len()
    }
}

#[derive(Clone, Debug)]
pub struct SymmInfo {
    nodes: Vec<NodeInfo>,
    num_local: usize,
}

impl SymmInfo {
    pub fn new(nodes: Vec<NodeInfo>, num_local: usize) -> Self {
        assert!(num_local <= nodes.len());
        SymmInfo { nodes, num_local }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_local(&self) -> usize {
        self.num_local
    }

    pub fn is_local(&self, i: usize) -> bool {
        i < self.num_local
    }

    pub fn node(&self, i: usize) -> &NodeInfo {
        &self.nodes[i]
    }

    pub fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Trivial single-node info matching `SepTree::single_front`: the
    /// whole reordered problem as one un-split local front.
    pub fn single_front(n: usize) -> Self {
        SymmInfo {
            nodes: vec![NodeInfo {
                size: n,
                offset: 0,
                lower_struct: Vec::new(),
                orig_lower_struct: Vec::new(),
                orig_lower_rel_inds: Vec::new(),
                left_rel_inds: Vec::new(),
                right_rel_inds: Vec::new(),
                parent: None,
                children: [None, None],
                grid: None,
            }],
            num_local: 1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn front_height_is_size_plus_lower_struct() {
        let info = SymmInfo::single_front(64);
        assert_eq!(info.node(0).front_height(), 64);
    }
}
