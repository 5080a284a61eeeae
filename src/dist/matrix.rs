//! `DistSparseMatrix<F>`: the value-carrying sibling of `DistSparseGraph`
//! (§4.1, §6). Same assembling lifecycle, with a parallel `values` array
//! kept in lock-step with the graph's `sources`/`targets`.

use crate::dist::graph::DistSparseGraph;
use crate::Field;

pub struct DistSparseMatrix<F: Field> {
    graph: DistSparseGraph,
    values: Vec<F>,
}

impl<F: Field> DistSparseMatrix<F> {
    pub fn new(num_rows: usize, first_local_row: usize, num_local_rows: usize) -> Self {
        DistSparseMatrix {
            graph: DistSparseGraph::new(num_rows, first_local_row, num_local_rows),
            values: Vec::new(),
        }
    }

    pub fn new_balanced(num_rows: usize, rank: usize, num_procs: usize) -> Self {
        DistSparseMatrix {
            graph: DistSparseGraph::new_balanced(num_rows, rank, num_procs),
            values: Vec::new(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.graph.num_rows()
    }

    pub fn first_local_row(&self) -> usize {
        self.graph.first_local_row()
    }

    pub fn local_height(&self) -> usize {
        self.graph.local_height()
    }

    pub fn start_assembly(&mut self) {
        self.graph.start_assembly();
        self.values.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.graph.reserve(additional);
        self.values.reserve(additional);
    }

    /// Insert or schedule update of entry `(row, col) = value`. As with
    /// `DistSparseGraph::insert`, callers are expected to touch each
    /// `(row, col)` at most once per assembly window.
    pub fn update(&mut self, row: usize, col: usize, value: F) {
        self.graph.insert(row, col);
        self.values.push(value);
    }

    pub fn stop_assembly(&mut self) {
        // Sort the values array by the same permutation the graph uses,
        // by re-deriving the sort key from (row, col) pairs recorded
        // before `stop_assembly` reorders them.
        let (pre_sources, pre_targets) = self.graph.raw_edges();
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by_key(|&k| (pre_sources[k], pre_targets[k]));
        self.values = order.into_iter().map(|k| self.values[k]).collect();
        self.graph.stop_assembly();
        debug_assert_eq!(self.values.len(), self.graph.num_local_edges());
    }

    pub fn row(&self, e: usize) -> usize {
        self.graph.source(e)
    }

    pub fn col(&self, e: usize) -> usize {
        self.graph.target(e)
    }

    pub fn value(&self, e: usize) -> F {
        self.values[e]
    }

    pub fn local_entry_offset(&self, local_row: usize) -> usize {
        self.graph.local_edge_offsets()[local_row]
    }

    pub fn num_connections(&self, local_row: usize) -> usize {
        self.graph.num_connections(local_row)
    }

    pub fn graph(&self) -> &DistSparseGraph {
        &self.graph
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn assembles_values_in_step_with_graph() {
        let mut m = DistSparseMatrix::<f64>::new(4, 0, 4);
        m.start_assembly();
        m.reserve(3);
        m.update(2, 2, 4.0);
        m.update(0, 0, 1.0);
        m.update(2, 0, 2.0);
        m.stop_assembly();

        assert_eq!(m.row(0), 0);
        assert_eq!(m.col(0), 0);
        assert_eq!(m.value(0), 1.0);
        assert_eq!(m.row(1), 2);
        assert_eq!(m.col(1), 0);
        assert_eq!(m.value(1), 2.0);
        assert_eq!(m.row(2), 2);
        assert_eq!(m.col(2), 2);
        assert_eq!(m.value(2), 4.0);
    }
}
