//! Process grids: the two-level parallelism substrate every distributed
//! front is built over (§5 of the design: a fixed process grid per front,
//! sibling fronts on disjoint sub-grids).

pub mod grid;

pub use grid::{build_grid_hierarchy, ProcessGrid};
