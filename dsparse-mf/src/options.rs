//! Plain option structs and the symmetric/Hermitian entry-point pair.
//! No environment variables or config files: the only ambient
//! configuration a caller supplies is which front-type variant to
//! request and whether to check for singular pivots, passed as plain
//! constructor arguments.

use dsparse::comm::ProcessGrid;
use dsparse::{Field, SymmInfo};

use crate::error::FactorError;
use crate::factor::{ldl, RequestedFrontType};
use crate::griddense::GridDense;
use crate::tree::SymmFrontTree;

/// Options threaded through [`ldl`]'s driver.
#[derive(Clone, Copy, Debug)]
pub struct FactorizationOptions {
    pub front_type: RequestedFrontType,
}

impl Default for FactorizationOptions {
    fn default() -> Self {
        FactorizationOptions {
            front_type: RequestedFrontType::Ldl2D,
        }
    }
}

/// Options threaded through [`crate::solve::solve`]'s driver.
#[derive(Clone, Copy, Debug)]
pub struct SolveOptions {
    pub check_if_singular: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            check_if_singular: true,
        }
    }
}

/// Symmetric (`A = L D L^T`) orientation entry point, mirroring
/// `DistSupernodeLDLT`'s thin wrapper around the orientation-
/// parameterized routine.
pub fn dist_supernode_ldlt<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &mut SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    options: FactorizationOptions,
    dense: &G,
) -> Result<(), FactorError> {
    ldl(info, tree, grids, options.front_type, dense, false)
}

/// Hermitian (`A = L D L^H`) orientation entry point, mirroring
/// `DistSupernodeLDLH`.
pub fn dist_supernode_ldlh<F: Field, G: GridDense<F>>(
    info: &SymmInfo,
    tree: &mut SymmFrontTree<F>,
    grids: &[Option<ProcessGrid>],
    options: FactorizationOptions,
    dense: &G,
) -> Result<(), FactorError> {
    ldl(info, tree, grids, options.front_type, dense, true)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_factorization_options_request_ldl_2d() {
        let opts = FactorizationOptions::default();
        assert!(matches!(opts.front_type, RequestedFrontType::Ldl2D));
    }

    #[test]
    fn default_solve_options_check_for_singularity() {
        assert!(SolveOptions::default().check_if_singular);
    }
}
