//! `changeFrontType` (§4.4): move a factored front tree between the
//! storage/algorithm states of [`FrontType`], including selective
//! inversion. Grounded on `ChangeFrontType`
//! (`include/clique/numeric/change_front_type.hpp`).
//!
//! This reference implementation keeps every front's numeric payload in
//! one dense `Array2` regardless of the `two_d` tag (there is no separate
//! `[VC,*]` vs. `[MC,MR]` physical layout to convert between, since
//! [`crate::griddense::ReplicatedGridDense`] already replicates a
//! distributed front onto every rank of its grid). So the 1D<->2D leg of
//! the original's transform is a zero-cost relabeling here; only the
//! selective-inversion leg does real arithmetic.

use crate::error::FactorError;
use crate::front::{Front, FrontType};
use crate::local_ldl::triangular_inverse_unit_lower;
use dsparse::Field;

/// Move one front from its current `front_type` to `requested`, applying
/// selective inversion if the target calls for it and the source doesn't
/// already have it. A no-op if the two types already match (§4.4's
/// "check if this call can be a no-op").
pub fn change_front_type<F: Field>(front: &mut Front<F>, requested: FrontType) -> Result<(), FactorError> {
    let current = front.front_type;
    if current == requested {
        return Ok(());
    }
    if !current.factored {
        return Err(FactorError::UnsupportedTransition {
            from: format!("{current:?}"),
            to: format!("{requested:?}"),
        });
    }

    // 1D <-> 2D is a pure relabeling in this implementation; block/
    // intra-pivoted/hermitian must stay fixed across it.
    let differs_only_in_two_d = FrontType { two_d: requested.two_d, ..current } == requested;
    if differs_only_in_two_d {
        front.front_type = requested;
        return Ok(());
    }

    // Append selective inversion: requires a 2D layout and an
    // unfactored->inverted target that otherwise matches, per
    // `SelInvFactorization(frontType)` in the original.
    let wants_sel_inv = requested.selectively_inverted && !current.selectively_inverted;
    let matches_besides_sel_inv_and_two_d = FrontType {
        two_d: current.two_d,
        selectively_inverted: current.selectively_inverted,
        ..requested
    } == requested;
    if wants_sel_inv && matches_besides_sel_inv_and_two_d {
        if !current.two_d {
            front.front_type = FrontType { two_d: true, ..current };
        }
        let l_tl = front.top_left().to_owned();
        let inv = triangular_inverse_unit_lower(&l_tl);
        front.top_left_mut().assign(&inv);
        front.front_type = requested;
        return Ok(());
    }

    Err(FactorError::UnsupportedTransition {
        from: format!("{current:?}"),
        to: format!("{requested:?}"),
    })
}
