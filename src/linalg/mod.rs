//! Small linear-algebra helpers shared by the symbolic and numeric LDL
//! passes.

use num_traits::{Num, Zero};

/// Element-wise `x := D^-1 x`.
///
/// When `check_if_singular` is set, a zero (or, for complex fields,
/// exactly-zero-magnitude) diagonal entry is reported rather than
/// silently producing an infinity -- the one recoverable numerical-
/// singularity path the design calls for.
pub fn diag_solve<N>(diag: &[N], x: &mut [N], check_if_singular: bool) -> Result<(), usize>
where
    N: Num + Copy,
{
    for (k, (d, xk)) in diag.iter().zip(x.iter_mut()).enumerate() {
        if check_if_singular && d.is_zero() {
            return Err(k);
        }
        *xk = *xk / *d;
    }
    Ok(())
}
