//! Operation registry.
//!
//! Each operation module declares its function-pointer type, its static
//! [`Operation`](crate::kernel_types::Operation) table, and the safe entry
//! points that dispatch through it.

pub mod byteswap;
pub mod quad_max_star;

use crate::error::{KernelError, KernelResult};
use crate::kernel_types::OperationInfo;

pub use byteswap::{byteswap, byteswap_aligned, byteswap_unaligned, Byteswap, ByteswapFn, BYTESWAP};
pub use quad_max_star::{quad_max_star, quad_max_star_aligned, QuadMaxStar, QuadMaxStarFn, QUAD_MAX_STAR};

/// Every registered operation, in a stable order.
pub fn operations() -> [&'static dyn OperationInfo; 2] {
    [&QUAD_MAX_STAR, &BYTESWAP]
}

pub fn find(name: &str) -> KernelResult<&'static dyn OperationInfo> {
    operations()
        .into_iter()
        .find(|op| op.name() == name)
        .ok_or_else(|| KernelError::UnknownOperation(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("byteswap_u32").unwrap().name(), "byteswap_u32");
        assert!(find("quad_max_star_i16").unwrap().deprecated());
        assert!(matches!(find("fft"), Err(KernelError::UnknownOperation(_))));
    }

    #[test]
    fn test_every_operation_has_baseline_first() {
        for op in operations() {
            let descs = op.descriptors();
            assert!(descs[0].is_baseline(), "{} lacks a leading baseline", op.name());
            assert!(descs[1..].iter().all(|d| !d.requires.is_empty()));
        }
    }
}
