//! Scalar reference formulas, `extern "C"` and slice forms.
//!
//! These serve as:
//! 1. The per-element contract every dsp-kernels variant must reproduce bit for bit.
//! 2. The shared tail loop: SIMD variants hand their `len % LANES` remainder here,
//!    so no variant carries its own copy of the formula.
//!
//! The `#[no_mangle]` forms keep a stable symbol for C callers and disassembly checks.

pub mod bytes;
pub mod select;

pub use bytes::{byteswap_u32, byteswap_words};
pub use select::{max_star_i16, quad_max_star_i16, quad_max_star_range};
