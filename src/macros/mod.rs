//! Macro system for the SIMD kernel variants.
//!
//! Two layers:
//! 1. simd_primitive! (Hardware Primitives)
//! 2. operator templates (`define_quad_max_star!`, `define_byteswap!`)

#[macro_use]
pub mod simd_primitive;
#[macro_use]
pub mod operator_templates;
