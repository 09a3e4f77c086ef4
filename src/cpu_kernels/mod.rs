//! # CPU kernel variants
//!
//! Every operation ships a portable `generic` variant plus ISA-specific
//! variants stamped from the layer-2 templates in `src/macros`:
//!
//! ## Layer 1: `simd_primitive!` (src/macros/simd_primitive.rs)
//! Maps abstract ops to intrinsics: `simd_primitive!(sse2, i16, cmpgt, a, b)`.
//! Covers sse2/avx2/neon × i16/u32 plus the neonv8 byte permute.
//!
//! ## Layer 2: `operator_templates` (src/macros/operator_templates.rs)
//! `define_quad_max_star!` and `define_byteswap!`, parameterized by ISA,
//! target feature and alignment class (`load`/`store` vs `loadu`/`storeu`).
//!
//! | Module | Variants | Target feature |
//! |---|---|---|
//! | `scalar` | `quad_max_star`, `byteswap` | none |
//! | `sse2` | `quad_max_star_{a,u}`, `byteswap_{a,u}` | `sse2` |
//! | `avx2` | `quad_max_star_{a,u}`, `byteswap_{a,u}` | `avx2` |
//! | `neon` | `quad_max_star`, `byteswap`, `byteswap_v8` | `neon` |
//!
//! None of these functions check capabilities or alignment. Picking a legal
//! one is the dispatcher's job (`crate::kernel_dispatcher`).

pub mod scalar;

#[cfg(all(test, target_arch = "x86_64"))]
#[macro_use]
mod x86_tests;

#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(target_arch = "x86_64")]
pub mod avx2;

#[cfg(target_arch = "aarch64")]
pub mod neon;
