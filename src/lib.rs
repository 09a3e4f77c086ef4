//! dsp-kernels: multi-variant SIMD kernels for signal-processing pipelines.
//!
//! Each operation ships a portable baseline plus ISA-specific variants
//! (SSE2, AVX2, NEON). All variants are bit-exact substitutes for the
//! baseline; they differ only in throughput and pointer-alignment
//! requirements. The dispatcher picks the fastest legal variant for the host
//! capability set and the alignment of each call site.
//!
//! - **Runtime Capability Detection**: probed once, cached for the process
//! - **Alignment Classes**: aligned variants are never handed unaligned memory
//! - **Equivalence Harness**: every variant checked against the baseline
//!
//! # Quick Start
//!
//! ```
//! use dsp_kernels::{byteswap, quad_max_star};
//!
//! let mut words = [0x0000_0001u32, 0xFFFF_FFFF, 0x5A5A_5A5A];
//! byteswap(&mut words);
//! assert_eq!(words, [0x0100_0000, 0xFFFF_FFFF, 0x5A5A_5A5A]);
//!
//! let mut t = [0i16; 1];
//! quad_max_star(&mut t, &[5], &[3], &[2], &[9]);
//! assert_eq!(t, [9]);
//! ```

#[macro_use]
pub mod macros;

pub mod config;
pub mod cpu_kernels;
pub mod error;
pub mod harness;
pub mod kernel_dispatcher;
pub mod kernel_types;
pub mod ops;
pub mod runtime_detection;

pub use config::{KernelConfig, KernelPreference};
pub use error::{KernelError, KernelResult};
pub use harness::{check, check_all, AlignedBuf, Contract, EquivalenceReport, BOUNDARY_LENGTHS};
pub use kernel_dispatcher::{alignment, global, resolve, KernelDispatcher, Selection, FEATURE_PREFERENCE};
pub use kernel_types::{Alignment, ElementType, Operation, OperationInfo, Variant, VariantDesc};
pub use ops::{
    byteswap, byteswap_aligned, byteswap_unaligned, operations, quad_max_star, quad_max_star_aligned, ByteswapFn,
    QuadMaxStarFn, BYTESWAP, QUAD_MAX_STAR,
};
pub use runtime_detection::{alignment_of, cpu_features, is_aligned, CpuFeatures};
