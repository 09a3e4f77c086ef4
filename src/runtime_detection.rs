//! Runtime CPU capability detection with process-lifetime caching.
//!
//! The capability set is probed once and never changes afterwards. The cache
//! is filled with compute-then-publish: two threads racing on first use may
//! both probe, which is harmless because the probe only reads fixed hardware
//! facts, and neither blocks the other.

use std::fmt;
use std::sync::OnceLock;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Instruction-set extensions relevant to kernel selection.
    ///
    /// Flags are independent; several are usually set at once (an AVX2 host
    /// also reports SSE2).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CpuFeatures: u32 {
        /// 128-bit vector integer ops (x86_64).
        const SSE2 = 1 << 0;
        /// 256-bit vector integer ops (x86_64).
        const AVX2 = 1 << 1;
        /// 512-bit vector ops (x86_64).
        const AVX512F = 1 << 2;
        /// 128-bit Advanced SIMD.
        const NEON = 1 << 8;
        /// AArch64 Advanced SIMD with full-register table lookup (`TBL`).
        const NEON_V8 = 1 << 9;
        /// RISC-V vector extension with `vrgather` table lookup.
        const RVV = 1 << 16;
        /// RISC-V vector extension with vector byte reverse (Zvbb).
        const RVV_ZVBB = 1 << 17;
    }
}

impl CpuFeatures {
    /// Probe the executing processor.
    pub fn detect() -> Self {
        let features = detect_host();
        log::debug!("Detected CPU features: {}", features);
        features
    }

    pub fn has_sse2(self) -> bool {
        self.contains(Self::SSE2)
    }

    pub fn has_avx2(self) -> bool {
        self.contains(Self::AVX2)
    }

    pub fn has_neon(self) -> bool {
        self.contains(Self::NEON)
    }

    pub fn has_rvv_gather(self) -> bool {
        self.contains(Self::RVV)
    }
}

impl fmt::Display for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Scalar");
        }
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        write!(f, "{}", names.join("+"))
    }
}

#[cfg(target_arch = "x86_64")]
fn detect_host() -> CpuFeatures {
    let mut f = CpuFeatures::empty();
    if is_x86_feature_detected!("sse2") {
        f |= CpuFeatures::SSE2;
    }
    if is_x86_feature_detected!("avx2") {
        f |= CpuFeatures::AVX2;
    }
    if is_x86_feature_detected!("avx512f") {
        f |= CpuFeatures::AVX512F;
    }
    f
}

#[cfg(target_arch = "aarch64")]
fn detect_host() -> CpuFeatures {
    if std::arch::is_aarch64_feature_detected!("neon") {
        // A64 Advanced SIMD always carries the 128-bit TBL forms.
        CpuFeatures::NEON | CpuFeatures::NEON_V8
    } else {
        CpuFeatures::empty()
    }
}

#[cfg(any(target_arch = "riscv64", target_arch = "riscv32"))]
fn detect_host() -> CpuFeatures {
    // Runtime RISC-V feature probing is not stable; trust the build target.
    let mut f = CpuFeatures::empty();
    if cfg!(target_feature = "v") {
        f |= CpuFeatures::RVV;
    }
    if cfg!(target_feature = "v") && cfg!(target_feature = "zvbb") {
        f |= CpuFeatures::RVV_ZVBB;
    }
    f
}

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "riscv64",
    target_arch = "riscv32"
)))]
fn detect_host() -> CpuFeatures {
    CpuFeatures::empty()
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// The host capability set, probed on first call and cached for the process.
pub fn cpu_features() -> CpuFeatures {
    if let Some(features) = FEATURES.get() {
        return *features;
    }
    let detected = CpuFeatures::detect();
    // Losing the race is fine: the winner published the same value.
    let _ = FEATURES.set(detected);
    detected
}

/// Largest power-of-two byte boundary `ptr` sits on.
#[inline]
pub fn alignment_of<T>(ptr: *const T) -> usize {
    let addr = ptr as usize;
    if addr == 0 {
        return 1 << (usize::BITS - 1);
    }
    1 << addr.trailing_zeros()
}

/// Whether `ptr` is aligned to `boundary` bytes. `boundary` must be a power of two.
#[inline]
pub fn is_aligned<T>(ptr: *const T, boundary: usize) -> bool {
    debug_assert!(boundary.is_power_of_two());
    (ptr as usize) & (boundary - 1) == 0
}
