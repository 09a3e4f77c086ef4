//! In-place byte reversal of 32-bit words: `0xAABBCCDD -> 0xDDCCBBAA`.
//! Applying it twice restores the input.

use crate::cpu_kernels::scalar;
#[cfg(target_arch = "x86_64")]
use crate::cpu_kernels::{avx2, sse2};
#[cfg(target_arch = "aarch64")]
use crate::cpu_kernels::neon;
use crate::harness::Contract;
use crate::kernel_dispatcher;
use crate::kernel_types::{Alignment, ElementType, Operation, Variant};
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use crate::runtime_detection::CpuFeatures;

pub type ByteswapFn = unsafe fn(&mut [u32]);

#[cfg(target_arch = "x86_64")]
const ACCELERATED: &[Variant<ByteswapFn>] = &[
    Variant::new("a_sse2", CpuFeatures::SSE2, Alignment::Aligned, 16, 10, sse2::byteswap_a as ByteswapFn),
    Variant::new("u_sse2", CpuFeatures::SSE2, Alignment::Unaligned, 16, 10, sse2::byteswap_u as ByteswapFn),
    Variant::new("a_avx2", CpuFeatures::AVX2, Alignment::Aligned, 32, 20, avx2::byteswap_a as ByteswapFn),
    Variant::new("u_avx2", CpuFeatures::AVX2, Alignment::Unaligned, 32, 20, avx2::byteswap_u as ByteswapFn),
];

#[cfg(target_arch = "aarch64")]
const ACCELERATED: &[Variant<ByteswapFn>] = &[
    Variant::new("neon", CpuFeatures::NEON, Alignment::Unaligned, 16, 10, neon::byteswap as ByteswapFn),
    Variant::new("neonv8", CpuFeatures::NEON_V8, Alignment::Unaligned, 16, 12, neon::byteswap_v8 as ByteswapFn),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const ACCELERATED: &[Variant<ByteswapFn>] = &[];

pub static BYTESWAP: Operation<ByteswapFn> = Operation::new(
    "byteswap_u32",
    ElementType::U32,
    1,
    true,
    false,
    Variant::generic(ElementType::U32, scalar::byteswap as ByteswapFn),
    ACCELERATED,
);

/// Dispatched byteswap. Any alignment; picks an aligned variant when `words`
/// happens to sit on the dispatch boundary.
pub fn byteswap(words: &mut [u32]) {
    let class = Alignment::classify(&[words.as_ptr().cast()], kernel_dispatcher::alignment());
    let kernel = kernel_dispatcher::resolve(&BYTESWAP, class);
    // SAFETY: resolve only hands out variants the host supports, and aligned
    // variants only for an aligned pointer.
    unsafe { kernel(words) }
}

/// Byteswap that never takes an aligned variant.
pub fn byteswap_unaligned(words: &mut [u32]) {
    let kernel = kernel_dispatcher::resolve(&BYTESWAP, Alignment::Unaligned);
    // SAFETY: host-supported unaligned variant.
    unsafe { kernel(words) }
}

/// # Safety
/// `words` must start on a multiple of [`kernel_dispatcher::alignment`] bytes.
pub unsafe fn byteswap_aligned(words: &mut [u32]) {
    debug_assert!(crate::runtime_detection::is_aligned(words.as_ptr(), kernel_dispatcher::alignment()));
    let kernel = kernel_dispatcher::resolve(&BYTESWAP, Alignment::Aligned);
    kernel(words)
}

/// Harness binding for [`BYTESWAP`].
pub struct Byteswap;

impl Contract for Byteswap {
    type Elem = u32;
    type Kernel = ByteswapFn;
    const INPUTS: usize = 0;

    fn operation() -> &'static Operation<ByteswapFn> {
        &BYTESWAP
    }

    unsafe fn invoke(kernel: ByteswapFn, target: &mut [u32], _inputs: &[&[u32]]) {
        kernel(target)
    }

    fn edge_values() -> &'static [u32] {
        &[0, u32::MAX, 0x5A5A_5A5A, 1, 0x0102_0304]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::AlignedBuf;

    #[test]
    fn test_byteswap_example() {
        let mut w = [0x0000_0001u32, 0xFFFF_FFFF, 0x5A5A_5A5A];
        byteswap(&mut w);
        assert_eq!(w, [0x0100_0000, 0xFFFF_FFFF, 0x5A5A_5A5A]);
    }

    #[test]
    fn test_byteswap_twice_is_identity() {
        let original: Vec<u32> = (0..1031u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        let mut w = original.clone();
        byteswap(&mut w);
        assert_ne!(w, original);
        byteswap_unaligned(&mut w);
        assert_eq!(w, original);
    }

    #[test]
    fn test_byteswap_aligned_entry() {
        let data: Vec<u32> = (0..77).collect();
        let mut buf = AlignedBuf::from_slice(&data, 0);
        unsafe { byteswap_aligned(buf.as_mut_slice()) };
        let expected: Vec<u32> = data.iter().map(|w| w.swap_bytes()).collect();
        assert_eq!(buf.as_slice(), &expected[..]);
    }

    #[test]
    fn test_byteswap_misaligned_start() {
        let data: Vec<u32> = (0..65).map(|i| 0x0102_0304u32.wrapping_add(i)).collect();
        let mut buf = AlignedBuf::from_slice(&data, 1);
        byteswap(buf.as_mut_slice());
        for (got, want) in buf.as_slice().iter().zip(&data) {
            assert_eq!(*got, want.swap_bytes());
        }
    }

    #[test]
    fn test_registry_shape() {
        assert!(BYTESWAP.in_place);
        assert!(!BYTESWAP.deprecated);
        assert_eq!(BYTESWAP.generic.desc.width, 4);
    }
}
