//! Quad max-star over 16-bit signed lanes.
//!
//! ```text
//! ms(x, y) = if x.wrapping_sub(y) > 0 { x } else { y }
//! target[i] = ms(ms(src0[i], src1[i]), ms(src2[i], src3[i]))
//! ```
//!
//! The comparison is on the wrapped difference, not `x > y`, so operands more
//! than `i16::MAX` apart pick the "wrong" one. Every variant reproduces that.
//! Ties take the second operand.
//!
//! Kept for existing callers; new code should not depend on it.

use crate::cpu_kernels::scalar;
#[cfg(target_arch = "x86_64")]
use crate::cpu_kernels::{avx2, sse2};
use crate::harness::Contract;
use crate::kernel_dispatcher;
use crate::kernel_types::{Alignment, ElementType, Operation, Variant};
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use crate::runtime_detection::CpuFeatures;

pub type QuadMaxStarFn = unsafe fn(&mut [i16], &[i16], &[i16], &[i16], &[i16]);

#[cfg(target_arch = "x86_64")]
const ACCELERATED: &[Variant<QuadMaxStarFn>] = &[
    Variant::new("a_sse2", CpuFeatures::SSE2, Alignment::Aligned, 16, 10, sse2::quad_max_star_a as QuadMaxStarFn),
    Variant::new("u_sse2", CpuFeatures::SSE2, Alignment::Unaligned, 16, 10, sse2::quad_max_star_u as QuadMaxStarFn),
    Variant::new("a_avx2", CpuFeatures::AVX2, Alignment::Aligned, 32, 20, avx2::quad_max_star_a as QuadMaxStarFn),
    Variant::new("u_avx2", CpuFeatures::AVX2, Alignment::Unaligned, 32, 20, avx2::quad_max_star_u as QuadMaxStarFn),
];

#[cfg(target_arch = "aarch64")]
const ACCELERATED: &[Variant<QuadMaxStarFn>] = &[Variant::new(
    "neon",
    CpuFeatures::NEON,
    Alignment::Unaligned,
    16,
    10,
    crate::cpu_kernels::neon::quad_max_star as QuadMaxStarFn,
)];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const ACCELERATED: &[Variant<QuadMaxStarFn>] = &[];

pub static QUAD_MAX_STAR: Operation<QuadMaxStarFn> = Operation::new(
    "quad_max_star_i16",
    ElementType::I16,
    4,
    false,
    true,
    Variant::generic(ElementType::I16, scalar::quad_max_star as QuadMaxStarFn),
    ACCELERATED,
);

pub(crate) fn check_lengths(target: &[i16], sources: [&[i16]; 4]) {
    assert!(
        sources.iter().all(|s| s.len() == target.len()),
        "quad_max_star: source lengths {:?} differ from target length {}",
        sources.map(<[i16]>::len),
        target.len()
    );
}

/// Dispatched quad max-star. Any alignment.
///
/// # Panics
/// If any source length differs from `target.len()`.
pub fn quad_max_star(target: &mut [i16], src0: &[i16], src1: &[i16], src2: &[i16], src3: &[i16]) {
    check_lengths(target, [src0, src1, src2, src3]);
    let class = Alignment::classify(
        &[
            target.as_ptr().cast(),
            src0.as_ptr().cast(),
            src1.as_ptr().cast(),
            src2.as_ptr().cast(),
            src3.as_ptr().cast(),
        ],
        kernel_dispatcher::alignment(),
    );
    let kernel = kernel_dispatcher::resolve(&QUAD_MAX_STAR, class);
    // SAFETY: resolve only hands out variants the host supports, and aligned
    // variants only when every pointer was classified aligned.
    unsafe { kernel(target, src0, src1, src2, src3) }
}

/// Quad max-star for call sites that guarantee alignment.
///
/// # Safety
/// Every buffer must start on a multiple of [`kernel_dispatcher::alignment`]
/// bytes.
///
/// # Panics
/// If any source length differs from `target.len()`.
pub unsafe fn quad_max_star_aligned(target: &mut [i16], src0: &[i16], src1: &[i16], src2: &[i16], src3: &[i16]) {
    check_lengths(target, [src0, src1, src2, src3]);
    debug_assert_eq!(
        Alignment::classify(
            &[target.as_ptr().cast(), src0.as_ptr().cast(), src1.as_ptr().cast(), src2.as_ptr().cast(), src3.as_ptr().cast()],
            kernel_dispatcher::alignment(),
        ),
        Alignment::Aligned
    );
    let kernel = kernel_dispatcher::resolve(&QUAD_MAX_STAR, Alignment::Aligned);
    kernel(target, src0, src1, src2, src3)
}

/// Harness binding for [`QUAD_MAX_STAR`].
pub struct QuadMaxStar;

impl Contract for QuadMaxStar {
    type Elem = i16;
    type Kernel = QuadMaxStarFn;
    const INPUTS: usize = 4;

    fn operation() -> &'static Operation<QuadMaxStarFn> {
        &QUAD_MAX_STAR
    }

    unsafe fn invoke(kernel: QuadMaxStarFn, target: &mut [i16], inputs: &[&[i16]]) {
        kernel(target, inputs[0], inputs[1], inputs[2], inputs[3])
    }

    fn edge_values() -> &'static [i16] {
        &[i16::MIN, i16::MAX, 0, -1, 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_max_star_example() {
        let mut t = [0i16; 1];
        quad_max_star(&mut t, &[5], &[3], &[2], &[9]);
        assert_eq!(t, [9]);
    }

    #[test]
    fn test_quad_max_star_ties_and_wrap() {
        let n = 37;
        let a = vec![7i16; n];
        let mut t = vec![0i16; n];
        quad_max_star(&mut t, &a, &a, &a, &a);
        assert_eq!(t, a);

        // (MIN, 1): the wrapped difference is MAX > 0, so MIN wins.
        let min = vec![i16::MIN; n];
        let one = vec![1i16; n];
        quad_max_star(&mut t, &min, &one, &min, &one);
        assert_eq!(t, vec![i16::MIN; n]);
    }

    #[test]
    fn test_quad_max_star_matches_formula() {
        let n = 100;
        let s: Vec<Vec<i16>> = (0..4)
            .map(|k| (0..n).map(|i| ((i * 7919 + k * 104729) as i32 % 65536 - 32768) as i16).collect())
            .collect();
        let mut t = vec![0i16; n];
        quad_max_star(&mut t, &s[0], &s[1], &s[2], &s[3]);
        for i in 0..n {
            assert_eq!(t[i], scalar_ops::quad_max_star_i16(s[0][i], s[1][i], s[2][i], s[3][i]), "index {}", i);
        }
    }

    #[test]
    fn test_quad_max_star_empty() {
        let mut t: [i16; 0] = [];
        quad_max_star(&mut t, &[], &[], &[], &[]);
    }

    #[test]
    #[should_panic(expected = "quad_max_star")]
    fn test_quad_max_star_length_mismatch() {
        let mut t = [0i16; 4];
        quad_max_star(&mut t, &[1; 4], &[1; 4], &[1; 3], &[1; 4]);
    }

    #[test]
    fn test_registry_shape() {
        assert!(QUAD_MAX_STAR.deprecated);
        assert_eq!(QUAD_MAX_STAR.inputs, 4);
        assert_eq!(QUAD_MAX_STAR.variant_at(0).desc.name, "generic");
    }
}
