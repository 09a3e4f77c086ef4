//! Difference-sign selection on 16-bit signed lanes.
//!
//! The subtraction wraps at the i16 boundary before the sign test. Near
//! `i16::MIN`/`i16::MAX` this can pick the smaller operand; SIMD variants
//! reproduce that bit for bit, so it must not be replaced by a widened compare.

/// `a` if `(a - b) as i16 > 0`, else `b`. Exact ties resolve to `b`.
#[inline(always)]
pub fn max_star_i16(a: i16, b: i16) -> i16 {
    if a.wrapping_sub(b) > 0 {
        a
    } else {
        b
    }
}

/// `max_star(max_star(a, b), max_star(c, d))`
#[inline(always)]
pub fn quad_max_star_i16(a: i16, b: i16, c: i16, d: i16) -> i16 {
    max_star_i16(max_star_i16(a, b), max_star_i16(c, d))
}

/// Applies [`quad_max_star_i16`] to every index of `target`.
///
/// Sources must be at least `target.len()` long; extra elements are ignored.
#[inline]
pub fn quad_max_star_range(target: &mut [i16], src0: &[i16], src1: &[i16], src2: &[i16], src3: &[i16]) {
    let n = target.len();
    let (src0, src1, src2, src3) = (&src0[..n], &src1[..n], &src2[..n], &src3[..n]);
    for i in 0..n {
        target[i] = quad_max_star_i16(src0[i], src1[i], src2[i], src3[i]);
    }
}

/// Raw-pointer form of [`quad_max_star_range`] for FFI callers.
///
/// # Safety
/// `target` must be valid for `n` writes and every `src*` for `n` reads.
#[no_mangle]
#[inline(never)]
pub unsafe extern "C" fn scalar_quad_max_star_16i(
    target: *mut i16,
    src0: *const i16,
    src1: *const i16,
    src2: *const i16,
    src3: *const i16,
    n: usize,
) {
    for i in 0..n {
        *target.add(i) = quad_max_star_i16(*src0.add(i), *src1.add(i), *src2.add(i), *src3.add(i));
    }
}
