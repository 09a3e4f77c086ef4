//! Portable baselines. These are the reference every other variant is
//! checked against, and they run on any host.

/// # Safety
/// Every `src*` holds at least `target.len()` elements. Kept `unsafe` so it
/// shares the function-pointer type of the accelerated variants.
pub unsafe fn quad_max_star(target: &mut [i16], src0: &[i16], src1: &[i16], src2: &[i16], src3: &[i16]) {
    scalar_ops::quad_max_star_range(target, src0, src1, src2, src3);
}

/// # Safety
/// Always safe to call; `unsafe` only to match the accelerated variants.
pub unsafe fn byteswap(words: &mut [u32]) {
    scalar_ops::byteswap_words(words);
}
