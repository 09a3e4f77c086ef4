//! Byte reordering.

/// Full byte reversal of a 32-bit word:
/// `((w >> 24) & 0xff) | ((w >> 8) & 0xff00) | ((w << 8) & 0xff0000) | ((w << 24) & 0xff000000)`
#[inline(always)]
pub fn byteswap_u32(w: u32) -> u32 {
    ((w >> 24) & 0x0000_00ff) | ((w >> 8) & 0x0000_ff00) | ((w << 8) & 0x00ff_0000) | ((w << 24) & 0xff00_0000)
}

/// In-place [`byteswap_u32`] over every word.
#[inline]
pub fn byteswap_words(words: &mut [u32]) {
    for w in words.iter_mut() {
        *w = byteswap_u32(*w);
    }
}

/// Raw-pointer form of [`byteswap_words`] for FFI callers.
///
/// # Safety
/// `words` must be valid for `n` reads and writes.
#[no_mangle]
#[inline(never)]
pub unsafe extern "C" fn scalar_byteswap_32u(words: *mut u32, n: usize) {
    for i in 0..n {
        *words.add(i) = byteswap_u32(*words.add(i));
    }
}
