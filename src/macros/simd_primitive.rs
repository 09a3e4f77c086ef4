/// Maps abstract integer SIMD operations to concrete hardware intrinsics.
///
/// # Architecture
/// This macro is "Layer 1". It provides, per `(isa, element)`:
/// - Architecture constants (`lanes`, `width` in bytes)
/// - Memory primitives (`load`/`store` require the natural alignment,
///   `loadu`/`storeu` do not)
/// - Compute primitives (`sub`, `cmpgt`, `select`, `bswap`)
///
/// `cmpgt` yields an all-ones/all-zeros lane mask. `select(m, a, b)` is the
/// masked blend `(m & a) | (!m & b)`, the lane-wise form of
/// `if m { a } else { b }`.
///
/// # Usage
/// ```ignore
/// simd_primitive!(sse2, i16, cmpgt, a, b) // -> _mm_cmpgt_epi16(a, b)
/// simd_primitive!(avx2, u32, bswap, v)    // -> _mm256_shuffle_epi8(v, BSWAP32)
/// ```
#[macro_export]
macro_rules! simd_primitive {
    // ========================================================================
    // SSE2 (x86_64, 128-bit)
    // ========================================================================

    (sse2, $elem:ident, width) => { 16 };

    // --- i16 ---
    (sse2, i16, lanes) => { 8 };
    (sse2, i16, zero) => { std::arch::x86_64::_mm_setzero_si128() };
    (sse2, i16, load, $p:expr) => { std::arch::x86_64::_mm_load_si128($p as *const std::arch::x86_64::__m128i) };
    (sse2, i16, loadu, $p:expr) => { std::arch::x86_64::_mm_loadu_si128($p as *const std::arch::x86_64::__m128i) };
    (sse2, i16, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm_store_si128($p as *mut std::arch::x86_64::__m128i, $v) };
    (sse2, i16, storeu, $p:expr, $v:expr) => { std::arch::x86_64::_mm_storeu_si128($p as *mut std::arch::x86_64::__m128i, $v) };
    (sse2, i16, sub, $a:expr, $b:expr) => { std::arch::x86_64::_mm_sub_epi16($a, $b) }; // wrapping
    (sse2, i16, cmpgt, $a:expr, $b:expr) => { std::arch::x86_64::_mm_cmpgt_epi16($a, $b) }; // signed
    (sse2, i16, select, $m:expr, $a:expr, $b:expr) => {
        {
            let m = $m;
            std::arch::x86_64::_mm_or_si128(
                std::arch::x86_64::_mm_and_si128(m, $a),
                std::arch::x86_64::_mm_andnot_si128(m, $b),
            )
        }
    };

    // --- u32 ---
    (sse2, u32, lanes) => { 4 };
    (sse2, u32, load, $p:expr) => { std::arch::x86_64::_mm_load_si128($p as *const std::arch::x86_64::__m128i) };
    (sse2, u32, loadu, $p:expr) => { std::arch::x86_64::_mm_loadu_si128($p as *const std::arch::x86_64::__m128i) };
    (sse2, u32, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm_store_si128($p as *mut std::arch::x86_64::__m128i, $v) };
    (sse2, u32, storeu, $p:expr, $v:expr) => { std::arch::x86_64::_mm_storeu_si128($p as *mut std::arch::x86_64::__m128i, $v) };
    // No byte shuffle before SSSE3: four shifts, two masks, three ORs.
    (sse2, u32, bswap, $v:expr) => {
        {
            let v = $v;
            let b0 = std::arch::x86_64::_mm_slli_epi32(v, 24);
            let b1 = std::arch::x86_64::_mm_and_si128(
                std::arch::x86_64::_mm_slli_epi32(v, 8),
                std::arch::x86_64::_mm_set1_epi32(0x00FF_0000),
            );
            let b2 = std::arch::x86_64::_mm_and_si128(
                std::arch::x86_64::_mm_srli_epi32(v, 8),
                std::arch::x86_64::_mm_set1_epi32(0x0000_FF00),
            );
            let b3 = std::arch::x86_64::_mm_srli_epi32(v, 24);
            std::arch::x86_64::_mm_or_si128(
                std::arch::x86_64::_mm_or_si128(b0, b3),
                std::arch::x86_64::_mm_or_si128(b1, b2),
            )
        }
    };

    // ========================================================================
    // AVX2 (x86_64, 256-bit)
    // ========================================================================

    (avx2, $elem:ident, width) => { 32 };

    // --- i16 ---
    (avx2, i16, lanes) => { 16 };
    (avx2, i16, zero) => { std::arch::x86_64::_mm256_setzero_si256() };
    (avx2, i16, load, $p:expr) => { std::arch::x86_64::_mm256_load_si256($p as *const std::arch::x86_64::__m256i) };
    (avx2, i16, loadu, $p:expr) => { std::arch::x86_64::_mm256_loadu_si256($p as *const std::arch::x86_64::__m256i) };
    (avx2, i16, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm256_store_si256($p as *mut std::arch::x86_64::__m256i, $v) };
    (avx2, i16, storeu, $p:expr, $v:expr) => { std::arch::x86_64::_mm256_storeu_si256($p as *mut std::arch::x86_64::__m256i, $v) };
    (avx2, i16, sub, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_sub_epi16($a, $b) };
    (avx2, i16, cmpgt, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_cmpgt_epi16($a, $b) };
    (avx2, i16, select, $m:expr, $a:expr, $b:expr) => {
        {
            let m = $m;
            std::arch::x86_64::_mm256_or_si256(
                std::arch::x86_64::_mm256_and_si256(m, $a),
                std::arch::x86_64::_mm256_andnot_si256(m, $b),
            )
        }
    };

    // --- u32 ---
    (avx2, u32, lanes) => { 8 };
    (avx2, u32, load, $p:expr) => { std::arch::x86_64::_mm256_load_si256($p as *const std::arch::x86_64::__m256i) };
    (avx2, u32, loadu, $p:expr) => { std::arch::x86_64::_mm256_loadu_si256($p as *const std::arch::x86_64::__m256i) };
    (avx2, u32, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm256_store_si256($p as *mut std::arch::x86_64::__m256i, $v) };
    (avx2, u32, storeu, $p:expr, $v:expr) => { std::arch::x86_64::_mm256_storeu_si256($p as *mut std::arch::x86_64::__m256i, $v) };
    // pshufb indexes within each 128-bit lane.
    (avx2, u32, bswap, $v:expr) => {
        std::arch::x86_64::_mm256_shuffle_epi8(
            $v,
            std::arch::x86_64::_mm256_setr_epi8(
                3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12,
                3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12,
            ),
        )
    };

    // ========================================================================
    // NEON (aarch64, 128-bit). All NEON loads/stores tolerate any alignment.
    // ========================================================================

    (neon, $elem:ident, width) => { 16 };

    // --- i16 ---
    (neon, i16, lanes) => { 8 };
    (neon, i16, zero) => { unsafe { std::arch::aarch64::vdupq_n_s16(0) } };
    (neon, i16, load, $p:expr) => { unsafe { std::arch::aarch64::vld1q_s16($p) } };
    (neon, i16, loadu, $p:expr) => { unsafe { std::arch::aarch64::vld1q_s16($p) } };
    (neon, i16, store, $p:expr, $v:expr) => { unsafe { std::arch::aarch64::vst1q_s16($p, $v) } };
    (neon, i16, storeu, $p:expr, $v:expr) => { unsafe { std::arch::aarch64::vst1q_s16($p, $v) } };
    (neon, i16, sub, $a:expr, $b:expr) => { unsafe { std::arch::aarch64::vsubq_s16($a, $b) } };
    (neon, i16, cmpgt, $a:expr, $b:expr) => { unsafe { std::arch::aarch64::vcgtq_s16($a, $b) } }; // uint16x8_t mask
    // BSL is the and/andnot/or blend in one instruction.
    (neon, i16, select, $m:expr, $a:expr, $b:expr) => { unsafe { std::arch::aarch64::vbslq_s16($m, $a, $b) } };

    // --- u32 ---
    (neon, u32, lanes) => { 4 };
    (neon, u32, load, $p:expr) => { unsafe { std::arch::aarch64::vld1q_u32($p) } };
    (neon, u32, loadu, $p:expr) => { unsafe { std::arch::aarch64::vld1q_u32($p) } };
    (neon, u32, store, $p:expr, $v:expr) => { unsafe { std::arch::aarch64::vst1q_u32($p, $v) } };
    (neon, u32, storeu, $p:expr, $v:expr) => { unsafe { std::arch::aarch64::vst1q_u32($p, $v) } };
    (neon, u32, bswap, $v:expr) => {
        unsafe {
            std::arch::aarch64::vreinterpretq_u32_u8(std::arch::aarch64::vrev32q_u8(
                std::arch::aarch64::vreinterpretq_u8_u32($v),
            ))
        }
    };

    // ========================================================================
    // NEON v8 (aarch64 TBL). Same registers as NEON, byte permute via table lookup.
    // ========================================================================

    (neonv8, $elem:ident, width) => { 16 };

    (neonv8, u32, lanes) => { 4 };
    (neonv8, u32, loadu, $p:expr) => { $crate::simd_primitive!(neon, u32, loadu, $p) };
    (neonv8, u32, storeu, $p:expr, $v:expr) => { $crate::simd_primitive!(neon, u32, storeu, $p, $v) };
    (neonv8, u32, bswap, $v:expr) => {
        unsafe {
            const IDX: [u8; 16] = [3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12];
            std::arch::aarch64::vreinterpretq_u32_u8(std::arch::aarch64::vqtbl1q_u8(
                std::arch::aarch64::vreinterpretq_u8_u32($v),
                std::arch::aarch64::vld1q_u8(IDX.as_ptr()),
            ))
        }
    };
}
