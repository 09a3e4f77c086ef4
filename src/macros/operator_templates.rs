//! Layer 2: operator bodies parameterized by ISA.
//!
//! Every accelerated variant of an operation is stamped out of the same
//! template, so the vectorized sweep is structurally identical across ISAs
//! and the `len % LANES` remainder always goes to the shared scalar formula
//! in `scalar_ops`.
//!
//! `$load`/`$store` pick the alignment class: `load`/`store` for aligned
//! variants, `loadu`/`storeu` for unaligned ones.

/// Quad max-star over i16 lanes:
/// `t = ms(ms(a, b), ms(c, d))` where `ms(x, y) = if x - y > 0 { x } else { y }`.
///
/// Lane-wise: `m = cmpgt(x - y, 0)`, `ms = (m & x) | (!m & y)`. A zero
/// difference leaves the mask clear, so ties take the second operand exactly
/// like the scalar `> 0`.
#[macro_export]
macro_rules! define_quad_max_star {
    ($name:ident, $isa:ident, $feature:literal, $load:ident, $store:ident) => {
        /// # Safety
        /// Every `src*` holds at least `target.len()` elements, the host
        /// supports the enabled target feature, and for aligned variants every
        /// pointer sits on the ISA's vector width.
        #[target_feature(enable = $feature)]
        pub unsafe fn $name(target: &mut [i16], src0: &[i16], src1: &[i16], src2: &[i16], src3: &[i16]) {
            const LANES: usize = $crate::simd_primitive!($isa, i16, lanes);
            let len = target.len();
            let body = len - len % LANES;
            let t = target.as_mut_ptr();
            let (a, b, c, d) = (src0.as_ptr(), src1.as_ptr(), src2.as_ptr(), src3.as_ptr());

            #[allow(unused_unsafe)]
            unsafe {
                let zero = $crate::simd_primitive!($isa, i16, zero);
                let mut i = 0;
                while i < body {
                    let va = $crate::simd_primitive!($isa, i16, $load, a.add(i));
                    let vb = $crate::simd_primitive!($isa, i16, $load, b.add(i));
                    let vc = $crate::simd_primitive!($isa, i16, $load, c.add(i));
                    let vd = $crate::simd_primitive!($isa, i16, $load, d.add(i));

                    let m_ab = $crate::simd_primitive!($isa, i16, cmpgt, $crate::simd_primitive!($isa, i16, sub, va, vb), zero);
                    let m_cd = $crate::simd_primitive!($isa, i16, cmpgt, $crate::simd_primitive!($isa, i16, sub, vc, vd), zero);
                    let p = $crate::simd_primitive!($isa, i16, select, m_ab, va, vb);
                    let q = $crate::simd_primitive!($isa, i16, select, m_cd, vc, vd);

                    let m_pq = $crate::simd_primitive!($isa, i16, cmpgt, $crate::simd_primitive!($isa, i16, sub, p, q), zero);
                    let r = $crate::simd_primitive!($isa, i16, select, m_pq, p, q);
                    $crate::simd_primitive!($isa, i16, $store, t.add(i), r);
                    i += LANES;
                }
            }

            scalar_ops::quad_max_star_range(
                &mut target[body..],
                &src0[body..],
                &src1[body..],
                &src2[body..],
                &src3[body..],
            );
        }
    };
}

/// In-place 32-bit byte reversal. Each word is read once and then
/// overwritten, so aliasing input and output is safe.
#[macro_export]
macro_rules! define_byteswap {
    ($name:ident, $isa:ident, $feature:literal, $load:ident, $store:ident) => {
        /// # Safety
        /// The host supports the enabled target feature, and for aligned
        /// variants `words` starts on the ISA's vector width.
        #[target_feature(enable = $feature)]
        pub unsafe fn $name(words: &mut [u32]) {
            const LANES: usize = $crate::simd_primitive!($isa, u32, lanes);
            let len = words.len();
            let body = len - len % LANES;
            let p = words.as_mut_ptr();

            #[allow(unused_unsafe)]
            unsafe {
                let mut i = 0;
                while i < body {
                    let v = $crate::simd_primitive!($isa, u32, $load, p.add(i));
                    let swapped = $crate::simd_primitive!($isa, u32, bswap, v);
                    $crate::simd_primitive!($isa, u32, $store, p.add(i), swapped);
                    i += LANES;
                }
            }

            scalar_ops::byteswap_words(&mut words[body..]);
        }
    };
}
