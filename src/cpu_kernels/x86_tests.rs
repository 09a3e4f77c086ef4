//! Shared bit-exactness tests for the x86 variant modules.
//!
//! `define_x86_variant_tests!("avx2")` inside a module's `tests` stamps the
//! suite against that module's `quad_max_star_{a,u}` and `byteswap_{a,u}`.

pub(super) const EDGE: [i16; 5] = [i16::MIN, i16::MAX, 0, -1, 1];

pub(super) fn sources(n: usize) -> [Vec<i16>; 4] {
    std::array::from_fn(|k| {
        (0..n)
            .map(|i| {
                if i % 4 == k {
                    EDGE[(i + k) % EDGE.len()]
                } else {
                    (i as i16).wrapping_mul(12_343).wrapping_add(k as i16 * 997)
                }
            })
            .collect()
    })
}

pub(super) fn expected_quad(s: &[Vec<i16>; 4]) -> Vec<i16> {
    (0..s[0].len()).map(|i| scalar_ops::quad_max_star_i16(s[0][i], s[1][i], s[2][i], s[3][i])).collect()
}

macro_rules! define_x86_variant_tests {
    ($feature:tt) => {
        use super::*;
        use crate::cpu_kernels::x86_tests::{expected_quad, sources, EDGE};
        use crate::harness::{AlignedBuf, BOUNDARY_LENGTHS};

        fn supported() -> bool {
            if is_x86_feature_detected!($feature) {
                return true;
            }
            println!("Skipping {} test: {} not supported", $feature, $feature);
            false
        }

        #[test]
        fn test_quad_max_star_unaligned() {
            if !supported() {
                return;
            }
            for n in [0, 1, 15, 16, 17, 33, 100] {
                let s = sources(n);
                let bufs: Vec<AlignedBuf<i16>> = s.iter().map(|v| AlignedBuf::from_slice(v.as_slice(), 1)).collect();
                let mut t = AlignedBuf::<i16>::zeroed(n, 1);
                unsafe {
                    quad_max_star_u(t.as_mut_slice(), bufs[0].as_slice(), bufs[1].as_slice(), bufs[2].as_slice(), bufs[3].as_slice())
                };
                assert_eq!(t.as_slice(), &expected_quad(&s)[..], "n = {}", n);
            }
        }

        #[test]
        fn test_quad_max_star_aligned() {
            if !supported() {
                return;
            }
            for n in [8, 31, 64, 257] {
                let s = sources(n);
                let bufs: Vec<AlignedBuf<i16>> = s.iter().map(|v| AlignedBuf::from_slice(v.as_slice(), 0)).collect();
                let mut t = AlignedBuf::<i16>::zeroed(n, 0);
                unsafe {
                    quad_max_star_a(t.as_mut_slice(), bufs[0].as_slice(), bufs[1].as_slice(), bufs[2].as_slice(), bufs[3].as_slice())
                };
                assert_eq!(t.as_slice(), &expected_quad(&s)[..], "n = {}", n);
            }
        }

        #[test]
        fn test_quad_max_star_ties() {
            if !supported() {
                return;
            }
            let a = vec![i16::MIN; 40];
            let b = vec![1i16; 40];
            let mut t = vec![0i16; 40];
            unsafe { quad_max_star_u(&mut t, &a, &b, &b, &b) };
            assert_eq!(t, vec![i16::MIN; 40]);
        }

        #[test]
        fn test_quad_max_star_outer_wrap() {
            if !supported() {
                return;
            }
            // Inner pairs tie; the outer difference wraps both ways.
            let p = [i16::MIN, i16::MAX].repeat(20);
            let q = [1i16, -1].repeat(20);
            let mut t = vec![0i16; 40];
            unsafe { quad_max_star_u(&mut t, &p, &p, &q, &q) };
            assert_eq!(t, [i16::MIN, -1].repeat(20));
        }

        #[test]
        fn test_quad_max_star_min_difference_misaligned() {
            if !supported() {
                return;
            }
            // a - b == i16::MIN in every lane, with one source off the vector boundary.
            for &n in BOUNDARY_LENGTHS {
                let a: Vec<i16> = (0..n).map(|i| if i % 2 == 0 { i16::MIN } else { -1 }).collect();
                let b: Vec<i16> = (0..n).map(|i| if i % 2 == 0 { 0 } else { i16::MAX }).collect();
                let c: Vec<i16> = (0..n).map(|i| EDGE[i % EDGE.len()]).collect();
                let d: Vec<i16> = (0..n).map(|i| EDGE[(i + 2) % EDGE.len()]).collect();
                let a_buf = AlignedBuf::from_slice(&a, 0);
                let b_buf = AlignedBuf::from_slice(&b, 1);
                let mut t = AlignedBuf::<i16>::zeroed(n, 0);
                unsafe { quad_max_star_u(t.as_mut_slice(), a_buf.as_slice(), b_buf.as_slice(), &c, &d) };
                let s = [a, b, c, d];
                assert_eq!(t.as_slice(), &expected_quad(&s)[..], "n = {}", n);
            }
        }

        #[test]
        fn test_byteswap() {
            if !supported() {
                return;
            }
            for n in [0, 3, 4, 8, 9, 1027] {
                let data: Vec<u32> = (0..n as u32).map(|i| i.wrapping_mul(0x0101_0107) ^ 0xA5A5_0000).collect();
                let want: Vec<u32> = data.iter().map(|w| w.swap_bytes()).collect();

                let mut aligned = AlignedBuf::from_slice(&data, 0);
                unsafe { byteswap_a(aligned.as_mut_slice()) };
                assert_eq!(aligned.as_slice(), &want[..], "aligned n = {}", n);

                let mut shifted = AlignedBuf::from_slice(&data, 1);
                unsafe { byteswap_u(shifted.as_mut_slice()) };
                assert_eq!(shifted.as_slice(), &want[..], "unaligned n = {}", n);
            }
        }
    };
}
