//! AVX2 variants (256-bit).

crate::define_quad_max_star!(quad_max_star_a, avx2, "avx2", load, store);
crate::define_quad_max_star!(quad_max_star_u, avx2, "avx2", loadu, storeu);

crate::define_byteswap!(byteswap_a, avx2, "avx2", load, store);
crate::define_byteswap!(byteswap_u, avx2, "avx2", loadu, storeu);
