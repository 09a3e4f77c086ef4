//! SSE2 variants (128-bit, x86_64 baseline).

crate::define_quad_max_star!(quad_max_star_a, sse2, "sse2", load, store);
crate::define_quad_max_star!(quad_max_star_u, sse2, "sse2", loadu, storeu);

crate::define_byteswap!(byteswap_a, sse2, "sse2", load, store);
crate::define_byteswap!(byteswap_u, sse2, "sse2", loadu, storeu);
