//! NEON variants (aarch64). NEON loads and stores accept any address, so
//! every variant here is in the unaligned class.

crate::define_quad_max_star!(quad_max_star, neon, "neon", loadu, storeu);

crate::define_byteswap!(byteswap, neon, "neon", loadu, storeu);
// Same registers, byte permute through a TBL lookup instead of REV32.
crate::define_byteswap!(byteswap_v8, neonv8, "neon", loadu, storeu);
