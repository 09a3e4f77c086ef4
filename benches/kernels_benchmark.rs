use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsp_kernels::{cpu_features, AlignedBuf, BYTESWAP, QUAD_MAX_STAR};
use rand::Rng;

const SIZES: [usize; 3] = [64, 4096, 1 << 16];

fn rand_buf<T: bytemuck::Pod>(n: usize, offset: usize) -> AlignedBuf<T> {
    let mut buf = AlignedBuf::zeroed(n, offset);
    rand::thread_rng().fill(bytemuck::cast_slice_mut::<T, u8>(buf.as_mut_slice()));
    buf
}

// ============================================================
// Quad max-star: every variant the host can run
// ============================================================
fn bench_quad_max_star(c: &mut Criterion) {
    let features = cpu_features();
    let mut group = c.benchmark_group("quad_max_star_i16");

    for &n in &SIZES {
        group.throughput(Throughput::Elements(n as u64));
        for variant in QUAD_MAX_STAR.variants().filter(|v| features.contains(v.desc.requires)) {
            let srcs: Vec<AlignedBuf<i16>> = (0..4).map(|_| rand_buf(n, 0)).collect();
            let mut target = AlignedBuf::<i16>::zeroed(n, 0);
            let kernel = variant.kernel;
            group.bench_function(BenchmarkId::new(variant.desc.name, n), |bench| {
                bench.iter(|| unsafe {
                    kernel(
                        black_box(target.as_mut_slice()),
                        black_box(srcs[0].as_slice()),
                        black_box(srcs[1].as_slice()),
                        black_box(srcs[2].as_slice()),
                        black_box(srcs[3].as_slice()),
                    )
                })
            });
        }
    }
    group.finish();
}

// ============================================================
// Byteswap: every variant the host can run
// ============================================================
fn bench_byteswap(c: &mut Criterion) {
    let features = cpu_features();
    let mut group = c.benchmark_group("byteswap_u32");

    for &n in &SIZES {
        group.throughput(Throughput::Bytes((n * 4) as u64));
        for variant in BYTESWAP.variants().filter(|v| features.contains(v.desc.requires)) {
            let mut words = rand_buf::<u32>(n, 0);
            let kernel = variant.kernel;
            group.bench_function(BenchmarkId::new(variant.desc.name, n), |bench| {
                bench.iter(|| unsafe { kernel(black_box(words.as_mut_slice())) })
            });
        }
    }
    group.finish();
}

// ============================================================
// Dispatched entry points, aligned vs misaligned buffers
// ============================================================
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let n = 4096;
    for offset in [0usize, 1] {
        let mut words = rand_buf::<u32>(n, offset);
        group.bench_function(BenchmarkId::new("byteswap", offset), |bench| {
            bench.iter(|| dsp_kernels::byteswap(black_box(words.as_mut_slice())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_quad_max_star, bench_byteswap, bench_dispatch);
criterion_main!(benches);
