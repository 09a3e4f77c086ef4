//! Equivalence harness: every accelerated variant must reproduce the
//! `generic` baseline bit for bit.
//!
//! For each variant the host can run, and each requested length, the harness
//! builds pseudo-random inputs (seeded, so failures replay), runs the baseline
//! and the variant on separate buffers, and compares every output element.
//! Aligned variants run on 64-byte aligned buffers; unaligned variants run
//! both on aligned buffers and at a one-element offset.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{KernelError, KernelResult};
use crate::kernel_types::{Alignment, Operation};
use crate::runtime_detection::{cpu_features, CpuFeatures};

/// Lengths around every vector width in the catalog, plus page-sized runs.
pub const BOUNDARY_LENGTHS: &[usize] = &[0, 1, 7, 8, 9, 15, 16, 17, 31, 32, 33, 4095, 4096, 4097];

/// Storage quantum for [`AlignedBuf`]; its alignment covers every vector width.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
struct Line([u8; 64]);

// SAFETY: a plain byte array with no padding; every bit pattern is valid.
unsafe impl Zeroable for Line {}
unsafe impl Pod for Line {}

/// A buffer of `T` whose first element sits `offset` elements past a 64-byte
/// boundary.
pub struct AlignedBuf<T: Pod> {
    lines: Vec<Line>,
    offset: usize,
    len: usize,
    _elem: PhantomData<T>,
}

impl<T: Pod> AlignedBuf<T> {
    pub fn zeroed(len: usize, offset: usize) -> Self {
        let bytes = (offset + len) * size_of::<T>();
        let lines = vec![Line([0; 64]); bytes.div_ceil(64)];
        AlignedBuf { lines, offset, len, _elem: PhantomData }
    }

    pub fn from_slice(data: &[T], offset: usize) -> Self {
        let mut buf = Self::zeroed(data.len(), offset);
        buf.as_mut_slice().copy_from_slice(data);
        buf
    }

    fn byte_range(&self) -> std::ops::Range<usize> {
        let size = size_of::<T>();
        self.offset * size..(self.offset + self.len) * size
    }

    pub fn as_slice(&self) -> &[T] {
        let range = self.byte_range();
        let bytes: &[u8] = bytemuck::cast_slice(&self.lines);
        bytemuck::cast_slice(&bytes[range])
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let range = self.byte_range();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.lines);
        bytemuck::cast_slice_mut(&mut bytes[range])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Binds an [`Operation`] to the harness: how to call one of its kernels on
/// plain slices, and which values stress its edge cases.
pub trait Contract {
    type Elem: Pod + PartialEq + fmt::Debug;
    type Kernel: Copy + Sync + 'static;

    /// Input buffers besides the target. In-place operations read the target
    /// itself and declare none.
    const INPUTS: usize;

    fn operation() -> &'static Operation<Self::Kernel>;

    /// # Safety
    /// `kernel` must be runnable on this host, and if it is an aligned
    /// variant every buffer must sit on its width. Each input holds at least
    /// `target.len()` elements.
    unsafe fn invoke(kernel: Self::Kernel, target: &mut [Self::Elem], inputs: &[&[Self::Elem]]);

    /// Values injected at fixed strides on top of the random fill.
    fn edge_values() -> &'static [Self::Elem];
}

/// Outcome of [`check`] for one operation.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceReport {
    pub operation: &'static str,
    /// Variants that ran and matched.
    pub verified: Vec<&'static str>,
    /// Variants the feature set could not run.
    pub skipped: Vec<&'static str>,
    /// Number of (variant, length, offset) cases compared.
    pub cases: usize,
}

struct Case<E: Pod> {
    target: Vec<E>,
    inputs: Vec<Vec<E>>,
}

fn random_case<C: Contract>(rng: &mut StdRng, len: usize) -> Case<C::Elem> {
    let fill = |rng: &mut StdRng| {
        let mut v = vec![C::Elem::zeroed(); len];
        rng.fill_bytes(bytemuck::cast_slice_mut(&mut v));
        v
    };
    let mut target = fill(rng);
    let mut inputs: Vec<Vec<C::Elem>> = (0..C::INPUTS).map(|_| fill(rng)).collect();

    let edges = C::edge_values();
    if !edges.is_empty() {
        let stride_targets: Vec<&mut Vec<C::Elem>> = if inputs.is_empty() {
            vec![&mut target]
        } else {
            inputs.iter_mut().collect()
        };
        for buf in stride_targets {
            for i in (0..len).step_by(3) {
                buf[i] = edges[rng.gen_range(0..edges.len())];
            }
        }
    }

    // Equal operands exercise the tie rule.
    if inputs.len() >= 2 {
        let (first, rest) = inputs.split_at_mut(1);
        for i in (0..len).step_by(5) {
            rest[0][i] = first[0][i];
        }
    }

    Case { target, inputs }
}

/// Run one kernel on copies of `case` placed `offset` elements off a 64-byte boundary.
fn run_case<C: Contract>(kernel: C::Kernel, case: &Case<C::Elem>, offset: usize) -> Vec<C::Elem> {
    let mut target = AlignedBuf::from_slice(&case.target, offset);
    let inputs: Vec<AlignedBuf<C::Elem>> = case.inputs.iter().map(|v| AlignedBuf::from_slice(v, offset)).collect();
    let views: Vec<&[C::Elem]> = inputs.iter().map(|b| b.as_slice()).collect();
    // SAFETY: callers only pass kernels the host supports, and aligned
    // variants only with offset 0.
    unsafe { C::invoke(kernel, target.as_mut_slice(), &views) };
    target.as_slice().to_vec()
}

/// Compare every accelerated variant of `C`'s operation runnable under
/// `features` against the baseline, for each of `lengths`.
///
/// `features` is narrowed to what the host actually supports, so asking for
/// more than the hardware has skips variants instead of faulting. Returns the
/// first divergence as [`KernelError::Mismatch`].
pub fn check<C: Contract>(features: CpuFeatures, lengths: &[usize], seed: u64) -> KernelResult<EquivalenceReport> {
    let op = C::operation();
    let runnable = features & cpu_features();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = EquivalenceReport { operation: op.name, ..Default::default() };

    for variant in op.accelerated {
        let desc = &variant.desc;
        if !runnable.contains(desc.requires) {
            log::debug!("{}/{}: skipped, needs {}", op.name, desc.name, desc.requires);
            report.skipped.push(desc.name);
            continue;
        }
        let offsets: &[usize] = match desc.alignment {
            Alignment::Aligned => &[0],
            Alignment::Unaligned => &[0, 1],
        };

        for &len in lengths {
            let case = random_case::<C>(&mut rng, len);
            let expected = run_case::<C>(op.generic.kernel, &case, 0);
            for &offset in offsets {
                let actual = run_case::<C>(variant.kernel, &case, offset);
                if let Some(index) = expected.iter().zip(&actual).position(|(e, a)| e != a) {
                    return Err(KernelError::Mismatch {
                        op: op.name,
                        variant: desc.name,
                        reference: op.generic.desc.name,
                        len,
                        index,
                        expected: format!("{:?}", expected[index]),
                        actual: format!("{:?}", actual[index]),
                    });
                }
                report.cases += 1;
            }
        }
        log::debug!("{}/{}: {} lengths match baseline", op.name, desc.name, lengths.len());
        report.verified.push(desc.name);
    }

    Ok(report)
}

/// [`check`] over every registered operation.
pub fn check_all(features: CpuFeatures, lengths: &[usize], seed: u64) -> KernelResult<Vec<EquivalenceReport>> {
    Ok(vec![
        check::<crate::ops::quad_max_star::QuadMaxStar>(features, lengths, seed)?,
        check::<crate::ops::byteswap::Byteswap>(features, lengths, seed)?,
    ])
}
