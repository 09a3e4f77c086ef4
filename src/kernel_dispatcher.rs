//! Runtime kernel selection.
//!
//! Given an operation's variant table, a capability set, and the alignment
//! class of the call site, pick the fastest legal variant:
//!
//! 1. Legal means every required capability is present and the call site
//!    admits the variant's alignment class (unaligned call sites never get an
//!    aligned variant).
//! 2. Highest `rank` wins.
//! 3. Ties go to the earliest tier in [`FEATURE_PREFERENCE`], then to the
//!    aligned variant, then to the lexicographically smaller name.
//!
//! The baseline is always legal, so selection cannot fail. The process-wide
//! dispatcher caches each (operation, alignment class) choice.

use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::config::KernelConfig;
use crate::kernel_types::{Alignment, Operation, OperationInfo, VariantDesc};
use crate::ops::quad_max_star::check_lengths;
use crate::ops::{self, ByteswapFn, QuadMaxStarFn, BYTESWAP, QUAD_MAX_STAR};
use crate::runtime_detection::{cpu_features, CpuFeatures};

/// Static tie-break order among equal ranks, widest first. The baseline
/// (no capability) ranks after every entry here.
pub const FEATURE_PREFERENCE: [CpuFeatures; 7] = [
    CpuFeatures::AVX512F,
    CpuFeatures::AVX2,
    CpuFeatures::SSE2,
    CpuFeatures::NEON_V8,
    CpuFeatures::NEON,
    CpuFeatures::RVV_ZVBB,
    CpuFeatures::RVV,
];

/// Position of the most preferred capability `requires` names; baseline last.
pub fn preference_tier(requires: CpuFeatures) -> usize {
    FEATURE_PREFERENCE
        .iter()
        .position(|&f| requires.contains(f))
        .unwrap_or(FEATURE_PREFERENCE.len())
}

#[inline]
pub fn is_legal(desc: &VariantDesc, features: CpuFeatures, alignment: Alignment) -> bool {
    features.contains(desc.requires) && alignment.admits(desc.alignment)
}

/// Total order over variants, best first.
pub fn compare_variants(a: &VariantDesc, b: &VariantDesc) -> Ordering {
    b.rank
        .cmp(&a.rank)
        .then_with(|| preference_tier(a.requires).cmp(&preference_tier(b.requires)))
        .then_with(|| (a.alignment != Alignment::Aligned).cmp(&(b.alignment != Alignment::Aligned)))
        .then_with(|| a.name.cmp(b.name))
}

/// Index of the best legal descriptor, or 0 (the baseline) if none is.
pub fn best_index(descs: &[VariantDesc], features: CpuFeatures, alignment: Alignment) -> usize {
    descs
        .iter()
        .enumerate()
        .filter(|(_, d)| is_legal(d, features, alignment))
        .min_by(|(_, a), (_, b)| compare_variants(a, b))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Pure selection over a typed operation; no cache, no config.
pub fn select<F: Copy + 'static>(op: &Operation<F>, features: CpuFeatures, alignment: Alignment) -> &VariantDesc {
    let descs: Vec<VariantDesc> = op.variants().map(|v| v.desc).collect();
    &op.variant_at(best_index(&descs, features, alignment)).desc
}

/// Pure selection over any registered operation.
pub fn select_info(op: &dyn OperationInfo, features: CpuFeatures, alignment: Alignment) -> VariantDesc {
    let descs = op.descriptors();
    descs[best_index(&descs, features, alignment)]
}

/// One row of [`KernelDispatcher::selection_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub operation: &'static str,
    pub aligned: &'static str,
    pub unaligned: &'static str,
}

/// A capability set plus configuration, resolving operations to variants.
#[derive(Debug, Clone)]
pub struct KernelDispatcher {
    features: CpuFeatures,
    config: KernelConfig,
    alignment: usize,
}

impl KernelDispatcher {
    /// Detected capabilities and the environment's configuration.
    pub fn new() -> Self {
        Self::with_config(KernelConfig::from_env())
    }

    pub fn with_config(config: KernelConfig) -> Self {
        let features = config.effective_features(cpu_features());
        let alignment = boundary_for(features);
        KernelDispatcher { features, config, alignment }
    }

    /// Dispatcher restricted to `features`. Capabilities the host lacks are
    /// dropped, so the result is always safe to run.
    pub fn with_features(features: CpuFeatures) -> Self {
        let features = features & cpu_features();
        KernelDispatcher { features, config: KernelConfig::default(), alignment: boundary_for(features) }
    }

    pub fn features(&self) -> CpuFeatures {
        self.features
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Call-site alignment boundary in bytes.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Index into `op.variants()` of the variant this dispatcher would run.
    /// A configured preference wins when it is legal here.
    pub fn select_index(&self, op: &dyn OperationInfo, alignment: Alignment) -> usize {
        let descs = op.descriptors();
        if let Some(wanted) = self.config.preference(op.name(), alignment) {
            match descs.iter().position(|d| d.name == wanted) {
                Some(i) if is_legal(&descs[i], self.features, alignment) => return i,
                Some(_) => log::warn!(
                    "{}: preferred variant {} is not legal for {} call sites on {}, ignoring",
                    op.name(),
                    wanted,
                    alignment.name(),
                    self.features
                ),
                None => log::warn!("{}: preferred variant {} does not exist, ignoring", op.name(), wanted),
            }
        }
        best_index(&descs, self.features, alignment)
    }

    pub fn select(&self, op: &dyn OperationInfo, alignment: Alignment) -> VariantDesc {
        op.descriptors()[self.select_index(op, alignment)]
    }

    /// Selected aligned and unaligned variant for every registered operation.
    pub fn selection_table(&self) -> Vec<Selection> {
        ops::operations()
            .into_iter()
            .map(|op| Selection {
                operation: op.name(),
                aligned: self.select(op, Alignment::Aligned).name,
                unaligned: self.select(op, Alignment::Unaligned).name,
            })
            .collect()
    }

    fn kernel<F: Copy + Sync + 'static>(&self, op: &'static Operation<F>, alignment: Alignment) -> F {
        op.variant_at(self.select_index(op, alignment)).kernel
    }

    /// Quad max-star through this dispatcher's selection, uncached.
    ///
    /// # Panics
    /// If any source length differs from `target.len()`.
    pub fn quad_max_star(&self, target: &mut [i16], src0: &[i16], src1: &[i16], src2: &[i16], src3: &[i16]) {
        check_lengths(target, [src0, src1, src2, src3]);
        let class = Alignment::classify(
            &[
                target.as_ptr().cast(),
                src0.as_ptr().cast(),
                src1.as_ptr().cast(),
                src2.as_ptr().cast(),
                src3.as_ptr().cast(),
            ],
            self.alignment,
        );
        let kernel: QuadMaxStarFn = self.kernel(&QUAD_MAX_STAR, class);
        // SAFETY: `features` is a subset of the host's, and aligned variants
        // are only chosen for aligned call sites.
        unsafe { kernel(target, src0, src1, src2, src3) }
    }

    /// Byteswap through this dispatcher's selection, uncached.
    pub fn byteswap(&self, words: &mut [u32]) {
        let class = Alignment::classify(&[words.as_ptr().cast()], self.alignment);
        let kernel: ByteswapFn = self.kernel(&BYTESWAP, class);
        // SAFETY: as in `quad_max_star`.
        unsafe { kernel(words) }
    }
}

impl Default for KernelDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Widest legal accelerated variant across all operations, or 1.
fn boundary_for(features: CpuFeatures) -> usize {
    ops::operations()
        .into_iter()
        .flat_map(|op| op.descriptors())
        .filter(|d| !d.is_baseline() && features.contains(d.requires))
        .map(|d| d.width)
        .max()
        .unwrap_or(1)
}

static GLOBAL: OnceLock<KernelDispatcher> = OnceLock::new();

/// The process-wide dispatcher used by the free entry points.
pub fn global() -> &'static KernelDispatcher {
    if let Some(d) = GLOBAL.get() {
        return d;
    }
    // Compute outside the cell; losing the race drops our copy.
    let candidate = KernelDispatcher::new();
    let published = GLOBAL.set(candidate).is_ok();
    let d = GLOBAL.get().unwrap_or_else(|| unreachable!("dispatcher published by set"));
    if published {
        log::info!("Kernel dispatch on {} (alignment {} bytes):", d.features, d.alignment);
        for row in d.selection_table() {
            log::info!("  {:<20} aligned={:<8} unaligned={}", row.operation, row.aligned, row.unaligned);
        }
    }
    d
}

/// Call-site alignment boundary of the process-wide dispatcher.
pub fn alignment() -> usize {
    global().alignment()
}

/// Cached kernel for `op` at `alignment` from the process-wide dispatcher.
pub fn resolve<F: Copy + Sync + 'static>(op: &'static Operation<F>, alignment: Alignment) -> F {
    let slot = op.cache().slot(alignment);
    let index = match slot.get() {
        Some(&i) => i,
        None => {
            let i = global().select_index(op, alignment);
            let _ = slot.set(i);
            i
        }
    };
    op.variant_at(index).kernel
}
