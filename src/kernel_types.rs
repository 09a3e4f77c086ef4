//! Kernel variant metadata and the per-operation variant registry.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::runtime_detection::{alignment_of, CpuFeatures};

/// Alignment class of a variant, or of a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Every pointer sits on the variant's natural vector width.
    Aligned,
    /// No alignment precondition.
    Unaligned,
}

impl Alignment {
    /// Whether a call site of class `self` may run a variant of class `variant`.
    ///
    /// Aligned call sites accept both classes; unaligned call sites only
    /// unaligned variants.
    #[inline]
    pub const fn admits(self, variant: Alignment) -> bool {
        match (self, variant) {
            (_, Alignment::Unaligned) => true,
            (Alignment::Aligned, Alignment::Aligned) => true,
            (Alignment::Unaligned, Alignment::Aligned) => false,
        }
    }

    /// Classify a call site: aligned only if every pointer sits on `boundary`.
    #[inline]
    pub fn classify(ptrs: &[*const u8], boundary: usize) -> Self {
        if ptrs.iter().all(|&p| alignment_of(p) >= boundary) {
            Alignment::Aligned
        } else {
            Alignment::Unaligned
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Alignment::Aligned => "aligned",
            Alignment::Unaligned => "unaligned",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Alignment::Aligned => 0,
            Alignment::Unaligned => 1,
        }
    }
}

/// Element type of an operation's buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    I16,
    U32,
}

impl ElementType {
    pub const fn size_bytes(self) -> usize {
        match self {
            ElementType::I16 => 2,
            ElementType::U32 => 4,
        }
    }
}

/// What the dispatcher knows about a variant without touching its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantDesc {
    pub name: &'static str,
    /// Capabilities the variant executes; empty for the baseline.
    pub requires: CpuFeatures,
    pub alignment: Alignment,
    /// Natural vector width in bytes. Aligned variants need pointers on this boundary.
    pub width: usize,
    /// Relative throughput; higher wins.
    pub rank: u16,
}

impl VariantDesc {
    pub const fn is_baseline(&self) -> bool {
        self.requires.is_empty()
    }
}

/// One concrete implementation of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Variant<F> {
    pub desc: VariantDesc,
    pub kernel: F,
}

impl<F> Variant<F> {
    pub const fn new(
        name: &'static str,
        requires: CpuFeatures,
        alignment: Alignment,
        width: usize,
        rank: u16,
        kernel: F,
    ) -> Self {
        Variant {
            desc: VariantDesc { name, requires, alignment, width, rank },
            kernel,
        }
    }

    /// The scalar fallback: no capability, any alignment, rank 0.
    pub const fn generic(element: ElementType, kernel: F) -> Self {
        Self::new("generic", CpuFeatures::empty(), Alignment::Unaligned, element.size_bytes(), 0, kernel)
    }
}

/// Per-(operation, alignment class) selection cache, filled on first dispatch.
#[derive(Debug)]
pub struct SelectionCache {
    slots: [OnceLock<usize>; 2],
}

impl SelectionCache {
    pub const fn new() -> Self {
        SelectionCache { slots: [OnceLock::new(), OnceLock::new()] }
    }

    pub(crate) fn slot(&self, alignment: Alignment) -> &OnceLock<usize> {
        &self.slots[alignment.slot()]
    }
}

impl Default for SelectionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// An operation contract plus every variant compiled into this binary.
///
/// The baseline is a separate field, so an operation without a fallback cannot
/// be expressed. Index 0 in [`Operation::variants`] is always the baseline.
#[derive(Debug)]
pub struct Operation<F: 'static> {
    pub name: &'static str,
    pub element: ElementType,
    /// Number of input buffers.
    pub inputs: usize,
    /// Output overwrites the first input.
    pub in_place: bool,
    /// Kept for compatibility; not recommended for new code.
    pub deprecated: bool,
    pub generic: Variant<F>,
    pub accelerated: &'static [Variant<F>],
    cache: SelectionCache,
}

impl<F: Copy + 'static> Operation<F> {
    /// Registers an operation.
    ///
    /// Evaluate this in a `static` so a malformed registry fails the build:
    /// duplicate (capability, alignment) pairs, duplicate names, a baseline
    /// that needs a capability, or an accelerated variant that needs none.
    pub const fn new(
        name: &'static str,
        element: ElementType,
        inputs: usize,
        in_place: bool,
        deprecated: bool,
        generic: Variant<F>,
        accelerated: &'static [Variant<F>],
    ) -> Self {
        assert!(registry_is_well_formed(&generic.desc, accelerated), "malformed kernel variant registry");
        Operation {
            name,
            element,
            inputs,
            in_place,
            deprecated,
            generic,
            accelerated,
            cache: SelectionCache::new(),
        }
    }

    /// Baseline first, then accelerated variants in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = &Variant<F>> + '_ {
        std::iter::once(&self.generic).chain(self.accelerated.iter())
    }

    /// `index` counts from the baseline at 0, as in [`Operation::variants`].
    pub(crate) fn variant_at(&self, index: usize) -> &Variant<F> {
        debug_assert!(
            index <= self.accelerated.len(),
            "{}: variant index {} out of range",
            self.name,
            index
        );
        match index {
            0 => &self.generic,
            i => self.accelerated.get(i - 1).unwrap_or(&self.generic),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.variants().position(|v| v.desc.name == name)
    }

    pub fn variant(&self, name: &str) -> Option<&Variant<F>> {
        self.variants().find(|v| v.desc.name == name)
    }

    pub(crate) fn cache(&self) -> &SelectionCache {
        &self.cache
    }
}

/// Object-safe view of an [`Operation`] for listing and selection reports.
pub trait OperationInfo: Sync {
    fn name(&self) -> &'static str;
    fn element(&self) -> ElementType;
    fn inputs(&self) -> usize;
    fn in_place(&self) -> bool;
    fn deprecated(&self) -> bool;
    /// Baseline first, same order as [`Operation::variants`].
    fn descriptors(&self) -> Vec<VariantDesc>;
}

impl<F: Copy + Sync + 'static> OperationInfo for Operation<F> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn element(&self) -> ElementType {
        self.element
    }

    fn inputs(&self) -> usize {
        self.inputs
    }

    fn in_place(&self) -> bool {
        self.in_place
    }

    fn deprecated(&self) -> bool {
        self.deprecated
    }

    fn descriptors(&self) -> Vec<VariantDesc> {
        self.variants().map(|v| v.desc).collect()
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn same_alignment(a: Alignment, b: Alignment) -> bool {
    a.slot() == b.slot()
}

/// Build-time registry check used by [`Operation::new`].
pub const fn registry_is_well_formed<F>(generic: &VariantDesc, accelerated: &[Variant<F>]) -> bool {
    if !generic.requires.is_empty() || !same_alignment(generic.alignment, Alignment::Unaligned) {
        return false;
    }
    let mut i = 0;
    while i < accelerated.len() {
        let a = &accelerated[i].desc;
        if a.requires.is_empty() || str_eq(a.name, generic.name) {
            return false;
        }
        let mut j = i + 1;
        while j < accelerated.len() {
            let b = &accelerated[j].desc;
            if str_eq(a.name, b.name) {
                return false;
            }
            if a.requires.bits() == b.requires.bits() && same_alignment(a.alignment, b.alignment) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    type NopFn = fn();
    fn nop() {}

    #[test]
    fn test_admits() {
        assert!(Alignment::Aligned.admits(Alignment::Aligned));
        assert!(Alignment::Aligned.admits(Alignment::Unaligned));
        assert!(Alignment::Unaligned.admits(Alignment::Unaligned));
        assert!(!Alignment::Unaligned.admits(Alignment::Aligned));
    }

    #[test]
    fn test_classify() {
        #[repr(C, align(64))]
        struct Line([u8; 128]);
        let line = Line([0; 128]);
        let base = line.0.as_ptr();
        let off = unsafe { base.add(4) };
        assert_eq!(Alignment::classify(&[base, base], 32), Alignment::Aligned);
        assert_eq!(Alignment::classify(&[base, off], 32), Alignment::Unaligned);
        assert_eq!(Alignment::classify(&[off], 4), Alignment::Aligned);
        assert_eq!(Alignment::classify(&[], 64), Alignment::Aligned);
    }

    #[test]
    fn test_registry_rejects_duplicate_pair() {
        let generic = Variant::<NopFn>::generic(ElementType::I16, nop).desc;
        let dup = [
            Variant::<NopFn>::new("a_x", CpuFeatures::SSE2, Alignment::Aligned, 16, 10, nop),
            Variant::<NopFn>::new("a_y", CpuFeatures::SSE2, Alignment::Aligned, 16, 11, nop),
        ];
        assert!(!registry_is_well_formed(&generic, &dup));

        let distinct = [
            Variant::<NopFn>::new("a_x", CpuFeatures::SSE2, Alignment::Aligned, 16, 10, nop),
            Variant::<NopFn>::new("u_x", CpuFeatures::SSE2, Alignment::Unaligned, 16, 10, nop),
        ];
        assert!(registry_is_well_formed(&generic, &distinct));
    }

    #[test]
    fn test_registry_rejects_bad_baseline() {
        let bad = Variant::<NopFn>::new("generic", CpuFeatures::SSE2, Alignment::Unaligned, 2, 0, nop).desc;
        assert!(!registry_is_well_formed::<NopFn>(&bad, &[]));

        let aligned = Variant::<NopFn>::new("generic", CpuFeatures::empty(), Alignment::Aligned, 2, 0, nop).desc;
        assert!(!registry_is_well_formed::<NopFn>(&aligned, &[]));
    }

    #[test]
    fn test_registry_rejects_unflagged_accelerated() {
        let generic = Variant::<NopFn>::generic(ElementType::U32, nop).desc;
        let second_baseline = [Variant::<NopFn>::new("fast", CpuFeatures::empty(), Alignment::Unaligned, 4, 5, nop)];
        assert!(!registry_is_well_formed(&generic, &second_baseline));
    }

    #[test]
    fn test_registry_rejects_duplicate_names() {
        let generic = Variant::<NopFn>::generic(ElementType::U32, nop).desc;
        let same_name = [
            Variant::<NopFn>::new("simd", CpuFeatures::SSE2, Alignment::Unaligned, 16, 10, nop),
            Variant::<NopFn>::new("simd", CpuFeatures::AVX2, Alignment::Unaligned, 32, 20, nop),
        ];
        assert!(!registry_is_well_formed(&generic, &same_name));
    }

    static TEST_OP: Operation<NopFn> = Operation::new(
        "test_op",
        ElementType::U32,
        1,
        true,
        false,
        Variant::generic(ElementType::U32, nop as NopFn),
        &[Variant::new("u_avx2", CpuFeatures::AVX2, Alignment::Unaligned, 32, 20, nop as NopFn)],
    );

    #[test]
    fn test_operation_indexing() {
        assert_eq!(TEST_OP.variants().count(), 2);
        assert_eq!(TEST_OP.variant_at(0).desc.name, "generic");
        assert_eq!(TEST_OP.variant_at(1).desc.name, "u_avx2");
        assert_eq!(TEST_OP.position("u_avx2"), Some(1));
        assert!(TEST_OP.variant("a_avx2").is_none());
        let info: &dyn OperationInfo = &TEST_OP;
        assert_eq!(info.descriptors().len(), 2);
        assert!(info.descriptors()[0].is_baseline());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "out of range")]
    fn test_variant_index_out_of_range() {
        TEST_OP.variant_at(99);
    }
}
