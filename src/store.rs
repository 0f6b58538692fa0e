// Kanji-Parts Decomposition Store
// Immutable decomposition tables plus the indexes derived from them

use crate::data::{DataInfo, StandardEntry, TableSet, VariantTable};
use crate::region::RegionSets;
use crate::variant::VariantResolver;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::borrow::Cow;
use std::sync::Arc;

/// Memoized leaf lists, owned by the store that computed them
#[derive(Default)]
pub struct FlattenCache {
    leaves: RwLock<FxHashMap<String, Arc<[String]>>>,
}

impl FlattenCache {
    fn get(&self, symbol: &str) -> Option<Arc<[String]>> {
        self.leaves.read().get(symbol).cloned()
    }

    fn insert(&self, symbol: &str, leaves: Arc<[String]>) {
        self.leaves.write().insert(symbol.to_string(), leaves);
    }

    /// Number of memoized entries
    pub fn len(&self) -> usize {
        self.leaves.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.read().is_empty()
    }
}

/// Decomposition tables, read-only after construction
///
/// Built once from a [`TableSet`] and shared behind an `Arc`. Besides the raw
/// tables it holds the inverted index (component → composites whose direct
/// decomposition mentions it), ordered by composite code point.
pub struct DecompositionStore {
    /// Composite → immediate components
    direct: FxHashMap<String, Vec<String>>,

    /// Composite → alternative leaf sequences
    patterns: FxHashMap<String, Vec<Vec<String>>>,

    /// Component → composites containing it
    inverted: FxHashMap<String, Vec<String>>,

    /// Every symbol named by a decomposition, as key or leaf
    components: FxHashSet<String>,

    variants: VariantTable,
    regions: RegionSets,

    /// Standard-use entries by character, for readings
    standard: FxHashMap<String, StandardEntry>,

    cache: FlattenCache,
    info: DataInfo,
}

impl DecompositionStore {
    /// Build the store and its indexes from loaded tables
    pub fn new(tables: TableSet) -> Self {
        let info = DataInfo::of(&tables);

        // BTreeMap iteration keeps every posting list in code point order
        let mut inverted: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for (composite, parts) in &tables.direct {
            let mut seen = FxHashSet::default();
            for part in parts {
                if part != composite && seen.insert(part.as_str()) {
                    inverted
                        .entry(part.clone())
                        .or_default()
                        .push(composite.clone());
                }
            }
        }

        let mut components: FxHashSet<String> = FxHashSet::default();
        for (composite, parts) in &tables.direct {
            components.insert(composite.clone());
            components.extend(parts.iter().cloned());
        }
        for (composite, alts) in &tables.patterns {
            components.insert(composite.clone());
            components.extend(alts.iter().flatten().cloned());
        }

        let regions = RegionSets::new(
            tables.standard.iter().map(|e| e.symbol.clone()),
            tables.historical,
        );
        let standard = tables
            .standard
            .into_iter()
            .map(|e| (e.symbol.clone(), e))
            .collect();

        Self {
            direct: tables.direct.into_iter().collect(),
            patterns: tables.patterns.into_iter().collect(),
            inverted,
            components,
            variants: tables.variants,
            regions,
            standard,
            cache: FlattenCache::default(),
            info,
        }
    }

    /// A store with no tables; every lookup misses
    pub fn empty() -> Self {
        Self::new(TableSet::default())
    }

    /// True when the symbol has a direct decomposition
    pub fn is_composite(&self, symbol: &str) -> bool {
        self.direct.contains_key(symbol)
    }

    /// True when the symbol appears anywhere in the tables
    pub fn knows(&self, symbol: &str) -> bool {
        self.direct.contains_key(symbol)
            || self.patterns.contains_key(symbol)
            || self.inverted.contains_key(symbol)
            || self.variants.by_variant.contains_key(symbol)
            || self.variants.by_base.contains_key(symbol)
            || self.regions.is_standard(symbol)
            || self.regions.is_historical(symbol)
    }

    /// True when a direct or pattern decomposition names the symbol
    pub fn occurs(&self, symbol: &str) -> bool {
        self.components.contains(symbol)
    }

    /// Immediate components of a composite
    pub fn direct(&self, symbol: &str) -> Option<&[String]> {
        self.direct.get(symbol).map(Vec::as_slice)
    }

    /// Pattern alternatives of a composite
    pub fn patterns(&self, symbol: &str) -> Option<&[Vec<String>]> {
        self.patterns.get(symbol).map(Vec::as_slice)
    }

    /// Composites whose direct decomposition contains the component
    pub fn composites_containing(&self, component: &str) -> Option<&[String]> {
        self.inverted.get(component).map(Vec::as_slice)
    }

    /// Every reading of a symbol that matching and scoring consider
    ///
    /// The pattern alternatives when present; otherwise the direct
    /// decomposition and, if it differs, its fully flattened leaves;
    /// otherwise the symbol read as itself.
    pub fn alternatives(&self, symbol: &str) -> Cow<'_, [Vec<String>]> {
        if let Some(alts) = self.patterns.get(symbol).filter(|alts| !alts.is_empty()) {
            return Cow::Borrowed(alts.as_slice());
        }
        match self.direct.get(symbol) {
            Some(parts) => {
                let leaves = self.leaves(symbol).to_vec();
                if &leaves == parts || leaves.is_empty() {
                    Cow::Owned(vec![parts.clone()])
                } else {
                    Cow::Owned(vec![parts.clone(), leaves])
                }
            }
            None => Cow::Owned(vec![vec![symbol.to_string()]]),
        }
    }

    /// Flatten a symbol down to atomic components through the direct table
    ///
    /// `visited` holds the symbols on the current path. A symbol already on
    /// the path is a cycle in the data and contributes nothing, so malformed
    /// entries yield a partial leaf list instead of unbounded recursion.
    pub fn flatten(&self, symbol: &str, visited: &mut FxHashSet<String>) -> Vec<String> {
        let parts = match self.direct.get(symbol) {
            Some(parts) if !parts.is_empty() => parts,
            _ => return vec![symbol.to_string()],
        };
        if !visited.insert(symbol.to_string()) {
            return Vec::new();
        }

        let mut leaves = Vec::with_capacity(parts.len());
        for part in parts {
            if part == symbol {
                leaves.push(part.clone());
            } else {
                leaves.extend(self.flatten(part, visited));
            }
        }

        visited.remove(symbol);
        leaves
    }

    /// Memoized [`flatten`](Self::flatten) from a fresh path
    pub fn leaves(&self, symbol: &str) -> Arc<[String]> {
        if let Some(hit) = self.cache.get(symbol) {
            return hit;
        }
        let leaves: Arc<[String]> = self.flatten(symbol, &mut FxHashSet::default()).into();
        self.cache.insert(symbol, Arc::clone(&leaves));
        leaves
    }

    /// Variant resolver over this store's variant table
    pub fn resolver(&self) -> VariantResolver<'_> {
        VariantResolver::new(&self.variants)
    }

    /// Region membership sets
    pub fn regions(&self) -> &RegionSets {
        &self.regions
    }

    /// Standard-use entry (with readings) for a character
    pub fn standard_entry(&self, symbol: &str) -> Option<&StandardEntry> {
        self.standard.get(symbol)
    }

    /// Table sizes this store was built from
    pub fn info(&self) -> &DataInfo {
        &self.info
    }

    /// The flattening memo cache
    pub fn cache(&self) -> &FlattenCache {
        &self.cache
    }
}

impl Default for DecompositionStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for DecompositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompositionStore")
            .field("info", self.info())
            .finish_non_exhaustive()
    }
}

impl From<TableSet> for DecompositionStore {
    fn from(tables: TableSet) -> Self {
        Self::new(tables)
    }
}
