// Kanji-Parts Decomposition Matcher
// Finds composites containing a multiset of parts, and parts of a composite

use crate::combination::{combination_count, combinations, MAX_COMBINATIONS};
use crate::query::is_han;
use crate::store::DecompositionStore;
use rustc_hash::{FxHashMap, FxHashSet};

/// Default size of the verification shortlist
///
/// Candidates are ranked by how many variant combinations they survive
/// before verification; anything past the cap is never verified.
pub const SHORTLIST_CAP: usize = 100;

/// A composite that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The composite character
    pub symbol: String,

    /// Query readings that verified it: the required parts in typed order,
    /// each replaced by the variant chosen in a matching combination
    pub readings: Vec<Vec<String>>,
}

/// One variant combination, resolved against the required parts
struct Combination {
    /// Chosen representative per distinct position
    choice: Vec<String>,

    /// Representative → required count (positions choosing the same form add up)
    demand: Vec<(String, usize)>,
}

/// Matcher over a decomposition store
#[derive(Clone, Copy)]
pub struct DecompositionMatcher<'a> {
    store: &'a DecompositionStore,
    shortlist_cap: usize,
    max_combinations: usize,
}

impl<'a> DecompositionMatcher<'a> {
    /// Create a matcher with the default shortlist cap
    ///
    /// # Example
    /// ```
    /// # use kanji_parts::data::TableSet;
    /// # use kanji_parts::store::DecompositionStore;
    /// # use kanji_parts::matcher::DecompositionMatcher;
    /// let mut tables = TableSet::default();
    /// tables.direct.insert("池".into(), vec!["水".into(), "也".into()]);
    /// let store = DecompositionStore::new(tables);
    ///
    /// let matcher = DecompositionMatcher::new(&store);
    /// let found = matcher.find_composites(&["水".to_string(), "也".to_string()]);
    /// assert_eq!(found[0].symbol, "池");
    /// ```
    pub fn new(store: &'a DecompositionStore) -> Self {
        Self {
            store,
            shortlist_cap: SHORTLIST_CAP,
            max_combinations: MAX_COMBINATIONS,
        }
    }

    /// Override the verification shortlist size
    pub fn with_shortlist_cap(mut self, cap: usize) -> Self {
        self.shortlist_cap = cap;
        self
    }

    /// Override the ceiling on variant combinations per query
    pub fn with_max_combinations(mut self, limit: usize) -> Self {
        self.max_combinations = limit;
        self
    }

    /// Replace typed composites by their parts
    ///
    /// A symbol with no direct decomposition but a pattern entry stands for
    /// the leaves of its first pattern alternative, so typing a composite
    /// acts as if its parts were typed. Non-Han leaves (description
    /// characters) are dropped. Everything else stays literal.
    pub fn expand(&self, parts: &[String]) -> Vec<String> {
        let mut expanded = Vec::with_capacity(parts.len());
        for part in parts {
            let first = if self.store.is_composite(part) {
                None
            } else {
                self.store
                    .patterns(part)
                    .and_then(|alts| alts.first())
                    .filter(|alt| !alt.is_empty())
            };
            match first {
                Some(leaves) => expanded.extend(leaves.iter().filter(|l| is_han(l)).cloned()),
                None => expanded.push(part.clone()),
            }
        }
        expanded
    }

    /// Single-part lookup: each member of the part's equivalence class,
    /// followed by the composites directly built from it
    ///
    /// Symbols unknown to every table contribute nothing.
    pub fn single_part(&self, part: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for member in self.store.resolver().variants_of(part) {
            if !self.store.knows(&member) {
                continue;
            }
            if seen.insert(member.clone()) {
                out.push(member.clone());
            }
            for composite in self.store.composites_containing(&member).unwrap_or_default() {
                if seen.insert(composite.clone()) {
                    out.push(composite.clone());
                }
            }
        }
        out
    }

    /// Find composites whose decomposition contains the required parts
    ///
    /// `required` is the expanded query in typed order; repeated parts must
    /// occur at least as often in a single alternative of the composite.
    /// Results keep shortlist order (most combinations survived first).
    pub fn find_composites(&self, required: &[String]) -> Vec<Candidate> {
        if required.is_empty() {
            return Vec::new();
        }

        let mut distinct: Vec<&str> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        for part in required {
            match distinct.iter().position(|d| *d == part.as_str()) {
                Some(i) => counts[i] += 1,
                None => {
                    distinct.push(part);
                    counts.push(1);
                }
            }
        }

        let mut positions: Vec<Vec<String>> = distinct.iter().map(|p| self.class_of(p)).collect();
        match combination_count(&positions) {
            Some(n) if n <= self.max_combinations => {
                tracing::trace!(combinations = n, "expanding variant combinations");
            }
            _ => {
                tracing::warn!(
                    parts = distinct.len(),
                    limit = self.max_combinations,
                    "too many variant combinations, matching typed forms only"
                );
                positions = distinct.iter().map(|p| vec![p.to_string()]).collect();
            }
        }
        let combos: Vec<Combination> = combinations(&positions)
            .into_iter()
            .map(|choice| {
                let mut demand: Vec<(String, usize)> = Vec::with_capacity(choice.len());
                for (rep, count) in choice.iter().zip(&counts) {
                    match demand.iter_mut().find(|(s, _)| s == rep) {
                        Some((_, n)) => *n += count,
                        None => demand.push((rep.clone(), *count)),
                    }
                }
                Combination { choice, demand }
            })
            .collect();

        let mut shortlist = self.shortlist(&combos);
        if let [only] = distinct.as_slice() {
            if self.store.knows(only) && !shortlist.iter().any(|s| s == only) {
                shortlist.insert(0, only.to_string());
            }
        }

        let mut found = Vec::new();
        for symbol in shortlist {
            let alternatives = self.store.alternatives(&symbol);
            let readings: Vec<Vec<String>> = combos
                .iter()
                .filter(|combo| {
                    alternatives
                        .iter()
                        .any(|alt| contains_multiset(alt, &combo.demand))
                })
                .map(|combo| {
                    required
                        .iter()
                        .map(|part| {
                            let i = distinct
                                .iter()
                                .position(|d| *d == part.as_str())
                                .unwrap_or(0);
                            combo.choice[i].clone()
                        })
                        .collect()
                })
                .collect();
            if !readings.is_empty() {
                found.push(Candidate { symbol, readings });
            }
        }

        tracing::trace!(verified = found.len(), "composite search");
        found
    }

    /// Equivalence class of a typed part, minus members no decomposition
    /// mentions; those could only ever intersect to themselves
    fn class_of(&self, part: &str) -> Vec<String> {
        let mut class = self.store.resolver().variants_of(part);
        class.retain(|member| member == part || self.store.occurs(member));
        class
    }

    /// Rank composites by the number of combinations whose parts they all
    /// contain, keeping at most the shortlist cap
    ///
    /// Ties keep discovery order. A part with no composites stands for
    /// itself, so an atomic part only ever intersects to itself.
    fn shortlist(&self, combos: &[Combination]) -> Vec<String> {
        let mut hits: FxHashMap<&str, usize> = FxHashMap::default();
        let mut order: Vec<&str> = Vec::new();

        for combo in combos {
            // Posting lists are sorted, so membership is a binary search
            let mut lists: Vec<&[String]> = combo
                .demand
                .iter()
                .map(|(part, _)| {
                    self.store
                        .composites_containing(part)
                        .unwrap_or(std::slice::from_ref(part))
                })
                .collect();
            lists.sort_by_key(|list| list.len());

            let Some((smallest, rest)) = lists.split_first() else {
                continue;
            };
            for candidate in smallest.iter() {
                if rest.iter().all(|list| list.binary_search(candidate).is_ok()) {
                    let entry = hits.entry(candidate.as_str()).or_insert_with(|| {
                        order.push(candidate.as_str());
                        0
                    });
                    *entry += 1;
                }
            }
        }

        order.sort_by(|a, b| hits[b].cmp(&hits[a]));
        order.truncate(self.shortlist_cap);
        tracing::trace!(shortlist = order.len(), "verification shortlist");
        order.into_iter().map(str::to_string).collect()
    }

    /// Components of a character, Han only, duplicates removed
    ///
    /// Leaves of every pattern alternative in discovery order; without a
    /// pattern entry, the flattened direct decomposition. Unknown or atomic
    /// characters have no parts.
    ///
    /// # Example
    /// ```
    /// # use kanji_parts::data::TableSet;
    /// # use kanji_parts::store::DecompositionStore;
    /// # use kanji_parts::matcher::DecompositionMatcher;
    /// let mut tables = TableSet::default();
    /// tables.direct.insert("池".into(), vec!["水".into(), "也".into()]);
    /// let store = DecompositionStore::new(tables);
    ///
    /// let parts = DecompositionMatcher::new(&store).parts_of("池");
    /// assert_eq!(parts, vec!["水", "也"]);
    /// ```
    pub fn parts_of(&self, symbol: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut take = |leaf: &String| {
            if is_han(leaf) && seen.insert(leaf.clone()) {
                out.push(leaf.clone());
            }
        };

        match self.store.patterns(symbol) {
            Some(alts) if !alts.is_empty() => alts.iter().flatten().for_each(&mut take),
            _ if self.store.is_composite(symbol) => {
                self.store.leaves(symbol).iter().for_each(&mut take)
            }
            _ => {}
        }
        out
    }
}

/// Count-aware containment: every demanded part occurs in the alternative
/// at least as many times as demanded
pub fn contains_multiset(alternative: &[String], demand: &[(String, usize)]) -> bool {
    demand
        .iter()
        .all(|(part, n)| alternative.iter().filter(|s| *s == part).count() >= *n)
}
