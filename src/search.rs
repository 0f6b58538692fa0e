// Kanji-Parts Search Engine
// Main API that orchestrates all components

use crate::data::{DataInfo, DataLoader, TableSet};
use crate::details::CharacterDetails;
use crate::combination::MAX_COMBINATIONS;
use crate::matcher::{DecompositionMatcher, SHORTLIST_CAP};
use crate::query::{is_han, parse_query};
use crate::scorer::Ranker;
use crate::store::DecompositionStore;
use crate::types::{DataError, ParsedQuery, Region, SearchMode, SearchResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Composites verified per query, at most
    ///
    /// Larger caps improve recall for short, very common parts at the cost
    /// of more verification work. Results stay deterministic either way.
    pub shortlist_cap: usize,

    /// Variant combinations one query may expand into
    ///
    /// Past this, each part matches only in the form it was typed.
    pub max_combinations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shortlist_cap: SHORTLIST_CAP,
            max_combinations: MAX_COMBINATIONS,
        }
    }
}

/// Main kanji decomposition search engine
///
/// Combines all components:
/// - Query parsing (Han extraction)
/// - Variant resolution and combination
/// - Inverted-index matching with count-aware verification
/// - Relevance ranking
/// - Region filtering
#[derive(Clone)]
pub struct KanjiSearch {
    /// Shared read-only tables
    store: Arc<DecompositionStore>,

    config: EngineConfig,
}

impl KanjiSearch {
    /// Create an engine over already built tables
    pub fn new(store: Arc<DecompositionStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with custom tuning
    pub fn with_config(store: Arc<DecompositionStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Build the store from loaded tables
    pub fn from_tables(tables: TableSet) -> Self {
        Self::new(Arc::new(DecompositionStore::new(tables)))
    }

    /// Load tables from a data directory
    ///
    /// # Returns
    /// The engine and information about the loaded tables
    pub fn load(root: &Path) -> Result<(Self, DataInfo), DataError> {
        let (tables, info) = DataLoader::new(root).load()?;
        Ok((Self::from_tables(tables), info))
    }

    /// The shared store behind this engine
    pub fn store(&self) -> &Arc<DecompositionStore> {
        &self.store
    }

    fn matcher(&self) -> DecompositionMatcher<'_> {
        DecompositionMatcher::new(&self.store)
            .with_shortlist_cap(self.config.shortlist_cap)
            .with_max_combinations(self.config.max_combinations)
    }

    /// Execute a search over raw query text
    ///
    /// # Arguments
    /// * `query` - Free text; only its Han characters are used
    /// * `mode` - Search direction
    /// * `region` - Region restriction (parts → character only)
    ///
    /// # Returns
    /// Characters sorted by relevance; empty when nothing matches
    pub fn search(&self, query: &str, mode: SearchMode, region: Region) -> Vec<String> {
        self.run(&parse_query(query, mode, region))
            .into_iter()
            .map(|r| r.symbol)
            .collect()
    }

    /// Search with limit on results
    pub fn search_limit(
        &self,
        query: &str,
        mode: SearchMode,
        region: Region,
        limit: usize,
    ) -> Vec<String> {
        let mut results = self.search(query, mode, region);
        results.truncate(limit);
        results
    }

    /// Search over already extracted parts
    pub fn search_parts(&self, parts: &[String], mode: SearchMode, region: Region) -> Vec<String> {
        let parsed = ParsedQuery {
            mode,
            region,
            parts: parts.iter().filter(|p| is_han(p)).cloned().collect(),
        };
        self.run(&parsed).into_iter().map(|r| r.symbol).collect()
    }

    /// Execute a parsed query, keeping scores
    ///
    /// Scores are present only for multi-part parts → character queries;
    /// single-part lookups and character → parts results are unscored.
    pub fn run(&self, parsed: &ParsedQuery) -> Vec<SearchResult> {
        if parsed.is_empty() {
            return Vec::new();
        }
        let start = Instant::now();

        let results = match parsed.mode {
            SearchMode::PartsToChar => self.parts_to_char(&parsed.parts, parsed.region),
            SearchMode::CharToParts => self
                .parts_of(&parsed.parts[0])
                .into_iter()
                .map(SearchResult::new)
                .collect(),
        };

        tracing::debug!(
            mode = %parsed.mode,
            region = %parsed.region,
            parts = %parsed.parts.concat(),
            results = results.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "query"
        );
        results
    }

    fn parts_to_char(&self, parts: &[String], region: Region) -> Vec<SearchResult> {
        let matcher = self.matcher();
        let regions = self.store.regions();

        if let [only] = parts {
            let mut results: Vec<SearchResult> = matcher
                .single_part(only)
                .into_iter()
                .map(SearchResult::new)
                .collect();
            regions.retain(region, &mut results, |r| r.symbol.as_str());
            return results;
        }

        let required = matcher.expand(parts);
        let candidates = matcher.find_composites(&required);
        let mut results = Ranker::new(&self.store).rank(candidates);
        regions.retain(region, &mut results, |r| r.symbol.as_str());
        results
    }

    /// Components of a character (character → parts)
    pub fn parts_of(&self, symbol: &str) -> Vec<String> {
        self.matcher().parts_of(symbol)
    }

    /// Code point, readings, parts and region membership of a character
    pub fn details(&self, symbol: &str) -> CharacterDetails {
        CharacterDetails::lookup(&self.store, symbol)
    }

    /// Canonical (base) form of a character
    pub fn canonical(&self, symbol: &str) -> String {
        self.store.resolver().canonical(symbol).to_string()
    }

    /// Get statistics about the loaded tables
    pub fn stats(&self) -> &DataInfo {
        self.store.info()
    }
}

impl Default for KanjiSearch {
    /// An engine with no tables; every query is empty
    fn default() -> Self {
        Self::new(Arc::new(DecompositionStore::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture;

    fn create_search() -> KanjiSearch {
        KanjiSearch::from_tables(fixture())
    }

    #[test]
    fn test_parts_to_char() {
        let search = create_search();
        let results = search.search("水也", SearchMode::PartsToChar, Region::Standard);
        assert_eq!(results, vec!["池"]);
    }

    #[test]
    fn test_char_to_parts() {
        let search = create_search();
        let results = search.search("池", SearchMode::CharToParts, Region::Standard);
        assert_eq!(results, vec!["氵", "也", "水"]);
    }

    #[test]
    fn test_char_to_parts_uses_first_han_character() {
        let search = create_search();
        let results = search.search("x明池", SearchMode::CharToParts, Region::Standard);
        assert_eq!(results, vec!["日", "月"]);
    }

    #[test]
    fn test_scores_are_descending() {
        let search = create_search();
        let parsed = parse_query("口口口", SearchMode::PartsToChar, Region::Unrestricted);
        let results = search.run(&parsed);

        assert_eq!(results.len(), 2);
        for pair in results.windows(2) {
            assert!(pair[0].score.unwrap_or(0.0) >= pair[1].score.unwrap_or(0.0));
        }
    }

    #[test]
    fn test_single_part_is_unscored() {
        let search = create_search();
        let parsed = parse_query("也", SearchMode::PartsToChar, Region::Unrestricted);
        let results = search.run(&parsed);

        assert_eq!(results[0].symbol, "也");
        assert!(results.iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn test_region_applies_to_single_part() {
        let search = create_search();
        // 汁 and 池 are standard-use, 沐 is not, 沒 is historical
        let standard = search.search("氵", SearchMode::PartsToChar, Region::Standard);
        let extended = search.search("氵", SearchMode::PartsToChar, Region::Extended);
        assert!(!standard.contains(&"沐".to_string()));
        assert!(!standard.contains(&"沒".to_string()));
        assert!(extended.contains(&"沒".to_string()));
    }

    #[test]
    fn test_region_ignored_for_char_to_parts() {
        let search = create_search();
        let results = search.search("沒", SearchMode::CharToParts, Region::Standard);
        assert_eq!(results, vec!["氵", "殳"]);
    }

    #[test]
    fn test_non_han_query_is_empty() {
        let search = create_search();
        assert!(search
            .search("abc", SearchMode::PartsToChar, Region::Unrestricted)
            .is_empty());
    }

    #[test]
    fn test_search_limit() {
        let search = create_search();
        let results = search.search_limit("也", SearchMode::PartsToChar, Region::Unrestricted, 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_search_parts_drops_non_han() {
        let search = create_search();
        let parts = vec!["日".to_string(), "+".to_string(), "月".to_string()];
        assert_eq!(
            search.search_parts(&parts, SearchMode::PartsToChar, Region::Standard),
            vec!["明"]
        );
    }

    #[test]
    fn test_empty_engine() {
        let search = KanjiSearch::default();
        assert!(search
            .search("水也", SearchMode::PartsToChar, Region::Unrestricted)
            .is_empty());
        assert_eq!(search.stats().direct_entries, 0);
    }

    #[test]
    fn test_canonical() {
        let search = create_search();
        assert_eq!(search.canonical("亻"), "人");
        assert_eq!(search.canonical("木"), "木");
    }
}
