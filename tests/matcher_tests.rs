// Integration tests for the decomposition matcher and its building blocks

mod common;

use common::{direct_only, sample_tables, sorted, strings};
use kanji_parts::{
    combinations, contains_multiset, DecompositionMatcher, DecompositionStore, TableSet,
};
use rustc_hash::FxHashSet;

fn sample_store() -> DecompositionStore {
    DecompositionStore::new(sample_tables())
}

fn found(matcher: &DecompositionMatcher<'_>, parts: &[&str]) -> Vec<String> {
    let required = matcher.expand(&strings(parts));
    matcher
        .find_composites(&required)
        .into_iter()
        .map(|c| c.symbol)
        .collect()
}

// ============ Variant Resolution ============

#[test]
fn test_variants_are_reflexive() {
    let store = sample_store();
    let resolver = store.resolver();

    for symbol in ["氵", "水", "池", "龘", "口"] {
        let class = resolver.variants_of(symbol);
        assert_eq!(class[0], symbol, "{symbol} should lead its own class");
    }
}

#[test]
fn test_variant_classes_are_shared() {
    let store = sample_store();
    let resolver = store.resolver();

    assert_eq!(
        sorted(resolver.variants_of("扌")),
        sorted(resolver.variants_of("手"))
    );
    assert!(resolver.equivalent("亻", "人"));
    assert!(!resolver.equivalent("亻", "水"));
    assert_eq!(resolver.canonical("氵"), "水");
}

// ============ Combinations ============

#[test]
fn test_combinations_cover_every_choice() {
    let positions = vec![strings(&["水", "氵"]), strings(&["也"]), strings(&["人", "亻"])];
    let combos = combinations(&positions);

    assert_eq!(combos.len(), 4);
    assert_eq!(combos[0], strings(&["水", "也", "人"]));
    assert_eq!(combos[3], strings(&["氵", "也", "亻"]));
}

#[test]
fn test_combinations_of_nothing() {
    let positions: Vec<Vec<String>> = Vec::new();
    assert!(combinations(&positions).is_empty());
}

// ============ Multiset Containment ============

#[test]
fn test_multiset_containment_is_count_aware() {
    let alt = strings(&["日", "日", "日"]);
    assert!(contains_multiset(&alt, &[("日".into(), 3)]));
    assert!(!contains_multiset(&alt, &[("日".into(), 4)]));
    assert!(!contains_multiset(&alt, &[("日".into(), 1), ("月".into(), 1)]));
    assert!(contains_multiset(&alt, &[]));
}

#[test]
fn test_repeated_parts_require_repeated_components() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store);

    // 呂 and 古 hold fewer than three 口
    assert_eq!(found(&matcher, &["口", "口", "口"]), strings(&["品", "器"]));
    assert_eq!(found(&matcher, &["口", "口"]), strings(&["呂", "品", "器"]));
    assert_eq!(found(&matcher, &["日", "日"]), strings(&["昌", "晶"]));
}

#[test]
fn test_results_are_exactly_the_containing_composites() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store);
    let required = strings(&["木", "木"]);

    let results: FxHashSet<String> = found(&matcher, &["木", "木"]).into_iter().collect();
    for composite in ["休", "林", "森", "沐"] {
        let contains = store
            .alternatives(composite)
            .iter()
            .any(|alt| contains_multiset(alt, &[(required[0].clone(), 2)]));
        assert_eq!(results.contains(composite), contains, "{composite}");
    }
}

// ============ Pruning and Expansion ============

#[test]
fn test_parts_found_through_direct_fallback() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store);

    // 湖 has no pattern entry; its direct decomposition verifies it
    assert_eq!(found(&matcher, &["氵", "胡"]), strings(&["湖"]));
}

#[test]
fn test_pattern_only_symbol_expands() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store);

    // 㗊 stands for four 口; only 器 holds four 口 and a 犬
    assert_eq!(found(&matcher, &["㗊", "犬"]), strings(&["器"]));
}

#[test]
fn test_unknown_part_matches_nothing() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store);

    assert!(found(&matcher, &["龘", "也"]).is_empty());
}

#[test]
fn test_shortlist_cap_bounds_results() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store).with_shortlist_cap(2);

    // Shortlist holds 口 itself, then 古 and 呂; only 呂 verifies
    assert_eq!(found(&matcher, &["口", "口"]), strings(&["呂"]));
}

// ============ Cyclic Data ============

#[test]
fn test_cyclic_tables_terminate() {
    let tables = direct_only(&[("甲", &["乙", "口"]), ("乙", &["甲", "木"]), ("丙", &["丙"])]);
    let store = DecompositionStore::new(tables);
    let matcher = DecompositionMatcher::new(&store);

    assert_eq!(
        store.flatten("甲", &mut FxHashSet::default()),
        strings(&["木", "口"])
    );
    assert_eq!(matcher.parts_of("乙"), strings(&["口", "木"]));
    assert_eq!(matcher.parts_of("丙"), strings(&["丙"]));
    assert!(found(&matcher, &["口", "木"]).is_empty());
}

// ============ Character → Parts ============

#[test]
fn test_parts_of_direct_only_table() {
    let tables = direct_only(&[("池", &["水", "也"])]);
    let store = DecompositionStore::new(tables);

    assert_eq!(
        DecompositionMatcher::new(&store).parts_of("池"),
        strings(&["水", "也"])
    );
}

#[test]
fn test_parts_of_merges_alternatives_in_order() {
    let store = sample_store();
    let matcher = DecompositionMatcher::new(&store);

    assert_eq!(matcher.parts_of("持"), strings(&["扌", "寺", "土", "寸", "手"]));
    assert_eq!(matcher.parts_of("湖"), strings(&["氵", "十", "口", "月"]));
    assert!(matcher.parts_of("口").is_empty());
    assert!(DecompositionMatcher::new(&DecompositionStore::new(TableSet::default()))
        .parts_of("池")
        .is_empty());
}
