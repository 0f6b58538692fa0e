// Kanji-Parts Relevance Scorer
// Scores verified composites against the query and ranks them

use crate::matcher::Candidate;
use crate::query::{count_han, is_han};
use crate::store::DecompositionStore;
use crate::types::SearchResult;

/// Bonus for an alternative that starts with the query, in typed order
pub const EXACT_PREFIX_BONUS: f64 = 50.0;

/// Highest score an alternative can reach
pub const MAX_SCORE: f64 = 100.0 + EXACT_PREFIX_BONUS;

/// Score one alternative against the required parts
///
/// Match rate is the multiset intersection of the Han parts of `required`
/// with `alternative`, as a percentage of the Han leaves of `alternative`.
/// An alternative that begins with `required`, position by position, earns
/// [`EXACT_PREFIX_BONUS`]. Alternatives without Han leaves score 0.
///
/// # Examples
/// ```
/// # use kanji_parts::scorer::score_alternative;
/// let alt = vec!["日".to_string(), "月".to_string()];
/// let exact = score_alternative(&alt, &["日".to_string(), "月".to_string()]);
/// let swapped = score_alternative(&alt, &["月".to_string(), "日".to_string()]);
/// assert_eq!(exact, 150.0);
/// assert_eq!(swapped, 100.0);
/// ```
pub fn score_alternative(alternative: &[String], required: &[String]) -> f64 {
    let denom = count_han(alternative);
    if denom == 0 {
        return 0.0;
    }

    let mut match_count = 0;
    let mut counted: Vec<&str> = Vec::with_capacity(required.len());
    for part in required {
        if !is_han(part) || counted.contains(&part.as_str()) {
            continue;
        }
        counted.push(part);
        let wanted = required.iter().filter(|p| *p == part).count();
        let present = alternative.iter().filter(|a| *a == part).count();
        match_count += wanted.min(present);
    }

    let rate = match_count as f64 / denom as f64 * 100.0;
    let exact = alternative.len() >= required.len()
        && required.iter().zip(alternative).all(|(r, a)| r == a);

    rate + if exact { EXACT_PREFIX_BONUS } else { 0.0 }
}

/// Best score over every alternative and every verifying reading
pub fn score_candidate<A, R>(alternatives: &[A], readings: &[R]) -> f64
where
    A: AsRef<[String]>,
    R: AsRef<[String]>,
{
    let mut best = 0.0_f64;
    for alt in alternatives {
        for reading in readings {
            best = best.max(score_alternative(alt.as_ref(), reading.as_ref()));
        }
    }
    best
}

/// Scores and orders verified candidates
pub struct Ranker<'a> {
    store: &'a DecompositionStore,
}

impl<'a> Ranker<'a> {
    pub fn new(store: &'a DecompositionStore) -> Self {
        Self { store }
    }

    /// Score every candidate and sort by descending score
    ///
    /// The sort is stable: equal scores keep the order the matcher
    /// discovered them in, which is fixed for a given dataset and query.
    pub fn rank(&self, candidates: Vec<Candidate>) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = candidates
            .into_iter()
            .map(|candidate| {
                let alternatives = self.store.alternatives(&candidate.symbol);
                let score = score_candidate(&*alternatives, &candidate.readings);
                SearchResult::new(candidate.symbol).with_score(score)
            })
            .collect();

        results.sort_by(|a, b| {
            let score_a = a.score.unwrap_or(0.0);
            let score_b = b.score.unwrap_or(0.0);
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results
    }
}
