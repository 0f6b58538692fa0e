// Kanji-Parts Combination Generator
// Picks one representative per query position from its equivalence class

/// Cartesian product of per-position choices
///
/// Combinations come out in lexicographic order of position choices: the
/// last position varies fastest. An empty input has no combinations, and a
/// single position is returned as one-element combinations directly.
///
/// The output grows as the product of class sizes, so a long query with
/// many variant classes explodes; bound it with [`combination_count`] first.
///
/// # Examples
/// ```
/// # use kanji_parts::combination::combinations;
/// let positions = vec![vec!["水", "氵"], vec!["也"]];
/// assert_eq!(
///     combinations(&positions),
///     vec![vec!["水", "也"], vec!["氵", "也"]]
/// );
/// ```
pub fn combinations<T: Clone>(positions: &[Vec<T>]) -> Vec<Vec<T>> {
    match positions {
        [] => Vec::new(),
        [only] => only.iter().map(|choice| vec![choice.clone()]).collect(),
        _ => {
            let total = combination_count(positions)
                .unwrap_or(MAX_COMBINATIONS)
                .min(MAX_COMBINATIONS);
            let mut out: Vec<Vec<T>> = vec![Vec::with_capacity(positions.len())];
            for choices in positions {
                let mut next = Vec::with_capacity(total);
                for prefix in &out {
                    for choice in choices {
                        let mut combo = prefix.clone();
                        combo.push(choice.clone());
                        next.push(combo);
                    }
                }
                out = next;
            }
            out
        }
    }
}

/// Default ceiling on the combinations one query may expand into
///
/// Callers check [`combination_count`] against a ceiling before calling
/// [`combinations`]; the output is never truncated here.
pub const MAX_COMBINATIONS: usize = 4096;

/// Number of combinations [`combinations`] would produce
///
/// `None` when the product does not fit in a `usize`.
pub fn combination_count<T>(positions: &[Vec<T>]) -> Option<usize> {
    if positions.is_empty() {
        return Some(0);
    }
    positions
        .iter()
        .try_fold(1usize, |acc, choices| acc.checked_mul(choices.len()))
}
