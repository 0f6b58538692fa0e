// Kanji-Parts Variant Resolver
// Expands a character into its orthographic equivalence class

use crate::data::VariantTable;

/// Resolves characters against the variant table
#[derive(Debug, Clone, Copy)]
pub struct VariantResolver<'a> {
    table: &'a VariantTable,
}

impl<'a> VariantResolver<'a> {
    pub fn new(table: &'a VariantTable) -> Self {
        Self { table }
    }

    /// Equivalence class of a symbol
    ///
    /// The symbol itself always comes first, followed by its base forms, its
    /// own variants, and finally the other variants of each base, with
    /// duplicates removed. Every member of a base/variant group therefore
    /// resolves to the same set. Unknown symbols resolve to themselves.
    ///
    /// # Examples
    /// ```
    /// # use kanji_parts::data::VariantTable;
    /// # use kanji_parts::variant::VariantResolver;
    /// let mut table = VariantTable::default();
    /// table.by_variant.insert("氵".into(), vec!["水".into()]);
    /// table.by_base.insert("水".into(), vec!["氵".into()]);
    ///
    /// let resolver = VariantResolver::new(&table);
    /// assert_eq!(resolver.variants_of("氵"), vec!["氵", "水"]);
    /// assert_eq!(resolver.variants_of("水"), vec!["水", "氵"]);
    /// assert_eq!(resolver.variants_of("也"), vec!["也"]);
    /// ```
    pub fn variants_of(&self, symbol: &str) -> Vec<String> {
        let mut class = vec![symbol.to_string()];
        let mut push = |s: &String| {
            if !class.contains(s) {
                class.push(s.clone());
            }
        };

        let bases = self.table.by_variant.get(symbol);
        for base in bases.into_iter().flatten() {
            push(base);
        }
        for variant in self.table.by_base.get(symbol).into_iter().flatten() {
            push(variant);
        }
        for base in bases.into_iter().flatten() {
            for sibling in self.table.by_base.get(base).into_iter().flatten() {
                push(sibling);
            }
        }
        class
    }

    /// Canonical (base) form: the first registered base, or the symbol itself
    pub fn canonical<'s>(&self, symbol: &'s str) -> &'s str
    where
        'a: 's,
    {
        match self.table.by_variant.get(symbol).and_then(|bases| bases.first()) {
            Some(base) => base.as_str(),
            None => symbol,
        }
    }

    /// Check whether two symbols share an equivalence class
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        a == b || self.variants_of(a).iter().any(|s| s == b)
    }
}
