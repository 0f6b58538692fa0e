// Kanji-Parts Region Filter
// Restricts ranked results to standard-use or historical character sets

use crate::types::Region;
use rustc_hash::{FxHashMap, FxHashSet};

/// Regional membership sets
#[derive(Debug, Clone, Default)]
pub struct RegionSets {
    /// Standard-use characters
    standard: FxHashSet<String>,

    /// Historical (old) form → modern form; the key set is the historical set
    historical: FxHashMap<String, String>,
}

impl RegionSets {
    pub fn new<I, M>(standard: I, historical: M) -> Self
    where
        I: IntoIterator<Item = String>,
        M: IntoIterator<Item = (String, String)>,
    {
        Self {
            standard: standard.into_iter().collect(),
            historical: historical.into_iter().collect(),
        }
    }

    pub fn is_standard(&self, symbol: &str) -> bool {
        self.standard.contains(symbol)
    }

    pub fn is_historical(&self, symbol: &str) -> bool {
        self.historical.contains_key(symbol)
    }

    /// Modern form of a historical character
    pub fn modern_form(&self, symbol: &str) -> Option<&str> {
        self.historical.get(symbol).map(String::as_str)
    }

    /// Check whether a character survives the given region
    #[inline]
    pub fn allows(&self, region: Region, symbol: &str) -> bool {
        match region {
            Region::Standard => self.is_standard(symbol),
            Region::Extended => self.is_standard(symbol) || self.is_historical(symbol),
            Region::Unrestricted => true,
        }
    }

    /// Drop disallowed items, keeping the order of the rest
    pub fn retain<T, F>(&self, region: Region, items: &mut Vec<T>, symbol: F)
    where
        F: Fn(&T) -> &str,
    {
        if region == Region::Unrestricted {
            return;
        }
        items.retain(|item| self.allows(region, symbol(item)));
    }

    /// Owned-list convenience over [`retain`](Self::retain)
    pub fn filter(&self, region: Region, mut symbols: Vec<String>) -> Vec<String> {
        self.retain(region, &mut symbols, |s| s.as_str());
        symbols
    }
}
