// Kanji-Parts Data Loader
// Loads decomposition, variant and region tables from JSON files or a binary snapshot

use crate::types::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Orthographic variant table, stored in both directions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantTable {
    /// Variant form → base forms
    #[serde(rename = "byVariant", default)]
    pub by_variant: BTreeMap<String, Vec<String>>,

    /// Base form → variant forms
    #[serde(rename = "byBase", default)]
    pub by_base: BTreeMap<String, Vec<String>>,
}

impl VariantTable {
    /// Number of entries across both directions
    pub fn len(&self) -> usize {
        self.by_variant.len() + self.by_base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_variant.is_empty() && self.by_base.is_empty()
    }
}

/// Readings attached to a standard-use character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    #[serde(default)]
    pub on_yomi: Vec<String>,
    #[serde(default)]
    pub kun_yomi: Vec<String>,
}

/// One entry of the standard-use table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardEntry {
    /// The standard-use character
    #[serde(rename = "joyo_kanji")]
    pub symbol: String,

    #[serde(default)]
    pub yomi: Readings,
}

/// All tables the engine is initialized with
///
/// Ordered maps keep every derived index deterministic for a fixed dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSet {
    /// Composite → immediate components
    pub direct: BTreeMap<String, Vec<String>>,

    /// Composite → alternative leaf sequences
    pub patterns: BTreeMap<String, Vec<Vec<String>>>,

    pub variants: VariantTable,

    /// Standard-use characters with their readings
    pub standard: Vec<StandardEntry>,

    /// Historical (old) form → modern form
    pub historical: BTreeMap<String, String>,
}

impl TableSet {
    /// Merge pattern chunks in order; later chunks replace earlier keys
    pub fn merge_patterns<I>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = BTreeMap<String, Vec<Vec<String>>>>,
    {
        for chunk in chunks {
            self.patterns.extend(chunk);
        }
    }

    /// Encode the tables as a bincode snapshot
    pub fn to_snapshot(&self) -> Result<Vec<u8>, DataError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode tables from a bincode snapshot
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, DataError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Write a bincode snapshot to disk
    pub fn save_snapshot(&self, path: &Path) -> Result<(), DataError> {
        let bytes = self.to_snapshot()?;
        fs::write(path, bytes).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a bincode snapshot from disk
    pub fn load_snapshot(path: &Path) -> Result<Self, DataError> {
        let bytes = fs::read(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::from_snapshot(&bytes)?;
        tracing::info!(path = %path.display(), "loaded table snapshot");
        Ok(tables)
    }
}

/// File layout of a data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Direct (one-level) decomposition table
    pub direct_file: PathBuf,

    /// Directory of pattern chunk files, merged in file-name order
    pub pattern_dir: PathBuf,

    /// Single-file pattern table, merged before the chunks when present
    pub pattern_file: PathBuf,

    pub variants_file: PathBuf,
    pub standard_file: PathBuf,
    pub historical_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            direct_file: PathBuf::from("direct_decomp.json"),
            pattern_dir: PathBuf::from("pattern_chunks"),
            pattern_file: PathBuf::from("pattern_decomp.json"),
            variants_file: PathBuf::from("variants.json"),
            standard_file: PathBuf::from("joyo2010.json"),
            historical_file: PathBuf::from("old_to_new_kanjis.json"),
        }
    }
}

impl DataConfig {
    /// Read a layout override from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let text = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Information about loaded tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataInfo {
    /// Entries in the direct decomposition table
    pub direct_entries: usize,
    /// Entries in the merged pattern table
    pub pattern_entries: usize,
    /// Pattern files merged
    pub pattern_chunks: usize,
    /// Variant entries across both directions
    pub variant_entries: usize,
    pub standard_entries: usize,
    pub historical_entries: usize,
    /// Structurally invalid entries dropped while loading
    pub skipped: usize,
}

impl DataInfo {
    /// Sizes of an already assembled table set
    pub fn of(tables: &TableSet) -> Self {
        Self {
            direct_entries: tables.direct.len(),
            pattern_entries: tables.patterns.len(),
            pattern_chunks: 0,
            variant_entries: tables.variants.len(),
            standard_entries: tables.standard.len(),
            historical_entries: tables.historical.len(),
            skipped: 0,
        }
    }
}

/// Loads a [`TableSet`] from a data directory
///
/// Direct and pattern tables are required. Variant, standard-use and
/// historical tables are optional and load as empty when their file is absent.
/// Entries with an unexpected shape are dropped and counted in
/// [`DataInfo::skipped`].
pub struct DataLoader {
    root: PathBuf,
    config: DataConfig,
}

impl DataLoader {
    /// Loader for a data directory with the default file layout
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, DataConfig::default())
    }

    /// Loader with a custom file layout
    pub fn with_config(root: impl Into<PathBuf>, config: DataConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load and validate every table
    pub fn load(&self) -> Result<(TableSet, DataInfo), DataError> {
        let mut skipped = 0;
        let mut tables = TableSet::default();

        let direct_path = self.root.join(&self.config.direct_file);
        let direct = read_object(&direct_path)?;
        tables.direct = string_list_map(direct, &direct_path, &mut skipped);

        let chunk_paths = self.pattern_sources()?;
        let mut chunks = Vec::with_capacity(chunk_paths.len());
        for path in &chunk_paths {
            let doc = read_object(path)?;
            chunks.push(pattern_map(doc, path, &mut skipped));
        }
        tables.merge_patterns(chunks);

        let variants_path = self.root.join(&self.config.variants_file);
        if let Some(doc) = read_optional_object(&variants_path)? {
            tables.variants = variant_table(doc, &variants_path, &mut skipped);
        }

        let standard_path = self.root.join(&self.config.standard_file);
        if let Some(doc) = read_optional_object(&standard_path)? {
            tables.standard = standard_entries(doc, &standard_path, &mut skipped);
        }

        let historical_path = self.root.join(&self.config.historical_file);
        if let Some(doc) = read_optional_object(&historical_path)? {
            tables.historical = string_map(doc, &historical_path, &mut skipped);
        }

        let info = DataInfo {
            pattern_chunks: chunk_paths.len(),
            skipped,
            ..DataInfo::of(&tables)
        };

        tracing::info!(
            root = %self.root.display(),
            direct = info.direct_entries,
            patterns = info.pattern_entries,
            chunks = info.pattern_chunks,
            variants = info.variant_entries,
            standard = info.standard_entries,
            historical = info.historical_entries,
            skipped = info.skipped,
            "loaded decomposition tables"
        );

        Ok((tables, info))
    }

    /// Pattern files in merge order: the single file first, then sorted chunks
    fn pattern_sources(&self) -> Result<Vec<PathBuf>, DataError> {
        let mut sources = Vec::new();

        let single = self.root.join(&self.config.pattern_file);
        if single.is_file() {
            sources.push(single);
        }

        let dir = self.root.join(&self.config.pattern_dir);
        if dir.is_dir() {
            let entries = fs::read_dir(&dir).map_err(|source| DataError::Io {
                path: dir.clone(),
                source,
            })?;
            let mut chunks = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| DataError::Io {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    chunks.push(path);
                }
            }
            chunks.sort();
            sources.extend(chunks);
        }

        if sources.is_empty() {
            return Err(DataError::NoPatternChunks { path: dir });
        }
        Ok(sources)
    }
}

fn read_object(path: &Path) -> Result<serde_json::Map<String, Value>, DataError> {
    let text = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DataError::Shape {
            path: path.to_path_buf(),
            expected: "a JSON object",
        }),
    }
}

fn read_optional_object(
    path: &Path,
) -> Result<Option<serde_json::Map<String, Value>>, DataError> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "optional table missing, using empty table");
        return Ok(None);
    }
    read_object(path).map(Some)
}

/// A non-empty array of non-empty strings
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) if !s.is_empty() => out.push(s.to_string()),
            _ => return None,
        }
    }
    Some(out)
}

fn skip(path: &Path, key: &str, skipped: &mut usize) {
    *skipped += 1;
    tracing::warn!(path = %path.display(), key, "skipping malformed table entry");
}

fn string_list_map(
    doc: serde_json::Map<String, Value>,
    path: &Path,
    skipped: &mut usize,
) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for (key, value) in doc {
        match string_list(&value) {
            Some(list) if !key.is_empty() => {
                out.insert(key, list);
            }
            _ => skip(path, &key, skipped),
        }
    }
    out
}

fn pattern_map(
    doc: serde_json::Map<String, Value>,
    path: &Path,
    skipped: &mut usize,
) -> BTreeMap<String, Vec<Vec<String>>> {
    let mut out = BTreeMap::new();
    for (key, value) in doc {
        let alternatives = value
            .as_array()
            .and_then(|alts| alts.iter().map(string_list).collect::<Option<Vec<_>>>());
        match alternatives {
            Some(alts) if !key.is_empty() => {
                out.insert(key, alts);
            }
            _ => skip(path, &key, skipped),
        }
    }
    out
}

fn variant_table(
    mut doc: serde_json::Map<String, Value>,
    path: &Path,
    skipped: &mut usize,
) -> VariantTable {
    let mut direction = |name: &str| match doc.remove(name) {
        Some(Value::Object(map)) => string_list_map(map, path, skipped),
        Some(_) => {
            skip(path, name, skipped);
            BTreeMap::new()
        }
        None => BTreeMap::new(),
    };
    let by_variant = direction("byVariant");
    let by_base = direction("byBase");
    VariantTable {
        by_variant,
        by_base,
    }
}

fn standard_entries(
    doc: serde_json::Map<String, Value>,
    path: &Path,
    skipped: &mut usize,
) -> Vec<StandardEntry> {
    let mut out = Vec::with_capacity(doc.len());
    for (key, value) in doc {
        match serde_json::from_value::<StandardEntry>(value) {
            Ok(entry) if !entry.symbol.is_empty() => out.push(entry),
            _ => skip(path, &key, skipped),
        }
    }
    out
}

fn string_map(
    doc: serde_json::Map<String, Value>,
    path: &Path,
    skipped: &mut usize,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (key, value) in doc {
        match value.as_str() {
            Some(s) if !s.is_empty() && !key.is_empty() => {
                out.insert(key, s.to_string());
            }
            _ => skip(path, &key, skipped),
        }
    }
    out
}

/// Small hand-built dataset shared by unit tests
#[cfg(test)]
pub(crate) fn fixture() -> TableSet {
    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    let direct: &[(&str, &[&str])] = &[
        ("池", &["氵", "也"]),
        ("地", &["土", "也"]),
        ("他", &["亻", "也"]),
        ("品", &["口", "口", "口"]),
        ("呂", &["口", "口"]),
        ("器", &["口", "口", "犬", "口", "口"]),
        ("解", &["角", "刀", "牛"]),
        ("明", &["日", "月"]),
        ("林", &["木", "木"]),
        ("森", &["木", "木", "木"]),
        ("休", &["亻", "木"]),
        ("沐", &["氵", "木"]),
        ("汁", &["氵", "十"]),
        ("沒", &["氵", "殳"]),
    ];
    let patterns: &[(&str, &[&[&str]])] = &[
        ("池", &[&["氵", "也"], &["水", "也"]]),
        ("地", &[&["土", "也"]]),
        ("他", &[&["亻", "也"], &["人", "也"]]),
        ("品", &[&["口", "口", "口"]]),
        ("呂", &[&["口", "口"]]),
        ("器", &[&["口", "口", "犬", "口", "口"]]),
        ("解", &[&["角", "刀", "牛"]]),
        ("明", &[&["日", "月"]]),
        ("林", &[&["木", "木"]]),
        ("森", &[&["木", "木", "木"]]),
        ("休", &[&["亻", "木"], &["人", "木"]]),
        ("沐", &[&["氵", "木"]]),
        ("汁", &[&["氵", "十"]]),
        ("沒", &[&["氵", "殳"]]),
        ("㗊", &[&["口", "口", "口", "口"]]),
    ];
    let standard = [
        "池", "地", "他", "品", "器", "解", "明", "林", "森", "休", "汁", "也", "口", "木",
        "水", "人", "日", "月",
    ];

    let mut tables = TableSet::default();
    for (k, v) in direct {
        tables.direct.insert(k.to_string(), seq(v));
    }
    for (k, alts) in patterns {
        tables
            .patterns
            .insert(k.to_string(), alts.iter().map(|a| seq(a)).collect());
    }
    tables.variants.by_variant.insert("氵".into(), seq(&["水"]));
    tables.variants.by_variant.insert("亻".into(), seq(&["人"]));
    tables.variants.by_base.insert("水".into(), seq(&["氵"]));
    tables.variants.by_base.insert("人".into(), seq(&["亻"]));
    tables.standard = standard
        .iter()
        .map(|s| StandardEntry {
            symbol: s.to_string(),
            yomi: Readings::default(),
        })
        .collect();
    tables.historical.insert("沒".into(), "没".into());
    tables
}
