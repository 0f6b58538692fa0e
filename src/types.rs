// Kanji-Parts Type Definitions
// Core types for queries, search results and errors

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Search direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    /// Parts → character: find composites built from the given components
    /// Example: "水也" → 池
    #[default]
    #[value(name = "parts")]
    PartsToChar,

    /// Character → parts: list the components of the first character
    /// Example: "池" → 氵, 也
    #[value(name = "char")]
    CharToParts,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::PartsToChar => write!(f, "PartsToChar"),
            SearchMode::CharToParts => write!(f, "CharToParts"),
        }
    }
}

/// Region restriction applied to parts → character results
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Standard-use characters only
    #[default]
    Standard,
    /// Standard-use plus historical (old) forms
    Extended,
    /// No restriction
    Unrestricted,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Region::Standard => write!(f, "Standard"),
            Region::Extended => write!(f, "Extended"),
            Region::Unrestricted => write!(f, "Unrestricted"),
        }
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched character (composite or component)
    pub symbol: String,

    /// Relevance score in [0, 150] (only set when results were scored)
    pub score: Option<f64>,
}

impl SearchResult {
    /// Create a new unscored result
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            score: None,
        }
    }

    /// Set relevance score
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// A query reduced to the characters the engine works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Search direction
    pub mode: SearchMode,

    /// Region restriction
    pub region: Region,

    /// Han characters of the query, in typed order (duplicates kept)
    pub parts: Vec<String>,
}

impl ParsedQuery {
    /// True when no Han characters survived extraction
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Table loading errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected document shape in {path}: expected {expected}")]
    Shape { path: PathBuf, expected: &'static str },

    #[error("No pattern tables found under {path}")]
    NoPatternChunks { path: PathBuf },

    #[error("Snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Errors reported by the search worker handle
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Search worker is no longer running")]
    Disconnected,

    #[error("Failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),
}
