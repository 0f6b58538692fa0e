//! # Kanji-Parts: Kanji Decomposition Search Engine
//!
//! Find kanji from the components they are built of, and list the
//! components of a kanji, over decomposition and variant tables.
//!
//! ## Two Search Modes
//!
//! 1. **Parts → character** - Composites containing every typed part
//!    - `search("水也", ..)` - 池, through the 氵/水 variant pair
//!    - Repeated parts count: `口口口` finds 品 and 器 but not 呂
//! 2. **Character → parts** - Components of the first typed character
//!    - `search("池", ..)` - 氵, 也, 水
//!
//! ## Regions
//!
//! Parts → character results can be restricted to standard-use characters
//! (`Standard`), standard-use plus historical forms (`Extended`), or left
//! unrestricted.
//!
//! ## Example Usage
//!
//! ```no_run
//! use kanji_parts::{KanjiSearch, Region, SearchMode};
//! use std::path::Path;
//!
//! let (search, info) = KanjiSearch::load(Path::new("data/sample"))?;
//! println!("{} decompositions", info.direct_entries);
//!
//! // Parts → character
//! let results = search.search("水也", SearchMode::PartsToChar, Region::Standard);
//!
//! // Character → parts
//! let parts = search.search("池", SearchMode::CharToParts, Region::Standard);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **Data Loader** - Reads and validates the JSON tables, or a snapshot
//! - **Decomposition Store** - Immutable tables, inverted index, flatten cache
//! - **Variant Resolver** - Equivalence classes of orthographic variants
//! - **Decomposition Matcher** - Shortlisting and count-aware verification
//! - **Ranker** - Match rate plus exact-prefix bonus
//! - **Region Filter** - Standard / Extended / Unrestricted
//! - **KanjiSearch API** - Main entry point combining all components
//! - **Search Worker** - The engine on its own thread, newest query wins

pub mod combination;
pub mod data;
pub mod details;
pub mod matcher;
pub mod query;
pub mod region;
pub mod scorer;
pub mod search;
pub mod store;
pub mod types;
pub mod variant;
pub mod worker;

// Re-export main types and functions for convenience
pub use combination::combinations;
pub use data::{DataConfig, DataInfo, DataLoader, TableSet, VariantTable};
pub use details::CharacterDetails;
pub use matcher::{contains_multiset, Candidate, DecompositionMatcher};
pub use query::{extract_han, is_han, parse_query};
pub use region::RegionSets;
pub use scorer::{score_alternative, Ranker};
pub use search::{EngineConfig, KanjiSearch};
pub use store::DecompositionStore;
pub use types::{DataError, ParsedQuery, Region, SearchMode, SearchResult, WorkerError};
pub use variant::VariantResolver;
pub use worker::{Reply, Request, SearchWorker, WorkerCore, WorkerState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
