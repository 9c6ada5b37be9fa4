//! Query orchestration over a compound lookup.

/// Mass and formula search with ranking.
pub mod search;
/// Store seam consumed by the search engine.
pub mod traits;
