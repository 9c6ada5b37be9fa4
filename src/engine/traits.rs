use crate::{compound::Compound, types::SourceFilter};

/// Read-only compound lookups the search engine runs against.
///
/// Implementations hold no per-query state and may be shared across threads.
pub trait CompoundLookup: Send + Sync {
    /// Compounds with `low <= monoisotopic_mass <= high`, restricted to `sources`.
    /// No ordering guarantee.
    fn find_by_mass_range(&self, low: f64, high: f64, sources: &SourceFilter) -> Vec<&Compound>;

    /// Compounds whose canonical formula equals `formula`, restricted to `sources`.
    /// No ordering guarantee.
    fn find_by_formula(&self, formula: &str, sources: &SourceFilter) -> Vec<&Compound>;

    /// Compounds whose formula, uppercased, equals `key`, restricted to `sources`.
    /// No ordering guarantee.
    fn find_by_folded_formula(&self, key: &str, sources: &SourceFilter) -> Vec<&Compound>;
}
