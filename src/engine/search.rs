use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::{
    adduct::{self, Adduct},
    compound::Compound,
    error::LookupResult,
    query::{SearchQuery, ValidQuery},
    types::SourceFilter,
};

use super::traits::CompoundLookup;

/// Mass-mode context attached to each result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassMatch {
    /// Value the user entered.
    pub observed_value: f64,
    /// Adduct the observed value was interpreted as.
    pub adduct: Adduct,
    /// Neutral mass the window was centred on.
    pub target_neutral_mass: f64,
    /// `compound mass - target neutral mass`. Negative means the candidate is lighter.
    pub mass_error_da: f64,
    /// `mass_error_da` relative to the target, in parts per million.
    /// `None` when the target neutral mass is not positive.
    pub ppm_error: Option<f64>,
}

/// One matching compound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Matched row, passed through unchanged.
    #[serde(flatten)]
    pub compound: Compound,
    /// Present for mass searches, absent for formula searches.
    pub mass_match: Option<MassMatch>,
}

impl SearchResult {
    /// Signed mass error in Da, `None` for formula searches.
    pub fn mass_error_da(&self) -> Option<f64> {
        self.mass_match.as_ref().map(|m| m.mass_error_da)
    }

    /// Mass error in ppm, `None` for formula searches or a non-positive target.
    pub fn ppm_error(&self) -> Option<f64> {
        self.mass_match.as_ref().and_then(|m| m.ppm_error)
    }
}

/// Runs queries against a shared, read-only compound lookup.
pub struct SearchEngine<'s, S: CompoundLookup + ?Sized> {
    store: &'s S,
}

impl<'s, S: CompoundLookup + ?Sized> SearchEngine<'s, S> {
    /// Engine over `store`.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Validates `query`, runs it and returns the ranked matches.
    ///
    /// Validation happens before any lookup. An empty vector means no match.
    pub fn search(&self, query: &SearchQuery) -> LookupResult<Vec<SearchResult>> {
        let mut results = match query.validate()? {
            ValidQuery::Mass {
                observed_value,
                adduct,
                tolerance_da,
            } => self.search_mass(observed_value, adduct, tolerance_da, &query.source_filter),
            ValidQuery::Formula { canonical } => self.search_formula(
                self.store.find_by_formula(&canonical, &query.source_filter),
            ),
            ValidQuery::FoldedFormula { key } => {
                debug!(%key, "formula has no capitals, matching case-insensitively");
                self.search_formula(self.store.find_by_folded_formula(&key, &query.source_filter))
            }
        };

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        debug!(matches = results.len(), mode = ?query.mode, "search complete");
        Ok(results)
    }

    fn search_mass(
        &self,
        observed_value: f64,
        adduct: Adduct,
        tolerance_da: f64,
        sources: &SourceFilter,
    ) -> Vec<SearchResult> {
        let target = adduct::observed_to_neutral(observed_value, adduct);
        let (low, high) = (target - tolerance_da, target + tolerance_da);

        let mut results: Vec<SearchResult> = self
            .store
            .find_by_mass_range(low, high, sources)
            .into_iter()
            .map(|c| {
                let mass_error_da = c.monoisotopic_mass - target;
                SearchResult {
                    compound: c.clone(),
                    mass_match: Some(MassMatch {
                        observed_value,
                        adduct,
                        target_neutral_mass: target,
                        mass_error_da,
                        ppm_error: (target > 0.0).then(|| mass_error_da / target * 1e6),
                    }),
                }
            })
            .collect();

        results.sort_by(|a, b| {
            let ea = a.mass_error_da().unwrap_or_default().abs();
            let eb = b.mass_error_da().unwrap_or_default().abs();
            ea.total_cmp(&eb)
                .then_with(|| tie_break(&a.compound, &b.compound))
        });
        results
    }

    fn search_formula(&self, hits: Vec<&Compound>) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .map(|c| SearchResult {
                compound: c.clone(),
                mass_match: None,
            })
            .collect();
        results.sort_by(|a, b| tie_break(&a.compound, &b.compound));
        results
    }
}

// Source, then name, then id, so equal-error rows come back in a fixed order.
fn tie_break(a: &Compound, b: &Compound) -> Ordering {
    a.source
        .cmp(&b.source)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Runs `query` against `store`. Shorthand for [`SearchEngine::search`].
pub fn search<S: CompoundLookup + ?Sized>(
    store: &S,
    query: &SearchQuery,
) -> LookupResult<Vec<SearchResult>> {
    SearchEngine::new(store).search(query)
}
