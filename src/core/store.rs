use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::{
    compound::{Compound, RowDefect},
    engine::traits::CompoundLookup,
    formula,
    types::{Source, SourceFilter},
};

use super::indices::{MassIndex, VecIndex};

/// Summary of what a store holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    /// Number of compounds.
    pub total_compounds: usize,
    /// Compound count per source.
    pub by_source: BTreeMap<Source, usize>,
    /// Lightest monoisotopic mass, if any.
    pub min_mass: Option<f64>,
    /// Heaviest monoisotopic mass, if any.
    pub max_mass: Option<f64>,
}

/// Read-only compound table with a sorted mass index and a formula index.
///
/// Immutable once built, so a single instance can be shared across threads.
#[derive(Debug, Default)]
pub struct CompoundStore {
    compounds: Vec<Compound>,
    by_mass: MassIndex,
    by_formula: VecIndex<String>,
    by_folded_formula: VecIndex<String>,
    skipped: usize,
}

impl CompoundStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw rows.
    ///
    /// Rows that break a [`Compound`] invariant are dropped and counted.
    /// A blank name is replaced by the accession.
    /// Parseable formulas are rewritten to canonical form; the rest keep
    /// their trimmed text and remain reachable by mass only.
    pub fn from_compounds(rows: impl IntoIterator<Item = Compound>) -> Self {
        let mut compounds = Vec::new();
        let mut defects: BTreeMap<&'static str, usize> = BTreeMap::new();

        for mut row in rows {
            if let Err(defect) = row.validate() {
                *defects.entry(defect_label(defect)).or_default() += 1;
                continue;
            }
            if row.name.trim().is_empty() {
                row.name = row.id.clone();
            }
            row.formula = match formula::canonicalize(&row.formula) {
                Ok(canonical) => canonical,
                Err(_) => row.formula.trim().to_string(),
            };
            compounds.push(row);
        }

        let skipped: usize = defects.values().sum();
        if skipped > 0 {
            warn!(skipped, ?defects, "dropped compound rows that violate invariants");
        }

        let mut store = Self {
            by_mass: MassIndex::build(&compounds),
            compounds,
            skipped,
            ..Self::default()
        };
        store.build_formula_index();
        store
    }

    fn build_formula_index(&mut self) {
        for (pos, c) in self.compounds.iter().enumerate() {
            self.by_formula
                .entry(c.formula.clone())
                .or_default()
                .push(pos);
            self.by_folded_formula
                .entry(folded(&c.formula))
                .or_default()
                .push(pos);
        }
    }

    /// Number of compounds held.
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    /// True when the store holds no compounds.
    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    /// Rows rejected while building the store.
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    /// Every compound, in load order.
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Compounds with `low <= monoisotopic_mass <= high` admitted by `sources`.
    pub fn find_by_mass_range(&self, low: f64, high: f64, sources: &SourceFilter) -> Vec<&Compound> {
        self.by_mass
            .range(low, high)
            .iter()
            .map(|(_, pos)| &self.compounds[*pos])
            .filter(|c| sources.admits(c.source))
            .collect()
    }

    /// Compounds whose stored formula equals `formula` once whitespace is removed.
    pub fn find_by_formula(&self, formula: &str, sources: &SourceFilter) -> Vec<&Compound> {
        let key: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        self.by_formula
            .get(&key)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .map(|pos| &self.compounds[*pos])
            .filter(|c| sources.admits(c.source))
            .collect()
    }

    /// Compounds whose formula, uppercased and without whitespace, equals `key`.
    pub fn find_by_folded_formula(&self, key: &str, sources: &SourceFilter) -> Vec<&Compound> {
        self.by_folded_formula
            .get(&folded(key))
            .into_iter()
            .flat_map(|positions| positions.iter())
            .map(|pos| &self.compounds[*pos])
            .filter(|c| sources.admits(c.source))
            .collect()
    }

    /// Totals per source and the indexed mass span.
    pub fn stats(&self) -> StoreStats {
        let mut by_source = BTreeMap::new();
        for c in &self.compounds {
            *by_source.entry(c.source).or_insert(0) += 1;
        }
        StoreStats {
            total_compounds: self.compounds.len(),
            by_source,
            min_mass: self.by_mass.lightest(),
            max_mass: self.by_mass.heaviest(),
        }
    }
}

impl CompoundLookup for CompoundStore {
    fn find_by_mass_range(&self, low: f64, high: f64, sources: &SourceFilter) -> Vec<&Compound> {
        CompoundStore::find_by_mass_range(self, low, high, sources)
    }

    fn find_by_formula(&self, formula: &str, sources: &SourceFilter) -> Vec<&Compound> {
        CompoundStore::find_by_formula(self, formula, sources)
    }

    fn find_by_folded_formula(&self, key: &str, sources: &SourceFilter) -> Vec<&Compound> {
        CompoundStore::find_by_folded_formula(self, key, sources)
    }
}

fn folded(formula: &str) -> String {
    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}

fn defect_label(defect: RowDefect) -> &'static str {
    match defect {
        RowDefect::MissingId => "missing_id",
        RowDefect::MissingFormula => "missing_formula",
        RowDefect::BadMass => "bad_mass",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(id: &str, formula: &str, mass: f64, source: Source) -> Compound {
        Compound {
            id: id.to_string(),
            name: id.to_lowercase(),
            formula: formula.to_string(),
            monoisotopic_mass: mass,
            source,
            source_url: source.reference_url(id),
        }
    }

    fn sample() -> CompoundStore {
        CompoundStore::from_compounds(vec![
            compound("HMDB0000122", "C6H12O6", 180.063388, Source::Hmdb),
            compound("CHEBI:17234", "O6C6H12", 180.063388, Source::ChEbi),
            compound("HMDB0000660", "C6H12O6", 180.063388, Source::Hmdb),
            compound("LMFA01010001", "C16H32O2", 256.240230, Source::LipidMaps),
            compound("CHEBI:0000", "(C2H4O)n", 44.026215, Source::ChEbi),
            compound("BAD1", "C2H6O", 0.0, Source::Hmdb),
            compound("BAD2", "", 46.0, Source::Hmdb),
        ])
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let store = sample();
        assert_eq!(store.len(), 5);
        assert_eq!(store.skipped_rows(), 2);
    }

    #[test]
    fn formulas_are_canonicalised_on_load() {
        let store = sample();
        let hits = store.find_by_formula("C6H12O6", &SourceFilter::all());
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|c| c.formula == "C6H12O6"));

        let polymer = store.find_by_formula("(C2H4O)n", &SourceFilter::all());
        assert_eq!(polymer.len(), 1);
    }

    #[test]
    fn folded_index_ignores_case() {
        let store = sample();
        assert_eq!(store.find_by_folded_formula("C6H12O6", &SourceFilter::all()).len(), 3);
        assert_eq!(store.find_by_folded_formula("(c2h4o)N", &SourceFilter::all()).len(), 1);
        assert!(store.find_by_folded_formula("C6H12O7", &SourceFilter::all()).is_empty());
    }

    #[test]
    fn blank_name_falls_back_to_accession() {
        let mut nameless = compound("HMDB0000122", "C6H12O6", 180.063388, Source::Hmdb);
        nameless.name = "  ".to_string();
        let store = CompoundStore::from_compounds([nameless]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.skipped_rows(), 0);

        let hits = store.find_by_mass_range(180.0, 181.0, &SourceFilter::all());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "HMDB0000122");
    }

    #[test]
    fn mass_range_respects_source_filter() {
        let store = sample();
        let all = store.find_by_mass_range(180.0, 181.0, &SourceFilter::all());
        assert_eq!(all.len(), 3);

        let chebi = store.find_by_mass_range(180.0, 181.0, &SourceFilter::only([Source::ChEbi]));
        assert_eq!(chebi.len(), 1);
        assert_eq!(chebi[0].id, "CHEBI:17234");

        assert!(store.find_by_mass_range(300.0, 400.0, &SourceFilter::all()).is_empty());
    }

    #[test]
    fn stats_cover_sources_and_mass_span() {
        let stats = sample().stats();
        assert_eq!(stats.total_compounds, 5);
        assert_eq!(stats.by_source.get(&Source::Hmdb), Some(&2));
        assert_eq!(stats.by_source.get(&Source::ChEbi), Some(&2));
        assert_eq!(stats.by_source.get(&Source::LipidMaps), Some(&1));
        assert_eq!(stats.min_mass, Some(44.026215));
        assert_eq!(stats.max_mass, Some(256.240230));

        let empty = CompoundStore::new().stats();
        assert_eq!(empty.total_compounds, 0);
        assert_eq!(empty.min_mass, None);
    }
}
