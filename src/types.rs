//! Shared primitive IDs, source tags, and ion polarity.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Accession of a compound inside its source database (e.g. `HMDB0000122`).
pub type CompoundId = String;

/// Origin database of a compound row.
///
/// Declaration order is the tie-break order used when ranking results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Human Metabolome Database.
    #[serde(rename = "HMDB")]
    Hmdb,
    /// Chemical Entities of Biological Interest.
    #[serde(rename = "ChEBI")]
    ChEbi,
    /// LIPID MAPS Structure Database.
    #[serde(rename = "LipidMaps")]
    LipidMaps,
}

impl Source {
    /// Every known source, in tie-break order.
    pub const ALL: [Source; 3] = [Source::Hmdb, Source::ChEbi, Source::LipidMaps];

    /// Tag as stored in the `source_database` column.
    pub fn tag(self) -> &'static str {
        match self {
            Source::Hmdb => "HMDB",
            Source::ChEbi => "ChEBI",
            Source::LipidMaps => "LipidMaps",
        }
    }

    /// Reference page for `id` when the row carries no explicit URL.
    pub fn reference_url(self, id: &str) -> String {
        match self {
            Source::Hmdb => format!("https://hmdb.ca/metabolites/{id}"),
            Source::ChEbi => format!("https://www.ebi.ac.uk/chebi/searchId.do?chebiId={id}"),
            Source::LipidMaps => format!("https://www.lipidmaps.org/databases/lmsd/{id}"),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Source {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmdb" => Ok(Source::Hmdb),
            "chebi" => Ok(Source::ChEbi),
            "lipidmaps" | "lipid_maps" | "lmsd" => Ok(Source::LipidMaps),
            other => Err(LookupError::InvalidQuery(format!(
                "unknown source database `{other}`"
            ))),
        }
    }
}

/// Ion polarity of an adduct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IonMode {
    /// Cations, `[M+X]+`.
    Positive,
    /// Anions, `[M-X]-` / `[M+X]-`.
    Negative,
}

/// Set of sources a search is restricted to. Empty means every source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilter {
    sources: HashSet<Source>,
}

impl SourceFilter {
    /// Filter that admits every source.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter restricted to `sources`.
    pub fn only(sources: impl IntoIterator<Item = Source>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    /// True when no restriction applies.
    pub fn is_unrestricted(&self) -> bool {
        self.sources.is_empty()
    }

    /// True when rows from `source` pass the filter.
    pub fn admits(&self, source: Source) -> bool {
        self.sources.is_empty() || self.sources.contains(&source)
    }
}

impl FromIterator<Source> for SourceFilter {
    fn from_iter<T: IntoIterator<Item = Source>>(iter: T) -> Self {
        Self::only(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tags_parse_case_insensitively() {
        assert_eq!("HMDB".parse::<Source>().unwrap(), Source::Hmdb);
        assert_eq!("chebi".parse::<Source>().unwrap(), Source::ChEbi);
        assert_eq!(" LipidMaps ".parse::<Source>().unwrap(), Source::LipidMaps);
        assert!("KEGG".parse::<Source>().is_err());
    }

    #[test]
    fn empty_filter_admits_everything() {
        let filter = SourceFilter::all();
        assert!(Source::ALL.iter().all(|s| filter.admits(*s)));

        let hmdb = SourceFilter::only([Source::Hmdb]);
        assert!(hmdb.admits(Source::Hmdb));
        assert!(!hmdb.admits(Source::LipidMaps));
    }
}
