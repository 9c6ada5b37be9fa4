//! Compound record loaded from the consolidated table.

use serde::{Deserialize, Serialize};

use crate::types::{CompoundId, Source};

/// One row of the consolidated compound table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    /// Accession, unique within `source`.
    pub id: CompoundId,
    /// Display name. Falls back to `id` when the row has none.
    pub name: String,
    /// Canonical molecular formula (raw trimmed text when it could not be parsed).
    pub formula: String,
    /// Neutral monoisotopic mass in Da.
    pub monoisotopic_mass: f64,
    /// Origin database.
    pub source: Source,
    /// Reference link, passed through untouched.
    pub source_url: String,
}

/// Reason a raw row cannot become a [`Compound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDefect {
    /// Missing accession.
    MissingId,
    /// Missing or blank formula.
    MissingFormula,
    /// Mass absent, non-finite, or not positive.
    BadMass,
}

impl Compound {
    /// Checks the row invariants every loaded compound satisfies.
    pub fn validate(&self) -> Result<(), RowDefect> {
        if self.id.trim().is_empty() {
            return Err(RowDefect::MissingId);
        }
        if self.formula.trim().is_empty() {
            return Err(RowDefect::MissingFormula);
        }
        if !self.monoisotopic_mass.is_finite() || self.monoisotopic_mass <= 0.0 {
            return Err(RowDefect::BadMass);
        }
        Ok(())
    }
}
