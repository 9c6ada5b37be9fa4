//! Search query model and boundary validation.

use crate::{
    adduct::Adduct,
    error::{LookupError, LookupResult},
    formula,
    types::SourceFilter,
};

/// Tolerance applied when a mass query does not set one (Da).
pub const DEFAULT_TOLERANCE_DA: f64 = 0.5;

/// What a query matches on.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// Match compounds whose neutral mass falls within a window.
    Mass {
        /// Observed m/z, or neutral mass when `adduct` is [`Adduct::Neutral`].
        observed_value: f64,
        /// Ion species the observed value belongs to.
        adduct: Adduct,
        /// Half-width of the window in Da.
        tolerance_da: f64,
    },
    /// Match compounds with exactly this elemental composition.
    Formula {
        /// Formula text as entered by the user.
        formula: String,
    },
}

/// Immutable input to one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Mass or formula parameters.
    pub mode: SearchMode,
    /// Sources to include. Empty means all.
    pub source_filter: SourceFilter,
    /// Keep at most this many ranked results.
    pub limit: Option<usize>,
}

impl SearchQuery {
    /// Mass query with the default tolerance over every source.
    pub fn mass(observed_value: f64, adduct: Adduct) -> Self {
        Self {
            mode: SearchMode::Mass {
                observed_value,
                adduct,
                tolerance_da: DEFAULT_TOLERANCE_DA,
            },
            source_filter: SourceFilter::all(),
            limit: None,
        }
    }

    /// Formula query over every source.
    pub fn formula(formula: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::Formula {
                formula: formula.into(),
            },
            source_filter: SourceFilter::all(),
            limit: None,
        }
    }

    /// Replaces the tolerance of a mass query. No effect on formula queries.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        if let SearchMode::Mass { tolerance_da, .. } = &mut self.mode {
            *tolerance_da = tolerance;
        }
        self
    }

    /// Restricts the query to `filter`.
    pub fn with_sources(mut self, filter: SourceFilter) -> Self {
        self.source_filter = filter;
        self
    }

    /// Caps the number of returned results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks every precondition and resolves the query into store terms.
    pub fn validate(&self) -> LookupResult<ValidQuery> {
        if self.limit == Some(0) {
            return Err(LookupError::InvalidQuery(
                "result limit must be at least 1".to_string(),
            ));
        }

        match &self.mode {
            SearchMode::Mass {
                observed_value,
                adduct,
                tolerance_da,
            } => {
                if !observed_value.is_finite() || *observed_value <= 0.0 {
                    return Err(LookupError::InvalidQuery(format!(
                        "observed value must be a positive number, got {observed_value}"
                    )));
                }
                if !tolerance_da.is_finite() || *tolerance_da <= 0.0 {
                    return Err(LookupError::InvalidQuery(format!(
                        "tolerance must be a positive number of Da, got {tolerance_da}"
                    )));
                }
                Ok(ValidQuery::Mass {
                    observed_value: *observed_value,
                    adduct: *adduct,
                    tolerance_da: *tolerance_da,
                })
            }
            SearchMode::Formula { formula } => match formula::canonicalize(formula) {
                Ok(canonical) => Ok(ValidQuery::Formula { canonical }),
                Err(err) => formula::folded_key(formula)
                    .map(|key| ValidQuery::FoldedFormula { key })
                    .ok_or(err),
            },
        }
    }
}

/// Query whose preconditions hold, with the formula already canonical.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidQuery {
    /// Validated mass parameters.
    Mass {
        /// Strictly positive observed value.
        observed_value: f64,
        /// Ion species.
        adduct: Adduct,
        /// Strictly positive tolerance.
        tolerance_da: f64,
    },
    /// Canonical formula text.
    Formula {
        /// Hill-ordered formula.
        canonical: String,
    },
    /// All-lowercase formula text, matched case-insensitively.
    FoldedFormula {
        /// Uppercased, whitespace-free text.
        key: String,
    },
}
