//! Molecular formula grammar and Hill-order canonicalisation.
//!
//! ```text
//! Formula = Term , { Term } ;
//! Term    = Element , [ Count ] ;
//! Element = uppercase , [ lowercase ] ;
//! Count   = digit - "0" , { digit } ;
//! ```
//!
//! Symbols are case-sensitive (`Co` is cobalt, `CO` is carbon + oxygen) and
//! must name a known element. Whitespace is ignored, repeated elements are
//! summed, and the canonical rendering puts C then H first followed by the
//! rest alphabetically (alphabetical throughout when there is no carbon).
//! A count of one is omitted.
//!
//! Input with no uppercase letter at all (`c6h12o6`) cannot be read under
//! the case-sensitive grammar. [`folded_key`] accepts it when some split
//! into element symbols exists and returns an uppercase key that is
//! compared against uppercased stored formulas.

use std::collections::BTreeMap;
use std::fmt;

use nom::{
    IResult,
    character::complete::{char, satisfy, u32 as digits},
    combinator::{all_consuming, not, opt, recognize},
    multi::many1,
    sequence::{pair, preceded},
};

use crate::error::{LookupError, LookupResult};

const ELEMENTS: [&str; 120] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og", "D", "T",
];

fn lookup_element(symbol: &str) -> Option<&'static str> {
    ELEMENTS.iter().copied().find(|e| *e == symbol)
}

/// Parsed elemental composition in canonical (Hill) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula {
    counts: Vec<(&'static str, u32)>,
}

impl Formula {
    /// Parses `text` against the formula grammar.
    pub fn parse(text: &str) -> LookupResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(LookupError::InvalidQuery("formula is empty".to_string()));
        }

        let (_, terms) = all_consuming(many1(term))(compact.as_str()).map_err(|err| {
            let rest = match &err {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                nom::Err::Incomplete(_) => "",
            };
            let hint = if rest.starts_with(|c: char| c.is_ascii_lowercase()) {
                " (element symbols start with an uppercase letter)"
            } else {
                ""
            };
            LookupError::InvalidQuery(format!("formula `{text}`: unexpected `{rest}`{hint}"))
        })?;

        let mut totals: BTreeMap<&'static str, u32> = BTreeMap::new();
        for (symbol, count) in terms {
            let element = lookup_element(symbol).ok_or_else(|| {
                LookupError::InvalidQuery(format!("formula `{text}`: unknown element `{symbol}`"))
            })?;
            let slot = totals.entry(element).or_insert(0);
            *slot = slot.checked_add(count.unwrap_or(1)).ok_or_else(|| {
                LookupError::InvalidQuery(format!("formula `{text}`: count overflow"))
            })?;
        }

        Ok(Self::hill_ordered(totals))
    }

    fn hill_ordered(mut totals: BTreeMap<&'static str, u32>) -> Self {
        let mut counts = Vec::with_capacity(totals.len());
        if let Some(c) = totals.remove("C") {
            counts.push(("C", c));
            if let Some(h) = totals.remove("H") {
                counts.push(("H", h));
            }
        }
        counts.extend(totals);
        Self { counts }
    }

    /// Count of `symbol`, zero when absent.
    pub fn count(&self, symbol: &str) -> u32 {
        self.counts
            .iter()
            .find(|(e, _)| *e == symbol)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Element/count pairs in canonical order.
    pub fn elements(&self) -> &[(&'static str, u32)] {
        &self.counts
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, count) in &self.counts {
            f.write_str(element)?;
            if *count != 1 {
                write!(f, "{count}")?;
            }
        }
        Ok(())
    }
}

/// Term = Element , [ Count ] ;
fn term(i: &str) -> IResult<&str, (&str, Option<u32>)> {
    pair(element_symbol, opt(count))(i)
}

/// Element = uppercase , [ lowercase ] ;
fn element_symbol(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_uppercase()),
        opt(satisfy(|c| c.is_ascii_lowercase())),
    ))(i)
}

/// Count = digit - "0" , { digit } ;
fn count(i: &str) -> IResult<&str, u32> {
    preceded(not(char('0')), digits)(i)
}

/// Canonical string for `text`, or `InvalidQuery` when it breaks the grammar.
pub fn canonicalize(text: &str) -> LookupResult<String> {
    Formula::parse(text).map(|f| f.to_string())
}

/// Uppercase lookup key for formula text written without any capitals.
///
/// Returns `None` when `text` has an uppercase letter (the strict grammar
/// applies) or when no split into element symbols and counts exists.
pub fn folded_key(text: &str) -> Option<String> {
    let compact: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if compact.is_empty() || compact.iter().any(u8::is_ascii_uppercase) {
        return None;
    }
    if !compact.iter().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
        return None;
    }

    // reachable[i]: compact[..i] splits into whole terms.
    let mut reachable = vec![false; compact.len() + 1];
    reachable[0] = true;
    for start in 0..compact.len() {
        if !reachable[start] {
            continue;
        }
        for width in 1..=2 {
            let end = start + width;
            if end > compact.len() || !is_symbol_folded(&compact[start..end]) {
                continue;
            }
            reachable[end] = true;
            if compact.get(end).is_some_and(|b| (b'1'..=b'9').contains(b)) {
                let digits = compact[end..].iter().take_while(|b| b.is_ascii_digit()).count();
                reachable[end + digits] = true;
            }
        }
    }
    if !reachable[compact.len()] {
        return None;
    }

    Some(String::from_utf8_lossy(&compact).to_ascii_uppercase())
}

fn is_symbol_folded(candidate: &[u8]) -> bool {
    ELEMENTS
        .iter()
        .any(|e| e.as_bytes().eq_ignore_ascii_case(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_is_stable() {
        assert_eq!(canonicalize("C6H12O6").unwrap(), "C6H12O6");
        assert_eq!(canonicalize(" C6 H12 O6 ").unwrap(), "C6H12O6");
        assert_eq!(canonicalize("O6C6H12").unwrap(), "C6H12O6");
        assert_eq!(canonicalize("C1H4").unwrap(), "CH4");
    }

    #[test]
    fn repeated_elements_are_summed() {
        assert_eq!(canonicalize("CH3CH2OH").unwrap(), "C2H6O");
        let f = Formula::parse("CH3COOH").unwrap();
        assert_eq!(f.count("C"), 2);
        assert_eq!(f.count("O"), 2);
        assert_eq!(f.count("N"), 0);
    }

    #[test]
    fn hill_order_without_carbon_is_alphabetical() {
        assert_eq!(canonicalize("H2O").unwrap(), "H2O");
        assert_eq!(canonicalize("O4SH2").unwrap(), "H2O4S");
        assert_eq!(canonicalize("NaCl").unwrap(), "ClNa");
        assert_eq!(canonicalize("C2H7NO3SNa").unwrap(), "C2H7NNaO3S");
    }

    #[test]
    fn symbols_are_case_sensitive() {
        assert_eq!(canonicalize("Co").unwrap(), "Co");
        assert_eq!(canonicalize("CO").unwrap(), "CO");
        assert!(matches!(canonicalize("c6h12o6"), Err(LookupError::InvalidQuery(_))));
    }

    #[test]
    fn all_lowercase_text_gets_a_folded_key() {
        assert_eq!(folded_key("c6h12o6").as_deref(), Some("C6H12O6"));
        assert_eq!(folded_key(" nacl ").as_deref(), Some("NACL"));
        assert_eq!(folded_key("co").as_deref(), Some("CO"));
        assert_eq!(folded_key("C6H12O6"), None);
        assert_eq!(folded_key("c6H12o6"), None);
        assert_eq!(folded_key("glucose"), None);
        assert_eq!(folded_key("c0h4"), None);
        assert_eq!(folded_key("6ch"), None);
        assert_eq!(folded_key("c6h12o6+"), None);
        assert_eq!(folded_key(""), None);
    }

    #[test]
    fn malformed_formulas_are_rejected() {
        for bad in ["", "   ", "C6H12O6+", "(C2H4O)n", "Xx2", "C0H4", "C06", "6CH", "C-2"] {
            assert!(
                matches!(canonicalize(bad), Err(LookupError::InvalidQuery(_))),
                "expected rejection for {bad:?}"
            );
        }
    }
}
