//! Adduct ions and neutral-mass <-> observed m/z conversion.
//!
//! All supported adducts are singly charged, so the conversion reduces to
//! adding or subtracting a fixed mass shift.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::types::IonMode;

// CODATA 2018 recommended values, unified atomic mass units.
const PROTON: f64 = 1.007_276_466_621;
const ELECTRON: f64 = 0.000_548_579_909_065;

// AME2020 atomic masses of the most abundant isotopes.
const H1: f64 = 1.007_825_032_23;
const C12: f64 = 12.0;
const N14: f64 = 14.003_074_004_43;
const O16: f64 = 15.994_914_619_57;
const NA23: f64 = 22.989_769_282_0;
const CL35: f64 = 34.968_852_682;
const K39: f64 = 38.963_706_486_4;

const SHIFT_M_PLUS_H: f64 = PROTON;
const SHIFT_M_PLUS_NA: f64 = NA23 - ELECTRON;
const SHIFT_M_PLUS_K: f64 = K39 - ELECTRON;
const SHIFT_M_PLUS_NH4: f64 = N14 + 4.0 * H1 - ELECTRON;
const SHIFT_M_MINUS_H: f64 = -PROTON;
const SHIFT_M_PLUS_CL: f64 = CL35 + ELECTRON;
// Formic acid (CH2O2) minus a proton, i.e. formate.
const SHIFT_M_PLUS_FA_MINUS_H: f64 = C12 + 2.0 * H1 + 2.0 * O16 - PROTON;

/// Singly charged adduct ion species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdductMode {
    /// `[M+H]+`
    MPlusH,
    /// `[M+Na]+`
    MPlusNa,
    /// `[M+K]+`
    MPlusK,
    /// `[M+NH4]+`
    MPlusNh4,
    /// `[M-H]-`
    MMinusH,
    /// `[M+Cl]-`
    MPlusCl,
    /// `[M+FA-H]-` (formate adduct)
    MPlusFaMinusH,
}

impl AdductMode {
    /// Every supported adduct, positive modes first.
    pub const ALL: [AdductMode; 7] = [
        AdductMode::MPlusH,
        AdductMode::MPlusNa,
        AdductMode::MPlusK,
        AdductMode::MPlusNh4,
        AdductMode::MMinusH,
        AdductMode::MPlusCl,
        AdductMode::MPlusFaMinusH,
    ];

    /// Signed charge of the ion.
    pub fn charge(self) -> i8 {
        match self.ion_mode() {
            IonMode::Positive => 1,
            IonMode::Negative => -1,
        }
    }

    /// Mass added to the neutral molecule to form the ion (Da).
    pub fn mass_shift(self) -> f64 {
        match self {
            AdductMode::MPlusH => SHIFT_M_PLUS_H,
            AdductMode::MPlusNa => SHIFT_M_PLUS_NA,
            AdductMode::MPlusK => SHIFT_M_PLUS_K,
            AdductMode::MPlusNh4 => SHIFT_M_PLUS_NH4,
            AdductMode::MMinusH => SHIFT_M_MINUS_H,
            AdductMode::MPlusCl => SHIFT_M_PLUS_CL,
            AdductMode::MPlusFaMinusH => SHIFT_M_PLUS_FA_MINUS_H,
        }
    }

    /// Polarity the ion is observed in.
    pub fn ion_mode(self) -> IonMode {
        match self {
            AdductMode::MPlusH | AdductMode::MPlusNa | AdductMode::MPlusK | AdductMode::MPlusNh4 => {
                IonMode::Positive
            }
            AdductMode::MMinusH | AdductMode::MPlusCl | AdductMode::MPlusFaMinusH => {
                IonMode::Negative
            }
        }
    }

    /// Conventional bracket notation.
    pub fn label(self) -> &'static str {
        match self {
            AdductMode::MPlusH => "[M+H]+",
            AdductMode::MPlusNa => "[M+Na]+",
            AdductMode::MPlusK => "[M+K]+",
            AdductMode::MPlusNh4 => "[M+NH4]+",
            AdductMode::MMinusH => "[M-H]-",
            AdductMode::MPlusCl => "[M+Cl]-",
            AdductMode::MPlusFaMinusH => "[M+FA-H]-",
        }
    }
}

/// Adduct selection for a mass search: an ion species or the bare neutral mass.
///
/// Serialises as its label (`"[M+H]+"`, `"neutral"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Adduct {
    /// Observed value is already a neutral monoisotopic mass.
    Neutral,
    /// Observed value is the m/z of this ion.
    Ion(AdductMode),
}

impl Adduct {
    /// Display label (`neutral` or bracket notation).
    pub fn label(self) -> &'static str {
        match self {
            Adduct::Neutral => "neutral",
            Adduct::Ion(mode) => mode.label(),
        }
    }
}

impl From<AdductMode> for Adduct {
    fn from(mode: AdductMode) -> Self {
        Adduct::Ion(mode)
    }
}

impl From<Adduct> for String {
    fn from(adduct: Adduct) -> Self {
        adduct.label().to_string()
    }
}

impl TryFrom<String> for Adduct {
    type Error = LookupError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl fmt::Display for Adduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Adduct {
    type Err = LookupError;

    /// Accepts bracket notation with or without brackets and trailing charge
    /// (`[M+Na]+`, `M+Na`), plus `neutral`, `positive` (`[M+H]+`) and
    /// `negative` (`[M-H]-`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '[' && *c != ']')
            .collect::<String>()
            .to_ascii_uppercase();

        let mode = match key.as_str() {
            "NEUTRAL" | "M" | "NONE" => return Ok(Adduct::Neutral),
            "M+H+" | "M+H" | "POSITIVE" => AdductMode::MPlusH,
            "M+NA+" | "M+NA" => AdductMode::MPlusNa,
            "M+K+" | "M+K" => AdductMode::MPlusK,
            "M+NH4+" | "M+NH4" => AdductMode::MPlusNh4,
            "M-H-" | "M-H" | "NEGATIVE" => AdductMode::MMinusH,
            "M+CL-" | "M+CL" => AdductMode::MPlusCl,
            "M+FA-H-" | "M+FA-H" | "M+HCOO-" | "M+HCOO" => AdductMode::MPlusFaMinusH,
            _ => return Err(LookupError::InvalidAdduct(s.to_string())),
        };
        Ok(Adduct::Ion(mode))
    }
}

/// Observed m/z of a molecule with `neutral_mass` ionised as `adduct`.
pub fn neutral_mass_to_observed(neutral_mass: f64, adduct: Adduct) -> f64 {
    match adduct {
        Adduct::Neutral => neutral_mass,
        Adduct::Ion(mode) => {
            (neutral_mass + mode.mass_shift()) / f64::from(mode.charge().unsigned_abs())
        }
    }
}

/// Neutral monoisotopic mass behind an observed m/z of `adduct`.
pub fn observed_to_neutral(observed_mass: f64, adduct: Adduct) -> f64 {
    match adduct {
        Adduct::Neutral => observed_mass,
        Adduct::Ion(mode) => {
            observed_mass * f64::from(mode.charge().unsigned_abs()) - mode.mass_shift()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn shifts_match_published_adduct_masses() {
        assert!(close(AdductMode::MPlusH.mass_shift(), 1.007276));
        assert!(close(AdductMode::MPlusNa.mass_shift(), 22.989221));
        assert!(close(AdductMode::MPlusK.mass_shift(), 38.963158));
        assert!(close(AdductMode::MPlusNh4.mass_shift(), 18.033826));
        assert!(close(AdductMode::MMinusH.mass_shift(), -1.007276));
        assert!(close(AdductMode::MPlusCl.mass_shift(), 34.969401));
        assert!(close(AdductMode::MPlusFaMinusH.mass_shift(), 44.998203));
    }

    #[test]
    fn polarity_follows_charge() {
        for mode in AdductMode::ALL {
            let expected = if mode.charge() > 0 {
                IonMode::Positive
            } else {
                IonMode::Negative
            };
            assert_eq!(mode.ion_mode(), expected);
            assert_eq!(mode.charge().abs(), 1);
        }
    }

    #[test]
    fn neutral_bypasses_the_shift() {
        assert_eq!(neutral_mass_to_observed(180.0634, Adduct::Neutral), 180.0634);
        assert_eq!(observed_to_neutral(180.0634, Adduct::Neutral), 180.0634);
    }

    #[test]
    fn glucose_protonated() {
        let observed = neutral_mass_to_observed(180.063388, AdductMode::MPlusH.into());
        assert!((observed - 181.070665).abs() < 1e-5);
    }

    #[test]
    fn labels_parse_back() {
        for mode in AdductMode::ALL {
            assert_eq!(mode.label().parse::<Adduct>().unwrap(), Adduct::Ion(mode));
        }
        assert_eq!("M+Na".parse::<Adduct>().unwrap(), Adduct::Ion(AdductMode::MPlusNa));
        assert_eq!("neutral".parse::<Adduct>().unwrap(), Adduct::Neutral);
        assert_eq!("negative".parse::<Adduct>().unwrap(), Adduct::Ion(AdductMode::MMinusH));
    }

    #[test]
    fn unknown_adduct_is_rejected() {
        assert_eq!(
            "[M+2H]2+".parse::<Adduct>(),
            Err(LookupError::InvalidAdduct("[M+2H]2+".to_string()))
        );
    }

    #[test]
    fn json_uses_labels() {
        let json = serde_json::to_string(&Adduct::Ion(AdductMode::MPlusNa)).unwrap();
        assert_eq!(json, r#""[M+Na]+""#);
        assert_eq!(serde_json::to_string(&Adduct::Neutral).unwrap(), r#""neutral""#);

        let back: Adduct = serde_json::from_str(r#""[M-H]-""#).unwrap();
        assert_eq!(back, Adduct::Ion(AdductMode::MMinusH));
        assert!(serde_json::from_str::<Adduct>(r#""[M+2H]2+""#).is_err());
    }
}
