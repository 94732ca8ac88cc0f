//! Shared deterministic types for modulus checking.
//!
//! Rule records are built once by the table loaders and never mutated
//! afterwards; everything here is plain data.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ModulusError;

/// Number of digits in a combined sort code + account number.
pub const COMBINED_LEN: usize = 14;

/// Per-position multipliers over the combined digits.
pub type Weightings = [u32; COMBINED_LEN];

/// Digit positions in the combined string, named as in the VocaLink document.
pub mod position {
    pub const U: usize = 0;
    pub const V: usize = 1;
    pub const W: usize = 2;
    pub const X: usize = 3;
    pub const Y: usize = 4;
    pub const Z: usize = 5;
    pub const A: usize = 6;
    pub const B: usize = 7;
    pub const C: usize = 8;
    pub const D: usize = 9;
    pub const E: usize = 10;
    pub const F: usize = 11;
    pub const G: usize = 12;
    pub const H: usize = 13;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    /// Double alternate: digit-sum each weighted product, modulus 10.
    Dblal,
    Mod10,
    Mod11,
}

impl Algorithm {
    pub fn modulus(self) -> u32 {
        match self {
            Self::Dblal | Self::Mod10 => 10,
            Self::Mod11 => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dblal => "DBLAL",
            Self::Mod10 => "MOD10",
            Self::Mod11 => "MOD11",
        }
    }
}

impl FromStr for Algorithm {
    type Err = ModulusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DBLAL" => Ok(Self::Dblal),
            "MOD10" => Ok(Self::Mod10),
            "MOD11" => Ok(Self::Mod11),
            other => Err(ModulusError::Algorithm {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documented deviation from the base weighted-modulus check.
///
/// Variants are numbered after the published exception codes; the behavior of
/// each lives in `core::check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionCode {
    E1,
    E2,
    E3,
    E4,
    E5,
    E6,
    E7,
    E8,
    E9,
    E10,
    E11,
    E12,
    E13,
    E14,
}

impl ExceptionCode {
    pub fn code(self) -> u8 {
        match self {
            Self::E1 => 1,
            Self::E2 => 2,
            Self::E3 => 3,
            Self::E4 => 4,
            Self::E5 => 5,
            Self::E6 => 6,
            Self::E7 => 7,
            Self::E8 => 8,
            Self::E9 => 9,
            Self::E10 => 10,
            Self::E11 => 11,
            Self::E12 => 12,
            Self::E13 => 13,
            Self::E14 => 14,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let exception = match code {
            1 => Self::E1,
            2 => Self::E2,
            3 => Self::E3,
            4 => Self::E4,
            5 => Self::E5,
            6 => Self::E6,
            7 => Self::E7,
            8 => Self::E8,
            9 => Self::E9,
            10 => Self::E10,
            11 => Self::E11,
            12 => Self::E12,
            13 => Self::E13,
            14 => Self::E14,
            _ => return None,
        };
        Some(exception)
    }

    /// A pass on a first rule carrying this code settles the result without
    /// running the second rule.
    pub fn first_pass_is_conclusive(self) -> bool {
        matches!(
            self,
            Self::E2 | Self::E9 | Self::E10 | Self::E11 | Self::E12 | Self::E13 | Self::E14
        )
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ExceptionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// One line of the weighting-rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    /// Inclusive lower bound on the numeric sort code.
    pub range_start: u32,
    /// Inclusive upper bound on the numeric sort code.
    pub range_end: u32,
    pub algorithm: Algorithm,
    pub weightings: Weightings,
    pub exception: Option<ExceptionCode>,
}

impl RuleRecord {
    pub fn covers(&self, sort_code: u32) -> bool {
        self.range_start <= sort_code && sort_code <= self.range_end
    }

    pub fn has_exception(&self, exception: ExceptionCode) -> bool {
        self.exception == Some(exception)
    }
}

impl fmt::Display for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:06} {:06} {}",
            self.range_start, self.range_end, self.algorithm
        )?;
        for weight in &self.weightings {
            write!(f, " {weight}")?;
        }
        if let Some(exception) = self.exception {
            write!(f, " {exception}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_known_names() {
        assert_eq!("DBLAL".parse::<Algorithm>().expect("dblal"), Algorithm::Dblal);
        assert_eq!("MOD10".parse::<Algorithm>().expect("mod10"), Algorithm::Mod10);
        assert_eq!("MOD11".parse::<Algorithm>().expect("mod11"), Algorithm::Mod11);
    }

    #[test]
    fn algorithm_rejects_unknown_name() {
        let err = "MOD12".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, ModulusError::Algorithm { ref name } if name == "MOD12"));
    }

    #[test]
    fn modulus_values() {
        assert_eq!(Algorithm::Dblal.modulus(), 10);
        assert_eq!(Algorithm::Mod10.modulus(), 10);
        assert_eq!(Algorithm::Mod11.modulus(), 11);
    }

    #[test]
    fn exception_codes_round_trip_through_numbers() {
        for code in 1..=14 {
            let exception = ExceptionCode::from_code(code).expect("known code");
            assert_eq!(exception.code(), code);
        }
        assert_eq!(ExceptionCode::from_code(0), None);
        assert_eq!(ExceptionCode::from_code(15), None);
    }

    #[test]
    fn conclusive_first_pass_set_is_literal() {
        let conclusive: Vec<u8> = (1..=14)
            .filter_map(ExceptionCode::from_code)
            .filter(|exception| exception.first_pass_is_conclusive())
            .map(ExceptionCode::code)
            .collect();
        assert_eq!(conclusive, vec![2, 9, 10, 11, 12, 13, 14]);
    }

    #[test]
    fn rule_display_matches_table_layout() {
        let rule = RuleRecord {
            range_start: 70116,
            range_end: 70116,
            algorithm: Algorithm::Mod11,
            weightings: [0, 0, 0, 0, 0, 0, 8, 7, 6, 5, 4, 3, 2, 1],
            exception: Some(ExceptionCode::E12),
        };
        assert_eq!(
            rule.to_string(),
            "070116 070116 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1 12"
        );
    }
}
