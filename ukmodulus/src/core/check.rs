//! Weighted-modulus check for a single rule, including exception handling.
//!
//! Every function here is pure: the outcome depends only on the normalized
//! input, the rule record, and the substitution table.

use crate::core::normalize::NormalizedInput;
use crate::core::tables::SubstitutionTable;
use crate::core::types::{
    Algorithm, COMBINED_LEN, ExceptionCode, RuleRecord, Weightings, position,
};

/// Sort code checked in place of the real one for exception 8.
const EXCEPTION_8_SORT_CODE: &str = "090126";
/// Sort code checked in place of the real one for exception 9.
const EXCEPTION_9_SORT_CODE: &str = "309634";

/// Flat amount added to the weighted total for exception 1.
const EXCEPTION_1_ADDEND: u64 = 27;

const EXCEPTION_2_WEIGHTS: Weightings = [0, 0, 1, 2, 5, 3, 6, 4, 8, 7, 10, 9, 3, 1];
const EXCEPTION_2_WEIGHTS_G9: Weightings = [0, 0, 0, 0, 0, 0, 0, 0, 8, 7, 10, 9, 3, 1];

/// Sort code followed by account number, as digit values.
///
/// Totals are summed in `u64` so any `u32` weight times a digit, over all 14
/// positions, cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedDigits([u64; COMBINED_LEN]);

impl CombinedDigits {
    fn new(sort_code: &str, account_number: &str) -> Self {
        let mut digits = [0; COMBINED_LEN];
        for (slot, byte) in digits
            .iter_mut()
            .zip(sort_code.bytes().chain(account_number.bytes()))
        {
            *slot = u64::from(byte.wrapping_sub(b'0'));
        }
        Self(digits)
    }

    pub fn digit(&self, index: usize) -> u64 {
        self.0[index]
    }
}

/// Run one rule against `input`. Returns `true` when the check passes.
pub fn run_check(
    input: &NormalizedInput,
    rule: &RuleRecord,
    substitutions: &SubstitutionTable,
) -> bool {
    let combined = combine(input, rule, substitutions);
    if skips_check(rule, &combined) {
        return true;
    }
    let weightings = effective_weightings(rule, &combined);
    let mut total = weighted_total(rule.algorithm, &weightings, &combined);
    if rule.has_exception(ExceptionCode::E1) {
        total += EXCEPTION_1_ADDEND;
    }
    let remainder = total % u64::from(rule.algorithm.modulus());
    outcome(rule, &combined, remainder)
}

fn combine(
    input: &NormalizedInput,
    rule: &RuleRecord,
    substitutions: &SubstitutionTable,
) -> CombinedDigits {
    let sort_code = match rule.exception {
        Some(ExceptionCode::E5) if rule.algorithm != Algorithm::Dblal => substitutions
            .get(&input.sort_code)
            .unwrap_or(input.sort_code.as_str()),
        Some(ExceptionCode::E8) => EXCEPTION_8_SORT_CODE,
        Some(ExceptionCode::E9) => EXCEPTION_9_SORT_CODE,
        _ => input.sort_code.as_str(),
    };
    CombinedDigits::new(sort_code, &input.account_number)
}

/// Exceptions 3 and 6 accept some accounts without computing anything.
fn skips_check(rule: &RuleRecord, combined: &CombinedDigits) -> bool {
    match rule.exception {
        Some(ExceptionCode::E3) => matches!(combined.digit(position::C), 6 | 9),
        Some(ExceptionCode::E6) => {
            (4..=8).contains(&combined.digit(position::A))
                && combined.digit(position::G) == combined.digit(position::H)
        }
        _ => false,
    }
}

/// Weights to apply for this account. Overrides start from a copy of the
/// rule's vector; the rule itself is left untouched.
fn effective_weightings(rule: &RuleRecord, combined: &CombinedDigits) -> Weightings {
    let a = combined.digit(position::A);
    let b = combined.digit(position::B);
    let g = combined.digit(position::G);
    match rule.exception {
        Some(ExceptionCode::E2) if a != 0 && g != 9 => EXCEPTION_2_WEIGHTS,
        Some(ExceptionCode::E2) if a != 0 => EXCEPTION_2_WEIGHTS_G9,
        Some(ExceptionCode::E7) if g == 9 => zero_sort_code_weights(rule.weightings),
        Some(ExceptionCode::E10) if matches!((a, b), (0, 9) | (9, 9)) && g == 9 => {
            zero_sort_code_weights(rule.weightings)
        }
        _ => rule.weightings,
    }
}

/// Zero positions u through b.
fn zero_sort_code_weights(mut weightings: Weightings) -> Weightings {
    weightings[position::U..=position::B].fill(0);
    weightings
}

fn weighted_total(
    algorithm: Algorithm,
    weightings: &Weightings,
    combined: &CombinedDigits,
) -> u64 {
    weightings
        .iter()
        .zip(combined.0.iter())
        .map(|(weight, digit)| {
            let product = u64::from(*weight) * digit;
            match algorithm {
                Algorithm::Dblal => digit_sum(product),
                Algorithm::Mod10 | Algorithm::Mod11 => product,
            }
        })
        .sum()
}

/// Sum of the decimal digits of `value` (18 -> 9).
pub fn digit_sum(mut value: u64) -> u64 {
    let mut sum = 0;
    while value > 0 {
        sum += value % 10;
        value /= 10;
    }
    sum
}

fn outcome(rule: &RuleRecord, combined: &CombinedDigits, remainder: u64) -> bool {
    let g = combined.digit(position::G);
    let h = combined.digit(position::H);
    match rule.exception {
        Some(ExceptionCode::E5) => match rule.algorithm {
            Algorithm::Dblal => (remainder == 0 && h == 0) || 10 - remainder == h,
            Algorithm::Mod10 | Algorithm::Mod11 => {
                if remainder == 1 {
                    return false;
                }
                (remainder == 0 && g == 0) || 11 - remainder == g
            }
        },
        Some(ExceptionCode::E4) => remainder == g * 10 + h,
        _ => remainder == 0,
    }
}
