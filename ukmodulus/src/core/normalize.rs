//! Cleaning and length normalization of raw caller input.

use serde::Serialize;

use crate::error::{InputField, ModulusError};

pub const SORT_CODE_LEN: usize = 6;
pub const ACCOUNT_NUMBER_LEN: usize = 8;
const MIN_ACCOUNT_NUMBER_LEN: usize = 6;
const MAX_ACCOUNT_NUMBER_LEN: usize = 10;

/// Co-operative Bank sort codes keep the leading digits of 10-digit accounts.
const COOPERATIVE_PREFIX: &str = "08";

/// Sort code and account number in the canonical 6 + 8 digit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedInput {
    pub sort_code: String,
    pub account_number: String,
}

impl NormalizedInput {
    /// Numeric value of the sort code, used for range lookups.
    pub fn sort_code_value(&self) -> u32 {
        digits_value(&self.sort_code)
    }
}

/// Strip dashes and whitespace; reject anything that is not then all digits.
pub fn clean_input(raw: &str, field: InputField) -> Result<String, ModulusError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(ModulusError::invalid_input(field, "no digits supplied"));
    }
    if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ModulusError::invalid_input(
            field,
            format!("unexpected character '{bad}' in '{raw}'"),
        ));
    }
    Ok(cleaned)
}

/// Clean both inputs and bring the account number to 8 digits.
///
/// - 10 digits: first 8 for `08xxxx` sort codes, otherwise last 8.
/// - 9 digits: last 8; the sort code's last digit becomes the account's first.
/// - 7 or 6 digits: left-padded with zeros.
pub fn normalize(account_number: &str, sort_code: &str) -> Result<NormalizedInput, ModulusError> {
    let account_number = clean_input(account_number, InputField::AccountNumber)?;
    let mut sort_code = clean_input(sort_code, InputField::SortCode)?;

    if sort_code.len() != SORT_CODE_LEN {
        return Err(ModulusError::invalid_input(
            InputField::SortCode,
            format!("expected {SORT_CODE_LEN} digits, got {}", sort_code.len()),
        ));
    }

    let account_number = match account_number.len() {
        10 if sort_code.starts_with(COOPERATIVE_PREFIX) => account_number[..8].to_string(),
        10 => account_number[2..].to_string(),
        9 => {
            sort_code.truncate(SORT_CODE_LEN - 1);
            sort_code.push_str(&account_number[..1]);
            account_number[1..].to_string()
        }
        8 => account_number,
        len @ (6 | 7) => {
            let padding = "0".repeat(ACCOUNT_NUMBER_LEN - len);
            padding + &account_number
        }
        len => {
            return Err(ModulusError::invalid_input(
                InputField::AccountNumber,
                format!(
                    "expected {MIN_ACCOUNT_NUMBER_LEN} to {MAX_ACCOUNT_NUMBER_LEN} digits, got {len}"
                ),
            ));
        }
    };

    Ok(NormalizedInput {
        sort_code,
        account_number,
    })
}

/// Numeric value of an all-digit string.
pub(crate) fn digits_value(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
