//! Validation of a sort code / account number pair against loaded tables.
//!
//! Normalize, select the applicable rules, then run at most two checks plus
//! the single exception-14 retry.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::check::run_check;
use crate::core::normalize::{ACCOUNT_NUMBER_LEN, NormalizedInput, normalize};
use crate::core::selector::select_rules;
use crate::core::tables::ModulusTables;
use crate::core::types::{Algorithm, ExceptionCode, RuleRecord};
use crate::error::ModulusError;

/// Account digits (index 7) that allow the exception-14 retry.
const EXCEPTION_14_RETRY_DIGITS: &[u8] = b"019";

/// Why a validation reached its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No rule covers the sort code; the pair is accepted unchecked.
    NoRules,
    /// One or more checks ran; `valid` reflects the deciding check.
    Checked,
}

/// One check that ran during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    pub algorithm: Algorithm,
    pub exception: Option<ExceptionCode>,
    /// Account number used for this check (differs from the input on retry).
    pub account_number: String,
    pub passed: bool,
}

/// Full trace of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub input: NormalizedInput,
    pub rules_matched: usize,
    pub checks: Vec<CheckRecord>,
    pub retried: bool,
    pub verdict: Verdict,
    pub valid: bool,
}

/// Validates accounts against one immutable table set.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Debug, Clone)]
pub struct Validator {
    tables: Arc<ModulusTables>,
}

impl Validator {
    pub fn new(tables: ModulusTables) -> Self {
        Self::from_shared(Arc::new(tables))
    }

    pub fn from_shared(tables: Arc<ModulusTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ModulusTables {
        &self.tables
    }

    /// Returns `Ok(false)` for a failed checksum and `Err` for malformed input.
    pub fn validate(&self, sort_code: &str, account_number: &str) -> Result<bool, ModulusError> {
        Ok(self.check(sort_code, account_number)?.valid)
    }

    /// Rules that apply to `sort_code` after cleaning.
    pub fn rules_for(&self, sort_code: &str) -> Result<Vec<&RuleRecord>, ModulusError> {
        let input = normalize("00000000", sort_code)?;
        Ok(select_rules(self.tables.rules(), input.sort_code_value()))
    }

    /// Validate and return the trace of every check that ran.
    pub fn check(&self, sort_code: &str, account_number: &str) -> Result<CheckReport, ModulusError> {
        let input = normalize(account_number, sort_code)?;
        let mut rules = select_rules(self.tables.rules(), input.sort_code_value());
        debug!(
            sort_code = %input.sort_code,
            account_number = %input.account_number,
            rules = rules.len(),
            "rules selected"
        );
        let rules_matched = rules.len();
        if rules_matched > 2 {
            warn!(
                sort_code = %input.sort_code,
                rules = rules_matched,
                "more than two rules cover sort code; using the first two"
            );
            rules.truncate(2);
        }

        let mut run = CheckRun::new(self.tables.as_ref(), input);
        let (valid, verdict) = match rules.as_slice() {
            [] => (true, Verdict::NoRules),
            [first] => (run.first_only(first), Verdict::Checked),
            [first, second, ..] => (run.first_then_second(first, second), Verdict::Checked),
        };
        debug!(valid, checks = run.checks.len(), retried = run.retried, "validation finished");

        Ok(CheckReport {
            rules_matched,
            input: run.input,
            checks: run.checks,
            retried: run.retried,
            verdict,
            valid,
        })
    }
}

/// State for a single validation: the checks run so far.
struct CheckRun<'a> {
    tables: &'a ModulusTables,
    input: NormalizedInput,
    checks: Vec<CheckRecord>,
    retried: bool,
}

impl<'a> CheckRun<'a> {
    fn new(tables: &'a ModulusTables, input: NormalizedInput) -> Self {
        Self {
            tables,
            input,
            checks: Vec::new(),
            retried: false,
        }
    }

    fn first_only(&mut self, rule: &RuleRecord) -> bool {
        if self.execute(rule) {
            return true;
        }
        if rule.has_exception(ExceptionCode::E14) {
            return self.retry_exception_14(rule);
        }
        false
    }

    fn first_then_second(&mut self, first: &RuleRecord, second: &RuleRecord) -> bool {
        if self.execute(first) {
            if first.exception.is_some_and(ExceptionCode::first_pass_is_conclusive) {
                return true;
            }
            return self.execute(second);
        }
        if first.has_exception(ExceptionCode::E14) {
            return self.retry_exception_14(first);
        }
        self.execute(second)
    }

    /// Drop the last account digit, shift right with a leading zero and rerun
    /// the first rule once. Only accounts ending 0, 1 or 9 qualify.
    fn retry_exception_14(&mut self, rule: &RuleRecord) -> bool {
        let last = self.input.account_number.as_bytes()[ACCOUNT_NUMBER_LEN - 1];
        if !EXCEPTION_14_RETRY_DIGITS.contains(&last) {
            debug!(account_number = %self.input.account_number, "exception 14 retry not allowed");
            return false;
        }
        let shifted = format!("0{}", &self.input.account_number[..ACCOUNT_NUMBER_LEN - 1]);
        debug!(account_number = %shifted, "exception 14 retry");
        self.retried = true;
        let retry_input = NormalizedInput {
            sort_code: self.input.sort_code.clone(),
            account_number: shifted,
        };
        self.record(rule, &retry_input)
    }

    fn execute(&mut self, rule: &RuleRecord) -> bool {
        let input = self.input.clone();
        self.record(rule, &input)
    }

    fn record(&mut self, rule: &RuleRecord, input: &NormalizedInput) -> bool {
        let passed = run_check(input, rule, self.tables.substitutions());
        debug!(
            algorithm = %rule.algorithm,
            exception = ?rule.exception.map(ExceptionCode::code),
            account_number = %input.account_number,
            passed,
            "check ran"
        );
        self.checks.push(CheckRecord {
            algorithm: rule.algorithm,
            exception: rule.exception,
            account_number: input.account_number.clone(),
            passed,
        });
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tables::SubstitutionTable;
    use crate::test_support::{fixture_validator, rule, rule_with_weights};

    const MOD11_DESCENDING: [u32; 14] = [0, 0, 0, 0, 0, 0, 8, 7, 6, 5, 4, 3, 2, 1];

    fn single_rule_validator(rule: RuleRecord) -> Validator {
        Validator::new(ModulusTables::new(vec![rule], SubstitutionTable::default()))
    }

    #[test]
    fn uncovered_sort_code_is_accepted() {
        let validator = fixture_validator();
        let report = validator.check("999999", "12345678").expect("check");
        assert!(report.valid);
        assert_eq!(report.verdict, Verdict::NoRules);
        assert!(report.checks.is_empty());
    }

    #[test]
    fn single_rule_failure_is_final() {
        let validator = fixture_validator();
        let report = validator.check("089999", "66374959").expect("check");
        assert!(!report.valid);
        assert_eq!(report.checks.len(), 1);
    }

    #[test]
    fn non_conclusive_first_pass_runs_second_rule() {
        let validator = fixture_validator();
        let report = validator.check("203099", "66831036").expect("check");
        assert!(!report.valid);
        let passed: Vec<bool> = report.checks.iter().map(|check| check.passed).collect();
        assert_eq!(passed, vec![true, false]);
    }

    #[test]
    fn conclusive_first_pass_skips_second_rule() {
        let validator = fixture_validator();
        let report = validator.check("070116", "34012583").expect("check");
        assert!(report.valid);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].exception, Some(ExceptionCode::E12));
    }

    #[test]
    fn first_failure_falls_through_to_second_rule() {
        let validator = fixture_validator();
        let report = validator.check("309070", "12345668").expect("check");
        assert!(report.valid);
        let exceptions: Vec<_> = report.checks.iter().map(|check| check.exception).collect();
        assert_eq!(
            exceptions,
            vec![Some(ExceptionCode::E2), Some(ExceptionCode::E9)]
        );
    }

    #[test]
    fn exception_14_retries_once_with_shifted_account() {
        let validator = fixture_validator();
        let report = validator.check("180002", "00000190").expect("check");
        assert!(report.valid);
        assert!(report.retried);
        let accounts: Vec<&str> = report
            .checks
            .iter()
            .map(|check| check.account_number.as_str())
            .collect();
        assert_eq!(accounts, vec!["00000190", "00000019"]);
    }

    #[test]
    fn exception_14_retry_requires_last_digit_0_1_or_9() {
        let validator = single_rule_validator(rule_with_weights(
            Algorithm::Mod11,
            MOD11_DESCENDING,
            Some(ExceptionCode::E14),
        ));
        let report = validator.check("180002", "00000195").expect("check");
        assert!(!report.valid);
        assert!(!report.retried);
        assert_eq!(report.checks.len(), 1);
    }

    #[test]
    fn exception_14_does_not_retry_after_a_pass() {
        let validator = single_rule_validator(rule_with_weights(
            Algorithm::Mod11,
            MOD11_DESCENDING,
            Some(ExceptionCode::E14),
        ));
        let report = validator.check("180002", "00000019").expect("check");
        assert!(report.valid);
        assert!(!report.retried);
    }

    #[test]
    fn only_first_two_of_three_matching_rules_run() {
        let rules = vec![
            rule(0, 999_999, Algorithm::Mod11, None),
            rule(100_000, 200_000, Algorithm::Mod11, None),
            rule(123_456, 123_456, Algorithm::Mod10, None),
        ];
        let validator = Validator::new(ModulusTables::new(rules, SubstitutionTable::default()));
        let report = validator.check("123456", "00000019").expect("check");
        assert_eq!(report.rules_matched, 3);
        assert_eq!(report.checks.len(), 2);
        assert!(
            report
                .checks
                .iter()
                .all(|check| check.algorithm == Algorithm::Mod11)
        );
        // The third rule (MOD10) would reject this account.
        assert!(report.valid);
    }

    #[test]
    fn nine_digit_account_adjusts_sort_code_before_lookup() {
        let validator = fixture_validator();
        let report = validator.check("089990", "966374958").expect("check");
        assert_eq!(report.input.sort_code, "089999");
        assert_eq!(report.input.account_number, "66374958");
        assert!(report.valid);
    }

    #[test]
    fn malformed_input_is_an_error_not_a_failure() {
        let validator = fixture_validator();
        assert!(validator.validate("12a345", "12345678").unwrap_err().is_invalid_input());
        assert!(validator.validate("12345", "12345678").unwrap_err().is_invalid_input());
        assert!(validator.validate("089999", "12345").unwrap_err().is_invalid_input());
    }

    #[test]
    fn rules_for_lists_matching_rules() {
        let validator = fixture_validator();
        let rules = validator.rules_for("07-01-16").expect("rules");
        assert_eq!(rules.len(), 2);
        assert!(validator.rules_for("999999").expect("rules").is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let validator = fixture_validator();
        let report = validator.check("089999", "66374958").expect("check");
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["valid"], true);
        assert_eq!(json["verdict"], "checked");
        assert_eq!(json["checks"][0]["algorithm"], "MOD10");
        assert_eq!(json["checks"][0]["exception"], serde_json::Value::Null);
    }
}
