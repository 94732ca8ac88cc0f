//! Deterministic rule lookup for a sort code.

use crate::core::types::RuleRecord;

/// Collect the rules whose range covers `sort_code`, in table order.
///
/// `rules` must be ascending by `range_start`; scanning stops at the first
/// rule that starts past `sort_code`. Published tables yield at most two
/// matches.
pub fn select_rules(rules: &[RuleRecord], sort_code: u32) -> Vec<&RuleRecord> {
    rules
        .iter()
        .take_while(|rule| rule.range_start <= sort_code)
        .filter(|rule| rule.covers(sort_code))
        .collect()
}
