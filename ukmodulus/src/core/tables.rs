//! Parsing of the weighting-rule and sort-code substitution tables.
//!
//! Both resources are flat text, one whitespace-separated record per line.
//! Parsing is all-or-nothing: the first malformed line aborts the load with a
//! configuration error naming the resource and line.

use std::collections::HashMap;

use crate::core::normalize::SORT_CODE_LEN;
use crate::core::types::{Algorithm, COMBINED_LEN, ExceptionCode, RuleRecord, Weightings};
use crate::error::ModulusError;

pub const RULES_RESOURCE: &str = "rule table";
pub const SUBSTITUTIONS_RESOURCE: &str = "substitution table";

const RULE_FIELDS: usize = 3 + COMBINED_LEN;
const RULE_FIELDS_WITH_EXCEPTION: usize = RULE_FIELDS + 1;

/// Largest weight a rule may carry.
pub const MAX_WEIGHT: u32 = 99;

/// Replacement sort codes used by exception 5.
///
/// Only [`parse_substitutions`] fills a table, so every code in it is six
/// digits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: HashMap<String, String>,
}

impl SubstitutionTable {
    pub fn get(&self, sort_code: &str) -> Option<&str> {
        self.entries.get(sort_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


/// Loaded rule and substitution tables, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulusTables {
    rules: Vec<RuleRecord>,
    substitutions: SubstitutionTable,
}

impl ModulusTables {
    /// Build tables from already parsed parts. `rules` must be ascending by
    /// `range_start`.
    pub fn new(rules: Vec<RuleRecord>, substitutions: SubstitutionTable) -> Self {
        Self {
            rules,
            substitutions,
        }
    }

    /// Parse both resources from their text.
    pub fn parse(rules: &str, substitutions: &str) -> Result<Self, ModulusError> {
        Ok(Self::new(
            parse_rules(rules)?,
            parse_substitutions(substitutions)?,
        ))
    }

    pub fn rules(&self) -> &[RuleRecord] {
        &self.rules
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }
}

/// Parse the weighting-rule table:
/// `range_start range_end algorithm w1..w14 [exception_code]`.
pub fn parse_rules(contents: &str) -> Result<Vec<RuleRecord>, ModulusError> {
    let mut rules: Vec<RuleRecord> = Vec::new();
    for (line, fields) in records(contents) {
        let rule = parse_rule(&fields).map_err(|message| {
            ModulusError::configuration(RULES_RESOURCE, line, message)
        })?;
        if let Some(previous) = rules.last()
            && rule.range_start < previous.range_start
        {
            return Err(ModulusError::configuration(
                RULES_RESOURCE,
                line,
                format!(
                    "range start {:06} is before previous range start {:06}",
                    rule.range_start, previous.range_start
                ),
            ));
        }
        rules.push(rule);
    }
    Ok(rules)
}

fn parse_rule(fields: &[&str]) -> Result<RuleRecord, String> {
    if fields.len() != RULE_FIELDS && fields.len() != RULE_FIELDS_WITH_EXCEPTION {
        return Err(format!(
            "expected {RULE_FIELDS} or {RULE_FIELDS_WITH_EXCEPTION} fields, got {}",
            fields.len()
        ));
    }
    let range_start = parse_number(fields[0], "range start")?;
    let range_end = parse_number(fields[1], "range end")?;
    if range_start > range_end {
        return Err(format!(
            "range start {range_start:06} is after range end {range_end:06}"
        ));
    }
    let algorithm = fields[2]
        .parse::<Algorithm>()
        .map_err(|err| err.to_string())?;

    let mut weightings: Weightings = [0; COMBINED_LEN];
    for (slot, field) in weightings.iter_mut().zip(&fields[3..RULE_FIELDS]) {
        let weight = parse_number(field, "weight")?;
        if weight > MAX_WEIGHT {
            return Err(format!("weight {weight} is above the maximum of {MAX_WEIGHT}"));
        }
        *slot = weight;
    }

    let exception = match fields.get(RULE_FIELDS) {
        Some(field) => Some(parse_exception(field)?),
        None => None,
    };

    Ok(RuleRecord {
        range_start,
        range_end,
        algorithm,
        weightings,
        exception,
    })
}

fn parse_exception(field: &str) -> Result<ExceptionCode, String> {
    field
        .parse::<u8>()
        .ok()
        .and_then(ExceptionCode::from_code)
        .ok_or_else(|| format!("unknown exception code '{field}' (expected 1 to 14)"))
}

fn parse_number(field: &str, what: &str) -> Result<u32, String> {
    field
        .parse()
        .map_err(|_| format!("{what} '{field}' is not a non-negative integer"))
}

/// Parse the substitution table: `original_code replacement_code`.
pub fn parse_substitutions(contents: &str) -> Result<SubstitutionTable, ModulusError> {
    let mut entries = HashMap::new();
    for (line, fields) in records(contents) {
        let (original, replacement) = parse_substitution(&fields).map_err(|message| {
            ModulusError::configuration(SUBSTITUTIONS_RESOURCE, line, message)
        })?;
        entries.insert(original, replacement);
    }
    Ok(SubstitutionTable { entries })
}

fn parse_substitution(fields: &[&str]) -> Result<(String, String), String> {
    let [original, replacement] = fields else {
        return Err(format!("expected 2 fields, got {}", fields.len()));
    };
    for code in [original, replacement] {
        if code.len() != SORT_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{code}' is not a {SORT_CODE_LEN}-digit sort code"));
        }
    }
    Ok((original.to_string(), replacement.to_string()))
}

/// Non-blank lines split on whitespace, paired with 1-based line numbers.
fn records(contents: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.split_whitespace().collect::<Vec<_>>()))
        .filter(|(_, fields)| !fields.is_empty())
}
