//! File-backed loading of the rule and substitution tables.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::tables::{ModulusTables, parse_rules, parse_substitutions};
use crate::error::ModulusError;

/// Read and parse both table files. Any unreadable or malformed file aborts
/// the load, so a failed load never yields partial tables.
pub fn load_tables(
    rules_path: &Path,
    substitutions_path: &Path,
) -> Result<ModulusTables, ModulusError> {
    debug!(path = %rules_path.display(), "loading rule table");
    let rules = parse_rules(&read_table(rules_path)?)?;
    debug!(path = %substitutions_path.display(), "loading substitution table");
    let substitutions = parse_substitutions(&read_table(substitutions_path)?)?;
    debug!(
        rules = rules.len(),
        substitutions = substitutions.len(),
        "tables loaded"
    );
    Ok(ModulusTables::new(rules, substitutions))
}

fn read_table(path: &Path) -> Result<String, ModulusError> {
    fs::read_to_string(path).map_err(|source| ModulusError::io(path, source))
}
