//! Test-only helpers for constructing rules, inputs and fixture tables.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::normalize::NormalizedInput;
use crate::core::tables::ModulusTables;
use crate::core::types::{Algorithm, ExceptionCode, RuleRecord, Weightings};
use crate::validate::Validator;

/// Rule table excerpt covering every published VocaLink test account.
pub const FIXTURE_RULES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/valacdos.txt"
));

/// Substitution table excerpt used by the exception-5 accounts.
pub const FIXTURE_SUBSTITUTIONS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/scsubtab.txt"
));

/// Create a rule over `start..=end` with standard modulus 11 weights.
pub fn rule(
    range_start: u32,
    range_end: u32,
    algorithm: Algorithm,
    exception: Option<ExceptionCode>,
) -> RuleRecord {
    RuleRecord {
        range_start,
        range_end,
        algorithm,
        weightings: [0, 0, 0, 0, 0, 0, 8, 7, 6, 5, 4, 3, 2, 1],
        exception,
    }
}

/// Create a rule covering every sort code with explicit weights.
pub fn rule_with_weights(
    algorithm: Algorithm,
    weightings: Weightings,
    exception: Option<ExceptionCode>,
) -> RuleRecord {
    RuleRecord {
        range_start: 0,
        range_end: 999_999,
        algorithm,
        weightings,
        exception,
    }
}

/// Build an already normalized input without going through `normalize`.
pub fn input(sort_code: &str, account_number: &str) -> NormalizedInput {
    NormalizedInput {
        sort_code: sort_code.to_string(),
        account_number: account_number.to_string(),
    }
}

pub fn fixture_tables() -> ModulusTables {
    ModulusTables::parse(FIXTURE_RULES, FIXTURE_SUBSTITUTIONS).expect("fixture tables parse")
}

pub fn fixture_validator() -> Validator {
    Validator::new(fixture_tables())
}

/// Temporary directory holding the fixture tables and a config naming them.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub const CONFIG_FILE: &'static str = "ukmodulus.toml";

    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("valacdos.txt"), FIXTURE_RULES).expect("write rules");
        fs::write(dir.path().join("scsubtab.txt"), FIXTURE_SUBSTITUTIONS)
            .expect("write substitutions");
        fs::write(
            dir.path().join(Self::CONFIG_FILE),
            "[tables]\nrules_path = \"valacdos.txt\"\nsubstitutions_path = \"scsubtab.txt\"\n",
        )
        .expect("write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join(Self::CONFIG_FILE)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.path().join("valacdos.txt")
    }

    pub fn substitutions_path(&self) -> PathBuf {
        self.path().join("scsubtab.txt")
    }

    /// Write an extra file into the directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}
