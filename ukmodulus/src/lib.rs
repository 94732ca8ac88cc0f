//! UK bank account modulus checking (VocaLink weighted-modulus rules).
//!
//! The crate splits the same way throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (normalization, rule selection,
//!   the per-rule check and table parsing). No I/O, no logging.
//! - **[`io`]**: Reading configuration and table files from disk.
//!
//! [`validate::Validator`] ties the two together: it owns one immutable
//! [`core::tables::ModulusTables`] and answers `validate`/`check` calls.
//!
//! ```no_run
//! use std::path::Path;
//! use ukmodulus::io::table_store::load_tables;
//! use ukmodulus::validate::Validator;
//!
//! let tables = load_tables(Path::new("valacdos.txt"), Path::new("scsubtab.txt"))?;
//! let validator = Validator::new(tables);
//! assert!(validator.validate("08-99-99", "66374958")?);
//! # Ok::<(), ukmodulus::error::ModulusError>(())
//! ```

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
