//! I/O helpers: configuration and table files on disk.

pub mod config;
pub mod table_store;
