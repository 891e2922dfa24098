//! duckpad library - Session facade over an embedded DuckDB engine
//!
//! Provides the engine lifecycle, scoped sessions, file ingestion, result
//! projection and database images, plus the command and output
//! infrastructure behind the `duckpad` binary.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod ingest;
pub mod output;
pub mod persistence;
pub mod projector;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
