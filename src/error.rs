//! Crate-wide error type.
//!
//! Only failures that abort the whole invocation live here: I/O and
//! path-shape mismatches. The two catastrophic *content* conditions
//! (missing `.data`, `.data` before `.global`) are flags on
//! [`crate::model::AnalysisResult`] instead, inspected by the reporter —
//! they abort report generation, not the process. Everything else the scan
//! finds is a diagnostic collected into `AnalysisResult` and never
//! represented as a Rust error; malformed tokens never abort the scan.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a file")]
    NotAFile { path: PathBuf },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
