//! Static analysis engine for hand-written ARM assembly source files.
//!
//! The engine is a single forward scan ([`scanner::scan`]) producing an
//! [`model::AnalysisResult`], followed by a post-scan structural pass
//! ([`structural::check`]). [`analyze_file`] composes both steps; the
//! binary (`src/main.rs`) is a thin driver over this library plus
//! [`report`] for rendering.
//!
//! ```rust,ignore
//! use std::io::BufReader;
//! use armalyzer::analyze_file;
//!
//! let file = std::fs::File::open("prog.s")?;
//! let result = analyze_file(BufReader::new(file));
//! println!("cyclomatic complexity: {}", result.cyclomatic);
//! ```

pub mod cli;
pub mod error;
pub mod line;
pub mod metrics;
pub mod model;
pub mod operand;
pub mod report;
pub mod scanner;
pub mod state;
pub mod structural;
pub mod token;

pub use error::{AnalyzerError, AnalyzerResult};
pub use model::AnalysisResult;

/// Run the full engine — forward scan, then structural checks — over a
/// readable source. Never fails: malformed input is reflected in the
/// result's diagnostic lists, not as a Rust error.
pub fn analyze_file<R: std::io::BufRead>(reader: R) -> AnalysisResult {
    let mut result = scanner::scan(reader);
    structural::check(&mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn analyze_file_runs_scan_then_structural_check() {
        let result = analyze_file(Cursor::new(
            b"\
.global _start\n\
_start:\n\
    bl foo\n\
    svc 0\n\
foo:\n\
    mov r0, #1\n\
.data\n"
                as &[u8],
        ));
        assert_eq!(
            result.no_return_errors,
            vec!["foo has no return despite being a subroutine."]
        );
    }
}
