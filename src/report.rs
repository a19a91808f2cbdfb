//! Rendering the analysis result to its four output sinks.
//!
//! `-m`, `-e`, `-r`, and `-c` share the overwhelming majority of their
//! content; rather than four near-identical writers this collapses to one
//! [`Renderer`] parameterized by a [`Sections`] bitset and any `Write`.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use crate::metrics::{self, Metrics};
use crate::model::AnalysisResult;

/// Which parts of the report a given invocation wants rendered.
#[derive(Debug, Clone, Copy)]
pub struct Sections {
    pub metadata: bool,
    pub metrics: bool,
    pub errors: bool,
}

impl Sections {
    pub const METRICS_ONLY: Sections = Sections {
        metadata: true,
        metrics: true,
        errors: false,
    };
    pub const ERRORS_ONLY: Sections = Sections {
        metadata: true,
        metrics: false,
        errors: true,
    };
    pub const FULL_REPORT: Sections = Sections {
        metadata: true,
        metrics: true,
        errors: true,
    };
}

/// File name plus the two timestamps the Metadata section and CSV row need.
pub struct FileMetadata {
    pub file_name: String,
    pub accessed: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl FileMetadata {
    pub fn read(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            file_name,
            accessed: DateTime::<Local>::from(meta.accessed()?),
            modified: DateTime::<Local>::from(meta.modified()?),
        })
    }
}

const RULE: &str = "****************************************";

/// Renders an [`AnalysisResult`] to any `Write` sink, the sections chosen
/// by the caller. `-m` uses `METRICS_ONLY`, `-e` uses `ERRORS_ONLY`, `-r`
/// uses `FULL_REPORT`; all three flow through this one code path.
pub fn render<W: Write>(
    out: &mut W,
    meta: &FileMetadata,
    result: &AnalysisResult,
    sections: Sections,
) -> io::Result<()> {
    if sections.metadata {
        render_metadata(out, meta)?;
    }
    if sections.metrics {
        render_general_metrics(out, result)?;
        render_halstead(out, result)?;
        render_register_use(out, result)?;
        render_audit_logs(out, result)?;
        render_addressing_modes(out, result)?;
    }
    if sections.errors {
        render_errors(out, result)?;
    }
    Ok(())
}

fn render_metadata<W: Write>(out: &mut W, meta: &FileMetadata) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Metadata")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "File name: {}", meta.file_name)?;
    writeln!(out, "Last accessed: {}", meta.accessed.format("%c"))?;
    writeln!(out, "Last modified: {}", meta.modified.format("%c"))?;
    writeln!(out, "Tool version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Tool date: {}", Local::now().format("%c"))?;
    Ok(())
}

fn render_general_metrics<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "General Metrics")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Total lines: {}", result.total_lines)?;
    writeln!(out, "Blank lines: {}", result.blank_lines)?;
    writeln!(out, "Full comment lines: {}", result.full_comment_lines)?;
    writeln!(out, "Lines with comment: {}", result.lines_with_comment)?;
    writeln!(out, "Lines without comment: {}", result.lines_without_comment)?;
    writeln!(out, "Directive lines: {}", result.directive_lines)?;
    writeln!(out, "Cyclomatic complexity: {}", result.cyclomatic)?;
    if result.push_count != result.pop_count {
        let msg = if result.push_count > result.pop_count {
            "More pushes detected than pops. Ensure that all values are popped off the heap."
        } else {
            "More pops detected than pushes. Ensure that there is always a value on the heap before a Pop."
        };
        writeln!(out, "{msg}")?;
    }
    Ok(())
}

fn render_halstead<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    let m: Metrics = metrics::compute(result);
    writeln!(out, "{RULE}")?;
    writeln!(out, "Halstead's Metrics")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Total operators: {}", m.total_operators)?;
    writeln!(out, "Total operands: {}", m.total_operands)?;
    writeln!(out, "Unique operators: {}", m.unique_operators)?;
    writeln!(out, "Unique operands: {}", m.unique_operands)?;
    writeln!(out, "Length: {}", m.length)?;
    writeln!(out, "Vocabulary: {}", m.vocabulary)?;
    writeln!(out, "Volume: {:.2}", m.volume)?;
    writeln!(out, "Difficulty: {:.2}", m.difficulty)?;
    writeln!(out, "Effort: {:.2}", m.effort)?;
    Ok(())
}

fn render_register_use<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Register Use")?;
    writeln!(out, "{RULE}")?;
    for (reg, lines) in result.register_lines.iter().enumerate() {
        let rendered = lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "r{reg}: {rendered}")?;
    }
    Ok(())
}

fn render_audit_logs<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "SVC / Subroutine / Branch / Directive Use")?;
    writeln!(out, "{RULE}")?;
    for entry in &result.svc_uses {
        writeln!(out, "{entry}")?;
    }
    for entry in &result.subroutine_uses {
        writeln!(out, "{entry}")?;
    }
    for entry in &result.branch_uses {
        writeln!(out, "{entry}")?;
    }
    for (directive, lines) in &result.directive_uses {
        writeln!(
            out,
            "{directive}: {}",
            lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )?;
    }
    Ok(())
}

fn render_addressing_modes<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Addressing Modes")?;
    writeln!(out, "{RULE}")?;
    let bucket = |name: &str, lines: &[usize], out: &mut W| -> io::Result<()> {
        writeln!(
            out,
            "{name}: {}",
            lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    bucket("Indirect", &result.indirect_mode, out)?;
    bucket("Indirect with offset", &result.indirect_with_offset_mode, out)?;
    bucket("Pre-index", &result.pre_index_mode, out)?;
    bucket("Post-index", &result.post_index_mode, out)?;
    bucket("PC-relative", &result.pc_relative_mode, out)?;
    bucket("PC literal", &result.pc_literal_mode, out)?;
    bucket("Unsure", &result.unsure_mode, out)?;
    Ok(())
}

fn render_errors<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Errors Found")?;
    writeln!(out, "{RULE}")?;

    if !result.svc_exit_seen {
        writeln!(
            out,
            "No proper exit, svc 0, from program before .data section"
        )?;
    }
    if result.push_count != result.pop_count {
        let msg = if result.push_count > result.pop_count {
            "More pushes detected than pops. Ensure that all values are popped off the heap."
        } else {
            "More pops detected than pushes. Ensure that there is always a value on the heap before a Pop."
        };
        writeln!(out, "{msg}")?;
    }

    let lists: [&[String]; 11] = [
        &result.string_errors,
        &result.unwanted_instructions,
        &result.restricted_register_errors,
        &result.unused_conditional,
        &result.unused_label,
        &result.unused_variable,
        &result.unused_constant,
        &result.isolated_code,
        &result.no_return_errors,
        &result.lr_save_errors,
        &result.branch_out_errors,
    ];
    for list in lists {
        for msg in list {
            writeln!(out, "{msg}")?;
        }
    }
    for msg in &result.register_use_before_load {
        writeln!(out, "{msg}")?;
    }
    Ok(())
}

/// Whether two catastrophic conditions suppress report generation; the
/// caller prints the matching one-line stdout notice instead of rendering.
pub fn catastrophic_notice(result: &AnalysisResult) -> Option<&'static str> {
    if result.data_section_missing {
        Some("Analysis aborted: no .data section found in file.")
    } else if result.data_before_global {
        Some("Analysis aborted: .data section appears before .global.")
    } else {
        None
    }
}

pub const CSV_HEADER: &str = "File name, Last Accessed, Last Modified, \
Halstead's Total Operators, Total Operands, \
Unique Operators, Unique Operands, Length, Vocabulary, \
Volume, Difficulty, Effort";

/// One CSV row for `meta`/`result`. No generic escaping: operand/label text
/// never flows into these cells, so a hand-rolled join is sufficient.
pub fn csv_row(meta: &FileMetadata, result: &AnalysisResult) -> String {
    let m = metrics::compute(result);
    let mut row = String::new();
    write!(
        row,
        "{}, {}, {}, {}, {}, {}, {}, {}, {}, {:.2}, {:.2}, {:.2}",
        meta.file_name,
        meta.accessed.format("%c"),
        meta.modified.format("%c"),
        m.total_operators,
        m.total_operands,
        m.unique_operators,
        m.unique_operands,
        m.length,
        m.vocabulary,
        m.volume,
        m.difficulty,
        m.effort,
    )
    .expect("writing to a String never fails");
    row
}
