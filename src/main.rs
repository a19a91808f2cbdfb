//! `armalyzer` binary entry point: flag dispatch, directory traversal,
//! and wiring the engine's output to its four sinks.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use armalyzer::cli::{Cli, Mode};
use armalyzer::error::AnalyzerError;
use armalyzer::model::AnalysisResult;
use armalyzer::report::{self, FileMetadata, Sections};
use armalyzer::{analyze_file, AnalyzerResult};

const REPORTS_DIR: &str = "Reports";
const CSV_FILE: &str = "AEC_Dataset.csv";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(mode) = cli.mode() else {
        eprintln!("error: one of -m/-e/-r/-t/-c/-v must be given");
        return ExitCode::FAILURE;
    };

    match run(&cli.path, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "analysis failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, mode: Mode) -> AnalyzerResult<()> {
    match mode {
        Mode::Metrics => run_single(path, Sections::METRICS_ONLY, Sink::Stdout),
        Mode::Errors => run_single(path, Sections::ERRORS_ONLY, Sink::Stdout),
        Mode::Report => run_single(path, Sections::FULL_REPORT, Sink::ReportFile),
        Mode::Csv => run_single_csv(path),
        Mode::Tree => run_tree(path),
        Mode::CsvTree => run_csv_tree(path),
    }
}

enum Sink {
    Stdout,
    ReportFile,
}

fn run_single(path: &Path, sections: Sections, sink: Sink) -> AnalyzerResult<()> {
    if !path.is_file() {
        return Err(AnalyzerError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let (result, meta) = analyze_path(path)?;

    if let Some(notice) = report::catastrophic_notice(&result) {
        println!("{notice}");
        return Ok(());
    }

    match sink {
        Sink::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            report::render(&mut handle, &meta, &result, sections).map_err(|source| {
                AnalyzerError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
        }
        Sink::ReportFile => write_report_file(path, &meta, &result)?,
    }
    Ok(())
}

fn write_report_file(
    source_path: &Path,
    meta: &FileMetadata,
    result: &AnalysisResult,
) -> AnalyzerResult<()> {
    fs::create_dir_all(REPORTS_DIR).map_err(|source| AnalyzerError::CreateDir {
        path: PathBuf::from(REPORTS_DIR),
        source,
    })?;
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let out_path = Path::new(REPORTS_DIR).join(format!("{stem}_report.txt"));

    let mut file = File::create(&out_path).map_err(|source| AnalyzerError::Io {
        path: out_path.clone(),
        source,
    })?;
    report::render(&mut file, meta, result, Sections::FULL_REPORT).map_err(|source| {
        AnalyzerError::Io {
            path: out_path.clone(),
            source,
        }
    })?;
    info!(path = %out_path.display(), "wrote report");
    Ok(())
}

fn run_single_csv(path: &Path) -> AnalyzerResult<()> {
    if !path.is_file() {
        return Err(AnalyzerError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let (result, meta) = analyze_path(path)?;
    if let Some(notice) = report::catastrophic_notice(&result) {
        println!("{notice}");
        return Ok(());
    }
    append_csv_row(&meta, &result)
}

fn run_tree(dir: &Path) -> AnalyzerResult<()> {
    if !dir.is_dir() {
        return Err(AnalyzerError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    fs::create_dir_all(REPORTS_DIR).map_err(|source| AnalyzerError::CreateDir {
        path: PathBuf::from(REPORTS_DIR),
        source,
    })?;
    for entry in asm_files(dir)? {
        match analyze_path(&entry) {
            Ok((result, meta)) => {
                if let Some(notice) = report::catastrophic_notice(&result) {
                    println!("{notice}");
                    continue;
                }
                write_report_file(&entry, &meta, &result)?;
            }
            Err(err) => {
                warn!(file = %entry.display(), %err, "skipping unreadable file");
            }
        }
    }
    Ok(())
}

fn run_csv_tree(dir: &Path) -> AnalyzerResult<()> {
    if !dir.is_dir() {
        return Err(AnalyzerError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    for entry in asm_files(dir)? {
        match analyze_path(&entry) {
            Ok((result, meta)) => {
                if let Some(notice) = report::catastrophic_notice(&result) {
                    println!("{notice}");
                    continue;
                }
                append_csv_row(&meta, &result)?;
            }
            Err(err) => {
                warn!(file = %entry.display(), %err, "skipping unreadable file");
            }
        }
    }
    Ok(())
}

/// Non-recursive: one level of `read_dir`, `.s` files only, sorted for
/// deterministic CSV/report ordering across runs.
fn asm_files(dir: &Path) -> AnalyzerResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| AnalyzerError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "s"))
        .collect();
    files.sort();
    Ok(files)
}

fn append_csv_row(meta: &FileMetadata, result: &AnalysisResult) -> AnalyzerResult<()> {
    let existed = Path::new(CSV_FILE).exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CSV_FILE)
        .map_err(|source| AnalyzerError::Io {
            path: PathBuf::from(CSV_FILE),
            source,
        })?;

    let write = |file: &mut File, line: &str| -> AnalyzerResult<()> {
        writeln!(file, "{line}").map_err(|source| AnalyzerError::Io {
            path: PathBuf::from(CSV_FILE),
            source,
        })
    };

    if !existed {
        write(&mut file, report::CSV_HEADER)?;
    }
    write(&mut file, &report::csv_row(meta, result))
}

fn analyze_path(path: &Path) -> AnalyzerResult<(AnalysisResult, FileMetadata)> {
    let file = File::open(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result = analyze_file(BufReader::new(file));
    let meta = FileMetadata::read(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((result, meta))
}
