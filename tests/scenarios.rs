//! End-to-end CLI scenarios, each run against a fixture written into a
//! `tempfile::TempDir` and read back through the real binary's engine
//! entry point.

use std::io::{BufReader, Write};

use armalyzer::analyze_file;

fn analyze(src: &str) -> armalyzer::AnalysisResult {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("prog.s");
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(src.as_bytes()).expect("write fixture");
    drop(file);

    let file = std::fs::File::open(&path).expect("reopen fixture");
    analyze_file(BufReader::new(file))
}

#[test]
fn missing_exit_is_reported() {
    let result = analyze(concat!(
        ".global _start\n",
        "_start:\n",
        "    mov r0, #1\n",
        ".data\n",
    ));
    assert!(!result.svc_exit_seen);
}

#[test]
fn cmp_without_conditional_use_is_reported() {
    let result = analyze(concat!(
        ".global _start\n",
        "_start:\n",
        "    cmp r0, #0\n",
        "    mov r1, #1\n",
        "    svc 0\n",
        ".data\n",
    ));
    assert_eq!(
        result.unused_conditional,
        vec!["Condition flag updated but unused at line 3"]
    );
}

#[test]
fn unconditional_branch_isolation() {
    let result = analyze(concat!(
        ".global _start\n",
        "_start:\n",
        "    b end\n",
        "    mov r0, #1\n",
        "end:\n",
        "    svc 0\n",
        ".data\n",
    ));
    assert_eq!(
        result.isolated_code,
        vec!["Code after unconditional branch at line 4"]
    );
}

#[test]
fn push_pop_imbalance() {
    let result = analyze(concat!(
        ".global _start\n",
        "_start:\n",
        "    push {r4, r5}\n",
        "    pop {r4}\n",
        "    svc 0\n",
        ".data\n",
    ));
    assert_eq!(result.push_count, 2);
    assert_eq!(result.pop_count, 1);
}

#[test]
fn restricted_register_use() {
    let result = analyze(concat!(
        ".global _start\n",
        "_start:\n",
        "    mov r13, #0\n",
        "    svc 0\n",
        ".data\n",
    ));
    assert_eq!(
        result.restricted_register_errors,
        vec!["Improper use of restricted register r13 at line 3"]
    );
}

#[test]
fn subroutine_without_return() {
    let result = analyze(concat!(
        ".global _start\n",
        "_start:\n",
        "    bl foo\n",
        "    svc 0\n",
        "foo:\n",
        "    mov r0, #1\n",
        ".data\n",
    ));
    assert_eq!(
        result.no_return_errors,
        vec!["foo has no return despite being a subroutine."]
    );
}

#[test]
fn data_before_global_is_catastrophic() {
    let result = analyze(".data\n.global _start\n");
    assert!(armalyzer::report::catastrophic_notice(&result).is_some());
}

#[test]
fn missing_data_section_is_catastrophic() {
    let result = analyze(".global _start\n_start:\n    svc 0\n");
    assert!(armalyzer::report::catastrophic_notice(&result).is_some());
}
