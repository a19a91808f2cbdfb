//! Post-scan structural checks: subroutine well-formedness and
//! unused-symbol detection.
//!
//! Everything here is cross-sectional — it reads the vectors the scan
//! accumulated (`labels`, `bl_call_lines`, `return_lines`, ...) rather than
//! reacting to a single line. It runs once, after the forward scan
//! completes.

use crate::model::AnalysisResult;

/// Run every structural check against a completed scan result, appending
/// to its diagnostic lists in place.
pub fn check(result: &mut AnalysisResult) {
    check_subroutines(result);
    check_unused_symbols(result);
}

/// The half-open `[start, end)` line span of each label, the last one
/// extending to `data_start_line` (or to the end of the file, if `.data`
/// never appeared).
fn label_spans(result: &AnalysisResult) -> Vec<(String, usize, usize)> {
    let file_end = if result.data_section_missing {
        usize::MAX
    } else {
        result.data_start_line
    };

    let mut spans = Vec::with_capacity(result.labels.len());
    for (idx, (name, start)) in result.labels.iter().enumerate() {
        let end = result
            .labels
            .get(idx + 1)
            .map(|(_, next_start)| *next_start)
            .unwrap_or(file_end);
        spans.push((name.clone(), *start, end));
    }
    spans
}

fn check_subroutines(result: &mut AnalysisResult) {
    let spans = label_spans(result);

    let mut no_return = Vec::new();
    let mut lr_save = Vec::new();
    let mut branch_out = Vec::new();

    for (name, start, end) in &spans {
        if !result.subroutines.contains(name) {
            continue;
        }
        let in_span = |line: &usize| *line >= *start && *line < *end;

        if !result.return_lines.iter().any(in_span) {
            no_return.push(format!("{name} has no return despite being a subroutine."));
        }

        let has_unsaved_call = result.bl_call_lines.iter().any(|&call| {
            in_span(&call)
                && !result
                    .lr_save_lines
                    .iter()
                    .any(|&save| save >= *start && save <= call)
        });
        if has_unsaved_call {
            lr_save.push(format!(
                "{name} has a call to a subroutine in it without saving the LR first."
            ));
        }

        for &bad in result.bad_branch_lines.iter().filter(in_span) {
            branch_out.push(format!("{name} branches out of the subroutine bounds at line {bad}"));
        }
    }

    result.no_return_errors.extend(no_return);
    result.lr_save_errors.extend(lr_save);
    result.branch_out_errors.extend(branch_out);
}

fn check_unused_symbols(result: &mut AnalysisResult) {
    for (name, _) in &result.labels {
        if !result.unique_operands.contains(name) {
            result.unused_label.push(format!("Unused label: {name}"));
        }
    }
    for name in &result.variables {
        if !result.unique_operands.contains(name) {
            result.unused_variable.push(format!("Unused variable: {name}"));
        }
    }
    for (name, def_line) in &result.constants {
        let used_elsewhere = result
            .operand_lines
            .get(name)
            .is_some_and(|lines| lines.iter().any(|&l| l != *def_line));
        if !used_elsewhere {
            result.unused_constant.push(format!("Unused constant: {name}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use std::io::Cursor;

    fn scan_str(src: &str) -> AnalysisResult {
        scanner::scan(Cursor::new(src.as_bytes()))
    }

    #[test]
    fn subroutine_without_return_is_reported() {
        let mut r = scan_str(concat!(
            ".global _start\n",
            "_start:\n",
            "    bl foo\n",
            "    svc 0\n",
            "foo:\n",
            "    mov r0, #1\n",
            ".data\n",
        ));
        check(&mut r);
        assert_eq!(
            r.no_return_errors,
            vec!["foo has no return despite being a subroutine."]
        );
    }

    #[test]
    fn subroutine_with_return_is_clean() {
        let mut r = scan_str(concat!(
            ".global _start\n",
            "_start:\n",
            "    bl foo\n",
            "    svc 0\n",
            "foo:\n",
            "    push {lr}\n",
            "    bx lr\n",
            ".data\n",
        ));
        check(&mut r);
        assert!(r.no_return_errors.is_empty());
        assert!(r.lr_save_errors.is_empty());
    }

    #[test]
    fn call_without_lr_save_is_reported() {
        let mut r = scan_str(concat!(
            ".global _start\n",
            "_start:\n",
            "    bl foo\n",
            "    svc 0\n",
            "foo:\n",
            "    bl bar\n",
            "    bx lr\n",
            "bar:\n",
            "    bx lr\n",
            ".data\n",
        ));
        check(&mut r);
        assert_eq!(
            r.lr_save_errors,
            vec!["foo has a call to a subroutine in it without saving the LR first."]
        );
    }

    #[test]
    fn unused_variable_is_reported() {
        let mut r = scan_str(concat!(
            ".global _start\n",
            "_start:\n",
            "    svc 0\n",
            ".data\n",
            "orphan:\n",
            "    .word 0\n",
        ));
        check(&mut r);
        assert_eq!(r.unused_variable, vec!["Unused variable: orphan"]);
    }

    #[test]
    fn unreferenced_equ_constant_is_reported() {
        let mut r = scan_str(concat!(
            ".global _start\n",
            "_start:\n",
            "    .equ UNUSED, 5\n",
            "    svc 0\n",
            ".data\n",
        ));
        check(&mut r);
        assert_eq!(r.unused_constant, vec!["Unused constant: UNUSED"]);
    }

    #[test]
    fn equ_constant_used_on_a_later_line_is_not_reported() {
        let mut r = scan_str(concat!(
            ".global _start\n",
            "_start:\n",
            "    .equ LEN, 5\n",
            "    mov r0, LEN\n",
            "    svc 0\n",
            ".data\n",
        ));
        check(&mut r);
        assert!(r.unused_constant.is_empty());
    }
}
