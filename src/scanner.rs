//! The forward-scan engine: one pass over a file's lines, dispatching
//! per-operator reactions and populating [`AnalysisResult`].
//!
//! This is the busiest module in the crate. Each line is classified once
//! ([`crate::line::classify_line`]), tokenized once ([`crate::token::tokenize`]),
//! and then routed through exactly one of three branches — directive,
//! definition, operator — with operand handling shared across all three.

use std::io::BufRead;

use tracing::{debug, trace};

use crate::line::{self, LineKind};
use crate::model::{AddressingMode, AnalysisResult, BranchKind, OperatorKind};
use crate::operand;
use crate::state::{LineState, ScanState};
use crate::token;

const DATA_STRING_EXCLUSIONS: [&str; 3] =
    ["numInputPattern:", "strInputPattern:", "strInputError:"];

/// Run the forward scan over every line of `reader`, returning the
/// populated (pre-structural-check) analysis result.
pub fn scan<R: BufRead>(reader: R) -> AnalysisResult {
    let mut result = AnalysisResult::new();
    let mut state = ScanState::new();

    for item in line::LineReader::new(reader) {
        let (line_no, raw) = match item {
            Ok(pair) => pair,
            // A non-UTF8 or otherwise unreadable line is treated as blank;
            // the line reader itself never aborts the scan.
            Err(_) => continue,
        };
        scan_line(&mut state, &mut result, line_no, &raw);
    }

    result.data_section_missing = !state.data_section_seen;
    result.data_start_line = state.data_start_line;
    result
}

fn scan_line(state: &mut ScanState, result: &mut AnalysisResult, line_no: usize, raw: &str) {
    result.total_lines += 1;
    let classified = line::classify_line(raw);

    match classified.kind {
        LineKind::Blank => {
            result.blank_lines += 1;
            return;
        }
        LineKind::FullComment => {
            result.full_comment_lines += 1;
            return;
        }
        LineKind::CodeWithComment => result.lines_with_comment += 1,
        LineKind::CodeWithoutComment => result.lines_without_comment += 1,
    }

    let tokens = token::tokenize(classified.pre_comment);
    let Some(&t1) = tokens.first() else {
        return;
    };
    trace!(line_no, t1, "scanning code line");

    let mut line_state = LineState::new();

    if token::is_directive(t1) {
        scan_directive(state, result, &tokens, line_no);
    } else if token::is_definition(t1) {
        scan_definition(state, result, t1, line_no);
    } else {
        scan_operator(state, result, &mut line_state, &tokens, line_no);
    }

    check_data_string(state, result, classified.pre_comment, line_no);
}

fn scan_directive(
    state: &mut ScanState,
    result: &mut AnalysisResult,
    tokens: &[&str],
    line_no: usize,
) {
    let name = tokens[0].to_ascii_lowercase();
    result.directive_lines += 1;
    result
        .directive_uses
        .entry(name.clone())
        .or_default()
        .push(line_no);

    match name.as_str() {
        ".global" => {
            state.global_seen = true;
            state.in_data_section = false;
        }
        ".data" => {
            if !state.global_seen {
                state.data_before_global = true;
                result.data_before_global = true;
            }
            state.in_data_section = true;
            state.data_section_seen = true;
            state.data_start_line = line_no;
        }
        ".text" => state.in_data_section = false,
        ".equ" => {
            if let Some(&raw_operand) = tokens.get(1) {
                let name = raw_operand.strip_suffix(',').unwrap_or(raw_operand);
                result.constants.push((name.to_string(), line_no));
                record_operand(result, raw_operand, line_no);
            }
        }
        _ => {}
    }
}

fn scan_definition(state: &mut ScanState, result: &mut AnalysisResult, t1: &str, line_no: usize) {
    let name = t1.trim_end_matches(':').to_string();
    if state.in_data_section {
        result.variables.push(name);
    } else {
        result.labels.push((name, line_no));
        state.pending_isolation_check = false;
    }
}

fn scan_operator(
    state: &mut ScanState,
    result: &mut AnalysisResult,
    line_state: &mut LineState,
    tokens: &[&str],
    line_no: usize,
) {
    let t1 = tokens[0];
    let kind = token::classify_operator(t1);
    result.total_operators += 1;
    result.unique_operators.insert(t1.to_ascii_lowercase());
    line_state.operator_kind = Some(kind);

    resolve_pending_conditional(state, result, t1, line_no);
    resolve_pending_isolation(state, result, line_no);

    match kind {
        OperatorKind::Branch(branch_kind) => {
            result.cyclomatic += 1;
            line_state.branch_kind = Some(branch_kind);
            line_state.is_unconditional_branch = token::is_unconditional_branch(t1);
            if line_state.is_unconditional_branch {
                state.pending_isolation_check = true;
            }
            react_branch(state, result, branch_kind, tokens, line_no);
        }
        OperatorKind::Load => line_state.restricted_register_check = true,
        OperatorKind::Move => {
            line_state.restricted_register_check = true;
            react_move(result, tokens, line_no);
        }
        OperatorKind::Store => {}
        OperatorKind::Compare => state.pending_conditional_check = Some(line_no),
        OperatorKind::SupervisorCall => {
            line_state.svc_active = !state.in_data_section;
        }
        OperatorKind::Push => line_state.is_push = true,
        OperatorKind::Pop => line_state.is_pop = true,
        OperatorKind::Unwanted => result
            .unwanted_instructions
            .push(format!("Unwanted instruction '{t1}' at line {line_no}")),
        OperatorKind::Other => {}
    }

    if let OperatorKind::Load | OperatorKind::Store = kind {
        let mode = classify_addressing(tokens);
        bucket(result, mode).push(line_no);
    }

    for (idx, &raw_operand) in tokens.iter().enumerate().skip(1) {
        let token_index = idx + 1;
        if line_state.is_push || line_state.is_pop {
            react_push_pop(state, result, line_state, raw_operand, line_no);
        }
        if line_state.svc_active && token_index == 2 {
            react_svc(result, raw_operand, line_no);
        }
        record_operand(result, raw_operand, line_no);
        classify_register_use(state, result, line_state, raw_operand, token_index, line_no);
    }
}

fn resolve_pending_conditional(
    state: &mut ScanState,
    result: &mut AnalysisResult,
    operator_token: &str,
    line_no: usize,
) {
    let Some(cmp_line) = state.pending_conditional_check.take() else {
        return;
    };

    let reported_line = if operator_token.len() >= 3 {
        if token::ends_with_condition_code(operator_token) {
            return;
        }
        line_no.saturating_sub(1)
    } else {
        cmp_line
    };
    result.unused_conditional.push(format!(
        "Condition flag updated but unused at line {reported_line}"
    ));
}

fn resolve_pending_isolation(state: &ScanState, result: &mut AnalysisResult, line_no: usize) {
    if state.pending_isolation_check {
        result
            .isolated_code
            .push(format!("Code after unconditional branch at line {line_no}"));
    }
}

fn react_branch(
    state: &mut ScanState,
    result: &mut AnalysisResult,
    branch_kind: BranchKind,
    tokens: &[&str],
    line_no: usize,
) {
    let Some(&raw_target) = tokens.get(1) else {
        return;
    };
    let target = operand::normalize(raw_target);

    if target.eq_ignore_ascii_case("scanf") || target.eq_ignore_ascii_case("printf") {
        for r in 0..=3 {
            state.register_loaded.remove(&r);
        }
        return;
    }

    match branch_kind {
        BranchKind::Link => {
            result
                .subroutine_uses
                .push(format!("bl {target} at line {line_no}"));
            result.subroutines.insert(target);
            result.bl_call_lines.push(line_no);
        }
        BranchKind::Exchange if target.eq_ignore_ascii_case("lr") => {
            result.return_lines.push(line_no);
            result
                .subroutine_uses
                .push(format!("bx lr at line {line_no}"));
        }
        BranchKind::Plain | BranchKind::Exchange => {
            result
                .branch_uses
                .push(format!("branch to {target} at line {line_no}"));
            result.bad_branch_lines.push(line_no);
        }
    }
}

fn react_move(result: &mut AnalysisResult, tokens: &[&str], line_no: usize) {
    if tokens.len() != 3 {
        return;
    }
    let dest = operand::normalize(tokens[1]);
    let src = operand::normalize(tokens[2]);
    if !src.eq_ignore_ascii_case("lr") {
        return;
    }
    if dest.eq_ignore_ascii_case("pc") {
        result.return_lines.push(line_no);
    } else {
        result.lr_save_lines.push(line_no);
    }
}

fn react_push_pop(
    state: &mut ScanState,
    result: &mut AnalysisResult,
    line_state: &LineState,
    raw_operand: &str,
    line_no: usize,
) {
    let normalized = operand::normalize(raw_operand);
    if line_state.is_push {
        if normalized.eq_ignore_ascii_case("lr") {
            result.lr_save_lines.push(line_no);
        }
        if operand::as_register(&normalized).is_some() {
            state.push_count += 1;
            result.push_count += 1;
        }
    } else if operand::as_register(&normalized).is_some() {
        state.pop_count += 1;
        result.pop_count += 1;
    }
}

fn react_svc(result: &mut AnalysisResult, raw_operand: &str, line_no: usize) {
    let normalized = operand::normalize(raw_operand);
    if normalized == "0" {
        result.svc_exit_seen = true;
    }
    result
        .svc_uses
        .push(format!("svc {normalized} at line {line_no}"));
}

/// Normalize `raw_operand`, add it to the Halstead operand tally, and log
/// the line it occurred on (so the unused-symbol check can tell a `.equ`
/// constant's defining line apart from a later, genuine use).
fn record_operand(result: &mut AnalysisResult, raw_operand: &str, line_no: usize) {
    let normalized = operand::normalize(raw_operand);
    result.total_operands += 1;
    result
        .operand_lines
        .entry(normalized.clone())
        .or_default()
        .insert(line_no);
    result.unique_operands.insert(normalized);
}

fn classify_register_use(
    state: &mut ScanState,
    result: &mut AnalysisResult,
    line_state: &mut LineState,
    raw_operand: &str,
    token_index: usize,
    line_no: usize,
) {
    let normalized = operand::normalize(raw_operand);
    let Some(reg) = operand::as_register(&normalized) else {
        return;
    };

    result.register_lines[reg as usize].insert(line_no);

    if crate::model::is_restricted(reg) {
        if line_state.restricted_register_check {
            result.restricted_register_errors.push(format!(
                "Improper use of restricted register r{reg} at line {line_no}"
            ));
        }
        return;
    }

    let operator_kind = line_state.operator_kind;
    let is_first_operand = token_index == 2;

    let marks_loaded = if line_state.is_pop {
        true
    } else {
        is_first_operand
            && !matches!(
                operator_kind,
                Some(OperatorKind::Compare) | Some(OperatorKind::Store)
            )
    };

    if marks_loaded {
        state.register_loaded.insert(reg);
        return;
    }

    // `cmp`'s first operand hits neither the mark-loaded rule (it's excluded)
    // nor the use-before-load check (that only fires for `str`'s first
    // operand or a non-first operand of any operator) — skip silently.
    let is_cmp_first_operand =
        is_first_operand && matches!(operator_kind, Some(OperatorKind::Compare));
    if is_cmp_first_operand {
        return;
    }

    if !state.register_loaded.contains(&reg) && line_state.reported_use_before_load.insert(reg) {
        result.register_use_before_load.push(format!(
            "Register r{reg} used before being loaded at line {line_no}"
        ));
    }
}

fn classify_addressing(tokens: &[&str]) -> AddressingMode {
    let n = tokens.len();
    let joined_has = |needle: char| tokens.iter().any(|t| t.contains(needle));

    if joined_has('=') {
        return AddressingMode::PcLiteral;
    }
    if n == 3 {
        return AddressingMode::Indirect;
    }
    if joined_has('!') {
        return AddressingMode::PreIndex;
    }
    if tokens.iter().any(|t| t.to_ascii_lowercase().contains("pc")) {
        return AddressingMode::PcRelative;
    }
    if n == 4 {
        let last = tokens[n - 1];
        if last.ends_with(']') {
            return AddressingMode::IndirectWithOffset;
        }
        if !last.ends_with('!') {
            return AddressingMode::PostIndex;
        }
    }
    AddressingMode::Unsure
}

fn bucket(result: &mut AnalysisResult, mode: AddressingMode) -> &mut Vec<usize> {
    match mode {
        AddressingMode::Indirect => &mut result.indirect_mode,
        AddressingMode::IndirectWithOffset => &mut result.indirect_with_offset_mode,
        AddressingMode::PreIndex => &mut result.pre_index_mode,
        AddressingMode::PostIndex => &mut result.post_index_mode,
        AddressingMode::PcRelative => &mut result.pc_relative_mode,
        AddressingMode::PcLiteral => &mut result.pc_literal_mode,
        AddressingMode::Unsure => &mut result.unsure_mode,
    }
}

fn check_data_string(state: &ScanState, result: &mut AnalysisResult, pre_comment: &str, line_no: usize) {
    if !state.in_data_section {
        return;
    }
    if !pre_comment.contains('"') || pre_comment.contains("\\n\"") {
        return;
    }
    let trimmed = pre_comment.trim_start();
    if DATA_STRING_EXCLUSIONS
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return;
    }
    result
        .string_errors
        .push(format!("String did not end with \\n at line {line_no}"));
    debug!(line_no, "unterminated data string");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan_str(src: &str) -> AnalysisResult {
        scan(Cursor::new(src.as_bytes()))
    }

    #[test]
    fn counts_blank_and_comment_lines() {
        let r = scan_str("\n@ a comment\nmov r0, #1\n");
        assert_eq!(r.blank_lines, 1);
        assert_eq!(r.full_comment_lines, 1);
        assert_eq!(r.lines_without_comment, 1);
    }

    #[test]
    fn directive_sets_data_section_flags() {
        let r = scan_str(".global _start\n_start:\nmov r0, #1\n.data\n");
        assert!(!r.data_before_global);
        assert_eq!(r.directive_uses.get(".global").unwrap(), &vec![1]);
        assert_eq!(r.labels, vec![("_start".to_string(), 2)]);
    }

    #[test]
    fn data_before_global_is_flagged() {
        let r = scan_str(".data\n.global _start\n");
        assert!(r.data_before_global);
    }

    #[test]
    fn cmp_without_conditional_use_is_reported() {
        let r = scan_str(
            ".global _start\n_start:\n    cmp r0, #0\n    mov r1, #1\n    svc 0\n.data\n",
        );
        assert_eq!(
            r.unused_conditional,
            vec!["Condition flag updated but unused at line 3"]
        );
    }

    #[test]
    fn unconditional_branch_isolates_until_label() {
        let r = scan_str(
            ".global _start\n_start:\n    b end\n    mov r0, #1\nend:\n    svc 0\n.data\n",
        );
        assert_eq!(
            r.isolated_code,
            vec!["Code after unconditional branch at line 4"]
        );
    }

    #[test]
    fn push_pop_imbalance_counts_register_operands() {
        let r = scan_str("push {r4, r5}\npop {r4}\n");
        assert_eq!(r.push_count, 2);
        assert_eq!(r.pop_count, 1);
    }

    #[test]
    fn restricted_register_still_recorded_in_register_lines() {
        let r = scan_str("mov r13, #0\n");
        assert_eq!(r.register_lines[13], [1].into_iter().collect());
    }

    #[test]
    fn restricted_register_on_mov_is_flagged() {
        let r = scan_str("mov r13, #0\n");
        assert_eq!(
            r.restricted_register_errors,
            vec!["Improper use of restricted register r13 at line 1"]
        );
    }

    #[test]
    fn svc_zero_outside_data_sets_exit_seen_via_uses_log() {
        let r = scan_str("svc 0\n");
        assert_eq!(r.svc_uses, vec!["svc 0 at line 1"]);
    }

    #[test]
    fn bl_target_becomes_subroutine() {
        let r = scan_str("bl foo\n");
        assert!(r.subroutines.contains("foo"));
        assert_eq!(r.bl_call_lines, vec![1]);
    }

    #[test]
    fn use_before_load_is_reported_once_per_register_per_line() {
        let r = scan_str("add r0, r1, r1\n");
        assert_eq!(
            r.register_use_before_load,
            vec!["Register r1 used before being loaded at line 1"]
        );
    }

    #[test]
    fn data_string_without_newline_escape_is_flagged() {
        let r = scan_str(".data\nmsg: .asciz \"hello\"\n");
        assert_eq!(
            r.string_errors,
            vec!["String did not end with \\n at line 2"]
        );
    }

    #[test]
    fn data_string_exclusion_prefixes_are_skipped() {
        let r = scan_str(".data\nnumInputPattern: .asciz \"%d\"\n");
        assert!(r.string_errors.is_empty());
    }

    #[test]
    fn addressing_mode_buckets() {
        // n == 3 takes priority over the '!' test, so pre-index needs a
        // fourth token (an explicit offset) to land in its own bucket.
        let r = scan_str(concat!(
            "ldr r0, =value\n",
            "ldr r1, [r2]\n",
            "ldr r3, [r4, #4]!\n",
            "ldr r5, [pc, #4]\n",
            "ldr r6, [r7, #4]\n",
            "ldr r8, [r9], #4\n",
        ));
        assert_eq!(r.pc_literal_mode, vec![1]);
        assert_eq!(r.indirect_mode, vec![2]);
        assert_eq!(r.pre_index_mode, vec![3]);
        assert_eq!(r.pc_relative_mode, vec![4]);
        assert_eq!(r.indirect_with_offset_mode, vec![5]);
        assert_eq!(r.post_index_mode, vec![6]);
    }
}
