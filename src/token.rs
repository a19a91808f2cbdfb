//! Tokenizer and operator-kind recognition.
//!
//! Tokenizing is a plain whitespace split of the pre-comment substring.
//! Operator-kind recognition is case-insensitive prefix/exact matching
//! against small curated sets; anything unmatched is [`OperatorKind::Other`].

use crate::model::{BranchKind, OperatorKind};

/// Split a pre-comment substring into its ordered tokens.
pub fn tokenize(pre_comment: &str) -> Vec<&str> {
    pre_comment.split_whitespace().collect()
}

/// `true` if a token opens a directive: starts with `.` followed by a letter.
pub fn is_directive(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some('.'), Some(c)) => c.is_alphabetic(),
        _ => false,
    }
}

/// `true` if a token is a label/variable definition: ends with `:`.
pub fn is_definition(token: &str) -> bool {
    token.ends_with(':') && token.len() > 1
}

fn branch_kind(lower: &str) -> BranchKind {
    match lower {
        "bl" => BranchKind::Link,
        "bx" => BranchKind::Exchange,
        _ => BranchKind::Plain,
    }
}

/// `true` for the exact unconditional branch mnemonic (`b`/`B`) — the one
/// that arms `pending_isolation_check`. Other `b*` conditional mnemonics
/// (`bne`, `beq`, ...) classify as [`BranchKind::Plain`] too but do not arm it.
pub fn is_unconditional_branch(token: &str) -> bool {
    token.eq_ignore_ascii_case("b")
}

/// Classify an operator token by its structural family. Order mirrors the
/// original analyzer's dispatch chain and is significant: a token matching
/// an earlier rule never falls through to a later one.
pub fn classify_operator(token: &str) -> OperatorKind {
    let lower = token.to_ascii_lowercase();

    if lower.starts_with('b') {
        return OperatorKind::Branch(branch_kind(&lower));
    }
    if matches!(lower.as_str(), "swi" | "ldm" | "ltm") {
        return OperatorKind::Unwanted;
    }
    if lower.contains("ldr") {
        return OperatorKind::Load;
    }
    if lower.contains("mov") {
        return OperatorKind::Move;
    }
    if lower.contains("str") {
        return OperatorKind::Store;
    }
    if lower.contains("svc") {
        return OperatorKind::SupervisorCall;
    }
    if lower == "cmp" {
        return OperatorKind::Compare;
    }
    if lower.contains("push") {
        return OperatorKind::Push;
    }
    if lower.contains("pop") {
        return OperatorKind::Pop;
    }
    OperatorKind::Other
}

/// The ARM condition-code suffixes a `cmp` consumer must end in.
pub const CONDITION_CODES: [&str; 15] = [
    "eq", "ne", "ge", "lt", "gt", "le", "cs", "cc", "mi", "pl", "vs", "vc", "hi", "ls", "al",
];

pub fn ends_with_condition_code(token: &str) -> bool {
    if token.len() < 2 {
        return false;
    }
    let tail = token[token.len() - 2..].to_ascii_lowercase();
    CONDITION_CODES.contains(&tail.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_on_whitespace() {
        assert_eq!(tokenize("  mov   r0, #1 "), vec!["mov", "r0,", "#1"]);
    }

    #[test]
    fn directive_requires_letter_after_dot() {
        assert!(is_directive(".global"));
        assert!(!is_directive(".1"));
        assert!(!is_directive("mov"));
    }

    #[test]
    fn definition_ends_with_colon() {
        assert!(is_definition("loop:"));
        assert!(!is_definition(":"));
        assert!(!is_definition("mov"));
    }

    #[test]
    fn branch_kinds() {
        assert_eq!(
            classify_operator("b"),
            OperatorKind::Branch(BranchKind::Plain)
        );
        assert_eq!(
            classify_operator("BNE"),
            OperatorKind::Branch(BranchKind::Plain)
        );
        assert_eq!(
            classify_operator("bl"),
            OperatorKind::Branch(BranchKind::Link)
        );
        assert_eq!(
            classify_operator("BX"),
            OperatorKind::Branch(BranchKind::Exchange)
        );
        assert!(is_unconditional_branch("B"));
        assert!(!is_unconditional_branch("bne"));
    }

    #[test]
    fn other_operator_kinds() {
        assert_eq!(classify_operator("LDR"), OperatorKind::Load);
        assert_eq!(classify_operator("mov"), OperatorKind::Move);
        assert_eq!(classify_operator("strb"), OperatorKind::Store);
        assert_eq!(classify_operator("SVC"), OperatorKind::SupervisorCall);
        assert_eq!(classify_operator("cmp"), OperatorKind::Compare);
        assert_eq!(classify_operator("push"), OperatorKind::Push);
        assert_eq!(classify_operator("pop"), OperatorKind::Pop);
        assert_eq!(classify_operator("SWI"), OperatorKind::Unwanted);
        assert_eq!(classify_operator("add"), OperatorKind::Other);
    }

    #[test]
    fn condition_code_suffixes() {
        assert!(ends_with_condition_code("moveq"));
        assert!(ends_with_condition_code("BNE"));
        assert!(!ends_with_condition_code("mov"));
        assert!(!ends_with_condition_code("a"));
    }
}
