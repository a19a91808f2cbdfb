//! Shared data types for the analysis engine.
//!
//! `TokenRole`, `OperatorKind`, and `AddressingMode` are the tagged variants
//! the token and line classifiers assign; `AnalysisResult` is the single
//! record the scan produces and the reporter consumes read-only.

use std::collections::{BTreeMap, BTreeSet};

/// Role assigned to a token. Depends on position within the line and on
/// scan state, not on lexical shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Operator,
    Operand,
    Directive,
    LabelDef,
    VariableDef,
    ConstantDef,
    Unknown,
}

/// The branch sub-kind, distinguished by exact spelling of the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Plain,
    Link,
    Exchange,
}

/// Structural family of an operator mnemonic. Recognition is by
/// case-insensitive prefix/exact match against curated sets; anything
/// unmatched is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Branch(BranchKind),
    Load,
    Store,
    Move,
    Compare,
    Push,
    Pop,
    SupervisorCall,
    Unwanted,
    Other,
}

/// Addressing mode of a line containing a load or store. Assigned by the
/// ordered, non-mutually-exclusive cascade in `addressing::classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Indirect,
    IndirectWithOffset,
    PreIndex,
    PostIndex,
    PcRelative,
    PcLiteral,
    Unsure,
}

/// A general-purpose register index, 0..=15. Registers 13-15 are
/// restricted: forbidden as the operand of `mov`/`ldr`.
pub type RegisterId = u32;

pub const RESTRICTED_REGISTERS: [RegisterId; 3] = [13, 14, 15];

pub fn is_restricted(reg: RegisterId) -> bool {
    RESTRICTED_REGISTERS.contains(&reg)
}

/// The structured record the engine hands to the reporter. Populated by the
/// scan and the post-scan structural checker; read-only from that point on.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    // Counts
    pub total_lines: usize,
    pub blank_lines: usize,
    pub full_comment_lines: usize,
    pub lines_with_comment: usize,
    pub lines_without_comment: usize,
    pub directive_lines: usize,
    pub cyclomatic: usize,

    // Halstead inputs
    pub total_operators: usize,
    pub total_operands: usize,
    pub unique_operators: BTreeSet<String>,
    pub unique_operands: BTreeSet<String>,

    /// Every normalized operand's occurrence lines, keyed by its canonical
    /// form. A superset of `unique_operands`'s keys with line detail —
    /// used by the unused-symbol check to tell a `.equ` constant's own
    /// defining line apart from a genuine later use.
    pub operand_lines: BTreeMap<String, BTreeSet<usize>>,

    // Symbol tables
    pub labels: Vec<(String, usize)>,
    pub variables: Vec<String>,
    /// `.equ`-defined constant names with the line each was declared on.
    pub constants: Vec<(String, usize)>,
    pub subroutines: BTreeSet<String>,

    // Per-register use
    pub register_lines: [BTreeSet<usize>; 16],

    // Diagnostic lists (each already carries line numbers in the message)
    pub string_errors: Vec<String>,
    pub unwanted_instructions: Vec<String>,
    pub restricted_register_errors: Vec<String>,
    pub unused_conditional: Vec<String>,
    pub unused_label: Vec<String>,
    pub unused_variable: Vec<String>,
    pub unused_constant: Vec<String>,
    pub isolated_code: Vec<String>,
    pub no_return_errors: Vec<String>,
    pub lr_save_errors: Vec<String>,
    pub branch_out_errors: Vec<String>,
    pub register_use_before_load: Vec<String>,

    // Raw audit logs
    pub svc_uses: Vec<String>,
    pub subroutine_uses: Vec<String>,
    pub branch_uses: Vec<String>,
    pub directive_uses: BTreeMap<String, Vec<usize>>,

    // Addressing mode buckets
    pub indirect_mode: Vec<usize>,
    pub indirect_with_offset_mode: Vec<usize>,
    pub pre_index_mode: Vec<usize>,
    pub post_index_mode: Vec<usize>,
    pub pc_relative_mode: Vec<usize>,
    pub pc_literal_mode: Vec<usize>,
    pub unsure_mode: Vec<usize>,

    // Cross-reference aids, consumed only by the structural checker
    pub return_lines: Vec<usize>,
    pub bl_call_lines: Vec<usize>,
    pub lr_save_lines: Vec<usize>,
    pub bad_branch_lines: Vec<usize>,

    // Push/pop balance (message emitted by the reporter, not a diagnostic list)
    pub push_count: usize,
    pub pop_count: usize,

    // Fatality flags
    pub data_section_missing: bool,
    pub data_before_global: bool,
    /// Line `.data` first appeared on; 0 if it never did.
    pub data_start_line: usize,

    // Exit check
    pub svc_exit_seen: bool,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            total_lines: 0,
            blank_lines: 0,
            full_comment_lines: 0,
            lines_with_comment: 0,
            lines_without_comment: 0,
            directive_lines: 0,
            cyclomatic: 1,
            total_operators: 0,
            total_operands: 0,
            unique_operators: BTreeSet::new(),
            unique_operands: BTreeSet::new(),
            operand_lines: BTreeMap::new(),
            labels: Vec::new(),
            variables: Vec::new(),
            constants: Vec::new(),
            subroutines: BTreeSet::new(),
            register_lines: std::array::from_fn(|_| BTreeSet::new()),
            string_errors: Vec::new(),
            unwanted_instructions: Vec::new(),
            restricted_register_errors: Vec::new(),
            unused_conditional: Vec::new(),
            unused_label: Vec::new(),
            unused_variable: Vec::new(),
            unused_constant: Vec::new(),
            isolated_code: Vec::new(),
            no_return_errors: Vec::new(),
            lr_save_errors: Vec::new(),
            branch_out_errors: Vec::new(),
            register_use_before_load: Vec::new(),
            svc_uses: Vec::new(),
            subroutine_uses: Vec::new(),
            branch_uses: Vec::new(),
            directive_uses: BTreeMap::new(),
            indirect_mode: Vec::new(),
            indirect_with_offset_mode: Vec::new(),
            pre_index_mode: Vec::new(),
            post_index_mode: Vec::new(),
            pc_relative_mode: Vec::new(),
            pc_literal_mode: Vec::new(),
            unsure_mode: Vec::new(),
            return_lines: Vec::new(),
            bl_call_lines: Vec::new(),
            lr_save_lines: Vec::new(),
            bad_branch_lines: Vec::new(),
            push_count: 0,
            pop_count: 0,
            data_section_missing: false,
            data_before_global: false,
            data_start_line: 0,
            svc_exit_seen: false,
        }
    }
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff either catastrophic condition suppresses report generation.
    pub fn is_catastrophic(&self) -> bool {
        self.data_section_missing || self.data_before_global
    }
}
