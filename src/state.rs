//! Scan state.
//!
//! `ScanState` carries the facts that must survive from one line to the
//! next (section membership, deferred checks, register definedness).
//! `LineState` is the transient, per-line scratch space the Design Notes
//! ask for: it is rebuilt at the top of every line and never read by a
//! later line.

use std::collections::BTreeSet;

use crate::model::{BranchKind, OperatorKind, RegisterId};

/// Facts that persist across the whole forward scan of one file.
#[derive(Debug, Default)]
pub struct ScanState {
    pub in_data_section: bool,
    pub data_section_seen: bool,
    pub global_seen: bool,
    pub data_before_global: bool,
    pub data_start_line: usize,

    /// Set when the previous operator was `cmp`; consumed by the next
    /// operator token. Holds the line the `cmp` appeared on.
    pub pending_conditional_check: Option<usize>,

    /// Set after an unconditional `b`; cleared by the next label.
    pub pending_isolation_check: bool,

    /// Monotonic during the scan: a register enters once it is loaded.
    pub register_loaded: BTreeSet<RegisterId>,

    pub push_count: usize,
    pub pop_count: usize,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-line scratch space, reset at the start of every line.
#[derive(Debug, Default)]
pub struct LineState {
    /// Kind of this line's operator token, if the line has one.
    pub operator_kind: Option<OperatorKind>,
    pub branch_kind: Option<BranchKind>,
    pub is_unconditional_branch: bool,

    /// `ldr*`/`mov*` on this line: subsequent operands are checked against
    /// the restricted-register set (r13-r15).
    pub restricted_register_check: bool,

    /// This line's operator is `pop`: every register operand is loaded.
    pub is_pop: bool,
    /// This line's operator is `push`.
    pub is_push: bool,

    /// `svc`/`SVC` outside `.data`: the next operand drives the exit flag.
    pub svc_active: bool,

    /// Registers already reported as "used before loaded" on this line,
    /// so at most one message per register per line is emitted.
    pub reported_use_before_load: BTreeSet<RegisterId>,
}

impl LineState {
    pub fn new() -> Self {
        Self::default()
    }
}
