//! Halstead software-science metrics and cyclomatic complexity.

use crate::model::AnalysisResult;

/// The derived metrics the Reporter renders; kept out of `AnalysisResult`
/// since they are pure functions of its Halstead counters, not scan state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub total_operators: usize,
    pub total_operands: usize,
    pub unique_operators: usize,
    pub unique_operands: usize,
    pub length: usize,
    pub vocabulary: usize,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub cyclomatic: usize,
}

pub fn compute(result: &AnalysisResult) -> Metrics {
    let n1 = result.unique_operators.len();
    let n2 = result.unique_operands.len();
    let big_n1 = result.total_operators;
    let big_n2 = result.total_operands;

    let length = big_n1 + big_n2;
    let vocabulary = n1 + n2;

    let volume = if vocabulary >= 2 {
        length as f64 * (vocabulary as f64).log2()
    } else {
        0.0
    };

    let difficulty = if n2 >= 1 {
        (n1 as f64 / 2.0) * (big_n2 as f64 / n2 as f64)
    } else {
        0.0
    };

    let effort = difficulty * volume;

    Metrics {
        total_operators: big_n1,
        total_operands: big_n2,
        unique_operators: n1,
        unique_operands: n2,
        length,
        vocabulary,
        volume,
        difficulty,
        effort,
        cyclomatic: result.cyclomatic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use std::io::Cursor;

    #[test]
    fn volume_is_positive_at_vocabulary_floor() {
        let r = scanner::scan(Cursor::new(b"svc 0\n" as &[u8]));
        // "svc" operator, "0" operand -> vocabulary 2, right at the floor.
        let m = compute(&r);
        assert!(m.volume > 0.0);
    }

    #[test]
    fn empty_input_has_zero_metrics() {
        let r = scanner::scan(Cursor::new(b"" as &[u8]));
        let m = compute(&r);
        assert_eq!(m.volume, 0.0);
        assert_eq!(m.difficulty, 0.0);
        assert_eq!(m.effort, 0.0);
        assert_eq!(m.cyclomatic, 1);
    }

    #[test]
    fn cyclomatic_counts_branch_lines() {
        let r = scanner::scan(Cursor::new(
            b"b a\nbl b\nbx lr\na:\nb:\nsvc 0\n" as &[u8],
        ));
        let m = compute(&r);
        assert_eq!(m.cyclomatic, 4);
    }
}
