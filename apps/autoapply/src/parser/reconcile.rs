use crate::models::AnswerSet;

/// How a parsed [`AnswerSet`] lines up with the questions that were asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub expected: usize,
    /// Question indices with no answer.
    pub missing: Vec<usize>,
    /// Answer indices with no matching question.
    pub unexpected: Vec<usize>,
}

impl Reconciliation {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

pub fn reconcile(answers: &AnswerSet, expected: usize) -> Reconciliation {
    Reconciliation {
        expected,
        missing: (0..expected).filter(|i| answers.get(*i).is_none()).collect(),
        unexpected: answers.indices().filter(|i| *i >= expected).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::numbered::parse_lenient;

    #[test]
    fn test_complete_set() {
        let set = parse_lenient("1. a\n2. b");
        let rec = reconcile(&set, 2);
        assert!(rec.is_complete());
    }

    #[test]
    fn test_sparse_and_overflowing_set() {
        let set = parse_lenient("1. a\n3. c\n5. e");
        let rec = reconcile(&set, 3);
        assert_eq!(rec.missing, vec![1]);
        assert_eq!(rec.unexpected, vec![4]);
        assert!(!rec.is_complete());
    }

    #[test]
    fn test_no_questions_no_answers() {
        let rec = reconcile(&AnswerSet::new(), 0);
        assert!(rec.is_complete());
    }
}
