use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerMap, AnswerValue};
use crate::visibility::VisibilityMap;

/// Boolean expression over sibling attribute answers, used for visibility
/// gates and conditional value triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DependencyExpr {
    /// The sibling's answer matches the given choice key.
    Eq { code: String, value: String },
    /// The sibling's answer matches any of the given choice keys.
    In { code: String, values: Vec<String> },
    /// The sibling has a non-empty answer.
    Answered { code: String },
    And { clauses: Vec<DependencyExpr> },
    Or { clauses: Vec<DependencyExpr> },
    Not { clause: Box<DependencyExpr> },
}

impl DependencyExpr {
    /// Evaluates against the current answers. `resolved` carries the
    /// visibility of siblings whose own gates were already evaluated. A
    /// clause referencing an unknown or not-yet-resolved code leaves the
    /// whole expression indeterminate, which counts as unsatisfied even
    /// under negation, so malformed metadata degrades toward hidden instead
    /// of failing.
    pub fn evaluate(&self, answers: &AnswerMap, resolved: &VisibilityMap) -> bool {
        self.evaluate_opt(answers, resolved).unwrap_or(false)
    }

    /// Three-valued core: `None` marks indeterminacy and survives boolean
    /// composition the way a determinate `false` must not.
    fn evaluate_opt(&self, answers: &AnswerMap, resolved: &VisibilityMap) -> Option<bool> {
        match self {
            DependencyExpr::Eq { code, value } => Self::leaf(answers, resolved, code, |answer| {
                answer.is_some_and(|answer| answer.matches_key(value))
            }),
            DependencyExpr::In { code, values } => Self::leaf(answers, resolved, code, |answer| {
                answer.is_some_and(|answer| values.iter().any(|value| answer.matches_key(value)))
            }),
            DependencyExpr::Answered { code } => {
                Self::leaf(answers, resolved, code, |answer| answer.is_some())
            }
            DependencyExpr::And { clauses } => {
                let mut indeterminate = false;
                for clause in clauses {
                    match clause.evaluate_opt(answers, resolved) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => indeterminate = true,
                    }
                }
                if indeterminate { None } else { Some(true) }
            }
            DependencyExpr::Or { clauses } => {
                let mut indeterminate = false;
                for clause in clauses {
                    match clause.evaluate_opt(answers, resolved) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => indeterminate = true,
                    }
                }
                if indeterminate { None } else { Some(false) }
            }
            DependencyExpr::Not { clause } => clause
                .evaluate_opt(answers, resolved)
                .map(|value| !value),
        }
    }

    /// Resolves one sibling reference. Unknown codes are indeterminate; a
    /// known but hidden sibling is determinately unsatisfied, so its stale
    /// answers never trigger clauses.
    fn leaf<F>(
        answers: &AnswerMap,
        resolved: &VisibilityMap,
        code: &str,
        predicate: F,
    ) -> Option<bool>
    where
        F: FnOnce(Option<&AnswerValue>) -> bool,
    {
        let visible = *resolved.get(code)?;
        if !visible {
            return Some(false);
        }
        Some(predicate(answers.get(code).filter(|answer| !answer.is_empty())))
    }
}
