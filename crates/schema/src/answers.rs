use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw value entered for one attribute: a scalar string for TEXT and
/// SINGLEVALUELIST, a selection of keys for MULTIVALUELIST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Keys(Vec<String>),
}

/// Current answers keyed by attribute code.
pub type AnswerMap = BTreeMap<String, AnswerValue>;

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// True when nothing has effectively been entered. Whitespace-only text
    /// counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Keys(keys) => keys.is_empty(),
        }
    }

    /// True when the answer matches a choice key. A selection set matches
    /// when any selected key does.
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            AnswerValue::Text(text) => text == key,
            AnswerValue::Keys(keys) => keys.iter().any(|selected| selected == key),
        }
    }
}
