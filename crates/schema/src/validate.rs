use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerMap, AnswerValue};
use crate::attribute::{AttributeKind, AttributeSpec, AttributeValue};
use crate::service::ServiceSchema;
use crate::visibility::{VisibilityMap, resolve_visibility};

/// Submission-shaped value for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedValue {
    Scalar(String),
    Keys(Vec<String>),
}

/// One `{code, value}` pair of the wire payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeEntry {
    pub code: String,
    pub value: String,
}

/// Choice set currently in effect for a list attribute: the base values plus
/// the values of every conditional entry whose trigger holds.
pub fn effective_values<'a>(
    spec: &'a AttributeSpec,
    answers: &AnswerMap,
    visibility: &VisibilityMap,
) -> Vec<&'a AttributeValue> {
    let mut values: Vec<&AttributeValue> = spec.values.iter().collect();
    for conditional in &spec.conditional_values {
        if conditional.when.evaluate(answers, visibility) {
            values.extend(conditional.values.iter());
        }
    }
    values
}

/// Runtime requiredness: the static flag, or any active conditional entry
/// that forces the attribute required.
pub fn is_required(spec: &AttributeSpec, answers: &AnswerMap, visibility: &VisibilityMap) -> bool {
    spec.required
        || spec
            .conditional_values
            .iter()
            .any(|conditional| conditional.required && conditional.when.evaluate(answers, visibility))
}

/// Validity of one attribute under the current answers.
///
/// Invisible attributes are inert and always valid, whatever is stored for
/// them. A stored selection that fell out of the effective choice set (the
/// trigger answer changed) is invalid but deliberately not cleared; the UI
/// surfaces it for the reporter to re-pick.
pub fn validate_attribute(
    spec: &AttributeSpec,
    answers: &AnswerMap,
    visibility: &VisibilityMap,
) -> bool {
    if !visibility.get(&spec.code).copied().unwrap_or(true) {
        return true;
    }

    let answer = answers.get(&spec.code).filter(|answer| !answer.is_empty());
    match spec.kind {
        AttributeKind::Informational => true,
        AttributeKind::Text => match answer {
            Some(AnswerValue::Text(_)) => true,
            Some(AnswerValue::Keys(_)) => false,
            None => !is_required(spec, answers, visibility),
        },
        AttributeKind::SingleValueList => match answer {
            Some(AnswerValue::Text(key)) => {
                let effective = effective_values(spec, answers, visibility);
                effective.iter().any(|value| value.key == *key)
            }
            Some(AnswerValue::Keys(_)) => false,
            None => !is_required(spec, answers, visibility),
        },
        AttributeKind::MultiValueList => match answer {
            Some(AnswerValue::Keys(keys)) => {
                let effective = effective_values(spec, answers, visibility);
                keys.iter()
                    .all(|key| effective.iter().any(|value| value.key == *key))
            }
            Some(AnswerValue::Text(_)) => false,
            None => !is_required(spec, answers, visibility),
        },
    }
}

/// The value to submit for one attribute: `None` when the attribute is
/// hidden, informational, unanswered, or invalid.
pub fn validated_value(
    spec: &AttributeSpec,
    answers: &AnswerMap,
    visibility: &VisibilityMap,
) -> Option<ValidatedValue> {
    if !visibility.get(&spec.code).copied().unwrap_or(true) || spec.is_informational() {
        return None;
    }
    if !validate_attribute(spec, answers, visibility) {
        return None;
    }

    let answer = answers.get(&spec.code).filter(|answer| !answer.is_empty())?;
    match answer {
        AnswerValue::Text(text) => Some(ValidatedValue::Scalar(text.clone())),
        AnswerValue::Keys(keys) => Some(ValidatedValue::Keys(keys.clone())),
    }
}

/// Flattens the currently visible, valid answers into wire pairs in schema
/// order. MULTIVALUELIST answers repeat the code once per selected key; that
/// repetition is what the backend expects.
pub fn submission_attributes(schema: &ServiceSchema, answers: &AnswerMap) -> Vec<AttributeEntry> {
    let visibility = resolve_visibility(schema, answers);
    let mut entries = Vec::new();

    for spec in &schema.attributes {
        match validated_value(spec, answers, &visibility) {
            None => {}
            Some(ValidatedValue::Scalar(value)) => entries.push(AttributeEntry {
                code: spec.code.clone(),
                value,
            }),
            Some(ValidatedValue::Keys(keys)) => entries.extend(keys.into_iter().map(|value| {
                AttributeEntry {
                    code: spec.code.clone(),
                    value,
                }
            })),
        }
    }

    entries
}
