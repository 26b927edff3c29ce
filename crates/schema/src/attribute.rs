use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dependency::DependencyExpr;

/// Backend attribute data types, spelled the way the wire format spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AttributeKind {
    /// Free-form text entry.
    #[serde(rename = "TEXT")]
    Text,
    /// Display-only copy shown between questions; never collects a value.
    #[serde(rename = "STRING")]
    Informational,
    /// Pick exactly one of the offered choices.
    #[serde(rename = "SINGLEVALUELIST")]
    SingleValueList,
    /// Pick any number of the offered choices.
    #[serde(rename = "MULTIVALUELIST")]
    MultiValueList,
}

/// One selectable choice of a list attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeValue {
    pub key: String,
    pub name: String,
}

/// Extra choices activated when a sibling answer matches. An active entry can
/// also force the owning attribute to become required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionalValues {
    pub when: DependencyExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<AttributeValue>,
    #[serde(default)]
    pub required: bool,
}

/// Definition of a single service attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSpec {
    /// Unique identifier within the service.
    pub code: String,
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    /// Static default; conditional value sets may override this at runtime.
    #[serde(default)]
    pub required: bool,
    /// Display prompt shown to the reporter.
    pub description: String,
    /// Offered choices, list kinds only.
    #[serde(
        default,
        deserialize_with = "none_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub values: Vec<AttributeValue>,
    #[serde(
        default,
        deserialize_with = "none_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conditional_values: Vec<ConditionalValues>,
    /// Visibility gate evaluated against sibling answers; absent means the
    /// attribute is always shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyExpr>,
}

impl AttributeSpec {
    /// True for display-only attributes that never carry an answer.
    pub fn is_informational(&self) -> bool {
        matches!(self.kind, AttributeKind::Informational)
    }
}

/// Backend metadata sends an explicit `null` for list-less attributes; fold
/// it to empty instead of rejecting the document.
fn none_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
