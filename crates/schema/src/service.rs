use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeSpec;

/// Whether a wizard facet must, may, or must not be collected for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Requirement {
    Required,
    #[default]
    Visible,
    Hidden,
}

/// Immutable description of one service's request form, loaded once per
/// service and shared read-only with the form layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSchema {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When present, the free-text description is a required part of the
    /// questions stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_prompt: Option<String>,
    #[serde(default)]
    pub contact_requirement: Requirement,
    #[serde(default)]
    pub location_requirement: Requirement,
    /// Attribute order is authoritative for payload serialization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
}

impl ServiceSchema {
    pub fn attribute(&self, code: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|attribute| attribute.code == code)
    }
}
