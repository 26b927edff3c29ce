#![allow(missing_docs)]

pub mod answers;
pub mod attribute;
pub mod dependency;
pub mod service;
pub mod validate;
pub mod visibility;

pub use answers::{AnswerMap, AnswerValue};
pub use attribute::{AttributeKind, AttributeSpec, AttributeValue, ConditionalValues};
pub use dependency::DependencyExpr;
pub use service::{Requirement, ServiceSchema};
pub use validate::{
    AttributeEntry, ValidatedValue, effective_values, is_required, submission_attributes,
    validate_attribute, validated_value,
};
pub use visibility::{VisibilityMap, resolve_visibility};
