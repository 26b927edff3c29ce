use std::collections::BTreeMap;

use crate::answers::AnswerMap;
use crate::service::ServiceSchema;

pub type VisibilityMap = BTreeMap<String, bool>;

/// Resolves attribute visibility in schema order. Each gate sees the resolved
/// visibility of earlier siblings, so a chain of dependent questions hides as
/// a unit when its root is hidden. Forward references and unknown codes are
/// unsatisfied.
pub fn resolve_visibility(schema: &ServiceSchema, answers: &AnswerMap) -> VisibilityMap {
    let mut map = VisibilityMap::new();

    for attribute in &schema.attributes {
        let visible = match &attribute.dependencies {
            Some(expr) => expr.evaluate(answers, &map),
            None => true,
        };
        map.insert(attribute.code.clone(), visible);
    }

    map
}
