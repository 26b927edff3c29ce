use serde_json::json;

use open311_schema::{
    AnswerMap, AnswerValue, AttributeEntry, ServiceSchema, is_required, resolve_visibility,
    submission_attributes, validate_attribute, validated_value,
};

fn pothole_schema() -> ServiceSchema {
    serde_json::from_value(json!({
        "code": "PTHL",
        "name": "Pothole",
        "attributes": [
            {
                "code": "NOTE",
                "type": "STRING",
                "description": "**Crews fill potholes within two business days.**"
            },
            {
                "code": "DEPTH",
                "type": "SINGLEVALUELIST",
                "required": true,
                "description": "How deep is the pothole?",
                "values": [
                    { "key": "Shallow", "name": "Shallow" },
                    { "key": "Deep", "name": "Deep" }
                ]
            },
            {
                "code": "LANES",
                "type": "MULTIVALUELIST",
                "description": "Which lanes are affected?",
                "values": [
                    { "key": "Bike", "name": "Bike lane" },
                    { "key": "Car", "name": "Car lane" },
                    { "key": "Parking", "name": "Parking lane" }
                ]
            },
            {
                "code": "CMTS",
                "type": "TEXT",
                "required": true,
                "description": "Anything else we should know?"
            }
        ]
    }))
    .expect("fixture should deserialize")
}

fn conditional_schema() -> ServiceSchema {
    serde_json::from_value(json!({
        "code": "ANML",
        "name": "Animal Complaint",
        "attributes": [
            {
                "code": "KIND",
                "type": "SINGLEVALUELIST",
                "required": true,
                "description": "What kind of animal?",
                "values": [
                    { "key": "Dog", "name": "Dog" },
                    { "key": "Other", "name": "Other" }
                ]
            },
            {
                "code": "BREED",
                "type": "SINGLEVALUELIST",
                "description": "Breed, if known",
                "values": [],
                "conditionalValues": [
                    {
                        "when": { "op": "eq", "code": "KIND", "value": "Dog" },
                        "required": true,
                        "values": [
                            { "key": "Terrier", "name": "Terrier" },
                            { "key": "Unknown", "name": "Unknown" }
                        ]
                    }
                ]
            }
        ]
    }))
    .expect("fixture should deserialize")
}

#[test]
fn required_text_rejects_blank_input() {
    let schema = pothole_schema();
    let spec = schema.attribute("CMTS").unwrap();
    let mut answers = AnswerMap::new();
    let visibility = resolve_visibility(&schema, &answers);

    assert!(!validate_attribute(spec, &answers, &visibility));

    answers.insert("CMTS".into(), AnswerValue::text("   "));
    assert!(!validate_attribute(spec, &answers, &visibility));

    answers.insert("CMTS".into(), AnswerValue::text("Swallowed my bike"));
    assert!(validate_attribute(spec, &answers, &visibility));
}

#[test]
fn optional_fields_accept_missing_answers() {
    let schema = pothole_schema();
    let answers = AnswerMap::new();
    let visibility = resolve_visibility(&schema, &answers);
    let lanes = schema.attribute("LANES").unwrap();

    assert!(validate_attribute(lanes, &answers, &visibility));
    assert_eq!(validated_value(lanes, &answers, &visibility), None);
}

#[test]
fn informational_attributes_are_inert() {
    let schema = pothole_schema();
    let spec = schema.attribute("NOTE").unwrap();
    let answers = AnswerMap::new();
    let visibility = resolve_visibility(&schema, &answers);

    assert!(validate_attribute(spec, &answers, &visibility));
    assert_eq!(validated_value(spec, &answers, &visibility), None);
}

#[test]
fn single_value_list_must_match_an_offered_choice() {
    let schema = pothole_schema();
    let spec = schema.attribute("DEPTH").unwrap();
    let mut answers = AnswerMap::new();
    let visibility = resolve_visibility(&schema, &answers);

    answers.insert("DEPTH".into(), AnswerValue::text("Bottomless"));
    assert!(!validate_attribute(spec, &answers, &visibility));

    answers.insert("DEPTH".into(), AnswerValue::text("Deep"));
    assert!(validate_attribute(spec, &answers, &visibility));
}

#[test]
fn invisible_attributes_never_contribute_values() {
    let schema: ServiceSchema = serde_json::from_value(json!({
        "code": "PTHL",
        "name": "Pothole",
        "attributes": [
            {
                "code": "GATE",
                "type": "SINGLEVALUELIST",
                "description": "Gate",
                "values": [ { "key": "Open", "name": "Open" } ]
            },
            {
                "code": "HIDDEN",
                "type": "TEXT",
                "required": true,
                "description": "Hidden detail",
                "dependencies": { "op": "eq", "code": "GATE", "value": "Open" }
            }
        ]
    }))
    .expect("fixture should deserialize");

    let mut answers = AnswerMap::new();
    answers.insert("HIDDEN".into(), AnswerValue::text("stale junk"));
    let visibility = resolve_visibility(&schema, &answers);
    let spec = schema.attribute("HIDDEN").unwrap();

    // Required but invisible: exempt from validity and absent from payload.
    assert!(validate_attribute(spec, &answers, &visibility));
    assert_eq!(validated_value(spec, &answers, &visibility), None);
    assert!(submission_attributes(&schema, &answers).is_empty());
}

#[test]
fn conditional_values_extend_choices_and_force_required() {
    let schema = conditional_schema();
    let breed = schema.attribute("BREED").unwrap();
    let mut answers = AnswerMap::new();
    let visibility = resolve_visibility(&schema, &answers);

    // No trigger: no choices, not required, so an empty answer is fine.
    assert!(!is_required(breed, &answers, &visibility));
    assert!(validate_attribute(breed, &answers, &visibility));

    answers.insert("KIND".into(), AnswerValue::text("Dog"));
    assert!(is_required(breed, &answers, &visibility));
    assert!(!validate_attribute(breed, &answers, &visibility));

    answers.insert("BREED".into(), AnswerValue::text("Terrier"));
    assert!(validate_attribute(breed, &answers, &visibility));
}

#[test]
fn stale_selection_is_invalid_but_not_cleared() {
    let schema = conditional_schema();
    let breed = schema.attribute("BREED").unwrap();
    let mut answers = AnswerMap::new();

    answers.insert("KIND".into(), AnswerValue::text("Dog"));
    answers.insert("BREED".into(), AnswerValue::text("Terrier"));
    let visibility = resolve_visibility(&schema, &answers);
    assert!(validate_attribute(breed, &answers, &visibility));

    // The trigger changes; "Terrier" is no longer on offer. The model keeps
    // the stored value and reports it invalid for the UI to surface.
    answers.insert("KIND".into(), AnswerValue::text("Other"));
    assert!(!validate_attribute(breed, &answers, &visibility));
    assert_eq!(
        answers.get("BREED"),
        Some(&AnswerValue::text("Terrier"))
    );
    assert_eq!(validated_value(breed, &answers, &visibility), None);
}

#[test]
fn multi_value_answers_repeat_the_code_per_key() {
    let schema = pothole_schema();
    let mut answers = AnswerMap::new();
    answers.insert("DEPTH".into(), AnswerValue::text("Deep"));
    answers.insert("LANES".into(), AnswerValue::keys(["Bike", "Parking"]));
    answers.insert("CMTS".into(), AnswerValue::text("Near the corner"));

    let entries = submission_attributes(&schema, &answers);
    assert_eq!(
        entries,
        vec![
            AttributeEntry { code: "DEPTH".into(), value: "Deep".into() },
            AttributeEntry { code: "LANES".into(), value: "Bike".into() },
            AttributeEntry { code: "LANES".into(), value: "Parking".into() },
            AttributeEntry { code: "CMTS".into(), value: "Near the corner".into() },
        ]
    );
}

#[test]
fn empty_selection_emits_no_pairs() {
    let schema = pothole_schema();
    let mut answers = AnswerMap::new();
    answers.insert("DEPTH".into(), AnswerValue::text("Shallow"));
    answers.insert("LANES".into(), AnswerValue::keys(Vec::<String>::new()));
    answers.insert("CMTS".into(), AnswerValue::text("ok"));

    let entries = submission_attributes(&schema, &answers);
    assert!(entries.iter().all(|entry| entry.code != "LANES"));
}

#[test]
fn selection_outside_the_effective_set_is_invalid() {
    let schema = pothole_schema();
    let lanes = schema.attribute("LANES").unwrap();
    let mut answers = AnswerMap::new();
    let visibility = resolve_visibility(&schema, &answers);

    answers.insert("LANES".into(), AnswerValue::keys(["Bike", "Sidewalk"]));
    assert!(!validate_attribute(lanes, &answers, &visibility));
    assert_eq!(validated_value(lanes, &answers, &visibility), None);
}
