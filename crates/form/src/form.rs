use std::sync::Arc;

use open311_schema::{
    AnswerMap, AnswerValue, AttributeEntry, AttributeSpec, AttributeValue, Requirement,
    ServiceSchema, ValidatedValue, VisibilityMap, is_required, resolve_visibility,
    submission_attributes, validate_attribute, validated_value,
};

use crate::contact::{ContactInfo, LocationInfo};
use crate::stage::Stage;

/// Mutable aggregate behind one wizard session: the answers for a service's
/// attributes plus description, contact, and location capture.
///
/// Derived question state (visibility, requiredness, validity) is never
/// stored; it is recomputed on read from the current answers, so the form is
/// always internally consistent. A new session requires a new `RequestForm`.
#[derive(Debug, Clone)]
pub struct RequestForm {
    service: Arc<ServiceSchema>,
    answers: AnswerMap,
    pub description: String,
    pub contact: ContactInfo,
    pub location: LocationInfo,
    /// Consent flags, default off. Redaction happens at the payload boundary;
    /// the captured values themselves are never touched.
    pub send_contact_info: bool,
    pub send_location: bool,
}

impl RequestForm {
    pub fn new(service: Arc<ServiceSchema>) -> Self {
        Self {
            service,
            answers: AnswerMap::new(),
            description: String::new(),
            contact: ContactInfo::default(),
            location: LocationInfo::default(),
            send_contact_info: false,
            send_location: false,
        }
    }

    pub fn service(&self) -> &ServiceSchema {
        &self.service
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Stores a raw answer. Codes the service does not define are dropped,
    /// mirroring how unknown metadata degrades elsewhere.
    pub fn set_answer(&mut self, code: &str, value: AnswerValue) {
        if self.service.attribute(code).is_none() {
            return;
        }
        self.answers.insert(code.to_string(), value);
    }

    pub fn clear_answer(&mut self, code: &str) {
        self.answers.remove(code);
    }

    pub fn visibility(&self) -> VisibilityMap {
        resolve_visibility(&self.service, &self.answers)
    }

    pub fn question(&self, code: &str) -> Option<QuestionView<'_>> {
        self.service
            .attribute(code)
            .map(|spec| QuestionView { form: self, spec })
    }

    /// All questions in schema order, informational entries included (the UI
    /// renders those too).
    pub fn questions(&self) -> impl Iterator<Item = QuestionView<'_>> {
        self.service
            .attributes
            .iter()
            .map(|spec| QuestionView { form: self, spec })
    }

    /// Whether the wizard should present a stage at all. A HIDDEN contact or
    /// location requirement removes that pane from the flow.
    pub fn show_stage(&self, stage: Stage) -> bool {
        match stage {
            Stage::Questions | Stage::Submit => true,
            Stage::Location => self.service.location_requirement != Requirement::Hidden,
            Stage::Contact => self.service.contact_requirement != Requirement::Hidden,
        }
    }

    /// Aggregate validity gating forward navigation out of a stage.
    pub fn stage_valid(&self, stage: Stage) -> bool {
        match stage {
            Stage::Questions => {
                let visibility = self.visibility();
                let questions_ok = self
                    .service
                    .attributes
                    .iter()
                    .all(|spec| validate_attribute(spec, &self.answers, &visibility));
                let description_ok = self.service.description_prompt.is_none()
                    || !self.description.trim().is_empty();
                questions_ok && description_ok
            }
            Stage::Location => {
                self.service.location_requirement != Requirement::Required
                    || self.location.is_captured()
            }
            // Contact info is always optional.
            Stage::Contact | Stage::Submit => true,
        }
    }

    /// Flat `{code, value}` pairs for the wire payload, schema order.
    pub fn submission_attributes(&self) -> Vec<AttributeEntry> {
        submission_attributes(&self.service, &self.answers)
    }

    /// Contact info as the backend should see it: all-`None` unless the
    /// reporter opted in. Toggling the flag back on recovers the captured
    /// values unchanged.
    pub fn effective_contact_info(&self) -> ContactInfo {
        if self.send_contact_info {
            self.contact.clone()
        } else {
            ContactInfo::default()
        }
    }

    /// Location as the backend should see it, gated like contact info.
    pub fn effective_location_info(&self) -> LocationInfo {
        if self.send_location {
            self.location.clone()
        } else {
            LocationInfo::default()
        }
    }
}

/// Read-only view of one question. Every derived property is computed on
/// demand from the owning form's current answers.
#[derive(Debug, Clone, Copy)]
pub struct QuestionView<'a> {
    form: &'a RequestForm,
    spec: &'a AttributeSpec,
}

impl<'a> QuestionView<'a> {
    pub fn spec(&self) -> &'a AttributeSpec {
        self.spec
    }

    pub fn code(&self) -> &'a str {
        &self.spec.code
    }

    pub fn answer(&self) -> Option<&'a AnswerValue> {
        self.form.answers.get(&self.spec.code)
    }

    pub fn visible(&self) -> bool {
        self.form
            .visibility()
            .get(&self.spec.code)
            .copied()
            .unwrap_or(true)
    }

    /// Requiredness only applies to visible questions; hidden ones are
    /// inert and report `false`.
    pub fn required(&self) -> bool {
        let visibility = self.form.visibility();
        visibility.get(&self.spec.code).copied().unwrap_or(true)
            && is_required(self.spec, &self.form.answers, &visibility)
    }

    pub fn valid(&self) -> bool {
        let visibility = self.form.visibility();
        validate_attribute(self.spec, &self.form.answers, &visibility)
    }

    /// The value to submit, or `None` when hidden, invalid, unanswered, or
    /// informational.
    pub fn validated_value(&self) -> Option<ValidatedValue> {
        let visibility = self.form.visibility();
        validated_value(self.spec, &self.form.answers, &visibility)
    }

    /// Choices currently on offer, conditional sets included.
    pub fn effective_values(&self) -> Vec<&'a AttributeValue> {
        let visibility = self.form.visibility();
        open311_schema::effective_values(self.spec, &self.form.answers, &visibility)
    }
}
