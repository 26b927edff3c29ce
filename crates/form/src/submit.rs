use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use open311_schema::AttributeEntry;

use crate::contact::LatLng;
use crate::form::RequestForm;

/// Mutation document handed to the remote-call collaborator. The transport
/// treats it as opaque.
pub const SUBMIT_REQUEST_DOCUMENT: &str = "\
mutation SubmitRequest(
  $code: String!
  $description: String!
  $firstName: String
  $lastName: String
  $email: String
  $phone: String
  $location: LatLngInput
  $address: String
  $attributes: [RequestAttributeInput!]!
) {
  createRequest(
    code: $code
    description: $description
    firstName: $firstName
    lastName: $lastName
    email: $email
    phone: $phone
    location: $location
    address: $address
    attributes: $attributes
  ) {
    id
    service {
      name
      code
    }
    description
    status
    closureReason
    closureComment
    location {
      lat
      lng
    }
    address
    images {
      tags
      originalUrl
      squarePreviewUrl
    }
    requestedAtString
    updatedAtString
    expectedAtString
    serviceNotice
  }
}
";

/// Shown when a transport failure carries no messages of its own.
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Something went wrong submitting your request. Please try again.";

/// Wire shape of the submission variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub code: String,
    pub description: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<LatLng>,
    pub address: Option<String>,
    pub attributes: Vec<AttributeEntry>,
}

impl RequestPayload {
    /// Snapshot of the form's currently submittable state. Contact and
    /// location pass through the form's redaction boundary, never the raw
    /// captured values.
    pub fn from_form(form: &RequestForm) -> Self {
        let contact = form.effective_contact_info();
        let location = form.effective_location_info();

        Self {
            code: form.service().code.clone(),
            description: form.description.clone(),
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            location: location.location,
            address: location.address,
            attributes: form.submission_attributes(),
        }
    }
}

/// Name and code of the service a submitted request was filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceSummary {
    pub name: String,
    pub code: String,
}

/// Image attached to a submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestImage {
    #[serde(default)]
    pub tags: Vec<String>,
    pub original_url: String,
    pub square_preview_url: String,
}

/// Immutable result of a successful submission, as returned by the backend.
/// Timestamps arrive pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRequest {
    pub id: String,
    pub service: ServiceSummary,
    pub description: String,
    pub status: String,
    pub closure_reason: Option<String>,
    pub closure_comment: Option<String>,
    pub location: Option<LatLng>,
    pub address: Option<String>,
    #[serde(default)]
    pub images: Vec<RequestImage>,
    pub requested_at_string: String,
    pub updated_at_string: String,
    pub expected_at_string: Option<String>,
    pub service_notice: Option<String>,
}

/// Failure reported by the remote-call collaborator, carrying zero or more
/// human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("submission rejected: {}", .messages.join("; "))]
pub struct RemoteError {
    pub messages: Vec<String>,
}

impl RemoteError {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Messages for display, falling back to one generic line when the
    /// transport supplied none.
    pub fn messages_or_default(&self) -> Vec<String> {
        if self.messages.is_empty() {
            vec![FALLBACK_ERROR_MESSAGE.to_string()]
        } else {
            self.messages.clone()
        }
    }
}

/// Transport collaborator that executes the submission mutation. Timeout and
/// wire-level retry policy live behind this seam, not in the controller.
#[async_trait]
pub trait RemoteCall {
    async fn call(
        &self,
        document: &str,
        variables: RequestPayload,
    ) -> Result<SubmittedRequest, RemoteError>;
}

/// Observable lifecycle of one submission attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(SubmittedRequest),
    Failed(Vec<String>),
}

/// How a submission attempt can fail from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// A submission is already in flight; the transport was not contacted.
    #[error("a submission is already in flight")]
    InFlight,
    /// The request already went through; submitting again is not a retry.
    #[error("the request was already submitted")]
    AlreadySubmitted,
    /// The transport settled with a failure. The form keeps everything the
    /// reporter entered, so calling `submit` again retries.
    #[error("submission failed: {}", .0.join("; "))]
    Rejected(Vec<String>),
}

/// Drives the submit lifecycle for one request form:
/// idle -> submitting -> succeeded, or idle -> submitting -> failed, where
/// failed may re-enter submitting on a manual retry. At most one call is ever
/// outstanding.
///
/// The lifecycle is split into a synchronous `begin`/`complete` pair so the
/// guard and the settlement stay deterministic; `submit` is the async driver
/// over the one transport boundary.
#[derive(Debug, Default)]
pub struct SubmissionController {
    status: SubmitStatus,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// The submitted request once the lifecycle has succeeded.
    pub fn result(&self) -> Option<&SubmittedRequest> {
        match &self.status {
            SubmitStatus::Succeeded(request) => Some(request),
            _ => None,
        }
    }

    /// Display messages from the last failed attempt.
    pub fn error_messages(&self) -> Option<&[String]> {
        match &self.status {
            SubmitStatus::Failed(messages) => Some(messages),
            _ => None,
        }
    }

    /// First half of a submission: guards the lifecycle and snapshots the
    /// redacted payload. No remote traffic happens here.
    pub fn begin(&mut self, form: &RequestForm) -> Result<RequestPayload, SubmitError> {
        match self.status {
            SubmitStatus::Submitting => Err(SubmitError::InFlight),
            SubmitStatus::Succeeded(_) => Err(SubmitError::AlreadySubmitted),
            SubmitStatus::Idle | SubmitStatus::Failed(_) => {
                debug!(service = %form.service().code, "submission started");
                self.status = SubmitStatus::Submitting;
                Ok(RequestPayload::from_form(form))
            }
        }
    }

    /// Second half: records the settlement of the outstanding call.
    /// Settlements arriving in any other state are ignored; an abandoned
    /// controller's call resolves into nothing.
    pub fn complete(&mut self, outcome: Result<SubmittedRequest, RemoteError>) {
        if self.status != SubmitStatus::Submitting {
            return;
        }

        match outcome {
            Ok(request) => {
                info!(id = %request.id, "request submitted");
                self.status = SubmitStatus::Succeeded(request);
            }
            Err(error) => {
                let messages = error.messages_or_default();
                warn!(?messages, "submission failed");
                self.status = SubmitStatus::Failed(messages);
            }
        }
    }

    /// Runs one full submission round trip. A guard rejection never reaches
    /// the transport; a transport failure lands in `Failed` with the entered
    /// data untouched, so the reporter can retry without re-entering
    /// anything.
    pub async fn submit<C>(
        &mut self,
        form: &RequestForm,
        remote: &C,
    ) -> Result<&SubmittedRequest, SubmitError>
    where
        C: RemoteCall + ?Sized,
    {
        let payload = self.begin(form)?;
        let outcome = remote.call(SUBMIT_REQUEST_DOCUMENT, payload).await;
        self.complete(outcome);

        match &self.status {
            SubmitStatus::Succeeded(request) => Ok(request),
            SubmitStatus::Failed(messages) => Err(SubmitError::Rejected(messages.clone())),
            // complete() always settles a submitting controller.
            SubmitStatus::Idle | SubmitStatus::Submitting => Err(SubmitError::Rejected(vec![
                FALLBACK_ERROR_MESSAGE.to_string(),
            ])),
        }
    }
}
