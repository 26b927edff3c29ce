#![allow(missing_docs)]

pub mod contact;
pub mod form;
pub mod stage;
pub mod submit;

pub use contact::{ContactInfo, LatLng, LocationInfo};
pub use form::{QuestionView, RequestForm};
pub use stage::{Navigator, Stage, StageController};
pub use submit::{
    FALLBACK_ERROR_MESSAGE, RemoteCall, RemoteError, RequestImage, RequestPayload,
    SUBMIT_REQUEST_DOCUMENT, ServiceSummary, SubmissionController, SubmitError, SubmitStatus,
    SubmittedRequest,
};

pub use open311_schema::{AnswerValue, AttributeEntry, ValidatedValue};
