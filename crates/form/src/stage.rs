use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::form::RequestForm;

/// Wizard stages in fixed forward order. Submit is terminal; what happens
/// after it is the submission controller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Questions,
    Location,
    Contact,
    Submit,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Questions => Some(Stage::Location),
            Stage::Location => Some(Stage::Contact),
            Stage::Contact => Some(Stage::Submit),
            Stage::Submit => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Questions => "questions",
            Stage::Location => "location",
            Stage::Contact => "contact",
            Stage::Submit => "submit",
        }
    }
}

/// Collaborator notified when the wizard advances; the core never routes
/// itself.
pub trait Navigator {
    fn route_to_service_form(&mut self, service_code: &str, stage: Stage);
}

/// Gates forward navigation on the current stage's validity. Starts at
/// `questions`; there is no reset, a new session builds a new pair of form
/// and controller.
#[derive(Debug)]
pub struct StageController {
    stage: Stage,
}

impl StageController {
    pub fn new() -> Self {
        Self {
            stage: Stage::Questions,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Moves exactly one stage forward when the current stage is valid,
    /// skipping panes the service hides, and signals the navigator with the
    /// landing stage. Returns `None` without navigating when blocked or
    /// already at the final stage.
    pub fn advance(&mut self, form: &RequestForm, navigator: &mut dyn Navigator) -> Option<Stage> {
        if !form.stage_valid(self.stage) {
            debug!(stage = self.stage.as_str(), "stage invalid, not advancing");
            return None;
        }

        let mut next = self.stage.next()?;
        while !form.show_stage(next) {
            next = next.next()?;
        }

        debug!(from = self.stage.as_str(), to = next.as_str(), "advancing");
        self.stage = next;
        navigator.route_to_service_form(&form.service().code, next);
        Some(next)
    }

    /// Backward navigation is always allowed and never validated.
    pub fn go_to(&mut self, stage: Stage) {
        self.stage = stage;
    }
}

impl Default for StageController {
    fn default() -> Self {
        Self::new()
    }
}
