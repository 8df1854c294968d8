use std::str::FromStr;

use serde::Serialize;

use crate::commands::{build_runtime, load_catalog, load_config, CommandResult};
use mashti_core::advisor::Advisor;
use mashti_core::audit::{AuditContext, InMemoryAuditSink};
use mashti_core::config::LoadOptions;
use mashti_core::errors::ApplicationError;
use mashti_core::flows::{Progress, StepOutcome};
use mashti_core::recommend::Recommendation;

/// One scripted navigator input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStep {
    Choose(usize),
    Back,
    Restart,
}

impl FromStr for WalkStep {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "back" | "b" => Ok(Self::Back),
            "restart" | "r" => Ok(Self::Restart),
            other => other.parse::<usize>().map(Self::Choose).map_err(|_| {
                format!("step `{value}` must be an option index, `back` or `restart`")
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct StepRecord {
    step: String,
    node: String,
    completed: bool,
}

#[derive(Debug, Serialize)]
struct WalkOutput {
    session_id: String,
    current: String,
    path: Vec<String>,
    progress: Progress,
    completed: bool,
    steps: Vec<StepRecord>,
    audit_events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendation: Option<Recommendation>,
}

pub fn run(options: LoadOptions, steps: &[String]) -> CommandResult {
    let parsed: Result<Vec<WalkStep>, String> = steps.iter().map(|step| step.parse()).collect();
    let parsed = match parsed {
        Ok(parsed) => parsed,
        Err(message) => return CommandResult::failure("walk", "invalid_step", message, 2),
    };

    let config = match load_config("walk", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let advisor = match Advisor::from_config(&config) {
        Ok(advisor) => advisor,
        Err(error) => {
            return CommandResult::from_application_error("walk", ApplicationError::from(error))
        }
    };

    let navigator = advisor.navigator();
    let mut session = advisor.open_session();
    let sink = InMemoryAuditSink::default();
    let audit = AuditContext::new(Some(session.session_id().clone()), "cli-walk", "cli");
    let mut records = Vec::with_capacity(parsed.len());

    for (raw, step) in steps.iter().zip(parsed) {
        let outcome = match step {
            WalkStep::Choose(index) => navigator
                .advance_with_audit(&mut session, index, &sink, &audit)
                .map(|outcome| match outcome {
                    StepOutcome::Moved { to, .. } => to,
                    StepOutcome::Completed { node, .. } => node,
                }),
            WalkStep::Back => navigator.back(&mut session),
            WalkStep::Restart => {
                navigator.restart(&mut session);
                Ok(session.current().to_string())
            }
        };

        match outcome {
            Ok(node) => records.push(StepRecord {
                step: raw.trim().to_string(),
                node,
                completed: session.is_completed(),
            }),
            Err(error) => {
                return CommandResult::from_application_error("walk", ApplicationError::from(error))
            }
        }
    }

    let recommendation = if session.is_completed() {
        let runtime = match build_runtime("walk") {
            Ok(runtime) => runtime,
            Err(failure) => return failure,
        };
        let catalog = match runtime.block_on(load_catalog(&config)) {
            Ok(catalog) => catalog,
            Err(error) => return CommandResult::from_application_error("walk", error),
        };
        advisor.complete_with_audit(catalog.items(), &session, &sink, &audit)
    } else {
        None
    };

    let message = match (&recommendation, navigator.current_node(&session)) {
        (Some(recommendation), _) if recommendation.is_empty() => {
            "walk completed; no recommendations available".to_string()
        }
        (Some(recommendation), _) => {
            format!("walk completed: {}", recommendation.titles().join(", "))
        }
        (None, Some(node)) => format!("next question: {}", node.question),
        (None, None) => format!("session is at unknown node `{}`", session.current()),
    };

    let output = WalkOutput {
        session_id: session.session_id().to_string(),
        current: session.current().to_string(),
        path: session.path().to_vec(),
        progress: navigator.progress(&session),
        completed: session.is_completed(),
        steps: records,
        audit_events: sink.events().into_iter().map(|event| event.event_type).collect(),
        recommendation,
    };
    CommandResult::success_with("walk", message, output)
}
