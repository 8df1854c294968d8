use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::session::SessionId;
use crate::flows::graph::{FlowGraph, FlowNode};

pub const DEFAULT_PROGRESS_STEP_PCT: u8 = 20;

/// Position of one session inside a [`FlowGraph`].
///
/// `current` always equals the last entry of `path`, and `path[0]` is always
/// the graph's start key. Only [`FlowNavigator`] mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorState {
    session_id: SessionId,
    current: String,
    path: Vec<String>,
    result: Option<Vec<String>>,
}

impl NavigatorState {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn result(&self) -> Option<&[String]> {
        self.result.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_some()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Moved { from: String, to: String },
    Completed { node: String, result: Vec<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub depth: usize,
    pub percent: u8,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("node `{node}` has no option {index} (it offers {available})")]
    UnknownOption { node: String, index: usize, available: usize },
    #[error("node `{0}` is not part of this decision tree")]
    UnknownNode(String),
    #[error("already at the first question")]
    AtRoot,
    #[error("session already reached a result; go back or restart first")]
    AlreadyCompleted,
}

#[derive(Clone, Debug)]
pub struct FlowNavigator {
    graph: FlowGraph,
    progress_step_pct: u8,
}

impl FlowNavigator {
    pub fn new(graph: FlowGraph) -> Self {
        Self { graph, progress_step_pct: DEFAULT_PROGRESS_STEP_PCT }
    }

    pub fn with_progress_step(mut self, progress_step_pct: u8) -> Self {
        self.progress_step_pct = progress_step_pct.clamp(1, 100);
        self
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn start(&self) -> NavigatorState {
        self.start_with_session(SessionId::generate())
    }

    pub fn start_with_session(&self, session_id: SessionId) -> NavigatorState {
        let start = self.graph.start().to_owned();
        NavigatorState { session_id, current: start.clone(), path: vec![start], result: None }
    }

    pub fn current_node<'a>(&'a self, state: &NavigatorState) -> Option<&'a FlowNode> {
        self.graph.node(&state.current)
    }

    pub fn advance(
        &self,
        state: &mut NavigatorState,
        option_index: usize,
    ) -> Result<StepOutcome, NavigationError> {
        if state.result.is_some() {
            return Err(NavigationError::AlreadyCompleted);
        }

        let node = self
            .graph
            .node(&state.current)
            .ok_or_else(|| NavigationError::UnknownNode(state.current.clone()))?;
        let option = node.options.get(option_index).ok_or_else(|| {
            NavigationError::UnknownOption {
                node: state.current.clone(),
                index: option_index,
                available: node.options.len(),
            }
        })?;

        if let Some(result) = &option.result {
            state.result = Some(result.clone());
            return Ok(StepOutcome::Completed { node: state.current.clone(), result: result.clone() });
        }

        match &option.next {
            Some(next) => {
                let from = std::mem::replace(&mut state.current, next.clone());
                state.path.push(next.clone());
                Ok(StepOutcome::Moved { from, to: next.clone() })
            }
            // Graph validation guarantees every option has a target.
            None => Err(NavigationError::UnknownOption {
                node: state.current.clone(),
                index: option_index,
                available: node.options.len(),
            }),
        }
    }

    pub fn advance_with_audit<S>(
        &self,
        state: &mut NavigatorState,
        option_index: usize,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<StepOutcome, NavigationError>
    where
        S: AuditSink,
    {
        let at = state.current.clone();
        let result = self.advance(state, option_index);
        match &result {
            Ok(StepOutcome::Moved { from, to }) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.option_selected",
                        AuditCategory::Navigation,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", from.clone())
                    .with_metadata("to", to.clone())
                    .with_metadata("option", option_index.to_string()),
                );
            }
            Ok(StepOutcome::Completed { node, result }) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.option_selected",
                        AuditCategory::Navigation,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", node.clone())
                    .with_metadata("to", "result")
                    .with_metadata("option", option_index.to_string())
                    .with_metadata("result", result.join(", ")),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.option_rejected",
                        AuditCategory::Navigation,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("at", at)
                    .with_metadata("option", option_index.to_string())
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }

    /// Steps back one question. A pending result is dismissed first, leaving
    /// the session on the question that produced it.
    pub fn back(&self, state: &mut NavigatorState) -> Result<String, NavigationError> {
        if state.result.take().is_some() {
            tracing::debug!(
                event_name = "flow.result_dismissed",
                session_id = %state.session_id,
                node = %state.current,
                "pending result dismissed"
            );
            return Ok(state.current.clone());
        }

        if state.path.len() <= 1 {
            return Err(NavigationError::AtRoot);
        }

        state.path.pop();
        if let Some(top) = state.path.last() {
            state.current = top.clone();
        }
        tracing::debug!(
            event_name = "flow.back",
            session_id = %state.session_id,
            node = %state.current,
            depth = state.path.len(),
            "stepped back"
        );
        Ok(state.current.clone())
    }

    pub fn restart(&self, state: &mut NavigatorState) {
        let start = self.graph.start().to_owned();
        state.current = start.clone();
        state.path.clear();
        state.path.push(start);
        state.result = None;
        tracing::debug!(
            event_name = "flow.restart",
            session_id = %state.session_id,
            "session restarted"
        );
    }

    pub fn progress(&self, state: &NavigatorState) -> Progress {
        let depth = state.path.len();
        let percent = depth.saturating_mul(usize::from(self.progress_step_pct)).min(100);
        Progress { depth, percent: percent as u8 }
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::{AuditContext, AuditOutcome, InMemoryAuditSink};
    use crate::domain::session::SessionId;
    use crate::flows::graph::FlowGraph;
    use crate::flows::navigator::{FlowNavigator, NavigationError, NavigatorState, StepOutcome};

    fn navigator() -> FlowNavigator {
        FlowNavigator::new(FlowGraph::mashti_default().expect("embedded flow"))
    }

    fn assert_stack_invariant(state: &NavigatorState) {
        assert_eq!(state.path().first().map(String::as_str), Some("start"));
        assert_eq!(state.path().last().map(String::as_str), Some(state.current()));
    }

    #[test]
    fn cold_juice_citrus_walk_completes_with_curated_order() {
        let navigator = navigator();
        let mut state = navigator.start();

        let moved = navigator.advance(&mut state, 1).expect("start -> cold");
        assert_eq!(moved, StepOutcome::Moved { from: "start".to_owned(), to: "cold".to_owned() });
        navigator.advance(&mut state, 0).expect("cold -> cool_light");
        navigator.advance(&mut state, 0).expect("cool_light -> fresh_juice");
        let completed = navigator.advance(&mut state, 0).expect("citrus is terminal");

        assert_eq!(
            completed,
            StepOutcome::Completed {
                node: "fresh_juice".to_owned(),
                result: vec![
                    "Orange Juice".to_owned(),
                    "Barberry Juice".to_owned(),
                    "Sour Cherry Juice".to_owned(),
                ],
            }
        );
        assert_eq!(state.path(), ["start", "cold", "cool_light", "fresh_juice"]);
        assert!(state.is_completed());
        assert_stack_invariant(&state);
    }

    #[test]
    fn stack_invariant_holds_across_mixed_operations() {
        let navigator = navigator();
        let mut state = navigator.start();

        let script: [Option<usize>; 9] =
            [Some(0), Some(1), None, Some(0), Some(2), None, None, None, Some(1)];
        for step in script {
            match step {
                Some(index) => {
                    let _ = navigator.advance(&mut state, index);
                }
                None => {
                    let _ = navigator.back(&mut state);
                }
            }
            assert_stack_invariant(&state);
        }

        navigator.restart(&mut state);
        assert_eq!(state.path(), ["start"]);
        assert!(state.result().is_none());
        assert_stack_invariant(&state);
    }

    #[test]
    fn back_at_root_is_rejected_and_leaves_state_untouched() {
        let navigator = navigator();
        let mut state = navigator.start();
        let before = state.clone();

        assert_eq!(navigator.back(&mut state), Err(NavigationError::AtRoot));
        assert_eq!(state, before);
    }

    #[test]
    fn back_after_completion_dismisses_result_before_popping() {
        let navigator = navigator();
        let mut state = navigator.start();
        navigator.advance(&mut state, 0).expect("start -> hot");
        navigator.advance(&mut state, 0).expect("hot -> hot_coffee");
        navigator.advance(&mut state, 0).expect("strong coffee is terminal");

        assert_eq!(navigator.advance(&mut state, 1), Err(NavigationError::AlreadyCompleted));

        assert_eq!(navigator.back(&mut state), Ok("hot_coffee".to_owned()));
        assert!(!state.is_completed());
        assert_eq!(state.path(), ["start", "hot", "hot_coffee"]);

        assert_eq!(navigator.back(&mut state), Ok("hot".to_owned()));
        assert_eq!(state.path(), ["start", "hot"]);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let navigator = navigator();
        let mut state = navigator.start();

        let error = navigator.advance(&mut state, 9).expect_err("only three options");
        assert_eq!(
            error,
            NavigationError::UnknownOption { node: "start".to_owned(), index: 9, available: 3 }
        );
        assert_eq!(state.path(), ["start"]);
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let navigator = navigator().with_progress_step(40);
        let mut state = navigator.start();
        assert_eq!(navigator.progress(&state).percent, 40);

        navigator.advance(&mut state, 1).expect("start -> cold");
        navigator.advance(&mut state, 0).expect("cold -> cool_light");
        let progress = navigator.progress(&state);
        assert_eq!(progress.depth, 3);
        assert_eq!(progress.percent, 100);
    }

    #[test]
    fn two_node_cycle_can_be_walked_and_unwound() {
        let graph = FlowGraph::from_json_str(
            r#"{"nodes": {
                "start": {"question": "Again?", "options": [
                    {"label": "loop", "next": "other"},
                    {"label": "done", "result": ["Espresso"]}
                ]},
                "other": {"question": "Back?", "options": [{"label": "loop", "next": "start"}]}
            }}"#,
        )
        .expect("cyclic graph is valid");
        let navigator = FlowNavigator::new(graph);
        let mut state = navigator.start();

        for _ in 0..3 {
            navigator.advance(&mut state, 0).expect("start -> other");
            navigator.advance(&mut state, 0).expect("other -> start");
        }
        assert_eq!(state.depth(), 7);
        assert_eq!(state.current(), "start");

        navigator.back(&mut state).expect("pop one");
        assert_eq!(state.current(), "other");
        assert_stack_invariant(&state);
    }

    #[test]
    fn navigation_emits_audit_events() {
        let navigator = navigator();
        let session = SessionId("kiosk-1".to_owned());
        let mut state = navigator.start_with_session(session.clone());
        let sink = InMemoryAuditSink::default();
        let audit = AuditContext::new(Some(session), "req-9", "navigator");

        navigator.advance_with_audit(&mut state, 1, &sink, &audit).expect("start -> cold");
        let _ = navigator.advance_with_audit(&mut state, 7, &sink, &audit);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "flow.option_selected");
        assert_eq!(events[0].metadata.get("to").map(String::as_str), Some("cold"));
        assert_eq!(events[1].event_type, "flow.option_rejected");
        assert_eq!(events[1].outcome, AuditOutcome::Rejected);
        assert_eq!(events[1].session_id.as_ref().map(SessionId::as_str), Some("kiosk-1"));
    }
}
