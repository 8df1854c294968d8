use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::config::AppConfig;
use crate::domain::item::EnrichedItem;
use crate::flows::{FlowGraph, FlowNavigator, GraphError, GraphStatus, NavigatorState};
use crate::recommend::{PreferenceQuery, Recommendation, Recommender, ResultResolver};

/// Entry point that ties the navigator, resolver and recommender together.
///
/// Holds no per-session state: each session owns its [`NavigatorState`].
#[derive(Clone, Debug)]
pub struct Advisor {
    navigator: FlowNavigator,
    recommender: Recommender,
    resolver: ResultResolver,
}

impl Advisor {
    pub fn new(graph: FlowGraph, recommender: Recommender) -> Self {
        Self { navigator: FlowNavigator::new(graph), recommender, resolver: ResultResolver }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        let graph = GraphStatus::load(config.flow.definition_path.as_deref()).into_result()?;
        let recommender = Recommender::new()
            .with_weights(config.recommender.weights)
            .with_max_results(config.recommender.max_results);

        Ok(Self {
            navigator: FlowNavigator::new(graph).with_progress_step(config.flow.progress_step_pct),
            recommender,
            resolver: ResultResolver,
        })
    }

    pub fn navigator(&self) -> &FlowNavigator {
        &self.navigator
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn open_session(&self) -> NavigatorState {
        self.navigator.start()
    }

    pub fn recommend(&self, catalog: &[EnrichedItem], query: &PreferenceQuery) -> Recommendation {
        self.recommender.recommend(catalog, query)
    }

    /// Resolves the result of a completed session, or `None` while the
    /// session is still answering questions.
    pub fn complete(
        &self,
        catalog: &[EnrichedItem],
        state: &NavigatorState,
    ) -> Option<Recommendation> {
        let names = state.result()?;
        Some(self.resolver.resolve_or_recommend(names, state.path(), catalog, &self.recommender))
    }

    /// [`Advisor::complete`] that also records a `recommend.resolved` event.
    pub fn complete_with_audit(
        &self,
        catalog: &[EnrichedItem],
        state: &NavigatorState,
        sink: &dyn AuditSink,
        context: &AuditContext,
    ) -> Option<Recommendation> {
        let recommendation = self.complete(catalog, state)?;
        sink.emit(
            AuditEvent::new(
                context,
                "recommend.resolved",
                AuditCategory::Recommendation,
                AuditOutcome::Success,
            )
            .with_metadata("node", state.current())
            .with_metadata("source", recommendation.source.as_str())
            .with_metadata("items", recommendation.items.len().to_string()),
        );
        Some(recommendation)
    }
}
