//! Query controller: one submission from question to displayed result.

use oracle_common::api_call_span;
use oracle_common::logging::RequestContext;
use oracle_render::ViewModel;
use tracing::Instrument;

use crate::client::AnalysisBackend;
use crate::error::QueryError;
use crate::narration::Narrator;
use crate::presentation::{PresentationContext, Status};

/// Drives a submission through the backend and onto the presentation context.
///
/// `submit` takes `&mut self`, so a controller handles one request at a time.
pub struct QueryController<B: AnalysisBackend> {
    backend: B,
    context: PresentationContext,
}

impl<B: AnalysisBackend> QueryController<B> {
    pub fn new(backend: B, context: PresentationContext) -> Self {
        Self { backend, context }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Submit a question.
    ///
    /// Blank input is rejected before any network call. On success the
    /// rendered view is shown and returned; on failure the escaped error is
    /// shown and the error returned.
    pub async fn submit(&mut self, query: &str) -> Result<ViewModel, QueryError> {
        self.submit_with_context(query, RequestContext::new()).await
    }

    /// Like [`submit`](Self::submit), continuing an existing trace.
    pub async fn submit_with_context(
        &mut self,
        query: &str,
        ctx: RequestContext,
    ) -> Result<ViewModel, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            self.fail(&QueryError::EmptyQuery);
            return Err(QueryError::EmptyQuery);
        }

        self.context.status.set_status(Status::Processing);
        if let Err(e) = self.context.surface.clear() {
            tracing::warn!(error = %e, "Failed to clear results");
        }

        let span = api_call_span!(ctx.trace_id, endpoint = "/api/analyze", method = "POST");
        let response = self
            .backend
            .analyze(query, &ctx)
            .instrument(span)
            .await;

        match response {
            Ok(response) => {
                let view = oracle_render::render(&response);
                if let Err(e) = self.context.surface.show_results(&view) {
                    tracing::warn!(error = %e, "Failed to display results");
                }
                self.context.status.set_status(Status::Done);
                if let Some(narrator) = self.context.narrator.clone() {
                    narrate(narrator.as_ref(), &view).await;
                }
                Ok(view)
            }
            Err(err) => {
                tracing::warn!(trace_id = %ctx.trace_id, error = %err, "Query failed");
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn fail(&mut self, err: &QueryError) {
        if let Err(e) = self.context.surface.show_error(&err.escaped_message()) {
            tracing::warn!(error = %e, "Failed to display error");
        }
        self.context.status.set_status(Status::Failed);
    }
}

/// Narration failures are logged and never reach the user.
async fn narrate(narrator: &dyn Narrator, view: &ViewModel) {
    for (index, section) in view.iter().enumerate() {
        let text = section.plain_text();
        if let Err(e) = narrator.narrate(index, &section.plain_title(), &text).await {
            tracing::warn!(narrator = narrator.name(), error = %e, "Narration failed");
        }
    }
}
