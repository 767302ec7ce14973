//! Grounded question answering handlers.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::AuthAccount;
use crate::handler::{Error, ErrorKind, Result};
use crate::pipeline::retrieval::{self, AnswerSource};
use crate::service::ServiceState;

/// Logging target for answer handlers.
const TRACING_TARGET: &str = "docket_server::handler::answers";

/// Question request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuestionRequest {
    /// Natural-language question.
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
    /// Case selecting the namespace; defaults to the default case.
    #[validate(length(max = 200))]
    pub case_name: Option<String>,
}

/// One source reference in the answer response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSourceResponse {
    /// Source document id.
    pub document_id: String,
    /// Similarity score of the contributing chunk.
    pub score: f32,
    /// Truncated chunk preview.
    pub preview: String,
}

impl From<AnswerSource> for AnswerSourceResponse {
    fn from(source: AnswerSource) -> Self {
        Self {
            document_id: source.document_id,
            score: source.score,
            preview: source.preview,
        }
    }
}

/// Answer response body.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuestionResponse {
    /// Generated (or fixed fallback) answer.
    pub answer: String,
    /// Sources the context was assembled from.
    pub sources: Vec<AnswerSourceResponse>,
    /// Namespace that was queried.
    pub namespace: String,
    /// Processing time in milliseconds.
    pub elapsed_ms: u64,
}

/// Returns the answering routes.
pub(crate) fn routes() -> Router<ServiceState> {
    Router::new().route("/documents/answers", post(answer_question))
}

/// Answers a question strictly from the caller's case documents.
async fn answer_question(
    State(state): State<ServiceState>,
    AuthAccount(claims): AuthAccount,
    Json(request): Json<AnswerQuestionRequest>,
) -> Result<Json<AnswerQuestionResponse>> {
    request.validate().map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid question request")
            .with_context(err.to_string())
            .into_static()
    })?;

    let outcome = retrieval::answer(
        &state,
        claims.account_id,
        &request.question,
        request.case_name.as_deref(),
    )
    .await
    .map_err(|error| {
        tracing::error!(
            target: TRACING_TARGET,
            account_id = %claims.account_id,
            error = %error,
            "Answer request failed"
        );
        Error::from(error)
    })?;

    Ok(Json(AnswerQuestionResponse {
        answer: outcome.answer,
        sources: outcome.sources.into_iter().map(Into::into).collect(),
        namespace: outcome.namespace,
        elapsed_ms: outcome.elapsed_ms,
    }))
}
