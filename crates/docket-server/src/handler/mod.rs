//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Private routes require a bearer credential and run behind the
//! per-account rate limiter; `/health` is public.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod answers;
mod documents;
mod error;
mod labels;
mod monitors;
mod response;
mod search;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use tower_http::trace::TraceLayer;

pub use self::answers::{AnswerQuestionRequest, AnswerQuestionResponse, AnswerSourceResponse};
pub use self::documents::UploadDocumentResponse;
pub use self::error::{Error, ErrorKind, Result};
pub use self::labels::{DocumentLabelsResponse, LabelListResponse, LabelsRequest};
pub use self::monitors::HealthResponse;
pub use self::search::{SearchDocumentsRequest, SearchDocumentsResponse, SearchResultDocument};
use crate::middleware::{rate_limit_by_account, require_authentication};
use crate::service::ServiceState;

#[inline]
async fn fallback_handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns the complete application router.
pub fn routes(state: ServiceState) -> Router {
    let require_authentication = from_fn_with_state(state.clone(), require_authentication);
    let rate_limiting = from_fn_with_state(state.clone(), rate_limit_by_account);

    let private_router = Router::new()
        .merge(documents::routes())
        .merge(search::routes())
        .merge(answers::routes())
        .merge(labels::routes())
        .route_layer(rate_limiting)
        .route_layer(require_authentication);

    Router::new()
        .merge(private_router)
        .merge(monitors::routes())
        .fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(
            state.config().max_upload_bytes + 1024 * 1024,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use axum_test::multipart::{MultipartForm, Part};
    use docket_core::mock::{MockAiConfig, MockAiProvider};
    use docket_data::MemoryDocumentStore;
    use docket_object::ObjectStorage;
    use docket_vector::VectorStore;
    use uuid::Uuid;

    use super::*;
    use crate::pipeline::retrieval::INSUFFICIENT_CONTEXT_ANSWER;
    use crate::service::{RateLimitConfig, ServiceConfig};

    const CONTRACT_TEXT: &str = "\
        This agreement may be terminated by either party for convenience. \
        The termination clause requires 30 days notice in writing, delivered \
        to the registered office of the counterparty, before the termination \
        becomes effective and all outstanding fees fall due.";

    /// Returns a test server over in-memory backends and mock AI services.
    fn create_test_server(
        config: ServiceConfig,
        mock: Arc<MockAiProvider>,
    ) -> (TestServer, ServiceState) {
        let state = ServiceState::new(
            config,
            Arc::new(MemoryDocumentStore::new()),
            VectorStore::memory(),
            ObjectStorage::memory().expect("memory storage"),
            mock.into_services(),
        );

        let server = TestServer::new(routes(state.clone())).expect("test server");
        (server, state)
    }

    fn default_test_server() -> (TestServer, ServiceState, Arc<MockAiProvider>) {
        let mock = Arc::new(MockAiProvider::default());
        let (server, state) = create_test_server(ServiceConfig::default(), mock.clone());
        (server, state, mock)
    }

    fn bearer_for(state: &ServiceState, account_id: Uuid) -> String {
        state
            .auth_keys()
            .issue(account_id, Duration::from_secs(3600))
            .expect("token")
    }

    async fn upload_text(
        server: &TestServer,
        token: &str,
        case_name: &str,
        body: &str,
    ) -> UploadDocumentResponse {
        let form = MultipartForm::new()
            .add_text("metadata", format!(r#"{{"caseName":"{case_name}"}}"#))
            .add_part(
                "file",
                Part::bytes(body.as_bytes().to_vec())
                    .file_name("contract.txt")
                    .mime_type("text/plain"),
            );

        let response = server
            .post("/documents")
            .authorization_bearer(token)
            .multipart(form)
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<UploadDocumentResponse>()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (server, _state, _mock) = default_test_server();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<HealthResponse>().status, "ok");
    }

    #[tokio::test]
    async fn private_routes_require_authentication() {
        let (server, _state, _mock) = default_test_server();

        let response = server.get("/labels").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .get("/labels")
            .authorization_bearer("not-a-real-token")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ingested_document_answers_questions_with_sources() {
        let (server, state, mock) = default_test_server();
        let token = bearer_for(&state, Uuid::new_v4());

        let uploaded = upload_text(&server, &token, "Case A", CONTRACT_TEXT).await;
        assert!(uploaded.chunk_count >= 1);
        assert_eq!(uploaded.namespace, "case-a");
        assert_eq!(uploaded.character_count, CONTRACT_TEXT.chars().count());

        let response = server
            .post("/documents/answers")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "question": "How much notice is required to terminate?",
                "caseName": "case-a",
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let answer = response.json::<AnswerQuestionResponse>();
        assert_eq!(answer.namespace, "case-a");
        assert!(!answer.sources.is_empty());
        assert_eq!(
            answer.sources[0].document_id,
            uploaded.document_id.to_string()
        );
        assert!(answer.sources[0].preview.contains("30 days"));
        assert_eq!(mock.generate_calls(), 1);
    }

    #[tokio::test]
    async fn search_ranks_ingested_documents() {
        let (server, state, _mock) = default_test_server();
        let token = bearer_for(&state, Uuid::new_v4());

        let uploaded = upload_text(&server, &token, "Case A", CONTRACT_TEXT).await;

        let response = server
            .post("/documents/search")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "query": "termination notice period",
                "caseName": "Case A",
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let search = response.json::<SearchDocumentsResponse>();
        assert_eq!(search.namespace, "case-a");
        assert_eq!(search.total, 1);
        assert_eq!(search.results[0].document_id, uploaded.document_id);
        assert!(search.results[0].chunk_hits >= 1);
        assert!(search.results[0].preview.contains("30 days"));
    }

    #[tokio::test]
    async fn empty_retrieval_never_reaches_the_generator() {
        let (server, state, mock) = default_test_server();
        let token = bearer_for(&state, Uuid::new_v4());

        // Writes exist in case-a, so the index exists; case-b has none.
        upload_text(&server, &token, "case-a", CONTRACT_TEXT).await;

        let response = server
            .post("/documents/answers")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "question": "How much notice is required to terminate?",
                "caseName": "case-b",
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let answer = response.json::<AnswerQuestionResponse>();
        assert_eq!(answer.answer, INSUFFICIENT_CONTEXT_ANSWER);
        assert!(answer.sources.is_empty());
        assert_eq!(mock.generate_calls(), 0);
    }

    #[tokio::test]
    async fn search_excludes_other_accounts_in_a_shared_namespace() {
        let (server, state, mock) = default_test_server();
        let owner_token = bearer_for(&state, Uuid::new_v4());
        let stranger_token = bearer_for(&state, Uuid::new_v4());

        upload_text(&server, &owner_token, "Shared Namespace", CONTRACT_TEXT).await;

        let response = server
            .post("/documents/search")
            .authorization_bearer(&stranger_token)
            .json(&serde_json::json!({
                "query": "termination notice",
                "caseName": "Shared Namespace",
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let search = response.json::<SearchDocumentsResponse>();
        assert_eq!(search.total, 0);
        assert!(search.results.is_empty());

        // The answer path is ownership-filtered as well: the stranger's
        // question must not be answered from the owner's document.
        let response = server
            .post("/documents/answers")
            .authorization_bearer(&stranger_token)
            .json(&serde_json::json!({
                "question": "How much notice is required?",
                "caseName": "Shared Namespace",
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let answer = response.json::<AnswerQuestionResponse>();
        assert_eq!(answer.answer, INSUFFICIENT_CONTEXT_ANSWER);
        assert_eq!(mock.generate_calls(), 0);
    }

    #[tokio::test]
    async fn label_set_operations() {
        let (server, state, _mock) = default_test_server();
        let token = bearer_for(&state, Uuid::new_v4());

        let uploaded = upload_text(&server, &token, "Case A", CONTRACT_TEXT).await;
        let path = format!("/documents/{}/labels", uploaded.document_id);

        // Add two labels, then add one of them again: no duplicate.
        let response = server
            .post(&path)
            .authorization_bearer(&token)
            .json(&serde_json::json!({ "labels": ["x", "y"] }))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .post(&path)
            .authorization_bearer(&token)
            .json(&serde_json::json!({ "labels": ["x"] }))
            .await;
        assert_eq!(
            response.json::<DocumentLabelsResponse>().labels,
            vec!["x".to_string(), "y".to_string()]
        );

        // Remove.
        let response = server
            .delete(&path)
            .authorization_bearer(&token)
            .json(&serde_json::json!({ "labels": ["x"] }))
            .await;
        assert_eq!(
            response.json::<DocumentLabelsResponse>().labels,
            vec!["y".to_string()]
        );

        // Replace.
        let response = server
            .put(&path)
            .authorization_bearer(&token)
            .json(&serde_json::json!({ "labels": ["z"] }))
            .await;
        assert_eq!(
            response.json::<DocumentLabelsResponse>().labels,
            vec!["z".to_string()]
        );

        // Distinct labels across the account.
        let response = server.get("/labels").authorization_bearer(&token).await;
        assert_eq!(
            response.json::<LabelListResponse>().labels,
            vec!["z".to_string()]
        );
    }

    #[tokio::test]
    async fn label_mutations_require_ownership() {
        let (server, state, _mock) = default_test_server();
        let owner_token = bearer_for(&state, Uuid::new_v4());
        let stranger_token = bearer_for(&state, Uuid::new_v4());

        let uploaded = upload_text(&server, &owner_token, "Case A", CONTRACT_TEXT).await;
        let path = format!("/documents/{}/labels", uploaded.document_id);

        let response = server
            .post(&path)
            .authorization_bearer(&stranger_token)
            .json(&serde_json::json!({ "labels": ["hijack"] }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // The owner's label set was not touched.
        let response = server.get(&path).authorization_bearer(&owner_token).await;
        assert!(response.json::<DocumentLabelsResponse>().labels.is_empty());
    }

    #[tokio::test]
    async fn over_limit_requests_are_rejected_until_the_window_resets() {
        let config = ServiceConfig {
            rate_limit: RateLimitConfig::new(2, Duration::from_millis(100)),
            ..ServiceConfig::default()
        };
        let (server, state) = create_test_server(config, Arc::new(MockAiProvider::default()));
        let token = bearer_for(&state, Uuid::new_v4());

        for _ in 0..2 {
            let response = server.get("/labels").authorization_bearer(&token).await;
            response.assert_status(StatusCode::OK);
        }

        let response = server.get("/labels").authorization_bearer(&token).await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);

        tokio::time::sleep(Duration::from_millis(150)).await;

        let response = server.get("/labels").authorization_bearer(&token).await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn disallowed_file_types_are_rejected_before_processing() {
        let (server, state, mock) = default_test_server();
        let token = bearer_for(&state, Uuid::new_v4());

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"PK\x03\x04".to_vec())
                .file_name("archive.bin")
                .mime_type("application/zip"),
        );

        let response = server
            .post("/documents")
            .authorization_bearer(&token)
            .multipart(form)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(mock.embed_calls(), 0);
    }

    #[tokio::test]
    async fn failed_extraction_and_ocr_abort_without_a_document() {
        // The default mock transcribes to an empty string, so an image
        // with no extractable text exhausts both extraction and OCR.
        let (server, state, mock) = default_test_server();
        let token = bearer_for(&state, Uuid::new_v4());

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"\x89PNG\r\n".to_vec())
                .file_name("scan.png")
                .mime_type("image/png"),
        );

        let response = server
            .post("/documents")
            .authorization_bearer(&token)
            .multipart(form)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(mock.transcribe_calls() >= 1);

        let response = server.get("/labels").authorization_bearer(&token).await;
        assert!(response.json::<LabelListResponse>().labels.is_empty());
    }

    #[tokio::test]
    async fn scanned_documents_are_ingested_through_ocr() {
        let mock = Arc::new(MockAiProvider::new(MockAiConfig {
            transcript_text: Some(CONTRACT_TEXT.to_string()),
            ..MockAiConfig::default()
        }));
        let (server, state) = create_test_server(ServiceConfig::default(), mock.clone());
        let token = bearer_for(&state, Uuid::new_v4());

        let form = MultipartForm::new()
            .add_text("metadata", r#"{"caseName":"Case A"}"#)
            .add_part(
                "file",
                Part::bytes(b"%PDF-1.7 binary".to_vec())
                    .file_name("scan.pdf")
                    .mime_type("application/pdf"),
            );

        let response = server
            .post("/documents")
            .authorization_bearer(&token)
            .multipart(form)
            .await;
        response.assert_status(StatusCode::CREATED);

        let uploaded = response.json::<UploadDocumentResponse>();
        assert!(uploaded.chunk_count >= 1);
        assert_eq!(mock.transcribe_calls(), 1);

        let response = server
            .post("/documents/search")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "query": "termination notice",
                "caseName": "case-a",
            }))
            .await;
        assert_eq!(response.json::<SearchDocumentsResponse>().total, 1);
    }
}
