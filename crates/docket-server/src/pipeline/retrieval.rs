//! Retrieval and answering pipeline.
//!
//! Both request shapes share the same retrieval core: embed the query and
//! collect chunk matches from the case namespace. Document search then
//! aggregates matches per parent document and re-ranks; grounded
//! answering assembles the best chunks into a context block and asks the
//! generation model to answer strictly from it.

use std::collections::HashMap;
use std::time::Instant;

use docket_core::{AnswerGenerator, Document, Error, Namespace, Result};
use docket_vector::{SearchOptions, SearchResult};
use uuid::Uuid;

use crate::service::ServiceState;

/// Logging target for the retrieval pipeline.
const TRACING_TARGET: &str = "docket_server::pipeline::retrieval";

/// Fixed answer returned when retrieval produced no usable context.
///
/// The generation model is never invoked in that case, so it cannot
/// hallucinate an answer from nothing.
pub const INSUFFICIENT_CONTEXT_ANSWER: &str =
    "I don't have enough information in the uploaded case documents to answer that question.";

/// Fixed answer returned when the generation call itself failed.
pub const GENERATION_FAILED_ANSWER: &str =
    "I encountered an error while generating an answer. Please try again.";

const GROUNDED_INSTRUCTIONS: &str = "\
Answer the question using only the information in the context below. If
the context does not contain enough information, say explicitly that the
documents do not answer the question. Cite the document references (for
example [Document <id>]) for every statement you take from the context.";

/// One ranked document in a search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched document record.
    pub document: Document,
    /// Average similarity score across the document's matching chunks.
    pub score: f32,
    /// Number of chunk matches that contributed.
    pub chunk_hits: usize,
    /// Preview drawn from the best-scoring chunk.
    pub preview: String,
}

/// Result of a document search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Ranked hits for the requested page.
    pub hits: Vec<SearchHit>,
    /// Total ranked documents before pagination.
    pub total: usize,
    /// Namespace that was queried.
    pub namespace: String,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

/// One source reference attached to a generated answer.
#[derive(Debug, Clone)]
pub struct AnswerSource {
    /// Source document id.
    pub document_id: String,
    /// Similarity score of the contributing chunk.
    pub score: f32,
    /// Truncated chunk preview.
    pub preview: String,
}

/// Result of a grounded answer request.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// The generated (or fixed fallback) answer.
    pub answer: String,
    /// Sources the context was assembled from.
    pub sources: Vec<AnswerSource>,
    /// Namespace that was queried.
    pub namespace: String,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

/// Searches the caller's documents in a case namespace.
pub async fn search(
    state: &ServiceState,
    account_id: Uuid,
    query: &str,
    case_name: Option<&str>,
    page: usize,
    per_page: usize,
) -> Result<SearchOutcome> {
    let started = Instant::now();
    let config = state.config();
    let namespace = resolve_namespace(state, case_name);

    let query_vector = state.embedder().embed_query(query).await?;

    let matches = state
        .vectors()
        .query(
            namespace.as_str(),
            query_vector,
            config.search_top_k,
            SearchOptions::new().with_metadata(),
        )
        .await
        .map_err(Error::from)?;

    let mut aggregates = aggregate_by_document(&matches);
    aggregates.truncate(config.search_limit);

    // Ownership filter: only documents the caller owns survive, even
    // though the namespace itself is not account-scoped.
    let ids: Vec<Uuid> = aggregates
        .iter()
        .filter_map(|aggregate| aggregate.document_id.parse().ok())
        .collect();
    let owned = state
        .documents()
        .find_owned_documents(account_id, &ids)
        .await
        .map_err(Error::from)?;
    let owned: HashMap<Uuid, Document> =
        owned.into_iter().map(|document| (document.id, document)).collect();

    let ranked: Vec<SearchHit> = aggregates
        .into_iter()
        .filter_map(|aggregate| {
            let id: Uuid = aggregate.document_id.parse().ok()?;
            let document = owned.get(&id)?.clone();

            Some(SearchHit {
                preview: truncate_preview(&aggregate.best_content, state.config().preview_chars),
                score: aggregate.average_score(),
                chunk_hits: aggregate.hits,
                document,
            })
        })
        .collect();

    let total = ranked.len();
    let hits = paginate(ranked, page, per_page);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account_id,
        namespace = %namespace,
        matches = %matches.len(),
        documents = %total,
        elapsed_ms = %elapsed_ms,
        "Search complete"
    );

    Ok(SearchOutcome {
        hits,
        total,
        namespace: namespace.to_string(),
        elapsed_ms,
    })
}

/// Answers a question from the caller's documents in a case namespace.
pub async fn answer(
    state: &ServiceState,
    account_id: Uuid,
    question: &str,
    case_name: Option<&str>,
) -> Result<AnswerOutcome> {
    let started = Instant::now();
    let config = state.config();
    let namespace = resolve_namespace(state, case_name);

    let query_vector = state.embedder().embed_query(question).await?;

    let matches = state
        .vectors()
        .query(
            namespace.as_str(),
            query_vector,
            config.answer_top_k,
            SearchOptions::new().with_metadata(),
        )
        .await
        .map_err(Error::from)?;

    // The namespace is shared per case, not per account; drop matches the
    // caller does not own before any of them can reach the model context.
    let account = account_id.to_string();
    let mut owned_matches: Vec<&SearchResult> = matches
        .iter()
        .filter(|m| m.metadata_str("account_id") == Some(account.as_str()))
        .collect();

    if owned_matches.is_empty() {
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account_id,
            namespace = %namespace,
            elapsed_ms = %elapsed_ms,
            "No usable context, returning fixed answer"
        );

        return Ok(AnswerOutcome {
            answer: INSUFFICIENT_CONTEXT_ANSWER.to_string(),
            sources: Vec::new(),
            namespace: namespace.to_string(),
            elapsed_ms,
        });
    }

    owned_matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    owned_matches.truncate(config.context_chunks);

    let context = owned_matches
        .iter()
        .map(|m| {
            format!(
                "[Document {}]\n{}",
                m.metadata_str("document_id").unwrap_or("unknown"),
                m.metadata_str("content").unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = format!(
        "{GROUNDED_INSTRUCTIONS}\n\nContext:\n{context}\n\nQuestion: {question}"
    );

    // A broken generation call degrades to a fixed answer; for a
    // user-facing QA flow a partial response beats a hard failure.
    let answer = match state.ai().generator.generate(&prompt).await {
        Ok(answer) => answer,
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                account_id = %account_id,
                namespace = %namespace,
                error = %error,
                "Answer generation failed"
            );
            GENERATION_FAILED_ANSWER.to_string()
        }
    };

    let sources = owned_matches
        .iter()
        .map(|m| AnswerSource {
            document_id: m.metadata_str("document_id").unwrap_or("unknown").to_string(),
            score: m.score,
            preview: truncate_preview(
                m.metadata_str("content").unwrap_or_default(),
                config.preview_chars,
            ),
        })
        .collect();

    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account_id,
        namespace = %namespace,
        context_chunks = %owned_matches.len(),
        elapsed_ms = %elapsed_ms,
        "Answer complete"
    );

    Ok(AnswerOutcome {
        answer,
        sources,
        namespace: namespace.to_string(),
        elapsed_ms,
    })
}

/// Per-document accumulation of chunk matches.
#[derive(Debug, Clone)]
struct DocumentAggregate {
    document_id: String,
    score_sum: f32,
    hits: usize,
    best_score: f32,
    best_content: String,
}

impl DocumentAggregate {
    /// Average of the constituent chunk scores, comparable across
    /// documents with differing hit counts.
    fn average_score(&self) -> f32 {
        if self.hits == 0 {
            0.0
        } else {
            self.score_sum / self.hits as f32
        }
    }
}

/// Groups chunk matches by parent document and ranks documents by their
/// average chunk score, descending. The sort is stable, so equal-score
/// documents keep their first-match order.
fn aggregate_by_document(matches: &[SearchResult]) -> Vec<DocumentAggregate> {
    let mut order: Vec<String> = Vec::new();
    let mut by_document: HashMap<String, DocumentAggregate> = HashMap::new();

    for m in matches {
        let Some(document_id) = m.metadata_str("document_id") else {
            continue;
        };
        let content = m.metadata_str("content").unwrap_or_default();

        match by_document.get_mut(document_id) {
            Some(aggregate) => {
                aggregate.score_sum += m.score;
                aggregate.hits += 1;
                if m.score > aggregate.best_score {
                    aggregate.best_score = m.score;
                    aggregate.best_content = content.to_string();
                }
            }
            None => {
                order.push(document_id.to_string());
                by_document.insert(
                    document_id.to_string(),
                    DocumentAggregate {
                        document_id: document_id.to_string(),
                        score_sum: m.score,
                        hits: 1,
                        best_score: m.score,
                        best_content: content.to_string(),
                    },
                );
            }
        }
    }

    let mut aggregates: Vec<DocumentAggregate> = order
        .into_iter()
        .filter_map(|id| by_document.remove(&id))
        .collect();

    aggregates.sort_by(|a, b| b.average_score().total_cmp(&a.average_score()));
    aggregates
}

fn resolve_namespace(state: &ServiceState, case_name: Option<&str>) -> Namespace {
    match case_name {
        Some(raw) => Namespace::derive(raw),
        None => Namespace::derive(&state.config().default_case_name),
    }
}

/// Char-safe truncation with an ellipsis marker.
fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut preview: String = text.chars().take(max_chars).collect();
        preview.push('…');
        preview
    }
}

fn paginate(hits: Vec<SearchHit>, page: usize, per_page: usize) -> Vec<SearchHit> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page);

    hits.into_iter().skip(start).take(per_page).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_match(document_id: &str, score: f32, content: &str) -> SearchResult {
        SearchResult {
            id: format!("{document_id}-{score}"),
            score,
            metadata: [
                ("document_id".to_string(), serde_json::json!(document_id)),
                ("content".to_string(), serde_json::json!(content)),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn aggregates_average_chunk_scores_per_document() {
        let matches = vec![
            chunk_match("doc-a", 0.9, "a best"),
            chunk_match("doc-b", 0.8, "b best"),
            chunk_match("doc-a", 0.1, "a worst"),
        ];

        let aggregates = aggregate_by_document(&matches);

        assert_eq!(aggregates.len(), 2);
        // doc-a averages 0.5 and falls behind doc-b's single 0.8 hit: a
        // pile of marginal chunks must not outrank one strong hit.
        assert_eq!(aggregates[0].document_id, "doc-b");
        assert_eq!(aggregates[1].document_id, "doc-a");
        assert!((aggregates[1].average_score() - 0.5).abs() < 1e-6);
        assert_eq!(aggregates[1].hits, 2);
        assert_eq!(aggregates[1].best_content, "a best");
    }

    #[test]
    fn equal_scores_keep_first_match_order() {
        let matches = vec![
            chunk_match("doc-a", 0.5, "a"),
            chunk_match("doc-b", 0.5, "b"),
        ];

        let aggregates = aggregate_by_document(&matches);
        assert_eq!(aggregates[0].document_id, "doc-a");
        assert_eq!(aggregates[1].document_id, "doc-b");
    }

    #[test]
    fn preview_truncation_is_char_safe() {
        assert_eq!(truncate_preview("short", 10), "short");

        let truncated = truncate_preview(&"é".repeat(400), 300);
        assert_eq!(truncated.chars().count(), 301);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn pagination_slices_ranked_hits() {
        let hits: Vec<SearchHit> = Vec::new();
        assert!(paginate(hits, 2, 10).is_empty());
    }
}
