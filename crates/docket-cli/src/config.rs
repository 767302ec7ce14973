//! Command-line configuration and service wiring.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use docket_core::{AiServices, SharedAnswerGenerator, SharedTextEmbedder};
use docket_data::{MemoryDocumentStore, SharedDocumentStore};
use docket_object::{ObjectStorage, ObjectStorageConfig, S3Config};
use docket_ocr::{OcrClient, OcrConfig};
use docket_postgres::{PgClient, PgConfig, PgDocumentStore, run_pending_migrations};
use docket_rig::{AnswerAgent, CompletionProvider, EmbeddingProvider};
use docket_server::service::{ServiceConfig, ServiceState};
use docket_vector::{PineconeConfig, VectorStore, VectorStoreConfig};

/// Tracing target for configuration events.
const TRACING_TARGET: &str = "docket_cli::config";

const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_OPENAI_COMPLETION_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GEMINI_EMBEDDING_MODEL: &str = "text-embedding-004";
const DEFAULT_GEMINI_COMPLETION_MODEL: &str = "gemini-2.0-flash";

/// Docket API server.
#[derive(Debug, Parser)]
#[command(name = "docket-server", version, about)]
pub struct Cli {
    /// Bind address.
    #[arg(long, env = "DOCKET_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Bind port.
    #[arg(long, env = "DOCKET_PORT", default_value_t = 8080)]
    pub port: u16,

    /// HMAC secret for bearer-token verification.
    #[arg(long, env = "DOCKET_AUTH_SECRET")]
    pub auth_secret: String,

    /// PostgreSQL connection URL; omitted, document metadata is held
    /// in memory and lost on restart.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Pinecone API key; omitted, vectors are held in memory.
    #[arg(long, env = "PINECONE_API_KEY")]
    pub pinecone_api_key: Option<String>,

    /// Pinecone index name.
    #[arg(long, env = "PINECONE_INDEX", default_value = "docket-documents")]
    pub pinecone_index: String,

    /// Pinecone serverless cloud (`aws`, `gcp` or `azure`).
    #[arg(long, env = "PINECONE_CLOUD", default_value = "aws")]
    pub pinecone_cloud: String,

    /// Pinecone serverless region.
    #[arg(long, env = "PINECONE_REGION", default_value = "us-east-1")]
    pub pinecone_region: String,

    /// S3 bucket for original uploads; omitted, blobs are held in memory.
    #[arg(long, env = "DOCKET_S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// S3 region.
    #[arg(long, env = "DOCKET_S3_REGION", default_value = "us-east-1")]
    pub s3_region: String,

    /// Custom endpoint for S3-compatible stores.
    #[arg(long, env = "DOCKET_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// S3 access key id.
    #[arg(long, env = "AWS_ACCESS_KEY_ID", default_value = "")]
    pub s3_access_key_id: String,

    /// S3 secret access key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", default_value = "")]
    pub s3_secret_access_key: String,

    /// Public base URL for stored objects.
    #[arg(long, env = "DOCKET_S3_PUBLIC_URL")]
    pub s3_public_url: Option<String>,

    /// OpenAI API key for embeddings and completions.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Gemini API key; takes precedence over OpenAI when both are set.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Embedding model name; defaults per provider.
    #[arg(long, env = "DOCKET_EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    /// Embedding dimensionality.
    #[arg(long, env = "DOCKET_EMBEDDING_DIMENSIONS", default_value_t = 768)]
    pub embedding_dimensions: usize,

    /// Completion model name; defaults per provider.
    #[arg(long, env = "DOCKET_COMPLETION_MODEL")]
    pub completion_model: Option<String>,

    /// Base URL of the OCR transcription service.
    #[arg(long, env = "DOCKET_OCR_BASE_URL")]
    pub ocr_base_url: String,

    /// API key for the OCR transcription service.
    #[arg(long, env = "DOCKET_OCR_API_KEY")]
    pub ocr_api_key: String,
}

/// Logs the effective (non-sensitive) configuration.
pub fn log_startup_info(cli: &Cli) {
    tracing::info!(
        target: TRACING_TARGET,
        host = %cli.host,
        port = %cli.port,
        metadata_store = %cli.database_url.as_deref().map(|_| "postgres").unwrap_or("memory"),
        vector_store = %cli.pinecone_api_key.as_deref().map(|_| "pinecone").unwrap_or("memory"),
        object_storage = %cli.s3_bucket.as_deref().map(|_| "s3").unwrap_or("memory"),
        "Starting Docket API server"
    );
}

/// Assembles the application state from the CLI configuration.
pub async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let ai = create_ai_services(cli)?;
    let documents = create_document_store(cli).await?;
    let vectors = create_vector_store(cli).await?;
    let objects = create_object_storage(cli)?;

    let config = ServiceConfig {
        auth_secret: cli.auth_secret.clone(),
        ..ServiceConfig::default()
    };

    Ok(ServiceState::new(config, documents, vectors, objects, ai))
}

fn create_ai_services(cli: &Cli) -> anyhow::Result<AiServices> {
    let (embedder, generator): (SharedTextEmbedder, SharedAnswerGenerator) =
        if let Some(api_key) = &cli.gemini_api_key {
            let embedding_model = cli
                .embedding_model
                .as_deref()
                .unwrap_or(DEFAULT_GEMINI_EMBEDDING_MODEL);
            let completion_model = cli
                .completion_model
                .as_deref()
                .unwrap_or(DEFAULT_GEMINI_COMPLETION_MODEL);

            let embedder =
                EmbeddingProvider::gemini(api_key, embedding_model, cli.embedding_dimensions)
                    .context("failed to create Gemini embedding provider")?;
            let completion = CompletionProvider::gemini(api_key, completion_model)
                .context("failed to create Gemini completion provider")?;

            (Arc::new(embedder), Arc::new(AnswerAgent::new(completion)))
        } else if let Some(api_key) = &cli.openai_api_key {
            let embedding_model = cli
                .embedding_model
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_EMBEDDING_MODEL);
            let completion_model = cli
                .completion_model
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_COMPLETION_MODEL);

            let embedder =
                EmbeddingProvider::openai(api_key, embedding_model, cli.embedding_dimensions)
                    .context("failed to create OpenAI embedding provider")?;
            let completion = CompletionProvider::openai(api_key, completion_model)
                .context("failed to create OpenAI completion provider")?;

            (Arc::new(embedder), Arc::new(AnswerAgent::new(completion)))
        } else {
            bail!("either OPENAI_API_KEY or GEMINI_API_KEY must be set");
        };

    let ocr_config = OcrConfig::new(&cli.ocr_base_url, &cli.ocr_api_key)
        .context("invalid OCR service configuration")?;
    let ocr = OcrClient::new(ocr_config).context("failed to create OCR client")?;

    Ok(AiServices::new(embedder, generator, Arc::new(ocr)))
}

async fn create_document_store(cli: &Cli) -> anyhow::Result<SharedDocumentStore> {
    let Some(database_url) = &cli.database_url else {
        tracing::warn!(
            target: TRACING_TARGET,
            "DATABASE_URL not set, using in-memory metadata store"
        );
        return Ok(Arc::new(MemoryDocumentStore::new()));
    };

    run_pending_migrations(database_url)
        .await
        .context("failed to run database migrations")?;

    let client =
        PgClient::connect(&PgConfig::new(database_url)).context("failed to create database pool")?;

    Ok(Arc::new(PgDocumentStore::new(client)))
}

async fn create_vector_store(cli: &Cli) -> anyhow::Result<VectorStore> {
    let Some(api_key) = &cli.pinecone_api_key else {
        tracing::warn!(
            target: TRACING_TARGET,
            "PINECONE_API_KEY not set, using in-memory vector store"
        );
        return Ok(VectorStore::memory());
    };

    let config = VectorStoreConfig::Pinecone(PineconeConfig {
        api_key: api_key.clone(),
        index: cli.pinecone_index.clone(),
        cloud: cli.pinecone_cloud.clone(),
        region: cli.pinecone_region.clone(),
    });

    VectorStore::new(config)
        .await
        .context("failed to connect to Pinecone")
}

fn create_object_storage(cli: &Cli) -> anyhow::Result<ObjectStorage> {
    let Some(bucket) = &cli.s3_bucket else {
        tracing::warn!(
            target: TRACING_TARGET,
            "DOCKET_S3_BUCKET not set, using in-memory object storage"
        );
        return ObjectStorage::memory().context("failed to create in-memory storage");
    };

    let config = ObjectStorageConfig::S3(S3Config {
        bucket: bucket.clone(),
        region: cli.s3_region.clone(),
        endpoint: cli.s3_endpoint.clone(),
        access_key_id: cli.s3_access_key_id.clone(),
        secret_access_key: cli.s3_secret_access_key.clone(),
        public_url: cli.s3_public_url.clone(),
    });

    ObjectStorage::from_config(&config).context("failed to create S3 storage")
}
