//! Grounded answer generation agent.

use docket_core::AnswerGenerator;
use rig::agent::{Agent, AgentBuilder};
use rig::completion::Prompt;
use rig::providers::{gemini, openai};

use crate::provider::CompletionProvider;

const NAME: &str = "GroundedAnswerAgent";
const DESCRIPTION: &str =
    "Agent for answering questions strictly from retrieved legal document context";

const PREAMBLE: &str = "\
You are a legal document assistant. Answer questions using only the context
supplied with each request. If the context does not contain the answer, say
so explicitly instead of guessing. Cite the document references given in
the context when you use them.";

/// Agent producing grounded answers from retrieved context.
///
/// The retrieval pipeline assembles the full prompt (context block plus
/// grounding instructions); this agent is the prompt-to-text boundary.
pub struct AnswerAgent {
    inner: AgentInner,
    model_name: String,
}

enum AgentInner {
    OpenAi(Agent<openai::CompletionModel>),
    Gemini(Agent<gemini::completion::CompletionModel>),
}

impl AnswerAgent {
    /// Creates a new agent from a completion provider.
    pub fn new(provider: CompletionProvider) -> Self {
        let model_name = provider.model_name().to_string();

        let inner = match provider {
            CompletionProvider::OpenAi { model, .. } => {
                AgentInner::OpenAi(build_agent(model))
            }
            CompletionProvider::Gemini { model, .. } => {
                AgentInner::Gemini(build_agent(model))
            }
        };

        Self { inner, model_name }
    }

    async fn prompt(&self, prompt: &str) -> docket_core::Result<String> {
        let response = match &self.inner {
            AgentInner::OpenAi(agent) => agent.prompt(prompt).await,
            AgentInner::Gemini(agent) => agent.prompt(prompt).await,
        };

        response.map_err(|e| docket_core::Error::generation(e.to_string()))
    }
}

fn build_agent<M>(model: M) -> Agent<M>
where
    M: rig::completion::CompletionModel,
{
    AgentBuilder::new(model)
        .name(NAME)
        .description(DESCRIPTION)
        .preamble(PREAMBLE)
        .build()
}

#[async_trait::async_trait]
impl AnswerGenerator for AnswerAgent {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    #[tracing::instrument(skip(self, prompt), fields(agent = NAME, model = %self.model_name, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> docket_core::Result<String> {
        let response = self.prompt(prompt).await?;
        tracing::debug!(response_len = response.len(), "generation completed");
        Ok(response)
    }
}
