pub mod prompt;
mod retry;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use medichat_rag::CorpusIndex;
use rig::client::completion::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::prompt::render_system_prompt;
use crate::retry::call_with_retry;

const RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(10);
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AgentError {
    /// An external service kept failing or timing out across every retry.
    #[error("{service} service unavailable after {attempts} attempts: {reason}")]
    ServiceUnavailable {
        service: &'static str,
        attempts: u32,
        reason: String,
    },

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("completion failed: {0}")]
    Completion(String),
}

/// Seam between the HTTP layer and the retrieval+generation pipeline.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    /// Produce a reply for `message`, given the rendered history of the
    /// session it belongs to.
    async fn answer(&self, message: &str, history_text: &str) -> Result<String, AgentError>;
}

/// Retrieval-augmented answering over the medical corpus.
///
/// Owns no algorithm of its own: searches the corpus index for context,
/// renders the fixed system prompt, and delegates generation to OpenAI.
pub struct MedicalAgent {
    client: openai::Client,
    model: String,
    index: Arc<Mutex<CorpusIndex>>,
    top_k: usize,
}

impl MedicalAgent {
    pub fn new(
        openai_api_key: &str,
        model: impl Into<String>,
        index: Arc<Mutex<CorpusIndex>>,
        top_k: usize,
    ) -> Self {
        Self {
            client: openai::Client::new(openai_api_key),
            model: model.into(),
            index,
            top_k,
        }
    }

    async fn retrieve_context(&self, query: &str) -> Result<String, AgentError> {
        let results = call_with_retry("retrieval", RETRIEVAL_TIMEOUT, || async {
            let index = self.index.lock().await;
            index.search(query, self.top_k).await
        })
        .await?;

        if results.is_empty() {
            return Ok("No relevant passages found.".to_string());
        }

        let mut context = String::new();
        for result in &results {
            context.push_str(&format!(
                "[{}] {} ({:.2})\n{}\n\n",
                result.passage.metadata.category.label(),
                result.passage.metadata.document_title,
                result.score,
                result.passage.content,
            ));
        }
        Ok(context.trim_end().to_string())
    }
}

#[async_trait]
impl AnswerEngine for MedicalAgent {
    async fn answer(&self, message: &str, history_text: &str) -> Result<String, AgentError> {
        let context = self.retrieve_context(message).await?;
        let system = render_system_prompt(history_text, &context);

        tracing::debug!(top_k = self.top_k, "prompting completion model");

        let reply = call_with_retry("generation", COMPLETION_TIMEOUT, || {
            let agent = self
                .client
                .agent(&self.model)
                .preamble(&system)
                .build();
            let message = message.to_string();
            async move { agent.prompt(message).await }
        })
        .await?;

        Ok(reply)
    }
}
