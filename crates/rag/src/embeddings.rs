use rig::embeddings::{embedding::EmbeddingModelDyn, Embedding};
use rig_fastembed::{Client, EmbeddingModel, FastembedModel};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Failed to initialize embedding model: {0}")]
    Initialization(String),

    #[error("Failed to embed text: {0}")]
    Generation(String),
}

/// Local embedding model used to index the corpus and embed queries.
pub struct EmbeddingClient {
    model: EmbeddingModel,
}

impl EmbeddingClient {
    pub async fn new() -> Result<Self, EmbeddingError> {
        let client = Client::new();
        let model = client.embedding_model(&FastembedModel::BGEBaseENV15);
        Ok(Self { model })
    }

    pub async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.model
            .embed_text(text)
            .await
            .map_err(|e| EmbeddingError::Generation(e.to_string()))
    }

    pub async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(&text).await?);
        }
        Ok(embeddings)
    }

    // BGE base EN v1.5
    pub fn embedding_dim(&self) -> usize {
        768
    }

    pub fn model(&self) -> &EmbeddingModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeds_a_query() {
        let client = EmbeddingClient::new().await.unwrap();
        let embedding = client.embed("What are the symptoms of influenza?").await;

        assert!(embedding.is_ok());
        assert_eq!(embedding.unwrap().vec.len(), client.embedding_dim());
    }

    #[tokio::test]
    async fn embeds_a_batch() {
        let client = EmbeddingClient::new().await.unwrap();
        let texts = vec![
            "Fever is a raised body temperature.".to_string(),
            "Aspirin is an analgesic.".to_string(),
        ];

        let embeddings = client.embed_batch(texts.clone()).await.unwrap();
        assert_eq!(embeddings.len(), texts.len());
        for embedding in embeddings {
            assert_eq!(embedding.vec.len(), 768);
        }
    }
}
