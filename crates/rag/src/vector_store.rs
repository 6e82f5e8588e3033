use std::fs;
use std::path::Path;

use crate::{
    documents::{CorpusDocument, DocumentError, Passage},
    embeddings::{EmbeddingClient, EmbeddingError},
};
use rig::vector_store::in_memory_store::InMemoryVectorStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Corpus error: {0}")]
    Corpus(String),
}

/// In-memory vector index over the medical corpus.
///
/// Built once at startup; searches clone the store handle so callers never
/// need a write lock for queries.
pub struct CorpusIndex {
    embedding_client: EmbeddingClient,
    store: InMemoryVectorStore<Passage>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub passage: Passage,
    pub score: f64,
}

impl CorpusIndex {
    pub async fn new() -> Result<Self, IndexError> {
        let embedding_client = EmbeddingClient::new().await?;
        let store = InMemoryVectorStore::from_documents(vec![]);
        Ok(Self {
            embedding_client,
            store,
        })
    }

    pub async fn add_document(
        &mut self,
        document: CorpusDocument,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<usize, IndexError> {
        let passages = document.chunk(chunk_size, overlap);
        let count = passages.len();

        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let embeddings = self.embedding_client.embed_batch(texts).await?;

        use rig::OneOrMany;
        let entries: Vec<(Passage, OneOrMany<rig::embeddings::Embedding>)> = passages
            .into_iter()
            .zip(embeddings.into_iter().map(OneOrMany::one))
            .collect();

        self.store.add_documents(entries);
        Ok(count)
    }

    /// Recursively index every `.md` / `.txt` file under `dir_path`.
    pub async fn load_directory(
        &mut self,
        dir_path: &str,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<usize, IndexError> {
        let mut documents = Vec::new();
        collect_documents(Path::new(dir_path), &mut documents)?;

        let mut total = 0;
        for document in documents {
            total += self.add_document(document, chunk_size, overlap).await?;
        }
        Ok(total)
    }

    pub async fn search(&self, query: &str, top_n: usize) -> Result<Vec<SearchResult>, IndexError> {
        use rig::vector_store::request::VectorSearchRequest;
        use rig::vector_store::VectorStoreIndex;

        let index = self
            .store
            .clone()
            .index(self.embedding_client.model().clone());

        let request = VectorSearchRequest::builder()
            .query(query)
            .samples(top_n as u64)
            .build()
            .map_err(|e| IndexError::Search(e.to_string()))?;

        let results: Vec<(f64, String, Passage)> = index
            .top_n(request)
            .await
            .map_err(|e| IndexError::Search(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|(score, _id, passage)| SearchResult { passage, score })
            .collect())
    }

    pub fn passage_count(&self) -> usize {
        self.store.len()
    }
}

fn collect_documents(dir: &Path, documents: &mut Vec<CorpusDocument>) -> Result<(), IndexError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| IndexError::Corpus(format!("failed to read {}: {e}", dir.display())))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| IndexError::Corpus(format!("failed to read dir entry: {e}")))?;
        let path = entry.path();

        if path.is_dir() {
            collect_documents(&path, documents)?;
            continue;
        }

        let extension = path.extension().and_then(|s| s.to_str());
        if extension == Some("md") || extension == Some("txt") {
            let content = fs::read_to_string(&path)
                .map_err(|e| IndexError::Corpus(format!("failed to read {}: {e}", path.display())))?;
            documents.push(CorpusDocument::new(path, content)?);
        }
    }

    Ok(())
}
