pub mod documents;
pub mod embeddings;
pub mod vector_store;

pub use documents::{
    CorpusCategory, CorpusDocument, DocumentError, FrontMatter, Passage, PassageMetadata,
};
pub use embeddings::{EmbeddingClient, EmbeddingError};
pub use vector_store::{CorpusIndex, IndexError, SearchResult};
