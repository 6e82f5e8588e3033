use rig::Embed;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse front matter: {0}")]
    FrontMatter(String),

    #[error("Failed to read document: {0}")]
    Read(String),

    #[error("Invalid document: {0}")]
    Invalid(String),
}

/// Optional YAML front matter on a corpus file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrontMatter {
    pub id: String,
    pub title: String,
    pub source: Option<String>,
}

/// Corpus section, derived from the subdirectory a file lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CorpusCategory {
    Conditions,
    Medications,
    Procedures,
    Reference,
}

impl CorpusCategory {
    pub fn from_path(path: &str) -> Option<Self> {
        if path.contains("conditions") {
            Some(CorpusCategory::Conditions)
        } else if path.contains("medications") {
            Some(CorpusCategory::Medications)
        } else if path.contains("procedures") {
            Some(CorpusCategory::Procedures)
        } else if path.contains("corpus") || path.contains("reference") {
            Some(CorpusCategory::Reference)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorpusCategory::Conditions => "Conditions",
            CorpusCategory::Medications => "Medications",
            CorpusCategory::Procedures => "Procedures",
            CorpusCategory::Reference => "Reference",
        }
    }
}

/// One file of the medical reference corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: CorpusCategory,
    pub file_path: PathBuf,
    pub front_matter: Option<FrontMatter>,
}

impl CorpusDocument {
    pub fn new(file_path: PathBuf, raw_content: String) -> Result<Self, DocumentError> {
        let category = CorpusCategory::from_path(file_path.to_str().unwrap_or(""))
            .ok_or_else(|| DocumentError::Invalid("file is outside the corpus layout".to_string()))?;

        let (front_matter, content) = Self::split_front_matter(&raw_content)?;

        let (id, title) = if let Some(fm) = &front_matter {
            (fm.id.clone(), fm.title.clone())
        } else {
            let stem = file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string();
            let title = stem.replace(['-', '_'], " ");
            (stem, title)
        };

        Ok(CorpusDocument {
            id,
            title,
            content,
            category,
            file_path,
            front_matter,
        })
    }

    fn split_front_matter(raw: &str) -> Result<(Option<FrontMatter>, String), DocumentError> {
        let trimmed = raw.trim_start();
        if !trimmed.starts_with("---") {
            return Ok((None, raw.to_string()));
        }

        let parts: Vec<&str> = trimmed.splitn(3, "---").collect();
        if parts.len() < 3 {
            return Ok((None, raw.to_string()));
        }

        let yaml = parts[1].trim();
        if yaml.is_empty() {
            return Ok((None, parts[2].to_string()));
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(fm) => Ok((Some(fm), parts[2].trim_start().to_string())),
            // A malformed header degrades to plain content rather than rejecting the file.
            Err(_) => Ok((None, raw.to_string())),
        }
    }

    /// Split the document into overlapping character windows for embedding.
    pub fn chunk(&self, chunk_size: usize, overlap: usize) -> Vec<Passage> {
        let chars: Vec<char> = self.content.chars().collect();
        let total = chars.len();

        let metadata = |total_passages| PassageMetadata {
            document_title: self.title.clone(),
            category: self.category,
            file_path: self.file_path.clone(),
            total_passages,
        };

        if total <= chunk_size {
            return vec![Passage {
                document_id: self.id.clone(),
                index: 0,
                content: self.content.clone(),
                metadata: metadata(1),
            }];
        }

        let step = if overlap > 0 && chunk_size > overlap {
            chunk_size - overlap
        } else {
            chunk_size
        };

        let mut passages = Vec::new();
        let mut start = 0;
        while start < total {
            let end = usize::min(start + chunk_size, total);
            passages.push(Passage {
                document_id: self.id.clone(),
                index: passages.len(),
                content: chars[start..end].iter().collect(),
                metadata: metadata(0),
            });
            if end == total {
                break;
            }
            start += step;
        }

        let count = passages.len();
        for passage in &mut passages {
            passage.metadata.total_passages = count;
        }
        passages
    }
}

/// One embeddable slice of a corpus document.
#[derive(Debug, Clone, Serialize, Deserialize, Embed, PartialEq, Eq)]
pub struct Passage {
    pub document_id: String,
    pub index: usize,
    #[embed]
    pub content: String,
    pub metadata: PassageMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassageMetadata {
    pub document_title: String,
    pub category: CorpusCategory,
    pub file_path: PathBuf,
    pub total_passages: usize,
}
