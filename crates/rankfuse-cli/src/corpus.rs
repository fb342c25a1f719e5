//! Corpus loading for the in-process demo backend.
//!
//! The CLI's `query` command runs against a JSON-lines corpus file: one
//! document per line with an `id` plus optional `title`, `plot`, and
//! `year`. Each document is embedded once at load time, filling both the
//! in-memory search client and the hydration store.

use std::path::Path;
use std::sync::Arc;

use rankfuse_core::{Error, Result};
use rankfuse_retrieval::{
    EmbeddingProvider, HydratedDocument, InMemoryHydrator, InMemorySearchClient,
};
use serde::Deserialize;

/// One line of a corpus file.
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    plot: Option<String>,
    #[serde(default)]
    year: Option<i32>,
}

impl CorpusRecord {
    /// The text both the embedder and the lexical index see.
    fn searchable_text(&self) -> String {
        [self.title.as_deref(), self.plot.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A loaded corpus: searchable index plus hydration store.
#[derive(Debug)]
pub struct Corpus {
    /// Search client seeded with every document.
    pub client: Arc<InMemorySearchClient>,

    /// Hydrator seeded with every document.
    pub hydrator: Arc<InMemoryHydrator>,

    /// Number of documents loaded.
    pub len: usize,
}

/// Load a JSON-lines corpus file, embedding each document.
pub async fn load(path: &Path, embedder: &dyn EmbeddingProvider) -> Result<Corpus> {
    let contents = std::fs::read_to_string(path)?;

    let mut records = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: CorpusRecord = serde_json::from_str(line).map_err(|e| {
            Error::serialization(format!("{}:{}: {e}", path.display(), line_no + 1))
        })?;
        records.push(record);
    }

    let texts: Vec<String> = records.iter().map(CorpusRecord::searchable_text).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let client = Arc::new(InMemorySearchClient::new());
    let hydrator = Arc::new(InMemoryHydrator::new());
    let len = records.len();

    for (record, (text, embedding)) in records
        .into_iter()
        .zip(texts.into_iter().zip(embeddings))
    {
        client.insert(record.id.as_str(), text, embedding);

        let mut document = HydratedDocument::new(record.id.as_str());
        document.title = record.title;
        document.plot = record.plot;
        document.year = record.year;
        hydrator.insert(document);
    }

    log::info!("loaded {len} documents from {}", path.display());
    Ok(Corpus {
        client,
        hydrator,
        len,
    })
}

// ============================================================================
// Tests
// ============================================================================
