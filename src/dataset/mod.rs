//! Dataset loading: corpora and query sets.
//!
//! A corpus is a directory of UTF-8 text files (document id = file stem) or
//! a single file. Queries are a JSON array; each query names the documents
//! its ground-truth excerpts live in:
//!
//! ```json
//! [
//!   {
//!     "id": "q0001",
//!     "question": "What does the fox do?",
//!     "references": [
//!       { "document": "fable", "excerpt": "jumps over the lazy dog" }
//!     ]
//!   }
//! ]
//! ```
//!
//! The `id` field is optional; missing ids default to the query's position
//! (`q0000`, `q0001`, ...).

pub mod reader;

pub use reader::read_file;

use crate::core::{Document, ReferenceExcerpt};
use crate::error::{DatasetError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A named collection of documents.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Corpus name, derived from the path it was loaded from.
    pub name: String,
    documents: Vec<Document>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// Creates a corpus from documents already in memory.
    #[must_use]
    pub fn from_documents(name: impl Into<String>, documents: Vec<Document>) -> Self {
        let by_id = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| (doc.id.clone(), index))
            .collect();
        Self {
            name: name.into(),
            documents,
            by_id,
        }
    }

    /// Loads a corpus from a directory of text files or a single file.
    ///
    /// Document ids are file stems. Directory entries are sorted by name so
    /// corpus order is deterministic; hidden files are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] if the path does not exist, cannot be
    /// read, or yields no documents.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(DatasetError::CorpusNotFound { path: path_str }.into());
        }

        let name = path
            .file_stem()
            .map_or_else(|| path_str.clone(), |s| s.to_string_lossy().to_string());

        let mut documents = Vec::new();
        if path.is_dir() {
            let mut entries: Vec<_> = std::fs::read_dir(path)
                .map_err(|e| DatasetError::ReadFailed {
                    path: path_str.clone(),
                    reason: e.to_string(),
                })?
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|p| {
                    p.is_file()
                        && !p
                            .file_name()
                            .map(|n| n.to_string_lossy().starts_with('.'))
                            .unwrap_or(true)
                })
                .collect();
            entries.sort();

            for file_path in entries {
                let id = file_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let text = read_file(&file_path)?;
                documents.push(Document::new(id, text));
            }
        } else {
            let text = read_file(path)?;
            documents.push(Document::new(name.clone(), text));
        }

        if documents.is_empty() {
            return Err(DatasetError::EmptyCorpus { path: path_str }.into());
        }

        Ok(Self::from_documents(name, documents))
    }

    /// Looks up a document by id.
    #[must_use]
    pub fn get(&self, document_id: &str) -> Option<&Document> {
        self.by_id.get(document_id).map(|&index| &self.documents[index])
    }

    /// Iterates documents in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Checks if the corpus holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One evaluation query with its ground-truth references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalQuery {
    /// Query identifier, unique within a query set.
    pub id: String,
    /// Natural-language question issued to the retrieval adapter.
    pub question: String,
    /// Ground-truth excerpts that should be retrievable for this query.
    pub references: Vec<ReferenceExcerpt>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    id: Option<String>,
    question: String,
    #[serde(default)]
    references: Vec<RawReference>,
}

#[derive(Debug, Deserialize)]
struct RawReference {
    document: String,
    excerpt: String,
}

/// Loads queries from a JSON file and validates them against a corpus.
///
/// # Errors
///
/// Returns a [`DatasetError`] for unreadable or unparsable files, for
/// references naming unknown documents, and for empty excerpts.
pub fn load_queries<P: AsRef<Path>>(path: P, corpus: &Corpus) -> Result<Vec<EvalQuery>> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_string();

    let content = read_file(path)?;
    let raw: Vec<RawQuery> =
        serde_json::from_str(&content).map_err(|e| DatasetError::ParseFailed {
            path: path_str,
            reason: e.to_string(),
        })?;

    let mut queries = Vec::with_capacity(raw.len());
    for (index, raw_query) in raw.into_iter().enumerate() {
        let id = raw_query.id.unwrap_or_else(|| format!("q{index:04}"));

        let mut references = Vec::with_capacity(raw_query.references.len());
        for raw_ref in raw_query.references {
            if corpus.get(&raw_ref.document).is_none() {
                return Err(DatasetError::UnknownDocument {
                    query_id: id.clone(),
                    document_id: raw_ref.document,
                }
                .into());
            }
            if raw_ref.excerpt.is_empty() {
                return Err(DatasetError::EmptyExcerpt { query_id: id.clone() }.into());
            }
            references.push(ReferenceExcerpt::new(
                id.clone(),
                raw_ref.document,
                raw_ref.excerpt,
            ));
        }

        queries.push(EvalQuery {
            id,
            question: raw_query.question,
            references,
        });
    }

    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_corpus(dir: &Path) {
        fs::write(dir.join("alpha.txt"), "Alpha document text").unwrap();
        fs::write(dir.join("beta.txt"), "Beta document text").unwrap();
    }

    #[test]
    fn test_load_corpus_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());

        let corpus = Corpus::load(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert!(corpus.get("alpha").is_some());
        assert!(corpus.get("beta").is_some());
        assert!(corpus.get("gamma").is_none());
    }

    #[test]
    fn test_load_corpus_deterministic_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zeta.txt"), "z").unwrap();
        fs::write(dir.path().join("alpha.txt"), "a").unwrap();

        let corpus = Corpus::load(dir.path()).unwrap();
        let ids: Vec<&str> = corpus.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_load_corpus_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("solo.txt");
        fs::write(&file, "only document").unwrap();

        let corpus = Corpus::load(&file).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.name, "solo");
        assert!(corpus.get("solo").is_some());
    }

    #[test]
    fn test_load_corpus_skips_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        fs::write(dir.path().join(".hidden"), "nope").unwrap();

        let corpus = Corpus::load(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_load_corpus_missing_path() {
        let err = Corpus::load("/nonexistent/corpus").unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Dataset(DatasetError::CorpusNotFound { .. })
        ));
    }

    #[test]
    fn test_load_corpus_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = Corpus::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Dataset(DatasetError::EmptyCorpus { .. })
        ));
    }

    #[test]
    fn test_load_queries() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let corpus = Corpus::load(dir.path()).unwrap();

        let queries_path = dir.path().join("queries.json");
        fs::write(
            &queries_path,
            r#"[
                {
                    "id": "q1",
                    "question": "What is alpha?",
                    "references": [{"document": "alpha", "excerpt": "Alpha document"}]
                },
                {
                    "question": "What is beta?",
                    "references": [{"document": "beta", "excerpt": "Beta"}]
                }
            ]"#,
        )
        .unwrap();

        let queries = load_queries(&queries_path, &corpus).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].id, "q1");
        // Missing id defaults to position
        assert_eq!(queries[1].id, "q0001");
        assert_eq!(queries[0].references[0].document_id, "alpha");
        assert_eq!(queries[0].references[0].query_id, "q1");
    }

    #[test]
    fn test_load_queries_unknown_document() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let corpus = Corpus::load(dir.path()).unwrap();

        let queries_path = dir.path().join("queries.json");
        fs::write(
            &queries_path,
            r#"[{"question": "?", "references": [{"document": "missing", "excerpt": "x"}]}]"#,
        )
        .unwrap();

        let err = load_queries(&queries_path, &corpus).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Dataset(DatasetError::UnknownDocument { .. })
        ));
    }

    #[test]
    fn test_load_queries_empty_excerpt() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let corpus = Corpus::load(dir.path()).unwrap();

        let queries_path = dir.path().join("queries.json");
        fs::write(
            &queries_path,
            r#"[{"question": "?", "references": [{"document": "alpha", "excerpt": ""}]}]"#,
        )
        .unwrap();

        let err = load_queries(&queries_path, &corpus).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Dataset(DatasetError::EmptyExcerpt { .. })
        ));
    }

    #[test]
    fn test_load_queries_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path());
        let corpus = Corpus::load(dir.path()).unwrap();

        let queries_path = dir.path().join("queries.json");
        fs::write(&queries_path, "not json").unwrap();

        let err = load_queries(&queries_path, &corpus).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Dataset(DatasetError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_corpus_from_documents() {
        let corpus = Corpus::from_documents(
            "inline",
            vec![Document::new("d1", "one"), Document::new("d2", "two")],
        );
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get("d2").map(|d| d.text.as_str()), Some("two"));
    }
}
