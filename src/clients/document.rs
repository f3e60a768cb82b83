//! Document collection client.
//!
//! Collections are JSON arrays of documents persisted one file per
//! collection. Every document carries a string `id`. Field names passed to
//! the client are canonical snake_case and translated with the store's
//! [`FieldNaming`] before they touch a document.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::domain::types::SortDirection;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// A single stored document.
pub type Document = serde_json::Map<String, Value>;

const ID_FIELD: &str = "id";

/// Field naming convention used by a backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNaming {
    SnakeCase,
    CamelCase,
}

impl FieldNaming {
    /// Translates a canonical snake_case field name into this convention.
    pub fn field(self, name: &str) -> Cow<'_, str> {
        match self {
            Self::SnakeCase => Cow::Borrowed(name),
            Self::CamelCase if !name.contains('_') => Cow::Borrowed(name),
            Self::CamelCase => {
                let mut out = String::with_capacity(name.len());
                let mut upper = false;
                for ch in name.chars() {
                    if ch == '_' {
                        upper = true;
                    } else if upper {
                        out.extend(ch.to_uppercase());
                        upper = false;
                    } else {
                        out.push(ch);
                    }
                }
                Cow::Owned(out)
            }
        }
    }
}

/// File-backed document store.
#[derive(Debug)]
pub struct DocumentStore {
    root: PathBuf,
    naming: FieldNaming,
    lock: Mutex<()>,
}

impl DocumentStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, naming: FieldNaming) -> RepositoryResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            naming,
            lock: Mutex::new(()),
        })
    }

    pub fn naming(&self) -> FieldNaming {
        self.naming
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every document, optionally sorted by `sort_field`.
    ///
    /// Documents missing the sort field come last in either direction; ties
    /// keep insertion order.
    pub fn list_all(
        &self,
        collection: &str,
        sort_field: Option<&str>,
        direction: SortDirection,
    ) -> RepositoryResult<Vec<Document>> {
        let _guard = self.guard()?;
        let mut documents = self.read_collection(collection)?;
        if let Some(field) = sort_field {
            let field = self.naming.field(field);
            documents.sort_by(|a, b| compare_field(a.get(&*field), b.get(&*field), direction));
        }
        Ok(documents)
    }

    pub fn get(&self, collection: &str, id: &str) -> RepositoryResult<Option<Document>> {
        let _guard = self.guard()?;
        Ok(self
            .read_collection(collection)?
            .into_iter()
            .find(|doc| document_id(doc) == Some(id)))
    }

    /// Returns documents whose `field` equals `value`, in insertion order.
    pub fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> RepositoryResult<Vec<Document>> {
        let _guard = self.guard()?;
        let field = self.naming.field(field);
        Ok(self
            .read_collection(collection)?
            .into_iter()
            .filter(|doc| doc.get(&*field) == Some(value))
            .collect())
    }

    /// Appends a document, assigning an `id` when it has none.
    pub fn insert(&self, collection: &str, document: Document) -> RepositoryResult<Document> {
        let _guard = self.guard()?;
        let mut document = self.translate(document);
        if document_id(&document).is_none() {
            document.insert(
                ID_FIELD.to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }

        let mut documents = self.read_collection(collection)?;
        documents.push(document.clone());
        self.write_collection(collection, &documents)?;
        Ok(document)
    }

    /// Merges `partial` into the document with the given id.
    pub fn update(&self, collection: &str, id: &str, partial: Document) -> RepositoryResult<()> {
        let _guard = self.guard()?;
        let partial = self.translate(partial);
        let mut documents = self.read_collection(collection)?;
        let document = documents
            .iter_mut()
            .find(|doc| document_id(doc) == Some(id))
            .ok_or(RepositoryError::NotFound)?;
        for (key, value) in partial {
            if key != ID_FIELD {
                document.insert(key, value);
            }
        }
        self.write_collection(collection, &documents)
    }

    pub fn delete(&self, collection: &str, id: &str) -> RepositoryResult<()> {
        let _guard = self.guard()?;
        let mut documents = self.read_collection(collection)?;
        let before = documents.len();
        documents.retain(|doc| document_id(doc) != Some(id));
        if documents.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.write_collection(collection, &documents)
    }

    /// Deletes every document whose `field` equals `value`.
    pub fn delete_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> RepositoryResult<usize> {
        let _guard = self.guard()?;
        let field = self.naming.field(field);
        let mut documents = self.read_collection(collection)?;
        let before = documents.len();
        documents.retain(|doc| doc.get(&*field) != Some(value));
        let removed = before - documents.len();
        if removed > 0 {
            self.write_collection(collection, &documents)?;
        }
        Ok(removed)
    }

    fn guard(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("document store lock poisoned".to_string()))
    }

    fn translate(&self, document: Document) -> Document {
        document
            .into_iter()
            .map(|(key, value)| (self.naming.field(&key).into_owned(), value))
            .collect()
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    fn read_collection(&self, collection: &str) -> RepositoryResult<Vec<Document>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_collection(&self, collection: &str, documents: &[Document]) -> RepositoryResult<()> {
        let path = self.collection_path(collection);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(documents)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

fn compare_field(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => direction.apply(compare_values(a, b)),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
