use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use std::ops::Deref;
use url::Url;

use super::TextDocument;

/// An open document as last reported by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    document: TextDocument,
    version: Option<i32>,
}

impl StoredDocument {
    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn version(&self) -> Option<i32> {
        self.version
    }
}

// The central store for all open documents.
#[derive(Default)]
pub struct DocumentStore {
    documents: DashMap<Url, StoredDocument>,
}

pub struct DocumentHandle<'a> {
    inner: Ref<'a, Url, StoredDocument>,
}

impl<'a> DocumentHandle<'a> {
    fn new(inner: Ref<'a, Url, StoredDocument>) -> Self {
        Self { inner }
    }
}

impl Deref for DocumentHandle<'_> {
    type Target = StoredDocument;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: Url, text: String, language_id: String, version: Option<i32>) {
        self.documents.insert(
            uri,
            StoredDocument {
                document: TextDocument::new(text, language_id),
                version,
            },
        );
    }

    pub fn get(&self, uri: &Url) -> Option<DocumentHandle<'_>> {
        self.documents.get(uri).map(DocumentHandle::new)
    }

    /// Replace the text of an open document, keeping its language.
    ///
    /// Returns `false` when the document is not open.
    pub fn update_text(&self, uri: &Url, text: String, version: Option<i32>) -> bool {
        match self.documents.get_mut(uri) {
            Some(mut entry) => {
                let language_id = entry.document.language_id().to_string();
                entry.document = TextDocument::new(text, language_id);
                entry.version = version;
                true
            }
            None => false,
        }
    }

    /// Copy of the document, released from the map before any awaiting.
    pub fn snapshot(&self, uri: &Url) -> Option<TextDocument> {
        self.get(uri).map(|doc| doc.document().clone())
    }

    pub fn get_document_text(&self, uri: &Url) -> Option<String> {
        self.get(uri).map(|doc| doc.document().text().to_string())
    }

    pub fn remove(&self, uri: &Url) -> Option<StoredDocument> {
        self.documents.remove(uri).map(|(_, doc)| doc)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
