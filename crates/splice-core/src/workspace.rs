//! Immutable workspace snapshots.
//!
//! A [`Workspace`] is a set of parsed documents. It never mutates in place:
//! committing an edit produces a new snapshot via [`Workspace::with_document_text`],
//! which reparses the changed document into the caller's arena. Snapshots
//! borrow only arena-allocated AST nodes, so a shared reference to a
//! workspace can be handed to worker threads during the parallel phase.

use std::sync::Arc;

use indexmap::IndexMap;
use splice_syntax::{ast, parse_module, Arena, StringInterner, SyntaxError};

/// Stable handle to a document within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u32);

impl DocumentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub id: DocumentId,
    /// Display name, typically the file path relative to the project root.
    pub name: String,
    pub text: String,
    pub module: &'a ast::Module<'a>,
}

/// An immutable set of documents, ordered by insertion.
#[derive(Debug, Clone, Default)]
pub struct Workspace<'a> {
    documents: IndexMap<DocumentId, Document<'a>>,
    next_id: u32,
}

impl<'a> Workspace<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and add it as a new document.
    pub fn add_document(
        &mut self,
        name: impl Into<String>,
        text: String,
        arena: &'a Arena,
        interner: &Arc<StringInterner>,
    ) -> Result<DocumentId, SyntaxError> {
        let module = parse_module(&text, arena, interner)?;
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.documents.insert(
            id,
            Document {
                id,
                name: name.into(),
                text,
                module,
            },
        );
        Ok(id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document<'a>> {
        self.documents.get(&id)
    }

    pub fn document_by_name(&self, name: &str) -> Option<&Document<'a>> {
        self.documents.values().find(|d| d.name == name)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document<'a>> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// New snapshot with one document's text replaced and reparsed.
    ///
    /// The other documents are shared with the old snapshot; their modules
    /// live in the same arena.
    pub fn with_document_text(
        &self,
        id: DocumentId,
        text: String,
        arena: &'a Arena,
        interner: &Arc<StringInterner>,
    ) -> Result<Workspace<'a>, SyntaxError> {
        let module = parse_module(&text, arena, interner)?;
        let mut documents = self.documents.clone();
        if let Some(doc) = documents.get_mut(&id) {
            doc.text = text;
            doc.module = module;
        }
        Ok(Workspace {
            documents,
            next_id: self.next_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_update_keeps_other_documents() {
        let arena = Arena::new();
        let interner = Arc::new(StringInterner::new());
        let mut ws = Workspace::new();
        let a = ws
            .add_document("a.mica", "fn one() -> Int = 1\n".to_string(), &arena, &interner)
            .unwrap();
        let b = ws
            .add_document("b.mica", "fn two() -> Int = 2\n".to_string(), &arena, &interner)
            .unwrap();

        let updated = ws
            .with_document_text(a, "fn one() -> Int = 3\n".to_string(), &arena, &interner)
            .unwrap();

        assert_eq!(updated.document(a).unwrap().text, "fn one() -> Int = 3\n");
        assert_eq!(updated.document(b).unwrap().text, ws.document(b).unwrap().text);
        // The original snapshot is untouched.
        assert_eq!(ws.document(a).unwrap().text, "fn one() -> Int = 1\n");
    }

    #[test]
    fn parse_errors_surface_on_add() {
        let arena = Arena::new();
        let interner = Arc::new(StringInterner::new());
        let mut ws = Workspace::new();
        let err = ws.add_document("bad.mica", "fn {".to_string(), &arena, &interner);
        assert!(err.is_err());
    }
}
