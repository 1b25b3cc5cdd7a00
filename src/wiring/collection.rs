use log::debug;

use crate::wiring::descriptor::NodeDescriptor;
use crate::wiring::document::WiringDocument;
use crate::wiring::error::{WiringError, WiringResult};

/*
Document Collections
====================

A collection owns the wiring documents loaded together and is the resolution
scope for cross-document references: one document's template may point at a
sibling's graph by name, so compilation always receives the whole collection.

Loading validates eagerly. Every reference in every document must resolve
against the collection, and the document-to-document reference graph must be
acyclic. A load that fails produces NO collection at all; there is no
partially usable state, and nothing can glitch at first note-on because a
reference turned out dangling mid-performance.

The "active" document is a single-selection convenience for UIs. Any document
in the collection can compile generators regardless of which one is active.
*/

#[derive(Debug)]
pub struct WiringCollection {
    documents: Vec<WiringDocument>,
    active: Option<usize>,
}

impl WiringCollection {
    /// Build a collection, validating all cross-document references.
    ///
    /// The first loaded document becomes active. Insertion order is kept.
    pub fn load(documents: Vec<WiringDocument>) -> WiringResult<Self> {
        let collection = Self::load_unchecked(documents);
        collection.validate_references()?;

        debug!("loaded wiring collection ({} documents)", collection.len());
        Ok(collection)
    }

    /// Deserialize a JSON array of documents and load it as a collection.
    ///
    /// Same eager validation as `load`; parse failures are structural errors
    /// and produce no collection. Full file-format mechanics beyond this
    /// convenience live outside the crate.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> WiringResult<Self> {
        let documents: Vec<WiringDocument> = serde_json::from_str(json)?;
        Self::load(documents)
    }

    /// Skip validation. For compile-machinery tests that need a collection
    /// in a deliberately broken state.
    pub(crate) fn load_unchecked(documents: Vec<WiringDocument>) -> Self {
        let active = if documents.is_empty() { None } else { Some(0) };
        Self { documents, active }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document by insertion index.
    pub fn document(&self, index: usize) -> WiringResult<&WiringDocument> {
        self.documents
            .get(index)
            .ok_or(WiringError::IndexOutOfRange {
                index,
                len: self.documents.len(),
            })
    }

    /// First document with the given name, if any.
    pub fn document_by_name(&self, name: &str) -> Option<&WiringDocument> {
        self.documents.iter().find(|doc| doc.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WiringDocument> {
        self.documents.iter()
    }

    /// The currently selected document. `None` only for an empty collection.
    pub fn active(&self) -> Option<&WiringDocument> {
        self.active.map(|index| &self.documents[index])
    }

    /// Select the active document by name.
    pub fn set_active(&mut self, name: &str) -> WiringResult<()> {
        let index = self
            .documents
            .iter()
            .position(|doc| doc.name() == name)
            .ok_or_else(|| WiringError::UnknownDocument {
                name: name.to_owned(),
            })?;
        self.active = Some(index);
        Ok(())
    }

    /// Walk every document's reference closure: all names must resolve and
    /// the reference graph must be acyclic.
    fn validate_references(&self) -> WiringResult<()> {
        let mut stack = Vec::new();
        for document in &self.documents {
            stack.clear();
            stack.push(document.name());
            self.visit(document.root(), document.name(), &mut stack)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        template: &'a NodeDescriptor,
        owner: &str,
        stack: &mut Vec<&'a str>,
    ) -> WiringResult<()> {
        let mut refs = Vec::new();
        template.collect_references(&mut refs);

        for name in refs {
            if stack.contains(&name) {
                let mut path = stack.join(" -> ");
                path.push_str(" -> ");
                path.push_str(name);
                return Err(WiringError::ReferenceCycle { path });
            }

            let referenced =
                self.document_by_name(name)
                    .ok_or_else(|| WiringError::UnresolvedReference {
                        document: owner.to_owned(),
                        reference: name.to_owned(),
                    })?;

            stack.push(name);
            self.visit(referenced.root(), name, stack)?;
            stack.pop();
        }

        Ok(())
    }
}
