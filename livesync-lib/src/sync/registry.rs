//! Per-document bookkeeping of the managed style container.

use crate::dom::{self, Document, NodeRef};
use crate::error::SyncError;
use crate::style::StyleSheet;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Attribute that marks the `<style>` element owned by the synchronizer.
pub const MANAGED_ATTRIBUTE: &str = "data-livesync-managed";

/// The `<style>` element the synchronizer writes rules into.
#[derive(Debug, Clone)]
pub struct StyleContainer {
    element: NodeRef,
}

impl StyleContainer {
    pub fn element(&self) -> &NodeRef {
        &self.element
    }

    /// The element's current sheet. Rewriting the element's text installs a
    /// new sheet, so this is looked up on every call. `None` once the element
    /// has been taken out of the document.
    pub fn sheet(&self) -> Option<Rc<StyleSheet>> {
        dom::style_sheet(&self.element)
    }

    /// Whether both handles refer to the same element.
    pub fn same_container(&self, other: &StyleContainer) -> bool {
        Rc::ptr_eq(&self.element, &other.element)
    }
}

#[derive(Debug)]
struct Entry {
    document: Weak<Document>,
    container: StyleContainer,
}

/// Maps each target document to its single managed container.
///
/// Entries are keyed by document identity and hold the document weakly, so
/// registering a document never keeps it alive. Entries whose document has
/// been dropped are pruned on every lookup.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    // Keyed by the document's address. The held `Weak` keeps the allocation
    // from being reused while the entry exists.
    entries: HashMap<usize, Entry>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the container of `document`, creating and attaching it into
    /// the document's `<head>` on first use.
    pub fn lookup(&mut self, document: &Rc<Document>) -> Result<StyleContainer, SyncError> {
        self.prune();
        if let Some(container) = self.get(document) {
            return Ok(container);
        }

        let head = document.head().ok_or(SyncError::MissingMetadataRoot)?;
        let element = document.create_element("style");
        if let Some(data) = element.borrow_mut().as_element_mut() {
            data.set_attribute(MANAGED_ATTRIBUTE, "");
        }
        dom::append_child(&head, Rc::clone(&element))?;

        let container = StyleContainer { element };
        self.entries.insert(
            key(document),
            Entry {
                document: Rc::downgrade(document),
                container: container.clone(),
            },
        );
        log::debug!(
            "created managed style container ({} documents registered)",
            self.entries.len()
        );
        Ok(container)
    }

    /// The container of `document`, without creating one.
    pub fn get(&self, document: &Rc<Document>) -> Option<StyleContainer> {
        self.entries
            .get(&key(document))
            .filter(|entry| {
                entry
                    .document
                    .upgrade()
                    .is_some_and(|alive| Rc::ptr_eq(&alive, document))
            })
            .map(|entry| entry.container.clone())
    }

    /// Drop the association for `document`. The container stays in the tree.
    pub fn forget(&mut self, document: &Rc<Document>) -> Option<StyleContainer> {
        self.entries.remove(&key(document)).map(|entry| entry.container)
    }

    /// Remove entries whose document has been dropped.
    pub fn prune(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.document.strong_count() > 0);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            log::trace!("pruned {pruned} dropped documents from the style registry");
        }
    }

    /// Number of registered documents, including any not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key(document: &Rc<Document>) -> usize {
    Rc::as_ptr(document) as usize
}
