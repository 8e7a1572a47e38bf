//! The cached collection behind every store.

use crate::error::ClientError;
use crate::types::{Item, ItemId, Note};

/// Entries a [`StoreState`] can find by id.
pub trait Keyed {
    fn key(&self) -> ItemId;
}

impl Keyed for Item {
    fn key(&self) -> ItemId {
        self.id
    }
}

impl Keyed for Note {
    fn key(&self) -> ItemId {
        self.uuid
    }
}

/// Last-fetched entries plus request bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub is_loading: bool,
    /// Set by the first successful fetch and only cleared by [`reset`](Self::reset).
    pub is_fetched: bool,
    /// Message of the most recent failure, cleared when a request succeeds.
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            is_loading: false,
            is_fetched: false,
            error: None,
        }
    }
}

impl<T: Keyed + Clone> StoreState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the empty, never-fetched state (e.g. on logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.items.iter().find(|e| e.key() == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut T> {
        self.items.iter_mut().find(|e| e.key() == id)
    }

    pub fn select(&mut self, entry: Option<T>) {
        self.selected = entry;
    }

    /// Swap in a freshly fetched collection.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.is_fetched = true;
    }

    pub fn prepend(&mut self, entry: T) {
        self.items.insert(0, entry);
    }

    /// Replace the entry with the same id in place, or prepend it when absent.
    /// A selected copy of the entry is refreshed too.
    pub fn upsert(&mut self, entry: T) {
        if self.selected.as_ref().is_some_and(|s| s.key() == entry.key()) {
            self.selected = Some(entry.clone());
        }
        match self.items.iter().position(|e| e.key() == entry.key()) {
            Some(idx) => self.items[idx] = entry,
            None => self.prepend(entry),
        }
    }

    pub fn remove(&mut self, id: ItemId) -> Option<T> {
        if self.selected.as_ref().is_some_and(|s| s.key() == id) {
            self.selected = None;
        }
        let idx = self.items.iter().position(|e| e.key() == id)?;
        Some(self.items.remove(idx))
    }

    pub(crate) fn begin(&mut self) {
        self.is_loading = true;
    }

    /// Close out a request: clear the loading flag and record or clear the
    /// error. The result is handed back unchanged.
    pub(crate) fn finish<R>(&mut self, result: Result<R, ClientError>) -> Result<R, ClientError> {
        self.is_loading = false;
        match &result {
            Ok(_) => self.error = None,
            Err(e) => {
                tracing::warn!(error = %e, "Store request failed");
                self.error = Some(e.to_string());
            }
        }
        result
    }
}
