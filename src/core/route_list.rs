use crate::domain::model::{Cep, Entry};
use std::fmt;

/// Mutation notifications emitted after the list changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    Appended { index: usize },
    Removed { index: usize },
    Moved { from: usize, to: usize },
    Cleared,
}

type Listener = Box<dyn FnMut(&ListChange, &[Entry]) + Send + Sync>;

/// Ordered collection of entries in the user's visiting order.
///
/// No two entries share a CEP. Insertion order is the only ordering; it
/// changes only through `move_up`/`move_down`.
#[derive(Default)]
pub struct RouteList {
    entries: Vec<Entry>,
    listeners: Vec<Listener>,
}

impl RouteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ListChange, &[Entry]) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, cep: &Cep) -> bool {
        self.position(cep).is_some()
    }

    fn position(&self, cep: &Cep) -> Option<usize> {
        self.entries.iter().position(|e| e.cep() == cep)
    }

    /// Appends at the end. Refuses a CEP that is already present and hands
    /// the entry back.
    pub fn append(&mut self, entry: Entry) -> Result<(), Entry> {
        if self.contains(entry.cep()) {
            return Err(entry);
        }
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        self.notify(ListChange::Appended { index });
        Ok(())
    }

    pub fn remove(&mut self, cep: &Cep) -> Option<Entry> {
        let index = self.position(cep)?;
        let removed = self.entries.remove(index);
        self.notify(ListChange::Removed { index });
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.notify(ListChange::Cleared);
    }

    /// Swaps with the previous neighbour. Returns whether anything moved.
    pub fn move_up(&mut self, cep: &Cep) -> bool {
        match self.position(cep) {
            Some(index) if index > 0 => {
                self.entries.swap(index, index - 1);
                self.notify(ListChange::Moved {
                    from: index,
                    to: index - 1,
                });
                true
            }
            _ => false,
        }
    }

    /// Swaps with the next neighbour. Returns whether anything moved.
    pub fn move_down(&mut self, cep: &Cep) -> bool {
        match self.position(cep) {
            Some(index) if index + 1 < self.entries.len() => {
                self.entries.swap(index, index + 1);
                self.notify(ListChange::Moved {
                    from: index,
                    to: index + 1,
                });
                true
            }
            _ => false,
        }
    }

    /// Copy of the entries that can be plotted, in current order.
    pub fn snapshot_with_coordinates(&self) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.has_coordinates())
            .cloned()
            .collect()
    }

    fn notify(&mut self, change: ListChange) {
        for listener in self.listeners.iter_mut() {
            listener(&change, &self.entries);
        }
    }
}

impl fmt::Debug for RouteList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteList")
            .field("entries", &self.entries)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
