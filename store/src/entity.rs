use uuid::Uuid;

use crate::projection::{project, Criteria};
use crate::selection::Selection;

/// A record owned by an [`EntityStore`].
///
/// `Draft` is the record without its identity, as handed to `add`. `Patch`
/// holds optional fields and is merged field by field by `apply`.
pub trait Entity {
    type Draft;
    type Patch;

    fn id(&self) -> &str;

    fn from_draft(id: String, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

/// Where `add` places new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrder {
    Append,
    /// Most recent first, used by event channels.
    Prepend,
}

/// Returns a fresh record identity.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// The authoritative container for one domain's records, together with the
/// selection that points into it.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    records: Vec<T>,
    order: InsertOrder,
    selection: Selection,
}

impl<T: Entity> EntityStore<T> {
    pub fn new(order: InsertOrder) -> Self {
        Self::seeded(Vec::new(), order)
    }

    /// Initializes the store from a fixed list of sample records.
    pub fn seeded(records: Vec<T>, order: InsertOrder) -> Self {
        EntityStore {
            records,
            order,
            selection: Selection::new(),
        }
    }

    /// Generates an id for the draft, stores the record and returns it.
    pub fn add(&mut self, draft: T::Draft) -> &T {
        let record = T::from_draft(generate_id(), draft);
        let index = match self.order {
            InsertOrder::Append => {
                self.records.push(record);
                self.records.len() - 1
            }
            InsertOrder::Prepend => {
                self.records.insert(0, record);
                0
            }
        };
        &self.records[index]
    }

    /// Merges `patch` into the record with the given id.
    ///
    /// Unknown ids are ignored; callers update optimistically and rely on
    /// this being a silent no-op. Returns whether a record was touched.
    pub fn update(&mut self, id: &str, patch: T::Patch) -> bool {
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => {
                record.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Runs `change` against the record with the given id. Same not-found
    /// contract as [`EntityStore::update`].
    pub fn modify<F>(&mut self, id: &str, change: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => {
                change(record);
                true
            }
            None => false,
        }
    }

    /// Applies `change` to every record and returns how many there were.
    pub fn modify_all<F>(&mut self, mut change: F) -> usize
    where
        F: FnMut(&mut T),
    {
        self.records.iter_mut().for_each(&mut change);
        self.records.len()
    }

    /// Removes the record with the given id, clearing the selection when it
    /// pointed at it.
    pub fn delete(&mut self, id: &str) -> Option<T> {
        let position = self.records.iter().position(|record| record.id() == id)?;
        if self.selection.is_selected(id) {
            self.selection.clear();
        }
        Some(self.records.remove(position))
    }

    /// Keeps only the records matching `keep`. Returns how many were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.records.len();
        let selection = &mut self.selection;
        self.records.retain(|record| {
            let kept = keep(record);
            if !kept && selection.is_selected(record.id()) {
                selection.clear();
            }
            kept
        });
        before - self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.selection.clear();
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stable filter over the current contents. Recomputed on every call.
    pub fn project<C>(&self, criteria: &C) -> Vec<&T>
    where
        C: Criteria<T> + ?Sized,
    {
        project(&self.records, criteria)
    }

    /// Selects the record with the given id. Unknown ids leave the current
    /// selection untouched and return `false`.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection.select(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Resolves the selection against the live contents.
    pub fn selected(&self) -> Option<&T> {
        self.selection.selected_id().and_then(|id| self.get(id))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}
