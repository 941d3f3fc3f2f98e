/// Tracks the record currently chosen for detailed display.
///
/// Only the id is kept. The owning store resolves it on every read, so the
/// details view always reflects the latest mutations and a deleted record
/// simply resolves to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    id: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self { id: None }
    }

    pub fn select(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    pub fn clear(&mut self) {
        self.id = None;
    }

    /// If the provided id is already selected, it will be deselected.
    /// Otherwise, it will be selected.
    pub fn toggle(&mut self, id: &str) {
        if self.is_selected(id) {
            self.id = None;
        } else {
            self.id = Some(id.to_string());
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }
}
