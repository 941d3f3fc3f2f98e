//! Generic in-memory state containers: an entity store per domain, the
//! filtered projections derived from it and the record currently selected
//! for inspection.

pub mod entity;
pub mod projection;
pub mod selection;

pub use entity::{generate_id, Entity, EntityStore, InsertOrder};
pub use projection::{matches_search, project, Criteria, Filter, Searchable};
pub use selection::Selection;
