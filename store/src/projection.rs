use std::str::FromStr;

/// Records that take part in free-text search.
pub trait Searchable {
    /// The fixed set of fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    fn matches_term(&self, term: &str) -> bool {
        matches_search(term, &self.search_fields())
    }
}

/// A predicate over records of one domain. Every filter a view applies is
/// folded into a single `Criteria`, so the filters AND together.
pub trait Criteria<T> {
    fn matches(&self, record: &T) -> bool;
}

impl<T, F> Criteria<T> for F
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, record: &T) -> bool {
        self(record)
    }
}

/// Case-insensitive substring match of `term` against any of `fields`.
/// Only the empty term matches everything; whitespace is part of the term.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Stable filter: the matching records in their original container order.
pub fn project<'a, T, C>(records: &'a [T], criteria: &C) -> Vec<&'a T>
where
    C: Criteria<T> + ?Sized,
{
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// A categorical filter with an "all" sentinel that bypasses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter<V> {
    #[default]
    All,
    Only(V),
}

impl<V: PartialEq> Filter<V> {
    pub fn accepts(&self, value: &V) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl<V> From<Option<V>> for Filter<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(value) => Filter::Only(value),
            None => Filter::All,
        }
    }
}

impl<V: FromStr> FromStr for Filter<V> {
    type Err = V::Err;

    /// `"all"` in any case is the sentinel; anything else must parse as `V`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        V::from_str(s).map(Filter::Only)
    }
}
