//! The ordered list of confirmed place names.

use serde::Serialize;

/// Ordered sequence of user-confirmed place names.
///
/// Places are appended at the end and removed by index; entries are never
/// edited in place. Duplicates are allowed and carry no identity beyond
/// their position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlaceList {
    names: Vec<String>,
}

impl PlaceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a place, trimming surrounding whitespace.
    ///
    /// Returns `false` (and leaves the list unchanged) for blank names.
    pub fn push(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove the place at `index`, returning it if the index was valid.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.names.len()).then(|| self.names.remove(index))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PlaceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = PlaceList::new();
        for name in iter {
            list.push(name.as_ref());
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut places = PlaceList::new();
        assert!(places.push("Paris"));
        assert!(places.push("  Tokyo "));
        assert_eq!(places.as_slice(), ["Paris", "Tokyo"]);
    }

    #[test]
    fn push_rejects_blank() {
        let mut places = PlaceList::new();
        assert!(!places.push(""));
        assert!(!places.push("   \t"));
        assert!(places.is_empty());
    }

    #[test]
    fn duplicates_are_permitted() {
        let places: PlaceList = ["Rome", "Rome"].into_iter().collect();
        assert_eq!(places.len(), 2);
    }

    #[test]
    fn remove_by_index() {
        let mut places: PlaceList = ["A", "B", "C"].into_iter().collect();
        assert_eq!(places.remove(1), Some("B".to_string()));
        assert_eq!(places.as_slice(), ["A", "C"]);
        assert_eq!(places.remove(5), None);
        assert_eq!(places.len(), 2);
    }
}
