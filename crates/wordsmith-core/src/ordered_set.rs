use indexmap::IndexSet;

/// Insertion-ordered set of strings.
///
/// Re-inserting an entry that is already present keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: IndexSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item`, returns false if it was already present
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        self.items.insert(item.into())
    }

    /// Fold a list into the set in order
    pub fn fold<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.insert(item);
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.fold(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_order() {
        let mut set = OrderedSet::new();
        set.fold(["b", "a", "b", "c", "a"]);
        assert_eq!(set.into_vec(), vec!["b", "a", "c"]);
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut set = OrderedSet::new();
        assert!(set.insert("dot"));
        assert!(!set.insert("dot"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn matching_is_exact() {
        let set: OrderedSet = ["Mark", "mark", "mark "].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains("Mark"));
        assert!(!set.contains("MARK"));
    }
}
