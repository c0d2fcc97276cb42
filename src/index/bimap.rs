//! Bidirectional multimap
//!
//! Forward `L → {R}` and reverse `R → {L}` are written by the same
//! [`BiMultiMap::insert`] call, so a reverse lookup can never disagree with a
//! forward one. Maps are built once by the index builders and then only read.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Many-to-many relation with O(1) expected lookup in both directions
#[derive(Debug, Clone)]
pub struct BiMultiMap<L, R> {
    forward: HashMap<L, BTreeSet<R>>,
    reverse: HashMap<R, BTreeSet<L>>,
}

impl<L, R> Default for BiMultiMap<L, R> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }
}

impl<L, R> BiMultiMap<L, R>
where
    L: Hash + Eq + Ord + Clone,
    R: Hash + Eq + Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pair in both directions. Returns false if it was already present.
    pub(crate) fn insert(&mut self, left: L, right: R) -> bool {
        let added = self
            .forward
            .entry(left.clone())
            .or_default()
            .insert(right.clone());
        if added {
            self.reverse.entry(right).or_default().insert(left);
        }
        added
    }

    /// All right values related to `left`
    pub fn forward<Q>(&self, left: &Q) -> Option<&BTreeSet<R>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(left)
    }

    /// All left values related to `right`
    pub fn reverse<Q>(&self, right: &Q) -> Option<&BTreeSet<L>>
    where
        R: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.reverse.get(right)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, left: &L, right: &R) -> bool {
        self.forward
            .get(left)
            .map(|rights| rights.contains(right))
            .unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn lefts(&self) -> impl Iterator<Item = &L> {
        self.forward.keys()
    }

    /// Distinct right values
    pub fn rights(&self) -> impl Iterator<Item = &R> {
        self.reverse.keys()
    }

    pub fn left_count(&self) -> usize {
        self.forward.len()
    }

    pub fn right_count(&self) -> usize {
        self.reverse.len()
    }

    /// Number of distinct pairs
    pub fn len(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<L, R> FromIterator<(L, R)> for BiMultiMap<L, R>
where
    L: Hash + Eq + Ord + Clone,
    R: Hash + Eq + Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (left, right) in iter {
            map.insert(left, right);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BiMultiMap<u64, String> {
        [
            (1, "müller"),
            (2, "müller"),
            (2, "mueller"),
            (3, "schmidt"),
            (3, "schmidt"),
        ]
        .into_iter()
        .map(|(id, s)| (id, s.to_string()))
        .collect()
    }

    #[test]
    fn test_forward_and_reverse_agree() {
        let map = sample();
        for left in map.lefts() {
            for right in map.forward(left).unwrap() {
                assert!(map.reverse(right.as_str()).unwrap().contains(left));
            }
        }
        for right in map.rights() {
            for left in map.reverse(right).unwrap() {
                assert!(map.contains(left, right));
            }
        }
    }

    #[test]
    fn test_many_to_many() {
        let map = sample();
        let ids: Vec<u64> = map.reverse("müller").unwrap().iter().copied().collect();
        assert_eq!(ids, vec![1, 2]);

        let names: Vec<&str> = map.forward(&2).unwrap().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["mueller", "müller"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let map = sample();
        assert_eq!(map.len(), 4);
        assert_eq!(map.left_count(), 3);
        assert_eq!(map.right_count(), 3);
    }

    #[test]
    fn test_missing_keys() {
        let map = sample();
        assert!(map.forward(&42).is_none());
        assert!(map.reverse("bach").is_none());
        assert!(!map.contains(&1, &"schmidt".to_string()));
    }

    #[test]
    fn test_insert_reports_new_pairs() {
        let mut map: BiMultiMap<u64, String> = BiMultiMap::new();
        assert!(map.is_empty());
        assert!(map.insert(1, "bach".to_string()));
        assert!(!map.insert(1, "bach".to_string()));
        assert!(!map.is_empty());
    }
}
