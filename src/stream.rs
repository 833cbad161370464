use std::collections::HashSet;
use tracing::debug;

/// Ordered, duplicate-free candidates. The first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, candidate: String) -> bool {
        if self.seen.contains(&candidate) {
            return false;
        }
        self.seen.insert(candidate.clone());
        self.items.push(candidate);
        true
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.seen.contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl IntoIterator for CandidateSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Drops repeated candidates and stops after `limit` distinct ones.
pub struct Dedup<I> {
    inner: I,
    seen: HashSet<String>,
    limit: Option<usize>,
    emitted: usize,
}

impl<I> Dedup<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(inner: I, limit: Option<usize>) -> Self {
        Dedup {
            inner,
            seen: HashSet::new(),
            limit,
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn bound_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.emitted >= limit)
    }
}

impl<I> Iterator for Dedup<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.bound_reached() {
            return None;
        }

        for candidate in self.inner.by_ref() {
            if self.seen.insert(candidate.clone()) {
                self.emitted += 1;
                if self.limit == Some(self.emitted) {
                    debug!(limit = self.emitted, "candidate bound reached");
                }
                return Some(candidate);
            }
        }
        None
    }
}

pub fn dedup_bounded<I>(candidates: I, limit: Option<usize>) -> Dedup<I::IntoIter>
where
    I: IntoIterator<Item = String>,
{
    Dedup::new(candidates.into_iter(), limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_occurrence_kept() {
        let out: Vec<String> = dedup_bounded(strings(&["a", "b", "a", "c", "b"]), None).collect();
        assert_eq!(out, ["a", "b", "c"]);
    }

    #[test]
    fn test_bound_respected() {
        let out: Vec<String> =
            dedup_bounded(strings(&["a", "a", "b", "c", "d"]), Some(2)).collect();
        assert_eq!(out, ["a", "b"]);
    }

    #[test]
    fn test_bound_stops_pulling() {
        let mut pulled = 0;
        let source = (0..).map(|i| {
            pulled += 1;
            i.to_string()
        });
        let out: Vec<String> = dedup_bounded(source, Some(3)).collect();
        assert_eq!(out, ["0", "1", "2"]);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn test_zero_bound_is_empty() {
        assert_eq!(dedup_bounded(strings(&["a"]), Some(0)).count(), 0);
    }

    #[test]
    fn test_exhaustion_below_bound() {
        let mut stream = dedup_bounded(strings(&["x", "x", "y"]), Some(10));
        assert_eq!(stream.by_ref().count(), 2);
        assert_eq!(stream.emitted(), 2);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_candidate_set() {
        let mut set = CandidateSet::new();
        assert!(set.insert("john".to_string()));
        assert!(set.insert("John".to_string()));
        assert!(!set.insert("john".to_string()));

        assert_eq!(set.len(), 2);
        assert!(set.contains("John"));
        assert!(!set.contains("JOHN"));
        assert_eq!(set.as_slice(), ["john", "John"]);
        assert_eq!(set.into_vec(), ["john", "John"]);
    }
}
