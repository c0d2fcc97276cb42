//! Fuzzy candidate vocabulary
//!
//! The thesaurus holds every normalized heading and alias string of the
//! authority set, deduplicated, in a [`PrefixTrie`]. Bounded Levenshtein
//! search walks the trie depth-first with an explicit stack, computing one
//! dynamic-programming row per node; shared prefixes share rows, and a
//! subtree is skipped as soon as the smallest value in its row exceeds the
//! distance bound. Rows are limited to the diagonal band the bound allows.

use serde::{Deserialize, Serialize};

use crate::index::{NodeId, PrefixTrie};

/// A vocabulary term within the distance bound of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    pub term: String,
    pub distance: usize,
}

/// Deduplicated set of normalized candidate strings
#[derive(Debug, Clone, Default)]
pub struct Thesaurus {
    terms: PrefixTrie<()>,
}

impl Thesaurus {
    pub fn build<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = PrefixTrie::new();
        for term in terms {
            let term = term.as_ref();
            if !term.is_empty() {
                trie.insert(term, ());
            }
        }
        Self { terms: trie }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.terms.node_count()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.get(term).is_some()
    }

    /// All terms in lexicographic order
    pub fn terms(&self) -> Vec<String> {
        self.terms.keys()
    }

    /// Every term within `max_distance` edits of `query`, ranked.
    ///
    /// Ranking: ascending distance, then descending Jaro-Winkler similarity
    /// to the query, then lexicographic.
    pub fn within_distance(&self, query: &str, max_distance: usize) -> Vec<FuzzyMatch> {
        let mut found = self.search(query, max_distance, false);
        rank(query, &mut found);
        found
    }

    /// Only the terms at the smallest distance found within `max_distance`.
    ///
    /// The bound tightens as closer terms are found, so this visits fewer
    /// nodes than [`Thesaurus::within_distance`].
    pub fn nearest(&self, query: &str, max_distance: usize) -> Vec<FuzzyMatch> {
        let mut found = self.search(query, max_distance, true);
        if let Some(best) = found.iter().map(|m| m.distance).min() {
            found.retain(|m| m.distance == best);
        }
        rank(query, &mut found);
        found
    }

    fn search(&self, query: &str, max_distance: usize, tighten: bool) -> Vec<FuzzyMatch> {
        let query: Vec<char> = query.chars().collect();
        let band = Band::new(query.len(), max_distance);
        let mut bound = max_distance;
        let mut found = Vec::new();

        // One banded row per depth of the current path, flattened
        let mut rows = band.first_row();
        let mut path: Vec<char> = Vec::new();
        let mut stack: Vec<(NodeId, char, usize)> = self
            .terms
            .children(self.terms.root())
            .rev()
            .map(|(c, child)| (child, c, 1))
            .collect();

        while let Some((node, c, depth)) = stack.pop() {
            path.truncate(depth - 1);
            path.push(c);
            rows.truncate(depth * band.width);
            band.push_row(&mut rows, depth, c, &query);

            let row = &rows[depth * band.width..];
            let distance = band.distance(row, depth);
            if distance <= bound && self.terms.value(node).is_some() {
                found.push(FuzzyMatch {
                    term: path.iter().collect(),
                    distance,
                });
                if tighten {
                    bound = distance;
                }
            }

            if row.iter().any(|&cell| cell <= bound) {
                stack.extend(
                    self.terms
                        .children(node)
                        .rev()
                        .map(|(next, child)| (child, next, depth + 1)),
                );
            }
        }

        found
    }
}

/// Diagonal band of the edit-distance matrix.
///
/// Cells further than `max` from the diagonal always exceed `max`, so each
/// row keeps only `2 * max + 1` cells. Values are capped at `max + 1`.
struct Band {
    query_len: usize,
    max: usize,
    width: usize,
    cap: usize,
}

impl Band {
    fn new(query_len: usize, max: usize) -> Self {
        Self {
            query_len,
            max,
            width: 2 * max + 1,
            cap: max + 1,
        }
    }

    /// Query position of slot `k` in the row at `depth`
    fn position(&self, depth: usize, k: usize) -> Option<usize> {
        let i = (depth + k).checked_sub(self.max)?;
        (i <= self.query_len).then_some(i)
    }

    fn first_row(&self) -> Vec<usize> {
        (0..self.width)
            .map(|k| self.position(0, k).map_or(self.cap, |i| i.min(self.cap)))
            .collect()
    }

    /// Append the row for trie edge `c` at `depth`, computed from the row at `depth - 1`
    fn push_row(&self, rows: &mut Vec<usize>, depth: usize, c: char, query: &[char]) {
        let previous = (depth - 1) * self.width;
        let current = depth * self.width;
        for k in 0..self.width {
            let cell = match self.position(depth, k) {
                None => self.cap,
                Some(0) => depth.min(self.cap),
                Some(i) => {
                    let delete = if k + 1 < self.width {
                        rows[previous + k + 1] + 1
                    } else {
                        self.cap
                    };
                    let insert = if k > 0 {
                        rows[current + k - 1] + 1
                    } else {
                        self.cap
                    };
                    let replace = rows[previous + k] + usize::from(query[i - 1] != c);
                    delete.min(insert).min(replace).min(self.cap)
                }
            };
            rows.push(cell);
        }
    }

    /// Distance between the query and the path ending at `depth`
    fn distance(&self, row: &[usize], depth: usize) -> usize {
        (self.query_len + self.max)
            .checked_sub(depth)
            .and_then(|k| row.get(k))
            .copied()
            .unwrap_or(self.cap)
    }
}

fn rank(query: &str, matches: &mut [FuzzyMatch]) {
    matches.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| {
                let sim_a = strsim::jaro_winkler(query, &a.term);
                let sim_b = strsim::jaro_winkler(query, &b.term);
                sim_b.total_cmp(&sim_a)
            })
            .then_with(|| a.term.cmp(&b.term))
    });
}

/// Classic Levenshtein distance over chars (insert, delete, substitute; unit cost)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let replace = previous[j] + usize::from(ca != *cb);
            current[j + 1] = (previous[j + 1] + 1).min(current[j] + 1).min(replace);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
