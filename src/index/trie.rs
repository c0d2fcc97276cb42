//! Character trie with longest-stored-prefix lookup
//!
//! Unlike an autocomplete trie (which enumerates completions of a prefix),
//! the main query here walks the *query* downwards and reports the deepest
//! stored key that is a prefix of it:
//!
//! ```text
//! stored: "bach", "bach, johann"
//! query:  "bach, johann sebastian"
//!          ^^^^               -> "bach" is a stored prefix
//!          ^^^^^^^^^^^^       -> "bach, johann" is deeper, wins
//! ```
//!
//! Nodes live in an arena; child edges are kept sorted in a `SmallVec` since
//! most nodes of a name vocabulary have one or two children.

use smallvec::SmallVec;

/// Handle to a node of a [`PrefixTrie`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
struct Node<V> {
    children: SmallVec<[(char, NodeId); 4]>,
    value: Option<V>,
}

impl<V> Node<V> {
    fn empty() -> Self {
        Self {
            children: SmallVec::new(),
            value: None,
        }
    }

    fn child(&self, c: char) -> Option<NodeId> {
        self.children
            .binary_search_by(|(edge, _)| edge.cmp(&c))
            .ok()
            .map(|idx| self.children[idx].1)
    }
}

/// Result of [`PrefixTrie::longest_prefix_match`]
#[derive(Debug, PartialEq)]
pub struct PrefixMatch<'a, V> {
    /// Length in chars of the stored key that matched
    pub key_len: usize,
    pub value: &'a V,
}

impl<V> Clone for PrefixMatch<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for PrefixMatch<'_, V> {}

/// Generic char-keyed trie
#[derive(Debug, Clone)]
pub struct PrefixTrie<V> {
    nodes: Vec<Node<V>>,
    len: usize,
}

impl<V> Default for PrefixTrie<V> {
    fn default() -> Self {
        Self {
            nodes: vec![Node::empty()],
            len: 0,
        }
    }
}

impl<V> PrefixTrie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Store `value` under `key`, returning the previous value
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let node = self.walk_or_create(key);
        let previous = self.nodes[node.0].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Mutable access to the value under `key`, created with `V::default()` if absent
    pub fn entry(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        let node = self.walk_or_create(key);
        let slot = &mut self.nodes[node.0].value;
        if slot.is_none() {
            self.len += 1;
        }
        slot.get_or_insert_with(V::default)
    }

    /// Exact lookup
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = ROOT;
        for c in key.chars() {
            node = self.nodes[node.0].child(c)?;
        }
        self.nodes[node.0].value.as_ref()
    }

    /// Deepest stored key that is a prefix of `query`.
    ///
    /// When several stored keys are prefixes of the query, the longest one
    /// is returned, never a shorter one.
    pub fn longest_prefix_match(&self, query: &str) -> Option<PrefixMatch<'_, V>> {
        let mut best = self.nodes[ROOT.0]
            .value
            .as_ref()
            .map(|value| PrefixMatch { key_len: 0, value });

        let mut node = ROOT;
        for (depth, c) in query.chars().enumerate() {
            let Some(next) = self.nodes[node.0].child(c) else {
                break;
            };
            node = next;
            if let Some(value) = self.nodes[node.0].value.as_ref() {
                best = Some(PrefixMatch {
                    key_len: depth + 1,
                    value,
                });
            }
        }

        best
    }

    /// All stored keys in lexicographic (char) order
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len);
        if self.nodes[ROOT.0].value.is_some() {
            keys.push(String::new());
        }

        let mut path: Vec<char> = Vec::new();
        let mut stack: Vec<(NodeId, char, usize)> =
            self.children(ROOT).rev().map(|(c, child)| (child, c, 1)).collect();
        while let Some((node, c, depth)) = stack.pop() {
            path.truncate(depth - 1);
            path.push(c);
            if self.nodes[node.0].value.is_some() {
                keys.push(path.iter().collect());
            }
            stack.extend(
                self.children(node)
                    .rev()
                    .map(|(next, child)| (child, next, depth + 1)),
            );
        }
        keys
    }

    // Read-only traversal, used by the thesaurus' Levenshtein walk

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Outgoing edges of `node`, sorted by char
    pub fn children(
        &self,
        node: NodeId,
    ) -> impl DoubleEndedIterator<Item = (char, NodeId)> + '_ {
        self.nodes[node.0].children.iter().copied()
    }

    /// Value stored at `node`, if a key ends there
    pub fn value(&self, node: NodeId) -> Option<&V> {
        self.nodes[node.0].value.as_ref()
    }

    fn walk_or_create(&mut self, key: &str) -> NodeId {
        let mut node = ROOT;
        for c in key.chars() {
            node = match self.nodes[node.0].child(c) {
                Some(next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(Node::empty());
                    let children = &mut self.nodes[node.0].children;
                    let pos = children.partition_point(|(edge, _)| *edge < c);
                    children.insert(pos, (c, next));
                    next
                }
            };
        }
        node
    }
}
