//! Undirected symbol co-occurrence graph.
//!
//! The graph has one [`SymNode`] per symbol name. Two symbols are adjacent
//! when a single expression references both of them. Node and neighbor
//! iteration follow insertion order so that everything derived from the graph
//! (coloring in particular) is deterministic.
//!
//! This is a lightweight adjacency structure rather than a general graph
//! library: the only operations needed are clique insertion, neighbor lookup,
//! and degree queries.

use indexmap::{IndexMap, IndexSet, map::Entry};

/// A vertex of the [`SymbolGraph`].
///
/// Invariants:
/// - a node is never its own neighbor;
/// - adding an existing neighbor is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymNode {
    name: String,
    neighbors: IndexSet<String>,
}

impl SymNode {
    /// Creates an isolated node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            neighbors: IndexSet::new(),
        }
    }

    /// Returns the symbol name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the neighbor names in the order they were first added.
    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        self.neighbors.iter().map(String::as_str)
    }

    /// Returns the number of distinct neighbors.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if `name` is a neighbor of this node.
    pub fn is_adjacent(&self, name: &str) -> bool {
        self.neighbors.contains(name)
    }

    /// Adds every name in `names` as a neighbor, skipping the node itself and
    /// names that are already neighbors.
    ///
    /// Returns the number of neighbors actually added.
    pub fn add_neighbors<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> usize {
        let before = self.neighbors.len();
        for name in names {
            if name != self.name && !self.neighbors.contains(name) {
                self.neighbors.insert(name.to_string());
            }
        }
        self.neighbors.len() - before
    }
}

/// Undirected graph keyed by symbol name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolGraph {
    nodes: IndexMap<String, SymNode>,
}

impl SymbolGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an isolated node if `name` is not present yet.
    ///
    /// Returns the node for `name`.
    pub fn add_node(&mut self, name: &str) -> &mut SymNode {
        match self.nodes.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(SymNode::new(name)),
        }
    }

    /// Makes every pair of `names` mutually adjacent.
    ///
    /// Missing nodes are created. A single name only ensures the node exists.
    pub fn add_clique<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let node = self.add_node(name.as_ref());
            node.add_neighbors(names.iter().map(|name| name.as_ref()));
        }
    }

    /// Adds a single undirected edge between `a` and `b`.
    pub fn add_edge(&mut self, a: &str, b: &str) {
        self.add_clique(&[a, b]);
    }

    /// Returns the node for `name`, if present.
    pub fn node(&self, name: &str) -> Option<&SymNode> {
        self.nodes.get(name)
    }

    /// Returns all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &SymNode> {
        self.nodes.values()
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `a` and `b` are adjacent.
    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.node(a).is_some_and(|node| node.is_adjacent(b))
    }

    /// Returns each undirected edge once, as `(earlier, later)` in node
    /// insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().enumerate().flat_map(move |(index, (name, node))| {
            node.neighbors().filter_map(move |neighbor| {
                let neighbor_index = self.nodes.get_index_of(neighbor)?;
                (neighbor_index > index).then_some((name.as_str(), neighbor))
            })
        })
    }
}
