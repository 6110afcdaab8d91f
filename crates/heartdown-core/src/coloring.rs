//! Deterministic greedy coloring of the symbol graph.
//!
//! Symbols are processed in ascending degree order. Each symbol takes the
//! first already-introduced color that none of its neighbors uses; when every
//! introduced color is taken, the next color is drawn from the palette queue.
//! The queue is refilled from the start of the palette once exhausted, and
//! refilled colors belong to a new cycle so they never compare equal to
//! earlier draws.
//!
//! Degree ties are broken by graph insertion order (the sort is stable), which
//! makes the assignment reproducible for a given input document.

use std::collections::VecDeque;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    color::{Palette, SymbolColor},
    graph::SymbolGraph,
};

/// Greedy graph colorer.
///
/// A colorer owns its palette queue; it is consumed by [`GraphColorer::color`]
/// so that every run starts from a full palette.
///
/// # Examples
///
/// ```
/// use heartdown_core::{coloring::GraphColorer, graph::SymbolGraph};
///
/// let mut graph = SymbolGraph::new();
/// graph.add_edge("a", "b");
///
/// let coloring = GraphColorer::default().color(&graph);
/// assert_eq!(coloring.get("a").unwrap().name(), "red");
/// assert_eq!(coloring.get("b").unwrap().name(), "YellowGreen");
/// ```
#[derive(Debug, Clone)]
pub struct GraphColorer {
    palette: Palette,
    queue: VecDeque<SymbolColor>,
    cycle: usize,
    introduced: Vec<SymbolColor>,
}

impl GraphColorer {
    /// Creates a colorer drawing from `palette`.
    pub fn new(palette: Palette) -> Self {
        let queue = palette.cycle(0).collect();
        Self {
            palette,
            queue,
            cycle: 0,
            introduced: Vec::new(),
        }
    }

    /// Colors every node of `graph`.
    ///
    /// Every node receives a color and no two adjacent nodes share one.
    pub fn color(mut self, graph: &SymbolGraph) -> Coloring {
        let mut order: Vec<&str> = graph.nodes().map(|node| node.name()).collect();
        order.sort_by_key(|name| graph.node(name).map_or(0, |node| node.degree()));
        trace!(order:?; "Coloring order");

        let mut colors: IndexMap<String, SymbolColor> = IndexMap::with_capacity(order.len());
        for name in order {
            let taken: Vec<&SymbolColor> = graph
                .node(name)
                .into_iter()
                .flat_map(|node| node.neighbors())
                .filter_map(|neighbor| colors.get(neighbor))
                .collect();

            let color = match self
                .introduced
                .iter()
                .find(|candidate| !taken.contains(candidate))
            {
                Some(color) => color.clone(),
                None => self.draw(),
            };

            colors.insert(name.to_string(), color);
        }

        debug!(
            symbols = colors.len(),
            colors = self.introduced.len();
            "Symbol graph colored"
        );

        Coloring { colors }
    }

    /// Takes the next color from the queue and marks it as introduced.
    fn draw(&mut self) -> SymbolColor {
        loop {
            if let Some(color) = self.queue.pop_front() {
                self.introduced.push(color.clone());
                return color;
            }
            // Palettes are never empty, so one refill suffices.
            self.cycle += 1;
            self.queue.extend(self.palette.cycle(self.cycle));
        }
    }
}

impl Default for GraphColorer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

/// The result of coloring a [`SymbolGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coloring {
    colors: IndexMap<String, SymbolColor>,
}

impl Coloring {
    /// Returns the color of `name`, if it was colored.
    pub fn get(&self, name: &str) -> Option<&SymbolColor> {
        self.colors.get(name)
    }

    /// Returns every `(symbol, color)` pair in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolColor)> {
        self.colors.iter().map(|(name, color)| (name.as_str(), color))
    }

    /// Returns the number of colored symbols.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if nothing was colored.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the number of distinct colors used.
    pub fn distinct_colors(&self) -> usize {
        let mut seen: Vec<&SymbolColor> = Vec::new();
        for color in self.colors.values() {
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        seen.len()
    }

    /// Returns `true` if no edge of `graph` joins two equally colored nodes.
    pub fn is_proper(&self, graph: &SymbolGraph) -> bool {
        graph
            .edges()
            .all(|(a, b)| match (self.get(a), self.get(b)) {
                (Some(color_a), Some(color_b)) => color_a != color_b,
                _ => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn complete_graph(size: usize) -> SymbolGraph {
        let names: Vec<String> = (0..size).map(|index| format!("s{index}")).collect();
        let mut graph = SymbolGraph::new();
        graph.add_clique(&names);
        graph
    }

    #[test]
    fn test_two_adjacent_symbols_take_first_two_colors() {
        let mut graph = SymbolGraph::new();
        graph.add_clique(&["a", "b"]);

        let coloring = GraphColorer::default().color(&graph);

        assert_eq!(coloring.get("a").unwrap().to_css(), "red");
        assert_eq!(coloring.get("b").unwrap().to_css(), "YellowGreen");
    }

    #[test]
    fn test_isolated_symbols_share_first_color() {
        let mut graph = SymbolGraph::new();
        graph.add_node("a");
        graph.add_node("b");

        let coloring = GraphColorer::default().color(&graph);

        assert_eq!(coloring.get("a").unwrap().name(), "red");
        assert_eq!(coloring.get("b").unwrap().name(), "red");
        assert_eq!(coloring.distinct_colors(), 1);
    }

    #[test]
    fn test_empty_graph() {
        let coloring = GraphColorer::default().color(&SymbolGraph::new());
        assert!(coloring.is_empty());
    }

    #[test]
    fn test_palette_recycles_for_complete_graph() {
        let graph = complete_graph(11);

        let coloring = GraphColorer::default().color(&graph);

        assert_eq!(coloring.len(), 11);
        assert_eq!(coloring.distinct_colors(), 11);
        assert!(coloring.is_proper(&graph));

        let eleventh = coloring.get("s10").unwrap();
        assert_eq!(eleventh.name(), "red");
        assert_eq!(eleventh.cycle(), 1);
    }

    #[test]
    fn test_low_degree_symbols_are_colored_first() {
        // `hub` touches everything, the leaves only touch `hub`.
        let mut graph = SymbolGraph::new();
        graph.add_edge("hub", "x");
        graph.add_edge("hub", "y");
        graph.add_edge("hub", "z");

        let coloring = GraphColorer::default().color(&graph);

        for leaf in ["x", "y", "z"] {
            assert_eq!(coloring.get(leaf).unwrap().name(), "red");
        }
        assert_eq!(coloring.get("hub").unwrap().name(), "YellowGreen");
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let mut graph = SymbolGraph::new();
        graph.add_edge("b", "a");

        let order: Vec<_> = GraphColorer::default()
            .color(&graph)
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette::new(["black", "white"]).unwrap();
        let graph = complete_graph(3);

        let coloring = GraphColorer::new(palette).color(&graph);

        assert!(coloring.is_proper(&graph));
        assert_eq!(coloring.get("s2").unwrap().name(), "black");
        assert_eq!(coloring.get("s2").unwrap().cycle(), 1);
    }

    proptest! {
        #[test]
        fn prop_coloring_is_proper(
            edges in prop::collection::vec((0usize..12, 0usize..12), 0..60)
        ) {
            let mut graph = SymbolGraph::new();
            for (a, b) in &edges {
                graph.add_edge(&format!("n{a}"), &format!("n{b}"));
            }

            let coloring = GraphColorer::default().color(&graph);

            prop_assert_eq!(coloring.len(), graph.len());
            prop_assert!(coloring.is_proper(&graph));
        }

        #[test]
        fn prop_coloring_is_deterministic(
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..30)
        ) {
            let mut graph = SymbolGraph::new();
            for (a, b) in &edges {
                graph.add_edge(&format!("n{a}"), &format!("n{b}"));
            }

            let first = GraphColorer::default().color(&graph);
            let second = GraphColorer::default().color(&graph);
            prop_assert_eq!(first, second);
        }
    }
}
