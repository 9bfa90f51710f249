//! Dependency ordering for catalog objects
//!
//! A [`Graph`] is built per sort from `(from, to)` edges meaning "`from` must
//! be created before `to`", then consumed by Kahn's algorithm. The graph knows
//! nothing about object kinds; callers supply oids and edges.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;

use crate::error::{Error, Result};
use crate::relation::Oid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Oid>,
    /// Outgoing edges per source. A source with no remaining edges has no entry.
    pub edges: HashMap<Oid, Vec<Oid>>,
    /// Number of remaining edges whose target is the key
    pub incoming_edges: HashMap<Oid, usize>,
}

impl Graph {
    /// Builds a graph from `nodes` and `(from, to)` dependency edges.
    pub fn new(nodes: Vec<Oid>, dependencies: &[(Oid, Oid)]) -> Self {
        let mut graph = Graph {
            nodes,
            ..Default::default()
        };
        for &(from, to) in dependencies {
            graph.add_edge(from, to);
        }
        graph
    }

    pub fn add_edge(&mut self, from: Oid, to: Oid) {
        self.edges.entry(from).or_default().push(to);
        *self.incoming_edges.entry(to).or_insert(0) += 1;
    }

    /// Removes the edge at `idx` in `from`'s adjacency list by swapping it to
    /// the end and truncating. Order within the list is not preserved.
    /// Returns the target of the removed edge.
    pub fn remove_edge(&mut self, from: Oid, idx: usize) -> Option<Oid> {
        let targets = self.edges.get_mut(&from)?;
        if idx >= targets.len() {
            return None;
        }
        let to = targets.swap_remove(idx);
        if targets.is_empty() {
            self.edges.remove(&from);
        }
        if let Some(count) = self.incoming_edges.get_mut(&to) {
            *count = count.saturating_sub(1);
        }
        Some(to)
    }

    fn incoming(&self, oid: Oid) -> usize {
        self.incoming_edges.get(&oid).copied().unwrap_or(0)
    }

    /// Kahn's algorithm. Returns the order and whether every edge was
    /// consumed; on `false` the order is partial and must not be used.
    ///
    /// Nodes without incoming edges are taken in their `nodes` order; nodes
    /// released by the same source are queued in that source's edge order.
    pub fn topo_sort(&mut self) -> (Vec<Oid>, bool) {
        let mut sorted = Vec::with_capacity(self.nodes.len());
        let mut frontier: VecDeque<Oid> = self
            .nodes
            .iter()
            .copied()
            .filter(|&oid| self.incoming(oid) == 0)
            .collect();

        while let Some(from) = frontier.pop_front() {
            sorted.push(from);

            // Popping from the back keeps each removal O(1).
            let degree = self.edges.get(&from).map_or(0, Vec::len);
            let mut released = Vec::new();
            for idx in (0..degree).rev() {
                if let Some(to) = self.remove_edge(from, idx) {
                    if self.incoming(to) == 0 {
                        released.push(to);
                    }
                }
            }
            frontier.extend(released.into_iter().rev());
        }

        let complete = self.edges.is_empty();
        (sorted, complete)
    }

    /// Like [`Graph::topo_sort`] but reports a cycle as an error.
    pub fn into_sorted(mut self) -> Result<Vec<Oid>> {
        let (sorted, complete) = self.topo_sort();
        if complete {
            Ok(sorted)
        } else {
            let remaining = self.edges.values().map(Vec::len).sum();
            warn!("Dependency sort left {} unresolved edges", remaining);
            Err(Error::DependencyCycle { remaining })
        }
    }
}

/// Orders `objects` so that for every `(from, to)` edge the object with oid
/// `from` precedes the one with oid `to`. Unrelated objects keep their input
/// order.
///
/// Edges may name oids outside `objects` (a view depending on a table). Those
/// oids join the graph as extra nodes so that ordering still flows through
/// them, and are dropped from the result.
pub fn sort_objects<T, F>(
    objects: Vec<T>,
    dependencies: &[(Oid, Oid)],
    oid_of: F,
) -> Result<Vec<T>>
where
    F: Fn(&T) -> Oid,
{
    let mut nodes: Vec<Oid> = objects.iter().map(&oid_of).collect();
    let mut known: HashSet<Oid> = nodes.iter().copied().collect();
    for &(from, to) in dependencies {
        for oid in [from, to] {
            if known.insert(oid) {
                nodes.push(oid);
            }
        }
    }
    let order = Graph::new(nodes, dependencies).into_sorted()?;

    let mut by_oid: HashMap<Oid, T> =
        objects.into_iter().map(|obj| (oid_of(&obj), obj)).collect();
    Ok(order.into_iter().filter_map(|oid| by_oid.remove(&oid)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use proptest::prelude::*;

    #[test]
    fn test_basic_sort() {
        let mut graph = Graph {
            nodes: vec![1, 2],
            edges: hashmap! {1 => vec![2]},
            incoming_edges: hashmap! {1 => 0, 2 => 1},
        };
        assert_eq!(graph.topo_sort(), (vec![1, 2], true));
    }

    #[test]
    fn test_sort_with_cycle() {
        let mut graph = Graph::new(vec![1, 2], &[(1, 2), (2, 1)]);
        assert_eq!(graph.incoming_edges, hashmap! {1 => 1, 2 => 1});
        let (sorted, complete) = graph.topo_sort();
        assert!(!complete);
        assert!(sorted.is_empty());

        let result = Graph::new(vec![1, 2], &[(1, 2), (2, 1)]).into_sorted();
        assert!(matches!(result, Err(Error::DependencyCycle { remaining: 2 })));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = Graph::new(vec![1, 2, 3], &[(1, 2), (2, 3)]);
        assert_eq!(graph.remove_edge(1, 0), Some(2));
        assert!(!graph.edges.contains_key(&1));
        assert_eq!(graph.incoming_edges[&2], 0);
        assert_eq!(graph.edges[&2], vec![3]);
        assert_eq!(graph.remove_edge(1, 0), None);
        assert_eq!(graph.remove_edge(2, 5), None);
    }

    #[test]
    fn test_remove_edge_swaps_with_last() {
        let mut graph = Graph::new(vec![1, 2, 3, 4], &[(1, 2), (1, 3), (1, 4)]);
        assert_eq!(graph.remove_edge(1, 0), Some(2));
        assert_eq!(graph.edges[&1], vec![4, 3]);
        assert_eq!(graph.incoming_edges[&2], 0);
        assert_eq!(graph.incoming_edges[&3], 1);
    }

    #[test]
    fn test_high_fan_out() {
        let mut graph = Graph::new(vec![5, 4, 3, 2, 1], &[(1, 2), (1, 3), (1, 4), (2, 5)]);
        assert_eq!(graph.topo_sort(), (vec![1, 2, 3, 4, 5], true));
    }

    #[test]
    fn test_diamond() {
        let sorted = Graph::new(vec![4, 3, 2, 1], &[(1, 2), (1, 3), (2, 4), (3, 4)])
            .into_sorted()
            .unwrap();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_independent_nodes_keep_input_order() {
        let mut graph = Graph::new(vec![3, 1, 2], &[]);
        assert_eq!(graph.topo_sort(), (vec![3, 1, 2], true));
    }

    #[test]
    fn test_sort_objects() {
        let views = vec![(30, "c"), (10, "a"), (20, "b")];
        let sorted = sort_objects(views, &[(20, 30), (10, 20)], |v| v.0).unwrap();
        assert_eq!(sorted, vec![(10, "a"), (20, "b"), (30, "c")]);

        let cyclic = sort_objects(vec![(1, "x"), (2, "y")], &[(1, 2), (2, 1)], |v| v.0);
        assert!(cyclic.is_err());
    }

    #[test]
    fn test_sort_objects_with_outside_dependencies() {
        // A view on a table: the table is not among the objects being sorted.
        let sorted = sort_objects(vec![(10, "v")], &[(99, 10)], |v| v.0).unwrap();
        assert_eq!(sorted, vec![(10, "v")]);

        // Ordering still flows through an outside oid: 1 -> 99 -> 2.
        let sorted = sort_objects(vec![(2, "b"), (1, "a")], &[(99, 2), (1, 99)], |v| v.0).unwrap();
        assert_eq!(sorted, vec![(1, "a"), (2, "b")]);

        let cyclic = sort_objects(vec![(1, "a")], &[(1, 99), (99, 1)], |v| v.0);
        assert!(matches!(cyclic, Err(Error::DependencyCycle { remaining: 2 })));
    }

    /// Edges always point from a lower id to a higher one, so no cycle is
    /// possible.
    fn acyclic_graph() -> impl Strategy<Value = (usize, Vec<(Oid, Oid)>)> {
        (2usize..24).prop_flat_map(|n| {
            let n = n as Oid;
            let edge = (0..n - 1).prop_flat_map(move |a| (Just(a), a + 1..n));
            (Just(n as usize), proptest::collection::vec(edge, 0..48))
        })
    }

    proptest! {
        #[test]
        fn prop_acyclic_graphs_sort_completely(
            (n, edges) in acyclic_graph(),
            seed in any::<u64>()
        ) {
            // Shuffle node order deterministically so ids do not hint at the answer.
            let mut nodes: Vec<Oid> = (0..n as Oid).collect();
            nodes.sort_by_key(|oid| (u64::from(*oid)).wrapping_mul(seed | 1).rotate_left(17));

            let mut graph = Graph::new(nodes, &edges);
            let (sorted, complete) = graph.topo_sort();
            prop_assert!(complete);
            prop_assert_eq!(sorted.len(), n);

            let position: HashMap<Oid, usize> =
                sorted.iter().enumerate().map(|(i, oid)| (*oid, i)).collect();
            for (from, to) in edges {
                prop_assert!(position[&from] < position[&to]);
            }
        }

        #[test]
        fn prop_cycles_are_reported(
            (n, edges) in acyclic_graph(),
            a in 0u32..24,
            step in 0u32..24
        ) {
            let n = n as Oid;
            let a = a % n;
            let b = (a + 1 + step % (n - 1)) % n;

            let mut cyclic = edges.clone();
            cyclic.push((a, b));
            cyclic.push((b, a));
            let mut graph = Graph::new((0..n).collect(), &cyclic);
            let (_, complete) = graph.topo_sort();
            prop_assert!(!complete);
        }
    }
}
