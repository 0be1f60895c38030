mod adjacency;

use std::collections::HashMap;

use eframe::egui::Vec2;
use log::{debug, info};
use serde::Serialize;

use crate::records::{Color, RelationKind};

pub use adjacency::AdjacencyIndex;

pub type NodeId = String;

/// Position of an edge in the model's edge list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: RelationKind,
    pub weight: f64,
    pub color: Color,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, relation: RelationKind, weight: f64) -> Self {
        let color = relation.color();
        Self {
            source,
            target,
            relation,
            weight,
            color,
        }
    }

    /// The endpoint opposite `id`, treating the edge as undirected.
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(self.target.as_str())
        } else if self.target == id {
            Some(self.source.as_str())
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub degree: usize,
    /// `(relation, weight)` for every incident edge, in edge order.
    pub adjacency_summary: Vec<(RelationKind, f64)>,
    pub position: Option<Vec2>,
}

impl Node {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            degree: 0,
            adjacency_summary: Vec::new(),
            position: None,
        }
    }

    pub fn relations_label(&self) -> String {
        self.adjacency_summary
            .iter()
            .map(|(relation, weight)| format!("{relation} ({weight})"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Nodes and edges for one session. Built once; never updated in place.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<NodeId, usize>,
}

impl GraphModel {
    /// Builds the node set from the endpoints of `edges`. Nodes appear in the
    /// order their first edge was seen.
    ///
    /// Edges joining the same pair of nodes, in either direction, collapse
    /// into one. It keeps the slot of the first and the attributes of the last.
    pub fn build(edges: Vec<Edge>) -> Self {
        let edges = merge_pairs(edges);
        let mut nodes = Vec::new();
        let mut index_by_id: HashMap<NodeId, usize> = HashMap::new();

        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                let index = *index_by_id.entry(endpoint.clone()).or_insert_with(|| {
                    nodes.push(Node::new(endpoint.clone()));
                    nodes.len() - 1
                });

                let node = &mut nodes[index];
                node.degree += 1;
                node.adjacency_summary
                    .push((edge.relation.clone(), edge.weight));
            }
        }

        info!(
            "graph model built with {} nodes and {} edges",
            nodes.len(),
            edges.len()
        );

        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    /// Attaches layout output; `positions` is indexed like [`Self::nodes`].
    pub fn with_positions(mut self, positions: Vec<Vec2>) -> Self {
        for (node, position) in self.nodes.iter_mut().zip(positions) {
            node.position = Some(position);
        }
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|index| &self.nodes[index])
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn merge_pairs(edges: Vec<Edge>) -> Vec<Edge> {
    let mut merged: Vec<Edge> = Vec::with_capacity(edges.len());
    let mut slot_by_pair: HashMap<(NodeId, NodeId), usize> = HashMap::new();

    for edge in edges {
        let pair = if edge.source <= edge.target {
            (edge.source.clone(), edge.target.clone())
        } else {
            (edge.target.clone(), edge.source.clone())
        };

        match slot_by_pair.get(&pair) {
            Some(&slot) => {
                let kept = &mut merged[slot];
                debug!(
                    "merging {} -> {} into {} -- {}",
                    edge.source, edge.target, kept.source, kept.target
                );
                kept.relation = edge.relation;
                kept.weight = edge.weight;
                kept.color = edge.color;
            }
            None => {
                slot_by_pair.insert(pair, merged.len());
                merged.push(edge);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{RelationRecord, filter_records};

    fn scenario() -> GraphModel {
        GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "X", 5.0),
            RelationRecord::new("B", "C", "X", 1.0),
            RelationRecord::new("A", "A", "X", 5.0),
            RelationRecord::new("C", "D", "Y", 3.0),
        ]))
    }

    #[test]
    fn scenario_nodes_and_degrees() {
        let graph = scenario();
        let ids = graph
            .nodes()
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        assert!(graph.nodes().iter().all(|node| node.degree == 1));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn degree_counts_incident_edges_undirected() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "INTERACTS1", 3.0),
            RelationRecord::new("B", "A", "INTERACTS2", 4.0),
            RelationRecord::new("C", "A", "INTERACTS3", 2.0),
        ]));

        for node in graph.nodes() {
            let incident = graph
                .edges()
                .iter()
                .filter(|edge| edge.other_end(&node.id).is_some())
                .count();
            assert_eq!(node.degree, incident, "degree of {}", node.id);
        }
        assert_eq!(graph.node("A").map(|node| node.degree), Some(2));
    }

    #[test]
    fn reversed_pair_merges_into_one_edge_with_last_attributes() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "INTERACTS1", 3.0),
            RelationRecord::new("C", "D", "INTERACTS3", 2.0),
            RelationRecord::new("B", "A", "INTERACTS2", 4.0),
        ]));

        assert_eq!(graph.edge_count(), 2);
        let merged = graph.edge(EdgeId(0)).unwrap();
        assert_eq!((merged.source.as_str(), merged.target.as_str()), ("A", "B"));
        assert_eq!(merged.relation, RelationKind::Interacts2);
        assert_eq!(merged.weight, 4.0);
        assert_eq!(merged.color, Color::Red);

        let a = graph.node("A").unwrap();
        assert_eq!(a.degree, 1);
        assert_eq!(a.relations_label(), "INTERACTS2 (4)");
        assert_eq!(graph.edge(EdgeId(1)).map(|edge| edge.target.as_str()), Some("D"));
    }

    #[test]
    fn adjacency_summary_follows_edge_order() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "INTERACTS1", 3.0),
            RelationRecord::new("C", "A", "INTERACTS3", 2.5),
        ]));

        let node = graph.node("A").unwrap();
        assert_eq!(
            node.adjacency_summary,
            vec![
                (RelationKind::Interacts1, 3.0),
                (RelationKind::Interacts3, 2.5)
            ]
        );
        assert_eq!(node.relations_label(), "INTERACTS1 (3), INTERACTS3 (2.5)");
    }

    #[test]
    fn built_edges_have_no_self_loops_and_respect_the_weight_floor() {
        let graph = scenario();
        for edge in graph.edges() {
            assert_ne!(edge.source, edge.target);
            assert!(edge.weight >= crate::records::MIN_WEIGHT);
        }
    }

    #[test]
    fn empty_edge_list_gives_empty_model() {
        let graph = GraphModel::build(Vec::new());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node("A").is_none());
    }

    #[test]
    fn other_end_is_direction_agnostic() {
        let edge = Edge::new("A".into(), "B".into(), RelationKind::Interacts1, 2.0);
        assert_eq!(edge.other_end("A"), Some("B"));
        assert_eq!(edge.other_end("B"), Some("A"));
        assert_eq!(edge.other_end("C"), None);
    }
}
