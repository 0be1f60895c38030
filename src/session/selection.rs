use std::collections::BTreeSet;

use crate::graph::{AdjacencyIndex, EdgeId, GraphModel, NodeId};

/// Derived view state. Every field is recomputed from the graph and the
/// latest user input; nothing here is a source of truth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub filter_text: String,
    pub matched: BTreeSet<NodeId>,
    pub highlighted_nodes: BTreeSet<NodeId>,
    pub highlighted_edges: BTreeSet<EdgeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Filtered,
    Highlighted,
}

impl SelectionState {
    pub fn phase(&self) -> SelectionPhase {
        if !self.highlighted_nodes.is_empty() || !self.highlighted_edges.is_empty() {
            SelectionPhase::Highlighted
        } else if !self.filter_text.is_empty() {
            SelectionPhase::Filtered
        } else {
            SelectionPhase::Idle
        }
    }

    pub fn has_highlight(&self) -> bool {
        self.phase() == SelectionPhase::Highlighted
    }
}

/// Case-insensitive substring test. An empty query matches nothing.
pub fn matches_query(id: &str, query: &str) -> bool {
    !query.is_empty() && id.to_lowercase().contains(&query.to_lowercase())
}

pub fn match_nodes(graph: &GraphModel, query: &str) -> BTreeSet<NodeId> {
    if query.is_empty() {
        return BTreeSet::new();
    }

    graph
        .nodes()
        .iter()
        .filter(|node| matches_query(&node.id, query))
        .map(|node| node.id.clone())
        .collect()
}

/// Filter-text transition. Highlight sets are carried over untouched.
pub fn apply_filter_text(state: &SelectionState, graph: &GraphModel, text: &str) -> SelectionState {
    SelectionState {
        filter_text: text.to_owned(),
        matched: match_nodes(graph, text),
        highlighted_nodes: state.highlighted_nodes.clone(),
        highlighted_edges: state.highlighted_edges.clone(),
    }
}

/// Edges with an endpoint in `selection`, and `selection` plus the far end of
/// each of those edges. Ids not present in the graph contribute nothing.
pub fn highlight_for(
    graph: &GraphModel,
    adjacency: &AdjacencyIndex,
    selection: &BTreeSet<NodeId>,
) -> (BTreeSet<NodeId>, BTreeSet<EdgeId>) {
    let mut nodes = BTreeSet::new();
    let mut edges = BTreeSet::new();

    for id in selection {
        let Some(node_index) = graph.node_index(id) else {
            continue;
        };
        nodes.insert(id.clone());

        for &edge_id in adjacency.incident(node_index) {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            edges.insert(edge_id);
            if let Some(other) = edge.other_end(id) {
                nodes.insert(other.to_owned());
            }
        }
    }

    (nodes, edges)
}

/// Selection-changed transition. Prior highlight state is discarded.
pub fn apply_selection(
    state: &SelectionState,
    graph: &GraphModel,
    adjacency: &AdjacencyIndex,
    selection: &BTreeSet<NodeId>,
) -> SelectionState {
    let (highlighted_nodes, highlighted_edges) = highlight_for(graph, adjacency, selection);

    SelectionState {
        filter_text: state.filter_text.clone(),
        matched: state.matched.clone(),
        highlighted_nodes,
        highlighted_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{RelationRecord, filter_records};

    fn scenario() -> (GraphModel, AdjacencyIndex) {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "X", 5.0),
            RelationRecord::new("B", "C", "X", 1.0),
            RelationRecord::new("A", "A", "X", 5.0),
            RelationRecord::new("C", "D", "Y", 3.0),
        ]));
        let adjacency = AdjacencyIndex::build(&graph);
        (graph, adjacency)
    }

    fn ids(values: &[&str]) -> BTreeSet<NodeId> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn query_a_matches_only_a() {
        let (graph, _) = scenario();
        assert_eq!(match_nodes(&graph, "a"), ids(&["A"]));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let (graph, _) = scenario();
        assert!(match_nodes(&graph, "").is_empty());
        assert!(!matches_query("A", ""));
    }

    #[test]
    fn match_nodes_agrees_with_matches_query() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("Anna Karenina", "Boris", "INTERACTS1", 3.0),
            RelationRecord::new("KARL", "Ivan", "INTERACTS1", 3.0),
            RelationRecord::new("Élise", "Anna Pavlovna", "INTERACTS1", 3.0),
        ]));

        for query in ["an", "KAR", "a p", "élise", "x", "  "] {
            let matched = match_nodes(&graph, query);
            for node in graph.nodes() {
                assert_eq!(
                    matched.contains(&node.id),
                    matches_query(&node.id, query),
                    "query {query:?} node {}",
                    node.id
                );
            }
        }
        assert_eq!(match_nodes(&graph, "kar"), ids(&["Anna Karenina", "KARL"]));
    }

    #[test]
    fn filter_text_leaves_highlights_alone() {
        let (graph, adjacency) = scenario();
        let highlighted = apply_selection(&SelectionState::default(), &graph, &adjacency, &ids(&["A"]));

        let filtered = apply_filter_text(&highlighted, &graph, "c");
        assert_eq!(filtered.filter_text, "c");
        assert_eq!(filtered.matched, ids(&["C"]));
        assert_eq!(filtered.highlighted_nodes, highlighted.highlighted_nodes);
        assert_eq!(filtered.highlighted_edges, highlighted.highlighted_edges);
    }

    #[test]
    fn selecting_a_highlights_a_b_only() {
        let (graph, adjacency) = scenario();
        let state = apply_selection(&SelectionState::default(), &graph, &adjacency, &ids(&["A"]));

        assert_eq!(state.highlighted_edges, BTreeSet::from([EdgeId(0)]));
        assert_eq!(state.highlighted_nodes, ids(&["A", "B"]));
        assert_eq!(state.phase(), SelectionPhase::Highlighted);
    }

    #[test]
    fn highlight_uses_endpoints_not_positions() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("C", "D", "INTERACTS1", 3.0),
            RelationRecord::new("E", "F", "INTERACTS1", 3.0),
            RelationRecord::new("A", "B", "INTERACTS1", 3.0),
        ]));
        let adjacency = AdjacencyIndex::build(&graph);

        // "A" is node 4 and its only edge is edge 2.
        let state = apply_selection(&SelectionState::default(), &graph, &adjacency, &ids(&["A"]));
        assert_eq!(state.highlighted_edges, BTreeSet::from([EdgeId(2)]));
        assert_eq!(state.highlighted_nodes, ids(&["A", "B"]));
    }

    #[test]
    fn multi_selection_unions_neighbourhoods() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "INTERACTS1", 3.0),
            RelationRecord::new("C", "B", "INTERACTS2", 3.0),
            RelationRecord::new("D", "E", "INTERACTS3", 3.0),
            RelationRecord::new("F", "G", "INTERACTS3", 3.0),
        ]));
        let adjacency = AdjacencyIndex::build(&graph);

        let selection = ids(&["A", "E"]);
        let state = apply_selection(&SelectionState::default(), &graph, &adjacency, &selection);
        assert_eq!(state.highlighted_edges, BTreeSet::from([EdgeId(0), EdgeId(2)]));
        assert_eq!(state.highlighted_nodes, ids(&["A", "B", "D", "E"]));

        for edge_id in graph.edge_ids() {
            let edge = graph.edge(edge_id).unwrap();
            let touches = selection.iter().any(|id| edge.other_end(id).is_some());
            assert_eq!(state.highlighted_edges.contains(&edge_id), touches);
        }
    }

    #[test]
    fn recomputation_discards_previous_highlight() {
        let (graph, adjacency) = scenario();
        let first = apply_selection(&SelectionState::default(), &graph, &adjacency, &ids(&["A"]));
        let second = apply_selection(&first, &graph, &adjacency, &ids(&["D"]));

        assert_eq!(second.highlighted_nodes, ids(&["C", "D"]));
        assert_eq!(second.highlighted_edges, BTreeSet::from([EdgeId(1)]));
    }

    #[test]
    fn empty_selection_returns_to_idle() {
        let (graph, adjacency) = scenario();
        let highlighted = apply_selection(&SelectionState::default(), &graph, &adjacency, &ids(&["B"]));
        let cleared = apply_selection(&highlighted, &graph, &adjacency, &BTreeSet::new());

        assert!(cleared.highlighted_nodes.is_empty());
        assert!(cleared.highlighted_edges.is_empty());
        assert_eq!(cleared.phase(), SelectionPhase::Idle);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (graph, adjacency) = scenario();
        let (nodes, edges) = highlight_for(&graph, &adjacency, &ids(&["Z"]));
        assert!(nodes.is_empty());
        assert!(edges.is_empty());
    }

    #[test]
    fn isolated_pair_neighbour_is_highlighted_from_either_side() {
        let (graph, adjacency) = scenario();
        let (nodes, edges) = highlight_for(&graph, &adjacency, &ids(&["B"]));
        assert_eq!(nodes, ids(&["A", "B"]));
        assert_eq!(edges, BTreeSet::from([EdgeId(0)]));
    }
}
