use serde::Serialize;

use crate::graph::EdgeId;
use crate::records::Color;

use super::Session;

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub selection: SelectionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub degree: usize,
    pub relations: String,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct EdgeSnapshot {
    pub id: EdgeId,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: f64,
    pub color: Color,
}

#[derive(Debug, Serialize)]
pub struct SelectionSnapshot {
    pub filter_text: String,
    pub selected: Vec<String>,
    pub matched: Vec<String>,
    pub highlighted_nodes: Vec<String>,
    pub highlighted_edges: Vec<EdgeId>,
}

impl SessionSnapshot {
    pub fn capture(session: &Session) -> Self {
        let graph = session.graph();
        let state = session.state();

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeSnapshot {
                id: node.id.clone(),
                degree: node.degree,
                relations: node.relations_label(),
                x: node.position.map(|position| position.x),
                y: node.position.map(|position| position.y),
            })
            .collect();

        let edges = graph
            .edge_ids()
            .zip(graph.edges())
            .map(|(id, edge)| EdgeSnapshot {
                id,
                source: edge.source.clone(),
                target: edge.target.clone(),
                relation: edge.relation.label().to_owned(),
                weight: edge.weight,
                color: edge.color,
            })
            .collect();

        Self {
            nodes,
            edges,
            selection: SelectionSnapshot {
                filter_text: state.filter_text.clone(),
                selected: session.selected().iter().cloned().collect(),
                matched: state.matched.iter().cloned().collect(),
                highlighted_nodes: state.highlighted_nodes.iter().cloned().collect(),
                highlighted_edges: state.highlighted_edges.iter().copied().collect(),
            },
        }
    }
}
