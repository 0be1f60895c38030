use super::{EdgeId, GraphModel};

/// Incident edges per node, indexed like [`GraphModel::nodes`].
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    incident: Vec<Vec<EdgeId>>,
}

impl AdjacencyIndex {
    pub fn build(graph: &GraphModel) -> Self {
        let mut incident = vec![Vec::new(); graph.node_count()];

        for (edge_id, edge) in graph.edge_ids().zip(graph.edges()) {
            let source = graph.node_index(&edge.source);
            let target = graph.node_index(&edge.target);

            if let Some(source) = source {
                incident[source].push(edge_id);
            }
            if let Some(target) = target
                && source != Some(target)
            {
                incident[target].push(edge_id);
            }
        }

        Self { incident }
    }

    pub fn incident(&self, node_index: usize) -> &[EdgeId] {
        self.incident
            .get(node_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
