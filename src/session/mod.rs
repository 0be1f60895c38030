mod selection;
pub mod snapshot;

use std::collections::BTreeSet;

use log::{debug, info};
use thiserror::Error;

use crate::graph::{AdjacencyIndex, GraphModel, NodeId};
use crate::layout::{LayoutConfig, LayoutError, spring_layout};
use crate::records::{RecordSource, SourceError, filter_records};

use selection::{apply_filter_text, apply_selection};
pub use selection::SelectionState;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    FilterTextChanged(String),
    SelectionChanged(BTreeSet<NodeId>),
}

/// Owns the graph for one viewing session plus the state derived from user
/// input. Events are handled one at a time, each to completion.
#[derive(Debug)]
pub struct Session {
    graph: GraphModel,
    adjacency: AdjacencyIndex,
    selected: BTreeSet<NodeId>,
    state: SelectionState,
}

impl Session {
    pub fn new(graph: GraphModel) -> Self {
        let adjacency = AdjacencyIndex::build(&graph);
        Self {
            graph,
            adjacency,
            selected: BTreeSet::new(),
            state: SelectionState::default(),
        }
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> &BTreeSet<NodeId> {
        &self.selected
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> &SelectionState {
        match event {
            SessionEvent::FilterTextChanged(text) => {
                self.state = apply_filter_text(&self.state, &self.graph, &text);
                debug!(
                    "filter {:?} matched {} nodes",
                    self.state.filter_text,
                    self.state.matched.len()
                );
            }
            SessionEvent::SelectionChanged(selection) => {
                let (known, unknown): (BTreeSet<_>, BTreeSet<_>) = selection
                    .into_iter()
                    .partition(|id| self.graph.contains(id));
                if !unknown.is_empty() {
                    debug!("ignoring selection of unknown nodes {unknown:?}");
                }

                self.selected = known;
                self.state =
                    apply_selection(&self.state, &self.graph, &self.adjacency, &self.selected);
                debug!(
                    "selection of {} nodes highlights {} nodes and {} edges",
                    self.selected.len(),
                    self.state.highlighted_nodes.len(),
                    self.state.highlighted_edges.len()
                );
            }
        }

        &self.state
    }

    pub fn on_filter_text_changed(&mut self, text: &str) -> &SelectionState {
        self.dispatch(SessionEvent::FilterTextChanged(text.to_owned()))
    }

    pub fn on_selection_changed(&mut self, selection: BTreeSet<NodeId>) -> &SelectionState {
        self.dispatch(SessionEvent::SelectionChanged(selection))
    }

    /// Filter, then seed the selection with whatever matched.
    pub fn search(&mut self, text: &str) -> &SelectionState {
        self.on_filter_text_changed(text);
        let matched = self.state.matched.clone();
        self.on_selection_changed(matched)
    }

    pub fn toggle_selected(&mut self, id: &str) -> &SelectionState {
        let mut selection = self.selected.clone();
        if !selection.remove(id) {
            selection.insert(id.to_owned());
        }
        self.on_selection_changed(selection)
    }

    pub fn select_only(&mut self, id: Option<&str>) -> &SelectionState {
        self.on_selection_changed(id.map(|id| BTreeSet::from([id.to_owned()])).unwrap_or_default())
    }
}

pub fn start_session(
    source: &dyn RecordSource,
    layout: &LayoutConfig,
) -> Result<Session, PipelineError> {
    info!("fetching records from {}", source.describe());
    let records = source.fetch()?;
    let edges = filter_records(records);
    let graph = GraphModel::build(edges);
    let positions = spring_layout(&graph, layout)?;

    Ok(Session::new(graph.with_positions(positions)))
}
