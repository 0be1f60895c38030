use std::collections::BTreeSet;

use eframe::egui::{self, Align, Layout, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::NodeId;
use crate::util::plural;

use super::ExplorerApp;

/// Orders matched ids by fuzzy score, best first, then by id. Membership is
/// decided elsewhere; this only affects how the list is shown.
pub(super) fn rank_matches<'a>(matched: &'a BTreeSet<NodeId>, query: &str) -> Vec<&'a str> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut ranked = matched
        .iter()
        .map(|id| (matcher.fuzzy_match(id, query).unwrap_or(0), id.as_str()))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    ranked.into_iter().map(|(_, id)| id).collect()
}

impl ExplorerApp {
    pub(super) fn draw_filter_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Interactive Graph Explorer");
            ui.separator();
            ui.label("Filter nodes by name:");
            let response = ui
                .text_edit_singleline(&mut self.filter_input)
                .on_hover_text("Case-insensitive substring match; matches become the selection.");
            if response.changed() {
                self.apply_filter_input();
            }
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let graph = self.session.graph();
                ui.label(format!(
                    "{}, {}",
                    plural(graph.node_count(), "node", "nodes"),
                    plural(graph.edge_count(), "edge", "edges")
                ));
                ui.label(format!("source: {}", self.source_label));
            });
        });
    }

    pub(super) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(6.0);

        let mut clicked = None;
        {
            let state = self.session.state();
            let graph = self.session.graph();

            ui.label(format!(
                "Highlighted: {}, {}",
                plural(state.highlighted_nodes.len(), "node", "nodes"),
                plural(state.highlighted_edges.len(), "edge", "edges")
            ));

            ui.separator();
            let selected = self.session.selected();
            if selected.is_empty() {
                ui.label("Click a node, or type a name above. Shift-click adds to the selection.");
            } else {
                for id in selected {
                    let Some(node) = graph.node(id) else {
                        continue;
                    };
                    ui.label(RichText::new(&node.id).strong());
                    ui.small(format!("Degree: {}", node.degree));
                    ui.small(format!("Relations: {}", node.relations_label()));
                    ui.add_space(4.0);
                }
            }

            if !state.filter_text.is_empty() {
                ui.separator();
                ui.label(RichText::new(format!("Matches for \"{}\"", state.filter_text)).strong());
                if state.matched.is_empty() {
                    ui.label("No node names contain this text.");
                }

                egui::ScrollArea::vertical()
                    .id_salt("matched_nodes_scroll")
                    .max_height(320.0)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        for id in rank_matches(&state.matched, &state.filter_text) {
                            if ui.link(id).clicked() {
                                clicked = Some(id.to_owned());
                            }
                        }
                    });
            }
        }

        if let Some(id) = clicked {
            self.select_from_panel(&id);
        }
    }
}
