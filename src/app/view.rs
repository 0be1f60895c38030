use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};

use crate::graph::EdgeId;

use super::render_utils::{
    NODE_COLOR, NODE_WORLD_RADIUS, circle_visible, dim_color, distance_to_segment,
    draw_background, edge_color, pixels_per_unit, screen_to_world, world_to_screen,
};
use super::{ExplorerApp, Hovered, PendingSelection};

const EDGE_HOVER_DISTANCE: f32 = 4.0;

impl ExplorerApp {
    fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.2, 12.0);
        let anchored = world_to_screen(rect, self.pan, self.zoom, world_before);
        self.pan += pointer - anchored;
    }

    fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
            || response.dragged_by(egui::PointerButton::Primary)
        {
            self.pan += response.drag_delta();
        }
    }

    fn hit_test(
        &self,
        pointer: Pos2,
        screen_positions: &[Option<Pos2>],
        screen_radius: f32,
    ) -> Option<Hovered> {
        let node = screen_positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = position.as_ref()?.distance(pointer);
                (distance <= screen_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((index, _)) = node {
            return Some(Hovered::Node(index));
        }

        let graph = self.session.graph();
        graph
            .edges()
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                let start = screen_positions[graph.node_index(&edge.source)?]?;
                let end = screen_positions[graph.node_index(&edge.target)?]?;
                let distance = distance_to_segment(pointer, start, end);
                (distance <= EDGE_HOVER_DISTANCE).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| Hovered::Edge(index))
    }

    fn hover_text(&self, hovered: Hovered) -> Option<String> {
        let graph = self.session.graph();
        match hovered {
            Hovered::Node(index) => graph.nodes().get(index).map(|node| {
                format!(
                    "Node: {}\nDegree: {}\nRelations: {}",
                    node.id,
                    node.degree,
                    node.relations_label()
                )
            }),
            Hovered::Edge(index) => graph
                .edge(EdgeId(index))
                .map(|edge| format!("Relation: {}\nWeight: {}", edge.relation, edge.weight)),
        }
    }

    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if self.session.graph().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The query returned no relationships to show.",
                FontId::proportional(15.0),
                Color32::from_gray(90),
            );
            return;
        }

        let screen_positions = self
            .session
            .graph()
            .nodes()
            .iter()
            .map(|node| {
                node.position
                    .map(|position| world_to_screen(rect, self.pan, self.zoom, position))
            })
            .collect::<Vec<_>>();
        let screen_radius =
            (NODE_WORLD_RADIUS * pixels_per_unit(rect) * self.zoom).clamp(3.0, 40.0);

        self.hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| self.hit_test(pointer, &screen_positions, screen_radius));
        if matches!(self.hovered, Some(Hovered::Node(_))) {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            let clicked = match self.hovered {
                Some(Hovered::Node(index)) => self
                    .session
                    .graph()
                    .nodes()
                    .get(index)
                    .map(|node| node.id.clone()),
                _ => None,
            };
            let shift = ui.input(|input| input.modifiers.shift);
            Some(match clicked {
                Some(id) if shift => PendingSelection::Toggle(id),
                other => PendingSelection::Only(other),
            })
        } else {
            None
        };

        let graph = self.session.graph();
        let state = self.session.state();
        let highlight_active = state.has_highlight();
        let zoom_sqrt = self.zoom.sqrt();

        for (index, edge) in graph.edges().iter().enumerate() {
            let (Some(start), Some(end)) = (
                graph
                    .node_index(&edge.source)
                    .and_then(|node| screen_positions[node]),
                graph
                    .node_index(&edge.target)
                    .and_then(|node| screen_positions[node]),
            ) else {
                continue;
            };

            let is_highlighted = state.highlighted_edges.contains(&EdgeId(index));
            let is_hovered = self.hovered == Some(Hovered::Edge(index));
            let base = edge_color(edge.color);

            let (line_width, line_color) = if is_highlighted || is_hovered {
                ((3.0 * zoom_sqrt).clamp(2.0, 6.0), base)
            } else if highlight_active {
                ((1.4 * zoom_sqrt).clamp(0.8, 3.0), dim_color(base, 0.35))
            } else {
                ((2.0 * zoom_sqrt).clamp(1.0, 4.0), base)
            };

            painter.line_segment([start, end], Stroke::new(line_width, line_color));
        }

        for (index, node) in graph.nodes().iter().enumerate() {
            let Some(position) = screen_positions[index] else {
                continue;
            };
            if !circle_visible(rect, position, screen_radius) {
                continue;
            }

            let is_selected = self.session.selected().contains(&node.id);
            let is_highlighted = state.highlighted_nodes.contains(&node.id);
            let is_matched = state.matched.contains(&node.id);
            let is_hovered = self.hovered == Some(Hovered::Node(index));

            let fill = if highlight_active && !is_highlighted && !is_hovered {
                dim_color(NODE_COLOR, 0.55)
            } else {
                NODE_COLOR
            };
            painter.circle_filled(position, screen_radius, fill);

            let stroke = if is_selected {
                Stroke::new(2.6, Color32::from_rgb(230, 120, 20))
            } else if is_matched {
                Stroke::new(2.0, Color32::from_rgb(40, 120, 200))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(30, 30, 30, 170))
            };
            painter.circle_stroke(position, screen_radius, stroke);

            if is_highlighted || is_hovered || is_matched || self.zoom > 1.6 {
                painter.text(
                    position + vec2(screen_radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.id,
                    FontId::proportional(12.0),
                    Color32::from_gray(30),
                );
            }
        }

        if let Some(text) = self.hovered.and_then(|hovered| self.hover_text(hovered)) {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(20),
            );
        }

        if let Some(pending) = pending_selection {
            self.apply_pending_selection(pending);
        }
    }
}
