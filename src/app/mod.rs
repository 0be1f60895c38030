use std::collections::BTreeSet;

use eframe::egui::{self, Context, Vec2};

use crate::graph::NodeId;
use crate::session::Session;

mod panels;
mod render_utils;
mod view;

pub struct ExplorerApp {
    session: Session,
    source_label: String,
    filter_input: String,
    pan: Vec2,
    zoom: f32,
    hovered: Option<Hovered>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hovered {
    Node(usize),
    Edge(usize),
}

/// What a click on the canvas asks the session to do.
enum PendingSelection {
    Only(Option<NodeId>),
    Toggle(NodeId),
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: Session, source_label: String) -> Self {
        Self::from_session(session, source_label)
    }

    fn from_session(session: Session, source_label: String) -> Self {
        let filter_input = session.state().filter_text.clone();
        Self {
            session,
            source_label,
            filter_input,
            pan: Vec2::ZERO,
            zoom: 1.0,
            hovered: None,
        }
    }

    fn reset_view(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    fn apply_filter_input(&mut self) {
        self.session.search(&self.filter_input);
    }

    fn apply_pending_selection(&mut self, pending: PendingSelection) {
        match pending {
            PendingSelection::Only(id) => {
                self.session.select_only(id.as_deref());
            }
            PendingSelection::Toggle(id) => {
                self.session.toggle_selected(&id);
            }
        }
    }

    fn select_from_panel(&mut self, id: &str) {
        self.session.on_selection_changed(BTreeSet::from([id.to_owned()]));
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("filter_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_filter_bar(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
