use eframe::egui::{self, Align, Context, Layout, RichText};
use glam::Vec3;

use crate::galaxy::ClusterSpec;

use super::super::ViewModel;

const OVERVIEW_POSITION: Vec3 = Vec3::new(0.0, 0.0, 1000.0);
const SIDE_VIEW_POSITION: Vec3 = Vec3::new(500.0, 200.0, 0.0);

impl ViewModel {
    pub(in crate::app) fn show_overlay(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("galaxy-graph");
                    ui.separator();
                    ui.label(format!("nodes: {}", self.graph.nodes.len()));
                    ui.label(format!("links: {}", self.graph.links.len()));
                    ui.separator();

                    if ui.button("Overview").clicked() {
                        self.fly_to(OVERVIEW_POSITION);
                        self.look_at(Vec3::ZERO);
                    }
                    if ui.button("Side view").clicked() {
                        self.fly_to(SIDE_VIEW_POSITION);
                        self.look_at(Vec3::ZERO);
                    }
                    if ui.button("Regenerate").clicked() {
                        self.regenerate();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        if self.simulation.is_running() {
                            ui.label(format!("settling (alpha {:.3})", self.simulation.alpha()));
                        } else {
                            ui.label("settled");
                        }
                    });
                });
            });

        self.show_details(ctx);
    }

    fn show_details(&mut self, ctx: &Context) {
        let Some(selected_id) = self.selected.clone() else {
            return;
        };
        let Some(&index) = self.index_by_id.get(&selected_id) else {
            self.set_selected(None);
            return;
        };

        let node = &self.graph.nodes[index];
        let label = node.label.clone();
        let cluster = ClusterSpec::get(node.cluster).label;
        let description = node.description.clone();
        let tags = node.tags.join(", ");
        let connection_count = node.connections.len();

        let mut close_requested = false;
        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.label(RichText::new(&label).strong().size(16.0));
                ui.small(selected_id.as_str());
                ui.add_space(6.0);

                ui.label(format!("Cluster: {cluster}"));
                if !description.is_empty() {
                    ui.label(&description);
                }
                if !tags.is_empty() {
                    ui.label(format!("Tags: {tags}"));
                }
                ui.label(format!("Connections: {connection_count}"));

                ui.add_space(10.0);
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });

        if close_requested {
            self.set_selected(None);
        }
    }
}
