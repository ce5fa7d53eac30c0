use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::config::NodeShape;
use crate::util::{dim_color, mix_color};

use super::super::render_utils::{
    circle_visible, fog_color, polygon_points, project_to_screen, segment_visible,
};
use super::super::{ScreenNode, ViewModel};

const STATIC_LINE_ALPHA: u8 = 70;
const GRAB_LINE_ALPHA: u8 = 120;
const DIM_FACTOR: f32 = 0.3;
const LABEL_COLOR: Color32 = Color32::from_gray(235);

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

impl ViewModel {
    pub(in crate::app) fn draw_scene(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return;
        }
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.palette.background);

        let delta_seconds = ui.ctx().input(|input| input.stable_dt).clamp(0.0, 0.25);

        self.handle_orbit_input(&response);
        self.handle_zoom_input(ui, &response);
        self.handle_pan_input(&response);

        self.simulation.advance(&mut self.graph, delta_seconds);
        self.camera.update(delta_seconds);
        self.particles.advance();

        let aspect = rect.width() / rect.height();
        let view_projection = self.camera.view_projection(aspect);
        let pointer = response.hover_pos();
        let pointer_ndc = pointer.map(|p| super::interaction::pointer_to_ndc(rect, p));
        let pointer_down = ui.input(|input| input.pointer.primary_down());

        let lerp = self.particles.update_color_lerp(pointer_down);
        let cloud_color = mix_color(self.palette.network_node, self.palette.click_active, lerp);
        let static_line_color = with_alpha(
            mix_color(self.palette.network_line, self.palette.click_active, lerp),
            STATIC_LINE_ALPHA,
        );

        self.particles
            .collect_static_segments(&mut self.scratch.static_segments);
        for segment in &self.scratch.static_segments {
            let (Some(start), Some(end)) = (
                project_to_screen(&view_projection, rect, segment[0]),
                project_to_screen(&view_projection, rect, segment[1]),
            ) else {
                continue;
            };
            if segment_visible(rect, start, end) {
                let midpoint = (segment[0] + segment[1]) * 0.5;
                let color = fog_color(
                    static_line_color,
                    self.palette.background,
                    self.camera.view_distance(midpoint),
                );
                painter.line_segment([start, end], Stroke::new(1.0, color));
            }
        }

        if let Some(ndc) = pointer_ndc {
            let interaction_point = self.camera.interaction_point(ndc, aspect);
            self.particles.collect_grab_segments(
                interaction_point,
                self.config.graph.grab_distance,
                &mut self.scratch.grab_segments,
            );
            let grab_color = with_alpha(self.palette.grab_line, GRAB_LINE_ALPHA);
            for segment in &self.scratch.grab_segments {
                let (Some(start), Some(end)) = (
                    project_to_screen(&view_projection, rect, segment[0]),
                    project_to_screen(&view_projection, rect, segment[1]),
                ) else {
                    continue;
                };
                painter.line_segment([start, end], Stroke::new(1.0, grab_color));
            }
        } else {
            self.scratch.grab_segments.clear();
        }

        self.rebuild_dynamic_segments();
        for segment in &self.scratch.dynamic_segments {
            let (Some(start), Some(end)) = (
                project_to_screen(&view_projection, rect, segment[0]),
                project_to_screen(&view_projection, rect, segment[1]),
            ) else {
                continue;
            };
            if segment_visible(rect, start, end) {
                let midpoint = (segment[0] + segment[1]) * 0.5;
                let color = fog_color(
                    self.palette.dynamic_link,
                    self.palette.background,
                    self.camera.view_distance(midpoint),
                );
                painter.line_segment([start, end], Stroke::new(1.0, color));
            }
        }

        for &position in self.particles.positions() {
            let Some(screen) = project_to_screen(&view_projection, rect, position) else {
                continue;
            };
            let radius = self.camera.pixels_per_unit(rect.height(), position).clamp(0.4, 3.0);
            if circle_visible(rect, screen, radius) {
                let color = fog_color(
                    cloud_color,
                    self.palette.background,
                    self.camera.view_distance(position),
                );
                painter.circle_filled(screen, radius, color);
            }
        }

        self.update_main_screen_space(&view_projection, rect);
        self.hovered = self
            .hovered_main_slot(pointer)
            .map(|slot| self.graph.nodes[self.main_indices[slot]].id.clone());

        if self.hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        self.scratch.draw_order.clear();
        self.scratch.draw_order.extend(0..self.main_indices.len());
        let main_screen = std::mem::take(&mut self.scratch.main_screen);
        self.scratch.draw_order.retain(|&slot| main_screen[slot].is_some());
        self.scratch.draw_order.sort_by(|&a, &b| {
            let depth_a = main_screen[a].as_ref().map_or(0.0, |n| n.depth);
            let depth_b = main_screen[b].as_ref().map_or(0.0, |n| n.depth);
            depth_b.total_cmp(&depth_a)
        });

        let highlight = self.config.animation.highlight;
        let shape = self.config.graph.node_geometry;
        for slot in 0..self.scratch.draw_order.len() {
            let slot = self.scratch.draw_order[slot];
            let Some(screen_node) = &main_screen[slot] else {
                continue;
            };
            let node = &self.graph.nodes[self.main_indices[slot]];

            let is_hovered = self.hovered.as_deref() == Some(node.id.as_str());
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());

            let hover_mix = ui.ctx().animate_bool_with_time(
                ui.make_persistent_id(("node-hover", node.id.as_str())),
                is_hovered,
                highlight.transition_duration,
            );
            let select_mix = ui.ctx().animate_bool_with_time(
                ui.make_persistent_id(("node-select", node.id.as_str())),
                is_selected,
                highlight.transition_duration,
            );
            let scale = (1.0 + (highlight.scale_hover - 1.0) * hover_mix)
                .max(1.0 + (highlight.scale_selected - 1.0) * select_mix);
            let radius = screen_node.radius * scale;

            if !circle_visible(rect, screen_node.position, radius) {
                continue;
            }

            let mut color = self.palette.cluster_color(node.cluster);
            if self.is_dimmed(&node.id) {
                color = dim_color(color, DIM_FACTOR);
            }
            color = fog_color(color, self.palette.background, screen_node.depth);

            match shape.shape {
                NodeShape::Circle => {
                    painter.circle_filled(screen_node.position, radius, color);
                }
                NodeShape::Polygon => {
                    let points = polygon_points(screen_node.position, radius, shape.polygon_sides);
                    painter.add(egui::Shape::convex_polygon(points, color, Stroke::NONE));
                }
            }

            if select_mix > 0.0 {
                painter.circle_stroke(
                    screen_node.position,
                    radius + 3.0,
                    Stroke::new(1.5 * select_mix, self.palette.click_active),
                );
            }

            if (is_hovered || is_selected) && !node.label.is_empty() {
                painter.text(
                    screen_node.position + vec2(radius + 6.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.label,
                    FontId::proportional(13.0),
                    LABEL_COLOR,
                );
            }
        }
        self.scratch.main_screen = main_screen;

        if response.clicked_by(egui::PointerButton::Primary) {
            let clicked = self.hovered.clone();
            self.set_selected(clicked);
        }
    }

    fn update_main_screen_space(&mut self, view_projection: &glam::Mat4, rect: egui::Rect) {
        let scratch = &mut self.scratch.main_screen;
        scratch.clear();
        for &node_index in &self.main_indices {
            let entry = self.graph.nodes[node_index].finite_position().and_then(|world| {
                let position = project_to_screen(view_projection, rect, world)?;
                let node = &self.graph.nodes[node_index];
                let radius = (node.size * 0.5
                    * self.camera.pixels_per_unit(rect.height(), world))
                .clamp(2.0, 120.0);
                Some(ScreenNode {
                    position,
                    radius,
                    depth: self.camera.view_distance(world),
                })
            });
            scratch.push(entry);
        }
    }

    pub(in crate::app) fn rebuild_dynamic_segments(&mut self) {
        self.scratch.dynamic_segments.clear();
        for &link_index in &self.dynamic_link_indices {
            let link = &self.graph.links[link_index];
            let (Some(source), Some(target)) = (
                link.source.resolve(&self.index_by_id),
                link.target.resolve(&self.index_by_id),
            ) else {
                continue;
            };
            let (Some(start), Some(end)) = (
                self.graph.nodes[source].finite_position(),
                self.graph.nodes[target].finite_position(),
            ) else {
                continue;
            };
            self.scratch.dynamic_segments.push([start, end]);
        }
    }
}
