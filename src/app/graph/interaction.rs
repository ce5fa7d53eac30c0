use eframe::egui::{self, Pos2, Rect, Ui};
use glam::Vec2;

use super::super::ViewModel;

const ORBIT_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.0015;

pub(in crate::app) fn pointer_to_ndc(rect: Rect, pointer: Pos2) -> Vec2 {
    Vec2::new(
        (pointer.x - rect.center().x) / (rect.width() * 0.5),
        (rect.center().y - pointer.y) / (rect.height() * 0.5),
    )
}

impl ViewModel {
    pub(in crate::app) fn handle_orbit_input(&mut self, response: &egui::Response) {
        if !response.dragged_by(egui::PointerButton::Primary) {
            return;
        }
        let delta = response.drag_delta();
        if delta == egui::Vec2::ZERO {
            return;
        }
        self.camera
            .orbit(-delta.x * ORBIT_SPEED, -delta.y * ORBIT_SPEED);
    }

    pub(in crate::app) fn handle_zoom_input(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }
        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }
        let factor = (1.0 - scroll * ZOOM_SPEED).clamp(0.8, 1.25);
        self.camera.zoom(factor);
    }

    pub(in crate::app) fn handle_pan_input(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            self.camera.pan(Vec2::new(delta.x, delta.y));
        }
    }

    pub(in crate::app) fn hovered_main_slot(&self, pointer: Option<Pos2>) -> Option<usize> {
        let pointer = pointer?;
        self.scratch
            .main_screen
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| {
                let screen_node = entry.as_ref()?;
                let distance = screen_node.position.distance(pointer);
                (distance <= screen_node.radius).then_some((slot, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)
    }
}
