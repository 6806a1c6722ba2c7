use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::{node_screen_radius, screen_to_world, world_to_screen};

const PICK_SLACK: f32 = 4.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
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
        self.zoom = (self.zoom * zoom_factor).clamp(0.02, 8.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        self.session
            .graph()
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_hidden())
            .filter_map(|(index, node)| {
                let center = world_to_screen(rect, self.pan, self.zoom, node.position());
                let radius = node_screen_radius(node.size(), self.zoom) + PICK_SLACK;
                let distance = center.distance(pointer);
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn handle_graph_click(&mut self, rect: Rect, response: &egui::Response) {
        if !response.clicked() {
            return;
        }
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };

        match self.node_at(rect, pointer) {
            Some(index) => {
                let Some(id) = self.session.graph().id_of(index).map(str::to_owned) else {
                    return;
                };
                self.select(&id);
            }
            None => self.clear_selection(),
        }
    }

    pub(in crate::app) fn select(&mut self, id: &str) {
        self.session.select_node(id);
        self.selected = Some(id.to_owned());
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        self.session.clear_selection();
        self.selected = None;
    }
}
