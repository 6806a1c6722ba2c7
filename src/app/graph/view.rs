use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui};

use super::super::ViewModel;
use super::super::render_utils::{
    circle_visible, draw_background, node_screen_radius, paint_wave, segment_visible,
    wave_to_screen, world_to_screen,
};

const LABEL_ZOOM: f32 = 0.6;
const WAVE_WIDTH: f32 = 5.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.handle_graph_click(rect, &response);

        if !self.layout_progress.done {
            self.layout_progress = self.session.step_layout(&mut self.layout);
            ui.ctx().request_repaint();
        }

        let now = ui.input(|input| input.time);
        if self.session.frame(now) {
            ui.ctx().request_repaint();
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let graph = self.session.graph();

        for edge in graph.edges() {
            let visual = edge.visual();
            if visual.hidden {
                continue;
            }
            let (Some(source), Some(target)) =
                (graph.node(edge.source()), graph.node(edge.target()))
            else {
                continue;
            };
            if source.is_hidden() || target.is_hidden() {
                continue;
            }

            let start = world_to_screen(rect, pan, zoom, source.position());
            let end = world_to_screen(rect, pan, zoom, target.position());
            if !segment_visible(rect, start, end, 4.0) {
                continue;
            }
            let width = (visual.size * zoom.powf(0.5)).clamp(0.3, 6.0);
            painter.line_segment([start, end], Stroke::new(width, visual.color));
        }

        for segment in self.session.wave_segments() {
            let points = wave_to_screen(rect, pan, zoom, &segment);
            if segment_visible(rect, points[0], points[2], WAVE_WIDTH) {
                paint_wave(&painter, points, segment.color, WAVE_WIDTH);
            }
        }

        let selected = self.selected.as_deref();
        let mut visible_nodes = 0usize;
        for node in graph.nodes() {
            let visual = node.visual();
            if visual.hidden {
                continue;
            }

            let center = world_to_screen(rect, pan, zoom, node.position());
            let radius = node_screen_radius(visual.size, zoom);
            if !circle_visible(rect, center, radius) {
                continue;
            }
            visible_nodes += 1;

            painter.circle_filled(center, radius, visual.color);
            if selected == Some(node.id()) {
                painter.circle_stroke(center, radius + 2.0, Stroke::new(1.5, Color32::WHITE));
            }

            let emphasized = visual.size > node.original().size;
            if zoom >= LABEL_ZOOM || emphasized {
                painter.text(
                    center + eframe::egui::vec2(radius + 3.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.id(),
                    FontId::proportional(11.0),
                    Color32::from_gray(200),
                );
            }
        }

        painter.text(
            rect.left_bottom() + eframe::egui::vec2(8.0, -8.0),
            Align2::LEFT_BOTTOM,
            format!("{visible_nodes} nodes in view"),
            FontId::monospace(11.0),
            Color32::from_gray(140),
        );
    }
}
