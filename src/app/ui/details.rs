use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

const LIST_HEIGHT: f32 = 160.0;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Package");
        ui.add_space(4.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node to inspect its dependencies.");
            return;
        };

        let Some(details) = self.session.node_details(&selected_id) else {
            ui.label("Selected package is not in the graph.");
            return;
        };

        ui.label(RichText::new(details.id.as_str()).strong());
        if details.is_base {
            ui.small("base component");
        }
        ui.label(format!("Dependencies: {}", details.out_degree()));
        ui.label(format!("Dependents: {}", details.in_degree()));

        let connected = self.session.connected_ids().len();
        if connected > 0 {
            ui.label(format!("Highlighted packages: {connected}"));
        }

        let mut next_selection = None;
        for (title, ids, salt) in [
            ("Depends on", &details.dependencies, "deps"),
            ("Needed by", &details.dependents, "rdeps"),
        ] {
            ui.separator();
            ui.label(RichText::new(title).strong());
            if ids.is_empty() {
                ui.small("none");
                continue;
            }

            egui::ScrollArea::vertical()
                .id_salt(salt)
                .max_height(LIST_HEIGHT)
                .show(ui, |ui| {
                    for id in ids {
                        if ui.link(id.as_str()).clicked() {
                            next_selection = Some(id.clone());
                        }
                    }
                });
        }

        if let Some(id) = next_selection {
            self.select(&id);
        }

        ui.separator();
        if ui.button("Clear selection").clicked() {
            self.clear_selection();
        }
    }
}
