use eframe::egui::{self, Align, Color32, Context, Layout, ProgressBar, RichText, Ui};

use depgraph::session::Mode;
use depgraph::util::parse_package_list;

use super::super::{Status, ViewModel};

const SUGGESTION_LIMIT: usize = 6;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("depgraph");
                    ui.separator();
                    let stats = self.session.stats();
                    ui.label(format!("packages: {}", stats.nodes));
                    ui.label(format!("dependencies: {}", stats.edges));
                    if self.summary.dropped_edges > 0 {
                        ui.label(format!("skipped: {}", self.summary.dropped_edges));
                    }
                    ui.separator();
                    ui.label(format!("mode: {}", stats.mode));
                    if stats.mode != Mode::Idle {
                        ui.label(format!(
                            "showing {} packages / {} edges",
                            stats.shown_packages, stats.shown_edges
                        ));
                    }
                    if stats.mode == Mode::CycleHighlighted {
                        ui.label(format!("cycles: {}", stats.shown_cycles));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.fps_display_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_controls(ui));
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        self.draw_layout_status(ui);
        ui.separator();
        self.draw_filter_controls(ui);
        ui.separator();
        self.draw_cycle_controls(ui);

        if let Some(status) = &self.status {
            ui.separator();
            match status {
                Status::Info(message) => ui.label(message.as_str()),
                Status::Error(message) => {
                    ui.colored_label(Color32::from_rgb(240, 110, 110), message.as_str())
                }
            };
        }
    }

    fn draw_layout_status(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        let progress = self.layout_progress;
        ui.label(format!("strategy: {}", self.layout.strategy().label()));
        ui.add(ProgressBar::new(progress.fraction()).text(if progress.done {
            "settled".to_owned()
        } else {
            format!("{} / {}", progress.iteration, progress.total)
        }));
    }

    fn draw_filter_controls(&mut self, ui: &mut Ui) {
        ui.heading("Subgraph");
        ui.small("Packages plus their direct neighbours.");
        let response = ui.text_edit_singleline(&mut self.filter_input);
        let submitted =
            response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

        self.draw_suggestions(ui, SuggestionTarget::Filter);

        ui.horizontal(|ui| {
            if ui.button("Show subgraph").clicked() || submitted {
                self.apply_filter();
            }
            let active = self.session.mode() == Mode::SubgraphFiltered;
            if ui.add_enabled(active, egui::Button::new("Clear")).clicked() {
                self.session.clear_filter();
                self.status = None;
            }
        });
    }

    fn draw_cycle_controls(&mut self, ui: &mut Ui) {
        ui.heading("Cycles");
        if self.session.catalog().is_empty() {
            ui.small("No cycle scenarios loaded (--scenarios).");
            return;
        }

        let response = ui.text_edit_singleline(&mut self.cycle_input);
        let submitted =
            response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

        self.draw_suggestions(ui, SuggestionTarget::Cycles);

        ui.horizontal(|ui| {
            if ui.button("Detect cycles").clicked() || submitted {
                self.detect_cycles();
            }
            let active = self.session.mode() == Mode::CycleHighlighted;
            if ui.add_enabled(active, egui::Button::new("Clear")).clicked() {
                self.session.clear_cycles();
                self.status = None;
            }
        });

        let cycles = self
            .session
            .cycle_visibility()
            .into_iter()
            .map(|(id, shown)| (id.to_owned(), shown))
            .collect::<Vec<_>>();
        if let Some(scenario) = self.session.active_scenario() {
            ui.label(RichText::new(format!("scenario: {}", scenario.id)).strong());
        }

        let mut toggled = None;
        for (id, shown) in &cycles {
            let mut checked = *shown;
            if ui.checkbox(&mut checked, id.as_str()).changed() {
                toggled = Some(id.clone());
            }
        }
        if let Some(id) = toggled
            && let Err(error) = self.session.toggle_cycle(&id)
        {
            self.status = Some(Status::Error(error.to_string()));
        }

        ui.collapsing("Known queries", |ui| {
            for query in self.session.known_queries() {
                if ui.link(query.as_str()).clicked() {
                    self.cycle_input = query;
                }
            }
        });
    }

    fn draw_suggestions(&mut self, ui: &mut Ui, target: SuggestionTarget) {
        let input = match target {
            SuggestionTarget::Filter => &self.filter_input,
            SuggestionTarget::Cycles => &self.cycle_input,
        };
        let Some(last) = parse_package_list(input).pop() else {
            return;
        };
        if self.session.graph().contains(&last) {
            return;
        }

        let suggestions = self.session.suggest_packages(&last, SUGGESTION_LIMIT);
        if suggestions.is_empty() {
            return;
        }

        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            for suggestion in &suggestions {
                if ui.small_button(suggestion.as_str()).clicked() {
                    picked = Some(suggestion.clone());
                }
            }
        });

        if let Some(picked) = picked {
            let input = match target {
                SuggestionTarget::Filter => &mut self.filter_input,
                SuggestionTarget::Cycles => &mut self.cycle_input,
            };
            let mut parts = parse_package_list(input);
            parts.pop();
            parts.push(picked);
            *input = parts.join(", ");
        }
    }

    fn apply_filter(&mut self) {
        let seeds = parse_package_list(&self.filter_input);
        self.status = Some(match self.session.apply_filter(&seeds) {
            Ok(summary) => Status::Info(format!(
                "Showing {} packages and {} dependencies.",
                summary.packages, summary.edges
            )),
            Err(error) => Status::Error(error.to_string()),
        });
    }

    fn detect_cycles(&mut self) {
        let query = parse_package_list(&self.cycle_input);
        self.status = Some(match self.session.detect_cycles(&query) {
            Ok(summary) => Status::Info(format!(
                "Scenario {}: {} cycles across {} packages.",
                summary.scenario, summary.cycles, summary.packages
            )),
            Err(error) => Status::Error(error.to_string()),
        });
    }
}

#[derive(Clone, Copy)]
enum SuggestionTarget {
    Filter,
    Cycles,
}
