use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context, Vec2};
use rand::rngs::StdRng;
use tracing::{error, info};

use depgraph::graph::{BuildSummary, Palette};
use depgraph::input::{load_graph_input, load_scenario_catalog};
use depgraph::layout::{LayoutConfig, LayoutProgress, LayoutRun, LayoutStrategy};
use depgraph::scenario::ScenarioCatalog;
use depgraph::session::Session;
use depgraph::wave::WaveConfig;

mod graph;
mod render_utils;
mod ui;

#[derive(Clone, Debug)]
pub struct LaunchConfig {
    pub graph_path: PathBuf,
    pub scenarios_path: Option<PathBuf>,
    pub strategy: Option<LayoutStrategy>,
    pub seed: Option<u64>,
    pub layout: LayoutConfig,
    pub waves: WaveConfig,
}

pub struct DepgraphApp {
    config: LaunchConfig,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoadedGraph {
    session: Session,
    summary: BuildSummary,
}

struct ViewModel {
    session: Session,
    summary: BuildSummary,
    layout: LayoutRun<StdRng>,
    layout_progress: LayoutProgress,
    pan: Vec2,
    zoom: f32,
    selected: Option<String>,
    filter_input: String,
    cycle_input: String,
    status: Option<Status>,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

enum Status {
    Info(String),
    Error(String),
}

impl DepgraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: LaunchConfig) -> Self {
        let state = Self::start_load(&config);
        Self { config, state }
    }

    fn start_load(config: &LaunchConfig) -> AppState {
        let (tx, rx) = mpsc::channel();
        let config = config.clone();

        thread::spawn(move || {
            let result = load_session(&config).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        AppState::Loading { rx }
    }
}

fn load_session(config: &LaunchConfig) -> Result<LoadedGraph> {
    let input = load_graph_input(&config.graph_path)?;
    let (session, summary) = Session::from_input(&input, Palette::default())
        .with_context(|| format!("invalid graph in {}", config.graph_path.display()))?;

    let catalog = match &config.scenarios_path {
        Some(path) => {
            let catalog = ScenarioCatalog::from_input(load_scenario_catalog(path)?);
            info!(
                scenarios = catalog.scenarios().len(),
                "loaded cycle scenarios from {}",
                path.display()
            );
            catalog
        }
        None => ScenarioCatalog::default(),
    };

    Ok(LoadedGraph {
        session: session.with_catalog(catalog).with_wave_config(config.waves),
        summary,
    })
}

impl ViewModel {
    fn new(loaded: LoadedGraph, config: &LaunchConfig) -> Self {
        let LoadedGraph {
            mut session,
            summary,
        } = loaded;
        let strategy = config
            .strategy
            .unwrap_or_else(|| LayoutStrategy::for_node_count(summary.nodes));
        let layout = session.start_layout(strategy, config.layout, config.seed);
        let layout_progress = layout.progress();
        let zoom = 1.0 / ((summary.nodes.max(1) as f32).sqrt() * 0.12).max(1.0);

        Self {
            session,
            summary,
            layout,
            layout_progress,
            pan: Vec2::ZERO,
            zoom,
            selected: None,
            filter_input: String::new(),
            cycle_input: String::new(),
            status: None,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }
}

impl eframe::App for DepgraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(loaded) => {
                            AppState::Ready(Box::new(ViewModel::new(loaded, &self.config)))
                        }
                        Err(message) => {
                            error!("{message}");
                            AppState::Error(message)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading dependency graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load dependency graph");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.config));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
