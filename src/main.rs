mod app;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use depgraph::layout::{LayoutConfig, LayoutStrategy};
use depgraph::wave::WaveConfig;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    /// Pick from the node count.
    Auto,
    Sampled,
    BarnesHut,
}

impl LayoutChoice {
    fn strategy(self) -> Option<LayoutStrategy> {
        match self {
            Self::Auto => None,
            Self::Sampled => Some(LayoutStrategy::Sampled),
            Self::BarnesHut => Some(LayoutStrategy::BarnesHut),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Dependency graph JSON (`{"nodes": [...], "edges": [...]}`).
    #[arg(long, default_value = "graph.json")]
    graph: PathBuf,

    /// Cycle scenario catalog JSON.
    #[arg(long)]
    scenarios: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LayoutChoice::Auto)]
    layout: LayoutChoice,

    /// Fixed seed for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 300)]
    iterations: usize,

    /// Cycle pulse speed in edge lengths per second.
    #[arg(long, default_value_t = 0.6)]
    wave_speed: f32,

    /// Cycle pulse length as a fraction of its edge.
    #[arg(long, default_value_t = 0.3)]
    wave_spread: f32,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depgraph=info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> eframe::Result<()> {
    init_logging();

    let args = Args::parse();
    let config = app::LaunchConfig {
        graph_path: args.graph,
        scenarios_path: args.scenarios,
        strategy: args.layout.strategy(),
        seed: args.seed,
        layout: LayoutConfig {
            iterations: args.iterations,
            ..LayoutConfig::default()
        },
        waves: WaveConfig {
            speed: args.wave_speed,
            spread: args.wave_spread.max(0.0),
            ..WaveConfig::default()
        },
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "depgraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::DepgraphApp::new(cc, config)))),
    )
}
