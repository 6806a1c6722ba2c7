//! End-to-end behaviour of the interaction modes over a shared graph.

use std::collections::HashSet;

use depgraph::input::{parse_graph_input, parse_scenario_catalog};
use depgraph::layout::{LayoutConfig, LayoutStrategy};
use depgraph::scenario::ScenarioCatalog;
use depgraph::wave::WaveConfig;
use depgraph::{EngineError, GraphModel, Mode, Palette, Session};

const CHAIN: &str = r#"{
    "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
    "edges": [{"source": "A", "target": "B"}, {"source": "B", "target": "C"}]
}"#;

const RING: &str = r#"{
    "nodes": [{"id": "gcc", "isBase": true}, {"id": "glibc", "isBase": true},
              {"id": "binutils"}, {"id": "zlib"}, {"id": "python"}, {"id": "unused"}],
    "edges": [{"source": "gcc", "target": "glibc"}, {"source": "glibc", "target": "gcc"},
              {"source": "gcc", "target": "binutils"}, {"source": "binutils", "target": "zlib"},
              {"source": "zlib", "target": "binutils"}, {"source": "python", "target": "zlib"},
              {"source": "python", "target": "unused"}]
}"#;

const SCENARIOS: &str = r##"{"scenarios": [
    {"id": "toolchain", "queriedPackages": ["gcc", "zlib"], "intermediateNodes": ["python"],
     "cycles": [
        {"id": "libc", "nodes": ["gcc", "glibc"], "color": "#ff4040",
         "edges": [{"from": "gcc", "to": "glibc"}, {"from": "glibc", "to": "gcc"}]},
        {"id": "compress", "nodes": ["binutils", "zlib"], "color": "#40a0ff",
         "edges": [{"from": "binutils", "to": "zlib"}, {"from": "zlib", "to": "binutils"}]}
     ]},
    {"id": "stale", "queriedPackages": ["python"],
     "cycles": [{"id": "gone", "nodes": ["python", "perl"], "color": "#00ff00",
                 "edges": [{"from": "python", "to": "perl"}, {"from": "perl", "to": "python"}]}]}
]}"##;

fn session(raw: &str) -> Session {
    let input = parse_graph_input(raw).unwrap();
    let (session, _) = Session::from_input(&input, Palette::default()).unwrap();
    session.with_catalog(ScenarioCatalog::from_input(parse_scenario_catalog(SCENARIOS).unwrap()))
}

fn assert_baseline(graph: &GraphModel) {
    for node in graph.nodes() {
        assert_eq!(node.color(), node.original().color, "{}", node.id());
        assert_eq!(node.size(), node.original().size, "{}", node.id());
        assert!(!node.is_hidden(), "{}", node.id());
    }
    for edge in graph.edges() {
        assert_eq!(edge.visual(), edge.original());
    }
}

fn ids<'a>(session: &'a Session, indices: &[usize]) -> Vec<&'a str> {
    let mut ids = indices
        .iter()
        .map(|&index| session.graph().id_of(index).unwrap())
        .collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}

#[test]
fn select_then_clear_on_chain() {
    let mut session = session(CHAIN);

    let selection = session.select_node("B").unwrap().clone();
    assert_eq!(ids(&session, &selection.dependencies), vec!["C"]);
    assert_eq!(ids(&session, &selection.dependents), vec!["A"]);
    assert_eq!(session.connected_ids(), vec!["A", "B", "C"]);
    assert_eq!(session.mode(), Mode::NodeSelected);

    session.clear_selection();
    assert_eq!(session.mode(), Mode::Idle);
    assert_baseline(session.graph());
}

#[test]
fn connected_set_matches_neighbourhood_for_every_node() {
    let mut session = session(RING);
    let ids = session
        .graph()
        .nodes()
        .iter()
        .map(|node| node.id().to_owned())
        .collect::<Vec<_>>();

    for id in ids {
        let index = session.graph().index_of(&id).unwrap();
        let mut expected = HashSet::from([index]);
        expected.extend(session.graph().out_neighbors(index).iter().copied());
        expected.extend(session.graph().in_neighbors(index).iter().copied());

        let selection = session.select_node(&id).unwrap();
        assert_eq!(selection.connected, expected);
        assert_eq!(session.connected(), expected);
    }
}

#[test]
fn selecting_unknown_node_is_a_no_op() {
    let mut session = session(CHAIN);
    session.select_node("A").unwrap();
    let before = session.state().clone();

    assert!(session.select_node("nope").is_none());
    assert_eq!(session.state(), &before);
}

#[test]
fn filter_on_chain_hides_the_far_end() {
    let mut session = session(CHAIN);
    let summary = session.apply_filter(&["A"]).unwrap();
    assert_eq!(summary.packages, 2);
    assert_eq!(summary.edges, 1);

    let graph = session.graph();
    assert!(!graph.node_by_id("A").unwrap().is_hidden());
    assert!(!graph.node_by_id("B").unwrap().is_hidden());
    assert!(graph.node_by_id("C").unwrap().is_hidden());

    let ab = graph.edge_between(0, 1).unwrap();
    let bc = graph.edge_between(1, 2).unwrap();
    assert!(!graph.edge(ab).unwrap().is_hidden());
    assert!(graph.edge(bc).unwrap().is_hidden());
    assert_eq!(session.connected_ids(), vec!["A", "B"]);

    session.clear_filter();
    assert_baseline(session.graph());
}

#[test]
fn filter_visibility_invariants() {
    let mut session = session(RING);
    session.apply_filter(&["zlib", "ghost"]).unwrap();
    let expanded = session.connected();
    let graph = session.graph();
    let seed = graph.index_of("zlib").unwrap();

    for index in &expanded {
        let one_hop = *index == seed
            || graph.out_neighbors(seed).contains(index)
            || graph.in_neighbors(seed).contains(index);
        assert!(one_hop);
    }
    for (index, node) in graph.nodes().iter().enumerate() {
        assert_eq!(node.is_hidden(), !expanded.contains(&index), "{}", node.id());
    }
    for edge in graph.edges().iter().filter(|edge| !edge.is_hidden()) {
        assert!(expanded.contains(&edge.source()) && expanded.contains(&edge.target()));
    }
}

#[test]
fn failed_filter_keeps_previous_mode() {
    let mut session = session(CHAIN);
    session.select_node("B").unwrap();

    let error = session.apply_filter(&["X", " "]).unwrap_err();
    assert!(matches!(error, EngineError::NoValidPackages { .. }));
    assert_eq!(session.mode(), Mode::NodeSelected);
    assert_eq!(session.connected_ids(), vec!["A", "B", "C"]);
}

#[test]
fn selection_is_suppressed_while_filtered() {
    let mut session = session(CHAIN);
    session.apply_filter(&["A"]).unwrap();

    assert!(session.select_node("A").is_none());
    session.clear_selection();
    assert_eq!(session.mode(), Mode::SubgraphFiltered);
    assert!(session.graph().node_by_id("C").unwrap().is_hidden());
}

#[test]
fn cycle_mode_classifies_and_animates() {
    let mut session = session(RING);
    let summary = session.detect_cycles(&["zlib", "gcc"]).unwrap();
    assert_eq!(summary.scenario, "toolchain");
    assert_eq!(summary.cycles, 2);
    // gcc, glibc, binutils, zlib as cycle members plus python as intermediate.
    assert_eq!(summary.packages, 5);
    assert_eq!(summary.edges, 4);

    let graph = session.graph();
    assert!(graph.node_by_id("unused").unwrap().is_hidden());
    assert!(!graph.node_by_id("python").unwrap().is_hidden());
    assert_eq!(session.wave_system().unwrap().waves().len(), 8);
    assert!(session.frame(1.0));
    assert!(session.frame(1.016));

    let handle = session.frame_handle().unwrap();
    session.clear_cycles();
    assert!(handle.is_cancelled());
    assert!(!session.frame(2.0));
    assert!(session.wave_segments().is_empty());
    assert_baseline(session.graph());
}

#[test]
fn toggling_a_cycle_rebuilds_waves() {
    let mut session = session(RING);
    session.detect_cycles(&["gcc", "zlib"]).unwrap();
    let first_handle = session.frame_handle().unwrap();

    assert!(!session.toggle_cycle("libc").unwrap());
    assert!(first_handle.is_cancelled());
    assert_eq!(session.wave_system().unwrap().waves().len(), 4);
    assert_eq!(session.stats().shown_cycles, 1);
    assert_eq!(session.cycle_visibility(), vec![("libc", false), ("compress", true)]);

    let graph = session.graph();
    assert!(!graph.node_by_id("gcc").unwrap().is_hidden());
    assert!(graph.node_by_id("glibc").unwrap().is_hidden());

    assert!(session.toggle_cycle("libc").unwrap());
    assert_eq!(session.wave_system().unwrap().waves().len(), 8);
    assert_eq!(
        session.toggle_cycle("nope"),
        Err(EngineError::UnknownCycle("nope".to_owned()))
    );
}

#[test]
fn frames_advance_waves_by_real_elapsed_time() {
    let mut session = session(RING).with_wave_config(WaveConfig {
        waves_per_edge: 1,
        speed: 1.0,
        spread: 0.3,
    });
    session.detect_cycles(&["gcc", "zlib"]).unwrap();

    assert!(session.frame(0.0));
    for frame in 1..=3 {
        assert!(session.frame(f64::from(frame) * 0.25));
    }

    let waves = session.wave_system().unwrap().waves();
    assert_eq!(waves.len(), 4);
    for wave in waves {
        assert!((wave.progress - 0.75).abs() < 1e-5, "{}", wave.progress);
    }
}

#[test]
fn cycle_lookup_failures_leave_state_alone() {
    let mut session = session(RING);
    session.apply_filter(&["gcc"]).unwrap();
    let before = session.state().clone();

    assert_eq!(session.detect_cycles::<&str>(&[]), Err(EngineError::EmptyQuery));
    match session.detect_cycles(&["gcc"]) {
        Err(EngineError::NoMatchingScenario { query, known }) => {
            assert_eq!(query, vec!["gcc"]);
            assert_eq!(known, vec!["gcc, zlib", "python"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(
        session.detect_cycles(&["python"]),
        Err(EngineError::ScenarioValidation {
            scenario: "stale".to_owned(),
            missing: vec!["perl".to_owned()],
        })
    );

    assert_eq!(session.state(), &before);
    assert_eq!(session.mode(), Mode::SubgraphFiltered);
    assert_eq!(session.toggle_cycle("libc"), Err(EngineError::CycleModeInactive));
}

#[test]
fn switching_modes_tears_down_the_previous_one() {
    let mut session = session(RING);
    session.detect_cycles(&["gcc", "zlib"]).unwrap();
    let handle = session.frame_handle().unwrap();

    session.apply_filter(&["python"]).unwrap();
    assert!(handle.is_cancelled());
    assert!(session.wave_system().is_none());
    assert_eq!(session.mode(), Mode::SubgraphFiltered);
    assert!(!session.graph().node_by_id("unused").unwrap().is_hidden());
    assert!(session.graph().node_by_id("glibc").unwrap().is_hidden());

    session.detect_cycles(&["gcc", "zlib"]).unwrap();
    assert_eq!(session.mode(), Mode::CycleHighlighted);
    session.reset();
    assert_baseline(session.graph());
}

#[test]
fn stats_and_details() {
    let mut session = session(RING);
    let stats = session.stats();
    assert_eq!((stats.nodes, stats.edges), (6, 7));
    assert_eq!((stats.shown_packages, stats.shown_edges, stats.shown_cycles), (6, 7, 0));

    let details = session.node_details("gcc").unwrap();
    assert_eq!(details.dependencies, vec!["binutils", "glibc"]);
    assert_eq!(details.dependents, vec!["glibc"]);
    assert_eq!(details.out_degree(), 2);

    session.apply_filter(&["unused"]).unwrap();
    let stats = session.stats();
    assert_eq!(stats.mode, Mode::SubgraphFiltered);
    assert_eq!((stats.shown_packages, stats.shown_edges), (2, 1));
}

#[test]
fn layout_leaves_visual_state_alone() {
    let mut session = session(RING);
    session.select_node("zlib").unwrap();
    let state = session.state().clone();
    let colors = session
        .graph()
        .nodes()
        .iter()
        .map(|node| node.visual())
        .collect::<Vec<_>>();

    let mut run = session.start_layout(LayoutStrategy::Sampled, LayoutConfig::default(), Some(11));
    while !session.step_layout(&mut run).done {}

    assert_eq!(session.state(), &state);
    for (node, before) in session.graph().nodes().iter().zip(colors) {
        assert_eq!(node.visual(), before);
        assert!(node.position().x.is_finite());
    }
}
