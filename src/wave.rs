use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eframe::egui::{Color32, Vec2};
use tracing::debug;

use crate::graph::GraphModel;
use crate::scenario::CycleScenario;

/// A gap between frames longer than this (a suspended window, a debugger
/// pause) resynchronises the clock instead of being integrated.
pub const MAX_FRAME_GAP: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    pub waves_per_edge: usize,
    pub speed: f32,
    pub spread: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            waves_per_edge: 2,
            speed: 0.6,
            spread: 0.3,
        }
    }
}

/// One pulse travelling along one edge of one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub cycle: usize,
    pub edge: usize,
    pub from: usize,
    pub to: usize,
    pub progress: f32,
    pub color: Color32,
}

/// The visible part of a wave in world space: transparent at `start` and
/// `end`, opaque at `peak`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSegment {
    pub start: Vec2,
    pub peak: Vec2,
    pub end: Vec2,
    pub color: Color32,
}

/// Cancellation token for the per-frame animation task. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct FrameHandle {
    cancelled: Arc<AtomicBool>,
}

impl FrameHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct WaveSystem {
    waves: Vec<Wave>,
    config: WaveConfig,
    last_frame: Option<f64>,
    handle: FrameHandle,
}

impl WaveSystem {
    /// Seeds evenly staggered waves on every edge of every visible cycle.
    /// Edges whose endpoints are not in `graph` get no waves.
    pub fn initialize(
        graph: &GraphModel,
        scenario: &CycleScenario,
        visible: &[bool],
        config: WaveConfig,
    ) -> Self {
        let per_edge = config.waves_per_edge.max(1);
        let mut waves = Vec::new();

        for (cycle_index, cycle) in scenario.cycles.iter().enumerate() {
            if !visible.get(cycle_index).copied().unwrap_or(false) {
                continue;
            }

            for (edge_index, (from, to)) in cycle.edges.iter().enumerate() {
                let (Some(from), Some(to)) = (graph.index_of(from), graph.index_of(to)) else {
                    continue;
                };

                for slot in 0..per_edge {
                    waves.push(Wave {
                        cycle: cycle_index,
                        edge: edge_index,
                        from,
                        to,
                        progress: slot as f32 / per_edge as f32,
                        color: cycle.color,
                    });
                }
            }
        }

        debug!(waves = waves.len(), "wave system initialized");
        Self {
            waves,
            config,
            last_frame: None,
            handle: FrameHandle::default(),
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn handle(&self) -> FrameHandle {
        self.handle.clone()
    }

    /// Cancels the frame task. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.handle.is_cancelled() {
            debug!("wave animation stopped");
        }
        self.handle.cancel();
    }

    /// Advances by the wall-clock time since the previous frame and reports
    /// whether the host should schedule another frame. The first frame only
    /// records the timestamp.
    pub fn tick(&mut self, now_secs: f64) -> bool {
        if self.handle.is_cancelled() {
            return false;
        }

        let delta = match self.last_frame {
            Some(last) => {
                let gap = now_secs - last;
                if (0.0..=MAX_FRAME_GAP).contains(&gap) {
                    gap as f32
                } else {
                    debug!(gap, "frame clock resynchronised");
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_frame = Some(now_secs);
        self.advance(delta);

        !self.handle.is_cancelled()
    }

    /// Moves every wave `speed * delta` along its edge; a wave that leaves
    /// past `1 + spread/2` re-enters from `-spread/2`, carrying the overshoot.
    pub fn advance(&mut self, delta_secs: f32) {
        let spread = self.config.spread.max(0.0);
        let half_spread = spread * 0.5;
        let span = 1.0 + spread;
        let step = self.config.speed * delta_secs;
        for wave in &mut self.waves {
            wave.progress += step;
            if wave.progress > 1.0 + half_spread {
                wave.progress = (wave.progress + half_spread).rem_euclid(span) - half_spread;
            }
        }
    }

    /// Visible wave pieces for the current node positions. Waves entirely
    /// outside their edge are skipped.
    pub fn segments(&self, graph: &GraphModel) -> Vec<WaveSegment> {
        let half_spread = self.config.spread * 0.5;
        self.waves
            .iter()
            .filter_map(|wave| {
                let head = wave.progress + half_spread;
                let tail = wave.progress - half_spread;
                if head <= 0.0 || tail >= 1.0 {
                    return None;
                }

                let from = graph.node(wave.from)?.position();
                let to = graph.node(wave.to)?.position();
                let at = |t: f32| from + (to - from) * t;

                let start = tail.clamp(0.0, 1.0);
                let end = head.clamp(0.0, 1.0);
                Some(WaveSegment {
                    start: at(start),
                    peak: at(wave.progress.clamp(start, end)),
                    end: at(end),
                    color: wave.color,
                })
            })
            .collect()
    }
}

impl Drop for WaveSystem {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
