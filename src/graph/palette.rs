use eframe::egui::Color32;

use super::{EdgeStyle, NodeStyle};

/// Colors and baseline sizes shared by every interaction mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub regular_node: Color32,
    pub base_node: Color32,
    pub edge: Color32,
    pub highlight: Color32,
    pub path: Color32,
    pub dimmed: Color32,
    pub dimmed_edge: Color32,
    pub queried: Color32,
    pub intermediate: Color32,
    pub node_size: f32,
    pub base_node_size: f32,
    pub edge_size: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            regular_node: Color32::from_rgb(90, 160, 220),
            base_node: Color32::from_rgb(235, 140, 60),
            edge: Color32::from_rgba_premultiplied(70, 80, 95, 150),
            highlight: Color32::from_rgb(255, 210, 70),
            path: Color32::from_rgb(80, 220, 140),
            dimmed: Color32::from_rgb(48, 54, 62),
            dimmed_edge: Color32::from_rgba_premultiplied(24, 27, 31, 60),
            queried: Color32::from_rgb(240, 90, 200),
            intermediate: Color32::from_rgb(150, 150, 170),
            node_size: 4.0,
            base_node_size: 6.0,
            edge_size: 0.6,
        }
    }
}

impl Palette {
    pub fn node_style(&self, is_base: bool) -> NodeStyle {
        if is_base {
            NodeStyle {
                is_base,
                color: self.base_node,
                size: self.base_node_size,
            }
        } else {
            NodeStyle {
                is_base,
                color: self.regular_node,
                size: self.node_size,
            }
        }
    }

    pub fn edge_style(&self) -> EdgeStyle {
        EdgeStyle {
            color: self.edge,
            size: self.edge_size,
        }
    }
}
