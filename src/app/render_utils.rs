use eframe::egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use depgraph::wave::WaveSegment;

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 50));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn node_screen_radius(size: f32, zoom: f32) -> f32 {
    (size * zoom.powf(0.6)).clamp(1.5, 40.0)
}

fn push_gradient_quad(
    mesh: &mut Mesh,
    from: Pos2,
    to: Pos2,
    normal: Vec2,
    from_color: Color32,
    to_color: Color32,
) {
    if (to - from).length_sq() <= f32::EPSILON {
        return;
    }

    let base = mesh.vertices.len() as u32;
    mesh.colored_vertex(from + normal, from_color);
    mesh.colored_vertex(from - normal, from_color);
    mesh.colored_vertex(to + normal, to_color);
    mesh.colored_vertex(to - normal, to_color);
    mesh.add_triangle(base, base + 1, base + 2);
    mesh.add_triangle(base + 1, base + 3, base + 2);
}

/// Paints one wave pulse: transparent at both ends, opaque at the peak.
pub(super) fn paint_wave(painter: &Painter, segment: [Pos2; 3], color: Color32, width: f32) {
    let [start, peak, end] = segment;
    let span = end - start;
    if span.length_sq() <= f32::EPSILON {
        return;
    }

    let normal = span.normalized().rot90() * (width * 0.5);
    let mut mesh = Mesh::default();
    push_gradient_quad(&mut mesh, start, peak, normal, Color32::TRANSPARENT, color);
    push_gradient_quad(&mut mesh, peak, end, normal, color, Color32::TRANSPARENT);
    if !mesh.is_empty() {
        painter.add(Shape::mesh(mesh));
    }
}

pub(super) fn wave_to_screen(rect: Rect, pan: Vec2, zoom: f32, segment: &WaveSegment) -> [Pos2; 3] {
    [
        world_to_screen(rect, pan, zoom, segment.start),
        world_to_screen(rect, pan, zoom, segment.peak),
        world_to_screen(rect, pan, zoom, segment.end),
    ]
}
