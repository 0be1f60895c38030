use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::layout::LAYOUT_BOUND;
use crate::records::Color;

pub(super) const NODE_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
pub(super) const NODE_WORLD_RADIUS: f32 = 0.05;

pub(super) fn edge_color(color: Color) -> Color32 {
    let [r, g, b] = color.rgb();
    Color32::from_rgba_unmultiplied(r, g, b, 204)
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(250, 250, 250));

    let step = (pixels_per_unit(rect) * 0.5 * zoom).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(200, 205, 210, 120));

    let mut x = origin.x.rem_euclid(step) + rect.left();
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step) + rect.top();
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Screen pixels per layout unit at zoom 1, fitting `[-LAYOUT_BOUND, LAYOUT_BOUND]`.
pub(super) fn pixels_per_unit(rect: Rect) -> f32 {
    (rect.width().min(rect.height()) / (2.0 * LAYOUT_BOUND)).max(1.0)
}

/// Layout space has y pointing up; the screen has it pointing down.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + vec2(world.x, -world.y) * pixels_per_unit(rect) * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    let local = (screen - rect.center() - pan) / (pixels_per_unit(rect) * zoom);
    vec2(local.x, -local.y)
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
