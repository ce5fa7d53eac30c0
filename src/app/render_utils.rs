use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2};
use glam::{Mat4, Vec3};

use crate::util::mix_color;

const FOG_NEAR: f32 = 400.0;
const FOG_FAR: f32 = 1600.0;

pub(super) fn fog_color(color: Color32, background: Color32, depth: f32) -> Color32 {
    let amount = ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0);
    mix_color(color, background, amount)
}

pub(super) fn project_to_screen(view_projection: &Mat4, rect: Rect, world: Vec3) -> Option<Pos2> {
    let clip = *view_projection * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }

    let ndc = clip.truncate() / clip.w;
    if !ndc.is_finite() || ndc.z < 0.0 || ndc.z > 1.0 {
        return None;
    }

    Some(pos2(
        rect.center().x + ndc.x * rect.width() * 0.5,
        rect.center().y - ndc.y * rect.height() * 0.5,
    ))
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let min_x = start.x.min(end.x);
    let max_x = start.x.max(end.x);
    let min_y = start.y.min(end.y);
    let max_y = start.y.max(end.y);
    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn polygon_points(center: Pos2, radius: f32, sides: u32) -> Vec<Pos2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / sides as f32
                - std::f32::consts::FRAC_PI_2;
            center + Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
