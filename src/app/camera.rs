use glam::{Mat4, Vec2, Vec3};

use crate::config::GraphConfig;
use crate::util::ease_in_out_cubic;

pub(in crate::app) const DEFAULT_FLIGHT_SECONDS: f32 = 1.5;
pub(in crate::app) const INTERACTION_DEPTH: f32 = 800.0;

const FOV_Y: f32 = std::f32::consts::PI / 3.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 2000.0;
const POLAR_EPSILON: f32 = 0.01;

struct Tween {
    from: Vec3,
    to: Vec3,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    fn advance(&mut self, delta_seconds: f32) -> Vec3 {
        self.elapsed += delta_seconds.max(0.0);
        self.sample()
    }

    fn sample(&self) -> Vec3 {
        if self.finished() {
            return self.to;
        }
        let t = ease_in_out_cubic(self.elapsed / self.duration);
        self.from.lerp(self.to, t)
    }

    fn finished(&self) -> bool {
        self.duration <= f32::EPSILON || self.elapsed >= self.duration
    }
}

#[derive(Clone, Copy)]
struct OrbitLimits {
    enable_pan: bool,
    enable_zoom: bool,
    enable_rotate: bool,
    min_distance: f32,
    max_distance: f32,
    min_polar: f32,
    max_polar: f32,
    min_azimuth: f32,
    max_azimuth: f32,
}

pub(in crate::app) struct OrbitCamera {
    position: Vec3,
    target: Vec3,
    limits: OrbitLimits,
    position_tween: Option<Tween>,
    target_tween: Option<Tween>,
}

impl OrbitCamera {
    pub fn new(config: &GraphConfig) -> Self {
        let polar_cap = std::f32::consts::PI - POLAR_EPSILON;
        let min_polar = config.controls.min_polar_angle.max(POLAR_EPSILON).min(polar_cap);
        let max_polar = config.controls.max_polar_angle.min(polar_cap).max(min_polar);
        let (min_azimuth, max_azimuth) = {
            let a = config.controls.min_azimuth_angle;
            let b = config.controls.max_azimuth_angle;
            if a <= b { (a, b) } else { (b, a) }
        };

        Self {
            position: Vec3::new(0.0, 0.0, 400.0),
            target: Vec3::ZERO,
            limits: OrbitLimits {
                enable_pan: config.controls.enable_pan,
                enable_zoom: config.controls.enable_zoom,
                enable_rotate: config.controls.enable_rotate,
                min_distance: config.graph.detail_view_distance,
                max_distance: config
                    .graph
                    .camera_max_distance
                    .max(config.graph.detail_view_distance),
                min_polar,
                max_polar,
                min_azimuth,
                max_azimuth,
            },
            position_tween: None,
            target_tween: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn fly_to(&mut self, position: Vec3, duration: f32) {
        self.position_tween = Some(Tween::new(self.position, position, duration));
    }

    pub fn look_at(&mut self, target: Vec3, duration: f32) {
        self.target_tween = Some(Tween::new(self.target, target, duration));
    }

    pub fn focus(&mut self, node_position: Vec3) {
        let direction = (self.position - node_position).normalize_or_zero();
        let direction = if direction == Vec3::ZERO {
            Vec3::Z
        } else {
            direction
        };
        let end = node_position + direction * self.limits.min_distance;
        self.fly_to(end, DEFAULT_FLIGHT_SECONDS);
        self.look_at(node_position, DEFAULT_FLIGHT_SECONDS);
    }

    pub fn update(&mut self, delta_seconds: f32) -> bool {
        if let Some(tween) = &mut self.position_tween {
            self.position = tween.advance(delta_seconds);
            if tween.finished() {
                self.position_tween = None;
            }
        }
        if let Some(tween) = &mut self.target_tween {
            self.target = tween.advance(delta_seconds);
            if tween.finished() {
                self.target_tween = None;
            }
        }
        self.position_tween.is_some() || self.target_tween.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.position_tween.is_some() || self.target_tween.is_some()
    }

    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        if !self.limits.enable_rotate {
            return;
        }
        self.position_tween = None;

        let offset = self.position - self.target;
        let radius = offset.length().max(NEAR);

        let mut azimuth = offset.x.atan2(offset.z) + delta_azimuth;
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos() + delta_polar;

        if self.limits.min_azimuth.is_finite() || self.limits.max_azimuth.is_finite() {
            azimuth = azimuth.clamp(self.limits.min_azimuth, self.limits.max_azimuth);
        }
        polar = polar.clamp(self.limits.min_polar, self.limits.max_polar);

        self.position = self.target
            + Vec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
    }

    pub fn zoom(&mut self, factor: f32) {
        if !self.limits.enable_zoom || factor <= 0.0 {
            return;
        }
        self.position_tween = None;

        let offset = self.position - self.target;
        let distance = (offset.length() * factor)
            .clamp(self.limits.min_distance, self.limits.max_distance);
        self.position = self.target + offset.normalize_or_zero() * distance;
    }

    pub fn pan(&mut self, delta: Vec2) {
        if !self.limits.enable_pan {
            return;
        }

        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let distance = (self.target - self.position).length();
        let scale = distance * 0.002;
        let shift = right * (-delta.x * scale) + up * (delta.y * scale);
        self.position += shift;
        self.target += shift;
        if let Some(tween) = &mut self.target_tween {
            tween.to += shift;
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let up = Vec3::Y;
        let projection = Mat4::perspective_rh(FOV_Y, aspect.max(0.01), NEAR, FAR);
        let view = Mat4::look_at_rh(self.position, self.target, up);
        projection * view
    }

    pub fn pointer_ray(&self, pointer_ndc: Vec2, aspect: f32) -> (Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let half_height = (FOV_Y * 0.5).tan();
        let half_width = half_height * aspect.max(0.01);
        let direction = (forward
            + right * (pointer_ndc.x * half_width)
            + up * (pointer_ndc.y * half_height))
            .normalize_or_zero();
        (self.position, direction)
    }

    pub fn interaction_point(&self, pointer_ndc: Vec2, aspect: f32) -> Vec3 {
        let (origin, direction) = self.pointer_ray(pointer_ndc, aspect);
        origin + direction * INTERACTION_DEPTH
    }

    pub fn view_distance(&self, world: Vec3) -> f32 {
        let forward = (self.target - self.position).normalize_or_zero();
        (world - self.position).dot(forward)
    }

    pub fn pixels_per_unit(&self, rect_height: f32, world: Vec3) -> f32 {
        let distance = self.view_distance(world).max(NEAR);
        (rect_height * 0.5) / ((FOV_Y * 0.5).tan() * distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;

    fn settle(camera: &mut OrbitCamera) {
        for _ in 0..400 {
            camera.update(1.0 / 60.0);
        }
    }

    #[test]
    fn fly_to_reaches_the_destination_without_moving_the_target() {
        let mut camera = OrbitCamera::new(&GraphConfig::default());
        let target_before = camera.target();

        camera.fly_to(Vec3::new(100.0, 50.0, 200.0), 1.5);
        settle(&mut camera);

        assert!(camera.position().distance(Vec3::new(100.0, 50.0, 200.0)) < 0.01);
        assert_eq!(camera.target(), target_before);
        assert!(!camera.is_animating());
    }

    #[test]
    fn look_at_reaches_the_new_target() {
        let mut camera = OrbitCamera::new(&GraphConfig::default());
        camera.look_at(Vec3::new(0.0, 0.0, -100.0), 1.5);
        settle(&mut camera);
        assert!(camera.target().distance(Vec3::new(0.0, 0.0, -100.0)) < 0.01);
    }

    #[test]
    fn a_new_flight_supersedes_the_old_one() {
        let mut camera = OrbitCamera::new(&GraphConfig::default());
        camera.fly_to(Vec3::new(1000.0, 0.0, 0.0), 1.5);
        camera.update(0.3);
        camera.fly_to(Vec3::new(0.0, 0.0, 50.0), 1.5);
        settle(&mut camera);
        assert!(camera.position().distance(Vec3::new(0.0, 0.0, 50.0)) < 0.01);
    }

    #[test]
    fn node_click_backs_off_along_the_prior_view_direction() {
        let config = GraphConfig::default();
        let detail = config.graph.detail_view_distance;
        let mut camera = OrbitCamera::new(&config);

        let node = Vec3::new(50.0, 50.0, 50.0);
        let prior_direction = (camera.position() - node).normalize();
        camera.focus(node);
        settle(&mut camera);

        assert!(camera.target().distance(node) < 0.01);
        let offset = camera.position() - node;
        assert!((offset.length() - detail).abs() < 0.01);
        assert!(offset.normalize().dot(prior_direction) > 0.999);
    }

    #[test]
    fn zoom_stays_inside_the_distance_shell() {
        let config = GraphConfig::default();
        let mut camera = OrbitCamera::new(&config);

        camera.zoom(0.0001);
        let near = (camera.position() - camera.target()).length();
        assert!((near - config.graph.detail_view_distance).abs() < 0.01);

        camera.zoom(100_000.0);
        let far = (camera.position() - camera.target()).length();
        assert!((far - config.graph.camera_max_distance).abs() < 0.01);
    }

    #[test]
    fn unbounded_azimuth_never_clamps() {
        let mut camera = OrbitCamera::new(&GraphConfig::default());
        let radius_before = (camera.position() - camera.target()).length();

        for _ in 0..100 {
            camera.orbit(0.5, 0.0);
        }

        let radius_after = (camera.position() - camera.target()).length();
        assert!((radius_after - radius_before).abs() < 0.5);
        assert!(camera.position().is_finite());
    }

    #[test]
    fn polar_orbit_respects_the_configured_bounds() {
        let mut config = GraphConfig::default();
        config.controls.min_polar_angle = 1.0;
        config.controls.max_polar_angle = 2.0;
        let mut camera = OrbitCamera::new(&config);

        camera.orbit(0.0, 10.0);
        let offset = camera.position() - camera.target();
        let polar = (offset.y / offset.length()).acos();
        assert!(polar <= 2.0 + 0.001);

        camera.orbit(0.0, -10.0);
        let offset = camera.position() - camera.target();
        let polar = (offset.y / offset.length()).acos();
        assert!(polar >= 1.0 - 0.001);
    }

    #[test]
    fn inverted_angle_bounds_do_not_panic() {
        let mut config = GraphConfig::default();
        config.controls.min_azimuth_angle = 2.0;
        config.controls.max_azimuth_angle = 1.0;
        config.controls.min_polar_angle = 3.14;
        config.graph.camera_max_distance = 10.0;
        config.graph.detail_view_distance = 40.0;
        let mut camera = OrbitCamera::new(&config);

        camera.orbit(0.1, 0.0);
        camera.orbit(0.0, 0.1);
        camera.zoom(0.5);
        assert!(camera.position().is_finite());
    }

    #[test]
    fn rotate_toggle_disables_orbit() {
        let mut config = GraphConfig::default();
        config.controls.enable_rotate = false;
        let mut camera = OrbitCamera::new(&config);
        let before = camera.position();
        camera.orbit(1.0, 1.0);
        assert_eq!(camera.position(), before);
    }

    #[test]
    fn pointer_ray_through_center_matches_the_view_direction() {
        let camera = OrbitCamera::new(&GraphConfig::default());
        let (origin, direction) = camera.pointer_ray(Vec2::ZERO, 16.0 / 9.0);
        assert_eq!(origin, camera.position());

        let forward = (camera.target() - camera.position()).normalize();
        assert!(direction.dot(forward) > 0.999);

        let point = camera.interaction_point(Vec2::ZERO, 16.0 / 9.0);
        assert!((point.distance(origin) - INTERACTION_DEPTH).abs() < 0.01);
    }
}
