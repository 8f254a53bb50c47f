// camera.rs - perspective camera, sphere fit distance and orbit controls

use glam::{Mat4, Vec3};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Closest the controls may zoom, as a multiple of the sphere radius.
pub const MIN_DISTANCE_FACTOR: f32 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov,
            aspect: 1.0,
            near: NEAR,
            far: FAR,
        }
    }

    /// Distance from the sphere center.
    pub fn distance(&self) -> f32 {
        self.position.length()
    }

    /// Updates the aspect ratio. Degenerate viewports are ignored so the
    /// projection never picks up NaN or infinity.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn view(&self) -> Mat4 {
        let forward = (self.target - self.position).normalize_or_zero();
        // 相机正对极点时换一个 up，避免 look_at 退化
        let up = if forward.cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub radius: f32,
    pub fit_margin: f32,
    pub initial_view_scale: f32,
    pub max_distance_multiplier: f32,
}

/// Resolved framing for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Distance at which the whole sphere plus margin is visible.
    pub base_distance: f32,
    /// Where the camera settles after the intro zoom.
    pub resting_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Fit {
    /// `None` when the aspect ratio or field of view cannot produce a finite
    /// distance (zero-height container, degenerate fov).
    pub fn compute(params: &FitParams, fov_deg: f32, aspect: f32) -> Option<Fit> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return None;
        }
        let half_tan = (fov_deg.to_radians() * 0.5).tan();
        if !half_tan.is_finite() || half_tan <= 0.0 {
            return None;
        }

        let reach = params.radius * params.fit_margin;
        let dist_vertical = reach / half_tan;
        let dist_horizontal = reach / (half_tan * aspect);
        let base_distance = dist_vertical.max(dist_horizontal);
        let resting_distance = base_distance * params.initial_view_scale;

        Some(Fit {
            base_distance,
            resting_distance,
            min_distance: params.radius * MIN_DISTANCE_FACTOR,
            max_distance: resting_distance * params.max_distance_multiplier,
        })
    }

    pub fn clamp(&self, distance: f32) -> f32 {
        // max 在极端配置下可能小于 min，以 min 为准
        distance.min(self.max_distance).max(self.min_distance)
    }
}

/// Orbit controls around `target` with damping and optional auto-rotation.
/// Pan is not supported.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub auto_rotate: bool,
    /// 2.0 means one revolution per 30 s.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    theta_delta: f32,
    phi_delta: f32,
    zoom_scale: f32,
}

const POLE_EPS: f32 = 1e-6;

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            damping_factor: 0.05,
            rotate_speed: 1.2,
            zoom_speed: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            zoom_scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn set_limits(&mut self, fit: &Fit) {
        self.min_distance = fit.min_distance;
        self.max_distance = fit.max_distance.max(fit.min_distance);
    }

    /// Drag by `dx, dy` pixels in a viewport `height` pixels tall.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let per_px = std::f32::consts::TAU / height * self.rotate_speed;
        self.theta_delta -= dx * per_px;
        self.phi_delta -= dy * per_px;
    }

    /// Positive `steps` zooms in.
    pub fn zoom(&mut self, steps: f32) {
        let factor = 0.95f32.powf(self.zoom_speed * steps.abs());
        if steps > 0.0 {
            self.zoom_scale *= factor;
        } else if steps < 0.0 {
            self.zoom_scale /= factor;
        }
    }

    /// Drop pending drag/zoom momentum.
    pub fn stop(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.zoom_scale = 1.0;
    }

    /// Apply one frame of rotation/zoom to `camera`.
    ///
    /// `distance_override` replaces the post-zoom radius; the intro zoom uses
    /// it so that it drives distance while auto-rotation keeps turning.
    pub fn update(&mut self, camera: &mut Camera, dt: f32, distance_override: Option<f32>) {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        // y-up spherical coordinates
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if self.auto_rotate {
            self.theta_delta -= std::f32::consts::TAU / 60.0 * self.auto_rotate_speed * dt.max(0.0);
        }

        theta += self.theta_delta * self.damping_factor;
        phi += self.phi_delta * self.damping_factor;
        phi = phi.clamp(POLE_EPS, std::f32::consts::PI - POLE_EPS);

        radius = match distance_override {
            Some(d) => d,
            None => (radius * self.zoom_scale).clamp(self.min_distance, self.max_distance),
        };

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());
        camera.position = self.target + new_offset;
        camera.target = self.target;

        self.theta_delta *= 1.0 - self.damping_factor;
        self.phi_delta *= 1.0 - self.damping_factor;
        self.zoom_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FitParams {
        FitParams {
            radius: 7.0,
            fit_margin: 1.1,
            initial_view_scale: 0.9,
            max_distance_multiplier: 6.0,
        }
    }

    #[test]
    fn fit_uses_vertical_extent_on_wide_viewports() {
        let fit = Fit::compute(&params(), 75.0, 16.0 / 9.0).unwrap();
        let expected = 7.0 * 1.1 / (37.5f32.to_radians()).tan();
        assert!((fit.base_distance - expected).abs() < 1e-4);
        assert!((fit.resting_distance - expected * 0.9).abs() < 1e-4);
        assert!((fit.max_distance - expected * 0.9 * 6.0).abs() < 1e-3);
        assert!((fit.min_distance - 7.35).abs() < 1e-5);
    }

    #[test]
    fn fit_uses_horizontal_extent_on_tall_viewports() {
        let aspect = 0.5;
        let fit = Fit::compute(&params(), 75.0, aspect).unwrap();
        let expected = 7.0 * 1.1 / ((37.5f32.to_radians()).tan() * aspect);
        assert!((fit.base_distance - expected).abs() < 1e-4);
    }

    #[test]
    fn fit_rejects_degenerate_aspect() {
        assert!(Fit::compute(&params(), 75.0, 0.0).is_none());
        assert!(Fit::compute(&params(), 75.0, f32::INFINITY).is_none());
        assert!(Fit::compute(&params(), 75.0, f32::NAN).is_none());
    }

    #[test]
    fn zero_height_viewport_is_ignored() {
        let mut cam = Camera::new(75.0);
        assert!(!cam.set_viewport(800, 0));
        assert_eq!(cam.aspect, 1.0);
        assert!(cam.projection().is_finite());
    }

    #[test]
    fn auto_rotate_keeps_distance() {
        let mut cam = Camera::new(75.0);
        cam.position = Vec3::new(3.0, 2.0, 20.0);
        let before = cam.distance();

        let mut controls = OrbitControls {
            max_distance: 100.0,
            ..OrbitControls::default()
        };
        for _ in 0..120 {
            controls.update(&mut cam, 1.0 / 60.0, None);
        }
        assert!((cam.distance() - before).abs() < 1e-3);
        assert!(cam.position != Vec3::new(3.0, 2.0, 20.0));
    }

    #[test]
    fn zoom_respects_limits() {
        let mut cam = Camera::new(75.0);
        cam.position = Vec3::new(0.0, 0.0, 10.0);
        let mut controls = OrbitControls {
            auto_rotate: false,
            min_distance: 7.35,
            max_distance: 12.0,
            ..OrbitControls::default()
        };
        for _ in 0..100 {
            controls.zoom(5.0);
            controls.update(&mut cam, 0.016, None);
        }
        assert!((cam.distance() - 7.35).abs() < 1e-4);

        for _ in 0..100 {
            controls.zoom(-5.0);
            controls.update(&mut cam, 0.016, None);
        }
        assert!((cam.distance() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn distance_override_wins() {
        let mut cam = Camera::new(75.0);
        let mut controls = OrbitControls::default();
        controls.update(&mut cam, 0.016, Some(42.0));
        assert!((cam.distance() - 42.0).abs() < 1e-3);
    }
}
