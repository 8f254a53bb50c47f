// picker.rs - pointer position to orb index via ray / plane intersection

use crate::camera::Camera;
use glam::{Quat, Vec2, Vec3};

/// Screen-space rectangle of the render surface, in the same units as the
/// pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

/// Map a pointer position to normalized device coordinates in [-1, 1],
/// y up. `None` for an empty rect.
pub fn pointer_to_ndc(x: f32, y: f32, rect: &SurfaceRect) -> Option<Vec2> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    Some(Vec2::new(
        (x - rect.left) / rect.width * 2.0 - 1.0,
        -((y - rect.top) / rect.height) * 2.0 + 1.0,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the camera through `ndc`.
    pub fn from_camera(ndc: Vec2, camera: &Camera) -> Option<Ray> {
        let inv = camera.view_projection().inverse();
        if !inv.is_finite() {
            return None;
        }
        // wgpu 深度范围 0..1
        let far = inv.project_point3(ndc.extend(1.0));
        let direction = (far - camera.position).try_normalize()?;
        Some(Ray {
            origin: camera.position,
            direction,
        })
    }

    /// Distance along the ray to a double-sided rectangle centered at
    /// `center`, lying in the local XY plane of `orientation`, with
    /// `half_extents` already scaled.
    pub fn intersect_rect(&self, center: Vec3, orientation: Quat, half_extents: Vec2) -> Option<f32> {
        let normal = orientation * Vec3::Z;
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = normal.dot(center - self.origin) / denom;
        if t <= 0.0 {
            return None;
        }

        let local = orientation.inverse() * (self.origin + self.direction * t - center);
        if local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y {
            Some(t)
        } else {
            None
        }
    }
}

/// A pickable top-level plane.
pub trait Pickable {
    fn index(&self) -> usize;
    fn center(&self) -> Vec3;
    fn orientation(&self) -> Quat;
    /// Half width / height including any current scale.
    fn half_extents(&self) -> Vec2;
}

/// Index of the nearest plane the ray hits.
pub fn pick<'a, P, I>(ray: &Ray, items: I) -> Option<usize>
where
    P: Pickable + 'a,
    I: IntoIterator<Item = &'a P>,
{
    items
        .into_iter()
        .filter_map(|item| {
            ray.intersect_rect(item.center(), item.orientation(), item.half_extents())
                .map(|t| (t, item.index()))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, index)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plane {
        index: usize,
        center: Vec3,
        half: Vec2,
    }

    impl Pickable for Plane {
        fn index(&self) -> usize {
            self.index
        }
        fn center(&self) -> Vec3 {
            self.center
        }
        fn orientation(&self) -> Quat {
            Quat::IDENTITY
        }
        fn half_extents(&self) -> Vec2 {
            self.half
        }
    }

    fn camera_on_z(distance: f32) -> Camera {
        let mut cam = Camera::new(75.0);
        cam.position = Vec3::new(0.0, 0.0, distance);
        cam
    }

    #[test]
    fn ndc_covers_the_rect() {
        let rect = SurfaceRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(pointer_to_ndc(100.0, 50.0, &rect), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(pointer_to_ndc(300.0, 150.0, &rect), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(pointer_to_ndc(200.0, 100.0, &rect), Some(Vec2::ZERO));
        assert!(pointer_to_ndc(0.0, 0.0, &SurfaceRect::from_size(0.0, 10.0)).is_none());
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera_on_z(10.0);
        let ray = Ray::from_camera(Vec2::ZERO, &cam).unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn nearest_plane_wins() {
        let planes = [
            Plane { index: 3, center: Vec3::new(0.0, 0.0, -2.0), half: Vec2::splat(1.0) },
            Plane { index: 8, center: Vec3::new(0.0, 0.0, 2.0), half: Vec2::splat(1.0) },
        ];
        let ray = Ray::from_camera(Vec2::ZERO, &camera_on_z(10.0)).unwrap();
        assert_eq!(pick(&ray, &planes), Some(8));
    }

    #[test]
    fn planes_behind_the_camera_are_ignored() {
        let planes = [Plane { index: 1, center: Vec3::new(0.0, 0.0, 12.0), half: Vec2::splat(1.0) }];
        let ray = Ray::from_camera(Vec2::ZERO, &camera_on_z(10.0)).unwrap();
        assert_eq!(pick(&ray, &planes), None);
    }

    #[test]
    fn ray_outside_extents_misses() {
        let planes = [Plane { index: 0, center: Vec3::ZERO, half: Vec2::new(0.5, 0.5) }];
        let ray = Ray::from_camera(Vec2::new(0.9, 0.9), &camera_on_z(10.0)).unwrap();
        assert_eq!(pick(&ray, &planes), None);
    }
}
