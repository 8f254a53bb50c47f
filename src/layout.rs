// layout.rs - Fibonacci placement of orbs on the sphere surface

use crate::config::OrbConfig;
use glam::{Mat3, Quat, Vec2, Vec3};

/// Placeholder planes are shrunk relative to the base box.
pub const PLACEHOLDER_SCALE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Content,
    Placeholder,
}

/// One sphere position. Computed once per mount and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereItem {
    pub index: usize,
    pub position: Vec3,
    pub orientation: Quat,
    pub has_content: bool,
}

impl SphereItem {
    /// 1-based number used for asset paths and for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Point `i` of `n` on a sphere of radius `r`.
///
/// `phi = acos(-1 + 2i/n)` spreads points evenly from pole to pole and
/// `theta = sqrt(n * PI) * phi` winds them into a spiral.
pub fn fibonacci_point(i: usize, n: usize, r: f32) -> Vec3 {
    let n_f = n as f64;
    let phi = (-1.0 + (2.0 * i as f64) / n_f).acos();
    let theta = (n_f * std::f64::consts::PI).sqrt() * phi;

    Vec3::new(
        (r as f64 * theta.cos() * phi.sin()) as f32,
        (r as f64 * theta.sin() * phi.sin()) as f32,
        (r as f64 * phi.cos()) as f32,
    )
}

/// Rotation whose local +Z is the outward normal at `position`.
///
/// Equivalent to looking at the origin and then turning half way round the
/// local vertical axis.
pub fn facing_outward(position: Vec3) -> Quat {
    let z = position.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let up = if z.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let x = up.cross(z).normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Fit an image of aspect `w / h` inside the `(base_width, base_height)` box.
pub fn plane_size(image_aspect: f32, base_width: f32, base_height: f32) -> Vec2 {
    if !image_aspect.is_finite() || image_aspect <= 0.0 {
        return Vec2::new(base_width, base_height);
    }
    if image_aspect > 1.0 {
        Vec2::new(base_width, base_width / image_aspect)
    } else {
        Vec2::new(base_width * image_aspect, base_height)
    }
}

pub fn placeholder_size(base_width: f32, base_height: f32) -> Vec2 {
    Vec2::new(base_width, base_height) * PLACEHOLDER_SCALE
}

pub fn layout_items(config: &OrbConfig) -> Vec<SphereItem> {
    let n = config.total_items;
    let content = config.content_count();

    (0..n)
        .map(|index| {
            let position = fibonacci_point(index, n, config.sphere_radius);
            SphereItem {
                index,
                position,
                orientation: facing_outward(position),
                has_content: index < content,
            }
        })
        .collect()
}
