// animation.rs - easing, tween clocks and the single camera-animation slot

use crate::host::{FrameId, FrameScheduler, FrameTask};
use glam::{Quat, Vec3};

pub const INTRO_DURATION: f64 = 6.0;
/// The intro starts this many resting distances away.
pub const INTRO_START_FACTOR: f32 = 5.0;
pub const FOCUS_DURATION: f64 = 1.2;
/// Idle auto-rotation resumes this long after a focus finishes.
pub const AUTO_ROTATE_RESUME_DELAY: f64 = 3.0;

pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

/// Linear 0..1 clock over `duration` seconds starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub start: f64,
    pub duration: f64,
}

impl Tween {
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    /// True once the animation has reached its end pose at `now`.
    pub fn finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Eases the camera distance from `INTRO_START_FACTOR * resting` down to
/// `resting`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroZoom {
    pub tween: Tween,
    pub resting_distance: f32,
}

impl IntroZoom {
    pub fn new(now: f64, resting_distance: f32) -> Self {
        Self {
            tween: Tween::new(now, INTRO_DURATION),
            resting_distance,
        }
    }

    pub fn start_distance(&self) -> f32 {
        self.resting_distance * INTRO_START_FACTOR
    }

    pub fn distance(&self, now: f64) -> f32 {
        let ease = ease_out_quad(self.tween.progress(now));
        let start = self.start_distance();
        start - (start - self.resting_distance) * ease
    }

    /// Follow a new resting distance after a resize, keeping the clock.
    pub fn retarget(&mut self, resting_distance: f32) {
        self.resting_distance = resting_distance;
    }
}

/// Swings the camera around the origin onto a new direction. The rotation
/// preserves the distance to the center at every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTransition {
    pub tween: Tween,
    pub index: usize,
    from_position: Vec3,
    from_target: Vec3,
    rotation: Quat,
}

impl FocusTransition {
    /// `None` when either direction is degenerate.
    pub fn new(now: f64, index: usize, from_position: Vec3, from_target: Vec3, toward: Vec3) -> Option<Self> {
        let from_dir = from_position.try_normalize()?;
        let to_dir = toward.try_normalize()?;
        Some(Self {
            tween: Tween::new(now, FOCUS_DURATION),
            index,
            from_position,
            from_target,
            rotation: Quat::from_rotation_arc(from_dir, to_dir),
        })
    }

    /// Camera position and look-at target at `now`.
    pub fn sample(&self, now: f64) -> (Vec3, Vec3) {
        let e = ease_in_out_cubic(self.tween.progress(now));
        let position = Quat::IDENTITY.slerp(self.rotation, e) * self.from_position;
        let target = self.from_target.lerp(Vec3::ZERO, e);
        (position, target)
    }

    /// Scale the preserved distance, e.g. when the viewport refit changes.
    pub fn rescale(&mut self, factor: f32) {
        self.from_position *= factor;
    }

    pub fn end_position(&self) -> Vec3 {
        self.rotation * self.from_position
    }
}

/// The animations that write the camera position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAnimation {
    Intro(IntroZoom),
    Focus(FocusTransition),
}

impl CameraAnimation {
    fn frame_task(&self) -> FrameTask {
        match self {
            CameraAnimation::Intro(_) => FrameTask::IntroZoom,
            CameraAnimation::Focus(_) => FrameTask::Focus,
        }
    }

    /// True once the animation has reached its end pose at `now`.
    pub fn finished(&self, now: f64) -> bool {
        match self {
            CameraAnimation::Intro(a) => a.tween.finished(now),
            CameraAnimation::Focus(a) => a.tween.finished(now),
        }
    }
}

/// Holds at most one camera animation. Starting a new one cancels the
/// previous one first, so two animations never write the camera in the same
/// frame.
#[derive(Debug, Default)]
pub struct AnimationSlot {
    active: Option<(CameraAnimation, FrameId)>,
}

impl AnimationSlot {
    /// Returns the animation that was displaced, if any.
    pub fn start(&mut self, animation: CameraAnimation, frames: &mut FrameScheduler) -> Option<CameraAnimation> {
        let previous = self.cancel(frames);
        let id = frames.request(animation.frame_task());
        self.active = Some((animation, id));
        previous
    }

    pub fn cancel(&mut self, frames: &mut FrameScheduler) -> Option<CameraAnimation> {
        let (animation, id) = self.active.take()?;
        frames.cancel(id);
        Some(animation)
    }

    pub fn current(&self) -> Option<&CameraAnimation> {
        self.active.as_ref().map(|(a, _)| a)
    }

    pub fn current_mut(&mut self) -> Option<&mut CameraAnimation> {
        self.active.as_mut().map(|(a, _)| a)
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}
