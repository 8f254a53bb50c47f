// scene.rs - the orb sphere: lifecycle, framing, picking, selection sync
//
// One `OrbScene` owns everything it places (items, camera, controls, the
// asset channel) and registers a surface plus per-frame callbacks with the
// `Host` it is mounted into. `teardown` gives all of that back.

use crate::animation::{AnimationSlot, CameraAnimation, FocusTransition, IntroZoom, AUTO_ROTATE_RESUME_DELAY};
use crate::assets::{image_path, AssetEvent, AssetLoader};
use crate::camera::{Camera, Fit, FitParams, OrbitControls};
use crate::config::OrbConfig;
use crate::emphasis::{pulse_scale, Decoration, VisualState};
use crate::error::ConfigError;
use crate::host::{FrameId, FrameTask, Host, SurfaceId};
use crate::layout::{layout_items, placeholder_size, plane_size, ItemKind, SphereItem};
use crate::picker::{pick, pointer_to_ndc, Pickable, Ray, SurfaceRect};
use crate::selection::SelectionSink;
use glam::{Quat, Vec2, Vec3};
use image::RgbaImage;
use std::sync::Arc;

/// Flat fill of placeholder planes (#444444).
pub const PLACEHOLDER_COLOR: [f32; 3] = [68.0 / 255.0, 68.0 / 255.0, 68.0 / 255.0];

/// Longest frame step fed to the controls, so a stalled window does not
/// spin the sphere on resume.
const MAX_FRAME_STEP: f64 = 0.1;

#[derive(Debug, Clone)]
pub enum ItemSurface {
    Image(Arc<RgbaImage>),
    /// Flat colour; used for placeholders and failed loads.
    Flat,
}

/// An orb that has been added to the scene.
#[derive(Debug, Clone)]
pub struct PlacedItem {
    pub index: usize,
    pub kind: ItemKind,
    pub position: Vec3,
    pub orientation: Quat,
    pub size: Vec2,
    /// Current uniform scale (1 unless pulsing).
    pub scale: f32,
    pub surface: ItemSurface,
    /// `None` when borders are disabled.
    pub decoration: Option<Decoration>,
}

impl PlacedItem {
    fn new(item: &SphereItem, size: Vec2, surface: ItemSurface, show_borders: bool) -> Self {
        let kind = if item.has_content {
            ItemKind::Content
        } else {
            ItemKind::Placeholder
        };
        Self {
            index: item.index,
            kind,
            position: item.position,
            orientation: item.orientation,
            size,
            scale: 1.0,
            surface,
            decoration: show_borders.then(|| Decoration::new(kind)),
        }
    }

    pub fn visual_state(&self, selected: Option<usize>) -> VisualState {
        VisualState::of(self.index, selected)
    }
}

impl Pickable for PlacedItem {
    fn index(&self) -> usize {
        self.index
    }

    fn center(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn half_extents(&self) -> Vec2 {
        self.size * 0.5 * self.scale
    }
}

pub struct OrbScene {
    config: OrbConfig,
    background: [f32; 3],
    generation: u64,
    layout: Vec<SphereItem>,
    /// Indexed by orb index; `None` until the item's asset resolved.
    slots: Vec<Option<PlacedItem>>,
    camera: Camera,
    controls: OrbitControls,
    fit: Option<Fit>,
    viewport: (u32, u32),
    camera_anim: AnimationSlot,
    intro_done: bool,
    auto_rotate_resume_at: Option<f64>,
    applied_selection: Option<usize>,
    /// Selected orb whose asset has not resolved yet; focused once placed.
    pending_focus: Option<usize>,
    loader: AssetLoader,
    surface: Option<SurfaceId>,
    render_loop: Option<FrameId>,
    last_frame: Option<f64>,
}

impl OrbScene {
    /// Build the scene and mount it into `host`.
    pub fn mount(
        config: OrbConfig,
        loader: AssetLoader,
        host: &mut Host,
        viewport: (u32, u32),
        now: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let background = config.background_rgb()?;
        let mut camera = Camera::new(config.fov);
        camera.set_viewport(viewport.0, viewport.1);

        let mut scene = Self {
            config,
            background,
            generation: 0,
            layout: Vec::new(),
            slots: Vec::new(),
            camera,
            controls: OrbitControls::default(),
            fit: None,
            viewport,
            camera_anim: AnimationSlot::default(),
            intro_done: false,
            auto_rotate_resume_at: None,
            applied_selection: None,
            pending_focus: None,
            loader,
            surface: None,
            render_loop: None,
            last_frame: None,
        };
        scene.remount(host, now);
        Ok(scene)
    }

    /// Mount again after [`OrbScene::teardown`]. Any surface already in the
    /// container (from this or another mount) is removed first.
    pub fn remount(&mut self, host: &mut Host, now: f64) {
        if self.is_mounted() {
            self.teardown(host);
        }

        let stale = host.container.clear_surfaces();
        if stale > 0 {
            log::warn!("removed {stale} leftover render surface(s) before mounting");
        }
        self.surface = Some(host.container.attach_surface());
        self.render_loop = Some(host.frames.request(FrameTask::RenderLoop));
        self.generation += 1;
        self.loader.begin_generation(self.generation);
        self.last_frame = None;

        self.refit();
        let resting = self.resting_distance();
        self.controls = OrbitControls::default();
        if let Some(fit) = &self.fit {
            self.controls.set_limits(fit);
        }
        self.camera.target = Vec3::ZERO;
        if self.intro_done {
            self.camera.position = Vec3::new(0.0, 0.0, resting);
        } else {
            let intro = IntroZoom::new(now, resting);
            self.camera.position = Vec3::new(0.0, 0.0, intro.start_distance());
            self.camera_anim.start(CameraAnimation::Intro(intro), &mut host.frames);
        }

        self.layout = layout_items(&self.config);
        self.slots = vec![None; self.layout.len()];
        let (bw, bh) = (self.config.base_width, self.config.base_height);
        for item in &self.layout {
            if item.has_content {
                self.loader.request(
                    self.generation,
                    item.index,
                    image_path(&self.config.asset_dir, item.number()),
                );
            } else {
                let placed = PlacedItem::new(item, placeholder_size(bw, bh), ItemSurface::Flat, self.config.show_borders);
                self.slots[item.index] = Some(placed);
            }
        }
        self.reapply_decorations();

        log::info!(
            "orb sphere mounted: {} items, {} with content (generation {})",
            self.layout.len(),
            self.config.content_count(),
            self.generation
        );
    }

    /// Cancel all frame callbacks, drop every placed item and detach the
    /// surface. Safe to call repeatedly.
    pub fn teardown(&mut self, host: &mut Host) {
        self.camera_anim.cancel(&mut host.frames);
        if let Some(id) = self.render_loop.take() {
            host.frames.cancel(id);
        }
        if let Some(id) = self.surface.take() {
            host.container.detach_surface(id);
        }
        self.loader.shutdown();
        self.slots.clear();
        self.layout.clear();
        self.auto_rotate_resume_at = None;
        self.pending_focus = None;
        log::info!("orb sphere torn down (generation {})", self.generation);
    }

    /// Replace the configuration. Tears down and recreates every item and
    /// re-resolves all content images, so the cost grows with `total_items`.
    pub fn rebuild(&mut self, config: OrbConfig, host: &mut Host, now: f64) -> Result<(), ConfigError> {
        config.validate()?;
        self.background = config.background_rgb()?;
        self.teardown(host);
        self.camera.fov = config.fov;
        self.config = config;
        self.remount(host, now);
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// New container size. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.camera.set_viewport(width, height) {
            return false;
        }
        self.viewport = (width, height);

        let old_resting = self.fit.map(|f| f.resting_distance);
        self.refit();
        let (Some(old), Some(fit)) = (old_resting, self.fit) else {
            return true;
        };
        let ratio = fit.resting_distance / old;
        if !ratio.is_finite() || ratio <= 0.0 {
            return true;
        }

        match self.camera_anim.current_mut() {
            Some(CameraAnimation::Intro(intro)) => intro.retarget(fit.resting_distance),
            Some(CameraAnimation::Focus(focus)) => focus.rescale(ratio),
            None => {
                let d = fit.clamp(self.camera.distance() * ratio);
                if let Some(dir) = self.camera.position.try_normalize() {
                    self.camera.position = dir * d;
                }
            }
        }
        true
    }

    fn refit(&mut self) {
        let params = FitParams {
            radius: self.config.sphere_radius,
            fit_margin: self.config.fit_margin,
            initial_view_scale: self.config.initial_view_scale,
            max_distance_multiplier: self.config.max_distance_multiplier,
        };
        if let Some(fit) = Fit::compute(&params, self.camera.fov, self.camera.aspect) {
            self.controls.set_limits(&fit);
            self.fit = Some(fit);
        }
    }

    fn resting_distance(&self) -> f32 {
        self.fit
            .map(|f| f.resting_distance)
            .unwrap_or(self.config.sphere_radius * 3.0)
    }

    /// Back to the resting pose on +Z with auto-rotation on. Cancels any
    /// running camera animation.
    pub fn reset_view(&mut self, host: &mut Host) {
        if let Some(CameraAnimation::Intro(_)) = self.camera_anim.cancel(&mut host.frames) {
            self.intro_done = true;
        }
        self.controls.stop();
        self.controls.auto_rotate = true;
        self.auto_rotate_resume_at = None;
        self.camera.target = Vec3::ZERO;
        self.camera.position = Vec3::new(0.0, 0.0, self.resting_distance());
    }

    /// Orb under the pointer, if any.
    pub fn pick_at(&self, x: f32, y: f32, rect: &SurfaceRect) -> Option<usize> {
        let ndc = pointer_to_ndc(x, y, rect)?;
        let ray = Ray::from_camera(ndc, &self.camera)?;
        pick(&ray, self.placed())
    }

    /// Report the clicked orb (or `None` for empty space) to `sink`.
    /// Returns false when the click could not be resolved at all.
    pub fn handle_click(&self, x: f32, y: f32, rect: &SurfaceRect, sink: &mut dyn SelectionSink) -> bool {
        if !self.is_mounted() || pointer_to_ndc(x, y, rect).is_none() {
            return false;
        }
        sink.select(self.pick_at(x, y, rect));
        true
    }

    /// Reflect the externally owned selection. Only acts when it changed:
    /// borders/glow are updated and the camera swings toward the new orb.
    /// An orb that is still loading is focused as soon as it is placed.
    pub fn sync_selection(&mut self, selected: Option<usize>, host: &mut Host, now: f64) {
        if selected == self.applied_selection {
            return;
        }
        self.applied_selection = selected;
        self.pending_focus = None;
        self.reapply_decorations();

        let Some(index) = selected else {
            return;
        };
        let Some(item) = self.item(index) else {
            if index < self.layout.len() {
                log::debug!("orb {} not placed yet; focus deferred", index + 1);
                self.pending_focus = Some(index);
            } else {
                log::debug!("selection {index} has no orb; nothing to focus");
            }
            return;
        };
        let toward = item.position;
        self.focus_on(index, toward, host, now);
    }

    fn focus_on(&mut self, index: usize, toward: Vec3, host: &mut Host, now: f64) {
        let Some(focus) = FocusTransition::new(now, index, self.camera.position, self.camera.target, toward) else {
            return;
        };
        if let Some(CameraAnimation::Intro(_)) = self.camera_anim.start(CameraAnimation::Focus(focus), &mut host.frames) {
            // an interrupted intro is not replayed
            self.intro_done = true;
        }
        self.controls.stop();
        self.controls.auto_rotate = false;
        self.auto_rotate_resume_at = None;
        log::debug!("focusing orb {}", index + 1);
    }

    fn reapply_decorations(&mut self) {
        let selected = self.applied_selection;
        for item in self.slots.iter_mut().flatten() {
            let state = item.visual_state(selected);
            if let Some(d) = item.decoration.as_mut() {
                d.apply(item.kind, state);
            }
        }
    }

    /// One animation frame. Does nothing unless the render loop is
    /// registered with `host`.
    pub fn frame(&mut self, host: &mut Host, now: f64) {
        let Some(loop_id) = self.render_loop else {
            return;
        };
        if !host.frames.is_active(loop_id) {
            return;
        }
        let dt = self
            .last_frame
            .map(|t| (now - t).clamp(0.0, MAX_FRAME_STEP))
            .unwrap_or(0.0) as f32;
        self.last_frame = Some(now);

        for event in self.loader.drain() {
            self.place(event, host, now);
        }

        if self.auto_rotate_resume_at.is_some_and(|t| now >= t) {
            self.auto_rotate_resume_at = None;
            self.controls.auto_rotate = true;
        }

        self.step_camera(host, now, dt);
        self.step_emphasis(now);
    }

    fn step_camera(&mut self, host: &mut Host, now: f64, dt: f32) {
        match self.camera_anim.current() {
            Some(CameraAnimation::Intro(intro)) => {
                let d = intro.distance(now);
                self.controls.update(&mut self.camera, dt, Some(d));
            }
            Some(CameraAnimation::Focus(focus)) => {
                let (position, target) = focus.sample(now);
                self.camera.position = position;
                self.camera.target = target;
                // drag / wheel input during the swing is dropped, not queued
                self.controls.stop();
            }
            None => self.controls.update(&mut self.camera, dt, None),
        }

        let finished = self.camera_anim.current().is_some_and(|a| a.finished(now));
        if !finished {
            return;
        }
        match self.camera_anim.cancel(&mut host.frames) {
            Some(CameraAnimation::Intro(intro)) => {
                self.intro_done = true;
                if let Some(dir) = self.camera.position.try_normalize() {
                    self.camera.position = dir * intro.resting_distance;
                }
            }
            Some(CameraAnimation::Focus(focus)) => {
                self.camera.position = focus.end_position();
                self.camera.target = Vec3::ZERO;
                self.auto_rotate_resume_at = Some(now + AUTO_ROTATE_RESUME_DELAY);
                log::debug!("focus on orb {} settled", focus.index + 1);
            }
            None => {}
        }
    }

    fn step_emphasis(&mut self, now: f64) {
        let selected = self.applied_selection;
        for item in self.slots.iter_mut().flatten() {
            if selected == Some(item.index) {
                item.scale = pulse_scale(item.kind, now);
                if let Some(d) = item.decoration.as_mut() {
                    d.animate(now);
                }
            } else {
                item.scale = 1.0;
                if let Some(d) = item.decoration.as_mut() {
                    d.reset_glow();
                }
            }
        }
    }

    fn place(&mut self, event: AssetEvent, host: &mut Host, now: f64) {
        if event.generation != self.generation {
            return;
        }
        let Some(item) = self.layout.get(event.index).copied() else {
            return;
        };
        if self.slots[item.index].is_some() {
            return;
        }

        let (bw, bh) = (self.config.base_width, self.config.base_height);
        let (size, surface) = match event.result {
            Ok(img) => {
                let aspect = img.width() as f32 / img.height() as f32;
                (plane_size(aspect, bw, bh), ItemSurface::Image(img))
            }
            Err(e) => {
                log::debug!("orb {} falls back to a placeholder: {}", item.number(), e);
                (placeholder_size(bw, bh), ItemSurface::Flat)
            }
        };

        let mut placed = PlacedItem::new(&item, size, surface, self.config.show_borders);
        let state = placed.visual_state(self.applied_selection);
        if let Some(d) = placed.decoration.as_mut() {
            d.apply(placed.kind, state);
        }
        self.slots[item.index] = Some(placed);

        if self.pending_focus == Some(item.index) {
            self.pending_focus = None;
            self.focus_on(item.index, item.position, host, now);
        }
    }

    pub fn placed(&self) -> impl Iterator<Item = &PlacedItem> {
        self.slots.iter().flatten()
    }

    pub fn item(&self, index: usize) -> Option<&PlacedItem> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn pending_assets(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn config(&self) -> &OrbConfig {
        &self.config
    }

    pub fn fit(&self) -> Option<Fit> {
        self.fit
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn is_animating_camera(&self) -> bool {
        self.camera_anim.is_running()
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.controls.auto_rotate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{FOCUS_DURATION, INTRO_DURATION};
    use crate::assets::testing::inline_loader;
    use crate::emphasis::{ACCENT, SUBDUED};
    use crate::selection::SelectionState;

    fn config(items: usize, images: usize) -> OrbConfig {
        OrbConfig {
            total_items: items,
            total_images: images,
            ..OrbConfig::default()
        }
    }

    fn mounted(items: usize, images: usize) -> (OrbScene, Host) {
        let mut host = Host::default();
        let mut scene = OrbScene::mount(config(items, images), inline_loader(4, 2, vec![]), &mut host, (800, 600), 0.0).unwrap();
        scene.frame(&mut host, 0.0);
        (scene, host)
    }

    /// Skip the intro so camera assertions start from the resting pose.
    fn settle(scene: &mut OrbScene, host: &mut Host) -> f64 {
        let t = INTRO_DURATION + 0.01;
        scene.frame(host, t);
        assert!(!scene.is_animating_camera());
        t
    }

    #[test]
    fn mount_places_every_item_once() {
        let (scene, host) = mounted(10, 3);
        assert_eq!(scene.placed().count(), 10);
        assert_eq!(scene.pending_assets(), 0);
        assert_eq!(host.container.surfaces().len(), 1);

        let content = scene.item(1).unwrap();
        assert!(matches!(content.surface, ItemSurface::Image(_)));
        // 4x2 stub image: full base width, half as tall
        assert!((content.size - Vec2::new(1.2, 0.6)).length() < 1e-6);

        let placeholder = scene.item(5).unwrap();
        assert_eq!(placeholder.kind, ItemKind::Placeholder);
        assert!(matches!(placeholder.surface, ItemSurface::Flat));
    }

    #[test]
    fn empty_sphere_mounts() {
        let (mut scene, mut host) = mounted(0, 0);
        assert_eq!(scene.placed().count(), 0);
        scene.sync_selection(Some(0), &mut host, 1.0);
        scene.frame(&mut host, 1.1);
    }

    #[test]
    fn failed_load_becomes_flat_placeholder_plane() {
        let mut host = Host::default();
        let mut scene = OrbScene::mount(config(5, 3), inline_loader(4, 2, vec![2]), &mut host, (800, 600), 0.0).unwrap();
        scene.frame(&mut host, 0.0);

        let failed = scene.item(1).unwrap();
        assert!(matches!(failed.surface, ItemSurface::Flat));
        assert_eq!(failed.kind, ItemKind::Content);
        assert!((failed.size - Vec2::new(0.96, 0.64)).length() < 1e-6);
    }

    #[test]
    fn intro_zooms_from_five_times_resting() {
        let mut host = Host::default();
        let mut scene = OrbScene::mount(config(10, 0), inline_loader(1, 1, vec![]), &mut host, (800, 600), 0.0).unwrap();
        let resting = scene.fit().unwrap().resting_distance;

        assert!((scene.camera().distance() - 5.0 * resting).abs() < 1e-3);
        assert_eq!(host.frames.count(FrameTask::IntroZoom), 1);

        scene.frame(&mut host, 0.0);
        scene.frame(&mut host, INTRO_DURATION / 2.0);
        let d = scene.camera().distance();
        assert!(d < 5.0 * resting && d > resting);

        settle(&mut scene, &mut host);
        assert!((scene.camera().distance() - resting).abs() < 1e-3);
        assert_eq!(host.frames.count(FrameTask::IntroZoom), 0);
    }

    #[test]
    fn selection_is_exclusive() {
        let (mut scene, mut host) = mounted(10, 3);
        for sel in [Some(2), Some(7), None, Some(0)] {
            scene.sync_selection(sel, &mut host, 1.0);
            let n = scene
                .placed()
                .filter(|i| i.visual_state(sel) == VisualState::Selected)
                .count();
            assert_eq!(n, usize::from(sel.is_some()));
        }
    }

    #[test]
    fn border_rule_scenario() {
        let (mut scene, mut host) = mounted(10, 3);

        scene.sync_selection(Some(1), &mut host, 1.0);
        let d1 = scene.item(1).unwrap().decoration.unwrap();
        assert!(d1.border.visible && d1.all_glow_visible());
        assert_eq!(d1.border.color, ACCENT);
        assert_eq!(d1.border.opacity, 1.0);
        for i in [0, 2] {
            let d = scene.item(i).unwrap().decoration.unwrap();
            assert!(!d.border.visible && !d.any_glow_visible(), "item {i}");
        }
        for i in 3..10 {
            let d = scene.item(i).unwrap().decoration.unwrap();
            assert!(d.border.visible && !d.any_glow_visible(), "item {i}");
            assert_eq!(d.border.color, SUBDUED);
            assert!(d.border.opacity < 1.0);
        }

        scene.sync_selection(None, &mut host, 2.0);
        let d1 = scene.item(1).unwrap().decoration.unwrap();
        assert!(!d1.border.visible && !d1.any_glow_visible());
        for i in 3..10 {
            let d = scene.item(i).unwrap().decoration.unwrap();
            assert!(d.border.visible && !d.any_glow_visible());
            assert_eq!(d.border.color, SUBDUED);
        }
    }

    #[test]
    fn borders_can_be_disabled() {
        let mut host = Host::default();
        let cfg = OrbConfig {
            show_borders: false,
            ..config(4, 2)
        };
        let mut scene = OrbScene::mount(cfg, inline_loader(2, 2, vec![]), &mut host, (800, 600), 0.0).unwrap();
        scene.frame(&mut host, 0.0);
        scene.sync_selection(Some(3), &mut host, 0.5);
        assert!(scene.placed().all(|i| i.decoration.is_none()));
    }

    #[test]
    fn only_the_selected_orb_pulses() {
        let (mut scene, mut host) = mounted(10, 3);
        scene.sync_selection(Some(4), &mut host, 1.0);
        scene.frame(&mut host, 1.3);
        assert!(scene.item(4).unwrap().scale > 1.0);
        assert!(scene.placed().filter(|i| i.index != 4).all(|i| i.scale == 1.0));

        scene.sync_selection(None, &mut host, 1.4);
        scene.frame(&mut host, 1.5);
        assert!(scene.placed().all(|i| i.scale == 1.0));
    }

    #[test]
    fn click_on_an_orb_selects_it() {
        let (mut scene, mut host) = mounted(10, 3);
        settle(&mut scene, &mut host);

        let target = scene.item(6).unwrap().position;
        scene.camera.position = target.normalize() * 30.0;
        scene.camera.target = Vec3::ZERO;

        let rect = SurfaceRect::from_size(800.0, 600.0);
        let mut selection = SelectionState::new(10);
        assert!(scene.handle_click(400.0, 300.0, &rect, &mut selection));
        assert_eq!(selection.selected(), Some(6));
    }

    #[test]
    fn click_on_empty_space_clears() {
        let (mut scene, mut host) = mounted(10, 3);
        settle(&mut scene, &mut host);
        scene.camera.position = Vec3::new(0.0, 0.0, 200.0);

        let rect = SurfaceRect::from_size(800.0, 600.0);
        let mut selection = SelectionState::new(10);
        selection.select(Some(2));
        assert!(scene.handle_click(1.0, 1.0, &rect, &mut selection));
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn degenerate_rect_does_not_touch_selection() {
        let (scene, _host) = mounted(10, 3);
        let mut selection = SelectionState::new(10);
        selection.select(Some(2));
        assert!(!scene.handle_click(1.0, 1.0, &SurfaceRect::from_size(0.0, 0.0), &mut selection));
        assert_eq!(selection.selected(), Some(2));
    }

    #[test]
    fn focus_preserves_camera_distance() {
        let (mut scene, mut host) = mounted(20, 5);
        let mut now = settle(&mut scene, &mut host);

        for index in [3usize, 17, 0, 11] {
            let before = scene.camera().distance();
            scene.sync_selection(Some(index), &mut host, now);
            assert!(!scene.is_auto_rotating());
            now += FOCUS_DURATION + 0.01;
            scene.frame(&mut host, now);

            assert!(!scene.is_animating_camera());
            assert!((scene.camera().distance() - before).abs() < 1e-3);
            let dir = scene.camera().position.normalize();
            let want = scene.item(index).unwrap().position.normalize();
            assert!(dir.dot(want) > 0.9999);
        }
    }

    #[test]
    fn auto_rotation_resumes_after_focus() {
        let (mut scene, mut host) = mounted(10, 3);
        let now = settle(&mut scene, &mut host);
        scene.sync_selection(Some(2), &mut host, now);

        let done = now + FOCUS_DURATION + 0.01;
        scene.frame(&mut host, done);
        assert!(!scene.is_auto_rotating());
        scene.frame(&mut host, done + AUTO_ROTATE_RESUME_DELAY + 0.01);
        assert!(scene.is_auto_rotating());
    }

    #[test]
    fn new_focus_replaces_the_running_one() {
        let (mut scene, mut host) = mounted(10, 3);
        let now = settle(&mut scene, &mut host);
        scene.sync_selection(Some(2), &mut host, now);
        scene.frame(&mut host, now + 0.3);
        scene.sync_selection(Some(8), &mut host, now + 0.3);

        assert_eq!(host.frames.count(FrameTask::Focus), 1);
        scene.frame(&mut host, now + 0.3 + FOCUS_DURATION + 0.01);
        let dir = scene.camera().position.normalize();
        assert!(dir.dot(scene.item(8).unwrap().position.normalize()) > 0.9999);
    }

    #[test]
    fn stale_selection_is_a_no_op() {
        let (mut scene, mut host) = mounted(10, 3);
        let now = settle(&mut scene, &mut host);
        let before = scene.camera().position;

        scene.sync_selection(Some(999), &mut host, now);
        assert!(!scene.is_animating_camera());
        scene.frame(&mut host, now + 0.001);
        assert!(scene.placed().all(|i| i.scale == 1.0));
        assert!((scene.camera().distance() - before.length()).abs() < 1e-3);
    }

    #[test]
    fn selecting_a_loading_orb_focuses_it_once_placed() {
        let mut host = Host::default();
        let mut scene = OrbScene::mount(config(10, 3), inline_loader(4, 2, vec![]), &mut host, (800, 600), 0.0).unwrap();
        // content images only arrive on the first frame
        assert!(scene.item(1).is_none());

        scene.sync_selection(Some(1), &mut host, 0.0);
        assert_eq!(host.frames.count(FrameTask::Focus), 0);

        scene.frame(&mut host, 0.0);
        assert_eq!(host.frames.count(FrameTask::Focus), 1);
        assert_eq!(host.frames.count(FrameTask::IntroZoom), 0);

        scene.frame(&mut host, FOCUS_DURATION + 0.01);
        let dir = scene.camera().position.normalize();
        assert!(dir.dot(scene.item(1).unwrap().position.normalize()) > 0.9999);
    }

    #[test]
    fn deferred_focus_is_dropped_when_selection_moves_on() {
        let mut host = Host::default();
        let mut scene = OrbScene::mount(config(10, 3), inline_loader(4, 2, vec![]), &mut host, (800, 600), 0.0).unwrap();
        scene.sync_selection(Some(1), &mut host, 0.0);
        scene.sync_selection(None, &mut host, 0.0);

        scene.frame(&mut host, 0.0);
        assert_eq!(host.frames.count(FrameTask::Focus), 0);
        assert_eq!(host.frames.count(FrameTask::IntroZoom), 1);
    }

    #[test]
    fn input_during_focus_does_not_jump_afterwards() {
        let (mut scene, mut host) = mounted(10, 3);
        let start = settle(&mut scene, &mut host);
        scene.sync_selection(Some(7), &mut host, start);

        let mut now = start;
        for _ in 0..60 {
            now += FOCUS_DURATION / 60.0;
            scene.controls_mut().zoom(1.0);
            scene.controls_mut().rotate_by_pixels(12.0, -5.0, 600.0);
            scene.frame(&mut host, now);
        }
        now += 0.02;
        scene.frame(&mut host, now);
        assert!(!scene.is_animating_camera());
        let settled = scene.camera().position;

        scene.frame(&mut host, now + 1.0 / 60.0);
        assert!((scene.camera().distance() - settled.length()).abs() < 1e-3);
        assert!((scene.camera().position - settled).length() < 1e-3);
    }

    #[test]
    fn deselect_does_not_move_the_camera() {
        let (mut scene, mut host) = mounted(10, 3);
        let now = settle(&mut scene, &mut host);
        scene.sync_selection(Some(1), &mut host, now);
        scene.frame(&mut host, now + FOCUS_DURATION + 0.01);
        scene.sync_selection(None, &mut host, now + 2.0);
        assert!(!scene.is_animating_camera());
    }

    #[test]
    fn remounting_leaves_one_surface_and_no_duplicate_callbacks() {
        let (mut scene, mut host) = mounted(10, 3);
        for round in 0..2 {
            scene.teardown(&mut host);
            assert_eq!(host.frames.active_count(), 0, "round {round}");
            assert!(host.container.surfaces().is_empty());
            scene.remount(&mut host, round as f64);
        }
        assert_eq!(host.container.surfaces().len(), 1);
        assert_eq!(host.frames.count(FrameTask::RenderLoop), 1);
        assert!(host.frames.count(FrameTask::IntroZoom) <= 1);
        assert_eq!(host.frames.count(FrameTask::Focus), 0);

        scene.frame(&mut host, 10.0);
        assert_eq!(scene.placed().count(), 10);
    }

    #[test]
    fn mount_clears_leftover_surfaces() {
        let mut host = Host::default();
        host.container.attach_surface();
        host.container.attach_surface();
        let scene = OrbScene::mount(config(3, 1), inline_loader(1, 1, vec![]), &mut host, (640, 480), 0.0).unwrap();
        assert!(scene.is_mounted());
        assert_eq!(host.container.surfaces().len(), 1);
    }

    #[test]
    fn teardown_twice_is_harmless() {
        let (mut scene, mut host) = mounted(5, 2);
        scene.teardown(&mut host);
        scene.teardown(&mut host);
        assert!(!scene.is_mounted());
        scene.frame(&mut host, 3.0);
        assert_eq!(scene.placed().count(), 0);
    }

    #[test]
    fn results_from_an_old_generation_are_dropped() {
        let mut host = Host::default();
        let mut scene = OrbScene::mount(config(6, 6), inline_loader(2, 2, vec![]), &mut host, (800, 600), 0.0).unwrap();
        // generation 1 results are still queued when the rebuild happens
        scene.rebuild(config(4, 2), &mut host, 0.5).unwrap();
        scene.frame(&mut host, 0.6);

        assert_eq!(scene.generation(), 2);
        assert_eq!(scene.placed().count(), 4);
        assert!(scene.item(4).is_none());
    }

    #[test]
    fn rebuild_does_not_replay_a_finished_intro() {
        let (mut scene, mut host) = mounted(10, 3);
        let now = settle(&mut scene, &mut host);
        scene.rebuild(config(12, 4), &mut host, now).unwrap();
        assert!(!scene.is_animating_camera());
        let resting = scene.fit().unwrap().resting_distance;
        assert!((scene.camera().distance() - resting).abs() < 1e-3);
    }

    #[test]
    fn rebuild_rejects_invalid_config_and_keeps_scene() {
        let (mut scene, mut host) = mounted(10, 3);
        let bad = OrbConfig {
            sphere_radius: -1.0,
            ..config(10, 3)
        };
        assert!(scene.rebuild(bad, &mut host, 1.0).is_err());
        assert!(scene.is_mounted());
        assert_eq!(scene.placed().count(), 10);
    }

    #[test]
    fn reset_view_cancels_focus_and_restores_resting_pose() {
        let (mut scene, mut host) = mounted(10, 3);
        let now = settle(&mut scene, &mut host);
        scene.sync_selection(Some(5), &mut host, now);
        assert!(scene.is_animating_camera());

        scene.reset_view(&mut host);
        assert!(!scene.is_animating_camera());
        assert_eq!(host.frames.count(FrameTask::Focus), 0);
        assert!(scene.is_auto_rotating());
        let resting = scene.fit().unwrap().resting_distance;
        assert!((scene.camera().position - Vec3::new(0.0, 0.0, resting)).length() < 1e-4);
    }

    #[test]
    fn zero_height_resize_keeps_camera_finite() {
        let (mut scene, mut host) = mounted(10, 3);
        assert!(!scene.resize(800, 0));
        scene.frame(&mut host, 0.5);
        assert!(scene.camera().position.is_finite());
        assert!(scene.camera().projection().is_finite());
        assert!(scene.camera().view().is_finite());
    }

    #[test]
    fn resize_scales_distance_with_the_fit() {
        let (mut scene, mut host) = mounted(10, 3);
        settle(&mut scene, &mut host);
        let old = scene.fit().unwrap().resting_distance;
        let dir = scene.camera().position.normalize();

        assert!(scene.resize(300, 600));
        let new = scene.fit().unwrap().resting_distance;
        assert!(new > old);
        assert!((scene.camera().distance() - new).abs() < 1e-2);
        assert!(scene.camera().position.normalize().dot(dir) > 0.9999);
    }
}
