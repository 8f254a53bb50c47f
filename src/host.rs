// host.rs - the environment a scene mounts into: a surface container and a
// per-frame callback scheduler. The window plays this role in the app; tests
// inspect it directly.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

/// What a frame registration drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    RenderLoop,
    IntroZoom,
    Focus,
}

/// Holds the render surfaces attached to one container.
#[derive(Debug, Default)]
pub struct Container {
    surfaces: Vec<SurfaceId>,
    next_id: u64,
}

impl Container {
    pub fn attach_surface(&mut self) -> SurfaceId {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.surfaces.push(id);
        id
    }

    pub fn detach_surface(&mut self, id: SurfaceId) -> bool {
        let before = self.surfaces.len();
        self.surfaces.retain(|s| *s != id);
        self.surfaces.len() != before
    }

    /// Removes every surface left over from earlier mounts.
    pub fn clear_surfaces(&mut self) -> usize {
        let n = self.surfaces.len();
        self.surfaces.clear();
        n
    }

    pub fn surfaces(&self) -> &[SurfaceId] {
        &self.surfaces
    }
}

/// Book-keeping for per-frame callbacks, the analogue of
/// `requestAnimationFrame` / `cancelAnimationFrame`.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    active: BTreeMap<FrameId, FrameTask>,
    next_id: u64,
}

impl FrameScheduler {
    pub fn request(&mut self, task: FrameTask) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.active.insert(id, task);
        id
    }

    /// Cancelling an unknown or already cancelled id is a no-op.
    pub fn cancel(&mut self, id: FrameId) -> bool {
        self.active.remove(&id).is_some()
    }

    pub fn is_active(&self, id: FrameId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn count(&self, task: FrameTask) -> usize {
        self.active.values().filter(|t| **t == task).count()
    }
}

#[derive(Debug, Default)]
pub struct Host {
    pub container: Container,
    pub frames: FrameScheduler,
}
