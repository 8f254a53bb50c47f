// lib.rs - MOONR orb sphere: layout, camera, picking and emphasis for a
// rotating sphere of image orbs, plus the wgpu renderer that draws it.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod config;
pub mod emphasis;
pub mod error;
pub mod host;
pub mod i18n;
pub mod layout;
pub mod mesh;
pub mod picker;
pub mod renderer;
pub mod scene;
pub mod selection;
pub mod spots;
