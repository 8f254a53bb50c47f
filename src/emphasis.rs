// emphasis.rs - border / glow decoration of each orb and the selected pulse

use crate::layout::ItemKind;

/// Highlight colour (#ffe600).
pub const ACCENT: [f32; 3] = [1.0, 230.0 / 255.0, 0.0];
/// Static border colour of unselected placeholders (#888888).
pub const SUBDUED: [f32; 3] = [136.0 / 255.0, 136.0 / 255.0, 136.0 / 255.0];

pub const SELECTED_BORDER_WIDTH: f32 = 6.0;
pub const SUBDUED_BORDER_WIDTH: f32 = 1.0;
pub const SUBDUED_BORDER_OPACITY: f32 = 0.35;

/// Radians per second of the scale pulse.
const PULSE_SPEED: f32 = 3.0;

const GLOW_BASE_SCALE: [f32; 3] = [1.04, 1.08, 1.12];
const GLOW_BASE_OPACITY: [f32; 3] = [0.6, 0.4, 0.25];
const GLOW_SPEED: [f32; 3] = [2.0, 3.0, 4.0];
const GLOW_SCALE_SWING: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Normal,
    Selected,
}

impl VisualState {
    pub fn of(index: usize, selected: Option<usize>) -> Self {
        if selected == Some(index) {
            VisualState::Selected
        } else {
            VisualState::Normal
        }
    }
}

pub fn pulse_amplitude(kind: ItemKind) -> f32 {
    match kind {
        ItemKind::Content => 0.13,
        ItemKind::Placeholder => 0.08,
    }
}

/// Scale of the selected orb at time `t` seconds.
pub fn pulse_scale(kind: ItemKind, t: f64) -> f32 {
    1.0 + pulse_amplitude(kind) * ((t as f32) * PULSE_SPEED).sin().abs()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub visible: bool,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Outline width in pixels at the reference scale.
    pub width: f32,
}

impl BorderStyle {
    const HIDDEN: BorderStyle = BorderStyle {
        visible: false,
        color: SUBDUED,
        opacity: 0.0,
        width: SUBDUED_BORDER_WIDTH,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowLayer {
    pub visible: bool,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Size relative to the orb plane.
    pub scale: f32,
    base_opacity: f32,
    base_scale: f32,
    speed: f32,
}

impl GlowLayer {
    fn new(k: usize) -> Self {
        Self {
            visible: false,
            color: ACCENT,
            opacity: GLOW_BASE_OPACITY[k],
            scale: GLOW_BASE_SCALE[k],
            base_opacity: GLOW_BASE_OPACITY[k],
            base_scale: GLOW_BASE_SCALE[k],
            speed: GLOW_SPEED[k],
        }
    }

    fn reset(&mut self) {
        self.opacity = self.base_opacity;
        self.scale = self.base_scale;
    }

    fn animate(&mut self, t: f64) {
        let s = ((t as f32) * self.speed).sin();
        self.opacity = self.base_opacity * (0.55 + 0.45 * s);
        self.scale = self.base_scale + GLOW_SCALE_SWING * s;
    }
}

/// Outline plus three concentric glow layers attached to one orb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub border: BorderStyle,
    pub glow: [GlowLayer; 3],
}

impl Decoration {
    /// Decoration in the unselected state for `kind`.
    pub fn new(kind: ItemKind) -> Self {
        let mut d = Self {
            border: BorderStyle::HIDDEN,
            glow: [GlowLayer::new(0), GlowLayer::new(1), GlowLayer::new(2)],
        };
        d.apply(kind, VisualState::Normal);
        d
    }

    /// Border / glow visibility. Called on selection changes only.
    ///
    /// | kind        | selected                  | normal                |
    /// |-------------|---------------------------|-----------------------|
    /// | content     | accent border + all glow  | nothing               |
    /// | placeholder | accent border + all glow  | subdued border only   |
    pub fn apply(&mut self, kind: ItemKind, state: VisualState) {
        match (state, kind) {
            (VisualState::Selected, _) => {
                self.border = BorderStyle {
                    visible: true,
                    color: ACCENT,
                    opacity: 1.0,
                    width: SELECTED_BORDER_WIDTH,
                };
                for layer in &mut self.glow {
                    layer.visible = true;
                }
            }
            (VisualState::Normal, ItemKind::Content) => {
                self.border = BorderStyle::HIDDEN;
                self.hide_glow();
            }
            (VisualState::Normal, ItemKind::Placeholder) => {
                self.border = BorderStyle {
                    visible: true,
                    color: SUBDUED,
                    opacity: SUBDUED_BORDER_OPACITY,
                    width: SUBDUED_BORDER_WIDTH,
                };
                self.hide_glow();
            }
        }
    }

    fn hide_glow(&mut self) {
        for layer in &mut self.glow {
            layer.visible = false;
            layer.reset();
        }
    }

    /// Per-frame glow oscillation for the selected orb.
    pub fn animate(&mut self, t: f64) {
        for layer in &mut self.glow {
            layer.animate(t);
        }
    }

    pub fn reset_glow(&mut self) {
        for layer in &mut self.glow {
            layer.reset();
        }
    }

    pub fn any_glow_visible(&self) -> bool {
        self.glow.iter().any(|l| l.visible)
    }

    pub fn all_glow_visible(&self) -> bool {
        self.glow.iter().all(|l| l.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_state_is_derived_from_selection() {
        assert_eq!(VisualState::of(2, Some(2)), VisualState::Selected);
        assert_eq!(VisualState::of(2, Some(3)), VisualState::Normal);
        assert_eq!(VisualState::of(2, None), VisualState::Normal);
    }

    #[test]
    fn content_items_start_bare() {
        let d = Decoration::new(ItemKind::Content);
        assert!(!d.border.visible);
        assert!(!d.any_glow_visible());
    }

    #[test]
    fn placeholders_start_with_subdued_border() {
        let d = Decoration::new(ItemKind::Placeholder);
        assert!(d.border.visible);
        assert_eq!(d.border.color, SUBDUED);
        assert!(d.border.opacity < 1.0);
        assert!(!d.any_glow_visible());
    }

    #[test]
    fn selection_lights_everything_up() {
        for kind in [ItemKind::Content, ItemKind::Placeholder] {
            let mut d = Decoration::new(kind);
            d.apply(kind, VisualState::Selected);
            assert!(d.border.visible);
            assert_eq!(d.border.color, ACCENT);
            assert_eq!(d.border.opacity, 1.0);
            assert!(d.all_glow_visible());
        }
    }

    #[test]
    fn glow_layers_pulse_at_different_rates() {
        let mut d = Decoration::new(ItemKind::Content);
        d.apply(ItemKind::Content, VisualState::Selected);
        d.animate(0.4);
        let o: Vec<f32> = d.glow.iter().map(|l| l.opacity / l.base_opacity).collect();
        assert!(o[0] != o[1] && o[1] != o[2]);

        d.reset_glow();
        assert_eq!(d.glow[2].scale, 1.12);
        assert_eq!(d.glow[0].opacity, 0.6);
    }

    #[test]
    fn pulse_stays_within_amplitude() {
        for step in 0..100 {
            let t = step as f64 * 0.037;
            let c = pulse_scale(ItemKind::Content, t);
            let p = pulse_scale(ItemKind::Placeholder, t);
            assert!((1.0..=1.13 + 1e-6).contains(&c));
            assert!((1.0..=1.08 + 1e-6).contains(&p));
        }
    }
}
