// config.rs - sphere inputs with defaults, JSON loading and validation

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything that shapes the sphere. Changing any field requires
/// [`crate::scene::OrbScene::rebuild`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub total_items: usize,
    /// How many leading positions carry real image content.
    pub total_images: usize,
    pub base_width: f32,
    pub base_height: f32,
    pub sphere_radius: f32,
    /// `rrggbb` or `#rrggbb`.
    pub background_color: String,
    pub show_borders: bool,
    pub max_distance_multiplier: f32,
    /// Extra room around the sphere when fitting the camera (> 1).
    pub fit_margin: f32,
    /// Resting zoom as a fraction of the fitted distance.
    pub initial_view_scale: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub asset_dir: PathBuf,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            total_items: 100,
            total_images: 30,
            base_width: 1.2,
            base_height: 0.8,
            sphere_radius: 7.0,
            background_color: "3b3b3b".to_string(),
            show_borders: true,
            max_distance_multiplier: 6.0,
            fit_margin: 1.1,
            initial_view_scale: 0.9,
            fov: 75.0,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl OrbConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: OrbConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("{v} must be a positive number"),
                })
            }
        }

        positive("sphere_radius", self.sphere_radius)?;
        positive("base_width", self.base_width)?;
        positive("base_height", self.base_height)?;
        positive("max_distance_multiplier", self.max_distance_multiplier)?;
        positive("initial_view_scale", self.initial_view_scale)?;

        if !(self.fit_margin.is_finite() && self.fit_margin > 1.0) {
            return Err(ConfigError::Invalid {
                field: "fit_margin",
                reason: format!("{} must be greater than 1", self.fit_margin),
            });
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::Invalid {
                field: "fov",
                reason: format!("{} must lie in (0, 180)", self.fov),
            });
        }

        self.background_rgb()?;
        Ok(())
    }

    /// Image count actually in use. More images than positions is tolerated.
    pub fn content_count(&self) -> usize {
        self.total_images.min(self.total_items)
    }

    pub fn background_rgb(&self) -> Result<[f32; 3], ConfigError> {
        parse_hex_rgb(&self.background_color)
    }
}

/// Parse `rrggbb` / `#rrggbb` into linear-ish 0..1 components.
pub fn parse_hex_rgb(s: &str) -> Result<[f32; 3], ConfigError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ConfigError::Colour(s.to_string()));
    }
    let mut out = [0.0; 3];
    for (i, c) in out.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| ConfigError::Colour(s.to_string()))?;
        *c = byte as f32 / 255.0;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let cfg = OrbConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.content_count(), 30);
    }

    #[test]
    fn parses_colour_with_and_without_hash() {
        let a = parse_hex_rgb("3b3b3b").unwrap();
        let b = parse_hex_rgb("#3b3b3b").unwrap();
        assert_eq!(a, b);
        assert!((a[0] - 59.0 / 255.0).abs() < 1e-6);
        assert!(parse_hex_rgb("black").is_err());
        assert!(parse_hex_rgb("#12345").is_err());
    }

    #[test]
    fn rejects_margin_not_above_one() {
        let cfg = OrbConfig {
            fit_margin: 1.0,
            ..OrbConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "fit_margin", .. })
        ));
    }

    #[test]
    fn excess_images_are_clamped() {
        let cfg = OrbConfig {
            total_items: 10,
            total_images: 25,
            ..OrbConfig::default()
        };
        assert_eq!(cfg.content_count(), 10);
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "total_items": 12, "sphere_radius": 3.5 }}"#).unwrap();

        let cfg = OrbConfig::load(file.path()).unwrap();
        assert_eq!(cfg.total_items, 12);
        assert_eq!(cfg.sphere_radius, 3.5);
        assert_eq!(cfg.base_width, 1.2);
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            OrbConfig::load(file.path()),
            Err(ConfigError::Json { .. })
        ));
    }
}
