// spots.rs - static catalog of named spots (spotData.json)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    /// 1-based spot number.
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpotCatalog {
    pub spots: Vec<Spot>,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
}

impl SpotCatalog {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of spots with real images.
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn spot(&self, number: usize) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == number)
    }

    pub fn display_name(&self, number: usize) -> String {
        match self.spot(number) {
            Some(s) => s.name.clone(),
            None => format!("Spot #{number}"),
        }
    }
}
