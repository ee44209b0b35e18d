// ⚙️ Configuration - file locations and form defaults
// Optional JSON file; missing keys fall back to defaults

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name_map_path: PathBuf,
    pub badge_path: PathBuf,
    pub default_group: String,
    pub default_leader: String,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            name_map_path: PathBuf::from("name_id_map.csv"),
            badge_path: PathBuf::from("badge_translation.csv"),
            default_group: String::new(),
            default_leader: String::new(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve a user-typed output name against `output_dir`, adding `.docx` if absent
    pub fn output_path(&self, name: &str) -> PathBuf {
        let mut path = PathBuf::from(name.trim());
        if path.extension().is_none() {
            path.set_extension("docx");
        }
        if path.is_absolute() {
            path
        } else {
            self.output_dir.join(path)
        }
    }
}
