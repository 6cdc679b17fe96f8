// File: ./src/manifest.rs
// Source manifest: the ordered list of schedule documents to merge.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    // Older manifests were written with the Slovak key.
    #[serde(alias = "subory")]
    pub files: Vec<String>,
}

impl Manifest {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse schedule manifest")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest '{}'", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid manifest '{}'", path.display()))
    }

    /// Entries are relative to the directory holding the manifest.
    /// A leading `/` is treated as relative too, matching site-rooted paths.
    pub fn resolve(&self, base: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|f| base.join(f.trim_start_matches('/')))
            .collect()
    }
}
