use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, Result};
use crate::models::{ArtifactDebugInfo, BuildInfo, ContractArtifact};

const BUILD_INFO_DIR: &str = "build-info";

/// Read-only view over a Hardhat `artifacts/` directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Accepts a bare contract name (`LendPool`) or a fully qualified one
    /// (`contracts/governance/LoanTimeLock.sol:LoanTimeLock`).
    pub fn load(&self, name: &str) -> Result<ContractArtifact> {
        let path = match name.split_once(':') {
            Some((source, contract)) => self.root.join(source).join(format!("{}.json", contract)),
            None => self.find_unique(name)?,
        };
        if !path.is_file() {
            return Err(DeployError::MissingArtifact(name.to_string()));
        }

        let raw = fs::read_to_string(&path).map_err(|e| DeployError::io(&path, e))?;
        let mut artifact: ContractArtifact = serde_json::from_str(&raw)?;
        artifact.path = path;
        log::debug!("Loaded artifact {} from {}", name, artifact.path.display());
        Ok(artifact)
    }

    pub fn build_info(&self, artifact: &ContractArtifact) -> Result<BuildInfo> {
        let dbg_path = artifact.path.with_extension("dbg.json");
        let raw = fs::read_to_string(&dbg_path).map_err(|e| DeployError::io(&dbg_path, e))?;
        let dbg: ArtifactDebugInfo = serde_json::from_str(&raw)?;

        let dir = dbg_path.parent().unwrap_or(&self.root);
        let build_info_path = dir.join(&dbg.build_info);
        let raw = fs::read_to_string(&build_info_path)
            .map_err(|e| DeployError::io(&build_info_path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn find_unique(&self, name: &str) -> Result<PathBuf> {
        let file_name = format!("{}.json", name);
        let mut found = Vec::new();
        collect_named(&self.root, &file_name, &mut found)?;

        match found.len() {
            0 => Err(DeployError::MissingArtifact(name.to_string())),
            1 => Ok(found.remove(0)),
            _ => Err(DeployError::Config(format!(
                "{} matches {} artifacts; use a fully qualified name",
                name,
                found.len()
            ))),
        }
    }
}

fn collect_named(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(DeployError::io(dir, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| DeployError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().map_or(false, |n| n == BUILD_INFO_DIR) {
                continue;
            }
            collect_named(&path, file_name, found)?;
        } else if path.file_name().map_or(false, |n| n == file_name) {
            found.push(path);
        }
    }
    Ok(())
}
