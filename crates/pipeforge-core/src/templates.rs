//! Template repository access.
//!
//! Templates live under `<stack>/<file>` with shared ones under `common/<file>`.
//! A key resolves to the stack-specific file first and falls back to `common/`.

use crate::error::{PipeforgeError, Result};
use crate::types::{Artifact, Stack};
use rust_embed::Embed;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const COMMON_DIR: &str = "common";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub stack: Stack,
    pub artifact: Artifact,
}

impl TemplateKey {
    pub fn new(stack: Stack, artifact: Artifact) -> Self {
        Self { stack, artifact }
    }

    /// Relative paths tried in order.
    pub fn candidates(&self) -> [String; 2] {
        let file = self.artifact.template_file();
        [
            format!("{}/{file}", self.stack.as_str()),
            format!("{COMMON_DIR}/{file}"),
        ]
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stack, self.artifact.template_file())
    }
}

// ---------------------------------------------------------------------------
// TemplateSource
// ---------------------------------------------------------------------------

pub trait TemplateSource {
    /// Raw text at `rel_path`, or `None` when there is no such template.
    fn get(&self, rel_path: &str) -> Result<Option<String>>;

    fn load(&self, key: TemplateKey) -> Result<String> {
        for candidate in key.candidates() {
            if let Some(text) = self.get(&candidate)? {
                return Ok(text);
            }
        }
        Err(PipeforgeError::TemplateNotFound {
            key: key.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmbeddedTemplates
// ---------------------------------------------------------------------------

#[derive(Embed)]
#[folder = "templates/"]
struct BuiltinAssets;

/// The template set compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    /// Every embedded template path, sorted.
    pub fn list() -> Vec<String> {
        let mut names: Vec<String> = <BuiltinAssets as Embed>::iter()
            .map(|p| p.into_owned())
            .collect();
        names.sort();
        names
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn get(&self, rel_path: &str) -> Result<Option<String>> {
        match <BuiltinAssets as Embed>::get(rel_path) {
            Some(file) => {
                let text = String::from_utf8(file.data.into_owned()).map_err(|e| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error())
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// DirTemplates
// ---------------------------------------------------------------------------

/// Templates read from a directory on disk with the same layout as the built-in set.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirTemplates {
    fn get(&self, rel_path: &str) -> Result<Option<String>> {
        let path = self.root.join(rel_path);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }
}

// ---------------------------------------------------------------------------
// Layered
// ---------------------------------------------------------------------------

/// Looks a key up in `upper` and falls back to `lower` when `upper` has no match.
pub struct Layered<U, L> {
    upper: U,
    lower: L,
}

impl<U: TemplateSource, L: TemplateSource> Layered<U, L> {
    pub fn new(upper: U, lower: L) -> Self {
        Self { upper, lower }
    }
}

impl<U: TemplateSource, L: TemplateSource> TemplateSource for Layered<U, L> {
    fn get(&self, rel_path: &str) -> Result<Option<String>> {
        match self.upper.get(rel_path)? {
            Some(text) => Ok(Some(text)),
            None => self.lower.get(rel_path),
        }
    }

    fn load(&self, key: TemplateKey) -> Result<String> {
        // A whole-key hit in the upper layer wins over a stack-specific file below it.
        match self.upper.load(key) {
            Err(PipeforgeError::TemplateNotFound { .. }) => self.lower.load(key),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// MapTemplates
// ---------------------------------------------------------------------------

/// In-memory templates keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MapTemplates {
    files: HashMap<String, String>,
}

impl MapTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_path: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.files.insert(rel_path.into(), text.into());
        self
    }
}

impl TemplateSource for MapTemplates {
    fn get(&self, rel_path: &str) -> Result<Option<String>> {
        Ok(self.files.get(rel_path).cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stack_file_wins_over_common() {
        let mut source = MapTemplates::new();
        source
            .insert("node/deploy.yml", "node deploy")
            .insert("common/deploy.yml", "shared deploy");
        let text = source
            .load(TemplateKey::new(Stack::Node, Artifact::Deploy))
            .unwrap();
        assert_eq!(text, "node deploy");
        let text = source
            .load(TemplateKey::new(Stack::Go, Artifact::Deploy))
            .unwrap();
        assert_eq!(text, "shared deploy");
    }

    #[test]
    fn missing_template_names_the_key() {
        let source = MapTemplates::new();
        let err = source
            .load(TemplateKey::new(Stack::Python, Artifact::Security))
            .unwrap_err();
        match err {
            PipeforgeError::TemplateNotFound { key } => assert_eq!(key, "python/security.yml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dir_templates_read_from_disk() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("common")).unwrap();
        std::fs::write(dir.path().join("common/rollback.sh"), "#!/bin/sh\n").unwrap();
        let source = DirTemplates::new(dir.path());
        let text = source
            .load(TemplateKey::new(Stack::Go, Artifact::RollbackScript))
            .unwrap();
        assert_eq!(text, "#!/bin/sh\n");
        assert!(source
            .load(TemplateKey::new(Stack::Go, Artifact::DeployScript))
            .is_err());
    }

    #[test]
    fn layered_prefers_upper_and_falls_back() {
        let mut upper = MapTemplates::new();
        upper.insert("common/ci.yml", "custom ci");
        let mut lower = MapTemplates::new();
        lower
            .insert("node/ci.yml", "builtin node ci")
            .insert("node/build.yml", "builtin node build");
        let layered = Layered::new(upper, lower);
        assert_eq!(
            layered.load(TemplateKey::new(Stack::Node, Artifact::Ci)).unwrap(),
            "custom ci"
        );
        assert_eq!(
            layered
                .load(TemplateKey::new(Stack::Node, Artifact::Build))
                .unwrap(),
            "builtin node build"
        );
    }

    #[test]
    fn embedded_set_covers_every_stack_and_artifact() {
        let source = EmbeddedTemplates;
        for stack in Stack::all() {
            for artifact in [
                Artifact::CiCd,
                Artifact::Ci,
                Artifact::Build,
                Artifact::Deploy,
                Artifact::Rollback,
                Artifact::Security,
                Artifact::DeployScript,
                Artifact::RollbackScript,
                Artifact::HealthCheckScript,
                Artifact::Dockerfile,
                Artifact::DockerIgnore,
            ] {
                let key = TemplateKey::new(*stack, artifact);
                let text = source
                    .load(key)
                    .unwrap_or_else(|e| panic!("{key}: {e}"));
                assert!(!text.is_empty(), "{key} is empty");
            }
        }
        assert!(EmbeddedTemplates::list().iter().any(|p| p == "common/deploy.yml"));
    }
}
