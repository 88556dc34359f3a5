use crate::error::{PipeforgeError, Result};
use crate::paths;
use crate::preset::Preset;
use crate::types::{PipelineMode, Stack};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PRODUCTION_BRANCH: &str = "main";
pub const DEFAULT_STAGING_BRANCH: &str = "develop";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commands {
    pub install: String,
    pub lint: String,
    pub test: String,
    pub build: String,
    /// `None` means the project has no migration step.
    pub migration: Option<String>,
}

impl Commands {
    pub fn from_preset(preset: &Preset) -> Self {
        Self {
            install: preset.install_command.to_string(),
            lint: preset.lint_command.to_string(),
            test: preset.test_command.to_string(),
            build: preset.build_command.to_string(),
            migration: None,
        }
    }
}

/// Blank migration commands collapse to `None`; anything else is kept verbatim.
pub fn normalize_migration(command: Option<String>) -> Option<String> {
    command.filter(|c| !c.trim().is_empty())
}

// ---------------------------------------------------------------------------
// ScaffoldConfig
// ---------------------------------------------------------------------------

/// The finished set of answers a scaffold run consumes. Built once, then only borrowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldConfig {
    pub project_name: String,
    pub stack: Stack,
    pub production_branch: String,
    pub staging_branch: String,
    pub commands: Commands,
    pub use_docker: bool,
    pub mode: PipelineMode,
}

impl ScaffoldConfig {
    /// A config for `stack` with every optional field taken from the stack's preset.
    pub fn new(project_name: &str, stack: Stack) -> Result<Self> {
        let slug = paths::slugify(project_name);
        if slug.is_empty() {
            return Err(PipeforgeError::InvalidProjectName(project_name.to_string()));
        }
        Ok(Self {
            project_name: slug,
            stack,
            production_branch: DEFAULT_PRODUCTION_BRANCH.to_string(),
            staging_branch: DEFAULT_STAGING_BRANCH.to_string(),
            commands: Commands::from_preset(Preset::for_stack(stack)),
            use_docker: true,
            mode: PipelineMode::default(),
        })
    }

    pub fn preset(&self) -> &'static Preset {
        Preset::for_stack(self.stack)
    }

    pub fn has_migration(&self) -> bool {
        self.commands.migration.is_some()
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// Partially filled answers, as read from an answers file or collected from flags.
///
/// Layers are combined with [`Answers::overlay`] and turned into a
/// [`ScaffoldConfig`] with [`Answers::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Answers {
    pub project_name: Option<String>,
    pub stack: Option<Stack>,
    pub production_branch: Option<String>,
    pub staging_branch: Option<String>,
    pub install_command: Option<String>,
    pub lint_command: Option<String>,
    pub test_command: Option<String>,
    pub build_command: Option<String>,
    pub migration_command: Option<String>,
    pub use_docker: Option<bool>,
    pub mode: Option<PipelineMode>,
}

impl Answers {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let answers: Answers = serde_yaml::from_str(&data)?;
        Ok(answers)
    }

    /// Fields set in `self` win; unset fields fall through to `lower`.
    pub fn overlay(self, lower: Answers) -> Answers {
        Answers {
            project_name: self.project_name.or(lower.project_name),
            stack: self.stack.or(lower.stack),
            production_branch: self.production_branch.or(lower.production_branch),
            staging_branch: self.staging_branch.or(lower.staging_branch),
            install_command: self.install_command.or(lower.install_command),
            lint_command: self.lint_command.or(lower.lint_command),
            test_command: self.test_command.or(lower.test_command),
            build_command: self.build_command.or(lower.build_command),
            migration_command: self.migration_command.or(lower.migration_command),
            use_docker: self.use_docker.or(lower.use_docker),
            mode: self.mode.or(lower.mode),
        }
    }

    /// Fill the remaining gaps from the stack preset. `fallback_name` is used
    /// when no project name was given; the stack defaults to node.
    pub fn resolve(self, fallback_name: &str) -> Result<ScaffoldConfig> {
        let stack = self.stack.unwrap_or(Stack::Node);
        let name = self.project_name.as_deref().unwrap_or(fallback_name);
        let mut config = ScaffoldConfig::new(name, stack)?;

        if let Some(branch) = self.production_branch {
            config.production_branch = non_empty_branch(branch, "production")?;
        }
        if let Some(branch) = self.staging_branch {
            config.staging_branch = non_empty_branch(branch, "staging")?;
        }
        if let Some(cmd) = self.install_command {
            config.commands.install = cmd;
        }
        if let Some(cmd) = self.lint_command {
            config.commands.lint = cmd;
        }
        if let Some(cmd) = self.test_command {
            config.commands.test = cmd;
        }
        if let Some(cmd) = self.build_command {
            config.commands.build = cmd;
        }
        config.commands.migration = normalize_migration(self.migration_command);
        if let Some(docker) = self.use_docker {
            config.use_docker = docker;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        Ok(config)
    }
}

fn non_empty_branch(branch: String, which: &'static str) -> Result<String> {
    let trimmed = branch.trim();
    if trimmed.is_empty() {
        return Err(PipeforgeError::EmptyBranch(which));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
