pub mod init;
pub mod plan;
pub mod stacks;

use anyhow::Context;
use clap::Args;
use pipeforge_core::config::Answers;
use pipeforge_core::paths;
use pipeforge_core::templates::{DirTemplates, EmbeddedTemplates, Layered, TemplateSource};
use pipeforge_core::types::{PipelineMode, Stack};
use std::path::{Path, PathBuf};

/// Flags that choose what gets generated. Shared by `init` and `plan`.
#[derive(Args, Debug, Default)]
pub struct SelectionArgs {
    /// Answers file (default: .pipeforge.yaml in the project root, when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project name; normalized to lowercase [a-z0-9-_] (default: root directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Technology stack: node, python or go
    #[arg(long)]
    pub stack: Option<Stack>,

    /// Pipeline layout: simple (one workflow) or production (five workflows plus scripts)
    #[arg(long)]
    pub mode: Option<PipelineMode>,

    /// Generate a Dockerfile and deploy container images
    #[arg(long, conflicts_with = "no_docker")]
    pub docker: bool,

    /// Deploy a release bundle instead of a container image
    #[arg(long)]
    pub no_docker: bool,

    #[arg(long, value_name = "BRANCH")]
    pub production_branch: Option<String>,

    #[arg(long, value_name = "BRANCH")]
    pub staging_branch: Option<String>,

    #[arg(long, value_name = "CMD")]
    pub install_command: Option<String>,

    #[arg(long, value_name = "CMD")]
    pub lint_command: Option<String>,

    #[arg(long, value_name = "CMD")]
    pub test_command: Option<String>,

    #[arg(long, value_name = "CMD")]
    pub build_command: Option<String>,

    /// Database migration command; pass an empty string for none
    #[arg(long, value_name = "CMD")]
    pub migration: Option<String>,

    /// Directory of templates that override the built-in ones
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl SelectionArgs {
    fn flag_answers(&self) -> Answers {
        let use_docker = match (self.docker, self.no_docker) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Answers {
            project_name: self.name.clone(),
            stack: self.stack,
            production_branch: self.production_branch.clone(),
            staging_branch: self.staging_branch.clone(),
            install_command: self.install_command.clone(),
            lint_command: self.lint_command.clone(),
            test_command: self.test_command.clone(),
            build_command: self.build_command.clone(),
            migration_command: self.migration.clone(),
            use_docker,
            mode: self.mode,
        }
    }

    /// Flags layered over the answers file. Fields neither sets stay `None`.
    pub fn answers(&self, root: &Path) -> anyhow::Result<Answers> {
        let file = match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = root.join(paths::ANSWERS_FILE);
                default.is_file().then_some(default)
            }
        };
        let from_file = match file {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading answers file");
                Answers::load(&path)
                    .with_context(|| format!("failed to read answers file {}", path.display()))?
            }
            None => Answers::default(),
        };
        Ok(self.flag_answers().overlay(from_file))
    }

    /// Built-in templates, under `--templates` when given.
    pub fn template_source(&self) -> anyhow::Result<Box<dyn TemplateSource>> {
        match &self.templates {
            Some(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("template directory not found: {}", dir.display());
                }
                Ok(Box::new(Layered::new(
                    DirTemplates::new(dir.clone()),
                    EmbeddedTemplates,
                )))
            }
            None => Ok(Box::new(EmbeddedTemplates)),
        }
    }
}
