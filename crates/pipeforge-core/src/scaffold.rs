//! Scaffold orchestration: pick artifacts, render them, write them.

use crate::blocks;
use crate::config::ScaffoldConfig;
use crate::error::{PipeforgeError, Result};
use crate::io::{Materializer, WriteOptions, WriteOutcome};
use crate::render;
use crate::templates::{TemplateKey, TemplateSource};
use crate::types::{Artifact, PipelineMode};
use crate::vars::{self, VariableMap};
use serde::Serialize;
use std::collections::HashSet;

/// Steps whose header contains this are dropped when no migration command is set.
pub const MIGRATION_STEP: &str = "migration";
/// Steps that only make sense with a container build.
pub const CONTAINER_STEP: &str = "container image";
/// Steps that ship a plain release tarball instead of a container.
pub const BUNDLE_STEP: &str = "release bundle";

const PRODUCTION_ARTIFACTS: [Artifact; 8] = [
    Artifact::Ci,
    Artifact::Build,
    Artifact::Deploy,
    Artifact::Rollback,
    Artifact::Security,
    Artifact::DeployScript,
    Artifact::RollbackScript,
    Artifact::HealthCheckScript,
];

const DOCKER_ARTIFACTS: [Artifact; 2] = [Artifact::Dockerfile, Artifact::DockerIgnore];

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Artifacts a run generates for `config`, in write order.
pub fn plan(config: &ScaffoldConfig) -> Vec<Artifact> {
    let mut artifacts = match config.mode {
        PipelineMode::Simple => vec![Artifact::CiCd],
        PipelineMode::Production => PRODUCTION_ARTIFACTS.to_vec(),
    };
    if config.use_docker {
        artifacts.extend(DOCKER_ARTIFACTS);
    }
    artifacts
}

fn unused_variant(config: &ScaffoldConfig) -> &'static str {
    if config.use_docker {
        BUNDLE_STEP
    } else {
        CONTAINER_STEP
    }
}

/// Step-name fragments removed from `artifact`'s template before substitution.
///
/// Only artifacts that declare optional steps are pruned, so a custom template
/// for any other artifact is written as given.
pub fn pruned_steps_for(config: &ScaffoldConfig, artifact: Artifact) -> Vec<&'static str> {
    let mut names = Vec::new();
    if artifact.carries_migration_steps() && !config.has_migration() {
        names.push(MIGRATION_STEP);
    }
    if artifact.carries_deploy_variants() {
        names.push(unused_variant(config));
    }
    names
}

/// Every fragment pruned somewhere in a run for `config`.
pub fn pruned_steps(config: &ScaffoldConfig) -> Vec<&'static str> {
    let mut names = Vec::new();
    if !config.has_migration() {
        names.push(MIGRATION_STEP);
    }
    names.push(unused_variant(config));
    names
}

fn check_unique_targets(artifacts: &[Artifact]) -> Result<()> {
    let mut seen = HashSet::new();
    for artifact in artifacts {
        let target = artifact.target_path();
        if !seen.insert(target.clone()) {
            return Err(PipeforgeError::DuplicateTarget(target));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub artifact: Artifact,
    pub path: String,
    pub content: String,
    pub executable: bool,
}

/// Load, prune and substitute one artifact. Pruning runs before substitution
/// so only the placeholders of retained steps are ever filled.
pub fn render_artifact(
    source: &dyn TemplateSource,
    config: &ScaffoldConfig,
    vars: &VariableMap,
    artifact: Artifact,
) -> Result<OutputArtifact> {
    let key = TemplateKey::new(config.stack, artifact);
    let mut text = source.load(key)?;

    for name in pruned_steps_for(config, artifact) {
        text = blocks::remove_named_block(&text, name);
    }

    let content = render::substitute(&text, vars);
    let leftover = render::unresolved(&content);
    if !leftover.is_empty() {
        tracing::debug!(template = %key, placeholders = ?leftover, "unresolved placeholders");
    }

    Ok(OutputArtifact {
        artifact,
        path: artifact.target_path(),
        content,
        executable: artifact.is_executable(),
    })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Skipped,
    Failed,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Written => "written",
            FileStatus::Skipped => "skipped",
            FileStatus::Failed => "failed",
        }
    }
}

impl From<WriteOutcome> for FileStatus {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Written => FileStatus::Written,
            WriteOutcome::Skipped => FileStatus::Skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub artifact: Artifact,
    pub path: String,
    pub status: FileStatus,
    pub executable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub entries: Vec<ReportEntry>,
}

impl ScaffoldReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn paths_with(&self, status: FileStatus) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.path.as_str())
            .collect()
    }

    pub fn has_skipped(&self) -> bool {
        self.count(FileStatus::Skipped) > 0
    }

    fn record(&mut self, out: &OutputArtifact, status: FileStatus) {
        self.entries.push(ReportEntry {
            artifact: out.artifact,
            path: out.path.clone(),
            status,
            executable: out.executable,
        });
    }

    fn record_failed(&mut self, artifact: Artifact) {
        self.entries.push(ReportEntry {
            artifact,
            path: artifact.target_path(),
            status: FileStatus::Failed,
            executable: artifact.is_executable(),
        });
    }
}

// ---------------------------------------------------------------------------
// Scaffolder
// ---------------------------------------------------------------------------

pub struct Scaffolder<'a> {
    source: &'a dyn TemplateSource,
    sink: &'a mut dyn Materializer,
    overwrite: bool,
}

impl<'a> Scaffolder<'a> {
    pub fn new(source: &'a dyn TemplateSource, sink: &'a mut dyn Materializer) -> Self {
        Self {
            source,
            sink,
            overwrite: false,
        }
    }

    /// Replace existing files instead of skipping them.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Render and write every planned artifact, recording each outcome in `report`.
    ///
    /// Stops at the first failure: the failing artifact is recorded as
    /// [`FileStatus::Failed`] and the error returned. Files written before it stay.
    pub fn run(&mut self, config: &ScaffoldConfig, report: &mut ScaffoldReport) -> Result<()> {
        let artifacts = plan(config);
        check_unique_targets(&artifacts)?;
        let vars = vars::variables(config);

        for artifact in artifacts {
            match self.emit(config, &vars, artifact) {
                Ok((out, outcome)) => {
                    tracing::info!(path = %out.path, status = ?outcome, "materialized");
                    report.record(&out, outcome.into());
                }
                Err(e) => {
                    report.record_failed(artifact);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn emit(
        &mut self,
        config: &ScaffoldConfig,
        vars: &VariableMap,
        artifact: Artifact,
    ) -> Result<(OutputArtifact, WriteOutcome)> {
        let out = render_artifact(self.source, config, vars, artifact)?;
        let opts = WriteOptions {
            executable: out.executable,
            overwrite: self.overwrite,
        };
        let outcome = self.sink.write(&out.path, &out.content, opts)?;
        Ok((out, outcome))
    }
}

/// Run a whole scaffold and return the report, or the first error.
pub fn scaffold(
    source: &dyn TemplateSource,
    sink: &mut dyn Materializer,
    config: &ScaffoldConfig,
    overwrite: bool,
) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();
    Scaffolder::new(source, sink)
        .overwrite(overwrite)
        .run(config, &mut report)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryMaterializer;
    use crate::templates::{EmbeddedTemplates, Layered, MapTemplates};
    use crate::types::Stack;

    fn production(stack: Stack, docker: bool, migration: Option<&str>) -> ScaffoldConfig {
        let mut config = ScaffoldConfig::new("shop", stack).unwrap();
        config.use_docker = docker;
        config.mode = PipelineMode::Production;
        config.commands.migration = migration.map(str::to_string);
        config
    }

    #[test]
    fn plan_simple_is_single_workflow() {
        let mut config = production(Stack::Node, false, None);
        config.mode = PipelineMode::Simple;
        assert_eq!(plan(&config), vec![Artifact::CiCd]);
        config.use_docker = true;
        assert_eq!(
            plan(&config),
            vec![Artifact::CiCd, Artifact::Dockerfile, Artifact::DockerIgnore]
        );
    }

    #[test]
    fn plan_production_has_five_workflows_and_three_scripts() {
        let config = production(Stack::Go, false, None);
        let artifacts = plan(&config);
        assert_eq!(artifacts.len(), 8);
        let workflows = artifacts
            .iter()
            .filter(|a| a.target_path().starts_with(".github/workflows/"))
            .count();
        let scripts = artifacts.iter().filter(|a| a.is_executable()).count();
        assert_eq!(workflows, 5);
        assert_eq!(scripts, 3);
        check_unique_targets(&artifacts).unwrap();
    }

    #[test]
    fn pruned_steps_follow_migration_and_docker() {
        let config = production(Stack::Node, true, None);
        assert_eq!(pruned_steps(&config), vec![MIGRATION_STEP, BUNDLE_STEP]);
        let config = production(Stack::Node, false, Some("migrate"));
        assert_eq!(pruned_steps(&config), vec![CONTAINER_STEP]);
    }

    #[test]
    fn pruning_is_limited_to_artifacts_with_optional_steps() {
        let config = production(Stack::Node, false, None);
        assert!(pruned_steps_for(&config, Artifact::Ci).is_empty());
        assert!(pruned_steps_for(&config, Artifact::DeployScript).is_empty());
        assert_eq!(pruned_steps_for(&config, Artifact::Build), vec![CONTAINER_STEP]);
        assert_eq!(
            pruned_steps_for(&config, Artifact::Deploy),
            vec![MIGRATION_STEP, CONTAINER_STEP]
        );
    }

    #[test]
    fn custom_ci_steps_survive_pruning() {
        let config = production(Stack::Node, false, None);
        let vars = vars::variables(&config);
        let mut custom = MapTemplates::new();
        custom.insert(
            "node/ci.yml",
            "\
jobs:
  test:
    steps:
      - name: Check migration files are ordered
        run: ./bin/check-migrations
      - name: Lint container image definitions
        run: hadolint Dockerfile
      - name: Test
        run: {{ TEST_COMMAND }}
",
        );
        let source = Layered::new(custom, EmbeddedTemplates);
        let out = render_artifact(&source, &config, &vars, Artifact::Ci).unwrap();
        assert_eq!(
            blocks::step_names(&out.content),
            vec![
                "Check migration files are ordered",
                "Lint container image definitions",
                "Test"
            ]
        );
        assert!(out.content.contains("run: npm test"));
    }

    #[test]
    fn duplicate_targets_are_rejected() {
        let err = check_unique_targets(&[Artifact::Ci, Artifact::Ci]).unwrap_err();
        assert!(matches!(err, PipeforgeError::DuplicateTarget(_)));
    }

    fn deploy_source() -> MapTemplates {
        let mut source = MapTemplates::new();
        source.insert(
            "common/deploy.yml",
            "\
steps:
  - name: Checkout
    uses: actions/checkout@v4
  - name: Run database migrations
    run: {{ MIGRATION_COMMAND }}
  - name: Deploy {{ PROJECT_NAME }}
    run: ./scripts/deploy.sh
",
        );
        source
    }

    #[test]
    fn render_strips_migration_when_absent() {
        let config = production(Stack::Node, false, None);
        let vars = vars::variables(&config);
        let out = render_artifact(&deploy_source(), &config, &vars, Artifact::Deploy).unwrap();
        assert!(!out.content.contains("migration"));
        assert!(out.content.contains("- name: Deploy shop"));
        assert_eq!(out.path, ".github/workflows/deploy.yml");
    }

    #[test]
    fn render_keeps_migration_when_present() {
        let config = production(Stack::Node, false, Some("run-migrate"));
        let vars = vars::variables(&config);
        let out = render_artifact(&deploy_source(), &config, &vars, Artifact::Deploy).unwrap();
        assert!(out
            .content
            .contains("  - name: Run database migrations\n    run: run-migrate\n"));
    }

    #[test]
    fn missing_template_fails_and_is_recorded() {
        let config = production(Stack::Node, false, None);
        let source = deploy_source();
        let mut sink = MemoryMaterializer::new();
        let mut report = ScaffoldReport::default();
        let err = Scaffolder::new(&source, &mut sink)
            .run(&config, &mut report)
            .unwrap_err();
        assert!(matches!(err, PipeforgeError::TemplateNotFound { ref key } if key == "node/ci.yml"));
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].status, FileStatus::Failed);
        assert!(sink.files.is_empty());
    }

    #[test]
    fn write_failure_stops_run_and_keeps_earlier_files() {
        let config = production(Stack::Python, true, None);
        let mut sink = MemoryMaterializer::failing_on(".github/workflows/deploy.yml");
        let mut report = ScaffoldReport::default();
        let err = Scaffolder::new(&EmbeddedTemplates, &mut sink)
            .run(&config, &mut report)
            .unwrap_err();
        assert!(matches!(err, PipeforgeError::Write { .. }));
        assert_eq!(report.count(FileStatus::Written), 2);
        assert_eq!(
            report.paths_with(FileStatus::Failed),
            vec![".github/workflows/deploy.yml"]
        );
        assert!(sink.content(".github/workflows/ci.yml").is_some());
        assert!(sink.content(".github/workflows/rollback.yml").is_none());
    }

    #[test]
    fn second_run_skips_everything() {
        let config = production(Stack::Node, true, Some("npm run migrate"));
        let mut sink = MemoryMaterializer::new();
        let first = scaffold(&EmbeddedTemplates, &mut sink, &config, false).unwrap();
        assert_eq!(first.count(FileStatus::Written), 10);
        let snapshot = sink.files.clone();

        let second = scaffold(&EmbeddedTemplates, &mut sink, &config, false).unwrap();
        assert_eq!(second.count(FileStatus::Skipped), 10);
        assert!(second.has_skipped());
        assert_eq!(sink.files, snapshot);
    }

    #[test]
    fn image_name_is_resolved_in_a_step() {
        let config = production(Stack::Node, true, None);
        let vars = vars::variables(&config);
        for artifact in [Artifact::Build, Artifact::Deploy] {
            let out = render_artifact(&EmbeddedTemplates, &config, &vars, artifact).unwrap();
            assert!(out
                .content
                .contains("echo \"IMAGE_NAME=ghcr.io/${GITHUB_REPOSITORY_OWNER,,}/shop\" >> \"$GITHUB_ENV\""));
            assert!(!out.content.contains("github.repository_owner"));
        }
    }

    #[test]
    fn every_embedded_artifact_renders_without_leftovers() {
        for stack in Stack::all() {
            for mode in [PipelineMode::Simple, PipelineMode::Production] {
                for docker in [true, false] {
                    for migration in [None, Some("make migrate")] {
                        let mut config = production(*stack, docker, migration);
                        config.mode = mode;
                        let vars = vars::variables(&config);
                        let dropped = unused_variant(&config);
                        for artifact in plan(&config) {
                            let out = render_artifact(&EmbeddedTemplates, &config, &vars, artifact)
                                .unwrap();
                            assert!(
                                render::unresolved(&out.content).is_empty(),
                                "{stack} {artifact}: {:?}",
                                render::unresolved(&out.content)
                            );
                            if migration.is_none() {
                                assert!(
                                    !out.content.to_lowercase().contains("migrat"),
                                    "{stack} {artifact} still mentions migrations"
                                );
                            }
                            let steps = blocks::step_names(&out.content);
                            assert!(
                                !steps.iter().any(|s| s.contains(dropped)),
                                "{stack} {artifact} docker={docker} kept a {dropped} step"
                            );
                        }
                    }
                }
            }
        }
    }
}
