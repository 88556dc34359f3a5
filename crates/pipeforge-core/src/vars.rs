//! Placeholder names and the map derived from a [`ScaffoldConfig`].

use crate::config::ScaffoldConfig;
use std::collections::BTreeMap;

/// Placeholder name → substitution value. `None` renders as the empty string.
pub type VariableMap = BTreeMap<String, Option<String>>;

pub struct TemplateVars;

impl TemplateVars {
    pub const PROJECT_NAME: &'static str = "PROJECT_NAME";
    pub const IMAGE_NAME: &'static str = "IMAGE_NAME";
    pub const STACK: &'static str = "STACK";
    pub const PORT: &'static str = "PORT";
    pub const RUNTIME_VERSION: &'static str = "RUNTIME_VERSION";
    pub const INSTALL_COMMAND: &'static str = "INSTALL_COMMAND";
    pub const LINT_COMMAND: &'static str = "LINT_COMMAND";
    pub const TEST_COMMAND: &'static str = "TEST_COMMAND";
    pub const BUILD_COMMAND: &'static str = "BUILD_COMMAND";
    pub const MIGRATION_COMMAND: &'static str = "MIGRATION_COMMAND";
    pub const PRODUCTION_BRANCH: &'static str = "PRODUCTION_BRANCH";
    pub const STAGING_BRANCH: &'static str = "STAGING_BRANCH";
    pub const HEALTH_PATH: &'static str = "HEALTH_PATH";

    pub fn all() -> &'static [&'static str] {
        &[
            Self::PROJECT_NAME,
            Self::IMAGE_NAME,
            Self::STACK,
            Self::PORT,
            Self::RUNTIME_VERSION,
            Self::INSTALL_COMMAND,
            Self::LINT_COMMAND,
            Self::TEST_COMMAND,
            Self::BUILD_COMMAND,
            Self::MIGRATION_COMMAND,
            Self::PRODUCTION_BRANCH,
            Self::STAGING_BRANCH,
            Self::HEALTH_PATH,
        ]
    }
}

/// Image reference pushed to the GitHub container registry, as a bash word.
///
/// The owner is read from `GITHUB_REPOSITORY_OWNER` and lower-cased at run time
/// since the registry rejects upper-case repository names. Templates evaluate it
/// in a `run:` step and export the result through `$GITHUB_ENV`.
pub fn image_name(project_name: &str) -> String {
    format!("ghcr.io/${{GITHUB_REPOSITORY_OWNER,,}}/{project_name}")
}

pub fn variables(config: &ScaffoldConfig) -> VariableMap {
    let preset = config.preset();
    let entries: [(&str, Option<String>); 13] = [
        (TemplateVars::PROJECT_NAME, Some(config.project_name.clone())),
        (TemplateVars::IMAGE_NAME, Some(image_name(&config.project_name))),
        (TemplateVars::STACK, Some(config.stack.to_string())),
        (TemplateVars::PORT, Some(preset.port.to_string())),
        (
            TemplateVars::RUNTIME_VERSION,
            Some(preset.runtime_version.to_string()),
        ),
        (
            TemplateVars::INSTALL_COMMAND,
            Some(config.commands.install.clone()),
        ),
        (TemplateVars::LINT_COMMAND, Some(config.commands.lint.clone())),
        (TemplateVars::TEST_COMMAND, Some(config.commands.test.clone())),
        (TemplateVars::BUILD_COMMAND, Some(config.commands.build.clone())),
        (
            TemplateVars::MIGRATION_COMMAND,
            config.commands.migration.clone(),
        ),
        (
            TemplateVars::PRODUCTION_BRANCH,
            Some(config.production_branch.clone()),
        ),
        (
            TemplateVars::STAGING_BRANCH,
            Some(config.staging_branch.clone()),
        ),
        (TemplateVars::HEALTH_PATH, Some(preset.health_path.to_string())),
    ];
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
