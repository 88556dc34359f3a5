use crate::error::PipeforgeError;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stack {
    Node,
    Python,
    Go,
}

impl Stack {
    pub fn all() -> &'static [Stack] {
        &[Stack::Node, Stack::Python, Stack::Go]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stack::Node => "node",
            Stack::Python => "python",
            Stack::Go => "go",
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stack {
    type Err = PipeforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" | "nodejs" | "node.js" => Ok(Stack::Node),
            "python" | "py" => Ok(Stack::Python),
            "go" | "golang" => Ok(Stack::Go),
            _ => Err(PipeforgeError::UnknownStack(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// One combined workflow file.
    Simple,
    /// Separate ci/build/deploy/rollback/security workflows plus scripts.
    #[default]
    Production,
}

impl PipelineMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineMode::Simple => "simple",
            PipelineMode::Production => "production",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PipelineMode {
    type Err = PipeforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(PipelineMode::Simple),
            "production" | "prod" => Ok(PipelineMode::Production),
            _ => Err(PipeforgeError::UnknownMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// A kind of generated file. Each kind maps to one template and one target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    CiCd,
    Ci,
    Build,
    Deploy,
    Rollback,
    Security,
    DeployScript,
    RollbackScript,
    HealthCheckScript,
    Dockerfile,
    DockerIgnore,
}

impl Artifact {
    pub fn as_str(self) -> &'static str {
        match self {
            Artifact::CiCd => "ci_cd",
            Artifact::Ci => "ci",
            Artifact::Build => "build",
            Artifact::Deploy => "deploy",
            Artifact::Rollback => "rollback",
            Artifact::Security => "security",
            Artifact::DeployScript => "deploy_script",
            Artifact::RollbackScript => "rollback_script",
            Artifact::HealthCheckScript => "health_check_script",
            Artifact::Dockerfile => "dockerfile",
            Artifact::DockerIgnore => "dockerignore",
        }
    }

    /// File name inside the template repository.
    pub fn template_file(self) -> &'static str {
        match self {
            Artifact::CiCd => "ci-cd.yml",
            Artifact::Ci => "ci.yml",
            Artifact::Build => "build.yml",
            Artifact::Deploy => "deploy.yml",
            Artifact::Rollback => "rollback.yml",
            Artifact::Security => "security.yml",
            Artifact::DeployScript => "deploy.sh",
            Artifact::RollbackScript => "rollback.sh",
            Artifact::HealthCheckScript => "health-check.sh",
            Artifact::Dockerfile => "Dockerfile",
            // Stored without the leading dot so asset embedding never treats it as hidden.
            Artifact::DockerIgnore => "dockerignore",
        }
    }

    /// Target path relative to the project root.
    pub fn target_path(self) -> String {
        match self {
            Artifact::CiCd
            | Artifact::Ci
            | Artifact::Build
            | Artifact::Deploy
            | Artifact::Rollback
            | Artifact::Security => format!("{}/{}", paths::WORKFLOWS_DIR, self.template_file()),
            Artifact::DeployScript | Artifact::RollbackScript | Artifact::HealthCheckScript => {
                format!("{}/{}", paths::SCRIPTS_DIR, self.template_file())
            }
            Artifact::Dockerfile => paths::DOCKERFILE.to_string(),
            Artifact::DockerIgnore => paths::DOCKERIGNORE.to_string(),
        }
    }

    pub fn is_executable(self) -> bool {
        matches!(
            self,
            Artifact::DeployScript | Artifact::RollbackScript | Artifact::HealthCheckScript
        )
    }

    /// Workflows whose template holds optional database migration steps.
    pub fn carries_migration_steps(self) -> bool {
        matches!(self, Artifact::Deploy | Artifact::CiCd)
    }

    /// Workflows whose template holds both container-image and release-bundle steps.
    pub fn carries_deploy_variants(self) -> bool {
        matches!(
            self,
            Artifact::Build | Artifact::Deploy | Artifact::Security | Artifact::CiCd
        )
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
