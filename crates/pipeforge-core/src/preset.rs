use crate::types::Stack;
use serde::Serialize;

/// Per-stack defaults used when the caller leaves a field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub stack: Stack,
    pub runtime: &'static str,
    pub port: u16,
    pub runtime_version: &'static str,
    pub install_command: &'static str,
    pub lint_command: &'static str,
    pub test_command: &'static str,
    pub build_command: &'static str,
    pub health_path: &'static str,
}

static NODE: Preset = Preset {
    stack: Stack::Node,
    runtime: "Node.js",
    port: 3000,
    runtime_version: "20",
    install_command: "npm ci",
    lint_command: "npm run lint",
    test_command: "npm test",
    build_command: "npm run build",
    health_path: "/health",
};

static PYTHON: Preset = Preset {
    stack: Stack::Python,
    runtime: "Python",
    port: 8000,
    runtime_version: "3.12",
    install_command: "pip install -r requirements.txt",
    lint_command: "ruff check .",
    test_command: "pytest",
    build_command: "python -m compileall -q .",
    health_path: "/health",
};

static GO: Preset = Preset {
    stack: Stack::Go,
    runtime: "Go",
    port: 8080,
    runtime_version: "1.22",
    install_command: "go mod download",
    lint_command: "go vet ./...",
    test_command: "go test ./...",
    build_command: "go build -o bin/app .",
    health_path: "/healthz",
};

impl Preset {
    pub fn for_stack(stack: Stack) -> &'static Preset {
        match stack {
            Stack::Node => &NODE,
            Stack::Python => &PYTHON,
            Stack::Go => &GO,
        }
    }

    pub fn all() -> impl Iterator<Item = &'static Preset> {
        Stack::all().iter().map(|s| Preset::for_stack(*s))
    }
}
