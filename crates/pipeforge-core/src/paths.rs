use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Target layout
// ---------------------------------------------------------------------------

pub const WORKFLOWS_DIR: &str = ".github/workflows";
pub const SCRIPTS_DIR: &str = "scripts";
pub const DOCKERFILE: &str = "Dockerfile";
pub const DOCKERIGNORE: &str = ".dockerignore";

/// Default answers file looked up in the project root.
pub const ANSWERS_FILE: &str = ".pipeforge.yaml";

// ---------------------------------------------------------------------------
// Slug normalization
// ---------------------------------------------------------------------------

static SLUG_STRIP_RE: OnceLock<Regex> = OnceLock::new();

fn slug_strip_re() -> &'static Regex {
    SLUG_STRIP_RE.get_or_init(|| Regex::new(r"[^a-z0-9\-_]").unwrap())
}

/// Lowercase `name` and drop every character outside `[a-z0-9-_]`.
///
/// The result is safe to use as a directory name and as a container image name.
/// May be empty; callers decide whether that is acceptable.
pub fn slugify(name: &str) -> String {
    slug_strip_re()
        .replace_all(&name.to_lowercase(), "")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
