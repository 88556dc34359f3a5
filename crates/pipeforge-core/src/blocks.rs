//! Line-oriented removal of named steps from a workflow document.
//!
//! A step starts at a header line (`- name: ...` after leading whitespace) and
//! owns every following line up to the next header. No YAML parsing happens
//! here; the scan only looks at header lines.

/// Marker a left-trimmed line must start with to count as a step header.
pub const STEP_HEADER: &str = "- name:";

fn is_step_header(line: &str) -> bool {
    line.trim_start().starts_with(STEP_HEADER)
}

/// Remove every step whose header line contains `name` (case-sensitive substring).
///
/// Single forward pass. A header ends the block being skipped and is then
/// judged on its own, so a later header that also contains `name` starts a new
/// skip. A `name` that matches no header returns `document` unchanged byte for
/// byte; a `name` that matches every header drops everything from the first
/// header onward.
pub fn remove_named_block(document: &str, name: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;

    for line in document.split('\n') {
        let header = is_step_header(line);
        if skipping && header {
            skipping = false;
        }
        if !skipping && header && line.contains(name) {
            skipping = true;
            continue;
        }
        if skipping {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}

/// Names of every step header in `document`, in order.
pub fn step_names(document: &str) -> Vec<String> {
    document
        .lines()
        .filter(|l| is_step_header(l))
        .map(|l| {
            let rest = &l.trim_start()[STEP_HEADER.len()..];
            rest.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
        })
        .collect()
}
