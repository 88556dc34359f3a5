use super::SelectionArgs;
use crate::output::{print_json, print_table};
use crate::root::default_project_name;
use anyhow::Context;
use pipeforge_core::blocks;
use pipeforge_core::scaffold::{plan, pruned_steps, render_artifact};
use pipeforge_core::vars::variables;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct PlannedFile {
    path: String,
    executable: bool,
    exists: bool,
    steps: Vec<String>,
}

#[derive(Serialize)]
struct PlanOutput {
    project_name: String,
    stack: String,
    mode: String,
    use_docker: bool,
    pruned: Vec<&'static str>,
    files: Vec<PlannedFile>,
}

pub fn run(root: &Path, selection: &SelectionArgs, json: bool) -> anyhow::Result<()> {
    let config = selection
        .answers(root)?
        .resolve(&default_project_name(root))
        .context("invalid scaffold configuration")?;
    let vars = variables(&config);
    let source = selection.template_source()?;

    let mut files = Vec::new();
    for artifact in plan(&config) {
        let rendered = render_artifact(source.as_ref(), &config, &vars, artifact)?;
        let steps = if rendered.path.ends_with(".yml") {
            blocks::step_names(&rendered.content)
        } else {
            Vec::new()
        };
        files.push(PlannedFile {
            exists: root.join(&rendered.path).exists(),
            path: rendered.path,
            executable: rendered.executable,
            steps,
        });
    }

    if json {
        return print_json(&PlanOutput {
            project_name: config.project_name.clone(),
            stack: config.stack.to_string(),
            mode: config.mode.to_string(),
            use_docker: config.use_docker,
            pruned: pruned_steps(&config),
            files,
        });
    }

    println!(
        "{} ({}, {} pipeline) into {}",
        config.project_name,
        config.stack,
        config.mode,
        root.display()
    );
    let rows = files
        .iter()
        .map(|f| {
            vec![
                f.path.clone(),
                if f.executable { "yes" } else { "" }.to_string(),
                if f.exists { "exists" } else { "new" }.to_string(),
                f.steps.len().to_string(),
            ]
        })
        .collect();
    print_table(&["FILE", "EXEC", "STATE", "STEPS"], rows);

    let pruned = pruned_steps(&config);
    if !pruned.is_empty() {
        println!("\nSteps removed: any named with {}", quoted(&pruned));
    }
    Ok(())
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(" or ")
}
