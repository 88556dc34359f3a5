use super::SelectionArgs;
use crate::output::{print_json, print_report};
use crate::prompt::Prompter;
use crate::root::default_project_name;
use anyhow::Context;
use clap::Args;
use pipeforge_core::config::ScaffoldConfig;
use pipeforge_core::io::{DryRunMaterializer, FsMaterializer, Materializer};
use pipeforge_core::scaffold::{FileStatus, ReportEntry, ScaffoldReport, Scaffolder};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Overwrite files that already exist (default: leave them untouched)
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Accept defaults for anything not given by flags or the answers file
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Report what would be written without touching the disk
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct InitSummary<'a> {
    root: String,
    config: &'a ScaffoldConfig,
    dry_run: bool,
    written: usize,
    skipped: usize,
    files: &'a [ReportEntry],
}

pub fn run(root: &Path, args: InitArgs, json: bool) -> anyhow::Result<()> {
    let known = args.selection.answers(root)?;
    let default_name = default_project_name(root);

    let interactive = !args.yes && !json && std::io::stdin().is_terminal();
    let answers = if interactive {
        let stdin = std::io::stdin();
        Prompter::new(stdin.lock(), std::io::stderr()).collect(known, &default_name)?
    } else {
        known
    };
    let config = answers
        .resolve(&default_name)
        .context("invalid scaffold configuration")?;

    let source = args.selection.template_source()?;
    let mut sink: Box<dyn Materializer> = if args.dry_run {
        Box::new(DryRunMaterializer::new(root))
    } else {
        Box::new(FsMaterializer::new(root))
    };

    if !json {
        println!(
            "Scaffolding CI/CD for {} ({}, {} pipeline, {}) in: {}",
            config.project_name,
            config.stack,
            config.mode,
            if config.use_docker { "docker" } else { "release bundle" },
            root.display()
        );
    }

    let mut report = ScaffoldReport::default();
    let result = Scaffolder::new(source.as_ref(), sink.as_mut())
        .overwrite(args.force)
        .run(&config, &mut report);

    if json {
        if result.is_ok() {
            print_json(&InitSummary {
                root: root.display().to_string(),
                config: &config,
                dry_run: args.dry_run,
                written: report.count(FileStatus::Written),
                skipped: report.count(FileStatus::Skipped),
                files: &report.entries,
            })?;
        }
    } else {
        print_report(&report, args.dry_run);
    }
    result.context("scaffold aborted; files listed above as created were kept")?;

    if !json {
        print_footer(&report, &config, args.dry_run);
    }
    Ok(())
}

fn print_footer(report: &ScaffoldReport, config: &ScaffoldConfig, dry_run: bool) {
    let written = report.count(FileStatus::Written);
    let skipped = report.count(FileStatus::Skipped);
    if dry_run {
        println!("\nDry run: {written} file(s) would be written, {skipped} left as is.");
        return;
    }
    println!("\n{written} file(s) written, {skipped} skipped.");
    if report.has_skipped() {
        println!("Existing files were left untouched. Re-run with --force to overwrite them.");
    }
    if written > 0 {
        println!("\nNext:");
        println!("  - add DEPLOY_HOST, DEPLOY_USER and DEPLOY_SSH_KEY as repository secrets");
        println!("  - set the APP_URL variable on the staging and production environments");
        if config.has_migration() {
            println!("  - add DATABASE_URL on the target hosts for migrations");
        }
    }
}
