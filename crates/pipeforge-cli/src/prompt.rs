//! Interactive question flow that fills in whatever flags and the answers file left open.

use anyhow::bail;
use pipeforge_core::config::{Answers, DEFAULT_PRODUCTION_BRANCH, DEFAULT_STAGING_BRANCH};
use pipeforge_core::preset::Preset;
use pipeforge_core::types::{PipelineMode, Stack};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> anyhow::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("cancelled: input closed before setup finished, nothing was written");
        }
        Ok(line.trim().to_string())
    }

    /// Free-text question; an empty answer takes `default`.
    pub fn ask(&mut self, question: &str, default: &str) -> anyhow::Result<String> {
        write!(self.output, "{question} [{default}]: ")?;
        let answer = self.read_answer()?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    /// Free-text question where an empty answer means "none".
    pub fn ask_optional(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{question} (leave empty for none): ")?;
        let answer = self.read_answer()?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }

    pub fn confirm(&mut self, question: &str, default: bool) -> anyhow::Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{question} [{hint}]: ")?;
            match self.read_answer()?.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer 'y' or 'n'.")?,
            }
        }
    }

    /// Pick one of `options`; re-asks until the answer parses.
    pub fn choose<T>(&mut self, question: &str, options: &[T], default: T) -> anyhow::Result<T>
    where
        T: FromStr + Display + Copy,
    {
        let listed: Vec<String> = options.iter().map(ToString::to_string).collect();
        loop {
            write!(
                self.output,
                "{question} ({}) [{default}]: ",
                listed.join("/")
            )?;
            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please pick one of: {}", listed.join(", "))?,
            }
        }
    }

    /// Ask for every field still unset in `known`. Defaults come from the chosen stack's preset.
    pub fn collect(&mut self, known: Answers, default_name: &str) -> anyhow::Result<Answers> {
        let mut answers = known;

        if answers.project_name.is_none() {
            answers.project_name = Some(self.ask("Project name", default_name)?);
        }
        let stack = match answers.stack {
            Some(stack) => stack,
            None => self.choose("Stack", Stack::all(), Stack::Node)?,
        };
        answers.stack = Some(stack);
        let preset = Preset::for_stack(stack);

        if answers.production_branch.is_none() {
            answers.production_branch =
                Some(self.ask("Production branch", DEFAULT_PRODUCTION_BRANCH)?);
        }
        if answers.staging_branch.is_none() {
            answers.staging_branch = Some(self.ask("Staging branch", DEFAULT_STAGING_BRANCH)?);
        }
        if answers.install_command.is_none() {
            answers.install_command = Some(self.ask("Install command", preset.install_command)?);
        }
        if answers.lint_command.is_none() {
            answers.lint_command = Some(self.ask("Lint command", preset.lint_command)?);
        }
        if answers.test_command.is_none() {
            answers.test_command = Some(self.ask("Test command", preset.test_command)?);
        }
        if answers.build_command.is_none() {
            answers.build_command = Some(self.ask("Build command", preset.build_command)?);
        }
        if answers.migration_command.is_none() {
            answers.migration_command = self.ask_optional("Database migration command")?;
        }
        if answers.use_docker.is_none() {
            answers.use_docker = Some(self.confirm("Build and deploy with Docker?", true)?);
        }
        if answers.mode.is_none() {
            answers.mode = Some(self.choose(
                "Pipeline mode",
                &[PipelineMode::Simple, PipelineMode::Production],
                PipelineMode::Production,
            )?);
        }
        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn empty_answers_take_defaults() {
        let mut p = prompter("\n\n\n\n\n\n\n\n\n\n\n");
        let answers = p.collect(Answers::default(), "shop").unwrap();
        let config = answers.resolve("unused").unwrap();
        assert_eq!(config.project_name, "shop");
        assert_eq!(config.stack, Stack::Node);
        assert_eq!(config.commands.install, "npm ci");
        assert_eq!(config.commands.migration, None);
        assert!(config.use_docker);
        assert_eq!(config.mode, PipelineMode::Production);
    }

    #[test]
    fn preset_defaults_follow_chosen_stack() {
        let input = "api\ngo\nrelease\nstage\n\n\n\n\nmake migrate\nn\nsimple\n";
        let mut p = prompter(input);
        let config = p
            .collect(Answers::default(), "ignored")
            .unwrap()
            .resolve("ignored")
            .unwrap();
        assert_eq!(config.stack, Stack::Go);
        assert_eq!(config.production_branch, "release");
        assert_eq!(config.staging_branch, "stage");
        assert_eq!(config.commands.test, "go test ./...");
        assert_eq!(config.commands.migration.as_deref(), Some("make migrate"));
        assert!(!config.use_docker);
        assert_eq!(config.mode, PipelineMode::Simple);
    }

    #[test]
    fn known_fields_are_not_asked() {
        let known = Answers {
            project_name: Some("shop".into()),
            stack: Some(Stack::Python),
            production_branch: Some("main".into()),
            staging_branch: Some("develop".into()),
            install_command: Some("pip install .".into()),
            lint_command: Some("ruff check .".into()),
            test_command: Some("pytest".into()),
            build_command: Some("true".into()),
            migration_command: Some("alembic upgrade head".into()),
            use_docker: Some(true),
            mode: Some(PipelineMode::Production),
        };
        let mut p = prompter("");
        let answers = p.collect(known.clone(), "x").unwrap();
        assert_eq!(answers, known);
        assert!(p.output.is_empty());
    }

    #[test]
    fn invalid_choice_is_asked_again() {
        let mut p = prompter("ruby\npython\n");
        let stack = p.choose("Stack", Stack::all(), Stack::Node).unwrap();
        assert_eq!(stack, Stack::Python);
        let out = String::from_utf8(p.output).unwrap();
        assert!(out.contains("Please pick one of: node, python, go"));
    }

    #[test]
    fn confirm_retries_on_garbage() {
        let mut p = prompter("maybe\nY\n");
        assert!(p.confirm("Docker?", false).unwrap());
    }

    #[test]
    fn closed_input_cancels() {
        let mut p = prompter("shop\n");
        let err = p.collect(Answers::default(), "x").unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }
}
