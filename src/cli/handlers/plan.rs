// EN: src/cli/handlers/plan.rs

use anyhow::{Result, anyhow, bail};
use colored::*;

use crate::cli::Cli;
use crate::constants::{INSTRUCTION_CAPACITY, ME};
use crate::core::{
    config_loader, diagnostics::LogSink, entries, paths,
    resolver::{ResolveError, Resolver},
};
use crate::models::Instruction;

/// The main handler: resolve every file and show which command receives it.
pub fn handle(cli: &Cli) -> Result<()> {
    // 1. Nothing to do without files.
    if cli.files.is_empty() {
        bail!(t!("cli.error.no_file"));
    }

    // 2. Load the instructions. Malformed lines are reported through the log.
    let config_path = paths::resolve_config_path(cli.config.as_deref())?;
    let store = config_loader::load_instructions(&config_path, INSTRUCTION_CAPACITY, &mut LogSink)?;
    if store.is_empty() {
        println!(
            "{}",
            format!(t!("cli.plan.no_instructions"), path = config_path.display()).yellow()
        );
    }

    // 3. Assign each file to its instruction. Unmatched files do not stop the run.
    let mut resolver = Resolver::new(store);
    for entry in entries::collect_entries(&cli.files, cli.directory_mode()) {
        if let Err(ResolveError::NoCommand { entry, extension }) =
            resolver.assign(&entry, &cli.only)
        {
            eprintln!(
                t!("cli.unmatched"),
                me = ME,
                entry = entry,
                extension = extension
            );
        }
    }

    // 4. Show the plan, in declaration order.
    let mut planned = resolver.planned().peekable();
    if planned.peek().is_none() {
        println!("{}", t!("cli.plan.nothing").dimmed());
        return Ok(());
    }
    for instruction in planned {
        print_instruction(instruction)?;
    }
    Ok(())
}

fn print_instruction(instruction: &Instruction) -> Result<()> {
    match &instruction.tag {
        Some(tag) => println!(
            "{} {}",
            instruction.command.green().bold(),
            format!("@{}", tag).dimmed()
        ),
        None => println!("{}", instruction.command.green().bold()),
    }
    for argument in &instruction.arguments {
        println!("\t{}", argument.display());
    }
    println!("> {}\n", shell_line(instruction)?.cyan());
    Ok(())
}

/// The command and its arguments as one shell-quoted line.
fn shell_line(instruction: &Instruction) -> Result<String> {
    let arguments: Vec<_> = instruction
        .arguments
        .iter()
        .map(|a| a.to_string_lossy())
        .collect();
    let words = std::iter::once(instruction.command.as_str())
        .chain(arguments.iter().map(|a| a.as_ref()));
    shlex::try_join(words).map_err(|e| anyhow!("Cannot quote command '{}': {}", instruction.command, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_shell_line_quotes_arguments() {
        let mut instruction = Instruction::new("evince", 1);
        instruction.arguments.push("my report.pdf".into());
        instruction.arguments.push("plain.pdf".into());
        assert_eq!(
            shell_line(&instruction).unwrap(),
            "evince 'my report.pdf' plain.pdf"
        );
    }

    #[test]
    fn test_handle_requires_files() {
        let cli = Cli::try_parse_from(["xopen"]).unwrap();
        let error = handle(&cli).unwrap_err();
        assert!(error.to_string().contains("no file given"));
    }

    #[test]
    fn test_handle_reports_unreadable_config() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.conf").display().to_string();
        let cli = Cli::try_parse_from(["xopen", "--config", &missing, "a.pdf"]).unwrap();
        assert!(handle(&cli).is_err());
    }

    #[test]
    fn test_handle_tolerates_unmatched_files() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("xopen.conf");
        fs::write(&config, "evince - pdf\n").unwrap();
        let config = config.display().to_string();

        let cli = Cli::try_parse_from(["xopen", "-c", &config, "a.pdf", "b.txt"]).unwrap();
        assert!(handle(&cli).is_ok());
    }
}
