//! prrompt - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use prrompt::config::PromptConfig;
use prrompt::extract::{ExtractionReport, Extractor, Outcome};
use prrompt::git::GitCli;
use prrompt::{hook, logging};

/// Move prompt file changes from a commit onto their own branch.
#[derive(Parser, Debug)]
#[command(name = "prrompt")]
#[command(about = "Move prompt file changes from a commit onto their own branch")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Commit to process (the post-commit hook passes the new commit's SHA)
    commit: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install the post-commit hook into the current repository
    Install {
        /// Overwrite an existing post-commit hook without backing it up
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match (cli.command, cli.commit) {
        (Some(Command::Install { force }), _) => install_hook(force),
        (None, Some(commit)) => process_commit(&commit),
        (None, None) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a commit SHA is required; prrompt is meant to run as a git post-commit hook (see `prrompt install`)",
            )
            .exit(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Analyze a commit and extract its prompt files.
fn process_commit(commit: &str) -> Result<()> {
    which::which("git").map_err(|_| anyhow!("git is required but was not found on PATH"))?;

    let git = GitCli::open(".")?;
    let config = PromptConfig::load(&git)?;

    match Extractor::new(&git, &config).run(commit)? {
        Outcome::Extracted(report) => print_report(&report, &config),
        // Ordinary commits and re-triggered hooks stay silent
        Outcome::NoPromptFiles(_) | Outcome::Skipped(_) => {}
    }

    Ok(())
}

/// Install the post-commit hook pointing at this executable.
fn install_hook(force: bool) -> Result<()> {
    let exe = std::env::current_exe()
        .map_err(|e| anyhow!("Failed to get executable path: {}", e))?;

    let installed = hook::install(Path::new("."), &exe, force)?;

    if let Some(backup) = &installed.backup {
        println!("Existing hook saved to {}", backup.display());
    }
    println!("✓ Installed post-commit hook at {}", installed.path.display());

    Ok(())
}

fn print_report(report: &ExtractionReport, config: &PromptConfig) {
    let commit = &report.commit;

    println!();
    println!(
        "✓ Extracted {} prompt file(s) from {} ({}) to {}",
        commit.prompt_files.len(),
        commit.short_sha(),
        if commit.is_mixed() { "mixed commit" } else { "prompt-only commit" },
        report.prompt_branch
    );

    if commit.is_mixed() {
        println!(
            "  {} other file(s) left on {}",
            commit.other_files.len(),
            commit.source_branch
        );
    }

    match &report.push_warning {
        None => println!("✓ Pushed to {}/{}", config.remote, report.prompt_branch),
        Some(warning) => {
            eprintln!("Warning: failed to push: {}", warning);
            eprintln!(
                "Push manually with: git push -u {} {}",
                config.remote, report.prompt_branch
            );
        }
    }

    println!();
    println!("Create PR: {}", report.compare_url);
    println!();
}
