//! diny - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use diny::config::{
    ConfigStore, FileConfigStore, InferenceSettings, InitAction, StyleConfig, choose_init_action,
    edit_style, offer_setup,
};
use diny::flow::{
    CommitFlow, ConsoleReporter, DialoguerConfirmer, FlowState, Notice, Outcome, describe_outcome,
    render_notice,
};
use diny::git::alias::alias_command;
use diny::git::{
    AliasRemoval, GitCommitter, GitDiffSource, install_alias, install_hook, remove_alias,
    resolve_executable,
};
use diny::inference::InferenceClient;

/// Generate commit messages for staged changes with a local model.
#[derive(Parser, Debug)]
#[command(name = "diny")]
#[command(about = "Generate commit messages for staged changes with a local model")]
#[command(version)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a message, confirm it, and commit (default)
    Commit,
    /// Print a generated message to stdout without committing
    ///
    /// Example: diny message | git commit -F -
    Message,
    /// Show the current style configuration
    Config,
    /// Interactively set up the style configuration or install the git hook
    Init,
    /// Install a global `git auto` alias that runs `diny commit`
    Auto {
        #[command(subcommand)]
        action: Option<AutoAction>,
    },
}

#[derive(Subcommand, Debug)]
enum AutoAction {
    /// Remove the `git auto` alias
    Remove,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Commit) {
        Command::Commit => run_commit().await,
        Command::Message => run_message().await,
        Command::Config => show_config(),
        Command::Init => run_init(),
        Command::Auto { action } => run_auto(action),
    }
}

/// Logs go to stderr so `diny message` keeps stdout clean.
fn init_logging(verbose: bool) {
    let default = if verbose { "diny=debug" } else { "warn" };
    let filter = std::env::var("DINY_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolves on Ctrl-C. Never resolves if the signal can't be watched.
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read the current directory")
}

fn discover_store() -> Result<FileConfigStore> {
    FileConfigStore::discover(&current_dir()?)
        .context("Not a git repository. Run diny from within a git repository.")
}

fn load_style() -> Result<StyleConfig> {
    let style = discover_store()?
        .load()
        .context("Failed to load style configuration. Run `diny init` to recreate it.")?;
    Ok(style)
}

fn inference_client() -> Result<InferenceClient> {
    InferenceClient::new(InferenceSettings::from_env()).context("Failed to set up the inference client")
}

async fn run_commit() -> Result<ExitCode> {
    let style = load_style()?;
    let client = inference_client()?;
    let source = GitDiffSource::current_dir();
    let committer = GitCommitter::current_dir();
    let mut reporter = ConsoleReporter::stdout();
    let mut stdout = tokio::io::stdout();

    let mut flow = CommitFlow::new(&source, &client, &mut reporter);
    let outcome = flow
        .run(
            &style,
            &mut stdout,
            interrupt_signal(),
            &DialoguerConfirmer,
            &committer,
        )
        .await?;

    Ok(finish(&outcome, false))
}

async fn run_message() -> Result<ExitCode> {
    let style = load_style()?;
    let client = inference_client()?;
    let source = GitDiffSource::current_dir();
    let mut reporter = ConsoleReporter::stderr();
    let mut sink = tokio::io::sink();

    let mut flow = CommitFlow::new(&source, &client, &mut reporter);
    let outcome = flow
        .generate(&style, &mut sink, interrupt_signal())
        .await?;

    match (&outcome.state, &outcome.message) {
        (FlowState::AwaitingConfirmation, Some(message)) => {
            print!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(finish(&outcome, true)),
    }
}

fn finish(outcome: &Outcome, to_stderr: bool) -> ExitCode {
    if let Some(text) = describe_outcome(outcome) {
        if to_stderr {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }
    ExitCode::from(outcome.exit_code())
}

fn show_config() -> Result<ExitCode> {
    let store = discover_store()?;
    let style = store.load().context("Failed to load style configuration")?;

    println!("📁 {}", store.path().display());
    if !store.exists() {
        println!("   (not saved yet, showing defaults)");
        if offer_setup().context("Configuration prompt failed")? {
            return configure_style(&store, &style);
        }
    }
    println!();
    println!("{}", render_notice(&Notice::Configuration(style)));
    Ok(ExitCode::SUCCESS)
}

fn run_init() -> Result<ExitCode> {
    match choose_init_action().context("Setup was interrupted")? {
        InitAction::ConfigureStyle => {
            let store = discover_store()?;
            let current = store.load().unwrap_or_else(|e| {
                warn!(error = %e, "existing configuration unreadable, starting from defaults");
                StyleConfig::default()
            });
            configure_style(&store, &current)
        }
        InitAction::InstallHook => install_commit_hook(),
    }
}

fn configure_style(store: &FileConfigStore, current: &StyleConfig) -> Result<ExitCode> {
    let style = edit_style(current).context("Configuration setup was interrupted")?;
    store.save(&style).context("Failed to save style configuration")?;

    println!();
    println!("{}", render_notice(&Notice::Configuration(style)));
    println!("✅ Configuration saved to {}", store.path().display());
    Ok(ExitCode::SUCCESS)
}

fn install_commit_hook() -> Result<ExitCode> {
    let executable = resolve_executable().context("Failed to locate the diny executable")?;
    let installed =
        install_hook(&current_dir()?, &executable).context("Failed to install the git hook")?;

    let verb = if installed.updated { "Updated" } else { "Installed" };
    println!("✅ {verb} git hook at {}", installed.path.display());
    println!("   Now `git commit` pre-fills the message with diny's suggestion.");
    Ok(ExitCode::SUCCESS)
}

fn run_auto(action: Option<AutoAction>) -> Result<ExitCode> {
    match action {
        None => {
            let executable = resolve_executable().context("Failed to locate the diny executable")?;
            install_alias(&executable).context("Failed to set the git alias")?;
            println!("✅ Added `git auto` → {}", alias_command(&executable));
            println!("   Stage your changes and run `git auto`.");
        }
        Some(AutoAction::Remove) => match remove_alias().context("Failed to remove the git alias")? {
            AliasRemoval::Removed => println!("🗑️  Removed the `git auto` alias."),
            AliasRemoval::NotFound => println!("ℹ️  No `git auto` alias was set."),
        },
    }
    Ok(ExitCode::SUCCESS)
}
