use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;

use containerizer::config::Config;
use containerizer::container::tasks::{add_publish_task, workspace_project_path, TASK_LABEL};
use containerizer::container::{
    find_project, ContainerSpec, ContainerState, ContainerWizard, DotnetCommand, WizardDefaults,
};
use containerizer::logging;
use containerizer::ui::{install_panic_hook, TerminalSurface};

#[derive(Parser)]
#[command(name = "containerize")]
#[command(about = "Publish a .NET project as a container image")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Project file to containerize (default: first *.csproj found)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Save the base image and tag answers as the next run's defaults
    #[arg(long)]
    remember: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a "Publish container" task to a VS Code tasks file
    AddTask {
        /// Tasks file to update
        #[arg(long, default_value = ".vscode/tasks.json")]
        path: PathBuf,
    },
}

/// Flags shared by every command
struct RunOptions {
    project: PathBuf,
    dry_run: bool,
    remember: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let mut config = Config::load(cli.config.as_deref())?;

    // Prompts are drawn on stderr, leaving stdout for command output
    let is_tui_mode = std::io::stderr().is_terminal();

    // Initialize logging (file-based while prompting, stderr otherwise)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    if !is_tui_mode {
        bail!("containerize asks its questions on the terminal, but stderr is not a terminal");
    }

    let options = RunOptions {
        project: resolve_project(cli.project)?,
        dry_run: cli.dry_run,
        remember: cli.remember,
    };

    let result = match cli.command {
        Some(Commands::AddTask { path }) => cmd_add_task(&mut config, &options, &path).await,
        None => cmd_publish(&mut config, &options).await,
    };

    // Print log file path on exit if logs were written
    if let Some(log_path) = logging_handle.log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn resolve_project(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(project) = explicit {
        if !project.is_file() {
            bail!("Project file {} does not exist", project.display());
        }
        return Ok(project);
    }

    let root = std::env::current_dir().context("Failed to read current directory")?;
    find_project(&root)?.ok_or_else(|| anyhow!("No .csproj file found under {}", root.display()))
}

/// Run the wizard in the terminal. `None` when the user cancelled.
async fn collect_spec(config: &mut Config, remember: bool) -> Result<Option<ContainerSpec>> {
    install_panic_hook();

    let wizard = ContainerWizard::new(WizardDefaults::from(&config.containerizer));
    let surface = TerminalSurface::new().context("Failed to initialize terminal")?;
    let state = wizard.collect(surface, ContainerState::default()).await?;

    let Some(spec) = state.finish() else {
        info!(?state, "Wizard cancelled");
        return Ok(None);
    };
    info!(image = %spec.image_name, tag = %spec.tag, "Wizard finished");

    if remember {
        config.remember(&spec);
        config.save()?;
        info!(path = %Config::local_config_path().display(), "Saved defaults");
    }
    Ok(Some(spec))
}

async fn cmd_publish(config: &mut Config, options: &RunOptions) -> Result<()> {
    let Some(spec) = collect_spec(config, options.remember).await? else {
        println!("Cancelled.");
        return Ok(());
    };

    let add_package = DotnetCommand::add_package(&options.project, &config.containerizer.package);
    let publish = DotnetCommand::publish(&options.project, &spec, &config.containerizer);

    if options.dry_run {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        println!("{}", add_package);
        println!("{}", publish);
        return Ok(());
    }

    add_package.run().await?;
    publish.run().await?;

    println!("Published {}:{}", spec.image_name, spec.tag);
    Ok(())
}

async fn cmd_add_task(config: &mut Config, options: &RunOptions, path: &Path) -> Result<()> {
    let Some(spec) = collect_spec(config, options.remember).await? else {
        println!("Cancelled.");
        return Ok(());
    };

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let tasks_path = cwd.join(path);
    let project = workspace_project_path(&cwd.join(&options.project), &tasks_path);
    let publish = DotnetCommand::publish(&project, &spec, &config.containerizer);

    if options.dry_run {
        println!("Would add \"{}\" to {}: {}", TASK_LABEL, path.display(), publish);
        return Ok(());
    }

    add_publish_task(path, &publish)?;
    println!("Added \"{}\" task to {}", TASK_LABEL, path.display());
    Ok(())
}
