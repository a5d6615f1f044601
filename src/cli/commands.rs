//! Command dispatch

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::RenderService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Canvas, Normalized, TreeNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::{format_value, TreeNodeConvert};

/// Input argument meaning "read the document from stdin".
const STDIN_MARKER: &str = "-";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build { input, output }) => cmd_build(cli, input.as_deref(), output.as_deref()),
        Some(Commands::Tree { input, sorted }) => cmd_tree(cli, input.as_deref(), *sorted),
        Some(Commands::Leaves { input }) => cmd_leaves(cli, input.as_deref()),
        Some(Commands::Render {
            input,
            output_dir,
            width,
            height,
        }) => cmd_render(cli, input.as_deref(), output_dir.as_deref(), *width, *height),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into()),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidArgs(format!(
            "project directory does not exist: {}",
            dir.display()
        ))),
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| InfraError::io("get current directory", e).into()),
    }
}

/// Layered settings with the global `--format` flag applied last.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let project_dir = project_dir(cli)?;
    let mut settings = Settings::load(Some(&project_dir))?;
    if let Some(format) = cli.format {
        settings.format = format;
    }
    Ok(settings)
}

/// Explicit input as given; the configured default resolves against the project dir.
fn resolve_input(cli: &Cli, settings: &Settings, input: Option<&Path>) -> CliResult<PathBuf> {
    match input {
        Some(path) => Ok(path.to_path_buf()),
        None if settings.input.is_relative() => Ok(project_dir(cli)?.join(&settings.input)),
        None => Ok(settings.input.clone()),
    }
}

fn load_normalized(container: &ServiceContainer, input: &Path) -> CliResult<Normalized> {
    if input.as_os_str() == STDIN_MARKER {
        let content = read_stdin()?;
        return Ok(container.dataset.parse(&content, "stdin")?);
    }
    Ok(container.dataset.load(input)?)
}

fn load_tree(container: &ServiceContainer, input: &Path) -> CliResult<TreeNode> {
    if input.as_os_str() == STDIN_MARKER {
        let content = read_stdin()?;
        return Ok(container.dataset.parse_tree(&content, "stdin")?);
    }
    Ok(container.dataset.load_tree(input)?)
}

fn read_stdin() -> CliResult<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| InfraError::io("read stdin", e))?;
    Ok(content)
}

#[instrument(skip(cli))]
fn cmd_build(cli: &Cli, input: Option<&Path>, output: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = resolve_input(cli, &settings, input)?;
    let container = ServiceContainer::new(settings);

    let normalized = load_normalized(&container, &input)?;
    if let Normalized::PassThrough(_) = normalized {
        output::warning(&format!(
            "{} has no id/ID records, passing document through unchanged",
            input.display()
        ));
    }
    let json = serde_json::to_string_pretty(&normalized)
        .map_err(|e| InfraError::io("serialize tree", io::Error::new(io::ErrorKind::InvalidData, e)))?;

    match output {
        Some(path) => {
            container
                .fs
                .ensure_parent(path)
                .and_then(|_| container.fs.write(path, &json))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Wrote", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, input: Option<&Path>, sorted: bool) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = resolve_input(cli, &settings, input)?;
    let container = ServiceContainer::new(settings);

    let tree = load_tree(&container, &input)?;
    debug!("tree: {} nodes, depth {}", tree.node_count(), tree.depth());
    if sorted {
        output::info(&RenderService::prepare(&tree).to_tree_string());
    } else {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_leaves(cli: &Cli, input: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = resolve_input(cli, &settings, input)?;
    let container = ServiceContainer::new(settings);

    let tree = load_tree(&container, &input)?;
    for leaf in tree.leaves() {
        let value = leaf.value.map(format_value).unwrap_or_else(|| "-".to_string());
        output::leaf(&leaf.path, &value);
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_render(
    cli: &Cli,
    input: Option<&Path>,
    output_dir: Option<&Path>,
    width: Option<f64>,
    height: Option<f64>,
) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    if let Some(dir) = output_dir {
        settings.output_dir = dir.to_path_buf();
    }
    settings.canvas = Canvas::new(
        width.unwrap_or(settings.canvas.width),
        height.unwrap_or(settings.canvas.height),
    );
    settings
        .validate()
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;

    let input = resolve_input(cli, &settings, input)?;
    let output_dir = settings.output_dir.clone();
    let container = ServiceContainer::new(settings);

    let tree = load_tree(&container, &input)?;
    let panels = container.render.render_all(&tree)?;

    output::header(&format!("Rendered {} panels", panels.len()));
    for panel in &panels {
        output::success_detail(&output_dir.join(format!("{}.json", panel.container)).display());
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))?
            } else {
                local_config_path(&project_dir(cli)?)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            output::header("Config files");
            if let Some(global) = global_config_path() {
                let exists = global.exists();
                output::path_status("global", &global, exists);
            }
            let local = local_config_path(&project_dir(cli)?);
            let exists = local.exists();
            output::path_status("local", &local, exists);
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
