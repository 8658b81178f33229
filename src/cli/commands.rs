//! Command dispatch: turn parsed arguments into service calls and output.

use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{PositionRow, TreeRequest, TreeService, TreeSource};
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{
    global_config_dir, global_config_path, local_config_path, RawLayoutConfig, RawSettings,
    Settings,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| CliError::Usage(format!("cwd: {e}")))?,
    };

    match &cli.command {
        Some(Commands::Layout { input }) => cmd_layout(&project_dir, input),
        Some(Commands::Tree { input }) => cmd_tree(&project_dir, input),
        Some(Commands::Svg { input, output }) => cmd_svg(&project_dir, input, output.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&project_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `treevis --help`".to_string(),
        )),
    }
}

/// Settings from config files and environment, then command-line spacing.
fn service_for(project_dir: &Path, input: &InputArgs) -> CliResult<TreeService> {
    let overrides = RawSettings {
        layout: RawLayoutConfig {
            x_spacing: input.x_spacing,
            y_spacing: input.y_spacing,
        },
        ..RawSettings::default()
    };
    let settings = Settings::load_with_overrides(Some(project_dir), &overrides)?;
    Ok(TreeService::new(settings))
}

fn request_for(input: &InputArgs) -> CliResult<TreeRequest> {
    let source = match (&input.file, &input.binary) {
        (_, Some(tokens)) => TreeSource::Binary(tokens.clone()),
        (Some(file), None) => TreeSource::File(file.clone()),
        (None, None) => {
            return Err(CliError::InvalidArgs(
                "either an input file or --binary is required".to_string(),
            ))
        }
    };
    Ok(TreeRequest {
        source,
        root: input.root.clone(),
        order: input.order_key(),
    })
}

#[instrument(level = "debug", skip(input))]
fn cmd_layout(project_dir: &Path, input: &InputArgs) -> CliResult<()> {
    let service = service_for(project_dir, input)?;
    let tree = service.load(&request_for(input)?)?;
    let rows = service.layout_rows(&tree);
    if rows.is_empty() {
        output::warning("tree is empty");
        return Ok(());
    }
    for line in format_rows(&rows) {
        output::info(&line);
    }
    Ok(())
}

/// Aligned columns: id, x, y, label.
fn format_rows(rows: &[PositionRow]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);
    let mut lines = vec![format!("{:<width$}  {:>10}  {:>10}  label", "id", "x", "y")];
    lines.extend(rows.iter().map(|r| {
        format!(
            "{:<width$}  {:>10.2}  {:>10.2}  {}",
            r.id,
            r.x,
            r.y,
            r.label.as_deref().unwrap_or("-")
        )
    }));
    lines
}

#[instrument(level = "debug", skip(input))]
fn cmd_tree(project_dir: &Path, input: &InputArgs) -> CliResult<()> {
    let service = service_for(project_dir, input)?;
    let tree = service.load(&request_for(input)?)?;
    if tree.is_empty() {
        output::warning("tree is empty");
        return Ok(());
    }
    print!("{}", service.render_text(&tree)?);
    Ok(())
}

#[instrument(level = "debug", skip(input))]
fn cmd_svg(project_dir: &Path, input: &InputArgs, out: Option<&Path>) -> CliResult<()> {
    let service = service_for(project_dir, input)?;
    let tree = service.load(&request_for(input)?)?;
    match out {
        Some(path) => {
            service.write_svg(&tree, path)?;
            output::action("Written", &path.display());
        }
        None => print!("{}", service.render_svg(&tree)),
    }
    Ok(())
}

fn cmd_config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => print_path("global", &path),
                None => output::warning("no home directory, global config unavailable"),
            }
            print_path("local", &local_config_path(project_dir));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                let dir = global_config_dir().ok_or_else(|| {
                    CliError::Usage("no home directory, cannot create global config".into())
                })?;
                fs::create_dir_all(&dir).with_path_context("create directory", &dir)?;
                dir.join("treevis.toml")
            } else {
                local_config_path(project_dir)
            };
            init_config(&path)?;
        }
    }
    Ok(())
}

fn print_path(scope: &str, path: &Path) {
    let state = if path.exists() { "exists" } else { "missing" };
    output::info(&format!("  {scope:<6} {} ({state})", path.display()));
}

fn init_config(path: &Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    fs::write(path, Settings::template()).with_path_context("write config", path)?;
    debug!(path = %path.display(), "config template written");
    output::action("Created", &path.display());
    Ok(())
}
