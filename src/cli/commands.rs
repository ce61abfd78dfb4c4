//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{AssemblyReport, TreeDisplay};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Deepest chart the text and JSON printers accept; both recurse per level.
pub const MAX_OUTPUT_DEPTH: usize = 1_000;

/// Reject charts too deep to print.
pub fn check_output_depth(depth: usize) -> CliResult<()> {
    if depth > MAX_OUTPUT_DEPTH {
        return Err(CliError::TooDeep {
            depth,
            limit: MAX_OUTPUT_DEPTH,
        });
    }
    Ok(())
}

/// Run the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("resolve current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree { file }) => cmd_tree(&container, file.as_deref()),
        Some(Commands::Layout { file, pretty, text }) => {
            cmd_layout(&container, file.as_deref(), *pretty, *text)
        }
        Some(Commands::Check { file }) => cmd_check(&container, file.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&container, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into()),
    }
}

/// Explicit argument first, then the configured snapshot.
fn resolve_snapshot(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| container.settings.snapshot.clone())
        .ok_or_else(|| {
            CliError::Usage("no snapshot file given and no `snapshot` configured".to_string())
        })
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_snapshot(container, file)?;
    let chart = container.chart.assemble(&path)?;
    debug!("cmd_tree: {} tree(s)", chart.forest.len());
    for tree in &chart.forest {
        check_output_depth(tree.max_depth())?;
    }
    for tree in &chart.forest {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_layout(
    container: &ServiceContainer,
    file: Option<&Path>,
    pretty: bool,
    text: bool,
) -> CliResult<()> {
    let path = resolve_snapshot(container, file)?;
    let forest = container.chart.render(&path)?;
    for root in &forest {
        check_output_depth(root.max_depth())?;
    }

    if text {
        for root in &forest {
            output::info(&root.to_tree_string());
        }
        return Ok(());
    }

    let json = if pretty {
        serde_json::to_string_pretty(&forest)
    } else {
        serde_json::to_string(&forest)
    }
    .map_err(InfraError::from)?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_snapshot(container, file)?;
    let chart = container.chart.assemble(&path)?;
    let report = &chart.report;

    output::header(&format!("Snapshot: {}", path.display()));
    output::detail(&format!("records:    {}", chart.loaded));
    output::detail(&format!("trees:      {}", chart.forest.len()));
    if let Some(root) = report.selected_root {
        output::detail(&format!("root:       #{root}"));
    }
    output::detail(&format!("not shown:  {}", report.unreachable));

    print_ids("discarded root(s)", &report.discarded_roots);
    print_ids("pruned under terminal node", &report.pruned);

    if report.is_clean() {
        output::success("no link problems");
        return Ok(());
    }

    print_problems("orphan(s), parent not found", &report.orphans);
    print_problems("self reference(s)", &report.self_references);
    print_problems("duplicate id(s)", &report.duplicate_ids);
    Err(CliError::Inconsistent {
        count: problem_count(report),
    })
}

fn problem_count(report: &AssemblyReport) -> usize {
    report.orphans.len() + report.self_references.len() + report.duplicate_ids.len()
}

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_ids(label: &str, ids: &[i64]) {
    if !ids.is_empty() {
        output::detail(&format!("{label}: {}", format_ids(ids)));
    }
}

fn print_problems(label: &str, ids: &[i64]) {
    if !ids.is_empty() {
        output::failure(&format!("{} {label}: {}", ids.len(), format_ids(ids)));
    }
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!(
                    "global: {} {}",
                    path.display(),
                    exists_marker(container, &path)
                )),
                None => output::detail(&"global: <no config directory>"),
            }
            let local = local_config_path(project_dir);
            output::detail(&format!(
                "local:  {} {}",
                local.display(),
                exists_marker(container, &local)
            ));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                output::warning(&format!("config already exists: {}", path.display()));
                return Err(CliError::Usage(format!(
                    "refusing to overwrite {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn exists_marker(container: &ServiceContainer, path: &Path) -> &'static str {
    if container.fs.exists(path) {
        "(exists)"
    } else {
        "(missing)"
    }
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_depth_at_limit_when_checking_then_accepts() {
        assert!(check_output_depth(MAX_OUTPUT_DEPTH).is_ok());
    }

    #[test]
    fn given_depth_past_limit_when_checking_then_rejects() {
        assert!(matches!(
            check_output_depth(MAX_OUTPUT_DEPTH + 1),
            Err(CliError::TooDeep { depth, limit }) if depth == MAX_OUTPUT_DEPTH + 1 && limit == MAX_OUTPUT_DEPTH
        ));
    }

    #[test]
    fn given_ids_when_formatting_then_joins_with_hash_prefix() {
        assert_eq!(format_ids(&[3, 999]), "#3, #999");
        assert_eq!(format_ids(&[]), "");
    }

    #[test]
    fn given_report_when_counting_problems_then_ignores_normalization_drops() {
        let report = AssemblyReport {
            orphans: vec![1],
            duplicate_ids: vec![2, 3],
            pruned: vec![4],
            discarded_roots: vec![5],
            ..AssemblyReport::default()
        };
        assert_eq!(problem_count(&report), 3);
    }
}
