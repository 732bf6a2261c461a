use crate::client::HttpBackend;
use crate::core::{DependencyGraph, Engine, RowState};
use crate::error::FieldsmithResult;
use crate::parser;
use crate::types::{FieldTable, RunConfig};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the check command: parse the template and run every structural
/// validation without touching the network.
pub fn check(file: PathBuf) -> FieldsmithResult<()> {
    println!("{}", "🔎 Fieldsmith - Checking template".bold().green());
    println!("   File: {}\n", file.display());

    let table = parser::load_table(&file)?;
    println!("   Parsed {} field definition(s)", table.len());

    let graph = DependencyGraph::build(&table)?;
    let order = graph.schedule()?;
    println!(
        "   Dependency graph is acyclic, {} row(s) schedulable",
        order.len()
    );

    println!("\n{}", "✅ Template is ready to push".bold().green());
    Ok(())
}

/// Execute the plan command: show the dependency-resolved creation order.
pub fn plan(file: PathBuf, verbose: bool) -> FieldsmithResult<()> {
    println!("{}", "🗺️  Fieldsmith - Planning creation order".bold().green());
    println!("   File: {}\n", file.display());

    let table = parser::load_table(&file)?;
    print_plan(&table, verbose)
}

/// Execute the push command: materialize every field on the remote app.
pub fn push(
    file: PathBuf,
    config: RunConfig,
    two_pass: bool,
    dry_run: bool,
    verbose: bool,
) -> FieldsmithResult<()> {
    println!("{}", "🔨 Fieldsmith - Pushing fields".bold().green());
    println!("   File: {}", file.display());
    println!(
        "   App: {}   Workplace: {}",
        config.app_id.bright_blue(),
        config.workplace_id.bright_blue()
    );
    if two_pass {
        println!(
            "   Mode: {}",
            "two-pass (create all, then update all)".yellow()
        );
    }
    println!();

    let mut table = parser::load_table(&file)?;

    if dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No remote calls will be made\n".yellow()
        );
        return print_plan(&table, verbose);
    }

    let backend = HttpBackend::new(config)?;
    let engine = Engine::new(backend);
    let report = if two_pass {
        engine.run_two_pass(&mut table)?
    } else {
        engine.run(&mut table)?
    };

    println!("{}", "Results:".bold().cyan());
    for outcome in &report.outcomes {
        match &outcome.state {
            RowState::Created(name) => {
                println!("   {} {} as {}", "✅".green(), outcome.label, name.bright_blue());
            }
            RowState::Updated(name) => {
                println!(
                    "   {} {} as {} (updated)",
                    "✅".green(),
                    outcome.label,
                    name.bright_blue()
                );
            }
            RowState::Pending => {
                println!("   {} {} was never attempted", "⚠️".yellow(), outcome.label);
            }
            RowState::CreateFailed(reason) => {
                println!("   {} {}: {}", "❌".red(), outcome.label, reason.red());
            }
            RowState::UpdateFailed(reason) => {
                println!(
                    "   {} {} (update failed): {}",
                    "❌".red(),
                    outcome.label,
                    reason.red()
                );
            }
            RowState::SkippedUnresolved(reason) => {
                println!("   {} {}: {}", "⚠️".yellow(), outcome.label, reason.yellow());
            }
        }
    }

    println!();
    if report.is_clean() {
        println!(
            "{}",
            format!("✅ {} field(s) materialized", report.created())
                .bold()
                .green()
        );
    } else {
        println!(
            "{}",
            format!(
                "⚠️  {} field(s) materialized, {} failed; created fields were left in place",
                report.created(),
                report.failed()
            )
            .yellow()
        );
    }

    Ok(())
}

fn print_plan(table: &FieldTable, verbose: bool) -> FieldsmithResult<()> {
    let graph = DependencyGraph::build(table)?;
    let order = graph.schedule()?;

    println!("{}", "📋 Creation order:".bold().cyan());
    for (position, &row_index) in order.iter().enumerate() {
        let row = &table.rows[row_index];
        let dependencies = graph.dependencies_of(row_index);

        if dependencies.is_empty() {
            println!(
                "   {:>3}. {} ({})",
                position + 1,
                row.label.bright_blue(),
                row.field_type
            );
        } else {
            println!(
                "   {:>3}. {} ({})  needs row(s) {:?}",
                position + 1,
                row.label.bright_blue(),
                row.field_type,
                dependencies
            );
        }

        if verbose {
            if let Some(formula) = &row.formula {
                println!("        formula: {}", formula.bright_yellow());
            }
            if let Some(condition) = &row.display_condition {
                println!("        display condition: {}", condition.bright_yellow());
            }
        }
    }

    Ok(())
}
