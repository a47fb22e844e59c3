mod cli;
mod error;
mod inspect;
mod model;
mod scan;
mod shell;
mod switch;
mod ui;

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use model::{Tools, VersionEntry, combine, mark_active};
use scan::{
    current_version_manager_version, list_package_manager_versions, list_version_manager_versions,
};
use shell::{ProcessSearchPath, Shell, SystemShell};
use tracing_subscriber::{EnvFilter, fmt};
use ui::Picker;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays the package listing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let tools = cli.tools();

    // Both sources must load before anything is shown
    let entries = match load_entries(&SystemShell, &tools, &mut io::stderr()) {
        Ok(entries) => entries,
        Err(code) => return code,
    };

    if cli.list {
        for e in &entries {
            let marker = if e.active { '\u{25cf}' } else { ' ' };
            println!("{marker} {}\t{}", e.title, e.description);
        }
        return ExitCode::SUCCESS;
    }

    let mut picker = Picker::new(cli.color_spec.clone(), !cli.no_seg_colors);
    match run(&mut picker, &tools, &entries) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn collect(shell: &dyn Shell, tools: &Tools) -> Result<Vec<VersionEntry>> {
    let pyenv = list_version_manager_versions(shell, tools.pyenv())
        .context("Error retrieving pyenv versions")?;
    let homebrew = list_package_manager_versions(&tools.brew_opt)
        .context("Error retrieving Homebrew versions")?;

    let mut entries = combine(pyenv, homebrew);
    let current = current_version_manager_version(shell, tools.pyenv());
    mark_active(&mut entries, current.as_deref());
    Ok(entries)
}

/// Startup-fatal tier: any source failure is reported on `err` and maps to
/// exit status 1.
fn load_entries(
    shell: &dyn Shell,
    tools: &Tools,
    err: &mut dyn Write,
) -> std::result::Result<Vec<VersionEntry>, ExitCode> {
    collect(shell, tools).map_err(|e| {
        let _ = writeln!(err, "{e:#}");
        ExitCode::FAILURE
    })
}

fn run(picker: &mut Picker, tools: &Tools, entries: &[VersionEntry]) -> Result<()> {
    let selected = ui::run_session(picker, entries).context("failed to start the picker")?;
    if let Some(entry) = selected {
        let mut stdout = io::stdout().lock();
        // Past this point failures are reported inline, not as exit codes
        if let Err(e) = ui::confirm(&mut stdout, &SystemShell, &mut ProcessSearchPath, tools, &entry) {
            tracing::warn!(error = %e, "could not write results");
        }
    }
    Ok(())
}
