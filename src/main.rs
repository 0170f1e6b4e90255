//! yearplan - terminal client for the shared school year plan grid

mod cli;
mod config;
mod error;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result, bail};
use cli::Cli;
use config::Config;
use std::env;
use std::path::Path;
use yearplan_core::{Backend, HttpBackend, MemoryBackend, YearPlan};

fn main() {
    let cli = match Cli::parse(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            std::process::exit(1);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (config, warnings) = Config::load(cli);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    for warning in logging::init(config.log_file.as_deref(), &config.log_level)? {
        eprintln!("Warning: {}", warning);
    }

    if cli.demo {
        log::info!("using built-in demo data");
        let backend = MemoryBackend::demo().with_scope(config.scope.clone());
        run_with(backend, cli, &config)
    } else {
        log::info!("connecting to {}", config.base_url);
        let backend = HttpBackend::with_url(config.base_url.clone(), config.timeout())
            .context("creating HTTP client")?
            .with_scope(config.scope.clone());
        run_with(backend, cli, &config)
    }
}

fn run_with<B: Backend + Send + 'static>(backend: B, cli: &Cli, config: &Config) -> Result<()> {
    if let Some(output) = &cli.output {
        let plan = YearPlan::inline(backend).with_locale(config.currency_locale());
        return export(plan, output);
    }
    run_interactive(backend, config)
}

/// Load both lists once and write them as markdown.
fn export(mut plan: YearPlan, output: &Path) -> Result<()> {
    plan.refresh();
    plan.pump();
    if let Some(failure) = plan.notices().latest().filter(|n| n.is_failure()) {
        bail!("{}", failure);
    }
    yearplan_core::storage::write_markdown(output, &plan)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Exported to {}", output.display());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_interactive<B: Backend + Send + 'static>(backend: B, config: &Config) -> Result<()> {
    let keymap = tui::Keymap::from_name(&config.keymap).unwrap_or_else(|| {
        eprintln!("Warning: Unknown keymap '{}'; using vim", config.keymap);
        tui::Keymap::Vim
    });
    let plan = YearPlan::threaded(backend).with_locale(config.currency_locale());
    let mut app = tui::App::new(plan, keymap);
    tui::run(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_interactive<B: Backend + Send + 'static>(_backend: B, _config: &Config) -> Result<()> {
    bail!("built without the terminal UI; use -o <file> to export")
}
