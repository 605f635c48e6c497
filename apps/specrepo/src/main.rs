//! specrepo CLI binary entry point.
//! Resolves configuration, delegates to the library and maps errors to exit codes.

use clap::Parser;
use specrepo::cli::{Cli, Commands};
use specrepo::lint::Linter;
use specrepo::utils::Console;
use specrepo::{config, output, sources};
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            name,
            only_errors,
            jobs,
        } => {
            let eff = config::resolve_effective(
                &start,
                cli.repos_root.as_deref(),
                cli.output.as_deref(),
                cli.color.as_deref(),
                if only_errors { Some(true) } else { None },
                jobs,
            );
            let console = Console::new(eff.color);
            if let Some(e) = eff.config_error.as_deref() {
                console.warn(format!("{}; using defaults", e));
            }
            if config::detect_config_root(&start).is_none() && cli.repos_root.is_none() {
                console.note(format!(
                    "No specrepo.toml found; using repos at {}",
                    eff.repos_root.display()
                ));
            }
            let linter = Linter::new(&eff);
            match linter.run(name.as_deref(), &eff.repos_root) {
                Ok(totals) => {
                    if eff.output != "json" && totals.repos > 1 {
                        console.info(format!(
                            "Linted {} repos, {} spec files.",
                            totals.repos, totals.files
                        ));
                    }
                }
                Err(e) => {
                    console.error(e.to_string());
                    std::process::exit(e.exit_code());
                }
            }
        }
        Commands::List => {
            let eff = config::resolve_effective(
                &start,
                cli.repos_root.as_deref(),
                cli.output.as_deref(),
                cli.color.as_deref(),
                None,
                None,
            );
            let console = Console::new(eff.color);
            if let Some(e) = eff.config_error.as_deref() {
                console.warn(format!("{}; using defaults", e));
            }
            if !eff.repos_root.is_dir() {
                console.error(format!(
                    "No spec repos found at: {}",
                    eff.repos_root.display()
                ));
                std::process::exit(2);
            }
            match sources::list_repos(&eff.repos_root) {
                Ok(repos) => output::print_repos(&repos, &eff.output, eff.color),
                Err(e) => {
                    console.error(format!("unable to list repos: {}", e));
                    std::process::exit(1);
                }
            }
        }
    }
}
