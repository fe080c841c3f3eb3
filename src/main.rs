//! # UI Sentinel
//!
//! CLI de validación de componentes contra el sistema de diseño: tokens,
//! grid de 8 puntos, componentes aprobados, accesibilidad WCAG, localización
//! y soporte RTL.

use clap::Parser;
use colored::Colorize;
use commands::{Cli, Commands};
use tracing_subscriber::EnvFilter;

mod commands;
mod files;

/// Variable de entorno con el filtro de logs (por defecto `warn`).
const LOG_ENV: &str = "UI_SENTINEL_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            target,
            config,
            format,
            fix,
            quiet,
        } => commands::check::handle_check(&commands::check::CheckOptions {
            target,
            config,
            format,
            fix,
            quiet,
        }),
        Commands::Rules { config } => commands::rules::handle_rules_command(&config),
        Commands::Compliance { file, config, format } => {
            commands::compliance::handle_compliance(&file, &config, format)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "❌".red(), e);
            std::process::exit(2);
        }
    }
}
