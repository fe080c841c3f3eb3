pub mod check;
pub mod compliance;
pub mod rules;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use ui_sentinel::config::Preset;
use ui_sentinel::Configuration;

#[derive(Parser)]
#[command(name = "ui-sentinel")]
#[command(version, about = "Design-system compliance checks for TSX/JSX and stylesheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Opciones de configuración compartidas por todos los comandos.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Preset a usar cuando no se indica archivo de configuración
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,
    /// Archivo de configuración explícito (.toml, .yaml, .yml o .json)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Valida un archivo o directorio contra el sistema de diseño
    Check {
        /// Archivo o carpeta a validar
        target: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
        /// Formato de salida
        #[arg(long, value_enum, default_value_t = CheckFormat::Text)]
        format: CheckFormat,
        /// Aplica los fixes automáticos y vuelve a validar
        #[arg(long)]
        fix: bool,
        /// Solo muestra el resumen
        #[arg(long, short)]
        quiet: bool,
    },
    /// Lista las reglas y si están activas con la configuración actual
    Rules {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Reporte de cumplimiento profundo de un archivo
    Compliance {
        /// Archivo a analizar
        file: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, value_enum, default_value_t = ComplianceFormat::Text)]
        format: ComplianceFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    Text,
    Json,
    Markdown,
    Html,
    Sarif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComplianceFormat {
    Text,
    Json,
    Markdown,
}

/// Resuelve la configuración: `--config` explícito, luego `--preset`, luego
/// el primer `.uisentinel.*` encontrado subiendo desde `start`, y por último
/// el preset strict. Devuelve también el archivo usado, si lo hubo.
pub fn resolve_config(args: &ConfigArgs, start: &Path) -> Result<(Configuration, Option<PathBuf>)> {
    if let Some(path) = &args.config {
        let config = Configuration::load_file(path)
            .with_context(|| format!("No se pudo cargar la configuración '{}'", path.display()))?;
        return Ok((config, Some(path.clone())));
    }
    if let Some(preset) = args.preset {
        return Ok((Configuration::preset(preset), None));
    }
    let start = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };
    for dir in start.ancestors() {
        if let Some(path) = Configuration::find_config_file(dir) {
            let config = Configuration::load_file(&path)
                .with_context(|| format!("No se pudo cargar la configuración '{}'", path.display()))?;
            return Ok((config, Some(path)));
        }
    }
    Ok((Configuration::strict(), None))
}
