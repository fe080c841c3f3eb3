use super::{resolve_config, ComplianceFormat, ConfigArgs};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;
use ui_sentinel::{DeepComplianceReport, RuleEngine};

/// Informativo: siempre devuelve 0 salvo error de lectura o configuración.
pub fn handle_compliance(file: &Path, args: &ConfigArgs, format: ComplianceFormat) -> Result<i32> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("No se pudo leer '{}'", file.display()))?;
    let (config, _) = resolve_config(args, file)?;
    let engine = RuleEngine::new(config)?;
    let report = engine.deep_compliance(&file.display().to_string(), &content);

    match format {
        ComplianceFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ComplianceFormat::Markdown => println!("{}", report.render_markdown()),
        ComplianceFormat::Text => print_table(&report),
    }
    Ok(0)
}

fn print_table(report: &DeepComplianceReport) {
    println!("\n🔍 {} {}", "Cumplimiento profundo:".bold(), report.file_path.cyan());
    if !report.parsed && report.file_kind.is_parseable() {
        println!("   {} No se pudo parsear el marcado; solo se aplicaron chequeos de texto.", "⚠️".yellow());
    }
    println!();
    for (name, count, coverage) in report.rows() {
        let mark = if count == 0 { "✅" } else { "❌" };
        let pct = format!("{:>5.0}%", coverage);
        let pct = if count == 0 { pct.green() } else { pct.yellow() };
        println!("   {} {:<16} {:>4} hallazgo(s)  {}", mark, name, count, pct);
    }
    println!(
        "\n📊 Cobertura global: {}",
        format!("{:.1}%", report.overall_coverage).bold()
    );
}
