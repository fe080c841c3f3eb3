use super::{resolve_config, ConfigArgs};
use anyhow::{Context, Result};
use colored::Colorize;
use ui_sentinel::{RuleEngine, RuleLevel};

pub fn handle_rules_command(args: &ConfigArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("No se pudo leer el directorio actual")?;
    let (config, config_file) = resolve_config(args, &cwd)?;
    let engine = RuleEngine::new(config)?;

    println!("\n{}", "Reglas registradas:".bold());

    for r in engine.rules() {
        let status = if r.enabled {
            "[ON] ".green()
        } else {
            "[OFF]".dimmed()
        };
        let level = match r.severity {
            RuleLevel::Error => "[ERROR]".red(),
            RuleLevel::Warning => "[WARNING]".yellow(),
            RuleLevel::Info => "[INFO]".blue(),
        };
        let fix = if r.auto_fixable { "autofix" } else { "" };
        println!(
            "  {} {:<28} {:<20} {:<22} {}  {}",
            status,
            r.id.yellow(),
            level,
            r.rule_type.to_string(),
            r.description,
            fix.dimmed()
        );
    }

    let cfg = engine.config();
    println!();
    match &config_file {
        Some(path) => println!("   Info: Configuración cargada desde {}", path.display()),
        None => println!("   Info: No se encontró .uisentinel.toml. Usando el preset indicado o strict."),
    }
    println!("   wcagLevel = \"{}\"", cfg.wcag_level);
    println!("   maxComponentSize = {}", cfg.max_component_size);
    println!("   allowHardcodedSpacing = {}", cfg.allow_hardcoded_spacing);
    println!("   supportedLanguages = {:?}", cfg.supported_languages);

    Ok(0)
}
