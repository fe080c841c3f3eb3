use super::{resolve_config, CheckFormat, ConfigArgs};
use crate::files::{collect_files, display_path};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use ui_sentinel::config::{OutputFormat, ReportingLevel};
use ui_sentinel::report::{render, render_json, render_sarif};
use ui_sentinel::{ComplianceReport, Fix, RuleEngine, RuleLevel};

pub struct CheckOptions {
    pub target: PathBuf,
    pub config: ConfigArgs,
    pub format: CheckFormat,
    pub fix: bool,
    pub quiet: bool,
}

/// Fuente leída del disco junto con su ruta para mostrar.
struct Source {
    path: PathBuf,
    display: String,
    content: String,
}

/// Devuelve el código de salida: 0 si todo cumple, 1 si hay errores.
pub fn handle_check(opts: &CheckOptions) -> Result<i32> {
    let cwd = std::env::current_dir().context("No se pudo leer el directorio actual")?;
    let text_mode = opts.format == CheckFormat::Text;

    let (config, config_file) = resolve_config(&opts.config, &opts.target)?;
    let engine = RuleEngine::new(config)?;

    let files = collect_files(&opts.target)?;
    if files.is_empty() {
        if text_mode {
            println!(
                "{} No se encontraron archivos para validar en '{}'.",
                "⚠️".yellow(),
                opts.target.display()
            );
        } else {
            print_report(&engine.validate_files::<String, String>(&[]), opts.format);
        }
        return Ok(0);
    }

    if text_mode && !opts.quiet {
        if let Some(path) = &config_file {
            println!("{} Configuración: {}", "⚙️".cyan(), display_path(path, &cwd));
        }
        println!("\n{} Validando {} archivo(s)...", "⚡".cyan(), files.len());
    }

    let mut sources = read_sources(&files, &cwd);
    let mut report = validate(&engine, &sources);

    if opts.fix {
        let written = write_fixes(&engine, &mut sources, &report)?;
        if text_mode && !opts.quiet {
            println!("{} {} fix(es) aplicados en {} archivo(s)", "🔧".cyan(), written.0, written.1);
        }
        if written.1 > 0 {
            report = validate(&engine, &sources);
        }
    }

    if text_mode {
        print_terminal(&report, opts.quiet);
    } else {
        print_report(&report, opts.format);
    }

    // Exit 1 si hay errores → CI falla el build
    Ok(if report.summary.compliant { 0 } else { 1 })
}

fn read_sources(files: &[PathBuf], cwd: &Path) -> Vec<Source> {
    files
        .iter()
        .filter_map(|path| match fs::read_to_string(path) {
            Ok(content) => Some(Source {
                path: path.clone(),
                display: display_path(path, cwd),
                content,
            }),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
                None
            }
        })
        .collect()
}

fn validate(engine: &RuleEngine, sources: &[Source]) -> ComplianceReport {
    let pairs: Vec<(&str, &str)> = sources
        .iter()
        .map(|s| (s.display.as_str(), s.content.as_str()))
        .collect();
    engine.validate_files(&pairs)
}

/// Pasadas máximas de `--fix` por archivo; dos fixes sobre el mismo token
/// (`pl-7` → `pl-6` → `ps-6`) necesitan más de una.
const MAX_FIX_PASSES: usize = 5;

/// Aplica los fixes con rango y escribe los archivos modificados.
/// Devuelve (fixes aplicados, archivos escritos).
fn write_fixes(
    engine: &RuleEngine,
    sources: &mut [Source],
    report: &ComplianceReport,
) -> Result<(usize, usize)> {
    let mut applied = 0;
    let mut written = 0;
    for (source, file) in sources.iter_mut().zip(&report.files) {
        let (content, file_applied) = fix_content(engine, &source.display, &source.content, &file.fixes);
        if file_applied == 0 {
            continue;
        }
        fs::write(&source.path, &content)
            .with_context(|| format!("No se pudo escribir '{}'", source.path.display()))?;
        source.content = content;
        applied += file_applied;
        written += 1;
    }
    Ok((applied, written))
}

/// Aplica y revalida hasta que ningún fix se aplique o se agoten las pasadas.
fn fix_content(engine: &RuleEngine, display: &str, content: &str, first: &[Fix]) -> (String, usize) {
    let mut content = content.to_string();
    let mut fixes: Vec<Fix> = first.iter().filter(|f| f.is_applicable()).cloned().collect();
    let mut applied = 0;
    for _ in 0..MAX_FIX_PASSES {
        if fixes.is_empty() {
            break;
        }
        let outcome = engine.apply_fixes(&content, &fixes);
        if outcome.applied == 0 {
            break;
        }
        applied += outcome.applied;
        content = outcome.content;
        fixes = engine
            .validate_file(display, &content)
            .fixes
            .into_iter()
            .filter(|f| f.is_applicable())
            .collect();
    }
    (content, applied)
}

fn print_report(report: &ComplianceReport, format: CheckFormat) {
    let out = match format {
        CheckFormat::Json => render_json(report),
        CheckFormat::Sarif => render_sarif(report),
        CheckFormat::Markdown => render(report, OutputFormat::Markdown),
        CheckFormat::Html => render(report, OutputFormat::Html),
        CheckFormat::Text => render(report, report.config.output_format),
    };
    println!("{}", out);
}

fn print_terminal(report: &ComplianceReport, quiet: bool) {
    let detailed = report.config.reporting_level == ReportingLevel::Detailed;

    if !quiet && report.config.reporting_level != ReportingLevel::Minimal {
        for file in report.files.iter().filter(|f| !f.violations.is_empty()) {
            println!(
                "\n📄 {} {}",
                file.file_path.bold().cyan(),
                format!("({}/100)", file.score).dimmed()
            );
            for v in &file.violations {
                let icon = match v.severity {
                    RuleLevel::Error => "❌ ERROR".red(),
                    RuleLevel::Warning => "⚠️  WARN ".yellow(),
                    RuleLevel::Info => "ℹ️  INFO ".blue(),
                };
                println!(
                    "   {} [{}:{}:{}]: {}",
                    icon,
                    v.rule_id.yellow(),
                    v.line,
                    v.column,
                    v.message
                );
                if detailed {
                    if let Some(suggestion) = &v.suggestion {
                        println!("      {} {}", "💡".dimmed(), suggestion.dimmed());
                    }
                }
            }
        }
    }

    let s = &report.summary;
    if s.total_violations == 0 {
        println!("\n✅ Sin problemas detectados en {} archivo(s).", s.total_files);
    } else {
        println!(
            "\n🚩 {} error(s)  ⚠️  {} warning(s)  ℹ️  {} info(s)",
            s.violations_by_severity.error.to_string().red().bold(),
            s.violations_by_severity.warning.to_string().yellow(),
            s.violations_by_severity.info.to_string().blue()
        );
    }
    let status = if s.compliant {
        "CUMPLE".green().bold()
    } else {
        "NO CUMPLE".red().bold()
    };
    println!("📊 Puntuación: {}/100  {}", s.score, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use ui_sentinel::config::Preset;

    fn options(target: &Path, fix: bool) -> CheckOptions {
        CheckOptions {
            target: target.to_path_buf(),
            config: ConfigArgs {
                preset: Some(Preset::Strict),
                config: None,
            },
            format: CheckFormat::Json,
            fix,
            quiet: true,
        }
    }

    #[test]
    fn test_check_exit_codes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Clean.tsx"), "<Box />\n").unwrap();
        assert_eq!(handle_check(&options(tmp.path(), false)).unwrap(), 0);

        fs::write(tmp.path().join("Raw.tsx"), "<div />\n").unwrap();
        assert_eq!(handle_check(&options(tmp.path(), false)).unwrap(), 1);
    }

    #[test]
    fn test_fix_writes_back_class_rewrites() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Card.tsx");
        fs::write(&file, "<Box className=\"p-7 ml-2\" />\n").unwrap();

        let code = handle_check(&options(tmp.path(), true)).unwrap();
        assert_eq!(code, 0);
        let fixed = fs::read_to_string(&file).unwrap();
        assert_eq!(fixed, "<Box className=\"p-6 ms-2\" />\n");
    }

    #[test]
    fn test_fix_renames_raw_elements() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Page.tsx");
        fs::write(&file, "<section>\n  <Text>{t(\"hi\")}</Text>\n</section>\n").unwrap();

        let code = handle_check(&options(tmp.path(), true)).unwrap();
        assert_eq!(code, 0);
        let fixed = fs::read_to_string(&file).unwrap();
        assert_eq!(fixed, "<Section>\n  <Text>{t(\"hi\")}</Text>\n</Section>\n");
    }

    #[test]
    fn test_fix_repeats_until_overlapping_rewrites_settle() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Pad.tsx");
        fs::write(&file, "<Box className=\"pl-7\" />\n").unwrap();

        let code = handle_check(&options(tmp.path(), true)).unwrap();
        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), "<Box className=\"ps-6\" />\n");
    }

    #[test]
    fn test_fix_content_counts_every_pass() {
        let engine = RuleEngine::new(ui_sentinel::Configuration::strict()).unwrap();
        let source = "<Box className=\"pl-7\" />";
        let first = engine.validate_file("Pad.tsx", source).fixes;
        let (fixed, applied) = fix_content(&engine, "Pad.tsx", source, &first);
        assert_eq!(fixed, "<Box className=\"ps-6\" />");
        assert_eq!(applied, 2);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(handle_check(&options(&tmp.path().join("missing"), false)).is_err());
    }
}
