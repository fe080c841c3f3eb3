//! # Descubrimiento de archivos
//!
//! Recorre el destino respetando `.gitignore` y devuelve los archivos que el
//! validador sabe leer (componentes, scripts y hojas de estilo).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Extensiones reconocidas por el validador.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "tsx", "jsx", "ts", "mts", "cts", "js", "mjs", "cjs", "css", "scss", "sass", "less",
];

const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Un archivo explícito se devuelve tal cual; un directorio se recorre.
/// El resultado está ordenado para que los reportes sean estables.
pub fn collect_files(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        anyhow::bail!("El destino '{}' no existe", target.display());
    }

    let walker = ignore::WalkBuilder::new(target)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !SKIPPED_DIRS.contains(&name))
                .unwrap_or(true)
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = result.with_context(|| format!("Error recorriendo '{}'", target.display()))?;
        let p = entry.path();
        if p.is_file() && is_supported(p) {
            files.push(p.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Ruta para mostrar: relativa a `root` cuando es posible.
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
