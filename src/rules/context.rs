use crate::config::Configuration;
use crate::error::ParseError;
use crate::markup::{self, Dialect, FileKind, MarkupTree};
use std::collections::BTreeMap;
use std::path::Path;

/// Read-only snapshot of one file handed to every rule.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub file_path: String,
    pub content: String,
    pub file_kind: FileKind,
    /// Present only for parseable files that parsed cleanly.
    pub tree: Option<MarkupTree>,
    pub config: Configuration,
    pub metadata: BTreeMap<String, String>,
}

impl ValidationContext {
    /// Detects the file kind and parses markup when the kind allows it.
    ///
    /// A parse failure is handed back next to the context, which then carries
    /// no tree; text-pattern rules still run against `content`.
    pub fn build(
        file_path: &str,
        content: &str,
        config: &Configuration,
    ) -> (Self, Option<ParseError>) {
        let path = Path::new(file_path);
        let file_kind = FileKind::detect(path);

        let (tree, parse_error) = match Dialect::from_path(path) {
            Some(dialect) if file_kind.is_parseable() => match markup::parse(content, dialect) {
                Ok(tree) => (Some(tree), None),
                Err(e) => (None, Some(e)),
            },
            _ => (None, None),
        };

        let ctx = Self {
            file_path: file_path.to_string(),
            content: content.to_string(),
            file_kind,
            tree,
            config: config.clone(),
            metadata: BTreeMap::new(),
        };
        (ctx, parse_error)
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    pub fn line_count(&self) -> usize {
        if self.content.is_empty() {
            0
        } else {
            self.content.trim_end_matches('\n').split('\n').count()
        }
    }

    /// Elements of the parsed tree, empty when the file has none.
    pub fn elements(&self) -> &[markup::Element] {
        self.tree.as_ref().map(|t| t.elements.as_slice()).unwrap_or(&[])
    }

    pub fn texts(&self) -> &[markup::TextNode] {
        self.tree.as_ref().map(|t| t.texts.as_slice()).unwrap_or(&[])
    }
}
