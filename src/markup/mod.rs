//! Markup model
//!
//! A flattened view of the JSX in a source file: every element with its
//! attributes, and every literal text node. Rules read this instead of the
//! raw tree-sitter tree so they never deal with grammar node kinds.

pub mod parser;

pub use parser::parse;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Source position: 1-based line, 0-based character column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position reached after walking over `text` starting here.
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        for c in text.chars() {
            if c == '\n' {
                pos.line += 1;
                pos.column = 0;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

/// Half-open range `[start, end)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    MarkupComponent,
    Script,
    Stylesheet,
    Other,
}

impl FileKind {
    pub fn detect(path: &Path) -> Self {
        match extension(path).as_str() {
            "tsx" | "jsx" => FileKind::MarkupComponent,
            "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => FileKind::Script,
            "css" | "scss" | "sass" | "less" => FileKind::Stylesheet,
            _ => FileKind::Other,
        }
    }

    pub fn is_parseable(&self) -> bool {
        matches!(self, FileKind::MarkupComponent | FileKind::Script)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileKind::MarkupComponent => "markup-component",
            FileKind::Script => "script",
            FileKind::Stylesheet => "stylesheet",
            FileKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Grammar used for a parseable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Tsx,
    TypeScript,
    JavaScript,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension(path).as_str() {
            "tsx" => Some(Dialect::Tsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "jsx" | "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            _ => None,
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `disabled`
    Bare,
    /// `title="Save"`, quotes removed.
    Literal(String),
    /// `onClick={handle}`, braces removed.
    Expression(String),
}

impl AttrValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AttrValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Raw text worth scanning for class names or style declarations.
    pub fn text(&self) -> &str {
        match self {
            AttrValue::Bare => "",
            AttrValue::Literal(s) | AttrValue::Expression(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
    pub span: Span,
    /// Span of the value node including quotes or braces.
    pub value_span: Option<Span>,
}

impl Attribute {
    /// Position of the first character inside the quotes/braces of the value.
    pub fn value_start(&self) -> Option<Position> {
        let span = self.value_span?;
        match &self.value {
            AttrValue::Bare => None,
            _ => Some(Position::new(span.start.line, span.start.column + 1)),
        }
    }

    pub fn has_value(&self) -> bool {
        match &self.value {
            AttrValue::Bare => true,
            AttrValue::Literal(s) | AttrValue::Expression(s) => !s.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub span: Span,
    pub name_span: Span,
    /// Tag name inside `</...>`, absent for self-closing elements.
    pub closing_name_span: Option<Span>,
    /// Nested literal text, trimmed and space-joined.
    pub text_content: String,
    /// A `{...}` expression appears among the direct children.
    pub has_dynamic_children: bool,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Literal value of an attribute, if it was written as a string.
    pub fn literal(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|a| a.value.as_literal())
    }

    pub fn is_component(&self) -> bool {
        self.tag.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    }

    pub fn class_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.name == "className" || a.name == "class")
    }
}

#[derive(Debug, Clone)]
pub struct TextNode {
    /// Trimmed text.
    pub text: String,
    /// Span of the trimmed text.
    pub span: Span,
    pub parent_tag: Option<String>,
    /// Came from a `{"..."}` or template literal child rather than JSX text.
    pub from_expression: bool,
}

/// Elements and text nodes in document order.
#[derive(Debug, Clone, Default)]
pub struct MarkupTree {
    pub elements: Vec<Element>,
    pub texts: Vec<TextNode>,
}
