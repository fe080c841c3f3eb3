use super::{AttrValue, Attribute, Dialect, Element, MarkupTree, Position, Span, TextNode};
use crate::error::ParseError;
use tree_sitter::{Language, Node, Parser, Point};

fn language_for(dialect: Dialect) -> Language {
    match dialect {
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
    }
}

/// Parses `source` and flattens its JSX into a [`MarkupTree`].
///
/// tree-sitter always produces a tree; one containing ERROR or MISSING nodes
/// is reported as a [`ParseError`] located at the first broken node.
pub fn parse(source: &str, dialect: Dialect) -> Result<MarkupTree, ParseError> {
    let language = language_for(dialect);
    let mut parser = Parser::new();
    parser.set_language(&language).map_err(|e| ParseError {
        message: format!("failed to load grammar: {:?}", e),
        line: 1,
        column: 1,
    })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError {
        message: "parser produced no syntax tree".to_string(),
        line: 1,
        column: 1,
    })?;

    let index = LineIndex::new(source);
    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source, &index).unwrap_or(ParseError {
            message: "syntax error".to_string(),
            line: 1,
            column: 1,
        }));
    }

    let mut builder = TreeBuilder {
        source,
        index,
        tree: MarkupTree::default(),
    };
    builder.visit(root, None);
    Ok(builder.tree)
}

/// Converts tree-sitter byte columns into character columns.
struct LineIndex<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.split('\n').collect(),
        }
    }

    fn position(&self, point: Point) -> Position {
        let column = match self.lines.get(point.row) {
            Some(line) => match line.get(..point.column) {
                Some(prefix) => prefix.chars().count(),
                None => point.column,
            },
            None => point.column,
        };
        Position::new(point.row + 1, column)
    }
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn first_error(node: Node<'_>, source: &str, index: &LineIndex<'_>) -> Option<ParseError> {
    if node.is_missing() || node.is_error() {
        let pos = index.position(node.start_position());
        let message = if node.is_missing() {
            format!("syntax error: missing `{}`", node.kind())
        } else {
            let snippet: String = node
                .utf8_text(source.as_bytes())
                .unwrap_or("")
                .chars()
                .take(24)
                .collect();
            format!("syntax error: unexpected `{}`", snippet.trim())
        };
        return Some(ParseError {
            message,
            line: pos.line,
            column: pos.column + 1,
        });
    }
    children(node)
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(|child| first_error(child, source, index))
}

fn strip_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Keeps inner whitespace so offsets into the value still line up with the source.
fn strip_braces(raw: &str) -> &str {
    raw.strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(raw)
}

struct TreeBuilder<'a> {
    source: &'a str,
    index: LineIndex<'a>,
    tree: MarkupTree,
}

impl<'a> TreeBuilder<'a> {
    fn text_of(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn span(&self, node: Node<'_>) -> Span {
        Span::new(
            self.index.position(node.start_position()),
            self.index.position(node.end_position()),
        )
    }

    fn visit(&mut self, node: Node<'_>, parent_tag: Option<&str>) {
        match node.kind() {
            "jsx_element" => {
                let mut tag = parent_tag.map(str::to_string);
                if let Some(open) = node.child_by_field_name("open_tag") {
                    let close = node.child_by_field_name("close_tag");
                    if let Some(element) = self.element(node, open, close) {
                        tag = Some(element.tag.clone());
                        self.tree.elements.push(element);
                    }
                }
                for child in children(node) {
                    self.visit(child, tag.as_deref());
                }
            }
            "jsx_self_closing_element" => {
                if let Some(element) = self.element(node, node, None) {
                    self.tree.elements.push(element);
                }
                for child in children(node) {
                    self.visit(child, parent_tag);
                }
            }
            "jsx_text" => self.push_text(node, parent_tag),
            "jsx_expression" => {
                let is_child = node.parent().is_some_and(|p| p.kind() == "jsx_element");
                if is_child {
                    self.push_literal_expression(node, parent_tag);
                }
                for child in children(node) {
                    self.visit(child, parent_tag);
                }
            }
            _ => {
                for child in children(node) {
                    self.visit(child, parent_tag);
                }
            }
        }
    }

    fn element(&self, node: Node<'_>, open: Node<'_>, close: Option<Node<'_>>) -> Option<Element> {
        // Fragments (`<>...</>`) have no name.
        let name = open.child_by_field_name("name")?;
        let attributes = named_children(open)
            .into_iter()
            .filter(|c| c.kind() == "jsx_attribute")
            .filter_map(|c| self.attribute(c))
            .collect();

        let (text_content, has_dynamic_children) = if node.kind() == "jsx_element" {
            let mut parts = Vec::new();
            self.collect_text(node, &mut parts);
            // literal children already land in the text content
            let dynamic = children(node).into_iter().any(|c| {
                c.kind() == "jsx_expression"
                    && !is_empty_expression(c)
                    && self.literal_expression(c).is_none()
            });
            (parts.join(" "), dynamic)
        } else {
            (String::new(), false)
        };

        Some(Element {
            tag: self.text_of(name).to_string(),
            attributes,
            span: self.span(node),
            name_span: self.span(name),
            closing_name_span: close
                .and_then(|c| c.child_by_field_name("name"))
                .map(|n| self.span(n)),
            text_content,
            has_dynamic_children,
        })
    }

    fn attribute(&self, node: Node<'_>) -> Option<Attribute> {
        let named = named_children(node);
        let name_node = named.first()?;
        let value_node = named.get(1);

        let value = match value_node {
            None => AttrValue::Bare,
            Some(v) if v.kind() == "string" => {
                AttrValue::Literal(strip_quotes(self.text_of(*v)).to_string())
            }
            Some(v) if v.kind() == "jsx_expression" => {
                AttrValue::Expression(strip_braces(self.text_of(*v)).to_string())
            }
            Some(v) => AttrValue::Expression(self.text_of(*v).to_string()),
        };

        Some(Attribute {
            name: self.text_of(*name_node).to_string(),
            value,
            span: self.span(node),
            value_span: value_node.map(|v| self.span(*v)),
        })
    }

    /// Literal text below `node`, skipping tags and attribute values.
    fn collect_text(&self, node: Node<'_>, parts: &mut Vec<String>) {
        for child in children(node) {
            match child.kind() {
                "jsx_text" => {
                    let text = self.text_of(child).trim();
                    if !text.is_empty() {
                        parts.push(text.to_string());
                    }
                }
                "jsx_element" => self.collect_text(child, parts),
                "jsx_expression" => {
                    if let Some((_, text)) = self.literal_expression(child) {
                        parts.push(text);
                    }
                }
                _ => {}
            }
        }
    }

    fn push_text(&mut self, node: Node<'_>, parent_tag: Option<&str>) {
        let raw = self.text_of(node);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let leading = &raw[..raw.len() - raw.trim_start().len()];
        let start = self.span(node).start.advance(leading);
        self.tree.texts.push(TextNode {
            text: trimmed.to_string(),
            span: Span::new(start, start.advance(trimmed)),
            parent_tag: parent_tag.map(str::to_string),
            from_expression: false,
        });
    }

    fn push_literal_expression(&mut self, node: Node<'_>, parent_tag: Option<&str>) {
        let Some((literal, text)) = self.literal_expression(node) else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        let start = self.span(literal).start.advance(&self.text_of(literal)[..1]);
        self.tree.texts.push(TextNode {
            span: Span::new(start, start.advance(&text)),
            text,
            parent_tag: parent_tag.map(str::to_string),
            from_expression: true,
        });
    }

    /// `{"text"}` or `` {`text`} `` without substitutions.
    fn literal_expression<'t>(&self, node: Node<'t>) -> Option<(Node<'t>, String)> {
        let named: Vec<Node<'t>> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() != "comment")
            .collect();
        let [inner] = named.as_slice() else {
            return None;
        };
        let is_literal = match inner.kind() {
            "string" => true,
            "template_string" => !named_children(*inner)
                .iter()
                .any(|c| c.kind() == "template_substitution"),
            _ => false,
        };
        if !is_literal {
            return None;
        }
        Some((*inner, strip_quotes(self.text_of(*inner)).to_string()))
    }
}

fn is_empty_expression(node: Node<'_>) -> bool {
    named_children(node).iter().all(|c| c.kind() == "comment")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsx(source: &str) -> MarkupTree {
        parse(source, Dialect::Tsx).expect("should parse")
    }

    #[test]
    fn test_parses_elements_in_document_order() {
        let tree = tsx("const A = () => (\n  <div className=\"p-4\">\n    <Button onClick={save}>Save</Button>\n  </div>\n);");
        let tags: Vec<&str> = tree.elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["div", "Button"]);

        let div = &tree.elements[0];
        assert_eq!(div.literal("className"), Some("p-4"));
        assert_eq!(div.name_span.start, Position::new(2, 3));
        assert_eq!(div.closing_name_span.map(|s| s.start), Some(Position::new(4, 4)));

        let button = &tree.elements[1];
        assert_eq!(button.text_content, "Save");
        assert_eq!(
            button.attribute("onClick").map(|a| a.value.clone()),
            Some(AttrValue::Expression("save".to_string()))
        );
    }

    #[test]
    fn test_text_nodes_are_trimmed_with_positions() {
        let tree = tsx("<p>\n   Hello world  \n</p>");
        assert_eq!(tree.texts.len(), 1);
        let text = &tree.texts[0];
        assert_eq!(text.text, "Hello world");
        assert_eq!(text.span.start, Position::new(2, 3));
        assert_eq!(text.parent_tag.as_deref(), Some("p"));
        assert!(!text.from_expression);
    }

    #[test]
    fn test_literal_expression_children_become_text() {
        let tree = tsx("<Text>{\"Welcome back\"}{count}</Text>");
        assert_eq!(tree.texts.len(), 1);
        assert_eq!(tree.texts[0].text, "Welcome back");
        assert!(tree.texts[0].from_expression);
        assert!(tree.elements[0].has_dynamic_children);

        let tree = tsx("<Text>{\" \"}{`x`}</Text>");
        assert!(!tree.elements[0].has_dynamic_children);
        assert_eq!(tree.elements[0].text_content, "  x");
    }

    #[test]
    fn test_self_closing_and_bare_attributes() {
        let tree = tsx("<input disabled placeholder='Name' />");
        let input = &tree.elements[0];
        assert!(input.closing_name_span.is_none());
        assert_eq!(input.attribute("disabled").map(|a| a.value.clone()), Some(AttrValue::Bare));
        assert_eq!(input.literal("placeholder"), Some("Name"));
    }

    #[test]
    fn test_fragments_are_skipped_but_children_kept() {
        let tree = tsx("<><Box /><Text>hi</Text></>");
        let tags: Vec<&str> = tree.elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["Box", "Text"]);
    }

    #[test]
    fn test_nested_jsx_in_attribute_is_collected() {
        let tree = tsx("<Button icon={<svg />}>Go</Button>");
        let tags: Vec<&str> = tree.elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["Button", "svg"]);
    }

    #[test]
    fn test_columns_count_characters_not_bytes() {
        let tree = tsx("<Text>ñandú <b>x</b></Text>");
        let b = tree.elements.iter().find(|e| e.tag == "b").unwrap();
        assert_eq!(b.name_span.start, Position::new(1, 13));
    }

    #[test]
    fn test_broken_markup_is_a_parse_error() {
        let err = parse("<div><span></div", Dialect::Tsx).unwrap_err();
        assert!(err.message.starts_with("syntax error"));
        assert!(err.line >= 1);
    }

    #[test]
    fn test_javascript_dialect_understands_jsx() {
        let tree = parse("export default () => <img src=\"a.png\" />;", Dialect::JavaScript).unwrap();
        assert_eq!(tree.elements[0].tag, "img");
    }
}
