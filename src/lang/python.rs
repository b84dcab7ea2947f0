//! Python language support with tree-sitter integration.
//!
//! Wraps the tree-sitter Python grammar and provides the small set of syntax
//! helpers the sentinel and import passes share: an iterative pre-order walk,
//! node text access and string literal decoding.

use tree_sitter::{Language, Node, Parser, Tree, TreeCursor};

use crate::core::errors::{NamerError, Result};

#[cfg(test)]
#[path = "python_tests.rs"]
mod tests;

/// Extension (without dot) of Python source files.
pub const SOURCE_EXTENSION: &str = "py";

/// File name that turns a directory into a regular package.
pub const PACKAGE_INIT: &str = "__init__.py";

/// Stem of [`PACKAGE_INIT`].
pub const PACKAGE_INIT_STEM: &str = "__init__";

/// Tree-sitter parser configured for Python
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a parser with the Python grammar loaded
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|e| {
            NamerError::parse("python", format!("Failed to load Python grammar: {e}"))
        })?;
        Ok(Self { parser })
    }

    /// Parse Python source code into a syntax tree.
    ///
    /// Tree-sitter recovers from syntax errors, so a returned tree may still
    /// contain `ERROR` nodes; check [`Node::has_error`] on the root when the
    /// caller needs a clean parse.
    pub fn parse(&mut self, source_code: &str) -> Result<Tree> {
        self.parser
            .parse(source_code, None)
            .ok_or_else(|| NamerError::parse("python", "Failed to parse Python source code"))
    }
}

/// Text covered by `node`.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Named children of `node`, comments excluded.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Identifier parts of a `dotted_name` joined with `.`.
pub fn dotted_name(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "dotted_name" => {
            let parts: Vec<&str> = named_children(node)
                .into_iter()
                .filter(|part| part.kind() == "identifier")
                .map(|part| node_text(part, source))
                .collect();
            (!parts.is_empty()).then(|| parts.join("."))
        }
        "identifier" => Some(node_text(node, source).to_string()),
        _ => None,
    }
}

/// Depth-first, pre-order traversal that does not recurse
pub struct Preorder<'t> {
    cursor: TreeCursor<'t>,
    done: bool,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        if self.done {
            return None;
        }

        let node = self.cursor.node();
        if self.cursor.goto_first_child() || self.cursor.goto_next_sibling() {
            return Some(node);
        }
        loop {
            if !self.cursor.goto_parent() {
                self.done = true;
                return Some(node);
            }
            if self.cursor.goto_next_sibling() {
                return Some(node);
            }
        }
    }
}

/// Walk `root` and all of its descendants in document order.
pub fn preorder(root: Node<'_>) -> Preorder<'_> {
    Preorder {
        cursor: root.walk(),
        done: false,
    }
}

/// Value of a decoded string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedString {
    /// Literal value with escapes applied
    pub value: String,
    /// At least one part carried the `f` prefix
    pub formatted: bool,
}

/// Decode a `string` or implicitly concatenated string.
///
/// Returns `None` for bytes literals and for f-strings that contain
/// replacement fields, since neither is a plain `str` constant.
pub fn decode_string(node: Node<'_>, source: &str) -> Option<DecodedString> {
    match node.kind() {
        "string" => decode_string_part(node, source),
        "concatenated_string" => {
            let mut value = String::new();
            let mut formatted = false;
            for part in named_children(node) {
                let decoded = decode_string_part(part, source)?;
                formatted |= decoded.formatted;
                value.push_str(&decoded.value);
            }
            Some(DecodedString { value, formatted })
        }
        "parenthesized_expression" => match named_children(node).as_slice() {
            [inner] => decode_string(*inner, source),
            _ => None,
        },
        _ => None,
    }
}

/// Decode a string literal that is a plain constant (no `f` prefix).
pub fn string_constant(node: Node<'_>, source: &str) -> Option<String> {
    decode_string(node, source)
        .filter(|decoded| !decoded.formatted)
        .map(|decoded| decoded.value)
}

fn decode_string_part(node: Node<'_>, source: &str) -> Option<DecodedString> {
    if node.kind() != "string" {
        return None;
    }

    let mut start = None;
    let mut end = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => start = Some(child),
            "string_end" => end = Some(child),
            "interpolation" => return None,
            _ => {}
        }
    }
    let (start, end) = (start?, end?);

    let prefix = node_text(start, source)
        .trim_end_matches(['\'', '"'])
        .to_ascii_lowercase();
    if prefix.contains('b') {
        return None;
    }

    let content = source.get(start.end_byte()..end.start_byte())?;
    let formatted = prefix.contains('f');
    let mut value = if prefix.contains('r') {
        content.to_string()
    } else {
        unescape(content)
    };
    if formatted {
        value = value.replace("{{", "{").replace("}}", "}");
    }

    Some(DecodedString { value, formatted })
}

/// Apply Python string escape sequences.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == width => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(escaped);
                        out.push_str(&digits);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}
