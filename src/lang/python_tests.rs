use super::*;

fn first_node_of_kind<'t>(tree: &'t Tree, kind: &str) -> Option<Node<'t>> {
    preorder(tree.root_node()).find(|node| node.kind() == kind)
}

fn decode_first_string(source: &str) -> Option<DecodedString> {
    let mut parser = PythonParser::new().unwrap();
    let tree = parser.parse(source).unwrap();
    let node = first_node_of_kind(&tree, "concatenated_string")
        .or_else(|| first_node_of_kind(&tree, "string"))?;
    decode_string(node, source)
}

#[test]
fn test_parser_creation() {
    assert!(PythonParser::new().is_ok(), "Should load the Python grammar");
}

#[test]
fn test_parse_reports_syntax_errors_on_root() {
    let mut parser = PythonParser::new().unwrap();
    let clean = parser.parse("DOMAINS = ['a']\n").unwrap();
    assert!(!clean.root_node().has_error());

    let broken = parser.parse("def broken(:\n    pass\n").unwrap();
    assert!(broken.root_node().has_error());
}

#[test]
fn test_preorder_visits_in_document_order() {
    let source = "import a\nx = 'one'\ny = 'two'\n";
    let mut parser = PythonParser::new().unwrap();
    let tree = parser.parse(source).unwrap();

    let kinds: Vec<&str> = preorder(tree.root_node()).map(|node| node.kind()).collect();
    assert_eq!(kinds.first(), Some(&"module"));

    let identifiers: Vec<&str> = preorder(tree.root_node())
        .filter(|node| node.kind() == "identifier")
        .map(|node| node_text(node, source))
        .collect();
    assert_eq!(identifiers, vec!["a", "x", "y"]);
}

#[test]
fn test_dotted_name_joins_identifiers() {
    let source = "import pkg.sub.module\n";
    let mut parser = PythonParser::new().unwrap();
    let tree = parser.parse(source).unwrap();
    let node = first_node_of_kind(&tree, "dotted_name").unwrap();
    assert_eq!(dotted_name(node, source).as_deref(), Some("pkg.sub.module"));
}

#[test]
fn test_decode_plain_and_escaped_strings() {
    let decoded = decode_first_string("x = 'Alpha Beta'\n").unwrap();
    assert_eq!(decoded.value, "Alpha Beta");
    assert!(!decoded.formatted);

    let escaped = decode_first_string("x = \"tab\\there \\\"q\\\"\"\n").unwrap();
    assert_eq!(escaped.value, "tab\there \"q\"");

    let raw = decode_first_string("x = r'a\\nb'\n").unwrap();
    assert_eq!(raw.value, "a\\nb");
}

#[test]
fn test_decode_rejects_bytes_and_interpolated_fstrings() {
    assert!(decode_first_string("x = b'bytes'\n").is_none());
    assert!(decode_first_string("x = f'{name}.mod'\n").is_none());
}

#[test]
fn test_decode_constant_fstring_and_concatenation() {
    let fstring = decode_first_string("x = f'pkg.fstr'\n").unwrap();
    assert_eq!(fstring.value, "pkg.fstr");
    assert!(fstring.formatted);

    let joined = decode_first_string("x = 'pkg' '.joined'\n").unwrap();
    assert_eq!(joined.value, "pkg.joined");
    assert!(!joined.formatted);
}

#[test]
fn test_unescape_hex_and_unknown_sequences() {
    assert_eq!(unescape("caf\\xe9"), "café");
    assert_eq!(unescape("\\u00e9"), "é");
    assert_eq!(unescape("keep\\d"), "keep\\d");
    assert_eq!(unescape("line\\\ncontinued"), "linecontinued");
}
