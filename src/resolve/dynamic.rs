//! Recognition of dynamic-import calls with constant arguments.
//!
//! Only a closed set of call and argument shapes is understood. Anything
//! outside it is rejected by returning `None`; nothing here ever errors.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::lang::python::{decode_string, named_children, node_text};

/// Dynamic-import entry points that are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportCallee {
    /// `import_module(...)` or `importlib.import_module(...)`
    ImportModule,
    /// `__import__(...)` or `builtins.__import__(...)`
    DunderImport,
    /// `<loader>.load_module(...)`
    LoadModule,
}

impl ImportCallee {
    /// Classify the `function` child of a call node.
    pub fn classify(function: Node<'_>, source: &str) -> Option<Self> {
        let name = match function.kind() {
            "identifier" => node_text(function, source),
            "attribute" => node_text(function.child_by_field_name("attribute")?, source),
            _ => return None,
        };
        match (function.kind(), name) {
            (_, "import_module") => Some(Self::ImportModule),
            (_, "__import__") => Some(Self::DunderImport),
            ("attribute", "load_module") => Some(Self::LoadModule),
            _ => None,
        }
    }
}

/// Argument shapes whose value can be known without running the code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantExpr {
    /// A plain string literal
    Literal(String),
    /// A name that may be bound to a constant earlier in the file
    Name(String),
    /// `left + right` where both sides are themselves constant shapes
    Concat(Box<ConstantExpr>, Box<ConstantExpr>),
    /// An f-string with no replacement fields
    Interpolation(String),
}

impl ConstantExpr {
    /// Match an expression node against the known shapes.
    pub fn from_node(node: Node<'_>, source: &str) -> Option<Self> {
        match node.kind() {
            "string" | "concatenated_string" => {
                let decoded = decode_string(node, source)?;
                Some(if decoded.formatted {
                    Self::Interpolation(decoded.value)
                } else {
                    Self::Literal(decoded.value)
                })
            }
            "identifier" => Some(Self::Name(node_text(node, source).to_string())),
            "binary_operator" => {
                let operator = node.child_by_field_name("operator")?;
                if operator.kind() != "+" {
                    return None;
                }
                let left = Self::from_node(node.child_by_field_name("left")?, source)?;
                let right = Self::from_node(node.child_by_field_name("right")?, source)?;
                Some(Self::Concat(Box::new(left), Box::new(right)))
            }
            "parenthesized_expression" => match named_children(node).as_slice() {
                [inner] => Self::from_node(*inner, source),
                _ => None,
            },
            _ => None,
        }
    }

    /// String value of the expression given the constants bound so far.
    pub fn evaluate(&self, constants: &ConstantTable) -> Option<String> {
        match self {
            Self::Literal(value) | Self::Interpolation(value) => Some(value.clone()),
            Self::Name(name) => constants.get(name).map(str::to_string),
            Self::Concat(left, right) => {
                let mut joined = left.evaluate(constants)?;
                joined.push_str(&right.evaluate(constants)?);
                Some(joined)
            }
        }
    }
}

/// Names bound to constant strings, in document order.
///
/// A later assignment of something non-constant removes the binding, so a
/// lookup always reflects the most recent assignment seen.
#[derive(Debug, Default, Clone)]
pub struct ConstantTable {
    bindings: HashMap<String, String>,
}

impl ConstantTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if constant.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Record the effect of an `assignment` node.
    pub fn observe(&mut self, assignment: Node<'_>, source: &str) {
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let name = node_text(left, source).to_string();

        let value = assignment
            .child_by_field_name("right")
            .and_then(|right| ConstantExpr::from_node(right, source))
            .and_then(|expr| expr.evaluate(self));

        match value {
            Some(value) => {
                self.bindings.insert(name, value);
            }
            None => {
                self.bindings.remove(&name);
            }
        }
    }
}

/// A recognized dynamic-import call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicImport {
    /// Which entry point was called
    pub callee: ImportCallee,
    /// Shape of the module-name argument
    pub argument: ConstantExpr,
}

impl DynamicImport {
    /// Match a `call` node. The module name is the first positional argument
    /// or the `name=` keyword.
    pub fn from_call(call: Node<'_>, source: &str) -> Option<Self> {
        let callee = ImportCallee::classify(call.child_by_field_name("function")?, source)?;
        let arguments = call.child_by_field_name("arguments")?;

        let mut positional = None;
        let mut keyword = None;
        for argument in named_children(arguments) {
            match argument.kind() {
                "keyword_argument" => {
                    let is_name = argument
                        .child_by_field_name("name")
                        .is_some_and(|name| node_text(name, source) == "name");
                    if is_name && keyword.is_none() {
                        keyword = argument.child_by_field_name("value");
                    }
                }
                "list_splat" | "dictionary_splat" => {}
                _ if positional.is_none() => positional = Some(argument),
                _ => {}
            }
        }

        let argument = ConstantExpr::from_node(positional.or(keyword)?, source)?;
        Some(Self { callee, argument })
    }

    /// Module name if the argument is constant under `constants`.
    pub fn module_name(&self, constants: &ConstantTable) -> Option<String> {
        self.argument.evaluate(constants)
    }
}
