//! Query syntax tree

use crate::token::Pos;

/// A parsed query document: one operation plus fragment definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub operation: Operation,
    pub fragments: Vec<FragmentDef>,
}

impl Document {
    /// Look up a fragment definition by name
    pub fn fragment(&self, name: &str) -> Option<&FragmentDef> {
        self.fragments.iter().find(|fragment| fragment.name == name)
    }
}

/// The `query` operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: Option<String>,
    pub selection_set: SelectionSet,
    pub pos: Pos,
}

/// `fragment Name on Type @directives { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDef {
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(Field),
    Spread(FragmentSpread),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
    pub pos: Pos,
}

/// `...Name @directives`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSpread {
    pub name: String,
    pub directives: Vec<Directive>,
    pub pos: Pos,
}

/// `@name(arg: value, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub pos: Pos,
}

impl Directive {
    /// Value of the named argument
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// Argument values: string literals or bare names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Name(String),
}

impl Value {
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(value) | Value::Name(value) => value,
        }
    }
}
