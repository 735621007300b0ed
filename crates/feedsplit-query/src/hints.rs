//! Module hints declared in a query
//!
//! A fragment spread can carry `@push(module: "Path.js")`, naming the module
//! that renders the fragment's type. Servers use the hints to announce those
//! modules before the client asks for them; they never decide which renderer
//! a client uses.

use serde::Serialize;

use crate::ast::{Document, Selection, SelectionSet};

/// Directive that carries a module hint
pub const PUSH_DIRECTIVE: &str = "push";

/// Argument of `PUSH_DIRECTIVE` that names the module
pub const MODULE_ARGUMENT: &str = "module";

/// One `@push(module: ...)` found on a fragment spread
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHint {
    /// Name of the spread fragment
    pub fragment: String,
    /// The fragment's type condition, when the fragment is defined in the document
    pub target: Option<String>,
    /// Module path as written in the query
    pub module: String,
}

/// Collect module hints from the query operation
///
/// Nested selection sets are searched depth first. Hints are de-duplicated by
/// module path, keeping the first occurrence.
pub fn module_hints(doc: &Document) -> Vec<ModuleHint> {
    let mut hints = Vec::new();
    collect(doc, &doc.operation.selection_set, &mut hints);
    hints
}

fn collect(doc: &Document, set: &SelectionSet, hints: &mut Vec<ModuleHint>) {
    for selection in &set.selections {
        match selection {
            Selection::Field(field) => {
                if let Some(nested) = &field.selection_set {
                    collect(doc, nested, hints);
                }
            }
            Selection::Spread(spread) => {
                let module = spread
                    .directives
                    .iter()
                    .filter(|directive| directive.name == PUSH_DIRECTIVE)
                    .find_map(|directive| directive.argument(MODULE_ARGUMENT));
                let Some(module) = module else {
                    continue;
                };
                if hints.iter().any(|hint| hint.module == module.as_str()) {
                    continue;
                }
                hints.push(ModuleHint {
                    fragment: spread.name.clone(),
                    target: doc
                        .fragment(&spread.name)
                        .map(|fragment| fragment.type_condition.clone()),
                    module: module.as_str().to_string(),
                });
            }
        }
    }
}
